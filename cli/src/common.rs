//! Common utils: running code in a session and reporting errors.

use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFiles,
    term::termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor},
    term::{emit, Config as ReportingConfig},
};

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    ops::Range,
    path::Path,
};

use kpl_eval::{Array, Error, ErrorKind, Session};
use kpl_parser::{Location, Token, TokenKind};

/// Exit code for invalid command-line options.
pub const OPTION_EXIT_CODE: i32 = 1;
/// Exit code for errors in non-interactive mode.
pub const ERROR_EXIT_CODE: i32 = 2;

/// Expected extension of source files.
const FILE_EXTENSION: &str = "kpl";

/// Result of parsing and evaluating a code snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAndEvalResult {
    Ok,
    /// The snippet has unbalanced braces and should be continued.
    Incomplete,
    Errored,
}

/// Splits tokens into statement units at top-level line breaks. Line breaks within
/// parentheses, braces or brackets do not split units, so that a multi-line dfn
/// is a single unit. Also returns the number of groups left open at the end.
fn statement_units<'t, 'a>(tokens: &'t [Token<'a>]) -> (Vec<&'t [Token<'a>]>, usize) {
    let mut units = vec![];
    let mut depth = 0_usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token.extra {
            kind if kind.is_opening() => depth += 1,
            kind if kind.is_closing() => depth = depth.saturating_sub(1),
            TokenKind::Separator if depth == 0 && *token.fragment() == "\n" => {
                if i > start {
                    units.push(&tokens[start..i]);
                }
                start = i + 1;
            }
            _ => { /* Do nothing */ }
        }
    }
    if start < tokens.len() {
        units.push(&tokens[start..]);
    }
    (units, depth)
}

/// Code map containing evaluated code snippets. Tokens of each snippet are shifted
/// by the start position of the snippet, so that a location in the AST identifies
/// the snippet it belongs to.
#[derive(Debug)]
struct CodeMap {
    files: SimpleFiles<String, String>,
    code_positions: BTreeMap<usize, usize>,
    next_position: usize,
}

impl Default for CodeMap {
    fn default() -> Self {
        Self {
            files: SimpleFiles::new(),
            code_positions: BTreeMap::new(),
            next_position: 0,
        }
    }
}

impl CodeMap {
    fn add(&mut self, name: &str, code: &str) -> usize {
        let file_id = self.files.add(name.to_owned(), code.to_owned());
        self.code_positions.insert(self.next_position, file_id);
        // The gap keeps end-of-snippet locations unambiguous.
        self.next_position += code.len() + 1;
        file_id
    }

    fn locate(&self, location: &Location) -> Option<(usize, Range<usize>)> {
        let offset = location.location_offset();
        let (&file_start, &file_id) = self.code_positions.range(..=offset).next_back()?;
        let range = location.range();
        let range = (range.start - file_start)..(range.end - file_start);
        let source = self.files.get(file_id).ok()?.source();
        (range.end <= source.len()).then_some((file_id, range))
    }
}

/// Session together with the evaluated code and the diagnostics writer.
pub struct Env {
    session: Session,
    code_map: CodeMap,
    writer: StandardStream,
    config: ReportingConfig,
}

impl Env {
    pub fn new(session: Session, color_choice: ColorChoice) -> Self {
        Self {
            session,
            code_map: CodeMap::default(),
            writer: StandardStream::stderr(color_choice),
            config: ReportingConfig::default(),
        }
    }

    pub fn print_greeting(&self) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(writer, "kpl REPL v{}", env!("CARGO_PKG_VERSION"))?;
        writer.reset()?;
        writeln!(writer, "{}", env!("CARGO_PKG_DESCRIPTION"))
    }

    /// Runs a code snippet. Returns `Ok(false)` if the snippet has failed.
    pub fn run_snippet(&mut self, name: &str, code: &str) -> anyhow::Result<bool> {
        let result = self.parse_and_eval(name, code, false)?;
        Ok(result == ParseAndEvalResult::Ok)
    }

    /// Runs a `.kpl` file. Returns `Ok(false)` if the file cannot be read or has failed.
    pub fn run_file(&mut self, path: &Path) -> anyhow::Result<bool> {
        if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
            let message = format!("`{}` is not a `.{FILE_EXTENSION}` file", path.display());
            self.report_error(None, &Error::new(ErrorKind::File, message))?;
            return Ok(false);
        }

        log::info!("Running file `{}`", path.display());
        let code = match fs::read_to_string(path) {
            Ok(code) => code,
            Err(err) => {
                let message = format!("Cannot read `{}`: {err}", path.display());
                self.report_error(None, &Error::new(ErrorKind::File, message))?;
                return Ok(false);
            }
        };
        self.run_snippet(&path.display().to_string(), &code)
    }

    /// Parses and evaluates code statement by statement, printing the values of statements.
    /// If `allow_incomplete` is set, code with unbalanced braces is not evaluated.
    pub fn parse_and_eval(
        &mut self,
        name: &str,
        code: &str,
        allow_incomplete: bool,
    ) -> anyhow::Result<ParseAndEvalResult> {
        let tokens = match self.session.lex(code) {
            Ok(tokens) => tokens,
            Err(err) => {
                let file_id = self.code_map.add(name, code);
                let label = err.location().map(|location| (file_id, location.range()));
                self.report_error(label, &err)?;
                return Ok(ParseAndEvalResult::Errored);
            }
        };

        let start = self.code_map.next_position;
        let tokens: Vec<_> = tokens
            .into_iter()
            .map(|token| token.shifted(start, 0))
            .collect();
        let (units, open_groups) = statement_units(&tokens);
        if allow_incomplete && open_groups > 0 {
            return Ok(ParseAndEvalResult::Incomplete);
        }
        let file_id = self.code_map.add(name, code);
        log::debug!("Added snippet `{name}` as file #{file_id} at position {start}");

        for unit in units {
            log::debug!("Evaluating statement unit with {} token(s)", unit.len());
            let outcome = self
                .session
                .parse(unit)
                .and_then(|block| self.session.evaluate(&block));
            match outcome {
                Ok(Some(value)) => self.print_value(&value)?,
                Ok(None) => { /* Assignment or output */ }
                Err(err) => {
                    let label = err.location().and_then(|loc| self.code_map.locate(loc));
                    self.report_error(label, &err)?;
                    return Ok(ParseAndEvalResult::Errored);
                }
            }
        }
        Ok(ParseAndEvalResult::Ok)
    }

    fn print_value(&self, value: &Array) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", self.session.format(value))?;
        stdout.flush()
    }

    /// Reports an error as a diagnostic, labeling the specified code range if any.
    /// For errors raised in dfns, the range belongs to the snippet defining the dfn.
    fn report_error(
        &self,
        label: Option<(usize, Range<usize>)>,
        err: &Error,
    ) -> anyhow::Result<()> {
        let mut labels = vec![];
        let mut notes = vec![];
        if let Some((file_id, range)) = label {
            labels.push(Label::primary(file_id, range).with_message("Error occurred here"));
        } else if let Some(location) = err.location() {
            notes.push(format!(
                "Error occurred at {}:{}",
                location.location_line(),
                location.get_column()
            ));
        }
        if err.kind() == ErrorKind::Internal {
            notes.push("Session state may be inconsistent after this error".to_owned());
        }

        let diagnostic = Diagnostic::error()
            .with_message(err.message())
            .with_code(err.kind().to_string())
            .with_labels(labels)
            .with_notes(notes);
        let files = &self.code_map.files;
        emit(&mut self.writer.lock(), &self.config, files, &diagnostic)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(code: &str) -> Vec<String> {
        let tokens = kpl_parser::tokenize(code).unwrap();
        let (units, open_groups) = statement_units(&tokens);
        assert_eq!(open_groups, 0);
        units
            .into_iter()
            .map(|unit| {
                let start = unit[0].location_offset();
                let last = unit.last().unwrap();
                let end = last.location_offset() + last.fragment().len();
                code[start..end].to_owned()
            })
            .collect()
    }

    #[test]
    fn splitting_statement_units() {
        assert_eq!(units("x←1 ⋄ x+1"), ["x←1 ⋄ x+1"]);
        assert_eq!(units("x←1\nx+1"), ["x←1", "x+1"]);
        assert_eq!(units("f←{\n  ⍵+1\n}\nf 2"), ["f←{\n  ⍵+1\n}", "f 2"]);
        assert_eq!(units("\n\n1 2 3\n"), ["1 2 3"]);
        assert!(units("⍝ comment only").is_empty());
    }

    #[test]
    fn locating_code_in_snippets() {
        let mut code_map = CodeMap::default();
        let first = code_map.add("Snip #1", "f←{1÷⍵}");
        let start = code_map.next_position;
        let second = code_map.add("Snip #2", "f 0");
        let empty = code_map.add("Snip #3", "");
        let third = code_map.add("Snip #4", "1 2 3 4 5 6 7 8 9");

        let division = Location::new("f←{1".len(), 1, 5, "÷".len());
        assert_eq!(code_map.locate(&division), Some((first, 6..8)));
        let call = Location::new(start, 1, 1, 3);
        assert_eq!(code_map.locate(&call), Some((second, 0..3)));
        let end_of_call = Location::new(start + 3, 1, 4, 0);
        assert_eq!(code_map.locate(&end_of_call), Some((second, 3..3)));
        let empty_start = code_map.next_position - "1 2 3 4 5 6 7 8 9".len() - 2;
        assert_eq!(code_map.locate(&Location::new(empty_start, 1, 1, 0)), Some((empty, 0..0)));
        assert_eq!(code_map.locate(&Location::new(empty_start + 1, 1, 1, 1)).unwrap().0, third);

        let outside = Location::new(code_map.next_position + 5, 1, 1, 1);
        assert_eq!(code_map.locate(&outside), None);
    }

    #[test]
    fn detecting_unbalanced_braces() {
        let tokens = kpl_parser::tokenize("f←{\n⍵+1").unwrap();
        let (units, open_groups) = statement_units(&tokens);
        assert_eq!(units.len(), 1);
        assert_eq!(open_groups, 1);

        let tokens = kpl_parser::tokenize("1 2)").unwrap();
        assert_eq!(statement_units(&tokens).1, 0);
    }
}
