//! REPL for kpl code.

use anyhow::Context as _;
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::common::{Env, ParseAndEvalResult};

const PROMPT: &str = ">>> ";
const CONTINUATION_PROMPT: &str = "... ";

pub fn repl(mut env: Env) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new().context("cannot initialize line editor")?;
    env.print_greeting()?;

    let mut snippet = String::new();
    let mut prompt = PROMPT;
    let mut snippet_index = 0;

    loop {
        let line = rl.readline(prompt);
        match line {
            Ok(line) => {
                snippet.push_str(&line);
                let name = format!("Snip #{}", snippet_index + 1);
                let result = env.parse_and_eval(&name, &snippet, true)?;
                rl.add_history_entry(line)?;
                match result {
                    ParseAndEvalResult::Ok | ParseAndEvalResult::Errored => {
                        prompt = PROMPT;
                        snippet.clear();
                        snippet_index += 1;
                    }
                    ParseAndEvalResult::Incomplete => {
                        prompt = CONTINUATION_PROMPT;
                        snippet.push('\n');
                    }
                }
            }

            Err(ReadlineError::Interrupted) => {
                println!("Bye");
                break Ok(());
            }

            Err(ReadlineError::Eof) => {
                break Ok(());
            }

            Err(err) => return Err(err).context("error reading command"),
        }
    }
}
