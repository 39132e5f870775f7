//! Interpreter session.

use std::io::{self, Write};

use kpl_parser::{Block, Token};

use crate::{
    fns::{NativeFn, Operation},
    interpreter::{Interpreter, Outcome},
    symbols::{Referent, ScopeId, Scopes},
    system::Config,
    Array, Error,
};

/// Interpreter session: the root symbol table, system variables, and an output sink
/// for `⎕←` and implicit output.
///
/// # Examples
///
/// ```
/// use kpl_eval::{Error, Session};
///
/// # fn main() -> Result<(), Error> {
/// let mut session = Session::new().with_output(Vec::new());
/// session.immediately_execute("Fn←{q←{2-⍵} ◊ 1 - q⍵}")?;
/// let output = session.immediately_execute("Fn 2")?.unwrap();
/// assert_eq!(session.format(&output), "1");
///
/// // Names defined in the session are classified when parsing the following lines.
/// let output = session.immediately_execute("+/Fn¨⍳3")?.unwrap();
/// assert_eq!(session.format(&output), "3");
/// # Ok(())
/// # }
/// ```
pub struct Session {
    config: Config,
    scopes: Scopes,
    output: Box<dyn Write>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Session")
            .field("config", &self.config)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with the default configuration writing to the standard output.
    pub fn new() -> Self {
        let config = Config::default();
        Self {
            scopes: Scopes::new(&config),
            config,
            output: Box::new(io::stdout()),
        }
    }

    /// Creates a session with the specified configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, e.g., if the initial index origin
    /// is not 0 or 1.
    pub fn with_config(config: Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            scopes: Scopes::new(&config),
            config,
            output: Box::new(io::stdout()),
        })
    }

    /// Replaces the output sink of this session.
    #[must_use]
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Returns the configuration of this session.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the symbol tables of this session.
    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    /// Returns the current index origin (`⎕IO`).
    pub fn index_origin(&self) -> i64 {
        self.scopes.system().index_origin
    }

    /// Returns the current print precision (`⎕PP`).
    pub fn print_precision(&self) -> usize {
        self.scopes.system().print_precision
    }

    /// Returns the current comparison tolerance (`⎕CT`).
    pub fn comparison_tolerance(&self) -> f64 {
        self.scopes.system().comparison_tolerance
    }

    /// Binds a native function to a name in the root scope.
    pub fn insert_native_fn(
        &mut self,
        name: &str,
        function: impl NativeFn + 'static,
    ) -> &mut Self {
        let function = Operation::native(function);
        self.scopes
            .set(ScopeId::ROOT, name, Referent::Function(function));
        self
    }

    /// Binds an array to a name in the root scope.
    pub fn insert_variable(&mut self, name: &str, value: Array) -> &mut Self {
        self.scopes.set(ScopeId::ROOT, name, Referent::Variable(value));
        self
    }

    /// Splits code into tokens.
    pub fn lex<'a>(&self, code: &'a str) -> Result<Vec<Token<'a>>, Error> {
        let tokens = kpl_parser::tokenize(code)?;
        log::debug!("Lexed {} token(s) from `{code}`", tokens.len());
        Ok(tokens)
    }

    /// Parses tokens into a statement list. Names are classified based on the current
    /// bindings in the root scope of this session.
    pub fn parse(&self, tokens: &[Token<'_>]) -> Result<Block, Error> {
        let block = kpl_parser::parse(tokens, &self.scopes)?;
        log::debug!("Parsed {} statement(s)", block.statements.len());
        Ok(block)
    }

    /// Evaluates a statement list in the root scope.
    ///
    /// Returns the value of the last statement unless it is an assignment or `⎕←` output.
    /// Values of other statements are written to the output sink.
    pub fn evaluate(&mut self, block: &Block) -> Result<Option<Array>, Error> {
        let mut interpreter = Interpreter::new(&mut self.scopes, &self.config, &mut *self.output);
        let outcome = interpreter.run_block(block, false);
        log::debug!("Evaluated {} statement(s): {outcome:?}", block.statements.len());
        Ok(match outcome? {
            Outcome::Value(value) => Some(value),
            Outcome::Completed(_) => None,
        })
    }

    /// Lexes, parses and evaluates code.
    pub fn immediately_execute(&mut self, code: &str) -> Result<Option<Array>, Error> {
        let tokens = self.lex(code)?;
        let block = self.parse(&tokens)?;
        self.evaluate(&block)
    }

    /// Formats an array using the current print precision.
    pub fn format(&self, array: &Array) -> String {
        let precision = self.print_precision();
        format!("{array:.precision$}")
    }
}
