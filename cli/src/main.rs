//! CLI / REPL for the kpl array language.

use anyhow::Context as _;
use clap::{ArgAction, Parser, ValueEnum};
use codespan_reporting::term::termcolor::ColorChoice;
use is_terminal::IsTerminal;
use log::LevelFilter;

use std::{
    io::{self, Read},
    path::PathBuf,
    process,
};

use kpl_eval::{Config, Session};

mod common;
mod repl;

use crate::{
    common::{Env, ERROR_EXIT_CODE, OPTION_EXIT_CODE},
    repl::repl,
};

const ABOUT: &str = "CLI and REPL for kpl, a small APL-family array language.";

const AFTER_HELP: &str = "\
EXIT CODES:
    0    Normal exit
    1    Invalid command-line option
    2    Parsing or evaluation error in non-interactive mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorMode {
    Always,
    Never,
    Auto,
}

impl ColorMode {
    fn choice(self) -> ColorChoice {
        match self {
            Self::Always => ColorChoice::Always,
            Self::Never => ColorChoice::Never,
            Self::Auto if io::stderr().is_terminal() => ColorChoice::Auto,
            Self::Auto => ColorChoice::Never,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = ABOUT, after_help = AFTER_HELP)]
struct Args {
    /// Initial index origin (`⎕IO`); 0 or 1.
    #[arg(long = "io", value_name = "ORIGIN")]
    index_origin: Option<i64>,
    /// Initial print precision (`⎕PP`), i.e. the number of significant digits
    /// when displaying numbers.
    #[arg(long = "pp", value_name = "DIGITS")]
    print_precision: Option<usize>,
    /// Initial comparison tolerance (`⎕CT`).
    #[arg(long = "ct", value_name = "TOLERANCE")]
    comparison_tolerance: Option<f64>,
    /// Code to evaluate.
    #[arg(short = 'e', long = "eval", value_name = "CODE", conflicts_with = "file")]
    code: Option<String>,
    /// Path to a `.kpl` file to run. If neither a file nor code is specified, the code
    /// is read from stdin, or the REPL is launched if stdin is a terminal.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
    /// Launch the REPL, after running the file or code if they are specified.
    #[arg(long, short = 'i')]
    interactive: bool,
    /// Increase logging verbosity. Can be repeated. Logging can also be configured
    /// with the `RUST_LOG` env variable.
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
    /// Coloring of error diagnostics.
    #[arg(long, value_enum, env = "COLOR", default_value = "auto")]
    color: ColorMode,
}

impl Args {
    fn init_logging(&self) {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(level)
            .format_timestamp(None)
            .init();
    }

    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(origin) = self.index_origin {
            config = config.with_index_origin(origin);
        }
        if let Some(precision) = self.print_precision {
            config = config.with_print_precision(precision);
        }
        if let Some(tolerance) = self.comparison_tolerance {
            config = config.with_comparison_tolerance(tolerance);
        }
        config
    }

    /// Returns `false` if running non-interactive code has failed.
    fn run(self) -> anyhow::Result<bool> {
        let config = self.config();
        log::info!("Starting session with {config:?}");
        let session = Session::with_config(config).context("invalid initial system values")?;
        let mut env = Env::new(session, self.color.choice());

        let is_success = if let Some(code) = &self.code {
            env.run_snippet("<eval>", code)?
        } else if let Some(path) = &self.file {
            env.run_file(path)?
        } else if self.interactive || io::stdin().is_terminal() {
            return repl(env).map(|()| true);
        } else {
            let mut code = String::new();
            io::stdin()
                .read_to_string(&mut code)
                .context("cannot read code from stdin")?;
            env.run_snippet("<stdin>", &code)?
        };

        if self.interactive {
            repl(env)?;
            Ok(true)
        } else {
            Ok(is_success)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let exit_code = if err.use_stderr() { OPTION_EXIT_CODE } else { 0 };
            err.print()?;
            process::exit(exit_code);
        }
    };
    args.init_logging();

    if !args.run()? {
        process::exit(ERROR_EXIT_CODE);
    }
    Ok(())
}
