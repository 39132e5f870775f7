//! Tree-walking interpreter for kpl, a small APL-family array language parsed
//! by [`kpl-parser`].
//!
//! The interpreter operates on [`Array`]s: rectangular, possibly nested arrays of numbers
//! (complex in general) and characters. Scalars are arrays of rank 0.
//!
//! # Features
//!
//! - **Scalar functions** (`+ - × ÷ * ⍟ | ⌊ ⌈ ! ○ ~ = ≠ < ≤ ≥ > ∧ ∨ ⍲ ⍱`) pervade into nested
//!   arrays; in their dyadic forms, a scalar argument is paired with every element
//!   of the other argument.
//! - **Structural functions**: reshape, index generator, rotation, catenation, take / drop,
//!   transpose, replicate, grade, set functions, enclose / partitioned enclose,
//!   first / pick, depth / match, enlist / membership.
//! - **Operators**: reduce and scan (along the last and the first axis), each, commute,
//!   outer and inner products, compose, atop, over, and power (with a repetition count
//!   or a fixpoint condition).
//! - **Dfns** with lexical scoping, guards, default left arguments and recursion via `∇`.
//! - **System variables** `⎕IO` (index origin), `⎕PP` (print precision)
//!   and `⎕CT` (comparison tolerance), configurable via [`Config`].
//!
//! Errors are represented by the [`Error`] type shared with the parser; its [`ErrorKind`]
//! follows the APL tradition (`SYNTAX ERROR`, `DOMAIN ERROR`, `LENGTH ERROR`, etc.).
//!
//! The interpreter can be extended with functions implemented in Rust; see the [`fns`]
//! module for details.
//!
//! [`kpl-parser`]: https://docs.rs/kpl-parser/
//!
//! # Examples
//!
//! ```
//! use kpl_eval::{Config, ErrorKind, Session};
//!
//! # fn main() -> Result<(), kpl_eval::Error> {
//! let mut session = Session::new();
//! let output = session.immediately_execute("1 2 3 +.× 4 5 6")?.unwrap();
//! assert_eq!(session.format(&output), "32");
//!
//! // Floor of a real vector.
//! let output = session.immediately_execute("⌊¯3.1416 3.1416 .99999999999 5E20 ¯0.5E¯10")?;
//! assert_eq!(session.format(&output.unwrap()), "¯4 3 1 5E20 0");
//!
//! // Dfns and lexical scoping.
//! let code = "Fn←{q←{2-⍵} ◊ 1 - q⍵} ◊ Fn 2";
//! let output = session.immediately_execute(code)?.unwrap();
//! assert_eq!(session.format(&output), "1");
//!
//! // Errors are classified.
//! let err = session.immediately_execute("÷0").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Domain);
//!
//! // The index origin affects index generation.
//! let mut session = Session::with_config(Config::default().with_index_origin(0))?;
//! let output = session.immediately_execute("⍳5")?.unwrap();
//! assert_eq!(session.format(&output), "0 1 2 3 4");
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/kpl-eval/0.1.0")]
#![warn(missing_docs, missing_debug_implementations)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub use kpl_parser::{Error, ErrorKind, Location};

pub use crate::{
    array::{Array, Element},
    fns::{DefinedFn, NativeFn, Operand, Operation},
    interpreter::CallContext,
    session::Session,
    symbols::{Referent, ScopeId, Scopes},
    system::{Config, COMPARISON_TOLERANCE, INDEX_ORIGIN, PRINT_PRECISION},
};

mod array;
pub mod fns;
mod interpreter;
mod numeric;
mod pervade;
mod session;
mod symbols;
mod system;
