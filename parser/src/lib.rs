//! Tokenizer and parser for kpl, a small APL-family array language.
//!
//! kpl code is a sequence of statements separated by diamonds (`⋄` or `◊`) or newlines.
//! Each statement is evaluated right to left: a function applies to the result of everything
//! to its right, and has a left argument if the thing to its left is an array.
//!
//! # Supported syntax
//!
//! - **Numbers**, with the high minus `¯` for negative values, an `E` exponent
//!   and a `J` imaginary part: `¯3.5`, `5E20`, `1J¯2`. Adjacent numbers form a vector
//!   (a *strand*): `1 2 3`.
//! - **Character literals** in single quotes: `'abc'`. A one-char literal is a scalar.
//! - **Names** for arrays and functions, and the system variables `⎕IO`, `⎕PP` and `⎕CT`.
//! - **Primitive functions** such as `+ - × ÷ ⍴ ⍳ ⌽ ↑ ↓ ⊂ ⊃`, and **operators**, monadic
//!   (`/ ⌿ \ ⍀ ¨ ⍨`) and dyadic (`∘ ⍤ ⍥ ⍣ .`). `∘.f` denotes the outer product.
//! - **Dfns**: `{⍺+⍵}`, with guards (`condition : result`), default left arguments (`⍺←0`)
//!   and self-reference via `∇`.
//! - **Assignments** (`x←1 2 3`, `f←{⍵×2}`), **output** (`⎕←x`) and **bracket indexing**
//!   (`m[1;]`).
//! - `⍝` **comments**.
//!
//! Whether a name refers to an array or to a function affects how a statement is parsed.
//! Names assigned earlier in the parsed code are classified automatically; other names
//! are classified by a [`NameResolver`], which is usually backed by the symbol table
//! of an interpreter session.
//!
//! # Crate features
//!
//! - `std`. Enables support of types from `std`, such as the `Error` trait, and propagates
//!   to dependencies.
//!
//! # Examples
//!
//! ```
//! # use assert_matches::assert_matches;
//! use kpl_parser::{parse_code, Expr, FnExpr, Primitive, Statement};
//!
//! # fn main() -> Result<(), kpl_parser::Error> {
//! let block = parse_code("x←1 2 3 ⋄ +/x×2", &())?;
//! assert_eq!(block.statements.len(), 2);
//!
//! let Statement::Expr(sum) = &block.statements[1] else {
//!     unreachable!();
//! };
//! // The reduction applies to the product, since the product is to its right.
//! assert_matches!(
//!     &sum.extra,
//!     Expr::Monadic { omega, .. }
//!         if matches!(&omega.extra, Expr::Dyadic { function, .. }
//!             if function.extra == FnExpr::Primitive(Primitive::Times))
//! );
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![doc(html_root_url = "https://docs.rs/kpl-parser/0.1.0")]
#![warn(missing_docs, missing_debug_implementations)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

// Polyfill for `alloc` types.
mod alloc {
    #[cfg(not(feature = "std"))]
    extern crate alloc;

    #[cfg(not(feature = "std"))]
    pub use alloc::{
        borrow::ToOwned,
        boxed::Box,
        collections::BTreeMap,
        format,
        rc::Rc,
        string::{String, ToString},
        vec,
        vec::Vec,
    };
    #[cfg(feature = "std")]
    pub use std::{
        borrow::ToOwned,
        boxed::Box,
        collections::BTreeMap,
        format,
        rc::Rc,
        string::{String, ToString},
        vec,
        vec::Vec,
    };
}

pub use crate::{
    ast::{Block, Expr, FnExpr, Name, Operand, SpannedExpr, SpannedFnExpr, Statement},
    error::{Error, ErrorKind},
    glyphs::TokenKind,
    literal::parse_number,
    ops::{DyadicOp, MonadicOp, Primitive},
    parser::{parse, parse_code, NameClass, NameResolver},
    spans::{InputSpan, LocatedSpan, Location, Spanned},
    tokenizer::{tokenize, Token},
};

mod ast;
mod error;
pub mod glyphs;
mod literal;
mod ops;
mod parser;
mod spans;
mod tokenizer;
