//! Primitive functions and operators, and the tools to define new native functions.
//!
//! # Defining native functions
//!
//! - Scalar functions only need to define their leaf operation on simple scalars by
//!   implementing [`ScalarFn`]; wrapping the implementation into [`Pervasive`] extends it
//!   to arbitrary (including nested) arrays.
//! - Other functions implement [`NativeFn`] directly. A function gets its arguments
//!   by value and can call other functions via the [`CallContext`].

use core::fmt;
use std::rc::Rc;

use kpl_parser::{Block, DyadicOp, MonadicOp, Primitive};

use crate::{numeric, symbols::ScopeId, Array, CallContext, Element, Error};

mod nested;
mod operators;
mod scalar;
mod structural;

pub(crate) use self::structural::checked_index;
pub use self::{
    nested::{Depth, Enclose, Enlist, First, Tally},
    operators::{
        Atop, Commute, Compose, Each, InnerProduct, OuterProduct, Over, Power, Reduce, Scan,
    },
    scalar::{
        And, Circle, Divide, Downstile, Equal, Exclamation, Greater, GreaterOrEqual, Less,
        LessOrEqual, Log, Minus, Nand, Nor, Not, NotEqual, Or, Pervasive, Plus, ScalarFn, Star,
        Stile, Times, Upstile,
    },
    structural::{
        Catenate, Drop, Grade, Intersection, Iota, Left, Replicate, Reverse, Rho, Right, Take,
        Tilde, Transpose, Union,
    },
};

/// Function implemented in Rust.
pub trait NativeFn {
    /// Returns the name of the function used in error messages and display.
    fn name(&self) -> String;

    /// Applies the function to a single argument.
    ///
    /// The default implementation returns a [`DomainError`](crate::ErrorKind::Domain).
    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        let _ = (omega, ctx);
        Err(scalar::no_monadic_form(&self.name()))
    }

    /// Applies the function to two arguments.
    ///
    /// The default implementation returns a [`DomainError`](crate::ErrorKind::Domain).
    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let _ = (alpha, omega, ctx);
        Err(scalar::no_dyadic_form(&self.name()))
    }

    /// Returns the identity element of the dyadic form, if any. The identity is used
    /// to reduce empty arrays.
    fn identity(&self) -> Option<Array> {
        None
    }
}

impl fmt::Debug for dyn NativeFn {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("NativeFn")
            .field(&self.name())
            .finish()
    }
}

/// Dfn together with the scope it was defined in. Each call of the dfn runs in a fresh
/// scope whose parent is the defining scope.
#[derive(Debug)]
pub struct DefinedFn {
    pub(crate) body: Rc<Block>,
    pub(crate) scope: ScopeId,
}

impl DefinedFn {
    /// Returns the body of this function.
    pub fn body(&self) -> &Block {
        &self.body
    }
}

/// Function value: either a native function (including primitives and derived functions),
/// or a dfn.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Operation {
    /// Native function.
    Native(Rc<dyn NativeFn>),
    /// Dfn.
    Defined(Rc<DefinedFn>),
}

impl Operation {
    /// Creates a native function.
    pub fn native(function: impl NativeFn + 'static) -> Self {
        Self::Native(Rc::new(function))
    }

    pub(crate) fn defined(body: Rc<Block>, scope: ScopeId) -> Self {
        Self::Defined(Rc::new(DefinedFn { body, scope }))
    }

    /// Returns the name of this function.
    pub fn name(&self) -> String {
        match self {
            Self::Native(function) => function.name(),
            Self::Defined(_) => "{dfn}".to_owned(),
        }
    }

    /// Returns the identity element of this function, if it is known.
    pub fn identity(&self) -> Option<Array> {
        match self {
            Self::Native(function) => function.identity(),
            Self::Defined(_) => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.name())
    }
}

/// Evaluated operand of an operator.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Function operand.
    Function(Operation),
    /// Array operand.
    Array(Array),
}

impl Operand {
    fn describe(&self) -> String {
        match self {
            Self::Function(function) => function.name(),
            Self::Array(_) => "array".to_owned(),
        }
    }

    fn into_function(self, op: &str, position: &str) -> Result<Operation, Error> {
        match self {
            Self::Function(function) => Ok(function),
            Self::Array(_) => {
                let message = format!("{position} of `{op}` must be a function");
                Err(Error::syntax(message))
            }
        }
    }
}

/// Returns the implementation of a primitive function.
pub(crate) fn primitive(primitive: Primitive) -> Result<Operation, Error> {
    Ok(match primitive {
        Primitive::Plus => Operation::native(Pervasive(Plus)),
        Primitive::Minus => Operation::native(Pervasive(Minus)),
        Primitive::Times => Operation::native(Pervasive(Times)),
        Primitive::Divide => Operation::native(Pervasive(Divide)),
        Primitive::Star => Operation::native(Pervasive(Star)),
        Primitive::Log => Operation::native(Pervasive(Log)),
        Primitive::Stile => Operation::native(Pervasive(Stile)),
        Primitive::Downstile => Operation::native(Pervasive(Downstile)),
        Primitive::Upstile => Operation::native(Pervasive(Upstile)),
        Primitive::Exclamation => Operation::native(Pervasive(Exclamation)),
        Primitive::Circle => Operation::native(Pervasive(Circle)),
        Primitive::Tilde => Operation::native(Tilde),
        Primitive::Equal => Operation::native(Pervasive(Equal)),
        Primitive::NotEqual => Operation::native(Pervasive(NotEqual)),
        Primitive::Less => Operation::native(Pervasive(Less)),
        Primitive::LessOrEqual => Operation::native(Pervasive(LessOrEqual)),
        Primitive::GreaterOrEqual => Operation::native(Pervasive(GreaterOrEqual)),
        Primitive::Greater => Operation::native(Pervasive(Greater)),
        Primitive::And => Operation::native(Pervasive(And)),
        Primitive::Or => Operation::native(Pervasive(Or)),
        Primitive::Nand => Operation::native(Pervasive(Nand)),
        Primitive::Nor => Operation::native(Pervasive(Nor)),
        Primitive::Rho => Operation::native(Rho),
        Primitive::Iota => Operation::native(Iota),
        Primitive::CircleStile => Operation::native(Reverse::LAST),
        Primitive::CircleBar => Operation::native(Reverse::FIRST),
        Primitive::ArrowUp => Operation::native(Take),
        Primitive::ArrowDown => Operation::native(Drop),
        Primitive::Comma => Operation::native(Catenate::LAST),
        Primitive::CommaBar => Operation::native(Catenate::FIRST),
        Primitive::LeftShoe => Operation::native(Enclose),
        Primitive::RightShoe => Operation::native(First),
        Primitive::Equiv => Operation::native(Depth),
        Primitive::NotEquiv => Operation::native(Tally),
        Primitive::Transpose => Operation::native(Transpose),
        Primitive::RightTack => Operation::native(Right),
        Primitive::LeftTack => Operation::native(Left),
        Primitive::Epsilon => Operation::native(Enlist),
        Primitive::GradeUp => Operation::native(Grade::UP),
        Primitive::GradeDown => Operation::native(Grade::DOWN),
        Primitive::UpShoe => Operation::native(Union),
        Primitive::DownShoe => Operation::native(Intersection),
        Primitive::Replicate => Operation::native(Replicate::LAST),
        Primitive::ReplicateFirst => Operation::native(Replicate::FIRST),
        other => return Err(Error::not_implemented(&format!("Function `{other}`"))),
    })
}

/// Derives a function from a monadic operator and its operand.
pub(crate) fn derive_monadic(op: MonadicOp, operand: Operand) -> Result<Operation, Error> {
    log::trace!("Deriving function from `{op}` with operand {}", operand.describe());

    let op_str = op.as_str();
    Ok(match op {
        MonadicOp::Commute => Operation::native(Commute::new(operand)),
        MonadicOp::Reduce => {
            Operation::native(Reduce::last(operand.into_function(op_str, "Operand")?))
        }
        MonadicOp::ReduceFirst => {
            Operation::native(Reduce::first(operand.into_function(op_str, "Operand")?))
        }
        MonadicOp::Scan => Operation::native(Scan::last(operand.into_function(op_str, "Operand")?)),
        MonadicOp::ScanFirst => {
            Operation::native(Scan::first(operand.into_function(op_str, "Operand")?))
        }
        MonadicOp::Each => Operation::native(Each(operand.into_function(op_str, "Operand")?)),
        MonadicOp::OuterProduct => {
            Operation::native(OuterProduct(operand.into_function(op_str, "Operand")?))
        }
        other => return Err(Error::not_implemented(&format!("Operator `{other}`"))),
    })
}

/// Derives a function from a dyadic operator and its operands.
pub(crate) fn derive_dyadic(
    op: DyadicOp,
    left: Operand,
    right: Operand,
) -> Result<Operation, Error> {
    log::trace!(
        "Deriving function from `{op}` with operands {} and {}",
        left.describe(),
        right.describe()
    );

    let op_str = op.glyph().to_string();
    Ok(match op {
        DyadicOp::Jot => Operation::native(Compose::new(left, right)?),
        DyadicOp::Atop => {
            let left = left.into_function(&op_str, "Left operand")?;
            let Operand::Function(right) = right else {
                return Err(Error::not_implemented("Rank operator `⍤` with an array operand"));
            };
            Operation::native(Atop(left, right))
        }
        DyadicOp::Over => Operation::native(Over(
            left.into_function(&op_str, "Left operand")?,
            right.into_function(&op_str, "Right operand")?,
        )),
        DyadicOp::Power => Operation::native(Power::new(
            left.into_function(&op_str, "Left operand")?,
            right,
        )?),
        DyadicOp::InnerProduct => Operation::native(InnerProduct(
            left.into_function(&op_str, "Left operand")?,
            right.into_function(&op_str, "Right operand")?,
        )),
        other => return Err(Error::not_implemented(&format!("Operator `{other}`"))),
    })
}

/// Extracts a single integer from an array, which must be a scalar or a one-element vector.
pub(crate) fn integer_scalar(array: &Array, what: &str) -> Result<i64, Error> {
    if array.rank() > 1 || array.len() != 1 {
        let message = format!("{what} must be a scalar or a single-element vector");
        return Err(if array.rank() > 1 {
            Error::rank(message)
        } else {
            Error::length(message)
        });
    }
    integer(&array.data()[0], what)
}

/// Extracts integers from a scalar or a vector.
pub(crate) fn integer_vector(array: &Array, what: &str) -> Result<Vec<i64>, Error> {
    if array.rank() > 1 {
        return Err(Error::rank(format!("{what} must be a scalar or a vector")));
    }
    array.data().iter().map(|element| integer(element, what)).collect()
}

pub(crate) fn integer(element: &Element, what: &str) -> Result<i64, Error> {
    element
        .as_number()
        .and_then(numeric::to_integer)
        .ok_or_else(|| Error::domain(format!("{what} must contain only integers")))
}

/// Converts an integer into a non-negative size.
pub(crate) fn size(value: i64, what: &str) -> Result<usize, Error> {
    usize::try_from(value)
        .map_err(|_| Error::domain(format!("{what} must be non-negative, got {value}")))
}

pub(crate) fn boolean(element: &Element, what: &str) -> Result<bool, Error> {
    element
        .as_number()
        .and_then(numeric::to_boolean)
        .ok_or_else(|| Error::domain(format!("{what} must contain only 0 and 1")))
}

/// Converts a size into an array element.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn size_element(value: usize) -> Element {
    Element::from(value as f64)
}

/// Converts a 0-based position into an element honoring the index origin.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn index_element(position: usize, index_origin: i64) -> Element {
    Element::from(position as f64 + index_origin as f64)
}
