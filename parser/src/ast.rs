//! Abstract syntax tree.
//!
//! The tree distinguishes between nodes producing arrays ([`Expr`]) and nodes producing
//! functions ([`FnExpr`]); an operator operand may be either ([`Operand`]). All nodes own
//! their children and carry a [`Location`] in the code, so that the tree can outlive
//! the parsed snippet.

use num_complex::Complex64;

use crate::{
    alloc::{Box, Rc, String, Vec},
    DyadicOp, Location, MonadicOp, Primitive,
};

/// Array-producing expression with its location.
pub type SpannedExpr = Location<Expr>;
/// Function-producing expression with its location.
pub type SpannedFnExpr = Location<FnExpr>;

/// Array-producing expression.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Expr {
    /// Numeric literal.
    Number(Complex64),
    /// Character literal. A literal with a single char is a scalar, any other
    /// literal is a vector.
    String(String),
    /// Juxtaposition of several items, e.g., `1 (2 3) x`.
    Vector(Vec<SpannedExpr>),
    /// Reference to a variable.
    Variable(String),
    /// Reference to a system variable, e.g., `⎕IO`.
    SystemVariable(String),
    /// Left argument of the enclosing dfn.
    Alpha,
    /// Right argument of the enclosing dfn.
    Omega,
    /// Monadic function application: `f ⍵`.
    Monadic {
        /// Applied function.
        function: Box<SpannedFnExpr>,
        /// Right argument.
        omega: Box<SpannedExpr>,
    },
    /// Dyadic function application: `⍺ f ⍵`.
    Dyadic {
        /// Applied function.
        function: Box<SpannedFnExpr>,
        /// Left argument.
        alpha: Box<SpannedExpr>,
        /// Right argument.
        omega: Box<SpannedExpr>,
    },
    /// Assignment of an array to a name: `x ← value`. The name can be a system variable
    /// or `⍺` (a default left argument).
    Assignment {
        /// Assigned name.
        name: Location<Name>,
        /// Assigned value.
        value: Box<SpannedExpr>,
    },
    /// Output of a value: `⎕ ← value`.
    Output(Box<SpannedExpr>),
    /// Guard: `condition : then`. If the condition is false, the remaining statements
    /// of the enclosing statement list are executed.
    Conditional {
        /// Condition; must evaluate to a Boolean scalar.
        condition: Box<SpannedExpr>,
        /// Expression evaluated if the condition holds.
        then: Box<SpannedExpr>,
        /// Statements executed otherwise.
        otherwise: Block,
    },
    /// Bracket indexing: `array[i;j]`. Elided indices select the entire axis.
    Index {
        /// Indexed array.
        array: Box<SpannedExpr>,
        /// Indices for each axis.
        indices: Vec<Option<SpannedExpr>>,
    },
}

/// Assignment target.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Name {
    /// User-defined name.
    User(String),
    /// System variable such as `⎕IO`.
    System(String),
    /// Default left argument of a dfn.
    Alpha,
}

/// Function-producing expression.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FnExpr {
    /// Primitive function, e.g., `+`.
    Primitive(Primitive),
    /// Reference to a named function.
    Variable(String),
    /// Reference to the running dfn (`∇`).
    Recursion,
    /// Dfn (`{...}`).
    Dfn(Rc<Block>),
    /// Function derived by a monadic operator, e.g., `+/`.
    MonadicOperator {
        /// Applied operator.
        op: MonadicOp,
        /// Operand of the operator.
        operand: Box<Operand>,
    },
    /// Function derived by a dyadic operator, e.g., `+.×`.
    DyadicOperator {
        /// Applied operator.
        op: DyadicOp,
        /// Left operand.
        left: Box<Operand>,
        /// Right operand.
        right: Box<Operand>,
    },
    /// Assignment of a function to a name: `f ← {...}`.
    Assignment {
        /// Assigned name.
        name: Location<String>,
        /// Assigned function.
        function: Box<SpannedFnExpr>,
    },
}

/// Operand of an operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Function operand.
    Function(SpannedFnExpr),
    /// Array operand, e.g., the repetition count in `f⍣3`.
    Array(SpannedExpr),
}

impl Operand {
    /// Returns the location of this operand.
    pub fn location(&self) -> Location {
        match self {
            Self::Function(function) => function.with_no_extra(),
            Self::Array(array) => array.with_no_extra(),
        }
    }
}

/// Statement in a statement list.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Statement {
    /// Array-producing statement.
    Expr(SpannedExpr),
    /// Function-producing statement, e.g., a function assignment.
    Function(SpannedFnExpr),
}

impl Statement {
    /// Returns the location of this statement.
    pub fn location(&self) -> Location {
        match self {
            Self::Expr(expr) => expr.with_no_extra(),
            Self::Function(function) => function.with_no_extra(),
        }
    }
}

/// Sequence of statements: either a program, or a dfn body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    /// Statements in the order of execution.
    pub statements: Vec<Statement>,
}

impl Block {
    /// Checks whether this block has no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
