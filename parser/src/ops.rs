//! Primitive functions and operators.

use core::fmt;

/// Primitive function denoted by a single glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Primitive {
    /// Conjugate / addition (`+`).
    Plus,
    /// Negation / subtraction (`-`).
    Minus,
    /// Direction / multiplication (`×`).
    Times,
    /// Reciprocal / division (`÷`).
    Divide,
    /// Exponential / power (`*`).
    Star,
    /// Natural logarithm / logarithm (`⍟`).
    Log,
    /// Magnitude / residue (`|`).
    Stile,
    /// Floor / minimum (`⌊`).
    Downstile,
    /// Ceiling / maximum (`⌈`).
    Upstile,
    /// Factorial / binomial (`!`).
    Exclamation,
    /// Pi times / circular functions (`○`).
    Circle,
    /// Not / without (`~`).
    Tilde,
    /// Equality (`=`).
    Equal,
    /// Non-equality (`≠`).
    NotEqual,
    /// Less than (`<`).
    Less,
    /// Less than or equal (`≤`).
    LessOrEqual,
    /// Greater than or equal (`≥`).
    GreaterOrEqual,
    /// Greater than (`>`).
    Greater,
    /// Boolean AND / least common multiple (`∧`).
    And,
    /// Boolean OR / greatest common divisor (`∨`).
    Or,
    /// Boolean NAND (`⍲`).
    Nand,
    /// Boolean NOR (`⍱`).
    Nor,
    /// Shape / reshape (`⍴`).
    Rho,
    /// Index generator / index of (`⍳`).
    Iota,
    /// Reverse / rotate along the last axis (`⌽`).
    CircleStile,
    /// Reverse / rotate along the first axis (`⊖`).
    CircleBar,
    /// Mix / take (`↑`).
    ArrowUp,
    /// Split / drop (`↓`).
    ArrowDown,
    /// Ravel / catenate along the last axis (`,`).
    Comma,
    /// Table / catenate along the first axis (`⍪`).
    CommaBar,
    /// Enclose / partitioned enclose (`⊂`).
    LeftShoe,
    /// First / pick (`⊃`).
    RightShoe,
    /// Depth / match (`≡`).
    Equiv,
    /// Tally / not match (`≢`).
    NotEquiv,
    /// Transpose (`⍉`).
    Transpose,
    /// Identity / right argument (`⊢`).
    RightTack,
    /// Identity / left argument (`⊣`).
    LeftTack,
    /// Enlist / membership (`∊`).
    Epsilon,
    /// Grade up (`⍋`).
    GradeUp,
    /// Grade down (`⍒`).
    GradeDown,
    /// Unique / union (`∪`).
    UpShoe,
    /// Intersection (`∩`).
    DownShoe,
    /// Replication along the last axis (`/` with an array on the left).
    Replicate,
    /// Replication along the first axis (`⌿` with an array on the left).
    ReplicateFirst,
}

impl Primitive {
    /// Returns the glyph of this function.
    pub fn glyph(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Times => '×',
            Self::Divide => '÷',
            Self::Star => '*',
            Self::Log => '⍟',
            Self::Stile => '|',
            Self::Downstile => '⌊',
            Self::Upstile => '⌈',
            Self::Exclamation => '!',
            Self::Circle => '○',
            Self::Tilde => '~',
            Self::Equal => '=',
            Self::NotEqual => '≠',
            Self::Less => '<',
            Self::LessOrEqual => '≤',
            Self::GreaterOrEqual => '≥',
            Self::Greater => '>',
            Self::And => '∧',
            Self::Or => '∨',
            Self::Nand => '⍲',
            Self::Nor => '⍱',
            Self::Rho => '⍴',
            Self::Iota => '⍳',
            Self::CircleStile => '⌽',
            Self::CircleBar => '⊖',
            Self::ArrowUp => '↑',
            Self::ArrowDown => '↓',
            Self::Comma => ',',
            Self::CommaBar => '⍪',
            Self::LeftShoe => '⊂',
            Self::RightShoe => '⊃',
            Self::Equiv => '≡',
            Self::NotEquiv => '≢',
            Self::Transpose => '⍉',
            Self::RightTack => '⊢',
            Self::LeftTack => '⊣',
            Self::Epsilon => '∊',
            Self::GradeUp => '⍋',
            Self::GradeDown => '⍒',
            Self::UpShoe => '∪',
            Self::DownShoe => '∩',
            Self::Replicate => '/',
            Self::ReplicateFirst => '⌿',
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.glyph())
    }
}

/// Operator taking a single (left) operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MonadicOp {
    /// Commute / selfie (`⍨`).
    Commute,
    /// Reduction along the last axis (`/`).
    Reduce,
    /// Reduction along the first axis (`⌿`).
    ReduceFirst,
    /// Scan along the last axis (`\`).
    Scan,
    /// Scan along the first axis (`⍀`).
    ScanFirst,
    /// Each (`¨`).
    Each,
    /// Outer product (`∘.`); its operand is written to the right of the operator.
    OuterProduct,
}

impl MonadicOp {
    /// Returns the textual representation of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Commute => "⍨",
            Self::Reduce => "/",
            Self::ReduceFirst => "⌿",
            Self::Scan => "\\",
            Self::ScanFirst => "⍀",
            Self::Each => "¨",
            Self::OuterProduct => "∘.",
        }
    }
}

impl fmt::Display for MonadicOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Operator taking two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DyadicOp {
    /// Composition / binding (`∘`).
    Jot,
    /// Atop (`⍤`).
    Atop,
    /// Over (`⍥`).
    Over,
    /// Power (`⍣`).
    Power,
    /// Inner product (`.`).
    InnerProduct,
}

impl DyadicOp {
    /// Returns the glyph of this operator.
    pub fn glyph(self) -> char {
        match self {
            Self::Jot => '∘',
            Self::Atop => '⍤',
            Self::Over => '⍥',
            Self::Power => '⍣',
            Self::InnerProduct => '.',
        }
    }
}

impl fmt::Display for DyadicOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.glyph())
    }
}
