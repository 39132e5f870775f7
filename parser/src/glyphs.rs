//! Alphabet of the language: glyphs and the kinds of tokens they produce.

use core::fmt;

use crate::{DyadicOp, MonadicOp, Primitive};

/// Character of the language alphabet. A character may have several acceptable spellings
/// (e.g., Greek letters in place of APL glyphs); two characters are equal if any spelling
/// of one matches any spelling of the other.
#[derive(Debug, Clone, Copy)]
pub struct Char {
    spellings: &'static [char],
}

impl Char {
    const fn new(spellings: &'static [char]) -> Self {
        Self { spellings }
    }

    /// Returns the canonical spelling of this character.
    pub fn canonical(&self) -> char {
        self.spellings[0]
    }

    /// Checks whether `c` is one of the spellings of this character.
    pub fn matches(&self, c: char) -> bool {
        self.spellings.contains(&c)
    }
}

impl PartialEq for Char {
    fn eq(&self, other: &Self) -> bool {
        self.spellings.iter().any(|&c| other.matches(c))
    }
}

impl fmt::Display for Char {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.canonical())
    }
}

/// Blank separating tokens.
pub const BLANK: Char = Char::new(&[' ', '\t', '\r']);
/// Start of a comment spanning until the end of the line.
pub const LAMP: Char = Char::new(&['⍝']);
/// Negation sign of numeric literals.
pub const OVERBAR: Char = Char::new(&['¯']);
/// Quote delimiting character literals.
pub const QUOTE: Char = Char::new(&['\'']);
/// Prefix of system names.
pub const QUAD: Char = Char::new(&['⎕']);
/// Statement separator.
pub const DIAMOND: Char = Char::new(&['⋄', '◊']);

/// Kind of a token produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TokenKind {
    /// Numeric literal; its content is converted into a number by the parser.
    Number,
    /// Quoted character literal.
    String,
    /// Identifier. Whether it names a variable or a function is decided during parsing.
    Identifier,
    /// System name such as `⎕IO`.
    SystemName,
    /// Bare quad (`⎕`).
    Quad,
    /// Left argument of a dfn (`⍺`).
    Alpha,
    /// Right argument of a dfn (`⍵`).
    Omega,
    /// Reference to the running dfn (`∇`).
    Del,
    /// Primitive function.
    Function(Primitive),
    /// Monadic operator.
    MonadicOperator(MonadicOp),
    /// Dyadic operator.
    DyadicOperator(DyadicOp),
    /// Assignment arrow (`←`).
    Assign,
    /// Statement separator: a diamond or a line break.
    Separator,
    /// Guard colon (`:`).
    Colon,
    /// Separator of bracket indices (`;`).
    Semicolon,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
}

impl TokenKind {
    /// Checks whether this token opens a bracketed group.
    pub fn is_opening(self) -> bool {
        matches!(self, Self::LeftParen | Self::LeftBrace | Self::LeftBracket)
    }

    /// Checks whether this token closes a bracketed group.
    pub fn is_closing(self) -> bool {
        matches!(self, Self::RightParen | Self::RightBrace | Self::RightBracket)
    }

    /// Returns the closing counterpart for an opening token.
    pub fn closing(self) -> Option<Self> {
        match self {
            Self::LeftParen => Some(Self::RightParen),
            Self::LeftBrace => Some(Self::RightBrace),
            Self::LeftBracket => Some(Self::RightBracket),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => formatter.write_str("number"),
            Self::String => formatter.write_str("character literal"),
            Self::Identifier => formatter.write_str("identifier"),
            Self::SystemName => formatter.write_str("system name"),
            Self::Quad => formatter.write_str("`⎕`"),
            Self::Alpha => formatter.write_str("`⍺`"),
            Self::Omega => formatter.write_str("`⍵`"),
            Self::Del => formatter.write_str("`∇`"),
            Self::Function(function) => write!(formatter, "function `{function}`"),
            Self::MonadicOperator(op) => write!(formatter, "operator `{op}`"),
            Self::DyadicOperator(op) => write!(formatter, "operator `{op}`"),
            Self::Assign => formatter.write_str("`←`"),
            Self::Separator => formatter.write_str("statement separator"),
            Self::Colon => formatter.write_str("`:`"),
            Self::Semicolon => formatter.write_str("`;`"),
            Self::LeftParen => formatter.write_str("`(`"),
            Self::RightParen => formatter.write_str("`)`"),
            Self::LeftBrace => formatter.write_str("`{`"),
            Self::RightBrace => formatter.write_str("`}`"),
            Self::LeftBracket => formatter.write_str("`[`"),
            Self::RightBracket => formatter.write_str("`]`"),
        }
    }
}

const GLYPHS: &[(Char, TokenKind)] = &[
    (Char::new(&['+']), TokenKind::Function(Primitive::Plus)),
    (Char::new(&['-', '−']), TokenKind::Function(Primitive::Minus)),
    (Char::new(&['×']), TokenKind::Function(Primitive::Times)),
    (Char::new(&['÷']), TokenKind::Function(Primitive::Divide)),
    (Char::new(&['*', '⋆']), TokenKind::Function(Primitive::Star)),
    (Char::new(&['⍟']), TokenKind::Function(Primitive::Log)),
    (Char::new(&['|', '∣']), TokenKind::Function(Primitive::Stile)),
    (Char::new(&['⌊']), TokenKind::Function(Primitive::Downstile)),
    (Char::new(&['⌈']), TokenKind::Function(Primitive::Upstile)),
    (Char::new(&['!']), TokenKind::Function(Primitive::Exclamation)),
    (Char::new(&['○']), TokenKind::Function(Primitive::Circle)),
    (Char::new(&['~', '∼']), TokenKind::Function(Primitive::Tilde)),
    (Char::new(&['=']), TokenKind::Function(Primitive::Equal)),
    (Char::new(&['≠']), TokenKind::Function(Primitive::NotEqual)),
    (Char::new(&['<']), TokenKind::Function(Primitive::Less)),
    (Char::new(&['≤']), TokenKind::Function(Primitive::LessOrEqual)),
    (Char::new(&['≥']), TokenKind::Function(Primitive::GreaterOrEqual)),
    (Char::new(&['>']), TokenKind::Function(Primitive::Greater)),
    (Char::new(&['∧', '^']), TokenKind::Function(Primitive::And)),
    (Char::new(&['∨']), TokenKind::Function(Primitive::Or)),
    (Char::new(&['⍲']), TokenKind::Function(Primitive::Nand)),
    (Char::new(&['⍱']), TokenKind::Function(Primitive::Nor)),
    (Char::new(&['⍴', 'ρ']), TokenKind::Function(Primitive::Rho)),
    (Char::new(&['⍳', 'ι']), TokenKind::Function(Primitive::Iota)),
    (Char::new(&['⌽']), TokenKind::Function(Primitive::CircleStile)),
    (Char::new(&['⊖']), TokenKind::Function(Primitive::CircleBar)),
    (Char::new(&['↑']), TokenKind::Function(Primitive::ArrowUp)),
    (Char::new(&['↓']), TokenKind::Function(Primitive::ArrowDown)),
    (Char::new(&[',']), TokenKind::Function(Primitive::Comma)),
    (Char::new(&['⍪']), TokenKind::Function(Primitive::CommaBar)),
    (Char::new(&['⊂']), TokenKind::Function(Primitive::LeftShoe)),
    (Char::new(&['⊃']), TokenKind::Function(Primitive::RightShoe)),
    (Char::new(&['≡']), TokenKind::Function(Primitive::Equiv)),
    (Char::new(&['≢']), TokenKind::Function(Primitive::NotEquiv)),
    (Char::new(&['⍉']), TokenKind::Function(Primitive::Transpose)),
    (Char::new(&['⊢']), TokenKind::Function(Primitive::RightTack)),
    (Char::new(&['⊣']), TokenKind::Function(Primitive::LeftTack)),
    (Char::new(&['∊', 'ε', '∈']), TokenKind::Function(Primitive::Epsilon)),
    (Char::new(&['⍋']), TokenKind::Function(Primitive::GradeUp)),
    (Char::new(&['⍒']), TokenKind::Function(Primitive::GradeDown)),
    (Char::new(&['∪']), TokenKind::Function(Primitive::UpShoe)),
    (Char::new(&['∩']), TokenKind::Function(Primitive::DownShoe)),
    (Char::new(&['⍨']), TokenKind::MonadicOperator(MonadicOp::Commute)),
    (Char::new(&['/']), TokenKind::MonadicOperator(MonadicOp::Reduce)),
    (Char::new(&['⌿']), TokenKind::MonadicOperator(MonadicOp::ReduceFirst)),
    (Char::new(&['\\']), TokenKind::MonadicOperator(MonadicOp::Scan)),
    (Char::new(&['⍀']), TokenKind::MonadicOperator(MonadicOp::ScanFirst)),
    (Char::new(&['¨']), TokenKind::MonadicOperator(MonadicOp::Each)),
    (Char::new(&['∘']), TokenKind::DyadicOperator(DyadicOp::Jot)),
    (Char::new(&['⍤']), TokenKind::DyadicOperator(DyadicOp::Atop)),
    (Char::new(&['⍥']), TokenKind::DyadicOperator(DyadicOp::Over)),
    (Char::new(&['⍣']), TokenKind::DyadicOperator(DyadicOp::Power)),
    (Char::new(&['.']), TokenKind::DyadicOperator(DyadicOp::InnerProduct)),
    (Char::new(&['⍺', 'α']), TokenKind::Alpha),
    (Char::new(&['⍵', 'ω']), TokenKind::Omega),
    (Char::new(&['∇']), TokenKind::Del),
    (Char::new(&['←']), TokenKind::Assign),
    (DIAMOND, TokenKind::Separator),
    (Char::new(&['\n']), TokenKind::Separator),
    (Char::new(&[':']), TokenKind::Colon),
    (Char::new(&[';']), TokenKind::Semicolon),
    (Char::new(&['(']), TokenKind::LeftParen),
    (Char::new(&[')']), TokenKind::RightParen),
    (Char::new(&['{']), TokenKind::LeftBrace),
    (Char::new(&['}']), TokenKind::RightBrace),
    (Char::new(&['[']), TokenKind::LeftBracket),
    (Char::new(&[']']), TokenKind::RightBracket),
];

/// Looks up the kind of a single-glyph token.
pub fn glyph_kind(c: char) -> Option<TokenKind> {
    GLYPHS
        .iter()
        .find_map(|(glyph, kind)| glyph.matches(c).then_some(*kind))
}

/// Checks whether `c` may start an identifier.
pub fn is_identifier_start(c: char) -> bool {
    (c.is_alphabetic() && !is_glyph_letter(c)) || c == '∆' || c == '⍙'
}

/// Checks whether `c` may continue an identifier.
pub fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit() || c == '_' || OVERBAR.matches(c)
}

// Greek spellings of glyphs are alphabetic, but they must not be swallowed by identifiers.
fn is_glyph_letter(c: char) -> bool {
    matches!(c, 'ρ' | 'ι' | 'α' | 'ω' | 'ε')
}
