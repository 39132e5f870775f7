//! Tokenizer turning code into a sequence of [`Token`]s.

use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while, take_while1},
    character::complete::{anychar, digit0, digit1, one_of, satisfy},
    combinator::{cut, map_opt, opt, recognize, value},
    error::{context, ContextError, ErrorKind as NomErrorKind, ParseError},
    multi::many0_count,
    sequence::{pair, preceded, terminated, tuple},
};

use crate::{
    alloc::{format, Vec},
    glyphs::{self, TokenKind, BLANK, LAMP, OVERBAR, QUAD, QUOTE},
    spans::with_span,
    Error, InputSpan, Location, Spanned,
};


/// Token together with its location in the code.
pub type Token<'a> = Spanned<'a, TokenKind>;

impl<'a> Token<'a> {
    /// Returns the textual content of this token, or `None` for tokens whose kind is sufficient
    /// to describe them. For character literals, the enclosing quotes are stripped.
    pub fn content(&self) -> Option<&'a str> {
        let fragment = *self.fragment();
        match self.extra {
            TokenKind::Number | TokenKind::Identifier | TokenKind::SystemName => Some(fragment),
            TokenKind::String => Some(&fragment[1..fragment.len() - 1]),
            _ => None,
        }
    }
}

/// Parsing outcome of a single tokenizer rule.
pub(crate) type NomResult<'a, T> = nom::IResult<InputSpan<'a>, T, TokenError<'a>>;

/// Error produced by tokenizer rules.
#[derive(Debug)]
pub(crate) struct TokenError<'a> {
    span: InputSpan<'a>,
    context: Option<&'static str>,
}

impl<'a> ParseError<InputSpan<'a>> for TokenError<'a> {
    fn from_error_kind(span: InputSpan<'a>, _kind: NomErrorKind) -> Self {
        Self {
            span,
            context: None,
        }
    }

    fn append(_: InputSpan<'a>, _: NomErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> ContextError<InputSpan<'a>> for TokenError<'a> {
    fn add_context(_input: InputSpan<'a>, ctx: &'static str, mut other: Self) -> Self {
        other.context.get_or_insert(ctx);
        other
    }
}

impl TokenError<'_> {
    fn into_error(self) -> Error {
        let len = self.span.fragment().chars().next().map_or(0, char::len_utf8);
        let location = Location::new(
            self.span.location_offset(),
            self.span.location_line(),
            self.span.get_utf8_column(),
            len,
        );
        let message = match self.context {
            Some(context) => context.into(),
            None => match self.span.fragment().chars().next() {
                Some(c) => format!("Unexpected character `{c}`"),
                None => "Unexpected end of input".into(),
            },
        };
        Error::syntax(message).with_location(location)
    }
}

fn skip_blanks(input: InputSpan<'_>) -> NomResult<'_, ()> {
    let blank = take_while1(|c| BLANK.matches(c));
    let comment = recognize(pair(
        satisfy(|c| LAMP.matches(c)),
        take_while(|c| c != '\n'),
    ));
    value((), many0_count(alt((blank, comment))))(input)
}

fn overbar(input: InputSpan<'_>) -> NomResult<'_, char> {
    satisfy(|c| OVERBAR.matches(c))(input)
}

/// Real number: `¯?(digits(.digits?)?|.digits)(E¯?digits)?`.
fn real(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    let mantissa = alt((
        recognize(pair(digit1, opt(pair(satisfy(|c| c == '.'), digit0)))),
        recognize(pair(satisfy(|c| c == '.'), digit1)),
    ));
    let exponent = preceded(
        one_of("Ee"),
        context(
            "Exponent marker must be followed by digits",
            cut(recognize(pair(opt(overbar), digit1))),
        ),
    );
    recognize(tuple((opt(overbar), mantissa, opt(exponent))))(input)
}

fn number(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    let imaginary = preceded(
        one_of("Jj"),
        context(
            "Imaginary marker must be followed by a real number",
            cut(real),
        ),
    );
    recognize(pair(real, opt(imaginary)))(input)
}

fn quote(input: InputSpan<'_>) -> NomResult<'_, char> {
    satisfy(|c| QUOTE.matches(c))(input)
}

fn string(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    recognize(preceded(
        quote,
        context(
            "Unterminated character literal",
            cut(terminated(take_till(|c| QUOTE.matches(c)), quote)),
        ),
    ))(input)
}

fn system_name(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    recognize(pair(
        satisfy(|c| QUAD.matches(c)),
        take_while1(|c: char| c.is_alphabetic()),
    ))(input)
}

fn identifier(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    recognize(pair(
        satisfy(glyphs::is_identifier_start),
        take_while(glyphs::is_identifier_char),
    ))(input)
}

fn token(input: InputSpan<'_>) -> NomResult<'_, Token<'_>> {
    alt((
        with_span(value(TokenKind::Number, number)),
        with_span(value(TokenKind::String, string)),
        with_span(value(TokenKind::SystemName, system_name)),
        with_span(value(TokenKind::Quad, satisfy(|c| QUAD.matches(c)))),
        with_span(value(TokenKind::Identifier, identifier)),
        with_span(map_opt(anychar, glyphs::glyph_kind)),
    ))(input)
}

/// Splits `code` into tokens.
///
/// # Errors
///
/// Returns a [`SyntaxError`](crate::ErrorKind::Syntax) for an unterminated character literal,
/// an exponent or imaginary marker not followed by digits, or a character outside
/// of the language alphabet.
pub fn tokenize(code: &str) -> Result<Vec<Token<'_>>, Error> {
    let mut input = InputSpan::new(code);
    let mut tokens = Vec::new();
    loop {
        let (rest, ()) = skip_blanks(input).map_err(convert_error)?;
        if rest.fragment().is_empty() {
            break;
        }
        let (rest, token) = token(rest).map_err(convert_error)?;
        tokens.push(token);
        input = rest;
    }
    log::trace!("Split {} bytes of code into {} tokens", code.len(), tokens.len());
    Ok(tokens)
}

fn convert_error(err: nom::Err<TokenError<'_>>) -> Error {
    match err {
        nom::Err::Error(err) | nom::Err::Failure(err) => err.into_error(),
        nom::Err::Incomplete(_) => Error::internal("Tokenizer requested more input"),
    }
}
