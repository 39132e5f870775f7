//! Types related to spanning parsed code.

/// Code span as consumed by the tokenizer.
pub type InputSpan<'a> = nom_locate::LocatedSpan<&'a str, ()>;

/// Code span together with information related to where it is located in the code.
///
/// This type is similar to one from the [`nom_locate`] crate, but it has slightly different
/// functionality. In particular, this type provides no method to access other parts of the code
/// (which is performed in `nom_locate`'s `LocatedSpan::get_column()` among other methods).
/// As such, this allows to safely replace [span info](#method.fragment) without worrying
/// about undefined behavior.
///
/// [`nom_locate`]: https://crates.io/crates/nom_locate
#[derive(Debug, Clone, Copy)]
pub struct LocatedSpan<Span, T = ()> {
    offset: usize,
    line: u32,
    column: usize,
    fragment: Span,

    /// Extra information that can be embedded by the user.
    pub extra: T,
}

impl<Span: PartialEq, T> PartialEq for LocatedSpan<Span, T> {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line && self.offset == other.offset && self.fragment == other.fragment
    }
}

impl<Span, T> LocatedSpan<Span, T> {
    /// The offset represents the position of the fragment relatively to the input of the parser.
    /// It starts at offset 0 and is measured in bytes.
    pub fn location_offset(&self) -> usize {
        self.offset
    }

    /// The line number of the fragment relatively to the input of the parser. It starts at line 1.
    pub fn location_line(&self) -> u32 {
        self.line
    }

    /// The column of the fragment start, counted in chars. It starts at column 1.
    pub fn get_column(&self) -> usize {
        self.column
    }

    /// The fragment that is spanned.
    pub fn fragment(&self) -> &Span {
        &self.fragment
    }

    /// Shifts this span by the specified number of bytes and lines. Used when a snippet
    /// is a part of a larger file, or is placed into a map of several snippets.
    #[must_use]
    pub fn shifted(self, offset: usize, lines: u32) -> Self {
        Self {
            offset: self.offset + offset,
            line: self.line + lines,
            ..self
        }
    }

    /// Maps the `extra` field of this span using the provided closure.
    pub fn map_extra<U>(self, map_fn: impl FnOnce(T) -> U) -> LocatedSpan<Span, U> {
        LocatedSpan {
            offset: self.offset,
            line: self.line,
            column: self.column,
            fragment: self.fragment,
            extra: map_fn(self.extra),
        }
    }
}

impl<Span: Copy, T> LocatedSpan<Span, T> {
    /// Copies this span with the provided `extra` field.
    pub fn copy_with_extra<U>(&self, value: U) -> LocatedSpan<Span, U> {
        LocatedSpan {
            offset: self.offset,
            line: self.line,
            column: self.column,
            fragment: self.fragment,
            extra: value,
        }
    }

    /// Removes `extra` field from this span.
    pub fn with_no_extra(&self) -> LocatedSpan<Span> {
        self.copy_with_extra(())
    }
}

/// Value with an associated code span.
pub type Spanned<'a, T = ()> = LocatedSpan<&'a str, T>;

impl<'a, T> Spanned<'a, T> {
    pub(crate) fn new(span: InputSpan<'a>, extra: T) -> Self {
        Self {
            offset: span.location_offset(),
            line: span.location_line(),
            column: span.get_utf8_column(),
            fragment: *span.fragment(),
            extra,
        }
    }

    /// Strips the code fragment from this span, retaining only its length.
    pub fn to_location(&self) -> Location {
        Location {
            offset: self.offset,
            line: self.line,
            column: self.column,
            fragment: self.fragment.len(),
            extra: (),
        }
    }
}

/// Code location: a span with the code fragment stripped to its length in bytes.
///
/// Unlike [`Spanned`], locations are not bound by the code lifetime, which allows to keep them
/// in the AST and in errors that outlive the parsed snippet.
pub type Location<T = ()> = LocatedSpan<usize, T>;

impl Location {
    /// Creates a location spanning `len` bytes at the specified position. This is mostly useful
    /// for testing.
    pub fn new(offset: usize, line: u32, column: usize, len: usize) -> Self {
        Self {
            offset,
            line,
            column,
            fragment: len,
            extra: (),
        }
    }

    /// Creates a location that covers both `self` and `other`. `other` is expected to be located
    /// after `self` in the code.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let end = (other.offset + other.fragment).max(self.offset + self.fragment);
        Self {
            offset: self.offset,
            line: self.line,
            column: self.column,
            fragment: end - self.offset,
            extra: (),
        }
    }

    /// Returns the byte range of this location within the code.
    pub fn range(&self) -> core::ops::Range<usize> {
        self.offset..(self.offset + self.fragment)
    }
}

impl<T> Location<T> {
    /// Returns the code fragment covered by this location.
    pub fn code<'a>(&self, code: &'a str) -> Option<&'a str> {
        code.get(self.offset..(self.offset + self.fragment))
    }
}

impl<'a, T> From<&Spanned<'a, T>> for Location {
    fn from(span: &Spanned<'a, T>) -> Self {
        span.to_location()
    }
}

/// Wrapper around parsers allowing to capture both their output and the relevant span.
pub(crate) fn with_span<'a, O>(
    mut parser: impl FnMut(InputSpan<'a>) -> crate::tokenizer::NomResult<'a, O>,
) -> impl FnMut(InputSpan<'a>) -> crate::tokenizer::NomResult<'a, Spanned<'a, O>> {
    move |input: InputSpan<'a>| {
        parser(input).map(|(rest, output)| {
            let len = rest.location_offset() - input.location_offset();
            let spanned = Spanned {
                offset: input.location_offset(),
                line: input.location_line(),
                column: input.get_utf8_column(),
                fragment: &input.fragment()[..len],
                extra: output,
            };
            (rest, spanned)
        })
    }
}
