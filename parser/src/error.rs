//! Error handling.

use core::fmt;

use crate::{
    alloc::{String, ToOwned},
    Location,
};

/// Kind of an [`Error`]. The taxonomy is flat: every failure in tokenizing, parsing
/// or evaluation is reported as exactly one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed code, or shapes that cannot be paired up by a pervasive function.
    Syntax,
    /// Reference to an unbound name, or a function that produced no value.
    Value,
    /// Argument outside of the function domain.
    Domain,
    /// Argument has an unsupported rank.
    Rank,
    /// Argument lengths do not conform.
    Length,
    /// Value exceeds a configured limit.
    Limit,
    /// Name is bound to an incompatible kind of referent.
    Definition,
    /// Implicit output could not be performed.
    Implicit,
    /// Broken interpreter invariant.
    Internal,
    /// Source file cannot be read.
    File,
    /// Construct is recognized, but not supported.
    NotImplemented,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Syntax => "SyntaxError",
            Self::Value => "ValueError",
            Self::Domain => "DomainError",
            Self::Rank => "RankError",
            Self::Length => "LengthError",
            Self::Limit => "LimitError",
            Self::Definition => "DefinitionError",
            Self::Implicit => "ImplicitError",
            Self::Internal => "InternalError",
            Self::File => "FileError",
            Self::NotImplemented => "NotImplemented",
        })
    }
}

/// Error with a human-readable message and an optional location in the code.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    location: Option<Location>,
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(
                formatter,
                "{}:{}: ",
                location.location_line(),
                location.get_column()
            )?;
        }
        write!(formatter, "{}: {}", self.kind, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Error {
    /// Creates an error with no location.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Creates a [`ErrorKind::Syntax`] error.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    /// Creates a [`ErrorKind::Value`] error.
    pub fn value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Value, message)
    }

    /// Creates a [`ErrorKind::Domain`] error.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Domain, message)
    }

    /// Creates a [`ErrorKind::Rank`] error.
    pub fn rank(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Rank, message)
    }

    /// Creates a [`ErrorKind::Length`] error.
    pub fn length(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Length, message)
    }

    /// Creates a [`ErrorKind::Limit`] error.
    pub fn limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Limit, message)
    }

    /// Creates a [`ErrorKind::Internal`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Creates a [`ErrorKind::NotImplemented`] error.
    pub fn not_implemented(construct: &str) -> Self {
        let mut message = construct.to_owned();
        message.push_str(" is not implemented");
        Self::new(ErrorKind::NotImplemented, message)
    }

    /// Sets the location of this error, overwriting the existing one.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Sets the location of this error unless it is already set. This is used to attribute
    /// errors raised deep within a call to the call site.
    #[must_use]
    pub fn or_location(mut self, location: Location) -> Self {
        self.location.get_or_insert(location);
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the location of the error in the code, if known.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}
