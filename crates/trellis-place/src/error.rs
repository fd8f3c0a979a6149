//! Error types for parsing descriptions and driving the engine.

use std::fmt;

use trellis_core::host::{ElementId, HostError};

/// What went wrong while reading a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A character outside the description alphabet.
    InvalidCharacter(char),
    /// A number that could not be read.
    InvalidNumber,
    /// A malformed `[...]` array.
    InvalidArray,
    /// A malformed `(...)` parameter list.
    InvalidParameters,
    /// A token that cannot appear at this position.
    UnexpectedToken(String),
    /// The description ended inside a division.
    UnexpectedEnd,
    /// A keyword is missing its `=value`.
    MissingValue(&'static str),
    /// A field name is already attached to a live division.
    RedefinedField,
    /// Two divisions share one name.
    DuplicateName,
    /// `width=` inside a vertical arrange, or `height=` inside a horizontal one.
    AxisContradiction,
    /// Two different division-type keywords on one division.
    InvalidKindCombination,
    /// `modify` named a division that does not exist.
    UnknownTarget,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::InvalidCharacter(c) => write!(f, "invalid character '{}'", c),
            ParseErrorKind::InvalidNumber => write!(f, "invalid number"),
            ParseErrorKind::InvalidArray => write!(f, "invalid array"),
            ParseErrorKind::InvalidParameters => write!(f, "invalid parameter list"),
            ParseErrorKind::UnexpectedToken(token) => write!(f, "unexpected {}", token),
            ParseErrorKind::UnexpectedEnd => write!(f, "unexpected end of description"),
            ParseErrorKind::MissingValue(keyword) => {
                write!(f, "'{}' requires a value", keyword)
            }
            ParseErrorKind::RedefinedField => write!(f, "redefined field name"),
            ParseErrorKind::DuplicateName => write!(f, "duplicate division name"),
            ParseErrorKind::AxisContradiction => {
                write!(f, "weight axis contradicts the arrange direction")
            }
            ParseErrorKind::InvalidKindCombination => {
                write!(f, "invalid division-type keyword combination")
            }
            ParseErrorKind::UnknownTarget => write!(f, "no division with this name"),
        }
    }
}

/// A positioned description error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Name of the division being read, when it had one.
    pub field: Option<String>,
    /// Byte offset into the description.
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self {
            kind,
            field: None,
            offset,
        }
    }

    pub fn with_field(mut self, field: Option<&str>) -> Self {
        if self.field.is_none() {
            self.field = field.map(str::to_string);
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(
                f,
                "{} in field '{}' at offset {}",
                self.kind, field, self.offset
            ),
            None => write!(f, "{} at offset {}", self.kind, self.offset),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors returned by [`crate::Place`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceError {
    /// The description (or a `modify` fragment) was rejected.
    Parse(ParseError),
    /// `bind` was called on an engine that already has a host.
    AlreadyBound,
    /// The operation needs a bound host.
    NotBound,
    /// The element is not a child of the bound host window.
    NotAChild(ElementId),
    /// No division with this name exists in the current tree.
    UnknownDivision(String),
    /// No dock registration with this name.
    UnknownDock(String),
    /// No dock registration owns a factory with this name.
    UnknownFactory(String),
    /// A host callback failed.
    Host(HostError),
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceError::Parse(e) => write!(f, "{}", e),
            PlaceError::AlreadyBound => write!(f, "place is already bound to a host"),
            PlaceError::NotBound => write!(f, "place is not bound to a host"),
            PlaceError::NotAChild(element) => {
                write!(f, "{} is not a child of the bound host", element)
            }
            PlaceError::UnknownDivision(name) => write!(f, "no division named '{}'", name),
            PlaceError::UnknownDock(name) => write!(f, "no dock named '{}'", name),
            PlaceError::UnknownFactory(name) => write!(f, "no pane factory named '{}'", name),
            PlaceError::Host(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PlaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlaceError::Parse(e) => Some(e),
            PlaceError::Host(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for PlaceError {
    fn from(e: ParseError) -> Self {
        PlaceError::Parse(e)
    }
}

impl From<HostError> for PlaceError {
    fn from(e: HostError) -> Self {
        PlaceError::Host(e)
    }
}

/// Result type for engine operations.
pub type PlaceResult<T> = Result<T, PlaceError>;
