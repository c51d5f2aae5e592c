/*!
Error types used in the library.

- Most of these are very unlikely to occur on well-formed input.
- Parse errors are expected to occur regularly, on malformed input, and carry
  enough position information to build a useful message.
- `UnsupportedConstruct` covers constructs the grammar accepts but the engine
  does not decide --- currently only inverse roles reaching a decision.

Names of the error enums --- for the most part --- overlap with corresponding
structs. As such, throughout the library `err::{self}` is often used to
prefix use of the types with `err::`.
*/

/// A union of varied error kinds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An error while parsing a formula.
    Parse(ParseError),

    /// The input parsed, but names a construct the engine does not decide.
    Unsupported(UnsupportedConstruct),

    /// A bound on some resource (typically a cache) was reached.
    ResourceExhaustion(ResourceError),
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

impl From<UnsupportedConstruct> for ErrorKind {
    fn from(e: UnsupportedConstruct) -> Self {
        ErrorKind::Unsupported(e)
    }
}

impl From<ResourceError> for ErrorKind {
    fn from(e: ResourceError) -> Self {
        ErrorKind::ResourceExhaustion(e)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Parse(e) => write!(f, "parse error: {e}"),
            ErrorKind::Unsupported(e) => write!(f, "unsupported construct: {e}"),
            ErrorKind::ResourceExhaustion(e) => write!(f, "resource exhausted: {e}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// An error while parsing a formula or role list.
///
/// The `usize` fields are byte offsets into the offending line, not the
/// overall input, as the parser works line-by-line (one formula per line,
/// matching the surface grammar).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Reached the end of the line while a token was still expected.
    UnexpectedEnd { offset: usize },

    /// A token was present, but not one the grammar allows at this point.
    UnexpectedToken { offset: usize },

    /// A closing delimiter (`)`, `]`, `>`) was never found.
    MissingDelimiter { offset: usize },

    /// A role name was empty (e.g. `[]` or `<->`).
    EmptyRoleName { offset: usize },

    /// The input line was empty, where a formula was required.
    Empty,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnexpectedEnd { offset } => {
                write!(f, "unexpected end of input at byte {offset}")
            }
            ParseError::UnexpectedToken { offset } => {
                write!(f, "unexpected token at byte {offset}")
            }
            ParseError::MissingDelimiter { offset } => {
                write!(f, "missing closing delimiter at byte {offset}")
            }
            ParseError::EmptyRoleName { offset } => {
                write!(f, "empty role name at byte {offset}")
            }
            ParseError::Empty => write!(f, "empty input"),
        }
    }
}

/// A construct the grammar accepts but the engine cannot decide.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnsupportedConstruct {
    /// An inverse role (`<-r>`, `[-r]`) reached a decision. Inverse roles
    /// parse and intern without issue, but no engine currently resolves the
    /// accessibility relation in reverse.
    InverseRole,
}

impl std::fmt::Display for UnsupportedConstruct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsupportedConstruct::InverseRole => {
                write!(f, "inverse roles are not supported during a decision")
            }
        }
    }
}

/// A resource bound was reached.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResourceError {
    /// The underlying BDD library reported it could not allocate further nodes.
    BDDOutOfMemory,
}

impl std::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceError::BDDOutOfMemory => write!(f, "BDD library ran out of memory"),
        }
    }
}
