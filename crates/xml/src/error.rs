//! Errors for tokenizing, tree building and tree construction.

use std::fmt;
use std::io;

pub type XmlResult<T> = Result<T, XmlError>;

#[derive(Debug)]
pub enum XmlError {
    /// The underlying reader failed; the parse is aborted.
    Io(io::Error),
    UnterminatedString {
        line: usize,
    },
    UnterminatedComment {
        line: usize,
    },
    /// Input ended while a token was still required. `tag` is the innermost
    /// open tag, if any.
    UnexpectedEof {
        tag: Option<String>,
        line: usize,
    },
    MismatchedClosingTag {
        expected: String,
        found: String,
        line: usize,
    },
    MalformedAttribute {
        tag: String,
        attribute: String,
        line: usize,
    },
    /// A `</...>` appeared where the document's first tag was expected.
    UnexpectedClosingTag {
        line: usize,
    },
    MaxDepthExceeded {
        max_depth: usize,
        line: usize,
    },
    EmptyTagName,
    /// A tag name that would not read back as one word.
    InvalidTagName {
        name: String,
    },
}

impl XmlError {
    /// Source line the error was detected on, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            XmlError::UnterminatedString { line }
            | XmlError::UnterminatedComment { line }
            | XmlError::UnexpectedEof { line, .. }
            | XmlError::MismatchedClosingTag { line, .. }
            | XmlError::MalformedAttribute { line, .. }
            | XmlError::UnexpectedClosingTag { line }
            | XmlError::MaxDepthExceeded { line, .. } => Some(*line),
            XmlError::Io(_) | XmlError::EmptyTagName | XmlError::InvalidTagName { .. } => None,
        }
    }
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlError::Io(err) => write!(f, "read failed: {err}"),
            XmlError::UnterminatedString { line } => {
                write!(f, "line {line}: unterminated quoted string")
            }
            XmlError::UnterminatedComment { line } => {
                write!(f, "line {line}: unterminated block comment")
            }
            XmlError::UnexpectedEof { tag: Some(tag), line } => {
                write!(f, "line {line}: unexpected end of input inside <{tag}>")
            }
            XmlError::UnexpectedEof { tag: None, line } => {
                write!(f, "line {line}: unexpected end of input before the first tag")
            }
            XmlError::MismatchedClosingTag {
                expected,
                found,
                line,
            } => write!(
                f,
                "line {line}: mismatched closing tag </{found}>, expected </{expected}>"
            ),
            XmlError::MalformedAttribute {
                tag,
                attribute,
                line,
            } => write!(
                f,
                "line {line}: attribute '{attribute}' of <{tag}> is missing a quoted value"
            ),
            XmlError::UnexpectedClosingTag { line } => {
                write!(f, "line {line}: closing tag found before any opening tag")
            }
            XmlError::MaxDepthExceeded { max_depth, line } => {
                write!(f, "line {line}: maximum nesting depth ({max_depth}) exceeded")
            }
            XmlError::EmptyTagName => f.write_str("tag name must not be empty"),
            XmlError::InvalidTagName { name } => write!(f, "invalid tag name '{name}'"),
        }
    }
}

impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            XmlError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for XmlError {
    fn from(err: io::Error) -> Self {
        XmlError::Io(err)
    }
}
