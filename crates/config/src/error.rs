use std::fmt;
use std::io;
use xml::XmlError;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    /// The document could not be read or parsed.
    Xml(XmlError),
    /// Writing an exported document failed.
    Io(io::Error),
    InvalidRoot {
        found: String,
    },
    /// A stored value does not parse as the requested type, or a key/value
    /// pair cannot be written as an attribute.
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid_value(key: &str, value: &str, reason: impl fmt::Display) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Xml(err) => write!(f, "invalid configuration document: {err}"),
            ConfigError::Io(err) => write!(f, "configuration write failed: {err}"),
            ConfigError::InvalidRoot { found } => write!(
                f,
                "invalid configuration file: root tag is <{found}>, expected <{}>",
                crate::ROOT_TAG
            ),
            ConfigError::InvalidValue { key, value, reason } => {
                write!(f, "invalid value '{value}' for '{key}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Xml(err) => Some(err),
            ConfigError::Io(err) => Some(err),
            ConfigError::InvalidRoot { .. } | ConfigError::InvalidValue { .. } => None,
        }
    }
}

impl From<XmlError> for ConfigError {
    fn from(err: XmlError) -> Self {
        ConfigError::Xml(err)
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}
