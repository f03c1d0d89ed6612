use crate::{duration::ParseError, TypeTag};
use std::fmt;

/// An error returned by [`crate::convert_as`].
///
/// There are two kinds. A configuration error means the options given for a type are invalid,
/// and it is reported before the value is looked at. A conversion error means the options are
/// fine but the value could not be converted. An absent value is never an error.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The options are invalid for the requested type
    #[error("invalid options for `{name}` as {type_tag}: {reason}")]
    Config {
        /// Name of the value, usually an environment variable
        name: String,
        /// The type being converted to
        type_tag: TypeTag,
        /// What is wrong with the options
        reason: ConfigError,
    },
    /// The value could not be converted to the requested type
    #[error("could not convert `{name}` to {type_tag}: {reason}")]
    Conversion {
        /// Name of the value. Elements of a list are named with their index, as in `HOSTS[2]`.
        name: String,
        /// The type being converted to
        type_tag: TypeTag,
        /// Why the conversion failed
        reason: ConversionFailure,
    },
    /// An environment variable is set, but is not valid utf8
    #[error("environment variable `{name}` is not valid utf8")]
    InvalidUtf8Env {
        /// Name of the variable
        name: String,
    },
}

impl Error {
    pub(crate) fn config(name: &str, type_tag: TypeTag, reason: ConfigError) -> Self {
        Self::Config {
            name: name.to_owned(),
            type_tag,
            reason,
        }
    }

    pub(crate) fn conversion(name: &str, type_tag: TypeTag, reason: ConversionFailure) -> Self {
        Self::Conversion {
            name: name.to_owned(),
            type_tag,
            reason,
        }
    }

    /// True if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// True if this is a conversion error
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }

    /// The name of the value the error is about
    pub fn name(&self) -> &str {
        match self {
            Self::Config { name, .. }
            | Self::Conversion { name, .. }
            | Self::InvalidUtf8Env { name } => name,
        }
    }

    /// The exit code a command-line program should exit with on this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Conversion { .. } | Self::InvalidUtf8Env { .. } => 1,
        }
    }
}

/// Why a set of options is invalid for a type. The text names the offending option.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

impl From<String> for ConfigError {
    fn from(src: String) -> Self {
        Self(src)
    }
}

impl From<&str> for ConfigError {
    fn from(src: &str) -> Self {
        Self(src.to_owned())
    }
}

/// Why a value could not be converted
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConversionFailure(pub String);

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConversionFailure {}

impl From<String> for ConversionFailure {
    fn from(src: String) -> Self {
        Self(src)
    }
}

impl From<&str> for ConversionFailure {
    fn from(src: &str) -> Self {
        Self(src.to_owned())
    }
}

impl From<ParseError> for ConversionFailure {
    fn from(src: ParseError) -> Self {
        Self(src.to_string())
    }
}
