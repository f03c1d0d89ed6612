use std::{fmt, str::FromStr};

/// A type which a raw string can be converted to directly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Primitive {
    /// A symbol, interned if it does not exist yet
    Atom,
    /// A symbol which must already exist
    SafeAtom,
    /// `true` or `false`, decided by the `truthy` / `falsy` rule
    Boolean,
    /// A list of characters
    Charlist,
    /// A signed integer in a configurable base
    Integer,
    /// A 64-bit float
    Float,
    /// An exact decimal number
    Decimal,
    /// A json document, decoded by a pluggable engine
    Json,
    /// One of a closed set of log level names
    LogLevel,
    /// A module name, interned if it does not exist yet
    Module,
    /// A module name which must already exist
    SafeModule,
    /// PEM encoded certificates and keys
    Pem,
    /// Erlang source, evaluated by an injected evaluator
    CodeErlang,
    /// Elixir source, evaluated by an injected evaluator
    CodeElixir,
    /// `infinity` or a duration literal folded to milliseconds
    Timeout,
    /// A duration literal kept as its components
    Duration,
}

impl Primitive {
    /// All primitive types, in declaration order
    pub const ALL: [Primitive; 16] = [
        Self::Atom,
        Self::SafeAtom,
        Self::Boolean,
        Self::Charlist,
        Self::Integer,
        Self::Float,
        Self::Decimal,
        Self::Json,
        Self::LogLevel,
        Self::Module,
        Self::SafeModule,
        Self::Pem,
        Self::CodeErlang,
        Self::CodeElixir,
        Self::Timeout,
        Self::Duration,
    ];

    /// The tag name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atom => "atom",
            Self::SafeAtom => "safe_atom",
            Self::Boolean => "boolean",
            Self::Charlist => "charlist",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Json => "json",
            Self::LogLevel => "log_level",
            Self::Module => "module",
            Self::SafeModule => "safe_module",
            Self::Pem => "pem",
            Self::CodeErlang => "code_erlang",
            Self::CodeElixir => "code_elixir",
            Self::Timeout => "timeout",
            Self::Duration => "duration",
        }
    }
}

/// A type which decodes or splits the raw string, and may chain into a [`Secondary`] conversion.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Wrapper {
    /// Hex, RFC 4648 base16
    Base16,
    /// RFC 4648 base32
    Base32,
    /// RFC 4648 base32 with the extended hex alphabet
    Hex32,
    /// RFC 4648 base64
    Base64,
    /// RFC 4648 base64 with the url and filename safe alphabet
    UrlBase64,
    /// Split on a delimiter
    List,
}

impl Wrapper {
    /// All wrapper types, in declaration order
    pub const ALL: [Wrapper; 6] = [
        Self::Base16,
        Self::Base32,
        Self::Hex32,
        Self::Base64,
        Self::UrlBase64,
        Self::List,
    ];

    /// The tag name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base16 => "base16",
            Self::Base32 => "base32",
            Self::Hex32 => "hex32",
            Self::Base64 => "base64",
            Self::UrlBase64 => "url_base64",
            Self::List => "list",
        }
    }
}

/// The second stage of a wrapped descriptor.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Secondary {
    /// Keep the decoded (or split) strings as they are
    String,
    /// Convert each decoded (or split) string again
    Primitive(Primitive),
}

/// The type a caller asks a raw string to be converted to.
///
/// Wrappers nest at most one level, a wrapper of a wrapper is not representable.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TypeDescriptor {
    /// Convert directly
    Primitive(Primitive),
    /// Decode or split first, then convert the result as the secondary type
    Wrapped(Wrapper, Secondary),
}

impl TypeDescriptor {
    /// Wrap a primitive type in an encoding or a list
    pub fn wrapped(wrapper: Wrapper, secondary: Primitive) -> Self {
        Self::Wrapped(wrapper, Secondary::Primitive(secondary))
    }
}

impl From<Primitive> for TypeDescriptor {
    fn from(src: Primitive) -> Self {
        Self::Primitive(src)
    }
}

impl From<Wrapper> for TypeDescriptor {
    fn from(src: Wrapper) -> Self {
        Self::Wrapped(src, Secondary::String)
    }
}

impl From<(Wrapper, Primitive)> for TypeDescriptor {
    fn from((wrapper, secondary): (Wrapper, Primitive)) -> Self {
        Self::wrapped(wrapper, secondary)
    }
}

/// The tag of a single conversion stage. Errors are reported against one of these.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TypeTag {
    /// A primitive stage
    Primitive(Primitive),
    /// A decoding or splitting stage
    Wrapper(Wrapper),
}

impl TypeTag {
    /// The tag name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive(p) => p.as_str(),
            Self::Wrapper(w) => w.as_str(),
        }
    }
}

impl From<Primitive> for TypeTag {
    fn from(src: Primitive) -> Self {
        Self::Primitive(src)
    }
}

impl From<Wrapper> for TypeTag {
    fn from(src: Wrapper) -> Self {
        Self::Wrapper(src)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Wrapped(w, Secondary::String) => write!(f, "{w}"),
            Self::Wrapped(w, Secondary::Primitive(p)) => write!(f, "{w}:{p}"),
        }
    }
}

/// Returned when a type descriptor string names no known type
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown type `{0}`")]
pub struct UnknownType(pub String);

impl FromStr for Primitive {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownType(s.to_owned()))
    }
}

impl FromStr for Wrapper {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| UnknownType(s.to_owned()))
    }
}

/// Parses `integer`, `base64` (same as `base64:string`) or `list:integer`.
impl FromStr for TypeDescriptor {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((wrapper, secondary)) = s.split_once(':') {
            let wrapper = wrapper.parse::<Wrapper>()?;
            if secondary == "string" {
                return Ok(Self::Wrapped(wrapper, Secondary::String));
            }
            // The secondary must be primitive, reject e.g. `list:base64` here
            let secondary = secondary
                .parse::<Primitive>()
                .map_err(|_| UnknownType(s.to_owned()))?;
            return Ok(Self::wrapped(wrapper, secondary));
        }

        if let Ok(p) = s.parse::<Primitive>() {
            return Ok(Self::Primitive(p));
        }
        s.parse::<Wrapper>().map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_from_str() {
        assert_eq!(
            "integer".parse::<TypeDescriptor>().unwrap(),
            TypeDescriptor::Primitive(Primitive::Integer)
        );
        assert_eq!(
            "base64".parse::<TypeDescriptor>().unwrap(),
            TypeDescriptor::Wrapped(Wrapper::Base64, Secondary::String)
        );
        assert_eq!(
            "list:string".parse::<TypeDescriptor>().unwrap(),
            TypeDescriptor::Wrapped(Wrapper::List, Secondary::String)
        );
        assert_eq!(
            "list:safe_atom".parse::<TypeDescriptor>().unwrap(),
            TypeDescriptor::wrapped(Wrapper::List, Primitive::SafeAtom)
        );
        assert_eq!(
            "list:base64".parse::<TypeDescriptor>(),
            Err(UnknownType("list:base64".into()))
        );
        assert_eq!(
            "integer:string".parse::<TypeDescriptor>(),
            Err(UnknownType("integer".into()))
        );
        assert!("strin".parse::<TypeDescriptor>().is_err());
    }

    #[test]
    fn test_descriptor_display_round_trip() {
        for p in Primitive::ALL {
            let d = TypeDescriptor::from(p);
            assert_eq!(d.to_string().parse::<TypeDescriptor>().unwrap(), d);
            for w in Wrapper::ALL {
                let d = TypeDescriptor::wrapped(w, p);
                assert_eq!(d.to_string().parse::<TypeDescriptor>().unwrap(), d);
            }
        }
    }
}
