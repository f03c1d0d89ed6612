//! Conversion of raw strings, usually environment variables, into typed values.
//!
//! The entry point is [`convert_as`], which takes an optional raw value, a name used in errors,
//! a [`TypeDescriptor`] and [`Options`]:
//!
//! ```
//! use envcast::{convert_as, Options, Primitive, Value};
//!
//! let opts = Options::new().downcase(true).allowed([Value::atom("on"), Value::atom("off")]);
//! let mode = convert_as(Some("OFF"), "MODE", Primitive::SafeAtom, &opts).unwrap();
//! assert_eq!(mode, Value::atom("off"));
//!
//! let opts = Options::new().downcase(false).allowed([Value::atom("on"), Value::atom("off")]);
//! let err = convert_as(Some("OFF"), "MODE", Primitive::SafeAtom, &opts).unwrap_err();
//! assert!(err.is_conversion());
//! ```
//!
//! [`ParsedEnv`] reads the values from a snapshot of the environment.
//!
//! # Types
//!
//! | type | result |
//! |------|--------|
//! | `atom`, `safe_atom` | [`Value::Atom`] |
//! | `module`, `safe_module` | [`Value::Module`] |
//! | `boolean` | [`Value::Boolean`] |
//! | `charlist` | [`Value::Charlist`] |
//! | `integer` | [`Value::Integer`] |
//! | `float` | [`Value::Float`] |
//! | `decimal` | [`Value::Decimal`] |
//! | `json` | [`Value::Json`] |
//! | `log_level` | [`Value::LogLevel`] |
//! | `pem` | [`Value::Pem`] |
//! | `code_erlang`, `code_elixir` | whatever the [`CodeEvaluator`] returns |
//! | `timeout` | [`Value::Timeout`] |
//! | `duration` | [`Value::Duration`] |
//! | `base16`, `base32`, `hex32`, `base64`, `url_base64` | [`Value::Binary`] |
//! | `list` | [`Value::List`] of [`Value::String`] |
//!
//! The encodings and `list` may wrap a second type, as in `base64:json` or `list:integer`.
//!
//! # Errors
//!
//! Invalid options are reported as [`Error::Config`], before the value is looked at. A value
//! which cannot be converted is reported as [`Error::Conversion`]. An absent value is never an
//! error.
//!
//! # Logging
//!
//! Conversions emit `tracing` events: `trace` when a default is used, `debug` when an error is
//! returned. Raw values are never logged.
#![deny(unsafe_code)]
#![deny(missing_docs)]

mod casefold;
mod code;
mod config;
mod convert;
mod descriptor;
mod dispatch;
pub mod duration;
mod encoding;
mod error;
mod json;
mod options;
mod parse_env;
mod pem;
mod split;
mod str_to_bool;
mod symbol;
mod value;

pub use casefold::{CaseMode, Casefold};
pub use code::{CodeEvaluator, CodeSyntax};
pub use config::{
    validate, BooleanConfig, CodeConfig, EncodedConfig, IntegerConfig, JsonConfig, ListConfig,
    NormalizedConfig, PemConfig, SymbolConfig, SymbolKind, TypeConfig,
};
pub use descriptor::{Primitive, Secondary, TypeDescriptor, TypeTag, UnknownType, Wrapper};
pub use dispatch::convert_as;
pub use duration::Duration;
pub use encoding::{Case, Decoding};
pub use error::{ConfigError, ConversionFailure, Error};
pub use json::{JsonDecoder, JsonEngine, SerdeJson};
pub use options::Options;
pub use parse_env::{parse_env, ParsedEnv};
pub use pem::{PemDecoder, PemEntry, PemFilter, PemKind, PemValue, RustlsPem};
pub use split::{Delimiter, Group, On, Parts, Splitting};
pub use str_to_bool::BooleanRule;
pub use symbol::{Interner, Symbol, SymbolTable};
pub use value::{LogLevel, Timeout, UnknownLogLevel, Value};
