//! Validation of [`Options`] into the configuration of one type.
//!
//! Every type reads its own options and checks them before a value is looked at. The result,
//! a [`NormalizedConfig`], is internally consistent, so the converters never need to check
//! options again.

use crate::{
    convert::{parse_decimal, parse_float},
    duration::{self, Unit},
    str_to_bool::BooleanRule,
    value::module_name,
    CaseMode, Casefold, CodeEvaluator, CodeSyntax, ConfigError, Decoding, Delimiter, Duration,
    Group, Interner, JsonEngine, LogLevel, On, Options, Parts, PemDecoder, PemFilter, PemValue,
    Primitive, RustlsPem, Splitting, Symbol, SymbolTable, Timeout, TypeTag, Value, Wrapper,
};
use rust_decimal::Decimal;
use std::{borrow::Cow, sync::Arc};

/// The validated configuration of one type
#[derive(Clone, Debug)]
pub struct NormalizedConfig {
    /// Case normalization applied to a present value before conversion
    pub casefold: Option<Casefold>,
    /// The settings of the type
    pub kind: TypeConfig,
}

impl NormalizedConfig {
    /// The value an absent input resolves to
    pub fn default_value(&self) -> Value {
        self.kind.default_value()
    }

    /// Apply the casefold, if any, to a raw value
    pub fn fold<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        match &self.casefold {
            Some(casefold) => casefold.apply(raw),
            None => Cow::Borrowed(raw),
        }
    }
}

/// Which of the four symbol types
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SymbolKind {
    /// `atom`
    Atom,
    /// `safe_atom`
    SafeAtom,
    /// `module`
    Module,
    /// `safe_module`
    SafeModule,
}

impl SymbolKind {
    /// Whether the symbol must already exist
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::SafeAtom | Self::SafeModule)
    }

    /// Whether the symbol is a module name
    pub fn is_module(&self) -> bool {
        matches!(self, Self::Module | Self::SafeModule)
    }

    /// Wrap a symbol into the value this kind produces
    pub fn value(&self, symbol: Symbol) -> Value {
        if self.is_module() {
            Value::Module(symbol)
        } else {
            Value::Atom(symbol)
        }
    }
}

/// Settings of `atom`, `safe_atom`, `module` and `safe_module`
#[derive(Clone, Debug)]
pub struct SymbolConfig {
    /// Which type
    pub kind: SymbolKind,
    /// The closed set of results. Module names carry their prefix.
    pub allowed: Option<Vec<Symbol>>,
    /// Result for an absent value
    pub default: Option<Symbol>,
    /// Where symbols are interned and looked up, when there is no `allowed`
    pub table: Arc<dyn SymbolTable>,
}

/// Settings of `boolean`
#[derive(Clone, Debug)]
pub struct BooleanConfig {
    /// How strings are read
    pub rule: BooleanRule,
    /// Result for an absent value
    pub default: bool,
}

/// Settings of `integer`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IntegerConfig {
    /// 2 through 36
    pub base: u32,
    /// Result for an absent value
    pub default: Option<i64>,
}

/// Settings of `json`
#[derive(Clone, Debug)]
pub struct JsonConfig {
    /// The decoder
    pub engine: JsonEngine,
    /// Result for an absent value
    pub default: Option<serde_json::Value>,
}

/// Settings of `pem`
#[derive(Clone, Debug)]
pub struct PemConfig {
    /// Which entries are returned
    pub filter: PemFilter,
    /// The decoder
    pub decoder: Arc<dyn PemDecoder>,
    /// Result for an absent value
    pub default: Option<PemValue>,
}

/// Settings of `code_erlang` and `code_elixir`
#[derive(Clone, Debug)]
pub struct CodeConfig {
    /// The source syntax
    pub syntax: CodeSyntax,
    /// The evaluator
    pub evaluator: Arc<dyn CodeEvaluator>,
    /// Result for an absent value
    pub default: Option<Value>,
}

/// Settings of the encodings
#[derive(Clone, Debug)]
pub struct EncodedConfig {
    /// Which encoding
    pub wrapper: Wrapper,
    /// Decoder settings
    pub decoding: Decoding,
    /// Result for an absent value
    pub default: Option<Vec<u8>>,
}

/// Settings of `list`
#[derive(Clone, Debug)]
pub struct ListConfig {
    /// Splitter settings
    pub splitting: Splitting,
    /// Result for an absent value. It is returned as is, never converted.
    pub default: Option<Vec<Value>>,
}

/// The settings of each type
#[derive(Clone, Debug)]
#[allow(missing_docs)]
pub enum TypeConfig {
    /// `atom`, `safe_atom`, `module`, `safe_module`
    Symbol(SymbolConfig),
    Boolean(BooleanConfig),
    Charlist {
        default: Option<Vec<char>>,
    },
    Integer(IntegerConfig),
    Float {
        default: Option<f64>,
    },
    Decimal {
        default: Option<Decimal>,
    },
    Json(JsonConfig),
    LogLevel {
        default: Option<LogLevel>,
    },
    Pem(PemConfig),
    /// `code_erlang`, `code_elixir`
    Code(CodeConfig),
    Timeout {
        /// Infinity unless configured
        default: Timeout,
    },
    Duration {
        default: Option<Duration>,
    },
    /// `base16`, `base32`, `hex32`, `base64`, `url_base64`
    Encoded(EncodedConfig),
    List(ListConfig),
}

impl TypeConfig {
    /// The value an absent input resolves to
    pub fn default_value(&self) -> Value {
        match self {
            Self::Symbol(config) => or_nil(&config.default, |s| config.kind.value(s)),
            Self::Boolean(config) => Value::Boolean(config.default),
            Self::Charlist { default } => or_nil(default, Value::Charlist),
            Self::Integer(config) => or_nil(&config.default, Value::Integer),
            Self::Float { default } => or_nil(default, Value::Float),
            Self::Decimal { default } => or_nil(default, Value::Decimal),
            Self::Json(config) => or_nil(&config.default, Value::Json),
            Self::LogLevel { default } => or_nil(default, Value::LogLevel),
            Self::Pem(config) => or_nil(&config.default, Value::Pem),
            Self::Code(config) => or_nil(&config.default, |v| v),
            Self::Timeout { default } => Value::Timeout(*default),
            Self::Duration { default } => or_nil(default, Value::Duration),
            Self::Encoded(config) => or_nil(&config.default, Value::Binary),
            Self::List(config) => or_nil(&config.default, Value::List),
        }
    }
}

fn or_nil<T: Clone>(default: &Option<T>, f: impl FnOnce(T) -> Value) -> Value {
    default.clone().map_or(Value::Nil, f)
}

fn invalid_default(expected: &str) -> ConfigError {
    ConfigError(format!("invalid `default` value (must be {expected})"))
}

/// Validate the options of one type.
///
/// Options which the type does not read are ignored. A `default` of [`Value::Nil`] is the same
/// as no default.
pub fn validate(tag: TypeTag, options: &Options) -> Result<NormalizedConfig, ConfigError> {
    let casefold = casefold(tag, options)?;
    let default = options.default.as_ref().filter(|value| !value.is_nil());

    let kind = match tag {
        TypeTag::Primitive(primitive) => match primitive {
            Primitive::Atom => TypeConfig::Symbol(symbol(SymbolKind::Atom, default, options)?),
            Primitive::SafeAtom => {
                TypeConfig::Symbol(symbol(SymbolKind::SafeAtom, default, options)?)
            }
            Primitive::Module => TypeConfig::Symbol(symbol(SymbolKind::Module, default, options)?),
            Primitive::SafeModule => {
                TypeConfig::Symbol(symbol(SymbolKind::SafeModule, default, options)?)
            }
            Primitive::Boolean => TypeConfig::Boolean(boolean(casefold, default, options)?),
            Primitive::Charlist => TypeConfig::Charlist {
                default: default
                    .map(|value| match value {
                        Value::Charlist(chars) => Ok(chars.clone()),
                        Value::String(s) => Ok(s.chars().collect()),
                        _ => Err(invalid_default("a charlist or a string")),
                    })
                    .transpose()?,
            },
            Primitive::Integer => TypeConfig::Integer(integer(default, options)?),
            Primitive::Float => TypeConfig::Float {
                default: default.map(float_default).transpose()?,
            },
            Primitive::Decimal => TypeConfig::Decimal {
                default: default.map(decimal_default).transpose()?,
            },
            Primitive::Json => TypeConfig::Json(JsonConfig {
                engine: options.engine.clone().unwrap_or_default(),
                default: default
                    .map(|value| {
                        value
                            .to_json()
                            .ok_or_else(|| invalid_default("a json-representable value"))
                    })
                    .transpose()?,
            }),
            Primitive::LogLevel => TypeConfig::LogLevel {
                default: default
                    .map(|value| {
                        let name = match value {
                            Value::LogLevel(level) => return Ok(*level),
                            Value::Atom(s) => s.as_str(),
                            Value::String(s) => s.as_str(),
                            _ => "",
                        };
                        name.parse()
                            .map_err(|_| invalid_default("a log level"))
                    })
                    .transpose()?,
            },
            Primitive::Pem => TypeConfig::Pem(pem(default, options)?),
            Primitive::CodeErlang => {
                TypeConfig::Code(code(CodeSyntax::Erlang, tag, default, options)?)
            }
            Primitive::CodeElixir => {
                TypeConfig::Code(code(CodeSyntax::Elixir, tag, default, options)?)
            }
            Primitive::Timeout => TypeConfig::Timeout {
                default: default.map_or(Ok(Timeout::Infinity), timeout_default)?,
            },
            Primitive::Duration => TypeConfig::Duration {
                default: default
                    .map(|value| match value {
                        Value::Duration(duration) => Ok(duration.clone()),
                        Value::String(s) => s
                            .parse()
                            .map_err(|err| invalid_default(&format!("a duration literal, {err}"))),
                        _ => Err(invalid_default("a duration or a duration literal")),
                    })
                    .transpose()?,
            },
        },
        TypeTag::Wrapper(Wrapper::List) => TypeConfig::List(list(default, options)?),
        TypeTag::Wrapper(wrapper) => TypeConfig::Encoded(encoded(wrapper, default, options)?),
    };

    Ok(NormalizedConfig { casefold, kind })
}

fn casefold(tag: TypeTag, options: &Options) -> Result<Option<Casefold>, ConfigError> {
    Ok(match (options.downcase, options.upcase) {
        (Some(_), Some(_)) => {
            return Err("`downcase` and `upcase` are mutually exclusive".into());
        }
        (Some(mode), None) => Some(Casefold::Down(mode)),
        (None, Some(mode)) => Some(Casefold::Up(mode)),
        (None, None) if tag == TypeTag::Primitive(Primitive::Boolean) => {
            Some(Casefold::Down(CaseMode::Default))
        }
        (None, None) => None,
    })
}

fn symbol(
    kind: SymbolKind,
    default: Option<&Value>,
    options: &Options,
) -> Result<SymbolConfig, ConfigError> {
    let name_of = |value: &Value| -> Option<String> {
        let name = match value {
            Value::Atom(s) | Value::Module(s) => s.as_str(),
            Value::String(s) => s.as_str(),
            _ => return None,
        };
        Some(if kind.is_module() {
            module_name(name)
        } else {
            name.to_owned()
        })
    };

    let allowed = match &options.allowed {
        None => None,
        Some(items) => {
            if items.is_empty() {
                return Err("invalid `allowed` value (must be a non-empty list)".into());
            }
            let all_symbols = items
                .iter()
                .all(|v| matches!(v, Value::Atom(_) | Value::Module(_)));
            let all_strings = items.iter().all(|v| matches!(v, Value::String(_)));
            if !all_symbols && !all_strings {
                return Err("invalid `allowed` value (must be all atoms or all strings)".into());
            }
            Some(
                items
                    .iter()
                    .filter_map(name_of)
                    .map(Symbol::new)
                    .collect::<Vec<_>>(),
            )
        }
    };

    let default = match default {
        None => None,
        Some(value) => {
            let name = name_of(value).ok_or_else(|| invalid_default("an atom or a string"))?;
            if let Some(allowed) = &allowed {
                if !allowed.iter().any(|s| s.as_str() == name) {
                    return Err(invalid_default("one of `allowed`"));
                }
            }
            Some(Symbol::new(name))
        }
    };

    let table: Arc<dyn SymbolTable> = match &options.symbols {
        Some(table) => table.clone(),
        None => Interner::global(),
    };

    Ok(SymbolConfig {
        kind,
        allowed,
        default,
        table,
    })
}

// The word lists are folded like the raw value, so that they can be compared exactly
fn boolean(
    casefold: Option<Casefold>,
    default: Option<&Value>,
    options: &Options,
) -> Result<BooleanConfig, ConfigError> {
    let fold = |words: &[String]| -> Vec<String> {
        words
            .iter()
            .map(|word| match casefold {
                Some(casefold) => casefold.apply(word).into_owned(),
                None => word.clone(),
            })
            .collect()
    };
    let rule = match (&options.truthy, &options.falsy) {
        (Some(_), Some(_)) => return Err("`truthy` and `falsy` are mutually exclusive".into()),
        (Some(truthy), None) => BooleanRule::Truthy(fold(truthy)),
        (None, Some(falsy)) => BooleanRule::Falsy(fold(falsy)),
        (None, None) => BooleanRule::default(),
    };
    let default = match default {
        None => false,
        Some(Value::Boolean(b)) => *b,
        Some(_) => return Err(invalid_default("a boolean")),
    };
    Ok(BooleanConfig { rule, default })
}

fn integer(default: Option<&Value>, options: &Options) -> Result<IntegerConfig, ConfigError> {
    let base = match options.base {
        None => 10,
        Some(base) => u32::try_from(base)
            .ok()
            .filter(|base| (2..=36).contains(base))
            .ok_or_else(|| ConfigError::from("invalid `base` value (must be an integer 2..36)"))?,
    };
    let default = match default {
        None => None,
        Some(Value::Integer(i)) => Some(*i),
        Some(Value::String(s)) => Some(
            i64::from_str_radix(s, base)
                .map_err(|_| invalid_default(&format!("an integer in base {base}")))?,
        ),
        Some(_) => return Err(invalid_default("an integer or a string")),
    };
    Ok(IntegerConfig { base, default })
}

fn float_default(value: &Value) -> Result<f64, ConfigError> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        Value::String(s) => parse_float(s).map_err(|_| invalid_default("a float")),
        _ => Err(invalid_default("a float, an integer or a string")),
    }
}

fn decimal_default(value: &Value) -> Result<Decimal, ConfigError> {
    match value {
        Value::Decimal(d) => Ok(*d),
        Value::Integer(i) => Ok(Decimal::from(*i)),
        Value::Float(f) => Decimal::try_from(*f).map_err(|_| invalid_default("a finite decimal")),
        Value::String(s) => parse_decimal(s).map_err(|_| invalid_default("a decimal")),
        _ => Err(invalid_default("a decimal, a number or a string")),
    }
}

fn pem(default: Option<&Value>, options: &Options) -> Result<PemConfig, ConfigError> {
    let decoder: Arc<dyn PemDecoder> = match &options.pem_decoder {
        Some(decoder) => decoder.clone(),
        None => Arc::new(RustlsPem),
    };
    let default = match default {
        None => None,
        Some(Value::Pem(pem)) => Some(pem.clone()),
        Some(_) => return Err(invalid_default("decoded pem entries")),
    };
    Ok(PemConfig {
        filter: options.filter.unwrap_or_default(),
        decoder,
        default,
    })
}

fn code(
    syntax: CodeSyntax,
    tag: TypeTag,
    default: Option<&Value>,
    options: &Options,
) -> Result<CodeConfig, ConfigError> {
    let evaluator = options
        .evaluator
        .clone()
        .ok_or_else(|| ConfigError(format!("`evaluator` is required for {tag}")))?;
    Ok(CodeConfig {
        syntax,
        evaluator,
        default: default.cloned(),
    })
}

fn timeout_default(value: &Value) -> Result<Timeout, ConfigError> {
    const EXPECTED: &str =
        "infinity, a non-negative integer, a duration, a duration literal or a map of units";

    match value {
        Value::Timeout(timeout) => Ok(*timeout),
        Value::Atom(s) if s.as_str() == "infinity" => Ok(Timeout::Infinity),
        Value::String(s) if s == "infinity" => Ok(Timeout::Infinity),
        Value::Integer(ms) => u64::try_from(*ms)
            .map(Timeout::Millis)
            .map_err(|_| invalid_default(EXPECTED)),
        Value::Duration(duration) => duration
            .as_millis()
            .map(Timeout::Millis)
            .ok_or_else(|| invalid_default("a duration which fits in 64 bits of milliseconds")),
        Value::String(s) => {
            let components = duration::parse(s)
                .map_err(|err| invalid_default(&format!("a duration literal, {err}")))?;
            duration::to_millis(&components)
                .map(Timeout::Millis)
                .ok_or_else(|| invalid_default("a duration which fits in 64 bits of milliseconds"))
        }
        Value::Map(entries) => {
            if entries.is_empty() {
                return Err(invalid_default(EXPECTED));
            }
            let mut seen = Vec::with_capacity(entries.len());
            let mut total = 0u64;
            for (key, magnitude) in entries {
                let unit = match key {
                    Value::Atom(s) => Unit::from_name(s.as_str()),
                    Value::String(s) => Unit::from_name(s),
                    _ => None,
                }
                .ok_or_else(|| invalid_default("a map keyed by unit names"))?;
                if seen.contains(&unit) {
                    return Err(ConfigError(format!(
                        "invalid `default` value (duplicate unit `{unit}`)"
                    )));
                }
                seen.push(unit);
                let magnitude = magnitude
                    .as_integer()
                    .and_then(|i| u64::try_from(i).ok())
                    .ok_or_else(|| invalid_default("a map of units to non-negative integers"))?;
                total = magnitude
                    .checked_mul(unit.millis())
                    .and_then(|ms| total.checked_add(ms))
                    .ok_or_else(|| {
                        invalid_default("a duration which fits in 64 bits of milliseconds")
                    })?;
            }
            Ok(Timeout::Millis(total))
        }
        _ => Err(invalid_default(EXPECTED)),
    }
}

fn encoded(
    wrapper: Wrapper,
    default: Option<&Value>,
    options: &Options,
) -> Result<EncodedConfig, ConfigError> {
    let decoding = Decoding {
        case: options.case.unwrap_or_default(),
        padding: options.padding.unwrap_or(true),
        ignore_whitespace: options.ignore_whitespace.unwrap_or(true),
    };
    let default = match default {
        None => None,
        Some(Value::String(s)) => Some(s.clone().into_bytes()),
        Some(Value::Binary(bytes)) => Some(bytes.clone()),
        Some(_) => return Err(invalid_default("a string or a binary")),
    };
    Ok(EncodedConfig {
        wrapper,
        decoding,
        default,
    })
}

fn list(default: Option<&Value>, options: &Options) -> Result<ListConfig, ConfigError> {
    let delimiter = options.delimiter.clone().unwrap_or_default();
    match &delimiter {
        Delimiter::Literal(literal) if literal.is_empty() => {
            return Err("invalid `delimiter` value (must not be empty)".into());
        }
        Delimiter::AnyOf(literals) if literals.is_empty() || literals.iter().any(String::is_empty) => {
            return Err(
                "invalid `delimiter` value (must be a non-empty list of non-empty strings)".into(),
            );
        }
        _ => {}
    }

    let on = match (&delimiter, &options.on) {
        (Delimiter::Pattern(regex), Some(On::Groups(groups))) => {
            if groups.is_empty() {
                return Err("invalid `on` value (must name at least one group)".into());
            }
            for group in groups {
                match group {
                    Group::Index(idx) if *idx >= regex.captures_len() => {
                        return Err(ConfigError(format!(
                            "invalid `on` value (the regex has no group {idx})"
                        )));
                    }
                    Group::Name(name)
                        if !regex.capture_names().any(|n| n == Some(name.as_str())) =>
                    {
                        return Err(ConfigError(format!(
                            "invalid `on` value (the regex has no group named `{name}`)"
                        )));
                    }
                    _ => {}
                }
            }
            On::Groups(groups.clone())
        }
        (Delimiter::Pattern(_), on) => on.clone().unwrap_or_default(),
        (_, Some(_)) => return Err("`on` requires a regex `delimiter`".into()),
        (_, None) => On::default(),
    };
    if options.include_captures.is_some() && !matches!(delimiter, Delimiter::Pattern(_)) {
        return Err("`include_captures` requires a regex `delimiter`".into());
    }

    let parts = match options.parts.unwrap_or_default() {
        Parts::Unbounded => None,
        Parts::Count(count) => Some(
            usize::try_from(count)
                .ok()
                .filter(|count| *count >= 1)
                .ok_or_else(|| {
                    ConfigError::from(
                        "invalid `parts` value (must be a positive integer or unbounded)",
                    )
                })?,
        ),
    };

    let default = match default {
        None => None,
        Some(Value::List(items)) => Some(items.clone()),
        Some(_) => return Err(invalid_default("a list")),
    };

    Ok(ListConfig {
        splitting: Splitting {
            delimiter,
            parts,
            trim: options.trim.unwrap_or(false),
            on,
            include_captures: options.include_captures.unwrap_or(false),
        },
        default,
    })
}
