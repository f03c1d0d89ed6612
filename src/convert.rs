//! The converters, one per type. Each takes a present (and already casefolded) value.

use crate::{
    config::{CodeConfig, EncodedConfig, JsonConfig, PemConfig, SymbolConfig, TypeConfig},
    duration,
    encoding,
    pem::apply_filter,
    split::split,
    str_to_bool::str_to_bool,
    value::module_name,
    ConversionFailure, Duration, LogLevel, Timeout, Value,
};
use rust_decimal::Decimal;

/// Convert a value with a validated configuration
pub fn convert(value: &str, config: &TypeConfig) -> Result<Value, ConversionFailure> {
    match config {
        TypeConfig::Symbol(config) => symbol(value, config),
        TypeConfig::Boolean(config) => Ok(Value::Boolean(str_to_bool(value, &config.rule))),
        TypeConfig::Charlist { .. } => Ok(Value::Charlist(value.chars().collect())),
        TypeConfig::Integer(config) => parse_integer(value, config.base).map(Value::Integer),
        TypeConfig::Float { .. } => parse_float(value).map(Value::Float),
        TypeConfig::Decimal { .. } => parse_decimal(value).map(Value::Decimal),
        TypeConfig::Json(config) => json(value, config),
        TypeConfig::LogLevel { .. } => value
            .parse::<LogLevel>()
            .map(Value::LogLevel)
            .map_err(|err| err.to_string().into()),
        TypeConfig::Pem(config) => pem(value, config),
        TypeConfig::Code(config) => code(value, config),
        TypeConfig::Timeout { .. } => timeout(value).map(Value::Timeout),
        TypeConfig::Duration { .. } => Ok(Value::Duration(value.parse::<Duration>()?)),
        TypeConfig::Encoded(config) => decode(value, config).map(Value::Binary),
        TypeConfig::List(config) => Ok(Value::List(
            split(value, &config.splitting)
                .into_iter()
                .map(Value::String)
                .collect(),
        )),
    }
}

fn symbol(value: &str, config: &SymbolConfig) -> Result<Value, ConversionFailure> {
    let name = if config.kind.is_module() {
        module_name(value)
    } else {
        value.to_owned()
    };

    let symbol = match &config.allowed {
        Some(allowed) => allowed
            .iter()
            .find(|symbol| symbol.as_str() == name)
            .cloned()
            .ok_or_else(|| ConversionFailure::from("not one of the allowed values"))?,
        None if config.kind.is_safe() => config
            .table
            .lookup(&name)
            .ok_or_else(|| ConversionFailure::from("no such symbol exists"))?,
        None => config.table.intern(&name),
    };
    Ok(config.kind.value(symbol))
}

/// Parse an integer in a base, with an optional sign. Any character which is not a digit of the
/// base fails the whole parse.
pub(crate) fn parse_integer(value: &str, base: u32) -> Result<i64, ConversionFailure> {
    i64::from_str_radix(value, base)
        .map_err(|err| ConversionFailure(format!("{err} (base {base})")))
}

// [+-]? digits ( '.' digits )? ( [eE] [+-]? digits )?
fn is_number_literal(value: &str) -> bool {
    fn digits(s: &str) -> usize {
        s.bytes().take_while(u8::is_ascii_digit).count()
    }

    let rest = value.strip_prefix(['+', '-']).unwrap_or(value);
    let int_len = digits(rest);
    if int_len == 0 {
        return false;
    }
    let mut rest = &rest[int_len..];
    if let Some(fraction) = rest.strip_prefix('.') {
        let len = digits(fraction);
        if len == 0 {
            return false;
        }
        rest = &fraction[len..];
    }
    if let Some(exponent) = rest.strip_prefix(['e', 'E']) {
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        let len = digits(exponent);
        if len == 0 {
            return false;
        }
        rest = &exponent[len..];
    }
    rest.is_empty()
}

/// Parse a float. Trailing characters fail, and so does a value too large to represent.
pub(crate) fn parse_float(value: &str) -> Result<f64, ConversionFailure> {
    if !is_number_literal(value) {
        return Err("not a number".into());
    }
    let float: f64 = value
        .parse()
        .map_err(|err: std::num::ParseFloatError| ConversionFailure(err.to_string()))?;
    if !float.is_finite() {
        return Err("number out of range".into());
    }
    Ok(float)
}

/// Parse an exact decimal. Trailing characters fail, and so does a value which cannot be
/// represented without losing precision.
pub(crate) fn parse_decimal(value: &str) -> Result<Decimal, ConversionFailure> {
    if !is_number_literal(value) {
        return Err("not a number".into());
    }
    let unsigned = value.strip_prefix('+').unwrap_or(value);
    let result = if unsigned.contains(['e', 'E']) {
        Decimal::from_scientific(unsigned)
    } else {
        Decimal::from_str_exact(unsigned)
    };
    result.map_err(|err| ConversionFailure(err.to_string()))
}

fn json(value: &str, config: &JsonConfig) -> Result<Value, ConversionFailure> {
    config
        .engine
        .decode(value)
        .map(Value::Json)
        .map_err(ConversionFailure)
}

fn pem(value: &str, config: &PemConfig) -> Result<Value, ConversionFailure> {
    let entries = config.decoder.decode(value).map_err(ConversionFailure)?;
    apply_filter(entries, config.filter)
        .map(Value::Pem)
        .map_err(ConversionFailure)
}

fn code(value: &str, config: &CodeConfig) -> Result<Value, ConversionFailure> {
    config
        .evaluator
        .evaluate(config.syntax, value)
        .map_err(ConversionFailure)
}

fn timeout(value: &str) -> Result<Timeout, ConversionFailure> {
    if value == "infinity" {
        return Ok(Timeout::Infinity);
    }
    let components = duration::parse(value)?;
    duration::to_millis(&components)
        .map(Timeout::Millis)
        .ok_or_else(|| "timeout too large".into())
}

/// Decode a value with one of the encodings
pub(crate) fn decode(value: &str, config: &EncodedConfig) -> Result<Vec<u8>, ConversionFailure> {
    encoding::decode(config.wrapper, value, &config.decoding).map_err(ConversionFailure)
}
