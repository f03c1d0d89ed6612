use crate::{
    config::{validate, NormalizedConfig},
    convert::convert,
    Error, Options, Primitive, Secondary, TypeDescriptor, TypeTag, Value, Wrapper,
};
use tracing::{debug, trace};

/// Convert a raw value to the requested type.
///
/// `raw` is the value as read, `None` if it is absent. `name` is only used in errors, usually it
/// is the name of the environment variable. All options are validated before the value is looked
/// at, and invalid options are an [`Error::Config`] even when the value is absent.
///
/// * An absent value resolves to the `default` option, or else to `false` for `boolean`,
///   `infinity` for `timeout`, and [`Value::Nil`] for everything else.
/// * A wrapped type such as `base64:json` first decodes the value, then converts the decoded text
///   with the secondary type and [`Options::secondary`] options.
/// * A `list:T` type splits the value, then converts each part with `T`. A failing part is
///   reported with its index, as in `HOSTS[2]`.
///
/// ```
/// use envcast::{convert_as, Options, Primitive, Timeout, Value, Wrapper};
///
/// let timeout = convert_as(None, "TIMEOUT", Primitive::Timeout, &Options::new()).unwrap();
/// assert_eq!(timeout, Value::Timeout(Timeout::Infinity));
///
/// let ports = convert_as(Some("1,2,3"), "PORTS", (Wrapper::List, Primitive::Integer), &Options::new()).unwrap();
/// assert_eq!(ports, Value::list([1, 2, 3]));
/// ```
pub fn convert_as(
    raw: Option<&str>,
    name: &str,
    descriptor: impl Into<TypeDescriptor>,
    options: &Options,
) -> Result<Value, Error> {
    match descriptor.into() {
        TypeDescriptor::Primitive(primitive) => {
            let config = validated(name, primitive.into(), options)?;
            resolve(raw, name, primitive.into(), &config)
        }
        TypeDescriptor::Wrapped(wrapper, Secondary::String) => {
            let config = validated(name, wrapper.into(), options)?;
            resolve(raw, name, wrapper.into(), &config)
        }
        TypeDescriptor::Wrapped(Wrapper::List, Secondary::Primitive(secondary)) => {
            convert_list(raw, name, secondary, options)
        }
        TypeDescriptor::Wrapped(wrapper, Secondary::Primitive(secondary)) => {
            convert_decoded(raw, name, wrapper, secondary, options)
        }
    }
}

fn convert_list(
    raw: Option<&str>,
    name: &str,
    secondary: Primitive,
    options: &Options,
) -> Result<Value, Error> {
    let secondary_options = options.secondary_options();
    let config = validated(name, Wrapper::List.into(), options)?;
    // Validated once for all elements, and even when there are none
    let secondary_config = validated(name, secondary.into(), &secondary_options)?;

    let parts = match resolve(raw, name, Wrapper::List.into(), &config)? {
        // Only a present value is split, a default is returned as it is
        Value::List(parts) if raw.is_some() => parts,
        default => return Ok(default),
    };

    parts
        .into_iter()
        .enumerate()
        .map(|(idx, part)| {
            let element_name = format!("{name}[{idx}]");
            match part {
                Value::String(part) => resolve(
                    Some(part.as_str()),
                    &element_name,
                    secondary.into(),
                    &secondary_config,
                ),
                other => Ok(other),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

fn convert_decoded(
    raw: Option<&str>,
    name: &str,
    wrapper: Wrapper,
    secondary: Primitive,
    options: &Options,
) -> Result<Value, Error> {
    let secondary_options = options.secondary_options();
    let config = validated(name, wrapper.into(), options)?;
    let secondary_config = validated(name, secondary.into(), &secondary_options)?;

    let Some(raw) = raw else {
        return resolve(None, name, secondary.into(), &secondary_config);
    };

    let decoded = match resolve(Some(raw), name, wrapper.into(), &config)? {
        Value::Binary(bytes) => bytes,
        other => panic!("{wrapper} decoded into {other:?}, this is an internal error"),
    };
    let text = String::from_utf8(decoded).map_err(|_| {
        let err = Error::conversion(
            name,
            wrapper.into(),
            "decoded value is not valid utf8".into(),
        );
        debug!(name, type_tag = %wrapper, "conversion failed: {err}");
        err
    })?;
    resolve(Some(text.as_str()), name, secondary.into(), &secondary_config)
}

fn validated(name: &str, type_tag: TypeTag, options: &Options) -> Result<NormalizedConfig, Error> {
    validate(type_tag, options).map_err(|reason| {
        let err = Error::config(name, type_tag, reason);
        debug!(name, type_tag = %type_tag, "invalid options: {err}");
        err
    })
}

fn resolve(
    raw: Option<&str>,
    name: &str,
    type_tag: TypeTag,
    config: &NormalizedConfig,
) -> Result<Value, Error> {
    let Some(raw) = raw else {
        trace!(name, type_tag = %type_tag, "value is absent, using the default");
        return Ok(config.default_value());
    };

    let folded = config.fold(raw);
    convert(&folded, &config.kind).map_err(|reason| {
        let err = Error::conversion(name, type_tag, reason);
        debug!(name, type_tag = %type_tag, "conversion failed: {err}");
        err
    })
}
