mod common;
use common::*;

use assert_matches::assert_matches;
use envcast::{
    convert_as, Duration, Error, LogLevel, Options, Primitive, Secondary, Timeout, TypeDescriptor,
    TypeTag, Value, Wrapper,
};
use rust_decimal::Decimal;

#[test]
fn test_integer_in_base() {
    assert_eq!(
        convert_as(Some("18EB"), "PORT", Primitive::Integer, &Options::new().base(16)),
        Ok(Value::Integer(6379))
    );
    assert_eq!(
        convert("-101", Primitive::Integer, Options::new().base(2)),
        Ok(Value::Integer(-5))
    );
    assert_eq!(
        convert("zz", Primitive::Integer, Options::new().base(36)),
        Ok(Value::Integer(1295))
    );
    assert_conversion_error!(
        convert("12abc", Primitive::Integer, Options::new()),
        ["could not convert `VAR` to integer"]
    );
    assert_conversion_error!(convert("", Primitive::Integer, Options::new()), ["`VAR`"]);
}

#[test]
fn test_absent_values() {
    // every primitive except those needing an evaluator
    for primitive in Primitive::ALL {
        if matches!(primitive, Primitive::CodeErlang | Primitive::CodeElixir) {
            continue;
        }
        let expected = match primitive {
            Primitive::Boolean => Value::Boolean(false),
            Primitive::Timeout => Value::Timeout(Timeout::Infinity),
            _ => Value::Nil,
        };
        assert_eq!(
            convert_absent(primitive, Options::new()),
            Ok(expected),
            "{primitive}"
        );
    }
    for wrapper in Wrapper::ALL {
        assert_eq!(convert_absent(wrapper, Options::new()), Ok(Value::Nil), "{wrapper}");
    }
}

#[test]
fn test_absent_values_with_defaults() {
    assert_eq!(
        convert_absent(Primitive::Integer, Options::new().default(7)),
        Ok(Value::Integer(7))
    );
    assert_eq!(
        convert_absent(Primitive::Boolean, Options::new().default(true)),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        convert_absent(Primitive::Timeout, Options::new().default("30s")),
        Ok(Value::Timeout(Timeout::Millis(30_000)))
    );
    assert_eq!(
        convert_absent(Primitive::LogLevel, Options::new().default("warn")),
        Ok(Value::LogLevel(LogLevel::Warning))
    );
    assert_eq!(
        convert_absent(Primitive::Charlist, Options::new().default("ab")),
        Ok(Value::Charlist(vec!['a', 'b']))
    );
    assert_eq!(
        convert_absent(Wrapper::Base64, Options::new().default("raw")),
        Ok(Value::Binary(b"raw".to_vec()))
    );
}

#[test]
fn test_config_errors_come_first() {
    // the options are checked even though the value is absent
    assert_config_error!(
        convert_absent(
            Primitive::Boolean,
            Options::new().truthy(["yes"]).falsy(["no"])
        ),
        ["invalid options for `VAR` as boolean", "`truthy` and `falsy` are mutually exclusive"]
    );
    assert_config_error!(
        convert("1", Primitive::Boolean, Options::new().truthy(["1"]).falsy(["0"])),
        ["`truthy` and `falsy` are mutually exclusive"]
    );
    assert_config_error!(
        convert("10", Primitive::Integer, Options::new().base(37)),
        ["invalid `base` value (must be an integer 2..36)"]
    );
    assert_config_error!(
        convert("x", Primitive::Atom, Options::new().downcase(true).upcase(true)),
        ["`downcase` and `upcase` are mutually exclusive"]
    );
}

#[test]
fn test_boolean() {
    let yes = |raw: &str, opts: Options| convert(raw, Primitive::Boolean, opts);
    assert_eq!(yes("true", Options::new()), Ok(Value::Boolean(true)));
    assert_eq!(yes("TRUE", Options::new()), Ok(Value::Boolean(true)));
    assert_eq!(yes("1", Options::new()), Ok(Value::Boolean(true)));
    assert_eq!(yes("yes", Options::new()), Ok(Value::Boolean(false)));
    assert_eq!(yes("", Options::new()), Ok(Value::Boolean(false)));
    assert_eq!(
        yes("TRUE", Options::new().downcase(false)),
        Ok(Value::Boolean(false))
    );
    assert_eq!(
        yes("Y", Options::new().truthy(["y", "yes"])),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        yes("maybe", Options::new().falsy(["n", "no"])),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        yes("NO", Options::new().falsy(["n", "no"])),
        Ok(Value::Boolean(false))
    );

    // the word lists are folded like the value
    assert_eq!(
        yes("YES", Options::new().truthy(["YES"])),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        yes("Off", Options::new().falsy(["Off"])),
        Ok(Value::Boolean(false))
    );
    assert_eq!(
        yes("yes", Options::new().upcase(true).truthy(["Yes"])),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        yes("yes", Options::new().downcase(false).truthy(["YES"])),
        Ok(Value::Boolean(false))
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        convert("1.5", Primitive::Float, Options::new()),
        Ok(Value::Float(1.5))
    );
    assert_eq!(
        convert("-2e3", Primitive::Float, Options::new()),
        Ok(Value::Float(-2000.0))
    );
    assert_conversion_error!(
        convert("1.5.", Primitive::Float, Options::new()),
        ["to float"]
    );
    assert_eq!(
        convert("0.10", Primitive::Decimal, Options::new()),
        Ok(Value::Decimal(Decimal::new(10, 2)))
    );
    assert_conversion_error!(
        convert("0.1x", Primitive::Decimal, Options::new()),
        ["to decimal"]
    );
}

#[test]
fn test_log_level_and_charlist() {
    assert_eq!(
        convert("Notice", Primitive::LogLevel, Options::new()),
        Ok(Value::LogLevel(LogLevel::Notice))
    );
    assert_conversion_error!(
        convert("verbose", Primitive::LogLevel, Options::new()),
        ["unknown log level"]
    );
    assert_eq!(
        convert("héllo", Primitive::Charlist, Options::new().upcase(true)),
        Ok(Value::Charlist("HÉLLO".chars().collect()))
    );
}

#[test]
fn test_timeout_and_duration() {
    assert_eq!(
        convert_as(None, "TIMEOUT", Primitive::Timeout, &Options::new()),
        Ok(Value::Timeout(Timeout::Infinity))
    );
    assert_eq!(
        convert("infinity", Primitive::Timeout, Options::new()),
        Ok(Value::Timeout(Timeout::Infinity))
    );
    assert_eq!(
        convert("INFINITY", Primitive::Timeout, Options::new().downcase(true)),
        Ok(Value::Timeout(Timeout::Infinity))
    );
    assert_eq!(
        convert("1d 2h", Primitive::Timeout, Options::new()),
        Ok(Value::Timeout(Timeout::Millis(93_600_000)))
    );
    assert_eq!(
        convert("3d 2h 100", Primitive::Timeout, Options::new()),
        Ok(Value::Timeout(Timeout::Millis(266_400_100)))
    );
    assert_conversion_error!(
        convert("100 3d", Primitive::Timeout, Options::new()),
        ["unsuffixed number must be at the end"]
    );
    assert_conversion_error!(
        convert("2d 3d", Primitive::Timeout, Options::new()),
        ["duplicate unit `day`"]
    );

    let value = convert("1_000ms", Primitive::Duration, Options::new()).unwrap();
    assert_matches!(value, Value::Duration(duration) => {
        assert_eq!(duration.as_millis(), Some(1000));
        assert_eq!(duration, "1000 milliseconds".parse::<Duration>().unwrap());
    });
    assert_conversion_error!(
        convert("2 weeks 1 week", Primitive::Duration, Options::new()),
        ["duplicate unit `week`"]
    );
}

#[test]
fn test_list() {
    assert_eq!(
        convert_as(
            Some("1,2,3"),
            "LIST",
            (Wrapper::List, Primitive::Integer),
            &Options::new()
        ),
        Ok(Value::list([1, 2, 3]))
    );
    assert_eq!(
        convert("a,b", Wrapper::List, Options::new()),
        Ok(Value::list(["a", "b"]))
    );
    assert_eq!(
        convert(" a ; b ", Wrapper::List, Options::new().delimiter(";")),
        Ok(Value::list([" a ", " b "]))
    );

    // the secondary options apply to each element
    assert_eq!(
        convert(
            "ff|10",
            (Wrapper::List, Primitive::Integer),
            Options::new()
                .delimiter("|")
                .secondary(Options::new().base(16))
        ),
        Ok(Value::list([255, 16]))
    );
}

#[test]
fn test_list_element_errors_are_indexed() {
    let result = convert_as(
        Some("1,x,3"),
        "PORTS",
        (Wrapper::List, Primitive::Integer),
        &Options::new(),
    );
    assert_matches!(&result, Err(Error::Conversion { name, type_tag, .. }) => {
        assert_eq!(name, "PORTS[1]");
        assert_eq!(*type_tag, TypeTag::Primitive(Primitive::Integer));
    });
    assert_error_contains_text!(result, ["`PORTS[1]`"]);

    // secondary options are validated even when there is nothing to convert
    assert_config_error!(
        convert_absent(
            (Wrapper::List, Primitive::Integer),
            Options::new().secondary(Options::new().base(1))
        ),
        ["as integer", "`base`"]
    );
}

#[test]
fn test_list_absent_uses_default_as_is() {
    assert_eq!(
        convert_absent((Wrapper::List, Primitive::Integer), Options::new()),
        Ok(Value::Nil)
    );
    assert_eq!(
        convert_absent(
            (Wrapper::List, Primitive::Integer),
            Options::new().default(Value::list(["not", "converted"]))
        ),
        Ok(Value::list(["not", "converted"]))
    );
}

#[test]
fn test_encoded_chains() {
    // "18EB" in base64
    assert_eq!(
        convert(
            "MThFQg==",
            (Wrapper::Base64, Primitive::Integer),
            Options::new().secondary(Options::new().base(16))
        ),
        Ok(Value::Integer(6379))
    );
    assert_eq!(
        convert("68656C6C6F", Wrapper::Base16, Options::new()),
        Ok(Value::Binary(b"hello".to_vec()))
    );
    assert_eq!(
        convert(
            "68656C6C6F",
            TypeDescriptor::Wrapped(Wrapper::Base16, Secondary::String),
            Options::new()
        ),
        Ok(Value::Binary(b"hello".to_vec()))
    );
    assert_eq!(
        convert("eyJhIjoxfQ", (Wrapper::UrlBase64, Primitive::Json), Options::new().padding(false)),
        Ok(Value::Json(serde_json::json!({"a": 1})))
    );

    // a decoding failure is reported against the wrapper, a conversion failure against the
    // secondary type
    assert_conversion_error!(
        convert("!!", (Wrapper::Base64, Primitive::Integer), Options::new()),
        ["to base64"]
    );
    assert_conversion_error!(
        convert("eA==", (Wrapper::Base64, Primitive::Integer), Options::new()),
        ["to integer"]
    );
    assert_conversion_error!(
        convert("/w==", (Wrapper::Base64, Primitive::Atom), Options::new()),
        ["to base64", "not valid utf8"]
    );

    // an absent value goes straight to the secondary type
    assert_eq!(
        convert_absent(
            (Wrapper::Base32, Primitive::Integer),
            Options::new().secondary(Options::new().default(4))
        ),
        Ok(Value::Integer(4))
    );
    assert_eq!(
        convert_absent((Wrapper::Hex32, Primitive::Boolean), Options::new()),
        Ok(Value::Boolean(false))
    );
}

#[test]
fn test_descriptor_from_str() {
    assert_eq!(
        "list:integer".parse::<TypeDescriptor>(),
        Ok(TypeDescriptor::wrapped(Wrapper::List, Primitive::Integer))
    );
    assert_eq!(
        convert("1;2", "list:float".parse::<TypeDescriptor>().unwrap(), Options::new().delimiter(";")),
        Ok(Value::list([1.0, 2.0]))
    );
}
