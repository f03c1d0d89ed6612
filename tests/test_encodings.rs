mod common;
use common::*;

use base64::{engine::general_purpose, Engine};
use envcast::{Case, Options, Value, Wrapper};

const SAMPLES: &[&[u8]] = &[
    b"",
    b"f",
    b"fo",
    b"foo",
    b"foob",
    b"fooba",
    b"foobar",
    &[0, 255, 128, 1, 254],
    &[0xde, 0xad, 0xbe, 0xef, 0x00, 0x11, 0x22, 0x33, 0x44],
];

fn encode16(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

fn encode32(bytes: &[u8], alphabet: &[u8; 32], padding: bool) -> String {
    let mut out = String::new();
    for chunk in bytes.chunks(5) {
        let mut block = [0u8; 5];
        block[..chunk.len()].copy_from_slice(chunk);
        let bits = block.iter().fold(0u64, |acc, b| acc << 8 | u64::from(*b));
        let symbols = match chunk.len() {
            1 => 2,
            2 => 4,
            3 => 5,
            4 => 7,
            _ => 8,
        };
        for idx in 0..symbols {
            let v = (bits >> (35 - 5 * idx)) & 0x1f;
            out.push(char::from(alphabet[v as usize]));
        }
        if padding {
            out.extend(std::iter::repeat('=').take(8 - symbols));
        }
    }
    out
}

const BASE32: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const HEX32: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";

fn decoded(raw: &str, wrapper: Wrapper, opts: Options) -> Vec<u8> {
    match convert(raw, wrapper, opts) {
        Ok(Value::Binary(bytes)) => bytes,
        other => panic!("{wrapper} of {raw:?}: {other:?}"),
    }
}

#[test]
fn test_base16_round_trip() {
    for sample in SAMPLES {
        let upper = encode16(sample);
        let lower = upper.to_lowercase();
        assert_eq!(decoded(&upper, Wrapper::Base16, Options::new()), *sample);
        assert_eq!(
            decoded(&lower, Wrapper::Base16, Options::new().case(Case::Lower)),
            *sample
        );
        assert_eq!(
            decoded(&lower, Wrapper::Base16, Options::new().case(Case::Mixed)),
            *sample
        );
    }
    assert_conversion_error!(
        convert("abcd", Wrapper::Base16, Options::new()),
        ["to base16", "wrong letter case"]
    );
    assert_conversion_error!(
        convert("ABC", Wrapper::Base16, Options::new().case(Case::Mixed)),
        ["to base16"]
    );
    assert_conversion_error!(
        convert("0g", Wrapper::Base16, Options::new().case(Case::Lower)),
        ["to base16"]
    );
}

#[test]
fn test_base32_round_trip() {
    for (wrapper, alphabet) in [(Wrapper::Base32, BASE32), (Wrapper::Hex32, HEX32)] {
        for sample in SAMPLES {
            let padded = encode32(sample, alphabet, true);
            let unpadded = encode32(sample, alphabet, false);
            assert_eq!(decoded(&padded, wrapper, Options::new()), *sample);
            assert_eq!(
                decoded(&unpadded, wrapper, Options::new().padding(false)),
                *sample
            );
            assert_eq!(
                decoded(
                    &padded.to_lowercase(),
                    wrapper,
                    Options::new().case(Case::Lower)
                ),
                *sample
            );
        }
    }
    assert_conversion_error!(
        convert("MZXW6", Wrapper::Base32, Options::new()),
        ["to base32"]
    );
    // non-zero trailing bits
    assert_conversion_error!(
        convert("MZXW7===", Wrapper::Base32, Options::new()),
        ["to base32", "trailing bits"]
    );
    assert_conversion_error!(
        convert("M3======", Wrapper::Base32, Options::new()),
        ["to base32"]
    );
}

#[test]
fn test_base64_round_trip() {
    for sample in SAMPLES {
        let standard = general_purpose::STANDARD.encode(sample);
        let url = general_purpose::URL_SAFE_NO_PAD.encode(sample);
        assert_eq!(decoded(&standard, Wrapper::Base64, Options::new()), *sample);
        assert_eq!(
            decoded(&url, Wrapper::UrlBase64, Options::new().padding(false)),
            *sample
        );
    }
}

#[test]
fn test_base64_whitespace() {
    let wrapped = "Zm9v\nYmFy\n";
    assert_eq!(decoded(wrapped, Wrapper::Base64, Options::new()), b"foobar");
    assert_conversion_error!(
        convert(wrapped, Wrapper::Base64, Options::new().ignore_whitespace(false)),
        ["to base64"]
    );
}
