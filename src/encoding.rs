//! RFC 4648 decoding for the base16, base32, hex32, base64 and url_base64 types.

use crate::Wrapper;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};

/// Which letter case an encoded value may use. Base64 alphabets are case-sensitive and ignore this.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Case {
    /// Only uppercase letters
    #[default]
    Upper,
    /// Only lowercase letters
    Lower,
    /// Either
    Mixed,
}

/// Validated decoding settings
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Decoding {
    /// Letter case (base16 and base32 only)
    pub case: Case,
    /// If true, padding is required. If false, it is optional.
    pub padding: bool,
    /// Strip ascii whitespace before decoding (base64 only)
    pub ignore_whitespace: bool,
}

const BASE32: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const HEX32: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";

/// Decode a value with one of the encoding wrappers. `List` is not an encoding and always fails.
pub fn decode(wrapper: Wrapper, value: &str, settings: &Decoding) -> Result<Vec<u8>, String> {
    match wrapper {
        Wrapper::Base16 => decode16(value, settings.case),
        Wrapper::Base32 => decode32(value, BASE32, settings),
        Wrapper::Hex32 => decode32(value, HEX32, settings),
        Wrapper::Base64 => decode64(value, &alphabet::STANDARD, settings),
        Wrapper::UrlBase64 => decode64(value, &alphabet::URL_SAFE, settings),
        Wrapper::List => Err("list is not an encoding".into()),
    }
}

// Look up a symbol in an uppercase alphabet, honoring the configured letter case
fn symbol_value(alphabet: &[u8], symbol: u8, case: Case) -> Option<u8> {
    let upper = match (case, symbol) {
        (Case::Upper, b'a'..=b'z') => return None,
        (Case::Lower, b'A'..=b'Z') => return None,
        (_, b'a'..=b'z') => symbol.to_ascii_uppercase(),
        (_, other) => other,
    };
    alphabet
        .iter()
        .position(|c| *c == upper)
        .and_then(|pos| u8::try_from(pos).ok())
}

// `hex` accepts either case, so the configured case is checked first
fn decode16(value: &str, case: Case) -> Result<Vec<u8>, String> {
    let wrong_case = match case {
        Case::Upper => value.bytes().any(|b| b.is_ascii_lowercase()),
        Case::Lower => value.bytes().any(|b| b.is_ascii_uppercase()),
        Case::Mixed => false,
    };
    if wrong_case {
        return Err("invalid base16 digit (wrong letter case)".into());
    }
    hex::decode(value).map_err(|err| err.to_string())
}

fn decode32(value: &str, alphabet: &[u8; 32], settings: &Decoding) -> Result<Vec<u8>, String> {
    let data = value.trim_end_matches('=');
    let pad_len = value.len() - data.len();
    let remainder = data.len() % 8;
    let expected_pad = match remainder {
        0 => 0,
        2 => 6,
        4 => 4,
        5 => 3,
        7 => 1,
        _ => return Err("invalid base32 length".into()),
    };
    // Padding is all or nothing. Without `padding`, it may be omitted entirely.
    if pad_len != expected_pad && (settings.padding || pad_len != 0) {
        return Err("invalid base32 padding".into());
    }

    let mut out = Vec::with_capacity(data.len() * 5 / 8);
    let mut buffer = 0u64;
    let mut bits = 0u32;
    for symbol in data.bytes() {
        let v = symbol_value(alphabet, symbol, settings.case)
            .ok_or_else(|| "invalid base32 digit".to_owned())?;
        buffer = buffer << 5 | u64::from(v);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
        }
    }
    // Leftover bits of the last symbol must be zero in a canonical encoding
    if buffer & ((1 << bits) - 1) != 0 {
        return Err("invalid base32 trailing bits".into());
    }
    Ok(out)
}

fn decode64(
    value: &str,
    alphabet: &alphabet::Alphabet,
    settings: &Decoding,
) -> Result<Vec<u8>, String> {
    let padding_mode = if settings.padding {
        DecodePaddingMode::RequireCanonical
    } else {
        DecodePaddingMode::Indifferent
    };
    let engine = GeneralPurpose::new(
        alphabet,
        GeneralPurposeConfig::new().with_decode_padding_mode(padding_mode),
    );

    let result = if settings.ignore_whitespace {
        let compact: String = value
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        engine.decode(compact)
    } else {
        engine.decode(value)
    };
    result.map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(case: Case, padding: bool) -> Decoding {
        Decoding {
            case,
            padding,
            ignore_whitespace: true,
        }
    }

    #[test]
    fn test_decode16() {
        let upper = settings(Case::Upper, true);
        assert_eq!(decode(Wrapper::Base16, "DEADBEEF", &upper).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(decode(Wrapper::Base16, "deadbeef", &upper).is_err());
        assert!(decode(Wrapper::Base16, "ABC", &upper).is_err());
        assert!(decode(Wrapper::Base16, "0G", &upper).is_err());
        assert!(decode(Wrapper::Base16, "0a", &upper).is_err());

        let lower = settings(Case::Lower, true);
        assert_eq!(decode(Wrapper::Base16, "deadbeef", &lower).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(decode(Wrapper::Base16, "DEADBEEF", &lower).is_err());

        let mixed = settings(Case::Mixed, true);
        assert_eq!(decode(Wrapper::Base16, "DeAdBeEf", &mixed).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode(Wrapper::Base16, "", &mixed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode32() {
        let padded = settings(Case::Upper, true);
        assert_eq!(decode(Wrapper::Base32, "MZXW6===", &padded).unwrap(), b"foo");
        assert_eq!(decode(Wrapper::Base32, "MZXW6YTBOI======", &padded).unwrap(), b"foobar");
        assert_eq!(decode(Wrapper::Base32, "MZXW6YQ=", &padded).unwrap(), b"foob");
        assert!(decode(Wrapper::Base32, "MZXW6", &padded).is_err());
        assert!(decode(Wrapper::Base32, "MZXW6==", &padded).is_err());
        assert!(decode(Wrapper::Base32, "mzxw6===", &padded).is_err());
        assert!(decode(Wrapper::Base32, "MZXW6Y1=", &padded).is_err());
        assert!(decode(Wrapper::Base32, "MZXW7===", &padded).is_err());
        assert!(decode(Wrapper::Base32, "M3======", &padded).is_err());
        assert_eq!(decode(Wrapper::Base32, "MY======", &padded).unwrap(), b"f");

        let unpadded = settings(Case::Mixed, false);
        assert_eq!(decode(Wrapper::Base32, "MZXW6", &unpadded).unwrap(), b"foo");
        assert_eq!(decode(Wrapper::Base32, "mzxw6===", &unpadded).unwrap(), b"foo");
        assert!(decode(Wrapper::Base32, "MZXW6=", &unpadded).is_err());
        assert!(decode(Wrapper::Base32, "MZX", &unpadded).is_err());
    }

    #[test]
    fn test_decode_hex32() {
        let padded = settings(Case::Upper, true);
        assert_eq!(decode(Wrapper::Hex32, "CPNMU===", &padded).unwrap(), b"foo");
        assert_eq!(decode(Wrapper::Hex32, "CPNMUOJ1E8======", &padded).unwrap(), b"foobar");
    }

    #[test]
    fn test_decode64() {
        let padded = settings(Case::Upper, true);
        assert_eq!(decode(Wrapper::Base64, "Zm9vYg==", &padded).unwrap(), b"foob");
        assert_eq!(decode(Wrapper::Base64, "Zm9v\nYg==", &padded).unwrap(), b"foob");
        assert!(decode(Wrapper::Base64, "Zm9vYg", &padded).is_err());

        let unpadded = settings(Case::Upper, false);
        assert_eq!(decode(Wrapper::Base64, "Zm9vYg", &unpadded).unwrap(), b"foob");
        assert_eq!(decode(Wrapper::Base64, "Zm9vYg==", &unpadded).unwrap(), b"foob");

        let strict = Decoding {
            ignore_whitespace: false,
            ..padded
        };
        assert!(decode(Wrapper::Base64, "Zm9v\nYg==", &strict).is_err());

        assert_eq!(decode(Wrapper::UrlBase64, "-_8=", &padded).unwrap(), vec![0xfb, 0xff]);
        assert!(decode(Wrapper::Base64, "-_8=", &padded).is_err());
    }
}
