//! Optional case normalization which runs before a raw value is converted.

use std::borrow::Cow;

/// How a casefold direction is applied. This mirrors the modes of unicode case mapping.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CaseMode {
    /// Do not change case
    #[default]
    Off,
    /// Unicode case mapping, one character at a time
    Default,
    /// Only map `A-Z` / `a-z`
    Ascii,
    /// Unicode case mapping, with the context-sensitive greek final sigma when downcasing
    Greek,
    /// Unicode case mapping, with dotted and dotless `i` handled as in Turkish and Azeri
    Turkic,
}

impl From<bool> for CaseMode {
    fn from(src: bool) -> Self {
        if src {
            Self::Default
        } else {
            Self::Off
        }
    }
}

/// A validated casefold: at most one direction, with its mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Casefold {
    /// Lowercase the value
    Down(CaseMode),
    /// Uppercase the value
    Up(CaseMode),
}

impl Casefold {
    /// Apply this casefold to a value
    pub fn apply<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match *self {
            Self::Down(mode) => downcase(value, mode),
            Self::Up(mode) => upcase(value, mode),
        }
    }
}

fn downcase(value: &str, mode: CaseMode) -> Cow<'_, str> {
    match mode {
        CaseMode::Off => Cow::Borrowed(value),
        CaseMode::Ascii => Cow::Owned(value.to_ascii_lowercase()),
        CaseMode::Default => Cow::Owned(value.chars().flat_map(char::to_lowercase).collect()),
        // str::to_lowercase maps a word-final sigma to ς
        CaseMode::Greek => Cow::Owned(value.to_lowercase()),
        CaseMode::Turkic => {
            let mut out = String::with_capacity(value.len());
            for c in value.chars() {
                match c {
                    'I' => out.push('ı'),
                    'İ' => out.push('i'),
                    other => out.extend(other.to_lowercase()),
                }
            }
            Cow::Owned(out)
        }
    }
}

fn upcase(value: &str, mode: CaseMode) -> Cow<'_, str> {
    match mode {
        CaseMode::Off => Cow::Borrowed(value),
        CaseMode::Ascii => Cow::Owned(value.to_ascii_uppercase()),
        CaseMode::Default | CaseMode::Greek => Cow::Owned(value.to_uppercase()),
        CaseMode::Turkic => {
            let mut out = String::with_capacity(value.len());
            for c in value.chars() {
                match c {
                    'i' => out.push('İ'),
                    'ı' => out.push('I'),
                    other => out.extend(other.to_uppercase()),
                }
            }
            Cow::Owned(out)
        }
    }
}
