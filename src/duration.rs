//! A grammar for human-friendly duration and timeout literals, such as `3d 2h 5m`, `30s` or
//! `1_500`.
//!
//! A literal is a sequence of components separated by optional whitespace. Each component is a
//! magnitude (digits, with `_` allowed as a separator after the first digit), optionally followed
//! by whitespace and a lowercase unit suffix:
//!
//! | unit        | suffixes                              |
//! |-------------|---------------------------------------|
//! | week        | `w`, `week`, `weeks`                  |
//! | day         | `d`, `day`, `days`                    |
//! | hour        | `h`, `hour`, `hours`                  |
//! | minute      | `m`, `minute`, `minutes`              |
//! | second      | `s`, `second`, `seconds`              |
//! | millisecond | `ms`, `millisecond`, `milliseconds`   |
//!
//! A component without a suffix counts milliseconds, and must be the last component.
//! Each unit may appear at most once. Trailing whitespace is allowed, and the whole input must be
//! consumed.

use std::{fmt, str::FromStr};

/// A unit of a duration component
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum Unit {
    /// Seven days
    Week,
    /// Twenty four hours
    Day,
    /// Sixty minutes
    Hour,
    /// Sixty seconds
    Minute,
    /// A thousand milliseconds
    Second,
    /// The smallest unit
    Millisecond,
}

impl Unit {
    /// All units, largest first
    pub const ALL: [Unit; 6] = [
        Self::Week,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Millisecond,
    ];

    /// Singular name of the unit
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Millisecond => "millisecond",
        }
    }

    /// Shortest suffix of the unit
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Week => "w",
            Self::Day => "d",
            Self::Hour => "h",
            Self::Minute => "m",
            Self::Second => "s",
            Self::Millisecond => "ms",
        }
    }

    /// Length of one of this unit, in milliseconds
    pub fn millis(&self) -> u64 {
        match self {
            Self::Week => 7 * Self::Day.millis(),
            Self::Day => 24 * Self::Hour.millis(),
            Self::Hour => 60 * Self::Minute.millis(),
            Self::Minute => 60 * Self::Second.millis(),
            Self::Second => 1000,
            Self::Millisecond => 1,
        }
    }

    /// Look up a unit by its singular or plural name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| {
            let singular = unit.as_str();
            name == singular || name.strip_suffix('s') == Some(singular)
        })
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a component was written with a unit suffix
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum Explicitness {
    /// Written with a suffix
    Explicit,
    /// A bare number, counting milliseconds
    Implicit,
}

/// One `magnitude unit` pair of a duration literal
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DurationComponent {
    /// The unit
    pub unit: Unit,
    /// How many of the unit
    pub magnitude: u64,
    /// Whether the unit was written out
    pub explicitness: Explicitness,
}

impl DurationComponent {
    /// A component written with a unit suffix
    pub fn explicit(unit: Unit, magnitude: u64) -> Self {
        Self {
            unit,
            magnitude,
            explicitness: Explicitness::Explicit,
        }
    }

    /// A bare number of milliseconds
    pub fn implicit(magnitude: u64) -> Self {
        Self {
            unit: Unit::Millisecond,
            magnitude,
            explicitness: Explicitness::Implicit,
        }
    }

    /// Length of this component in milliseconds, if it fits
    pub fn checked_millis(&self) -> Option<u64> {
        self.magnitude.checked_mul(self.unit.millis())
    }
}

/// An error produced by the duration grammar
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The input was empty
    #[error("expected a duration, found an empty string")]
    Empty,
    /// The input had an unexpected character
    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected {
        /// Byte offset of the character
        offset: usize,
        /// The character
        found: char,
    },
    /// A magnitude does not fit in 64 bits
    #[error("number too large")]
    Overflow,
    /// A unit appeared more than once
    #[error("duplicate unit `{0}`")]
    DuplicateUnit(Unit),
    /// A bare number was followed by another component
    #[error("unsuffixed number must be at the end")]
    UnsuffixedNotLast,
}

// Longer spellings come first so that `ms` is never read as `m` followed by junk, and `minutes`
// is never read as `m`.
const SUFFIXES: &[(&str, Unit)] = &[
    ("milliseconds", Unit::Millisecond),
    ("millisecond", Unit::Millisecond),
    ("ms", Unit::Millisecond),
    ("minutes", Unit::Minute),
    ("minute", Unit::Minute),
    ("m", Unit::Minute),
    ("seconds", Unit::Second),
    ("second", Unit::Second),
    ("s", Unit::Second),
    ("weeks", Unit::Week),
    ("week", Unit::Week),
    ("w", Unit::Week),
    ("days", Unit::Day),
    ("day", Unit::Day),
    ("d", Unit::Day),
    ("hours", Unit::Hour),
    ("hour", Unit::Hour),
    ("h", Unit::Hour),
];

/// Parse a duration literal into its components, in input order
pub fn parse(input: &str) -> Result<Vec<DurationComponent>, ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut cursor = Cursor { input, pos: 0 };
    let mut components = Vec::new();

    while !cursor.at_end() {
        let magnitude = cursor.magnitude()?;
        cursor.skip_whitespace();
        let component = match cursor.suffix() {
            Some(unit) => {
                cursor.skip_whitespace();
                DurationComponent::explicit(unit, magnitude)
            }
            None => DurationComponent::implicit(magnitude),
        };
        components.push(component);
    }

    validate(&components)?;
    Ok(components)
}

/// Fold components into a total number of milliseconds, if it fits in 64 bits
pub fn to_millis(components: &[DurationComponent]) -> Option<u64> {
    components.iter().try_fold(0u64, |total, component| {
        total.checked_add(component.checked_millis()?)
    })
}

fn validate(components: &[DurationComponent]) -> Result<(), ParseError> {
    let last = components.len().saturating_sub(1);
    if components
        .iter()
        .enumerate()
        .any(|(idx, c)| c.explicitness == Explicitness::Implicit && idx != last)
    {
        return Err(ParseError::UnsuffixedNotLast);
    }

    let mut seen = Vec::with_capacity(components.len());
    for component in components {
        if seen.contains(&component.unit) {
            return Err(ParseError::DuplicateUnit(component.unit));
        }
        seen.push(component.unit);
    }
    Ok(())
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn unexpected(&self) -> ParseError {
        match self.rest().chars().next() {
            Some(found) => ParseError::Unexpected {
                offset: self.pos,
                found,
            },
            None => ParseError::Empty,
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_whitespace()).len();
    }

    // A digit, followed by any run of digits and underscores
    fn magnitude(&mut self) -> Result<u64, ParseError> {
        let rest = self.rest();
        if !rest.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.unexpected());
        }

        let mut value = 0u64;
        let mut consumed = 0;
        for b in rest.bytes() {
            match b {
                b'0'..=b'9' => {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u64::from(b - b'0')))
                        .ok_or(ParseError::Overflow)?;
                }
                b'_' => {}
                _ => break,
            }
            consumed += 1;
        }
        self.pos += consumed;
        Ok(value)
    }

    fn suffix(&mut self) -> Option<Unit> {
        let rest = self.rest();
        let (text, unit) = SUFFIXES
            .iter()
            .find(|(text, _)| rest.starts_with(text))?;
        self.pos += text.len();
        Some(*unit)
    }
}

/// A parsed duration literal, kept as its components rather than folded into one number.
///
/// This is the result of the `duration` conversion. It can be turned into a
/// [`std::time::Duration`] when the total fits.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Duration {
    components: Vec<DurationComponent>,
}

impl Duration {
    /// Make a duration from components.
    ///
    /// The components are not checked against the grammar's rules, so a duration built this way
    /// may repeat a unit.
    pub fn from_components(components: Vec<DurationComponent>) -> Self {
        Self { components }
    }

    /// The components, in the order they were written
    pub fn components(&self) -> &[DurationComponent] {
        &self.components
    }

    /// The magnitude of a given unit, if that unit appears
    pub fn get(&self, unit: Unit) -> Option<u64> {
        self.components
            .iter()
            .find(|c| c.unit == unit)
            .map(|c| c.magnitude)
    }

    /// Total length in milliseconds, if it fits in 64 bits
    pub fn as_millis(&self) -> Option<u64> {
        to_millis(&self.components)
    }

    /// Convert to a `std::time::Duration`, if the total fits
    pub fn to_std(&self) -> Option<std::time::Duration> {
        self.as_millis().map(std::time::Duration::from_millis)
    }
}

impl FromStr for Duration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).map(Self::from_components)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (idx, component) in self.components.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", component.magnitude)?;
            if component.explicitness == Explicitness::Explicit {
                f.write_str(component.unit.abbreviation())?;
            }
        }
        Ok(())
    }
}
