//! Splitting for the `list` type.

use regex::Regex;

/// What a list is split on
#[derive(Clone, Debug)]
pub enum Delimiter {
    /// A literal string
    Literal(String),
    /// Any of several literal strings. Where several match at the same place, the longest wins.
    AnyOf(Vec<String>),
    /// A regular expression
    Pattern(Regex),
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::Literal(",".into())
    }
}

impl From<&str> for Delimiter {
    fn from(src: &str) -> Self {
        Self::Literal(src.to_owned())
    }
}

impl From<String> for Delimiter {
    fn from(src: String) -> Self {
        Self::Literal(src)
    }
}

impl From<Vec<&str>> for Delimiter {
    fn from(src: Vec<&str>) -> Self {
        Self::AnyOf(src.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for Delimiter {
    fn from(src: Vec<String>) -> Self {
        Self::AnyOf(src)
    }
}

impl From<Regex> for Delimiter {
    fn from(src: Regex) -> Self {
        Self::Pattern(src)
    }
}

/// The most parts a list is split into
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Parts {
    /// At most this many. The last part holds the unsplit remainder.
    Count(i64),
    /// No limit
    #[default]
    Unbounded,
}

impl From<i64> for Parts {
    fn from(src: i64) -> Self {
        Self::Count(src)
    }
}

/// A capture group of a regular expression delimiter
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Group {
    /// By index, `0` being the whole match
    Index(usize),
    /// By name
    Name(String),
}

/// Which part of each regular expression match is the delimiter
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum On {
    /// The whole match
    #[default]
    First,
    /// Every capture group, but not the whole match
    AllButFirst,
    /// Every named capture group
    AllNames,
    /// These capture groups
    Groups(Vec<Group>),
}

/// Validated splitting settings
#[derive(Clone, Debug)]
pub struct Splitting {
    /// What to split on
    pub delimiter: Delimiter,
    /// Most parts, `None` for no limit
    pub parts: Option<usize>,
    /// Drop empty parts
    pub trim: bool,
    /// Which part of a regex match is the delimiter
    pub on: On,
    /// Keep delimiter text in the output, between the parts
    pub include_captures: bool,
}

/// Split a value. This cannot fail, splitting an empty string gives `[""]` (or `[]` with `trim`).
pub fn split(value: &str, settings: &Splitting) -> Vec<String> {
    let spans = delimiter_spans(value, settings);

    let mut out = Vec::new();
    let mut parts = 0;
    let mut start = 0;
    for (span_start, span_end) in spans {
        // Overlapping capture groups are skipped
        if span_start < start {
            continue;
        }
        if settings.parts.is_some_and(|max| parts + 1 >= max) {
            break;
        }
        let piece = &value[start..span_start];
        if !(settings.trim && piece.is_empty()) {
            out.push(piece.to_owned());
            parts += 1;
        }
        if settings.include_captures {
            out.push(value[span_start..span_end].to_owned());
        }
        start = span_end;
    }

    let rest = &value[start..];
    if !(settings.trim && rest.is_empty()) {
        out.push(rest.to_owned());
    }
    out
}

// Byte ranges of the delimiters, in order
fn delimiter_spans(value: &str, settings: &Splitting) -> Vec<(usize, usize)> {
    match &settings.delimiter {
        Delimiter::Literal(literal) => value
            .match_indices(literal.as_str())
            .map(|(idx, m)| (idx, idx + m.len()))
            .collect(),
        Delimiter::AnyOf(literals) => any_of_spans(value, literals),
        Delimiter::Pattern(regex) => regex_spans(value, regex, &settings.on),
    }
}

fn any_of_spans(value: &str, literals: &[String]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut idx = 0;
    while idx < value.len() {
        let rest = &value[idx..];
        let longest = literals
            .iter()
            .filter(|literal| rest.starts_with(literal.as_str()))
            .map(String::len)
            .max();
        match longest {
            Some(len) => {
                spans.push((idx, idx + len));
                idx += len;
            }
            None => {
                idx += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    spans
}

fn regex_spans(value: &str, regex: &Regex, on: &On) -> Vec<(usize, usize)> {
    if *on == On::First {
        return regex
            .find_iter(value)
            .map(|m| (m.start(), m.end()))
            .collect();
    }

    let indices: Vec<usize> = match on {
        On::First => vec![0],
        On::AllButFirst => (1..regex.captures_len()).collect(),
        On::AllNames => regex
            .capture_names()
            .enumerate()
            .filter_map(|(idx, name)| name.map(|_| idx))
            .collect(),
        On::Groups(groups) => groups
            .iter()
            .filter_map(|group| match group {
                Group::Index(idx) => Some(*idx),
                Group::Name(name) => regex.capture_names().position(|n| n == Some(name.as_str())),
            })
            .collect(),
    };

    let mut spans = Vec::new();
    for captures in regex.captures_iter(value) {
        let mut matched: Vec<(usize, usize)> = indices
            .iter()
            .filter_map(|idx| captures.get(*idx))
            .map(|m| (m.start(), m.end()))
            .collect();
        matched.sort_unstable();
        spans.extend(matched);
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(delimiter: impl Into<Delimiter>) -> Splitting {
        Splitting {
            delimiter: delimiter.into(),
            parts: None,
            trim: false,
            on: On::First,
            include_captures: false,
        }
    }

    #[test]
    fn test_split_literal() {
        let s = settings(",");
        assert_eq!(split("1,2,3", &s), vec!["1", "2", "3"]);
        assert_eq!(split("", &s), vec![""]);
        assert_eq!(split(",a,,b,", &s), vec!["", "a", "", "b", ""]);
        assert_eq!(split("a", &s), vec!["a"]);

        let s = settings(", ");
        assert_eq!(split("a, b,c", &s), vec!["a", "b,c"]);
    }

    #[test]
    fn test_split_trim() {
        let s = Splitting {
            trim: true,
            ..settings(",")
        };
        assert_eq!(split(",a,,b,", &s), vec!["a", "b"]);
        assert_eq!(split("", &s), Vec::<String>::new());
    }

    #[test]
    fn test_split_parts() {
        let s = Splitting {
            parts: Some(2),
            ..settings(",")
        };
        assert_eq!(split("a,b,c", &s), vec!["a", "b,c"]);
        assert_eq!(split("a", &s), vec!["a"]);

        let s = Splitting {
            parts: Some(1),
            ..settings(",")
        };
        assert_eq!(split("a,b,c", &s), vec!["a,b,c"]);

        // empty parts dropped by trim do not count
        let s = Splitting {
            parts: Some(2),
            trim: true,
            ..settings(",")
        };
        assert_eq!(split(",,a,b,c", &s), vec!["a", "b,c"]);
    }

    #[test]
    fn test_split_any_of() {
        let s = settings(vec![",", ";", ";;"]);
        assert_eq!(split("a,b;c;;d", &s), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_regex() {
        let s = settings(Regex::new(r"\s*[,;]\s*").unwrap());
        assert_eq!(split("a , b;c", &s), vec!["a", "b", "c"]);

        let s = Splitting {
            include_captures: true,
            ..settings(Regex::new(r"[,;]").unwrap())
        };
        assert_eq!(split("a,b;c", &s), vec!["a", ",", "b", ";", "c"]);
    }

    #[test]
    fn test_split_regex_groups() {
        // split only on the `-` between digits, leaving the digits in place
        let regex = Regex::new(r"\d(-)\d").unwrap();
        let s = Splitting {
            on: On::AllButFirst,
            ..settings(regex.clone())
        };
        assert_eq!(split("a1-2b", &s), vec!["a1", "2b"]);

        let s = Splitting {
            on: On::Groups(vec![Group::Index(1)]),
            ..settings(regex)
        };
        assert_eq!(split("a1-2b", &s), vec!["a1", "2b"]);

        let regex = Regex::new(r"x(?<sep>\|)y").unwrap();
        let s = Splitting {
            on: On::AllNames,
            include_captures: true,
            ..settings(regex.clone())
        };
        assert_eq!(split("ax|yb", &s), vec!["ax", "|", "yb"]);

        let s = Splitting {
            on: On::Groups(vec![Group::Name("sep".into())]),
            ..settings(regex)
        };
        assert_eq!(split("ax|yb", &s), vec!["ax", "yb"]);
    }
}
