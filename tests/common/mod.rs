#![allow(unused, dead_code)]

use core::cmp::min;
use envcast::{Error, Options, TypeDescriptor, Value};

// Shorthand for a conversion of a present value
pub fn convert(
    raw: &str,
    descriptor: impl Into<TypeDescriptor>,
    opts: Options,
) -> Result<Value, Error> {
    envcast::convert_as(Some(raw), "VAR", descriptor, &opts)
}

// Shorthand for a conversion of an absent value
pub fn convert_absent(
    descriptor: impl Into<TypeDescriptor>,
    opts: Options,
) -> Result<Value, Error> {
    envcast::convert_as(None, "VAR", descriptor, &opts)
}

#[macro_export]
macro_rules! assert_multiline_eq {
    ($left:expr, $right:expr) => {
        assert_multiline_eq($left, $right, file!(), line!(), column!())
    };
}

pub fn assert_multiline_eq(left: &str, right: &str, file: &str, line: u32, col: u32) {
    let left = clean_trailing_spaces(left);
    let right = clean_trailing_spaces(right);

    if left != right {
        eprintln!("Assertion failed: Left != Right at {file}:{line}:{col}");
        eprintln!("Left:");
        eprintln!("{left}");
        eprintln!("Right:");
        eprintln!("{right}");

        let index = left
            .chars()
            .zip(right.chars())
            .position(|(left_char, right_char)| left_char != right_char)
            .unwrap_or_else(|| min(left.len(), right.len()));
        eprintln!("First difference at index = {index}");
        panic!("assertion failed");
    }
}

// Remove spaces at the end of each line
fn clean_trailing_spaces(arg: &str) -> String {
    arg.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

#[macro_export]
macro_rules! assert_error_contains_text {
    ($left:expr, $right:expr) => {
        assert_error_contains_text(&$left, &$right, &[], file!(), line!(), column!())
    };
    ($left:expr, $yes:expr, not $no:expr) => {
        assert_error_contains_text(&$left, &$yes, &$no, file!(), line!(), column!())
    };
}

pub fn assert_error_contains_text<T: core::fmt::Debug>(
    left: &Result<T, Error>,
    yes: &[&str],
    no: &[&str],
    file: &str,
    line: u32,
    col: u32,
) {
    let err_text = match left {
        Ok(_) => {
            panic!("Assertion failed: expected error at {file}:{line}:{col}, found {left:#?}");
        }
        Err(e) => e.to_string(),
    };
    for substr in yes {
        if !err_text.contains(substr) {
            eprintln!(
                "Assertion failed: error does not contain expected text at {file}:{line}:{col}"
            );
            eprintln!("Error text:");
            eprintln!("{err_text}");
            eprintln!("Expected substring:");
            eprintln!("{substr}");
            panic!("assertion failed");
        }
    }
    for substr in no {
        if err_text.contains(substr) {
            eprintln!("Assertion failed: error contains bad text at {file}:{line}:{col}");
            eprintln!("Error text:");
            eprintln!("{err_text}");
            eprintln!("Bad substring:");
            eprintln!("{substr}");
            panic!("assertion failed");
        }
    }
}

// Check the kind of an error as well as its text
#[macro_export]
macro_rules! assert_config_error {
    ($left:expr, $right:expr) => {{
        let left = $left;
        assert!(
            matches!(left, Err(envcast::Error::Config { .. })),
            "expected a config error, found {left:?}"
        );
        assert_error_contains_text!(left, $right);
    }};
}

#[macro_export]
macro_rules! assert_conversion_error {
    ($left:expr, $right:expr) => {{
        let left = $left;
        assert!(
            matches!(left, Err(envcast::Error::Conversion { .. })),
            "expected a conversion error, found {left:?}"
        );
        assert_error_contains_text!(left, $right);
    }};
}
