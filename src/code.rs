//! Evaluation of source code for the `code_erlang` and `code_elixir` types.
//!
//! There is no built-in evaluator. A conversion of these types must be given one with
//! [`crate::Options::evaluator`].
//!
//! # Safety of input
//!
//! An evaluator runs the value as a program. Never use these types on values an attacker can
//! set. Nothing here sandboxes the evaluation.

use crate::Value;
use std::fmt;

/// The syntax a piece of code is written in
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CodeSyntax {
    /// Erlang terms and expressions
    Erlang,
    /// Elixir expressions
    Elixir,
}

impl fmt::Display for CodeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Erlang => "erlang",
            Self::Elixir => "elixir",
        })
    }
}

/// Parses and evaluates source code in a given syntax
pub trait CodeEvaluator: Send + Sync {
    /// Evaluate the source, returning its value or a description of the syntax or evaluation
    /// error
    fn evaluate(&self, syntax: CodeSyntax, source: &str) -> Result<Value, String>;
}

impl fmt::Debug for dyn CodeEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("CodeEvaluator")
    }
}
