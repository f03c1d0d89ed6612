//! Pluggable json decoding for the `json` type.

use crate::Value;
use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

/// A json decoder, the equivalent of a decoding module.
pub trait JsonDecoder: Send + Sync {
    /// Decode a document. The returned value must be json-representable
    /// (see [`Value::to_json`]) for the conversion to succeed.
    fn decode(&self, src: &str) -> Result<Value, String>;
}

impl fmt::Debug for dyn JsonDecoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("JsonDecoder")
    }
}

/// The default decoder, backed by `serde_json`
#[derive(Clone, Copy, Debug, Default)]
pub struct SerdeJson;

impl JsonDecoder for SerdeJson {
    fn decode(&self, src: &str) -> Result<Value, String> {
        serde_json::from_str::<serde_json::Value>(src)
            .map(Value::Json)
            .map_err(|err| err.to_string())
    }
}

type DecodeFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;
type ApplyFn = dyn Fn(&str, &[Value]) -> Result<Value, String> + Send + Sync;

/// How a `json` conversion decodes its input.
///
/// An engine which panics is treated like one which returned an error.
#[derive(Clone)]
pub enum JsonEngine {
    /// A function of the document
    Function(Arc<DecodeFn>),
    /// A decoder
    Decoder(Arc<dyn JsonDecoder>),
    /// A function of the document and some extra arguments, which are passed after it
    Apply {
        /// The function
        function: Arc<ApplyFn>,
        /// Extra arguments
        args: Vec<Value>,
    },
}

impl JsonEngine {
    /// An engine calling this function
    pub fn function(f: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    /// An engine calling this decoder
    pub fn decoder(decoder: impl JsonDecoder + 'static) -> Self {
        Self::Decoder(Arc::new(decoder))
    }

    /// An engine calling this function with extra arguments
    pub fn apply(
        function: impl Fn(&str, &[Value]) -> Result<Value, String> + Send + Sync + 'static,
        args: impl IntoIterator<Item = Value>,
    ) -> Self {
        Self::Apply {
            function: Arc::new(function),
            args: args.into_iter().collect(),
        }
    }

    /// Decode a document into a json value
    pub fn decode(&self, src: &str) -> Result<serde_json::Value, String> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| match self {
            Self::Function(function) => function(src),
            Self::Decoder(decoder) => decoder.decode(src),
            Self::Apply { function, args } => function(src, args),
        }))
        .map_err(|payload| panic_message(payload.as_ref()))?;

        let value = result?;
        value
            .to_json()
            .ok_or_else(|| "engine returned a value which is not json".to_owned())
    }
}

impl Default for JsonEngine {
    fn default() -> Self {
        Self::Decoder(Arc::new(SerdeJson))
    }
}

impl fmt::Debug for JsonEngine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Decoder(decoder) => f.debug_tuple("Decoder").field(decoder).finish(),
            Self::Apply { args, .. } => f
                .debug_struct("Apply")
                .field("args", args)
                .finish_non_exhaustive(),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("engine panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("engine panicked: {msg}")
    } else {
        "engine panicked".to_owned()
    }
}
