use crate::{
    Case, CaseMode, CodeEvaluator, Delimiter, JsonEngine, On, Parts, PemDecoder, PemFilter,
    SymbolTable, Value,
};
use std::{borrow::Cow, fmt, sync::Arc};

/// The options of one conversion.
///
/// Every option has a named setter. Which options a type reads, and which values are accepted, is
/// checked when the conversion runs (see [`crate::validate`]), and a bad combination is reported
/// as a configuration error before the value is looked at. Options a type does not read are
/// ignored.
///
/// The `default` option setter shadows [`Default::default`] in path calls, so use
/// [`Options::new`] (or `<Options as Default>::default()`) for empty options.
///
/// ```
/// use envcast::{convert_as, Options, Primitive, Value};
///
/// let opts = Options::new().base(16);
/// let port = convert_as(Some("18EB"), "PORT", Primitive::Integer, &opts).unwrap();
/// assert_eq!(port, Value::Integer(6379));
/// ```
#[derive(Clone, Default)]
pub struct Options {
    pub(crate) allowed: Option<Vec<Value>>,
    pub(crate) default: Option<Value>,
    pub(crate) downcase: Option<CaseMode>,
    pub(crate) upcase: Option<CaseMode>,
    pub(crate) truthy: Option<Vec<String>>,
    pub(crate) falsy: Option<Vec<String>>,
    pub(crate) base: Option<i64>,
    pub(crate) engine: Option<JsonEngine>,
    pub(crate) filter: Option<PemFilter>,
    pub(crate) case: Option<Case>,
    pub(crate) padding: Option<bool>,
    pub(crate) ignore_whitespace: Option<bool>,
    pub(crate) delimiter: Option<Delimiter>,
    pub(crate) parts: Option<Parts>,
    pub(crate) trim: Option<bool>,
    pub(crate) on: Option<On>,
    pub(crate) include_captures: Option<bool>,
    pub(crate) symbols: Option<Arc<dyn SymbolTable>>,
    pub(crate) pem_decoder: Option<Arc<dyn PemDecoder>>,
    pub(crate) evaluator: Option<Arc<dyn CodeEvaluator>>,
    pub(crate) secondary: Option<Box<Options>>,
}

impl Options {
    /// Empty options
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// (atom, safe_atom, module, safe_module) The closed set of accepted values, as atoms
    /// (modules) or as strings. Conversion then matches against this set instead of using the
    /// symbol table.
    pub fn allowed<T: Into<Value>>(mut self, allowed: impl IntoIterator<Item = T>) -> Self {
        self.allowed = Some(allowed.into_iter().map(Into::into).collect());
        self
    }

    /// The value returned when the raw value is absent
    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Lowercase the raw value before converting it. `true` means [`CaseMode::Default`].
    pub fn downcase(mut self, mode: impl Into<CaseMode>) -> Self {
        self.downcase = Some(mode.into());
        self
    }

    /// Uppercase the raw value before converting it. `true` means [`CaseMode::Default`].
    pub fn upcase(mut self, mode: impl Into<CaseMode>) -> Self {
        self.upcase = Some(mode.into());
        self
    }

    /// (boolean) The values which are true. Everything else is false.
    pub fn truthy<S: Into<String>>(mut self, truthy: impl IntoIterator<Item = S>) -> Self {
        self.truthy = Some(truthy.into_iter().map(Into::into).collect());
        self
    }

    /// (boolean) The values which are false. Everything else is true.
    pub fn falsy<S: Into<String>>(mut self, falsy: impl IntoIterator<Item = S>) -> Self {
        self.falsy = Some(falsy.into_iter().map(Into::into).collect());
        self
    }

    /// (integer) The base, from 2 to 36
    pub fn base(mut self, base: i64) -> Self {
        self.base = Some(base);
        self
    }

    /// (json) The engine which decodes json
    pub fn engine(mut self, engine: JsonEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// (pem) Which decoded entries are returned
    pub fn filter(mut self, filter: impl Into<PemFilter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// (base16, base32, hex32) Which letter case is accepted
    pub fn case(mut self, case: Case) -> Self {
        self.case = Some(case);
        self
    }

    /// (base16, base32, hex32, base64, url_base64) Whether padding is required
    pub fn padding(mut self, padding: bool) -> Self {
        self.padding = Some(padding);
        self
    }

    /// (base64, url_base64) Whether ascii whitespace is stripped before decoding
    pub fn ignore_whitespace(mut self, ignore_whitespace: bool) -> Self {
        self.ignore_whitespace = Some(ignore_whitespace);
        self
    }

    /// (list) What to split on
    pub fn delimiter(mut self, delimiter: impl Into<Delimiter>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// (list) The most parts to split into
    pub fn parts(mut self, parts: impl Into<Parts>) -> Self {
        self.parts = Some(parts.into());
        self
    }

    /// (list) Whether empty parts are dropped
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    /// (list, regex delimiter only) Which part of each match is the delimiter
    pub fn on(mut self, on: On) -> Self {
        self.on = Some(on);
        self
    }

    /// (list, regex delimiter only) Whether delimiter text is kept in the output
    pub fn include_captures(mut self, include_captures: bool) -> Self {
        self.include_captures = Some(include_captures);
        self
    }

    /// (atom, safe_atom, module, safe_module) The symbol table to intern into and look up in.
    /// Defaults to [`crate::Interner::global`].
    pub fn symbols(mut self, symbols: Arc<dyn SymbolTable>) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// (pem) The PEM decoder. Defaults to [`crate::RustlsPem`].
    pub fn pem_decoder(mut self, pem_decoder: Arc<dyn PemDecoder>) -> Self {
        self.pem_decoder = Some(pem_decoder);
        self
    }

    /// (code_erlang, code_elixir) The evaluator. Required for those types, there is no default.
    pub fn evaluator(mut self, evaluator: Arc<dyn CodeEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// The options of the second stage of a wrapped type, such as the `integer` in
    /// `list:integer`. Defaults to empty options.
    pub fn secondary(mut self, secondary: Options) -> Self {
        self.secondary = Some(Box::new(secondary));
        self
    }

    pub(crate) fn secondary_options(&self) -> Cow<'_, Options> {
        self.secondary
            .as_deref()
            .map_or_else(|| Cow::Owned(Options::new()), Cow::Borrowed)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Options")
            .field("allowed", &self.allowed)
            .field("default", &self.default)
            .field("downcase", &self.downcase)
            .field("upcase", &self.upcase)
            .field("truthy", &self.truthy)
            .field("falsy", &self.falsy)
            .field("base", &self.base)
            .field("filter", &self.filter)
            .field("case", &self.case)
            .field("padding", &self.padding)
            .field("ignore_whitespace", &self.ignore_whitespace)
            .field("delimiter", &self.delimiter)
            .field("parts", &self.parts)
            .field("trim", &self.trim)
            .field("on", &self.on)
            .field("include_captures", &self.include_captures)
            .field("secondary", &self.secondary)
            .finish_non_exhaustive()
    }
}
