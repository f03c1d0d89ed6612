use crate::{convert_as, Error, Options, TypeDescriptor, Value};
use std::collections::BTreeMap;
use std::ffi::OsString;

/// A snapshot of environment variables, which values are converted from.
///
/// An unset variable is absent, and resolves to the default of the requested type. A variable
/// set to the empty string is present, and is converted like any other value.
#[derive(Clone, Debug, Default)]
pub struct ParsedEnv {
    map: BTreeMap<String, OsString>,
}

impl ParsedEnv {
    /// Snapshot the environment of this process
    pub fn from_process() -> Self {
        parse_env(std::env::vars_os())
    }

    /// Get the OsString. This is useful if you want to raise an error with context if it not valid
    /// utf8.
    pub fn get<'a>(&'a self, name: &str) -> Option<&'a OsString> {
        self.map.get(name)
    }

    /// Get the value as a str, if it is set. A value which is not valid utf8 is an error.
    pub fn get_str<'a>(&'a self, name: &str) -> Result<Option<&'a str>, Error> {
        self.map
            .get(name)
            .map(|os_str| {
                os_str.to_str().ok_or_else(|| Error::InvalidUtf8Env {
                    name: name.to_owned(),
                })
            })
            .transpose()
    }

    /// Convert a variable to the requested type, see [`crate::convert_as`].
    pub fn convert_as(
        &self,
        name: &str,
        descriptor: impl Into<TypeDescriptor>,
        options: &Options,
    ) -> Result<Value, Error> {
        convert_as(self.get_str(name)?, name, descriptor, options)
    }
}

/// Parse a generic thing that looks like std::env::vars_os but might be test data,
/// and store it in a searchable container.
pub fn parse_env<K, V>(env_vars_os: impl IntoIterator<Item = (K, V)>) -> ParsedEnv
where
    K: Into<OsString>,
    V: Into<OsString>,
{
    // Drop any non-utf8 env keys, since there is no way to ask for them by name.
    // Non-utf8 values are kept, and only fail if they are actually converted.
    ParsedEnv {
        map: env_vars_os
            .into_iter()
            .filter_map(|(into_key, into_val)| {
                let key = into_key.into().into_string().ok()?;
                Some((key, into_val.into()))
            })
            .collect(),
    }
}
