//! Process environment abstraction.
//!
//! Rendering never reads the process environment on its own. When templates
//! are allowed to see it, the pipeline reads it once through an
//! [`EnvReader`] and attaches it to the variable set under [`ENV_KEY`].

use std::collections::BTreeMap;

use crate::vars::{Value, VariableSet};

/// Reserved variable name under which the environment is exposed.
pub const ENV_KEY: &str = "env";

/// Abstraction over environment variables.
pub trait EnvReader: Send + Sync {
    /// Get an environment variable value.
    fn var(&self, name: &str) -> Option<String>;

    /// All variables, in no particular order.
    fn vars(&self) -> Vec<(String, String)>;
}

/// Real environment variable reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealEnv;

impl EnvReader for RealEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        // vars_os skips nothing; non-unicode entries are converted lossily
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }
}

/// Mock environment for testing.
#[derive(Debug, Default, Clone)]
pub struct MockEnv {
    vars: BTreeMap<String, String>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvReader for MockEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Snapshot of the environment as a mapping of plain strings.
///
/// Values are not coerced: `env.PORT` is the string `"8080"`, exactly as the
/// process sees it.
pub fn environment_value(reader: &dyn EnvReader) -> Value {
    Value::Mapping(
        reader
            .vars()
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect(),
    )
}

/// Attaches the environment to `vars` under [`ENV_KEY`].
///
/// Returns the user value that was shadowed, if any.
pub fn attach_environment(vars: &mut VariableSet, reader: &dyn EnvReader) -> Option<Value> {
    vars.insert(ENV_KEY, environment_value(reader))
}
