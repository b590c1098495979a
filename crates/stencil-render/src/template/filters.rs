//! MiniJinja filter registration.

use minijinja::value::ValueKind;
use minijinja::{Environment, Value};

/// Registers stencil's filters on a minijinja environment.
///
/// - `bool_str`: renders a boolean as `true` / `false`. Other values render
///   as their plain string form, so the filter is safe on optional flags.
///
/// # Arguments
///
/// * `env` - The MiniJinja environment to register filters on
pub fn register_filters(env: &mut Environment<'static>) {
    env.add_filter("bool_str", bool_str);
}

fn bool_str(value: Value) -> String {
    match value.kind() {
        ValueKind::Bool if value.is_true() => "true".to_string(),
        ValueKind::Bool => "false".to_string(),
        ValueKind::Undefined | ValueKind::None => String::new(),
        _ => value.to_string(),
    }
}
