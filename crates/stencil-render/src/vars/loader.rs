//! Loading variable sets from files and inline strings.

use std::path::Path;

use tracing::{debug, warn};

use super::format::VariablesFormat;
use super::set::VariableSet;
use super::value::{coerce, coerce_inline, Value};
use crate::error::StencilError;
use crate::fs::FileSystem;

/// Name used for the inline source in diagnostics.
const INLINE_SOURCE: &str = "inline variables";

/// Loads a variables file.
///
/// The format comes from `explicit` or, failing that, from the file name (see
/// [`VariablesFormat::resolve`]).
///
/// # Errors
///
/// - [`StencilError::FileNotFound`] if `path` is not an existing file
/// - [`StencilError::Parse`] if the content is malformed for the format
pub fn load_file(
    path: &Path,
    explicit: Option<VariablesFormat>,
    fs: &dyn FileSystem,
) -> Result<VariableSet, StencilError> {
    if !fs.is_file(path) {
        return Err(StencilError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = VariablesFormat::resolve(path, explicit);
    debug!(path = %path.display(), %format, "loading variables file");

    let content = fs.read_to_string(path).map_err(|e| StencilError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let source_name = path.display().to_string();
    let vars = parse_content(&content, format, &source_name)?;
    debug!(path = %path.display(), count = vars.len(), "loaded variables file");
    Ok(vars)
}

/// Parses `content` in the given format.
///
/// `source_name` only appears in error messages.
pub fn parse_content(
    content: &str,
    format: VariablesFormat,
    source_name: &str,
) -> Result<VariableSet, StencilError> {
    match format {
        VariablesFormat::Env => parse_env(content, source_name),
        VariablesFormat::Yaml => parse_yaml(content, source_name),
        VariablesFormat::Json => parse_json(content, source_name),
    }
}

fn parse_env(content: &str, source_name: &str) -> Result<VariableSet, StencilError> {
    let mut vars = VariableSet::new();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        let (key, value) = item.map_err(|e| StencilError::parse(source_name, e))?;
        vars.insert(key, coerce(&value));
    }
    Ok(vars)
}

fn parse_yaml(content: &str, source_name: &str) -> Result<VariableSet, StencilError> {
    if content.trim().is_empty() {
        return Ok(VariableSet::new());
    }
    let document: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| StencilError::parse(source_name, e))?;
    let value = from_yaml(document).map_err(|e| StencilError::parse(source_name, e))?;
    into_variable_set(value, source_name)
}

/// Converts a YAML document, stringifying scalar mapping keys (`80: http`).
fn from_yaml(value: serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Integer(i),
            (None, Some(f)) => Value::Float(f),
            (None, None) => Value::String(n.to_string()),
        },
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| Ok((yaml_key(k)?, from_yaml(v)?)))
                .collect::<Result<_, String>>()?,
        ),
        Yaml::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => {
            Err("mapping keys must be scalars, not sequences or mappings".to_string())
        }
    }
}

fn parse_json(content: &str, source_name: &str) -> Result<VariableSet, StencilError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| StencilError::parse(source_name, e))?;
    into_variable_set(value, source_name)
}

fn into_variable_set(value: Value, source_name: &str) -> Result<VariableSet, StencilError> {
    match value {
        Value::Mapping(map) => Ok(VariableSet::from(map)),
        Value::Null => Ok(VariableSet::new()),
        _ => Err(StencilError::parse(
            source_name,
            "top-level value must be a mapping of variable names to values",
        )),
    }
}

/// Loads variables from an inline string.
///
/// A JSON object is tried first. Anything else is read as whitespace
/// separated `key=value` tokens with [`coerce_inline`] applied to each value.
/// Tokens without `=` are skipped with a warning.
///
/// # Errors
///
/// [`StencilError::Parse`] when the string is neither a JSON object nor
/// contains a single valid `key=value` token.
pub fn load_str(text: &str) -> Result<VariableSet, StencilError> {
    if let Ok(serde_json::Value::Object(_)) = serde_json::from_str::<serde_json::Value>(text) {
        return parse_json(text, INLINE_SOURCE);
    }

    let mut vars = VariableSet::new();
    let mut valid = 0usize;

    for token in text.split_whitespace() {
        let Some((key, raw)) = token.split_once('=') else {
            warn!(token, "skipping inline variable without '='");
            continue;
        };
        if key.is_empty() {
            warn!(token, "skipping inline variable with an empty name");
            continue;
        }
        vars.insert(key, coerce_inline(unquote(raw)));
        valid += 1;
    }

    if valid == 0 {
        return Err(StencilError::parse(
            INLINE_SOURCE,
            "expected a JSON object or key=value pairs",
        ));
    }

    debug!(count = vars.len(), "loaded inline variables");
    Ok(vars)
}

/// Strips one pair of matching surrounding quotes.
fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use std::collections::BTreeMap;

    // =========================================================================
    // Files
    // =========================================================================

    #[test]
    fn test_missing_file_is_not_found() {
        let fs = MemoryFs::new();
        let err = load_file(Path::new("/vars.yaml"), None, &fs).unwrap_err();
        assert!(matches!(err, StencilError::FileNotFound { .. }));
    }

    #[test]
    fn test_yaml_keeps_types() {
        let fs = MemoryFs::new().with_file(
            "/vars.yaml",
            "name: web\nreplicas: 3\nratio: 0.5\nenabled: false\nversion: \"1\"\ntags: [a, b]\n",
        );
        let vars = load_file(Path::new("/vars.yaml"), None, &fs).unwrap();

        assert_eq!(vars.get("name"), Some(&Value::from("web")));
        assert_eq!(vars.get("replicas"), Some(&Value::Integer(3)));
        assert_eq!(vars.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(vars.get("enabled"), Some(&Value::Bool(false)));
        // quoted in the source, so no coercion
        assert_eq!(vars.get("version"), Some(&Value::from("1")));
        assert_eq!(
            vars.get("tags"),
            Some(&Value::Sequence(vec![Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn test_json_nested() {
        let fs = MemoryFs::new().with_file("/vars.json", r#"{"db": {"host": "x", "port": 5432}}"#);
        let vars = load_file(Path::new("/vars.json"), None, &fs).unwrap();

        let mut db = BTreeMap::new();
        db.insert("host".to_string(), Value::from("x"));
        db.insert("port".to_string(), Value::Integer(5432));
        assert_eq!(vars.get("db"), Some(&Value::Mapping(db)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let fs = MemoryFs::new().with_file("/vars.json", "{ not json");
        let err = load_file(Path::new("/vars.json"), None, &fs).unwrap_err();
        assert!(matches!(err, StencilError::Parse { .. }));
        assert!(err.to_string().contains("/vars.json"));
    }

    #[test]
    fn test_non_mapping_document_is_parse_error() {
        let fs = MemoryFs::new().with_file("/vars.yaml", "- a\n- b\n");
        let err = load_file(Path::new("/vars.yaml"), None, &fs).unwrap_err();
        assert!(matches!(err, StencilError::Parse { .. }));
    }

    #[test]
    fn test_yaml_scalar_keys_become_strings() {
        let vars = parse_content(
            "ports:\n  80: http\n  443: https\nflags:\n  true: on\n",
            VariablesFormat::Yaml,
            "v.yaml",
        )
        .unwrap();

        let Some(Value::Mapping(ports)) = vars.get("ports") else {
            panic!("ports should be a mapping: {:?}", vars.get("ports"));
        };
        assert_eq!(ports.get("80"), Some(&Value::from("http")));
        assert_eq!(ports.get("443"), Some(&Value::from("https")));

        let Some(Value::Mapping(flags)) = vars.get("flags") else {
            panic!("flags should be a mapping");
        };
        assert_eq!(flags.get("true"), Some(&Value::from("on")));
    }

    #[test]
    fn test_yaml_complex_key_is_parse_error() {
        let err = parse_content("? [a, b]\n: c\n", VariablesFormat::Yaml, "v.yaml").unwrap_err();
        assert!(matches!(err, StencilError::Parse { .. }));
        assert!(err.to_string().contains("mapping keys must be scalars"));
    }

    #[test]
    fn test_empty_yaml_is_empty_set() {
        let fs = MemoryFs::new().with_file("/vars.yml", "");
        let vars = load_file(Path::new("/vars.yml"), None, &fs).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn test_env_file_coerces_values() {
        let fs = MemoryFs::new().with_file(
            "/ci/.env",
            "# deployment\nAPP_NAME=\"my app\"\nDEBUG=yes\nWORKERS=4\nRATIO=0.25\nexport REGION=eu-west-1\n",
        );
        let vars = load_file(Path::new("/ci/.env"), None, &fs).unwrap();

        assert_eq!(vars.get("APP_NAME"), Some(&Value::from("my app")));
        assert_eq!(vars.get("DEBUG"), Some(&Value::Bool(true)));
        assert_eq!(vars.get("WORKERS"), Some(&Value::Integer(4)));
        assert_eq!(vars.get("RATIO"), Some(&Value::Float(0.25)));
        assert_eq!(vars.get("REGION"), Some(&Value::from("eu-west-1")));
        assert_eq!(vars.len(), 5);
    }

    #[test]
    fn test_explicit_format_overrides_extension() {
        let fs = MemoryFs::new().with_file("/vars.txt", "COUNT=2\n");
        let vars = load_file(Path::new("/vars.txt"), Some(VariablesFormat::Env), &fs).unwrap();
        assert_eq!(vars.get("COUNT"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_malformed_env_is_parse_error() {
        let fs = MemoryFs::new().with_file("/bad.env", "KEY='unterminated\n");
        let err = load_file(Path::new("/bad.env"), None, &fs).unwrap_err();
        assert!(matches!(err, StencilError::Parse { .. }));
    }

    // =========================================================================
    // Inline strings
    // =========================================================================

    #[test]
    fn test_inline_json_object() {
        let vars = load_str(r#"{"version": "2.1", "count": 3}"#).unwrap();
        assert_eq!(vars.get("version"), Some(&Value::from("2.1")));
        assert_eq!(vars.get("count"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_inline_key_value_pairs() {
        let vars = load_str("env=prod replicas=3\nratio=1.5 debug=False").unwrap();
        assert_eq!(vars.get("env"), Some(&Value::from("prod")));
        assert_eq!(vars.get("replicas"), Some(&Value::Integer(3)));
        assert_eq!(vars.get("ratio"), Some(&Value::Float(1.5)));
        assert_eq!(vars.get("debug"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_inline_token_without_equals_is_skipped() {
        let vars = load_str("malformed name=web").unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("name"), Some(&Value::from("web")));
    }

    #[test]
    fn test_inline_value_may_contain_equals() {
        let vars = load_str("query=a=b").unwrap();
        assert_eq!(vars.get("query"), Some(&Value::from("a=b")));
    }

    #[test]
    fn test_inline_quotes_are_stripped() {
        let vars = load_str(r#"greeting="hi" tag='v1'"#).unwrap();
        assert_eq!(vars.get("greeting"), Some(&Value::from("hi")));
        assert_eq!(vars.get("tag"), Some(&Value::from("v1")));
    }

    #[test]
    fn test_inline_nothing_valid_is_parse_error() {
        assert!(matches!(load_str("malformed"), Err(StencilError::Parse { .. })));
        assert!(matches!(load_str("[1, 2]"), Err(StencilError::Parse { .. })));
        assert!(matches!(load_str("=x"), Err(StencilError::Parse { .. })));
    }
}
