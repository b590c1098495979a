//! Command-line surface.
//!
//! Every flag falls back to an environment variable, so the same binary runs
//! as a plain CLI or as a CI step configured through `INPUT_*` variables.
//! Empty environment values count as unset.

use std::convert::Infallible;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use stencil_render::vars::{FALSY, TRUTHY};
use stencil_render::DEFAULT_PATTERN;

/// Render Jinja templates against variables from files, inline text and the
/// environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "stencil", version, about)]
pub struct Args {
    /// Template file, or directory to search for templates
    #[arg(long, env = "INPUT_TEMPLATE_PATH", value_name = "PATH", value_parser = parse_path)]
    pub template_path: Option<PathBuf>,

    /// Output directory, or output file for a single template
    #[arg(long, env = "INPUT_OUTPUT_PATH", value_name = "PATH", value_parser = parse_path)]
    pub output_path: Option<PathBuf>,

    /// Variables file (.json, .yaml/.yml or .env)
    #[arg(long, env = "INPUT_VARIABLES_FILE", value_name = "FILE", value_parser = parse_path)]
    pub variables_file: Option<PathBuf>,

    /// Format of the variables file (auto, env, dotenv, yaml, yml, json)
    #[arg(long, env = "INPUT_VARIABLES_FILE_FORMAT", value_name = "FORMAT")]
    pub variables_file_format: Option<String>,

    /// Inline variables: a JSON object or whitespace-separated key=value pairs
    #[arg(long, env = "INPUT_VARIABLES", value_name = "VARS", allow_hyphen_values = true)]
    pub variables: Option<String>,

    /// Expose the process environment to templates as `env`
    #[arg(
        long,
        env = "INPUT_USE_ENVIRONMENT_VARIABLES",
        value_name = "BOOL",
        value_parser = flag_or(true),
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        default_value = "true"
    )]
    pub use_environment_variables: bool,

    /// Search subdirectories of the template path
    #[arg(
        long,
        env = "INPUT_RECURSIVE",
        value_name = "BOOL",
        value_parser = flag_or(false),
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        default_value = "false"
    )]
    pub recursive: bool,

    /// Filename glob selecting templates; also stripped from output names
    #[arg(long, env = "INPUT_FILE_PATTERN", value_name = "GLOB", default_value = DEFAULT_PATTERN)]
    pub file_pattern: String,

    /// Fail on undefined variables and abort on the first failed template
    #[arg(
        long,
        env = "INPUT_STRICT",
        value_name = "BOOL",
        value_parser = flag_or(false),
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        default_value = "false"
    )]
    pub strict: bool,

    /// Remove the first newline after a block tag
    #[arg(
        long,
        env = "INPUT_TRIM_BLOCKS",
        value_name = "BOOL",
        value_parser = flag_or(true),
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        default_value = "true"
    )]
    pub trim_blocks: bool,

    /// Strip leading whitespace before block tags
    #[arg(
        long,
        env = "INPUT_LSTRIP_BLOCKS",
        value_name = "BOOL",
        value_parser = flag_or(true),
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        default_value = "true"
    )]
    pub lstrip_blocks: bool,

    /// HTML-escape output of .html and .xml templates
    #[arg(
        long,
        env = "INPUT_AUTOESCAPE",
        value_name = "BOOL",
        value_parser = flag_or(true),
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        default_value = "true"
    )]
    pub autoescape: bool,

    /// File to append `rendered_files=<json>` to
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "FILE", value_parser = parse_path)]
    pub github_output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, env = "INPUT_LOG_LEVEL", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Keeps the raw path, including an empty one; emptiness is checked later.
pub fn parse_path(raw: &str) -> Result<PathBuf, Infallible> {
    Ok(PathBuf::from(raw))
}

/// Boolean parser for an option whose empty value means `default`.
pub fn flag_or(default: bool) -> impl Fn(&str) -> Result<bool, String> + Clone + Send + Sync + 'static {
    move |raw: &str| {
        if raw.trim().is_empty() {
            Ok(default)
        } else {
            parse_flag(raw)
        }
    }
}

/// Parses a boolean option with the same vocabulary used for variables.
pub fn parse_flag(raw: &str) -> Result<bool, String> {
    let lowered = raw.trim().to_ascii_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(format!(
            "expected one of {} or {}",
            TRUTHY.join("/"),
            FALSY.join("/")
        ))
    }
}
