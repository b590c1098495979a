//! Validated run configuration.

use std::path::PathBuf;

use stencil_render::{
    MatchPattern, RenderOptions, StencilError, VariableSources, VariablesFormat, DEFAULT_PATTERN,
};

use crate::cli::Args;

/// Everything a run needs, checked before any file is touched.
#[derive(Debug, Clone)]
pub struct Config {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub sources: VariableSources,
    pub options: RenderOptions,
    pub github_output: Option<PathBuf>,
}

impl TryFrom<Args> for Config {
    type Error = StencilError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let template_path = non_empty_path(args.template_path)
            .ok_or_else(|| StencilError::config("template path is required"))?;
        let output_path = non_empty_path(args.output_path)
            .ok_or_else(|| StencilError::config("output path is required"))?;

        let file_format = match non_empty(args.variables_file_format) {
            Some(raw) if raw.eq_ignore_ascii_case("auto") => None,
            Some(raw) => Some(raw.parse::<VariablesFormat>()?),
            None => None,
        };

        let sources = VariableSources {
            file: non_empty_path(args.variables_file),
            file_format,
            inline: non_empty(args.variables),
        };

        let pattern = non_empty(Some(args.file_pattern)).unwrap_or_else(|| DEFAULT_PATTERN.to_string());

        let options = RenderOptions::default()
            .pattern(MatchPattern::new(&pattern)?)
            .recursive(args.recursive)
            .strict(args.strict)
            .trim_blocks(args.trim_blocks)
            .lstrip_blocks(args.lstrip_blocks)
            .expose_environment(args.use_environment_variables)
            .autoescape(args.autoescape);

        Ok(Config {
            template_path,
            output_path,
            sources,
            options,
            github_output: non_empty_path(args.github_output),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|p| !p.as_os_str().is_empty())
}
