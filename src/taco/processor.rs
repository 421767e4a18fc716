//! File processing API for tacoscript
//!
//! A processing spec is a `stage-format` string naming what to extract from a source
//! and how to render it:
//!
//! - token-simple, token-json: the element log (tokens, layout and trivia)
//! - ast-json, ast-yaml, ast-treeviz: the parsed tree through the [format registry](FormatRegistry)
//! - print-source, print-reformat: the printer output, lossless or reformatted
//!
//! Extras are loose `key=value` parameters. `plugins` (comma separated) enables parse and
//! print plugins, `source-type=script` switches the source type and everything else is
//! handed to the formatter (treeviz reads `show-linum`).

use crate::taco::error::ParseError;
use crate::taco::formats::FormatRegistry;
use crate::taco::lexing::tokenize;
use crate::taco::parsing::{parse, ParseOptions, SourceType};
use crate::taco::printing::{print, PrintOptions};
use crate::taco::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

static SPEC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<stage>[a-z]+)-(?P<format>[a-z]+)$").unwrap());

/// Represents the processing stage (what data to extract)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Ast,
    Print,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Yaml,
    Treeviz,
    Source,
    Reformat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Parse a spec string like "token-simple" or "ast-treeviz"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let captures = SPEC_PATTERN
            .captures(format_str)
            .ok_or_else(|| ProcessingError::InvalidFormat(format_str.to_string()))?;

        let stage = match &captures["stage"] {
            "token" => ProcessingStage::Token,
            "ast" => ProcessingStage::Ast,
            "print" => ProcessingStage::Print,
            other => return Err(ProcessingError::InvalidStage(other.to_string())),
        };

        let format = match &captures["format"] {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            "treeviz" => OutputFormat::Treeviz,
            "source" => OutputFormat::Source,
            "reformat" => OutputFormat::Reformat,
            other => return Err(ProcessingError::InvalidFormatType(other.to_string())),
        };

        let spec = ProcessingSpec { stage, format };
        if !Self::available_specs().contains(&spec) {
            return Err(ProcessingError::InvalidFormatType(format!(
                "Format '{}' does not work with the {} stage",
                &captures["format"], &captures["stage"]
            )));
        }
        Ok(spec)
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        use OutputFormat::*;
        use ProcessingStage::*;
        [
            (Token, Simple),
            (Token, Json),
            (Ast, Json),
            (Ast, Yaml),
            (Ast, Treeviz),
            (Print, Source),
            (Print, Reformat),
        ]
        .into_iter()
        .map(|(stage, format)| ProcessingSpec { stage, format })
        .collect()
    }

    pub fn name(&self) -> String {
        let stage = match self.stage {
            ProcessingStage::Token => "token",
            ProcessingStage::Ast => "ast",
            ProcessingStage::Print => "print",
        };
        let format = match self.format {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Source => "source",
            OutputFormat::Reformat => "reformat",
        };
        format!("{}-{}", stage, format)
    }
}

/// Errors that can occur during processing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessingError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid stage: {0}")]
    InvalidStage(String),
    #[error("Invalid format type: {0}")]
    InvalidFormatType(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    Output(String),
}

impl ProcessingError {
    fn parse(error: ParseError, source: &str) -> Self {
        ProcessingError::Parse(error.render_with_source(source))
    }
}

/// Process a tacoscript file according to the given specification
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
) -> Result<String, ProcessingError> {
    process_file_with_extras(file_path, spec, HashMap::new())
}

pub fn process_file_with_extras<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
    extras: HashMap<String, String>,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(ProcessingError::FileNotFound(
            file_path.display().to_string(),
        ));
    }
    let content =
        fs::read_to_string(file_path).map_err(|e| ProcessingError::IoError(e.to_string()))?;
    let mut extras = extras;
    extras
        .entry("source-file".to_string())
        .or_insert_with(|| file_path.display().to_string());
    process_source(&content, spec, &extras)
}

fn parse_options(extras: &HashMap<String, String>) -> ParseOptions {
    let mut options = ParseOptions::default();
    if extras.get("source-type").map(String::as_str) == Some("script") {
        options.source_type = SourceType::Script;
    }
    options.source_file = extras.get("source-file").cloned();
    for name in plugin_names(extras) {
        options = options.with_plugin(&name);
    }
    options
}

fn plugin_names(extras: &HashMap<String, String>) -> Vec<String> {
    extras
        .get("plugins")
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Process source text according to the given specification
pub fn process_source(
    source: &str,
    spec: &ProcessingSpec,
    extras: &HashMap<String, String>,
) -> Result<String, ProcessingError> {
    debug!(spec = %spec.name(), bytes = source.len(), "processing source");
    match spec.stage {
        ProcessingStage::Token => {
            let tokens = tokenize(source).map_err(|e| ProcessingError::parse(e, source))?;
            format_tokens(&tokens, source, spec.format)
        }
        ProcessingStage::Ast => {
            let file =
                parse(source, &parse_options(extras)).map_err(|e| ProcessingError::parse(e, source))?;
            match spec.format {
                OutputFormat::Treeviz => Ok(crate::taco::formats::to_treeviz_str_with_params(
                    &file, extras,
                )),
                OutputFormat::Json => FormatRegistry::with_defaults()
                    .serialize(&file, "json")
                    .map_err(|e| ProcessingError::Output(e.to_string())),
                OutputFormat::Yaml => FormatRegistry::with_defaults()
                    .serialize(&file, "yaml")
                    .map_err(|e| ProcessingError::Output(e.to_string())),
                other => Err(ProcessingError::InvalidFormatType(format!(
                    "{:?} only works with the print stage",
                    other
                ))),
            }
        }
        ProcessingStage::Print => {
            let file =
                parse(source, &parse_options(extras)).map_err(|e| ProcessingError::parse(e, source))?;
            let options = match spec.format {
                OutputFormat::Source => PrintOptions::default(),
                OutputFormat::Reformat => PrintOptions::reformat(),
                other => {
                    return Err(ProcessingError::InvalidFormatType(format!(
                        "{:?} does not work with the print stage",
                        other
                    )))
                }
            };
            let options = PrintOptions {
                plugins: plugin_names(extras),
                ..options
            };
            let output =
                print(&file, source, &options).map_err(|e| ProcessingError::Output(e.to_string()))?;
            Ok(output.code)
        }
    }
}

/// Format the element log according to a token output format
pub fn format_tokens(
    tokens: &[Token],
    source: &str,
    format: OutputFormat,
) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            for token in tokens {
                if token.value.is_none() {
                    result.push_str(&format!("<{:?}>", token.kind));
                } else {
                    result.push_str(&format!("<{:?}:{}>", token.kind, token.text(source)));
                }
                if token.kind == TokenKind::Newline {
                    result.push('\n');
                }
            }
            Ok(result)
        }
        OutputFormat::Json => serde_json::to_string_pretty(tokens)
            .map_err(|e| ProcessingError::Output(e.to_string())),
        other => Err(ProcessingError::InvalidFormatType(format!(
            "{:?} does not work with the token stage",
            other
        ))),
    }
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .iter()
        .map(ProcessingSpec::name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str, spec: &str) -> String {
        let spec = ProcessingSpec::from_string(spec).unwrap();
        process_source(source, &spec, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_processing_spec_parsing() {
        let spec = ProcessingSpec::from_string("token-simple").unwrap();
        assert_eq!(spec.stage, ProcessingStage::Token);
        assert_eq!(spec.format, OutputFormat::Simple);

        let spec = ProcessingSpec::from_string("print-reformat").unwrap();
        assert_eq!(spec.stage, ProcessingStage::Print);
        assert_eq!(spec.format, OutputFormat::Reformat);

        assert_eq!(
            ProcessingSpec::from_string("invalid"),
            Err(ProcessingError::InvalidFormat("invalid".to_string()))
        );
        assert_eq!(
            ProcessingSpec::from_string("token-invalid"),
            Err(ProcessingError::InvalidFormatType("invalid".to_string()))
        );
        assert_eq!(
            ProcessingSpec::from_string("invalid-simple"),
            Err(ProcessingError::InvalidStage("invalid".to_string()))
        );
        assert!(ProcessingSpec::from_string("token-treeviz").is_err());
    }

    #[test]
    fn test_token_simple() {
        assert_eq!(
            run("a + 1\n", "token-simple"),
            "<Name:a><Whitespace><Plus><Whitespace><Num:1><Newline>\n"
        );
    }

    #[test]
    fn test_token_json() {
        let json = run("a\n", "token-json");
        assert!(json.contains("\"Name\""));
        assert!(json.contains("\"Newline\""));
    }

    #[test]
    fn test_print_stages() {
        assert_eq!(run("a  =  b\n", "print-source"), "a  =  b\n");
        assert_eq!(run("a  =  b\n", "print-reformat"), "a = b\n");
    }

    #[test]
    fn test_plugins_extra() {
        let spec = ProcessingSpec::from_string("print-reformat").unwrap();
        let extras = HashMap::from([("plugins".to_string(), "pipeline".to_string())]);
        assert_eq!(process_source("a|>f\n", &spec, &extras).unwrap(), "a |> f\n");
    }

    #[test]
    fn test_parse_error_has_context() {
        let spec = ProcessingSpec::from_string("ast-json").unwrap();
        let error = process_source("a = )\n", &spec, &HashMap::new()).unwrap_err();
        let ProcessingError::Parse(message) = error else {
            panic!("expected a parse error");
        };
        assert!(message.contains(">>"));
    }

    #[test]
    fn test_available_formats() {
        let formats = available_formats();
        assert_eq!(formats.len(), 7);
        assert!(formats.contains(&"ast-treeviz".to_string()));
        for format in &formats {
            assert!(ProcessingSpec::from_string(format).is_ok());
        }
    }

    #[test]
    fn test_missing_file() {
        let spec = ProcessingSpec::from_string("ast-json").unwrap();
        assert!(matches!(
            process_file("/definitely/not/here.taco", &spec),
            Err(ProcessingError::FileNotFound(_))
        ));
    }
}
