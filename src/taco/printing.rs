//! Printing module for tacoscript
//!
//! Turns a [`File`] back into source text, optionally with a source map.
//!
//! ## Pipeline
//!
//! 1. **Generation**: [`generator`] walks the tree and pushes tokens into a
//!    [`TokenBuffer`](buffer::TokenBuffer)
//! 2. **Layout**: the buffer inserts indentation and [spacing](spacing) as tokens arrive
//! 3. **Rendering**: [`render`] turns buffer tokens into text and records source map
//!    mappings
//!
//! ## Modes
//!
//! A parsed file keeps its token and trivia log, and by default the printer replays it
//! ([`catchup`]): the output is the input, byte for byte. With
//! `format.preserveSource = false`, or for a tree built by hand, the printer reformats:
//! spacing comes from the rule tables, indentation from the buffer depth and comments
//! from the attached comment lists.

pub mod buffer;
pub mod catchup;
pub mod generator;
pub mod options;
pub mod render;
pub mod source_map;
pub mod spacing;

pub use buffer::{BufferToken, BufferValue, TokenBuffer};
pub use options::{Dialect, FormatOptions, PrintOptions};
pub use source_map::{SourceMap, SourceMapBuilder};
pub use spacing::{PrinterExtension, Spacing, SpacingTest};

use crate::taco::ast::File;
use crate::taco::error::{ConfigurationError, PrintError, Warning};
use crate::taco::lexing::IndentUnit;
use crate::taco::plugins::PluginRegistry;
use catchup::CatchUp;
use generator::Generator;
use serde::Serialize;
use std::rc::Rc;
use tracing::debug;

const DEFAULT_INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintOutput {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<SourceMap>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

/// A configured printer; one per printed unit
pub struct Printer {
    options: PrintOptions,
    extensions: Vec<Rc<dyn PrinterExtension>>,
}

impl Printer {
    /// Validate `options` and resolve the printer plugins they name
    pub fn new(options: PrintOptions, registry: &PluginRegistry) -> Result<Self, PrintError> {
        if options.source_maps && options.source_file_name.is_none() {
            return Err(ConfigurationError::MissingSourceFileName.into());
        }
        let extensions = registry.printer_extensions(&options.plugins)?;
        Ok(Self {
            options,
            extensions,
        })
    }

    pub fn options(&self) -> &PrintOptions {
        &self.options
    }

    /// Whether `file` would be printed by replaying its source
    pub fn is_lossless(&self, file: &File, code: &str) -> bool {
        self.options.format.preserve_source && (file.has_tokens() || code.is_empty())
    }

    fn indent_text(&self, file: &File) -> String {
        self.options
            .format
            .indent
            .clone()
            .or_else(|| file.indentation.as_ref().map(IndentUnit::text))
            .unwrap_or_else(|| DEFAULT_INDENT.to_string())
    }

    /// Print `file`; `code` is the source it was parsed from
    pub fn stringify(&self, file: &File, code: &str) -> PrintOutput {
        let lossless = self.is_lossless(file, code);
        let (tokens, warnings) = if lossless {
            let buffer = TokenBuffer::verbatim(self.extensions.clone());
            let catchup = CatchUp::new(code, &file.tokens);
            let mut generator =
                Generator::lossless(buffer, catchup, self.options.dialect.clone());
            generator.print_file(&file.program);
            generator.finish()
        } else {
            let buffer = TokenBuffer::new(self.options.format.compact, self.extensions.clone());
            let mut generator = Generator::reformat(buffer, self.options.dialect.clone());
            generator.print_file(&file.program);
            generator.finish()
        };

        let mut builder = self.options.source_maps.then(SourceMapBuilder::new);
        let output = render::render(
            &tokens,
            &self.indent_text(file),
            &self.extensions,
            builder.as_mut(),
        );
        let map = builder.map(|builder| {
            let source_name = self.options.source_file_name.clone().unwrap_or_default();
            builder.build(
                self.options.source_map_target.clone(),
                self.options.source_root.clone(),
                source_name,
                Some(code.to_string()),
            )
        });

        debug!(
            lossless,
            tokens = tokens.len(),
            bytes = output.len(),
            warnings = warnings.len(),
            "printed file"
        );
        PrintOutput {
            code: output,
            map,
            warnings,
        }
    }
}

/// Print a file with the built-in plugins available
pub fn print(file: &File, code: &str, options: &PrintOptions) -> Result<PrintOutput, PrintError> {
    print_with_registry(file, code, options, &PluginRegistry::with_builtins())
}

/// Print a file, resolving `options.plugins` against `registry`
pub fn print_with_registry(
    file: &File,
    code: &str,
    options: &PrintOptions,
    registry: &PluginRegistry,
) -> Result<PrintOutput, PrintError> {
    let printer = Printer::new(options.clone(), registry)?;
    Ok(printer.stringify(file, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taco::parsing::{parse, ParseOptions};

    fn reformat(source: &str) -> String {
        let file = parse(source, &ParseOptions::default()).unwrap();
        print(&file, source, &PrintOptions::reformat()).unwrap().code
    }

    #[test]
    fn test_lossless_is_identity() {
        let source = "a  =  b   # keep\n\n\nf!   x,y\n";
        let file = parse(source, &ParseOptions::default()).unwrap();
        let output = print(&file, source, &PrintOptions::default()).unwrap();
        assert_eq!(output.code, source);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_lossless_keeps_missing_final_newline() {
        let source = "a + b";
        let file = parse(source, &ParseOptions::default()).unwrap();
        let output = print(&file, source, &PrintOptions::default()).unwrap();
        assert_eq!(output.code, "a + b");
    }

    #[test]
    fn test_empty_source_prints_empty() {
        let file = parse("", &ParseOptions::default()).unwrap();
        let output = print(&file, "", &PrintOptions::default()).unwrap();
        assert_eq!(output.code, "");
    }

    #[test]
    fn test_reformat_spacing() {
        assert_eq!(reformat("a=b+c*d"), "a = b + c * d\n");
        assert_eq!(reformat("f(a,b)"), "f(a, b)\n");
        assert_eq!(reformat("if a then b else c"), "if a then b else c\n");
    }

    #[test]
    fn test_reformat_ends_with_one_newline() {
        let file = parse("a", &ParseOptions::default()).unwrap();
        let output = print(&file, "a", &PrintOptions::reformat()).unwrap();
        assert_eq!(output.code, "a\n");
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_compact_keeps_mandatory_spaces() {
        let compact = |source: &str| {
            let file = parse(source, &ParseOptions::default()).unwrap();
            print(&file, source, &PrintOptions::reformat().compact())
                .unwrap()
                .code
        };
        assert_eq!(compact("if a then b else c\n"), "if a then b else c\n");
        assert_eq!(compact("f(a, b)\n"), "f(a,b)\n");
        assert_eq!(compact("x = y + 1\n"), "x=y+1\n");

        let output = compact("x = /a/ in b\n");
        assert_eq!(output, "x=/a/ in b\n");
        assert!(parse(&output, &ParseOptions::default()).is_ok());
    }

    #[test]
    fn test_source_map_requires_file_name() {
        let file = parse("a\n", &ParseOptions::default()).unwrap();
        let options = PrintOptions {
            source_maps: true,
            ..PrintOptions::default()
        };
        let error = print(&file, "a\n", &options).unwrap_err();
        assert_eq!(
            error,
            PrintError::Configuration(ConfigurationError::MissingSourceFileName)
        );
    }

    #[test]
    fn test_source_map_output() {
        let source = "foo\n";
        let file = parse(source, &ParseOptions::default()).unwrap();
        let options = PrintOptions::default().with_source_map("main.taco");
        let output = print(&file, source, &options).unwrap();
        let map = output.map.unwrap();
        assert_eq!(map.version, 3);
        assert_eq!(map.sources, vec!["main.taco".to_string()]);
        assert!(map.mappings.starts_with("AAAA"));
    }

    #[test]
    fn test_unknown_printer_plugin() {
        let file = parse("a\n", &ParseOptions::default()).unwrap();
        let options = PrintOptions {
            plugins: vec!["nope".to_string()],
            ..PrintOptions::default()
        };
        assert!(matches!(
            print(&file, "a\n", &options),
            Err(PrintError::Configuration(ConfigurationError::UnknownPlugin(_)))
        ));
    }
}
