//! Print options
//!
//! Like [`ParseOptions`](crate::taco::parsing::ParseOptions), these deserialize from
//! camelCase JSON:
//!
//!     {
//!       "dialect": { "equalitySymbols": false },
//!       "format": { "compact": true, "preserveSource": false },
//!       "sourceMaps": true,
//!       "sourceFileName": "main.taco"
//!     }

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dialect {
    /// Print strict equality as `==`/`!=` rather than `is`/`isnt`
    pub equality_symbols: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            equality_symbols: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOptions {
    /// Drop cosmetic spaces; mandatory ones stay
    pub compact: bool,
    /// Replay the source trivia when the tree still has its token log
    pub preserve_source: bool,
    /// Indentation text for reformatting; defaults to the file's own unit
    pub indent: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            compact: false,
            preserve_source: true,
            indent: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintOptions {
    pub dialect: Dialect,
    pub format: FormatOptions,
    /// Names of printer plugins to enable, in order
    pub plugins: Vec<String>,
    pub source_maps: bool,
    pub source_file_name: Option<String>,
    pub source_map_target: Option<String>,
    pub source_root: Option<String>,
}

impl PrintOptions {
    /// Options for reformatting instead of reproducing the source
    pub fn reformat() -> Self {
        Self {
            format: FormatOptions {
                preserve_source: false,
                ..FormatOptions::default()
            },
            ..Self::default()
        }
    }

    pub fn compact(mut self) -> Self {
        self.format.compact = true;
        self
    }

    pub fn with_source_map(mut self, file_name: &str) -> Self {
        self.source_maps = true;
        self.source_file_name = Some(file_name.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_preserve_source() {
        let options = PrintOptions::default();
        assert!(options.format.preserve_source);
        assert!(options.dialect.equality_symbols);
        assert!(!options.source_maps);
    }

    #[test]
    fn test_deserialize() {
        let options: PrintOptions = serde_json::from_str(
            r#"{
                "dialect": { "equalitySymbols": false },
                "format": { "compact": true },
                "plugins": ["pipeline"],
                "sourceMaps": true,
                "sourceFileName": "a.taco"
            }"#,
        )
        .unwrap();
        assert!(!options.dialect.equality_symbols);
        assert!(options.format.compact);
        assert!(options.format.preserve_source);
        assert_eq!(options.plugins, vec!["pipeline".to_string()]);
        assert_eq!(options.source_file_name.as_deref(), Some("a.taco"));
    }
}
