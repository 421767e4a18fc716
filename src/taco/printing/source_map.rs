//! Source maps
//!
//! Output follows the Source Map revision 3 JSON format. Positions handed to the builder
//! use the tree's convention (1-based lines, 0-based byte columns); the encoder converts
//! to the 0-based lines the format expects.
//!
//! Mappings are encoded as base64 VLQ segments, one group per generated line, each
//! segment relative to the previous one.

use crate::taco::ast::range::Position;
use serde::{Deserialize, Serialize};

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const VLQ_SHIFT: u32 = 5;
const VLQ_CONTINUATION: i64 = 1 << VLQ_SHIFT;
const VLQ_MASK: i64 = VLQ_CONTINUATION - 1;

/// Append the base64 VLQ encoding of `value` to `out`
pub fn encode_vlq(value: i64, out: &mut String) {
    let mut vlq = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };
    loop {
        let mut digit = vlq & VLQ_MASK;
        vlq >>= VLQ_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION;
        }
        out.push(BASE64[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub generated: Position,
    pub original: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    pub sources: Vec<String>,
    pub sources_content: Vec<Option<String>>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Collects mappings for one printed unit
#[derive(Debug, Clone, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<Mapping>,
}

impl SourceMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mapping(&mut self, generated: Position, original: Position) {
        let mapping = Mapping {
            generated,
            original,
        };
        if self.mappings.last() == Some(&mapping) {
            return;
        }
        // a generated position maps to one original position
        if let Some(last) = self.mappings.last_mut() {
            if last.generated == generated {
                *last = mapping;
                return;
            }
        }
        self.mappings.push(mapping);
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// The `mappings` field: `;` between generated lines, `,` between segments
    pub fn encode(&self) -> String {
        let mut out = String::new();
        let mut line = 1;
        let mut previous_column = 0i64;
        let mut previous_original_line = 0i64;
        let mut previous_original_column = 0i64;
        let mut first_in_line = true;

        for mapping in &self.mappings {
            while line < mapping.generated.line {
                out.push(';');
                line += 1;
                previous_column = 0;
                first_in_line = true;
            }
            if !first_in_line {
                out.push(',');
            }
            first_in_line = false;

            let column = mapping.generated.column as i64;
            let original_line = mapping.original.line as i64 - 1;
            let original_column = mapping.original.column as i64;
            encode_vlq(column - previous_column, &mut out);
            encode_vlq(0, &mut out);
            encode_vlq(original_line - previous_original_line, &mut out);
            encode_vlq(original_column - previous_original_column, &mut out);

            previous_column = column;
            previous_original_line = original_line;
            previous_original_column = original_column;
        }
        out
    }

    pub fn build(
        &self,
        file: Option<String>,
        source_root: Option<String>,
        source_name: String,
        source_content: Option<String>,
    ) -> SourceMap {
        SourceMap {
            version: 3,
            file,
            source_root,
            sources: vec![source_name],
            sources_content: vec![source_content],
            names: Vec::new(),
            mappings: self.encode(),
        }
    }
}
