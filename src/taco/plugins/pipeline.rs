//! The `pipeline` plugin: `value |> f`
//!
//! Adds `|>` to the operator table below every built-in operator, so
//! `a + b |> f` pipes the sum. The printer half spaces the operator like any other
//! binary operator.
//!
//! Configuration is optional; when given it must be an object. The only key read is
//! `"proposal"`, and the only proposal supported is `"minimal"`.

use super::{ExpressionExtension, Plugin, PrinterExtension};
use crate::taco::error::ConfigurationError;
use crate::taco::parsing::OperatorDescriptor;
use crate::taco::printing::{Spacing, SpacingTest};
use crate::taco::token::TokenKind;
use serde_json::Value;
use std::rc::Rc;

pub const NAME: &str = "pipeline";

/// Binding power of `|>`: looser than `||`
const PIPELINE_POWER: i32 = 0;

pub struct PipelinePlugin;

struct PipelineOperator;

impl ExpressionExtension for PipelineOperator {
    fn operators(&self) -> Vec<(TokenKind, OperatorDescriptor)> {
        vec![(
            TokenKind::Pipeline,
            OperatorDescriptor::binary(PIPELINE_POWER, "|>"),
        )]
    }
}

struct PipelineSpacing;

impl PrinterExtension for PipelineSpacing {
    fn space_after(&self, spacing: Spacing, left: TokenKind) -> Option<SpacingTest> {
        (spacing == Spacing::Cosmetic && left == TokenKind::Pipeline).then_some(SpacingTest::Always)
    }

    fn space_when_after(
        &self,
        spacing: Spacing,
        right: TokenKind,
        _left: TokenKind,
    ) -> Option<SpacingTest> {
        (spacing == Spacing::Cosmetic && right == TokenKind::Pipeline)
            .then_some(SpacingTest::Always)
    }
}

fn invalid(reason: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidPluginConfig {
        name: NAME.to_string(),
        reason: reason.into(),
    }
}

impl Plugin for PipelinePlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn expression_extension(
        &self,
        config: &Value,
    ) -> Result<Option<Rc<dyn ExpressionExtension>>, ConfigurationError> {
        match config {
            Value::Null => {}
            Value::Object(map) => match map.get("proposal") {
                None => {}
                Some(Value::String(proposal)) if proposal == "minimal" => {}
                Some(other) => return Err(invalid(format!("unsupported proposal {}", other))),
            },
            other => return Err(invalid(format!("expected an object, got {}", other))),
        }
        Ok(Some(Rc::new(PipelineOperator)))
    }

    fn printer_extension(&self) -> Option<Rc<dyn PrinterExtension>> {
        Some(Rc::new(PipelineSpacing))
    }
}
