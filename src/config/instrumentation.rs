//! Dynamic instrumentation rules.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// What the weaver captures around a matched method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureKind {
    Timer,
    TraceEntry,
    Transaction,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodModifier {
    Public,
    Private,
    Protected,
    PackagePrivate,
    Static,
    NotStatic,
}

/// One instrumentation rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstrumentationConfig {
    pub class_name: String,
    pub method_name: String,
    pub method_parameter_types: Vec<String>,
    pub method_return_type: String,
    pub method_modifiers: Vec<MethodModifier>,
    pub capture_kind: CaptureKind,
    pub timer_name: String,
    pub trace_entry_message_template: String,
    pub trace_entry_stack_threshold_millis: Option<u64>,
    pub trace_entry_capture_self_nested: bool,
    pub transaction_type: String,
    pub transaction_name_template: String,
    pub transaction_user_template: String,
    /// Plugin property gating the whole rule
    pub enabled_property: String,
    /// Plugin property gating only the trace entry
    pub trace_entry_enabled_property: String,
}

impl InstrumentationConfig {
    /// Problems that keep the weaver from applying this rule
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.class_name.trim().is_empty() {
            errors.push("className is empty".to_string());
        }
        if self.method_name.trim().is_empty() {
            errors.push("methodName is empty".to_string());
        }
        let needs_timer = matches!(
            self.capture_kind,
            CaptureKind::Timer | CaptureKind::TraceEntry | CaptureKind::Transaction
        );
        if needs_timer {
            if self.timer_name.is_empty() {
                errors.push("timerName is empty".to_string());
            } else if !self
                .timer_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == ' ')
            {
                errors.push("timerName contains invalid characters".to_string());
            }
        }
        if self.capture_kind == CaptureKind::TraceEntry
            && self.trace_entry_message_template.is_empty()
        {
            errors.push("traceEntryMessageTemplate is empty".to_string());
        }
        if self.capture_kind == CaptureKind::Transaction {
            if self.transaction_type.is_empty() {
                errors.push("transactionType is empty".to_string());
            }
            if self.transaction_name_template.is_empty() {
                errors.push("transactionNameTemplate is empty".to_string());
            }
        }
        errors
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            return Ok(());
        }
        Err(ConfigError::Validation(format!(
            "instrumentation {}::{}: {}",
            self.class_name,
            self.method_name,
            errors.join(", ")
        )))
    }
}
