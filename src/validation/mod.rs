//! Validation for form documents and preview values

use anyhow::{bail, Result};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

use crate::models::{grid_column_for_width, Field, FieldType, FormDocument};

const FORM_SCHEMA: &str = include_str!("../../schemas/form.json");

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"));
static HTTP_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/?#]+").expect("static regex"));

/// Validate a raw native document against the embedded JSON schema
pub fn validate_json(document: &Value) -> Result<()> {
    let schema_json: Value = serde_json::from_str(FORM_SCHEMA)?;

    // Compile the schema
    let compiled = JSONSchema::compile(&schema_json)
        .map_err(|e| anyhow::anyhow!("Failed to compile JSON schema: {}", e))?;

    if let Err(errors) = compiled.validate(document) {
        let error_messages: Vec<String> = errors.map(|e| format!("{}", e)).collect();
        bail!("Schema validation failed:\n{}", error_messages.join("\n"));
    }

    Ok(())
}

/// Validate a document: schema first, then the structural invariants
pub fn validate_document(document: &FormDocument) -> Result<()> {
    validate_json(&serde_json::to_value(document)?)?;

    let mut ids = HashSet::new();
    for field in &document.fields {
        if field.id.trim().is_empty() {
            bail!("Field with label '{}' has an empty id", field.label);
        }
        if !ids.insert(field.id.as_str()) {
            bail!("Duplicate field id: {}", field.id);
        }
        if field.options.is_some() != field.field_type.has_options() {
            bail!(
                "Field {} of type {} violates the options rule",
                field.id,
                field.field_type
            );
        }
    }

    Ok(())
}

/// Check for common document issues (lint-like checks)
pub fn lint_document(document: &FormDocument) -> Vec<String> {
    let mut warnings = Vec::new();

    if document.fields.is_empty() {
        warnings.push("Form has no fields".to_string());
    }
    if document.title.trim().is_empty() {
        warnings.push("Form has an empty title".to_string());
    }

    for field in &document.fields {
        if !field.field_type.is_display() && field.label.trim().is_empty() {
            warnings.push(format!("{}: Input field has no label", field.id));
        }

        if let Some(options) = &field.options {
            let unique: HashSet<_> = options.iter().collect();
            if unique.len() != options.len() {
                warnings.push(format!("{}: Duplicate options", field.id));
            }
        }

        let expected = grid_column_for_width(&field.styling.width);
        if field.styling.grid_column != expected {
            warnings.push(format!(
                "{}: width {} usually spans '{}', found '{}'",
                field.id, field.styling.width, expected, field.styling.grid_column
            ));
        }

        if field.required && field.field_type.is_display() {
            warnings.push(format!("{}: Display field marked required", field.id));
        }

        if let FieldType::Other(raw) = &field.field_type {
            warnings.push(format!("{}: Unrecognized field type '{}'", field.id, raw));
        }
    }

    if document.api_settings.enabled && document.api_settings.endpoint.trim().is_empty() {
        warnings.push("Submission is enabled but no endpoint is set".to_string());
    }

    warnings
}

/// Validate a preview value entered for a field and return a reason code
///
/// Empty values only fail when the field is required. Kind-specific checks:
/// `email`, `url` (http/https with a host), `number`/`range` (float) and
/// `tel` (digits plus `+-() ` and spaces).
pub fn validate_value(field: &Field, value: &str) -> Option<&'static str> {
    let value = value.trim();

    if value.is_empty() {
        return if field.required && !field.field_type.is_display() {
            Some("required")
        } else {
            None
        };
    }

    match field.field_type {
        FieldType::Email => (!EMAIL.is_match(value)).then_some("invalid_email"),
        FieldType::Url => (!HTTP_URL.is_match(value)).then_some("invalid_url"),
        FieldType::Number | FieldType::Range => {
            value.parse::<f64>().is_err().then_some("invalid_number")
        }
        FieldType::Tel => {
            let ok = value
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '));
            (!ok).then_some("invalid_phone")
        }
        FieldType::Select | FieldType::Radio => {
            let known = field
                .options
                .as_ref()
                .map_or(false, |opts| opts.iter().any(|o| o == value));
            (!known).then_some("unknown_option")
        }
        _ => None,
    }
}
