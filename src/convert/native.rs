//! Native format sanitizer
//!
//! Takes anything that looks like a native document and fills every missing
//! or mistyped attribute with its default. Content is never rejected, only
//! the top-level shape is checked.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use crate::errors::{FormError, FormResult};
use crate::ids::{self, Clock};
use crate::models::{
    default_options, grid_column_for_width, ApiSettings, Field, FieldType, FormDocument, Layout,
    Styling, DEFAULT_TITLE,
};

/// Whether a parsed payload has the shape of a native document
pub fn is_native_shape(value: &Value) -> bool {
    match value.as_object() {
        Some(obj) => {
            obj.get("fields").map_or(false, Value::is_array)
                || obj.get("title").map_or(false, Value::is_string)
        }
        None => false,
    }
}

/// Sanitize a native document
pub fn sanitize_document(value: &Value, clock: &impl Clock) -> FormResult<FormDocument> {
    let obj = match value.as_object() {
        Some(obj) if is_native_shape(value) => obj,
        _ => {
            return Err(FormError::InvalidFormat(
                "expected an object with a 'fields' array or a 'title'".to_string(),
            ))
        }
    };

    let defaults = FormDocument::default();
    let raw_fields = obj
        .get("fields")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    Ok(FormDocument {
        title: string_attr(obj, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: string_attr(obj, "description").unwrap_or(defaults.description),
        fields: sanitize_fields(raw_fields, clock),
        layout: sanitize_layout(obj.get("layout")),
        api_settings: sanitize_api_settings(obj.get("apiSettings")),
    })
}

/// Sanitize a list of candidate field objects, guaranteeing unique ids
pub fn sanitize_fields(raw_fields: &[Value], clock: &impl Clock) -> Vec<Field> {
    let mut taken = HashSet::new();
    let mut fields = Vec::with_capacity(raw_fields.len());

    for (idx, raw) in raw_fields.iter().enumerate() {
        let Some(obj) = raw.as_object() else {
            tracing::warn!(index = idx, "dropping non-object field entry");
            continue;
        };

        let id = match string_attr(obj, "id").map(|s| s.trim().to_string()) {
            Some(id) if !id.is_empty() && !taken.contains(&id) => id,
            Some(id) if !id.is_empty() => {
                let unique = ids::ensure_unique(id.clone(), &taken);
                tracing::warn!(duplicate = %id, renamed = %unique, "duplicate field id");
                unique
            }
            _ => {
                let mut synthesized = ids::synthesize_field_id(clock);
                while taken.contains(&synthesized) {
                    synthesized = ids::synthesize_field_id(clock);
                }
                tracing::debug!(index = idx, id = %synthesized, "synthesized missing field id");
                synthesized
            }
        };

        taken.insert(id.clone());
        fields.push(sanitize_field(obj, id));
    }

    fields
}

/// Build a fully populated field from a loose attribute map
///
/// The id is decided by the caller; any `id` in `obj` is ignored.
pub fn sanitize_field(obj: &Map<String, Value>, id: String) -> Field {
    let field_type = string_attr(obj, "type")
        .filter(|t| !t.trim().is_empty())
        .map(|t| FieldType::from(t.trim()))
        .unwrap_or(FieldType::Text);

    let options = if field_type.has_options() {
        let opts = obj
            .get("options")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(scalar_to_string).collect::<Vec<_>>())
            .unwrap_or_default();
        Some(if opts.is_empty() { default_options() } else { opts })
    } else {
        None
    };

    Field {
        id,
        label: string_attr(obj, "label").unwrap_or_else(|| field_type.default_label()),
        required: obj.get("required").and_then(Value::as_bool).unwrap_or(false),
        placeholder: string_attr(obj, "placeholder")
            .unwrap_or_else(|| field_type.default_placeholder()),
        options,
        styling: sanitize_styling(obj.get("styling")),
        field_type,
    }
}

/// Fill each styling attribute independently
pub fn sanitize_styling(value: Option<&Value>) -> Styling {
    let empty = Map::new();
    let obj = value.and_then(Value::as_object).unwrap_or(&empty);
    let defaults = Styling::default();

    let width = string_attr(obj, "width").unwrap_or(defaults.width);
    let grid_column =
        string_attr(obj, "gridColumn").unwrap_or_else(|| grid_column_for_width(&width));

    Styling {
        margin: string_attr(obj, "margin").unwrap_or(defaults.margin),
        padding: string_attr(obj, "padding").unwrap_or(defaults.padding),
        border: string_attr(obj, "border").unwrap_or(defaults.border),
        border_radius: string_attr(obj, "borderRadius").unwrap_or(defaults.border_radius),
        grid_row: string_attr(obj, "gridRow").unwrap_or(defaults.grid_row),
        width,
        grid_column,
    }
}

fn sanitize_layout(value: Option<&Value>) -> Layout {
    let defaults = Layout::default();
    let Some(obj) = value.and_then(Value::as_object) else {
        return defaults;
    };

    Layout {
        columns: obj
            .get("columns")
            .and_then(Value::as_u64)
            .filter(|c| *c > 0)
            .and_then(|c| u32::try_from(c).ok())
            .unwrap_or(defaults.columns),
        gap: string_attr(obj, "gap").unwrap_or(defaults.gap),
        auto_arrange: obj
            .get("autoArrange")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.auto_arrange),
    }
}

fn sanitize_api_settings(value: Option<&Value>) -> ApiSettings {
    let defaults = ApiSettings::default();
    let Some(obj) = value.and_then(Value::as_object) else {
        return defaults;
    };

    let headers = match obj.get("headers").and_then(Value::as_object) {
        Some(map) => map
            .iter()
            .filter_map(|(k, v)| scalar_to_string(v).map(|v| (k.clone(), v)))
            .collect::<BTreeMap<_, _>>(),
        None => defaults.headers,
    };

    ApiSettings {
        endpoint: string_attr(obj, "endpoint").unwrap_or(defaults.endpoint),
        method: string_attr(obj, "method").unwrap_or(defaults.method),
        headers,
        enabled: obj
            .get("enabled")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.enabled),
    }
}

/// Read a string-ish attribute; numbers and booleans are stringified
fn string_attr(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(scalar_to_string)
}

pub(crate) fn scalar_to_string(val: &Value) -> Option<String> {
    match val {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::FixedClock;
    use serde_json::json;

    #[test]
    fn test_rejects_unrecognized_shape() {
        let clock = FixedClock(1);
        assert!(matches!(
            sanitize_document(&json!([1, 2, 3]), &clock),
            Err(FormError::InvalidFormat(_))
        ));
        assert!(matches!(
            sanitize_document(&json!({"foo": "bar"}), &clock),
            Err(FormError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_fills_missing_attributes() -> anyhow::Result<()> {
        let doc = sanitize_document(
            &json!({"fields": [{"id": "a", "type": "select"}]}),
            &FixedClock(1),
        )?;
        assert_eq!(doc.title, DEFAULT_TITLE);
        let field = &doc.fields[0];
        assert_eq!(field.label, "Select Field");
        assert_eq!(field.placeholder, "Enter select");
        assert_eq!(field.options, Some(default_options()));
        assert_eq!(doc.layout, Layout::default());
        Ok(())
    }

    #[test]
    fn test_styling_defaults_per_attribute() {
        let styling = sanitize_styling(Some(&json!({"width": "33%", "border": "none"})));
        assert_eq!(styling.width, "33%");
        assert_eq!(styling.grid_column, "span 4");
        assert_eq!(styling.border, "none");
        assert_eq!(styling.padding, Styling::default().padding);
    }

    #[test]
    fn test_missing_and_duplicate_ids() -> anyhow::Result<()> {
        let doc = sanitize_document(
            &json!({"fields": [{"id": "x"}, {"id": "x"}, {"label": "no id"}, {"id": ""}]}),
            &FixedClock(9),
        )?;
        let ids: HashSet<_> = doc.fields.iter().map(|f| f.id.clone()).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(doc.fields[0].id, "x");
        assert!(doc.fields[1].id.starts_with("x_"));
        assert!(doc.fields[2].id.starts_with("field_9_"));
        Ok(())
    }

    #[test]
    fn test_wrong_types_are_defaulted() -> anyhow::Result<()> {
        let doc = sanitize_document(
            &json!({
                "title": "T",
                "fields": [{"id": 7, "type": "text", "required": "yes", "label": null, "options": ["a"]}, 42],
                "layout": {"columns": -3, "gap": "8px"}
            }),
            &FixedClock(1),
        )?;
        assert_eq!(doc.fields.len(), 1);
        let field = &doc.fields[0];
        assert_eq!(field.id, "7");
        assert!(!field.required);
        assert_eq!(field.label, "Text Field");
        assert!(field.options.is_none());
        assert_eq!(doc.layout.columns, 12);
        assert_eq!(doc.layout.gap, "8px");
        Ok(())
    }

    #[test]
    fn test_blank_type_defaults_to_text() -> anyhow::Result<()> {
        let doc = sanitize_document(
            &json!({"fields": [{"id": "a", "type": ""}, {"id": "b", "type": "   "}]}),
            &FixedClock(1),
        )?;
        for field in &doc.fields {
            assert_eq!(field.field_type, FieldType::Text);
            assert_eq!(field.label, "Text Field");
            assert_eq!(field.placeholder, "Enter text");
        }
        crate::validation::validate_document(&doc)?;
        Ok(())
    }
}
