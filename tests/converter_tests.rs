// Integration tests for import: component-tree conversion and native sanitizing

use anyhow::Result;
use formsmith::convert::{self, component_tree, native, SourceFormat};
use formsmith::errors::FormError;
use formsmith::ids::FixedClock;
use formsmith::models::{FieldType, Styling};
use formsmith::validation;
use serde_json::json;

/// Login screen as produced by the FormEngine designer
const LOGIN_SCREEN: &str = r#"{
  "version": "1",
  "tooltipType": "RsTooltip",
  "errorType": "RsErrorMessage",
  "form": {
    "key": "Screen",
    "type": "Screen",
    "props": {},
    "children": [
      {
        "key": "name",
        "type": "RsInput",
        "props": {
          "placeholder": { "value": "Enter your name" },
          "label": { "value": "Name" }
        },
        "schema": { "validations": [ { "key": "required" } ] }
      },
      {
        "key": "password",
        "type": "RsInput",
        "props": {
          "label": { "value": "Password" },
          "passwordMask": { "value": true }
        },
        "schema": { "validations": [ { "key": "required" } ] }
      },
      {
        "key": "submit",
        "type": "RsButton",
        "props": { "children": { "value": "Login" } }
      }
    ]
  },
  "localization": {},
  "defaultLanguage": "en-US"
}"#;

#[test]
fn test_single_input_scenario() -> Result<()> {
    let payload = json!({
        "form": {
            "key": "Screen",
            "type": "Screen",
            "children": [{
                "key": "name",
                "type": "RsInput",
                "props": {"label": {"value": "Name"}},
                "schema": {"validations": [{"key": "required"}]}
            }]
        }
    });

    let imported = convert::import_value(&payload, &FixedClock(0))?;
    assert_eq!(imported.format, SourceFormat::ComponentTree);

    let doc = imported.document;
    assert_eq!(doc.fields.len(), 1);
    let field = &doc.fields[0];
    assert_eq!(field.id, "name");
    assert_eq!(field.field_type, FieldType::Text);
    assert_eq!(field.label, "Name");
    assert!(field.required);
    assert_eq!(field.placeholder, "Enter Name");
    assert!(field.options.is_none());
    assert_eq!(field.styling.width, "100%");
    assert_eq!(field.styling.grid_column, "span 12");
    Ok(())
}

#[test]
fn test_login_screen() -> Result<()> {
    let imported = convert::import_str(LOGIN_SCREEN, &FixedClock(0))?;
    let doc = imported.document;

    assert_eq!(doc.title, "Screen");
    assert_eq!(doc.description, component_tree::CONVERTED_DESCRIPTION);

    // The button is dropped
    let ids: Vec<_> = doc.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["name", "password"]);
    assert_eq!(doc.fields[0].placeholder, "Enter your name");
    assert_eq!(doc.fields[1].placeholder, "Enter Password");
    assert!(doc.fields.iter().all(|f| f.required));
    Ok(())
}

#[test]
fn test_container_flattening() -> Result<()> {
    let payload = json!({
        "form": {
            "key": "Screen",
            "type": "Screen",
            "children": [
                {"key": "intro", "type": "RsHeader", "props": {"content": {"value": "Address"}}},
                {
                    "key": "group",
                    "type": "RsContainer",
                    "children": [
                        {"key": "city", "type": "RsInput"},
                        {
                            "key": "inner",
                            "type": "RsCard",
                            "children": [{"key": "zip", "type": "RsInput"}]
                        }
                    ]
                },
                {"key": "notes", "type": "RsTextArea"}
            ]
        }
    });

    let doc = component_tree::convert(&payload)?;
    let ids: Vec<_> = doc.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["intro", "group_city", "group_inner_zip", "notes"]);

    let city = doc.get_field("group_city").unwrap();
    assert_eq!(city.label, "city");
    assert_eq!(doc.fields[3].field_type, FieldType::Textarea);
    Ok(())
}

#[test]
fn test_unrecognized_node_falls_back_to_text() -> Result<()> {
    let payload = json!({
        "form": {
            "type": "Screen",
            "children": [{
                "key": "rating",
                "type": "RsRate",
                "schema": {"validations": [{"key": "required"}]}
            }]
        }
    });

    let doc = component_tree::convert(&payload)?;
    assert_eq!(doc.title, component_tree::FALLBACK_TITLE);
    let field = &doc.fields[0];
    assert_eq!(field.field_type, FieldType::Text);
    assert_eq!(field.label, "rating");
    assert_eq!(field.placeholder, "Enter rating");
    assert!(!field.required);
    Ok(())
}

#[test]
fn test_nodes_without_key_or_type_get_usable_ids() -> Result<()> {
    let payload = json!({"form": {"type": "Screen", "children": [{}, {"props": {}}]}});

    let doc = component_tree::convert(&payload)?;
    let ids: Vec<_> = doc.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["field", "field_2"]);
    assert_eq!(doc.fields[0].label, "field");
    assert_eq!(doc.fields[0].placeholder, "Enter field");
    validation::validate_document(&doc)?;
    Ok(())
}

#[test]
fn test_date_picker_defaults() -> Result<()> {
    let payload = json!({
        "form": {
            "type": "Screen",
            "children": [{"key": "dob", "type": "RsDatePicker", "props": {"label": {"value": "Birthday"}}}]
        }
    });
    let doc = component_tree::convert(&payload)?;
    assert_eq!(doc.fields[0].field_type, FieldType::Date);
    assert_eq!(doc.fields[0].placeholder, "Select date");
    Ok(())
}

#[test]
fn test_malformed_input_is_invalid_format() {
    let clock = FixedClock(0);
    for payload in ["", "not json", "\"just a string\"", "[1,2,3]", "{\"foo\": 1}"] {
        let result = convert::import_str(payload, &clock);
        assert!(
            matches!(result, Err(FormError::InvalidFormat(_))),
            "payload {:?}",
            payload
        );
    }
}

#[test]
fn test_wrong_root_type_is_not_converted() {
    let payload = json!({"form": {"key": "x", "type": "Page", "children": []}});
    assert_eq!(convert::detect_format(&payload), SourceFormat::Native);
    assert!(matches!(
        convert::import_value(&payload, &FixedClock(0)),
        Err(FormError::InvalidFormat(_))
    ));
}

#[test]
fn test_sanitize_is_idempotent() -> Result<()> {
    let clock = FixedClock(99);
    let messy = json!({
        "title": "Messy",
        "fields": [
            {"type": "radio", "label": "Pick"},
            {"id": "a", "type": "text", "styling": {"width": "50%", "border": "none"}},
            {"id": "a", "type": "select", "options": ["x", 1, null]},
            {"id": "h", "type": "heading", "placeholder": ""},
            "garbage"
        ],
        "layout": {"columns": "twelve"},
        "apiSettings": {"enabled": true, "headers": {"X-Token": 5}}
    });

    let once = native::sanitize_document(&messy, &clock)?;
    let twice = native::sanitize_document(&serde_json::to_value(&once)?, &clock)?;
    assert_eq!(once, twice);

    assert_eq!(once.fields.len(), 4);
    assert_eq!(once.fields[1].styling.grid_column, "span 6");
    assert_eq!(once.fields[1].styling.padding, Styling::default().padding);
    assert_eq!(
        once.fields[2].options,
        Some(vec!["x".to_string(), "1".to_string()])
    );
    assert_eq!(once.fields[3].placeholder, "");
    assert_eq!(once.api_settings.headers.get("X-Token").map(String::as_str), Some("5"));
    Ok(())
}

#[test]
fn test_native_roundtrip_through_import() -> Result<()> {
    let clock = FixedClock(1);
    let template = formsmith::templates::get("registration").unwrap();
    let text = serde_json::to_string(&template.document)?;

    let imported = convert::import_str(&text, &clock)?;
    assert_eq!(imported.format, SourceFormat::Native);
    assert_eq!(imported.document, template.document);
    Ok(())
}
