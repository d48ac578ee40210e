//! Component-tree (FormEngine) to native conversion
//!
//! Walks `form.children` depth-first, pre-order. Each emitted field takes the
//! composite key of its node (ancestor container keys joined with `_`) as id.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::convert::native;
use crate::errors::{FormError, FormResult};
use crate::models::{
    default_options, make_field, Field, FieldOverrides, FieldType, FormDocument,
};

/// `form.type` of a component-tree root
pub const ROOT_SENTINEL: &str = "Screen";

/// Key for nodes that carry neither a key nor a type
pub const FALLBACK_KEY: &str = "field";

pub const FALLBACK_TITLE: &str = "Imported Form";
pub const CONVERTED_DESCRIPTION: &str = "Converted from FormEngine format";

/// Node categories the converter dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    TextInput,
    DatePicker,
    TextArea,
    RadioGroup,
    Checkbox,
    Header,
    Signature,
    Button,
    Container,
    Unknown,
}

impl NodeKind {
    pub fn from_type(raw: &str) -> Self {
        match raw {
            "RsInput" | "RsAutoComplete" | "RsNumberFormat" => NodeKind::TextInput,
            "RsDatePicker" | "RsTimePicker" => NodeKind::DatePicker,
            "RsTextArea" => NodeKind::TextArea,
            "RsRadioGroup" => NodeKind::RadioGroup,
            "RsCheckbox" | "RsToggle" => NodeKind::Checkbox,
            "RsHeader" | "RsLabel" | "RsStaticContent" => NodeKind::Header,
            "RsSignature" | "Signature" => NodeKind::Signature,
            "RsButton" => NodeKind::Button,
            "RsContainer" | "RsCard" | "RsTab" | "RsWizardStep" => NodeKind::Container,
            _ => NodeKind::Unknown,
        }
    }
}

/// Whether a parsed payload is a component-tree document
pub fn is_component_tree(value: &Value) -> bool {
    value
        .get("form")
        .and_then(Value::as_object)
        .map_or(false, |form| {
            form.contains_key("children")
                && form.get("type").and_then(Value::as_str) == Some(ROOT_SENTINEL)
        })
}

/// Convert a component-tree document into a native document
pub fn convert(value: &Value) -> FormResult<FormDocument> {
    if !is_component_tree(value) {
        return Err(FormError::InvalidFormat(format!(
            "expected a 'form' object of type '{}' with children",
            ROOT_SENTINEL
        )));
    }
    let form = &value["form"];

    let mut walker = Walker::default();
    walker.walk(children_of(form), None);

    let title = form
        .get("key")
        .and_then(Value::as_str)
        .filter(|k| !k.trim().is_empty())
        .unwrap_or(FALLBACK_TITLE);

    tracing::debug!(fields = walker.fields.len(), title, "converted component tree");

    Ok(FormDocument {
        title: title.to_string(),
        description: CONVERTED_DESCRIPTION.to_string(),
        fields: walker.fields,
        ..FormDocument::default()
    })
}

#[derive(Default)]
struct Walker {
    fields: Vec<Field>,
    taken: HashSet<String>,
}

impl Walker {
    fn walk(&mut self, children: &[Value], parent: Option<&str>) {
        for child in children {
            let Some(node) = child.as_object() else {
                tracing::warn!("skipping non-object component node");
                continue;
            };

            let node_type = node.get("type").and_then(Value::as_str).unwrap_or("");
            let key = node_key(node, node_type);
            let composite = match parent {
                Some(prefix) => format!("{}_{}", prefix, key),
                None => key.clone(),
            };

            match NodeKind::from_type(node_type) {
                NodeKind::Button => {
                    tracing::debug!(key = %composite, "skipping button node");
                }
                NodeKind::Container => {
                    self.walk(children_of(child), Some(composite.as_str()));
                }
                kind => {
                    let id = self.claim(composite);
                    self.fields.push(map_node(kind, node, &key, id));
                }
            }
        }
    }

    /// Reserve an id, disambiguating sibling key collisions with `_2`, `_3`, ...
    fn claim(&mut self, composite: String) -> String {
        let mut id = composite.clone();
        let mut n = 2;
        while self.taken.contains(&id) {
            id = format!("{}_{}", composite, n);
            n += 1;
        }
        if id != composite {
            tracing::warn!(key = %composite, renamed = %id, "duplicate component key");
        }
        self.taken.insert(id.clone());
        id
    }
}

/// Per-node-type field mapping
fn map_node(kind: NodeKind, node: &Map<String, Value>, key: &str, id: String) -> Field {
    let required = is_required(node);
    let label = prop_str(node, "label").unwrap_or_else(|| key.to_string());
    let base = FieldOverrides::default().id(id);

    match kind {
        NodeKind::TextInput => {
            let placeholder =
                prop_str(node, "placeholder").unwrap_or_else(|| format!("Enter {}", label));
            make_field(
                FieldType::Text,
                base.label(label).required(required).placeholder(placeholder),
            )
        }
        NodeKind::DatePicker => make_field(
            FieldType::Date,
            base.label(label)
                .required(required)
                .placeholder(prop_str(node, "placeholder").unwrap_or_else(|| "Select date".to_string())),
        ),
        NodeKind::TextArea => {
            let placeholder =
                prop_str(node, "placeholder").unwrap_or_else(|| format!("Enter {}", label));
            make_field(
                FieldType::Textarea,
                base.label(label).required(required).placeholder(placeholder),
            )
        }
        NodeKind::RadioGroup => {
            let items = radio_items(node);
            let options = if items.is_empty() { default_options() } else { items };
            make_field(
                FieldType::Radio,
                base.label(label).required(required).options(options),
            )
        }
        NodeKind::Checkbox => {
            let text = prop_str(node, "children")
                .or_else(|| prop_str(node, "label"))
                .unwrap_or_else(|| key.to_string());
            make_field(
                FieldType::Checkbox,
                base.label(text.clone())
                    .required(required)
                    .options([text]),
            )
        }
        NodeKind::Header => {
            let text = prop_str(node, "content")
                .or_else(|| prop_str(node, "text"))
                .unwrap_or_else(|| key.to_string());
            make_field(
                FieldType::Heading,
                base.label(text).required(false).placeholder(""),
            )
        }
        NodeKind::Signature => make_field(
            FieldType::Text,
            base.label("Signature")
                .required(required)
                .placeholder("Digital signature placeholder"),
        ),
        NodeKind::Unknown | NodeKind::Button | NodeKind::Container => make_field(
            FieldType::Text,
            base.label(key)
                .required(false)
                .placeholder(format!("Enter {}", key)),
        ),
    }
}

/// Node key, falling back to the lowercase type and then to `field`
fn node_key(node: &Map<String, Value>, node_type: &str) -> String {
    node.get("key")
        .and_then(native::scalar_to_string)
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .or_else(|| Some(node_type.trim().to_lowercase()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| FALLBACK_KEY.to_string())
}

fn children_of(node: &Value) -> &[Value] {
    node.get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Read `props.<name>.value` as a string
fn prop_str(node: &Map<String, Value>, name: &str) -> Option<String> {
    match node.get("props")?.get(name)?.get("value")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn radio_items(node: &Map<String, Value>) -> Vec<String> {
    node.get("props")
        .and_then(|p| p.get("items"))
        .and_then(|i| i.get("value"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("label").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn is_required(node: &Map<String, Value>) -> bool {
    node.get("schema")
        .and_then(|s| s.get("validations"))
        .and_then(Value::as_array)
        .map_or(false, |validations| {
            validations
                .iter()
                .any(|v| v.get("key").and_then(Value::as_str) == Some("required"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn screen(children: Value) -> Value {
        json!({"form": {"key": "Screen", "type": "Screen", "children": children}})
    }

    #[test]
    fn test_detection_requires_sentinel_and_children() {
        assert!(is_component_tree(&screen(json!([]))));
        assert!(!is_component_tree(
            &json!({"form": {"type": "Page", "children": []}})
        ));
        assert!(!is_component_tree(&json!({"form": {"type": "Screen"}})));
        assert!(!is_component_tree(&json!({"title": "x", "fields": []})));
    }

    #[test]
    fn test_node_kind_dispatch() {
        assert_eq!(NodeKind::from_type("RsInput"), NodeKind::TextInput);
        assert_eq!(NodeKind::from_type("RsContainer"), NodeKind::Container);
        assert_eq!(NodeKind::from_type("RsButton"), NodeKind::Button);
        assert_eq!(NodeKind::from_type("MyWidget"), NodeKind::Unknown);
    }

    #[test]
    fn test_radio_options_from_items() -> anyhow::Result<()> {
        let doc = convert(&screen(json!([{
            "key": "size",
            "type": "RsRadioGroup",
            "props": {
                "label": {"value": "Size"},
                "items": {"value": [{"label": "Small", "value": "s"}, {"label": "Large", "value": "l"}]}
            }
        }, {
            "key": "plain",
            "type": "RsRadioGroup"
        }])))?;
        assert_eq!(
            doc.fields[0].options,
            Some(vec!["Small".to_string(), "Large".to_string()])
        );
        assert_eq!(doc.fields[1].options, Some(default_options()));
        assert_eq!(doc.fields[1].label, "plain");
        Ok(())
    }

    #[test]
    fn test_checkbox_header_signature() -> anyhow::Result<()> {
        let doc = convert(&screen(json!([
            {"key": "agree", "type": "RsCheckbox", "props": {"children": {"value": "I agree"}},
             "schema": {"validations": [{"key": "required"}]}},
            {"key": "title", "type": "RsHeader", "props": {"content": {"value": "Welcome"}}},
            {"key": "sig", "type": "RsSignature"}
        ])))?;

        let agree = &doc.fields[0];
        assert_eq!(agree.field_type, FieldType::Checkbox);
        assert_eq!(agree.label, "I agree");
        assert_eq!(agree.options, Some(vec!["I agree".to_string()]));
        assert!(agree.required);

        let heading = &doc.fields[1];
        assert_eq!(heading.field_type, FieldType::Heading);
        assert_eq!(heading.label, "Welcome");
        assert_eq!(heading.placeholder, "");
        assert!(!heading.required);

        let sig = &doc.fields[2];
        assert_eq!(sig.field_type, FieldType::Text);
        assert_eq!(sig.label, "Signature");
        assert_eq!(sig.placeholder, "Digital signature placeholder");
        Ok(())
    }

    #[test]
    fn test_sibling_key_collision_is_disambiguated() -> anyhow::Result<()> {
        let doc = convert(&screen(json!([
            {"key": "name", "type": "RsInput"},
            {"key": "name", "type": "RsInput"},
            {"key": "name", "type": "RsTextArea"}
        ])))?;
        let ids: Vec<_> = doc.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["name", "name_2", "name_3"]);
        Ok(())
    }

    #[test]
    fn test_scalar_keys_are_stringified() -> anyhow::Result<()> {
        let doc = convert(&screen(json!([
            {"key": 5, "type": "RsInput"},
            {"key": "  ", "type": "RsTextArea"}
        ])))?;
        assert_eq!(doc.fields[0].id, "5");
        assert_eq!(doc.fields[0].label, "5");
        assert_eq!(doc.fields[1].id, "rstextarea");
        Ok(())
    }
}
