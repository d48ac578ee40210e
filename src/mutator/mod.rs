//! Document mutator
//!
//! Pure state transitions `(document, command) -> document`:
//! - add: appends a default field with a timestamp id
//! - update: JSON merge-patch into one field, id kept stable
//! - delete / reorder / clear
//! - load template: copies a catalog entry with fresh ids
//!
//! The input document is never touched; every command yields a new value.

use std::collections::HashSet;

use serde_json::Value;

use crate::convert::native;
use crate::errors::{FormError, FormResult};
use crate::ids::{self, Clock};
use crate::models::{grid_column_for_width, make_field, FieldOverrides, FieldType, FormDocument};
use crate::templates;

/// A request to change the current document
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddField(FieldType),
    UpdateField { id: String, patch: Value },
    DeleteField(String),
    ReorderFields(Vec<String>),
    UpdateMeta {
        title: Option<String>,
        description: Option<String>,
    },
    Clear,
    LoadTemplate(String),
}

/// What a command did, for the UI collaborator to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    FieldAdded(String),
    FieldUpdated(String),
    /// Any selection pointing at this id is now stale
    FieldDeleted(String),
    FieldsReordered,
    MetaUpdated,
    Cleared,
    TemplateLoaded(String),
    /// Target id not found; document returned as-is
    Unchanged,
}

impl FormEvent {
    pub fn as_string(&self) -> String {
        match self {
            FormEvent::FieldAdded(id) => format!("added:{}", id),
            FormEvent::FieldUpdated(id) => format!("updated:{}", id),
            FormEvent::FieldDeleted(id) => format!("deleted:{}", id),
            FormEvent::FieldsReordered => "reordered".to_string(),
            FormEvent::MetaUpdated => "meta_updated".to_string(),
            FormEvent::Cleared => "cleared".to_string(),
            FormEvent::TemplateLoaded(name) => format!("template:{}", name),
            FormEvent::Unchanged => "unchanged".to_string(),
        }
    }
}

/// Result of a successful command
#[derive(Debug, Clone)]
pub struct Transition {
    pub document: FormDocument,
    pub event: FormEvent,
}

impl Transition {
    fn unchanged(document: &FormDocument) -> Self {
        Self {
            document: document.clone(),
            event: FormEvent::Unchanged,
        }
    }
}

/// Applies commands to documents
pub struct Mutator;

impl Mutator {
    /// Apply one command, returning the new document
    pub fn apply(
        document: &FormDocument,
        command: Command,
        clock: &impl Clock,
    ) -> FormResult<Transition> {
        match command {
            Command::AddField(field_type) => Ok(Self::add_field(document, field_type, clock)),
            Command::UpdateField { id, patch } => Self::update_field(document, &id, &patch),
            Command::DeleteField(id) => Ok(Self::delete_field(document, &id)),
            Command::ReorderFields(order) => Self::reorder_fields(document, &order),
            Command::UpdateMeta { title, description } => {
                let mut next = document.clone();
                if let Some(title) = title {
                    next.title = title;
                }
                if let Some(description) = description {
                    next.description = description;
                }
                Ok(Transition {
                    document: next,
                    event: FormEvent::MetaUpdated,
                })
            }
            Command::Clear => Ok(Transition {
                document: FormDocument::default(),
                event: FormEvent::Cleared,
            }),
            Command::LoadTemplate(name) => Self::load_template(&name, clock),
        }
    }

    fn add_field(document: &FormDocument, field_type: FieldType, clock: &impl Clock) -> Transition {
        let taken = taken_ids(document);
        let id = ids::new_field_id(clock, &taken);
        let field = make_field(field_type, FieldOverrides::default().id(id.clone()));

        let mut next = document.clone();
        next.fields.push(field);
        Transition {
            document: next,
            event: FormEvent::FieldAdded(id),
        }
    }

    fn update_field(document: &FormDocument, id: &str, patch: &Value) -> FormResult<Transition> {
        let Some(patch_obj) = patch.as_object() else {
            return Err(FormError::InvalidOperation(
                "field update must be a JSON object".to_string(),
            ));
        };
        let Some(index) = document.position(id) else {
            tracing::debug!(id, "update target not found");
            return Ok(Transition::unchanged(document));
        };

        let mut patch_obj = patch_obj.clone();
        patch_obj.remove("id");

        // Width drives the grid column unless the patch pins one explicitly
        if let Some(styling) = patch_obj.get_mut("styling").and_then(Value::as_object_mut) {
            if !styling.contains_key("gridColumn") {
                if let Some(width) = styling.get("width").and_then(Value::as_str) {
                    let column = grid_column_for_width(width);
                    styling.insert("gridColumn".to_string(), Value::String(column));
                }
            }
        }

        let mut merged = serde_json::to_value(&document.fields[index])
            .map_err(|e| FormError::InvalidOperation(format!("field not encodable: {}", e)))?;
        json_patch::merge(&mut merged, &Value::Object(patch_obj));

        let Some(merged_obj) = merged.as_object() else {
            return Ok(Transition::unchanged(document));
        };
        let updated = native::sanitize_field(merged_obj, id.to_string());

        let mut next = document.clone();
        next.fields[index] = updated;
        Ok(Transition {
            document: next,
            event: FormEvent::FieldUpdated(id.to_string()),
        })
    }

    fn delete_field(document: &FormDocument, id: &str) -> Transition {
        if document.position(id).is_none() {
            return Transition::unchanged(document);
        }
        let mut next = document.clone();
        next.fields.retain(|f| f.id != id);
        Transition {
            document: next,
            event: FormEvent::FieldDeleted(id.to_string()),
        }
    }

    fn reorder_fields(document: &FormDocument, order: &[String]) -> FormResult<Transition> {
        let current: HashSet<&str> = document.fields.iter().map(|f| f.id.as_str()).collect();
        let requested: HashSet<&str> = order.iter().map(String::as_str).collect();

        if order.len() != document.fields.len() || requested.len() != order.len() {
            return Err(FormError::InvalidOperation(format!(
                "reorder expects {} distinct ids, got {}",
                document.fields.len(),
                order.len()
            )));
        }
        if let Some(unknown) = order.iter().find(|id| !current.contains(id.as_str())) {
            return Err(FormError::InvalidOperation(format!(
                "reorder references unknown field {}",
                unknown
            )));
        }

        let mut next = document.clone();
        next.fields = order
            .iter()
            .filter_map(|id| document.get_field(id).cloned())
            .collect();
        Ok(Transition {
            document: next,
            event: FormEvent::FieldsReordered,
        })
    }

    fn load_template(name: &str, clock: &impl Clock) -> FormResult<Transition> {
        let template = templates::get(name)
            .ok_or_else(|| FormError::NotFound(format!("template '{}'", name)))?;

        let mut document = template.document.clone();
        let mut taken = HashSet::new();
        for field in &mut document.fields {
            let id = ids::template_field_id(&field.id, clock, &taken);
            taken.insert(id.clone());
            field.id = id;
        }

        Ok(Transition {
            document,
            event: FormEvent::TemplateLoaded(name.to_string()),
        })
    }
}

fn taken_ids(document: &FormDocument) -> HashSet<String> {
    document.fields.iter().map(|f| f.id.clone()).collect()
}
