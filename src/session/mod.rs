//! Session state: the single current document plus UI-facing selection
//!
//! Every change goes through `dispatch` or an import, which swap in a new
//! document value. A failed command or import leaves the session untouched.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::convert::{self, SourceFormat};
use crate::errors::{FormError, FormResult};
use crate::ids::Clock;
use crate::models::FormDocument;
use crate::mutator::{Command, FormEvent, Mutator};
use crate::validation;

/// A serialized document ready to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

/// Current document and the designer state attached to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    document: FormDocument,
    #[serde(default)]
    selected_field: Option<String>,
    #[serde(default)]
    preview_values: BTreeMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: FormDocument) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn selected_field(&self) -> Option<&str> {
        self.selected_field.as_deref()
    }

    pub fn preview_values(&self) -> &BTreeMap<String, String> {
        &self.preview_values
    }

    /// Run a command against the current document and install the result
    pub fn dispatch(&mut self, command: Command, clock: &impl Clock) -> FormResult<FormEvent> {
        let transition = Mutator::apply(&self.document, command, clock)?;
        tracing::debug!(event = %transition.event.as_string(), "dispatched command");

        match &transition.event {
            FormEvent::FieldDeleted(id) => {
                if self.selected_field.as_deref() == Some(id.as_str()) {
                    self.selected_field = None;
                }
                self.preview_values.remove(id);
            }
            FormEvent::Cleared | FormEvent::TemplateLoaded(_) => self.reset_designer_state(),
            _ => {}
        }

        self.document = transition.document;
        Ok(transition.event)
    }

    /// Select a field of the current document
    pub fn select(&mut self, id: &str) -> FormResult<()> {
        if self.document.get_field(id).is_none() {
            return Err(FormError::NotFound(format!("field '{}'", id)));
        }
        self.selected_field = Some(id.to_string());
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected_field = None;
    }

    /// Record a preview value and return its validation reason code, if any
    pub fn set_preview_value(
        &mut self,
        id: &str,
        value: impl Into<String>,
    ) -> FormResult<Option<&'static str>> {
        let field = self
            .document
            .get_field(id)
            .ok_or_else(|| FormError::NotFound(format!("field '{}'", id)))?;
        let value = value.into();
        let verdict = validation::validate_value(field, &value);
        self.preview_values.insert(id.to_string(), value);
        Ok(verdict)
    }

    /// Replace the current document, dropping selection and preview values
    pub fn install(&mut self, document: FormDocument) {
        self.document = document;
        self.reset_designer_state();
    }

    /// Import a payload; on failure the session is unchanged
    pub fn import_str(&mut self, text: &str, clock: &impl Clock) -> FormResult<SourceFormat> {
        let imported = convert::import_str(text, clock)?;
        tracing::info!(
            format = %imported.format,
            fields = imported.document.fields.len(),
            "installed imported document"
        );
        self.install(imported.document);
        Ok(imported.format)
    }

    /// Read a file and import it; read failures count as invalid format
    pub async fn import_file(
        &mut self,
        path: impl AsRef<Path>,
        clock: &impl Clock,
    ) -> FormResult<SourceFormat> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            FormError::InvalidFormat(format!("could not read {}: {}", path.display(), e))
        })?;
        self.import_str(&text, clock)
    }

    /// Serialize the current document in native format
    pub fn export(&self, pretty: bool) -> Result<ExportArtifact> {
        let contents = if pretty {
            serde_json::to_string_pretty(&self.document)
        } else {
            serde_json::to_string(&self.document)
        };
        let contents = contents.context("Failed to serialize form document")?;

        Ok(ExportArtifact {
            file_name: self.document.file_name(),
            contents,
        })
    }

    /// Write the export artifact into a directory
    pub async fn export_to_dir(&self, dir: impl AsRef<Path>, pretty: bool) -> Result<PathBuf> {
        let artifact = self.export(pretty)?;
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(&artifact.file_name);
        tokio::fs::write(&path, artifact.contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Load a persisted session; a missing file yields an empty session
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).context("Failed to read session file")?;
        serde_json::from_str(&content).context("Failed to parse session file")
    }

    /// Persist the session
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize session")?;
        fs::write(path, content).context("Failed to write session file")?;
        Ok(())
    }

    fn reset_designer_state(&mut self) {
        self.selected_field = None;
        self.preview_values.clear();
    }
}
