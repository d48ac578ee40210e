//! Data models for formsmith documents
//!
//! These represent the canonical native JSON structure that is exported
//! and imported verbatim

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{self, SystemClock};

/// Number of grid columns a full-width field spans
pub const GRID_COLUMNS: u32 = 12;

/// Field type tag
///
/// The listed variants are the closed set the designer knows about. Anything
/// else (layout, structure or display extensions) is kept verbatim in `Other`
/// and left to the render layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    Password,
    Number,
    Textarea,
    Url,
    Tel,
    Date,
    Time,
    Datetime,
    Select,
    Radio,
    Checkbox,
    Heading,
    Separator,
    Range,
    Color,
    File,
    Image,
    Pdf,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Url => "url",
            FieldType::Tel => "tel",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Datetime => "datetime",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Heading => "heading",
            FieldType::Separator => "separator",
            FieldType::Range => "range",
            FieldType::Color => "color",
            FieldType::File => "file",
            FieldType::Image => "image",
            FieldType::Pdf => "pdf",
            FieldType::Other(raw) => raw.as_str(),
        }
    }

    /// Whether fields of this type carry an `options` list
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::Checkbox
        )
    }

    /// Whether this type only displays content and never takes input
    pub fn is_display(&self) -> bool {
        matches!(self, FieldType::Heading | FieldType::Separator)
    }

    /// Default label: the capitalized type name followed by "Field"
    pub fn default_label(&self) -> String {
        format!("{} Field", capitalize(self.as_str()))
    }

    /// Default placeholder: "Enter <type>"
    pub fn default_placeholder(&self) -> String {
        format!("Enter {}", self.as_str())
    }
}

impl From<&str> for FieldType {
    fn from(raw: &str) -> Self {
        match raw {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "password" => FieldType::Password,
            "number" => FieldType::Number,
            "textarea" => FieldType::Textarea,
            "url" => FieldType::Url,
            "tel" => FieldType::Tel,
            "date" => FieldType::Date,
            "time" => FieldType::Time,
            "datetime" => FieldType::Datetime,
            "select" => FieldType::Select,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            "heading" => FieldType::Heading,
            "separator" => FieldType::Separator,
            "range" => FieldType::Range,
            "color" => FieldType::Color,
            "file" => FieldType::File,
            "image" => FieldType::Image,
            "pdf" => FieldType::Pdf,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        FieldType::from(raw.as_str())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Field type must not be empty".to_string());
        }
        Ok(FieldType::from(trimmed.to_lowercase().as_str()))
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Presentation hints for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Styling {
    pub width: String,
    pub margin: String,
    pub padding: String,
    pub border: String,
    pub border_radius: String,
    pub grid_column: String,
    pub grid_row: String,
}

impl Default for Styling {
    fn default() -> Self {
        Self {
            width: "100%".to_string(),
            margin: "0 0 16px 0".to_string(),
            padding: "8px".to_string(),
            border: "1px solid #d1d5db".to_string(),
            border_radius: "4px".to_string(),
            grid_column: format!("span {}", GRID_COLUMNS),
            grid_row: "auto".to_string(),
        }
    }
}

impl Styling {
    /// Default styling for a given width, with the grid column kept in step
    pub fn with_width(width: &str) -> Self {
        Self {
            width: width.to_string(),
            grid_column: grid_column_for_width(width),
            ..Self::default()
        }
    }
}

/// Map a CSS width onto the 12-column grid span it implies
pub fn grid_column_for_width(width: &str) -> String {
    let span = match width.trim() {
        "50%" => 6,
        "33%" => 4,
        "25%" => 3,
        _ => GRID_COLUMNS,
    };
    format!("span {}", span)
}

/// Placeholder options for select/radio/checkbox fields created without any
pub fn default_options() -> Vec<String> {
    vec!["Option 1".to_string(), "Option 2".to_string()]
}

/// A single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    pub placeholder: String,
    /// Present iff `field_type.has_options()`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub styling: Styling,
}

/// Caller-supplied subset of field attributes for `make_field`
#[derive(Debug, Clone, Default)]
pub struct FieldOverrides {
    pub id: Option<String>,
    pub label: Option<String>,
    pub required: Option<bool>,
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
    pub styling: Option<Styling>,
}

impl FieldOverrides {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn width(mut self, width: &str) -> Self {
        self.styling = Some(Styling::with_width(width));
        self
    }
}

/// Build a fully populated field from a type and any subset of attributes
///
/// Unset attributes take type-derived defaults. Options are only kept for
/// option-carrying types; those get placeholder options when none are given.
/// A missing id is generated from the system clock.
pub fn make_field(field_type: FieldType, overrides: FieldOverrides) -> Field {
    let options = if field_type.has_options() {
        Some(
            overrides
                .options
                .filter(|opts| !opts.is_empty())
                .unwrap_or_else(default_options),
        )
    } else {
        None
    };

    Field {
        id: overrides
            .id
            .unwrap_or_else(|| ids::synthesize_field_id(&SystemClock)),
        label: overrides
            .label
            .unwrap_or_else(|| field_type.default_label()),
        required: overrides.required.unwrap_or(false),
        placeholder: overrides
            .placeholder
            .unwrap_or_else(|| field_type.default_placeholder()),
        options,
        styling: overrides.styling.unwrap_or_default(),
        field_type,
    }
}

/// Grid layout settings for the whole form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub columns: u32,
    pub gap: String,
    pub auto_arrange: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            gap: "16px".to_string(),
            auto_arrange: false,
        }
    }
}

/// Submission target; carried through but not interpreted by the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    pub endpoint: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub enabled: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            endpoint: String::new(),
            method: "POST".to_string(),
            headers,
            enabled: false,
        }
    }
}

pub const DEFAULT_TITLE: &str = "Untitled Form";

/// The full native form document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub api_settings: ApiSettings,
}

impl Default for FormDocument {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            fields: Vec::new(),
            layout: Layout::default(),
            api_settings: ApiSettings::default(),
        }
    }
}

impl FormDocument {
    /// Create an empty document with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Get field by ID
    pub fn get_field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Position of a field in display order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Field ids in display order
    pub fn field_ids(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.id.as_str()).collect()
    }

    /// Export artifact name: trimmed title with whitespace runs replaced by `_`
    pub fn file_name(&self) -> String {
        let trimmed = self.title.trim();
        let stem = if trimmed.is_empty() {
            "form".to_string()
        } else {
            WHITESPACE.replace_all(trimmed, "_").into_owned()
        };
        format!("{}.json", stem)
    }
}

static WHITESPACE: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| regex::Regex::new(r"\s+").expect("static regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_field_defaults() {
        let field = make_field(FieldType::Email, FieldOverrides::default().id("f1"));
        assert_eq!(field.id, "f1");
        assert_eq!(field.label, "Email Field");
        assert_eq!(field.placeholder, "Enter email");
        assert!(!field.required);
        assert!(field.options.is_none());
        assert_eq!(field.styling, Styling::default());
    }

    #[test]
    fn test_make_field_option_types_get_options() {
        let field = make_field(FieldType::Select, FieldOverrides::default().id("s"));
        assert_eq!(field.options, Some(default_options()));

        let field = make_field(
            FieldType::Text,
            FieldOverrides::default().id("t").options(["a", "b"]),
        );
        assert!(field.options.is_none());
    }

    #[test]
    fn test_unknown_type_kept_verbatim() {
        let field = make_field(
            FieldType::from("signature-pad"),
            FieldOverrides::default().id("x"),
        );
        assert_eq!(field.field_type.as_str(), "signature-pad");
        assert_eq!(field.label, "Signature-pad Field");
    }

    #[test]
    fn test_grid_column_for_width() {
        assert_eq!(grid_column_for_width("50%"), "span 6");
        assert_eq!(grid_column_for_width("33%"), "span 4");
        assert_eq!(grid_column_for_width("25%"), "span 3");
        assert_eq!(grid_column_for_width("100%"), "span 12");
        assert_eq!(grid_column_for_width("420px"), "span 12");
    }

    #[test]
    fn test_field_json_shape() {
        let field = make_field(FieldType::Radio, FieldOverrides::default().id("r"));
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "radio");
        assert_eq!(json["styling"]["borderRadius"], "4px");
        assert_eq!(json["options"][1], "Option 2");

        let text = make_field(FieldType::Text, FieldOverrides::default().id("t"));
        let json = serde_json::to_value(&text).unwrap();
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_file_name() {
        let doc = FormDocument::new("Customer  Feedback\tSurvey");
        assert_eq!(doc.file_name(), "Customer_Feedback_Survey.json");
        assert_eq!(FormDocument::new(" My Form ").file_name(), "My_Form.json");
        assert_eq!(FormDocument::new("   ").file_name(), "form.json");
    }
}
