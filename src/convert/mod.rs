//! Import of form documents
//!
//! Payloads are format-sniffed: a component-tree document is converted,
//! anything else is treated as native and sanitized.

pub mod component_tree;
pub mod native;

use serde_json::Value;

use crate::errors::{FormError, FormResult};
use crate::ids::Clock;
use crate::models::FormDocument;

/// Which format an import payload was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Native,
    ComponentTree,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Native => write!(f, "native"),
            SourceFormat::ComponentTree => write!(f, "component-tree"),
        }
    }
}

/// Result of a successful import
#[derive(Debug, Clone)]
pub struct Imported {
    pub document: FormDocument,
    pub format: SourceFormat,
}

/// Decide which path a parsed payload takes
pub fn detect_format(value: &Value) -> SourceFormat {
    if component_tree::is_component_tree(value) {
        SourceFormat::ComponentTree
    } else {
        SourceFormat::Native
    }
}

/// Import from raw text
pub fn import_str(text: &str, clock: &impl Clock) -> FormResult<Imported> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| FormError::InvalidFormat(format!("not valid JSON: {}", e)))?;
    import_value(&value, clock)
}

/// Import from an already parsed payload
pub fn import_value(value: &Value, clock: &impl Clock) -> FormResult<Imported> {
    let format = detect_format(value);
    let document = match format {
        SourceFormat::ComponentTree => component_tree::convert(value)?,
        SourceFormat::Native => native::sanitize_document(value, clock)?,
    };
    Ok(Imported { document, format })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::FixedClock;

    #[test]
    fn test_unparseable_is_invalid_format() {
        let result = import_str("{not json", &FixedClock(0));
        assert!(matches!(result, Err(FormError::InvalidFormat(_))));
    }

    #[test]
    fn test_scalar_is_invalid_format() {
        let result = import_str("42", &FixedClock(0));
        assert!(matches!(result, Err(FormError::InvalidFormat(_))));
    }

    #[test]
    fn test_detects_native() -> anyhow::Result<()> {
        let imported = import_str(r#"{"title": "Hello", "fields": []}"#, &FixedClock(0))?;
        assert_eq!(imported.format, SourceFormat::Native);
        assert_eq!(imported.document.title, "Hello");
        Ok(())
    }
}
