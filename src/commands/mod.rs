//! CLI commands for formsmith

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::config::{load_config, save_config, Config, FormsmithPaths};
use crate::ids::SystemClock;
use crate::models::FieldType;
use crate::mutator::{Command, FormEvent};
use crate::session::Session;
use crate::templates;

/// Initialize formsmith for first-time setup
pub fn init(paths: &FormsmithPaths) -> Result<()> {
    if paths.is_initialized() {
        println!("Formsmith is already initialized at {}", paths.root.display());
        return Ok(());
    }

    println!("Initializing formsmith at {}...", paths.root.display());

    paths.ensure_dirs()?;
    println!("  Created directory structure");

    save_config(paths, &Config::default())?;
    println!("  Created config.toml");

    Session::new().save(&paths.session)?;
    println!("  Created empty session");

    println!();
    println!("Next steps:");
    println!("  formsmith template contact     Start from a template");
    println!("  formsmith add text             Add a field");
    println!("  formsmith export               Write the form as JSON");

    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Summary,
}

/// Apply one mutator command to the persisted session
pub fn run(paths: &FormsmithPaths, command: Command) -> Result<FormEvent> {
    ensure_initialized(paths)?;
    let mut session = Session::load(&paths.session)?;
    let event = session.dispatch(command, &SystemClock)?;
    session.save(&paths.session)?;
    Ok(event)
}

/// Start a fresh document
pub fn new_form(paths: &FormsmithPaths, title: Option<&str>, description: Option<&str>) -> Result<()> {
    run(paths, Command::Clear)?;
    if title.is_some() || description.is_some() {
        run(
            paths,
            Command::UpdateMeta {
                title: title.map(str::to_string),
                description: description.map(str::to_string),
            },
        )?;
    }
    println!("Started a new form");
    Ok(())
}

/// Append a field of the given type
pub fn add(paths: &FormsmithPaths, field_type: &str, label: Option<&str>, required: bool) -> Result<()> {
    let field_type = field_type
        .parse::<FieldType>()
        .map_err(|e| anyhow::anyhow!(e))?;

    let FormEvent::FieldAdded(id) = run(paths, Command::AddField(field_type))? else {
        bail!("Field was not added");
    };

    let mut patch = serde_json::Map::new();
    if let Some(label) = label {
        patch.insert("label".to_string(), Value::String(label.to_string()));
    }
    if required {
        patch.insert("required".to_string(), Value::Bool(true));
    }
    if !patch.is_empty() {
        run(
            paths,
            Command::UpdateField {
                id: id.clone(),
                patch: Value::Object(patch),
            },
        )?;
    }

    println!("✓ Added field {}", id);
    Ok(())
}

/// Merge a JSON patch into a field
pub fn update(paths: &FormsmithPaths, id: &str, patch: &str) -> Result<()> {
    let patch: Value = serde_json::from_str(patch).context("Patch must be valid JSON")?;
    match run(
        paths,
        Command::UpdateField {
            id: id.to_string(),
            patch,
        },
    )? {
        FormEvent::Unchanged => println!("No field {}; nothing changed", id),
        _ => println!("✓ Updated field {}", id),
    }
    Ok(())
}

pub fn delete(paths: &FormsmithPaths, id: &str) -> Result<()> {
    match run(paths, Command::DeleteField(id.to_string()))? {
        FormEvent::Unchanged => println!("No field {}; nothing changed", id),
        _ => println!("✓ Deleted field {}", id),
    }
    Ok(())
}

pub fn reorder(paths: &FormsmithPaths, ids: Vec<String>) -> Result<()> {
    run(paths, Command::ReorderFields(ids))?;
    println!("✓ Reordered fields");
    Ok(())
}

/// Reset to an empty document; the caller must confirm
pub fn clear(paths: &FormsmithPaths, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("Refusing to clear the form without --yes");
    }
    run(paths, Command::Clear)?;
    println!("✓ Cleared form");
    Ok(())
}

/// List the template catalog
pub fn list_templates() -> Result<()> {
    println!("{:<16} {:<32} {:>6}", "ID", "TITLE", "FIELDS");
    println!("{}", "-".repeat(56));
    for summary in templates::list() {
        println!(
            "{:<16} {:<32} {:>6}",
            summary.id,
            truncate(&summary.title, 30),
            summary.field_count
        );
    }
    Ok(())
}

pub fn load_template(paths: &FormsmithPaths, name: &str) -> Result<()> {
    run(paths, Command::LoadTemplate(name.to_string()))?;
    println!("✓ Loaded template {}", name);
    Ok(())
}

/// Import a native or component-tree file as the current document
pub async fn import(paths: &FormsmithPaths, file: &Path) -> Result<()> {
    ensure_initialized(paths)?;
    let mut session = Session::load(&paths.session)?;
    let format = session.import_file(file, &SystemClock).await?;
    session.save(&paths.session)?;

    println!(
        "✓ Imported {} ({} format, {} fields)",
        file.display(),
        format,
        session.document().fields.len()
    );
    Ok(())
}

/// Export the current document as JSON
pub async fn export(paths: &FormsmithPaths, output: Option<&Path>) -> Result<()> {
    ensure_initialized(paths)?;
    let config = load_config(paths)?;
    let session = Session::load(&paths.session)?;

    let dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => paths.export_dir(&config),
    };
    let path = session.export_to_dir(&dir, config.export.pretty).await?;
    println!("✓ Exported form to {}", path.display());
    Ok(())
}

pub fn select(paths: &FormsmithPaths, id: &str) -> Result<()> {
    ensure_initialized(paths)?;
    let mut session = Session::load(&paths.session)?;
    session.select(id)?;
    session.save(&paths.session)?;
    println!("✓ Selected {}", id);
    Ok(())
}

pub fn deselect(paths: &FormsmithPaths) -> Result<()> {
    ensure_initialized(paths)?;
    let mut session = Session::load(&paths.session)?;
    session.deselect();
    session.save(&paths.session)?;
    println!("✓ Cleared selection");
    Ok(())
}

/// Enter a preview value and report whether it validates
pub fn preview(paths: &FormsmithPaths, id: &str, value: &str) -> Result<()> {
    ensure_initialized(paths)?;
    let mut session = Session::load(&paths.session)?;
    let verdict = session.set_preview_value(id, value)?;
    session.save(&paths.session)?;
    match verdict {
        Some(reason) => println!("⚠ {}: {}", id, reason),
        None => println!("✓ {}: ok", id),
    }
    Ok(())
}

/// Show the current document
pub fn show(paths: &FormsmithPaths, format: OutputFormat) -> Result<()> {
    ensure_initialized(paths)?;
    let session = Session::load(&paths.session)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(session.document())?;
            println!("{}", json);
        }
        OutputFormat::Summary => print_summary(&session),
    }
    Ok(())
}

fn print_summary(session: &Session) {
    let doc = session.document();

    println!("Form: {}", doc.title);
    println!("{}", "=".repeat(50));
    if !doc.description.is_empty() {
        println!("{}", doc.description);
        println!();
    }

    println!(
        "{:<3} {:<28} {:<10} {:<24} {:<4}",
        "#", "ID", "TYPE", "LABEL", "REQ"
    );
    println!("{}", "-".repeat(72));
    for (idx, field) in doc.fields.iter().enumerate() {
        let marker = if session.selected_field() == Some(field.id.as_str()) {
            ">"
        } else {
            " "
        };
        println!(
            "{}{:<2} {:<28} {:<10} {:<24} {:<4}",
            marker,
            idx + 1,
            truncate(&field.id, 26),
            truncate(field.field_type.as_str(), 10),
            truncate(&field.label, 22),
            if field.required { "yes" } else { "" }
        );
    }

    println!();
    println!(
        "Layout:   {} columns, gap {}",
        doc.layout.columns, doc.layout.gap
    );
    if doc.api_settings.enabled {
        println!(
            "Submit:   {} {}",
            doc.api_settings.method, doc.api_settings.endpoint
        );
    }
}

/// Validate the current document
pub fn validate(paths: &FormsmithPaths, strict: bool) -> Result<()> {
    ensure_initialized(paths)?;
    let session = Session::load(&paths.session)?;
    let doc = session.document();

    print!("Schema validation... ");
    match crate::validation::validate_document(doc) {
        Ok(_) => println!("✓ passed"),
        Err(e) => {
            println!("✗ failed");
            println!("{}", e);
            bail!("Schema validation failed");
        }
    }

    print!("Linting... ");
    let warnings = crate::validation::lint_document(doc);
    if warnings.is_empty() {
        println!("✓ no warnings");
    } else {
        println!("⚠ {} warning(s)", warnings.len());
        for warning in &warnings {
            println!("  ⚠ {}", warning);
        }
        if strict {
            bail!("Validation failed in strict mode due to warnings");
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn ensure_initialized(paths: &FormsmithPaths) -> Result<()> {
    if !paths.is_initialized() {
        bail!("Formsmith not initialized. Run `formsmith init` first.");
    }
    Ok(())
}
