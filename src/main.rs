//! formsmith - form designer core on the command line

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use formsmith::commands;
use formsmith::config::{self, FormsmithPaths};

#[derive(Parser)]
#[command(name = "formsmith")]
#[command(author, version, about = "Design forms as JSON: fields, templates, and component-tree import")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize formsmith (first-time setup)
    Init,

    /// Start a new, empty form
    New {
        /// Form title
        #[arg(short, long)]
        title: Option<String>,

        /// Form description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Show the current form
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a field
    Add {
        /// Field type (text, email, select, radio, ...)
        field_type: String,

        /// Field label
        #[arg(short, long)]
        label: Option<String>,

        /// Mark the field required
        #[arg(short, long)]
        required: bool,
    },

    /// Merge a JSON object into a field, e.g. '{"styling":{"width":"50%"}}'
    Update {
        /// Field ID
        id: String,

        /// JSON merge patch
        patch: String,
    },

    /// Delete a field
    Delete {
        /// Field ID
        id: String,
    },

    /// Reorder fields; every current field ID exactly once
    Reorder {
        ids: Vec<String>,
    },

    /// Reset to an empty form
    Clear {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// List built-in templates
    Templates,

    /// Replace the current form with a template
    Template {
        /// Template ID
        id: String,
    },

    /// Import a native or FormEngine JSON file
    Import {
        file: PathBuf,
    },

    /// Export the current form as JSON
    Export {
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Select a field
    Select {
        id: String,
    },

    /// Clear the field selection
    Deselect,

    /// Enter a preview value for a field and validate it
    Preview {
        id: String,
        value: String,
    },

    /// Validate the current form
    Validate {
        /// Strict mode (fail on warnings)
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let paths = FormsmithPaths::new()?;
    let config = config::load_config(&paths)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init => commands::init(&paths)?,
        Commands::New { title, description } => {
            commands::new_form(&paths, title.as_deref(), description.as_deref())?;
        }
        Commands::Show { json } => {
            let format = if json {
                commands::OutputFormat::Json
            } else {
                commands::OutputFormat::Summary
            };
            commands::show(&paths, format)?;
        }
        Commands::Add {
            field_type,
            label,
            required,
        } => {
            commands::add(&paths, &field_type, label.as_deref(), required)?;
        }
        Commands::Update { id, patch } => commands::update(&paths, &id, &patch)?,
        Commands::Delete { id } => commands::delete(&paths, &id)?,
        Commands::Reorder { ids } => commands::reorder(&paths, ids)?,
        Commands::Clear { yes } => commands::clear(&paths, yes)?,
        Commands::Templates => commands::list_templates()?,
        Commands::Template { id } => commands::load_template(&paths, &id)?,
        Commands::Import { file } => commands::import(&paths, &file).await?,
        Commands::Export { output } => commands::export(&paths, output.as_deref()).await?,
        Commands::Select { id } => commands::select(&paths, &id)?,
        Commands::Deselect => commands::deselect(&paths)?,
        Commands::Preview { id, value } => commands::preview(&paths, &id, &value)?,
        Commands::Validate { strict } => commands::validate(&paths, strict)?,
    }

    Ok(())
}
