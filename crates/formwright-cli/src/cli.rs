//! CLI definition and argument parsing for formwright.
//! Global flags, the subcommand table and the shared store setup live here;
//! each subcommand's arguments live next to its implementation.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use formwright_core::FormsConfig;
use formwright_store::{FileStore, SchemaStore};
use std::path::PathBuf;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "formwright",
    author,
    version,
    about = "Build, preview and fill in dynamic forms"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List known forms
    #[command(visible_alias = "ls")]
    List,

    /// Create a new empty form
    Create,

    /// Edit one form in the builder
    Edit(crate::commands::edit::EditArgs),

    /// Interactive builder session with autosave, reading commands from stdin
    Session(crate::commands::session::SessionArgs),

    /// Render a stored form
    Preview(crate::commands::preview::PreviewArgs),

    /// Fill in a stored form and check the answers
    Submit(crate::commands::submit::SubmitArgs),

    /// Print the JSON Schema of the stored field format
    Schema,
}

// ============================================================================
// GLOBAL FLAGS
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct GlobalFlags {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "FORMWRIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding stored forms, overrides the config file
    #[arg(long, global = true, env = "FORMWRIGHT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalFlags {
    /// Resolve configuration: file values first, then flag overrides
    pub fn load_config(&self) -> anyhow::Result<FormsConfig> {
        let mut config = match &self.config {
            Some(path) => FormsConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => FormsConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// Open the file-backed schema store described by `config`
    pub fn open_store(&self, config: &FormsConfig) -> anyhow::Result<SchemaStore<FileStore>> {
        let backend = FileStore::open(config.data_dir.clone()).with_context(|| {
            format!("failed to open data directory {}", config.data_dir.display())
        })?;
        Ok(SchemaStore::with_index_key(
            backend,
            config.form_index_key.clone(),
        ))
    }

    /// Shorthand for [`load_config`](Self::load_config) + [`open_store`](Self::open_store)
    pub fn store(&self) -> anyhow::Result<SchemaStore<FileStore>> {
        let config = self.load_config()?;
        self.open_store(&config)
    }
}
