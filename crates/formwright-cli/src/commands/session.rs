//! Interactive builder session.
//!
//! Reads one builder command per line from stdin and keeps the builder open
//! between them. Edits are written by the debounced autosave; `quit` (or end
//! of input) leaves the builder, which saves whatever is left.

use crate::cli::GlobalFlags;
use crate::commands::edit::{self, EditAction};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use formwright_core::{Autosave, FormBuilder, SharedBuilder};
use formwright_schema::{FieldId, FormId};
use formwright_store::KeyValueStore;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive builder session
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Form to edit
    #[arg(value_name = "FORM_ID")]
    pub form_id: FormId,

    /// Autosave delay in milliseconds, overrides the config file
    #[arg(long, value_name = "MS")]
    pub autosave_ms: Option<u64>,
}

/// One line of session input
#[derive(Parser, Debug)]
#[command(name = "session", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    #[command(flatten)]
    Edit(EditAction),

    /// Expand a field for editing, or collapse all without an id
    Focus {
        #[arg(value_name = "FIELD_ID")]
        field_id: Option<FieldId>,
    },

    /// Save now instead of waiting for autosave
    Save,

    /// Save and end the session
    #[command(visible_alias = "exit")]
    Quit,
}

/// What the input loop should do after a line
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub async fn execute(args: SessionArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let config = global.load_config()?;
    let store = global.open_store(&config)?;
    let delay = args
        .autosave_ms
        .map_or_else(|| config.autosave_delay(), Duration::from_millis);

    let builder: SharedBuilder<_> = Arc::new(Mutex::new(FormBuilder::load(store, args.form_id)));
    let autosave = Autosave::spawn(Arc::clone(&builder), delay);
    tracing::info!(form_id = %args.form_id, delay_ms = %delay.as_millis(), "builder session started");
    eprintln!("Editing form {}. Type `help` for commands, `quit` to leave.", args.form_id);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read from stdin")?
    {
        let flow = handle_line(&builder, &line, global.json);
        if flow == Flow::Quit {
            break;
        }
    }

    autosave.shutdown();
    builder
        .lock()
        .leave()
        .context("failed to save form on exit")?;
    tracing::info!(form_id = %args.form_id, "builder session ended");
    Ok(())
}

fn handle_line<S: KeyValueStore>(builder: &Mutex<FormBuilder<S>>, line: &str, json: bool) -> Flow {
    let words = match split_words(line) {
        Ok(words) if words.is_empty() => return Flow::Continue,
        Ok(words) => words,
        Err(e) => {
            eprintln!("Error: {e}");
            return Flow::Continue;
        }
    };
    let parsed = match SessionLine::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) => {
            // also covers `help`, which clap reports as an error
            let _ = e.print();
            return Flow::Continue;
        }
    };

    let mut guard = builder.lock();
    let result = match parsed.command {
        SessionCommand::Edit(action) => edit::apply(&mut *guard, &action, json),
        SessionCommand::Focus { field_id } => guard.set_active(field_id).map_err(Into::into),
        SessionCommand::Save => guard.save().map_err(Into::into),
        SessionCommand::Quit => return Flow::Quit,
    };
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
    }
    Flow::Continue
}

/// Split a line into words, honouring single and double quotes
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
