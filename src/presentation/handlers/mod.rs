mod blobs;
mod documents;

use std::io::Write;

use serde::Serialize;

use crate::application::services::{FileValidationError, IngestionError, StorageError};
use crate::presentation::cli::Commands;
use crate::presentation::state::{AppState, AppStateError};

pub use blobs::{delete, download, init_containers, list};
pub use documents::{ingest, validate};

/// Runs one command against the wired services.
pub async fn dispatch(state: &AppState, command: Commands) -> Result<(), CommandError> {
    match command {
        Commands::Validate { path } => validate(state, &path).await,
        Commands::Ingest {
            path,
            metadata,
            convert,
        } => ingest(state, &path, metadata.into_iter().collect(), convert).await,
        Commands::List { container, prefix } => list(state, container, prefix.as_deref()).await,
        Commands::Download {
            document_id,
            blob_name,
            container,
            output,
        } => download(state, &document_id, &blob_name, container, output.as_deref()).await,
        Commands::Delete {
            document_id,
            container,
        } => delete(state, &document_id, container).await,
        Commands::InitContainers => init_containers(state).await,
    }
}

fn print_json(value: &impl Serialize) -> Result<(), CommandError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] FileValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Ingestion(#[from] IngestionError),
    #[error(transparent)]
    State(#[from] AppStateError),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}
