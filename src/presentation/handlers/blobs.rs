use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::{CommandError, print_json};
use crate::domain::{ContainerType, DocumentId};
use crate::presentation::state::AppState;

#[derive(Serialize)]
struct ContainerStatus {
    container: String,
    created: bool,
}

#[derive(Serialize)]
struct DeleteSummary<'a> {
    document_id: &'a str,
    container: ContainerType,
    deleted: usize,
}

pub async fn list(
    state: &AppState,
    container: ContainerType,
    prefix: Option<&str>,
) -> Result<(), CommandError> {
    let blobs = state.uploader.list_documents(container, prefix).await?;
    print_json(&blobs)
}

pub async fn download(
    state: &AppState,
    document_id: &str,
    blob_name: &str,
    container: ContainerType,
    output: Option<&Path>,
) -> Result<(), CommandError> {
    let data = state
        .uploader
        .download_document(&DocumentId::from_raw(document_id), blob_name, container)
        .await?;

    match output {
        Some(path) => tokio::fs::write(path, &data).await?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub async fn delete(
    state: &AppState,
    document_id: &str,
    container: ContainerType,
) -> Result<(), CommandError> {
    let deleted = state
        .uploader
        .delete_document(&DocumentId::from_raw(document_id), container)
        .await?;
    print_json(&DeleteSummary {
        document_id,
        container,
        deleted,
    })
}

pub async fn init_containers(state: &AppState) -> Result<(), CommandError> {
    let statuses: Vec<ContainerStatus> = state
        .uploader
        .ensure_containers()
        .await?
        .into_iter()
        .map(|(container, created)| ContainerStatus { container, created })
        .collect();
    print_json(&statuses)
}
