use std::collections::BTreeMap;
use std::path::Path;

use super::{CommandError, print_json};
use crate::presentation::state::AppState;

pub async fn validate(state: &AppState, path: &Path) -> Result<(), CommandError> {
    let result = state.validator.validate(path).await?;
    print_json(&result)
}

pub async fn ingest(
    state: &AppState,
    path: &Path,
    metadata: BTreeMap<String, String>,
    convert: bool,
) -> Result<(), CommandError> {
    let outcome = state.pipeline(convert)?.ingest(path, &metadata).await?;
    print_json(&outcome)
}
