//! Access file editing
//!
//! Runs the read-modify-write cycle around the pure access core:
//! fetch → parse → merge → marshal → conditional write. A write that loses a
//! race with another editor restarts the whole cycle from a fresh fetch.

use crate::access::{RightsDelta, RightsModel, is_access_file_name, marshal, merge, parse};
use crate::error::{AppError, Result, StoreError};
use crate::store::{AccessStore, Versioned};
use tracing::{debug, info, warn};

/// Result of an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// The Access file that was edited
    pub path: String,
    /// The merged rights
    pub model: RightsModel,
    /// Canonical text of the merged rights
    pub bytes: Vec<u8>,
    /// False if the file already had exactly this content
    pub changed: bool,
    /// Number of read-modify-write cycles used
    pub attempts: u32,
}

/// Compute the edited Access file without writing it back.
pub async fn preview_access_edit(
    store: &dyn AccessStore,
    path: &str,
    delta: &RightsDelta,
) -> Result<EditOutcome> {
    ensure_access_file(path)?;
    let (current, model, bytes) = prepare(store, path, delta).await?;
    Ok(EditOutcome {
        path: path.to_string(),
        changed: bytes != current.bytes,
        model,
        bytes,
        attempts: 1,
    })
}

/// Apply `delta` to the Access file at `path`, retrying up to `max_retries`
/// times when the file changes between fetch and write.
pub async fn edit_access_file(
    store: &dyn AccessStore,
    path: &str,
    delta: &RightsDelta,
    max_retries: u32,
) -> Result<EditOutcome> {
    ensure_access_file(path)?;

    let mut attempts = 0;
    loop {
        attempts += 1;
        let (current, model, bytes) = prepare(store, path, delta).await?;

        if bytes == current.bytes {
            info!(path, "Access file already up to date");
            return Ok(EditOutcome {
                path: path.to_string(),
                model,
                bytes,
                changed: false,
                attempts,
            });
        }

        match store.store_if_unchanged(path, &bytes, current.version).await {
            Ok(_) => {
                info!(
                    path,
                    operation = %delta.operation,
                    attempts,
                    backend = store.backend(),
                    "Access file updated"
                );
                return Ok(EditOutcome {
                    path: path.to_string(),
                    model,
                    bytes,
                    changed: true,
                    attempts,
                });
            }
            Err(StoreError::Conflict { .. }) if attempts <= max_retries => {
                warn!(path, attempts, "Access file changed during edit, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn ensure_access_file(path: &str) -> Result<()> {
    if is_access_file_name(path) {
        Ok(())
    } else {
        Err(AppError::NotAnAccessFile(path.to_string()))
    }
}

async fn prepare(
    store: &dyn AccessStore,
    path: &str,
    delta: &RightsDelta,
) -> Result<(Versioned, RightsModel, Vec<u8>)> {
    let current = store.fetch(path).await?;
    let model = merge(&parse(path, &current.bytes)?, delta)?;
    let bytes = marshal(&model);
    debug!(path, before = current.bytes.len(), after = bytes.len(), "Prepared edit");
    Ok((current, model, bytes))
}
