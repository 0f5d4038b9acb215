//! Grant/revoke merging
//!
//! Applies a [`RightsDelta`] to a [`RightsModel`], producing a new model.
//! Granting a held right and revoking an absent one are both no-ops.

use crate::access::types::{Grantee, Operation, RightsDelta, RightsModel};
use crate::error::MergeError;
use tracing::debug;

/// Apply `delta` to `model`.
///
/// Every grantee token is validated before anything is applied, so an error
/// never leaves a partially merged result. Rights not named by the delta are
/// passed through unchanged.
pub fn merge(model: &RightsModel, delta: &RightsDelta) -> Result<RightsModel, MergeError> {
    let grantees = delta
        .grantees
        .iter()
        .map(|token| {
            Grantee::new(token).map_err(|reason| MergeError::InvalidGrantee {
                token: token.clone(),
                reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut next = model.clone();
    let mut touched = 0usize;
    for &right in &delta.rights {
        for grantee in &grantees {
            let changed = match delta.operation {
                Operation::Grant => next.insert(right, grantee.clone()),
                Operation::Revoke => next.remove(right, grantee),
            };
            touched += usize::from(changed);
        }
    }

    debug!(
        operation = %delta.operation,
        rights = delta.rights.len(),
        grantees = grantees.len(),
        changed = touched,
        "Merged rights delta"
    );
    Ok(next)
}
