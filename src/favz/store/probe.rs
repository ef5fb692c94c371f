use super::backend::StorageMedium;
use tracing::debug;

pub const SENTINEL_KEY: &str = "__storage_test__";

/// Write-then-delete a sentinel entry to find out whether the medium is usable.
///
/// Any error counts as "unavailable". The sentinel is removed on every path.
pub fn is_storage_available<M: StorageMedium + ?Sized>(medium: &M) -> bool {
    let written = medium.set_item(SENTINEL_KEY, SENTINEL_KEY);
    let removed = medium.remove_item(SENTINEL_KEY);

    match (written, removed) {
        (Ok(()), Ok(())) => true,
        (Err(e), _) | (Ok(()), Err(e)) => {
            debug!(error = %e, "storage probe failed");
            false
        }
    }
}
