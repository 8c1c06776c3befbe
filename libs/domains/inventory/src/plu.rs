//! PLU (Price Look-Up) code generation.
//!
//! Codes have the shape `<letter><9-digit number><letter>`, e.g.
//! `K482915306T`. Uniqueness is checked against the repository before a
//! candidate is returned; the persistence layer additionally enforces a
//! unique index, so a lost check-then-insert race surfaces as an insert
//! error rather than a duplicate code.

use rand::RngExt;

use crate::error::{InventoryError, InventoryResult};
use crate::repository::InventoryRepository;

/// Collision retries before giving up. The keyspace holds ~600 billion
/// codes, so hitting this cap means something is wrong with the data.
pub const MAX_ATTEMPTS: usize = 32;

/// Compose one random candidate code
fn random_candidate() -> String {
    let mut rng = rand::rng();
    let number: u32 = rng.random_range(100_000_000..=999_999_999);
    let first = char::from(rng.random_range(b'A'..=b'Z'));
    let last = char::from(rng.random_range(b'A'..=b'Z'));
    format!("{first}{number}{last}")
}

/// Generate a PLU that is unique among existing products.
///
/// Retries with fresh candidates while the repository reports a
/// collision, up to [`MAX_ATTEMPTS`].
pub async fn generate<R>(repository: &R) -> InventoryResult<String>
where
    R: InventoryRepository + ?Sized,
{
    for _ in 0..MAX_ATTEMPTS {
        let candidate = random_candidate();
        if !repository.plu_exists(&candidate).await? {
            return Ok(candidate);
        }
        tracing::debug!(candidate, "PLU collision, retrying");
    }

    Err(InventoryError::PluExhausted(MAX_ATTEMPTS))
}
