//! Ephemeral idol-pack offers.
//!
//! A pack is a short-lived, single-use offer: five generated drafts priced
//! at creation, claimable exactly once before the TTL runs out. Offers live
//! only in process memory -- losing them on restart is acceptable, the
//! player just opens a new pack and is charged nothing.

use std::collections::HashMap;

use encore_core::idol::IdolDraft;
use encore_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Offer lifetime in seconds.
pub const PACK_TTL_SECS: i64 = 600;

/// One open pack offer.
#[derive(Debug, Clone)]
pub struct PackOffer {
    /// Profile the pack was quoted to.
    pub owner: DbId,
    pub drafts: Vec<IdolDraft>,
    /// Cost quoted at creation; charged at claim time.
    pub cost: i64,
    pub expires_at: Timestamp,
}

/// Why a claim did not return an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    /// Unknown key, TTL elapsed, or already claimed.
    Expired,
    /// The offer belongs to a different profile; the entry is left intact.
    NotOwner,
}

/// In-process store for open pack offers.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. The write lock makes `claim` an atomic
/// check-and-remove, which is what guarantees at-most-once redemption.
pub struct PackCache {
    offers: RwLock<HashMap<Uuid, PackOffer>>,
}

impl PackCache {
    /// Create a new, empty cache.
    pub fn new() -> Self {
        Self {
            offers: RwLock::new(HashMap::new()),
        }
    }

    /// Store an offer under a fresh random key and return the key.
    ///
    /// Expired leftovers are swept opportunistically on each insert, so the
    /// map stays bounded by active play without a background task.
    pub async fn put(&self, offer: PackOffer, now: Timestamp) -> Uuid {
        let key = Uuid::new_v4();
        let mut offers = self.offers.write().await;
        offers.retain(|_, o| o.expires_at > now);
        offers.insert(key, offer);
        key
    }

    /// Atomically claim an offer: the entry is removed before it is
    /// returned, so a second concurrent claim observes [`ClaimError::Expired`].
    ///
    /// An owner mismatch does *not* consume the offer -- guessing another
    /// player's key must not destroy their pack.
    pub async fn claim(&self, key: Uuid, owner: DbId, now: Timestamp) -> Result<PackOffer, ClaimError> {
        let mut offers = self.offers.write().await;

        let offer = offers.get(&key).ok_or(ClaimError::Expired)?;
        if offer.expires_at <= now {
            offers.remove(&key);
            return Err(ClaimError::Expired);
        }
        if offer.owner != owner {
            return Err(ClaimError::NotOwner);
        }

        offers.remove(&key).ok_or(ClaimError::Expired)
    }
}

impl Default for PackCache {
    fn default() -> Self {
        Self::new()
    }
}
