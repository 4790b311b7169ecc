//! BIN (Bank Identification Number) lookup.
//!
//! Local detection only knows prefix patterns. Once enough digits are typed
//! the payment backend can tell which brands the card really belongs to,
//! together with their field policies. This module holds the pieces of that
//! lookup:
//!
//! - [`model`] - request and response JSON
//! - [`cache`] - bounded LRU of lookup results keyed by hashed BIN
//! - [`repository`] - merges local detection with lookups and publishes
//!   the current best result
//!
//! The transport and the BIN encryption are external collaborators,
//! plugged in through [`BinLookupService`] and [`BinEncryptor`].
//!
//! # Example
//!
//! ```rust,ignore
//! use checkout_core::bin_lookup::DetectCardTypeRepository;
//!
//! let repository = DetectCardTypeRepository::new(&config, service, encryptor, Handle::current());
//! let mut detected = repository.subscribe();
//!
//! repository.detect_card_type("5555 5555 555", &config.supported_brands);
//! println!("{:?}", detected.borrow_and_update());
//! ```

pub mod cache;
pub mod model;
pub mod repository;

pub use cache::{BinLookupCache, BinLookupResult};
pub use model::{BinLookupRequest, BinLookupResponse, BrandResponse};
pub use repository::DetectCardTypeRepository;

use crate::error::BinLookupError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Number of digits needed before a lookup is made.
pub const REQUIRED_BIN_SIZE: usize = 11;

/// Performs BIN lookups against the payment backend.
#[async_trait]
pub trait BinLookupService: Send + Sync {
    /// Sends a lookup request authenticated with the client key.
    async fn make_bin_lookup(
        &self,
        request: BinLookupRequest,
        client_key: &str,
    ) -> Result<BinLookupResponse, BinLookupError>;
}

/// Encrypts the BIN before it leaves the device.
#[async_trait]
pub trait BinEncryptor: Send + Sync {
    /// Encrypts the typed card number prefix with the merchant public key.
    async fn encrypt_bin(&self, bin: &str, public_key: &str) -> Result<String, BinLookupError>;
}

/// Cache key for a card number: SHA-256 hex digest of its first
/// [`REQUIRED_BIN_SIZE`] digits.
///
/// `card_number` must already be normalized.
pub fn hash_bin(card_number: &str) -> String {
    let end = card_number
        .char_indices()
        .nth(REQUIRED_BIN_SIZE)
        .map_or(card_number.len(), |(index, _)| index);
    hex::encode(Sha256::digest(&card_number.as_bytes()[..end]))
}
