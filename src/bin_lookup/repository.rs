//! Card type detection backed by the BIN lookup.
//!
//! [`DetectCardTypeRepository::detect_card_type`] is called on every card
//! number change. It always publishes the local estimate synchronously and,
//! once [`REQUIRED_BIN_SIZE`] digits are typed, either publishes the cached
//! lookup result or starts a lookup on the runtime. Observers hold a
//! [`watch::Receiver`] and only ever see the latest list.
//!
//! Per key the cache moves `Unavailable -> Loading -> Available`. A failed
//! lookup puts the key back to `Unavailable` so the next keystroke retries.
//! A lookup that finishes after the shopper moved on to another prefix
//! still fills the cache but is not published.

use super::{
    hash_bin, BinEncryptor, BinLookupCache, BinLookupRequest, BinLookupResponse, BinLookupResult,
    BinLookupService, REQUIRED_BIN_SIZE,
};
use crate::card::{CardBrand, DetectedCardType, FieldPolicy};
use crate::config::CheckoutConfiguration;
use crate::detect;
use crate::error::BinLookupError;
use crate::format::{is_digits_only, normalize};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, error, trace};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Detects card types for one card form.
///
/// Cloning is cheap; clones share the cache and the published list.
#[derive(Clone)]
pub struct DetectCardTypeRepository {
    inner: Arc<Inner>,
}

struct Inner {
    service: Arc<dyn BinLookupService>,
    encryptor: Arc<dyn BinEncryptor>,
    runtime: Handle,
    client_key: String,
    public_key: Option<String>,
    card_type: Option<String>,
    state: Mutex<LookupState>,
    detected: watch::Sender<Vec<DetectedCardType>>,
}

struct LookupState {
    cache: BinLookupCache,
    /// Hashed BIN of the latest input, `None` while it is too short.
    current_key: Option<String>,
}

impl DetectCardTypeRepository {
    /// Creates a repository. Lookups are spawned on `runtime`.
    pub fn new(
        config: &CheckoutConfiguration,
        service: Arc<dyn BinLookupService>,
        encryptor: Arc<dyn BinEncryptor>,
        runtime: Handle,
    ) -> Self {
        let (detected, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                service,
                encryptor,
                runtime,
                client_key: config.client_key.clone(),
                public_key: config.public_key.clone(),
                card_type: config.card_type.clone(),
                state: Mutex::new(LookupState {
                    cache: BinLookupCache::new(config.bin_cache_capacity),
                    current_key: None,
                }),
                detected,
            }),
        }
    }

    /// Subscribes to detected card types.
    pub fn subscribe(&self) -> watch::Receiver<Vec<DetectedCardType>> {
        self.inner.detected.subscribe()
    }

    /// Returns the latest published card types.
    pub fn detected_card_types(&self) -> Vec<DetectedCardType> {
        self.inner.detected.borrow().clone()
    }

    /// Detects the card types of a (partial) card number and publishes them.
    pub fn detect_card_type(&self, card_number: &str, supported_brands: &[CardBrand]) {
        let number = Zeroizing::new(normalize(card_number));
        let local = detect::detect_locally(&number, supported_brands);

        // Held until the local estimate is published so a lookup finishing
        // in between cannot be overwritten by it.
        let mut state = self.inner.state.lock();

        if number.len() < REQUIRED_BIN_SIZE || !is_digits_only(&number) {
            state.current_key = None;
        } else {
            let key = hash_bin(&number);
            state.current_key = Some(key.clone());

            match state.cache.get(&key) {
                BinLookupResult::Available(cached) => {
                    debug!(count = cached.len(), "Retrieving card types from cache");
                    self.inner.detected.send_replace(cached);
                    return;
                }
                BinLookupResult::Loading => {
                    debug!("BIN lookup request is in progress");
                }
                BinLookupResult::Unavailable => {
                    self.fetch_from_network(&mut state, key, &number, supported_brands);
                }
            }
        }

        trace!(count = local.len(), "Publishing local card types");
        self.inner.detected.send_replace(local);
    }

    /// Forgets the current input. Lookups in flight still fill the cache but
    /// are no longer published.
    pub fn reset(&self) {
        self.inner.state.lock().current_key = None;
    }

    /// Returns the cache state for a card number without refreshing it.
    pub fn cache_state(&self, card_number: &str) -> BinLookupResult {
        let number = Zeroizing::new(normalize(card_number));
        if number.len() < REQUIRED_BIN_SIZE {
            return BinLookupResult::Unavailable;
        }
        self.inner.state.lock().cache.peek(&hash_bin(&number))
    }

    fn fetch_from_network(
        &self,
        state: &mut LookupState,
        key: String,
        number: &str,
        supported_brands: &[CardBrand],
    ) {
        if self.inner.public_key.is_none() {
            trace!("No public key configured, skipping BIN lookup");
            return;
        }

        debug!("Launching BIN lookup");
        state.cache.insert(key.clone(), BinLookupResult::Loading);

        let inner = Arc::clone(&self.inner);
        let bin = Zeroizing::new(number.to_string());
        let supported_brands = supported_brands.to_vec();
        self.inner.runtime.spawn(async move {
            inner.lookup(key, bin, supported_brands).await;
        });
    }
}

impl Inner {
    async fn lookup(&self, key: String, bin: Zeroizing<String>, supported_brands: Vec<CardBrand>) {
        let result = self.make_bin_lookup(&bin, &supported_brands).await;
        drop(bin);

        let mut state = self.state.lock();
        match result {
            Ok(response) => {
                let detected = map_response(response);
                debug!(
                    brands = ?detected.iter().map(|d| d.card_brand.tx_variant()).collect::<Vec<_>>(),
                    "BIN lookup succeeded"
                );
                state
                    .cache
                    .insert(key.clone(), BinLookupResult::Available(detected.clone()));
                if state.current_key.as_deref() == Some(key.as_str()) {
                    self.detected.send_replace(detected);
                } else {
                    debug!("BIN lookup result is no longer current, cached only");
                }
            }
            Err(e) => {
                state.cache.remove(&key);
                drop(state);
                error!(error = %e, "Failed to do BIN lookup");
            }
        }
    }

    async fn make_bin_lookup(
        &self,
        bin: &str,
        supported_brands: &[CardBrand],
    ) -> Result<BinLookupResponse, BinLookupError> {
        let public_key = self
            .public_key
            .as_deref()
            .ok_or_else(|| BinLookupError::Encryption("public key is not configured".into()))?;

        let encrypted_bin = self.encryptor.encrypt_bin(bin, public_key).await?;
        let request = BinLookupRequest {
            encrypted_bin: Some(encrypted_bin),
            request_id: Some(Uuid::new_v4().to_string()),
            supported_brands: Some(
                supported_brands
                    .iter()
                    .map(|brand| brand.tx_variant().to_string())
                    .collect(),
            ),
            card_type: self.card_type.clone(),
        };

        self.service.make_bin_lookup(request, &self.client_key).await
    }
}

/// Maps a lookup response to reliable card types.
///
/// Entries without a brand are dropped. Absent policies read as required,
/// an absent Luhn flag as disabled and an absent support flag as supported.
pub fn map_response(response: BinLookupResponse) -> Vec<DetectedCardType> {
    response
        .brands
        .unwrap_or_default()
        .into_iter()
        .filter_map(|brand_response| {
            let brand = brand_response.brand?;
            Some(DetectedCardType {
                card_brand: CardBrand::new(brand),
                is_reliable: true,
                enable_luhn_check: brand_response.enable_luhn_check == Some(true),
                cvc_policy: parse_policy(brand_response.cvc_policy.as_deref()),
                expiry_date_policy: parse_policy(brand_response.expiry_date_policy.as_deref()),
                is_supported: brand_response.supported != Some(false),
                pan_length: brand_response.pan_length,
                localized_brand: brand_response.localized_brand,
                payment_method_variant: brand_response.payment_method_variant,
            })
        })
        .collect()
}

fn parse_policy(value: Option<&str>) -> FieldPolicy {
    value.map(FieldPolicy::parse).unwrap_or_default()
}

impl fmt::Debug for DetectCardTypeRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("DetectCardTypeRepository")
            .field("has_public_key", &self.inner.public_key.is_some())
            .field("cache_len", &state.cache.len())
            .field("has_current_key", &state.current_key.is_some())
            .finish()
    }
}
