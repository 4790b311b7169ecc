//! Fuzz target for card number validation and detection.
//!
//! Tests that validation and local detection never panic on arbitrary input.

#![no_main]

use checkout_core::detect::{detect_locally, estimate};
use checkout_core::validate::validate_card_number_for_brand;
use checkout_core::{is_valid, validate_card_number, CardBrand, CardType};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // These should never panic, regardless of input
    let _ = validate_card_number(data, true);
    let _ = validate_card_number(data, false);
    let _ = validate_card_number_for_brand(data, true, false);
    let _ = is_valid(data);

    let supported = [CardBrand::from(CardType::Visa), CardBrand::new(data)];
    let candidates = estimate(data);
    let detected = detect_locally(data, &supported);
    assert_eq!(candidates.len(), detected.len());
    assert!(detected.iter().all(|d| !d.is_reliable));
});
