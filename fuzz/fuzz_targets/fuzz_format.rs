//! Fuzz target for card formatting and masking.
//!
//! Tests that formatting functions never panic on arbitrary input.

#![no_main]

use checkout_core::{format, mask, CardType};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = format::normalize(data);
    let _ = format::is_digits_only(data);
    let _ = mask::mask_secret(data);

    let masked = mask::mask_card_number(data);
    let digits = format::strip_formatting(data);
    if digits.len() > 4 {
        assert!(masked.ends_with(&digits[digits.len() - 4..]));
    }

    for card_type in [None, Some(CardType::AmericanExpress), Some(CardType::Diners)] {
        for separator in [" ", "-", ""] {
            let formatted = format::format_for_card_type(data, card_type, separator);
            assert_eq!(format::strip_formatting(&formatted), digits);
        }
    }

    // Verify roundtrip property
    let formatted = format::format_card_number(data);
    assert_eq!(format::strip_formatting(&formatted), digits, "Format roundtrip should preserve digits");
});
