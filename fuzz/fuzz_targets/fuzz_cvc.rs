//! Fuzz target for security code and BLIK code validation.
//!
//! Tests that code validation never panics on arbitrary input.

#![no_main]

use checkout_core::cvc::validate_security_code;
use checkout_core::detect::detect_locally;
use checkout_core::state::blik::{self, BlikIntent};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = validate_security_code(data, None);

    // Amex, Bancontact (no CVC) and Visa
    for prefix in ["37", "6703", "4"] {
        for card_type in detect_locally(prefix, &[]) {
            let _ = validate_security_code(data, Some(&card_type));
        }
    }

    let mut component = blik::create_state_machine();
    component.dispatch(BlikIntent::UpdateBlikCode(data.to_string()));
    let view = component.highlight_validation_errors();
    assert_eq!(view.blik_code.is_error, !component.is_valid());
});
