//! Fuzz target for expiry date parsing.
//!
//! Tests that expiry parsing and validation never panic on arbitrary input.

#![no_main]

use checkout_core::expiry::{parse_expiry_date, validate_expiry_date, ExpiryDate};
use checkout_core::FieldPolicy;
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let date = parse_expiry_date(data);
    let _ = date.format_short();
    let _ = date.format_long();
    let _ = date.to_string();

    if date.exists() {
        assert!((1..=12).contains(&date.month()));
    }
    if data.trim().is_empty() {
        assert_eq!(date, ExpiryDate::EMPTY_DATE);
    }

    for reference in [
        NaiveDate::MIN,
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        NaiveDate::MAX,
    ] {
        for policy in [FieldPolicy::Required, FieldPolicy::Optional, FieldPolicy::Hidden] {
            let _ = validate_expiry_date(date, reference, policy);
        }
    }
});
