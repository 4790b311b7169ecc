//! Benchmarks for checkout_core.
//!
//! Run with: cargo bench

use checkout_core::bin_lookup::{BinLookupCache, BinLookupResult};
use checkout_core::detect::{detect_locally, estimate};
use checkout_core::expiry::{parse_expiry_date, validate_expiry_date};
use checkout_core::state::card::{
    create_state_machine_with_validator, CardComponentParams, CardIntent, CardStateValidator,
};
use checkout_core::{format, luhn, validate_card_number, CardBrand, CardType, FieldPolicy};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// Test card numbers
const VISA_16: &str = "4111111111111111";
const VISA_16_FORMATTED: &str = "4111-1111-1111-1111";
const MASTERCARD: &str = "5555555555554444";
const AMEX: &str = "378282246310005";

const VISA_DIGITS: [u8; 16] = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];

/// Benchmark card number validation
fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    group.bench_function("visa_16_raw", |b| {
        b.iter(|| validate_card_number(black_box(VISA_16), true))
    });

    group.bench_function("visa_16_formatted", |b| {
        b.iter(|| validate_card_number(black_box(VISA_16_FORMATTED), true))
    });

    group.bench_function("mastercard", |b| {
        b.iter(|| validate_card_number(black_box(MASTERCARD), true))
    });

    group.bench_function("amex_15", |b| {
        b.iter(|| validate_card_number(black_box(AMEX), true))
    });

    group.bench_function("luhn_digits", |b| {
        b.iter(|| luhn::validate(black_box(&VISA_DIGITS)))
    });

    group.finish();
}

/// Benchmark detection as the shopper types, one digit at a time
fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection");

    for len in [1usize, 4, 6, 11, 16] {
        let prefix = &VISA_16[..len];
        group.bench_with_input(BenchmarkId::new("estimate", len), prefix, |b, prefix| {
            b.iter(|| estimate(black_box(prefix)))
        });
    }

    let supported: Vec<CardBrand> = [CardType::Visa, CardType::Mastercard, CardType::AmericanExpress]
        .into_iter()
        .map(CardBrand::from)
        .collect();
    group.bench_function("detect_locally_mastercard", |b| {
        b.iter(|| detect_locally(black_box(MASTERCARD), &supported))
    });

    group.bench_function("keystrokes_16", |b| {
        b.iter(|| {
            for len in 1..=VISA_16.len() {
                black_box(estimate(&VISA_16[..len]));
            }
        })
    });

    group.finish();
}

/// Benchmark formatting and expiry parsing
fn bench_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("fields");
    let reference = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    group.bench_function("format_card_number", |b| {
        b.iter(|| format::format_card_number(black_box(VISA_16)))
    });

    group.bench_function("format_amex", |b| {
        b.iter(|| format::format_for_card_type(black_box(AMEX), Some(CardType::AmericanExpress), " "))
    });

    group.bench_function("expiry_parse_and_validate", |b| {
        b.iter(|| {
            let date = parse_expiry_date(black_box("12/27"));
            validate_expiry_date(date, reference, FieldPolicy::Required)
        })
    });

    group.finish();
}

/// Benchmark the BIN lookup cache at capacity
fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("bin_cache");

    for capacity in [8usize, 29, 128] {
        let keys: Vec<String> = (0..capacity * 2).map(|i| format!("key-{i}")).collect();
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::new("insert_evict", capacity), &keys, |b, keys| {
            b.iter(|| {
                let mut cache = BinLookupCache::new(capacity);
                for key in keys {
                    cache.insert(key.clone(), BinLookupResult::Loading);
                }
                cache
            })
        });
    }

    group.finish();
}

/// Benchmark a full card form dispatch cycle
fn bench_card_component(c: &mut Criterion) {
    let mut group = c.benchmark_group("card_component");
    let reference = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    group.bench_function("fill_form", |b| {
        b.iter(|| {
            let mut component = create_state_machine_with_validator(
                CardComponentParams::default(),
                CardStateValidator::with_reference_date(reference),
            );
            component.dispatch(CardIntent::UpdateCardNumber(VISA_16.into()));
            component.dispatch(CardIntent::UpdateExpiryDate("12/27".into()));
            component.dispatch(CardIntent::UpdateSecurityCode("737".into()));
            component.is_valid()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_validation,
    bench_detection,
    bench_fields,
    bench_cache,
    bench_card_component,
);

criterion_main!(benches);
