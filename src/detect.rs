//! Card brand detection using BIN/IIN prefix matching.
//!
//! Detection runs on every keystroke, so it has to work on partial input:
//! a brand is a candidate when the digits typed so far match its pattern or
//! could still match once more digits are entered. `"3"` is a candidate for
//! American Express (`34`, `37`) just as `"378282"` is.
//!
//! Each pattern is an ordered list of prefix ranges. A range holds two
//! equal-width digit strings and the maximum card number length for that
//! range, so `^(352[89]|35[3-8][0-9])[0-9]{0,12}$` becomes the single range
//! `3528..=3589` with a maximum length of 16.

use crate::card::{CardBrand, CardType, DetectedCardType, FieldPolicy};
use crate::format::{is_digits_only, normalize};

/// An inclusive range of card number prefixes.
#[derive(Debug, Clone, Copy)]
struct PrefixRange {
    from: &'static str,
    to: &'static str,
    max_length: usize,
}

impl PrefixRange {
    /// `number` must be ASCII digits.
    fn matches_or_hits_end(&self, number: &str) -> bool {
        if number.len() > self.max_length {
            return false;
        }
        let width = number.len().min(self.from.len());
        let prefix = &number[..width];
        prefix >= &self.from[..width] && prefix <= &self.to[..width]
    }
}

const fn range(from: &'static str, to: &'static str, max_length: usize) -> PrefixRange {
    PrefixRange {
        from,
        to,
        max_length,
    }
}

const fn exact(prefix: &'static str, max_length: usize) -> PrefixRange {
    range(prefix, prefix, max_length)
}

struct BrandPattern {
    card_type: CardType,
    ranges: &'static [PrefixRange],
}

/// Brands whose cards carry no security code.
const NO_CVC_BRANDS: &[CardType] = &[CardType::Bcmc];

static PATTERNS: &[BrandPattern] = &[
    BrandPattern {
        card_type: CardType::AmericanExpress,
        ranges: &[exact("34", 15), exact("37", 15)],
    },
    BrandPattern {
        card_type: CardType::Argencard,
        ranges: &[exact("501", 19)],
    },
    BrandPattern {
        card_type: CardType::Bcmc,
        ranges: &[exact("6703", 19), exact("479658", 19), exact("606005", 19)],
    },
    BrandPattern {
        card_type: CardType::BijenkorfCard,
        ranges: &[exact("5100081", 16)],
    },
    BrandPattern {
        card_type: CardType::Cabal,
        ranges: &[
            exact("580", 16),
            exact("583", 16),
            exact("584", 16),
            exact("586", 16),
            exact("589", 16),
            exact("600", 16),
            exact("603", 16),
            exact("604", 16),
            exact("606", 16),
            exact("609", 16),
            exact("630", 16),
            exact("633", 16),
            exact("634", 16),
            exact("636", 16),
            exact("639", 16),
        ],
    },
    BrandPattern {
        card_type: CardType::CarteBancaire,
        ranges: &[range("4", "6", 16)],
    },
    BrandPattern {
        card_type: CardType::ChinaUnionPay,
        ranges: &[exact("62", 19)],
    },
    BrandPattern {
        card_type: CardType::Codensa,
        ranges: &[exact("590712", 16)],
    },
    BrandPattern {
        card_type: CardType::Dankort,
        ranges: &[exact("5019", 16)],
    },
    BrandPattern {
        card_type: CardType::Diners,
        ranges: &[exact("36", 14)],
    },
    BrandPattern {
        card_type: CardType::Discover,
        ranges: &[exact("6011", 16), range("644", "649", 16), exact("65", 16)],
    },
    BrandPattern {
        card_type: CardType::Elo,
        ranges: &[
            exact("506699", 16),
            range("506770", "506778", 16),
            exact("401178", 16),
            exact("438935", 16),
            exact("451416", 16),
            range("457631", "457632", 16),
            exact("504175", 16),
            exact("627780", 16),
            exact("636368", 16),
            exact("636297", 16),
            range("50670", "50676", 16),
        ],
    },
    BrandPattern {
        card_type: CardType::Forbrugsforeningen,
        ranges: &[exact("600", 16)],
    },
    BrandPattern {
        card_type: CardType::Hiper,
        ranges: &[
            exact("637095", 16),
            exact("637599", 16),
            exact("637609", 16),
            exact("637612", 16),
        ],
    },
    BrandPattern {
        card_type: CardType::Hipercard,
        ranges: &[exact("606282", 16)],
    },
    BrandPattern {
        card_type: CardType::Jcb,
        ranges: &[range("3528", "3589", 16)],
    },
    BrandPattern {
        card_type: CardType::KarenMillen,
        ranges: &[exact("98261465", 16)],
    },
    BrandPattern {
        card_type: CardType::Laser,
        ranges: &[
            exact("6304", 19),
            exact("6706", 19),
            exact("6709", 19),
            exact("6771", 19),
        ],
    },
    BrandPattern {
        card_type: CardType::Maestro,
        ranges: &[exact("50", 19), range("56", "58", 19), exact("6", 19)],
    },
    BrandPattern {
        card_type: CardType::MaestroUk,
        ranges: &[exact("6759", 19)],
    },
    BrandPattern {
        card_type: CardType::Mastercard,
        ranges: &[range("51", "55", 16), range("22", "27", 16)],
    },
    BrandPattern {
        card_type: CardType::Mir,
        ranges: &[exact("220", 19)],
    },
    BrandPattern {
        card_type: CardType::Naranja,
        ranges: &[
            exact("372", 16),
            exact("377", 16),
            exact("379", 16),
            exact("402", 16),
            exact("407", 16),
            exact("409", 16),
            exact("522", 16),
            exact("527", 16),
            exact("529", 16),
            exact("582", 16),
            exact("587", 16),
            exact("589", 16),
        ],
    },
    BrandPattern {
        card_type: CardType::Oasis,
        ranges: &[exact("982616", 16)],
    },
    BrandPattern {
        card_type: CardType::Solo,
        ranges: &[exact("6767", 19)],
    },
    BrandPattern {
        card_type: CardType::Troy,
        ranges: &[exact("9792", 16)],
    },
    BrandPattern {
        card_type: CardType::Uatp,
        ranges: &[exact("1", 15)],
    },
    BrandPattern {
        card_type: CardType::Visa,
        ranges: &[exact("4", 19)],
    },
    BrandPattern {
        card_type: CardType::VisaDankort,
        ranges: &[exact("4571", 16)],
    },
];

/// Estimates every card type the (possibly partial) card number may belong to.
///
/// Whitespace and separators are stripped first. Empty input, or input with
/// any other non-digit character, yields no candidates.
///
/// # Example
///
/// ```
/// use checkout_core::detect::estimate;
/// use checkout_core::CardType;
///
/// assert!(estimate("4").contains(&CardType::Visa));
/// assert!(estimate("3").contains(&CardType::AmericanExpress));
/// assert_eq!(estimate("37").first(), Some(&CardType::AmericanExpress));
/// assert!(estimate("").is_empty());
/// ```
pub fn estimate(card_number: &str) -> Vec<CardType> {
    let number = normalize(card_number);
    if !is_digits_only(&number) {
        return Vec::new();
    }

    PATTERNS
        .iter()
        .filter(|pattern| {
            pattern
                .ranges
                .iter()
                .any(|range| range.matches_or_hits_end(&number))
        })
        .map(|pattern| pattern.card_type)
        .collect()
}

/// Detects card types locally, without the BIN lookup.
///
/// Every estimated brand becomes an unreliable `DetectedCardType` carrying
/// the local field policies and whether it is in `supported_brands`.
pub fn detect_locally(card_number: &str, supported_brands: &[CardBrand]) -> Vec<DetectedCardType> {
    if card_number.is_empty() {
        return Vec::new();
    }

    estimate(card_number)
        .into_iter()
        .map(|card_type| local_card_type(card_type, supported_brands))
        .collect()
}

/// Unreliable `DetectedCardType` for a predefined brand, with the policies
/// known locally.
pub fn local_card_type(card_type: CardType, supported_brands: &[CardBrand]) -> DetectedCardType {
    let card_brand = CardBrand::from(card_type);
    let cvc_policy = if NO_CVC_BRANDS.contains(&card_type) {
        FieldPolicy::Hidden
    } else {
        FieldPolicy::Required
    };

    DetectedCardType {
        is_supported: supported_brands.contains(&card_brand),
        card_brand,
        is_reliable: false,
        enable_luhn_check: true,
        cvc_policy,
        expiry_date_policy: FieldPolicy::Required,
        pan_length: None,
        localized_brand: None,
        payment_method_variant: None,
    }
}
