//! Core card types shared by detection, validation and the component state.
//!
//! `CardType` is the closed set of brands the SDK knows locally, `CardBrand`
//! is the open identifier used on the wire (a brand returned by the BIN
//! lookup may not be one of the predefined types), and `DetectedCardType`
//! carries the per-brand field policies produced by detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Predefined card brands that can be detected from the card number prefix.
///
/// Each variant maps to the `txVariant` identifier used by the payment
/// backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    /// American Express - prefix 34, 37, length 15
    AmericanExpress,
    /// Argencard - prefix 501
    Argencard,
    /// Bancontact (Belgian debit scheme), no CVC on the card
    Bcmc,
    /// Bijenkorf store card
    BijenkorfCard,
    /// Cabal
    Cabal,
    /// Carte Bancaire - prefix 4-6, length 16
    CarteBancaire,
    /// China UnionPay - prefix 62
    ChinaUnionPay,
    /// Codensa
    Codensa,
    /// Dankort - prefix 5019
    Dankort,
    /// Diners Club - prefix 36, length 14
    Diners,
    /// Discover - prefix 6011, 644-649, 65
    Discover,
    /// Elo (Brazil)
    Elo,
    /// Forbrugsforeningen (Denmark)
    Forbrugsforeningen,
    /// Hiper (Brazil)
    Hiper,
    /// Hipercard (Brazil)
    Hipercard,
    /// JCB - prefix 3528-3589
    Jcb,
    /// Karen Millen store card
    KarenMillen,
    /// Laser (Ireland)
    Laser,
    /// Maestro - prefix 50, 56-58, 6
    Maestro,
    /// Maestro UK - prefix 6759
    MaestroUk,
    /// Mastercard - prefix 51-55, 22-27, length 16
    Mastercard,
    /// Mir - prefix 220
    Mir,
    /// Naranja (Argentina)
    Naranja,
    /// Oasis store card
    Oasis,
    /// Solo - prefix 6767
    Solo,
    /// Troy (Turkey) - prefix 9792
    Troy,
    /// UATP - prefix 1, length 15
    Uatp,
    /// Visa - prefix 4, up to 19 digits
    Visa,
    /// Visa/Dankort co-badged - prefix 4571
    VisaDankort,
}

impl CardType {
    /// Every predefined card type, in detection table order.
    pub const ALL: [CardType; 29] = [
        Self::AmericanExpress,
        Self::Argencard,
        Self::Bcmc,
        Self::BijenkorfCard,
        Self::Cabal,
        Self::CarteBancaire,
        Self::ChinaUnionPay,
        Self::Codensa,
        Self::Dankort,
        Self::Diners,
        Self::Discover,
        Self::Elo,
        Self::Forbrugsforeningen,
        Self::Hiper,
        Self::Hipercard,
        Self::Jcb,
        Self::KarenMillen,
        Self::Laser,
        Self::Maestro,
        Self::MaestroUk,
        Self::Mastercard,
        Self::Mir,
        Self::Naranja,
        Self::Oasis,
        Self::Solo,
        Self::Troy,
        Self::Uatp,
        Self::Visa,
        Self::VisaDankort,
    ];

    /// Returns the `txVariant` identifier of this card type.
    #[inline]
    pub const fn tx_variant(&self) -> &'static str {
        match self {
            Self::AmericanExpress => "amex",
            Self::Argencard => "argencard",
            Self::Bcmc => "bcmc",
            Self::BijenkorfCard => "bijcard",
            Self::Cabal => "cabal",
            Self::CarteBancaire => "cartebancaire",
            Self::ChinaUnionPay => "cup",
            Self::Codensa => "codensa",
            Self::Dankort => "dankort",
            Self::Diners => "diners",
            Self::Discover => "discover",
            Self::Elo => "elo",
            Self::Forbrugsforeningen => "forbrugsforeningen",
            Self::Hiper => "hiper",
            Self::Hipercard => "hipercard",
            Self::Jcb => "jcb",
            Self::KarenMillen => "karenmillen",
            Self::Laser => "laser",
            Self::Maestro => "maestro",
            Self::MaestroUk => "maestrouk",
            Self::Mastercard => "mc",
            Self::Mir => "mir",
            Self::Naranja => "naranja",
            Self::Oasis => "oasis",
            Self::Solo => "solo",
            Self::Troy => "troy",
            Self::Uatp => "uatp",
            Self::Visa => "visa",
            Self::VisaDankort => "visadankort",
        }
    }

    /// Looks up a predefined card type by its `txVariant` identifier.
    pub fn from_tx_variant(tx_variant: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|card_type| card_type.tx_variant() == tx_variant)
    }

    /// Returns a human-readable name for the card type.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AmericanExpress => "American Express",
            Self::Argencard => "Argencard",
            Self::Bcmc => "Bancontact",
            Self::BijenkorfCard => "de Bijenkorf Card",
            Self::Cabal => "Cabal",
            Self::CarteBancaire => "Carte Bancaire",
            Self::ChinaUnionPay => "China UnionPay",
            Self::Codensa => "Codensa",
            Self::Dankort => "Dankort",
            Self::Diners => "Diners Club",
            Self::Discover => "Discover",
            Self::Elo => "Elo",
            Self::Forbrugsforeningen => "Forbrugsforeningen",
            Self::Hiper => "Hiper",
            Self::Hipercard => "Hipercard",
            Self::Jcb => "JCB",
            Self::KarenMillen => "Karen Millen",
            Self::Laser => "Laser",
            Self::Maestro => "Maestro",
            Self::MaestroUk => "Maestro UK",
            Self::Mastercard => "Mastercard",
            Self::Mir => "Mir",
            Self::Naranja => "Naranja",
            Self::Oasis => "Oasis",
            Self::Solo => "Solo",
            Self::Troy => "Troy",
            Self::Uatp => "UATP",
            Self::Visa => "Visa",
            Self::VisaDankort => "Visa/Dankort",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Minimum number of digits in a card number.
pub const MIN_CARD_NUMBER_LENGTH: usize = 12;

/// Maximum number of digits in a card number.
pub const MAX_CARD_NUMBER_LENGTH: usize = 19;

/// A card brand identifier.
///
/// Brands coming from the BIN lookup are free-form `txVariant` strings; when
/// the identifier names a predefined brand the matching `CardType` is
/// resolved as well. Two brands are equal when their identifiers are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CardBrand {
    tx_variant: String,
    card_type: Option<CardType>,
}

impl CardBrand {
    /// Creates a brand from a `txVariant` identifier.
    pub fn new(tx_variant: impl Into<String>) -> Self {
        let tx_variant = tx_variant.into();
        let card_type = CardType::from_tx_variant(&tx_variant);
        Self {
            tx_variant,
            card_type,
        }
    }

    /// Returns the `txVariant` identifier.
    #[inline]
    pub fn tx_variant(&self) -> &str {
        &self.tx_variant
    }

    /// Returns the predefined card type, if this brand is one.
    #[inline]
    pub const fn card_type(&self) -> Option<CardType> {
        self.card_type
    }
}

impl From<CardType> for CardBrand {
    fn from(card_type: CardType) -> Self {
        Self {
            tx_variant: card_type.tx_variant().to_string(),
            card_type: Some(card_type),
        }
    }
}

impl From<String> for CardBrand {
    fn from(tx_variant: String) -> Self {
        Self::new(tx_variant)
    }
}

impl From<&str> for CardBrand {
    fn from(tx_variant: &str) -> Self {
        Self::new(tx_variant)
    }
}

impl From<CardBrand> for String {
    fn from(brand: CardBrand) -> Self {
        brand.tx_variant
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tx_variant)
    }
}

/// Whether a card field must be filled, may be left empty, or is not shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldPolicy {
    /// The field must be filled.
    #[default]
    Required,
    /// The field is shown but may be left empty.
    Optional,
    /// The field is not shown.
    Hidden,
}

impl FieldPolicy {
    /// Parses a wire value. Unknown values are treated as `Required`.
    pub fn parse(value: &str) -> Self {
        match value {
            "optional" => Self::Optional,
            "hidden" => Self::Hidden,
            _ => Self::Required,
        }
    }

    /// Returns the wire value.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Hidden => "hidden",
        }
    }

    /// Returns true for `Optional` and `Hidden`.
    #[inline]
    pub const fn is_not_required(&self) -> bool {
        matches!(self, Self::Optional | Self::Hidden)
    }
}

/// A card brand candidate produced by detection.
///
/// Local estimates are never reliable; brands confirmed by the BIN lookup
/// are. A new list is produced on every card number change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCardType {
    /// The detected brand.
    pub card_brand: CardBrand,
    /// `true` when the brand was confirmed by the BIN lookup.
    pub is_reliable: bool,
    /// Whether the Luhn checksum applies to this brand.
    pub enable_luhn_check: bool,
    /// Policy of the security code field.
    pub cvc_policy: FieldPolicy,
    /// Policy of the expiry date field.
    pub expiry_date_policy: FieldPolicy,
    /// Whether the merchant accepts this brand.
    pub is_supported: bool,
    /// Exact card number length reported by the BIN lookup.
    pub pan_length: Option<u32>,
    /// Brand name localized by the BIN lookup.
    pub localized_brand: Option<String>,
    /// Payment method variant reported by the BIN lookup.
    pub payment_method_variant: Option<String>,
}

impl DetectedCardType {
    /// Returns true if this is the 4-digit security code brand.
    #[inline]
    pub fn is_american_express(&self) -> bool {
        self.card_brand.card_type() == Some(CardType::AmericanExpress)
    }
}
