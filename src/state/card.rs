//! Card component: number, expiry date, security code and holder name.
//!
//! The reducer owns the field requirement policies. They follow the brand
//! the shopper selected, else the first detected card type that is both
//! reliable and supported, else the defaults of the configured
//! [`CvcVisibility`].

use super::{
    highlight_fields, ComponentIntent, ComponentStateMachine, ErrorKey, StateReducer,
    StateValidator, TextInputState, TextInputViewState, ViewStateProducer,
};
use crate::card::{CardBrand, DetectedCardType, FieldPolicy};
use crate::config::{CheckoutConfiguration, CvcVisibility};
use crate::cvc::{validate_security_code, CvcValidation};
use crate::expiry::{parse_expiry_date, validate_expiry_date, ExpiryDateValidation};
use crate::format::format_for_card_type;
use crate::mask::{mask_card_number, mask_secret};
use crate::validate::{validate_card_number_for_brand, CardNumberValidation};
use chrono::{Local, NaiveDate};
use std::fmt;

/// Card component settings taken from the checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardComponentParams {
    /// Whether the holder name field is shown and required.
    pub holder_name_required: bool,
    /// When the security code field is shown.
    pub cvc_visibility: CvcVisibility,
    /// Brands the merchant accepts.
    pub supported_brands: Vec<CardBrand>,
    /// Whether the "store payment method" switch is shown.
    pub is_store_payment_field_visible: bool,
}

impl Default for CardComponentParams {
    fn default() -> Self {
        Self::from(&CheckoutConfiguration::new(""))
    }
}

impl From<&CheckoutConfiguration> for CardComponentParams {
    fn from(configuration: &CheckoutConfiguration) -> Self {
        Self {
            holder_name_required: configuration.holder_name_required,
            cvc_visibility: configuration.cvc_visibility,
            supported_brands: configuration.supported_brands.clone(),
            is_store_payment_field_visible: false,
        }
    }
}

/// Card component state.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardComponentState {
    /// Card number as typed.
    pub card_number: TextInputState,
    /// Expiry date as typed, e.g. `"12/27"`.
    pub expiry_date: TextInputState,
    /// Security code.
    pub security_code: TextInputState,
    /// Name on the card.
    pub holder_name: TextInputState,
    /// Whether the shopper asked to store the card.
    pub store_payment_method: bool,
    /// Brand picked by the shopper among the detected ones.
    pub selected_card_brand: Option<CardBrand>,
    /// Latest detection result for the card number.
    pub detected_card_types: Vec<DetectedCardType>,
    /// A payment is being submitted.
    pub is_loading: bool,
}

impl CardComponentState {
    /// The card type whose policies apply to the form.
    ///
    /// The selected brand wins, then the first detected type that is both
    /// reliable and supported.
    pub fn policy_card_type(&self) -> Option<&DetectedCardType> {
        let selected = self.selected_card_brand.as_ref().and_then(|brand| {
            self.detected_card_types
                .iter()
                .find(|card_type| &card_type.card_brand == brand)
        });
        selected.or_else(|| {
            self.detected_card_types
                .iter()
                .find(|card_type| card_type.is_reliable && card_type.is_supported)
        })
    }

    /// The card type used to validate the card number.
    ///
    /// Same as [`Self::policy_card_type`], falling back to the first
    /// supported detected type.
    pub fn number_card_type(&self) -> Option<&DetectedCardType> {
        self.policy_card_type().or_else(|| {
            self.detected_card_types
                .iter()
                .find(|card_type| card_type.is_supported)
        })
    }
}

impl fmt::Debug for CardComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let brands: Vec<&str> = self
            .detected_card_types
            .iter()
            .map(|card_type| card_type.card_brand.tx_variant())
            .collect();
        f.debug_struct("CardComponentState")
            .field("card_number", &mask_card_number(&self.card_number.text))
            .field("expiry_date", &self.expiry_date.text)
            .field("security_code", &mask_secret(&self.security_code.text))
            .field("holder_name", &self.holder_name.text)
            .field("store_payment_method", &self.store_payment_method)
            .field("selected_card_brand", &self.selected_card_brand)
            .field("detected_card_types", &brands)
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

/// Actions on the card component.
#[derive(Clone, PartialEq, Eq)]
pub enum CardIntent {
    /// The shopper typed in the card number field.
    UpdateCardNumber(String),
    /// The card number field gained or lost focus.
    UpdateCardNumberFocus(bool),
    /// The shopper typed in the expiry date field.
    UpdateExpiryDate(String),
    /// The expiry date field gained or lost focus.
    UpdateExpiryDateFocus(bool),
    /// The shopper typed in the security code field.
    UpdateSecurityCode(String),
    /// The security code field gained or lost focus.
    UpdateSecurityCodeFocus(bool),
    /// The shopper typed in the holder name field.
    UpdateHolderName(String),
    /// The holder name field gained or lost focus.
    UpdateHolderNameFocus(bool),
    /// The "store payment method" switch was toggled.
    UpdateStorePaymentMethod(bool),
    /// The shopper picked one of several detected brands.
    SelectBrand(CardBrand),
    /// Detection produced a new list for the current card number.
    UpdateDetectedCardTypes(Vec<DetectedCardType>),
    /// Submission started or finished.
    UpdateLoading(bool),
    /// Show all errors.
    HighlightValidationErrors,
}

impl ComponentIntent for CardIntent {
    fn highlight_validation_errors() -> Self {
        Self::HighlightValidationErrors
    }
}

impl fmt::Debug for CardIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateCardNumber(number) => f
                .debug_tuple("UpdateCardNumber")
                .field(&mask_card_number(number))
                .finish(),
            Self::UpdateCardNumberFocus(focus) => {
                f.debug_tuple("UpdateCardNumberFocus").field(focus).finish()
            }
            Self::UpdateExpiryDate(date) => f.debug_tuple("UpdateExpiryDate").field(date).finish(),
            Self::UpdateExpiryDateFocus(focus) => {
                f.debug_tuple("UpdateExpiryDateFocus").field(focus).finish()
            }
            Self::UpdateSecurityCode(code) => f
                .debug_tuple("UpdateSecurityCode")
                .field(&mask_secret(code))
                .finish(),
            Self::UpdateSecurityCodeFocus(focus) => {
                f.debug_tuple("UpdateSecurityCodeFocus").field(focus).finish()
            }
            Self::UpdateHolderName(name) => f.debug_tuple("UpdateHolderName").field(name).finish(),
            Self::UpdateHolderNameFocus(focus) => {
                f.debug_tuple("UpdateHolderNameFocus").field(focus).finish()
            }
            Self::UpdateStorePaymentMethod(store) => {
                f.debug_tuple("UpdateStorePaymentMethod").field(store).finish()
            }
            Self::SelectBrand(brand) => f.debug_tuple("SelectBrand").field(brand).finish(),
            Self::UpdateDetectedCardTypes(card_types) => f
                .debug_tuple("UpdateDetectedCardTypes")
                .field(&card_types.len())
                .finish(),
            Self::UpdateLoading(loading) => f.debug_tuple("UpdateLoading").field(loading).finish(),
            Self::HighlightValidationErrors => f.write_str("HighlightValidationErrors"),
        }
    }
}

/// Reducer of [`CardIntent`]s.
///
/// Unreliable detections take their `is_supported` flag from the
/// configured brands. Reliable ones keep what the lookup reported.
#[derive(Debug, Clone, Default)]
pub struct CardStateReducer {
    params: CardComponentParams,
}

impl CardStateReducer {
    /// Creates a reducer for the given settings.
    pub fn new(params: CardComponentParams) -> Self {
        Self { params }
    }

    /// Settings of this component.
    pub fn params(&self) -> &CardComponentParams {
        &self.params
    }

    /// Empty state with the default policies applied.
    pub fn initial_state(&self) -> CardComponentState {
        let holder_name_policy = if self.params.holder_name_required {
            FieldPolicy::Required
        } else {
            FieldPolicy::Hidden
        };
        let state = CardComponentState {
            holder_name: TextInputState::with_policy(holder_name_policy),
            ..CardComponentState::default()
        };
        self.apply_policies(state)
    }

    fn security_code_policy(&self, card_type: Option<&DetectedCardType>) -> FieldPolicy {
        match (self.params.cvc_visibility, card_type) {
            (CvcVisibility::AlwaysHide, _) => FieldPolicy::Hidden,
            (_, Some(card_type)) => card_type.cvc_policy,
            (CvcVisibility::AlwaysShow, None) => FieldPolicy::Required,
            (CvcVisibility::HideFirst, None) => FieldPolicy::Hidden,
        }
    }

    fn apply_policies(&self, state: CardComponentState) -> CardComponentState {
        let card_type = state.policy_card_type();
        let security_code_policy = self.security_code_policy(card_type);
        let expiry_date_policy = card_type
            .map(|card_type| card_type.expiry_date_policy)
            .unwrap_or_default();

        let security_code = state
            .security_code
            .with_requirement_policy(security_code_policy)
            .with_description(optional_description(
                security_code_policy,
                ErrorKey::SecurityCodeOptional,
            ));
        let expiry_date = state
            .expiry_date
            .with_requirement_policy(expiry_date_policy)
            .with_description(optional_description(
                expiry_date_policy,
                ErrorKey::ExpiryDateOptional,
            ));

        CardComponentState {
            security_code,
            expiry_date,
            ..state
        }
    }

    fn mark_supported(&self, detected_card_types: Vec<DetectedCardType>) -> Vec<DetectedCardType> {
        detected_card_types
            .into_iter()
            .map(|card_type| {
                if card_type.is_reliable {
                    return card_type;
                }
                let is_supported = self.params.supported_brands.contains(&card_type.card_brand);
                DetectedCardType {
                    is_supported,
                    ..card_type
                }
            })
            .collect()
    }
}

fn optional_description(policy: FieldPolicy, key: ErrorKey) -> Option<ErrorKey> {
    (policy == FieldPolicy::Optional).then_some(key)
}

impl StateReducer for CardStateReducer {
    type State = CardComponentState;
    type Intent = CardIntent;

    fn reduce(&self, state: CardComponentState, intent: CardIntent) -> CardComponentState {
        match intent {
            CardIntent::UpdateCardNumber(number) => CardComponentState {
                card_number: state.card_number.update_text(number),
                ..state
            },
            CardIntent::UpdateCardNumberFocus(has_focus) => CardComponentState {
                card_number: state.card_number.update_focus(has_focus),
                ..state
            },
            CardIntent::UpdateExpiryDate(date) => CardComponentState {
                expiry_date: state.expiry_date.update_text(date),
                ..state
            },
            CardIntent::UpdateExpiryDateFocus(has_focus) => CardComponentState {
                expiry_date: state.expiry_date.update_focus(has_focus),
                ..state
            },
            CardIntent::UpdateSecurityCode(code) => CardComponentState {
                security_code: state.security_code.update_text(code),
                ..state
            },
            CardIntent::UpdateSecurityCodeFocus(has_focus) => CardComponentState {
                security_code: state.security_code.update_focus(has_focus),
                ..state
            },
            CardIntent::UpdateHolderName(name) => CardComponentState {
                holder_name: state.holder_name.update_text(name),
                ..state
            },
            CardIntent::UpdateHolderNameFocus(has_focus) => CardComponentState {
                holder_name: state.holder_name.update_focus(has_focus),
                ..state
            },
            CardIntent::UpdateStorePaymentMethod(store_payment_method) => CardComponentState {
                store_payment_method,
                ..state
            },
            CardIntent::SelectBrand(brand) => self.apply_policies(CardComponentState {
                selected_card_brand: Some(brand),
                ..state
            }),
            CardIntent::UpdateDetectedCardTypes(detected_card_types) => {
                let detected_card_types = self.mark_supported(detected_card_types);
                // A selection only survives while its brand is still detected
                let selected_card_brand = state.selected_card_brand.filter(|brand| {
                    detected_card_types
                        .iter()
                        .any(|card_type| &card_type.card_brand == brand)
                });
                self.apply_policies(CardComponentState {
                    detected_card_types,
                    selected_card_brand,
                    ..state
                })
            }
            CardIntent::UpdateLoading(is_loading) => CardComponentState { is_loading, ..state },
            CardIntent::HighlightValidationErrors => {
                let mut state = state;
                highlight_fields([
                    &mut state.card_number,
                    &mut state.expiry_date,
                    &mut state.security_code,
                    &mut state.holder_name,
                ]);
                state
            }
        }
    }
}

/// Validator of [`CardComponentState`].
///
/// Expiry dates are checked against a reference date, today unless one is
/// fixed with [`CardStateValidator::with_reference_date`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CardStateValidator {
    reference_date: Option<NaiveDate>,
}

impl CardStateValidator {
    /// Validator using today's local date.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator using a fixed reference date.
    pub fn with_reference_date(reference_date: NaiveDate) -> Self {
        Self {
            reference_date: Some(reference_date),
        }
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn card_number_error(&self, state: &CardComponentState) -> Option<ErrorKey> {
        let (enable_luhn_check, is_brand_supported) = match state.number_card_type() {
            Some(card_type) => (card_type.enable_luhn_check, card_type.is_supported),
            // Unsupported guesses are not an error until a lookup confirms them
            None => (
                true,
                !state
                    .detected_card_types
                    .iter()
                    .any(|card_type| card_type.is_reliable),
            ),
        };

        match validate_card_number_for_brand(
            &state.card_number.text,
            enable_luhn_check,
            is_brand_supported,
        ) {
            CardNumberValidation::Valid => None,
            CardNumberValidation::InvalidUnsupportedBrand => {
                Some(ErrorKey::CardNumberUnsupportedBrand)
            }
            _ => Some(ErrorKey::CardNumberInvalid),
        }
    }

    fn expiry_date_error(&self, state: &CardComponentState) -> Option<ErrorKey> {
        let policy = state.expiry_date.requirement_policy;
        if policy == FieldPolicy::Hidden {
            return None;
        }
        let expiry_date = parse_expiry_date(&state.expiry_date.text);
        match validate_expiry_date(expiry_date, self.reference_date(), policy) {
            ExpiryDateValidation::Valid | ExpiryDateValidation::ValidNotRequired => None,
            ExpiryDateValidation::InvalidDateFormat => Some(ErrorKey::ExpiryDateInvalid),
            ExpiryDateValidation::InvalidTooOld => Some(ErrorKey::ExpiryDateTooOld),
            ExpiryDateValidation::InvalidTooFarInTheFuture => {
                Some(ErrorKey::ExpiryDateTooFarInTheFuture)
            }
        }
    }

    fn security_code_error(&self, state: &CardComponentState) -> Option<ErrorKey> {
        let field = &state.security_code;
        let valid = match field.requirement_policy {
            FieldPolicy::Hidden => true,
            FieldPolicy::Optional if field.text.trim().is_empty() => true,
            FieldPolicy::Optional => {
                validate_security_code(&field.text, state.number_card_type()).is_valid()
            }
            // The field policy wins over the policy of an unconfirmed card type
            FieldPolicy::Required => {
                validate_security_code(&field.text, state.number_card_type()) == CvcValidation::Valid
            }
        };
        (!valid).then_some(ErrorKey::SecurityCodeInvalid)
    }

    fn holder_name_error(&self, state: &CardComponentState) -> Option<ErrorKey> {
        let field = &state.holder_name;
        let missing = field.requirement_policy == FieldPolicy::Required && field.text.trim().is_empty();
        missing.then_some(ErrorKey::HolderNameRequired)
    }
}

impl StateValidator for CardStateValidator {
    type State = CardComponentState;

    fn validate(&self, state: CardComponentState) -> CardComponentState {
        let card_number_error = self.card_number_error(&state);
        let expiry_date_error = self.expiry_date_error(&state);
        let security_code_error = self.security_code_error(&state);
        let holder_name_error = self.holder_name_error(&state);

        CardComponentState {
            card_number: state.card_number.with_error(card_number_error),
            expiry_date: state.expiry_date.with_error(expiry_date_error),
            security_code: state.security_code.with_error(security_code_error),
            holder_name: state.holder_name.with_error(holder_name_error),
            ..state
        }
    }

    fn is_valid(&self, state: &CardComponentState) -> bool {
        state.card_number.is_valid()
            && state.expiry_date.is_valid()
            && state.security_code.is_valid()
            && state.holder_name.is_valid()
    }
}

/// What the UI renders for the card component.
#[derive(Clone, PartialEq, Eq)]
pub struct CardViewState {
    /// Card number grouped for display, e.g. `"4111 1111 1111 1111"`.
    pub formatted_card_number: String,
    /// The card number field.
    pub card_number: TextInputViewState,
    /// The expiry date field.
    pub expiry_date: TextInputViewState,
    /// The security code field.
    pub security_code: TextInputViewState,
    /// The holder name field.
    pub holder_name: TextInputViewState,
    /// Brands to show next to the card number.
    pub detected_card_brands: Vec<CardBrand>,
    /// Brand picked by the shopper.
    pub selected_card_brand: Option<CardBrand>,
    /// Whether the shopper asked to store the card.
    pub store_payment_method: bool,
    /// Whether the "store payment method" switch is shown.
    pub is_store_payment_field_visible: bool,
    /// A payment is being submitted.
    pub is_loading: bool,
}

impl fmt::Debug for CardViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardViewState")
            .field("card_number", &mask_card_number(&self.card_number.text))
            .field("card_number_error", &self.card_number.supporting_text)
            .field("security_code", &mask_secret(&self.security_code.text))
            .field("detected_card_brands", &self.detected_card_brands)
            .field("selected_card_brand", &self.selected_card_brand)
            .field("is_loading", &self.is_loading)
            .finish_non_exhaustive()
    }
}

/// Producer of [`CardViewState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CardViewStateProducer {
    is_store_payment_field_visible: bool,
}

impl CardViewStateProducer {
    /// Creates a producer for the given settings.
    pub fn new(params: &CardComponentParams) -> Self {
        Self {
            is_store_payment_field_visible: params.is_store_payment_field_visible,
        }
    }
}

impl ViewStateProducer for CardViewStateProducer {
    type State = CardComponentState;
    type ViewState = CardViewState;

    fn produce(&self, state: &CardComponentState) -> CardViewState {
        let card_type = state
            .number_card_type()
            .or_else(|| state.detected_card_types.first())
            .and_then(|card_type| card_type.card_brand.card_type());

        CardViewState {
            formatted_card_number: format_for_card_type(&state.card_number.text, card_type, " "),
            card_number: state.card_number.to_view_state(),
            expiry_date: state.expiry_date.to_view_state(),
            security_code: state.security_code.to_view_state(),
            holder_name: state.holder_name.to_view_state(),
            detected_card_brands: state
                .detected_card_types
                .iter()
                .map(|card_type| card_type.card_brand.clone())
                .collect(),
            selected_card_brand: state.selected_card_brand.clone(),
            store_payment_method: state.store_payment_method,
            is_store_payment_field_visible: self.is_store_payment_field_visible,
            is_loading: state.is_loading,
        }
    }
}

/// State machine of the card component.
pub type CardStateMachine =
    ComponentStateMachine<CardStateReducer, CardStateValidator, CardViewStateProducer>;

/// Creates a card component validating expiry dates against today.
pub fn create_state_machine(params: CardComponentParams) -> CardStateMachine {
    create_state_machine_with_validator(params, CardStateValidator::new())
}

/// Creates a card component with a custom validator.
pub fn create_state_machine_with_validator(
    params: CardComponentParams,
    validator: CardStateValidator,
) -> CardStateMachine {
    let producer = CardViewStateProducer::new(&params);
    let reducer = CardStateReducer::new(params);
    let initial_state = reducer.initial_state();
    ComponentStateMachine::new(reducer, validator, producer, initial_state)
}
