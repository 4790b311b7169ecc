//! BLIK component: a six digit code generated in the shopper's banking app.

use super::{
    highlight_fields, ComponentIntent, ComponentStateMachine, ErrorKey, StateReducer,
    StateValidator, TextInputState, TextInputViewState, ViewStateProducer,
};
use crate::format::{is_digits_only, normalize};
use crate::mask::mask_secret;
use std::fmt;

/// Number of digits in a BLIK code.
pub const BLIK_CODE_LENGTH: usize = 6;

/// Returns true for exactly six digits, separators ignored.
pub fn is_valid_blik_code(code: &str) -> bool {
    let normalized = normalize(code);
    normalized.len() == BLIK_CODE_LENGTH && is_digits_only(&normalized)
}

/// BLIK component state.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BlikComponentState {
    /// The code field.
    pub blik_code: TextInputState,
    /// A payment is being submitted.
    pub is_loading: bool,
}

impl BlikComponentState {
    /// Empty state with the code hint set.
    pub fn new() -> Self {
        Self {
            blik_code: TextInputState::default().with_description(Some(ErrorKey::BlikCodeHint)),
            is_loading: false,
        }
    }
}

impl fmt::Debug for BlikComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlikComponentState")
            .field("blik_code", &mask_secret(&self.blik_code.text))
            .field("error_message", &self.blik_code.error_message)
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

/// Actions on the BLIK component.
#[derive(Clone, PartialEq, Eq)]
pub enum BlikIntent {
    /// The shopper typed in the code field.
    UpdateBlikCode(String),
    /// The code field gained or lost focus.
    UpdateBlikCodeFocus(bool),
    /// Submission started or finished.
    UpdateLoading(bool),
    /// Show all errors.
    HighlightValidationErrors,
}

impl ComponentIntent for BlikIntent {
    fn highlight_validation_errors() -> Self {
        Self::HighlightValidationErrors
    }
}

impl fmt::Debug for BlikIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateBlikCode(code) => f
                .debug_tuple("UpdateBlikCode")
                .field(&mask_secret(code))
                .finish(),
            Self::UpdateBlikCodeFocus(focus) => {
                f.debug_tuple("UpdateBlikCodeFocus").field(focus).finish()
            }
            Self::UpdateLoading(loading) => f.debug_tuple("UpdateLoading").field(loading).finish(),
            Self::HighlightValidationErrors => f.write_str("HighlightValidationErrors"),
        }
    }
}

/// Reducer of [`BlikIntent`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlikStateReducer;

impl StateReducer for BlikStateReducer {
    type State = BlikComponentState;
    type Intent = BlikIntent;

    fn reduce(&self, state: BlikComponentState, intent: BlikIntent) -> BlikComponentState {
        match intent {
            BlikIntent::UpdateBlikCode(code) => BlikComponentState {
                blik_code: state.blik_code.update_text(code),
                ..state
            },
            BlikIntent::UpdateBlikCodeFocus(has_focus) => BlikComponentState {
                blik_code: state.blik_code.update_focus(has_focus),
                ..state
            },
            BlikIntent::UpdateLoading(is_loading) => BlikComponentState { is_loading, ..state },
            BlikIntent::HighlightValidationErrors => {
                let mut state = state;
                highlight_fields([&mut state.blik_code]);
                state
            }
        }
    }
}

/// Validator of [`BlikComponentState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BlikStateValidator;

impl StateValidator for BlikStateValidator {
    type State = BlikComponentState;

    fn validate(&self, state: BlikComponentState) -> BlikComponentState {
        let error = if is_valid_blik_code(&state.blik_code.text) {
            None
        } else {
            Some(ErrorKey::BlikCodeInvalid)
        };
        BlikComponentState {
            blik_code: state.blik_code.with_error(error),
            ..state
        }
    }

    fn is_valid(&self, state: &BlikComponentState) -> bool {
        is_valid_blik_code(&state.blik_code.text)
    }
}

/// What the UI renders for the BLIK component.
#[derive(Clone, PartialEq, Eq)]
pub struct BlikViewState {
    /// The code field.
    pub blik_code: TextInputViewState,
    /// A payment is being submitted.
    pub is_loading: bool,
}

impl fmt::Debug for BlikViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlikViewState")
            .field("blik_code", &mask_secret(&self.blik_code.text))
            .field("is_error", &self.blik_code.is_error)
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

/// Producer of [`BlikViewState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BlikViewStateProducer;

impl ViewStateProducer for BlikViewStateProducer {
    type State = BlikComponentState;
    type ViewState = BlikViewState;

    fn produce(&self, state: &BlikComponentState) -> BlikViewState {
        BlikViewState {
            blik_code: state.blik_code.to_view_state(),
            is_loading: state.is_loading,
        }
    }
}

/// State machine of the BLIK component.
pub type BlikStateMachine =
    ComponentStateMachine<BlikStateReducer, BlikStateValidator, BlikViewStateProducer>;

/// Creates a BLIK component with an empty code.
pub fn create_state_machine() -> BlikStateMachine {
    ComponentStateMachine::new(
        BlikStateReducer,
        BlikStateValidator,
        BlikViewStateProducer,
        BlikComponentState::new(),
    )
}
