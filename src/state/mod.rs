//! Component state pipeline.
//!
//! Every payment method component follows the same flow:
//!
//! ```text
//! intent -> StateReducer -> StateValidator -> ViewStateProducer -> view state
//! ```
//!
//! - the reducer applies a user or system action to the state and does
//!   nothing else (no validation, no I/O)
//! - the validator attaches field errors
//! - the producer projects the state into what the UI renders
//!
//! Each stage is a plain value with one pure method, so they can be tested
//! on their own. [`ComponentStateMachine`] wires them together and holds the
//! current snapshot; a state is only ever replaced, never edited in place.
//!
//! # Example
//!
//! ```
//! use checkout_core::state::blik::{self, BlikIntent};
//!
//! let mut component = blik::create_state_machine();
//! component.dispatch(BlikIntent::UpdateBlikCode("777123".into()));
//! assert!(component.is_valid());
//! ```

pub mod blik;
pub mod card;

use crate::card::FieldPolicy;
use std::fmt;
use tracing::trace;

/// Applies intents to a state.
pub trait StateReducer {
    /// Component state.
    type State;
    /// Actions understood by the reducer.
    type Intent;

    /// Returns the state after applying `intent`.
    fn reduce(&self, state: Self::State, intent: Self::Intent) -> Self::State;
}

/// Attaches field errors to a state.
pub trait StateValidator {
    /// Component state.
    type State;

    /// Returns the state with every field's error updated.
    fn validate(&self, state: Self::State) -> Self::State;

    /// Returns true when the state can be submitted.
    fn is_valid(&self, state: &Self::State) -> bool;
}

/// Projects a state into a view state.
pub trait ViewStateProducer {
    /// Component state.
    type State;
    /// What the UI renders.
    type ViewState;

    /// Builds the view state.
    fn produce(&self, state: &Self::State) -> Self::ViewState;
}

/// Intents that can ask for all validation errors to be shown.
pub trait ComponentIntent {
    /// The "highlight validation errors" intent.
    fn highlight_validation_errors() -> Self;
}

/// Runs reducer, validator and producer for one component.
pub struct ComponentStateMachine<R, V, P>
where
    R: StateReducer,
{
    reducer: R,
    validator: V,
    producer: P,
    state: R::State,
}

impl<R, V, P> ComponentStateMachine<R, V, P>
where
    R: StateReducer,
    R::State: Default,
    V: StateValidator<State = R::State>,
    P: ViewStateProducer<State = R::State>,
{
    /// Creates a state machine. The initial state is validated right away.
    pub fn new(reducer: R, validator: V, producer: P, initial_state: R::State) -> Self {
        let state = validator.validate(initial_state);
        Self {
            reducer,
            validator,
            producer,
            state,
        }
    }

    /// Applies an intent and returns the new view state.
    pub fn dispatch(&mut self, intent: R::Intent) -> P::ViewState {
        let state = std::mem::take(&mut self.state);
        let reduced = self.reducer.reduce(state, intent);
        self.state = self.validator.validate(reduced);
        trace!(is_valid = self.is_valid(), "Component state updated");
        self.view_state()
    }

    /// Current state snapshot.
    pub fn state(&self) -> &R::State {
        &self.state
    }

    /// View state of the current snapshot.
    pub fn view_state(&self) -> P::ViewState {
        self.producer.produce(&self.state)
    }

    /// Returns true when the current state can be submitted.
    pub fn is_valid(&self) -> bool {
        self.validator.is_valid(&self.state)
    }

    /// Shows every field error and moves focus to the first invalid field.
    pub fn highlight_validation_errors(&mut self) -> P::ViewState
    where
        R::Intent: ComponentIntent,
    {
        self.dispatch(R::Intent::highlight_validation_errors())
    }
}

impl<R, V, P> fmt::Debug for ComponentStateMachine<R, V, P>
where
    R: StateReducer,
    R::State: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentStateMachine")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Localization keys for field errors and hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ErrorKey {
    CardNumberInvalid,
    CardNumberUnsupportedBrand,
    ExpiryDateInvalid,
    ExpiryDateTooOld,
    ExpiryDateTooFarInTheFuture,
    ExpiryDateOptional,
    SecurityCodeInvalid,
    SecurityCodeOptional,
    HolderNameRequired,
    BlikCodeInvalid,
    BlikCodeHint,
}

impl ErrorKey {
    /// Resource key looked up by the UI.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::CardNumberInvalid => "checkout_card_number_not_valid",
            Self::CardNumberUnsupportedBrand => "checkout_card_brand_not_supported",
            Self::ExpiryDateInvalid => "checkout_expiry_date_not_valid",
            Self::ExpiryDateTooOld => "checkout_expiry_date_not_valid_too_old",
            Self::ExpiryDateTooFarInTheFuture => "checkout_expiry_date_not_valid_too_far_in_future",
            Self::ExpiryDateOptional => "checkout_card_expiry_date_optional",
            Self::SecurityCodeInvalid => "checkout_security_code_not_valid",
            Self::SecurityCodeOptional => "checkout_card_security_code_optional",
            Self::HolderNameRequired => "checkout_holder_name_not_valid",
            Self::BlikCodeInvalid => "checkout_blik_code_not_valid",
            Self::BlikCodeHint => "checkout_blik_code_hint",
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// State of one text field.
///
/// An error is attached by the validator as soon as the text is invalid,
/// but only shown once the field loses focus or errors are highlighted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputState {
    /// Text as typed.
    pub text: String,
    /// Validation error, `None` when the text is valid.
    pub error_message: Option<ErrorKey>,
    /// Hint shown while no error is displayed.
    pub description: Option<ErrorKey>,
    pub is_focused: bool,
    /// Whether the error is displayed.
    pub show_error: bool,
    pub requirement_policy: FieldPolicy,
}

impl TextInputState {
    /// Creates a field with the given requirement policy.
    pub fn with_policy(requirement_policy: FieldPolicy) -> Self {
        Self {
            requirement_policy,
            ..Self::default()
        }
    }

    /// Replaces the text. Typing hides the error until focus leaves again.
    pub fn update_text(self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            show_error: false,
            ..self
        }
    }

    /// Gaining focus hides the error, losing it shows the error if any.
    pub fn update_focus(self, has_focus: bool) -> Self {
        let show_error = !has_focus && self.error_message.is_some();
        Self {
            is_focused: has_focus,
            show_error,
            ..self
        }
    }

    /// Shows the error if any, optionally taking focus.
    pub fn highlight(self, take_focus: bool) -> Self {
        let show_error = self.error_message.is_some();
        Self {
            is_focused: self.is_focused || take_focus,
            show_error,
            ..self
        }
    }

    /// Replaces the validation error.
    pub fn with_error(self, error_message: Option<ErrorKey>) -> Self {
        Self {
            error_message,
            ..self
        }
    }

    /// Replaces the hint shown below the field.
    pub fn with_description(self, description: Option<ErrorKey>) -> Self {
        Self {
            description,
            ..self
        }
    }

    /// Replaces the requirement policy.
    pub fn with_requirement_policy(self, requirement_policy: FieldPolicy) -> Self {
        Self {
            requirement_policy,
            ..self
        }
    }

    /// Returns true when no error is attached.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.error_message.is_none()
    }

    /// Projects the field for rendering.
    pub fn to_view_state(&self) -> TextInputViewState {
        let is_error = self.show_error && self.error_message.is_some();
        TextInputViewState {
            text: self.text.clone(),
            supporting_text: if is_error {
                self.error_message
            } else {
                self.description
            },
            is_error,
            is_focused: self.is_focused,
            is_visible: self.requirement_policy != FieldPolicy::Hidden,
        }
    }
}

/// What the UI renders for one text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct TextInputViewState {
    pub text: String,
    /// The error when shown, the description otherwise.
    pub supporting_text: Option<ErrorKey>,
    pub is_error: bool,
    pub is_focused: bool,
    /// False for hidden fields.
    pub is_visible: bool,
}

/// Highlights every field and focuses the first one with an error.
pub fn highlight_fields<const N: usize>(fields: [&mut TextInputState; N]) {
    let mut focus_taken = false;
    for field in fields {
        let take_focus = !focus_taken && field.error_message.is_some();
        focus_taken |= take_focus;
        *field = std::mem::take(field).highlight(take_focus);
    }
}
