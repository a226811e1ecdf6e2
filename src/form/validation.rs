use std::fmt::{Debug, Formatter};
use std::sync::{Arc, LazyLock};

use gpui::SharedString;
use regex::Regex;

use super::binding::ElementId;
use super::controller::FieldKey;

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

pub const NAME_ERROR_MESSAGE: &str = "Name must be at least 2 characters long";
pub const EMAIL_ERROR_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_ERROR_MESSAGE: &str = "Please enter a valid phone number";
pub const MESSAGE_ERROR_MESSAGE: &str = "Message must be at least 10 characters long";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_PATTERN: invalid regex pattern")
});

// The optional `+` does not count toward the ten characters.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\+]?[0-9\s\-\(\)]{10,}$").expect("PHONE_PATTERN: invalid regex pattern")
});

/// Predicate applied to a trimmed field value.
pub trait FieldValidator: Send + Sync {
    fn validate(&self, value: &str) -> bool;
}

impl<F> FieldValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn validate(&self, value: &str) -> bool {
        (self)(value)
    }
}

// Lengths count UTF-16 code units, the way browser form values are measured.
fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

pub fn is_valid_name(value: &str) -> bool {
    utf16_len(value) >= NAME_MIN_CHARS
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    value.is_empty() || PHONE_PATTERN.is_match(value)
}

pub fn is_valid_message(value: &str) -> bool {
    utf16_len(value) >= MESSAGE_MIN_CHARS
}

/// Validation rule for one form input together with its UI bindings.
#[derive(Clone)]
pub struct FieldRule {
    key: FieldKey,
    field: ElementId,
    error: ElementId,
    error_message: SharedString,
    validator: Arc<dyn FieldValidator>,
}

impl FieldRule {
    pub fn new(
        key: FieldKey,
        field: ElementId,
        error: ElementId,
        error_message: impl Into<SharedString>,
        validator: impl FieldValidator + 'static,
    ) -> Self {
        Self {
            key,
            field,
            error,
            error_message: error_message.into(),
            validator: Arc::new(validator),
        }
    }

    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn field(&self) -> ElementId {
        self.field
    }

    pub fn error(&self) -> ElementId {
        self.error
    }

    pub fn error_message(&self) -> &SharedString {
        &self.error_message
    }

    /// Trims whitespace and byte-order marks from `value` and runs the
    /// validator on what remains.
    pub fn check(&self, value: &str) -> bool {
        let trimmed = value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        self.validator.validate(trimmed)
    }
}

impl Debug for FieldRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("key", &self.key)
            .field("field", &self.field)
            .field("error", &self.error)
            .field("error_message", &self.error_message)
            .finish_non_exhaustive()
    }
}

/// The rules for the contact page: name, email, phone and message, in that order.
pub fn default_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(
            FieldKey::NAME,
            ElementId::NAME,
            ElementId::NAME_ERROR,
            NAME_ERROR_MESSAGE,
            is_valid_name,
        ),
        FieldRule::new(
            FieldKey::EMAIL,
            ElementId::EMAIL,
            ElementId::EMAIL_ERROR,
            EMAIL_ERROR_MESSAGE,
            is_valid_email,
        ),
        FieldRule::new(
            FieldKey::PHONE,
            ElementId::PHONE,
            ElementId::PHONE_ERROR,
            PHONE_ERROR_MESSAGE,
            is_valid_phone,
        ),
        FieldRule::new(
            FieldKey::MESSAGE,
            ElementId::MESSAGE,
            ElementId::MESSAGE_ERROR,
            MESSAGE_ERROR_MESSAGE,
            is_valid_message,
        ),
    ]
}
