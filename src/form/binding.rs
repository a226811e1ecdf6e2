use std::fmt::{Display, Formatter};

use gpui::SharedString;

pub const HIDDEN_CLASS: &str = "hidden";

/// Identifier of one element in the page markup the controller drives.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ElementId(&'static str);

impl ElementId {
    pub const CONTACT_FORM: Self = Self::new("contactForm");
    pub const SUBMIT_BUTTON: Self = Self::new("submit-btn");
    pub const SUBMIT_TEXT: Self = Self::new("submit-text");
    pub const SUBMIT_LOADING: Self = Self::new("submit-loading");
    pub const FORM_MESSAGES: Self = Self::new("form-messages");
    pub const SUCCESS_MESSAGE: Self = Self::new("success-message");
    pub const ERROR_MESSAGE: Self = Self::new("error-message");
    pub const ERROR_TEXT: Self = Self::new("error-text");

    pub const NAME: Self = Self::new("name");
    pub const EMAIL: Self = Self::new("email");
    pub const PHONE: Self = Self::new("phone");
    pub const MESSAGE: Self = Self::new("message");
    pub const NAME_ERROR: Self = Self::new("name-error");
    pub const EMAIL_ERROR: Self = Self::new("email-error");
    pub const PHONE_ERROR: Self = Self::new("phone-error");
    pub const MESSAGE_ERROR: Self = Self::new("message-error");

    /// Every element the contact page markup is expected to provide.
    pub const CONTRACT: [Self; 16] = [
        Self::CONTACT_FORM,
        Self::SUBMIT_BUTTON,
        Self::NAME,
        Self::EMAIL,
        Self::PHONE,
        Self::MESSAGE,
        Self::NAME_ERROR,
        Self::EMAIL_ERROR,
        Self::PHONE_ERROR,
        Self::MESSAGE_ERROR,
        Self::SUBMIT_TEXT,
        Self::SUBMIT_LOADING,
        Self::FORM_MESSAGES,
        Self::SUCCESS_MESSAGE,
        Self::ERROR_MESSAGE,
        Self::ERROR_TEXT,
    ];

    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for ElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EventKind {
    Blur,
    Submit,
}

/// An event delivered by the host view to the controller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ViewEvent {
    Blur(ElementId),
    Submit(ElementId),
}

impl ViewEvent {
    pub const fn kind(self) -> EventKind {
        match self {
            ViewEvent::Blur(_) => EventKind::Blur,
            ViewEvent::Submit(_) => EventKind::Submit,
        }
    }

    pub const fn target(self) -> ElementId {
        match self {
            ViewEvent::Blur(target) | ViewEvent::Submit(target) => target,
        }
    }
}

/// Access to the UI tree hosting the form.
///
/// Implementations ignore writes aimed at elements they do not contain, so a
/// page missing an optional element degrades instead of failing.
pub trait ViewBinding: Send + Sync + 'static {
    fn contains(&self, id: ElementId) -> bool;

    /// Current text value of an input element, `None` when the element is absent.
    fn value(&self, id: ElementId) -> Option<SharedString>;
    fn set_value(&self, id: ElementId, value: SharedString);

    fn text(&self, id: ElementId) -> Option<SharedString>;
    fn set_text(&self, id: ElementId, text: SharedString);

    fn has_class(&self, id: ElementId, class: &str) -> bool;
    fn add_class(&self, id: ElementId, class: &str);
    fn remove_class(&self, id: ElementId, class: &str);

    fn is_disabled(&self, id: ElementId) -> bool;
    fn set_disabled(&self, id: ElementId, disabled: bool);

    /// Asks the host to forward events of `kind` targeting `id`.
    fn listen(&self, id: ElementId, kind: EventKind);

    fn toggle_class(&self, id: ElementId, class: &str, enabled: bool) {
        if enabled {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    fn set_hidden(&self, id: ElementId, hidden: bool) {
        self.toggle_class(id, HIDDEN_CLASS, hidden);
    }

    fn is_hidden(&self, id: ElementId) -> bool {
        self.has_class(id, HIDDEN_CLASS)
    }
}
