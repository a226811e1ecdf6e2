mod binding;
mod controller;
mod memory;
mod submission;
mod validation;


pub use binding::{ElementId, EventKind, HIDDEN_CLASS, ViewBinding, ViewEvent};
pub use controller::{
    ContactFormController, ContactFormOptions, EventDisposition, FALLBACK_ERROR_MESSAGE,
    FieldKey, FormError, FormResult, FormSnapshot, LoadingState, SubmitOutcome,
};
pub use memory::{ElementState, InMemoryView};
pub use submission::{
    BoxedSubmitFuture, FormValues, SIMULATED_DELAY, SIMULATED_FAILURE_MESSAGE,
    SIMULATED_SUCCESS_RATE, SimulatedSubmitter, SubmissionResult, Submitter,
};
pub use validation::{
    EMAIL_ERROR_MESSAGE, FieldRule, FieldValidator, MESSAGE_ERROR_MESSAGE, MESSAGE_MIN_CHARS,
    NAME_ERROR_MESSAGE, NAME_MIN_CHARS, PHONE_ERROR_MESSAGE, default_rules, is_valid_email,
    is_valid_message, is_valid_name, is_valid_phone,
};
