pub mod form;

pub use form::{ContactFormController, ContactFormOptions, InMemoryView, SimulatedSubmitter};
