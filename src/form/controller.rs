use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gpui::{SharedString, Window};
use tracing::{debug, info, warn};

use super::binding::{ElementId, EventKind, ViewBinding, ViewEvent};
use super::submission::{FormValues, SubmissionResult, Submitter};
use super::validation::{FieldRule, default_rules};

pub const FALLBACK_ERROR_MESSAGE: &str =
    "There was an error sending your message. Please try again.";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const NAME: Self = Self::new("name");
    pub const EMAIL: Self = Self::new("email");
    pub const PHONE: Self = Self::new("phone");
    pub const MESSAGE: Self = Self::new("message");

    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadingState {
    Idle,
    Loading,
}

/// How one run of the submission lifecycle ended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// The form element was not found at attach time; nothing ran.
    Skipped,
    /// At least one field failed validation; the submitter was not called.
    Invalid,
    Succeeded,
    /// The submitter failed; carries the text shown in the error banner.
    Failed(SharedString),
}

/// What the controller did with a delivered event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EventDisposition {
    Ignored,
    FieldValidated(bool),
    Submitted(SubmitOutcome),
}

impl EventDisposition {
    pub fn prevents_default(&self) -> bool {
        matches!(self, EventDisposition::Submitted(_))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContactFormOptions {
    pub form: ElementId,
    pub invalid_class: &'static str,
    pub valid_class: &'static str,
    pub loading_class: &'static str,
    pub fallback_error_message: &'static str,
}

impl Default for ContactFormOptions {
    fn default() -> Self {
        Self {
            form: ElementId::CONTACT_FORM,
            invalid_class: "border-red-500",
            valid_class: "border-green-500",
            loading_class: "loading",
            fallback_error_message: FALLBACK_ERROR_MESSAGE,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormSnapshot {
    pub loading: LoadingState,
    pub submit_count: u32,
    pub last_outcome: Option<SubmitOutcome>,
    /// Result of the most recent validation of each field. Cleared after a
    /// successful submission resets the form.
    pub field_validity: BTreeMap<FieldKey, bool>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
    InvalidStateTransition { from: LoadingState, to: LoadingState },
    AlreadySubmitting,
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
            FormError::InvalidStateTransition { from, to } => {
                write!(f, "invalid loading state transition: {from:?} -> {to:?}")
            }
            FormError::AlreadySubmitting => f.write_str("form submit is already in progress"),
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub(super) struct FormState {
    pub(super) loading: LoadingState,
    pub(super) submit_count: u32,
    pub(super) last_outcome: Option<SubmitOutcome>,
    pub(super) field_validity: BTreeMap<FieldKey, bool>,
}

/// Drives the contact form: validates fields on blur, validates the whole
/// form on submit and runs one submission at a time through a [`Submitter`].
#[derive(Clone)]
pub struct ContactFormController {
    options: ContactFormOptions,
    view: Arc<dyn ViewBinding>,
    submitter: Arc<dyn Submitter>,
    rules: Arc<[FieldRule]>,
    listeners: Arc<BTreeSet<(ElementId, EventKind)>>,
    attached: bool,
    state: Arc<RwLock<FormState>>,
}

impl ContactFormController {
    pub fn attach<V, S>(view: V, submitter: S, options: ContactFormOptions) -> Self
    where
        V: ViewBinding,
        S: Submitter,
    {
        Self::attach_with_rules(view, submitter, options, default_rules())
    }

    /// Binds to `options.form` in `view`. When the form is missing the
    /// controller stays detached and ignores every event.
    pub fn attach_with_rules<V, S>(
        view: V,
        submitter: S,
        options: ContactFormOptions,
        rules: Vec<FieldRule>,
    ) -> Self
    where
        V: ViewBinding,
        S: Submitter,
    {
        let view: Arc<dyn ViewBinding> = Arc::new(view);
        let attached = view.contains(options.form);
        let mut listeners = BTreeSet::new();

        let rules = if attached {
            for rule in &rules {
                if view.contains(rule.field()) {
                    view.listen(rule.field(), EventKind::Blur);
                    listeners.insert((rule.field(), EventKind::Blur));
                }
            }
            view.listen(options.form, EventKind::Submit);
            listeners.insert((options.form, EventKind::Submit));
            info!(form = %options.form, fields = rules.len(), "contact form attached");
            rules
        } else {
            debug!(form = %options.form, "form element not found, controller stays detached");
            Vec::new()
        };

        Self {
            options,
            view,
            submitter: Arc::new(submitter),
            rules: rules.into(),
            listeners: Arc::new(listeners),
            attached,
            state: Arc::new(RwLock::new(FormState {
                loading: LoadingState::Idle,
                submit_count: 0,
                last_outcome: None,
                field_validity: BTreeMap::new(),
            })),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn options(&self) -> ContactFormOptions {
        self.options
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn rule(&self, key: FieldKey) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.key() == key)
    }

    pub fn loading_state(&self) -> FormResult<LoadingState> {
        Ok(read_lock(&self.state, "reading loading state")?.loading)
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            loading: state.loading,
            submit_count: state.submit_count,
            last_outcome: state.last_outcome.clone(),
            field_validity: state.field_validity.clone(),
        })
    }

    /// Whether the host should suppress its default action for `event`.
    /// Known before the event is handled, so hosts can decide synchronously.
    pub fn prevents_default(&self, event: &ViewEvent) -> bool {
        event.kind() == EventKind::Submit
            && self.listeners.contains(&(event.target(), event.kind()))
    }

    pub async fn handle_event(&self, event: ViewEvent) -> FormResult<EventDisposition> {
        if !self.listeners.contains(&(event.target(), event.kind())) {
            return Ok(EventDisposition::Ignored);
        }
        match event {
            ViewEvent::Blur(target) => {
                let Some(rule) = self.rules.iter().find(|rule| rule.field() == target) else {
                    return Ok(EventDisposition::Ignored);
                };
                Ok(EventDisposition::FieldValidated(self.validate_field(rule)?))
            }
            ViewEvent::Submit(_) => Ok(EventDisposition::Submitted(
                self.handle_submission().await?,
            )),
        }
    }

    pub fn validate_field(&self, rule: &FieldRule) -> FormResult<bool> {
        let value = self.view.value(rule.field()).unwrap_or_default();
        let is_valid = rule.check(&value);

        if is_valid {
            self.view.remove_class(rule.field(), self.options.invalid_class);
            self.view.add_class(rule.field(), self.options.valid_class);
            self.view.set_hidden(rule.error(), true);
        } else {
            self.view.add_class(rule.field(), self.options.invalid_class);
            self.view.remove_class(rule.field(), self.options.valid_class);
            self.view.set_text(rule.error(), rule.error_message().clone());
            self.view.set_hidden(rule.error(), false);
        }
        debug!(field = %rule.key(), valid = is_valid, "field validated");

        write_lock(&self.state, "recording field validity")?
            .field_validity
            .insert(rule.key(), is_valid);
        Ok(is_valid)
    }

    /// Validates every field, updating each one's styling even after a failure.
    pub fn validate_all_fields(&self) -> FormResult<bool> {
        let mut all_valid = true;
        for rule in self.rules.iter() {
            all_valid &= self.validate_field(rule)?;
        }
        Ok(all_valid)
    }

    pub async fn handle_submission(&self) -> FormResult<SubmitOutcome> {
        if !self.attached {
            return Ok(SubmitOutcome::Skipped);
        }
        {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if state.loading == LoadingState::Loading {
                warn!("submit ignored while a submission is in flight");
                return Err(FormError::AlreadySubmitting);
            }
            state.submit_count = state.submit_count.saturating_add(1);
        }

        self.hide_messages();

        if !self.validate_all_fields()? {
            info!("submission blocked by invalid fields");
            self.finish(SubmitOutcome::Invalid)?;
            return Ok(SubmitOutcome::Invalid);
        }

        {
            let mut state = write_lock(&self.state, "entering loading state")?;
            if state.loading == LoadingState::Loading {
                return Err(FormError::AlreadySubmitting);
            }
            transition_loading_state(&mut state, LoadingState::Loading)?;
        }
        self.set_loading_view(true);
        let loading = LoadingGuard { controller: self };

        let values = self.collect_values();
        info!(fields = values.len(), "submitting contact form");
        let result = self.submitter.submit(values).await;

        let outcome = match result {
            SubmissionResult::Success => {
                self.show_success_message();
                self.reset_fields();
                self.clear_validation_classes();
                info!("contact form submitted");
                SubmitOutcome::Succeeded
            }
            SubmissionResult::Failure(message) => {
                let shown = self.show_error_message(message);
                warn!(message = %shown, "contact form submission failed");
                SubmitOutcome::Failed(shown)
            }
        };

        drop(loading);
        self.finish(outcome.clone())?;
        Ok(outcome)
    }

    /// Runs the submission lifecycle on the window's executor and refreshes
    /// the window once it settles.
    pub fn submit_in(&self, window: &mut Window, cx: &mut gpui::App) {
        let controller = self.clone();
        let window_handle = window.window_handle();
        cx.spawn(async move |cx| {
            if let Err(error) = controller.handle_submission().await {
                warn!(%error, "contact form submission did not run");
            }
            let _ = window_handle.update(cx, |_, window, _| {
                window.refresh();
            });
        })
        .detach();
    }

    /// Validates the field bound to `target` after it lost focus.
    pub fn blur_in(&self, target: ElementId, window: &mut Window) -> FormResult<Option<bool>> {
        if !self.listeners.contains(&(target, EventKind::Blur)) {
            return Ok(None);
        }
        let Some(rule) = self.rules.iter().find(|rule| rule.field() == target) else {
            return Ok(None);
        };
        let is_valid = self.validate_field(rule)?;
        window.refresh();
        Ok(Some(is_valid))
    }

    fn finish(&self, outcome: SubmitOutcome) -> FormResult<()> {
        let mut state = write_lock(&self.state, "completing submit")?;
        if outcome == SubmitOutcome::Succeeded {
            state.field_validity.clear();
        }
        state.last_outcome = Some(outcome);
        Ok(())
    }

    fn collect_values(&self) -> FormValues {
        self.rules
            .iter()
            .filter_map(|rule| {
                self.view
                    .value(rule.field())
                    .map(|value| (rule.key(), value))
            })
            .collect()
    }

    fn set_loading_view(&self, loading: bool) {
        self.view.set_disabled(ElementId::SUBMIT_BUTTON, loading);
        self.view
            .toggle_class(ElementId::SUBMIT_BUTTON, self.options.loading_class, loading);
        self.view.set_hidden(ElementId::SUBMIT_TEXT, loading);
        self.view.set_hidden(ElementId::SUBMIT_LOADING, !loading);
    }

    fn hide_messages(&self) {
        self.view.set_hidden(ElementId::FORM_MESSAGES, true);
        self.view.set_hidden(ElementId::SUCCESS_MESSAGE, true);
        self.view.set_hidden(ElementId::ERROR_MESSAGE, true);
    }

    fn show_success_message(&self) {
        self.view.set_hidden(ElementId::FORM_MESSAGES, false);
        self.view.set_hidden(ElementId::SUCCESS_MESSAGE, false);
    }

    fn show_error_message(&self, message: Option<SharedString>) -> SharedString {
        let message = message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| SharedString::from(self.options.fallback_error_message));
        self.view.set_text(ElementId::ERROR_TEXT, message.clone());
        self.view.set_hidden(ElementId::FORM_MESSAGES, false);
        self.view.set_hidden(ElementId::ERROR_MESSAGE, false);
        message
    }

    fn reset_fields(&self) {
        for rule in self.rules.iter() {
            self.view.set_value(rule.field(), SharedString::default());
        }
    }

    fn clear_validation_classes(&self) {
        for rule in self.rules.iter() {
            self.view.remove_class(rule.field(), self.options.invalid_class);
            self.view.remove_class(rule.field(), self.options.valid_class);
        }
    }
}

/// Leaves the loading state when dropped, including when the lifecycle
/// future is dropped while the submitter is still pending.
struct LoadingGuard<'a> {
    controller: &'a ContactFormController,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.controller.set_loading_view(false);
        let left = write_lock(&self.controller.state, "leaving loading state")
            .and_then(|mut state| transition_loading_state(&mut state, LoadingState::Idle));
        if let Err(error) = left {
            warn!(%error, "failed to leave loading state");
        }
    }
}

pub(super) fn transition_loading_state(
    state: &mut FormState,
    next: LoadingState,
) -> FormResult<()> {
    let current = state.loading;
    let allowed = matches!(
        (current, next),
        (LoadingState::Idle, LoadingState::Loading) | (LoadingState::Loading, LoadingState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    state.loading = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
