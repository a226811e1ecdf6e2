use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gpui::SharedString;

use super::binding::{ElementId, EventKind, HIDDEN_CLASS, ViewBinding};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ElementState {
    pub value: SharedString,
    pub text: SharedString,
    pub classes: BTreeSet<String>,
    pub disabled: bool,
}

#[derive(Default)]
struct ViewState {
    elements: BTreeMap<ElementId, ElementState>,
    listeners: BTreeSet<(ElementId, EventKind)>,
}

/// A `ViewBinding` kept entirely in memory.
///
/// Clones share the same tree, so a test can hand one clone to the controller
/// and inspect the page through another.
#[derive(Clone, Default)]
pub struct InMemoryView {
    state: Arc<RwLock<ViewState>>,
}

impl InMemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every element of the contact page, with banners, error texts and the
    /// loading label starting out hidden.
    pub fn contact_page() -> Self {
        let view = Self::new();
        for id in ElementId::CONTRACT {
            view.insert(id);
        }
        for id in [
            ElementId::NAME_ERROR,
            ElementId::EMAIL_ERROR,
            ElementId::PHONE_ERROR,
            ElementId::MESSAGE_ERROR,
            ElementId::SUBMIT_LOADING,
            ElementId::FORM_MESSAGES,
            ElementId::SUCCESS_MESSAGE,
            ElementId::ERROR_MESSAGE,
        ] {
            view.add_class(id, HIDDEN_CLASS);
        }
        view
    }

    pub fn insert(&self, id: ElementId) {
        self.write().elements.entry(id).or_default();
    }

    pub fn remove(&self, id: ElementId) -> Option<ElementState> {
        self.write().elements.remove(&id)
    }

    pub fn without(self, id: ElementId) -> Self {
        self.remove(id);
        self
    }

    pub fn element(&self, id: ElementId) -> Option<ElementState> {
        self.read().elements.get(&id).cloned()
    }

    pub fn listens(&self, id: ElementId, kind: EventKind) -> bool {
        self.read().listeners.contains(&(id, kind))
    }

    pub fn listener_count(&self) -> usize {
        self.read().listeners.len()
    }

    fn update(&self, id: ElementId, f: impl FnOnce(&mut ElementState)) {
        if let Some(element) = self.write().elements.get_mut(&id) {
            f(element);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ViewState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ViewBinding for InMemoryView {
    fn contains(&self, id: ElementId) -> bool {
        self.read().elements.contains_key(&id)
    }

    fn value(&self, id: ElementId) -> Option<SharedString> {
        self.read()
            .elements
            .get(&id)
            .map(|element| element.value.clone())
    }

    fn set_value(&self, id: ElementId, value: SharedString) {
        self.update(id, |element| element.value = value);
    }

    fn text(&self, id: ElementId) -> Option<SharedString> {
        self.read()
            .elements
            .get(&id)
            .map(|element| element.text.clone())
    }

    fn set_text(&self, id: ElementId, text: SharedString) {
        self.update(id, |element| element.text = text);
    }

    fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.read()
            .elements
            .get(&id)
            .is_some_and(|element| element.classes.contains(class))
    }

    fn add_class(&self, id: ElementId, class: &str) {
        self.update(id, |element| {
            element.classes.insert(class.to_string());
        });
    }

    fn remove_class(&self, id: ElementId, class: &str) {
        self.update(id, |element| {
            element.classes.remove(class);
        });
    }

    fn is_disabled(&self, id: ElementId) -> bool {
        self.read()
            .elements
            .get(&id)
            .is_some_and(|element| element.disabled)
    }

    fn set_disabled(&self, id: ElementId, disabled: bool) {
        self.update(id, |element| element.disabled = disabled);
    }

    fn listen(&self, id: ElementId, kind: EventKind) {
        let mut state = self.write();
        if state.elements.contains_key(&id) {
            state.listeners.insert((id, kind));
        }
    }
}
