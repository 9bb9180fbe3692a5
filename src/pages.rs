//! # Pages and Navigation
//!
//! Named panels of typed controls, exactly one of which is visible at a time.
//!
//! Controls are a closed set ([`Control`]): a [`Label`] only has text, a
//! [`Button`] can be pressed, an [`Entry`] can be read and written. Pressing a
//! button yields its [`Trigger`]; the application context decides what that
//! means.

use std::collections::BTreeMap;
use log::debug;
use crate::invariant_ppt::assert_invariant;
use crate::registry::ActionRegistry;
use crate::report::UiError;

pub const ANALYSIS_PAGE: &str = "Page 1";
pub const PROJECT_PAGE: &str = "Page 2";
pub const FOOTER: &str = "© Powered by GDMC-BLR";

/// What pressing a button asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Main button of registry slot `n`.
    Action(usize),
    /// Help ("i") button of registry slot `n`.
    Help(usize),
    ShowPage(String),
    ComingSoon,
    SubmitLinkForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// What the user types to press it.
    pub key: String,
    pub text: String,
    trigger: Trigger,
}

impl Button {
    pub fn new(key: impl Into<String>, text: impl Into<String>, trigger: Trigger) -> Self {
        Self { key: key.into(), text: text.into(), trigger }
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn press(&self) -> Trigger {
        debug!("Pressed [{}] {}", self.key, self.text);
        self.trigger.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub label: String,
    value: String,
}

impl Entry {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), value: String::new() }
    }

    pub fn get(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Label(Label),
    Button(Button),
    Entry(Entry),
}

impl Control {
    pub fn label(text: impl Into<String>) -> Self {
        Control::Label(Label { text: text.into() })
    }

    pub fn button(key: impl Into<String>, text: impl Into<String>, trigger: Trigger) -> Self {
        Control::Button(Button::new(key, text, trigger))
    }

    pub fn entry(label: impl Into<String>) -> Self {
        Control::Entry(Entry::new(label))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub name: String,
    pub title: String,
    pub controls: Vec<Control>,
    visible: bool,
}

impl Page {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self { name: name.into(), title: title.into(), controls: Vec::new(), visible: false }
    }

    pub fn with(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.controls.iter().filter_map(|c| match c {
            Control::Button(b) => Some(b),
            _ => None,
        })
    }

    pub fn button(&self, key: &str) -> Option<&Button> {
        self.buttons().find(|b| b.key.eq_ignore_ascii_case(key))
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.controls.iter_mut().filter_map(|c| match c {
            Control::Entry(e) => Some(e),
            _ => None,
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.controls.iter().filter_map(|c| match c {
            Control::Entry(e) => Some(e),
            _ => None,
        })
    }
}

/// Named pages plus the one currently shown.
#[derive(Debug, Default)]
pub struct PageStore {
    pages: BTreeMap<String, Page>,
    current: Option<String>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a page. A registered page starts hidden unless it
    /// replaces the current one.
    pub fn register(&mut self, name: impl Into<String>, mut page: Page) {
        let name = name.into();
        page.visible = self.current.as_deref() == Some(name.as_str());
        self.pages.insert(name, page);
    }

    /// Shows `name` and hides every other page.
    ///
    /// An unknown name is an error and nothing changes.
    pub fn show(&mut self, name: &str) -> Result<(), UiError> {
        if !self.pages.contains_key(name) {
            return Err(UiError::UnknownPage(name.to_string()));
        }

        for (page_name, page) in self.pages.iter_mut() {
            page.visible = page_name == name;
        }
        self.current = Some(name.to_string());
        debug!("Showing page '{}'", name);

        assert_invariant(
            self.pages.values().filter(|p| p.visible).count() == 1,
            "Exactly one page is visible",
            Some("Pages"),
        );
        assert_invariant(
            self.current.as_ref().is_some_and(|c| self.pages.contains_key(c)),
            "Current page is registered",
            Some("Pages"),
        );
        Ok(())
    }

    pub fn current(&self) -> Option<&Page> {
        self.current.as_deref().and_then(|name| self.get(name))
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Page> {
        self.pages.get(name)
    }

    pub fn visible_names(&self) -> Vec<&str> {
        self.pages.values().filter(|p| p.is_visible()).map(|p| p.name.as_str()).collect()
    }
}

/// "Page 1": the Analysis grid. Each slot has a help button `iN` and a main
/// button `N` (1-based keys).
pub fn analysis_page(registry: &ActionRegistry) -> Page {
    let mut page = Page::new(ANALYSIS_PAGE, "Analysis");
    for entry in registry.entries() {
        let key = entry.id + 1;
        page = page
            .with(Control::button(format!("i{}", key), "i", Trigger::Help(entry.id)))
            .with(Control::button(key.to_string(), entry.label, Trigger::Action(entry.id)));
    }
    page.with(Control::label(FOOTER))
}

/// "Page 2": Project Management, nothing wired yet.
pub fn project_page() -> Page {
    let mut page = Page::new(PROJECT_PAGE, "Project Management");
    for key in 1..=10 {
        page = page.with(Control::button(key.to_string(), "Coming Soon", Trigger::ComingSoon));
    }
    page.with(Control::label(FOOTER))
}

/// The navigation bar. Only "Measurement" is wired.
pub fn nav_bar() -> Vec<Button> {
    vec![Button::new("m", "Measurement", Trigger::ShowPage(ANALYSIS_PAGE.to_string()))]
}

/// The transient Link Generator form.
pub fn link_generator_form() -> Page {
    Page::new("Link Generator", "Link Generator")
        .with(Control::entry("Link for duplication:"))
        .with(Control::entry("Server (india):"))
        .with(Control::entry("Server (europe):"))
        .with(Control::button("s", "Submit", Trigger::SubmitLinkForm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariant_ppt::contract_test;
    use proptest::prelude::*;

    fn store() -> PageStore {
        let registry = ActionRegistry::analysis();
        let mut store = PageStore::new();
        store.register(ANALYSIS_PAGE, analysis_page(&registry));
        store.register(PROJECT_PAGE, project_page());
        store
    }

    #[test]
    fn nothing_is_visible_before_the_first_show() {
        let store = store();
        assert!(store.visible_names().is_empty());
        assert!(store.current().is_none());
    }

    #[test]
    fn show_switches_exclusively() {
        let mut store = store();
        store.show(ANALYSIS_PAGE).unwrap();
        assert_eq!(store.visible_names(), vec![ANALYSIS_PAGE]);

        store.show(PROJECT_PAGE).unwrap();
        assert_eq!(store.visible_names(), vec![PROJECT_PAGE]);
        assert!(!store.get(ANALYSIS_PAGE).unwrap().is_visible());
        assert_eq!(store.current().unwrap().title, "Project Management");
    }

    #[test]
    fn unknown_page_errors_and_changes_nothing() {
        let mut store = store();
        store.show(PROJECT_PAGE).unwrap();

        let err = store.show("Page 9").unwrap_err();
        assert!(matches!(err, UiError::UnknownPage(ref n) if n == "Page 9"));
        assert_eq!(store.visible_names(), vec![PROJECT_PAGE]);
        assert_eq!(store.current_name(), Some(PROJECT_PAGE));
    }

    #[test]
    fn replacing_the_current_page_keeps_it_visible() {
        let mut store = store();
        store.show(PROJECT_PAGE).unwrap();
        store.register(PROJECT_PAGE, project_page());
        assert_eq!(store.visible_names(), vec![PROJECT_PAGE]);
    }

    #[test]
    fn analysis_grid_has_a_help_and_main_button_per_slot() {
        let registry = ActionRegistry::analysis();
        let page = analysis_page(&registry);
        assert_eq!(page.buttons().count(), 20);
        assert_eq!(page.button("1").unwrap().press(), Trigger::Action(0));
        assert_eq!(page.button("I10").unwrap().press(), Trigger::Help(9));
        assert_eq!(page.button("5").unwrap().text, "Link Generator");
        assert!(page.button("11").is_none());
    }

    #[test]
    fn project_page_is_all_coming_soon() {
        let page = project_page();
        assert!(page.buttons().all(|b| b.press() == Trigger::ComingSoon));
    }

    #[test]
    fn form_entries_are_editable() {
        let mut form = link_generator_form();
        for (i, entry) in form.entries_mut().enumerate() {
            entry.set(format!("value {}", i));
        }
        let values: Vec<&str> = form.entries().map(Entry::get).collect();
        assert_eq!(values, vec!["value 0", "value 1", "value 2"]);
        assert_eq!(form.button("s").unwrap().press(), Trigger::SubmitLinkForm);
    }

    #[test]
    fn show_checks_its_invariants() {
        let mut store = store();
        store.show(ANALYSIS_PAGE).unwrap();
        contract_test("page switch", &["Exactly one page is visible", "Current page is registered"]);
    }

    proptest! {
        #[test]
        fn any_sequence_of_shows_leaves_one_visible(names in prop::collection::vec(
            prop_oneof![Just(ANALYSIS_PAGE), Just(PROJECT_PAGE), Just("Page 3"), Just("")], 1..20
        )) {
            let mut store = store();
            store.show(ANALYSIS_PAGE).unwrap();
            for name in names {
                let before = store.current_name().map(str::to_string);
                match store.show(name) {
                    Ok(()) => prop_assert_eq!(store.current_name(), Some(name)),
                    Err(_) => prop_assert_eq!(store.current_name().map(str::to_string), before),
                }
                prop_assert_eq!(store.visible_names().len(), 1);
            }
        }
    }
}
