//! # Application Context
//!
//! Owns everything the launcher's handlers touch: the registry, the pages,
//! the resource locator and the system seam. `main` builds one and the event
//! loop passes it by reference to every handler; there is no global UI state.
//!
//! Handlers run synchronously on the caller's thread. A macro run blocks
//! until Excel returns.

use std::path::PathBuf;
use log::{debug, info};
use crate::excel;
use crate::locator::Locator;
use crate::pages::{self, Button, Page, PageStore, Trigger};
use crate::registry::{self, Action, ActionRegistry, Resource};
use crate::report::{self, UiError, attempt_silently};
use crate::system::SystemOps;
use crate::viewer;

pub const WINDOW_TITLE: &str = "GDM ToolBox V1.0";

/// What the frontend has to do after a press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Show this transient form and hand it back through
    /// [`AppContext::submit_link_form`].
    OpenForm(Page),
}

pub struct AppContext<'a, S: SystemOps + ?Sized> {
    pub system: &'a S,
    pub locator: Locator,
    pub registry: ActionRegistry,
    pub pages: PageStore,
    pub nav: Vec<Button>,
    pub excel_visible: bool,
    decorations: Vec<Resource>,
}

impl<'a, S: SystemOps + ?Sized> AppContext<'a, S> {
    /// Builds the pages, probes the optional decorations and shows the
    /// Analysis page.
    pub fn new(system: &'a S, locator: Locator, excel_visible: bool) -> Self {
        let registry = ActionRegistry::analysis();

        let mut store = PageStore::new();
        store.register(pages::ANALYSIS_PAGE, pages::analysis_page(&registry));
        store.register(pages::PROJECT_PAGE, pages::project_page());

        let decorations = registry::DECORATIONS
            .into_iter()
            .filter_map(|res| {
                let path = locator.resolve(res.name());
                attempt_silently(res.file_name(), || {
                    if system.path_exists(&path) { Ok(res) } else { Err(format!("{:?} is missing", path)) }
                })
            })
            .collect();

        let mut ctx = Self {
            system,
            locator,
            registry,
            pages: store,
            nav: pages::nav_bar(),
            excel_visible,
            decorations,
        };
        ctx.show_page(pages::ANALYSIS_PAGE);
        ctx
    }

    pub fn resolve(&self, res: Resource) -> PathBuf {
        self.locator.resolve(res.name())
    }

    pub fn has_decoration(&self, res: Resource) -> bool {
        self.decorations.contains(&res)
    }

    /// Shows a page. Unknown names are reported to the user.
    pub fn show_page(&mut self, name: &str) -> bool {
        match self.pages.show(name) {
            Ok(()) => true,
            Err(e) => report::report(self.system, e),
        }
    }

    /// Presses the button with `key`, looking in the nav bar first and then
    /// on the current page.
    pub fn press(&mut self, key: &str) -> Option<Outcome> {
        let trigger = self
            .nav
            .iter()
            .find(|b| b.key.eq_ignore_ascii_case(key))
            .or_else(|| self.pages.current().and_then(|p| p.button(key)))
            .map(Button::press)?;
        Some(self.trigger(trigger))
    }

    pub fn trigger(&mut self, trigger: Trigger) -> Outcome {
        match trigger {
            Trigger::Action(slot) => self.activate(slot),
            Trigger::Help(slot) => {
                self.activate_help(slot);
                Outcome::Done
            }
            Trigger::ShowPage(name) => {
                self.show_page(&name);
                Outcome::Done
            }
            Trigger::ComingSoon => {
                self.coming_soon();
                Outcome::Done
            }
            Trigger::SubmitLinkForm => {
                self.submit_link_form(&pages::link_generator_form());
                Outcome::Done
            }
        }
    }

    /// Main button of `slot`.
    pub fn activate(&self, slot: usize) -> Outcome {
        let Some(entry) = self.registry.entry(slot) else {
            report::report(self.system, UiError::UnknownSlot(slot + 1));
            return Outcome::Done;
        };
        info!("Activated slot {}: {:?}", slot + 1, entry.action);

        match &entry.action {
            Action::RunMacro { workbook, macro_name } => {
                excel::run_macro(self.system, &self.resolve(*workbook), macro_name, self.excel_visible);
            }
            Action::OpenWorkbook { workbook } => {
                excel::open_workbook_only(self.system, &self.resolve(*workbook), entry.label, self.excel_visible);
            }
            Action::LinkGenerator => return Outcome::OpenForm(pages::link_generator_form()),
            Action::ComingSoon => self.coming_soon(),
        }
        Outcome::Done
    }

    /// Help ("i") button of `slot`.
    pub fn activate_help(&self, slot: usize) -> bool {
        let path = self.resolve(self.registry.help_reference(slot));
        viewer::open_with_default_viewer(self.system, &path)
    }

    pub fn coming_soon(&self) {
        report::inform(self.system, "Coming Soon", "This feature is under development.");
    }

    /// Submit of the Link Generator form. The workbook round-trip behind it
    /// is not built yet, so this only tells the user.
    pub fn submit_link_form(&self, form: &Page) {
        let values: Vec<&str> = form.entries().map(|e| e.get()).collect();
        debug!("Link Generator submitted: {:?}", values);
        report::inform(self.system, "Information", "This feature is under development");
    }
}
