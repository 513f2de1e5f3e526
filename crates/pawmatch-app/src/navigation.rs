// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-page navigation state machine.
//!
//! The [`Navigator`] holds the current [`Page`] and the selected pet. Every
//! transition is checked against a fixed table; a rejected transition leaves
//! both unchanged. The selected pet is always set on `details` and `form`.
//! Entering `details` takes a pet, except when backing out of the form.

use pawmatch_core::types::Pet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use tracing::debug;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    Discovery,
    Messages,
    Details,
    Form,
    Profile,
    AiChat,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::Discovery,
        Page::Messages,
        Page::Details,
        Page::Form,
        Page::Profile,
        Page::AiChat,
    ];

    /// Pages reachable from the bottom tab bar.
    pub fn is_tab(self) -> bool {
        matches!(
            self,
            Page::Home | Page::Discovery | Page::Messages | Page::Profile
        )
    }

    /// Pages that show the selected pet.
    pub fn requires_pet(self) -> bool {
        matches!(self, Page::Details | Page::Form)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("page `{0}` requires a selected pet")]
    MissingPet(Page),

    #[error("cannot navigate from `{from}` to `{to}`")]
    IllegalTransition { from: Page, to: Page },
}

/// Whether the transition table lists `from -> to`.
pub fn is_allowed(from: Page, to: Page) -> bool {
    match (from, to) {
        (_, Page::AiChat) => true,
        (Page::AiChat, Page::Home) => true,
        (Page::AiChat, Page::Details) => true,
        (from, Page::Details) if from.is_tab() => true,
        (Page::Details, Page::Form) => true,
        (Page::Details, Page::Home) => true,
        (Page::Form, Page::Profile) => true,
        (Page::Form, Page::Details) => true,
        (from, to) => from.is_tab() && to.is_tab(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    page: Page,
    selected: Option<Pet>,
}

impl Navigator {
    /// Starts on the home page with no pet selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn selected_pet(&self) -> Option<&Pet> {
        self.selected.as_ref()
    }

    /// Moves to `to`, keeping the current selection.
    ///
    /// `details` is rejected here unless coming back from the form; use
    /// [`Navigator::select_pet`] to open it.
    pub fn go(&mut self, to: Page) -> Result<Page, NavigationError> {
        self.transition(to, None)
    }

    /// Selects a pet and opens its details.
    pub fn select_pet(&mut self, pet: Pet) -> Result<Page, NavigationError> {
        self.transition(Page::Details, Some(pet))
    }

    /// Opens the application form for the selected pet.
    pub fn start_application(&mut self) -> Result<Page, NavigationError> {
        self.transition(Page::Form, None)
    }

    /// Leaves the form once an application is submitted.
    pub fn complete_application(&mut self) -> Result<Page, NavigationError> {
        self.transition(Page::Profile, None)
    }

    pub fn open_ai_chat(&mut self) -> Result<Page, NavigationError> {
        self.transition(Page::AiChat, None)
    }

    /// Back button: details and ai-chat return home, form returns to details.
    pub fn back(&mut self) -> Result<Page, NavigationError> {
        let to = match self.page {
            Page::Form => Page::Details,
            Page::Details | Page::AiChat => Page::Home,
            from => return Err(NavigationError::IllegalTransition { from, to: from }),
        };
        self.transition(to, None)
    }

    /// Tab bar press. Only tab pages are accepted as targets.
    pub fn switch_tab(&mut self, tab: Page) -> Result<Page, NavigationError> {
        if !tab.is_tab() || !self.page.is_tab() {
            return Err(NavigationError::IllegalTransition {
                from: self.page,
                to: tab,
            });
        }
        self.transition(tab, None)
    }

    fn transition(&mut self, to: Page, pet: Option<Pet>) -> Result<Page, NavigationError> {
        let from = self.page;
        let reuses_selection = to == Page::Details && from == Page::Form;
        if to == Page::Details && pet.is_none() && !reuses_selection {
            return Err(NavigationError::MissingPet(to));
        }
        if to.requires_pet() && pet.is_none() && self.selected.is_none() {
            return Err(NavigationError::MissingPet(to));
        }
        if !is_allowed(from, to) {
            return Err(NavigationError::IllegalTransition { from, to });
        }
        if let Some(pet) = pet {
            self.selected = Some(pet);
        }
        self.page = to;
        debug!(%from, %to, pet = self.selected.as_ref().map(|p| p.id.as_str()), "navigated");
        Ok(to)
    }
}
