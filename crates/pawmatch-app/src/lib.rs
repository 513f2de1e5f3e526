// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side orchestration for PawMatch.
//!
//! Observable state hooks over the domain services, the single-page
//! navigation state machine, and the AI features that sit on top of the
//! catalog.

pub mod ai;
pub mod context;
pub mod hooks;
pub mod navigation;
pub mod resource;

pub use ai::{
    ChatEntry, ChatSession, ChatState, DiscoveryInsight, InsightState, SendOutcome, SharedGenerator,
    StoryBook, StoryState,
};
pub use context::AppContext;
pub use hooks::{
    ApplicationHook, ApplicationsHook, FavoritesHook, MessagesHook, PetHook, PetsHook,
};
pub use navigation::{NavigationError, Navigator, Page};
pub use resource::{MutationOutcome, Resource, ResourceCell};
