//! Navigation between the result list and the detail view.
//!
//! The [`NavigationController`] owns the last search session and drives a
//! [`Presenter`]. User gestures come back in as [`Action`]s.

mod action;
mod catalog;
mod controller;
mod presenter;

pub use action::Action;
pub use catalog::RecordCatalog;
pub use controller::{NavigationController, SearchSession, View};
pub use presenter::{ListPage, Presenter};
