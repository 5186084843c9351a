//! Terminal front end for the demo wizard.

pub mod announcer;
pub mod terminal_guard;
pub mod wizard_view;

pub use announcer::Announcer;
pub use wizard_view::{ViewAction, WizardView};
