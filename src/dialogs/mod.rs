//! Dialogs module
//!
//! The dialog stack engine and the dialogs the bot runs on it.

pub mod collect_info;
pub mod dialog_set;
pub mod greet_user;
pub mod prompts;
pub mod stack;

pub use dialog_set::{
    Dialog, DialogContext, DialogSet, DialogTurnStatus, StepContext, WaterfallDialog, WaterfallStep,
};
pub use prompts::{Prompt, PromptKind, PromptValidation};
pub use stack::{dialog_state, DialogId, DialogInstance, DialogStack, InstanceState, PromptOptions};
