//! User profile model

use serde::{Deserialize, Serialize};

use crate::state::{StatePropertyAccessor, StateScope, TurnContext};
use crate::utils::errors::Result;

/// User-scoped property holding the collected name
pub const USER_NAME_PROPERTY: &str = "user_name";

/// User-scoped property holding the collected age
pub const USER_AGE_PROPERTY: &str = "user_age";

/// Accessor for the user's name
pub const fn user_name() -> StatePropertyAccessor<String> {
    StatePropertyAccessor::new(StateScope::User, USER_NAME_PROPERTY)
}

/// Accessor for the user's age
///
/// Ages are unsigned; negative input is turned away by the age prompt
/// before anything is stored.
pub const fn user_age() -> StatePropertyAccessor<u32> {
    StatePropertyAccessor::new(StateScope::User, USER_AGE_PROPERTY)
}

/// What the bot knows about a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub age: Option<u32>,
}

impl UserProfile {
    /// Read the profile from the turn's user state
    pub fn load(turn: &TurnContext) -> Result<Self> {
        Ok(Self {
            name: user_name().get(turn)?,
            age: user_age().get(turn)?,
        })
    }

    /// Both name and age have been collected
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.age.is_some()
    }
}
