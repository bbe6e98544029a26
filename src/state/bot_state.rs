//! Scoped bot state and property accessors
//!
//! [`BotState`] loads and saves one [`StateBag`] per turn for either the
//! user or the conversation of the inbound activity. A
//! [`StatePropertyAccessor`] is a typed handle onto one named property of
//! that bag.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::Activity;
use crate::utils::errors::{BotError, Result};
use crate::utils::logging::log_state_saved;
use super::context::{StateBag, StateScope, TurnContext};
use super::storage::Storage;

/// Loads and saves the state bag of one scope
#[derive(Clone)]
pub struct BotState {
    scope: StateScope,
    storage: Arc<dyn Storage>,
}

impl BotState {
    pub fn new(scope: StateScope, storage: Arc<dyn Storage>) -> Self {
        Self { scope, storage }
    }

    /// State keyed by the sender of each activity
    pub fn user(storage: Arc<dyn Storage>) -> Self {
        Self::new(StateScope::User, storage)
    }

    /// State keyed by the conversation of each activity
    pub fn conversation(storage: Arc<dyn Storage>) -> Self {
        Self::new(StateScope::Conversation, storage)
    }

    pub fn scope(&self) -> StateScope {
        self.scope
    }

    /// Storage key for the bag this activity belongs to
    pub fn storage_key(&self, activity: &Activity) -> Result<String> {
        if activity.channel_id.is_empty() {
            return Err(BotError::InvalidInput("Activity has no channel id".to_string()));
        }

        match self.scope {
            StateScope::User => {
                if activity.from.id.is_empty() {
                    return Err(BotError::InvalidInput("Activity has no sender id".to_string()));
                }
                Ok(format!("{}/users/{}", activity.channel_id, activity.from.id))
            }
            StateScope::Conversation => {
                if activity.conversation.id.is_empty() {
                    return Err(BotError::InvalidInput("Activity has no conversation id".to_string()));
                }
                Ok(format!("{}/conversations/{}", activity.channel_id, activity.conversation.id))
            }
        }
    }

    /// Read this scope's bag from storage into the turn context
    pub async fn load(&self, turn: &mut TurnContext) -> Result<()> {
        let key = self.storage_key(turn.activity())?;
        let bag = match self.storage.read(&key).await? {
            Some(document) => serde_json::from_value::<StateBag>(document)?,
            None => StateBag::new(),
        };

        debug!(key = %key, scope = self.scope.as_str(), properties = bag.len(), "State loaded");
        turn.set_state(self.scope, bag);
        Ok(())
    }

    /// Write this scope's bag back to storage if it changed during the turn
    pub async fn save_changes(&self, turn: &mut TurnContext) -> Result<()> {
        let key = self.storage_key(turn.activity())?;
        let bag = turn.state_mut(self.scope);
        if !bag.is_dirty() {
            return Ok(());
        }

        bag.mark_saved();
        let document = serde_json::to_value(&*bag)?;
        let properties = bag.len();
        self.storage.write(&key, document).await?;
        log_state_saved(&key, properties);
        Ok(())
    }

    /// Remove this scope's document from storage and reset the turn's bag
    pub async fn clear(&self, turn: &mut TurnContext) -> Result<()> {
        let key = self.storage_key(turn.activity())?;
        self.storage.delete(&key).await?;
        turn.set_state(self.scope, StateBag::new());
        Ok(())
    }

    /// Typed handle onto a property of this scope
    pub fn create_property<T>(&self, name: &'static str) -> StatePropertyAccessor<T>
    where
        T: Serialize + DeserializeOwned,
    {
        StatePropertyAccessor::new(self.scope, name)
    }
}

impl std::fmt::Debug for BotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotState")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Typed get/set handle onto one property of a scoped state bag
pub struct StatePropertyAccessor<T> {
    scope: StateScope,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StatePropertyAccessor<T>
where
    T: Serialize + DeserializeOwned,
{
    pub const fn new(scope: StateScope, name: &'static str) -> Self {
        Self {
            scope,
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn scope(&self) -> StateScope {
        self.scope
    }

    /// Current value, `None` when unset
    pub fn get(&self, turn: &TurnContext) -> Result<Option<T>> {
        match turn.state(self.scope) {
            Some(bag) => bag.get(self.name),
            None => Ok(None),
        }
    }

    /// Current value, or `default` when unset
    pub fn get_or(&self, turn: &TurnContext, default: T) -> Result<T> {
        Ok(self.get(turn)?.unwrap_or(default))
    }

    pub fn set(&self, turn: &mut TurnContext, value: T) -> Result<()> {
        turn.state_mut(self.scope).set(self.name, value)
    }

    pub fn delete(&self, turn: &mut TurnContext) {
        turn.state_mut(self.scope).remove(self.name);
    }
}
