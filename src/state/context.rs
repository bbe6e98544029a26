//! Turn context management
//!
//! A [`TurnContext`] carries everything a single turn needs: the inbound
//! activity, the outbound message queue and the user and conversation state
//! bags loaded for this activity's identities.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::Activity;
use crate::utils::errors::Result;

/// Which identity a piece of state is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateScope {
    User,
    Conversation,
}

impl StateScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateScope::User => "user",
            StateScope::Conversation => "conversation",
        }
    }
}

/// Named property values persisted as one storage document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateBag {
    #[serde(default)]
    properties: Map<String, Value>,
    /// When this bag was last written to storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    dirty: bool,
}

impl StateBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a property, deserialized into `T`
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.properties.get(name) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Set a property; only an actual change marks the bag dirty
    pub fn set<T: Serialize>(&mut self, name: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        if self.properties.get(name) != Some(&json_value) {
            self.properties.insert(name.to_string(), json_value);
            self.dirty = true;
        }
        Ok(())
    }

    /// Remove a property
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let removed = self.properties.remove(name);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Whether the bag changed since it was loaded
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Stamp and clear the dirty flag once the bag has been persisted
    pub(crate) fn mark_saved(&mut self) {
        self.updated_at = Some(Utc::now());
        self.dirty = false;
    }
}

/// Per-turn context passed explicitly to every handler and dialog step
#[derive(Debug)]
pub struct TurnContext {
    activity: Activity,
    responses: Vec<String>,
    state: HashMap<StateScope, StateBag>,
    started_at: DateTime<Utc>,
}

impl TurnContext {
    /// Create a context for an inbound activity with empty state bags
    pub fn new(activity: Activity) -> Self {
        Self {
            activity,
            responses: Vec::new(),
            state: HashMap::new(),
            started_at: Utc::now(),
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Queue an outbound message
    pub fn send_activity(&mut self, text: impl Into<String>) {
        self.responses.push(text.into());
    }

    /// Whether anything was sent during this turn
    pub fn responded(&self) -> bool {
        !self.responses.is_empty()
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn into_responses(self) -> Vec<String> {
        self.responses
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// State bag for `scope`; empty until loaded
    pub fn state(&self, scope: StateScope) -> Option<&StateBag> {
        self.state.get(&scope)
    }

    /// Mutable state bag for `scope`, created empty on first use
    pub fn state_mut(&mut self, scope: StateScope) -> &mut StateBag {
        self.state.entry(scope).or_default()
    }

    pub(crate) fn set_state(&mut self, scope: StateScope, bag: StateBag) {
        self.state.insert(scope, bag);
    }
}
