//! Script store — the validated, in-memory list of end scripts.

use serde_json::Value;

use endscripts_domain::error::{BadRequestError, ValidationError};
use endscripts_domain::script::Script;

/// Validate a raw configuration value into the list of usable scripts.
///
/// Never fails: a non-list value yields an empty list, and each rejected
/// entry is dropped with a warning naming its position and reason. With
/// `reset` set, auto-reset scripts come back disabled.
#[must_use]
pub fn validate(raw: &Value, reset: bool) -> Vec<Script> {
    let Some(entries) = raw.as_array() else {
        tracing::warn!(reason = %ValidationError::NotAList, "ignoring script configuration");
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| match Script::from_value(entry, reset) {
            Ok(script) => Some(script),
            Err(reason) => {
                tracing::warn!(position, %reason, "dropping invalid script");
                None
            }
        })
        .collect()
}

/// Owned list of validated scripts, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptStore {
    scripts: Vec<Script>,
}

impl ScriptStore {
    /// Build the store from raw configuration.
    #[must_use]
    pub fn load(raw: &Value, reset: bool) -> Self {
        Self {
            scripts: validate(raw, reset),
        }
    }

    #[must_use]
    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    pub(crate) fn scripts_mut(&mut self) -> &mut [Script] {
        &mut self.scripts
    }

    /// Rebuild the whole list from raw configuration, keeping stored
    /// `enabled` flags as they are.
    pub fn replace(&mut self, raw: &Value) -> &[Script] {
        self.scripts = validate(raw, false);
        &self.scripts
    }

    /// Toggle one script in place.
    ///
    /// # Errors
    ///
    /// Returns [`BadRequestError::IndexOutOfRange`] when no script sits at
    /// `index`; the list is left untouched.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<(), BadRequestError> {
        let len = self.scripts.len();
        let script = self
            .scripts
            .get_mut(index)
            .ok_or(BadRequestError::IndexOutOfRange { index, len })?;
        script.enabled = enabled;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}
