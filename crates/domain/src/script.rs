//! Script — a named set of command templates fired when a job ends.
//!
//! Scripts reach the system as loosely-typed configuration (JSON values
//! written by a settings backend or a front-end). [`Script::from_value`]
//! applies the schema and either produces a typed [`Script`] or the
//! [`ValidationError`] explaining why the entry must be dropped.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Longest accepted delay, one day.
pub const MAX_DELAY_SECS: u32 = 86_400;

/// A validated end-of-job script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
    pub commands: Vec<String>,
    /// Seconds to wait after the trigger before dispatching. `0` dispatches
    /// immediately.
    #[serde(default)]
    pub delay: u32,
    /// Disable the script once it has fired, and on every reset-mode load.
    #[serde(default)]
    pub auto_reset: bool,
    #[serde(default)]
    pub enabled: bool,
}

impl Script {
    /// Create a builder for constructing a [`Script`].
    #[must_use]
    pub fn builder() -> ScriptBuilder {
        ScriptBuilder::default()
    }

    /// Validate one raw configuration entry.
    ///
    /// Names and commands are trimmed; non-string and blank commands are
    /// skipped. When `reset` is set, auto-reset scripts always come back
    /// disabled regardless of their stored flag.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] that disqualifies the entry.
    pub fn from_value(raw: &Value, reset: bool) -> Result<Self, ValidationError> {
        let map = raw.as_object().ok_or(ValidationError::NotAMapping)?;

        let name = map
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::InvalidName)?;

        let commands: Vec<String> = map
            .get("commands")
            .and_then(Value::as_array)
            .ok_or(ValidationError::InvalidCommands)?
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|command| !command.is_empty())
            .map(str::to_owned)
            .collect();

        if commands.is_empty() {
            return Err(ValidationError::NoCommands);
        }

        let delay = match map.get("delay") {
            None => 0,
            Some(value) => value
                .as_u64()
                .and_then(|secs| u32::try_from(secs).ok())
                .filter(|secs| *secs <= MAX_DELAY_SECS)
                .ok_or(ValidationError::InvalidDelay)?,
        };

        let auto_reset = map.get("auto_reset").is_some_and(is_truthy);
        let enabled = map.get("enabled").is_some_and(is_truthy);

        Ok(Self {
            name: name.to_owned(),
            commands,
            delay,
            auto_reset,
            enabled: enabled && !(reset && auto_reset),
        })
    }

    /// Check domain invariants on an already-typed script.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidName`] for a blank name,
    /// [`ValidationError::NoCommands`] when no non-blank command exists and
    /// [`ValidationError::InvalidDelay`] above [`MAX_DELAY_SECS`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidName);
        }
        if self.commands.iter().all(|command| command.trim().is_empty()) {
            return Err(ValidationError::NoCommands);
        }
        if self.delay > MAX_DELAY_SECS {
            return Err(ValidationError::InvalidDelay);
        }
        Ok(())
    }

    /// Whether firing this script goes through the timer queue.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        self.delay > 0
    }

    #[must_use]
    pub fn delay_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.delay))
    }
}

/// Flags stored by older front-ends are not always booleans: `null`, `0`,
/// `""`, `[]` and `{}` read as `false`, any other value as `true`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Step-by-step builder for [`Script`].
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    name: Option<String>,
    commands: Vec<String>,
    delay: u32,
    auto_reset: bool,
    enabled: bool,
}

impl ScriptBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    #[must_use]
    pub fn delay(mut self, secs: u32) -> Self {
        self.delay = secs;
        self
    }

    #[must_use]
    pub fn auto_reset(mut self, auto_reset: bool) -> Self {
        self.auto_reset = auto_reset;
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Consume the builder, normalize, validate, and return a [`Script`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name is blank, no command is left
    /// after trimming, or the delay is out of range.
    pub fn build(self) -> Result<Script, ValidationError> {
        let script = Script {
            name: self.name.unwrap_or_default().trim().to_owned(),
            commands: self
                .commands
                .iter()
                .map(|command| command.trim())
                .filter(|command| !command.is_empty())
                .map(str::to_owned)
                .collect(),
            delay: self.delay,
            auto_reset: self.auto_reset,
            enabled: self.enabled,
        };
        script.validate()?;
        Ok(script)
    }
}
