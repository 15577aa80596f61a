//! Script commands — requests issued by front-ends.

use serde_json::Value;

use crate::error::{BadRequestError, EndScriptsError, NotFoundError};

/// A command accepted by the script API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Cancel every queued (deferred) execution.
    CancelQueue,
    Enable { index: usize },
    Disable { index: usize },
}

impl ScriptCommand {
    /// Parse a request body of the form `{"command": "...", "index": n}`.
    ///
    /// # Errors
    ///
    /// Returns [`EndScriptsError::BadRequest`] when `command` is missing or
    /// `index` is not a non-negative integer, and
    /// [`EndScriptsError::NotFound`] for an unknown command name.
    pub fn from_request(body: &Value) -> Result<Self, EndScriptsError> {
        let command = body
            .get("command")
            .and_then(Value::as_str)
            .ok_or(BadRequestError::MissingCommand)?;

        match command {
            "cancel_queue" => Ok(Self::CancelQueue),
            "enable" => Ok(Self::Enable {
                index: parse_index(body)?,
            }),
            "disable" => Ok(Self::Disable {
                index: parse_index(body)?,
            }),
            other => Err(NotFoundError {
                kind: "command",
                name: other.to_owned(),
            }
            .into()),
        }
    }
}

fn parse_index(body: &Value) -> Result<usize, BadRequestError> {
    body.get("index")
        .and_then(Value::as_u64)
        .and_then(|index| usize::try_from(index).ok())
        .ok_or(BadRequestError::InvalidIndex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_parse_cancel_queue_without_index() {
        let command = ScriptCommand::from_request(&json!({"command": "cancel_queue"})).unwrap();
        assert_eq!(command, ScriptCommand::CancelQueue);
    }

    #[test]
    fn should_parse_enable_and_disable_with_index() {
        assert_eq!(
            ScriptCommand::from_request(&json!({"command": "enable", "index": 2})).unwrap(),
            ScriptCommand::Enable { index: 2 }
        );
        assert_eq!(
            ScriptCommand::from_request(&json!({"command": "disable", "index": 0})).unwrap(),
            ScriptCommand::Disable { index: 0 }
        );
    }

    #[test]
    fn should_reject_non_integer_index_as_bad_request() {
        for index in [json!("1"), json!(-1), json!(1.5), json!(null)] {
            let result = ScriptCommand::from_request(&json!({"command": "enable", "index": index}));
            assert!(matches!(
                result,
                Err(EndScriptsError::BadRequest(BadRequestError::InvalidIndex))
            ));
        }
    }

    #[test]
    fn should_reject_missing_index_as_bad_request() {
        let result = ScriptCommand::from_request(&json!({"command": "disable"}));
        assert!(matches!(
            result,
            Err(EndScriptsError::BadRequest(BadRequestError::InvalidIndex))
        ));
    }

    #[test]
    fn should_reject_missing_command_as_bad_request() {
        let result = ScriptCommand::from_request(&json!({"index": 1}));
        assert!(matches!(
            result,
            Err(EndScriptsError::BadRequest(BadRequestError::MissingCommand))
        ));
    }

    #[test]
    fn should_report_unknown_command_as_not_found() {
        let result = ScriptCommand::from_request(&json!({"command": "explode"}));
        assert!(matches!(
            result,
            Err(EndScriptsError::NotFound(NotFoundError { name, .. })) if name == "explode"
        ));
    }
}
