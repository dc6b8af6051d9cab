//! Rewrite options.
//!
//! Options deserialize from a camelCase JSON object, e.g.
//!
//! ```json
//! { "sentinel": "ex", "callPosition": "callBranch", "nullGuard": "baseObject" }
//! ```
//!
//! Missing keys take their defaults.

use serde::{Deserialize, Serialize};

/// Default sentinel property name.
pub const DEFAULT_SENTINEL: &str = "ex";

/// How an access that is the callee of a call (`a.ex()`) is rewritten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallPositionMode {
    /// Rewrite the access itself with the member branch:
    /// `(exists(a) ? a : void 0)()`.
    #[default]
    MemberBranch,
    /// Replace the enclosing call with the call-position branch:
    /// `exists(a) && typeof a !== "function" ? a() : void 0`.
    CallBranch,
}

/// Operand of the `!== null` half of the existence guard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NullGuardOperand {
    /// `a !== null`
    #[default]
    BaseObject,
    /// `ex !== null`, comparing the sentinel name instead of the object.
    /// Kept for compatibility with output produced by older rewriters.
    PropertyName,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ExistentialOptions {
    /// Property name that triggers the rewrite.
    pub sentinel: String,
    pub call_position: CallPositionMode,
    pub null_guard: NullGuardOperand,
}

impl Default for ExistentialOptions {
    fn default() -> Self {
        ExistentialOptions {
            sentinel: DEFAULT_SENTINEL.to_string(),
            call_position: CallPositionMode::default(),
            null_guard: NullGuardOperand::default(),
        }
    }
}

impl ExistentialOptions {
    pub fn with_call_position(mut self, mode: CallPositionMode) -> Self {
        self.call_position = mode;
        self
    }

    pub fn with_null_guard(mut self, operand: NullGuardOperand) -> Self {
        self.null_guard = operand;
        self
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Whether `name` is the configured sentinel.
    #[inline]
    pub fn is_sentinel(&self, name: &str) -> bool {
        name == self.sentinel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExistentialOptions::default();
        assert_eq!(options.sentinel, "ex");
        assert_eq!(options.call_position, CallPositionMode::MemberBranch);
        assert_eq!(options.null_guard, NullGuardOperand::BaseObject);
        assert!(options.is_sentinel("ex"));
        assert!(!options.is_sentinel("exists"));
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let options: ExistentialOptions =
            serde_json::from_str(r#"{ "callPosition": "callBranch" }"#).unwrap();
        assert_eq!(options.call_position, CallPositionMode::CallBranch);
        assert_eq!(options.sentinel, "ex");

        let options: ExistentialOptions =
            serde_json::from_str(r#"{ "sentinel": "maybe", "nullGuard": "propertyName" }"#)
                .unwrap();
        assert_eq!(options.sentinel, "maybe");
        assert_eq!(options.null_guard, NullGuardOperand::PropertyName);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = serde_json::from_str::<ExistentialOptions>(r#"{ "sentinal": "ex" }"#);
        assert!(err.is_err());
    }
}
