//! Hand-written doubles for the host seams.

use crate::record::BaseValidate;
use crate::value::Attributes;
use parking_lot::RwLock;

/// A base validator that records every call and optionally rejects.
#[derive(Debug, Default)]
pub struct RecordingValidator {
    calls: RwLock<Vec<Attributes>>,
    reject_with: Option<String>,
}

impl RecordingValidator {
    /// Creates a validator that accepts everything.
    #[must_use]
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Creates a validator that rejects every write with `message`.
    #[must_use]
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            reject_with: Some(message.into()),
        }
    }

    /// Returns the merged attributes of every call, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Attributes> {
        self.calls.read().clone()
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }
}

impl BaseValidate for RecordingValidator {
    fn validate(&self, attributes: &Attributes) -> Option<String> {
        self.calls.write().push(attributes.clone());
        self.reject_with.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::attrs;
    use serde_json::json;

    #[test]
    fn test_recording_validator() {
        let accepting = RecordingValidator::accepting();
        assert_eq!(accepting.validate(&attrs(json!({"a": 1}))), None);
        assert_eq!(accepting.call_count(), 1);

        let rejecting = RecordingValidator::rejecting("locked");
        assert_eq!(rejecting.validate(&Attributes::new()), Some("locked".to_string()));
        assert_eq!(rejecting.calls(), vec![Attributes::new()]);
    }
}
