//! The host's own write-acceptance step.

use crate::value::Attributes;
use std::fmt;

/// Invariant check a record kind runs after the schema pipeline succeeds.
///
/// Receives the record's current attributes merged with the coerced
/// write. Returning `Some(message)` rejects the whole write.
#[cfg_attr(test, mockall::automock)]
pub trait BaseValidate: Send + Sync {
    /// Checks the merged attributes.
    fn validate(&self, attributes: &Attributes) -> Option<String>;
}

/// Adapts a closure into a [`BaseValidate`].
pub struct FnValidator<F>(F);

impl<F> FnValidator<F>
where
    F: Fn(&Attributes) -> Option<String> + Send + Sync,
{
    /// Wraps a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> BaseValidate for FnValidator<F>
where
    F: Fn(&Attributes) -> Option<String> + Send + Sync,
{
    fn validate(&self, attributes: &Attributes) -> Option<String> {
        (self.0)(attributes)
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnValidator")
    }
}

/// Base validator rejecting writes that leave any of `names` null or unset.
#[derive(Debug, Clone)]
pub struct RequiredFields {
    names: Vec<String>,
}

impl RequiredFields {
    /// Creates a check over the given attribute names.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl BaseValidate for RequiredFields {
    fn validate(&self, attributes: &Attributes) -> Option<String> {
        self.names
            .iter()
            .find(|name| attributes.get(name.as_str()).map_or(true, |v| v.is_nullish()))
            .map(|name| format!("Attribute \"{name}\" is required."))
    }
}
