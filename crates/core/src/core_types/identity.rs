//! Identifier newtypes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted soil sample, assigned by the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(pub u64);

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Identifier of an authenticated user (the backend's user id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a backend user id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_id_honours_width() {
        assert_eq!(format!("{:>4}|", SampleId(1)), "   1|");
        assert_eq!(format!("{:<3}|", SampleId(42)), "42 |");
        assert_eq!(SampleId(7).to_string(), "7");
    }

    #[test]
    fn test_user_id_round_trips_text() {
        let id = UserId::new("field-officer-3");
        assert_eq!(id.as_str(), "field-officer-3");
        assert_eq!(id.to_string(), "field-officer-3");
    }
}
