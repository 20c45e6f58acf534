//! Content partitions.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::HprError;

/// Key of a content partition, sent as the `category` query parameter.
///
/// `CategoryKey::all()` stands for an unpartitioned collection and is never
/// sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryKey(Cow<'static, str>);

impl CategoryKey {
    const ALL: &'static str = "*";

    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// Key of an unpartitioned collection.
    pub const fn all() -> Self {
        Self::from_static(Self::ALL)
    }

    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `category` query parameter, if any.
    pub fn query_value(&self) -> Option<&str> {
        (!self.is_all()).then(|| self.as_str())
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for CategoryKey {
    fn from(key: &'static str) -> Self {
        Self::from_static(key)
    }
}

/// Project lifecycle partitions used by the gallery.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProjectStatus {
    #[default]
    Ongoing,
    Completed,
    Future,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [Self::Ongoing, Self::Completed, Self::Future];

    /// Backend category key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
            Self::Future => "Future",
        }
    }

    /// Tab label shown to visitors.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ongoing => "Ongoing Projects",
            Self::Completed => "Completed Projects",
            Self::Future => "Future Projects",
        }
    }
}

impl From<ProjectStatus> for CategoryKey {
    fn from(status: ProjectStatus) -> Self {
        CategoryKey::from_static(status.key())
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectStatus {
    type Err = HprError;

    /// Accepts the key or the label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| {
                status.key().eq_ignore_ascii_case(wanted)
                    || status.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| HprError::not_found("category", wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_no_query_value() {
        assert!(CategoryKey::all().is_all());
        assert_eq!(CategoryKey::all().query_value(), None);
        assert_eq!(CategoryKey::from("Future").query_value(), Some("Future"));
    }

    #[test]
    fn test_owned_and_static_keys_compare_equal() {
        assert_eq!(CategoryKey::new("Ongoing"), CategoryKey::from("Ongoing"));
        assert_eq!(CategoryKey::from(ProjectStatus::Ongoing), CategoryKey::new("Ongoing"));
    }

    #[test]
    fn test_parse_status_by_key_or_label() {
        assert_eq!("completed".parse::<ProjectStatus>().unwrap(), ProjectStatus::Completed);
        assert_eq!(
            "Future Projects".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::Future
        );
        assert!("Archived".parse::<ProjectStatus>().unwrap_err().is_not_found());
    }
}
