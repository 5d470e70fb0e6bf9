use serde::{Deserialize, Serialize};

/// Value of a tag that should appear at most once in a read-group line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum TagValue {
    /// Tag appeared exactly once
    Single(String),
    /// Tag appeared more than once in the same line
    Multiple,
    /// Tag did not appear
    #[default]
    Absent,
}

impl TagValue {
    /// Record another occurrence of the tag.
    ///
    /// A second occurrence makes the value ambiguous; it never picks one of
    /// the instances.
    #[must_use]
    pub fn push(self, value: &str) -> Self {
        match self {
            Self::Absent => Self::Single(value.to_string()),
            Self::Single(_) | Self::Multiple => Self::Multiple,
        }
    }

    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(v) => Some(v),
            Self::Multiple | Self::Absent => None,
        }
    }

    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple)
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Only two single values can be equal: an ambiguous or absent value is
/// never equal to anything, itself included.
impl PartialEq for TagValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(a), Self::Single(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq<str> for TagValue {
    fn eq(&self, other: &str) -> bool {
        self.as_single() == Some(other)
    }
}

impl std::fmt::Display for TagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(v) => write!(f, "{v}"),
            Self::Multiple => write!(f, "<MULTIPLE>"),
            Self::Absent => write!(f, "<ABSENT>"),
        }
    }
}

/// Barcode and sample of one `@RG` header line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadGroupRecord {
    /// Read-group ID, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Barcode derived from the PU field; never `Absent`
    pub barcode: TagValue,

    /// Sample from the SM field, verbatim; never `Absent`
    pub sample: TagValue,
}
