// Content domain models - articles and their moderation state.
//
// These are pure domain types with no HTTP or SQL dependencies.
// The web layer deserializes requests into them and the stores persist them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Timestamp layout used by the `created_at` column and the JSON API.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where an article sits in the moderation workflow.
///
/// Every article starts as `Pending`. An administrator can move it to any
/// other state at any time; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Pending,
    Approved,
    Rejected,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Pending => "pending",
            ArticleStatus::Approved => "approved",
            ArticleStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ArticleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ArticleStatus::Pending),
            "approved" => Ok(ArticleStatus::Approved),
            "rejected" => Ok(ArticleStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Which articles a listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(ArticleStatus),
}

impl StatusFilter {
    /// Interpret the `status` query parameter.
    ///
    /// No value (or an empty one) means the public feed, which only shows
    /// approved articles. `"all"` disables the filter.
    pub fn parse(raw: Option<&str>) -> Result<Self, UnknownStatus> {
        match raw.map(str::trim) {
            None | Some("") => Ok(StatusFilter::Only(ArticleStatus::Approved)),
            Some("all") => Ok(StatusFilter::All),
            Some(other) => other.parse().map(StatusFilter::Only),
        }
    }

    #[cfg(test)]
    pub fn matches(&self, status: ArticleStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::Only(ArticleStatus::Approved)
    }
}

/// An article as returned to readers, joined with its category name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleView {
    pub id: i64,
    pub title: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub content: String,
    pub author_name: String,
    pub author_email: Option<String>,
    pub cover_url: Option<String>,
    pub status: ArticleStatus,
    #[serde(serialize_with = "serialize_flag")]
    pub is_highlight: bool,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
}

// The front-end compares `is_highlight` against 1, so keep it numeric on the wire.
fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

fn serialize_timestamp<S: Serializer>(
    ts: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

/// Raw submission fields as they arrive from the submission form.
///
/// Everything is optional here; `ContentService::submit` decides what is
/// actually required.
#[derive(Debug, Clone, Default)]
pub struct ArticleSubmission {
    pub title: Option<String>,
    pub category_id: Option<String>,
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

/// A validated article ready to be inserted. Status is always pending.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub title: String,
    pub category_id: i64,
    pub content: String,
    pub author_name: String,
    pub author_email: Option<String>,
    pub cover_url: Option<String>,
}

/// A partial edit applied by an administrator.
///
/// `is_highlight: Some(true)` is exclusive: the store must clear the flag on
/// every other article in the same transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleUpdate {
    pub status: Option<ArticleStatus>,
    pub is_highlight: Option<bool>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
}

impl ArticleUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.is_highlight.is_none()
            && self.title.is_none()
            && self.content.is_none()
            && self.category_id.is_none()
    }

    /// True when the update touches plain columns (anything but the highlight flag).
    pub fn has_field_changes(&self) -> bool {
        self.status.is_some()
            || self.title.is_some()
            || self.content.is_some()
            || self.category_id.is_some()
    }

    pub fn status(status: ArticleStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn highlight(on: bool) -> Self {
        Self {
            is_highlight: Some(on),
            ..Default::default()
        }
    }
}
