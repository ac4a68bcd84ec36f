//! Record data model for crudlist
//!
//! A record is the one entity the store manages: an ID plus three mutable
//! fields. The serde aliases accept the `todo`/`desc`/`done` field names
//! used by older todo-list exports. Looser seed shapes go through
//! [`crate::seed`], which validates before building records.

use serde::{Deserialize, Serialize};

/// A single CRUD entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier, assigned at creation and never changed
    pub id: u64,

    /// Short title
    #[serde(alias = "todo")]
    pub title: String,

    /// Longer description
    #[serde(alias = "desc")]
    pub detail: String,

    /// Done/selected flag
    #[serde(default, alias = "done")]
    pub flag: bool,
}

impl Record {
    /// Create a new record with the flag cleared
    pub fn new(id: u64, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            detail: detail.into(),
            flag: false,
        }
    }

    /// Copy of this record with the flag flipped
    pub fn toggled(&self) -> Self {
        Self {
            flag: !self.flag,
            ..self.clone()
        }
    }

    /// Copy of this record with every mutable field replaced
    pub fn with_fields(&self, title: &str, detail: &str, flag: bool) -> Self {
        Self {
            id: self.id,
            title: title.to_string(),
            detail: detail.to_string(),
            flag,
        }
    }

    /// Label for the flag, as shown in listings
    pub fn flag_label(&self) -> &'static str {
        if self.flag { "done" } else { "open" }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {} - {}",
            self.id,
            self.flag_label(),
            self.title,
            self.detail
        )
    }
}
