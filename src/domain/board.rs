use crate::domain::id::BoardId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A kanban board
///
/// The board's list order lives in the order index, not here, so reordering
/// lists never rewrites this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub background: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(id: BoardId, name: String, background: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            background,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the name
    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Sets the background key
    pub fn set_background(&mut self, background: String) {
        self.background = background;
        self.updated_at = Utc::now();
    }
}
