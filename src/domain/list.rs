use crate::domain::id::{BoardId, ListId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A list of cards within a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub name: String,
    /// Owning board; a lookup edge, never an ownership edge
    pub board_id: BoardId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    pub fn new(id: ListId, board_id: BoardId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            board_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}
