use crate::domain::id::{CardId, ListId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card holding free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub list_id: ListId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(id: CardId, list_id: ListId, text: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            list_id,
            text,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the text
    pub fn set_text(&mut self, text: String) {
        self.text = text;
        self.updated_at = Utc::now();
    }

    /// Re-points the back-reference after a cross-list move
    pub fn relocate(&mut self, list_id: ListId) {
        self.list_id = list_id;
        self.updated_at = Utc::now();
    }
}
