//! The single state container: entity records plus their order indexes.

use crate::{
    domain::{Board, BoardId, Card, CardId, List, ListId},
    error::{Result, TrellisError},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub mod entity_store;
pub mod order_index;

pub use entity_store::{Entity, EntityStore};
pub use order_index::OrderIndex;

/// Complete board/list/card state
///
/// Mutated only through [`crate::Kanban`]; every other holder gets a shared
/// borrow and therefore always sees a fully applied snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KanbanState {
    pub(crate) store: EntityStore,
    /// Boards in creation order
    pub(crate) board_order: Vec<BoardId>,
    pub(crate) list_orders: OrderIndex<BoardId, ListId>,
    pub(crate) card_orders: OrderIndex<ListId, CardId>,
    /// Every UUID ever handed out, deleted records included
    #[serde(default)]
    pub(crate) issued_ids: HashSet<Uuid>,
}

impl KanbanState {
    /// An empty state with no boards
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn list_orders(&self) -> &OrderIndex<BoardId, ListId> {
        &self.list_orders
    }

    pub fn card_orders(&self) -> &OrderIndex<ListId, CardId> {
        &self.card_orders
    }

    /// Whether `uuid` was ever issued, or is carried by a live record of any
    /// kind
    pub fn is_issued(&self, uuid: &Uuid) -> bool {
        self.issued_ids.contains(uuid) || self.store.holds_uuid(uuid)
    }

    /// Checks referential and positional consistency of the whole state
    ///
    /// Every ordered ID must resolve to exactly one record, appear once, and
    /// agree with that record's back-reference; every record must be ordered
    /// somewhere. No UUID may be shared by records of different kinds.
    pub fn verify_integrity(&self) -> Result<()> {
        let mut live = HashSet::new();
        let uuids = self
            .store
            .iter::<Board>()
            .map(|b| *b.id.as_uuid())
            .chain(self.store.iter::<List>().map(|l| *l.id.as_uuid()))
            .chain(self.store.iter::<Card>().map(|c| *c.id.as_uuid()));
        for uuid in uuids {
            if !live.insert(uuid) {
                return Err(violation(format!("{} is used by two records", uuid)));
            }
        }

        let mut seen_boards = HashSet::new();
        for board_id in &self.board_order {
            if !seen_boards.insert(*board_id) {
                return Err(violation(format!("board {} listed twice", board_id)));
            }
            self.store.get::<Board>(board_id)?;
            if !self.list_orders.contains_parent(board_id) {
                return Err(violation(format!("board {} has no list order", board_id)));
            }
        }
        if seen_boards.len() != self.store.len::<Board>() {
            return Err(violation("board records missing from the board order"));
        }

        let mut seen_lists = HashSet::new();
        for (board_id, list_ids) in self.list_orders.iter() {
            if !seen_boards.contains(board_id) {
                return Err(violation(format!("list order for unknown board {}", board_id)));
            }
            for list_id in list_ids {
                if !seen_lists.insert(*list_id) {
                    return Err(violation(format!("list {} ordered twice", list_id)));
                }
                let list = self.store.get::<List>(list_id)?;
                if list.board_id != *board_id {
                    return Err(violation(format!(
                        "list {} points at board {} but is ordered in {}",
                        list_id, list.board_id, board_id
                    )));
                }
                if !self.card_orders.contains_parent(list_id) {
                    return Err(violation(format!("list {} has no card order", list_id)));
                }
            }
        }
        if seen_lists.len() != self.store.len::<List>() {
            return Err(violation("list records missing from every list order"));
        }

        let mut seen_cards = HashSet::new();
        for (list_id, card_ids) in self.card_orders.iter() {
            if !seen_lists.contains(list_id) {
                return Err(violation(format!("card order for unknown list {}", list_id)));
            }
            for card_id in card_ids {
                if !seen_cards.insert(*card_id) {
                    return Err(violation(format!("card {} ordered twice", card_id)));
                }
                let card = self.store.get::<Card>(card_id)?;
                if card.list_id != *list_id {
                    return Err(violation(format!(
                        "card {} points at list {} but is ordered in {}",
                        card_id, card.list_id, list_id
                    )));
                }
            }
        }
        if seen_cards.len() != self.store.len::<Card>() {
            return Err(violation("card records missing from every card order"));
        }

        Ok(())
    }
}

fn violation(message: impl Into<String>) -> TrellisError {
    TrellisError::Integrity(message.into())
}
