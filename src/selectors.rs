//! Read-only views joining the order indexes with the entity store.
//!
//! Views borrow from the state, so they can never outlive or observe a
//! half-applied mutation.

use crate::{
    domain::{Board, BoardId, Card, CardId, List, ListId},
    error::Result,
    state::KanbanState,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView<'a> {
    pub id: BoardId,
    pub name: &'a str,
    pub background: &'a str,
    pub list_ids: &'a [ListId],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView<'a> {
    pub id: ListId,
    pub name: &'a str,
    pub board_id: BoardId,
    pub card_ids: &'a [CardId],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView<'a> {
    pub id: CardId,
    pub list_id: ListId,
    pub text: &'a str,
}

/// A board with its lists and their cards, in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardDetail<'a> {
    pub board: BoardView<'a>,
    pub lists: Vec<ListDetail<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListDetail<'a> {
    pub list: ListView<'a>,
    pub cards: Vec<CardView<'a>>,
}

/// Record counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub boards: usize,
    pub lists: usize,
    pub cards: usize,
}

impl KanbanState {
    pub fn get_board(&self, id: &BoardId) -> Result<BoardView<'_>> {
        let board = self.store.get::<Board>(id)?;
        Ok(BoardView {
            id: board.id,
            name: &board.name,
            background: &board.background,
            list_ids: self.list_orders.get_order(id)?,
        })
    }

    pub fn get_list(&self, id: &ListId) -> Result<ListView<'_>> {
        let list = self.store.get::<List>(id)?;
        Ok(ListView {
            id: list.id,
            name: &list.name,
            board_id: list.board_id,
            card_ids: self.card_orders.get_order(id)?,
        })
    }

    pub fn get_card(&self, id: &CardId) -> Result<CardView<'_>> {
        let card = self.store.get::<Card>(id)?;
        Ok(CardView {
            id: card.id,
            list_id: card.list_id,
            text: &card.text,
        })
    }

    /// All boards in creation order
    pub fn boards(&self) -> Result<Vec<BoardView<'_>>> {
        self.board_order.iter().map(|id| self.get_board(id)).collect()
    }

    pub fn board_detail(&self, id: &BoardId) -> Result<BoardDetail<'_>> {
        let board = self.get_board(id)?;
        let lists = board
            .list_ids
            .iter()
            .map(|list_id| {
                let list = self.get_list(list_id)?;
                let cards = list
                    .card_ids
                    .iter()
                    .map(|card_id| self.get_card(card_id))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ListDetail { list, cards })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BoardDetail { board, lists })
    }

    /// Total number of cards across every list of a board
    pub fn card_count(&self, id: &BoardId) -> Result<usize> {
        self.list_orders
            .get_order(id)?
            .iter()
            .map(|list_id| self.card_orders.get_order(list_id).map(<[CardId]>::len))
            .sum()
    }

    pub fn entity_counts(&self) -> EntityCounts {
        EntityCounts {
            boards: self.store.len::<Board>(),
            lists: self.store.len::<List>(),
            cards: self.store.len::<Card>(),
        }
    }
}
