//! The mutation engine: the only writer of [`KanbanState`].
//!
//! Every command validates all of its preconditions before its first write,
//! so a rejected command leaves the state exactly as it found it. Blank or
//! over-long text is not an error at this boundary: the command is skipped
//! and reported as [`Outcome::Unchanged`].

use crate::{
    config::TrellisConfig,
    domain::{
        text::normalize_text, Board, BoardId, Card, CardId, EntityId, IdGenerator, List, ListId,
        UuidGenerator,
    },
    error::{Result, TrellisError},
    state::KanbanState,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

const MAX_ID_ATTEMPTS: usize = 64;

/// Result of a command that was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    /// The state changed
    Applied(T),
    /// The command was a no-op
    Unchanged,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// The applied value, if any
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Unchanged => None,
        }
    }
}

/// Kanban boards with their lists and cards
pub struct Kanban {
    state: KanbanState,
    config: TrellisConfig,
    ids: Box<dyn IdGenerator>,
}

impl Default for Kanban {
    fn default() -> Self {
        Self::new()
    }
}

impl Kanban {
    /// An empty kanban with default configuration and random IDs
    pub fn new() -> Self {
        Self::with_config(TrellisConfig::default())
    }

    /// An empty kanban using `config`
    pub fn with_config(config: TrellisConfig) -> Self {
        Self {
            state: KanbanState::new(),
            config,
            ids: Box::new(UuidGenerator),
        }
    }

    /// Restores a previously saved state after checking its integrity
    pub fn from_state(state: KanbanState, config: TrellisConfig) -> Result<Self> {
        if let Err(err) = state.verify_integrity() {
            warn!(%err, "refusing inconsistent kanban state");
            return Err(err);
        }
        Ok(Self {
            state,
            config,
            ids: Box::new(UuidGenerator),
        })
    }

    /// Replaces the identifier generator
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &KanbanState {
        &self.state
    }

    /// The configuration commands are validated against
    pub fn config(&self) -> &TrellisConfig {
        &self.config
    }

    /// Gives up the engine, keeping the state for saving
    pub fn into_state(self) -> KanbanState {
        self.state
    }

    /// Creates a board with no lists
    pub fn create_board(&mut self, name: &str) -> Result<Outcome<BoardId>> {
        let Some(name) = self.accept_text("name", name) else {
            return Ok(Outcome::Unchanged);
        };

        let id = self.fresh_id(BoardId::from_uuid)?;
        let board = Board::new(id, name, self.config.default_background.clone());

        self.state.list_orders.register(id);
        self.state.board_order.push(id);
        self.state.store.put(board);

        info!(board = %id, "created board");
        Ok(Outcome::Applied(id))
    }

    /// Appends a new list to a board
    pub fn create_list(&mut self, board_id: BoardId, name: &str) -> Result<Outcome<ListId>> {
        self.state.store.get::<Board>(&board_id)?;
        let Some(name) = self.accept_text("name", name) else {
            return Ok(Outcome::Unchanged);
        };

        let id = self.fresh_id(ListId::from_uuid)?;
        let end = self.state.list_orders.get_order(&board_id)?.len();
        self.state.list_orders.insert_at(&board_id, id, end)?;
        self.state.card_orders.register(id);
        self.state.store.put(List::new(id, board_id, name));

        debug!(board = %board_id, list = %id, "created list");
        Ok(Outcome::Applied(id))
    }

    /// Appends a new card to a list
    pub fn create_card(&mut self, list_id: ListId, text: &str) -> Result<Outcome<CardId>> {
        self.state.store.get::<List>(&list_id)?;
        let Some(text) = self.accept_text("text", text) else {
            return Ok(Outcome::Unchanged);
        };

        let id = self.fresh_id(CardId::from_uuid)?;
        let end = self.state.card_orders.get_order(&list_id)?.len();
        self.state.card_orders.insert_at(&list_id, id, end)?;
        self.state.store.put(Card::new(id, list_id, text));

        debug!(list = %list_id, card = %id, "created card");
        Ok(Outcome::Applied(id))
    }

    /// Renames a board; blank or unchanged names are no-ops
    pub fn rename_board(&mut self, board_id: BoardId, name: &str) -> Result<Outcome> {
        let current = &self.state.store.get::<Board>(&board_id)?.name;
        let Some(name) = self.accept_text("name", name) else {
            return Ok(Outcome::Unchanged);
        };
        if *current == name {
            return Ok(Outcome::Unchanged);
        }

        self.state.store.get_mut::<Board>(&board_id)?.set_name(name);
        debug!(board = %board_id, "renamed board");
        Ok(Outcome::Applied(()))
    }

    /// Renames a list; blank or unchanged names are no-ops
    pub fn rename_list(&mut self, list_id: ListId, name: &str) -> Result<Outcome> {
        let current = &self.state.store.get::<List>(&list_id)?.name;
        let Some(name) = self.accept_text("name", name) else {
            return Ok(Outcome::Unchanged);
        };
        if *current == name {
            return Ok(Outcome::Unchanged);
        }

        self.state.store.get_mut::<List>(&list_id)?.set_name(name);
        debug!(list = %list_id, "renamed list");
        Ok(Outcome::Applied(()))
    }

    /// Replaces a card's text
    pub fn edit_card(&mut self, card_id: CardId, text: &str) -> Result<Outcome> {
        let current = &self.state.store.get::<Card>(&card_id)?.text;
        let Some(text) = self.accept_text("text", text) else {
            return Ok(Outcome::Unchanged);
        };
        if *current == text {
            return Ok(Outcome::Unchanged);
        }

        self.state.store.get_mut::<Card>(&card_id)?.set_text(text);
        debug!(card = %card_id, "edited card");
        Ok(Outcome::Applied(()))
    }

    /// Switches a board to another background key
    pub fn set_board_background(
        &mut self,
        board_id: BoardId,
        background: &str,
    ) -> Result<Outcome> {
        let current = &self.state.store.get::<Board>(&board_id)?.background;
        let Some(background) = self.accept_text("background", background) else {
            return Ok(Outcome::Unchanged);
        };
        if *current == background {
            return Ok(Outcome::Unchanged);
        }

        self.state
            .store
            .get_mut::<Board>(&board_id)?
            .set_background(background);
        debug!(board = %board_id, "changed board background");
        Ok(Outcome::Applied(()))
    }

    /// Deletes a board together with all of its lists and their cards
    pub fn delete_board(&mut self, board_id: BoardId) -> Result<Outcome> {
        self.state.store.get::<Board>(&board_id)?;

        let list_ids = self.state.list_orders.remove_parent(&board_id)?;
        let mut removed_cards = 0;
        for list_id in &list_ids {
            removed_cards += self.discard_list(list_id)?;
        }
        self.state.store.remove::<Board>(&board_id)?;
        self.state.board_order.retain(|id| *id != board_id);

        info!(
            board = %board_id,
            lists = list_ids.len(),
            cards = removed_cards,
            "deleted board"
        );
        Ok(Outcome::Applied(()))
    }

    /// Deletes a list of `board_id` together with its cards
    pub fn delete_list(&mut self, board_id: BoardId, list_id: ListId) -> Result<Outcome> {
        self.state.store.get::<Board>(&board_id)?;
        self.state.store.get::<List>(&list_id)?;
        if self.state.list_orders.position(&board_id, &list_id)?.is_none() {
            return Err(not_in_order(&board_id, &list_id));
        }

        self.state.list_orders.remove_from(&board_id, &list_id)?;
        let removed_cards = self.discard_list(&list_id)?;

        debug!(board = %board_id, list = %list_id, cards = removed_cards, "deleted list");
        Ok(Outcome::Applied(()))
    }

    /// Deletes a single card of `list_id`
    pub fn delete_card(&mut self, list_id: ListId, card_id: CardId) -> Result<Outcome> {
        self.state.store.get::<List>(&list_id)?;
        self.state.store.get::<Card>(&card_id)?;
        if self.state.card_orders.position(&list_id, &card_id)?.is_none() {
            return Err(not_in_order(&list_id, &card_id));
        }

        self.state.card_orders.remove_from(&list_id, &card_id)?;
        self.state.store.remove::<Card>(&card_id)?;

        debug!(list = %list_id, card = %card_id, "deleted card");
        Ok(Outcome::Applied(()))
    }

    /// Reorders the lists of a board; indices clamp to the valid range
    ///
    /// A move that leaves the list where it was is [`Outcome::Unchanged`].
    pub fn move_list(
        &mut self,
        board_id: BoardId,
        from_index: usize,
        to_index: usize,
    ) -> Result<Outcome> {
        self.state.store.get::<Board>(&board_id)?;

        match self
            .state
            .list_orders
            .move_within(&board_id, from_index, to_index)?
        {
            Some(list_id) => {
                debug!(board = %board_id, list = %list_id, from_index, to_index, "moved list");
                Ok(Outcome::Applied(()))
            }
            None => Ok(Outcome::Unchanged),
        }
    }

    /// Moves a card within a list or into another list
    ///
    /// `to_index` refers to the destination sequence after the card has
    /// left its source position. Indices clamp to the valid range, and a move
    /// that lands the card back in its own slot is [`Outcome::Unchanged`].
    pub fn move_card(
        &mut self,
        from_list_id: ListId,
        to_list_id: ListId,
        from_index: usize,
        to_index: usize,
    ) -> Result<Outcome> {
        self.state.store.get::<List>(&from_list_id)?;
        self.state.store.get::<List>(&to_list_id)?;

        let source = self.state.card_orders.get_order(&from_list_id)?;
        let Some(last) = source.len().checked_sub(1) else {
            return Ok(Outcome::Unchanged);
        };
        let card_id = source[from_index.min(last)];
        self.state.store.get::<Card>(&card_id)?;

        let moved = self
            .state
            .card_orders
            .move_across(&from_list_id, &to_list_id, from_index, to_index)?;
        if moved.is_none() {
            return Ok(Outcome::Unchanged);
        }
        if from_list_id != to_list_id {
            self.state
                .store
                .get_mut::<Card>(&card_id)?
                .relocate(to_list_id);
        }

        debug!(
            card = %card_id,
            from_list = %from_list_id,
            to_list = %to_list_id,
            from_index,
            to_index,
            "moved card"
        );
        Ok(Outcome::Applied(()))
    }

    /// Removes a list's cards, card order and record; returns the card count
    ///
    /// The caller has already taken the list out of its board's order.
    fn discard_list(&mut self, list_id: &ListId) -> Result<usize> {
        let card_ids = self.state.card_orders.remove_parent(list_id)?;
        for card_id in &card_ids {
            self.state.store.remove::<Card>(card_id)?;
        }
        self.state.store.remove::<List>(list_id)?;
        Ok(card_ids.len())
    }

    fn accept_text(&self, field: &'static str, raw: &str) -> Option<String> {
        match normalize_text(field, raw, self.config.max_text_len) {
            Ok(text) => Some(text),
            Err(err) => {
                debug!(%err, "skipping command with invalid input");
                None
            }
        }
    }

    /// Draws a UUID never issued before by this state and records it
    fn fresh_id<I: EntityId>(&mut self, wrap: fn(Uuid) -> I) -> Result<I> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let uuid = self.ids.next_uuid();
            if !self.state.is_issued(&uuid) {
                self.state.issued_ids.insert(uuid);
                return Ok(wrap(uuid));
            }
            warn!(%uuid, "identifier generator returned an ID already issued");
        }
        Err(TrellisError::Integrity(format!(
            "no unused identifier after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }
}

fn not_in_order<P: EntityId, C: EntityId>(parent: &P, child: &C) -> TrellisError {
    TrellisError::ChildNotInOrder {
        parent: parent.to_string(),
        child: child.to_string(),
    }
}
