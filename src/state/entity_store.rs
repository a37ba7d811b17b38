//! Normalized storage of board, list and card records keyed by ID.
//!
//! The store performs no cross-record validation and never looks at order
//! sequences; keeping the records consistent with the order index is the
//! engine's job.

use crate::{
    domain::{Board, BoardId, Card, CardId, EntityId, List, ListId},
    error::Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A record kind held by the [`EntityStore`]
pub trait Entity: Sized + 'static {
    type Id: EntityId;

    fn id(&self) -> Self::Id;

    fn table(store: &EntityStore) -> &HashMap<Self::Id, Self>;

    fn table_mut(store: &mut EntityStore) -> &mut HashMap<Self::Id, Self>;
}

impl Entity for Board {
    type Id = BoardId;

    fn id(&self) -> BoardId {
        self.id
    }

    fn table(store: &EntityStore) -> &HashMap<BoardId, Self> {
        &store.boards
    }

    fn table_mut(store: &mut EntityStore) -> &mut HashMap<BoardId, Self> {
        &mut store.boards
    }
}

impl Entity for List {
    type Id = ListId;

    fn id(&self) -> ListId {
        self.id
    }

    fn table(store: &EntityStore) -> &HashMap<ListId, Self> {
        &store.lists
    }

    fn table_mut(store: &mut EntityStore) -> &mut HashMap<ListId, Self> {
        &mut store.lists
    }
}

impl Entity for Card {
    type Id = CardId;

    fn id(&self) -> CardId {
        self.id
    }

    fn table(store: &EntityStore) -> &HashMap<CardId, Self> {
        &store.cards
    }

    fn table_mut(store: &mut EntityStore) -> &mut HashMap<CardId, Self> {
        &mut store.cards
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    boards: HashMap<BoardId, Board>,
    lists: HashMap<ListId, List>,
    cards: HashMap<CardId, Card>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<E: Entity>(&self, id: &E::Id) -> Result<&E> {
        E::table(self).get(id).ok_or_else(|| id.not_found())
    }

    pub fn get_mut<E: Entity>(&mut self, id: &E::Id) -> Result<&mut E> {
        E::table_mut(self)
            .get_mut(id)
            .ok_or_else(|| id.not_found())
    }

    /// Inserts or replaces a record, returning the one it replaced
    pub fn put<E: Entity>(&mut self, record: E) -> Option<E> {
        E::table_mut(self).insert(record.id(), record)
    }

    pub fn remove<E: Entity>(&mut self, id: &E::Id) -> Result<E> {
        E::table_mut(self)
            .remove(id)
            .ok_or_else(|| id.not_found())
    }

    pub fn contains<E: Entity>(&self, id: &E::Id) -> bool {
        E::table(self).contains_key(id)
    }

    /// Whether a live record of any kind carries `uuid`
    pub fn holds_uuid(&self, uuid: &Uuid) -> bool {
        self.boards.contains_key(&BoardId::from_uuid(*uuid))
            || self.lists.contains_key(&ListId::from_uuid(*uuid))
            || self.cards.contains_key(&CardId::from_uuid(*uuid))
    }

    pub fn len<E: Entity>(&self) -> usize {
        E::table(self).len()
    }

    pub fn iter<E: Entity>(&self) -> impl Iterator<Item = &E> {
        E::table(self).values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrellisError;

    fn list_id(n: u128) -> ListId {
        ListId::from_uuid(Uuid::from_u128(n))
    }

    fn card(n: u128, list: u128) -> Card {
        Card::new(
            CardId::from_uuid(Uuid::from_u128(n)),
            list_id(list),
            format!("card {}", n),
        )
    }

    #[test]
    fn test_put_and_get() {
        let mut store = EntityStore::new();
        let c = card(1, 10);
        assert!(store.put(c.clone()).is_none());

        assert_eq!(store.get::<Card>(&c.id).unwrap(), &c);
        assert!(store.contains::<Card>(&c.id));
        assert_eq!(store.len::<Card>(), 1);
        assert_eq!(store.len::<List>(), 0);
    }

    #[test]
    fn test_put_replaces_existing() {
        let mut store = EntityStore::new();
        let mut c = card(1, 10);
        store.put(c.clone());

        c.set_text("edited".into());
        let previous = store.put(c.clone()).unwrap();

        assert_eq!(previous.text, "card 1");
        assert_eq!(store.get::<Card>(&c.id).unwrap().text, "edited");
        assert_eq!(store.len::<Card>(), 1);
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let mut store = EntityStore::new();
        let id = CardId::from_uuid(Uuid::from_u128(99));

        assert!(matches!(
            store.get::<Card>(&id),
            Err(TrellisError::CardNotFound(_))
        ));
        assert!(matches!(
            store.remove::<List>(&list_id(99)),
            Err(TrellisError::ListNotFound(_))
        ));
    }

    #[test]
    fn test_remove() {
        let mut store = EntityStore::new();
        let c = card(1, 10);
        store.put(c.clone());

        let removed = store.remove::<Card>(&c.id).unwrap();
        assert_eq!(removed.id, c.id);
        assert!(!store.contains::<Card>(&c.id));
    }

    #[test]
    fn test_get_mut() {
        let mut store = EntityStore::new();
        let c = card(1, 10);
        store.put(c.clone());

        store.get_mut::<Card>(&c.id).unwrap().relocate(list_id(11));
        assert_eq!(store.get::<Card>(&c.id).unwrap().list_id, list_id(11));
    }

    #[test]
    fn test_holds_uuid_ignores_kind() {
        let mut store = EntityStore::new();
        store.put(card(1, 10));

        assert!(store.holds_uuid(&Uuid::from_u128(1)));
        assert!(!store.holds_uuid(&Uuid::from_u128(10)));

        store.remove::<Card>(&CardId::from_uuid(Uuid::from_u128(1))).unwrap();
        assert!(!store.holds_uuid(&Uuid::from_u128(1)));
    }
}
