use crate::error::TrellisError;
use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash, str::FromStr};
use uuid::Uuid;

/// Common behaviour of the typed record identifiers
pub trait EntityId: Copy + Eq + Hash + fmt::Display + fmt::Debug + 'static {
    /// The `NotFound` error reporting this ID as stale
    fn not_found(&self) -> TrellisError;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $not_found:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl EntityId for $name {
            fn not_found(&self) -> TrellisError {
                TrellisError::$not_found(self.to_string())
            }
        }

        impl FromStr for $name {
            type Err = TrellisError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| TrellisError::InvalidId(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a board
    BoardId,
    BoardNotFound
);
entity_id!(
    /// Unique identifier for a list
    ListId,
    ListNotFound
);
entity_id!(
    /// Unique identifier for a card
    CardId,
    CardNotFound
);

/// Source of fresh identifiers for new records
pub trait IdGenerator: Send + Sync {
    fn next_uuid(&mut self) -> Uuid;
}

/// Random v4 UUIDs; the default for live boards
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic, monotonically increasing UUIDs (1, 2, 3, ...)
///
/// Useful for reproducible fixtures. Never yields the same value twice for
/// the lifetime of the generator.
#[derive(Debug, Default, Clone)]
pub struct SequentialGenerator {
    counter: u128,
}

impl SequentialGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts numbering after `counter`
    pub fn starting_after(counter: u128) -> Self {
        Self { counter }
    }
}

impl IdGenerator for SequentialGenerator {
    fn next_uuid(&mut self) -> Uuid {
        self.counter += 1;
        Uuid::from_u128(self.counter)
    }
}
