pub mod board;
pub mod card;
pub mod id;
pub mod list;
pub mod text;

pub use board::Board;
pub use card::Card;
pub use id::{BoardId, CardId, EntityId, IdGenerator, ListId, SequentialGenerator, UuidGenerator};
pub use list::List;
