pub mod traits;
pub mod sqlite;

pub use traits::SeenStore;
pub use sqlite::{SqliteSeenRepository, SqliteStorage};
