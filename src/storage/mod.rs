pub mod sqlite;
pub mod trait_def;

pub use sqlite::SqliteClickStore;
pub use trait_def::ClickStore;
