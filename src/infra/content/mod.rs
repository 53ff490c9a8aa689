// Content infrastructure - SQLite storage implementation

mod sqlite_content_store;

pub use sqlite_content_store::SqliteContentStore;
