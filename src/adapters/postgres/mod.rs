pub mod library_store;
pub mod member_directory;

pub use library_store::PostgresLibraryStore;
pub use member_directory::PostgresMemberDirectory;
