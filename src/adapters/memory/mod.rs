pub mod library_store;
pub mod member_directory;

pub use library_store::MemoryLibraryStore;
pub use member_directory::MemoryMemberDirectory;
