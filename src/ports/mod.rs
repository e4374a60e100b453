pub mod library_store;
pub mod member_directory;

pub use library_store::{LibraryStore, StoreError};
pub use member_directory::MemberDirectory;
