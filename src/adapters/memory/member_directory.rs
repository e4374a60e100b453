use crate::domain::value_objects::MemberId;
use crate::ports::member_directory::{MemberDirectory as MemberDirectoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory implementation of MemberDirectory
///
/// Supports stateful testing by storing member IDs.
pub struct MemoryMemberDirectory {
    existing_members: Mutex<HashSet<MemberId>>,
}

impl MemoryMemberDirectory {
    pub fn new() -> Self {
        Self {
            existing_members: Mutex::new(HashSet::new()),
        }
    }

    /// Register a member for testing purposes
    pub fn add_member(&self, member_id: MemberId) {
        self.existing_members.lock().unwrap().insert(member_id);
    }
}

impl Default for MemoryMemberDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberDirectoryTrait for MemoryMemberDirectory {
    /// Check if member exists among the registered members
    async fn exists(&self, member_id: MemberId) -> Result<bool> {
        Ok(self.existing_members.lock().unwrap().contains(&member_id))
    }
}
