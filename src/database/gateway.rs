use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Address, Contact, NewContact, User};
use crate::validation::address::AddressInput;

/// Persistence operations used by the services.
///
/// Address lookups and mutations always take the owning `contact_id` so an address
/// can only be reached through a contact the caller has already been checked against.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Resolve the user owning an access token
    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, DatabaseError>;

    /// Number of contacts matching `(username, id)`
    async fn count_contacts(&self, username: &str, contact_id: i32) -> Result<i64, DatabaseError>;

    async fn create_contact(&self, contact: NewContact) -> Result<Contact, DatabaseError>;

    async fn find_contact(&self, username: &str, contact_id: i32) -> Result<Option<Contact>, DatabaseError>;

    async fn create_address(&self, contact_id: i32, address: AddressInput) -> Result<Address, DatabaseError>;

    async fn find_address(&self, contact_id: i32, address_id: i32) -> Result<Option<Address>, DatabaseError>;

    /// Overwrite every mutable field. Returns `None` when no row matched.
    async fn update_address(
        &self,
        contact_id: i32,
        address_id: i32,
        address: AddressInput,
    ) -> Result<Option<Address>, DatabaseError>;

    /// Returns `false` when no row matched
    async fn delete_address(&self, contact_id: i32, address_id: i32) -> Result<bool, DatabaseError>;

    async fn list_addresses(&self, contact_id: i32) -> Result<Vec<Address>, DatabaseError>;

    /// Cheap connectivity check for the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;
}
