use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::gateway::Gateway;
use crate::database::manager::DatabaseError;
use crate::database::models::{Address, Contact, NewContact, User};
use crate::validation::address::AddressInput;

#[derive(Default)]
struct MemoryState {
    // token -> user
    users: HashMap<String, User>,
    contacts: BTreeMap<i32, Contact>,
    addresses: BTreeMap<i32, Address>,
    next_contact_id: i32,
    next_address_id: i32,
}

/// Gateway keeping everything in process memory.
///
/// Used by the test suite and by `serve --memory` for local runs without PostgreSQL.
/// Ids are assigned sequentially from 1, like a SERIAL column.
#[derive(Clone, Default)]
pub struct MemoryGateway {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user reachable through `token`
    pub async fn insert_user(&self, username: &str, name: &str, token: &str) {
        let mut state = self.state.write().await;
        state.users.insert(
            token.to_string(),
            User {
                username: username.to_string(),
                name: name.to_string(),
            },
        );
    }

    /// Remove a contact and, like the foreign key cascade, its addresses
    pub async fn delete_contact(&self, contact_id: i32) -> bool {
        let mut state = self.state.write().await;
        let removed = state.contacts.remove(&contact_id).is_some();
        state.addresses.retain(|_, a| a.contact_id != contact_id);
        removed
    }

    pub async fn contact_count(&self) -> usize {
        self.state.read().await.contacts.len()
    }

    pub async fn address_count(&self) -> usize {
        self.state.read().await.addresses.len()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.state.read().await.users.get(token).cloned())
    }

    async fn count_contacts(&self, username: &str, contact_id: i32) -> Result<i64, DatabaseError> {
        let state = self.state.read().await;
        let count = state
            .contacts
            .get(&contact_id)
            .filter(|c| c.username == username)
            .map_or(0, |_| 1);
        Ok(count)
    }

    async fn create_contact(&self, contact: NewContact) -> Result<Contact, DatabaseError> {
        let mut state = self.state.write().await;
        state.next_contact_id += 1;
        let created = Contact {
            id: state.next_contact_id,
            username: contact.username,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
        };
        state.contacts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_contact(&self, username: &str, contact_id: i32) -> Result<Option<Contact>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .contacts
            .get(&contact_id)
            .filter(|c| c.username == username)
            .cloned())
    }

    async fn create_address(&self, contact_id: i32, address: AddressInput) -> Result<Address, DatabaseError> {
        let mut state = self.state.write().await;
        state.next_address_id += 1;
        let created = Address {
            id: state.next_address_id,
            contact_id,
            street: address.street,
            city: address.city,
            province: address.province,
            country: address.country,
            postal_code: address.postal_code,
        };
        state.addresses.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_address(&self, contact_id: i32, address_id: i32) -> Result<Option<Address>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .addresses
            .get(&address_id)
            .filter(|a| a.contact_id == contact_id)
            .cloned())
    }

    async fn update_address(
        &self,
        contact_id: i32,
        address_id: i32,
        address: AddressInput,
    ) -> Result<Option<Address>, DatabaseError> {
        let mut state = self.state.write().await;
        let Some(existing) = state
            .addresses
            .get_mut(&address_id)
            .filter(|a| a.contact_id == contact_id)
        else {
            return Ok(None);
        };

        existing.street = address.street;
        existing.city = address.city;
        existing.province = address.province;
        existing.country = address.country;
        existing.postal_code = address.postal_code;
        Ok(Some(existing.clone()))
    }

    async fn delete_address(&self, contact_id: i32, address_id: i32) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let owned = state
            .addresses
            .get(&address_id)
            .is_some_and(|a| a.contact_id == contact_id);
        if owned {
            state.addresses.remove(&address_id);
        }
        Ok(owned)
    }

    async fn list_addresses(&self, contact_id: i32) -> Result<Vec<Address>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .addresses
            .values()
            .filter(|a| a.contact_id == contact_id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(postal_code: &str) -> AddressInput {
        AddressInput {
            street: Some("jalan test".to_string()),
            city: None,
            province: None,
            country: "indonesia".to_string(),
            postal_code: postal_code.to_string(),
        }
    }

    fn new_contact(username: &str) -> NewContact {
        NewContact {
            username: username.to_string(),
            first_name: "test".to_string(),
            last_name: None,
            email: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn contacts_are_scoped_by_username() {
        let gateway = MemoryGateway::new();
        let contact = gateway.create_contact(new_contact("test")).await.unwrap();

        assert_eq!(contact.id, 1);
        assert_eq!(gateway.count_contacts("test", contact.id).await.unwrap(), 1);
        assert_eq!(gateway.count_contacts("other", contact.id).await.unwrap(), 0);
        assert!(gateway.find_contact("other", contact.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn address_mutations_require_matching_contact() {
        let gateway = MemoryGateway::new();
        let address = gateway.create_address(1, input("45879")).await.unwrap();

        assert!(gateway.find_address(2, address.id).await.unwrap().is_none());
        assert!(gateway.update_address(2, address.id, input("1")).await.unwrap().is_none());
        assert!(!gateway.delete_address(2, address.id).await.unwrap());

        let updated = gateway.update_address(1, address.id, input("1")).await.unwrap().unwrap();
        assert_eq!(updated.postal_code, "1");
        assert!(gateway.delete_address(1, address.id).await.unwrap());
        assert_eq!(gateway.address_count().await, 0);
    }

    #[tokio::test]
    async fn deleting_a_contact_cascades_to_addresses() {
        let gateway = MemoryGateway::new();
        let contact = gateway.create_contact(new_contact("test")).await.unwrap();
        gateway.create_address(contact.id, input("1")).await.unwrap();
        gateway.create_address(contact.id, input("2")).await.unwrap();

        assert_eq!(gateway.list_addresses(contact.id).await.unwrap().len(), 2);
        assert!(gateway.delete_contact(contact.id).await);
        assert_eq!(gateway.address_count().await, 0);
    }

    #[tokio::test]
    async fn resolves_users_by_token() {
        let gateway = MemoryGateway::new();
        gateway.insert_user("test", "Test User", "secret").await;

        let user = gateway.find_user_by_token("secret").await.unwrap().unwrap();
        assert_eq!(user.username, "test");
        assert!(gateway.find_user_by_token("nope").await.unwrap().is_none());
    }
}
