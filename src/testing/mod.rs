use std::sync::Arc;

use crate::database::models::{Address, Contact, NewContact};
use crate::database::{Gateway, MemoryGateway};
use crate::middleware::AuthUser;
use crate::validation::address::AddressInput;

pub const TEST_USERNAME: &str = "test";
pub const TEST_TOKEN: &str = "test";
pub const OTHER_USERNAME: &str = "other";
pub const OTHER_TOKEN: &str = "other";

/// In-memory store seeded with two users, plus helpers to create fixture rows
pub struct TestContext {
    pub memory: MemoryGateway,
    pub user: AuthUser,
    pub other_user: AuthUser,
}

impl TestContext {
    pub async fn new() -> Self {
        let memory = MemoryGateway::new();
        memory.insert_user(TEST_USERNAME, "test", TEST_TOKEN).await;
        memory.insert_user(OTHER_USERNAME, "other", OTHER_TOKEN).await;

        Self {
            memory,
            user: AuthUser::new(TEST_USERNAME, "test"),
            other_user: AuthUser::new(OTHER_USERNAME, "other"),
        }
    }

    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::new(self.memory.clone())
    }

    /// Contact owned by the primary test user
    pub async fn create_test_contact(&self) -> Contact {
        self.memory
            .create_contact(NewContact {
                username: TEST_USERNAME.to_string(),
                first_name: "test".to_string(),
                last_name: Some("test".to_string()),
                email: Some("test@mail.com".to_string()),
                phone: Some("080900000".to_string()),
            })
            .await
            .expect("memory gateway never fails")
    }

    pub async fn create_test_address(&self, contact_id: i32) -> Address {
        self.memory
            .create_address(
                contact_id,
                AddressInput {
                    street: Some("jalan test".to_string()),
                    city: Some("kota test".to_string()),
                    province: Some("provinsi test".to_string()),
                    country: "indonesia".to_string(),
                    postal_code: "234234".to_string(),
                },
            )
            .await
            .expect("memory gateway never fails")
    }
}
