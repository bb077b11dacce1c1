use serde_json::Value;
use std::sync::Arc;

use crate::database::models::{ContactResponse, NewContact};
use crate::database::Gateway;
use crate::middleware::AuthUser;
use crate::services::ServiceError;
use crate::validation::contact::{CreateContactRequest, CREATE_CONTACT};
use crate::validation::{validate_as, validate_id};

pub const CONTACT_NOT_FOUND: &str = "contact is not found";

/// Contact operations for the authenticated user
#[derive(Clone)]
pub struct ContactService {
    gateway: Arc<dyn Gateway>,
}

impl ContactService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Create a contact owned by `user` and return the stored row, including its id
    pub async fn create(&self, user: &AuthUser, request: &Value) -> Result<ContactResponse, ServiceError> {
        let request: CreateContactRequest = validate_as(&CREATE_CONTACT, request)?;

        let contact = self
            .gateway
            .create_contact(NewContact {
                username: user.username.clone(),
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                phone: request.phone,
            })
            .await?;

        tracing::debug!("Created contact {} for user '{}'", contact.id, user.username);
        Ok(contact.into())
    }

    pub async fn get(&self, user: &AuthUser, contact_id: &str) -> Result<ContactResponse, ServiceError> {
        let contact_id = validate_id("contactId", contact_id)?;

        let contact = self
            .gateway
            .find_contact(&user.username, contact_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(CONTACT_NOT_FOUND))?;

        Ok(contact.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;
    use serde_json::json;

    #[tokio::test]
    async fn create_returns_generated_id_and_echoes_fields() {
        let ctx = TestContext::new().await;
        let service = ContactService::new(ctx.gateway());

        let contact = service
            .create(
                &ctx.user,
                &json!({
                    "first_name": "test",
                    "last_name": "test",
                    "email": "test@mail.com",
                    "phone": "085466223669"
                }),
            )
            .await
            .unwrap();

        assert!(contact.id > 0);
        assert_eq!(contact.first_name, "test");
        assert_eq!(contact.last_name.as_deref(), Some("test"));
        assert_eq!(contact.email.as_deref(), Some("test@mail.com"));
        assert_eq!(contact.phone.as_deref(), Some("085466223669"));
    }

    #[tokio::test]
    async fn create_rejects_invalid_payload_without_persisting() {
        let ctx = TestContext::new().await;
        let service = ContactService::new(ctx.gateway());

        let err = service
            .create(&ctx.user, &json!({"first_name": "", "email": "bad"}))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(ctx.memory.contact_count().await, 0);
    }

    #[tokio::test]
    async fn get_is_scoped_to_owner() {
        let ctx = TestContext::new().await;
        let service = ContactService::new(ctx.gateway());
        let contact = ctx.create_test_contact().await;

        let found = service.get(&ctx.user, &contact.id.to_string()).await.unwrap();
        assert_eq!(found.id, contact.id);

        let err = service
            .get(&ctx.other_user, &contact.id.to_string())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), CONTACT_NOT_FOUND);
    }

    #[tokio::test]
    async fn get_validates_the_id() {
        let ctx = TestContext::new().await;
        let service = ContactService::new(ctx.gateway());

        let err = service.get(&ctx.user, "abc").await.unwrap_err();
        assert!(err.is_validation());
    }
}
