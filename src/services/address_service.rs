use serde_json::Value;
use std::sync::Arc;

use crate::database::models::AddressResponse;
use crate::database::Gateway;
use crate::middleware::AuthUser;
use crate::services::contact_service::CONTACT_NOT_FOUND;
use crate::services::ServiceError;
use crate::validation::address::{AddressInput, UpdateAddressRequest, CREATE_ADDRESS, UPDATE_ADDRESS};
use crate::validation::{validate_as, validate_id};

pub const ADDRESS_NOT_FOUND: &str = "address is not found";

/// Address operations nested under a contact.
///
/// Every operation starts with [`AddressService::check_contact_must_exist`], and every
/// address query after that is filtered by the verified contact id. An address of
/// another user's contact is therefore indistinguishable from a missing one.
#[derive(Clone)]
pub struct AddressService {
    gateway: Arc<dyn Gateway>,
}

impl AddressService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Validate `contact_id` and make sure it names exactly one contact of `user`
    pub async fn check_contact_must_exist(&self, user: &AuthUser, contact_id: &str) -> Result<i32, ServiceError> {
        let contact_id = validate_id("contactId", contact_id)?;

        let total = self.gateway.count_contacts(&user.username, contact_id).await?;
        if total != 1 {
            tracing::warn!(
                "Contact {} not found for user '{}'",
                contact_id,
                user.username
            );
            return Err(ServiceError::not_found(CONTACT_NOT_FOUND));
        }

        Ok(contact_id)
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        contact_id: &str,
        request: &Value,
    ) -> Result<AddressResponse, ServiceError> {
        let contact_id = self.check_contact_must_exist(user, contact_id).await?;
        let address: AddressInput = validate_as(&CREATE_ADDRESS, request)?;

        let created = self.gateway.create_address(contact_id, address).await?;
        tracing::debug!("Created address {} for contact {}", created.id, contact_id);
        Ok(created.into())
    }

    pub async fn get(
        &self,
        user: &AuthUser,
        contact_id: &str,
        address_id: &str,
    ) -> Result<AddressResponse, ServiceError> {
        let contact_id = self.check_contact_must_exist(user, contact_id).await?;
        let address_id = validate_id("addressId", address_id)?;

        let address = self
            .gateway
            .find_address(contact_id, address_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ADDRESS_NOT_FOUND))?;

        Ok(address.into())
    }

    /// Replace all mutable fields of the address named by `request.id`.
    /// Optional fields missing from the request are cleared.
    pub async fn update(
        &self,
        user: &AuthUser,
        contact_id: &str,
        request: &Value,
    ) -> Result<AddressResponse, ServiceError> {
        let contact_id = self.check_contact_must_exist(user, contact_id).await?;
        let request: UpdateAddressRequest = validate_as(&UPDATE_ADDRESS, request)?;

        if self.gateway.find_address(contact_id, request.id).await?.is_none() {
            return Err(ServiceError::not_found(ADDRESS_NOT_FOUND));
        }

        // the row may have gone away since the lookup; the update is filtered the same way
        let updated = self
            .gateway
            .update_address(contact_id, request.id, request.fields)
            .await?
            .ok_or_else(|| ServiceError::not_found(ADDRESS_NOT_FOUND))?;

        tracing::debug!("Updated address {} for contact {}", updated.id, contact_id);
        Ok(updated.into())
    }

    pub async fn remove(
        &self,
        user: &AuthUser,
        contact_id: &str,
        address_id: &str,
    ) -> Result<&'static str, ServiceError> {
        let contact_id = self.check_contact_must_exist(user, contact_id).await?;
        let address_id = validate_id("addressId", address_id)?;

        if self.gateway.find_address(contact_id, address_id).await?.is_none() {
            return Err(ServiceError::not_found(ADDRESS_NOT_FOUND));
        }

        if !self.gateway.delete_address(contact_id, address_id).await? {
            return Err(ServiceError::not_found(ADDRESS_NOT_FOUND));
        }

        tracing::debug!("Removed address {} from contact {}", address_id, contact_id);
        Ok("OK")
    }

    pub async fn list(&self, user: &AuthUser, contact_id: &str) -> Result<Vec<AddressResponse>, ServiceError> {
        let contact_id = self.check_contact_must_exist(user, contact_id).await?;

        let addresses = self.gateway.list_addresses(contact_id).await?;
        Ok(addresses.into_iter().map(AddressResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;
    use serde_json::json;

    fn create_payload() -> Value {
        json!({
            "street": "jalan test",
            "city": "kota test",
            "province": "provinsi test",
            "country": "indonesia",
            "postal_code": "45879"
        })
    }

    fn update_payload(id: i32) -> Value {
        json!({
            "id": id,
            "street": "jalan test update",
            "city": "kota test update",
            "province": "provinsi test update",
            "country": "indonesia update",
            "postal_code": "4587902"
        })
    }

    #[tokio::test]
    async fn create_echoes_fields_with_generated_id() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());
        let contact = ctx.create_test_contact().await;

        let address = service
            .create(&ctx.user, &contact.id.to_string(), &create_payload())
            .await
            .unwrap();

        assert!(address.id > 0);
        assert_eq!(address.street.as_deref(), Some("jalan test"));
        assert_eq!(address.city.as_deref(), Some("kota test"));
        assert_eq!(address.province.as_deref(), Some("provinsi test"));
        assert_eq!(address.country, "indonesia");
        assert_eq!(address.postal_code, "45879");
    }

    #[tokio::test]
    async fn create_rejects_empty_required_fields_without_persisting() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());
        let contact = ctx.create_test_contact().await;

        let err = service
            .create(
                &ctx.user,
                &contact.id.to_string(),
                &json!({"street": "jalan test", "country": "", "postal_code": ""}),
            )
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(ctx.memory.address_count().await, 0);
    }

    #[tokio::test]
    async fn every_operation_fails_for_foreign_or_missing_contact() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());
        let contact = ctx.create_test_contact().await;
        let address = ctx.create_test_address(contact.id).await;
        let id = contact.id.to_string();
        let missing = (contact.id + 1).to_string();
        let address_id = address.id.to_string();

        for (user, contact_id) in [(&ctx.other_user, &id), (&ctx.user, &missing)] {
            let results = [
                service.create(user, contact_id, &create_payload()).await.map(|_| ()),
                service.get(user, contact_id, &address_id).await.map(|_| ()),
                service.update(user, contact_id, &update_payload(address.id)).await.map(|_| ()),
                service.remove(user, contact_id, &address_id).await.map(|_| ()),
                service.list(user, contact_id).await.map(|_| ()),
            ];
            for result in results {
                let err = result.unwrap_err();
                assert!(err.is_not_found());
                assert_eq!(err.to_string(), CONTACT_NOT_FOUND);
            }
        }

        // nothing was created or changed
        assert_eq!(ctx.memory.address_count().await, 1);
        let unchanged = service.get(&ctx.user, &id, &address_id).await.unwrap();
        assert_eq!(unchanged.postal_code, "234234");
    }

    #[tokio::test]
    async fn contact_check_runs_before_payload_validation() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());

        let err = service
            .create(&ctx.user, "99", &json!({"country": ""}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn address_of_another_contact_is_not_found() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());
        let first = ctx.create_test_contact().await;
        let second = ctx.create_test_contact().await;
        let address = ctx.create_test_address(first.id).await;
        let second_id = second.id.to_string();
        let address_id = address.id.to_string();

        let err = service.get(&ctx.user, &second_id, &address_id).await.unwrap_err();
        assert_eq!(err.to_string(), ADDRESS_NOT_FOUND);

        let err = service
            .update(&ctx.user, &second_id, &update_payload(address.id))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), ADDRESS_NOT_FOUND);

        let err = service.remove(&ctx.user, &second_id, &address_id).await.unwrap_err();
        assert_eq!(err.to_string(), ADDRESS_NOT_FOUND);

        assert_eq!(ctx.memory.address_count().await, 1);
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_is_idempotent() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());
        let contact = ctx.create_test_contact().await;
        let address = ctx.create_test_address(contact.id).await;
        let id = contact.id.to_string();

        let first = service.update(&ctx.user, &id, &update_payload(address.id)).await.unwrap();
        let second = service.update(&ctx.user, &id, &update_payload(address.id)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.id, address.id);
        assert_eq!(first.postal_code, "4587902");
        assert_eq!(first.country, "indonesia update");
    }

    #[tokio::test]
    async fn update_clears_missing_optional_fields() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());
        let contact = ctx.create_test_contact().await;
        let address = ctx.create_test_address(contact.id).await;

        let updated = service
            .update(
                &ctx.user,
                &contact.id.to_string(),
                &json!({"id": address.id, "country": "indonesia", "postal_code": "1"}),
            )
            .await
            .unwrap();

        assert_eq!(updated.street, None);
        assert_eq!(updated.city, None);
        assert_eq!(updated.province, None);
    }

    #[tokio::test]
    async fn update_requires_target_id() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());
        let contact = ctx.create_test_contact().await;

        let err = service
            .update(
                &ctx.user,
                &contact.id.to_string(),
                &json!({"country": "indonesia", "postal_code": "1"}),
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn remove_then_get_is_not_found() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());
        let contact = ctx.create_test_contact().await;
        let address = ctx.create_test_address(contact.id).await;
        let id = contact.id.to_string();
        let address_id = address.id.to_string();

        assert_eq!(service.remove(&ctx.user, &id, &address_id).await.unwrap(), "OK");

        let err = service.get(&ctx.user, &id, &address_id).await.unwrap_err();
        assert_eq!(err.to_string(), ADDRESS_NOT_FOUND);
        let err = service.remove(&ctx.user, &id, &address_id).await.unwrap_err();
        assert_eq!(err.to_string(), ADDRESS_NOT_FOUND);
    }

    #[tokio::test]
    async fn list_returns_addresses_in_id_order() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());
        let contact = ctx.create_test_contact().await;
        let other = ctx.create_test_contact().await;
        let a = ctx.create_test_address(contact.id).await;
        ctx.create_test_address(other.id).await;
        let b = ctx.create_test_address(contact.id).await;

        let listed = service.list(&ctx.user, &contact.id.to_string()).await.unwrap();
        let ids: Vec<i32> = listed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn invalid_ids_are_validation_errors() {
        let ctx = TestContext::new().await;
        let service = AddressService::new(ctx.gateway());
        let contact = ctx.create_test_contact().await;

        let err = service.get(&ctx.user, "0", "1").await.unwrap_err();
        assert!(err.is_validation());

        let err = service
            .get(&ctx.user, &contact.id.to_string(), "abc")
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
