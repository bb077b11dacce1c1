use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::gateway::Gateway;
use crate::database::manager::DatabaseError;
use crate::database::models::{Address, Contact, NewContact, User};
use crate::validation::address::AddressInput;

const CONTACT_COLUMNS: &str = "id, username, first_name, last_name, email, phone";
const ADDRESS_COLUMNS: &str = "id, contact_id, street, city, province, country, postal_code";

/// Gateway backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT username, name FROM users WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn count_contacts(&self, username: &str, contact_id: i32) -> Result<i64, DatabaseError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM contacts WHERE username = $1 AND id = $2")
                .bind(username)
                .bind(contact_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    async fn create_contact(&self, contact: NewContact) -> Result<Contact, DatabaseError> {
        let sql = format!(
            "INSERT INTO contacts (username, first_name, last_name, email, phone)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            CONTACT_COLUMNS
        );

        let created = sqlx::query_as::<_, Contact>(&sql)
            .bind(&contact.username)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_contact(&self, username: &str, contact_id: i32) -> Result<Option<Contact>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM contacts WHERE username = $1 AND id = $2",
            CONTACT_COLUMNS
        );

        let contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(username)
            .bind(contact_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contact)
    }

    async fn create_address(&self, contact_id: i32, address: AddressInput) -> Result<Address, DatabaseError> {
        let sql = format!(
            "INSERT INTO addresses (contact_id, street, city, province, country, postal_code)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            ADDRESS_COLUMNS
        );

        let created = sqlx::query_as::<_, Address>(&sql)
            .bind(contact_id)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.province)
            .bind(&address.country)
            .bind(&address.postal_code)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_address(&self, contact_id: i32, address_id: i32) -> Result<Option<Address>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM addresses WHERE contact_id = $1 AND id = $2",
            ADDRESS_COLUMNS
        );

        let address = sqlx::query_as::<_, Address>(&sql)
            .bind(contact_id)
            .bind(address_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(address)
    }

    async fn update_address(
        &self,
        contact_id: i32,
        address_id: i32,
        address: AddressInput,
    ) -> Result<Option<Address>, DatabaseError> {
        let sql = format!(
            "UPDATE addresses
             SET street = $1, city = $2, province = $3, country = $4, postal_code = $5
             WHERE contact_id = $6 AND id = $7
             RETURNING {}",
            ADDRESS_COLUMNS
        );

        let updated = sqlx::query_as::<_, Address>(&sql)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.province)
            .bind(&address.country)
            .bind(&address.postal_code)
            .bind(contact_id)
            .bind(address_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete_address(&self, contact_id: i32, address_id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM addresses WHERE contact_id = $1 AND id = $2")
            .bind(contact_id)
            .bind(address_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_addresses(&self, contact_id: i32) -> Result<Vec<Address>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM addresses WHERE contact_id = $1 ORDER BY id",
            ADDRESS_COLUMNS
        );

        let addresses = sqlx::query_as::<_, Address>(&sql)
            .bind(contact_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(addresses)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
