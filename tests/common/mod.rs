#![allow(dead_code)]

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;

use contact_api::config::AppConfig;
use contact_api::database::models::{Address, Contact, NewContact};
use contact_api::database::{Gateway, MemoryGateway};
use contact_api::server;
use contact_api::state::AppState;
use contact_api::validation::address::AddressInput;

pub const TOKEN: &str = "test";
pub const OTHER_TOKEN: &str = "other";

/// A running server on a free port, backed by its own in-memory store
pub struct TestApp {
    pub base_url: String,
    pub memory: MemoryGateway,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;

        let memory = MemoryGateway::new();
        memory.insert_user("test", "test", TOKEN).await;
        memory.insert_user("other", "other", OTHER_TOKEN).await;

        let config = AppConfig::from_lookup(|_| None);
        let app = server::app(AppState::new(Arc::new(memory.clone())), &config);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            memory,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn addresses_url(&self, contact_id: i32) -> String {
        self.url(&format!("/api/contacts/{}/addresses", contact_id))
    }

    pub fn address_url(&self, contact_id: i32, address_id: i32) -> String {
        self.url(&format!("/api/contacts/{}/addresses/{}", contact_id, address_id))
    }

    pub async fn create_test_contact(&self) -> Result<Contact> {
        Ok(self
            .memory
            .create_contact(NewContact {
                username: "test".to_string(),
                first_name: "test".to_string(),
                last_name: Some("test".to_string()),
                email: Some("test@mail.com".to_string()),
                phone: Some("080900000".to_string()),
            })
            .await?)
    }

    pub async fn create_test_address(&self, contact_id: i32) -> Result<Address> {
        Ok(self
            .memory
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
            .await?)
    }
}
