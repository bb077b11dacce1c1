use std::sync::Arc;

use crate::database::Gateway;
use crate::services::{AddressService, ContactService};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub contacts: ContactService,
    pub addresses: AddressService,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            contacts: ContactService::new(gateway.clone()),
            addresses: AddressService::new(gateway.clone()),
            gateway,
        }
    }
}
