pub mod address_service;
pub mod contact_service;
pub mod error;

pub use address_service::AddressService;
pub use contact_service::ContactService;
pub use error::ServiceError;
