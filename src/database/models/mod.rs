pub mod address;
pub mod contact;
pub mod user;

pub use address::{Address, AddressResponse};
pub use contact::{Contact, ContactResponse, NewContact};
pub use user::User;
