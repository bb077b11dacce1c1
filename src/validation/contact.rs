use serde::Deserialize;

use super::{FieldKind, FieldRule, Schema};

pub const CREATE_CONTACT: Schema = Schema::new(
    "contact",
    &[
        FieldRule::required("first_name", FieldKind::Text).max(100),
        FieldRule::optional("last_name", FieldKind::Text).max(100),
        FieldRule::optional("email", FieldKind::Email).max(200),
        FieldRule::optional("phone", FieldKind::Phone).max(20),
    ],
);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateContactRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}
