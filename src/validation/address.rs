use serde::Deserialize;

use super::{FieldKind, FieldRule, Schema};

pub const CREATE_ADDRESS: Schema = Schema::new(
    "address",
    &[
        FieldRule::optional("street", FieldKind::Text).max(255),
        FieldRule::optional("city", FieldKind::Text).max(100),
        FieldRule::optional("province", FieldKind::Text).max(100),
        FieldRule::required("country", FieldKind::Text).max(100),
        FieldRule::required("postal_code", FieldKind::Text).max(10),
    ],
);

pub const UPDATE_ADDRESS: Schema = Schema::new(
    "address",
    &[
        FieldRule::required("id", FieldKind::PositiveInt),
        FieldRule::optional("street", FieldKind::Text).max(255),
        FieldRule::optional("city", FieldKind::Text).max(100),
        FieldRule::optional("province", FieldKind::Text).max(100),
        FieldRule::required("country", FieldKind::Text).max(100),
        FieldRule::required("postal_code", FieldKind::Text).max(10),
    ],
);

/// Mutable address fields, as accepted on create and update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    pub country: String,
    pub postal_code: String,
}

/// Update payload: the target id plus the full replacement field set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateAddressRequest {
    pub id: i32,
    #[serde(flatten)]
    pub fields: AddressInput,
}
