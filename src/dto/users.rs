use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct AddressInput {
    #[validate(length(min = 1, message = "is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "is required"))]
    pub city: String,
    pub state: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "is required"))]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct VendorProfileRequest {
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub store_name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub website: Option<String>,
}
