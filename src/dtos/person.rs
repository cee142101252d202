use serde::Deserialize;

// Request DTOs; responses reuse `models::person::Person` directly.

#[derive(Deserialize)]
pub struct CreatePersonRequest {
    pub display_name: String,
}

#[derive(Deserialize)]
pub struct RenamePersonRequest {
    pub display_name: String,
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}
