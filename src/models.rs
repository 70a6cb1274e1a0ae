use serde::{Deserialize, Serialize};

/// Response type for the list_keys endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListKeysResponse {
    pub keys: Vec<String>,
}
