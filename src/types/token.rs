use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims: the user's identity plus expiry, nothing else. Tokens are
/// never persisted; verification is signature + expiry alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub username: String,
    pub exp: i64,
}
