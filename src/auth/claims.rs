use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload used for authentication. Stateless: signature and expiry are
/// the only things checked on a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // user ID
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}
