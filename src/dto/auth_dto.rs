//! DTOs de autenticación

use serde::Deserialize;

// Request de login con la contraseña compartida
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}
