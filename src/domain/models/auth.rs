use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
    Admin,
}

/// Verified actor identity, decoded from the bearer token issued by the
/// external auth collaborator. Core operations receive this context and
/// never trust a caller-supplied tenant id that contradicts it.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub profile_id: String,
    pub role: Role,
    pub tenant_id: String,
}

impl AuthContext {
    pub fn can_manage(&self, tenant_id: &str) -> bool {
        self.role == Role::Admin || (self.role == Role::Teacher && self.tenant_id == tenant_id)
    }
}

/// JWT claims as issued by the auth collaborator.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub tenant_id: String,
    pub role: Role,
    pub aud: String,
    pub exp: i64,
}
