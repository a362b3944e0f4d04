use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Ed25519 public key (PEM) of the external auth collaborator; the
    /// core only verifies tokens, it never issues them.
    pub jwt_public_key: String,
    pub webhook_url: String,
    pub webhook_token: String,
    /// Policy knob for the open question of whether a private session may
    /// be scheduled over a block. Off by default.
    pub allow_private_over_block: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            webhook_url: env::var("WEBHOOK_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/events".to_string()),
            webhook_token: env::var("WEBHOOK_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            allow_private_over_block: env::var("ALLOW_PRIVATE_OVER_BLOCK")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
