//! Access token lifecycle for the client-credentials grant

use crate::models::AccessTokenRecord;
use crate::store::{Store, StoreBackend, StoreError};
use log::debug;
use rand::Rng;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during token operations
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Token not found or expired")]
    NotFound,
    #[error("Token generation failed: {0}")]
    Generation(String),
}

/// Issues and verifies bearer access tokens against the record store.
/// Issuance is append-only; prior tokens for the same client stay valid
/// until their own expiry.
#[derive(Clone)]
pub struct TokenManager {
    store: Arc<Store>,
    token_ttl: u64,
}

impl TokenManager {
    pub fn new(store: Arc<Store>, token_ttl: u64) -> Self {
        Self { store, token_ttl }
    }

    /// Mint and persist a new access token for a client. The token is only
    /// returned once the record is saved; a persistence failure aborts the
    /// grant.
    pub async fn issue(
        &self,
        client_id: &str,
        scope: Option<String>,
    ) -> Result<AccessTokenRecord, TokenError> {
        let token = generate_secure_token()?;
        let now = unix_now()?;

        let record = AccessTokenRecord {
            token,
            client_id: client_id.to_string(),
            user_id: None, // No user associated with client credentials
            scope,
            expires_at: now + self.token_ttl,
            issued_at: now,
        };

        self.store.insert_token(&record).await?;

        debug!(
            "Issued access token for client '{}', expires in {}s",
            client_id, self.token_ttl
        );
        Ok(record)
    }

    /// Validate a presented token value. A token is valid strictly while
    /// now < expires_at; unknown and expired tokens are indistinguishable
    /// to the caller.
    pub async fn verify(&self, token: &str) -> Result<AccessTokenRecord, TokenError> {
        let record = self
            .store
            .get_token(token)
            .await?
            .ok_or(TokenError::NotFound)?;

        if unix_now()? >= record.expires_at {
            return Err(TokenError::NotFound);
        }

        debug!("Verified access token for client '{}'", record.client_id);
        Ok(record)
    }

    pub fn token_ttl(&self) -> u64 {
        self.token_ttl
    }
}

/// Generate a cryptographically random 256-bit token, hex-encoded
fn generate_secure_token() -> Result<String, TokenError> {
    let mut rng = rand::thread_rng();
    let token_bytes: [u8; 32] = rng.gen();
    let token: String = token_bytes.iter().map(|b| format!("{b:02x}")).collect();

    if token.is_empty() {
        return Err(TokenError::Generation("Generated empty token".to_string()));
    }
    Ok(token)
}

fn unix_now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| TokenError::Generation(format!("System time error: {e}")))
}
