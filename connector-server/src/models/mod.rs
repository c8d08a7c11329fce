use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of remote Templafy asset a template item points at. Determines
/// the sub-path of the remote generation endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Document,
    Presentation,
}

impl DocumentType {
    /// Path segment of the remote generate endpoint for this asset kind.
    /// Presentations route to `presentations`, everything else to `documents`.
    pub fn assets_segment(&self) -> &'static str {
        match self {
            Self::Presentation => "presentations",
            Self::Document => "documents",
        }
    }
}

/// A registered pointer to a remote document/presentation asset, not the
/// document content itself. Created by admin action, read-only afterwards.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    /// Store-assigned identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Description shown in the Templafy content picker
    #[serde(default)]
    pub description: String,
    /// Remote library/folder locator
    pub space_id: String,
    /// Remote document locator
    pub asset_id: String,
    /// Asset kind, routes the remote generation call
    pub document_type: DocumentType,
}

/// Template item as submitted to the admin API, before the store assigns
/// an identifier.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplateItem {
    /// Display name
    pub name: String,
    /// Description shown in the Templafy content picker
    #[serde(default)]
    pub description: String,
    /// Remote library/folder locator
    pub space_id: String,
    /// Remote document locator
    pub asset_id: String,
    /// Asset kind, routes the remote generation call
    pub document_type: DocumentType,
}

/// The authenticated party behind a bearer token, discriminated explicitly
/// rather than inferred from field presence.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Principal {
    /// A human end-user (unused by the client-credentials grant)
    User(i64),
    /// A service client authenticated via id/secret
    Client(String),
}

/// One issued bearer credential for the client-credentials grant.
/// Keyed by the token value; never updated, invalidated purely by expiry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccessTokenRecord {
    /// Opaque random token value, primary key
    pub token: String,
    /// Client that was issued the token
    pub client_id: String,
    /// Owning user, always absent for client-credentials grants
    pub user_id: Option<i64>,
    /// Granted scope (space-joined)
    pub scope: Option<String>,
    /// Expiry timestamp (unix seconds); valid strictly while now < expires_at
    pub expires_at: u64,
    /// Issuance timestamp (unix seconds)
    pub issued_at: u64,
}

impl AccessTokenRecord {
    /// Principal behind this token. The user/client distinction is made
    /// here and nowhere else.
    pub fn principal(&self) -> Principal {
        match self.user_id {
            Some(user_id) => Principal::User(user_id),
            None => Principal::Client(self.client_id.clone()),
        }
    }
}
