pub mod storage;
pub mod store;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::SessionStore;

/// The signed-in admin, as returned by the login endpoint.
///
/// Any JSON object is accepted. `id` comes from the `id` field, falling back
/// to `_id`; every other field is kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct AdminIdentity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl From<Map<String, Value>> for AdminIdentity {
    fn from(mut fields: Map<String, Value>) -> Self {
        let id = fields
            .remove("id")
            .as_ref()
            .and_then(id_text)
            .or_else(|| fields.get("_id").and_then(id_text));
        let name = match fields.remove("name") {
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                fields.insert("name".to_owned(), other);
                None
            }
            None => None,
        };
        Self { id, name, extra: fields }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: SecretString,
    #[serde(default)]
    pub refresh_token: Option<SecretString>,
}

/// Body of a successful OTP verification.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub admin: AdminIdentity,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub admin: AdminIdentity,
}

impl From<LoginResponse> for Session {
    fn from(login: LoginResponse) -> Self {
        Self {
            access_token: login.tokens.access_token,
            refresh_token: login.tokens.refresh_token,
            admin: login.admin,
        }
    }
}
