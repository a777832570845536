use serde::{Deserialize, Serialize};

/// Display-only directory record. The core reads name/email to render
/// notification text; profile management lives elsewhere.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}
