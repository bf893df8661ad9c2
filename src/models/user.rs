use async_graphql::SimpleObject;
use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Account document. The password hash and refresh token version never
/// leave the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[graphql(skip)]
    pub password: String,
    #[serde(default)]
    #[graphql(skip)]
    pub refresh_token_version: i32,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    pub fn new(name: String, email: String, hashed_password: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            name,
            email,
            password: hashed_password,
            refresh_token_version: 0,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }
}
