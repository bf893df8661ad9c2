use async_graphql::SimpleObject;
use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One review per user per product. `author_name` is denormalized so
/// listings do not fan out into the user collection.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub rating: f64,
    pub comment: String,
    pub author: ObjectId,
    pub author_name: String,
    pub product: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Review {
    pub fn new(
        rating: f64,
        comment: String,
        author: ObjectId,
        author_name: String,
        product: ObjectId,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            rating,
            comment,
            author,
            author_name,
            product,
            created_at: now,
            updated_at: now,
        }
    }
}
