use async_graphql::SimpleObject;
use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Catalog document. `rating` and `num_reviews` are denormalized
/// aggregates refreshed by the review workflow; do not write them
/// from anywhere else.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub created_by: ObjectId,
    pub name: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i32,
    pub price: f64,
    pub count_in_stock: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}
