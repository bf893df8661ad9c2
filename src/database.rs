//! # MongoDB
//!
//! Document store for every entity. One collection per entity, plain
//! `Collection<T>` handles with serde models, no ODM layer in between.
//!
//! The driver connects lazily, so startup succeeds even when the
//! database is still coming up; index creation at boot is best-effort.
use mongodb::{Client, Database};
use tracing::info;

pub const USERS: &str = "users";
pub const PRODUCTS: &str = "products";
pub const REVIEWS: &str = "reviews";
pub const ORDERS: &str = "orders";

pub async fn init_mongo(mongo_uri: &str, database: &str) -> Database {
    let client = Client::with_uri_str(mongo_uri)
        .await
        .expect("MongoDB misconfigured!");

    info!("MongoDB client ready for {database}");

    client.database(database)
}
