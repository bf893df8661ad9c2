//! Serde documents shared between the collections and the GraphQL
//! type layer. Field names are stored camelCase to match the wire
//! names the frontend already speaks.
use mongodb::bson::oid::ObjectId;

use crate::error::AppError;

pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use order::{Order, OrderItem, PaymentResult, ShippingAddress};
pub use product::Product;
pub use review::Review;
pub use user::User;

pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidId)
}

#[cfg(test)]
mod tests {
    use super::parse_object_id;

    #[test]
    fn test_valid_object_id() {
        let id = parse_object_id("65b1f77a9d2f4b0012345678").unwrap();
        assert_eq!(id.to_hex(), "65b1f77a9d2f4b0012345678");
    }

    #[test]
    fn test_invalid_object_id() {
        assert!(parse_object_id("not-an-id").is_err());
        assert!(parse_object_id("").is_err());
    }
}
