//! Review-aggregation workflow.
//!
//! Whenever a review is added, updated or deleted, the owning
//! product's `rating` and `numReviews` are recomputed from the review
//! collection and written back. The recomputation is read-modify-write
//! over current reviews, so the product document always reflects the
//! arithmetic mean of whatever reviews exist at that moment.
use mongodb::bson::{doc, oid::ObjectId};

use crate::{
    error::AppError,
    services::{ProductService, ReviewService},
};

#[derive(Clone)]
pub struct ProductReviewService {
    reviews: ReviewService,
    products: ProductService,
}

impl ProductReviewService {
    pub fn new(reviews: ReviewService, products: ProductService) -> Self {
        Self { reviews, products }
    }

    pub async fn rating_of_product(&self, product_id: ObjectId) -> Result<f64, AppError> {
        let ratings = self.reviews.ratings_for_product(product_id).await?;

        Ok(average_rating(&ratings))
    }

    /// Recomputes the product's rating average and review count.
    pub async fn refresh_product_stats(&self, product_id: ObjectId) -> Result<(), AppError> {
        let rating = self.rating_of_product(product_id).await?;
        let num_reviews = self.reviews.count_for_product(product_id).await? as i64;

        self.products
            .update(
                product_id,
                doc! { "rating": rating, "numReviews": num_reviews },
            )
            .await?;

        Ok(())
    }
}

/// Mean rating, 0 when there are no reviews.
pub fn average_rating(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    ratings.iter().sum::<f64>() / ratings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::average_rating;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn test_single_rating() {
        assert_eq!(average_rating(&[4.0]), 4.0);
    }

    #[test]
    fn test_mean_of_many() {
        assert_eq!(average_rating(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(average_rating(&[5.0, 4.0]), 4.5);
    }

    #[test]
    fn test_fractional_mean() {
        let mean = average_rating(&[5.0, 4.0, 4.0]);
        assert!((mean - 13.0 / 3.0).abs() < 1e-12);
    }
}
