use std::sync::Arc;

use async_graphql::{Context, Error, InputObject, Object, Result};
use mongodb::bson::doc;

use crate::{
    auth::{AuthGuard, TokenPayload},
    error::AppError,
    graphql::MutationBasicResponse,
    models::{Review, parse_object_id},
    state::AppState,
};

const NOT_REVIEW_AUTHOR: &str = "You are not authorized to perform this action";

#[derive(InputObject)]
pub struct ReviewInput {
    #[graphql(validator(minimum = 0.0, maximum = 5.0))]
    pub rating: f64,
    pub comment: String,
}

#[derive(Default)]
pub struct ReviewQuery;

#[Object]
impl ReviewQuery {
    async fn get_reviews(&self, ctx: &Context<'_>, product_id: String) -> Result<Vec<Review>> {
        let state = ctx.data::<Arc<AppState>>()?;

        Ok(state
            .reviews
            .find_by_product(parse_object_id(&product_id)?)
            .await?)
    }
}

#[derive(Default)]
pub struct ReviewMutation;

#[Object]
impl ReviewMutation {
    /// One review per user per product; the product's aggregate stats
    /// are refreshed as part of the same mutation.
    #[graphql(guard = "AuthGuard")]
    async fn add_review(
        &self,
        ctx: &Context<'_>,
        product_id: String,
        review_body: ReviewInput,
    ) -> Result<MutationBasicResponse> {
        let state = ctx.data::<Arc<AppState>>()?;
        let payload = ctx.data::<TokenPayload>()?;

        let product_id = parse_object_id(&product_id)?;

        let product = state
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::NotFound("Product"))?;
        let product_id = product.id.ok_or(AppError::InvalidId)?;

        let already_reviewed = state
            .reviews
            .find_by_product_and_author(product_id, payload.user_id)
            .await?;

        if already_reviewed.is_some() {
            return Err(Error::new("Product already reviewed"));
        }

        let author = state
            .users
            .find_by_id(payload.user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        state
            .reviews
            .create(Review::new(
                review_body.rating,
                review_body.comment,
                payload.user_id,
                author.name,
                product_id,
            ))
            .await?;

        state
            .product_reviews
            .refresh_product_stats(product_id)
            .await?;

        Ok(MutationBasicResponse::new("Review added"))
    }

    #[graphql(guard = "AuthGuard")]
    async fn update_review(
        &self,
        ctx: &Context<'_>,
        review_id: String,
        update_body: ReviewInput,
    ) -> Result<Review> {
        let state = ctx.data::<Arc<AppState>>()?;
        let payload = ctx.data::<TokenPayload>()?;

        let review_id = parse_object_id(&review_id)?;

        let review = state
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(AppError::NotFound("Review"))?;

        if review.author != payload.user_id {
            return Err(Error::new(NOT_REVIEW_AUTHOR));
        }

        let updated = state
            .reviews
            .update(
                review_id,
                doc! {
                    "rating": update_body.rating,
                    "comment": update_body.comment,
                },
            )
            .await?
            .ok_or(AppError::NotFound("Review"))?;

        state
            .product_reviews
            .refresh_product_stats(updated.product)
            .await?;

        Ok(updated)
    }

    #[graphql(guard = "AuthGuard")]
    async fn delete_review(
        &self,
        ctx: &Context<'_>,
        review_id: String,
    ) -> Result<MutationBasicResponse> {
        let state = ctx.data::<Arc<AppState>>()?;
        let payload = ctx.data::<TokenPayload>()?;

        let review_id = parse_object_id(&review_id)?;

        let review = state
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(AppError::NotFound("Review"))?;

        if review.author != payload.user_id {
            return Err(Error::new(NOT_REVIEW_AUTHOR));
        }

        state.reviews.delete_by_id(review_id).await?;

        state
            .product_reviews
            .refresh_product_stats(review.product)
            .await?;

        Ok(MutationBasicResponse::new("Review deleted"))
    }
}
