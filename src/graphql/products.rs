use std::sync::Arc;

use async_graphql::{ComplexObject, Context, InputObject, Object, Result, SimpleObject};
use mongodb::bson::{doc, from_document, oid::ObjectId};
use serde::Deserialize;

use crate::{
    auth::{AdminGuard, AuthGuard, TokenPayload},
    error::AppError,
    graphql::{MutationBasicResponse, pagination::resolve_page},
    models::{Product, Review, parse_object_id},
    services::products::products_filter,
    state::AppState,
};

#[derive(InputObject)]
pub struct GetProductsInput {
    pub keyword: Option<String>,
    pub page_size: Option<i64>,
    pub page_number: Option<u64>,
    pub min_price_limit: Option<f64>,
    pub max_price_limit: Option<f64>,
    pub min_rating: Option<f64>,
    pub category: Option<String>,
}

#[derive(InputObject)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub count_in_stock: i32,
    pub description: String,
}

#[derive(SimpleObject)]
pub struct GetProductsResponse {
    pub products: Vec<Product>,
    pub page: u64,
    pub pages: u64,
}

#[derive(Debug, Deserialize, SimpleObject)]
pub struct ProductPreview {
    pub id: ObjectId,
    pub name: String,
    pub image: String,
    pub rating: f64,
    pub price: f64,
}

#[derive(Debug, Deserialize, SimpleObject)]
pub struct ProductsByCategory {
    pub category: String,
    pub products: Vec<ProductPreview>,
}

/// Field resolvers available on any product in a response.
#[ComplexObject]
impl Product {
    async fn similar_products(&self, ctx: &Context<'_>) -> Result<Vec<Product>> {
        let state = ctx.data::<Arc<AppState>>()?;

        Ok(state.products.find_similar(self.id, &self.category).await?)
    }

    async fn reviews(&self, ctx: &Context<'_>) -> Result<Vec<Review>> {
        let state = ctx.data::<Arc<AppState>>()?;

        let Some(id) = self.id else {
            return Ok(Vec::new());
        };

        Ok(state.reviews.find_by_product(id).await?)
    }
}

#[derive(Default)]
pub struct ProductQuery;

#[Object]
impl ProductQuery {
    async fn get_products(
        &self,
        ctx: &Context<'_>,
        get_products_input: GetProductsInput,
    ) -> Result<GetProductsResponse> {
        let state = ctx.data::<Arc<AppState>>()?;

        let filter = products_filter(
            get_products_input.keyword.as_deref(),
            get_products_input.category.as_deref(),
            get_products_input.min_price_limit,
            get_products_input.max_price_limit,
            get_products_input.min_rating,
        );

        let count = state.products.count(filter.clone()).await?;
        let page = resolve_page(
            count,
            get_products_input.page_size,
            get_products_input.page_number,
        );

        let products = state
            .products
            .find_page(filter, page.skip, page.limit)
            .await?;

        Ok(GetProductsResponse {
            products,
            page: page.page,
            pages: page.pages,
        })
    }

    async fn get_products_grouped_by_category(
        &self,
        ctx: &Context<'_>,
    ) -> Result<Vec<ProductsByCategory>> {
        let state = ctx.data::<Arc<AppState>>()?;

        let groups = state.products.grouped_by_category().await?;

        let groups = groups
            .into_iter()
            .map(|group| from_document(group).map_err(AppError::from))
            .collect::<Result<_, _>>()?;

        Ok(groups)
    }

    async fn get_product(&self, ctx: &Context<'_>, product_id: String) -> Result<Product> {
        let state = ctx.data::<Arc<AppState>>()?;

        let product = state
            .products
            .find_by_id(parse_object_id(&product_id)?)
            .await?
            .ok_or(AppError::NotFound("Product"))?;

        Ok(product)
    }

    #[graphql(guard = "AuthGuard.and(AdminGuard)")]
    async fn get_products_count(&self, ctx: &Context<'_>) -> Result<u64> {
        let state = ctx.data::<Arc<AppState>>()?;

        Ok(state.products.count(doc! {}).await?)
    }
}

#[derive(Default)]
pub struct ProductMutation;

#[Object]
impl ProductMutation {
    #[graphql(guard = "AuthGuard.and(AdminGuard)")]
    async fn add_product(
        &self,
        ctx: &Context<'_>,
        add_product_input: ProductInput,
    ) -> Result<Product> {
        let state = ctx.data::<Arc<AppState>>()?;
        let payload = ctx.data::<TokenPayload>()?;

        let now = mongodb::bson::DateTime::now();
        let product = Product {
            id: None,
            created_by: payload.user_id,
            name: add_product_input.name,
            image: add_product_input.image,
            brand: add_product_input.brand,
            category: add_product_input.category,
            description: add_product_input.description,
            rating: 0.0,
            num_reviews: 0,
            price: add_product_input.price,
            count_in_stock: add_product_input.count_in_stock,
            created_at: now,
            updated_at: now,
        };

        Ok(state.products.create(product).await?)
    }

    #[graphql(guard = "AuthGuard.and(AdminGuard)")]
    async fn update_product(
        &self,
        ctx: &Context<'_>,
        product_id: String,
        product_body: ProductInput,
    ) -> Result<Product> {
        let state = ctx.data::<Arc<AppState>>()?;

        let set = doc! {
            "name": product_body.name,
            "price": product_body.price,
            "image": product_body.image,
            "brand": product_body.brand,
            "category": product_body.category,
            "countInStock": product_body.count_in_stock,
            "description": product_body.description,
        };

        let product = state
            .products
            .update(parse_object_id(&product_id)?, set)
            .await?
            .ok_or(AppError::NotFound("Product"))?;

        Ok(product)
    }

    #[graphql(guard = "AuthGuard.and(AdminGuard)")]
    async fn delete_product(
        &self,
        ctx: &Context<'_>,
        product_id: String,
    ) -> Result<MutationBasicResponse> {
        let state = ctx.data::<Arc<AppState>>()?;

        state
            .products
            .delete_by_id(parse_object_id(&product_id)?)
            .await?
            .ok_or(AppError::NotFound("Product"))?;

        Ok(MutationBasicResponse::new("Product deleted"))
    }
}
