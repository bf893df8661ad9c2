use std::sync::Arc;

use async_graphql::{Context, Error, InputObject, Object, Result};
use mongodb::bson::{DateTime, doc, to_bson};

use crate::{
    auth::{AdminGuard, AuthGuard, TokenPayload},
    error::AppError,
    models::{Order, OrderItem, PaymentResult, ShippingAddress, parse_object_id},
    state::AppState,
};

#[derive(InputObject)]
pub struct OrderItemInput {
    pub product_name: String,
    #[graphql(validator(minimum = 1))]
    pub quantity: i32,
    pub image: String,
    pub price: f64,
    pub product: String,
}

#[derive(InputObject)]
pub struct ShippingAddressInput {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(InputObject)]
pub struct AddOrderInput {
    pub order_items: Vec<OrderItemInput>,
    pub shipping_address: ShippingAddressInput,
    pub payment_method: String,
    /// Accepted for parity with the storefront client; the stored
    /// order only keeps the tax/shipping/total breakdown.
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
}

#[derive(InputObject)]
pub struct PaymentResultInput {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub email_address: String,
}

impl From<ShippingAddressInput> for ShippingAddress {
    fn from(input: ShippingAddressInput) -> Self {
        Self {
            address: input.address,
            city: input.city,
            postal_code: input.postal_code,
            country: input.country,
        }
    }
}

impl From<PaymentResultInput> for PaymentResult {
    fn from(input: PaymentResultInput) -> Self {
        Self {
            id: input.id,
            status: input.status,
            update_time: input.update_time,
            email_address: input.email_address,
        }
    }
}

#[derive(Default)]
pub struct OrderQuery;

#[Object]
impl OrderQuery {
    #[graphql(guard = "AuthGuard.and(AdminGuard)")]
    async fn get_orders(&self, ctx: &Context<'_>) -> Result<Vec<Order>> {
        let state = ctx.data::<Arc<AppState>>()?;

        Ok(state.orders.find_all().await?)
    }

    #[graphql(guard = "AuthGuard")]
    async fn get_user_orders(&self, ctx: &Context<'_>) -> Result<Vec<Order>> {
        let state = ctx.data::<Arc<AppState>>()?;
        let payload = ctx.data::<TokenPayload>()?;

        Ok(state.orders.find_by_user(payload.user_id).await?)
    }

    #[graphql(guard = "AuthGuard")]
    async fn get_order_by_id(&self, ctx: &Context<'_>, order_id: String) -> Result<Order> {
        let state = ctx.data::<Arc<AppState>>()?;

        let order = state
            .orders
            .find_by_id(parse_object_id(&order_id)?)
            .await?
            .ok_or(AppError::NotFound("Order"))?;

        Ok(order)
    }
}

#[derive(Default)]
pub struct OrderMutation;

#[Object]
impl OrderMutation {
    #[graphql(guard = "AuthGuard")]
    async fn add_order(&self, ctx: &Context<'_>, order_body: AddOrderInput) -> Result<Order> {
        let state = ctx.data::<Arc<AppState>>()?;
        let payload = ctx.data::<TokenPayload>()?;

        if order_body.order_items.is_empty() {
            return Err(Error::new("No order items"));
        }

        let user = state
            .users
            .find_by_id(payload.user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let order_items = order_body
            .order_items
            .into_iter()
            .map(|item| {
                Ok(OrderItem {
                    product_name: item.product_name,
                    quantity: item.quantity,
                    image: item.image,
                    price: item.price,
                    product: parse_object_id(&item.product)?,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let now = DateTime::now();
        let order = Order {
            id: None,
            order_by: payload.user_id,
            order_by_name: user.name,
            order_items,
            shipping_address: order_body.shipping_address.into(),
            payment_method: order_body.payment_method,
            payment_result: None,
            tax_price: order_body.tax_price,
            shipping_price: order_body.shipping_price,
            total_price: order_body.total_price,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        };

        Ok(state.orders.create(order).await?)
    }

    #[graphql(guard = "AuthGuard")]
    async fn update_order_to_paid(
        &self,
        ctx: &Context<'_>,
        order_id: String,
        payment_result_body: PaymentResultInput,
    ) -> Result<Order> {
        let state = ctx.data::<Arc<AppState>>()?;

        let payment_result = PaymentResult::from(payment_result_body);

        let order = state
            .orders
            .update(
                parse_object_id(&order_id)?,
                doc! {
                    "paymentResult": to_bson(&payment_result).map_err(AppError::from)?,
                    "isPaid": true,
                    "paidAt": DateTime::now(),
                },
            )
            .await?
            .ok_or(AppError::NotFound("Order"))?;

        Ok(order)
    }

    #[graphql(guard = "AuthGuard")]
    async fn update_order_to_delivered(
        &self,
        ctx: &Context<'_>,
        order_id: String,
    ) -> Result<Order> {
        let state = ctx.data::<Arc<AppState>>()?;

        let order = state
            .orders
            .update(
                parse_object_id(&order_id)?,
                doc! {
                    "isDelivered": true,
                    "deliveredAt": DateTime::now(),
                },
            )
            .await?
            .ok_or(AppError::NotFound("Order"))?;

        Ok(order)
    }
}
