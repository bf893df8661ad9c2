use std::sync::Arc;

use tracing::warn;

use crate::{
    auth::AuthKeys,
    config::Config,
    database::init_mongo,
    payments::PaymentsClient,
    services::{OrderService, ProductReviewService, ProductService, ReviewService, UserService},
};

pub struct AppState {
    pub config: Config,
    pub auth: AuthKeys,
    pub users: UserService,
    pub products: ProductService,
    pub reviews: ReviewService,
    pub orders: OrderService,
    pub product_reviews: ProductReviewService,
    pub payments: PaymentsClient,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let db = init_mongo(&config.mongo_uri, &config.mongo_db).await;

        let users = UserService::new(&db);
        let products = ProductService::new(&db);
        let reviews = ReviewService::new(&db);
        let orders = OrderService::new(&db);
        let product_reviews = ProductReviewService::new(reviews.clone(), products.clone());

        // best-effort: the database may still be starting up
        if let Err(e) = users.ensure_indexes().await {
            warn!("Failed to ensure user indexes: {e}");
        }

        let auth = AuthKeys::new(&config.access_token_secret, &config.refresh_token_secret);
        let payments = PaymentsClient::new(config.stripe_secret_key.clone());

        Arc::new(Self {
            config,
            auth,
            users,
            products,
            reviews,
            orders,
            product_reviews,
            payments,
        })
    }
}
