//! One service per collection. Resolvers orchestrate; everything that
//! touches the database goes through here.
pub mod orders;
pub mod product_reviews;
pub mod products;
pub mod reviews;
pub mod users;

pub use orders::OrderService;
pub use product_reviews::ProductReviewService;
pub use products::ProductService;
pub use reviews::ReviewService;
pub use users::UserService;
