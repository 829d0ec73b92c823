mod connection;
mod postgres_subscription_repository;
mod postgres_user_repository;
mod schema;

pub use connection::{check_connection, create_pool};
pub use postgres_subscription_repository::PostgresSubscriptionRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use schema::ensure_schema;
