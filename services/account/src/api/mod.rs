pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::ops::{OpsState, ops_routes};
pub use routes::{AppState, routes};
