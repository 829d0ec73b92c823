pub mod auth;
pub mod channels;
pub mod ops;
pub mod users;
