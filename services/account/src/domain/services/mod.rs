mod account_service;
mod channel_service;
mod password_service;
mod session_service;

pub use account_service::{AccountService, ProfileChanges, RegisterAccount};
pub use channel_service::ChannelService;
pub use password_service::PasswordService;
pub use session_service::{SessionService, TokenPair};
