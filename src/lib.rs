pub mod config;
pub mod contact;
pub mod i18n;
pub mod retry;
pub mod routing;
pub mod security;
pub mod server;
pub mod transport;
