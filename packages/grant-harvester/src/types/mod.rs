pub mod config;
pub mod grant;
pub mod source;
