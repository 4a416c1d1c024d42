pub mod adaptors;
pub mod auth;
pub mod board;
pub mod store;
