pub mod api;
pub mod session;

pub use api::{AccountsClient, JobsClient};
pub use session::ClientSession;
