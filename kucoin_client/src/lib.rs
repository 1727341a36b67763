pub mod client;
pub mod endpoints;
pub mod errors;
pub mod history;
pub mod models;

pub use client::auth::Credentials;
pub use client::{Client, ClientConfig};
pub use errors::Error;
pub use history::{HistoryRequest, HistoryResult, RetryPolicy};
pub use models::bar::Bar;
pub use models::interval::Interval;
pub use models::series::Series;
pub use models::symbols::Symbols;
