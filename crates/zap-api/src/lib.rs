mod backend;
mod client;
mod error;

pub use backend::Backend;
pub use client::{ApiClient, SendOutcome, api_url_from_env, API_URL_ENV, DEFAULT_API_URL};
pub use error::ApiError;
pub use error::Result;
