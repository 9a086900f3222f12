//! Microsoft Graph adapters
//!
//! Everything that speaks HTTP to Graph lives here: the call-guarded
//! [`GraphClient`], the token exchange and the roster/calendar gateway.
//! Delivery channels build on the same client from [`crate::channels`].

pub mod auth;
pub mod client;
pub mod directory;
pub mod errors;
pub mod response;
pub mod wire;

pub use auth::ClientCredentialsAuthenticator;
pub use client::{retry_config, GraphClient};
pub use directory::GraphDirectory;
pub use errors::{GraphError, GraphErrorCategory};
pub use response::{read_response, ApiResponse};
