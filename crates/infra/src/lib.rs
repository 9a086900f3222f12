//! # Daybrief Infrastructure
//!
//! Infrastructure implementations of the core pipeline ports.
//!
//! This crate contains:
//! - Configuration loading (file + environment)
//! - The HTTP transport and the call-guarded Microsoft Graph client
//! - Graph adapters: token exchange, roster/calendar gateway, delivery
//!   channels (mail, chat, file drop)
//! - Digest rendering for each channel
//! - Administrator escalation over SMTP
//!
//! ## Architecture
//! - Implements traits defined in `daybrief-core`
//! - Depends on `daybrief-common`, `daybrief-domain` and `daybrief-core`
//! - Contains all "impure" code (network I/O, file access)

pub mod channels;
pub mod config;
pub mod errors;
pub mod escalation;
pub mod graph;
pub mod http;
pub mod render;

// Re-export commonly used items
pub use channels::{build_channels, GraphChatChannel, GraphFileDropChannel, GraphMailChannel};
pub use escalation::{build_escalator, DisabledEscalator};
#[cfg(feature = "smtp")]
pub use escalation::SmtpEscalator;
pub use graph::{
    ApiResponse, ClientCredentialsAuthenticator, GraphClient, GraphDirectory, GraphError,
    GraphErrorCategory,
};
pub use http::HttpClient;
