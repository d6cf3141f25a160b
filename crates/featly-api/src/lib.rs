// featly-api: Async Rust client for the feature items REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::FeatureClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{FeatureItemForm, FeatureItemResponse, FeatureListResponse, ListQuery, PageMeta};
