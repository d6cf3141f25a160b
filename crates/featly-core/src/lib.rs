// featly-core: Reactive state layer between featly-api and consumers.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod filters;
pub mod model;
pub mod resource;
pub mod stream;
pub mod transport;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, TlsVerification};
pub use controller::CollectionController;
pub use error::CoreError;
pub use filters::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, FilterDescriptor, FilterPatch, SortDirection, SortKey,
};
pub use model::{Item, ItemForm, ItemId, ItemPage, ItemStatus, MutationOutcome, PageMeta};
pub use resource::{AsyncResource, ResourceState};
pub use stream::{ResourceStream, ResourceWatchStream};
pub use transport::{HttpTransport, Transport};
