// Pokemon Priority - Core Library
// Exposes all modules for use in the editor, the API server, and tests

pub mod catalog;
pub mod client;
pub mod config;
pub mod credential;
pub mod db;
pub mod errors;
pub mod instance;
pub mod modal;
pub mod priority_list;
pub mod reorder;
pub mod session;
pub mod text_buffer;
pub mod validation;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use catalog::{load_catalog_file, Catalog, CatalogEntry, DEFAULT_CATALOG_URL};
#[cfg(feature = "client")]
pub use catalog::fetch_catalog;
pub use client::{InstanceApi, DEFAULT_SERVER_URL};
#[cfg(feature = "client")]
pub use client::HttpInstanceApi;
pub use credential::CredentialStore;
pub use db::{
    get_instance, insert_instance, list_instances, setup_database, update_instance_data,
    verify_count,
};
pub use errors::{CatalogError, ClientError};
pub use instance::{Instance, InstanceSummary, INSTANCE_TYPE};
pub use modal::{Modal, ModalBody, ModalManager, ModalPhase};
pub use priority_list::{parse_rank, PriorityList};
pub use reorder::{DragController, DropSide, RankEditor, RowBounds, Throttle, DRAG_THROTTLE};
pub use session::Session;
pub use text_buffer::TextBuffer;
pub use validation::{ValidationReport, Validator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
