//! Uniq Client - state engine for the Uniq product catalog
//!
//! Owns the session/token lifecycle and the catalog query state
//! (pagination, sorting, debounced search, local additions) behind a
//! cancellable fetch cycle. View layers consume the read accessors and
//! mutate state only through the operations exposed here.

pub mod api;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod format;
pub mod forms;
pub mod notify;
pub mod session;
pub mod storage;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

pub use api::{AuthApi, CatalogApi, HttpAuthGateway, HttpCatalogGateway, ListQuery};
pub use catalog::{CatalogEngine, CatalogState, FetchDriver};
pub use debounce::Debouncer;
pub use forms::{FieldErrors, LoginForm, ProductForm};
pub use notify::NoticeCenter;
pub use session::{Access, Credentials, SessionController, SessionState};
pub use storage::{FileArea, MemoryArea, StorageArea, TokenStore, UiStatePersist};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse, MeResponse, ProductPage};
pub use shared::models::{NewProduct, Product, SortField, SortOrder};
