//! Peony Admin - async client library for the Peony CMS admin API
//!
//! This crate provides the data layer of the Peony admin panel: an
//! authenticated HTTP client for posts, pages, tags, users, and store
//! settings, plus the cancelable fetch lifecycle every data-bound view
//! composes to avoid applying stale or post-teardown results.

// Core modules
pub mod classify;
pub mod config;
pub mod error;
pub mod task;

// Collaborators
pub mod client;
pub mod session;

// Resource models and endpoints
pub mod endpoints;
pub mod resources;

// View composition
pub mod view;

// Re-export main types for convenience
pub use classify::{is_domain_error, ApiOutcome, DomainError};
pub use client::AdminClient;
pub use config::AdminConfig;
pub use endpoints::{PostListQuery, SortOrder, UserListQuery};
pub use error::{PeonyAdminError, Result};
pub use resources::{
    Metadata, MetadataEditor, Post, PostStatus, PostTag, PostTagWriteable, PostType,
    PostWriteable, StoreSettings, User, UserRole, UserWriteable, Visibility,
};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use task::CancelableTask;
pub use view::{
    login_redirect_target, AuthSignal, ErrorNotice, ErrorNoticeKind, FetchSlot, ViewState,
};
