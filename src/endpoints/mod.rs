//! Per-resource request methods on [`crate::client::AdminClient`].

pub mod post_tags;
pub mod posts;
pub mod store;
pub mod users;

pub use posts::PostListQuery;
pub use users::UserListQuery;

/// Direction for list sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// Escape an id for use as a URL path segment
pub(crate) fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
