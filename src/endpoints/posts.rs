//! Posts and pages. The two share the `/posts` resource discriminated by
//! `post_type`; `/pages` is the server's pre-filtered listing of the same
//! resource.

use reqwest::Method;

use super::{path_segment, SortOrder};
use crate::classify::ApiOutcome;
use crate::client::AdminClient;
use crate::error::Result;
use crate::resources::{Post, PostStatus, PostType, PostWriteable, Visibility};

/// Query parameters for listing posts or pages
#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub status: Option<PostStatus>,
    pub featured: Option<bool>,
    pub visibility: Option<Visibility>,
    pub author: Option<String>,
    pub tag: Option<String>,
}

impl PostListQuery {
    pub fn sort_by<S: Into<String>>(mut self, field: S) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    pub fn status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(sort_by) = &self.sort_by {
            query.push(("sort_by", sort_by.clone()));
        }
        if let Some(order) = &self.sort_order {
            query.push(("sort_order", order.as_str().to_string()));
        }
        if let Some(status) = &self.status {
            let value = match status {
                PostStatus::Published => "published",
                PostStatus::Draft => "draft",
            };
            query.push(("status", value.to_string()));
        }
        if let Some(featured) = self.featured {
            query.push(("featured", featured.to_string()));
        }
        if let Some(visibility) = &self.visibility {
            let value = match visibility {
                Visibility::Public => "public",
                Visibility::Paid => "paid",
            };
            query.push(("visibility", value.to_string()));
        }
        if let Some(author) = &self.author {
            query.push(("author", author.clone()));
        }
        if let Some(tag) = &self.tag {
            query.push(("tag", tag.clone()));
        }
        query
    }
}

impl AdminClient {
    /// List posts
    pub async fn list_posts(&self, query: &PostListQuery) -> Result<ApiOutcome<Vec<Post>>> {
        self.request(Method::GET, "/posts", &query.to_query(), None::<&()>)
            .await
    }

    /// List pages
    pub async fn list_pages(&self, query: &PostListQuery) -> Result<ApiOutcome<Vec<Post>>> {
        self.request(Method::GET, "/pages", &query.to_query(), None::<&()>)
            .await
    }

    /// Fetch a single post or page by id
    pub async fn get_post(&self, id: &str) -> Result<ApiOutcome<Post>> {
        let path = format!("/posts/{}", path_segment(id));
        self.request(Method::GET, &path, &[], None::<&()>).await
    }

    /// Create a post or page
    pub async fn create_post(
        &self,
        writeable: &PostWriteable,
        post_type: PostType,
    ) -> Result<ApiOutcome<Post>> {
        writeable.validate()?;
        let query: Vec<(&str, String)> = match post_type {
            PostType::Page => vec![("post_type", "page".to_string())],
            PostType::Post => Vec::new(),
        };
        self.request(Method::POST, "/posts", &query, Some(writeable))
            .await
    }

    /// Update an existing post or page
    pub async fn update_post(&self, id: &str, writeable: &PostWriteable) -> Result<ApiOutcome<Post>> {
        writeable.validate()?;
        let path = format!("/posts/{}", path_segment(id));
        self.request(Method::POST, &path, &[], Some(writeable)).await
    }

    /// Delete a post or page
    pub async fn delete_post(&self, id: &str) -> Result<ApiOutcome<Post>> {
        let path = format!("/posts/{}", path_segment(id));
        self.request(Method::DELETE, &path, &[], None::<&()>).await
    }
}
