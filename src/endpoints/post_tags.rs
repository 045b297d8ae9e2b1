//! Tags for posts and pages, under `/post_tags`.

use reqwest::Method;

use super::path_segment;
use crate::classify::ApiOutcome;
use crate::client::AdminClient;
use crate::error::Result;
use crate::resources::{PostTag, PostTagWriteable};

impl AdminClient {
    /// List all tags
    pub async fn list_post_tags(&self) -> Result<ApiOutcome<Vec<PostTag>>> {
        self.request(Method::GET, "/post_tags", &[], None::<&()>)
            .await
    }

    /// Fetch a single tag by id
    pub async fn get_post_tag(&self, id: &str) -> Result<ApiOutcome<PostTag>> {
        let path = format!("/post_tags/{}", path_segment(id));
        self.request(Method::GET, &path, &[], None::<&()>).await
    }

    /// Create a tag
    pub async fn create_post_tag(&self, writeable: &PostTagWriteable) -> Result<ApiOutcome<PostTag>> {
        writeable.validate()?;
        self.request(Method::POST, "/post_tags", &[], Some(writeable))
            .await
    }

    /// Update an existing tag
    pub async fn update_post_tag(
        &self,
        id: &str,
        writeable: &PostTagWriteable,
    ) -> Result<ApiOutcome<PostTag>> {
        writeable.validate()?;
        let path = format!("/post_tags/{}", path_segment(id));
        self.request(Method::POST, &path, &[], Some(writeable)).await
    }

    /// Delete a tag
    pub async fn delete_post_tag(&self, id: &str) -> Result<ApiOutcome<PostTag>> {
        let path = format!("/post_tags/{}", path_segment(id));
        self.request(Method::DELETE, &path, &[], None::<&()>).await
    }
}
