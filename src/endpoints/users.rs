//! Admin users, under `/users`. Deletion is soft: the server stamps
//! `deletedAt` and the user can be restored by clearing it.

use reqwest::Method;

use super::{path_segment, SortOrder};
use crate::classify::ApiOutcome;
use crate::client::AdminClient;
use crate::error::Result;
use crate::resources::{User, UserRole, UserWriteable};

/// Query parameters for listing users
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub role: Option<UserRole>,
}

impl UserListQuery {
    pub fn sort_by<S: Into<String>>(mut self, field: S) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    pub fn role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
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
        if let Some(role) = &self.role {
            let value = match role {
                UserRole::Admin => "admin",
                UserRole::Member => "member",
                UserRole::Developer => "developer",
                UserRole::Author => "author",
                UserRole::Contributor => "contributor",
            };
            query.push(("role", value.to_string()));
        }
        query
    }
}

impl AdminClient {
    /// List users
    pub async fn list_users(&self, query: &UserListQuery) -> Result<ApiOutcome<Vec<User>>> {
        self.request(Method::GET, "/users", &query.to_query(), None::<&()>)
            .await
    }

    /// Fetch a single user by id
    pub async fn get_user(&self, id: &str) -> Result<ApiOutcome<User>> {
        let path = format!("/users/{}", path_segment(id));
        self.request(Method::GET, &path, &[], None::<&()>).await
    }

    /// Update an existing user
    pub async fn update_user(&self, id: &str, writeable: &UserWriteable) -> Result<ApiOutcome<User>> {
        writeable.validate()?;
        let path = format!("/users/{}", path_segment(id));
        self.request(Method::POST, &path, &[], Some(writeable)).await
    }

    /// Soft-delete a user; the response carries the stamped `deletedAt`
    pub async fn delete_user(&self, id: &str) -> Result<ApiOutcome<User>> {
        let path = format!("/users/{}", path_segment(id));
        self.request(Method::DELETE, &path, &[], None::<&()>).await
    }

    /// Restore a soft-deleted user by clearing `deletedAt`
    pub async fn restore_user(&self, id: &str) -> Result<ApiOutcome<User>> {
        let path = format!("/users/{}", path_segment(id));
        let body = serde_json::json!({ "deletedAt": null });
        self.request(Method::POST, &path, &[], Some(&body)).await
    }
}
