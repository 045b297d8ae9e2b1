//! Shared helpers for peony-admin integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use peony_admin::{AdminClient, AdminConfig, MemorySessionStore, SessionStore};
use serde_json::{json, Value};
use wiremock::MockServer;

/// Header name used by the default test configuration
pub const AUTH_HEADER: &str = "x-peony-admin-auth";

/// Build a client (and its session store) against a mock server
pub fn client_for(server: &MockServer) -> (Arc<AdminClient>, Arc<MemorySessionStore>) {
    let session = Arc::new(MemorySessionStore::new());
    let session_dyn: Arc<dyn SessionStore> = session.clone();
    let config = AdminConfig::new(server.uri());
    let client = AdminClient::new(config, session_dyn).expect("client builds against mock server");
    (Arc::new(client), session)
}

/// Build a client whose session store already holds a token
pub fn authed_client_for(server: &MockServer) -> (Arc<AdminClient>, Arc<MemorySessionStore>) {
    let (client, session) = client_for(server);
    session.set_token("test-token").expect("memory store set");
    (client, session)
}

/// A well-formed domain error body
pub fn domain_error_body(code: i64, message: &str) -> Value {
    json!({
        "message": message,
        "code": code,
        "data": null,
        "timestamp": "2024-01-01T00:00:00Z"
    })
}

/// A minimal post body as the server would return it
pub fn post_body(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "subtitle": "",
        "excerpt": "",
        "handle": title.to_lowercase(),
        "status": "draft",
        "featured": false,
        "visibility": "public",
        "postType": "post",
        "authors": [user_body("u1", "author@example.com")],
        "tags": [],
        "metadata": "{}",
        "createdAt": "2024-03-01T10:00:00Z"
    })
}

/// A minimal user body as the server would return it
pub fn user_body(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "handle": "someone",
        "firstName": "Some",
        "lastName": "One",
        "role": "member",
        "metadata": "{}",
        "createdAt": "2024-01-15T09:00:00Z"
    })
}

/// A minimal tag body as the server would return it
pub fn tag_body(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "handle": title.to_lowercase(),
        "metadata": "{}"
    })
}
