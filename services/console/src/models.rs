//! Console response payloads

use auth::Principal;
use serde::Serialize;

/// Body returned for a console page
///
/// Pages are rendered client-side from this document; the console only
/// decides which page and whose session.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub page: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
}

impl PageResponse {
    pub fn new(page: &'static str, principal: Option<Principal>) -> Self {
        Self { page, principal }
    }
}
