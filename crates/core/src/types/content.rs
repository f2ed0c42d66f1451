//! Content records: CMS pages and navigation menus.

use serde::{Deserialize, Serialize};

use super::catalog::Seo;
use super::id::PageId;

/// A CMS page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub handle: String,
    /// Rendered HTML body.
    pub body: String,
    pub body_summary: String,
    pub seo: Seo,
    pub created_at: String,
    pub updated_at: String,
}

/// A single flattened navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub title: String,
    pub path: String,
}
