//! Page type conversion functions.

use saleor_storefront_core::{Page, PageId, Seo};

use super::super::queries::PageFields;
use super::rich_text;

/// Convert a CMS page. Saleor only tracks creation time, so it doubles as
/// `updated_at`.
pub fn convert_page(page: PageFields) -> Page {
    let body = rich_text::render(page.content.as_deref().unwrap_or_default()).html;
    let summary = page.seo_description.unwrap_or_default();

    Page {
        id: PageId::new(page.id),
        seo: Seo {
            title: page
                .seo_title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| page.title.clone()),
            description: summary.clone(),
        },
        title: page.title,
        handle: page.slug,
        body,
        body_summary: summary,
        updated_at: page.created.clone(),
        created_at: page.created,
    }
}
