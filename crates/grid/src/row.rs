use pressgrid_core::types::{DbId, FileId};
use pressgrid_db::models::category::Category;
use serde::Serialize;

/// Turns a stored category into whatever the rendering layer displays.
///
/// Controller read operations are generic over this capability, so a caller
/// can supply its own row type.
pub trait RowRenderer {
    type Row;

    fn render_row(&self, category: &Category) -> Self::Row;
}

/// Default grid row: identity, resolved title and the fields a grid shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub tenant_id: DbId,
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub title: String,
    pub path: String,
    pub image_id: Option<FileId>,
}

/// Renders [`RowView`]s, resolving the title under the active locale.
#[derive(Debug, Clone)]
pub struct LocalizedRowRenderer {
    active_locale: String,
    fallback_locale: String,
}

impl LocalizedRowRenderer {
    pub fn new(active_locale: impl Into<String>, fallback_locale: impl Into<String>) -> Self {
        Self {
            active_locale: active_locale.into(),
            fallback_locale: fallback_locale.into(),
        }
    }
}

impl RowRenderer for LocalizedRowRenderer {
    type Row = RowView;

    fn render_row(&self, category: &Category) -> RowView {
        let title = category
            .title
            .resolve(&self.active_locale, &self.fallback_locale)
            .unwrap_or_default()
            .to_string();
        RowView {
            tenant_id: category.tenant_id,
            id: category.id,
            parent_id: category.parent_id,
            title,
            path: category.path.clone(),
            image_id: category.image_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use pressgrid_core::locale::LocalizedText;
    use pressgrid_core::types::Timestamp;

    use super::*;

    fn sample(title: LocalizedText) -> Category {
        let now: Timestamp = "2026-01-01T00:00:00Z".parse().unwrap();
        Category {
            id: 7,
            tenant_id: 1,
            parent_id: Some(3),
            path: "sci-fi".to_string(),
            title,
            description: LocalizedText::new(),
            image_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn resolves_active_locale_first() {
        let renderer = LocalizedRowRenderer::new("fr_CA", "en_US");
        let row = renderer.render_row(&sample(
            LocalizedText::single("en_US", "Sci-Fi").with("fr_CA", "Science-fiction"),
        ));
        assert_eq!(row.title, "Science-fiction");
        assert_eq!((row.tenant_id, row.id, row.parent_id), (1, 7, Some(3)));
    }

    #[test]
    fn falls_back_to_primary_locale() {
        let renderer = LocalizedRowRenderer::new("de_DE", "en_US");
        let row = renderer.render_row(&sample(LocalizedText::single("en_US", "Sci-Fi")));
        assert_eq!(row.title, "Sci-Fi");
    }
}
