use pressgrid_core::category::{DeletePolicy, DEFAULT_MAX_DEPTH};
use pressgrid_core::locale::DEFAULT_LOCALE;

/// Behaviour knobs for the grid, loaded from server configuration.
#[derive(Debug, Clone)]
pub struct GridSettings {
    /// Locale whose title entry is mandatory and used as display fallback.
    pub primary_locale: String,
    /// How deleting a category with children is handled.
    pub delete_policy: DeletePolicy,
    /// Maximum parent hops allowed from any category to its root.
    pub max_depth: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            primary_locale: DEFAULT_LOCALE.to_string(),
            delete_policy: DeletePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
