use std::collections::BTreeMap;
use std::sync::Arc;

use mascot_types::Theme;

/// Source of parsed theme records.
pub trait ThemeCatalog {
    fn theme(&self, id: &str) -> Option<Arc<Theme>>;

    fn theme_ids(&self) -> Vec<String>;
}

/// Catalog backed by themes already held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    themes: BTreeMap<String, Arc<Theme>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a theme, replacing any theme with the same id.
    pub fn insert(&mut self, theme: Theme) {
        self.themes.insert(theme.id.clone(), Arc::new(theme));
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.insert(theme);
        self
    }
}

impl ThemeCatalog for MemoryCatalog {
    fn theme(&self, id: &str) -> Option<Arc<Theme>> {
        self.themes.get(id).cloned()
    }

    fn theme_ids(&self) -> Vec<String> {
        self.themes.keys().cloned().collect()
    }
}
