use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::column::ColumnDefinition;
use crate::domain::{ARRAY_SEPARATOR, ProfileError};

/// All columns which are defined for one table/tree view.
///
/// The order in which columns are registered is the default column order.
#[derive(Debug, Default)]
pub struct ColumnCatalog {
    columns: Vec<Arc<ColumnDefinition>>,
    index: HashMap<String, usize>,
}

impl ColumnCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ColumnDefinition>,
    ) -> Result<Self, ProfileError> {
        let mut catalog = Self::empty();
        for definition in definitions {
            catalog.register(definition)?;
        }
        Ok(catalog)
    }

    /// Appends a column, a column id can only be registered once.
    ///
    /// Ids are saved in separator joined lists, so they must be non-empty, without surrounding
    /// whitespace and without the separator.
    pub fn register(
        &mut self,
        definition: ColumnDefinition,
    ) -> Result<Arc<ColumnDefinition>, ProfileError> {
        let id = definition.id();
        if id.is_empty() || id.trim() != id || id.contains(ARRAY_SEPARATOR) {
            return Err(ProfileError::InvalidColumnId(id.to_string()));
        }
        if self.index.contains_key(definition.id()) {
            return Err(ProfileError::DuplicateColumn(definition.id().to_string()));
        }

        trace!("Register column {:?}", definition.id());
        let definition = Arc::new(definition);
        self.index
            .insert(definition.id().to_string(), self.columns.len());
        self.columns.push(Arc::clone(&definition));
        Ok(definition)
    }

    pub fn find(&self, id: &str) -> Option<&Arc<ColumnDefinition>> {
        self.index.get(id).map(|&idx| &self.columns[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn clear(&mut self) {
        debug!("Removing {} columns", self.columns.len());
        self.columns.clear();
        self.index.clear();
    }

    pub fn all(&self) -> &[Arc<ColumnDefinition>] {
        &self.columns
    }

    pub fn first(&self) -> Option<&Arc<ColumnDefinition>> {
        self.columns.first()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn default_columns(&self) -> impl Iterator<Item = &Arc<ColumnDefinition>> {
        self.columns.iter().filter(|c| c.is_default_column)
    }

    pub fn locked_columns(&self) -> impl Iterator<Item = &Arc<ColumnDefinition>> {
        self.columns.iter().filter(|c| c.is_visibility_locked)
    }
}
