//! Table of validated layouts, keyed by name.

use super::layout::FrameLayout;
use super::presets::{layout_for, StationShape};
use super::slice::Strategy;
use crate::utils::config::REFERENCE_SHAPES;
use crate::utils::error::ConfigurationError;
use log::debug;
use std::collections::BTreeMap;

/// Every layout a batch can refer to
///
/// Layouts are validated on insertion, so anything returned by `get` is
/// safe to classify with.
#[derive(Debug, Clone, Default)]
pub struct LayoutTable {
    layouts: BTreeMap<String, FrameLayout>,
}

impl LayoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in layouts: every strategy for every reference shape
    ///
    /// # Errors
    /// Only if a generated layout fails to build or validate, which the unit tests rule out
    pub fn reference() -> Result<Self, ConfigurationError> {
        let mut table = Self::new();

        for shape in REFERENCE_SHAPES {
            for strategy in [Strategy::SingleChannel, Strategy::Static, Strategy::Dynamic] {
                table.insert(layout_for(strategy, StationShape::from(*shape))?)?;
            }
        }

        debug!("Loaded {} reference layouts", table.len());
        Ok(table)
    }

    /// Validate and add a layout
    ///
    /// # Errors
    /// * `ConfigurationError::DuplicateLayout` - name already taken
    /// * Any error from `FrameLayout::validate`
    pub fn insert(&mut self, layout: FrameLayout) -> Result<(), ConfigurationError> {
        if self.layouts.contains_key(&layout.name) {
            return Err(ConfigurationError::DuplicateLayout(layout.name));
        }

        layout.validate()?;
        self.layouts.insert(layout.name.clone(), layout);
        Ok(())
    }

    /// Look up a layout by name
    pub fn get(&self, name: &str) -> Result<&FrameLayout, ConfigurationError> {
        self.layouts
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownLayout(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameLayout> {
        self.layouts.values()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
