//! Resolves the raw, persisted data of a profile against the columns of a catalog.
//!
//! The raw data can be stale in many ways: columns were removed or added between versions,
//! widths are missing or broken, a profile was never used. Reconciliation turns whatever was saved
//! into the definitive list of columns to render:
//!
//! 1. An empty id list selects the default columns, or the first column when there are none.
//! 2. Otherwise the saved ids are mapped to catalog columns, unknown ids are dropped.
//! 3. Every resolved column gets its saved width, broken widths fall back to the default width.
//! 4. Locked columns which are missing are appended.
//!
//! When 1. or 4. changes the column list, the profile's id list is rewritten so that the next pass
//! produces the same result without rewriting anything.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::catalog::ColumnCatalog;
use crate::column::{ColumnDefinition, ResolvedColumn};
use crate::domain::{ANNOTATION_FORMATTING, MINIMUM_COLUMN_WIDTH};
use crate::formatter::{self, ValueFormat, ValueFormatter};
use crate::profile::ColumnProfile;

pub struct Reconciler<'a> {
    catalog: &'a ColumnCatalog,
    minimum_width: u32,
    is_show_annotations: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(catalog: &'a ColumnCatalog) -> Self {
        Self {
            catalog,
            minimum_width: MINIMUM_COLUMN_WIDTH,
            is_show_annotations: false,
        }
    }

    pub fn with_minimum_width(mut self, minimum_width: u32) -> Self {
        self.minimum_width = minimum_width;
        self
    }

    pub fn with_annotations(mut self, is_show_annotations: bool) -> Self {
        self.is_show_annotations = is_show_annotations;
        self
    }

    /// Sets the resolved columns of `profile`, returns `true` when its visible ids were rewritten.
    pub fn reconcile(&self, profile: &mut ColumnProfile) -> bool {
        let mut is_rewritten = false;

        let mut columns = if profile.visible_column_ids.is_empty() {
            is_rewritten = true;
            self.bootstrap_columns()
        } else {
            self.saved_columns(&profile.visible_column_ids)
        };

        let missing: Vec<Arc<ColumnDefinition>> = self
            .catalog
            .locked_columns()
            .filter(|locked| !columns.iter().any(|c| c.id() == locked.id()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            debug!(
                "Profile {:?}: appending locked columns {:?}",
                profile.name,
                missing.iter().map(|c| c.id()).collect::<Vec<&str>>()
            );
            columns.extend(missing);
            is_rewritten = true;
        }

        if is_rewritten {
            profile.visible_column_ids = columns.iter().map(|c| c.id().to_string()).collect();
        }

        let raw: &ColumnProfile = profile;
        let resolved: Vec<ResolvedColumn> = columns
            .into_iter()
            .enumerate()
            .map(|(create_index, definition)| {
                let width = self.column_width(&definition, raw.saved_width(definition.id()));
                ResolvedColumn {
                    width,
                    create_index,
                    header: header_text(&definition, self.is_show_annotations),
                    format: resolve_format(&definition, raw, false),
                    detail_format: resolve_format(&definition, raw, true),
                    definition,
                }
            })
            .collect();

        trace!(
            "Profile {:?} resolved to {:?}",
            profile.name,
            resolved
                .iter()
                .map(|c| (c.id(), c.width))
                .collect::<Vec<(&str, u32)>>()
        );
        profile.set_visible_columns(resolved);
        is_rewritten
    }

    fn bootstrap_columns(&self) -> Vec<Arc<ColumnDefinition>> {
        let defaults: Vec<Arc<ColumnDefinition>> =
            self.catalog.default_columns().cloned().collect();
        if !defaults.is_empty() {
            debug!("No visible columns, using {} default columns", defaults.len());
            return defaults;
        }

        match self.catalog.first() {
            Some(first) => {
                debug!("No visible and no default columns, using {:?}", first.id());
                vec![Arc::clone(first)]
            }
            None => Vec::new(),
        }
    }

    fn saved_columns(&self, ids: &[String]) -> Vec<Arc<ColumnDefinition>> {
        let mut seen: HashSet<&str> = HashSet::new();
        ids.iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| {
                let column = self.catalog.find(id);
                if column.is_none() {
                    trace!("Column {id:?} is not available anymore");
                }
                column.cloned()
            })
            .collect()
    }

    /// Width for a visible column, 0 only for the alignment column.
    pub fn column_width(&self, definition: &ColumnDefinition, saved: Option<u32>) -> u32 {
        if definition.is_hidden {
            return 0;
        }
        match saved {
            Some(width) if width >= self.minimum_width => width,
            _ => definition.default_width.max(self.minimum_width),
        }
    }
}

/// Header of a column, columns with a selectable format are annotated on request.
pub fn header_text(definition: &ColumnDefinition, is_show_annotations: bool) -> String {
    let header = definition.base_header_text();
    if is_show_annotations && definition.has_default_format() {
        format!("{header} {ANNOTATION_FORMATTING}")
    } else {
        header.to_string()
    }
}

/// Format of a column in a profile: the profile's choice when the column still offers it, then
/// the column's default.
pub fn resolve_format(
    definition: &ColumnDefinition,
    profile: &ColumnProfile,
    is_detail: bool,
) -> Option<ValueFormat> {
    let chosen = profile
        .properties(definition.id())
        .and_then(|p| p.get(is_detail))
        .filter(|&format| definition.offers_format(format));

    chosen.or(if is_detail {
        definition.default_detail_format
    } else {
        definition.default_format
    })
}

/// Like [`resolve_format`] but never fails, the global default formatter is the last fallback.
pub fn resolve_formatter(
    definition: &ColumnDefinition,
    profile: &ColumnProfile,
    is_detail: bool,
) -> &'static dyn ValueFormatter {
    resolve_format(definition, profile, is_detail)
        .map(formatter::resolve)
        .unwrap_or_else(formatter::default_formatter)
}
