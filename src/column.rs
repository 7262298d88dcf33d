use std::sync::Arc;

use derive_setters::Setters;

use crate::domain::{COLUMN_CATEGORY_SEPARATOR, COLUMN_TEXT_SEPARATOR};
use crate::formatter::{self, ValueFormat, ValueFormatter};

/// Horizontal alignment of a column's header and cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnStyle {
    #[default]
    Lead,
    Center,
    Trail,
}

/// Static description of a column which *can* be displayed in a view.
///
/// A definition is never mutated after it was registered in a catalog, everything which changes
/// with a profile (width, order, chosen format) lives in [`ResolvedColumn`].
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct ColumnDefinition {
    #[setters(skip)]
    id: String,
    #[setters(strip_option, into)]
    pub label: Option<String>,
    #[setters(strip_option, into)]
    pub header_text: Option<String>,
    #[setters(strip_option, into)]
    pub tooltip_text: Option<String>,
    #[setters(strip_option, into)]
    pub category: Option<String>,
    #[setters(strip_option, into)]
    pub unit: Option<String>,
    pub style: ColumnStyle,
    pub default_width: u32,
    pub is_resizable: bool,
    pub is_movable: bool,
    /// Column is always displayed, a profile cannot hide it.
    pub is_visibility_locked: bool,
    /// Column is displayed when a profile has no columns yet.
    pub is_default_column: bool,
    /// Zero width column, only used to align the first visible column.
    pub is_hidden: bool,
    pub available_formats: Vec<ValueFormat>,
    #[setters(strip_option)]
    pub default_format: Option<ValueFormat>,
    #[setters(strip_option)]
    pub default_detail_format: Option<ValueFormat>,
}

impl ColumnDefinition {
    pub fn new(id: impl Into<String>, style: ColumnStyle) -> Self {
        Self {
            id: id.into(),
            label: None,
            header_text: None,
            tooltip_text: None,
            category: None,
            unit: None,
            style,
            default_width: 0,
            is_resizable: true,
            is_movable: true,
            is_visibility_locked: false,
            is_default_column: false,
            is_hidden: false,
            available_formats: Vec::new(),
            default_format: None,
            default_detail_format: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn can_modify_visibility(&self) -> bool {
        !self.is_visibility_locked
    }

    pub fn has_value_format(&self) -> bool {
        !self.available_formats.is_empty()
    }

    pub fn has_default_format(&self) -> bool {
        self.default_format.is_some() || self.default_detail_format.is_some()
    }

    pub fn offers_format(&self, format: ValueFormat) -> bool {
        self.available_formats.contains(&format)
    }

    /// Label shown in menus and lists: "category » label · unit".
    pub fn label_text(&self, is_with_category: bool) -> String {
        let mut text = String::new();

        if is_with_category && let Some(category) = &self.category {
            text.push_str(category);
        }

        if let Some(label) = &self.label {
            if !text.is_empty() {
                text.push_str(COLUMN_CATEGORY_SEPARATOR);
            }
            text.push_str(label);
        }

        if let Some(unit) = &self.unit {
            if !text.is_empty() {
                text.push_str(COLUMN_TEXT_SEPARATOR);
            }
            text.push_str(unit);
        }

        text
    }

    /// Header text without annotations, falls back to the label and then to the id.
    pub fn base_header_text(&self) -> &str {
        self.header_text
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or(&self.id)
    }
}

/// A catalog column resolved for one profile.
///
/// Values are only valid for one reconciliation, the next pass creates new records.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub definition: Arc<ColumnDefinition>,
    pub width: u32,
    /// Position in the create order of the viewer, maps the widget's column order back to columns.
    pub create_index: usize,
    pub header: String,
    pub format: Option<ValueFormat>,
    pub detail_format: Option<ValueFormat>,
}

impl ResolvedColumn {
    pub fn id(&self) -> &str {
        self.definition.id()
    }

    pub fn formatter(&self) -> &'static dyn ValueFormatter {
        self.format
            .map(formatter::resolve)
            .unwrap_or_else(formatter::default_formatter)
    }

    pub fn detail_formatter(&self) -> &'static dyn ValueFormatter {
        self.detail_format
            .map(formatter::resolve)
            .unwrap_or_else(formatter::default_formatter)
    }

    /// Cell text for a value, 0 is shown as an empty cell.
    pub fn print_double(&self, value: f64, is_detail: bool) -> String {
        if value == 0.0 {
            return String::new();
        }
        if is_detail {
            self.detail_formatter().print_double(value)
        } else {
            self.formatter().print_double(value)
        }
    }

    pub fn print_long(&self, value: i64, is_detail: bool) -> String {
        if value == 0 {
            return String::new();
        }
        if is_detail {
            self.detail_formatter().print_long(value)
        } else {
            self.formatter().print_long(value)
        }
    }
}
