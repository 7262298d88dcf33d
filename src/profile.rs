use std::sync::atomic::{AtomicU64, Ordering};

use crate::column::ResolvedColumn;
use crate::domain::ARRAY_SEPARATOR;
use crate::formatter::ValueFormat;

static NEXT_PROFILE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a profile for the lifetime of the process.
///
/// Profiles are compared by this id only, two profiles with the same name and columns are still
/// different profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileId(u64);

impl ProfileId {
    fn next() -> Self {
        ProfileId(NEXT_PROFILE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Value formats chosen for one column in a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProperties {
    pub column_id: String,
    pub format: Option<ValueFormat>,
    pub detail_format: Option<ValueFormat>,
}

impl ColumnProperties {
    pub fn new(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            format: None,
            detail_format: None,
        }
    }

    pub fn get(&self, is_detail: bool) -> Option<ValueFormat> {
        if is_detail {
            self.detail_format
        } else {
            self.format
        }
    }

    pub fn set(&mut self, format: Option<ValueFormat>, is_detail: bool) {
        if is_detail {
            self.detail_format = format;
        } else {
            self.format = format;
        }
    }
}

/// Saved width of a column, `None` when the saved value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWidth {
    pub column_id: String,
    pub width: Option<u32>,
}

impl ColumnWidth {
    pub fn new(column_id: impl Into<String>, width: u32) -> Self {
        Self {
            column_id: column_id.into(),
            width: Some(width),
        }
    }
}

/// A named column layout: which columns are visible, in which order, how wide and how formatted.
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    id: ProfileId,
    pub name: String,
    /// Defines the column order.
    pub visible_column_ids: Vec<String>,
    pub visible_column_ids_and_width: Vec<ColumnWidth>,
    pub column_properties: Vec<ColumnProperties>,
    visible_columns: Vec<ResolvedColumn>,
}

impl PartialEq for ColumnProfile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ColumnProfile {}

impl ColumnProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProfileId::next(),
            name: name.into(),
            visible_column_ids: Vec::new(),
            visible_column_ids_and_width: Vec::new(),
            column_properties: Vec::new(),
            visible_columns: Vec::new(),
        }
    }

    /// Copy of this profile with a new identity, the resolved columns are not copied.
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            id: ProfileId::next(),
            name: name.into(),
            visible_column_ids: self.visible_column_ids.clone(),
            visible_column_ids_and_width: self.visible_column_ids_and_width.clone(),
            column_properties: self.column_properties.clone(),
            visible_columns: Vec::new(),
        }
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    /// Columns from the last reconciliation, in create order.
    pub fn visible_columns(&self) -> &[ResolvedColumn] {
        &self.visible_columns
    }

    pub fn visible_column(&self, column_id: &str) -> Option<&ResolvedColumn> {
        self.visible_columns.iter().find(|c| c.id() == column_id)
    }

    pub(crate) fn visible_column_mut(&mut self, column_id: &str) -> Option<&mut ResolvedColumn> {
        self.visible_columns.iter_mut().find(|c| c.id() == column_id)
    }

    pub(crate) fn set_visible_columns(&mut self, columns: Vec<ResolvedColumn>) {
        self.visible_columns = columns;
    }

    /// Drops the resolved columns, they are recreated with the next reconciliation.
    pub fn invalidate(&mut self) {
        self.visible_columns.clear();
    }

    pub fn is_visible(&self, column_id: &str) -> bool {
        self.visible_column_ids.iter().any(|id| id == column_id)
    }

    /// Saved width, `None` when it is missing or not parsable.
    pub fn saved_width(&self, column_id: &str) -> Option<u32> {
        self.visible_column_ids_and_width
            .iter()
            .find(|w| w.column_id == column_id)
            .and_then(|w| w.width)
    }

    pub fn set_saved_width(&mut self, column_id: &str, width: u32) {
        let existing = self
            .visible_column_ids_and_width
            .iter()
            .position(|w| w.column_id == column_id);
        match existing {
            Some(idx) => self.visible_column_ids_and_width[idx].width = Some(width),
            None => self
                .visible_column_ids_and_width
                .push(ColumnWidth::new(column_id, width)),
        }
    }

    /// Replaces order and widths in one step.
    pub fn set_visible(&mut self, columns: Vec<ColumnWidth>) {
        self.visible_column_ids = columns.iter().map(|c| c.column_id.clone()).collect();
        self.visible_column_ids_and_width = columns;
    }

    pub fn properties(&self, column_id: &str) -> Option<&ColumnProperties> {
        self.column_properties
            .iter()
            .find(|p| p.column_id == column_id)
    }

    pub fn properties_mut(&mut self, column_id: &str) -> &mut ColumnProperties {
        let existing = self
            .column_properties
            .iter()
            .position(|p| p.column_id == column_id);
        let idx = match existing {
            Some(idx) => idx,
            None => {
                self.column_properties.push(ColumnProperties::new(column_id));
                self.column_properties.len() - 1
            }
        };
        &mut self.column_properties[idx]
    }
}

// -------------------- Delimiter encoded arrays ---------------------- //

pub(crate) fn encode_ids(ids: &[String]) -> String {
    ids.join(ARRAY_SEPARATOR)
}

pub(crate) fn decode_ids(value: &str) -> Vec<String> {
    value
        .split(ARRAY_SEPARATOR)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Alternating id and width, unparsable widths are written as 0.
pub(crate) fn encode_widths(widths: &[ColumnWidth]) -> String {
    widths
        .iter()
        .map(|w| format!("{}{ARRAY_SEPARATOR}{}", w.column_id, w.width.unwrap_or(0)))
        .collect::<Vec<String>>()
        .join(ARRAY_SEPARATOR)
}

pub(crate) fn decode_widths(value: &str) -> Vec<ColumnWidth> {
    if value.trim().is_empty() {
        return Vec::new();
    }

    let tokens: Vec<&str> = value.split(ARRAY_SEPARATOR).map(str::trim).collect();
    tokens
        .chunks(2)
        .filter(|pair| !pair[0].is_empty())
        .map(|pair| ColumnWidth {
            column_id: pair[0].to_string(),
            width: pair.get(1).and_then(|w| w.parse().ok()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_compare_by_identity() {
        let a = ColumnProfile::new("Same");
        let b = ColumnProfile::new("Same");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(b.id() > a.id());
    }

    #[test]
    fn duplicate_gets_new_identity() {
        let mut profile = ColumnProfile::new("Tours");
        profile.set_visible(vec![ColumnWidth::new("date", 80)]);
        profile.properties_mut("time").format = Some(ValueFormat::TimeHh);

        let copy = profile.duplicate("Tours 2");
        assert_ne!(copy, profile);
        assert_eq!(copy.name, "Tours 2");
        assert_eq!(copy.visible_column_ids, vec!["date"]);
        assert_eq!(copy.saved_width("date"), Some(80));
        assert_eq!(copy.column_properties, profile.column_properties);
    }

    #[test]
    fn saved_width_is_updated_in_place() {
        let mut profile = ColumnProfile::new("p");
        profile.set_saved_width("a", 10);
        profile.set_saved_width("b", 20);
        profile.set_saved_width("a", 30);
        assert_eq!(profile.visible_column_ids_and_width.len(), 2);
        assert_eq!(profile.saved_width("a"), Some(30));
        assert_eq!(profile.saved_width("c"), None);
    }

    #[test]
    fn properties_are_created_once() {
        let mut profile = ColumnProfile::new("p");
        profile.properties_mut("a").set(Some(ValueFormat::Number1), false);
        profile.properties_mut("a").set(Some(ValueFormat::Number2), true);
        assert_eq!(profile.column_properties.len(), 1);

        let properties = profile.properties("a").unwrap();
        assert_eq!(properties.get(false), Some(ValueFormat::Number1));
        assert_eq!(properties.get(true), Some(ValueFormat::Number2));
    }

    #[test]
    fn decodes_ids() {
        assert_eq!(decode_ids("a, b,,c"), vec!["a", "b", "c"]);
        assert!(decode_ids("").is_empty());
        assert_eq!(encode_ids(&["a".to_string(), "b".to_string()]), "a,b");
    }

    #[test]
    fn decodes_widths_with_bad_values() {
        let widths = decode_widths("a,80,b,wide,c");
        assert_eq!(
            widths,
            vec![
                ColumnWidth::new("a", 80),
                ColumnWidth {
                    column_id: "b".to_string(),
                    width: None
                },
                ColumnWidth {
                    column_id: "c".to_string(),
                    width: None
                },
            ]
        );
        assert!(decode_widths(" ").is_empty());
    }

    #[test]
    fn encodes_widths() {
        let widths = vec![
            ColumnWidth::new("a", 80),
            ColumnWidth {
                column_id: "b".to_string(),
                width: None,
            },
        ];
        assert_eq!(encode_widths(&widths), "a,80,b,0");
    }
}
