use std::sync::Arc;

use crate::column::ColumnDefinition;
use crate::domain::COLUMN_TEXT_SEPARATOR;
use crate::profile::ProfileId;

/// Visibility of a column should become `is_checked`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEdit {
    pub column_id: String,
    pub is_checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileEdit {
    pub profile: ProfileId,
}

/// Item of a checkable list which mixes profiles and columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckedItem {
    Column(ColumnEdit),
    Profile(ProfileEdit),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub text: String,
    pub is_checked: bool,
    pub item: CheckedItem,
}

/// A profile as it is listed in the profile menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub id: ProfileId,
    pub name: String,
    pub column_count: usize,
    pub is_active: bool,
}

impl ProfileEntry {
    /// "name   ·   columns"
    pub fn menu_text(&self) -> String {
        format!("{}{COLUMN_TEXT_SEPARATOR}{}", self.name, self.column_count)
    }
}

impl MenuEntry {
    /// The item a click on this entry applies.
    pub fn toggled(&self) -> CheckedItem {
        match &self.item {
            CheckedItem::Column(edit) => CheckedItem::Column(ColumnEdit {
                column_id: edit.column_id.clone(),
                is_checked: !self.is_checked,
            }),
            CheckedItem::Profile(edit) => CheckedItem::Profile(*edit),
        }
    }
}

/// One row of the "modify columns" list.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnItem {
    pub definition: Arc<ColumnDefinition>,
    pub width: u32,
    pub is_checked: bool,
}
