use std::fmt;
use std::io::Error;

use derive_setters::Setters;

use crate::formatter::ValueFormat;

/// Floor for a visible column width, a width of 0 was seen in saved states and must not survive.
pub const MINIMUM_COLUMN_WIDTH: u32 = 7;

pub const DEFAULT_PROFILE_NAME: &str = "Default";

/// Separator of the delimiter encoded id/width arrays in the persisted state.
pub const ARRAY_SEPARATOR: &str = ",";

pub const COLUMN_CATEGORY_SEPARATOR: &str = "   \u{00bb}   ";
pub const COLUMN_TEXT_SEPARATOR: &str = "   \u{00b7}   ";

/// Appended to a header when the column has a selectable value format.
pub const ANNOTATION_FORMATTING: &str = "\u{0192}";

#[derive(Debug)]
pub enum ProfileError {
    IoError(Error),
    TomlError(toml::ser::Error),
    DuplicateColumn(String),
    /// Empty, padded or containing the array separator, such an id cannot be saved.
    InvalidColumnId(String),
    UnknownColumn(String),
    UnknownProfile(String),
    UnknownFormat(String),
    LastProfile,
    StaleSnapshot,
}

impl From<Error> for ProfileError {
    fn from(err: Error) -> Self {
        ProfileError::IoError(err)
    }
}

impl From<toml::ser::Error> for ProfileError {
    fn from(err: toml::ser::Error) -> Self {
        ProfileError::TomlError(err)
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::IoError(e) => write!(f, "I/O error: {e}"),
            ProfileError::TomlError(e) => write!(f, "cannot serialize column profiles: {e}"),
            ProfileError::DuplicateColumn(id) => {
                write!(f, "column \"{id}\" is already registered")
            }
            ProfileError::InvalidColumnId(id) => {
                write!(f, "\"{id}\" cannot be used as column id")
            }
            ProfileError::UnknownColumn(id) => write!(f, "column \"{id}\" is not available"),
            ProfileError::UnknownProfile(name) => write!(f, "profile \"{name}\" does not exist"),
            ProfileError::UnknownFormat(name) => write!(f, "\"{name}\" is not a value format"),
            ProfileError::LastProfile => write!(f, "the last profile cannot be removed"),
            ProfileError::StaleSnapshot => {
                write!(f, "profiles were changed after this edit was started")
            }
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProfileError::IoError(e) => Some(e),
            ProfileError::TomlError(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Setters)]
pub struct ManagerConfig {
    pub minimum_column_width: u32,
    #[setters(into)]
    pub default_profile_name: String,
    /// Columns are grouped by category in labels and menus.
    pub is_category_available: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            minimum_column_width: MINIMUM_COLUMN_WIDTH,
            default_profile_name: DEFAULT_PROFILE_NAME.to_string(),
            is_category_available: false,
        }
    }
}

/// Edits which can be sent to a `ColumnManager`.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    ShowAllColumns,
    ShowDefaultColumns,
    ShowColumn(String),
    HideColumn(String),
    MoveColumn(String, usize),
    ResizeColumn(String, u32),
    SetFormat {
        column_id: String,
        format: ValueFormat,
        is_detail: bool,
    },
    SwitchProfile(String),
    FitAllColumns,
    CloneProfile { source: String, name: String },
    RemoveProfile(String),
}
