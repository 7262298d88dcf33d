//! Column profiles for table views.
//!
//! A view registers its columns in a [`ColumnCatalog`], the user arranges them in named
//! [`ColumnProfile`]s and the [`ColumnManager`] keeps the active profile and the widget in sync.

pub mod catalog;
pub mod column;
pub mod domain;
pub mod edit;
pub mod formatter;
pub mod manager;
pub mod menu;
pub mod profile;
pub mod reconcile;
pub mod store;
pub mod viewer;

pub use catalog::ColumnCatalog;
pub use column::{ColumnDefinition, ColumnStyle, ResolvedColumn};
pub use domain::{ManagerConfig, Message, ProfileError};
pub use edit::EditSnapshot;
pub use formatter::{ValueFormat, ValueFormatter};
pub use manager::ColumnManager;
pub use profile::{ColumnProfile, ProfileId};
pub use viewer::{LiveLayout, ViewerHost};
