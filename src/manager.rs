//! Column management for one view.
//!
//! The manager owns the catalog and all profiles, every edit goes to the active profile's raw
//! data and is followed by a reconciliation and a rebuild of the viewer. Before any edit the live
//! layout of the viewer is copied back into the active profile, so columns the user dragged or
//! resized in the widget are not lost.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::catalog::ColumnCatalog;
use crate::column::ColumnDefinition;
use crate::domain::{ManagerConfig, Message, ProfileError};
use crate::edit::EditSnapshot;
use crate::formatter::{ValueFormat, ValueFormatter};
use crate::menu::{CheckedItem, ColumnEdit, ColumnItem, MenuEntry, ProfileEdit, ProfileEntry};
use crate::profile::{ColumnProfile, ColumnWidth, ProfileId};
use crate::reconcile::{self, Reconciler};
use crate::store::{self, ProfileSet, ViewFlags};
use crate::viewer::{RedrawGuard, ViewerHost};

pub struct ColumnManager<H: ViewerHost> {
    config: ManagerConfig,
    catalog: ColumnCatalog,
    /// Never empty.
    profiles: Vec<ColumnProfile>,
    active: ProfileId,
    flags: ViewFlags,
    /// Increased with every commit of an edit snapshot.
    generation: u64,
    host: H,
}

impl<H: ViewerHost> ColumnManager<H> {
    pub fn new(host: H, config: ManagerConfig) -> Self {
        let profiles = ProfileSet::with_default_profile(&config.default_profile_name);
        Self::from_profile_set(host, config, profiles)
    }

    /// Manager with profiles from a saved state, see [`store::load`].
    pub fn from_state(host: H, config: ManagerConfig, state: Option<&str>) -> Self {
        let profiles = store::load(state, &config.default_profile_name);
        Self::from_profile_set(host, config, profiles)
    }

    pub fn from_profile_set(host: H, config: ManagerConfig, profiles: ProfileSet) -> Self {
        let ProfileSet {
            mut profiles,
            mut active,
            flags,
        } = profiles;

        if profiles.is_empty() {
            profiles.push(ColumnProfile::new(config.default_profile_name.as_str()));
        }
        if !profiles.iter().any(|p| p.id() == active) {
            active = profiles[0].id();
        }

        Self {
            config,
            catalog: ColumnCatalog::empty(),
            profiles,
            active,
            flags,
            generation: 0,
            host,
        }
    }

    // -------------------- Accessors ---------------------- //

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn profiles(&self) -> &[ColumnProfile] {
        &self.profiles
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn view_flags(&self) -> ViewFlags {
        self.flags
    }

    fn active_index(&self) -> usize {
        self.profiles
            .iter()
            .position(|p| p.id() == self.active)
            .unwrap_or(0)
    }

    pub fn active_profile(&self) -> &ColumnProfile {
        &self.profiles[self.active_index()]
    }

    pub fn find_profile(&self, name: &str) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    // -------------------- Columns ---------------------- //

    pub fn add_column(
        &mut self,
        definition: ColumnDefinition,
    ) -> Result<Arc<ColumnDefinition>, ProfileError> {
        self.catalog.register(definition)
    }

    /// Removes all columns, resolved columns of every profile are dropped.
    pub fn clear_columns(&mut self) {
        self.catalog.clear();
        for profile in &mut self.profiles {
            profile.invalidate();
        }
    }

    /// Resolves the active profile and builds the viewer, called when all columns are added.
    pub fn create_columns(&mut self) {
        self.rebuild_viewer();
    }

    fn column(&self, column_id: &str) -> Result<Arc<ColumnDefinition>, ProfileError> {
        self.catalog
            .find(column_id)
            .cloned()
            .ok_or_else(|| ProfileError::UnknownColumn(column_id.to_string()))
    }

    /// Label of a column for menus and lists.
    pub fn column_label(&self, definition: &ColumnDefinition, is_with_category: bool) -> String {
        let is_with_category = is_with_category
            && self.config.is_category_available
            && self.flags.is_show_category;
        definition.label_text(is_with_category)
    }

    pub fn set_show_category(&mut self, is_show_category: bool) {
        self.flags.is_show_category = is_show_category;
    }

    pub fn set_show_column_annotations(&mut self, is_show_annotations: bool) {
        if self.flags.is_show_column_annotations == is_show_annotations {
            return;
        }
        self.snapshot_from_viewer();
        self.flags.is_show_column_annotations = is_show_annotations;
        self.rebuild_viewer();
    }

    // -------------------- Viewer ---------------------- //

    fn rebuild_viewer(&mut self) {
        let idx = self.active_index();
        rebuild(
            &self.catalog,
            &self.config,
            self.flags,
            &mut self.profiles[idx],
            &mut self.host,
        );
    }

    /// Copies the live column order and widths into the active profile.
    ///
    /// Returns `false` when there is no viewer or it shows nothing of the active profile.
    pub fn snapshot_from_viewer(&mut self) -> bool {
        let Some(layout) = self.host.live_layout() else {
            return false;
        };

        let minimum_width = self.config.minimum_column_width;
        let idx = self.active_index();
        let profile = &mut self.profiles[idx];

        let snapshot: Vec<ColumnWidth> = layout
            .order
            .iter()
            .filter_map(|&create_index| {
                let column = profile
                    .visible_columns()
                    .iter()
                    .find(|c| c.create_index == create_index)?;
                let definition = &column.definition;
                let width = if definition.is_hidden {
                    0
                } else {
                    match layout.width(create_index) {
                        0 => definition.default_width.max(minimum_width),
                        width => width,
                    }
                };
                Some(ColumnWidth::new(column.id(), width))
            })
            .collect();

        if snapshot.is_empty() {
            return false;
        }

        trace!("Profile {:?}: live layout {snapshot:?}", profile.name);
        profile.set_visible(snapshot);
        true
    }

    // -------------------- Profiles ---------------------- //

    pub fn switch_profile(&mut self, id: ProfileId) -> Result<bool, ProfileError> {
        if !self.profiles.iter().any(|p| p.id() == id) {
            return Err(ProfileError::UnknownProfile(id.value().to_string()));
        }
        if id == self.active {
            return Ok(false);
        }

        self.snapshot_from_viewer();
        self.active = id;
        info!("Switched to profile {:?}", self.active_profile().name);
        self.rebuild_viewer();
        Ok(true)
    }

    pub fn switch_profile_by_name(&mut self, name: &str) -> Result<bool, ProfileError> {
        let id = self
            .find_profile(name)
            .map(|p| p.id())
            .ok_or_else(|| ProfileError::UnknownProfile(name.to_string()))?;
        self.switch_profile(id)
    }

    /// Profiles ordered by name, the column count only includes columns of the catalog.
    pub fn profiles_sorted(&self) -> Vec<ProfileEntry> {
        let mut entries: Vec<ProfileEntry> = self
            .profiles
            .iter()
            .map(|p| ProfileEntry {
                id: p.id(),
                name: p.name.clone(),
                column_count: self.column_count(p),
                is_active: p.id() == self.active,
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    fn column_count(&self, profile: &ColumnProfile) -> usize {
        let mut seen = HashSet::new();
        profile
            .visible_column_ids
            .iter()
            .filter(|id| self.catalog.contains(id) && seen.insert(id.as_str()))
            .count()
    }

    // -------------------- Column edits ---------------------- //

    /// Shows or hides a column of the active profile.
    ///
    /// Locked columns and the last visible column cannot be hidden, `Ok(false)` is returned when
    /// nothing changed.
    pub fn set_column_visible(
        &mut self,
        column_id: &str,
        is_visible: bool,
    ) -> Result<bool, ProfileError> {
        let definition = self.column(column_id)?;
        self.snapshot_from_viewer();

        let idx = self.active_index();
        let profile = &mut self.profiles[idx];
        if profile.is_visible(column_id) == is_visible {
            return Ok(false);
        }

        if is_visible {
            profile.visible_column_ids.push(column_id.to_string());
            if profile.saved_width(column_id).is_none() {
                profile.set_saved_width(column_id, definition.default_width);
            }
        } else {
            if !definition.can_modify_visibility() {
                debug!("Column {column_id:?} is always visible");
                return Ok(false);
            }
            let catalog = &self.catalog;
            let visible_count = profile
                .visible_column_ids
                .iter()
                .filter(|id| catalog.contains(id))
                .count();
            if visible_count <= 1 {
                debug!("Column {column_id:?} is the last visible column");
                return Ok(false);
            }
            profile.visible_column_ids.retain(|id| id != column_id);
        }

        self.rebuild_viewer();
        Ok(true)
    }

    pub fn hide_column(&mut self, column_id: &str) -> Result<bool, ProfileError> {
        self.set_column_visible(column_id, false)
    }

    /// Appends a column to the active profile.
    pub fn add_column_to_profile(&mut self, column_id: &str) -> Result<bool, ProfileError> {
        self.set_column_visible(column_id, true)
    }

    /// Moves a visible column, indexes after the last column move it to the end.
    pub fn reorder_column(
        &mut self,
        column_id: &str,
        new_index: usize,
    ) -> Result<bool, ProfileError> {
        let definition = self.column(column_id)?;
        if !definition.is_movable {
            return Ok(false);
        }
        self.snapshot_from_viewer();

        let idx = self.active_index();
        let ids = &mut self.profiles[idx].visible_column_ids;
        let Some(old_index) = ids.iter().position(|id| id == column_id) else {
            return Ok(false);
        };
        let id = ids.remove(old_index);
        let new_index = new_index.min(ids.len());
        ids.insert(new_index, id);
        if new_index == old_index {
            return Ok(false);
        }

        self.rebuild_viewer();
        Ok(true)
    }

    pub fn set_column_width(&mut self, column_id: &str, width: u32) -> Result<bool, ProfileError> {
        let definition = self.column(column_id)?;
        if !definition.is_resizable || !self.active_profile().is_visible(column_id) {
            return Ok(false);
        }
        self.snapshot_from_viewer();

        let idx = self.active_index();
        self.profiles[idx].set_saved_width(column_id, width);
        self.rebuild_viewer();
        Ok(true)
    }

    // -------------------- Value formats ---------------------- //

    /// Chooses the format of a column in the active profile, `None` restores the column default.
    ///
    /// The viewer is not rebuilt, only the header of the column is updated.
    pub fn set_value_format(
        &mut self,
        column_id: &str,
        format: Option<ValueFormat>,
        is_detail: bool,
    ) -> Result<bool, ProfileError> {
        let definition = self.column(column_id)?;
        if let Some(format) = format
            && !definition.offers_format(format)
        {
            debug!("Column {column_id:?} does not offer {format}");
            return Ok(false);
        }

        let idx = self.active_index();
        let profile = &mut self.profiles[idx];
        profile.properties_mut(column_id).set(format, is_detail);
        let resolved = reconcile::resolve_format(&definition, profile, is_detail);

        if let Some(column) = profile.visible_column_mut(column_id) {
            if is_detail {
                column.detail_format = resolved;
            } else {
                column.format = resolved;
            }
            self.host.update_column_header(column);
        }
        Ok(true)
    }

    /// Formatter of a column in a profile, falls back to the column and then the global default.
    pub fn resolve_formatter(
        definition: &ColumnDefinition,
        profile: &ColumnProfile,
        is_detail: bool,
    ) -> &'static dyn ValueFormatter {
        reconcile::resolve_formatter(definition, profile, is_detail)
    }

    // -------------------- Bulk edits ---------------------- //

    pub fn show_all_columns(&mut self) {
        self.snapshot_from_viewer();

        let idx = self.active_index();
        let mut host = RedrawGuard::new(&mut self.host);
        let profile = &mut self.profiles[idx];

        let columns: Vec<ColumnWidth> = self
            .catalog
            .all()
            .iter()
            .map(|definition| {
                let width = profile
                    .visible_column(definition.id())
                    .map(|c| c.width)
                    .or_else(|| profile.saved_width(definition.id()))
                    .unwrap_or(definition.default_width);
                ColumnWidth::new(definition.id(), width)
            })
            .collect();
        debug!("Profile {:?}: showing {} columns", profile.name, columns.len());
        profile.set_visible(columns);

        rebuild(&self.catalog, &self.config, self.flags, profile, &mut *host);
    }

    pub fn show_default_columns(&mut self) {
        let idx = self.active_index();
        let mut host = RedrawGuard::new(&mut self.host);
        let profile = &mut self.profiles[idx];

        let columns: Vec<ColumnWidth> = self
            .catalog
            .default_columns()
            .map(|definition| ColumnWidth::new(definition.id(), definition.default_width))
            .collect();
        debug!("Profile {:?}: showing default columns", profile.name);
        profile.set_visible(columns);

        rebuild(&self.catalog, &self.config, self.flags, profile, &mut *host);
    }

    /// Resizes all columns to their content.
    pub fn fit_all_columns(&mut self) {
        let idx = self.active_index();
        let is_column0_visible = self.host.is_column0_visible();
        let mut host = RedrawGuard::new(&mut self.host);

        for column in self.profiles[idx].visible_columns() {
            if column.create_index == 0 && !is_column0_visible {
                host.set_column_width(0, 0);
            } else {
                host.pack_column(column.create_index);
            }
        }
    }

    // -------------------- Lists ---------------------- //

    /// All columns, the visible columns first in displayed order, then the others in catalog
    /// order.
    pub fn rearranged_columns(&self) -> Vec<ColumnItem> {
        let profile = self.active_profile();
        let mut items: Vec<ColumnItem> = match self.host.live_layout() {
            Some(layout) => layout
                .order
                .iter()
                .filter_map(|&create_index| {
                    let column = profile
                        .visible_columns()
                        .iter()
                        .find(|c| c.create_index == create_index)?;
                    let width = match layout.width(create_index) {
                        0 => column.width,
                        width => width,
                    };
                    Some(ColumnItem {
                        definition: Arc::clone(&column.definition),
                        width,
                        is_checked: true,
                    })
                })
                .collect(),
            None => profile
                .visible_columns()
                .iter()
                .map(|column| ColumnItem {
                    definition: Arc::clone(&column.definition),
                    width: column.width,
                    is_checked: true,
                })
                .collect(),
        };

        let hidden: Vec<ColumnItem> = self
            .catalog
            .all()
            .iter()
            .filter(|definition| !items.iter().any(|i| i.definition.id() == definition.id()))
            .map(|definition| ColumnItem {
                definition: Arc::clone(definition),
                width: definition.default_width,
                is_checked: false,
            })
            .collect();
        items.extend(hidden);
        items
    }

    /// Entries of the column menu: profiles by name, then every column.
    pub fn checked_items(&self) -> Vec<MenuEntry> {
        let profile = self.active_profile();

        let profiles = self.profiles_sorted().into_iter().map(|entry| MenuEntry {
            text: entry.menu_text(),
            is_checked: entry.is_active,
            item: CheckedItem::Profile(ProfileEdit { profile: entry.id }),
        });

        let columns = self.catalog.all().iter().map(|definition| {
            let is_visible = profile.is_visible(definition.id());
            MenuEntry {
                text: self.column_label(definition, true),
                is_checked: is_visible,
                item: CheckedItem::Column(ColumnEdit {
                    column_id: definition.id().to_string(),
                    is_checked: is_visible,
                }),
            }
        });

        profiles.chain(columns).collect()
    }

    pub fn apply_checked_item(&mut self, item: &CheckedItem) -> Result<bool, ProfileError> {
        match item {
            CheckedItem::Column(edit) => self.set_column_visible(&edit.column_id, edit.is_checked),
            CheckedItem::Profile(edit) => self.switch_profile(edit.profile),
        }
    }

    // -------------------- Profile editing ---------------------- //

    /// Copy of all profiles which can be edited without affecting the manager.
    pub fn begin_edit(&mut self) -> EditSnapshot {
        self.snapshot_from_viewer();
        let profiles = self
            .profiles
            .iter()
            .map(|p| {
                let mut copy = p.clone();
                copy.invalidate();
                copy
            })
            .collect();
        EditSnapshot::new(profiles, self.active, self.generation)
    }

    /// Replaces all profiles with the edited ones and rebuilds the viewer.
    pub fn commit(&mut self, snapshot: EditSnapshot) -> Result<(), ProfileError> {
        if snapshot.generation() != self.generation {
            return Err(ProfileError::StaleSnapshot);
        }

        let (profiles, active) = snapshot.into_parts();
        let Some(first) = profiles.first() else {
            return Err(ProfileError::LastProfile);
        };
        self.active = if profiles.iter().any(|p| p.id() == active) {
            active
        } else {
            first.id()
        };
        self.profiles = profiles;
        self.generation += 1;
        info!(
            "Committed {} profiles, active profile {:?}",
            self.profiles.len(),
            self.active_profile().name
        );

        self.rebuild_viewer();
        Ok(())
    }

    pub fn discard(&self, snapshot: EditSnapshot) {
        debug!("Discarded edit of {} profiles", snapshot.profiles().len());
    }

    // -------------------- Persistence ---------------------- //

    /// Serialized state of all profiles with the live layout of the active profile.
    pub fn save_state(&mut self) -> Result<String, ProfileError> {
        self.snapshot_from_viewer();
        store::save(&self.profiles, self.active, self.flags)
    }

    // -------------------- Messages ---------------------- //

    /// Applies a message, returns `false` when it did not change anything.
    pub fn update(&mut self, message: Message) -> Result<bool, ProfileError> {
        trace!("Update: {message:?}");
        match message {
            Message::ShowAllColumns => {
                self.show_all_columns();
                Ok(true)
            }
            Message::ShowDefaultColumns => {
                self.show_default_columns();
                Ok(true)
            }
            Message::ShowColumn(id) => self.set_column_visible(&id, true),
            Message::HideColumn(id) => self.set_column_visible(&id, false),
            Message::MoveColumn(id, index) => self.reorder_column(&id, index),
            Message::ResizeColumn(id, width) => self.set_column_width(&id, width),
            Message::SetFormat {
                column_id,
                format,
                is_detail,
            } => self.set_value_format(&column_id, Some(format), is_detail),
            Message::SwitchProfile(name) => self.switch_profile_by_name(&name),
            Message::FitAllColumns => {
                self.fit_all_columns();
                Ok(true)
            }
            Message::CloneProfile { source, name } => {
                let mut snapshot = self.begin_edit();
                let source = snapshot
                    .find_by_name(&source)
                    .map(|p| p.id())
                    .ok_or(ProfileError::UnknownProfile(source))?;
                snapshot.add_profile(source, name)?;
                self.commit(snapshot)?;
                Ok(true)
            }
            Message::RemoveProfile(name) => {
                let mut snapshot = self.begin_edit();
                let id = snapshot
                    .find_by_name(&name)
                    .map(|p| p.id())
                    .ok_or(ProfileError::UnknownProfile(name))?;
                snapshot.remove_profile(id)?;
                self.commit(snapshot)?;
                Ok(true)
            }
        }
    }
}

fn rebuild<H: ViewerHost>(
    catalog: &ColumnCatalog,
    config: &ManagerConfig,
    flags: ViewFlags,
    profile: &mut ColumnProfile,
    host: &mut H,
) {
    let is_rewritten = Reconciler::new(catalog)
        .with_minimum_width(config.minimum_column_width)
        .with_annotations(flags.is_show_column_annotations)
        .reconcile(profile);
    if is_rewritten {
        debug!(
            "Profile {:?}: visible columns set to {:?}",
            profile.name, profile.visible_column_ids
        );
    }
    host.recreate_viewer(profile.visible_columns());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnStyle, ResolvedColumn};
    use crate::viewer::LiveLayout;

    #[derive(Default)]
    struct RecordingHost {
        columns: Vec<ResolvedColumn>,
        live: Option<LiveLayout>,
        recreated: usize,
        redraw: Vec<bool>,
        packed: Vec<usize>,
        resized: Vec<(usize, u32)>,
        headers: Vec<String>,
        is_column0_hidden: bool,
    }

    impl RecordingHost {
        fn ids(&self) -> Vec<&str> {
            self.columns.iter().map(|c| c.id()).collect()
        }

        /// Simulates the user dragging and resizing columns in the widget.
        fn drag(&mut self, order: Vec<usize>, widths: Vec<u32>) {
            self.live = Some(LiveLayout { order, widths });
        }
    }

    impl ViewerHost for RecordingHost {
        fn recreate_viewer(&mut self, columns: &[ResolvedColumn]) {
            self.columns = columns.to_vec();
            self.recreated += 1;
            self.live = Some(LiveLayout {
                order: (0..columns.len()).collect(),
                widths: columns.iter().map(|c| c.width).collect(),
            });
        }

        fn live_layout(&self) -> Option<LiveLayout> {
            self.live.clone()
        }

        fn update_column_header(&mut self, column: &ResolvedColumn) {
            self.headers.push(column.id().to_string());
        }

        fn is_column0_visible(&self) -> bool {
            !self.is_column0_hidden
        }

        fn set_redraw(&mut self, is_enabled: bool) {
            self.redraw.push(is_enabled);
        }

        fn pack_column(&mut self, create_index: usize) {
            self.packed.push(create_index);
        }

        fn set_column_width(&mut self, create_index: usize, width: u32) {
            self.resized.push((create_index, width));
        }
    }

    fn column(id: &str) -> ColumnDefinition {
        ColumnDefinition::new(id, ColumnStyle::Lead)
            .label(id.to_uppercase())
            .default_width(40)
    }

    fn time_column() -> ColumnDefinition {
        column("time")
            .available_formats(vec![ValueFormat::TimeHh, ValueFormat::TimeHhMm])
            .default_format(ValueFormat::TimeHh)
    }

    fn setup(state: Option<&str>) -> ColumnManager<RecordingHost> {
        let mut manager =
            ColumnManager::from_state(RecordingHost::default(), ManagerConfig::default(), state);
        for definition in [
            column("date").is_visibility_locked(true).is_default_column(true),
            column("title").is_default_column(true),
            column("distance"),
            time_column(),
        ] {
            manager.add_column(definition).unwrap();
        }
        manager.create_columns();
        manager
    }

    #[test]
    fn first_start_shows_default_columns() {
        let manager = setup(None);
        assert_eq!(manager.host().ids(), vec!["date", "title"]);
        assert_eq!(manager.active_profile().name, "Default");
        assert_eq!(manager.active_profile().visible_column_ids, vec!["date", "title"]);
    }

    #[test]
    fn duplicate_column_is_an_error() {
        let mut manager = setup(None);
        assert!(matches!(
            manager.add_column(column("title")),
            Err(ProfileError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn locked_and_last_columns_stay_visible() {
        let mut manager = setup(None);
        assert!(!manager.hide_column("date").unwrap());

        let mut only_date = setup(Some("[[Profile]]\nname = \"p\"\nvisibleColumnIds = \"date\"\n"));
        assert!(!only_date.hide_column("date").unwrap());

        let mut single = setup(Some("[[Profile]]\nname = \"p\"\nvisibleColumnIds = \"date,title\"\n"));
        assert!(single.hide_column("title").unwrap());
        assert_eq!(single.host().ids(), vec!["date"]);

        let mut unlocked = ColumnManager::new(RecordingHost::default(), ManagerConfig::default());
        unlocked.add_column(column("a")).unwrap();
        unlocked.add_column(column("b")).unwrap();
        unlocked.create_columns();
        assert_eq!(unlocked.host().ids(), vec!["a"]);
        assert!(!unlocked.hide_column("a").unwrap());
    }

    #[test]
    fn hide_and_show_columns() {
        let mut manager = setup(None);
        assert!(manager.add_column_to_profile("distance").unwrap());
        assert_eq!(manager.host().ids(), vec!["date", "title", "distance"]);
        assert!(!manager.add_column_to_profile("distance").unwrap());

        assert!(manager.hide_column("title").unwrap());
        assert_eq!(manager.host().ids(), vec!["date", "distance"]);
        assert!(matches!(
            manager.hide_column("nope"),
            Err(ProfileError::UnknownColumn(_))
        ));
    }

    #[test]
    fn reorder_and_resize() {
        let mut manager = setup(None);
        manager.add_column_to_profile("distance").unwrap();

        assert!(manager.reorder_column("distance", 0).unwrap());
        assert_eq!(manager.host().ids(), vec!["distance", "date", "title"]);
        assert!(manager.reorder_column("distance", 99).unwrap());
        assert_eq!(manager.host().ids(), vec!["date", "title", "distance"]);
        assert!(!manager.reorder_column("time", 0).unwrap());

        assert!(manager.set_column_width("title", 90).unwrap());
        assert_eq!(manager.active_profile().visible_column("title").unwrap().width, 90);
        manager.set_column_width("title", 2).unwrap();
        assert_eq!(manager.active_profile().visible_column("title").unwrap().width, 40);
        assert!(!manager.set_column_width("time", 50).unwrap());
    }

    #[test]
    fn live_layout_is_saved() {
        let mut manager = setup(None);
        manager.add_column_to_profile("distance").unwrap();

        // user moved distance to the front and resized columns
        manager.host_mut().drag(vec![2, 0, 1], vec![70, 0, 55]);
        let state = manager.save_state().unwrap();

        let profile = manager.active_profile();
        assert_eq!(profile.visible_column_ids, vec!["distance", "date", "title"]);
        assert_eq!(profile.saved_width("distance"), Some(55));
        assert_eq!(profile.saved_width("date"), Some(70));
        assert_eq!(profile.saved_width("title"), Some(40));
        assert!(state.contains("visibleColumnIdsAndWidth = \"distance,55,date,70,title,40\""));
    }

    #[test]
    fn switching_keeps_outgoing_layout() {
        let state = "[[Profile]]\nname = \"a\"\nisActiveProfile = true\n\n[[Profile]]\nname = \"b\"\nvisibleColumnIds = \"time\"\n";
        let mut manager = setup(Some(state));
        assert_eq!(manager.host().ids(), vec!["date", "title"]);

        manager.host_mut().drag(vec![1, 0], vec![33, 44]);
        assert!(manager.switch_profile_by_name("b").unwrap());
        assert_eq!(manager.host().ids(), vec!["time", "date"]);

        let a = manager.find_profile("a").unwrap();
        assert_eq!(a.visible_column_ids, vec!["title", "date"]);
        assert_eq!(a.saved_width("title"), Some(44));

        assert!(!manager.switch_profile_by_name("b").unwrap());
        assert!(matches!(
            manager.switch_profile_by_name("c"),
            Err(ProfileError::UnknownProfile(_))
        ));
    }

    #[test]
    fn show_all_suspends_redraw() {
        let mut manager = setup(None);
        manager.set_column_width("title", 99).unwrap();
        manager.show_all_columns();

        assert_eq!(manager.host().ids(), vec!["date", "title", "distance", "time"]);
        assert_eq!(manager.host().redraw, vec![false, true]);
        assert_eq!(manager.active_profile().visible_column("title").unwrap().width, 99);

        manager.show_default_columns();
        assert_eq!(manager.host().ids(), vec!["date", "title"]);
        assert_eq!(manager.host().redraw, vec![false, true, false, true]);
    }

    #[test]
    fn value_format_updates_header_only() {
        let mut manager = setup(Some("[[Profile]]\nname = \"p\"\nvisibleColumnIds = \"time\"\n"));
        let recreated = manager.host().recreated;

        assert!(
            manager
                .set_value_format("time", Some(ValueFormat::TimeHhMm), false)
                .unwrap()
        );
        assert_eq!(manager.host().recreated, recreated);
        assert_eq!(manager.host().headers, vec!["time"]);
        let time = manager.active_profile().visible_column("time").unwrap();
        assert_eq!(time.format, Some(ValueFormat::TimeHhMm));

        assert!(
            !manager
                .set_value_format("time", Some(ValueFormat::CaloriesCal), false)
                .unwrap()
        );
        manager.set_value_format("time", None, false).unwrap();
        let time = manager.active_profile().visible_column("time").unwrap();
        assert_eq!(time.format, Some(ValueFormat::TimeHh));
    }

    #[test]
    fn formatter_falls_back_to_column_default() {
        let mut profile = ColumnProfile::new("p");
        profile
            .properties_mut("time")
            .set(Some(ValueFormat::CaloriesCal), false);
        let formatter = ColumnManager::<RecordingHost>::resolve_formatter(&time_column(), &profile, false);
        assert_eq!(formatter.print_long(3 * 3600), "3");
    }

    #[test]
    fn fit_columns_skips_invisible_column0() {
        let mut manager = setup(None);
        manager.fit_all_columns();
        assert_eq!(manager.host().packed, vec![0, 1]);

        manager.host_mut().is_column0_hidden = true;
        manager.fit_all_columns();
        assert_eq!(manager.host().packed, vec![0, 1, 1]);
        assert_eq!(manager.host().resized, vec![(0, 0)]);
        assert_eq!(manager.host().redraw, vec![false, true, false, true]);
    }

    #[test]
    fn rearranged_columns_list_visible_first() {
        let mut manager = setup(None);
        manager.host_mut().drag(vec![1, 0], vec![50, 60]);

        let rearranged = manager.rearranged_columns();
        let items: Vec<(&str, u32, bool)> = rearranged
            .iter()
            .map(|i| (i.definition.id(), i.width, i.is_checked))
            .collect();
        assert_eq!(
            items,
            vec![
                ("title", 60, true),
                ("date", 50, true),
                ("distance", 40, false),
                ("time", 40, false),
            ]
        );
    }

    #[test]
    fn menu_items_dispatch() {
        let state = "[[Profile]]\nname = \"zeta\"\n\n[[Profile]]\nname = \"alpha\"\nvisibleColumnIds = \"title,time\"\n";
        let mut manager = setup(Some(state));

        let entries = manager.checked_items();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].text, "alpha   \u{00b7}   2");
        assert!(!entries[0].is_checked);
        assert!(entries[1].is_checked);

        let distance = entries
            .iter()
            .find(|e| e.text == "DISTANCE")
            .unwrap()
            .toggled();
        assert!(manager.apply_checked_item(&distance).unwrap());
        assert!(manager.active_profile().is_visible("distance"));

        let alpha = entries[0].toggled();
        assert!(manager.apply_checked_item(&alpha).unwrap());
        assert_eq!(manager.active_profile().name, "alpha");
        assert_eq!(manager.host().ids(), vec!["title", "time", "date"]);
    }

    #[test]
    fn edit_is_committed_or_discarded() {
        let mut manager = setup(None);
        let active = manager.active_profile().id();

        let mut snapshot = manager.begin_edit();
        let copy = snapshot.add_profile(active, "Copy").unwrap();
        snapshot.rename_profile(active, "Renamed").unwrap();
        manager.discard(snapshot);
        assert_eq!(manager.profiles().len(), 1);
        assert_eq!(manager.active_profile().name, "Default");

        let mut snapshot = manager.begin_edit();
        let copy2 = snapshot.add_profile(active, "Copy").unwrap();
        assert_ne!(copy, copy2);
        snapshot
            .set_visible_columns(copy2, vec![ColumnWidth::new("distance", 60)])
            .unwrap();
        snapshot.set_active(copy2).unwrap();
        manager.commit(snapshot).unwrap();

        assert_eq!(manager.profiles().len(), 2);
        assert_eq!(manager.active_profile().name, "Copy");
        assert_eq!(manager.host().ids(), vec!["distance", "date"]);
    }

    #[test]
    fn stale_snapshot_is_rejected() {
        let mut manager = setup(None);
        let old = manager.begin_edit();
        let newer = manager.begin_edit();
        manager.commit(newer).unwrap();
        assert!(matches!(manager.commit(old), Err(ProfileError::StaleSnapshot)));
    }

    #[test]
    fn clear_columns_invalidates_profiles() {
        let mut manager = setup(None);
        manager.clear_columns();
        assert!(manager.active_profile().visible_columns().is_empty());
        assert!(manager.catalog().is_empty());

        manager.add_column(column("other")).unwrap();
        manager.create_columns();
        assert_eq!(manager.host().ids(), Vec::<&str>::new());
    }

    #[test]
    fn messages_clone_and_remove_profiles() {
        let mut manager = setup(None);
        assert!(
            manager
                .update(Message::CloneProfile {
                    source: "Default".to_string(),
                    name: "Second".to_string(),
                })
                .unwrap()
        );
        assert_eq!(manager.profiles().len(), 2);

        manager.update(Message::SwitchProfile("Second".to_string())).unwrap();
        manager.update(Message::RemoveProfile("Second".to_string())).unwrap();
        assert_eq!(manager.profiles().len(), 1);
        assert_eq!(manager.active_profile().name, "Default");
        assert!(matches!(
            manager.update(Message::RemoveProfile("Default".to_string())),
            Err(ProfileError::LastProfile)
        ));
    }

    #[test]
    fn annotations_and_labels() {
        let mut manager = setup(Some("[[Profile]]\nname = \"p\"\nvisibleColumnIds = \"time\"\n"));
        manager.set_show_column_annotations(true);
        assert_eq!(manager.host().columns[0].header, "TIME \u{0192}");

        let definition = column("x").category("Motion");
        assert_eq!(manager.column_label(&definition, true), "X");
    }

    #[test]
    fn category_follows_show_category_flag() {
        let config = ManagerConfig::default().is_category_available(true);
        let mut manager = ColumnManager::new(RecordingHost::default(), config);
        assert!(manager.config().is_category_available);
        assert!(manager.view_flags().is_show_category);

        let definition = column("x").category("Motion");
        assert_eq!(manager.column_label(&definition, true), "Motion   \u{00bb}   X");
        assert_eq!(manager.column_label(&definition, false), "X");

        manager.set_show_category(false);
        assert!(!manager.view_flags().is_show_category);
        assert_eq!(manager.column_label(&definition, true), "X");

        manager.set_show_category(true);
        assert_eq!(manager.column_label(&definition, true), "Motion   \u{00bb}   X");
    }

    #[test]
    fn profile_menu_counts_known_columns_once() {
        let state = "[[Profile]]\nname = \"a\"\nisActiveProfile = true\n\n[[Profile]]\nname = \"b\"\nvisibleColumnIds = \"title,gone,title,time\"\n";
        let mut manager = setup(Some(state));

        // "b" is not resolved yet, its raw ids still contain the unknown and repeated ones
        let entries = manager.profiles_sorted();
        assert_eq!(entries[1].name, "b");
        assert_eq!(entries[1].column_count, 2);
        assert_eq!(entries[1].menu_text(), "b   \u{00b7}   2");

        manager.switch_profile_by_name("b").unwrap();
        let entries = manager.profiles_sorted();
        assert_eq!(entries[1].column_count, manager.active_profile().visible_columns().len());
    }

    #[test]
    fn edit_snapshot_looks_up_profiles_by_id() {
        let mut manager = setup(None);
        let active = manager.active_profile().id();
        let snapshot = manager.begin_edit();

        let profile = snapshot.profile(active).unwrap();
        assert_eq!(profile.name, "Default");
        assert_eq!(profile.visible_column_ids, vec!["date", "title"]);
        assert!(profile.visible_columns().is_empty());
        assert!(snapshot.profile(ColumnProfile::new("other").id()).is_none());
        manager.discard(snapshot);
    }
}
