use tracing::debug;

use crate::domain::ProfileError;
use crate::profile::{ColumnProfile, ColumnWidth, ProfileId};

/// Detached copy of all profiles of a manager.
///
/// Edits are not visible until the snapshot is committed, dropping or discarding it leaves the
/// manager unchanged.
#[derive(Debug, Clone)]
pub struct EditSnapshot {
    profiles: Vec<ColumnProfile>,
    active: ProfileId,
    generation: u64,
}

impl EditSnapshot {
    pub(crate) fn new(profiles: Vec<ColumnProfile>, active: ProfileId, generation: u64) -> Self {
        Self {
            profiles,
            active,
            generation,
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn into_parts(self) -> (Vec<ColumnProfile>, ProfileId) {
        (self.profiles, self.active)
    }

    pub fn profiles(&self) -> &[ColumnProfile] {
        &self.profiles
    }

    pub fn active(&self) -> ProfileId {
        self.active
    }

    pub fn profile(&self, id: ProfileId) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    fn profile_mut(&mut self, id: ProfileId) -> Result<&mut ColumnProfile, ProfileError> {
        self.profiles
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| ProfileError::UnknownProfile(id.value().to_string()))
    }

    /// Clones `source` under a new name, the clone is inserted after its source.
    pub fn add_profile(
        &mut self,
        source: ProfileId,
        name: impl Into<String>,
    ) -> Result<ProfileId, ProfileError> {
        let idx = self
            .profiles
            .iter()
            .position(|p| p.id() == source)
            .ok_or_else(|| ProfileError::UnknownProfile(source.value().to_string()))?;

        let profile = self.profiles[idx].duplicate(name);
        let id = profile.id();
        debug!("Cloned profile {:?} into {:?}", self.profiles[idx].name, profile.name);
        self.profiles.insert(idx + 1, profile);
        Ok(id)
    }

    pub fn rename_profile(
        &mut self,
        id: ProfileId,
        name: impl Into<String>,
    ) -> Result<(), ProfileError> {
        self.profile_mut(id)?.name = name.into();
        Ok(())
    }

    /// Removes a profile, when it was the active profile the first remaining profile becomes active.
    pub fn remove_profile(&mut self, id: ProfileId) -> Result<(), ProfileError> {
        let idx = self
            .profiles
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| ProfileError::UnknownProfile(id.value().to_string()))?;
        if self.profiles.len() == 1 {
            return Err(ProfileError::LastProfile);
        }

        let removed = self.profiles.remove(idx);
        debug!("Removed profile {:?}", removed.name);
        if removed.id() == self.active {
            self.active = self.profiles[0].id();
        }
        Ok(())
    }

    pub fn set_active(&mut self, id: ProfileId) -> Result<(), ProfileError> {
        self.profile_mut(id)?;
        self.active = id;
        Ok(())
    }

    pub fn set_visible_columns(
        &mut self,
        id: ProfileId,
        columns: Vec<ColumnWidth>,
    ) -> Result<(), ProfileError> {
        self.profile_mut(id)?.set_visible(columns);
        Ok(())
    }
}
