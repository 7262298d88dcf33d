//! Persistence of all profiles of one view.
//!
//! ```toml
//! isShowCategory = true
//! isShowColumnAnnotations = false
//!
//! [[Profile]]
//! name = "Default"
//! isActiveProfile = true
//! visibleColumnIds = "date,distance"
//! visibleColumnIdsAndWidth = "date,80,distance,60"
//!
//! [[Profile.Column]]
//! columnId = "distance"
//! format = "NUMBER_1_2"
//! ```
//!
//! Loading never fails: a missing or corrupt state is replaced with one default profile.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::domain::ProfileError;
use crate::formatter::ValueFormat;
use crate::profile::{
    ColumnProfile, ColumnProperties, ProfileId, decode_ids, decode_widths, encode_ids,
    encode_widths,
};

/// Per view display flags which are saved together with the profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewFlags {
    pub is_show_category: bool,
    pub is_show_column_annotations: bool,
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self {
            is_show_category: true,
            is_show_column_annotations: false,
        }
    }
}

/// Loaded state, contains at least one profile and `active` is one of them.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    pub profiles: Vec<ColumnProfile>,
    pub active: ProfileId,
    pub flags: ViewFlags,
}

impl ProfileSet {
    pub fn with_default_profile(default_name: &str) -> Self {
        let profile = ColumnProfile::new(default_name);
        Self {
            active: profile.id(),
            profiles: vec![profile],
            flags: ViewFlags::default(),
        }
    }
}

// -------------------- Persisted nodes ---------------------- //

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateNode {
    #[serde(default = "default_true")]
    is_show_category: bool,
    #[serde(default)]
    is_show_column_annotations: bool,
    #[serde(rename = "Profile", default)]
    profiles: Vec<ProfileNode>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileNode {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    is_active_profile: bool,
    #[serde(default)]
    visible_column_ids: String,
    #[serde(default)]
    visible_column_ids_and_width: String,
    #[serde(rename = "Column", default, skip_serializing_if = "Vec::is_empty")]
    columns: Vec<ColumnNode>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnNode {
    #[serde(default)]
    column_id: String,
    // older states used "categoryFormat"
    #[serde(default, alias = "categoryFormat", skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail_format: Option<String>,
}

// -------------------- Loading ---------------------- //

/// Parses a saved state, `None` or a state which cannot be parsed yields the default profile.
pub fn load(state: Option<&str>, default_name: &str) -> ProfileSet {
    let Some(state) = state else {
        debug!("No saved column profiles, creating {default_name:?}");
        return ProfileSet::with_default_profile(default_name);
    };

    let node: StateNode = match toml::from_str(state) {
        Ok(node) => node,
        Err(e) => {
            warn!("Cannot parse saved column profiles, using a default profile: {e}");
            return ProfileSet::with_default_profile(default_name);
        }
    };

    let flags = ViewFlags {
        is_show_category: node.is_show_category,
        is_show_column_annotations: node.is_show_column_annotations,
    };

    let mut profiles = Vec::with_capacity(node.profiles.len());
    let mut active = None;
    for profile_node in node.profiles {
        let is_active = profile_node.is_active_profile;
        let profile = profile_from_node(profile_node, default_name);
        if is_active && active.is_none() {
            active = Some(profile.id());
        }
        profiles.push(profile);
    }

    let Some(first) = profiles.first() else {
        debug!("Saved state has no profiles, creating {default_name:?}");
        let mut set = ProfileSet::with_default_profile(default_name);
        set.flags = flags;
        return set;
    };

    let active = active.unwrap_or_else(|| {
        debug!("No active profile, activating {:?}", first.name);
        first.id()
    });

    info!("Loaded {} column profiles", profiles.len());
    ProfileSet {
        profiles,
        active,
        flags,
    }
}

fn profile_from_node(node: ProfileNode, default_name: &str) -> ColumnProfile {
    let name = if node.name.trim().is_empty() {
        default_name.to_string()
    } else {
        node.name
    };

    let mut profile = ColumnProfile::new(name);
    profile.visible_column_ids = decode_ids(&node.visible_column_ids);
    profile.visible_column_ids_and_width = decode_widths(&node.visible_column_ids_and_width);

    let mut seen = HashSet::new();
    for column in node.columns {
        let column_id = column.column_id.trim();
        if column_id.is_empty() {
            trace!("Profile {:?}: column without id", profile.name);
            continue;
        }

        let format = column.format.as_deref().and_then(ValueFormat::from_name);
        let detail_format = column.detail_format.as_deref().and_then(ValueFormat::from_name);
        if format.is_none() && detail_format.is_none() {
            trace!("Profile {:?}: column {column_id:?} has no valid format", profile.name);
            continue;
        }

        if !seen.insert(column_id.to_string()) {
            trace!("Profile {:?}: column {column_id:?} is saved twice", profile.name);
            continue;
        }

        profile.column_properties.push(ColumnProperties {
            column_id: column_id.to_string(),
            format,
            detail_format,
        });
    }

    profile
}

/// Reads a state file, a missing file is the same as no saved state.
pub fn load_file(path: &Path, default_name: &str) -> Result<ProfileSet, ProfileError> {
    match fs::read_to_string(path) {
        Ok(state) => Ok(load(Some(&state), default_name)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("State file {} does not exist", path.display());
            Ok(load(None, default_name))
        }
        Err(e) => Err(e.into()),
    }
}

// -------------------- Saving ---------------------- //

pub fn save(
    profiles: &[ColumnProfile],
    active: ProfileId,
    flags: ViewFlags,
) -> Result<String, ProfileError> {
    let node = StateNode {
        is_show_category: flags.is_show_category,
        is_show_column_annotations: flags.is_show_column_annotations,
        profiles: profiles
            .iter()
            .map(|profile| profile_to_node(profile, profile.id() == active))
            .collect(),
    };

    Ok(toml::to_string(&node)?)
}

fn profile_to_node(profile: &ColumnProfile, is_active: bool) -> ProfileNode {
    ProfileNode {
        name: profile.name.clone(),
        is_active_profile: is_active,
        visible_column_ids: encode_ids(&profile.visible_column_ids),
        visible_column_ids_and_width: encode_widths(&profile.visible_column_ids_and_width),
        columns: profile
            .column_properties
            .iter()
            .filter(|p| p.format.is_some() || p.detail_format.is_some())
            .map(|p| ColumnNode {
                column_id: p.column_id.clone(),
                format: p.format.map(|f| f.name().to_string()),
                detail_format: p.detail_format.map(|f| f.name().to_string()),
            })
            .collect(),
    }
}

/// Writes a state file, missing parent directories are created.
pub fn save_file(path: &Path, state: &str) -> Result<(), ProfileError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, state)?;
    info!("Saved column profiles to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ColumnWidth;
    use rstest::rstest;

    const STATE: &str = r#"
isShowCategory = false
isShowColumnAnnotations = true

[[Profile]]
name = "Tours"
visibleColumnIds = "date,distance,time"
visibleColumnIdsAndWidth = "date,80,distance,60,time,xx"

[[Profile.Column]]
columnId = "time"
categoryFormat = "TIME_HH_MM"
detailFormat = "TIME_HH_MM_SS"

[[Profile.Column]]
columnId = "distance"
format = "NOT_A_FORMAT"

[[Profile]]
name = "Compact"
isActiveProfile = true
visibleColumnIds = "date"
"#;

    #[test]
    fn loads_profiles() {
        let set = load(Some(STATE), "Default");
        assert_eq!(set.profiles.len(), 2);
        assert!(!set.flags.is_show_category);
        assert!(set.flags.is_show_column_annotations);

        let tours = &set.profiles[0];
        assert_eq!(tours.name, "Tours");
        assert_eq!(tours.visible_column_ids, vec!["date", "distance", "time"]);
        assert_eq!(tours.saved_width("distance"), Some(60));
        assert_eq!(tours.saved_width("time"), None);

        assert_eq!(tours.column_properties.len(), 1);
        let time = tours.properties("time").unwrap();
        assert_eq!(time.format, Some(ValueFormat::TimeHhMm));
        assert_eq!(time.detail_format, Some(ValueFormat::TimeHhMmSs));

        assert_eq!(set.active, set.profiles[1].id());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("isShowCategory = true"))]
    #[case(Some("[[Profile]\nname = "))]
    #[case(Some("Profile = 12"))]
    fn falls_back_to_default_profile(#[case] state: Option<&str>) {
        let set = load(state, "Default");
        assert_eq!(set.profiles.len(), 1);
        assert_eq!(set.profiles[0].name, "Default");
        assert!(set.profiles[0].visible_column_ids.is_empty());
        assert_eq!(set.active, set.profiles[0].id());
    }

    #[test]
    fn first_profile_is_active_without_flag() {
        let set = load(
            Some("[[Profile]]\nname = \"A\"\n\n[[Profile]]\nname = \"B\"\n"),
            "Default",
        );
        assert_eq!(set.active, set.profiles[0].id());
    }

    #[test]
    fn blank_name_gets_default_name() {
        let set = load(Some("[[Profile]]\nname = \"  \"\n"), "Main");
        assert_eq!(set.profiles[0].name, "Main");
    }

    #[test]
    fn repeated_column_properties_keep_the_first() {
        let state = r#"
[[Profile]]
name = "A"

[[Profile.Column]]
columnId = "x"
format = "NUMBER_1_1"

[[Profile.Column]]
columnId = "x"
format = "NUMBER_1_3"

[[Profile.Column]]
format = "NUMBER_1_3"
"#;
        let set = load(Some(state), "Default");
        let profile = &set.profiles[0];
        assert_eq!(profile.column_properties.len(), 1);
        assert_eq!(profile.properties("x").unwrap().format, Some(ValueFormat::Number1));
    }

    #[test]
    fn saves_and_loads_again() {
        let mut first = ColumnProfile::new("First");
        first.set_visible(vec![ColumnWidth::new("b", 40), ColumnWidth::new("a", 90)]);
        first
            .properties_mut("a")
            .set(Some(ValueFormat::CaloriesKcal), false);
        let second = ColumnProfile::new("Second");
        let flags = ViewFlags {
            is_show_category: false,
            is_show_column_annotations: true,
        };

        let state = save(&[first, second.clone()], second.id(), flags).unwrap();
        assert!(state.contains("format = \"CALORIES_KCAL\""));
        assert!(state.contains("visibleColumnIdsAndWidth = \"b,40,a,90\""));

        let set = load(Some(&state), "Default");
        assert_eq!(set.flags, flags);
        assert_eq!(set.profiles.len(), 2);
        assert_eq!(set.profiles[0].visible_column_ids, vec!["b", "a"]);
        assert_eq!(set.profiles[0].saved_width("a"), Some(90));
        assert_eq!(
            set.profiles[0].properties("a").unwrap().format,
            Some(ValueFormat::CaloriesKcal)
        );
        assert_eq!(set.profiles[1].name, "Second");
        assert_eq!(set.active, set.profiles[1].id());
    }

    #[test]
    fn only_active_profile_is_flagged() {
        let a = ColumnProfile::new("A");
        let b = ColumnProfile::new("B");
        let state = save(&[a.clone(), b], a.id(), ViewFlags::default()).unwrap();
        assert_eq!(state.matches("isActiveProfile").count(), 1);
    }
}
