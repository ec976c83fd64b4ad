//!
//! # Hardware profiles
//!
//! Root device placement hints per class of bare metal hardware.
//! The catalog is built once and handed to whoever needs it.
//!
use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// profile used when no other profile matches
pub const DEFAULT_PROFILE_NAME: &str = "unknown";

/// profile without any configuration
pub const EMPTY_PROFILE_NAME: &str = "empty";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("no hardware profile named {0:?}")]
    NotFound(String),
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct RootDeviceHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    /// SCSI bus address, `host:channel:target:lun`
    #[serde(rename = "hctl", skip_serializing_if = "Option::is_none")]
    pub hctl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size_gigabytes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotational: Option<bool>,
}

impl RootDeviceHints {
    fn device(name: &str) -> Self {
        Self {
            device_name: Some(name.to_owned()),
            ..Default::default()
        }
    }

    fn hctl(address: &str) -> Self {
        Self {
            hctl: Some(address.to_owned()),
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub root_device_hints: RootDeviceHints,
}

impl Profile {
    pub fn new(name: impl Into<String>, root_device_hints: RootDeviceHints) -> Self {
        Self {
            name: name.into(),
            root_device_hints,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: HashMap<String, Profile>,
}

impl ProfileCatalog {
    /// profiles known out of the box
    pub fn builtin() -> Self {
        [
            Profile::new(DEFAULT_PROFILE_NAME, RootDeviceHints::device("/dev/sda")),
            Profile::new("libvirt", RootDeviceHints::device("/dev/vda")),
            Profile::new("dell", RootDeviceHints::hctl("0:0:0:0")),
            Profile::new("dell-raid", RootDeviceHints::hctl("0:2:0:0")),
            Profile::new("openstack", RootDeviceHints::device("/dev/vdb")),
            Profile::new(EMPTY_PROFILE_NAME, RootDeviceHints::default()),
        ]
        .into_iter()
        .collect()
    }

    pub fn get(&self, name: &str) -> Result<&Profile, ProfileError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_owned()))
    }

    /// the fallback profile, if this catalog has one
    pub fn default_profile(&self) -> Option<&Profile> {
        self.profiles.get(DEFAULT_PROFILE_NAME)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FromIterator<Profile> for ProfileCatalog {
    fn from_iter<T: IntoIterator<Item = Profile>>(iter: T) -> Self {
        Self {
            profiles: iter
                .into_iter()
                .map(|profile| (profile.name.clone(), profile))
                .collect(),
        }
    }
}
