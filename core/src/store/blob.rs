//! On-disk shape of the profile blob.
//!
//! One JSON file holds every profile under an envelope with an active
//! pointer. Older builds wrote a single bare profile; this module is the
//! only place that knows that shape existed.

use std::collections::BTreeMap;

use grimoire_types::{Task, Wizard};
use serde::{Deserialize, Serialize};

/// A stored profile: the character plus its task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub character: Wizard,
    #[serde(rename = "taskList")]
    pub task_list: Vec<Task>,
}

/// Envelope holding every profile, keyed by character name.
///
/// `BTreeMap` keeps key order stable across runs, which makes "first
/// remaining profile" deterministic when the active one is cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveBlob {
    #[serde(rename = "activeProfileName")]
    pub active_profile_name: String,
    pub profiles: BTreeMap<String, ProfileRecord>,
}

/// Wire-level shapes accepted on read.
///
/// The legacy arm matches the old single-profile file and upgrades it into
/// a one-entry envelope named after its character; the file converts to
/// the new shape on the next save.
#[derive(Deserialize)]
#[serde(untagged)]
pub(super) enum WireBlob {
    Envelope(SaveBlob),
    Legacy(ProfileRecord),
}

impl From<WireBlob> for SaveBlob {
    fn from(wire: WireBlob) -> Self {
        match wire {
            WireBlob::Envelope(blob) => blob,
            WireBlob::Legacy(record) => {
                let name = record.character.name.clone();
                let mut profiles = BTreeMap::new();
                profiles.insert(name.clone(), record);
                SaveBlob {
                    active_profile_name: name,
                    profiles,
                }
            }
        }
    }
}
