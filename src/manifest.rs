//! Typed, read-only view of a cached version manifest.
//!
//! The updater never goes through this module; it stores whatever upstream
//! serves. Consumers of the cache use it to list versions without touching
//! the network.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Release channel of a version, from the upstream `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionKind {
    /// Pre-beta builds.
    OldAlpha,
    /// Beta builds before 1.0.
    OldBeta,
    /// Weekly snapshots, pre-releases and release candidates.
    Snapshot,
    /// Stable releases.
    Release,
    /// Any channel this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// Newest version id per channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Latest {
    /// Id of the newest release.
    pub release: String,
    /// Id of the newest snapshot.
    pub snapshot: String,
}

/// One entry of the `versions` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// Version id, e.g. `1.21`.
    pub id: String,
    /// Release channel.
    #[serde(rename = "type")]
    pub kind: VersionKind,
    /// URL of the per-version metadata document.
    #[serde(default)]
    pub url: String,
    /// Last modification time of the metadata.
    #[serde(default)]
    pub time: String,
    /// Publication time.
    #[serde(default)]
    pub release_time: String,
}

/// The whole manifest. Upstream lists versions newest first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionManifest {
    /// Newest ids per channel.
    pub latest: Latest,
    /// Every known version, newest first.
    pub versions: Vec<Version>,
}

impl VersionManifest {
    /// What: Interpret a parsed JSON document as a version manifest.
    ///
    /// Inputs:
    /// - `document`: Parsed cache contents
    ///
    /// Output:
    /// - Typed manifest
    ///
    /// # Errors
    /// - Returns `Err(Error::Manifest)` when `latest` or `versions` is missing or mistyped
    pub fn from_value(document: &Value) -> Result<Self> {
        Self::deserialize(document).map_err(Error::Manifest)
    }

    /// What: Read and interpret a cache file.
    ///
    /// Inputs:
    /// - `path`: Cache file written by [`crate::cache::update`]
    ///
    /// Output:
    /// - Typed manifest
    ///
    /// # Errors
    /// - Returns `Err(Error::Io)` when the file cannot be read
    /// - Returns `Err(Error::Manifest)` when it is not a version manifest
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(Error::io(path))?;
        serde_json::from_slice(&bytes).map_err(Error::Manifest)
    }

    /// Versions of one channel, in manifest order.
    pub fn versions_of(&self, kind: VersionKind) -> impl Iterator<Item = &Version> {
        self.versions.iter().filter(move |v| v.kind == kind)
    }

    /// Releases, oldest first.
    #[must_use]
    pub fn releases(&self) -> Vec<&Version> {
        let mut releases: Vec<&Version> = self.versions_of(VersionKind::Release).collect();
        releases.reverse();
        releases
    }

    /// Version with the given id, if listed.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Entry for `latest.release`, if it is also listed in `versions`.
    #[must_use]
    pub fn latest_release(&self) -> Option<&Version> {
        self.find(&self.latest.release)
    }
}
