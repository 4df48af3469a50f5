use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::github::ApiCloneTraffic;

pub const DEFAULT_BADGE_PATH: &str = "clone_stats.json";
const SCHEMA_VERSION: u32 = 1;
const LABEL: &str = "clones";
const COLOR: &str = "blue";

/// Endpoint descriptor understood by shields.io style badge renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDescriptor {
    pub schema_version: u32,
    pub label: String,
    pub message: String,
    pub color: String,
}

impl BadgeDescriptor {
    pub fn from_traffic(traffic: &ApiCloneTraffic) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            label: LABEL.to_string(),
            message: format!("{} total, {} unique", traffic.count, traffic.uniques),
            color: COLOR.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .context("Failed to serialize badge descriptor")?;
        String::from_utf8(buffer).context("Badge descriptor is not valid UTF-8")
    }
}

/// Writes the descriptor, replacing whatever was at `path`. The file is staged
/// next to `path` and renamed into place, so `path` never holds a partial badge.
pub fn write_badge(path: &Path, badge: &BadgeDescriptor) -> Result<()> {
    let contents = badge.to_json()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to write badge at {}", path.display()))?;
    staged
        .write_all(contents.as_bytes())
        .and_then(|()| staged.as_file().sync_all())
        .with_context(|| format!("Failed to write badge at {}", path.display()))?;
    staged
        .persist(path)
        .with_context(|| format!("Failed to write badge at {}", path.display()))?;
    log::info!("Wrote badge to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{BadgeDescriptor, write_badge};
    use crate::github::ApiCloneTraffic;

    fn traffic(count: u64, uniques: u64) -> ApiCloneTraffic {
        ApiCloneTraffic {
            count,
            uniques,
            clones: Vec::new(),
        }
    }

    #[test]
    fn from_traffic_formats_message() {
        let badge = BadgeDescriptor::from_traffic(&traffic(42, 7));

        assert_eq!(badge.schema_version, 1);
        assert_eq!(badge.label, "clones");
        assert_eq!(badge.message, "42 total, 7 unique");
        assert_eq!(badge.color, "blue");
    }

    #[test]
    fn to_json_uses_four_space_indent_and_field_order() {
        let json = BadgeDescriptor::from_traffic(&traffic(42, 7))
            .to_json()
            .expect("serializes");

        let expected = "{\n    \"schemaVersion\": 1,\n    \"label\": \"clones\",\n    \"message\": \"42 total, 7 unique\",\n    \"color\": \"blue\"\n}";
        assert_eq!(json, expected);
    }

    #[test]
    fn write_badge_overwrites_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clone_stats.json");
        fs::write(&path, "stale contents that are much longer than the badge itself ......")
            .expect("seed file");

        let badge = BadgeDescriptor::from_traffic(&traffic(1, 1));
        write_badge(&path, &badge).expect("write succeeds");

        let written = fs::read_to_string(&path).expect("read back");
        assert_eq!(written, badge.to_json().expect("serializes"));
    }

    #[test]
    fn write_badge_leaves_no_staging_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clone_stats.json");

        let badge = BadgeDescriptor::from_traffic(&traffic(42, 7));
        write_badge(&path, &badge).expect("first write");
        write_badge(&path, &badge).expect("second write");

        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("list dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("clone_stats.json")]);
    }

    #[test]
    fn write_badge_reports_path_on_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("clone_stats.json");

        let badge = BadgeDescriptor::from_traffic(&traffic(1, 1));
        let error = write_badge(&path, &badge).expect_err("parent does not exist");

        assert!(error.to_string().contains("missing"));
    }
}
