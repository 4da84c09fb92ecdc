//! In-memory index over an uploaded replay folder.
//!
//! A session folder holds three subdirectories, `color/`, `depth/` and
//! `log/`, whose filenames begin with a UNIX timestamp. The unified
//! `all_timestamps` axis is the authoritative frame sequence: a frame may
//! have an image but no log, or vice versa, and consumers treat the missing
//! half as "no data for this slot".

use crate::telemetry::DetectionPayload;
use crate::{DashboardError, DashboardResult};
use log::warn;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// One timestamped file inside a replay session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFile {
    pub timestamp: f64,
    pub filename: String,
    pub path: PathBuf,
}

/// Everything the dashboard needs for one frame index.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub timestamp: f64,
    pub payload: DetectionPayload,
    pub color_image: Option<PathBuf>,
    pub depth_image: Option<PathBuf>,
}

/// Loaded once per folder upload and held for the session.
#[derive(Debug, Clone, Default)]
pub struct ReplaySession {
    pub color_images: Vec<ReplayFile>,
    pub depth_images: Vec<ReplayFile>,
    pub log_files: Vec<ReplayFile>,
    all_timestamps: Vec<f64>,
}

impl ReplaySession {
    /// Builds a session from a flat list of files, categorizing each by its
    /// parent directory name. Files without a leading-timestamp name or a
    /// recognized extension are silently skipped.
    pub fn from_files<I>(paths: I) -> DashboardResult<Self>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut session = ReplaySession::default();

        for path in paths {
            let Some(folder) = parent_name(&path) else {
                continue;
            };
            let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(timestamp) = parse_timestamp(filename) else {
                continue;
            };
            let entry = ReplayFile {
                timestamp,
                filename: filename.to_string(),
                path: path.clone(),
            };
            match folder.as_str() {
                "color" if is_image_name(filename) => session.color_images.push(entry),
                "depth" if is_image_name(filename) => session.depth_images.push(entry),
                "log" if is_log_name(filename) => session.log_files.push(entry),
                _ => {}
            }
        }

        if session.color_images.is_empty()
            && session.depth_images.is_empty()
            && session.log_files.is_empty()
        {
            return Err(DashboardError::NoValidFiles(
                "ensure the folder contains color/, depth/ and log/ subfolders \
                 with timestamp-named files"
                    .to_string(),
            ));
        }

        sort_by_timestamp(&mut session.color_images);
        sort_by_timestamp(&mut session.depth_images);
        sort_by_timestamp(&mut session.log_files);

        let mut all: Vec<f64> = session
            .color_images
            .iter()
            .chain(&session.depth_images)
            .chain(&session.log_files)
            .map(|file| file.timestamp)
            .collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        all.dedup();
        session.all_timestamps = all;

        Ok(session)
    }

    /// Scans `root/color`, `root/depth` and `root/log` and builds a session
    /// from whatever files they hold.
    pub fn from_dir(root: &Path) -> DashboardResult<Self> {
        let mut paths = Vec::new();
        for folder in ["color", "depth", "log"] {
            let dir = root.join(folder);
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    paths.push(path);
                }
            }
        }
        Self::from_files(paths)
    }

    /// The authoritative frame axis: strictly increasing, deduplicated.
    pub fn all_timestamps(&self) -> &[f64] {
        &self.all_timestamps
    }

    pub fn len(&self) -> usize {
        self.all_timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_timestamps.is_empty()
    }

    /// Resolves one frame index. Matching is exact-equality on the parsed
    /// timestamp; a near-miss image or log is treated as absent. A missing
    /// or unreadable log yields the empty payload, never an error.
    pub fn state(&self, frame_index: usize) -> Option<FrameState> {
        let timestamp = *self.all_timestamps.get(frame_index)?;

        let payload = match find_at(&self.log_files, timestamp) {
            Some(file) => read_log_payload(&file.path),
            None => DetectionPayload::empty(),
        };

        Some(FrameState {
            timestamp,
            payload,
            color_image: find_at(&self.color_images, timestamp).map(|f| f.path.clone()),
            depth_image: find_at(&self.depth_images, timestamp).map(|f| f.path.clone()),
        })
    }
}

fn read_log_payload(path: &Path) -> DetectionPayload {
    match std::fs::read_to_string(path) {
        Ok(text) => DetectionPayload::parse_message(&text).unwrap_or_else(|| {
            warn!("malformed log file {}; using empty payload", path.display());
            DetectionPayload::empty()
        }),
        Err(err) => {
            warn!("unreadable log file {}: {}", path.display(), err);
            DetectionPayload::empty()
        }
    }
}

fn find_at(files: &[ReplayFile], timestamp: f64) -> Option<&ReplayFile> {
    files.iter().find(|file| file.timestamp == timestamp)
}

fn sort_by_timestamp(files: &mut [ReplayFile]) {
    files.sort_by(|a, b| {
        a.timestamp
            .partial_cmp(&b.timestamp)
            .unwrap_or(Ordering::Equal)
    });
}

fn parent_name(path: &Path) -> Option<String> {
    path.parent()?
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
}

/// Extracts the leading UNIX timestamp (integer, optionally with a decimal
/// fraction) from a filename like `1748668241.7916987.jpg`.
fn parse_timestamp(filename: &str) -> Option<f64> {
    let bytes = filename.as_bytes();
    let mut end = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == 0 {
        return None;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > end + 1 {
            end = frac_end;
        }
    }
    filename[..end].parse().ok()
}

fn is_image_name(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

fn is_log_name(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn session_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for folder in ["color", "depth", "log"] {
            fs::create_dir(dir.path().join(folder)).unwrap();
        }
        dir
    }

    #[test]
    fn timestamp_parse_accepts_integer_and_fraction() {
        assert_eq!(parse_timestamp("1000.jpg"), Some(1000.0));
        assert_eq!(
            parse_timestamp("1748668241.7916987.jpg"),
            Some(1748668241.7916987)
        );
        assert_eq!(parse_timestamp("notes.txt"), None);
        assert_eq!(parse_timestamp(".5.jpg"), None);
    }

    #[test]
    fn all_timestamps_are_strictly_increasing_and_deduplicated() {
        let dir = session_dir();
        fs::write(dir.path().join("color/1000.jpg"), b"x").unwrap();
        fs::write(dir.path().join("depth/1000.jpg"), b"x").unwrap();
        fs::write(dir.path().join("log/1000.json"), b"{}").unwrap();
        fs::write(dir.path().join("color/999.5.jpg"), b"x").unwrap();
        let session = ReplaySession::from_dir(dir.path()).unwrap();
        assert_eq!(session.all_timestamps(), &[999.5, 1000.0]);
    }

    #[test]
    fn empty_session_reports_no_valid_files() {
        let dir = session_dir();
        fs::write(dir.path().join("color/readme.txt"), b"x").unwrap();
        let err = ReplaySession::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DashboardError::NoValidFiles(_)));
    }

    #[test]
    fn sparse_frames_are_valid() {
        let dir = session_dir();
        fs::write(
            dir.path().join("log/2000.json"),
            br#"{"stuff":[{"x":320,"y":240,"width":100,"height":50,"class":"red","confidence":0.9}]}"#,
        )
        .unwrap();
        let session = ReplaySession::from_dir(dir.path()).unwrap();
        assert_eq!(session.len(), 1);

        let frame = session.state(0).unwrap();
        assert_eq!(frame.payload.detections.len(), 1);
        assert!(frame.color_image.is_none());
        assert!(frame.depth_image.is_none());
    }

    #[test]
    fn near_miss_timestamps_do_not_match() {
        let dir = session_dir();
        fs::write(dir.path().join("color/1000.1.jpg"), b"x").unwrap();
        fs::write(dir.path().join("log/1000.json"), br#"{"stuff":[]}"#).unwrap();
        let session = ReplaySession::from_dir(dir.path()).unwrap();
        assert_eq!(session.len(), 2);

        // Frame 0 is the log-only slot; frame 1 is the image-only slot.
        let first = session.state(0).unwrap();
        assert!(first.color_image.is_none());
        let second = session.state(1).unwrap();
        assert!(second.color_image.is_some());
        assert!(second.payload.detections.is_empty());
    }

    #[test]
    fn malformed_log_yields_empty_payload() {
        let dir = session_dir();
        fs::write(dir.path().join("log/1000.json"), b"{broken").unwrap();
        let session = ReplaySession::from_dir(dir.path()).unwrap();
        let frame = session.state(0).unwrap();
        assert_eq!(frame.payload, DetectionPayload::empty());
    }

    #[test]
    fn state_is_idempotent() {
        let dir = session_dir();
        fs::write(dir.path().join("color/1000.jpg"), b"x").unwrap();
        fs::write(dir.path().join("log/1000.json"), br#"{"stuff":[]}"#).unwrap();
        let session = ReplaySession::from_dir(dir.path()).unwrap();
        assert_eq!(session.state(0), session.state(0));
        assert!(session.state(5).is_none());
    }

    #[test]
    fn files_outside_known_folders_are_skipped() {
        let dir = session_dir();
        fs::create_dir(dir.path().join("misc")).unwrap();
        fs::write(dir.path().join("misc/1000.jpg"), b"x").unwrap();
        fs::write(dir.path().join("color/1000.png"), b"x").unwrap();
        fs::write(dir.path().join("color/1001.jpg"), b"x").unwrap();
        let session = ReplaySession::from_files(vec![
            dir.path().join("misc/1000.jpg"),
            dir.path().join("color/1000.png"),
            dir.path().join("color/1001.jpg"),
        ])
        .unwrap();
        assert_eq!(session.color_images.len(), 1);
    }
}
