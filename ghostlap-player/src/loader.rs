//! Reading track files from disk

use anyhow::{Context, Result};
use ghostlap_core::model::Track;
use ghostlap_track::prepare::strip_closing_duplicate;
use std::path::Path;
use tracing::info;

/// Load a track JSON document and check its points
///
/// Files that close the loop by repeating the first point have the repeat
/// dropped; the curve closes itself.
pub fn load_track(path: &Path) -> Result<Track> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read track file {}", path.display()))?;
    let mut track: Track = serde_json::from_slice(&bytes)
        .with_context(|| format!("Invalid track JSON in {}", path.display()))?;
    track.points = strip_closing_duplicate(std::mem::take(&mut track.points));
    track
        .validate_points()
        .with_context(|| format!("Track {:?} cannot be played", track.name))?;

    info!(
        "Loaded track {:?} from {} ({} waypoints{})",
        track.name,
        path.display(),
        track.points.len(),
        if track.authored_telemetry().is_some() {
            ", authored telemetry"
        } else {
            ""
        }
    );
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ghostlap-{}-{}.json", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_track() {
        let path = write_temp(
            "valid",
            r#"{"name":"Square","points":[[0,0,0],[100,0,0],[100,0,100],[0,0,100]]}"#,
        );
        let track = load_track(&path).unwrap();
        assert_eq!(track.name, "Square");
        assert_eq!(track.points.len(), 4);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_strips_closing_point() {
        let path = write_temp(
            "closed",
            r#"{"name":"Square","points":[[0,0,0],[100,0,0],[100,0,100],[0,0,100],[0,0,0]]}"#,
        );
        let track = load_track(&path).unwrap();
        assert_eq!(track.points.len(), 4);
        assert_eq!(track.points[3].to_array(), [0.0, 0.0, 100.0]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_closed_loop_of_three_repeats_is_too_short() {
        let path = write_temp("closed-short", r#"{"name":"Line","points":[[0,0,0],[5,0,0],[0,0,0]]}"#);
        assert!(load_track(&path).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_rejects_short_track() {
        let path = write_temp("short", r#"{"name":"Line","points":[[0,0,0],[1,0,0]]}"#);
        let err = load_track(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("at least 3"), "{:#}", err);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_track(Path::new("/nonexistent/ghostlap/track.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read track file"));
    }
}
