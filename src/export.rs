//! Chart export
//! Writes every panel to disk as PNG (plotters) or JSON (serde_json).

use crate::charts::{RenderError, RenderRequest, StaticChartRenderer};
use crate::dashboard::Dashboard;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the store snapshot written next to the JSON requests.
pub const STATE_FILE: &str = "state.json";

fn target(dir: &Path, request: &RenderRequest, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", request.surface_id, extension))
}

/// Render `requests` to `<surface-id>.png` in parallel.
///
/// Stops at the first failed chart; files already written are kept.
pub fn export_requests_png(
    requests: &[RenderRequest],
    dir: &Path,
    size: (u32, u32),
) -> Result<Vec<PathBuf>, RenderError> {
    fs::create_dir_all(dir)?;

    let paths = requests
        .par_iter()
        .map(|request| {
            let path = target(dir, request, "png");
            StaticChartRenderer::render_to_png(request, &path, size)?;
            Ok(path)
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    info!(count = paths.len(), dir = %dir.display(), "exported PNG charts");
    Ok(paths)
}

/// Write each panel's render request as JSON, plus a snapshot of the state store.
pub fn export_json_all(dashboard: &mut Dashboard, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
    fs::create_dir_all(dir)?;

    let mut paths = Vec::new();
    for request in dashboard.requests() {
        let path = target(dir, &request, "json");
        fs::write(&path, serde_json::to_vec_pretty(&request)?)?;
        paths.push(path);
    }

    let state_path = dir.join(STATE_FILE);
    fs::write(&state_path, serde_json::to_vec_pretty(dashboard.store())?)?;
    paths.push(state_path);

    info!(count = paths.len(), dir = %dir.display(), "exported JSON charts");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::PanelCommand;
    use crate::charts::RecordingSurface;

    #[test]
    fn json_export_writes_every_panel_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut dashboard = Dashboard::new();

        let paths = export_json_all(&mut dashboard, dir.path()).unwrap();
        assert_eq!(paths.len(), 6);
        for name in [
            "book-chart.json",
            "exchange-chart.json",
            "sales-chart.json",
            "temperature-chart.json",
            "snowflake-chart.json",
            STATE_FILE,
        ] {
            assert!(dir.path().join(name).is_file(), "missing {name}");
        }
    }

    #[test]
    fn json_export_reflects_current_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut dashboard = Dashboard::new();
        dashboard
            .apply(PanelCommand::SetIterations(1), &mut RecordingSurface::new())
            .unwrap();

        export_json_all(&mut dashboard, dir.path()).unwrap();

        let raw = fs::read_to_string(dir.path().join("snowflake-chart.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["surface_id"], "snowflake-chart");
        assert_eq!(value["series"][0]["x"].as_array().unwrap().len(), 12);

        let state: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(STATE_FILE)).unwrap())
                .unwrap();
        assert_eq!(state["snowflake"]["iterations"], 1);
    }

    #[test]
    fn png_export_creates_directory_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("png");
        let paths = export_requests_png(&[], &nested, (640, 480)).unwrap();
        assert!(paths.is_empty());
        assert!(nested.is_dir());
    }

    #[test]
    fn png_export_into_a_file_path_is_an_io_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let requests = Dashboard::new().requests();
        let err = export_requests_png(&requests, file.path(), (640, 480)).unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }

    #[test]
    fn json_export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("charts");
        export_json_all(&mut Dashboard::new(), &nested).unwrap();
        assert!(nested.join(STATE_FILE).is_file());
    }
}
