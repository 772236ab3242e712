use detection_dashboard::{BarChart, ChartRenderer, Dashboard, DashboardConfig, Pipeline};
use image::{ImageBuffer, Rgb};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Creates the standard run layout (image, label and plot directories) in a temp dir.
/// Returns the config and the temp directory (which must be kept alive).
pub fn create_test_runs() -> (DashboardConfig, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let config = DashboardConfig::from_base_runs(dir.path(), dir.path().join("static/plots"));
    for (_, dirs) in config.pipelines.iter() {
        std::fs::create_dir_all(&dirs.images).expect("Failed to create image directory");
        std::fs::create_dir_all(&dirs.labels).expect("Failed to create label directory");
    }
    config.ensure_plots_dir().expect("Failed to create plots directory");
    (config, dir)
}

/// Writes `<labels dir>/<stem>.txt` for the given pipeline
pub fn write_labels(config: &DashboardConfig, pipeline: Pipeline, stem: &str, contents: &str) {
    let path = config.dirs(pipeline).labels.join(format!("{}.txt", stem));
    std::fs::write(&path, contents).expect("Failed to write label file");
}

/// Creates a 100x100 red test image at `path`, encoded according to its extension
pub fn create_test_image(path: &Path) {
    let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([255u8, 0u8, 0u8]));
    img.save(path).expect("Failed to save test image");
}

/// Creates `<images dir>/<file_name>` for the given pipeline
pub fn add_image(config: &DashboardConfig, pipeline: Pipeline, file_name: &str) -> PathBuf {
    let path = config.dirs(pipeline).images.join(file_name);
    create_test_image(&path);
    path
}

/// Chart renderer that records every request and writes a small placeholder file
#[derive(Default)]
pub struct RecordingRenderer {
    pub rendered: Mutex<Vec<(BarChart, PathBuf)>>,
}

impl RecordingRenderer {
    pub fn rendered(&self) -> Vec<(BarChart, PathBuf)> {
        self.rendered.lock().unwrap().clone()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, chart: &BarChart, output: &Path) -> anyhow::Result<()> {
        std::fs::write(output, chart.title.as_bytes())?;
        self.rendered
            .lock()
            .unwrap()
            .push((chart.clone(), output.to_path_buf()));
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Dashboard over a fresh run layout, drawing charts with a [`RecordingRenderer`]
pub fn create_test_dashboard() -> (Dashboard, Arc<RecordingRenderer>, TempDir) {
    let (config, dir) = create_test_runs();
    let renderer = Arc::new(RecordingRenderer::default());
    let dashboard = Dashboard::new(config, renderer.clone());
    (dashboard, renderer, dir)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
