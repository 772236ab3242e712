use std::path::{Path, PathBuf};

use crate::models::{PerPipeline, Pipeline};

/// Where one pipeline's images and detection labels live
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDirs {
    pub images: PathBuf,
    pub labels: PathBuf,
}

/// Directory layout the dashboard reads from and writes charts into.
/// Resolved once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub pipelines: PerPipeline<PipelineDirs>,
    pub plots_dir: PathBuf,
}

impl DashboardConfig {
    /// Standard layout of a detection run:
    /// `<base>/<name>_images` and `<base>/<name>_detect/run/labels`
    pub fn from_base_runs(base: impl AsRef<Path>, plots_dir: impl Into<PathBuf>) -> Self {
        let base = base.as_ref();
        Self {
            pipelines: PerPipeline::from_fn(|p| PipelineDirs {
                images: base.join(p.default_images_dir()),
                labels: base.join(p.default_labels_dir()),
            }),
            plots_dir: plots_dir.into(),
        }
    }

    pub fn dirs(&self, pipeline: Pipeline) -> &PipelineDirs {
        self.pipelines.get(pipeline)
    }

    pub fn with_images_dir(mut self, pipeline: Pipeline, dir: impl Into<PathBuf>) -> Self {
        self.pipelines.get_mut(pipeline).images = dir.into();
        self
    }

    pub fn with_labels_dir(mut self, pipeline: Pipeline, dir: impl Into<PathBuf>) -> Self {
        self.pipelines.get_mut(pipeline).labels = dir.into();
        self
    }

    /// Create the chart output directory if it does not exist yet
    pub fn ensure_plots_dir(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.plots_dir).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create plots directory {}: {}",
                self.plots_dir.display(),
                e
            )
        })
    }
}
