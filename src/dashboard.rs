use std::sync::Arc;

use crate::charts::{BarChart, ChartKind, ChartRenderer};
use crate::config::DashboardConfig;
use crate::images::{list_stems, locate_image};
use crate::models::{ComparisonResult, PerPipeline, Pipeline, Stem};
use crate::stats::collect_stats;

/// Assembles the index and comparison views from the configured directories.
///
/// Every call reads the filesystem afresh; the only state is the immutable
/// configuration and the chart renderer.
#[derive(Clone)]
pub struct Dashboard {
    config: Arc<DashboardConfig>,
    renderer: Arc<dyn ChartRenderer>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, renderer: Arc<dyn ChartRenderer>) -> Self {
        Self {
            config: Arc::new(config),
            renderer,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Stems of every image in the RAW image directory
    pub fn index(&self) -> anyhow::Result<Vec<Stem>> {
        list_stems(&self.config.dirs(Pipeline::Raw).images)
    }

    /// Compare detections for `raw_stem` across all pipelines.
    ///
    /// `raw_stem` may come straight from a request; it is reduced to its
    /// final path segment before any lookup. Both charts are redrawn on
    /// every call, overwriting earlier ones for the same stem.
    pub fn compare(&self, raw_stem: &str) -> anyhow::Result<ComparisonResult> {
        let stem = Stem::sanitize(raw_stem);
        if stem.as_str() != raw_stem {
            tracing::warn!("stem {:?} sanitized to {:?}", raw_stem, stem.as_str());
        }

        let stats = collect_stats(&self.config, &stem)?;

        for chart in [BarChart::counts(&stem, &stats), BarChart::confidence(&stem, &stats)] {
            let output = self.config.plots_dir.join(chart.kind.file_name(&stem));
            self.renderer.render(&chart, &output)?;
        }

        let image_urls =
            PerPipeline::from_fn(|p| locate_image(&self.config.dirs(p).images, p, &stem));

        tracing::info!("compared {} ({} charts)", stem, self.renderer.name());

        Ok(ComparisonResult {
            counts_chart_url: ChartKind::Counts.url(&stem),
            confidence_chart_url: ChartKind::ConfidenceSum.url(&stem),
            stem,
            stats,
            image_urls,
        })
    }
}
