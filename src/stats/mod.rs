pub mod labels;

use crate::config::DashboardConfig;
use crate::models::{DetectionStats, PerPipeline, Stem};

pub use labels::read_label_stats;

/// Detection stats for `stem` under every pipeline.
/// Each pipeline reads only its own label directory; nothing is cached.
pub fn collect_stats(
    config: &DashboardConfig,
    stem: &Stem,
) -> anyhow::Result<PerPipeline<DetectionStats>> {
    PerPipeline::try_from_fn(|pipeline| {
        let stats = read_label_stats(&config.dirs(pipeline).labels, stem)?;
        tracing::debug!(
            "{} {}: {} detections, confidence sum {:.3}",
            stem,
            pipeline,
            stats.count,
            stats.confidence_sum
        );
        Ok(stats)
    })
}
