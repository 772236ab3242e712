use anyhow::Context;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::path::Path;

use crate::models::{DetectionStats, PerPipeline, Stem};

/// Which metric a comparison chart shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Counts,
    ConfidenceSum,
}

impl ChartKind {
    pub fn title(self, stem: &Stem) -> String {
        match self {
            ChartKind::Counts => format!("Detections - {}", stem),
            ChartKind::ConfidenceSum => format!("Confidence Sum - {}", stem),
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            ChartKind::Counts => "Number of Detections",
            ChartKind::ConfidenceSum => "Confidence sum",
        }
    }

    fn file_prefix(self) -> &'static str {
        match self {
            ChartKind::Counts => "counts",
            ChartKind::ConfidenceSum => "conf",
        }
    }

    /// File name of the chart inside the plots directory
    pub fn file_name(self, stem: &Stem) -> String {
        format!("{}_{}.png", self.file_prefix(), stem)
    }

    /// Public URL of the chart file
    pub fn url(self, stem: &Stem) -> String {
        format!("/static/plots/{}_{}.png", self.file_prefix(), stem.url_encoded())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    pub value: f64,
    pub color: (u8, u8, u8),
}

/// Description of one bar chart, independent of how it is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub kind: ChartKind,
    pub title: String,
    pub y_label: &'static str,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn new(kind: ChartKind, stem: &Stem, values: &PerPipeline<f64>) -> Self {
        Self {
            kind,
            title: kind.title(stem),
            y_label: kind.y_label(),
            bars: values
                .iter()
                .map(|(pipeline, value)| Bar {
                    label: pipeline.display_name(),
                    value: *value,
                    color: pipeline.color(),
                })
                .collect(),
        }
    }

    pub fn counts(stem: &Stem, stats: &PerPipeline<DetectionStats>) -> Self {
        Self::new(ChartKind::Counts, stem, &stats.map(|s| s.count as f64))
    }

    pub fn confidence(stem: &Stem, stats: &PerPipeline<DetectionStats>) -> Self {
        Self::new(ChartKind::ConfidenceSum, stem, &stats.map(|s| s.confidence_sum))
    }

    /// Top of the value axis: 10% headroom over the tallest bar, never below 1
    pub fn y_max(&self) -> f64 {
        let tallest = self
            .bars
            .iter()
            .map(|bar| bar.value)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        (tallest * 1.1).max(1.0)
    }
}

/// Writes a chart image to disk
pub trait ChartRenderer: Send + Sync {
    /// Draw `chart` to `output`, replacing any file already there
    fn render(&self, chart: &BarChart, output: &Path) -> anyhow::Result<()>;

    /// Human-readable name (used in log output)
    fn name(&self) -> &str;
}

/// Renders PNG bar charts with plotters
pub struct PlottersRenderer {
    pub width: u32,
    pub height: u32,
}

impl PlottersRenderer {
    pub fn new() -> Self {
        // 6x4 inch figure at 150 dpi
        Self {
            width: 900,
            height: 600,
        }
    }
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, chart: &BarChart, output: &Path) -> anyhow::Result<()> {
        let mut buffer = vec![0u8; (self.width * self.height * 3) as usize];
        // The backend borrows the buffer only for the duration of this call
        draw_bar_chart(chart, &mut buffer, (self.width, self.height))?;

        let image = RgbImage::from_raw(self.width, self.height, buffer)
            .context("Chart buffer does not match canvas size")?;
        write_png_atomically(&image, output)?;

        tracing::debug!("{} saved to {}", chart.title, output.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "plotters"
    }
}

/// Renderer that draws nothing, for callers that only want the numbers
pub struct SkipCharts;

impl ChartRenderer for SkipCharts {
    fn render(&self, _chart: &BarChart, _output: &Path) -> anyhow::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

fn draw_bar_chart(chart: &BarChart, buffer: &mut [u8], size: (u32, u32)) -> anyhow::Result<()> {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&WHITE)?;

    let slots = chart.bars.len().max(1);

    let mut plot = ChartBuilder::on(&root)
        .margin(20)
        .caption(&chart.title, ("sans-serif", 26))
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..slots as f64, 0.0..chart.y_max())?;

    let bar_label = |x: &f64| bar_label_at(chart, *x);

    plot.configure_mesh()
        .disable_x_mesh()
        .x_labels(slots * 2 + 1)
        .x_label_formatter(&bar_label)
        .y_desc(chart.y_label)
        .draw()?;

    plot.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
        let (r, g, b) = bar.color;
        let left = i as f64 + 0.2;
        Rectangle::new([(left, 0.0), (left + 0.6, bar.value)], RGBColor(r, g, b).filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Bar `i` spans `i..i + 1` on the x axis; only its center carries the label
pub fn bar_label_at(chart: &BarChart, x: f64) -> String {
    let slot = x.floor();
    if slot < 0.0 || (x - slot - 0.5).abs() > 1e-6 {
        return String::new();
    }
    chart
        .bars
        .get(slot as usize)
        .map(|bar| bar.label.to_string())
        .unwrap_or_default()
}

/// Encode to a temporary file beside `output`, then rename over it,
/// so readers of `output` only ever see a complete image.
fn write_png_atomically(image: &RgbImage, output: &Path) -> anyhow::Result<()> {
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let staged = tempfile::Builder::new()
        .prefix(".chart-")
        .suffix(".png")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temporary chart in {}", dir.display()))?;

    image
        .save_with_format(staged.path(), ImageFormat::Png)
        .map_err(|e| anyhow::anyhow!("Failed to encode chart: {}", e))?;

    staged
        .persist(output)
        .map_err(|e| anyhow::anyhow!("Failed to save chart {}: {}", output.display(), e))?;
    Ok(())
}
