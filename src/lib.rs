pub mod charts;
pub mod config;
pub mod dashboard;
pub mod images;
pub mod models;
pub mod server;
pub mod stats;

pub use charts::{BarChart, ChartKind, ChartRenderer, PlottersRenderer, SkipCharts};
pub use config::{DashboardConfig, PipelineDirs};
pub use dashboard::Dashboard;
pub use models::{ComparisonResult, DetectionStats, PerPipeline, Pipeline, Stem};
