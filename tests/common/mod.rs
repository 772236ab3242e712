mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from detection_dashboard for tests
pub use detection_dashboard::{
    BarChart, ChartKind, ChartRenderer, ComparisonResult, Dashboard, DashboardConfig,
    DetectionStats, PerPipeline, Pipeline, Stem,
};
