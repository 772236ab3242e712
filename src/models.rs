use serde::Serialize;
use std::fmt;

/// One of the preprocessing variants whose detections are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Pipeline {
    #[serde(rename = "RAW")]
    Raw,
    #[serde(rename = "CLAHE")]
    Clahe,
    #[serde(rename = "AOD-Net")]
    AodNet,
}

impl Pipeline {
    /// All pipelines in display order
    pub const ALL: [Pipeline; 3] = [Pipeline::Raw, Pipeline::Clahe, Pipeline::AodNet];

    pub fn display_name(self) -> &'static str {
        match self {
            Pipeline::Raw => "RAW",
            Pipeline::Clahe => "CLAHE",
            Pipeline::AodNet => "AOD-Net",
        }
    }

    /// URL prefix under which this pipeline's images are served
    pub fn image_route(self) -> &'static str {
        match self {
            Pipeline::Raw => "raw_images",
            Pipeline::Clahe => "clahe_images",
            Pipeline::AodNet => "aodnet_images",
        }
    }

    /// Bar color used in the comparison charts
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Pipeline::Raw => (0x1f, 0x77, 0xb4),
            Pipeline::Clahe => (0xff, 0x99, 0x00),
            Pipeline::AodNet => (0x2c, 0xa0, 0x2c),
        }
    }

    /// Image directory name under the base runs directory
    pub fn default_images_dir(self) -> &'static str {
        self.image_route()
    }

    /// Label directory under the base runs directory, as laid out by the detector
    pub fn default_labels_dir(self) -> &'static str {
        match self {
            Pipeline::Raw => "raw_detect/run/labels",
            Pipeline::Clahe => "clahe_detect/run/labels",
            Pipeline::AodNet => "aodnet_detect/run/labels",
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One value per pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerPipeline<T> {
    #[serde(rename = "RAW")]
    pub raw: T,
    #[serde(rename = "CLAHE")]
    pub clahe: T,
    #[serde(rename = "AOD-Net")]
    pub aodnet: T,
}

impl<T> PerPipeline<T> {
    /// Build by evaluating `f` once for each pipeline
    pub fn from_fn(mut f: impl FnMut(Pipeline) -> T) -> Self {
        Self {
            raw: f(Pipeline::Raw),
            clahe: f(Pipeline::Clahe),
            aodnet: f(Pipeline::AodNet),
        }
    }

    /// Fallible variant of [`PerPipeline::from_fn`]
    pub fn try_from_fn<E>(mut f: impl FnMut(Pipeline) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            raw: f(Pipeline::Raw)?,
            clahe: f(Pipeline::Clahe)?,
            aodnet: f(Pipeline::AodNet)?,
        })
    }

    pub fn get(&self, pipeline: Pipeline) -> &T {
        match pipeline {
            Pipeline::Raw => &self.raw,
            Pipeline::Clahe => &self.clahe,
            Pipeline::AodNet => &self.aodnet,
        }
    }

    pub fn get_mut(&mut self, pipeline: Pipeline) -> &mut T {
        match pipeline {
            Pipeline::Raw => &mut self.raw,
            Pipeline::Clahe => &mut self.clahe,
            Pipeline::AodNet => &mut self.aodnet,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerPipeline<U> {
        PerPipeline {
            raw: f(&self.raw),
            clahe: f(&self.clahe),
            aodnet: f(&self.aodnet),
        }
    }

    /// Iterate in display order
    pub fn iter(&self) -> impl Iterator<Item = (Pipeline, &T)> {
        Pipeline::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

/// Image identifier shared by every pipeline's directories.
///
/// A `Stem` is always a bare filename component: anything up to the last
/// path separator of the platform is dropped, so it can be joined onto a
/// configured directory without escaping it. On Unix only `/` separates, so
/// a `\` stays part of the name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Stem(String);

impl Stem {
    pub fn sanitize(raw: &str) -> Self {
        let base = raw.rsplit(std::path::is_separator).next().unwrap_or_default();
        Stem(base.to_string())
    }

    /// Stem of a file already found inside a configured directory
    pub fn from_file_stem(name: &str) -> Self {
        Stem(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stem percent-encoded for use inside a URL path
    pub fn url_encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Detections recorded for one stem under one pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DetectionStats {
    pub count: usize,
    pub confidence_sum: f64,
}

/// Everything the comparison page needs for one stem
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub stem: Stem,
    pub stats: PerPipeline<DetectionStats>,
    pub image_urls: PerPipeline<Option<String>>,
    pub counts_chart_url: String,
    pub confidence_chart_url: String,
}

impl ComparisonResult {
    pub fn counts(&self) -> PerPipeline<usize> {
        self.stats.map(|s| s.count)
    }

    pub fn confidence_sums(&self) -> PerPipeline<f64> {
        self.stats.map(|s| s.confidence_sum)
    }
}
