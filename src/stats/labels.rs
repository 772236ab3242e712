use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::models::{DetectionStats, Stem};

/// Path of the label file the detector writes for `stem`
pub fn label_path(labels_dir: &Path, stem: &Stem) -> PathBuf {
    labels_dir.join(format!("{}.txt", stem))
}

/// Score of a single detection line: its last whitespace-separated token.
/// Lines whose last token is not a number still represent a detection, with score 0.
pub fn parse_score(line: &str) -> f64 {
    line.split_whitespace()
        .next_back()
        .and_then(|token| token.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Count detections and sum their confidence scores from any label source.
/// Bytes that are not valid UTF-8 are replaced rather than failing the read.
pub fn stats_from_reader<R: BufRead>(mut reader: R) -> std::io::Result<DetectionStats> {
    let mut stats = DetectionStats::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.count += 1;
        stats.confidence_sum += parse_score(line);
    }
    Ok(stats)
}

/// Read `<labels_dir>/<stem>.txt`.
/// A missing file means nothing was detected and yields zero stats.
pub fn read_label_stats(labels_dir: &Path, stem: &Stem) -> anyhow::Result<DetectionStats> {
    let path = label_path(labels_dir, stem);
    if !path.is_file() {
        tracing::debug!("no label file at {}", path.display());
        return Ok(DetectionStats::default());
    }

    let file = File::open(&path)
        .with_context(|| format!("Failed to open label file {}", path.display()))?;
    stats_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read label file {}", path.display()))
}
