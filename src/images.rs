use anyhow::Context;
use std::collections::BTreeSet;
use std::path::Path;

use crate::models::{Pipeline, Stem};

/// Extensions probed for each stem, in priority order
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// URL of the image for `stem` in `pipeline`'s image directory, if one exists.
/// Only the fixed extensions are tried, first match wins.
pub fn locate_image(images_dir: &Path, pipeline: Pipeline, stem: &Stem) -> Option<String> {
    IMAGE_EXTENSIONS.iter().find_map(|ext| {
        let candidate = images_dir.join(format!("{}.{}", stem, ext));
        candidate.exists().then(|| {
            format!(
                "/{}/{}.{}",
                pipeline.image_route(),
                stem.url_encoded(),
                ext
            )
        })
    })
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Sorted, de-duplicated stems of every image in `images_dir`.
/// A directory that does not exist has no stems.
pub fn list_stems(images_dir: &Path) -> anyhow::Result<Vec<Stem>> {
    if !images_dir.is_dir() {
        tracing::warn!("image directory {} does not exist", images_dir.display());
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(images_dir)
        .with_context(|| format!("Failed to list {}", images_dir.display()))?;

    let mut stems = BTreeSet::new();
    for entry in entries {
        let path = entry?.path();
        if !has_image_extension(&path) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.insert(Stem::from_file_stem(stem));
        }
    }

    Ok(stems.into_iter().collect())
}
