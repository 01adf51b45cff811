use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::record::ShapeRecord;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationFile {
    pub image: String,
    pub annotations: Vec<ShapeRecord>,
}

/// `photo.jpg` -> `photo.jpg.boxes.json`
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    let mut name = image_path.file_name().unwrap_or_default().to_os_string();
    name.push(".boxes.json");
    image_path.with_file_name(name)
}

/// Annotations stored next to `image_path`; a missing sidecar is an empty set.
pub fn load_annotations(image_path: &Path) -> anyhow::Result<Vec<ShapeRecord>> {
    let path = sidecar_path(image_path);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let file: AnnotationFile = serde_json::from_str(&data)
        .with_context(|| format!("parsing {}", path.display()))?;
    log::info!("loaded {} boxes from {}", file.annotations.len(), path.display());
    Ok(file.annotations)
}

pub fn save_annotations(image_path: &Path, annotations: &[ShapeRecord]) -> anyhow::Result<()> {
    let path = sidecar_path(image_path);
    let file = AnnotationFile {
        image: image_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned(),
        annotations: annotations.to_vec(),
    };
    let data = serde_json::to_string_pretty(&file)?;
    std::fs::write(&path, data).with_context(|| format!("writing {}", path.display()))?;
    log::info!("saved {} boxes to {}", annotations.len(), path.display());
    Ok(())
}
