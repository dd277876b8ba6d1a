use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;

/// Description of one delimited-text point layer: a merged CSV plus the
/// coordinate field mapping a GIS host needs to place its rows. The pipeline
/// never touches a host application's layer objects directly.
#[derive(Debug, Clone, Serialize)]
pub struct LayerSpec {
    pub name: String,
    pub csv_path: PathBuf,
    pub x_field: String,
    pub y_field: String,
    pub crs: String,
}

impl LayerSpec {
    /// Spec for a merged per-day CSV; the layer is named after the file stem.
    pub fn for_merged_csv(path: &Path) -> Self {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("layer")
            .to_string();
        Self {
            name,
            csv_path: path.to_path_buf(),
            x_field: "lon".to_string(),
            y_field: "lat".to_string(),
            crs: "EPSG:4326".to_string(),
        }
    }

    /// Source URI in the delimited-text form GIS hosts accept.
    pub fn delimited_text_uri(&self) -> String {
        format!(
            "file:///{}?type=csv&detectTypes=yes&xField={}&yField={}&crs={}&spatialIndex=no&subsetIndex=no&watchFile=no",
            self.csv_path.display(),
            self.x_field,
            self.y_field,
            self.crs
        )
    }
}

/// Sink for vector layers derived from merged tables. Implementations decide
/// whether specs become live layers, shapefiles or a manifest on disk.
pub trait VectorLayerSink {
    fn add_layer(&mut self, spec: &LayerSpec) -> Result<()>;
}

/// Collects layer specs and writes them out as a JSON manifest.
#[derive(Debug, Default)]
pub struct LayerManifest {
    layers: Vec<LayerSpec>,
}

impl LayerManifest {
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.layers)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl VectorLayerSink for LayerManifest {
    fn add_layer(&mut self, spec: &LayerSpec) -> Result<()> {
        self.layers.push(spec.clone());
        Ok(())
    }
}

/// Layer specs for every merged CSV under `merged_dir`, in name order.
pub fn merged_layer_specs(merged_dir: &Path) -> Result<Vec<LayerSpec>> {
    let pattern = merged_dir.join("*.csv").to_string_lossy().into_owned();
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths
        .iter()
        .map(|path| LayerSpec::for_merged_csv(path))
        .collect())
}
