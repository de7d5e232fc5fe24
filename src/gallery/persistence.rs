//! Gallery persistence — YAML load/save under `~/.orrery/`.

use std::io;
use std::path::{Path, PathBuf};

use super::Piece;

/// Default path for the local gallery.
pub fn default_gallery_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".orrery");
    path.push("gallery.yaml");
    path
}

/// Load the gallery from a YAML file. Returns an empty gallery if the file
/// doesn't exist.
pub fn load_gallery(path: &Path) -> Result<Vec<Piece>, io::Error> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Save the gallery to a YAML file, creating parent directories as needed.
pub fn save_gallery(path: &Path, pieces: &[Piece]) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(pieces).map_err(io::Error::other)?;
    std::fs::write(path, yaml)
}
