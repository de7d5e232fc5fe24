//! Gallery — saved compositions.
//!
//! A [`Piece`] is one composition: its words plus the metadata the catalog
//! service records. The local gallery is a YAML file under `~/.orrery/`; the
//! optional `catalog` feature adds a client for the remote record store.

#[cfg(feature = "catalog")]
pub mod catalog;
pub mod persistence;

use serde::{Deserialize, Serialize};

pub use persistence::{default_gallery_path, load_gallery, save_gallery};

/// One saved composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_composer")]
    pub composer: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default)]
    pub words: Vec<String>,
    /// Hex theme color, e.g. "#8daabf".
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_name() -> String {
    "Untitled".to_string()
}

fn default_composer() -> String {
    "Anonymous".to_string()
}

fn default_description() -> String {
    "Nothing of note.".to_string()
}

fn default_theme() -> String {
    "#8daabf".to_string()
}

impl Piece {
    /// A piece with default metadata around a word list.
    pub fn from_words(words: Vec<String>) -> Self {
        Self {
            name: default_name(),
            composer: default_composer(),
            description: default_description(),
            words,
            theme: default_theme(),
        }
    }
}
