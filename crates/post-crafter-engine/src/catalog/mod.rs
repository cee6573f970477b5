//! Static drafting data: brainstorm ideas, quick-start prompts and the
//! pre-written captions for each post type.
//!
//! The catalog has no behaviour beyond lookup. "Generating" posts means
//! expanding the selected post types into one [`GeneratedPost`] per caption.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN: &str = include_str!("builtin.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Post type id '{0}' is used more than once")]
    DuplicatePostType(String),

    #[error("Post type '{0}' has no captions")]
    NoCaptions(String),

    #[error("Unknown post type '{0}'")]
    UnknownPostType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickStart {
    pub label: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostType {
    pub id: String,
    pub title: String,
    pub description: String,
    pub captions: Vec<String>,
}

/// One caption variant produced for a selected post type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPost {
    /// `"{post_type_id}-{caption_index}"`
    pub id: String,
    pub title: String,
    pub description: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub ideas: Vec<String>,
    #[serde(default)]
    pub quick_start: Vec<QuickStart>,
    pub post_types: Vec<PostType>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(BUILTIN)
    }

    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml(&content)?;
        log::info!(
            "Loaded catalog from {} ({} post types)",
            path.display(),
            catalog.post_types.len()
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for post_type in &self.post_types {
            if !seen.insert(post_type.id.as_str()) {
                return Err(CatalogError::DuplicatePostType(post_type.id.clone()));
            }
            if post_type.captions.is_empty() {
                return Err(CatalogError::NoCaptions(post_type.id.clone()));
            }
        }
        Ok(())
    }

    pub fn post_type(&self, id: &str) -> Option<&PostType> {
        self.post_types.iter().find(|post_type| post_type.id == id)
    }

    pub fn quick_start(&self, index: usize) -> Option<&QuickStart> {
        self.quick_start.get(index)
    }

    /// Expand each selected post type into its caption variants, keeping
    /// the order in which the types were selected.
    pub fn generate_posts<S: AsRef<str>>(
        &self,
        selected: &[S],
    ) -> Result<Vec<GeneratedPost>, CatalogError> {
        let mut posts = Vec::new();
        for id in selected {
            let id = id.as_ref();
            let post_type = self
                .post_type(id)
                .ok_or_else(|| CatalogError::UnknownPostType(id.to_string()))?;

            posts.extend(
                post_type
                    .captions
                    .iter()
                    .enumerate()
                    .map(|(index, caption)| GeneratedPost {
                        id: format!("{}-{index}", post_type.id),
                        title: post_type.title.clone(),
                        description: post_type.description.clone(),
                        caption: caption.clone(),
                    }),
            );
        }
        Ok(posts)
    }
}
