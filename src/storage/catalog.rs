//! In-memory catalog tree: categories → subcategories → image references
//!
//! The tree serializes transparently to the on-disk document shape:
//!
//! ```json
//! { "Animals": { "Cats": ["file-id-1", "file-id-2"] } }
//! ```
//!
//! Maps keep insertion order so menus list entries in the order they were
//! created, matching the document order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::error::ValidationError;

/// Opaque media handle issued by the transport (a Telegram `file_id`)
pub type ImageRef = String;

/// Subcategories of one category, each with its ordered image list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category {
    subcategories: IndexMap<String, Vec<ImageRef>>,
}

impl Category {
    pub fn is_empty(&self) -> bool {
        self.subcategories.is_empty()
    }

    pub fn subcategory_names(&self) -> impl Iterator<Item = &str> {
        self.subcategories.keys().map(String::as_str)
    }

    pub fn images(&self, subcategory: &str) -> &[ImageRef] {
        self.subcategories.get(subcategory).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_subcategory(&self, subcategory: &str) -> bool {
        self.subcategories.contains_key(subcategory)
    }

    fn append(&mut self, subcategory: &str, image: ImageRef) {
        self.subcategories
            .entry(subcategory.to_string())
            .or_default()
            .push(image);
    }
}

/// The full category tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: IndexMap<String, Category>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn contains_category(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.categories.iter().map(|(name, category)| (name.as_str(), category))
    }

    /// Subcategory names of `category`; empty when the category is unknown.
    pub fn subcategory_names(&self, category: &str) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|c| c.subcategory_names().collect())
            .unwrap_or_default()
    }

    /// Images filed under `category/subcategory`, in filing order.
    pub fn images(&self, category: &str, subcategory: &str) -> &[ImageRef] {
        self.categories
            .get(category)
            .map(|c| c.images(subcategory))
            .unwrap_or(&[])
    }

    /// Total number of image references across the tree
    pub fn image_count(&self) -> usize {
        self.categories
            .values()
            .flat_map(|c| c.subcategories.values())
            .map(Vec::len)
            .sum()
    }

    /// Inserts an empty category. Names are matched exactly.
    pub fn add_category(&mut self, name: &str) -> Result<(), ValidationError> {
        if self.categories.contains_key(name) {
            return Err(ValidationError::CategoryExists(name.to_string()));
        }
        self.categories.insert(name.to_string(), Category::default());
        Ok(())
    }

    /// Appends `image` under the target, creating the subcategory on first use.
    /// The category itself must already exist.
    pub fn file_image(&mut self, target: &ImageTarget, image: ImageRef) -> Result<(), ValidationError> {
        let category = self
            .categories
            .get_mut(&target.category)
            .ok_or_else(|| ValidationError::CategoryMissing(target.category.clone()))?;
        category.append(&target.subcategory, image);
        Ok(())
    }
}

/// Destination of an uploaded image, parsed from a `category:subcategory` caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTarget {
    pub category: String,
    pub subcategory: String,
}

impl ImageTarget {
    /// Parses a caption of exactly two non-empty parts around a single `:`.
    ///
    /// No trimming is applied; `" Animals:Cats"` targets the category `" Animals"`.
    pub fn parse(caption: &str) -> Result<Self, ValidationError> {
        let mut parts = caption.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(category), Some(subcategory), None) if !category.is_empty() && !subcategory.is_empty() => {
                Ok(Self {
                    category: category.to_string(),
                    subcategory: subcategory.to_string(),
                })
            }
            _ => Err(ValidationError::InvalidTarget),
        }
    }
}
