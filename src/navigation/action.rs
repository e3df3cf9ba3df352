//! Callback payloads carried by menu buttons
//!
//! Payload formats:
//! - `start`, `view_categories`, `add_category`, `add_image`
//! - `category_<name>`
//! - `subcategory_<category>_<subcategory>`
//!
//! Names may themselves contain `_`, so a subcategory payload is ambiguous on
//! its own and is resolved against the current catalog.

use crate::core::config;
use crate::storage::Catalog;

const START: &str = "start";
const VIEW_CATEGORIES: &str = "view_categories";
const ADD_CATEGORY: &str = "add_category";
const ADD_IMAGE: &str = "add_image";
const CATEGORY_PREFIX: &str = "category_";
const SUBCATEGORY_PREFIX: &str = "subcategory_";

/// A decoded menu button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    ViewCategories,
    Category(String),
    Subcategory(SubcategoryKey),
    AddCategory,
    AddImage,
}

impl MenuAction {
    /// Decodes callback data; unknown payloads yield `None`.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            START => Some(Self::Start),
            VIEW_CATEGORIES => Some(Self::ViewCategories),
            ADD_CATEGORY => Some(Self::AddCategory),
            ADD_IMAGE => Some(Self::AddImage),
            _ => {
                if let Some(rest) = data.strip_prefix(SUBCATEGORY_PREFIX) {
                    Some(Self::Subcategory(SubcategoryKey(rest.to_string())))
                } else {
                    data.strip_prefix(CATEGORY_PREFIX)
                        .map(|name| Self::Category(name.to_string()))
                }
            }
        }
    }

    /// Encodes the action as callback data.
    pub fn callback_data(&self) -> String {
        match self {
            Self::Start => START.to_string(),
            Self::ViewCategories => VIEW_CATEGORIES.to_string(),
            Self::AddCategory => ADD_CATEGORY.to_string(),
            Self::AddImage => ADD_IMAGE.to_string(),
            Self::Category(name) => format!("{CATEGORY_PREFIX}{name}"),
            Self::Subcategory(key) => format!("{SUBCATEGORY_PREFIX}{}", key.0),
        }
    }

    /// Whether Telegram accepts this action as button callback data.
    pub fn fits_callback_data(&self) -> bool {
        self.callback_data().len() <= config::telegram::CALLBACK_DATA_MAX
    }

    pub fn subcategory(category: &str, subcategory: &str) -> Self {
        Self::Subcategory(SubcategoryKey::new(category, subcategory))
    }
}

/// Encoded `<category>_<subcategory>` pair from a subcategory button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategoryKey(String);

impl SubcategoryKey {
    pub fn new(category: &str, subcategory: &str) -> Self {
        Self(format!("{category}_{subcategory}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Finds the `(category, subcategory)` pair this key names in `catalog`.
    ///
    /// Tries each `_` as the separator from left to right and returns the first
    /// split naming an existing subcategory.
    pub fn resolve<'a>(&'a self, catalog: &Catalog) -> Option<(&'a str, &'a str)> {
        self.0
            .match_indices('_')
            .map(|(at, _)| (&self.0[..at], &self.0[at + 1..]))
            .find(|(category, subcategory)| {
                catalog
                    .category(category)
                    .is_some_and(|c| c.contains_subcategory(subcategory))
            })
    }
}
