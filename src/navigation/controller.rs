//! Navigation controller: turns inbound user actions into catalog reads,
//! catalog mutations, and replies.

use std::sync::Arc;

use super::action::{MenuAction, SubcategoryKey};
use super::reply::{Button, Reply};
use super::session::{SessionState, SessionStore, UserKey};
use crate::core::config;
use crate::core::error::{StorageError, ValidationError};
use crate::storage::{CatalogStore, ImageRef, ImageTarget};

const WELCOME_TEXT: &str = "Welcome to the Image Categorizer Bot!";
const CHOOSE_CATEGORY_TEXT: &str = "Choose a category:";
const NO_IMAGES_TEXT: &str = "No images in this subcategory.";
const ASK_CATEGORY_NAME_TEXT: &str = "Send the name of the new category.";
const ASK_IMAGE_TEXT: &str = "Upload an image and send the category/subcategory (format: `category:subcategory`).";

const VIEW_CATEGORIES_LABEL: &str = "View Categories";
const ADD_CATEGORY_LABEL: &str = "Add Category";
const ADD_IMAGE_LABEL: &str = "Add Image";
const BACK_LABEL: &str = "Back";

/// One size variant of an uploaded photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoVariant {
    pub image: ImageRef,
    pub width: u32,
    pub height: u32,
}

impl PhotoVariant {
    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// An inbound user action, already classified by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// The `/start` command
    Start,
    /// A button press carrying its callback data
    Callback(String),
    /// A plain (non-command) text message
    Text(String),
    /// A photo message with its size variants and caption
    Photo {
        variants: Vec<PhotoVariant>,
        caption: Option<String>,
    },
}

/// Drives the per-user menu flow against the catalog store
#[derive(Debug, Clone)]
pub struct Navigator {
    store: Arc<CatalogStore>,
    sessions: SessionStore,
}

impl Navigator {
    pub fn new(store: Arc<CatalogStore>, sessions: SessionStore) -> Self {
        Self { store, sessions }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handles one inbound action for `user`.
    ///
    /// Returns the reply to deliver, or `None` when the action is ignored.
    /// Validation failures are answered with a text reply; only storage
    /// failures surface as errors.
    pub async fn handle(&self, user: UserKey, inbound: Inbound) -> Result<Option<Reply>, StorageError> {
        match inbound {
            Inbound::Start => Ok(Some(self.main_menu())),
            Inbound::Callback(data) => match MenuAction::parse(&data) {
                Some(action) => self.on_menu_action(user, action).await.map(Some),
                None => {
                    log::debug!("Ignoring unknown callback data {:?} from user {}", data, user);
                    Ok(None)
                }
            },
            Inbound::Text(text) => self.on_text(user, &text).await,
            Inbound::Photo { variants, caption } => self.on_photo(user, &variants, caption.as_deref()).await,
        }
    }

    /// Handles a decoded menu button press.
    pub async fn on_menu_action(&self, user: UserKey, action: MenuAction) -> Result<Reply, StorageError> {
        match action {
            MenuAction::Start => Ok(self.main_menu()),
            MenuAction::ViewCategories => self.categories_menu().await,
            MenuAction::Category(name) => self.category_menu(&name).await,
            MenuAction::Subcategory(key) => self.subcategory_images(&key).await,
            MenuAction::AddCategory => {
                self.sessions.set(user, SessionState::AwaitingCategoryName);
                Ok(Reply::text(ASK_CATEGORY_NAME_TEXT))
            }
            MenuAction::AddImage => {
                self.sessions.set(user, SessionState::AwaitingImageTarget);
                Ok(Reply::text(ASK_IMAGE_TEXT))
            }
        }
    }

    /// Top-level menu
    pub fn main_menu(&self) -> Reply {
        Reply::menu(
            WELCOME_TEXT,
            [
                Button::new(VIEW_CATEGORIES_LABEL, MenuAction::ViewCategories.callback_data()),
                Button::new(ADD_CATEGORY_LABEL, MenuAction::AddCategory.callback_data()),
                Button::new(ADD_IMAGE_LABEL, MenuAction::AddImage.callback_data()),
            ],
        )
    }

    async fn categories_menu(&self) -> Result<Reply, StorageError> {
        let catalog = self.store.load().await?;
        let buttons = catalog
            .category_names()
            .map(|name| Button::new(name, MenuAction::Category(name.to_string()).callback_data()))
            .chain(std::iter::once(Button::new(BACK_LABEL, MenuAction::Start.callback_data())));
        Ok(Reply::menu(CHOOSE_CATEGORY_TEXT, buttons))
    }

    async fn category_menu(&self, category: &str) -> Result<Reply, StorageError> {
        let catalog = self.store.load().await?;
        let buttons = catalog
            .subcategory_names(category)
            .into_iter()
            .map(|sub| Button::new(sub, MenuAction::subcategory(category, sub).callback_data()))
            .chain(std::iter::once(Button::new(
                BACK_LABEL,
                MenuAction::ViewCategories.callback_data(),
            )));
        Ok(Reply::menu(format!("Subcategories in {category}:"), buttons))
    }

    async fn subcategory_images(&self, key: &SubcategoryKey) -> Result<Reply, StorageError> {
        let catalog = self.store.load().await?;
        let images = key
            .resolve(&catalog)
            .map(|(category, subcategory)| catalog.images(category, subcategory))
            .unwrap_or(&[]);

        if images.is_empty() {
            log::debug!("No images under {:?}", key.as_str());
            return Ok(Reply::text(NO_IMAGES_TEXT));
        }
        Ok(Reply::MediaBatch(images.to_vec()))
    }

    async fn on_text(&self, user: UserKey, text: &str) -> Result<Option<Reply>, StorageError> {
        if !self.sessions.take(user, SessionState::AwaitingCategoryName) {
            log::debug!("Ignoring text from user {} with no pending category name", user);
            return Ok(None);
        }

        let outcome = self.store.update(|catalog| catalog.add_category(text)).await?;
        let reply = match outcome {
            Ok(()) => {
                log::info!("User {} added category {:?}", user, text);
                if !MenuAction::Category(text.to_string()).fits_callback_data() {
                    log::warn!(
                        "Category {:?} exceeds the {}-byte callback limit; its button will be rejected by Telegram",
                        text,
                        config::telegram::CALLBACK_DATA_MAX
                    );
                }
                format!("Category '{text}' added successfully!")
            }
            Err(rejected) => rejected_text(user, &rejected),
        };
        Ok(Some(Reply::text(reply)))
    }

    async fn on_photo(
        &self,
        user: UserKey,
        variants: &[PhotoVariant],
        caption: Option<&str>,
    ) -> Result<Option<Reply>, StorageError> {
        if !self.sessions.take(user, SessionState::AwaitingImageTarget) {
            log::debug!("Ignoring photo from user {} with no pending upload", user);
            return Ok(None);
        }

        let Some(largest) = variants.iter().max_by_key(|v| v.area()) else {
            log::warn!("Photo message from user {} carried no size variants", user);
            return Ok(None);
        };

        let target = match ImageTarget::parse(caption.unwrap_or_default()) {
            Ok(target) => target,
            Err(rejected) => return Ok(Some(Reply::text(rejected_text(user, &rejected)))),
        };

        let image = largest.image.clone();
        let outcome = self
            .store
            .update(|catalog| catalog.file_image(&target, image))
            .await?;
        let reply = match outcome {
            Ok(()) => {
                log::info!(
                    "User {} filed image under {}/{}",
                    user,
                    target.category,
                    target.subcategory
                );
                if !MenuAction::subcategory(&target.category, &target.subcategory).fits_callback_data() {
                    log::warn!(
                        "Subcategory {}/{} exceeds the {}-byte callback limit; its button will be rejected by Telegram",
                        target.category,
                        target.subcategory,
                        config::telegram::CALLBACK_DATA_MAX
                    );
                }
                format!("Image added to {}/{}!", target.category, target.subcategory)
            }
            Err(rejected) => rejected_text(user, &rejected),
        };
        Ok(Some(Reply::text(reply)))
    }
}

fn rejected_text(user: UserKey, rejected: &ValidationError) -> String {
    log::info!("Rejected input from user {}: {:?}", user, rejected);
    rejected.to_string()
}
