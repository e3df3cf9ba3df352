//! Delivery of navigation replies through the Bot API
//!
//! Text replies to a button press edit the message that carried the button;
//! text replies to a message are sent as new messages. Image batches are sent
//! as media groups of at most ten photos, with a lone photo sent on its own
//! because Telegram rejects single-item groups.

use teloxide::prelude::*;
use teloxide::types::{
    FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia, InputMediaPhoto, MessageId,
};
use teloxide::RequestError;

use crate::core::config;
use crate::navigation::{Button, Reply};
use crate::storage::ImageRef;
use crate::telegram::Bot;

/// Where a reply goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTarget {
    /// Send a new message to the chat
    Chat(ChatId),
    /// Replace the text of an existing bot message
    Edit { chat_id: ChatId, message_id: MessageId },
}

impl ReplyTarget {
    pub fn chat_id(&self) -> ChatId {
        match *self {
            Self::Chat(chat_id) | Self::Edit { chat_id, .. } => chat_id,
        }
    }
}

/// Sends `reply` to `target`.
pub async fn deliver(bot: &Bot, target: ReplyTarget, reply: Reply) -> Result<(), RequestError> {
    match reply {
        Reply::Text { text, keyboard } => {
            let markup = keyboard_markup(&keyboard);
            match target {
                ReplyTarget::Chat(chat_id) => {
                    let request = bot.send_message(chat_id, text);
                    match markup {
                        Some(markup) => request.reply_markup(markup).await?,
                        None => request.await?,
                    };
                }
                ReplyTarget::Edit { chat_id, message_id } => {
                    let request = bot.edit_message_text(chat_id, message_id, text);
                    match markup {
                        Some(markup) => request.reply_markup(markup).await?,
                        None => request.await?,
                    };
                }
            }
        }
        Reply::MediaBatch(images) => send_images(bot, target.chat_id(), &images).await?,
    }
    Ok(())
}

/// Inline keyboard for `rows`; `None` when there are no buttons.
pub fn keyboard_markup(rows: &[Vec<Button>]) -> Option<InlineKeyboardMarkup> {
    if rows.iter().all(Vec::is_empty) {
        return None;
    }
    Some(InlineKeyboardMarkup::new(rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.callback.clone()))
            .collect::<Vec<_>>()
    })))
}

/// Splits a batch into Telegram-sized media groups.
pub fn media_groups(images: &[ImageRef]) -> Vec<&[ImageRef]> {
    images.chunks(config::telegram::MEDIA_GROUP_MAX).collect()
}

async fn send_images(bot: &Bot, chat_id: ChatId, images: &[ImageRef]) -> Result<(), RequestError> {
    for group in media_groups(images) {
        match group {
            [single] => {
                bot.send_photo(chat_id, InputFile::file_id(FileId(single.clone())))
                    .await?;
            }
            _ => {
                let media = group
                    .iter()
                    .map(|id| InputMedia::Photo(InputMediaPhoto::new(InputFile::file_id(FileId(id.clone())))));
                bot.send_media_group(chat_id, media).await?;
            }
        }
    }
    log::debug!("Sent {} image(s) to chat {}", images.len(), chat_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn ids(n: usize) -> Vec<ImageRef> {
        (0..n).map(|i| format!("img{i}")).collect()
    }

    #[test]
    fn test_keyboard_markup_preserves_rows_and_callbacks() {
        let rows = vec![
            vec![Button::new("Animals", "category_Animals")],
            vec![Button::new("Back", "start")],
        ];

        let markup = keyboard_markup(&rows).unwrap();

        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "Animals");
        assert!(matches!(
            &markup.inline_keyboard[1][0].kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "start"
        ));
    }

    #[test]
    fn test_keyboard_markup_empty_is_none() {
        assert!(keyboard_markup(&[]).is_none());
        assert!(keyboard_markup(&[vec![]]).is_none());
    }

    #[test]
    fn test_media_groups_respect_telegram_limit() {
        let images = ids(23);
        let sizes: Vec<usize> = media_groups(&images).iter().map(|g| g.len()).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
    }

    #[test]
    fn test_media_groups_keep_order() {
        let images = ids(12);
        let groups = media_groups(&images);
        assert_eq!(groups[0][0], "img0");
        assert_eq!(groups[1], ["img10", "img11"]);
    }

    #[test]
    fn test_reply_target_chat_id() {
        let edit = ReplyTarget::Edit {
            chat_id: ChatId(5),
            message_id: MessageId(9),
        };
        assert_eq!(edit.chat_id(), ChatId(5));
        assert_eq!(ReplyTarget::Chat(ChatId(6)).chat_id(), ChatId(6));
    }
}
