//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{MaybeInaccessibleMessage, Message};

use super::types::{user_key, HandlerDeps, HandlerError};
use crate::core::error::AppError;
use crate::navigation::{Inbound, PhotoVariant, UserKey};
use crate::telegram::bot::Command;
use crate::telegram::render::{deliver, ReplyTarget};
use crate::telegram::Bot;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same tree is used in production and can be fed mock updates in tests.
///
/// # Arguments
/// * `deps` - Handler dependencies (navigation controller)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(command_handler(deps.clone()))
        .branch(message_handler(deps.clone()))
        .branch(callback_handler(deps))
}

/// Runs `inbound` through the controller and delivers the reply, if any.
///
/// Storage and delivery failures are logged and returned as [`AppError`] so the
/// dispatcher's error handler sees them.
async fn respond(
    bot: &Bot,
    deps: &HandlerDeps,
    target: ReplyTarget,
    user: UserKey,
    inbound: Inbound,
) -> Result<(), HandlerError> {
    let reply = match deps.navigator.handle(user, inbound).await {
        Ok(Some(reply)) => reply,
        Ok(None) => return Ok(()),
        Err(e) => {
            log::error!("❌ Catalog storage failure for user {}: {}", user, e);
            return Err(Box::new(AppError::Storage(e)) as HandlerError);
        }
    };

    if let Err(e) = deliver(bot, target, reply).await {
        log::error!("❌ Failed to deliver reply to chat {}: {}", target.chat_id(), e);
        return Err(Box::new(AppError::Telegram(e)) as HandlerError);
    }
    Ok(())
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);
                let Some(user) = msg.from.as_ref().map(user_key) else {
                    return Ok(());
                };

                match cmd {
                    Command::Start => respond(&bot, &deps, ReplyTarget::Chat(msg.chat.id), user, Inbound::Start).await,
                }
            }
        },
    ))
}

/// Photos and plain text that reached past the command branch
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let deps = deps.clone();
        async move {
            let Some((user, inbound)) = message_inbound(&msg) else {
                return Ok(());
            };
            if matches!(inbound, Inbound::Photo { .. }) {
                log::debug!("📷 Photo from user {} in chat {}", user, msg.chat.id);
            }
            respond(&bot, &deps, ReplyTarget::Chat(msg.chat.id), user, inbound).await
        }
    })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            let _ = bot.answer_callback_query(q.id.clone()).await;

            let Some((user, target, inbound)) = callback_inbound(&q) else {
                return Ok(());
            };
            log::info!("🔘 Callback {:?} from user {}", inbound, user);

            respond(&bot, &deps, target, user, inbound).await
        }
    })
}

/// Classifies a non-command message for the navigation controller.
///
/// A photo wins over any text; its caption travels with it. Text starting with
/// `/` is a command and is left alone. Messages without a sender, and every
/// other kind of message, yield `None`.
pub fn message_inbound(msg: &Message) -> Option<(UserKey, Inbound)> {
    let user = msg.from.as_ref().map(user_key)?;

    if let Some(sizes) = msg.photo() {
        let variants = sizes
            .iter()
            .map(|p| PhotoVariant {
                image: p.file.id.0.clone(),
                width: p.width,
                height: p.height,
            })
            .collect();
        let inbound = Inbound::Photo {
            variants,
            caption: msg.caption().map(str::to_string),
        };
        return Some((user, inbound));
    }

    match msg.text() {
        Some(text) if !text.starts_with('/') => Some((user, Inbound::Text(text.to_string()))),
        _ => None,
    }
}

/// Classifies a button press: who pressed it, where the reply goes, and the payload.
///
/// Presses without data or without an attached message yield `None`.
pub fn callback_inbound(q: &CallbackQuery) -> Option<(UserKey, ReplyTarget, Inbound)> {
    let data = q.data.clone()?;
    let Some(target) = q.message.as_ref().map(callback_target) else {
        log::warn!("Callback {:?} from user {} has no message attached", data, q.from.id);
        return None;
    };
    Some((user_key(&q.from), target, Inbound::Callback(data)))
}

/// Accessible messages are edited in place; inaccessible ones get a fresh message.
fn callback_target(message: &MaybeInaccessibleMessage) -> ReplyTarget {
    match message {
        MaybeInaccessibleMessage::Regular(msg) => ReplyTarget::Edit {
            chat_id: msg.chat.id,
            message_id: msg.id,
        },
        MaybeInaccessibleMessage::Inaccessible(inaccessible) => ReplyTarget::Chat(inaccessible.chat.id),
    }
}
