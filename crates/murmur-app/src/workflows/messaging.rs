//! Messaging Workflow - Portable Business Logic
//!
//! Operations every frontend performs against a shared [`ChatSession`]. The
//! session lock is only ever held between awaits, never across one.

use crate::core::{Activation, ChatSession, ViewDelta};
use crate::errors::AppError;
use crate::transport::{ChatTransport, FileUploader, TransportCommand, TransportError};
use murmur_chat::{ChatEvent, ConversationKey};
use murmur_core::UserId;
use parking_lot::Mutex;
use std::sync::Arc;

/// Session shared between a frontend's tasks
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Send commands in order.
///
/// Every command is attempted even after a failure; the first failure is
/// returned.
pub async fn dispatch<T>(transport: &T, commands: Vec<TransportCommand>) -> Result<(), AppError>
where
    T: ChatTransport + ?Sized,
{
    let mut first_error: Option<TransportError> = None;
    for command in commands {
        let name = command.name();
        if let Err(error) = transport.send(command).await {
            tracing::warn!(command = name, error = %error, "command dispatch failed");
            first_error.get_or_insert(error);
        }
    }
    match first_error {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Send activation commands, then settle the activation.
///
/// A failed join is forgotten so the next activation retries it.
async fn settle_activation<T>(
    session: &SharedSession,
    transport: &T,
    key: &ConversationKey,
    commands: Vec<TransportCommand>,
) -> Result<(), AppError>
where
    T: ChatTransport + ?Sized,
{
    let mut first_error: Option<TransportError> = None;
    for command in commands {
        let is_join = matches!(command, TransportCommand::JoinRoom { .. });
        let name = command.name();
        if let Err(error) = transport.send(command).await {
            tracing::warn!(command = name, key = %key, error = %error, "activation command failed");
            if is_join {
                session.lock().forget_join(key);
            }
            first_error.get_or_insert(error);
        }
    }

    if let Some(error) = first_error {
        return Err(error.into());
    }
    session.lock().complete_activation(key);
    Ok(())
}

/// Sign in and open the initial conversation
///
/// **What it does**: Records the local user and reopens the last (or default)
/// conversation
/// **Returns**: The activated conversation, if any
pub async fn connect<T>(
    session: &SharedSession,
    transport: &T,
    self_id: UserId,
) -> Result<Option<ConversationKey>, AppError>
where
    T: ChatTransport + ?Sized,
{
    let (commands, key) = {
        let mut guard = session.lock();
        let commands = guard.connect(self_id);
        (commands, guard.activation().active_key().cloned())
    };
    if let Some(key) = &key {
        settle_activation(session, transport, key, commands).await?;
    }
    tracing::info!(key = ?key.as_ref().map(ConversationKey::as_str), "connected");
    Ok(key)
}

/// Select a conversation
///
/// **What it does**: Joins the room if needed, clears its unread count and
/// sends read receipts for what is now visible
/// **Returns**: Header label and avatar of the conversation
pub async fn activate_conversation<T>(
    session: &SharedSession,
    transport: &T,
    key: &ConversationKey,
) -> Result<Activation, AppError>
where
    T: ChatTransport + ?Sized,
{
    let activation = session.lock().activate(key);
    settle_activation(session, transport, key, activation.commands.clone()).await?;
    Ok(activation)
}

/// Apply an inbound event and send the commands it triggered
pub async fn handle_event<T>(
    session: &SharedSession,
    transport: &T,
    event: ChatEvent,
) -> Result<ViewDelta, AppError>
where
    T: ChatTransport + ?Sized,
{
    let outcome = session.lock().handle_event(event);
    dispatch(transport, outcome.commands).await?;
    Ok(outcome.delta)
}

/// Send text to the active conversation
///
/// **What it does**: Trims the text, logs a local echo and sends it to the
/// room or DM partner
/// **Returns**: `false` when the text was blank and nothing was sent
pub async fn send_text<T>(
    session: &SharedSession,
    transport: &T,
    text: &str,
) -> Result<bool, AppError>
where
    T: ChatTransport + ?Sized,
{
    let command = session.lock().compose_text(text)?;
    let Some(command) = command else {
        return Ok(false);
    };
    dispatch(transport, vec![command]).await?;
    Ok(true)
}

/// Upload a file and share it in the active conversation
///
/// **What it does**: Uploads the bytes, then shares the returned URL with the
/// conversation that was active when the upload started
/// **Returns**: The conversation the file went to
///
/// An upload failure is returned as is and nothing is logged or sent.
pub async fn send_file<T, U>(
    session: &SharedSession,
    transport: &T,
    uploader: &U,
    bytes: Vec<u8>,
    file_name: &str,
) -> Result<ConversationKey, AppError>
where
    T: ChatTransport + ?Sized,
    U: FileUploader + ?Sized,
{
    let key = session.lock().send_target()?;
    let uploaded = match uploader.upload(bytes, file_name).await {
        Ok(uploaded) => uploaded,
        Err(error) => {
            tracing::warn!(file = file_name, key = %key, error = %error, "upload failed");
            return Err(error.into());
        }
    };
    let command = session.lock().compose_file(&key, uploaded, file_name)?;
    dispatch(transport, vec![command]).await?;
    tracing::info!(file = file_name, key = %key, "file shared");
    Ok(key)
}

/// Toggle an emoji on a confirmed message
pub async fn toggle_reaction<T>(
    session: &SharedSession,
    transport: &T,
    message_ref: &str,
    emoji: &str,
) -> Result<(), AppError>
where
    T: ChatTransport + ?Sized,
{
    let command = session.lock().toggle_reaction(message_ref, emoji)?;
    dispatch(transport, vec![command]).await
}

/// Broadcast the typing indicator for the active conversation.
/// No-op without one.
pub async fn set_typing<T>(
    session: &SharedSession,
    transport: &T,
    is_typing: bool,
) -> Result<(), AppError>
where
    T: ChatTransport + ?Sized,
{
    let command = session.lock().set_typing(is_typing);
    match command {
        Some(command) => dispatch(transport, vec![command]).await,
        None => Ok(()),
    }
}
