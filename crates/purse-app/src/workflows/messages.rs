//! Messages Workflow - Inbox
//!
//! The inbox is paginated exactly like bills but on its own generation
//! stream and gate namespace (`message.page.<n>`), so reloading one list
//! never discards responses for the other.

use crate::core::{AppCore, ListStream};
use crate::errors::AppError;
use crate::workflows::paging::{load_more_list, reload_list};
use crate::workflows::LoadOutcome;

/// Reload the inbox from page 1.
pub async fn reload(app: &AppCore) -> Result<LoadOutcome, AppError> {
    let api = app.api();
    reload_list(
        app,
        ListStream::Messages,
        &app.views().messages,
        || {},
        |request| async move { api.fetch_messages(request).await },
    )
    .await
}

/// Fetch and append inbox page `page`.
pub async fn load_more(app: &AppCore, page: u32) -> Result<LoadOutcome, AppError> {
    let api = app.api();
    load_more_list(
        app,
        ListStream::Messages,
        &app.views().messages,
        page,
        |request| async move { api.fetch_messages(request).await },
    )
    .await
}

/// Load the page after the last loaded one, if any.
pub async fn load_next(app: &AppCore) -> Result<Option<LoadOutcome>, AppError> {
    match app.messages().next_page() {
        Some(page) => load_more(app, page).await.map(Some),
        None => Ok(None),
    }
}
