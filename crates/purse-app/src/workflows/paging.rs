//! Shared reload/load-more plumbing for paginated streams.

use futures_signals::signal::Mutable;
use std::future::Future;

use purse_core::{GateToken, Generation};

use crate::bridge::{ApiError, Page, PageRequest};
use crate::core::{AppCore, ListStream, StreamId};
use crate::errors::AppError;
use crate::views::{OperationKey, PagedList};
use crate::workflows::{surface, DropReason, LoadOutcome};

/// Root load: void in-flight page advances, bump the generation, clear the
/// list and fetch page 1.
///
/// `reset` runs in the same critical section as the generation bump.
pub(crate) async fn reload_list<T, F, Fut>(
    app: &AppCore,
    list: ListStream,
    items: &Mutable<PagedList<T>>,
    reset: impl FnOnce(),
    fetch: F,
) -> Result<LoadOutcome, AppError>
where
    F: FnOnce(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    let key = list.reload_key();
    let _guard = app.operations().begin(key);

    let gate = app.gate(list);
    let (generation, ()) = app.generations().begin_with(list.stream(), || {
        gate.reset();
        items.lock_mut().clear();
        reset();
    });
    tracing::debug!(%list, %generation, "reloading list");

    let result = fetch(first_page(app)).await;
    settle(app, key, &generation, result, |page| {
        items.lock_mut().replace_with(page);
        true
    })
}

/// Page advance: single-flight per page, appended only if no root load
/// started since the advance began.
///
/// `fetch` is called after the generation is captured, so any state it
/// reads belongs to that generation or a later one.
pub(crate) async fn load_more_list<T, F, Fut>(
    app: &AppCore,
    list: ListStream,
    items: &Mutable<PagedList<T>>,
    page: u32,
    fetch: F,
) -> Result<LoadOutcome, AppError>
where
    F: FnOnce(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    // Captured before the gate so a reset landing in between is still seen
    let generation = app.generations().current(list.stream());
    let token = GateToken::page(list.gate_prefix(), page);
    let Some(_lease) = app.gate(list).try_acquire(token) else {
        tracing::debug!(%list, page, "page already in flight");
        return Ok(LoadOutcome::Dropped(DropReason::GateRejected));
    };

    let key = list.load_more_key();
    let _guard = app.operations().begin(key);
    tracing::debug!(%list, %generation, page, "loading next page");

    let request = PageRequest {
        page,
        size: app.config().page_size,
    };
    let result = fetch(request).await;
    settle(app, key, &generation, result, |next| items.lock_mut().append(next))
}

/// Apply `result` if `generation` is still current, otherwise drop it.
///
/// `apply` returns `false` when the response no longer fits the state it
/// would be applied to; that is reported as a stale drop too. Failures of
/// superseded requests are dropped without reaching the user.
pub(crate) fn settle<T>(
    app: &AppCore,
    key: OperationKey,
    generation: &Generation<StreamId>,
    result: Result<T, ApiError>,
    apply: impl FnOnce(T) -> bool,
) -> Result<LoadOutcome, AppError> {
    match result {
        Ok(value) => match app.generations().apply_if_current(generation, || apply(value)) {
            Some(true) => Ok(LoadOutcome::Applied),
            Some(false) => {
                tracing::debug!(%key, %generation, "dropping response that no longer fits");
                Ok(LoadOutcome::Dropped(DropReason::StaleResponse))
            }
            None => Ok(LoadOutcome::Dropped(DropReason::StaleResponse)),
        },
        Err(err) if !app.is_current(generation) => {
            tracing::debug!(%key, %generation, error = %err, "dropping stale failure");
            Ok(LoadOutcome::Dropped(DropReason::StaleResponse))
        }
        Err(err) => Err(surface(app, key, err)),
    }
}

fn first_page(app: &AppCore) -> PageRequest {
    PageRequest {
        page: 1,
        size: app.config().page_size,
    }
}
