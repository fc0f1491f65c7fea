//! Bills Workflow - Transaction History
//!
//! Paginated bill list. A reload (new filter, pull-to-refresh) is a root
//! request on [`StreamId::Bills`](crate::core::StreamId); page advances are
//! single-flight per page under the `bill.page.<n>` gate tokens.

use crate::bridge::BillFilter;
use crate::core::{AppCore, ListStream};
use crate::errors::AppError;
use crate::workflows::paging::{load_more_list, reload_list};
use crate::workflows::LoadOutcome;

/// Reload the bill list from page 1 under `filter`.
///
/// **What it does**: voids in-flight page advances, clears the list, fetches page 1
/// **Returns**: `Applied`, or `Dropped(StaleResponse)` if a newer reload won
pub async fn reload(app: &AppCore, filter: BillFilter) -> Result<LoadOutcome, AppError> {
    let views = app.views();
    let api = app.api();
    let applied_filter = filter.clone();
    reload_list(
        app,
        ListStream::Bills,
        &views.bills,
        || views.bill_filter.set(applied_filter),
        |request| async move { api.fetch_bills(&filter, request).await },
    )
    .await
}

/// Fetch and append page `page` under the current filter.
///
/// **What it does**: acquires `bill.page.<page>`, fetches, appends if still current
/// **Returns**: `Dropped(GateRejected)` if that page is already loading
pub async fn load_more(app: &AppCore, page: u32) -> Result<LoadOutcome, AppError> {
    let views = app.views();
    let api = app.api();
    load_more_list(app, ListStream::Bills, &views.bills, page, |request| {
        // Read after the generation capture: a reload landing in between
        // makes this page stale instead of mixing filters
        let filter = views.bill_filter.get_cloned();
        async move { api.fetch_bills(&filter, request).await }
    })
    .await
}

/// Load the page after the last loaded one. `None` if the list is exhausted
/// or has not been loaded yet.
pub async fn load_next(app: &AppCore) -> Result<Option<LoadOutcome>, AppError> {
    match app.bills().next_page() {
        Some(page) => load_more(app, page).await.map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BillKind;
    use crate::test_support::test_app;
    use crate::views::OperationKey;

    #[tokio::test]
    async fn test_reload_then_load_next() {
        let app = test_app();
        let outcome = reload(&app, BillFilter::default()).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(app.bills().page, 1);
        assert!(!app.operation(OperationKey::ReloadBills).loading);

        let outcome = load_next(&app).await.unwrap();
        assert_eq!(outcome, Some(LoadOutcome::Applied));
        assert_eq!(app.bills().page, 2);
        assert_eq!(app.bills().items.len(), 4);
    }

    #[tokio::test]
    async fn test_reload_records_filter() {
        let app = test_app();
        let filter = BillFilter {
            kind: Some(BillKind::Transfer),
            network: None,
        };
        reload(&app, filter.clone()).await.unwrap();
        assert_eq!(app.bill_filter(), filter);
    }

    #[tokio::test]
    async fn test_load_next_before_reload_is_noop() {
        let app = test_app();
        assert_eq!(load_next(&app).await.unwrap(), None);
    }
}
