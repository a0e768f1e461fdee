//! Report escalation and the moderation actions that resolve it
//!
//! The first report of a post creates an escalation record holding a snapshot
//! of the post; later reports only bump its counter. Lookup and create/increment
//! are two separate store calls, so concurrent first reports of the same post
//! can race. The store's uniqueness on the post id turns the loser into an error
//! instead of a second record.

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{EntityId, ReportedPost},
};

/// How many escalation records the moderation list returns by default
pub const DEFAULT_REPORT_LIST_LIMIT: usize = 20;

pub async fn report_post(store: &dyn Store, post_id: &EntityId) -> AppResult<ReportedPost> {
    let post = store.get_post(post_id).await?;

    match store.find_report_by_post(post_id).await? {
        None => {
            let report = ReportedPost::first_report(post);
            store.insert_report(&report).await?;
            tracing::info!(post_id = %post_id, report_id = %report.id, "Post reported for the first time");
            Ok(report)
        }
        Some(existing) => {
            if store.increment_report(post_id).await? == 0 {
                // Dismissed between lookup and increment
                return Err(AppError::not_found("report for post", post_id));
            }
            let report_count = existing.report_count + 1;
            tracing::info!(post_id = %post_id, report_count, "Post report escalated");
            Ok(ReportedPost {
                report_count,
                ..existing
            })
        }
    }
}

/// Removes the escalation record, leaving the post itself untouched
pub async fn dismiss_report(store: &dyn Store, post_id: &EntityId) -> AppResult<()> {
    if store.delete_report(post_id).await? == 0 {
        return Err(AppError::not_found("report for post", post_id));
    }

    tracing::info!(post_id = %post_id, "Report removed");
    Ok(())
}

pub async fn list_reported_posts(
    store: &dyn Store,
    limit: Option<usize>,
) -> AppResult<Vec<ReportedPost>> {
    store
        .list_reports(limit.unwrap_or(DEFAULT_REPORT_LIST_LIMIT))
        .await
}

/// Deletes the reported post, then its escalation record
///
/// The post may already be gone (its author deleted it); the record is still
/// removed. The two deletes are not atomic: if the second fails the record
/// outlives the post until it is dismissed.
pub async fn resolve_reported_post(store: &dyn Store, post_id: &EntityId) -> AppResult<()> {
    if store.find_report_by_post(post_id).await?.is_none() {
        return Err(AppError::not_found("report for post", post_id));
    }

    if store.delete_post(post_id).await? == 0 {
        tracing::warn!(post_id = %post_id, "Reported post was already deleted");
    }

    dismiss_report(store, post_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{MovieRef, Post};

    async fn store_with_post() -> (MemoryStore, Post) {
        let store = MemoryStore::new();
        let post = Post::new(EntityId::new(), MovieRef::with_id(1), "spoilers".into());
        store.insert_post(&post).await.unwrap();
        (store, post)
    }

    #[tokio::test]
    async fn test_report_count_tracks_reports() {
        let (store, post) = store_with_post().await;

        let first = report_post(&store, &post.id).await.unwrap();
        assert_eq!(first.report_count, 1);

        for _ in 0..4 {
            report_post(&store, &post.id).await.unwrap();
        }

        let stored = store.find_report_by_post(&post.id).await.unwrap().unwrap();
        assert_eq!(stored.report_count, 5);
        assert_eq!(stored.id, first.id);
    }

    #[tokio::test]
    async fn test_snapshot_not_refreshed() {
        let (store, mut post) = store_with_post().await;
        report_post(&store, &post.id).await.unwrap();

        post.content = "edited".into();
        store.insert_post(&post).await.unwrap();
        let report = report_post(&store, &post.id).await.unwrap();

        assert_eq!(report.post.content, "spoilers");
        assert_eq!(report.report_count, 2);
    }

    #[tokio::test]
    async fn test_report_missing_post() {
        let store = MemoryStore::new();
        let result = report_post(&store, &EntityId::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_dismiss_removes_record() {
        let (store, post) = store_with_post().await;
        report_post(&store, &post.id).await.unwrap();

        dismiss_report(&store, &post.id).await.unwrap();

        assert!(store.find_report_by_post(&post.id).await.unwrap().is_none());
        assert!(store.get_post(&post.id).await.is_ok());
        assert!(matches!(
            dismiss_report(&store, &post.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_deletes_post_and_record() {
        let (store, post) = store_with_post().await;
        report_post(&store, &post.id).await.unwrap();

        resolve_reported_post(&store, &post.id).await.unwrap();

        assert!(matches!(
            store.get_post(&post.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(store.find_report_by_post(&post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resolve_tolerates_deleted_post() {
        let (store, post) = store_with_post().await;
        report_post(&store, &post.id).await.unwrap();
        store.delete_post(&post.id).await.unwrap();

        resolve_reported_post(&store, &post.id).await.unwrap();
        assert!(store.find_report_by_post(&post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_count() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for reports in [1, 3, 2] {
            let post = Post::new(EntityId::new(), MovieRef::with_id(1), "x".into());
            store.insert_post(&post).await.unwrap();
            for _ in 0..reports {
                report_post(&store, &post.id).await.unwrap();
            }
            ids.push(post.id);
        }

        let listed = list_reported_posts(&store, None).await.unwrap();
        let counts: Vec<u32> = listed.iter().map(|r| r.report_count).collect();
        assert_eq!(counts, vec![3, 2, 1]);

        let top = list_reported_posts(&store, Some(1)).await.unwrap();
        assert_eq!(top[0].post_id(), ids[1]);
    }
}
