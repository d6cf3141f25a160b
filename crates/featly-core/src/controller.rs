// ── Collection controller ──
//
// Reactive state for one feature session: a list fetch, a single-item
// fetch, and a mutation, each tracked by its own `AsyncResource`, plus the
// filter descriptor the list view is derived from.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::filters::{FilterDescriptor, FilterPatch, FilterState};
use crate::model::{Item, ItemForm, ItemId, ItemPage, MutationOutcome, PageMeta};
use crate::resource::AsyncResource;
use crate::stream::ResourceStream;
use crate::transport::Transport;
use crate::view;

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc`. Actions take `&self` and may overlap; the
/// controller never queues or rejects calls. Failures never surface as
/// `Err`: they land in the matching `*_error` accessor and the action
/// resolves to `None`.
pub struct CollectionController<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    transport: S,
    list: AsyncResource<ItemPage>,
    item: AsyncResource<Item>,
    mutation: AsyncResource<MutationOutcome>,
    filters: FilterState,
}

impl<S> Clone for CollectionController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Transport> CollectionController<S> {
    /// Start a session with the default descriptor. Nothing is fetched
    /// until an action runs.
    pub fn new(transport: S) -> Self {
        Self::with_filters(transport, FilterDescriptor::default())
    }

    pub fn with_filters(transport: S, filters: FilterDescriptor) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                list: AsyncResource::new("list"),
                item: AsyncResource::new("item"),
                mutation: AsyncResource::new("mutation"),
                filters: FilterState::new(filters),
            }),
        }
    }

    pub fn transport(&self) -> &S {
        &self.inner.transport
    }

    // ── Read surface ─────────────────────────────────────────────────

    /// Items of the latest fetched page, in server order.
    /// `None` until the first successful list fetch.
    pub fn items(&self) -> Option<Vec<Item>> {
        self.inner.list.value().map(|page| page.items.clone())
    }

    pub fn page(&self) -> Option<Arc<ItemPage>> {
        self.inner.list.value()
    }

    pub fn page_meta(&self) -> Option<PageMeta> {
        self.inner.list.value().and_then(|page| page.meta)
    }

    /// Latest fetched items, filtered and sorted by the current descriptor.
    pub fn filtered_items(&self) -> Vec<Item> {
        match self.inner.list.value() {
            Some(page) => view::filter_and_sort(&page.items, &self.inner.filters.get()),
            None => Vec::new(),
        }
    }

    pub fn current_item(&self) -> Option<Arc<Item>> {
        self.inner.item.value()
    }

    pub fn last_mutation(&self) -> Option<Arc<MutationOutcome>> {
        self.inner.mutation.value()
    }

    /// True while any of the three resources has a run in flight.
    pub fn loading(&self) -> bool {
        self.loading_items() || self.loading_item() || self.saving_item()
    }

    pub fn loading_items(&self) -> bool {
        self.inner.list.is_loading()
    }

    pub fn loading_item(&self) -> bool {
        self.inner.item.is_loading()
    }

    pub fn saving_item(&self) -> bool {
        self.inner.mutation.is_loading()
    }

    pub fn list_error(&self) -> Option<Arc<CoreError>> {
        self.inner.list.last_error()
    }

    pub fn item_error(&self) -> Option<Arc<CoreError>> {
        self.inner.item.last_error()
    }

    pub fn save_error(&self) -> Option<Arc<CoreError>> {
        self.inner.mutation.last_error()
    }

    pub fn filters(&self) -> FilterDescriptor {
        self.inner.filters.get()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Notified only when the descriptor actually changes.
    pub fn subscribe_filters(&self) -> watch::Receiver<FilterDescriptor> {
        self.inner.filters.subscribe()
    }

    pub fn subscribe_list(&self) -> ResourceStream<ItemPage> {
        self.inner.list.subscribe()
    }

    pub fn subscribe_item(&self) -> ResourceStream<Item> {
        self.inner.item.subscribe()
    }

    pub fn subscribe_mutation(&self) -> ResourceStream<MutationOutcome> {
        self.inner.mutation.subscribe()
    }

    // ── Fetch actions ────────────────────────────────────────────────

    /// Fetch the list using the descriptor as it is when the call starts.
    pub async fn load_items(&self) -> Option<Arc<ItemPage>> {
        let filters = self.inner.filters.get();
        debug!(?filters, "loading items");
        self.inner
            .list
            .run(|| self.inner.transport.list_items(&filters))
            .await
    }

    pub async fn load_item(&self, id: impl Into<ItemId>) -> Option<Arc<Item>> {
        let id = id.into();
        debug!(%id, "loading item");
        self.inner
            .item
            .run(|| self.inner.transport.get_item(&id))
            .await
    }

    // ── Mutations ────────────────────────────────────────────────────
    //
    // None of these refresh the list; call `load_items` afterwards if the
    // view should reflect the change.

    pub async fn create_item(&self, form: &ItemForm) -> Option<Arc<MutationOutcome>> {
        let outcome = self
            .inner
            .mutation
            .run(|| async {
                let item = self.inner.transport.create_item(form).await?;
                Ok::<_, CoreError>(MutationOutcome::Created(item))
            })
            .await;
        if let Some(item) = outcome.as_deref().and_then(MutationOutcome::item) {
            info!(id = %item.id, "item created");
        }
        outcome
    }

    pub async fn update_item(
        &self,
        id: impl Into<ItemId>,
        form: &ItemForm,
    ) -> Option<Arc<MutationOutcome>> {
        let id = id.into();
        let outcome = self
            .inner
            .mutation
            .run(|| async {
                let item = self.inner.transport.update_item(&id, form).await?;
                Ok::<_, CoreError>(MutationOutcome::Updated(item))
            })
            .await;
        if outcome.is_some() {
            info!(%id, "item updated");
        }
        outcome
    }

    pub async fn delete_item(&self, id: impl Into<ItemId>) -> Option<Arc<MutationOutcome>> {
        let id = id.into();
        let outcome = self
            .inner
            .mutation
            .run(|| async {
                self.inner.transport.delete_item(&id).await?;
                Ok::<_, CoreError>(MutationOutcome::Deleted(id.clone()))
            })
            .await;
        if outcome.is_some() {
            info!(%id, "item deleted");
        }
        outcome
    }

    // ── Descriptor actions ───────────────────────────────────────────
    //
    // Each assignment is followed by exactly one list fetch, whether or
    // not the descriptor changed. Subscribers only hear about real changes.

    /// Shallow-merge `patch` into the descriptor, then reload.
    pub async fn update_filters(&self, patch: FilterPatch) -> Option<Arc<ItemPage>> {
        let changed = self.inner.filters.merge(patch);
        debug!(changed, "filters updated");
        self.load_items().await
    }

    /// Restore the default descriptor, then reload.
    pub async fn reset_filters(&self) -> Option<Arc<ItemPage>> {
        let changed = self.inner.filters.replace(FilterDescriptor::default());
        debug!(changed, "filters reset");
        self.load_items().await
    }

    /// Replace the descriptor as a unit, then reload.
    pub async fn set_filters(&self, filters: FilterDescriptor) -> Option<Arc<ItemPage>> {
        let changed = self.inner.filters.replace(filters);
        debug!(changed, "filters replaced");
        self.load_items().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::filters::{SortDirection, SortKey};

    fn item(id: &str, title: &str, month: u32) -> Item {
        let at = Utc.with_ymd_and_hms(2023, month, 1, 0, 0, 0).unwrap();
        Item {
            id: ItemId::from(id),
            title: title.into(),
            description: String::new(),
            created_at: at,
            updated_at: at,
            status: None,
        }
    }

    /// Serves a fixed page and records every list query.
    #[derive(Default)]
    struct FixedPage {
        items: Vec<Item>,
        queries: Mutex<Vec<FilterDescriptor>>,
    }

    impl Transport for FixedPage {
        fn list_items(
            &self,
            filters: &FilterDescriptor,
        ) -> impl Future<Output = Result<ItemPage, CoreError>> + Send {
            self.queries.lock().unwrap().push(filters.clone());
            let page = ItemPage::from(self.items.clone());
            async move { Ok(page) }
        }

        fn get_item(&self, id: &ItemId) -> impl Future<Output = Result<Item, CoreError>> + Send {
            let found = self.items.iter().find(|i| &i.id == id).cloned();
            let id = id.to_string();
            async move {
                found.ok_or(CoreError::NotFound {
                    entity_type: "item".into(),
                    identifier: id,
                })
            }
        }

        fn create_item(
            &self,
            form: &ItemForm,
        ) -> impl Future<Output = Result<Item, CoreError>> + Send {
            let mut created = item("new", &form.title, 6);
            created.description.clone_from(&form.description);
            async move { Ok(created) }
        }

        fn update_item(
            &self,
            _id: &ItemId,
            _form: &ItemForm,
        ) -> impl Future<Output = Result<Item, CoreError>> + Send {
            async move {
                Err(CoreError::ValidationFailed {
                    message: "title is required".into(),
                })
            }
        }

        fn delete_item(&self, _id: &ItemId) -> impl Future<Output = Result<(), CoreError>> + Send {
            async move { Ok(()) }
        }
    }

    fn controller() -> CollectionController<FixedPage> {
        CollectionController::new(FixedPage {
            items: vec![item("1", "Alpha", 1), item("2", "Beta", 2)],
            ..FixedPage::default()
        })
    }

    #[tokio::test]
    async fn nothing_is_fetched_before_first_action() {
        let c = controller();
        assert!(c.items().is_none());
        assert!(c.filtered_items().is_empty());
        assert!(!c.loading());
        assert!(c.transport().queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn filtered_view_follows_descriptor() {
        let c = controller();
        c.load_items().await.unwrap();
        let titles = |v: Vec<Item>| v.into_iter().map(|i| i.title).collect::<Vec<_>>();
        assert_eq!(titles(c.filtered_items()), vec!["Beta", "Alpha"]);

        c.update_filters(FilterPatch::default().search("alp")).await;
        assert_eq!(titles(c.filtered_items()), vec!["Alpha"]);

        c.set_filters(FilterDescriptor {
            sort_by: SortKey::Title,
            sort_direction: SortDirection::Asc,
            ..FilterDescriptor::default()
        })
        .await;
        assert_eq!(titles(c.filtered_items()), vec!["Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn unchanged_patch_still_fetches_once_but_does_not_notify() {
        let c = controller();
        let rx = c.subscribe_filters();
        c.update_filters(FilterPatch::default().page(1)).await;
        assert_eq!(c.transport().queries.lock().unwrap().len(), 1);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn create_records_outcome_without_touching_list() {
        let c = controller();
        let out = c.create_item(&ItemForm::new("Gamma", "third")).await.unwrap();
        assert_eq!(out.item().unwrap().title, "Gamma");
        assert_eq!(c.last_mutation().as_deref(), Some(&*out));
        assert!(c.items().is_none());
        assert!(!c.saving_item());
    }

    #[tokio::test]
    async fn failed_update_sets_save_error_only() {
        let c = controller();
        assert!(c.update_item("1", &ItemForm::default()).await.is_none());
        assert!(matches!(
            c.save_error().as_deref(),
            Some(CoreError::ValidationFailed { .. })
        ));
        assert!(c.list_error().is_none());
        assert!(c.item_error().is_none());
        assert!(!c.loading());
    }

    #[tokio::test]
    async fn delete_reports_deleted_id() {
        let c = controller();
        let out = c.delete_item("2").await.unwrap();
        assert_eq!(*out, MutationOutcome::Deleted(ItemId::from("2")));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let c = controller();
        let other = c.clone();
        other.load_items().await;
        assert_eq!(c.items().unwrap().len(), 2);
    }
}
