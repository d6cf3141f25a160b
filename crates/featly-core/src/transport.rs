// ── Transport seam ──
//
// The controller only ever talks to the collection through `Transport`.
// `HttpTransport` is the production implementation over `FeatureClient`;
// tests substitute in-memory fakes.

use std::future::Future;

use featly_api::FeatureClient;
use featly_api::types::{FeatureItemForm, ListQuery};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::filters::FilterDescriptor;
use crate::model::{Item, ItemForm, ItemId, ItemPage};

/// Asynchronous access to the feature items collection.
///
/// Each call is one round trip. Implementations report failures as
/// [`CoreError`]; they never retry or cache.
pub trait Transport: Send + Sync + 'static {
    /// Fetch one page using `filters` as query parameters.
    fn list_items(
        &self,
        filters: &FilterDescriptor,
    ) -> impl Future<Output = Result<ItemPage, CoreError>> + Send;

    /// Fetch a single item. A missing id is [`CoreError::NotFound`].
    fn get_item(&self, id: &ItemId) -> impl Future<Output = Result<Item, CoreError>> + Send;

    fn create_item(&self, form: &ItemForm) -> impl Future<Output = Result<Item, CoreError>> + Send;

    fn update_item(
        &self,
        id: &ItemId,
        form: &ItemForm,
    ) -> impl Future<Output = Result<Item, CoreError>> + Send;

    fn delete_item(&self, id: &ItemId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ── HTTP implementation ─────────────────────────────────────────────

/// [`Transport`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: FeatureClient,
}

impl HttpTransport {
    /// Build the HTTP client described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let client = FeatureClient::new(config.base_url.as_str(), &config.transport_config())?;
        debug!(base_url = %client.base_url(), "http transport ready");
        Ok(Self { client })
    }

    /// Wrap an already-built client.
    pub fn from_client(client: FeatureClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FeatureClient {
        &self.client
    }
}

/// Single-item endpoints report a missing id as the item itself being
/// absent, not as a generic resource.
fn item_error(id: &ItemId, err: featly_api::Error) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            entity_type: "item".into(),
            identifier: id.to_string(),
        }
    } else {
        err.into()
    }
}

impl Transport for HttpTransport {
    fn list_items(
        &self,
        filters: &FilterDescriptor,
    ) -> impl Future<Output = Result<ItemPage, CoreError>> + Send {
        let query = ListQuery::from(filters);
        async move {
            let resp = self.client.list_items(&query).await?;
            Ok(ItemPage {
                items: resp.data.into_iter().map(Item::from).collect(),
                meta: resp.meta.map(Into::into),
            })
        }
    }

    fn get_item(&self, id: &ItemId) -> impl Future<Output = Result<Item, CoreError>> + Send {
        async move {
            self.client
                .get_item(id.as_str())
                .await
                .map(Item::from)
                .map_err(|e| item_error(id, e))
        }
    }

    fn create_item(&self, form: &ItemForm) -> impl Future<Output = Result<Item, CoreError>> + Send {
        let body = FeatureItemForm::from(form);
        async move { Ok(Item::from(self.client.create_item(&body).await?)) }
    }

    fn update_item(
        &self,
        id: &ItemId,
        form: &ItemForm,
    ) -> impl Future<Output = Result<Item, CoreError>> + Send {
        let body = FeatureItemForm::from(form);
        async move {
            self.client
                .update_item(id.as_str(), &body)
                .await
                .map(Item::from)
                .map_err(|e| item_error(id, e))
        }
    }

    fn delete_item(&self, id: &ItemId) -> impl Future<Output = Result<(), CoreError>> + Send {
        async move {
            self.client
                .delete_item(id.as_str())
                .await
                .map_err(|e| item_error(id, e))
        }
    }
}
