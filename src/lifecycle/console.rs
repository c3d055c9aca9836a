use crate::clients::{OrderClient, ShopClient, VariationClient};
use crate::framework::envelope;
use crate::framework::{ListClient, ListController, Resource, DEFAULT_PAGE_SIZE};
use crate::http::{ApiClient, ApiError, HttpTransport, Method, Session, Transport};
use crate::lifecycle::config::{ConfigError, ConsoleConfig};
use crate::model::{
    ArmType, Category, Color, ColorVendor, Customer, CustomerType, HeatOption, ItemType, LumbarType,
    MaterialType, PriceTier,
};
use crate::store::{AppState, AppStore, FileStorage, KeyValueStorage, MemoryStorage, StoreClient, StoreError, UserProfile};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Task failed: {0}")]
    TaskFailed(String),
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: UserProfile,
}

/// The runtime orchestrator of the admin console.
///
/// `Console` is responsible for:
/// - **Lifecycle Management**: starting one controller per page and the app store
/// - **Dependency Wiring**: one [`ApiClient`] and one [`Session`] shared by everything
/// - **Shutdown**: closing every channel and joining every task
///
/// # Example
///
/// ```ignore
/// let console = Console::new(ConsoleConfig::load("console.toml")?)?;
/// console.colors.apply_filter("search", "walnut").await?;
/// console.orders.filter_status(Some(OrderStatus::Pending)).await?;
/// console.shutdown().await?;
/// ```
pub struct Console {
    pub arm_types: ListClient<ArmType>,
    pub categories: ListClient<Category>,
    pub colors: ListClient<Color>,
    pub color_vendors: ListClient<ColorVendor>,
    pub customer_types: ListClient<CustomerType>,
    pub heat_options: ListClient<HeatOption>,
    pub item_types: ListClient<ItemType>,
    pub lumbar_types: ListClient<LumbarType>,
    pub material_types: ListClient<MaterialType>,
    pub price_tiers: ListClient<PriceTier>,
    pub customers: ListClient<Customer>,
    pub variations: VariationClient,
    pub orders: OrderClient,
    pub shop: ShopClient,
    pub store: StoreClient,

    api: ApiClient,

    /// Task handles of every controller and the store (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

/// Creates and spawns the controller of `T`. Tables without their own page
/// size use the configured one.
fn spawn_controller<T: Resource>(
    config: &ConsoleConfig,
    api: &ApiClient,
    handles: &mut Vec<JoinHandle<()>>,
) -> ListClient<T> {
    let mut filters = T::default_filters();
    if T::PAGE_SIZE == DEFAULT_PAGE_SIZE {
        filters.set_page_size(config.list.page_size);
    }
    let (controller, client) = ListController::<T>::with_filters(config.list.buffer_size, filters);
    handles.push(tokio::spawn(controller.run(api.clone())));
    client
}

impl Console {
    /// Builds the reqwest transport and the configured storage, then starts
    /// everything. Must be called inside a tokio runtime.
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let storage: Arc<dyn KeyValueStorage> = match &config.storage.path {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        let transport = HttpTransport::new(config.api.base_url.clone(), &config.api.user_agent)?;
        info!(base_url = %transport.base_url(), "Connecting console");
        Ok(Self::with_transport(config, Arc::new(transport), storage))
    }

    /// Starts everything over the given transport and storage.
    pub fn with_transport(
        config: ConsoleConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Self {
        let session = Session::new(storage.clone());
        let api = ApiClient::new(transport, session.clone());
        let mut handles = Vec::new();

        // The store listens for session expiry raised by any request.
        let (store, store_client) = AppStore::new(storage, config.list.buffer_size);
        handles.push(tokio::spawn(store.run(session.subscribe())));

        let products = spawn_controller(&config, &api, &mut handles);
        let variations = spawn_controller(&config, &api, &mut handles);
        let orders = spawn_controller(&config, &api, &mut handles);

        let console = Self {
            arm_types: spawn_controller(&config, &api, &mut handles),
            categories: spawn_controller(&config, &api, &mut handles),
            colors: spawn_controller(&config, &api, &mut handles),
            color_vendors: spawn_controller(&config, &api, &mut handles),
            customer_types: spawn_controller(&config, &api, &mut handles),
            heat_options: spawn_controller(&config, &api, &mut handles),
            item_types: spawn_controller(&config, &api, &mut handles),
            lumbar_types: spawn_controller(&config, &api, &mut handles),
            material_types: spawn_controller(&config, &api, &mut handles),
            price_tiers: spawn_controller(&config, &api, &mut handles),
            customers: spawn_controller(&config, &api, &mut handles),
            variations: VariationClient::new(variations),
            orders: OrderClient::new(orders, api.clone()),
            shop: ShopClient::new(products, store_client.clone()),
            store: store_client,
            api,
            handles,
        };
        info!(tasks = console.handles.len(), "Console started");
        console
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Exchanges credentials for a token and records the login in the store.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AppState, ConsoleError> {
        let body = self
            .api
            .send_json(Method::Post, "/login", json!({"email": email, "password": password}))
            .await?;
        let response: LoginResponse = serde_json::from_value(envelope::single(body))
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        info!(user_id = response.user.id, "Logged in");
        Ok(self.store.login(response.token, response.user).await?)
    }

    /// Logs out locally. The server call is best effort: the local session
    /// ends even when it fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<AppState, ConsoleError> {
        if let Err(e) = self.api.send_json(Method::Post, "/logout", json!({})).await {
            warn!(error = %e, "Server logout failed");
        }
        Ok(self.store.logout().await?)
    }

    /// Gracefully shuts down every controller and the store.
    ///
    /// Dropping the clients closes the request channels; each task sees its
    /// receiver end and leaves its loop.
    pub async fn shutdown(mut self) -> Result<(), ConsoleError> {
        info!("Shutting down console...");
        let handles = std::mem::take(&mut self.handles);
        drop(self);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Console task failed: {:?}", e);
                return Err(ConsoleError::TaskFailed(e.to_string()));
            }
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}
