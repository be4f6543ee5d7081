use crate::api::TodolistsApi;
use crate::config::Config;
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::state::{Snapshot, Store};
use anyhow::{Context, Result};
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinSet};

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;

/// Owns the store and the API client and hands both to the orchestrator.
///
pub struct App {
    store: Arc<Mutex<Store>>,
    handler: NetworkEventHandler,
}

impl App {
    /// Build an application for the given configuration with an empty store.
    ///
    pub fn new(config: &Config) -> Result<App> {
        let api = TodolistsApi::new(
            &config.base_url,
            config.api_key.as_deref(),
            config.request_timeout,
        )
        .context("Failed to create API client")?;
        let store = Arc::new(Mutex::new(Store::new()));
        let handler = NetworkEventHandler::new(Arc::clone(&store), Arc::new(api));
        Ok(App { store, handler })
    }

    /// Run one orchestrator operation to completion.
    ///
    pub async fn handle(&self, event: NetworkEvent) {
        self.handler.handle(event).await
    }

    /// Check the session, then load every todolist and its tasks.
    ///
    pub async fn bootstrap(&self) {
        info!("Starting application...");
        self.handle(NetworkEvent::InitializeSession).await;
        if !self.store.lock().await.auth().is_logged_in() {
            warn!("Not logged in; skipping initial fetch.");
            return;
        }
        self.refresh().await;
    }

    /// Replace the local todolists with the server's, then load each bucket.
    ///
    pub async fn refresh(&self) {
        self.handle(NetworkEvent::FetchTodolists).await;
        let ids = self.store.lock().await.todolists().ids();
        for todolist_id in ids {
            self.handle(NetworkEvent::FetchTasks { todolist_id }).await;
        }
    }

    /// Start a separate thread that runs each received event as its own task,
    /// so intents sent in quick succession race against each other.
    ///
    pub fn start_network(&self) -> Result<NetworkEventSender> {
        debug!("Creating new thread for asynchronous networking...");
        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to create runtime")?;
        let handler = self.handler.clone();
        std::thread::spawn(move || run_network(runtime, handler, rx));
        Ok(tx)
    }

    /// Shared handle to the store for readers such as a render loop.
    ///
    pub fn store(&self) -> Arc<Mutex<Store>> {
        Arc::clone(&self.store)
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.store.lock().await.snapshot()
    }
}

fn run_network(
    runtime: tokio::runtime::Runtime,
    handler: NetworkEventHandler,
    receiver: NetworkEventReceiver,
) {
    runtime.block_on(async {
        let mut in_flight = JoinSet::new();
        while let Ok(network_event) = receiver.recv() {
            while let Some(finished) = in_flight.try_join_next() {
                log_join_error(finished);
            }
            let handler = handler.clone();
            in_flight.spawn(async move { handler.handle(network_event).await });
        }
        while let Some(finished) = in_flight.join_next().await {
            log_join_error(finished);
        }
    });
    debug!("Network thread stopped.");
}

fn log_join_error(finished: Result<(), JoinError>) {
    if let Err(e) = finished {
        error!("Failed to handle network event: {}", e);
    }
}
