//! Payment Client Manager
//!
//! Owns the one processor client (and its device collector) for a checkout
//! session. Concurrent callers share a single in-flight creation, so the vendor
//! script is loaded and the client constructed at most once.
//!
//! ```text
//!  caller A ─┐
//!  caller B ─┼──▶ Pending(shared future) ──▶ Ready(handle)
//!  caller C ─┘          │
//!                       └── on failure ──▶ Empty (next call starts over)
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::error::{Result, SdkError};
use crate::sdk::{ClientHandle, CollectorHandle, NoopCollector, ProcessorSdk};

type SharedCreation<T> = Shared<BoxFuture<'static, std::result::Result<T, SdkError>>>;

enum Slot<T> {
    Empty,
    Pending(SharedCreation<T>),
    Ready(T),
}

impl<T: Clone> Slot<T> {
    /// Store the outcome of `creation` unless the slot moved on meanwhile
    /// (teardown, or a newer creation after a failure).
    fn settle(&mut self, creation: &SharedCreation<T>, result: &std::result::Result<T, SdkError>) {
        if let Self::Pending(current) = self {
            if current.ptr_eq(creation) {
                *self = match result {
                    Ok(handle) => Self::Ready(handle.clone()),
                    Err(_) => Self::Empty,
                };
            }
        }
    }
}

struct Handles {
    client: Slot<ClientHandle>,
    collector: Slot<CollectorHandle>,
    /// Bumped by every teardown
    generation: u64,
}

/// Session-scoped owner of the processor client and device collector
pub struct PaymentClientManager {
    sdk: Arc<dyn ProcessorSdk>,
    handles: Mutex<Handles>,
}

impl PaymentClientManager {
    pub fn new(sdk: Arc<dyn ProcessorSdk>) -> Self {
        Self {
            sdk,
            handles: Mutex::new(Handles {
                client: Slot::Empty,
                collector: Slot::Empty,
                generation: 0,
            }),
        }
    }

    /// The SDK this manager creates handles from
    pub fn sdk(&self) -> &dyn ProcessorSdk {
        self.sdk.as_ref()
    }

    fn lock(&self) -> MutexGuard<'_, Handles> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the session's client, creating it on first use.
    ///
    /// A failed load or construction is returned to every waiter as an
    /// integration failure and leaves nothing cached.
    pub async fn get_or_create_client(&self, authorization: &str) -> Result<ClientHandle> {
        let creation = {
            let mut handles = self.lock();
            match &handles.client {
                Slot::Ready(client) => return Ok(Arc::clone(client)),
                Slot::Pending(creation) => {
                    tracing::debug!("Joining in-flight payment client creation");
                    creation.clone()
                }
                Slot::Empty => {
                    let creation = self.start_client_creation(authorization);
                    handles.client = Slot::Pending(creation.clone());
                    creation
                }
            }
        };

        let result = creation.clone().await;
        self.lock().client.settle(&creation, &result);

        result.map_err(|e| {
            tracing::error!(error = %e, "Payment client creation failed");
            e.into()
        })
    }

    fn start_client_creation(&self, authorization: &str) -> SharedCreation<ClientHandle> {
        let sdk = Arc::clone(&self.sdk);
        let authorization = authorization.to_owned();

        async move {
            if !sdk.is_script_loaded() {
                tracing::debug!("Loading payment processor script");
                sdk.load_script().await?;
            }
            let client = sdk.create_client(&authorization).await?;
            tracing::info!(client_id = %client.client_id(), "Payment client created");
            Ok(client)
        }
        .boxed()
        .shared()
    }

    /// Return the session's device collector, creating it on first use.
    ///
    /// Collection is best-effort: a construction failure yields a
    /// [`NoopCollector`], which is not cached. So does a creation that was
    /// still in flight when [`teardown`](Self::teardown) ran; teardown owns
    /// that collector.
    pub async fn get_or_create_device_collector(&self, client: &ClientHandle) -> CollectorHandle {
        let (creation, generation) = {
            let mut handles = self.lock();
            let creation = match &handles.collector {
                Slot::Ready(collector) => return Arc::clone(collector),
                Slot::Pending(creation) => {
                    tracing::debug!("Joining in-flight device collector creation");
                    creation.clone()
                }
                Slot::Empty => {
                    let sdk = Arc::clone(&self.sdk);
                    let client = Arc::clone(client);
                    let creation = async move { sdk.create_data_collector(&client).await }
                        .boxed()
                        .shared();
                    handles.collector = Slot::Pending(creation.clone());
                    creation
                }
            };
            (creation, handles.generation)
        };

        let result = creation.clone().await;
        let torn_down = {
            let mut handles = self.lock();
            handles.collector.settle(&creation, &result);
            handles.generation != generation
        };

        match result {
            Ok(_) if torn_down => {
                tracing::debug!("Session torn down during device collector creation");
                Arc::new(NoopCollector)
            }
            Ok(collector) => collector,
            Err(e) => {
                tracing::warn!(error = %e, "Device data collector unavailable, continuing without it");
                Arc::new(NoopCollector)
            }
        }
    }

    /// Client then collector, in that order
    pub async fn initialize(&self, authorization: &str) -> Result<(ClientHandle, CollectorHandle)> {
        let client = self.get_or_create_client(authorization).await?;
        let collector = self.get_or_create_device_collector(&client).await;
        Ok((client, collector))
    }

    /// Tear down the collector and forget both handles. Safe to call repeatedly.
    ///
    /// A collector still being created is awaited and then torn down. A client
    /// still being created is simply not cached.
    pub async fn teardown(&self) {
        let collector = {
            let mut handles = self.lock();
            handles.generation = handles.generation.wrapping_add(1);
            handles.client = Slot::Empty;
            std::mem::replace(&mut handles.collector, Slot::Empty)
        };

        let collector = match collector {
            Slot::Ready(collector) => Some(collector),
            Slot::Pending(creation) => {
                tracing::debug!("Waiting for in-flight device collector before teardown");
                creation.await.ok()
            }
            Slot::Empty => None,
        };

        if let Some(collector) = collector {
            if let Err(e) = collector.teardown().await {
                tracing::warn!(error = %e, "Device collector teardown failed");
            }
        }
    }

    /// Whether a client is cached
    pub fn has_client(&self) -> bool {
        matches!(self.lock().client, Slot::Ready(_))
    }
}
