//! Remit production server.
//!
//! Publishes one account object under a well-known name and serves
//! registry and invocation frames over TCP until externally terminated.
//!
//! ## Architecture
//!
//! ```text
//! remit-server
//!   ├─ RegistryTable   (hosted name bindings, when this process won the port)
//!   ├─ ExportTable     (object id → account, invocation dispatch)
//!   ├─ connection      (per-connection task: read frame, route, reply)
//!   └─ registry        (create-or-attach, remote publication)
//! ```
//!
//! Registry creation is idempotent across processes: the first server to
//! bind the registry port hosts the name table and serves invocations on
//! the same listener; a later server finds the port occupied, serves
//! invocations on an ephemeral port, and publishes its binding into the
//! existing registry over the wire.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod error;
mod registry;

use std::{net::SocketAddr, sync::Arc, time::Duration};

pub use error::ServerError;
use remit_core::{Account, ExportTable, RegistryTable};
use remit_proto::RemoteRef;
use tokio::{net::TcpListener, sync::RwLock};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerRuntimeConfig {
    /// Registry address to create or attach to (e.g., "127.0.0.1:1099")
    pub registry_addr: String,
    /// Well-known name the account is published under
    pub service_name: String,
    /// Host written into the published remote reference
    pub advertise_host: String,
    /// Bound on publishing a binding into a remote registry
    pub attach_timeout: Duration,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self {
            registry_addr: "127.0.0.1:1099".to_string(),
            service_name: "Account".to_string(),
            advertise_host: "127.0.0.1".to_string(),
            attach_timeout: Duration::from_secs(10),
        }
    }
}

/// Shared state served by every connection task.
pub(crate) struct ServerContext {
    /// Name table, present only when this process hosts the registry.
    pub(crate) registry: Option<RwLock<RegistryTable>>,
    /// Exported objects reachable on this endpoint.
    pub(crate) exports: ExportTable,
}

/// How this server's binding reaches the registry.
enum Publication {
    /// Registry is local; the binding was written during [`Server::bind`].
    Hosted,
    /// Registry lives in another process; publish over the wire on run.
    Attached {
        registry_addr: String,
        attach_timeout: Duration,
    },
}

/// Production Remit server.
///
/// Owns the listener, the exported account, and (in hosted mode) the
/// registry table.
pub struct Server {
    listener: TcpListener,
    ctx: Arc<ServerContext>,
    publication: Publication,
    service_name: String,
    target: RemoteRef,
}

impl Server {
    /// Create the account object, claim or attach to the registry port,
    /// and prepare the published reference.
    ///
    /// # Errors
    ///
    /// Returns an error if no listener can be bound or object id
    /// generation fails. A registry port owned by another process is NOT
    /// an error; the server attaches instead.
    pub async fn bind(config: ServerRuntimeConfig) -> Result<Self, ServerError> {
        let object_id = fresh_object_id()?;
        let mut exports = ExportTable::new();
        exports.export(object_id, Arc::new(Account::default()));

        match TcpListener::bind(&config.registry_addr).await {
            Ok(listener) => {
                tracing::info!("registry created on {}", config.registry_addr);

                let port = listener.local_addr()?.port();
                let target =
                    RemoteRef { host: config.advertise_host.clone(), port, object_id };

                let mut table = RegistryTable::new();
                table.rebind(&config.service_name, target.clone());

                Ok(Self {
                    listener,
                    ctx: Arc::new(ServerContext {
                        registry: Some(RwLock::new(table)),
                        exports,
                    }),
                    publication: Publication::Hosted,
                    service_name: config.service_name,
                    target,
                })
            },
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::info!("registry already exists on {}, attaching", config.registry_addr);

                let listener =
                    TcpListener::bind((config.advertise_host.as_str(), 0)).await?;
                let port = listener.local_addr()?.port();
                let target =
                    RemoteRef { host: config.advertise_host.clone(), port, object_id };

                Ok(Self {
                    listener,
                    ctx: Arc::new(ServerContext { registry: None, exports }),
                    publication: Publication::Attached {
                        registry_addr: config.registry_addr,
                        attach_timeout: config.attach_timeout,
                    },
                    service_name: config.service_name,
                    target,
                })
            },
            Err(e) => Err(ServerError::Transport(e.to_string())),
        }
    }

    /// Local address of the invocation endpoint.
    ///
    /// In hosted mode this is also the registry address.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Reference this server publishes under its service name.
    pub fn published_ref(&self) -> &RemoteRef {
        &self.target
    }

    /// Publish the binding, then accept connections until shut down
    /// externally.
    pub async fn run(self) -> Result<(), ServerError> {
        match &self.publication {
            Publication::Hosted => {
                tracing::info!("{} bound in registry", self.service_name);
            },
            Publication::Attached { registry_addr, attach_timeout } => {
                registry::publish_remote(
                    registry_addr,
                    &self.service_name,
                    &self.target,
                    *attach_timeout,
                )
                .await?;
                tracing::info!("{} bound in registry at {}", self.service_name, registry_addr);
            },
        }

        tracing::info!("Server listening on {}", self.local_addr()?);

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let ctx = Arc::clone(&self.ctx);

                    tokio::spawn(async move {
                        if let Err(e) = connection::handle_connection(stream, ctx).await {
                            tracing::error!("Connection error from {}: {}", peer, e);
                        }
                    });
                },
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                },
            }
        }
    }
}

/// Generate an object id from OS entropy.
fn fresh_object_id() -> Result<u64, ServerError> {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf).map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(u64::from_le_bytes(buf))
}
