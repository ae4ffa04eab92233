//! Transactions on a dedicated pooled connection.
//!
//! [`Client::run_transaction`] acquires one connection, begins a transaction
//! and hands the action a [`Client`] bound to that connection, so every
//! command the action runs goes through the same transaction.
//!
//! # Example
//!
//! ```ignore
//! use sqlcmd::{CmdResult, Client};
//! use serde_json::json;
//!
//! # async fn demo<P: sqlcmd::ConnectionSource>(client: Client<P>) -> CmdResult<()> {
//! client
//!     .run_transaction(|tx| async move {
//!         tx.table("account")
//!             .update(json!({"balance": 0}))
//!             .filter(|e| e.field("id").eq(1))
//!             .exec()
//!             .await?;
//!         tx.table("audit").insert(json!({"account_id": 1})).exec().await?;
//!         Ok::<_, sqlcmd::CmdError>(())
//!     })
//!     .await
//! # }
//! ```

use crate::client::{Client, ConnectionSource, DedicatedConnection};
use crate::config::ClientConfig;
use crate::error::CmdError;
use std::future::Future;
use std::sync::Arc;

impl<C: ConnectionSource> Client<C> {
    /// Run `action` inside a transaction.
    ///
    /// - Fails with [`CmdError::Unsupported`] before touching anything when
    ///   the connection cannot hand out dedicated connections.
    /// - Commits when `action` returns `Ok`, and returns its value.
    /// - Rolls back when begin, `action` or commit fails, then returns the
    ///   original error. Rollback failures are logged and dropped.
    /// - Releases the connection exactly once after a successful acquire,
    ///   including when the returned future is dropped early or `action`
    ///   panics. A cancelled transaction is released without a rollback;
    ///   the pool discards or resets it.
    pub async fn run_transaction<T, E, F, Fut>(&self, action: F) -> Result<T, E>
    where
        F: FnOnce(Client<Arc<C::Conn>>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CmdError>,
    {
        if !self.connection().supports_acquire() {
            return Err(CmdError::unsupported("this client can't begin a transaction").into());
        }
        let guard = ReleaseGuard {
            conn: Arc::new(self.connection().acquire().await?),
        };
        let result = run_in_transaction(&guard.conn, self.config(), action).await;
        drop(guard);
        result
    }
}

/// Gives the dedicated connection back to its pool when dropped.
struct ReleaseGuard<D: DedicatedConnection> {
    conn: Arc<D>,
}

impl<D: DedicatedConnection> Drop for ReleaseGuard<D> {
    fn drop(&mut self) {
        release_quietly(self.conn.as_ref());
    }
}

async fn run_in_transaction<D, T, E, F, Fut>(
    conn: &Arc<D>,
    config: &ClientConfig,
    action: F,
) -> Result<T, E>
where
    D: DedicatedConnection,
    F: FnOnce(Client<Arc<D>>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<CmdError>,
{
    if let Err(err) = conn.begin_transaction().await {
        rollback_quietly(conn.as_ref()).await;
        return Err(err.into());
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(target: "sqlcmd.tx", "transaction started");

    let tx = Client::with_config(Arc::clone(conn), config.clone());
    match action(tx).await {
        Ok(value) => match conn.commit().await {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(target: "sqlcmd.tx", "transaction committed");
                Ok(value)
            }
            Err(err) => {
                rollback_quietly(conn.as_ref()).await;
                Err(err.into())
            }
        },
        Err(err) => {
            rollback_quietly(conn.as_ref()).await;
            Err(err)
        }
    }
}

async fn rollback_quietly<D: DedicatedConnection>(conn: &D) {
    match conn.rollback().await {
        Ok(()) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "sqlcmd.tx", "transaction rolled back");
        }
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(target: "sqlcmd.tx", error = %_err, "rollback failed");
        }
    }
}

fn release_quietly<D: DedicatedConnection>(conn: &D) {
    if let Err(_err) = conn.release() {
        #[cfg(feature = "tracing")]
        tracing::warn!(target: "sqlcmd.tx", error = %_err, "release connection failed");
    }
}
