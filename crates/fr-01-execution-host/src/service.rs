//! # Execution Service
//!
//! Async front of the host. Any number of tasks may submit concurrently;
//! the host sits behind a single write lock, so submissions are applied one
//! at a time and every reader observes a prefix of that total order.

use crate::codec::Revert;
use crate::domain::entities::{Receipt, Transaction, VmConfig};
use crate::domain::value_objects::{Address, Bytes};
use crate::host::Host;
use crate::module::ModuleCatalog;
use crate::ports::inbound::ExecutionApi;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Statistics for the execution service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Total transactions executed.
    pub transactions_executed: u64,
    /// Successful executions.
    pub successful_executions: u64,
    /// Failed executions (reverts and host errors).
    pub failed_executions: u64,
    /// Successful contract creations.
    pub deployments: u64,
    /// Read-only calls served.
    pub read_only_calls: u64,
    /// Average execution time in microseconds.
    pub avg_execution_time_us: u64,
}

/// The execution service.
#[derive(Clone)]
pub struct ExecutionService {
    host: Arc<RwLock<Host>>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl ExecutionService {
    /// Wraps an existing host.
    #[must_use]
    pub fn new(host: Host) -> Self {
        Self {
            host: Arc::new(RwLock::new(host)),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Creates a service over a fresh host.
    #[must_use]
    pub fn with_modules(config: VmConfig, catalog: ModuleCatalog) -> Self {
        Self::new(Host::new(config, catalog))
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Shared handle to the host.
    #[must_use]
    pub fn host(&self) -> Arc<RwLock<Host>> {
        Arc::clone(&self.host)
    }

    /// Runs a closure against a read-locked host.
    pub async fn inspect<R>(&self, f: impl FnOnce(&Host) -> R) -> R {
        f(&*self.host.read().await)
    }

    /// Executes a transaction under a correlation id.
    #[instrument(skip(self, tx), fields(correlation_id = %correlation_id, sender = ?tx.from))]
    pub async fn submit(&self, correlation_id: Uuid, tx: Transaction) -> Receipt {
        let is_creation = tx.is_contract_creation();
        let start = Instant::now();

        let receipt = self.host.write().await.execute(tx);

        let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        {
            let mut stats = self.stats.write().await;
            stats.transactions_executed += 1;
            if receipt.success {
                stats.successful_executions += 1;
                if is_creation {
                    stats.deployments += 1;
                }
            } else {
                stats.failed_executions += 1;
            }
            stats.avg_execution_time_us = running_average(
                stats.avg_execution_time_us,
                stats.transactions_executed,
                elapsed_us,
            );
        }

        if receipt.success {
            debug!(
                logs = receipt.logs.len(),
                contract = ?receipt.contract_address,
                "Transaction execution completed"
            );
            if let Some(address) = receipt.contract_address {
                info!(contract = ?address, "Deployment committed");
            }
        } else {
            warn!(reason = ?receipt.revert, "Transaction reverted");
        }
        receipt
    }

    /// Read-only call under a correlation id.
    #[instrument(skip(self, data), fields(correlation_id = %correlation_id))]
    pub async fn query(
        &self,
        correlation_id: Uuid,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<Bytes, Revert> {
        let result = self.host.write().await.call(from, to, data);
        self.stats.write().await.read_only_calls += 1;
        if let Err(revert) = &result {
            debug!(reason = %revert, "Read-only call reverted");
        }
        result
    }
}

/// Folds the `count`-th sample into an average over `count - 1` samples.
fn running_average(average: u64, count: u64, sample: u64) -> u64 {
    if count == 0 {
        return sample;
    }
    average
        .saturating_mul(count - 1)
        .saturating_add(sample)
        / count
}

impl Default for ExecutionService {
    fn default() -> Self {
        Self::new(Host::default())
    }
}

// =============================================================================
// ExecutionApi Implementation
// =============================================================================

#[async_trait]
impl ExecutionApi for ExecutionService {
    async fn execute(&self, tx: Transaction) -> Receipt {
        self.submit(Uuid::new_v4(), tx).await
    }

    async fn call(&self, from: Address, to: Address, data: Bytes) -> Result<Bytes, Revert> {
        self.query(Uuid::new_v4(), from, to, data).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
