//! Execution dispatcher
//!
//! The `Dispatcher` takes an [`ExecutionRequest`] bound to a session and
//! runs it on its own worker task, so the session's read loop never waits
//! on SSH network I/O.
//!
//! # Event Ordering
//!
//! For every request the owning session receives, in order:
//!
//! 1. `status` (`connecting`), sent before `dispatch` returns
//! 2. `output` when the command succeeded, `error` otherwise
//! 3. `complete`, whose `success` matches the result
//!
//! Events for different requests interleave freely, even within one session.
//!
//! # Disconnects
//!
//! In-flight executions are never cancelled. If the session goes away the
//! worker still runs to completion; the registry drops the undeliverable
//! events and the audit record is written as usual.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

use sg_core::error::ExecError;
use sg_core::traits::{AuditSink, CommandExecutor};
use sg_core::types::ExecutionPhase;
use sg_core::{AuditRecord, ExecutionRequest, ExecutionResult, RequestId};
use sg_protocol::{ConnectionSpec, GatewayEvent};

use crate::session::SessionRegistry;

/// Offloads executions to worker tasks and reports their progress
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<SessionRegistry>,
    executor: Arc<dyn CommandExecutor>,
    audit: Arc<dyn AuditSink>,
    in_flight: Arc<AtomicUsize>,
}

/// Decrements the in-flight counter when a worker finishes, even on panic
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Dispatcher {
    /// Create a dispatcher delivering through `registry`
    pub fn new(
        registry: Arc<SessionRegistry>,
        executor: Arc<dyn CommandExecutor>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            registry,
            executor,
            audit,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Accept a request and run it on a worker.
    ///
    /// `connecting` is emitted before this returns. The returned handle
    /// resolves once `complete` has been sent and the audit write attempted;
    /// callers are free to drop it.
    pub fn dispatch(&self, request: ExecutionRequest) -> JoinHandle<ExecutionResult> {
        let ExecutionRequest {
            spec,
            request_id,
            session_id,
        } = request;

        log_phase(&request_id, ExecutionPhase::Accepted);
        self.registry.send(
            &session_id,
            GatewayEvent::connecting(request_id.as_str(), &spec.host),
        );

        let guard = InFlight::enter(&self.in_flight);
        let registry = Arc::clone(&self.registry);
        let executor = Arc::clone(&self.executor);
        let audit = Arc::clone(&self.audit);

        tokio::spawn(async move {
            let _guard = guard;
            log_phase(&request_id, ExecutionPhase::Dispatched);

            let result = run_isolated(executor, &spec, &request_id).await;

            let outcome = if result.success {
                GatewayEvent::output(request_id.as_str(), result.stdout.as_str())
            } else {
                GatewayEvent::error(request_id.as_str(), result.stderr.as_str())
            };
            registry.send(&session_id, outcome);
            registry.send(
                &session_id,
                GatewayEvent::complete(request_id.as_str(), result.success),
            );
            log_phase(&request_id, ExecutionPhase::Completed);

            write_audit(audit.as_ref(), &request_id, &spec, &result).await;
            result
        })
    }

    /// Run a request outside any session and wait for its result.
    ///
    /// The executor still runs on its own worker task. The audit record is
    /// written before this returns.
    pub async fn execute_now(&self, spec: ConnectionSpec, request_id: RequestId) -> ExecutionResult {
        log_phase(&request_id, ExecutionPhase::Accepted);
        let _guard = InFlight::enter(&self.in_flight);
        log_phase(&request_id, ExecutionPhase::Dispatched);

        let result = run_isolated(Arc::clone(&self.executor), &spec, &request_id).await;
        log_phase(&request_id, ExecutionPhase::Completed);

        write_audit(self.audit.as_ref(), &request_id, &spec, &result).await;
        result
    }

    /// Number of executions currently running
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Run the executor on its own task so a panic becomes a failed result
async fn run_isolated(
    executor: Arc<dyn CommandExecutor>,
    spec: &ConnectionSpec,
    request_id: &RequestId,
) -> ExecutionResult {
    let worker_spec = spec.clone();
    let started = Instant::now();
    let worker = tokio::spawn(async move { executor.execute(&worker_spec).await });

    match worker.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Execution worker for request {} failed: {}", request_id, e);
            ExecutionResult::failed(
                ExecError::Worker(e.to_string()).to_string(),
                started.elapsed().as_secs_f64(),
            )
        }
    }
}

fn log_phase(request_id: &RequestId, phase: ExecutionPhase) {
    tracing::debug!("Request {} {}", request_id, phase);
}

/// Audit failures are logged and never reach the client
async fn write_audit(
    audit: &dyn AuditSink,
    request_id: &RequestId,
    spec: &ConnectionSpec,
    result: &ExecutionResult,
) {
    let record = AuditRecord::new(request_id, spec, result);
    if let Err(e) = audit.append(record).await {
        tracing::error!("Failed to write audit record for request {}: {}", request_id, e);
    }
}
