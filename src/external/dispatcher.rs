//! Runs matcher requests off the UI thread.
//!
//! Requests execute on a small tokio runtime (`spawn_blocking`, bounded by a
//! timeout) and their outcomes come back over a crossbeam channel that the UI
//! drains each frame. Every request carries a [`MatchTicket`]; the editor
//! session compares it against its current selection generation and drops
//! outcomes that no longer apply.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{DesignerError, Result};
use crate::external::{MatchRequest, MatchedResource, ResourceMatcher, SatelliteRule};
use crate::graph::NodeId;

/// Default upper bound for a single matching run.
pub const DEFAULT_MATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Identifies which node and which selection generation a request was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchTicket {
    pub node: NodeId,
    pub generation: u64,
}

/// Completed request.
#[derive(Debug)]
pub struct MatchOutcome {
    pub ticket: MatchTicket,
    pub request: MatchRequest,
    pub result: Result<Vec<MatchedResource>>,
}

pub struct MatchDispatcher {
    runtime: Option<tokio::runtime::Runtime>,
    matcher: Arc<dyn ResourceMatcher>,
    timeout: Duration,
    tx: Sender<MatchOutcome>,
    rx: Receiver<MatchOutcome>,
    in_flight: Arc<AtomicUsize>,
}

impl MatchDispatcher {
    pub fn new(matcher: Arc<dyn ResourceMatcher>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("resource-matcher")
            .enable_time()
            .build()?;
        let (tx, rx) = unbounded();
        Ok(Self {
            runtime: Some(runtime),
            matcher,
            timeout: DEFAULT_MATCH_TIMEOUT,
            tx,
            rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn rules(&self) -> Vec<SatelliteRule> {
        self.matcher.available_rules()
    }

    /// Fire a request; the outcome arrives later through [`Self::try_recv`].
    pub fn submit(&self, ticket: MatchTicket, request: MatchRequest) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let matcher = Arc::clone(&self.matcher);
        let tx = self.tx.clone();
        let timeout = self.timeout;
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Submitting match request {:?} for {:?}", request, ticket);

        runtime.spawn(async move {
            let job_request = request.clone();
            let job = tokio::task::spawn_blocking(move || matcher.match_resources(&job_request));
            let result = match tokio::time::timeout(timeout, job).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_err)) => Err(DesignerError::Matcher(format!(
                    "matcher task failed: {}",
                    join_err
                ))),
                Err(_) => Err(DesignerError::Matcher(format!(
                    "timed out after {:?}",
                    timeout
                ))),
            };
            in_flight.fetch_sub(1, Ordering::SeqCst);
            if tx
                .send(MatchOutcome {
                    ticket,
                    request,
                    result,
                })
                .is_err()
            {
                tracing::warn!("Match outcome dropped: receiver gone");
            }
        });
    }

    pub fn try_recv(&self) -> Option<MatchOutcome> {
        self.rx.try_recv().ok()
    }

    /// Block for the next outcome, up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<MatchOutcome> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl Drop for MatchDispatcher {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedMatcher(Vec<MatchedResource>);

    impl ResourceMatcher for FixedMatcher {
        fn match_resources(&self, _request: &MatchRequest) -> Result<Vec<MatchedResource>> {
            Ok(self.0.clone())
        }
    }

    struct SlowMatcher;

    impl ResourceMatcher for SlowMatcher {
        fn match_resources(&self, _request: &MatchRequest) -> Result<Vec<MatchedResource>> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(Vec::new())
        }
    }

    fn ticket() -> MatchTicket {
        MatchTicket {
            node: NodeId(3),
            generation: 7,
        }
    }

    #[test]
    fn test_outcome_carries_ticket() {
        let resource = MatchedResource {
            id: "gf2-pms:a.tiff".into(),
            name: "a.tiff".into(),
            ..Default::default()
        };
        let dispatcher = MatchDispatcher::new(Arc::new(FixedMatcher(vec![resource.clone()]))).unwrap();
        dispatcher.submit(ticket(), MatchRequest::default());

        let outcome = dispatcher.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.ticket, ticket());
        assert_eq!(outcome.result.unwrap(), vec![resource]);
    }

    #[test]
    fn test_timeout_reports_failure() {
        let dispatcher = MatchDispatcher::new(Arc::new(SlowMatcher))
            .unwrap()
            .with_timeout(Duration::from_millis(20));
        dispatcher.submit(ticket(), MatchRequest::default());

        let outcome = dispatcher.recv_timeout(Duration::from_secs(5)).unwrap();
        let err = outcome.result.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_try_recv_empty() {
        let dispatcher = MatchDispatcher::new(Arc::new(FixedMatcher(Vec::new()))).unwrap();
        assert!(dispatcher.try_recv().is_none());
        assert_eq!(dispatcher.in_flight(), 0);
    }
}
