use crate::models::{DashboardView, RangeAggregate, RangeSelection};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// What the page currently shows. Every selection change takes a token from
/// `begin`; results that arrive after a newer selection started are dropped.
#[derive(Default)]
pub struct Dashboard {
    latest: AtomicU64,
    view: Mutex<Option<DashboardView>>,
}

impl Dashboard {
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    /// Replaces the whole view in one step, or discards it when stale.
    pub async fn publish(
        &self,
        token: u64,
        selection: RangeSelection,
        aggregate: RangeAggregate,
    ) -> bool {
        let mut view = self.view.lock().await;
        if !self.is_current(token) {
            debug!("discarding stale result for token {token}");
            return false;
        }

        *view = Some(DashboardView {
            token,
            selection,
            aggregate,
        });
        true
    }

    pub async fn current(&self) -> Option<DashboardView> {
        self.view.lock().await.clone()
    }
}
