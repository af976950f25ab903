//! Abort coordination state machine.

use parking_lot::Mutex;
use tokio::sync::watch;

/// Lifecycle state of the abort coordinator.
///
/// Transitions are monotonic along `Idle → Aborting → Aborted → Disposed`;
/// `Disposed` is also reachable directly from `Idle` or `Aborting`, and no
/// transition ever leaves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortState {
    /// No abort has begun.
    Idle,
    /// The first abort caller has claimed the network request.
    Aborting,
    /// The abort cycle finished (server acknowledged or forced completion).
    Aborted,
    /// Terminal: the transport has been disposed.
    Disposed,
}

/// Coordinates the single network abort and the release of every waiter.
///
/// The original nested abort/dispose locking collapses into one mutex-guarded
/// state enum plus a broadcast-capable watch channel: claiming the abort is a
/// state transition under the lock, and every waiter suspends on the channel
/// until the completion signal is released. All waiters wake together.
pub(crate) struct AbortCoordinator {
    state: Mutex<AbortState>,
    released_tx: watch::Sender<bool>,
}

impl AbortCoordinator {
    pub(crate) fn new() -> Self {
        let (released_tx, _) = watch::channel(false);
        Self {
            state: Mutex::new(AbortState::Idle),
            released_tx,
        }
    }

    /// Claim the abort cycle.
    ///
    /// Returns `Ok(true)` for the first caller, who must issue the single
    /// network abort request; `Ok(false)` when an abort has already begun or
    /// finished; `Err(Disposed)` after disposal.
    pub(crate) fn try_begin(&self) -> crate::error::Result<bool> {
        let mut state = self.state.lock();
        match *state {
            AbortState::Disposed => Err(crate::error::TransportError::Disposed),
            AbortState::Aborting | AbortState::Aborted => Ok(false),
            AbortState::Idle => {
                *state = AbortState::Aborting;
                Ok(true)
            }
        }
    }

    /// Finish the abort cycle and release every waiter.
    ///
    /// Idempotent and safe from any thread, including the abort request's own
    /// failure handler. No-op after disposal.
    pub(crate) fn complete(&self) {
        let mut state = self.state.lock();
        match *state {
            AbortState::Disposed => {}
            AbortState::Aborted => {
                self.released_tx.send_replace(true);
            }
            AbortState::Idle | AbortState::Aborting => {
                *state = AbortState::Aborted;
                self.released_tx.send_replace(true);
            }
        }
    }

    /// Non-blocking poll: release the signal if an abort cycle exists.
    ///
    /// Returns `true` when there is (or can be) nothing left to wait for:
    /// after disposal, or once an abort has begun or finished. Returns
    /// `false` only while no abort has started.
    pub(crate) fn try_complete(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            AbortState::Disposed => true,
            AbortState::Aborting | AbortState::Aborted => {
                *state = AbortState::Aborted;
                self.released_tx.send_replace(true);
                true
            }
            AbortState::Idle => false,
        }
    }

    /// Wait until the completion signal is released.
    pub(crate) async fn released(&self) {
        let mut rx = self.released_tx.subscribe();
        // The sender lives as long as the coordinator, so this only fails
        // during teardown; treat that as released.
        let _ = rx.wait_for(|released| *released).await;
    }

    /// Terminal transition.
    ///
    /// Waits out an in-flight abort first (matching the lock ordering of the
    /// abort path), then marks the coordinator disposed and releases the
    /// signal so no waiter can block afterwards. Returns `false` when already
    /// disposed.
    pub(crate) async fn dispose(&self) -> bool {
        loop {
            {
                let mut state = self.state.lock();
                match *state {
                    AbortState::Disposed => return false,
                    AbortState::Idle | AbortState::Aborted => {
                        *state = AbortState::Disposed;
                        self.released_tx.send_replace(true);
                        return true;
                    }
                    AbortState::Aborting => {}
                }
            }
            self.released().await;
        }
    }

    /// Current state.
    pub(crate) fn state(&self) -> AbortState {
        *self.state.lock()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn first_caller_claims_the_abort() {
        let coordinator = AbortCoordinator::new();
        assert!(coordinator.try_begin().unwrap());
        assert!(!coordinator.try_begin().unwrap());
        assert_eq!(coordinator.state(), AbortState::Aborting);
    }

    #[test]
    fn complete_is_idempotent() {
        let coordinator = AbortCoordinator::new();
        coordinator.try_begin().unwrap();
        coordinator.complete();
        coordinator.complete();
        assert_eq!(coordinator.state(), AbortState::Aborted);
    }

    #[test]
    fn try_complete_reports_abort_progress() {
        let coordinator = AbortCoordinator::new();
        assert!(!coordinator.try_complete());
        coordinator.try_begin().unwrap();
        assert!(coordinator.try_complete());
        assert_eq!(coordinator.state(), AbortState::Aborted);
    }

    #[tokio::test]
    async fn waiters_are_released_together() {
        let coordinator = Arc::new(AbortCoordinator::new());
        coordinator.try_begin().unwrap();

        let mut waiters = Vec::new();
        for _ in 0..4 {
            let coordinator = coordinator.clone();
            waiters.push(tokio::spawn(async move { coordinator.released().await }));
        }

        coordinator.complete();
        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("waiter not released")
                .unwrap();
        }
    }

    #[tokio::test]
    async fn dispose_waits_for_inflight_abort() {
        let coordinator = Arc::new(AbortCoordinator::new());
        coordinator.try_begin().unwrap();

        let completer = coordinator.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            completer.complete();
        });

        let disposed = tokio::time::timeout(Duration::from_secs(1), coordinator.dispose())
            .await
            .expect("dispose did not finish");
        assert!(disposed);
        assert_eq!(coordinator.state(), AbortState::Disposed);
    }

    #[tokio::test]
    async fn dispose_is_idempotent_and_releases_waiters() {
        let coordinator = Arc::new(AbortCoordinator::new());
        assert!(coordinator.dispose().await);
        assert!(!coordinator.dispose().await);

        // No waiter can block after disposal.
        tokio::time::timeout(Duration::from_secs(1), coordinator.released())
            .await
            .expect("waiter blocked after dispose");
        assert!(coordinator.try_complete());
        assert!(coordinator.try_begin().is_err());
    }
}
