//! # Book Fair Runtime
//!
//! The Store runtime that coordinates reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns the single copy of portal state and executes effects
//! - **Effect Executor**: Runs effect descriptions and feeds actions back to reducers
//! - **Action broadcast**: Observers see every action produced by effects
//!
//! Every action is reduced under the state write lock, so reducers observe a
//! strictly serial history even when actions arrive from several tasks.
//!
//! ## Example
//!
//! ```ignore
//! use bookfair_runtime::Store;
//!
//! let store = Store::new(initial_state, BookingReducer::new(), environment);
//!
//! // Send an action and wait for its effects
//! store.send(BookingAction::ToggleStall { stall_id }).await?.wait().await;
//!
//! // Read state
//! let total = store.state(|s| s.total_price()).await;
//! ```

use bookfair_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// A spawned effect task panicked or was cancelled
        #[error("Effect task failed: {0}")]
        TaskJoinError(#[from] tokio::task::JoinError),

        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;

/// Handle to the effects spawned for one action
///
/// Dropping the handle does not cancel anything; effects keep running.
/// Call [`EffectHandle::wait`] to block until they (and any actions they fed
/// back) have been processed.
#[derive(Debug, Default)]
pub struct EffectHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl EffectHandle {
    /// A handle with nothing to wait for
    #[must_use]
    pub const fn completed() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Number of effect tasks still tracked by this handle
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Wait for every tracked effect task to finish
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskJoinError`] for the first task that panicked.
    pub async fn wait(self) -> Result<(), StoreError> {
        for task in self.tasks {
            task.await?;
        }
        Ok(())
    }
}

/// Store module - the runtime coordinator
pub mod store {
    use super::{Arc, AtomicBool, Effect, EffectHandle, JoinHandle, Ordering, Reducer, RwLock, StoreError};
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        /// Every action produced by an effect is broadcast here before it is
        /// fed back into the reducer.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (action_broadcast, _) = broadcast::channel(16);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// The reducer runs immediately under the write lock; effects are
        /// spawned and tracked by the returned handle.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] after [`Store::shutdown`].
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &*self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            let mut tasks = Vec::new();
            for effect in effects {
                self.execute_effect(effect, &mut tasks);
            }

            Ok(EffectHandle { tasks })
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let selected = store.state(|s| s.selection.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Subscribe to actions produced by effects
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Stop accepting new actions
        ///
        /// Effects already spawned keep running; their feedback actions are
        /// rejected.
        pub fn shutdown(&self) {
            tracing::info!("Store shutdown initiated");
            self.shutdown.store(true, Ordering::Release);
        }

        /// Returns `true` once [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        fn execute_effect(&self, effect: Effect<A>, tasks: &mut Vec<JoinHandle<()>>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tasks);
                    }
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let store = self.clone();

                    tasks.push(tokio::spawn(async move {
                        let Some(action) = fut.await else {
                            tracing::trace!("Effect::Future completed with no action");
                            return;
                        };

                        // No receivers is the common case
                        let _ = store.action_broadcast.send(action.clone());

                        match store.send(action).await {
                            Ok(handle) => {
                                if let Err(error) = handle.wait().await {
                                    tracing::error!(error = %error, "Feedback effect failed");
                                }
                            },
                            Err(error) => {
                                tracing::warn!(error = %error, "Feedback action dropped");
                            },
                        }
                    }));
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookfair_core::{SmallVec, smallvec};

    #[derive(Clone, Debug, Default)]
    struct TallyState {
        marks: u32,
        echoes: u32,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum TallyAction {
        Mark,
        MarkAndEcho,
        Echoed,
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TallyState,
            action: TallyAction,
            _env: &(),
        ) -> SmallVec<[Effect<TallyAction>; 4]> {
            match action {
                TallyAction::Mark => {
                    state.marks += 1;
                    SmallVec::new()
                },
                TallyAction::MarkAndEcho => {
                    state.marks += 1;
                    smallvec![Effect::Future(Box::pin(async { Some(TallyAction::Echoed) }))]
                },
                TallyAction::Echoed => {
                    state.echoes += 1;
                    smallvec![Effect::None]
                },
            }
        }
    }

    #[tokio::test]
    async fn send_applies_reducer_immediately() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        let handle = store.send(TallyAction::Mark).await;
        assert!(handle.is_ok());
        assert_eq!(store.state(|s| s.marks).await, 1);
    }

    #[tokio::test]
    async fn future_effect_feeds_action_back() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        let mut observed = store.subscribe_actions();

        let Ok(handle) = store.send(TallyAction::MarkAndEcho).await else {
            unreachable!("store is running");
        };
        assert!(handle.wait().await.is_ok());

        assert_eq!(store.state(|s| (s.marks, s.echoes)).await, (1, 1));
        assert_eq!(observed.try_recv().ok(), Some(TallyAction::Echoed));
    }

    #[tokio::test]
    async fn concurrent_sends_are_serialized() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let _ = store.send(TallyAction::Mark).await;
                })
            })
            .collect();
        for task in tasks {
            assert!(task.await.is_ok());
        }

        assert_eq!(store.state(|s| s.marks).await, 10);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        store.shutdown();

        assert!(store.is_shutting_down());
        assert!(matches!(
            store.send(TallyAction::Mark).await,
            Err(StoreError::ShutdownInProgress)
        ));
        assert_eq!(store.state(|s| s.marks).await, 0);
    }

    #[tokio::test]
    async fn completed_handle_has_nothing_pending() {
        let handle = EffectHandle::completed();
        assert_eq!(handle.pending(), 0);
        assert!(handle.wait().await.is_ok());
    }
}
