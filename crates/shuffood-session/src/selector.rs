//! Timed random selection over a candidate set.
//!
//! A shuffle is a background task that emits a fixed number of
//! [`ShuffleEvent::Tick`]s, each an independent uniform draw (with
//! replacement), and then one [`ShuffleEvent::Settled`] chosen by a fresh
//! Fisher–Yates permutation of the whole set. The two sources of randomness
//! are independent, so the last tick need not match the settled pick.
//!
//! Dropping the [`ShuffleHandle`] aborts the task. No tick is delivered after
//! that point.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use shuffood_core::{AppConfig, Candidate};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::SelectionError;

pub const DEFAULT_TICKS: u32 = 30;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Events are small and the consumer normally keeps up; this only bounds
/// memory when it does not.
const MAX_EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum ShuffleEvent {
    /// One animation frame. `tick` counts from 1.
    Tick { tick: u32, pick: Candidate },
    /// The committed pick. Always the last event of a shuffle.
    Settled(Candidate),
}

#[derive(Debug, Clone, Copy)]
pub struct Selector {
    ticks: u32,
    interval: Duration,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(DEFAULT_TICKS, DEFAULT_TICK_INTERVAL)
    }
}

impl Selector {
    #[must_use]
    pub fn new(ticks: u32, interval: Duration) -> Self {
        Self { ticks, interval }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.shuffle_ticks,
            Duration::from_millis(config.shuffle_tick_ms),
        )
    }

    #[must_use]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts a shuffle over `candidates` seeded from the OS.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::EmptyCandidateSet`] when `candidates` is
    /// empty. No task is spawned in that case.
    pub fn shuffle(&self, candidates: Vec<Candidate>) -> Result<ShuffleHandle, SelectionError> {
        self.spawn(candidates, StdRng::from_os_rng())
    }

    /// Same as [`Selector::shuffle`] with a fixed seed, for reproducible runs.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::EmptyCandidateSet`] when `candidates` is
    /// empty.
    pub fn shuffle_seeded(
        &self,
        candidates: Vec<Candidate>,
        seed: u64,
    ) -> Result<ShuffleHandle, SelectionError> {
        self.spawn(candidates, StdRng::seed_from_u64(seed))
    }

    fn spawn<R>(&self, candidates: Vec<Candidate>, mut rng: R) -> Result<ShuffleHandle, SelectionError>
    where
        R: Rng + Send + 'static,
    {
        if candidates.is_empty() {
            return Err(SelectionError::EmptyCandidateSet);
        }

        let capacity = usize::try_from(self.ticks)
            .unwrap_or(usize::MAX)
            .saturating_add(1)
            .min(MAX_EVENT_BUFFER);
        let (tx, rx) = mpsc::channel(capacity);
        let ticks = self.ticks;
        let interval = self.interval;

        tracing::debug!(candidates = candidates.len(), ticks, "shuffle started");
        let task = tokio::spawn(async move {
            for tick in 1..=ticks {
                tokio::time::sleep(interval).await;
                let Some(pick) = candidates.choose(&mut rng).cloned() else {
                    return;
                };
                if tx.send(ShuffleEvent::Tick { tick, pick }).await.is_err() {
                    return;
                }
            }
            if let Some(pick) = final_pick(&candidates, &mut rng) {
                tracing::debug!(id = %pick.id, name = %pick.name, "shuffle settled");
                // A closed receiver means the caller stopped listening.
                let _ = tx.send(ShuffleEvent::Settled(pick)).await;
            }
        });

        Ok(ShuffleHandle { events: rx, task })
    }
}

/// Permutes the full set with Fisher–Yates and returns the first element.
/// `None` only for an empty slice.
#[must_use]
pub fn final_pick<R>(candidates: &[Candidate], rng: &mut R) -> Option<Candidate>
where
    R: Rng + ?Sized,
{
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.shuffle(rng);
    order.first().map(|&i| candidates[i].clone())
}

/// Receiving end of a running shuffle.
#[derive(Debug)]
pub struct ShuffleHandle {
    events: mpsc::Receiver<ShuffleEvent>,
    task: JoinHandle<()>,
}

impl ShuffleHandle {
    /// Waits for the next event. Returns `None` once the shuffle has settled
    /// and every event has been consumed.
    pub async fn next_event(&mut self) -> Option<ShuffleEvent> {
        self.events.recv().await
    }

    /// Stops the shuffle. Pending and future ticks are discarded.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ShuffleHandle {
    fn drop(&mut self) {
        self.task.abort();
        self.events.close();
    }
}

#[cfg(test)]
#[path = "selector_test.rs"]
mod tests;
