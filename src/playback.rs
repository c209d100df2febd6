//! Step-by-step replay of a finished [`ExecutionTrace`].
//!
//! Playback only ever reads a trace produced earlier by [`run`](crate::run).
//! Cancelling a replay stops the frames; the result it came from is untouched.

use crate::agent::AgentState;
use crate::outcome::ExecutionTrace;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between two frames, in milliseconds.
    pub step_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: 400,
        }
    }
}

impl PlaybackConfig {
    pub fn step_interval(&self) -> Duration {
        // A zero period would make `tokio::time::interval` panic.
        Duration::from_millis(self.step_interval_ms.max(1))
    }
}

/// A cursor into a trace. The trace itself is borrowed, never copied or changed.
#[derive(Clone, Debug)]
pub struct Playback<'a> {
    trace: &'a ExecutionTrace,
    cursor: usize,
}

impl<'a> Playback<'a> {
    pub fn new(trace: &'a ExecutionTrace) -> Self {
        Self { trace, cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    pub fn current(&self) -> Option<&'a AgentState> {
        self.trace.get(self.cursor)
    }

    /// True once the cursor sits on the last frame.
    pub fn is_finished(&self) -> bool {
        self.cursor + 1 >= self.trace.len()
    }

    /// Advances one frame; `None` when already at the end.
    pub fn step(&mut self) -> Option<&'a AgentState> {
        if self.is_finished() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn seek(&mut self, index: usize) -> Option<&'a AgentState> {
        let state = self.trace.get(index)?;
        self.cursor = index;
        Some(state)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// How a timed replay ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayOutcome {
    Completed,
    /// Stopped at frame `at`, either by the caller or because `on_frame`
    /// had nowhere left to send frames.
    Cancelled { at: usize },
}

/// Shows the trace one frame per tick, calling `on_frame(index, state)`.
///
/// Frame 0 is emitted immediately, every later frame after one
/// `step_interval`. Sending `true` on the paired `watch::Sender` stops the
/// replay before the next frame. If the sender is dropped the replay runs to
/// completion. `on_frame` returning `Break` stops it at the frame just shown.
pub async fn replay<F>(
    trace: &ExecutionTrace,
    config: &PlaybackConfig,
    mut cancel: watch::Receiver<bool>,
    mut on_frame: F,
) -> ReplayOutcome
where
    F: FnMut(usize, &AgentState) -> ControlFlow<()>,
{
    let mut playback = Playback::new(trace);
    if let Some(state) = playback.current()
        && on_frame(0, state).is_break()
    {
        return ReplayOutcome::Cancelled { at: 0 };
    }

    let mut tick = tokio::time::interval(config.step_interval());
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; frame 0 already covered it.
    tick.tick().await;

    let mut cancellable = true;
    while !playback.is_finished() {
        if *cancel.borrow() {
            return ReplayOutcome::Cancelled {
                at: playback.cursor(),
            };
        }
        tokio::select! {
            _ = tick.tick() => {
                if let Some(state) = playback.step()
                    && on_frame(playback.cursor(), state).is_break()
                {
                    tracing::debug!(at = playback.cursor(), "replay stopped by frame handler");
                    return ReplayOutcome::Cancelled {
                        at: playback.cursor(),
                    };
                }
            }
            changed = cancel.changed(), if cancellable => {
                if changed.is_err() {
                    cancellable = false;
                }
            }
        }
    }

    tracing::debug!(frames = playback.len(), "replay finished");
    ReplayOutcome::Completed
}

/// A replay running on its own task, delivering frames over a channel.
#[derive(Debug)]
pub struct ReplayHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<ReplayOutcome>,
}

impl ReplayHandle {
    /// Spawns [`replay`] on the current Tokio runtime.
    ///
    /// The replay stops early once the receiving half of `frames` is dropped.
    pub fn spawn(
        trace: Arc<ExecutionTrace>,
        config: PlaybackConfig,
        frames: mpsc::UnboundedSender<(usize, AgentState)>,
    ) -> Self {
        let (cancel, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            replay(&trace, &config, cancel_rx, |index, state| {
                match frames.send((index, *state)) {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(_) => ControlFlow::Break(()),
                }
            })
            .await
        });
        Self { cancel, task }
    }

    /// Asks the replay to stop before its next frame.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    pub async fn join(self) -> Result<ReplayOutcome, JoinError> {
        self.task.await
    }
}
