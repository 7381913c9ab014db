//! Staged "preparing a recommendation" sequence.
//!
//! Four fixed steps advance one at a time on a timer. The chain is
//! cooperative: the cancellation flag is checked before every emission, so
//! leaving the loading screen early guarantees no event lands afterwards.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle, time};
use tracing::debug;

/// One step of the staged sequence.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub struct Stage {
    pub icon: &'static str,
    pub text: &'static str,
}

/// The four steps shown while a recommendation is being prepared.
pub fn recommendation_stages() -> Vec<Stage> {
    vec![
        Stage {
            icon: "👀",
            text: "어디서 놀 수 있는지 먼저 살펴보는 중…",
        },
        Stage {
            icon: "💻",
            text: "무리 없이 즐길 수 있는지 살짝 체크 중이야",
        },
        Stage {
            icon: "✨",
            text: "분위기랑 장르가 잘 맞는지 비교하고 있어",
        },
        Stage {
            icon: "🔍",
            text: "느낌이 비슷한 캐릭터를 발견했어!",
        },
    ]
}

/// Delay between steps.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(900);

/// Events emitted by a running sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Step `0..stages.len()` finished, strictly in order.
    StepDone(usize),
    /// Every step finished; the terminal action may be offered.
    Finished,
}

/// Handle owned by the screen that started a sequence. Cancelling (or
/// dropping the receiving channel) stops the chain before its next
/// emission.
pub struct ProgressHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl ProgressHandle {
    /// Stop the chain. A sleep already in flight still elapses, but no
    /// event is sent after this call returns.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }

    /// Whether [`ProgressHandle::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A timed chain over a fixed stage list.
pub struct ProgressSequence {
    stages: Vec<Stage>,
    step_delay: Duration,
}

impl ProgressSequence {
    /// Build a chain over `stages` with a fixed delay between steps.
    pub fn new(stages: Vec<Stage>, step_delay: Duration) -> Self {
        Self { stages, step_delay }
    }

    /// The stage list, in emission order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Spawn the chain, emitting one [`ProgressEvent::StepDone`] per stage
    /// and a final [`ProgressEvent::Finished`] on the given channel.
    pub fn spawn(&self, sender: mpsc::Sender<ProgressEvent>) -> ProgressHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let steps = self.stages.len();
        let delay = self.step_delay;

        let task = tokio::spawn(async move {
            for step in 0..steps {
                time::sleep(delay).await;
                if flag.load(Ordering::SeqCst) {
                    debug!(step, "Progress chain cancelled");
                    return;
                }
                if sender.send(ProgressEvent::StepDone(step)).await.is_err() {
                    return;
                }
            }
            if !flag.load(Ordering::SeqCst) {
                let _ = sender.send(ProgressEvent::Finished).await;
            }
        });

        ProgressHandle { cancelled, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence() -> ProgressSequence {
        ProgressSequence::new(recommendation_stages(), DEFAULT_STEP_DELAY)
    }

    #[tokio::test(start_paused = true)]
    async fn full_run_completes_every_step_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let handle = sequence().spawn(tx);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
            if event == ProgressEvent::Finished {
                break;
            }
        }

        assert_eq!(
            events,
            vec![
                ProgressEvent::StepDone(0),
                ProgressEvent::StepDone(1),
                ProgressEvent::StepDone(2),
                ProgressEvent::StepDone(3),
                ProgressEvent::Finished,
            ]
        );
        assert!(!handle.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_first_step_silences_the_rest() {
        let (tx, mut rx) = mpsc::channel(8);
        let handle = sequence().spawn(tx);

        let first = rx.recv().await;
        assert_eq!(first, Some(ProgressEvent::StepDone(0)));

        handle.cancel();
        assert!(handle.is_cancelled());

        // Waiting well past the remaining schedule must observe silence:
        // the sender side is gone without another event.
        time::sleep(DEFAULT_STEP_DELAY * 10).await;
        assert_eq!(rx.try_recv().ok(), None);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_receiver_stops_the_chain() {
        let (tx, rx) = mpsc::channel(8);
        let handle = sequence().spawn(tx);
        drop(rx);

        time::sleep(DEFAULT_STEP_DELAY * 10).await;
        // Nothing to assert on the channel; the task must simply have
        // ended instead of looping forever.
        assert!(!handle.is_cancelled());
    }
}
