//! Simulated streaming of an already-received text.
//!
//! `StreamRenderer` reveals a complete payload one character at a time at a
//! fixed tick, so a reply that arrived in one piece still reads like a live
//! token stream. Each renderer owns at most one reveal task. Starting a new
//! payload, cancelling, or dropping the renderer stops the running task, and
//! a generation counter stored in the published frame guarantees that a
//! stale task can never write after it was replaced.
//!
//! Characters are Rust `char`s (Unicode scalar values), so multi-byte text is
//! never split inside a code point.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Default delay between two revealed characters.
pub const DEFAULT_TICK: Duration = Duration::from_millis(20);

/// Snapshot of a reveal, published after every tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealFrame {
    /// Bumped on every start/cancel; a task only writes frames of its own generation.
    pub generation: u64,
    /// Text revealed so far.
    pub text: String,
    /// Number of characters revealed so far (one per tick).
    pub revealed: usize,
    /// Whether `text` equals the full payload.
    pub complete: bool,
}

/// The running reveal: its cancellation handle, task, and payload.
struct ActiveReveal {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    full_text: String,
}

/// Reveals text character by character on a fixed tick.
pub struct StreamRenderer {
    tick: Duration,
    output: Arc<watch::Sender<RevealFrame>>,
    active: Option<ActiveReveal>,
}

impl StreamRenderer {
    /// Create a renderer with the given tick. A zero tick is raised to 1ms.
    pub fn new(tick: Duration) -> Self {
        let (output, _) = watch::channel(RevealFrame::default());
        Self {
            tick: tick.max(Duration::from_millis(1)),
            output: Arc::new(output),
            active: None,
        }
    }

    /// A receiver notified on every revealed character.
    pub fn subscribe(&self) -> watch::Receiver<RevealFrame> {
        self.output.subscribe()
    }

    /// The latest frame.
    pub fn frame(&self) -> RevealFrame {
        self.output.borrow().clone()
    }

    /// Whether a reveal task is still running.
    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.task.is_finished())
    }

    /// Start revealing `full_text`, cancelling any reveal in progress.
    ///
    /// An empty payload completes immediately without scheduling a tick.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, full_text: impl Into<String>) {
        let full_text = full_text.into();
        self.stop_active();

        let empty = full_text.is_empty();
        let mut generation = 0;
        self.output.send_modify(|frame| {
            generation = frame.generation + 1;
            *frame = RevealFrame {
                generation,
                text: String::new(),
                revealed: 0,
                complete: empty,
            };
        });

        if empty {
            debug!(generation, "empty payload, reveal complete");
            return;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(reveal(
            full_text.chars().collect(),
            self.tick,
            generation,
            self.output.clone(),
            cancel.clone(),
        ));
        debug!(generation, chars = full_text.chars().count(), "reveal started");

        self.active = Some(ActiveReveal {
            cancel,
            task,
            full_text,
        });
    }

    /// Stop the running reveal, leaving the partially revealed text in place.
    pub fn cancel(&mut self) {
        if self.stop_active() {
            debug!("reveal cancelled");
        }
    }

    /// Reveal the rest of the current payload at once and stop the task.
    pub fn skip(&mut self) {
        let Some(full_text) = self.active.as_ref().map(|a| a.full_text.clone()) else {
            return;
        };
        self.stop_active();
        self.output.send_modify(|frame| {
            frame.revealed = full_text.chars().count();
            frame.text = full_text;
            frame.complete = true;
        });
    }

    /// Wait for the running reveal to finish (or be cancelled).
    pub async fn join(&mut self) {
        if let Some(active) = self.active.as_mut() {
            if !active.task.is_finished() {
                let _ = (&mut active.task).await;
            }
        }
    }

    /// Cancel the active task and fence off any write it might still attempt.
    ///
    /// Returns whether a task was running.
    fn stop_active(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        let was_running = !active.task.is_finished();
        active.cancel.cancel();
        active.task.abort();
        // Taking the write lock waits out an in-flight tick; bumping the
        // generation makes every later write from that task a no-op.
        self.output.send_if_modified(|frame| {
            frame.generation += 1;
            false
        });
        was_running
    }
}

impl Default for StreamRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

impl Drop for StreamRenderer {
    fn drop(&mut self) {
        self.stop_active();
    }
}

/// The reveal loop: one character per tick until done or cancelled.
async fn reveal(
    chars: Vec<char>,
    tick: Duration,
    generation: u64,
    output: Arc<watch::Sender<RevealFrame>>,
    cancel: CancellationToken,
) {
    let total = chars.len();
    for (index, ch) in chars.into_iter().enumerate() {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(tick) => {}
        }

        let written = output.send_if_modified(|frame| {
            if frame.generation != generation {
                return false;
            }
            frame.text.push(ch);
            frame.revealed = index + 1;
            frame.complete = index + 1 == total;
            true
        });
        if !written {
            trace!(generation, "stale reveal task stopping");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect_frames(mut rx: watch::Receiver<RevealFrame>) -> Vec<RevealFrame> {
        let mut frames = Vec::new();
        loop {
            if rx.changed().await.is_err() {
                break;
            }
            let frame = rx.borrow_and_update().clone();
            let done = frame.complete;
            frames.push(frame);
            if done {
                break;
            }
        }
        frames
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_completes_without_ticks() {
        let mut renderer = StreamRenderer::default();
        renderer.start("");
        let frame = renderer.frame();
        assert!(frame.complete);
        assert_eq!(frame.text, "");
        assert_eq!(frame.revealed, 0);
        assert!(!renderer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn reveals_one_char_per_tick() {
        let mut renderer = StreamRenderer::new(Duration::from_millis(20));
        let mut rx = renderer.subscribe();
        let started = tokio::time::Instant::now();
        renderer.start("hello");
        // Skip the reset frame published by `start`.
        rx.borrow_and_update();

        let frames = collect_frames(rx).await;

        let texts: Vec<&str> = frames.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["h", "he", "hel", "hell", "hello"]);
        assert!(frames.last().unwrap().complete);
        assert!(frames[..4].iter().all(|f| !f.complete));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(100) && elapsed < Duration::from_millis(120));
    }

    #[tokio::test(start_paused = true)]
    async fn multibyte_characters_are_never_split() {
        let mut renderer = StreamRenderer::new(Duration::from_millis(20));
        let mut rx = renderer.subscribe();
        renderer.start("héllo 👋 世界");
        rx.borrow_and_update();

        let frames = collect_frames(rx).await;
        assert_eq!(frames.len(), "héllo 👋 世界".chars().count());
        for window in frames.windows(2) {
            let added = &window[1].text[window[0].text.len()..];
            assert_eq!(added.chars().count(), 1);
        }
        assert_eq!(frames.last().unwrap().text, "héllo 👋 世界");
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_payload() {
        let mut renderer = StreamRenderer::new(Duration::from_millis(20));
        renderer.start("aaaaaaaa");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(renderer.frame().text, "aa");

        renderer.start("bbb");
        assert_eq!(renderer.frame().text, "");
        renderer.join().await;

        let frame = renderer.frame();
        assert_eq!(frame.text, "bbb");
        assert!(frame.complete);

        // Long after A would have finished, nothing of it shows up.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(renderer.frame().text, "bbb");
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_restart_leaks_nothing() {
        let mut renderer = StreamRenderer::new(Duration::from_millis(20));
        let mut rx = renderer.subscribe();
        renderer.start("first");
        renderer.start("second");
        rx.borrow_and_update();

        let frames = collect_frames(rx).await;
        assert!(frames.iter().all(|f| "second".starts_with(&f.text)));
        assert_eq!(frames.last().unwrap().text, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_further_mutation() {
        let mut renderer = StreamRenderer::new(Duration::from_millis(20));
        let mut rx = renderer.subscribe();
        renderer.start("hello world");
        tokio::time::sleep(Duration::from_millis(70)).await;

        renderer.cancel();
        assert!(!renderer.is_active());
        let frozen = renderer.frame();
        assert_eq!(frozen.text, "hel");
        rx.borrow_and_update();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(renderer.frame().text, "hel");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_renderer_detaches_subscribers() {
        let mut renderer = StreamRenderer::new(Duration::from_millis(20));
        let mut rx = renderer.subscribe();
        renderer.start("hello world");
        tokio::time::sleep(Duration::from_millis(30)).await;
        rx.borrow_and_update();

        drop(renderer);
        tokio::time::sleep(Duration::from_secs(1)).await;

        // The sender is gone once the aborted task releases it; no frame was
        // published after teardown.
        assert!(rx.has_changed().is_err());
        assert_eq!(rx.borrow().text, "h");
    }

    #[tokio::test(start_paused = true)]
    async fn skip_reveals_remainder() {
        let mut renderer = StreamRenderer::new(Duration::from_millis(20));
        renderer.start("hello");
        tokio::time::sleep(Duration::from_millis(30)).await;
        renderer.skip();

        let frame = renderer.frame();
        assert_eq!(frame.text, "hello");
        assert_eq!(frame.revealed, 5);
        assert!(frame.complete);
        assert!(!renderer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_tick_is_clamped() {
        let mut renderer = StreamRenderer::new(Duration::ZERO);
        let started = tokio::time::Instant::now();
        renderer.start("abc");
        renderer.join().await;
        assert_eq!(renderer.frame().text, "abc");
        assert!(started.elapsed() >= Duration::from_millis(3));
    }
}
