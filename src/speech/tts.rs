//! Text-to-speech playback over the platform synthesizer
//!
//! A worker thread owns the synthesizer process (`say` on macOS,
//! `espeak-ng` elsewhere) and receives commands over a channel. At most one
//! utterance is ever active: speaking a new one kills the current process
//! first, and dropping the handle stops playback and shuts the worker down.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub enum SpeechCommand {
    Speak { entry_id: Uuid, text: String },
    Stop,
    Shutdown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechEvent {
    /// An utterance began playing
    Started(Uuid),
    /// An utterance ended, naturally or by cancellation
    Finished(Uuid),
    /// The synthesizer could not be started
    Error { entry_id: Uuid, message: String },
}

/// Spawns the process that reads one utterance aloud.
trait Synthesizer: Send + 'static {
    fn spawn(&mut self, text: &str) -> std::io::Result<Child>;
}

/// Platform speech synthesizer.
struct PlatformSynth;

impl Synthesizer for PlatformSynth {
    fn spawn(&mut self, text: &str) -> std::io::Result<Child> {
        let program = if cfg!(target_os = "macos") {
            "say"
        } else {
            "espeak-ng"
        };
        Command::new(program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }
}

/// Handle to the playback worker. UI-thread safe: commands go in, events
/// are drained once per frame.
pub struct SpeechPlayback {
    command_tx: Sender<SpeechCommand>,
    event_rx: Receiver<SpeechEvent>,
    worker: Option<JoinHandle<()>>,
}

impl SpeechPlayback {
    pub fn new() -> Self {
        Self::with_synth(PlatformSynth)
    }

    fn with_synth<S: Synthesizer>(synth: S) -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(64);

        let worker = thread::Builder::new()
            .name("speech-playback".into())
            .spawn(move || run_worker(synth, command_rx, event_tx))
            .ok();

        if worker.is_none() {
            warn!("Failed to spawn speech playback worker");
        }

        Self {
            command_tx,
            event_rx,
            worker,
        }
    }

    /// Queue an utterance; any utterance already playing is cancelled.
    pub fn speak(&self, entry_id: Uuid, text: impl Into<String>) {
        let _ = self.command_tx.send(SpeechCommand::Speak {
            entry_id,
            text: text.into(),
        });
    }

    /// Stop the current utterance, if any.
    pub fn stop(&self) {
        let _ = self.command_tx.send(SpeechCommand::Stop);
    }

    /// Drain pending playback events.
    pub fn poll_event(&self) -> Option<SpeechEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Default for SpeechPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SpeechPlayback {
    fn drop(&mut self) {
        let _ = self.command_tx.send(SpeechCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

struct ActiveUtterance {
    entry_id: Uuid,
    child: Child,
}

fn run_worker<S: Synthesizer>(
    mut synth: S,
    command_rx: Receiver<SpeechCommand>,
    event_tx: Sender<SpeechEvent>,
) {
    let mut active: Option<ActiveUtterance> = None;

    loop {
        match command_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(SpeechCommand::Speak { entry_id, text }) => {
                // Cancel-on-new: at most one utterance may be active
                if let Some(previous) = active.take() {
                    kill_utterance(previous, &event_tx);
                }

                match synth.spawn(&text) {
                    Ok(child) => {
                        debug!("Speaking entry {entry_id} ({} chars)", text.len());
                        active = Some(ActiveUtterance { entry_id, child });
                        let _ = event_tx.send(SpeechEvent::Started(entry_id));
                    }
                    Err(e) => {
                        warn!("Speech synthesis failed: {e}");
                        let _ = event_tx.send(SpeechEvent::Error {
                            entry_id,
                            message: e.to_string(),
                        });
                    }
                }
            }
            Ok(SpeechCommand::Stop) => {
                if let Some(current) = active.take() {
                    kill_utterance(current, &event_tx);
                }
            }
            Ok(SpeechCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(current) = active.take() {
                    kill_utterance(current, &event_tx);
                }
                info!("Speech playback worker shut down");
                return;
            }
            Err(RecvTimeoutError::Timeout) => {
                // Reap a naturally finished utterance
                if let Some(current) = active.as_mut() {
                    match current.child.try_wait() {
                        Ok(Some(_)) => {
                            let finished = active.take();
                            if let Some(finished) = finished {
                                let _ = event_tx.send(SpeechEvent::Finished(finished.entry_id));
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            debug!("try_wait failed: {e}");
                            active = None;
                        }
                    }
                }
            }
        }
    }
}

fn kill_utterance(mut utterance: ActiveUtterance, event_tx: &Sender<SpeechEvent>) {
    let _ = utterance.child.kill();
    let _ = utterance.child.wait();
    let _ = event_tx.send(SpeechEvent::Finished(utterance.entry_id));
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fake synthesizer whose "utterances" just sleep.
    struct SleepSynth {
        duration_secs: &'static str,
    }

    impl Synthesizer for SleepSynth {
        fn spawn(&mut self, _text: &str) -> std::io::Result<Child> {
            Command::new("sleep")
                .arg(self.duration_secs)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
        }
    }

    /// Synthesizer that always fails to start.
    struct BrokenSynth;

    impl Synthesizer for BrokenSynth {
        fn spawn(&mut self, _text: &str) -> std::io::Result<Child> {
            Command::new("docchat-no-such-synth-binary").spawn()
        }
    }

    fn wait_for_event(playback: &SpeechPlayback) -> Option<SpeechEvent> {
        for _ in 0..100 {
            if let Some(event) = playback.poll_event() {
                return Some(event);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn test_new_utterance_cancels_previous() {
        let playback = SpeechPlayback::with_synth(SleepSynth { duration_secs: "10" });
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        playback.speak(first, "first answer");
        assert_eq!(wait_for_event(&playback), Some(SpeechEvent::Started(first)));

        playback.speak(second, "second answer");
        // The first utterance is cancelled before the second starts
        assert_eq!(wait_for_event(&playback), Some(SpeechEvent::Finished(first)));
        assert_eq!(wait_for_event(&playback), Some(SpeechEvent::Started(second)));
    }

    #[test]
    fn test_stop_finishes_current_utterance() {
        let playback = SpeechPlayback::with_synth(SleepSynth { duration_secs: "10" });
        let id = Uuid::new_v4();

        playback.speak(id, "answer");
        assert_eq!(wait_for_event(&playback), Some(SpeechEvent::Started(id)));

        playback.stop();
        assert_eq!(wait_for_event(&playback), Some(SpeechEvent::Finished(id)));
    }

    #[test]
    fn test_natural_finish_is_reported() {
        let playback = SpeechPlayback::with_synth(SleepSynth { duration_secs: "0" });
        let id = Uuid::new_v4();

        playback.speak(id, "answer");
        assert_eq!(wait_for_event(&playback), Some(SpeechEvent::Started(id)));
        assert_eq!(wait_for_event(&playback), Some(SpeechEvent::Finished(id)));
    }

    #[test]
    fn test_spawn_failure_reports_error() {
        let playback = SpeechPlayback::with_synth(BrokenSynth);
        let id = Uuid::new_v4();

        playback.speak(id, "answer");
        match wait_for_event(&playback) {
            Some(SpeechEvent::Error { entry_id, .. }) => assert_eq!(entry_id, id),
            other => panic!("expected error event, got {other:?}"),
        }
    }
}
