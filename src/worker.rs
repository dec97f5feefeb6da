//! Screening worker thread
//!
//! A dedicated thread owns the `ScreeningEngine` and consumes commands and
//! frames from a channel, so the caller never touches engine state directly.
//! Live metrics and the final report come back on an output channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::biomarkers::LiveMetrics;
use crate::config::EngineConfig;
use crate::engine::{ScreeningEngine, ScreeningReport};
use crate::error::EngineError;
use crate::frame::AudioFrame;

/// Messages to the worker
#[derive(Debug, Clone)]
pub enum ScreeningInput {
    Start,
    Frame(AudioFrame),
    /// End the session early and analyze what was recorded
    Stop,
    Shutdown,
}

/// Messages from the worker
#[derive(Debug, Clone)]
pub enum ScreeningOutput {
    Started { session_id: Uuid },
    Live(LiveMetrics),
    Completed(Box<ScreeningReport>),
    Error(EngineError),
}

/// Handle to control the screening thread
pub struct ScreeningHandle {
    input_tx: Sender<ScreeningInput>,
    output_rx: Receiver<ScreeningOutput>,
    stop_flag: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl ScreeningHandle {
    fn send(&self, input: ScreeningInput) -> Result<(), EngineError> {
        self.input_tx
            .send(input)
            .map_err(|_| EngineError::WorkerDisconnected)
    }

    /// Begin a new recording session
    pub fn start_session(&self) -> Result<(), EngineError> {
        self.send(ScreeningInput::Start)
    }

    /// Queue one frame for analysis
    pub fn send_frame(&self, frame: AudioFrame) -> Result<(), EngineError> {
        self.send(ScreeningInput::Frame(frame))
    }

    /// End the session early; a report (or error) follows on the output channel
    pub fn stop_session(&self) -> Result<(), EngineError> {
        self.send(ScreeningInput::Stop)
    }

    /// Try to receive an output (non-blocking)
    pub fn try_recv(&self) -> Option<ScreeningOutput> {
        self.output_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for an output
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ScreeningOutput> {
        self.output_rx.recv_timeout(timeout).ok()
    }

    /// Request the thread to stop
    pub fn stop(&self) {
        info!("Requesting screening thread stop");
        self.stop_flag.store(true, Ordering::SeqCst);
        let _ = self.input_tx.send(ScreeningInput::Shutdown);
    }

    /// Wait for the thread to finish
    pub fn join(mut self) {
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Start the screening thread
pub fn start_screening_thread(config: EngineConfig) -> Result<ScreeningHandle, EngineError> {
    let engine = ScreeningEngine::new(config)?;

    let (input_tx, input_rx) = mpsc::channel();
    let (output_tx, output_rx) = mpsc::channel();
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();

    let thread_handle = thread::spawn(move || {
        run_screening_thread(engine, input_rx, output_tx, stop_flag_clone);
    });

    Ok(ScreeningHandle {
        input_tx,
        output_rx,
        stop_flag,
        thread_handle: Some(thread_handle),
    })
}

fn run_screening_thread(
    mut engine: ScreeningEngine,
    input_rx: Receiver<ScreeningInput>,
    output_tx: Sender<ScreeningOutput>,
    stop_flag: Arc<AtomicBool>,
) {
    info!("Screening thread started");
    info!("  Session duration: {} ms", engine.config().session_duration_ms);
    info!("  Pitch history: {}", engine.config().pitch_history_capacity);
    info!("  Insufficient signal: {:?}", engine.config().insufficient_signal);

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }

        // Block waiting for input with timeout to check stop flag
        let input = match input_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(input) => input,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                info!("Screening input channel disconnected");
                break;
            }
        };

        let output = match input {
            ScreeningInput::Start => match engine.start() {
                Ok(session_id) => vec![ScreeningOutput::Started { session_id }],
                Err(e) => vec![ScreeningOutput::Error(e)],
            },

            ScreeningInput::Frame(frame) => match engine.process_frame(&frame) {
                Ok(update) => {
                    let mut output = vec![ScreeningOutput::Live(update.metrics)];
                    if update.session_complete {
                        output.push(complete_session(&mut engine));
                    }
                    output
                }
                Err(e) => {
                    debug!("Frame rejected: {}", e);
                    vec![ScreeningOutput::Error(e)]
                }
            },

            ScreeningInput::Stop => match engine.stop() {
                Ok(()) => vec![complete_session(&mut engine)],
                Err(e) => vec![ScreeningOutput::Error(e)],
            },

            ScreeningInput::Shutdown => {
                info!("Screening thread received shutdown");
                break;
            }
        };

        for message in output {
            if output_tx.send(message).is_err() {
                warn!("Screening output channel closed");
                return;
            }
        }
    }

    info!("Screening thread stopped");
}

fn complete_session(engine: &mut ScreeningEngine) -> ScreeningOutput {
    match engine.complete() {
        Ok(report) => {
            info!(
                "Session {} complete: risk {:?}, quality score {:.0}",
                report.session_id, report.result.risk_level, report.result.quality_score
            );
            ScreeningOutput::Completed(Box::new(report))
        }
        Err(e) => {
            warn!("Session ended without a report: {}", e);
            ScreeningOutput::Error(e)
        }
    }
}
