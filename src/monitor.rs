//! Session control.
//!
//! One dedicated worker pulls frames synchronously and runs the full cycle
//! (capture, detect, fuse, annotate, deliver) before touching the next frame.
//! There is no pipelining and no parallelism between frames; `AlertState` is
//! only ever touched by this single worker.
//!
//! `stop` raises a flag checked at the top of each iteration; the loop then
//! finishes its current cycle, releases the camera, and hands the engine (and
//! its accumulated state) back to the `Monitor` so a later `start` carries
//! counters and cooldown over.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::engine::{AlertState, FrameReport, OverlapEngine};
use crate::ingest::CameraSource;

/// Monotonic seconds since the process-wide epoch (first call).
pub fn monotonic_secs() -> f64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Owns the camera and engine between sessions and runs the worker during one.
pub struct Monitor {
    camera: Option<CameraSource>,
    engine: Option<OverlapEngine>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<(CameraSource, OverlapEngine)>>,
    frame_interval: Duration,
}

impl Monitor {
    /// `frame_interval` paces the loop (zero = as fast as capture allows;
    /// real devices block on capture anyway).
    pub fn new(camera: CameraSource, engine: OverlapEngine, frame_interval: Duration) -> Self {
        Self {
            camera: Some(camera),
            engine: Some(engine),
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
            frame_interval,
        }
    }

    /// Acquire the camera and launch the worker.
    ///
    /// Returns a bounded receiver of per-frame reports. Updates are delivered
    /// best-effort: when the consumer lags, frames are dropped rather than
    /// stalling capture. Restarting after `stop` succeeds and keeps the
    /// accumulated `AlertState`.
    pub fn start(&mut self) -> Result<Receiver<FrameReport>> {
        if self.worker.is_some() {
            return Err(anyhow!("detection session already running"));
        }
        let mut camera = self
            .camera
            .take()
            .ok_or_else(|| anyhow!("camera unavailable"))?;
        if let Err(err) = camera.connect() {
            self.camera = Some(camera);
            return Err(err.context("acquire camera"));
        }
        let engine = self
            .engine
            .take()
            .ok_or_else(|| anyhow!("engine unavailable"))?;

        self.stop.store(false, Ordering::SeqCst);
        let stop = self.stop.clone();
        let (tx, rx) = bounded(2);
        let interval = self.frame_interval;
        let worker = std::thread::Builder::new()
            .name("handwatch-worker".to_string())
            .spawn(move || run_session(camera, engine, stop, tx, interval))
            .context("spawn worker thread")?;
        self.worker = Some(worker);
        Ok(rx)
    }

    /// Signal termination and wait for the worker to finish its current
    /// iteration and release the camera. Safe to call when not running.
    pub fn stop(&mut self) -> Result<()> {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let (camera, engine) = worker
                .join()
                .map_err(|_| anyhow!("worker thread panicked"))?;
            self.camera = Some(camera);
            self.engine = Some(engine);
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Alert state accumulated so far. `None` while a session is running
    /// (the worker owns the engine then).
    pub fn state(&self) -> Option<AlertState> {
        self.engine.as_ref().map(|engine| engine.state())
    }
}

fn run_session(
    mut camera: CameraSource,
    mut engine: OverlapEngine,
    stop: Arc<AtomicBool>,
    tx: Sender<FrameReport>,
    interval: Duration,
) -> (CameraSource, OverlapEngine) {
    loop {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        let frame = match camera.next_frame() {
            Ok(frame) => frame,
            Err(err) => {
                // Capture failure ends the session cleanly; no retries.
                log::error!("frame capture failed, ending session: {err:#}");
                break;
            }
        };

        let report = engine.process_frame(&frame, monotonic_secs());
        match tx.try_send(report) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::debug!("consumer lagging, dropping frame update");
            }
            // A dropped receiver just means nobody is rendering; detection
            // and alerting continue.
            Err(TrySendError::Disconnected(_)) => {}
        }

        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    camera.release();
    (camera, engine)
}
