//! Audible alert delivery.
//!
//! The engine only knows the `AlertSink` seam. Sinks must be non-blocking
//! relative to the capture loop or bounded in latency: `TerminalBell` is a
//! single write, `TonePlayer` plays on a detached thread.

use std::io::Write;

use anyhow::Result;

/// Alert tone frequency in Hz.
pub const ALERT_FREQUENCY_HZ: u32 = 1_000;
/// Alert tone duration in milliseconds.
pub const ALERT_DURATION_MS: u64 = 300;

/// Receives the audible notification when an alert fires.
pub trait AlertSink: Send {
    fn alert(&mut self) -> Result<()>;
}

/// Default sink: terminal bell plus a log line.
pub struct TerminalBell;

impl AlertSink for TerminalBell {
    fn alert(&mut self) -> Result<()> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        log::warn!("alert: hand overlap detected");
        Ok(())
    }
}

#[cfg(feature = "alert-audio")]
pub use tone::TonePlayer;

#[cfg(feature = "alert-audio")]
mod tone {
    use std::time::Duration;

    use anyhow::{anyhow, Context, Result};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::SampleFormat;

    use super::{AlertSink, ALERT_DURATION_MS, ALERT_FREQUENCY_HZ};

    /// Plays a fixed sine tone through the default output device.
    pub struct TonePlayer {
        frequency_hz: u32,
        duration: Duration,
    }

    impl TonePlayer {
        pub fn new(frequency_hz: u32, duration: Duration) -> Self {
            Self {
                frequency_hz,
                duration,
            }
        }
    }

    impl Default for TonePlayer {
        fn default() -> Self {
            Self::new(
                ALERT_FREQUENCY_HZ,
                Duration::from_millis(ALERT_DURATION_MS),
            )
        }
    }

    impl AlertSink for TonePlayer {
        fn alert(&mut self) -> Result<()> {
            let frequency = self.frequency_hz as f32;
            let duration = self.duration;
            // The stream lives on its own thread so the capture loop never
            // waits on audio.
            std::thread::spawn(move || {
                if let Err(err) = play_tone(frequency, duration) {
                    log::warn!("alert tone failed: {err:#}");
                }
            });
            Ok(())
        }
    }

    fn play_tone(frequency: f32, duration: Duration) -> Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no default audio output device"))?;
        let supported = device
            .default_output_config()
            .context("query default output config")?;
        if supported.sample_format() != SampleFormat::F32 {
            return Err(anyhow!(
                "unsupported output sample format {:?}",
                supported.sample_format()
            ));
        }

        let config = supported.config();
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;
        let mut tick = 0f32;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let value =
                            (tick * frequency * 2.0 * std::f32::consts::PI / sample_rate).sin()
                                * 0.4;
                        tick += 1.0;
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                    }
                },
                |err| log::warn!("audio output error: {err}"),
                None,
            )
            .context("build audio output stream")?;
        stream.play().context("start audio output stream")?;
        std::thread::sleep(duration);
        Ok(())
    }
}
