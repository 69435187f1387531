use crate::{DocChatError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Exclusive handle on the default input device.
///
/// At most one capture session may be active; a second `start` while active
/// is rejected. Stopping (or dropping the handle) always releases the stream.
pub struct AudioCapture {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    active: Arc<Mutex<bool>>,
}

impl AudioCapture {
    /// Open the default input device.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| DocChatError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| {
                DocChatError::AudioDeviceError(format!("Failed to get input config: {e}"))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
            active: Arc::new(Mutex::new(false)),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Start capturing; sample chunks (downmixed to mono) are sent to `tx`.
    pub fn start(&mut self, tx: Sender<Vec<f32>>) -> Result<()> {
        if *self.active.lock() {
            return Err(DocChatError::AudioDeviceError(
                "Capture session already active".into(),
            ));
        }

        let channels = self.config.channels as usize;
        let active = Arc::clone(&self.active);

        let err_fn = |err| {
            error!("Audio input stream error: {err}");
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !*active.lock() {
                        return;
                    }

                    // Average the channels into mono
                    let samples = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = tx.try_send(samples) {
                        debug!("Failed to send audio data: {e}");
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                DocChatError::AudioDeviceError(format!("Failed to build input stream: {e}"))
            })?;

        stream.play().map_err(|e| {
            DocChatError::AudioDeviceError(format!("Failed to start input stream: {e}"))
        })?;

        *self.active.lock() = true;
        self.stream = Some(stream);

        info!("Started audio capture");
        Ok(())
    }

    /// Stop capturing and release the device.
    pub fn stop(&mut self) {
        *self.active.lock() = false;

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Stopped audio capture");
        }
    }

    pub fn is_active(&self) -> bool {
        *self.active.lock()
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
