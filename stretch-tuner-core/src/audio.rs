//! # Audio Capture Module
//!
//! Live frame source backed by CPAL (Cross-Platform Audio Library). The input
//! callback downmixes to mono, cuts the stream into fixed-length frames and
//! hands them over a single-slot channel to the detection loop.
//!
//! ## Features
//! - Default input device, 32-bit float samples
//! - Requested sample rate when the device supports it, nearest one otherwise
//! - Multichannel input averaged to mono
//! - Frames delivered strictly in capture order

use anyhow::{Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SupportedStreamConfig, SupportedStreamConfigRange};
use crossbeam_channel::{Receiver, Sender};

use crate::config::DetectorConfig;
use crate::session::FrameSource;

/// A running input stream that yields fixed-length mono frames.
pub struct AudioCapture {
    // Dropping the stream stops capture.
    _stream: cpal::Stream,
    receiver: Receiver<Vec<f32>>,
    sample_rate: u32,
    frame_len: usize,
}

impl AudioCapture {
    /// Starts capture from the default input device.
    ///
    /// The frame length is `frame_duration` seconds at the rate the device
    /// actually runs at, which is the requested rate whenever possible.
    ///
    /// # Returns
    /// * `Ok(capture)` - Running capture; frames arrive via [`FrameSource::next_frame`]
    /// * `Err(e)` - No input device, no float input format, or stream setup failure
    pub fn start(config: &DetectorConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow!("No input device available"))?;

        log::info!("[AUDIO] Using audio input device: {}", device.name()?);

        let configs = device.supported_input_configs()?.collect::<Vec<_>>();
        let supported_config = find_supported_config(configs, config.sample_rate)
            .ok_or_else(|| anyhow!("No suitable f32 input format found"))?;

        let sample_rate = supported_config.sample_rate().0;
        let channels = supported_config.channels().max(1) as usize;
        if sample_rate != config.sample_rate {
            log::warn!(
                "[AUDIO] Device does not support {} Hz, capturing at {} Hz instead",
                config.sample_rate,
                sample_rate
            );
        }
        let frame_len = config.frame_len_at(sample_rate).max(1);
        let stream_config: cpal::StreamConfig = supported_config.into();

        log::info!(
            "[AUDIO] Capturing {} channel(s) at {} Hz, {} samples per frame",
            channels,
            sample_rate,
            frame_len
        );

        let (sender, receiver) = crossbeam_channel::bounded::<Vec<f32>>(1);
        let mut framer = Framer::new(frame_len, channels, sender);

        let err_fn = |err: cpal::StreamError| {
            log::error!("[AUDIO] An error occurred on the audio stream: {}", err)
        };

        let stream = device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| framer.push(data),
            err_fn,
            None,
        )?;

        stream.play()?;

        Ok(AudioCapture {
            _stream: stream,
            receiver,
            sample_rate,
            frame_len,
        })
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }
}

impl FrameSource for AudioCapture {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Blocks until the next complete frame has been captured.
    fn next_frame(&mut self) -> Result<Vec<f64>> {
        let frame = self
            .receiver
            .recv()
            .map_err(|_| anyhow!("Audio stream closed"))?;
        Ok(frame.into_iter().map(f64::from).collect())
    }
}

/// Accumulates interleaved callback data into mono frames of a fixed length.
struct Framer {
    frame_len: usize,
    channels: usize,
    buffer: Vec<f32>,
    sender: Sender<Vec<f32>>,
}

impl Framer {
    fn new(frame_len: usize, channels: usize, sender: Sender<Vec<f32>>) -> Self {
        Framer {
            frame_len,
            channels,
            buffer: Vec::with_capacity(frame_len * 2),
            sender,
        }
    }

    fn push(&mut self, data: &[f32]) {
        if self.channels == 1 {
            self.buffer.extend_from_slice(data);
        } else {
            let scale = 1.0 / self.channels as f32;
            self.buffer.extend(
                data.chunks_exact(self.channels)
                    .map(|frame| frame.iter().sum::<f32>() * scale),
            );
        }

        // While we have enough data for a full frame, hand it over.
        while self.buffer.len() >= self.frame_len {
            let frame: Vec<f32> = self.buffer.drain(..self.frame_len).collect();
            // A frame completed while the previous one is still being analysed is dropped.
            if self.sender.try_send(frame).is_err() {
                log::debug!("[AUDIO] Detector busy, dropped one frame");
            }
        }
    }
}

/// Finds the best supported audio configuration for the target sample rate.
///
/// Only 32-bit float formats qualify. Ranges containing the target rate win,
/// with fewer channels preferred; otherwise the range closest to the target is
/// used at its nearest rate.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfig> {
    let distance = |c: &SupportedStreamConfigRange| {
        let min = c.min_sample_rate().0;
        let max = c.max_sample_rate().0;
        if target_rate < min {
            min - target_rate
        } else {
            target_rate.saturating_sub(max)
        }
    };

    configs
        .into_iter()
        .filter(|c| c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| (distance(c), c.channels()))
        .map(|c| {
            let rate = target_rate.clamp(c.min_sample_rate().0, c.max_sample_rate().0);
            c.with_sample_rate(cpal::SampleRate(rate))
        })
}
