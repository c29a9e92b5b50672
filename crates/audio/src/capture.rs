//! Microphone capture using CPAL, WAV assembly using hound
//!
//! A dedicated worker thread owns the CPAL stream (it is not `Send`);
//! the adapter talks to it through a shared chunk buffer and an atomic
//! capture flag. Samples are converted to 16-bit PCM at the device's
//! native rate and wrapped in a WAV container on `flush`.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use hound::{WavSpec, WavWriter};
use parking_lot::Mutex;

use interview_voice_core::{AudioCapture, AudioClip, AudioFormat, ChunkBuffer, Result};

use crate::AudioError;

/// Preferred capture parameters
///
/// The device's native configuration always wins; these are only hints
/// recorded for diagnostics.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
        }
    }
}

/// Actual parameters of the opened stream
#[derive(Debug, Clone, Copy)]
struct StreamInfo {
    sample_rate: u32,
    channels: u16,
}

/// Microphone capture from the default input device
pub struct CpalCapture {
    config: CaptureConfig,
    buffer: Arc<Mutex<ChunkBuffer>>,
    capturing: Arc<AtomicBool>,
    stream_info: Option<StreamInfo>,
    shutdown: Option<mpsc::Sender<()>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl CpalCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            buffer: Arc::new(Mutex::new(ChunkBuffer::new())),
            capturing: Arc::new(AtomicBool::new(false)),
            stream_info: None,
            shutdown: None,
            worker: None,
        }
    }
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn setup(&mut self) -> Result<()> {
        if self.shutdown.is_some() {
            return Ok(());
        }

        let (ready_tx, ready_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let buffer = Arc::clone(&self.buffer);
        let capturing = Arc::clone(&self.capturing);

        let worker = thread::Builder::new()
            .name("interview-capture".to_string())
            .spawn(move || run_capture_worker(buffer, capturing, ready_tx, shutdown_rx))
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        // Device acquisition happens on the worker; surface its result.
        let info = ready_rx
            .recv_timeout(Duration::from_secs(5))
            .map_err(|_| AudioError::Stream("capture worker did not report".to_string()))??;

        tracing::info!(
            sample_rate = info.sample_rate,
            channels = info.channels,
            preferred_rate = self.config.sample_rate,
            "microphone acquired"
        );

        self.stream_info = Some(info);
        self.shutdown = Some(shutdown_tx);
        self.worker = Some(worker);
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        if self.shutdown.is_none() {
            return Err(AudioError::NotReady.into());
        }
        if self.capturing.swap(true, Ordering::SeqCst) {
            tracing::debug!("capture already running, start ignored");
        } else {
            // A turn starts clean even if the previous one was abandoned.
            self.buffer.lock().clear();
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if !self.capturing.swap(false, Ordering::SeqCst) {
            tracing::debug!("capture already stopped, stop ignored");
        }
        Ok(())
    }

    fn flush(&mut self) -> AudioClip {
        let samples = self.buffer.lock().flush();
        if samples.is_empty() {
            return AudioClip::empty(AudioFormat::Wav);
        }

        let info = self.stream_info.unwrap_or(StreamInfo {
            sample_rate: self.config.sample_rate,
            channels: self.config.channels,
        });

        match encode_wav(&samples, info.sample_rate, info.channels) {
            Ok(bytes) => AudioClip::new(bytes, AudioFormat::Wav),
            Err(e) => {
                tracing::error!("WAV assembly failed: {e}");
                AudioClip::empty(AudioFormat::Wav)
            }
        }
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn release(&mut self) {
        self.capturing.store(false, Ordering::SeqCst);
        self.buffer.lock().clear();
        // Dropping the sender unblocks the worker, which drops the stream.
        self.shutdown.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        self.stream_info = None;
    }
}

impl Drop for CpalCapture {
    fn drop(&mut self) {
        self.release();
    }
}

/// Worker owning the CPAL stream for the lifetime of a session
fn run_capture_worker(
    buffer: Arc<Mutex<ChunkBuffer>>,
    capturing: Arc<AtomicBool>,
    ready_tx: mpsc::Sender<std::result::Result<StreamInfo, AudioError>>,
    shutdown_rx: mpsc::Receiver<()>,
) {
    match build_input_stream(buffer, capturing) {
        Ok((stream, info)) => {
            if let Err(e) = stream.play() {
                let _ = ready_tx.send(Err(AudioError::Stream(e.to_string())));
                return;
            }
            let _ = ready_tx.send(Ok(info));
            // Parks until the adapter drops its shutdown sender.
            let _ = shutdown_rx.recv();
            drop(stream);
            tracing::debug!("capture worker released the input stream");
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
        }
    }
}

fn build_input_stream(
    buffer: Arc<Mutex<ChunkBuffer>>,
    capturing: Arc<AtomicBool>,
) -> std::result::Result<(cpal::Stream, StreamInfo), AudioError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(AudioError::NoInputDevice)?;

    tracing::debug!("using audio input device: {:?}", device.name());

    let supported = device
        .default_input_config()
        .map_err(|_| AudioError::NoSupportedConfig)?;

    let info = StreamInfo {
        sample_rate: supported.sample_rate().0,
        channels: supported.channels(),
    };
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    let stream = match sample_format {
        cpal::SampleFormat::I16 => build_stream_typed::<i16>(&device, &config, buffer, capturing),
        cpal::SampleFormat::U16 => build_stream_typed::<u16>(&device, &config, buffer, capturing),
        cpal::SampleFormat::F32 => build_stream_typed::<f32>(&device, &config, buffer, capturing),
        _ => Err(AudioError::NoSupportedConfig),
    }?;

    Ok((stream, info))
}

fn build_stream_typed<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    buffer: Arc<Mutex<ChunkBuffer>>,
    capturing: Arc<AtomicBool>,
) -> std::result::Result<cpal::Stream, AudioError>
where
    T: SizedSample + Send + 'static,
    i16: FromSample<T>,
{
    let err_fn = |err| tracing::error!("audio stream error: {err}");

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if !capturing.load(Ordering::SeqCst) {
                    return;
                }
                let mut chunk = Vec::with_capacity(data.len() * 2);
                for &sample in data {
                    let s: i16 = sample.to_sample();
                    chunk.extend_from_slice(&s.to_le_bytes());
                }
                buffer.lock().push(chunk);
            },
            err_fn,
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))
}

/// Wrap raw 16-bit little-endian PCM in a WAV container
pub fn encode_wav(
    pcm_le: &[u8],
    sample_rate: u32,
    channels: u16,
) -> std::result::Result<Vec<u8>, AudioError> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| AudioError::Encode(e.to_string()))?;
        for pair in pcm_le.chunks_exact(2) {
            let sample = i16::from_le_bytes([pair[0], pair[1]]);
            writer
                .write_sample(sample)
                .map_err(|e| AudioError::Encode(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioError::Encode(e.to_string()))?;
    }
    Ok(cursor.into_inner())
}
