use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Recordings always run to this fixed deadline; the timer is the only
/// thing that stops them.
pub const RECORD_DURATION_MS: u64 = 5_000;
pub const PROGRESS_TICK_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Emitted by the recording thread and drained by the async event pump.
#[derive(Debug)]
pub enum RecorderEvent {
    Progress { elapsed_ms: u64 },
    Finished { wav: Vec<u8> },
    Failed { reason: String },
}

/// Runs one fixed-duration recording on its own thread, streaming
/// progress ticks back to the async side. Exactly one terminal event
/// (`Finished` or `Failed`) is sent per recording.
pub fn spawn_recording(tx: UnboundedSender<RecorderEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        if let Err(err) = run(&tx) {
            let _ = tx.send(RecorderEvent::Failed {
                reason: err.to_string(),
            });
        }
    })
}

fn run(tx: &UnboundedSender<RecorderEvent>) -> Result<(), CaptureError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| CaptureError::PermissionDenied("no input device available".to_string()))?;
    let config = device
        .default_input_config()
        .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

    let sample_rate = config.sample_rate().0;
    let channels = config.channels();
    let sample_format = config.sample_format();
    let stream_config: cpal::StreamConfig = config.into();

    let samples: Arc<Mutex<Vec<i16>>> = Arc::new(Mutex::new(Vec::new()));
    let err_fn = |err| tracing::error!("Input stream error: {err}");

    let stream = match sample_format {
        cpal::SampleFormat::I16 => {
            let samples = Arc::clone(&samples);
            device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &_| append_i16(data, &samples),
                err_fn,
                None,
            )
        }
        cpal::SampleFormat::F32 => {
            let samples = Arc::clone(&samples);
            device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &_| append_f32(data, &samples),
                err_fn,
                None,
            )
        }
        other => return Err(CaptureError::UnsupportedFormat(format!("{other:?}"))),
    }
    .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

    stream.play().map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

    let mut elapsed: u64 = 0;
    while elapsed < RECORD_DURATION_MS {
        thread::sleep(Duration::from_millis(PROGRESS_TICK_MS));
        elapsed += PROGRESS_TICK_MS;
        let _ = tx.send(RecorderEvent::Progress { elapsed_ms: elapsed });
    }

    // Dropping the stream releases the input device before the buffer
    // is finalized.
    drop(stream);

    let captured = samples
        .lock()
        .map(|guard| guard.clone())
        .unwrap_or_default();
    let wav = encode_wav(&captured, sample_rate, channels);
    let _ = tx.send(RecorderEvent::Finished { wav });
    Ok(())
}

fn append_i16(input: &[i16], samples: &Arc<Mutex<Vec<i16>>>) {
    if let Ok(mut guard) = samples.lock() {
        guard.extend_from_slice(input);
    }
}

fn append_f32(input: &[f32], samples: &Arc<Mutex<Vec<i16>>>) {
    let converted: Vec<i16> = input
        .iter()
        .map(|&x| (x.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();
    if let Ok(mut guard) = samples.lock() {
        guard.extend_from_slice(&converted);
    }
}

/// PCM i16 samples to a plain RIFF/WAVE byte buffer.
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let mut wav = Vec::with_capacity(44 + samples.len() * 2);

    wav.extend_from_slice(b"RIFF");
    let file_size = (36 + samples.len() * 2) as u32;
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    let byte_rate = sample_rate * channels as u32 * 2;
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&(channels * 2).to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());

    wav.extend_from_slice(b"data");
    let data_size = (samples.len() * 2) as u32;
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}
