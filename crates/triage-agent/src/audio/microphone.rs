use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    Device, FromSample, Sample, SampleFormat, SizedSample, Stream,
    StreamConfig,
};
use triage_model::CapturedAudio;

use super::{CaptureError, downmix};

/// Records from the default input device for `duration`.
///
/// This blocks the calling thread, run it with `spawn_blocking` from async
/// code. The device is released when this function returns, whether the
/// recording succeeded or not.
pub fn record(duration: Duration) -> Result<CapturedAudio, CaptureError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or_else(|| {
        CaptureError::Device("no input device available".to_owned())
    })?;
    let supported = device.default_input_config().map_err(device_error)?;
    let channels = supported.channels();
    let sample_rate = supported.sample_rate().0;
    let format = supported.sample_format();
    let config: StreamConfig = supported.into();
    debug!("recording {channels} channel(s) at {sample_rate} Hz ({format})");

    let buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
    let stream = match format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, &buffer)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, &buffer)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, &buffer)?,
        other => {
            return Err(CaptureError::Device(format!(
                "unsupported sample format {other}"
            )));
        }
    };
    stream.play().map_err(device_error)?;
    thread::sleep(duration);
    drop(stream);

    let samples = buffer
        .lock()
        .map_err(|_| CaptureError::Device("capture buffer poisoned".to_owned()))?;
    trace!("captured {} raw samples", samples.len());
    Ok(CapturedAudio::new(downmix(&samples, channels), sample_rate))
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    buffer: &Arc<Mutex<Vec<f32>>>,
) -> Result<Stream, CaptureError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let buffer = Arc::clone(buffer);
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buffer) = buffer.lock() {
                    buffer.extend(data.iter().map(|&s| s.to_sample::<f32>()));
                }
            },
            |err| warn!("input stream error: {err}"),
            None,
        )
        .map_err(device_error)
}

#[inline]
fn device_error(err: impl std::fmt::Display) -> CaptureError {
    CaptureError::Device(format!("{err}"))
}
