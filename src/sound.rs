use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

use crate::error::{Error, Result};
use crate::memory::AUDIO_BUFFER_LEN;

pub const SAMPLE_RATE: u32 = 15360;

// a few frames of slack before old samples get dropped
const MAX_QUEUED: usize = AUDIO_BUFFER_LEN * 4;

#[derive(Debug, Default)]
pub struct SampleQueue {
    samples: VecDeque<f32>,
}

impl SampleQueue {
    /// Appends signed 8-bit PCM. Returns how many old samples were dropped.
    pub fn push_i8(&mut self, pcm: &[u8]) -> usize {
        self.samples
            .extend(pcm.iter().map(|&s| (s as i8) as f32 / 128.0));
        let excess = self.samples.len().saturating_sub(MAX_QUEUED);
        self.samples.drain(..excess);
        excess
    }

    pub fn pop(&mut self) -> Option<f32> {
        self.samples.pop_front()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Sample-and-hold conversion from `SAMPLE_RATE` to the device rate.
#[derive(Debug)]
pub struct Resampler {
    step: f32,
    phase: f32,
    current: f32,
}

impl Resampler {
    pub fn new(device_rate: u32) -> Self {
        Self {
            step: SAMPLE_RATE as f32 / device_rate as f32,
            // pull the first source sample on the first output sample
            phase: 1.0,
            current: 0.0,
        }
    }

    pub fn next_sample(&mut self, queue: &mut SampleQueue) -> f32 {
        while self.phase >= 1.0 {
            self.phase -= 1.0;
            // silence on underrun
            self.current = queue.pop().unwrap_or(0.0);
        }
        self.phase += self.step;
        self.current
    }

    /// Fills interleaved device frames, the same value on every channel.
    pub fn fill<T>(&mut self, output: &mut [T], channels: usize, queue: &mut SampleQueue)
    where
        T: Copy + FromSample<f32> + Sample,
    {
        for frame in output.chunks_mut(channels) {
            frame.fill(T::from_sample(self.next_sample(queue)));
        }
    }
}

pub struct Sound {
    queue: Arc<Mutex<SampleQueue>>,
    // dropping the stream stops playback
    _stream: cpal::Stream,
}

impl Sound {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".into()))?;
        let supported_config = device
            .default_output_config()
            .map_err(|e| Error::Audio(e.to_string()))?;
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        log::info!(
            "audio device {:?}: {} Hz, {} channel(s), {sample_format}",
            device.name().unwrap_or_default(),
            config.sample_rate.0,
            config.channels
        );

        let queue = Arc::new(Mutex::new(SampleQueue::default()));
        let stream = match sample_format {
            cpal::SampleFormat::I16 => Self::run::<i16>(&device, &config, queue.clone()),
            cpal::SampleFormat::I32 => Self::run::<i32>(&device, &config, queue.clone()),
            cpal::SampleFormat::U16 => Self::run::<u16>(&device, &config, queue.clone()),
            cpal::SampleFormat::F32 => Self::run::<f32>(&device, &config, queue.clone()),
            other => Err(Error::Audio(format!("no support for {other} output"))),
        }?;
        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        Ok(Self {
            queue,
            _stream: stream,
        })
    }

    pub fn queue(&self, pcm: &[u8]) {
        // a poisoned lock only means the callback panicked; keep feeding it
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        let dropped = queue.push_i8(pcm);
        if dropped > 0 {
            log::debug!("audio queue full, dropped {dropped} samples");
        }
    }

    fn run<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        queue: Arc<Mutex<SampleQueue>>,
    ) -> Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let channels = config.channels as usize;
        let mut resampler = Resampler::new(config.sample_rate.0);

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let mut queue = queue.lock().unwrap_or_else(|e| e.into_inner());
                    resampler.fill(data, channels, &mut queue);
                },
                |err| log::error!("audio stream: {err}"),
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))
    }
}
