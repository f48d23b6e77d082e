use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use voice_pitch::capture::{RawSampleBuffer, ReplaySource};
use voice_pitch::detector::spectral::SpectralPeakDetector;
use voice_pitch::detector::PitchDetector;
use voice_pitch::float::Float;
use voice_pitch::normalizer::{encode_i16, normalize};
use voice_pitch::pipeline::{BatchPipeline, StreamingPipeline};
use voice_pitch::utils::buffer::new_real_buffer;
use voice_pitch::{analyze_buffer, analyze_wav, PipelineConfig};

// For writing `.wav` fixtures
use hound;

#[test]
fn spectral_sin_signal_f64() {
    pure_frequency::<f64>(String::from("sin"), 32);
}

#[test]
fn spectral_sin_signal_f32() {
    pure_frequency::<f32>(String::from("sin"), 32);
}

#[test]
fn spectral_square_signal() {
    // The fundamental of a square wave carries the most energy.
    pure_frequency::<f64>(String::from("square"), 16);
}

#[test]
fn spectral_triangle_signal() {
    pure_frequency::<f64>(String::from("triangle"), 16);
}

#[test]
fn spectral_silence() {
    let mut detector = SpectralPeakDetector::<f64>::new(1024, 80.0, 1000.0).unwrap();
    let signal = new_real_buffer::<f64>(1024);
    assert_eq!(detector.get_pitch(&signal, 44100).unwrap(), 0.0);
}

#[test]
fn batch_two_frames_of_220_hz() {
    const SAMPLE_RATE: usize = 44100;
    const FRAME_SIZE: usize = 1024;

    let config = PipelineConfig::default()
        .with_sample_rate(SAMPLE_RATE)
        .with_frame_size(FRAME_SIZE)
        .with_frequency_range(80.0, 1000.0);
    let buffer = pcm_buffer(&sin_wave::<f64>(220.0, 0.5, 2 * FRAME_SIZE, SAMPLE_RATE), SAMPLE_RATE);

    let estimates = analyze_buffer::<f64>(&buffer, config).unwrap();

    // 44100 / 1024 Hz per bin; 220 Hz is nearest to bin 5.
    let expected = 5.0 * (SAMPLE_RATE as f64 / FRAME_SIZE as f64);
    assert_eq!(estimates.len(), 2);
    for (i, estimate) in estimates.iter().enumerate() {
        println!("Frame {}: {} Hz", estimate.index, estimate.frequency);
        assert_eq!(estimate.index, i as u64);
        assert!((estimate.frequency - expected).abs() < 1e-9);
    }
    assert!((expected - 215.3).abs() < 0.1);
}

#[test]
fn batch_tracks_a_changing_pitch() {
    const SAMPLE_RATE: usize = 8000;
    const FRAME_SIZE: usize = 256;
    let step = SAMPLE_RATE as f64 / FRAME_SIZE as f64;

    let notes = [4.0 * step, 8.0 * step, 0.0, 12.0 * step];
    let mut signal = Vec::new();
    for freq in notes.iter() {
        match *freq {
            f if f > 0.0 => signal.extend(sin_wave::<f64>(f, 0.6, FRAME_SIZE, SAMPLE_RATE)),
            _ => signal.extend(new_real_buffer::<f64>(FRAME_SIZE)),
        }
    }
    // A tail shorter than a frame is dropped.
    signal.extend(sin_wave::<f64>(notes[0], 0.6, FRAME_SIZE / 2, SAMPLE_RATE));

    let config = PipelineConfig::default()
        .with_sample_rate(SAMPLE_RATE)
        .with_frame_size(FRAME_SIZE)
        .with_frequency_range(50.0, 1000.0);
    let mut pipeline = BatchPipeline::<f64>::new(config).unwrap();
    let estimates = pipeline.analyze(&pcm_buffer(&signal, SAMPLE_RATE)).unwrap();

    let frequencies: Vec<f64> = estimates.iter().map(|e| e.frequency).collect();
    assert_eq!(frequencies, notes.to_vec());
}

#[test]
fn batch_ignores_capacity() {
    let config = PipelineConfig::default().with_capacity(2);
    let buffer = RawSampleBuffer::new(vec![0u8; 10 * 1024 * 2], 44100, 2);
    let estimates = analyze_buffer::<f32>(&buffer, config).unwrap();
    assert_eq!(estimates.len(), 10);
}

#[test]
fn streaming_seven_ticks_capacity_five() {
    const SAMPLE_RATE: usize = 44100;
    const FRAME_SIZE: usize = 1024;

    let config = PipelineConfig::default()
        .with_sample_rate(SAMPLE_RATE)
        .with_frame_size(FRAME_SIZE)
        .with_capacity(5)
        .with_tick_interval(Duration::from_millis(10));
    let buffer = pcm_buffer(&sin_wave::<f64>(220.0, 0.5, 7 * FRAME_SIZE, SAMPLE_RATE), SAMPLE_RATE);
    let source = ReplaySource::new(buffer, FRAME_SIZE);
    let mut pipeline = StreamingPipeline::<f64, _>::new(config, source).unwrap();

    for _ in 0..7 {
        let estimate = pipeline.tick().unwrap().unwrap();
        assert!(estimate.is_pitched());
    }

    let snapshot = pipeline.snapshot();
    let indices: Vec<u64> = snapshot.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![2, 3, 4, 5, 6]);
}

#[test]
fn wav_file_round_trip() {
    const SAMPLE_RATE: usize = 16000;
    const FRAME_SIZE: usize = 512;
    let freq = 10.0 * SAMPLE_RATE as f64 / FRAME_SIZE as f64;

    let path = wav_fixture_path("tone.wav");
    write_wav(&path, &sin_wave::<f64>(freq, 0.5, 3 * FRAME_SIZE, SAMPLE_RATE), SAMPLE_RATE);

    let config = PipelineConfig::default()
        .with_sample_rate(SAMPLE_RATE)
        .with_frame_size(FRAME_SIZE);
    let estimates = analyze_wav::<f64, _>(&path, config).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(estimates.len(), 3);
    assert!(estimates.iter().all(|e| e.frequency == freq));
}

#[test]
fn wav_reader_matches_raw_bytes() {
    let samples: Vec<i16> = vec![0, 1, -1, i16::MAX, i16::MIN];
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for s in samples.iter() {
            writer.write_sample(*s).unwrap();
        }
        writer.finalize().unwrap();
    }

    let buffer = RawSampleBuffer::from_wav_reader(Cursor::new(cursor.into_inner())).unwrap();
    assert_eq!(buffer.bytes(), &encode_i16(&samples)[..]);

    let normalized: Vec<f64> = normalize(buffer.bytes(), buffer.bytes_per_sample()).unwrap();
    assert_eq!(normalized[3], 32767.0 / 32768.0);
    assert_eq!(normalized[4], -1.0);
}

/// Run the detector over bin-aligned tones across the 80-1000 Hz band and
/// check each lands within one bin of the input.
fn pure_frequency<T: Float>(wave_name: String, bin_stride: usize) {
    const SAMPLE_RATE: usize = 48000;
    const WINDOW: usize = 2048;
    let step = SAMPLE_RATE as f64 / WINDOW as f64;

    let mut detector = SpectralPeakDetector::<T>::new(WINDOW, 80.0, 1000.0).unwrap();

    let mut bin = 4;
    while bin as f64 * step <= 1000.0 {
        let freq_in = bin as f64 * step;
        let signal = signal_factory::<T>(wave_name.clone(), freq_in, WINDOW, SAMPLE_RATE);
        let frequency = detector.get_pitch(&signal, SAMPLE_RATE).unwrap().to_f64_lossy();
        println!("in: {} Hz; out: {} Hz; step: {} Hz", freq_in, frequency, step);
        assert!((frequency - freq_in).abs() <= step);
        bin += bin_stride;
    }
}

fn signal_factory<T: Float>(name: String, freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    match name.as_ref() {
        "sin" => sin_wave(freq, 1.0, size, sample_rate),
        "square" => square_wave(freq, size, sample_rate),
        "triangle" => triangle_wave(freq, size, sample_rate),
        _ => panic!("Unknown wave function {}", name),
    }
}

fn sin_wave<T: Float>(freq: f64, amplitude: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let two_pi = 2.0 * std::f64::consts::PI;
    let dx = two_pi * freq / sample_rate as f64;
    for i in 0..size {
        let x = i as f64 * dx;
        signal[i] = T::from_f64_lossy(amplitude * x.sin());
    }
    signal
}

fn square_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for i in 0..size {
        let x = i as f64 / period;
        let frac = x - x.floor();
        let y = match frac >= 0.5 {
            true => -1.0,
            false => 1.0,
        };
        signal[i] = T::from_f64_lossy(y);
    }
    signal
}

fn triangle_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for i in 0..size {
        let x = i as f64 / period;
        let frac = x - x.floor();
        let y = match frac {
            f if f >= 0. && f < 0.25 => 4. * f,
            f if f >= 0.25 && f < 0.75 => 1. - 4. * (f - 0.25),
            f if f >= 0.75 && f < 1. => -1. + 4. * (f - 0.75),
            _ => panic!("Should be between 0 and 1"),
        };
        signal[i] = T::from_f64_lossy(y);
    }
    signal
}

fn to_pcm(signal: &[f64]) -> Vec<i16> {
    signal
        .iter()
        .map(|s| (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect()
}

fn pcm_buffer(signal: &[f64], sample_rate: usize) -> RawSampleBuffer {
    RawSampleBuffer::new(encode_i16(&to_pcm(signal)), sample_rate, 2)
}

fn write_wav(path: &PathBuf, signal: &[f64], sample_rate: usize) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for s in to_pcm(signal) {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

/// A scratch path for a `wav` fixture, unique to this test process.
fn wav_fixture_path(file_name: &str) -> PathBuf {
    let mut d = std::env::temp_dir();
    d.push(format!("voice-pitch-{}-{}", std::process::id(), file_name));
    d
}
