//! Benchmarks for request encoding
//!
//! This benchmark measures:
//! - FloatFrac number formatting
//! - Speech request JSON serialization with blend weights
//! - Transcription response decoding

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ai_audio_rust::audio::{AudioResponse, CreateSpeechRequest, FloatFrac};

const VERBOSE_RESPONSE: &str = r#"{
  "task": "transcribe",
  "language": "english",
  "duration": 8.47,
  "text": "The quick brown fox jumps over the lazy dog.",
  "segments": [
    {"id": 0, "seek": 0, "start": 0.0, "end": 4.2, "text": " The quick brown fox",
     "tokens": [50364, 440, 1702, 6292, 21283], "temperature": 0.0, "avg_logprob": -0.21,
     "compression_ratio": 0.91, "no_speech_prob": 0.02},
    {"id": 1, "seek": 0, "start": 4.2, "end": 8.47, "text": " jumps over the lazy dog.",
     "tokens": [50574, 16704, 670, 264, 14847, 3000, 13], "temperature": 0.0,
     "avg_logprob": -0.19, "compression_ratio": 0.91, "no_speech_prob": 0.02,
     "speaker": "spk_0", "sentiment": "neutral"}
  ],
  "words": [
    {"word": "The", "start": 0.0, "end": 0.3},
    {"word": "quick", "start": 0.3, "end": 0.7},
    {"word": "brown", "start": 0.7, "end": 1.1}
  ]
}"#;

fn bench_float_frac(c: &mut Criterion) {
    let mut group = c.benchmark_group("float_frac");
    for value in [1.0, 0.35, 123456.789, 1e-7] {
        group.bench_with_input(BenchmarkId::from_parameter(value), &value, |b, &v| {
            b.iter(|| FloatFrac(black_box(v)).to_json_text())
        });
    }
    group.finish();
}

fn bench_speech_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("speech_request");
    for voices in [0usize, 4, 32] {
        let mut request = CreateSpeechRequest::new("canary-tts", "Benchmark sentence.", "alloy")
            .with_speed(1.0)
            .with_reference_audio("/refs/base.wav");
        for i in 0..voices {
            request = request.add_blend_weight(format!("/refs/voice_{i}.wav"), 1.0 / (i + 1) as f64);
        }
        group.bench_with_input(BenchmarkId::new("to_vec", voices), &request, |b, req| {
            b.iter(|| serde_json::to_vec(black_box(req)))
        });
    }
    group.finish();
}

fn bench_response_decode(c: &mut Criterion) {
    c.bench_function("verbose_json_decode", |b| {
        b.iter(|| serde_json::from_str::<AudioResponse>(black_box(VERBOSE_RESPONSE)))
    });
}

criterion_group!(
    benches,
    bench_float_frac,
    bench_speech_request,
    bench_response_decode
);
criterion_main!(benches);
