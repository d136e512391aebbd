use super::*;
use std::time::Duration;

use rodio::Source;
use rodio::buffer::SamplesBuffer;

use crate::config::AudioSettings;
use crate::library::PlayableUrl;

fn close(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn curve_is_identity_below_the_knee() {
    let p = CompressorParams::LEVELING;
    assert_eq!(p.curve(-60.0), -60.0);
    // Knee starts at threshold - knee/2 = -39 dB.
    assert_eq!(p.curve(-39.5), -39.5);
}

#[test]
fn curve_follows_ratio_above_the_knee() {
    let p = CompressorParams::LEVELING;
    // 24 dB over threshold at 12:1 comes out 2 dB over.
    assert!(close(p.curve(0.0), -22.0, 1e-4));
}

#[test]
fn curve_is_continuous_at_knee_edges() {
    let p = CompressorParams::LEVELING;
    let upper = p.threshold_db + p.knee_db / 2.0;
    let lower = p.threshold_db - p.knee_db / 2.0;
    let hard_upper = p.threshold_db + (upper - p.threshold_db) / p.ratio;

    assert!(close(p.curve(upper - 1e-3), hard_upper, 1e-2));
    assert!(close(p.curve(lower + 1e-3), lower, 1e-2));
}

#[test]
fn silence_needs_no_gain_change() {
    let p = CompressorParams::LEVELING;
    assert_eq!(p.target_gain_db(0.0), 0.0);
    assert!(p.target_gain_db(1.0) < -20.0);
}

#[test]
fn quiet_material_passes_through_untouched() {
    let input = vec![0.001f32; 4410];
    let out: Vec<f32> =
        Compressor::new(SamplesBuffer::new(1, 44_100, input.clone()), CompressorParams::LEVELING)
            .collect();
    assert_eq!(out, input);
}

#[test]
fn loud_material_settles_on_the_static_curve() {
    let input = vec![1.0f32; 44_100];
    let out: Vec<f32> =
        Compressor::new(SamplesBuffer::new(1, 44_100, input), CompressorParams::LEVELING)
            .collect();

    assert_eq!(out.len(), 44_100);
    // 0 dBFS in, -22 dBFS out once the 3 ms attack has long settled.
    let expected = 10f32.powf(-22.0 / 20.0);
    assert!(close(*out.last().unwrap(), expected, 1e-3));
    // The very first frame is only slightly attenuated.
    assert!(out[0] > 0.9);
}

#[test]
fn channels_in_a_frame_share_one_gain() {
    let mut input = Vec::new();
    for _ in 0..22_050 {
        input.push(1.0f32);
        input.push(0.001f32);
    }
    let compressor = Compressor::new(
        SamplesBuffer::new(2, 44_100, input),
        CompressorParams::LEVELING,
    );
    assert_eq!(compressor.channels(), 2);
    assert_eq!(compressor.sample_rate(), 44_100);

    let out: Vec<f32> = compressor.collect();
    let (l, r) = (out[out.len() - 2], out[out.len() - 1]);
    assert!(close(l / r, 1000.0, 1.0));
}

#[test]
fn bypassed_chain_leaves_samples_alone() {
    let input = vec![1.0f32, -1.0, 0.5, -0.5];
    let out: Vec<f32> = EnhancementChain::new(false)
        .apply(SamplesBuffer::new(1, 44_100, input.clone()))
        .collect();
    assert_eq!(out, input);

    let squashed: Vec<f32> = EnhancementChain::new(true)
        .apply(SamplesBuffer::new(1, 44_100, vec![1.0f32; 4410]))
        .collect();
    assert!(squashed[4409] < 0.5);
}

#[test]
fn subscribers_receive_events_in_order_and_drop_dead_receivers() {
    let mut subs = Subscribers::default();
    let first = subs.subscribe();
    let second = subs.subscribe();

    subs.emit(SinkEvent::MetadataReady(Duration::from_secs(10)));
    drop(second);
    subs.emit(SinkEvent::Ended);

    assert_eq!(subs.len(), 1);
    assert_eq!(
        first.try_iter().collect::<Vec<_>>(),
        vec![SinkEvent::MetadataReady(Duration::from_secs(10)), SinkEvent::Ended]
    );
}

#[test]
fn rodio_sink_remembers_loads_before_initialization() {
    let mut sink = RodioSink::new(AudioSettings::default());
    let events = sink.subscribe();
    let url = PlayableUrl::from("file:///tmp/not-opened-yet.mp3".to_string());

    assert!(!sink.is_initialized());
    assert!(!sink.is_suspended());
    sink.load(&url).unwrap();
    assert_eq!(sink.loaded(), Some(&url));

    // Without an output nothing is decoded, so nothing plays or reports.
    sink.play();
    sink.set_position(Duration::from_secs(3));
    sink.set_volume(0.3);
    sink.set_muted(true);
    sink.tick();
    assert_eq!(sink.position(), Duration::ZERO);
    assert!(events.try_recv().is_err());
}
