use crate::common::context::DecodeContext;
use crate::common::packed::{PackedReader, PackedWriter, Q16_MAX, Q16_MIN};
use crate::envelope::{
    EditorInterpolation, EditorKeyPoint, Envelope, ExtrapolationKind, Keyframe, ShapeKind, decode_envelope,
    encode_envelope, keyframes_from_editor_points, keyframes_from_samples, pad_to_clip_end, refine,
};
use crate::{ParserError, Warning};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const QUANT_STEP: f32 = (Q16_MAX - Q16_MIN) / 65535.0;

const ALL_SHAPES: [ShapeKind; 6] = [
    ShapeKind::TCB,
    ShapeKind::Hermite,
    ShapeKind::Bezier1D,
    ShapeKind::Linear,
    ShapeKind::Stepped,
    ShapeKind::Bezier2D,
];

fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} (+/- {}), got {}",
        expected,
        tolerance,
        actual
    );
}

fn encode(behavior: ExtrapolationKind, keys: &[Keyframe], version: u16) -> Result<Vec<u8>, ParserError> {
    let mut wtr = PackedWriter::new();
    encode_envelope(&mut wtr, behavior, keys, version)?;
    Ok(wtr.into_inner())
}

fn decode(data: &[u8], version: u16, ctx: &mut DecodeContext) -> Result<Envelope, ParserError> {
    let mut rdr = PackedReader::new(data);
    let envelope = decode_envelope(&mut rdr, version, ctx)?;
    assert!(rdr.is_empty(), "{} bytes left over", rdr.remaining());
    Ok(envelope)
}

fn linear_step_keys() -> Vec<Keyframe> {
    vec![
        Keyframe::new(0.0, 0.0, ShapeKind::Linear),
        Keyframe::new(10.0, 10.0, ShapeKind::Linear),
        Keyframe::new(20.0, 10.0, ShapeKind::Stepped),
    ]
}

#[test]
fn linear_then_stepped_through_the_compact_layout() -> Result<(), anyhow::Error> {
    let data = encode(ExtrapolationKind::Constant, &linear_step_keys(), 4)?;
    // 4 header bytes, 2 * (9 + 14) for the linear keys, 9 for the stepped key
    assert_eq!(data.len(), 59);

    let mut ctx = DecodeContext::new(true);
    let envelope = decode(&data, 4, &mut ctx)?;
    assert!(ctx.warnings().is_empty());
    assert_eq!(envelope.behavior, ExtrapolationKind::Constant);
    assert_eq!(envelope.keyframes.len(), 3);

    assert_close(envelope.evaluate(5.0), 5.0, 1e-5);
    assert_eq!(envelope.evaluate(15.0), 10.0);
    assert_eq!(envelope.evaluate(25.0), 10.0);
    assert_eq!(envelope.evaluate(-5.0), 0.0);
    Ok(())
}

#[test]
fn keys_are_hit_exactly_for_every_shape() {
    for shape in ALL_SHAPES {
        let envelope = Envelope::new(
            ExtrapolationKind::Linear,
            vec![
                Keyframe::new(0.0, 1.0, shape).with_tcb(0.5, -0.25, 0.75),
                Keyframe::new(10.0, 5.0, shape).with_params([1.0, 2.0, 3.0, 4.0]),
                Keyframe::new(20.0, -2.0, shape).with_params([-1.0, 0.5, 0.0, 0.0]),
            ],
        );

        assert_eq!(envelope.evaluate(0.0), 1.0, "{:?}", shape);
        assert_eq!(envelope.evaluate(10.0), 5.0, "{:?}", shape);
        assert_eq!(envelope.evaluate(20.0), -2.0, "{:?}", shape);
    }
}

#[test]
fn degenerate_envelopes() {
    assert_eq!(Envelope::default().evaluate(3.0), 0.0);

    let single = Envelope::new(
        ExtrapolationKind::Linear,
        vec![Keyframe::new(4.0, 7.5, ShapeKind::TCB)],
    );
    for time in [-100.0, 4.0, 100.0] {
        assert_eq!(single.evaluate(time), 7.5);
    }
}

#[test]
fn latest_key_wins_on_duplicate_times() {
    let envelope = Envelope::new(
        ExtrapolationKind::Constant,
        vec![
            Keyframe::new(0.0, 0.0, ShapeKind::Linear),
            Keyframe::new(10.0, 1.0, ShapeKind::Linear),
            Keyframe::new(10.0, 2.0, ShapeKind::Linear),
            Keyframe::new(20.0, 2.0, ShapeKind::Linear),
        ],
    );

    assert_eq!(envelope.evaluate(10.0), 2.0);
    assert_close(envelope.evaluate(5.0), 0.5, 1e-6);
    assert_close(envelope.evaluate(15.0), 2.0, 1e-6);
}

#[test]
fn stepped_holds_the_previous_value() {
    let envelope = Envelope::new(
        ExtrapolationKind::Constant,
        vec![
            Keyframe::new(0.0, 3.0, ShapeKind::TCB),
            Keyframe::new(10.0, 8.0, ShapeKind::Stepped),
        ],
    );
    assert_eq!(envelope.evaluate(0.5), 3.0);
    assert_eq!(envelope.evaluate(9.99), 3.0);
    assert_eq!(envelope.evaluate(10.0), 8.0);
}

#[test]
fn tcb_without_neighbours_is_a_straight_line() {
    let envelope = Envelope::new(
        ExtrapolationKind::Constant,
        vec![
            Keyframe::new(0.0, 0.0, ShapeKind::TCB),
            Keyframe::new(10.0, 10.0, ShapeKind::TCB),
        ],
    );
    assert_close(envelope.evaluate(2.5), 2.5, 1e-5);
    assert_close(envelope.evaluate(5.0), 5.0, 1e-5);
    assert_close(envelope.evaluate(7.5), 7.5, 1e-5);
}

#[test]
fn tcb_overshoots_between_a_peak() {
    let envelope = Envelope::new(
        ExtrapolationKind::Constant,
        vec![
            Keyframe::new(0.0, 0.0, ShapeKind::TCB),
            Keyframe::new(10.0, 10.0, ShapeKind::TCB),
            Keyframe::new(20.0, 0.0, ShapeKind::TCB),
        ],
    );
    // the middle key has a flat tangent, so the curve is above the straight line next to it
    assert!(envelope.evaluate(9.0) > 9.0);
    assert!(envelope.evaluate(11.0) > 9.0);
    assert_close(envelope.evaluate(5.0), envelope.evaluate(15.0), 1e-4);
}

#[test]
fn hermite_uses_explicit_tangents() {
    let flat = Envelope::new(
        ExtrapolationKind::Constant,
        vec![
            Keyframe::new(0.0, 0.0, ShapeKind::Hermite),
            Keyframe::new(10.0, 10.0, ShapeKind::Hermite),
        ],
    );
    // h2(0.25) * 10
    assert_close(flat.evaluate(2.5), 1.5625, 1e-5);

    let straight = Envelope::new(
        ExtrapolationKind::Constant,
        vec![
            Keyframe::new(0.0, 0.0, ShapeKind::Hermite).with_params([0.0, 10.0, 0.0, 0.0]),
            Keyframe::new(10.0, 10.0, ShapeKind::Hermite).with_params([10.0, 0.0, 0.0, 0.0]),
        ],
    );
    assert_close(straight.evaluate(2.5), 2.5, 1e-5);
}

#[test]
fn bezier_2d_with_handles_on_the_line() {
    let third = 10.0 / 3.0;
    let envelope = Envelope::new(
        ExtrapolationKind::Constant,
        vec![
            Keyframe::new(0.0, 0.0, ShapeKind::Bezier2D).with_params([0.0, 0.0, third, third]),
            Keyframe::new(10.0, 10.0, ShapeKind::Bezier2D).with_params([-third, -third, 0.0, 0.0]),
        ],
    );

    for time in [1.0, 4.0, 5.5, 9.0] {
        assert_close(envelope.evaluate(time), time, 1e-3);
    }
}

#[test]
fn extrapolation() {
    let keys = vec![
        Keyframe::new(0.0, 0.0, ShapeKind::Linear),
        Keyframe::new(10.0, 10.0, ShapeKind::Linear),
    ];

    let linear = Envelope::new(ExtrapolationKind::Linear, keys.clone());
    assert_close(linear.evaluate(-5.0), -5.0, 1e-5);
    assert_close(linear.evaluate(15.0), 15.0, 1e-5);

    let constant = Envelope::new(ExtrapolationKind::Constant, keys);
    assert_eq!(constant.evaluate(-5.0), 0.0);
    assert_eq!(constant.evaluate(15.0), 10.0);
}

#[test]
fn linear_extrapolation_continues_from_duplicate_end_keys() {
    let envelope = Envelope::new(
        ExtrapolationKind::Linear,
        vec![
            Keyframe::new(0.0, 1.0, ShapeKind::Linear),
            Keyframe::new(0.0, 2.0, ShapeKind::Linear),
            Keyframe::new(10.0, 12.0, ShapeKind::Linear),
            Keyframe::new(20.0, 22.0, ShapeKind::Linear),
            Keyframe::new(20.0, 30.0, ShapeKind::Linear),
        ],
    );

    assert_eq!(envelope.evaluate(0.0), 2.0);
    assert_close(envelope.evaluate(-0.001), 1.999, 1e-4);
    assert_close(envelope.evaluate(-1.0), 1.0, 1e-5);

    assert_eq!(envelope.evaluate(20.0), 30.0);
    assert_close(envelope.evaluate(21.0), 31.0, 1e-5);

    let stacked = Envelope::new(
        ExtrapolationKind::Linear,
        vec![Keyframe::new(5.0, 1.0, ShapeKind::Linear), Keyframe::new(5.0, 2.0, ShapeKind::Linear)],
    );
    for time in [0.0, 5.0, 10.0] {
        assert_eq!(stacked.evaluate(time), 2.0);
    }
}

#[test]
fn sampling_covers_both_ends() {
    let envelope = Envelope::new(ExtrapolationKind::Constant, linear_step_keys());
    let samples = envelope.sample(-1, 21);
    assert_eq!(samples.len(), 23);
    assert_eq!(samples[0], 0.0);
    assert_close(samples[6], 5.0, 1e-5);
    assert_eq!(samples[16], 10.0);
    assert_eq!(samples[22], 10.0);
}

#[test]
fn legacy_layout_is_lossless() -> Result<(), anyhow::Error> {
    let keys = vec![
        Keyframe::new(0.0, 1.25, ShapeKind::TCB).with_tcb(0.3, -0.7, 0.1),
        Keyframe::new(0.5, -3.0, ShapeKind::Bezier2D).with_params([1.5, -2.25, 0.125, 40.0]),
        Keyframe::new(1.0, 2.0, ShapeKind::Stepped).with_tcb(1.0, 1.0, 1.0),
    ];
    let data = encode(ExtrapolationKind::Linear, &keys, 3)?;
    assert_eq!(data.len(), 12 + 3 * 40);

    let mut ctx = DecodeContext::new(true);
    let envelope = decode(&data, 3, &mut ctx)?;
    assert_eq!(envelope, Envelope::new(ExtrapolationKind::Linear, keys));
    Ok(())
}

#[test]
fn compact_layout_quantizes_parameters() -> Result<(), anyhow::Error> {
    let keys = vec![
        Keyframe::new(0.0, 1.25, ShapeKind::TCB).with_tcb(0.3, -0.7, 0.1),
        Keyframe::new(0.5, -3.0, ShapeKind::Bezier2D).with_params([1.5, -2.25, 0.125, 31.0]),
        Keyframe::new(1.0, 2.0, ShapeKind::Stepped).with_tcb(1.0, 1.0, 1.0),
    ];
    let data = encode(ExtrapolationKind::Linear, &keys, 4)?;
    assert_eq!(data.len(), 4 + 2 * 23 + 9);

    let mut ctx = DecodeContext::new(true);
    let envelope = decode(&data, 4, &mut ctx)?;
    assert_eq!(envelope.behavior, ExtrapolationKind::Linear);

    for (decoded, original) in envelope.keyframes.iter().zip(&keys) {
        assert_eq!(decoded.time, original.time);
        assert_eq!(decoded.value, original.value);
        assert_eq!(decoded.shape, original.shape);
        if original.shape == ShapeKind::Stepped {
            continue;
        }

        assert_close(decoded.tension, original.tension, QUANT_STEP);
        assert_close(decoded.continuity, original.continuity, QUANT_STEP);
        assert_close(decoded.bias, original.bias, QUANT_STEP);
        for (decoded, original) in decoded.params.iter().zip(original.params) {
            assert_close(*decoded, original, QUANT_STEP);
        }
    }

    // stepped keys don't carry their parameters
    let stepped = &envelope.keyframes[2];
    assert_eq!((stepped.tension, stepped.continuity, stepped.bias), (0.0, 0.0, 0.0));

    // once quantized, re-encoding is stable
    assert_eq!(encode(envelope.behavior, &envelope.keyframes, 4)?, data);
    Ok(())
}

#[test]
fn compact_layout_clamps_out_of_range_parameters() -> Result<(), anyhow::Error> {
    let keys = vec![Keyframe::new(0.0, 0.0, ShapeKind::Hermite).with_params([100.0, -100.0, 0.0, 0.0])];
    let data = encode(ExtrapolationKind::Constant, &keys, 5)?;

    let envelope = decode(&data, 5, &mut DecodeContext::new(true))?;
    assert_eq!(envelope.keyframes[0].params[0], Q16_MAX);
    assert_eq!(envelope.keyframes[0].params[1], Q16_MIN);
    Ok(())
}

#[test]
fn compact_layout_key_count_overflows() {
    let keys = vec![Keyframe::new(0.0, 0.0, ShapeKind::Stepped); 65536];
    let mut wtr = PackedWriter::new();
    assert!(matches!(
        encode_envelope(&mut wtr, ExtrapolationKind::Constant, &keys, 4),
        Err(ParserError::Overflow { value: 65536, .. })
    ));

    // the legacy layout has room for that many
    assert!(encode_envelope(&mut wtr, ExtrapolationKind::Constant, &keys, 3).is_ok());
}

#[test]
fn unknown_shape_is_recoverable() -> Result<(), anyhow::Error> {
    let keys = vec![Keyframe::new(0.0, 4.0, ShapeKind::Linear)];
    let mut data = encode(ExtrapolationKind::Constant, &keys, 4)?;
    // header (4) + value (4) + time (4)
    data[12] = 9;

    let mut ctx = DecodeContext::new(false);
    let envelope = decode(&data, 4, &mut ctx)?;
    assert_eq!(envelope.keyframes[0].shape, ShapeKind::TCB);
    assert_eq!(envelope.keyframes[0].value, 4.0);
    assert_eq!(ctx.warnings().len(), 1);
    assert!(matches!(
        ctx.warnings()[0],
        Warning::Recovered {
            error: ParserError::BadShape { value: 9, offset: 12 },
            ..
        }
    ));

    let mut strict = DecodeContext::new(true);
    assert!(matches!(
        decode(&data, 4, &mut strict),
        Err(ParserError::BadShape { value: 9, offset: 12 })
    ));
    Ok(())
}

#[test]
fn unknown_behavior_is_recoverable() -> Result<(), anyhow::Error> {
    let mut data = Vec::new();
    data.extend_from_slice(&7u32.to_le_bytes());
    data.extend_from_slice(&7u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    let mut ctx = DecodeContext::new(false);
    let envelope = decode(&data, 2, &mut ctx)?;
    assert_eq!(envelope.behavior, ExtrapolationKind::Constant);
    assert!(envelope.is_empty());
    assert!(matches!(
        ctx.warnings()[0],
        Warning::Recovered {
            error: ParserError::BadBehavior { value: 7, .. },
            ..
        }
    ));

    assert!(decode(&data, 2, &mut DecodeContext::new(true)).is_err());
    Ok(())
}

#[test]
fn differing_behaviors_use_the_start_one() -> Result<(), anyhow::Error> {
    let data = [5u8, 1, 0, 0];
    let mut ctx = DecodeContext::new(true);
    let envelope = decode(&data, 4, &mut ctx)?;
    assert_eq!(envelope.behavior, ExtrapolationKind::Linear);
    assert!(matches!(
        ctx.warnings(),
        [Warning::BehaviorMismatch { start: 5, end: 1, .. }]
    ));
    Ok(())
}

#[test]
fn truncated_envelope() -> Result<(), anyhow::Error> {
    let data = encode(ExtrapolationKind::Constant, &linear_step_keys(), 4)?;
    let mut rdr = PackedReader::new(&data[..data.len() - 3]);
    assert!(matches!(
        decode_envelope(&mut rdr, 4, &mut DecodeContext::new(false)),
        Err(ParserError::UnexpectedEof { .. })
    ));
    Ok(())
}

#[test]
fn padding_to_the_clip_end() {
    let mut keys = linear_step_keys();
    assert!(!pad_to_clip_end(&mut keys, 21.0));
    assert_eq!(keys.len(), 3);

    assert!(pad_to_clip_end(&mut keys, 30.0));
    assert_eq!(keys.len(), 4);
    assert_eq!(keys[3], Keyframe::new(30.0, 10.0, ShapeKind::Stepped));

    let mut empty = Vec::new();
    assert!(!pad_to_clip_end(&mut empty, 30.0));
}

#[test]
fn refine_flat_line_to_a_single_key() {
    let keys = keyframes_from_samples(0, &[3.0; 21], ShapeKind::Linear);
    let refined = refine(&keys, 0.01);
    assert_eq!(refined, vec![keys[0]]);

    // flat curves collapse whatever their shape
    let keys = keyframes_from_samples(0, &[3.0; 21], ShapeKind::TCB);
    assert_eq!(refine(&keys, 0.01).len(), 1);
}

#[test]
fn refine_ramp_to_its_end_points() {
    let values: Vec<f32> = (0..=20).map(|i| i as f32).collect();
    let keys = keyframes_from_samples(0, &values, ShapeKind::Linear);
    let refined = refine(&keys, 0.001);
    assert_eq!(refined, vec![keys[0], keys[20]]);
}

#[test]
fn refine_keeps_the_edges_of_a_step() {
    let values = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0];
    let keys = keyframes_from_samples(0, &values, ShapeKind::Stepped);
    let refined = refine(&keys, 0.001);

    let times: Vec<f32> = refined.iter().map(|key| key.time).collect();
    assert_eq!(times, vec![0.0, 5.0, 9.0]);

    let original = Envelope::new(ExtrapolationKind::Constant, keys);
    let reduced = Envelope::new(ExtrapolationKind::Constant, refined);
    assert_eq!(reduced.sample(0, 9), original.sample(0, 9));
}

#[test]
fn refine_keeps_keys_entering_curves() {
    let values = [0.0, 1.0, 2.0, 2.0, 2.0, 2.0, 1.0];
    let keys = keyframes_from_samples(0, &values, ShapeKind::TCB);
    assert_eq!(refine(&keys, 0.1), keys);

    // the hold still ends in a curve at frame 5
    let mut keys = keys;
    keys[6].shape = ShapeKind::Linear;
    let times: Vec<f32> = refine(&keys, 0.1).iter().map(|key| key.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    // a linear end point lets the keys before it go, whatever their own shape
    keys[5].shape = ShapeKind::Linear;
    let times: Vec<f32> = refine(&keys, 0.1).iter().map(|key| key.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0, 5.0, 6.0]);
}

/// Baked curves with holds, ramps, jumps and a little noise.
fn random_series(rng: &mut StdRng) -> Vec<f32> {
    let len = rng.random_range(2..40);
    let mut value = 0.0f32;
    let mut slope = 0.0f32;
    (0..len)
        .map(|_| {
            match rng.random_range(0..5) {
                0 => slope = rng.random_range(-0.2..0.2),
                1 => value += rng.random_range(-1.0..1.0),
                2 => slope = 0.0,
                _ => {}
            }
            value += slope;
            if rng.random_bool(0.3) {
                value += rng.random_range(-0.04..0.04);
            }
            value
        })
        .collect()
}

/// Random channels of linear, curved and stepped keys, and some mixing all shapes.
fn random_channels(seed: u64, count: usize) -> Vec<Vec<Keyframe>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|index| {
            let values = random_series(&mut rng);
            match index % 4 {
                0 => keyframes_from_samples(0, &values, ShapeKind::Linear),
                1 => keyframes_from_samples(0, &values, ShapeKind::TCB),
                2 => keyframes_from_samples(0, &values, ShapeKind::Stepped),
                _ => {
                    let mut keys = keyframes_from_samples(0, &values, ShapeKind::Linear);
                    for key in &mut keys {
                        key.shape = ALL_SHAPES[rng.random_range(0..ALL_SHAPES.len())];
                    }
                    keys
                }
            }
        })
        .collect()
}

#[test]
fn refine_is_idempotent() {
    let epsilon = 0.05;
    for keys in random_channels(0x5eed, 2000) {
        let once = refine(&keys, epsilon);
        assert_eq!(refine(&once, epsilon), once, "refining {:?} twice", keys);
    }

    let plateau = keyframes_from_samples(0, &[0.0, 0.09, 0.09, 0.09, 0.14], ShapeKind::Linear);
    let once = refine(&plateau, epsilon);
    assert_eq!(refine(&once, epsilon), once);
}

#[test]
fn refine_bounds_the_error_for_every_shape() {
    let epsilon = 0.05;
    for keys in random_channels(42, 2000) {
        let refined = refine(&keys, epsilon);
        assert!(refined.iter().all(|key| keys.contains(key)));
        assert_eq!(refined[0], keys[0]);

        let reduced = Envelope::new(ExtrapolationKind::Constant, refined);
        for key in &keys {
            let error = (reduced.evaluate(key.time) - key.value).abs();
            assert!(error < 2.0 * epsilon, "{:?} off by {} at {}", keys, error, key.time);
        }
    }
}

#[test]
fn refine_stays_within_twice_epsilon() {
    let epsilon = 0.05;
    let values: Vec<f32> = (0..=40).map(|i| (i as f32 * 0.3).sin()).collect();
    let keys = keyframes_from_samples(0, &values, ShapeKind::Linear);
    let refined = refine(&keys, epsilon);

    assert!(refined.len() < keys.len());
    assert!(refined.iter().all(|key| keys.contains(key)));
    assert!(refined.windows(2).all(|pair| pair[0].time < pair[1].time));
    assert_eq!(refined[0], keys[0]);
    assert_eq!(refined[refined.len() - 1], keys[40]);

    let reduced = Envelope::new(ExtrapolationKind::Constant, refined);
    for key in &keys {
        assert_close(reduced.evaluate(key.time), key.value, 2.0 * epsilon);
    }
}

#[test]
fn refine_without_epsilon_keeps_everything() {
    let values: Vec<f32> = (0..10).map(|i| (i / 3) as f32).collect();
    let keys = keyframes_from_samples(0, &values, ShapeKind::Linear);
    assert_eq!(refine(&keys, 0.0), keys);
}

#[test]
fn refine_short_inputs() {
    assert!(refine(&[], 0.1).is_empty());

    let single = [Keyframe::new(3.0, 1.0, ShapeKind::TCB)];
    assert_eq!(refine(&single, 0.1), single.to_vec());
}

#[test]
fn samples_become_integer_frames() {
    let keys = keyframes_from_samples(5, &[1.0, 2.0, 3.0], ShapeKind::Linear);
    let times: Vec<f32> = keys.iter().map(|key| key.time).collect();
    assert_eq!(times, vec![5.0, 6.0, 7.0]);
    assert!(keys.iter().all(|key| key.shape == ShapeKind::Linear));
}

fn point(time: f32, interpolation: EditorInterpolation) -> EditorKeyPoint {
    EditorKeyPoint {
        time,
        value: time * 2.0,
        interpolation,
    }
}

#[test]
fn editor_interpolation_applies_to_the_following_key() {
    let points = vec![
        point(0.0, EditorInterpolation::Linear),
        point(1.0, EditorInterpolation::Constant),
        point(2.0, EditorInterpolation::Other("elastic".to_string())),
        point(3.0, EditorInterpolation::Bezier),
    ];

    let (keys, warnings) = keyframes_from_editor_points(&points);
    let shapes: Vec<ShapeKind> = keys.iter().map(|key| key.shape).collect();
    assert_eq!(
        shapes,
        vec![ShapeKind::Linear, ShapeKind::Linear, ShapeKind::Stepped, ShapeKind::TCB]
    );
    assert_eq!(keys[3].value, 6.0);

    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        Warning::UnsupportedInterpolation { index: 2, mode } if mode == "elastic"
    ));
}

#[test]
fn unsupported_first_interpolation_is_reported_once() {
    let points = vec![
        point(0.0, EditorInterpolation::Other("bounce".to_string())),
        point(1.0, EditorInterpolation::Linear),
    ];

    let (keys, warnings) = keyframes_from_editor_points(&points);
    assert_eq!(keys[0].shape, ShapeKind::TCB);
    assert_eq!(keys[1].shape, ShapeKind::TCB);
    assert_eq!(warnings.len(), 1);
}
