//! Evaluation of envelopes at arbitrary times.
//!
//! The segment between two keys is shaped by the *second* key's [`ShapeKind`]. Tangents for the cubic shapes come
//! from the neighbouring keys: the outgoing tangent of the segment start is derived from its own shape and its
//! predecessor, the incoming tangent of the segment end from its own shape and its successor.

use crate::envelope::types::{Envelope, ExtrapolationKind, Keyframe, ShapeKind};

/// Below this, a Bezier2D time handle counts as zero length.
const BEZ2_MIN_HANDLE: f32 = 1e-5;
const BEZ2_TIME_TOLERANCE: f32 = 1e-4;
const BEZ2_MAX_ITERATIONS: usize = 64;

/// Cubic Hermite basis functions `(h1, h2, h3, h4)` for `p0, p1, m0, m1`.
fn hermite(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t * t2;
    let h2 = 3.0 * t2 - t3 - t3;
    let h1 = 1.0 - h2;
    let h4 = t3 - t2;
    let h3 = h4 - t2 + t;
    (h1, h2, h3, h4)
}

fn bezier(x0: f32, x1: f32, x2: f32, x3: f32, t: f32) -> f32 {
    let c = 3.0 * (x1 - x0);
    let b = 3.0 * (x2 - x1) - c;
    let a = x3 - x0 - c - b;
    ((a * t + b) * t + c) * t + x0
}

/// Finds the curve parameter at which the (monotonic) time polynomial reaches `time`, by bisection.
fn bezier_param_for_time(x0: f32, x1: f32, x2: f32, x3: f32, time: f32) -> f32 {
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    for _ in 0..BEZ2_MAX_ITERATIONS {
        let t = lo + (hi - lo) * 0.5;
        let v = bezier(x0, x1, x2, x3, t);
        if (time - v).abs() <= BEZ2_TIME_TOLERANCE {
            return t;
        }

        if v > time {
            hi = t;
        } else {
            lo = t;
        }
    }
    lo + (hi - lo) * 0.5
}

fn bezier_2d(key0: &Keyframe, key1: &Keyframe, time: f32) -> f32 {
    let (x, y) = if key0.shape == ShapeKind::Bezier2D {
        (key0.time + key0.params[2], key0.value + key0.params[3])
    } else {
        (
            key0.time + (key1.time - key0.time) / 3.0,
            key0.value + key0.params[1] / 3.0,
        )
    };

    let t = bezier_param_for_time(key0.time, x, key1.time + key1.params[0], key1.time, time);
    bezier(key0.value, y, key1.value + key1.params[1], key1.value, t)
}

fn scaled_bezier_2d_handle(dt: f32, handle_time: f32, handle_value: f32) -> f32 {
    let tangent = handle_value * dt;
    if handle_time.abs() > BEZ2_MIN_HANDLE {
        tangent / handle_time
    } else {
        tangent * 1e5
    }
}

/// Tangent leaving `key0` towards `key1`.
fn outgoing(prev: Option<&Keyframe>, key0: &Keyframe, key1: &Keyframe) -> f32 {
    let d = key1.value - key0.value;
    match key0.shape {
        ShapeKind::TCB => {
            let a = (1.0 - key0.tension) * (1.0 + key0.continuity) * (1.0 + key0.bias);
            let b = (1.0 - key0.tension) * (1.0 - key0.continuity) * (1.0 - key0.bias);
            match prev {
                Some(prev) => {
                    let t = (key1.time - key0.time) / (key1.time - prev.time);
                    t * (a * (key0.value - prev.value) + b * d)
                }
                None => b * d,
            }
        }
        ShapeKind::Linear => match prev {
            Some(prev) => {
                let t = (key1.time - key0.time) / (key1.time - prev.time);
                t * (key0.value - prev.value + d)
            }
            None => d,
        },
        ShapeKind::Bezier1D | ShapeKind::Hermite => match prev {
            Some(prev) => key0.params[1] * (key1.time - key0.time) / (key1.time - prev.time),
            None => key0.params[1],
        },
        ShapeKind::Bezier2D => scaled_bezier_2d_handle(key1.time - key0.time, key0.params[2], key0.params[3]),
        ShapeKind::Stepped => 0.0,
    }
}

/// Tangent arriving at `key1` from `key0`.
fn incoming(key0: &Keyframe, key1: &Keyframe, next: Option<&Keyframe>) -> f32 {
    let d = key1.value - key0.value;
    match key1.shape {
        ShapeKind::TCB => {
            let a = (1.0 - key1.tension) * (1.0 - key1.continuity) * (1.0 + key1.bias);
            let b = (1.0 - key1.tension) * (1.0 + key1.continuity) * (1.0 - key1.bias);
            match next {
                Some(next) => {
                    let t = (key1.time - key0.time) / (next.time - key0.time);
                    t * (b * (next.value - key1.value) + a * d)
                }
                None => a * d,
            }
        }
        ShapeKind::Linear => match next {
            Some(next) => {
                let t = (key1.time - key0.time) / (next.time - key0.time);
                t * (next.value - key1.value + d)
            }
            None => d,
        },
        ShapeKind::Bezier1D | ShapeKind::Hermite => match next {
            Some(next) => key1.params[0] * (key1.time - key0.time) / (next.time - key0.time),
            None => key1.params[0],
        },
        ShapeKind::Bezier2D => scaled_bezier_2d_handle(key1.time - key0.time, key1.params[0], key1.params[1]),
        ShapeKind::Stepped => 0.0,
    }
}

/// Evaluates the segment `keys[index - 1]..keys[index]` at `time`, which has to be strictly inside of it.
fn evaluate_segment(keys: &[Keyframe], index: usize, time: f32) -> f32 {
    let key0 = &keys[index - 1];
    let key1 = &keys[index];
    let t = (time - key0.time) / (key1.time - key0.time);

    match key1.shape {
        ShapeKind::Stepped => key0.value,
        ShapeKind::Linear => key0.value + t * (key1.value - key0.value),
        ShapeKind::Bezier2D => bezier_2d(key0, key1, time),
        ShapeKind::TCB | ShapeKind::Hermite | ShapeKind::Bezier1D => {
            let prev = index.checked_sub(2).map(|i| &keys[i]);
            let next = keys.get(index + 1);
            let out = outgoing(prev, key0, key1);
            let inc = incoming(key0, key1, next);
            let (h1, h2, h3, h4) = hermite(t);
            h1 * key0.value + h2 * key1.value + h3 * out + h4 * inc
        }
    }
}

impl Envelope {
    /// Value of the curve at `time` (in frames). An empty envelope evaluates to zero.
    pub fn evaluate(&self, time: f32) -> f32 {
        let keys = &self.keyframes;
        let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
            return 0.0;
        };

        if keys.len() == 1 {
            return first.value;
        }

        if !(time > first.time) {
            return self.extrapolate_before(time);
        }

        if time > last.time {
            return self.extrapolate_after(time);
        }

        // first key with a time after `time`, so keys[index - 1] is the latest key at or before `time`
        let index = keys.partition_point(|key| key.time <= time);
        let key0 = &keys[index - 1];
        if key0.time == time {
            return key0.value;
        }

        evaluate_segment(keys, index, time)
    }

    fn extrapolate_before(&self, time: f32) -> f32 {
        let keys = &self.keyframes;
        // several keys may share the first time stamp, the latest one wins
        let latest = keys.partition_point(|key| key.time <= keys[0].time) - 1;
        let key0 = &keys[latest];
        if time == key0.time || self.behavior == ExtrapolationKind::Constant {
            return key0.value;
        }

        let Some(key1) = keys.get(latest + 1) else {
            return key0.value;
        };
        let slope = outgoing(None, key0, key1) / (key1.time - key0.time);
        key0.value + slope * (time - key0.time)
    }

    fn extrapolate_after(&self, time: f32) -> f32 {
        let keys = &self.keyframes;
        let last = &keys[keys.len() - 1];
        if self.behavior == ExtrapolationKind::Constant {
            return last.value;
        }

        // the slope of the segment entering the last time stamp, continued from the latest key there
        let earliest = keys.partition_point(|key| key.time < last.time);
        let Some(before) = earliest.checked_sub(1).map(|index| &keys[index]) else {
            return last.value;
        };
        let slope = incoming(before, &keys[earliest], None) / (last.time - before.time);
        last.value + slope * (time - last.time)
    }

    /// Evaluates the curve at every integer frame in `start..=end`.
    pub fn sample(&self, start: i32, end: i32) -> Vec<f32> {
        (start..=end).map(|frame| self.evaluate(frame as f32)).collect()
    }
}
