//! Lossy keyframe reduction.
//!
//! Segments between two kept keys are split at their worst reconstructed key until every dropped key lies within
//! `epsilon` of the segment it falls into. The error of a dropped key only depends on the two keys bounding its
//! segment, so refining a refined sequence again finds the same splits.

use log::debug;

use crate::envelope::types::{Keyframe, ShapeKind};

/// Tolerance used by the exporters when nothing else is configured.
pub const DEFAULT_EPSILON: f32 = 0.00001;

fn line_at(start: &Keyframe, end: &Keyframe, time: f32) -> f32 {
    let dt = end.time - start.time;
    if dt <= 0.0 {
        return start.value;
    }
    start.value + (end.value - start.value) * (time - start.time) / dt
}

/// How far `key` is from the curve through `start` and `end` alone, or `None` when that curve also depends on the
/// keys around the segment.
fn deviation(start: &Keyframe, end: &Keyframe, key: &Keyframe) -> Option<f32> {
    match end.shape {
        ShapeKind::Linear => Some((key.value - line_at(start, end, key.time)).abs()),
        ShapeKind::Stepped => Some((key.value - start.value).abs()),
        _ => None,
    }
}

/// The first key with the largest deviation in `start..end`, or `None` when all of them have to stay.
fn worst_key(keys: &[Keyframe], start: usize, end: usize) -> Option<(usize, f32)> {
    let mut worst: Option<(usize, f32)> = None;
    for index in start + 1..end {
        let error = deviation(&keys[start], &keys[end], &keys[index])?;
        if worst.is_none_or(|(_, max)| error > max) {
            worst = Some((index, error));
        }
    }
    worst
}

/// Drops every key that can be reconstructed within `epsilon` from the remaining ones.
///
/// The result is a subsequence of `keys` that starts with the first key. Keys entering a curved segment are never
/// dropped, a channel whose remaining keys all lie within `epsilon` of the first one collapses to that key. Refining
/// the result again returns it unchanged.
pub fn refine(keys: &[Keyframe], epsilon: f32) -> Vec<Keyframe> {
    if keys.len() <= 1 {
        return keys.to_vec();
    }

    let mut keep = vec![false; keys.len()];
    keep[0] = true;
    keep[keys.len() - 1] = true;

    let mut segments = vec![(0, keys.len() - 1)];
    while let Some((start, end)) = segments.pop() {
        if end - start < 2 {
            continue;
        }

        match worst_key(keys, start, end) {
            Some((_, error)) if error < epsilon => {}
            Some((index, _)) => {
                keep[index] = true;
                segments.push((index, end));
                segments.push((start, index));
            }
            None => keep[start + 1..end].fill(true),
        }
    }

    let mut refined: Vec<Keyframe> = keys.iter().zip(&keep).filter(|(_, keep)| **keep).map(|(key, _)| *key).collect();

    let first = refined[0].value;
    if refined.iter().all(|key| (key.value - first).abs() < epsilon) {
        refined.truncate(1);
    }

    debug!("refined {} keys down to {}", keys.len(), refined.len());
    refined
}
