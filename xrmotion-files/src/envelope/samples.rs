use log::warn;

use crate::Warning;
use crate::envelope::types::{Keyframe, ShapeKind};

/// Interpolation mode of a key as the authoring tool knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorInterpolation {
    Constant,
    Linear,
    Bezier,
    /// Anything we have no shape for, e.g. elastic or bounce easing.
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorKeyPoint {
    /// in frames
    pub time: f32,
    pub value: f32,
    pub interpolation: EditorInterpolation,
}

/// One keyframe per integer frame, starting at `start_frame`.
pub fn keyframes_from_samples(start_frame: i32, values: &[f32], shape: ShapeKind) -> Vec<Keyframe> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| Keyframe::new((start_frame + i as i32) as f32, value, shape))
        .collect()
}

/// Converts editor key points into keyframes.
///
/// An editor stores the interpolation that *leaves* a key, a [`ShapeKind`] describes the one *entering* it. Thus the
/// shape of key `i` comes from the interpolation of key `i - 1`, only the very first key uses its own.
pub fn keyframes_from_editor_points(points: &[EditorKeyPoint]) -> (Vec<Keyframe>, Vec<Warning>) {
    let mut warnings = Vec::new();
    let mut keyframes = Vec::with_capacity(points.len());

    for (index, point) in points.iter().enumerate() {
        let source = if index == 0 { point } else { &points[index - 1] };
        let shape = match &source.interpolation {
            EditorInterpolation::Constant => ShapeKind::Stepped,
            EditorInterpolation::Linear => ShapeKind::Linear,
            EditorInterpolation::Bezier => ShapeKind::TCB,
            EditorInterpolation::Other(mode) => {
                // the first point is the source of both key 0 and key 1, only report it once
                if index != 1 {
                    let warning = Warning::UnsupportedInterpolation {
                        index: index.saturating_sub(1),
                        mode: mode.clone(),
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                }
                ShapeKind::TCB
            }
        };

        keyframes.push(Keyframe::new(point.time, point.value, shape));
    }

    (keyframes, warnings)
}
