//! Animated scalar channels: data model, spline evaluation, the binary codec and keyframe refinement.
//!
//! # Layout
//! ```text
//! format version >= 4:
//!   behavior_start u8, behavior_end u8, keyframe_count u16
//!   per keyframe: value f32, time f32, shape u8,
//!                 unless shape == Stepped: tension, continuity, bias, params[4] as i16 quantized to [-32, 32]
//!
//! format version <= 3:
//!   behavior_start u32, behavior_end u32, keyframe_count u32
//!   per keyframe: value f32, time f32, shape u32, tension, continuity, bias, params[4] as f32 (always present)
//! ```

mod codec;
mod eval;
mod refine;
mod samples;
mod types;

#[cfg(test)]
mod tests;

pub use codec::{COMPACT_ENVELOPE_VERSION, FALLBACK_SHAPE, decode_envelope, encode_envelope, pad_to_clip_end};
pub use refine::{DEFAULT_EPSILON, refine};
pub use samples::{EditorInterpolation, EditorKeyPoint, keyframes_from_editor_points, keyframes_from_samples};
pub use types::{Envelope, ExtrapolationKind, Keyframe, ShapeKind};
