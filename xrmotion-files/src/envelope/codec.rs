use log::trace;

use crate::common::context::DecodeContext;
use crate::common::packed::{PackedReader, PackedWriter, Q16_MAX, Q16_MIN};
use crate::envelope::types::{Envelope, ExtrapolationKind, Keyframe, ShapeKind};
use crate::{ParserError, Warning};

/// First format version using 8 bit enums, a 16 bit key count and quantized parameters.
pub const COMPACT_ENVELOPE_VERSION: u16 = 4;

/// Shape used when a file contains a shape value we don't know.
pub const FALLBACK_SHAPE: ShapeKind = ShapeKind::TCB;

fn is_compact(format_version: u16) -> bool {
    format_version >= COMPACT_ENVELOPE_VERSION
}

/// Writes one channel. The behavior is written twice (start and end), readers only use the first one.
pub fn encode_envelope(
    wtr: &mut PackedWriter,
    behavior: ExtrapolationKind,
    keyframes: &[Keyframe],
    format_version: u16,
) -> Result<(), ParserError> {
    let behavior: u8 = behavior.into();

    if is_compact(format_version) {
        let count = u16::try_from(keyframes.len()).map_err(|_| ParserError::Overflow {
            what: "keyframe count",
            value: keyframes.len(),
        })?;
        wtr.write_u8(behavior).write_u8(behavior).write_u16(count);

        for key in keyframes {
            wtr.write_f32(key.value).write_f32(key.time).write_u8(key.shape.into());
            // stepped keys never look at their parameters, so they don't get stored
            if key.shape != ShapeKind::Stepped {
                wtr.write_quant16(key.tension, Q16_MIN, Q16_MAX)
                    .write_quant16(key.continuity, Q16_MIN, Q16_MAX)
                    .write_quant16(key.bias, Q16_MIN, Q16_MAX);
                for param in key.params {
                    wtr.write_quant16(param, Q16_MIN, Q16_MAX);
                }
            }
        }
    } else {
        let count = u32::try_from(keyframes.len()).map_err(|_| ParserError::Overflow {
            what: "keyframe count",
            value: keyframes.len(),
        })?;
        wtr.write_u32(behavior as u32).write_u32(behavior as u32).write_u32(count);

        for key in keyframes {
            let shape: u8 = key.shape.into();
            wtr.write_f32(key.value)
                .write_f32(key.time)
                .write_u32(shape as u32)
                .write_f32(key.tension)
                .write_f32(key.continuity)
                .write_f32(key.bias);
            for param in key.params {
                wtr.write_f32(param);
            }
        }
    }

    Ok(())
}

fn decode_behavior(raw: u32, offset: usize, ctx: &mut DecodeContext) -> Result<ExtrapolationKind, ParserError> {
    match u8::try_from(raw).ok().and_then(|raw| ExtrapolationKind::try_from(raw).ok()) {
        Some(behavior) => Ok(behavior),
        None => ctx.recover(
            ParserError::BadBehavior { value: raw, offset },
            ExtrapolationKind::default(),
        ),
    }
}

fn decode_shape(raw: u32, offset: usize, ctx: &mut DecodeContext) -> Result<ShapeKind, ParserError> {
    match u8::try_from(raw).ok().and_then(|raw| ShapeKind::try_from(raw).ok()) {
        Some(shape) => Ok(shape),
        None => ctx.recover(ParserError::BadShape { value: raw, offset }, FALLBACK_SHAPE),
    }
}

/// Reads one channel, the exact inverse of [`encode_envelope`].
///
/// Unknown shape and behavior values as well as differing start/end behaviors are recoverable: unless `ctx` is
/// strict they become warnings and decoding continues with [`FALLBACK_SHAPE`] or the default behavior.
pub fn decode_envelope(
    rdr: &mut PackedReader<'_>,
    format_version: u16,
    ctx: &mut DecodeContext,
) -> Result<Envelope, ParserError> {
    let compact = is_compact(format_version);

    let behavior_offset = rdr.offset();
    let (start, end) = if compact {
        (rdr.read_u8()? as u32, rdr.read_u8()? as u32)
    } else {
        (rdr.read_u32()?, rdr.read_u32()?)
    };

    if start != end {
        let context = ctx.location();
        ctx.warn(Warning::BehaviorMismatch { context, start, end });
    }
    let behavior = decode_behavior(start, behavior_offset, ctx)?;

    let count = if compact {
        rdr.read_u16()? as usize
    } else {
        rdr.read_u32()? as usize
    };

    let mut keyframes = Vec::with_capacity(count.min(rdr.remaining()));
    for _ in 0..count {
        let value = rdr.read_f32()?;
        let time = rdr.read_f32()?;
        let shape_offset = rdr.offset();
        let raw_shape = if compact {
            rdr.read_u8()? as u32
        } else {
            rdr.read_u32()?
        };
        let shape = decode_shape(raw_shape, shape_offset, ctx)?;

        let mut key = Keyframe::new(time, value, shape);
        if !compact {
            key.tension = rdr.read_f32()?;
            key.continuity = rdr.read_f32()?;
            key.bias = rdr.read_f32()?;
            for param in key.params.iter_mut() {
                *param = rdr.read_f32()?;
            }
        } else if shape != ShapeKind::Stepped {
            key.tension = rdr.read_quant16(Q16_MIN, Q16_MAX)?;
            key.continuity = rdr.read_quant16(Q16_MIN, Q16_MAX)?;
            key.bias = rdr.read_quant16(Q16_MIN, Q16_MAX)?;
            for param in key.params.iter_mut() {
                *param = rdr.read_quant16(Q16_MIN, Q16_MAX)?;
            }
        }

        keyframes.push(key);
    }

    trace!("{}: decoded {} keyframes", ctx.location(), keyframes.len());
    Ok(Envelope::new(behavior, keyframes))
}

/// Appends a [`ShapeKind::Stepped`] copy of the last key at `end_frame` when the keys stop more than one frame short
/// of it, so that the clip keeps its length after trailing keys were refined away.
///
/// Returns whether a key was added.
pub fn pad_to_clip_end(keyframes: &mut Vec<Keyframe>, end_frame: f32) -> bool {
    let Some(last) = keyframes.last() else {
        return false;
    };

    if end_frame - last.time <= 1.0 {
        return false;
    }

    let padding = Keyframe::new(end_frame, last.value, ShapeKind::Stepped);
    keyframes.push(padding);
    true
}
