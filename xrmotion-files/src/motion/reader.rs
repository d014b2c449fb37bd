use log::{debug, trace};

use crate::common::chunked::{Chunk, ChunkedReader};
use crate::common::context::DecodeContext;
use crate::common::packed::PackedReader;
use crate::common::reader::Parseable;
use crate::envelope::{Envelope, decode_envelope};
use crate::motion::types::{
    BoneInfo, BoneMotionFlags, CHANNELS_PER_BONE, CHUNK_OBJECT_MOTION, CHUNK_SKELETAL_MOTIONS, MOTION_VERSION_MARKERS,
    MarkerInterval, Motion, MotionFailure, MotionFile, MotionMarker, MotionParams, SkeletalMotion, is_known_version,
};
use crate::{ParserError, Warning};

const MARKER_INTERVAL_SIZE: usize = 8;

/// Key times this close to a whole frame are put back onto it.
const FRAME_SNAP_TOLERANCE: f64 = 1e-3;

/// Converts a stored key time back to frames. Keys written on whole frames come back on them exactly.
fn seconds_to_frames(seconds: f32, fps: f32) -> f32 {
    let frames = seconds as f64 * fps as f64;
    let whole = frames.round();
    // the stored seconds are only as precise as an f32
    let tolerance = FRAME_SNAP_TOLERANCE.max(whole.abs() * 2.0 * f32::EPSILON as f64);
    if (frames - whole).abs() <= tolerance {
        whole as f32
    } else {
        frames as f32
    }
}

/// The part every motion starts with.
struct MotionPrefix {
    name: String,
    frame_range: (u32, u32),
    fps: f32,
    version: u16,
}

pub struct MotionReader {}

impl MotionReader {
    /// Decodes every motion of a file. Unknown top-level chunks are skipped with a warning, skeletal motions that
    /// fail to decode end up in [`MotionFile::failures`].
    pub fn parse_file(data: &[u8], ctx: &mut DecodeContext) -> Result<MotionFile, ParserError> {
        let mut file = MotionFile::default();
        let mut found_motion_chunk = false;

        for chunk in ChunkedReader::new(data) {
            let chunk = chunk?;
            match chunk.id {
                CHUNK_OBJECT_MOTION => {
                    found_motion_chunk = true;
                    file.object_motion = Some(MotionReader::parse_object_motion(&chunk, ctx)?);
                }
                CHUNK_SKELETAL_MOTIONS => {
                    found_motion_chunk = true;
                    let (motions, failures) = MotionReader::parse_skeletal_motions(&chunk, ctx)?;
                    file.skeletal_motions.extend(motions);
                    file.failures.extend(failures);
                }
                id => ctx.warn(Warning::UnknownChunk {
                    id,
                    offset: chunk.offset,
                }),
            }
        }

        if !found_motion_chunk {
            return Err(ParserError::MissingChunk {
                id: CHUNK_OBJECT_MOTION,
            });
        }

        Ok(file)
    }

    pub fn parse_object_motion(chunk: &Chunk<'_>, ctx: &mut DecodeContext) -> Result<Motion, ParserError> {
        let mut rdr = chunk.reader();
        let prefix = MotionReader::read_prefix(&mut rdr, ctx)?;

        ctx.scoped(format!("motion '{}'", prefix.name), |ctx| {
            let channels = MotionReader::read_channels(&mut rdr, &prefix, ctx)?;
            MotionReader::check_trailing_bytes(&rdr, ctx);
            Ok(Motion {
                name: prefix.name.clone(),
                frame_range: prefix.frame_range,
                fps: prefix.fps,
                channels,
            })
        })
    }

    /// Decodes each motion of the nested stream on its own. Only a broken nested stream fails as a whole.
    pub fn parse_skeletal_motions(
        chunk: &Chunk<'_>,
        ctx: &mut DecodeContext,
    ) -> Result<(Vec<SkeletalMotion>, Vec<MotionFailure>), ParserError> {
        let mut motions = Vec::new();
        let mut failures = Vec::new();

        for child in chunk.children() {
            let child = child?;
            let mut rdr = child.reader();
            match MotionReader::parse_skeletal_motion(&mut rdr, ctx) {
                Ok(motion) => {
                    MotionReader::check_trailing_bytes(&rdr, ctx);
                    motions.push(motion);
                }
                Err(error) => {
                    log::error!("Skeletal motion chunk {} could not be decoded: {}", child.id, error);
                    failures.push(MotionFailure {
                        chunk_id: child.id,
                        error,
                    });
                }
            }
        }

        debug!(
            "Decoded {} skeletal motions, {} failed",
            motions.len(),
            failures.len()
        );
        Ok((motions, failures))
    }

    pub fn parse_skeletal_motion(
        rdr: &mut PackedReader<'_>,
        ctx: &mut DecodeContext,
    ) -> Result<SkeletalMotion, ParserError> {
        let prefix = MotionReader::read_prefix(rdr, ctx)?;

        ctx.scoped(format!("motion '{}'", prefix.name), |ctx| {
            let params = MotionParams::parse(rdr)?;
            let bone_count = rdr.read_u16()? as usize;

            let mut bones = Vec::with_capacity(bone_count.min(rdr.remaining()));
            let mut channels = Vec::with_capacity(bones.capacity() * CHANNELS_PER_BONE);
            for index in 0..bone_count {
                let name = ctx.read_name(rdr)?;
                ctx.scoped(format!("bone '{}'", name), |ctx| {
                    let flags = BoneMotionFlags::parse(rdr)?;
                    channels.extend(MotionReader::read_channels(rdr, &prefix, ctx)?);
                    trace!("bone {} '{}' decoded", index, name);
                    bones.push(BoneInfo {
                        name: name.clone(),
                        flags,
                    });
                    Ok(())
                })?;
            }

            let markers = if prefix.version >= MOTION_VERSION_MARKERS {
                MotionReader::read_markers(rdr, ctx)?
            } else {
                Vec::new()
            };

            Ok(SkeletalMotion {
                motion: Motion {
                    name: prefix.name.clone(),
                    frame_range: prefix.frame_range,
                    fps: prefix.fps,
                    channels,
                },
                params,
                bones,
                markers,
            })
        })
    }

    fn read_prefix(rdr: &mut PackedReader<'_>, ctx: &mut DecodeContext) -> Result<MotionPrefix, ParserError> {
        let name = ctx.read_name(rdr)?;
        let frame_start = rdr.read_u32()?;
        let frame_end = rdr.read_u32()?;
        let fps = rdr.read_f32()?;
        let version = rdr.read_u16()?;

        if !is_known_version(version) {
            return Err(ParserError::UnsupportedVersion {
                version: version as u32,
            });
        }

        if !(fps.is_finite() && fps > 0.0) {
            return Err(ParserError::FormatError {
                reason: "The frame rate has to be positive",
            });
        }

        Ok(MotionPrefix {
            name,
            frame_range: (frame_start, frame_end),
            fps,
            version,
        })
    }

    /// Reads one bone worth of channels and converts the key times from seconds to frames.
    fn read_channels(
        rdr: &mut PackedReader<'_>,
        prefix: &MotionPrefix,
        ctx: &mut DecodeContext,
    ) -> Result<Vec<Envelope>, ParserError> {
        (0..CHANNELS_PER_BONE)
            .map(|index| {
                ctx.scoped(format!("channel {}", index), |ctx| {
                    let mut envelope = decode_envelope(rdr, prefix.version, ctx)?;
                    for key in envelope.keyframes.iter_mut() {
                        key.time = seconds_to_frames(key.time, prefix.fps);
                    }
                    Ok(envelope)
                })
            })
            .collect()
    }

    fn read_markers(rdr: &mut PackedReader<'_>, ctx: &mut DecodeContext) -> Result<Vec<MotionMarker>, ParserError> {
        let count = rdr.read_u32()? as usize;
        let mut markers = Vec::with_capacity(count.min(rdr.remaining()));

        for _ in 0..count {
            let name = ctx.read_name(rdr)?;
            let interval_count = rdr.read_u32()? as usize;
            let size = interval_count
                .checked_mul(MARKER_INTERVAL_SIZE)
                .ok_or(ParserError::Overflow {
                    what: "marker interval count",
                    value: interval_count,
                })?;

            // bounds check the whole list up front, then parse it as a self-contained array
            let offset = rdr.offset();
            let bytes = rdr.read_bytes(size)?;
            let intervals = Vec::<MarkerInterval>::parse(&mut PackedReader::with_base(bytes, offset))?;
            markers.push(MotionMarker { name, intervals });
        }

        Ok(markers)
    }

    fn check_trailing_bytes(rdr: &PackedReader<'_>, ctx: &DecodeContext) {
        if !rdr.is_empty() {
            debug!(
                "{}: ignoring {} trailing bytes at offset {}",
                ctx.location(),
                rdr.remaining(),
                rdr.offset()
            );
        }
    }
}
