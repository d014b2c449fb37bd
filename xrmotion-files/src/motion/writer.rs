use log::{debug, warn};

use crate::ParserError;
use crate::common::chunked::ChunkedWriter;
use crate::common::packed::PackedWriter;
use crate::common::reader::Writable;
use crate::envelope::{Envelope, encode_envelope, pad_to_clip_end, refine};
use crate::motion::types::{
    CHANNELS_PER_BONE, CHUNK_OBJECT_MOTION, CHUNK_SKELETAL_MOTIONS, ExportSettings, MOTION_VERSION_MARKERS, Motion,
    MotionFile, SkeletalMotion, is_known_version,
};

/// Narrows a length to the width of its count field.
pub(crate) fn checked_count<T: TryFrom<usize>>(len: usize, what: &'static str) -> Result<T, ParserError> {
    T::try_from(len).map_err(|_| ParserError::Overflow { what, value: len })
}

pub struct MotionWriter {}

impl MotionWriter {
    /// Writes a complete file: the object motion (if any) followed by all skeletal motions.
    pub fn write_file(file: &MotionFile, settings: &ExportSettings) -> Result<Vec<u8>, ParserError> {
        let mut out = ChunkedWriter::new();
        if let Some(motion) = &file.object_motion {
            out.put_packed(CHUNK_OBJECT_MOTION, &MotionWriter::encode_object_motion(motion, settings)?);
        }

        if !file.skeletal_motions.is_empty() {
            out.put_chunked(
                CHUNK_SKELETAL_MOTIONS,
                &MotionWriter::encode_skeletal_motions(&file.skeletal_motions, settings)?,
            );
        }

        Ok(out.into_inner())
    }

    pub fn write_object_motion(motion: &Motion, settings: &ExportSettings) -> Result<Vec<u8>, ParserError> {
        let mut out = ChunkedWriter::new();
        out.put_packed(CHUNK_OBJECT_MOTION, &MotionWriter::encode_object_motion(motion, settings)?);
        Ok(out.into_inner())
    }

    pub fn write_skeletal_motions(
        motions: &[SkeletalMotion],
        settings: &ExportSettings,
    ) -> Result<Vec<u8>, ParserError> {
        let mut out = ChunkedWriter::new();
        out.put_chunked(
            CHUNK_SKELETAL_MOTIONS,
            &MotionWriter::encode_skeletal_motions(motions, settings)?,
        );
        Ok(out.into_inner())
    }

    pub fn encode_object_motion(motion: &Motion, settings: &ExportSettings) -> Result<PackedWriter, ParserError> {
        if motion.channels.len() != CHANNELS_PER_BONE {
            return Err(ParserError::FormatError {
                reason: "An object motion has exactly 6 channels",
            });
        }

        let mut wtr = PackedWriter::new();
        MotionWriter::write_prefix(&mut wtr, motion, settings)?;
        for channel in &motion.channels {
            MotionWriter::write_channel(&mut wtr, channel, motion, settings)?;
        }
        Ok(wtr)
    }

    /// Every motion becomes a chunk of its own, the chunk id being the motion's index.
    pub fn encode_skeletal_motions(
        motions: &[SkeletalMotion],
        settings: &ExportSettings,
    ) -> Result<ChunkedWriter, ParserError> {
        let mut out = ChunkedWriter::new();
        for (index, motion) in motions.iter().enumerate() {
            let id = u32::try_from(index).map_err(|_| ParserError::Overflow {
                what: "motion count",
                value: motions.len(),
            })?;
            out.put_packed(id, &MotionWriter::encode_skeletal_motion(motion, settings)?);
        }
        Ok(out)
    }

    pub fn encode_skeletal_motion(
        skeletal: &SkeletalMotion,
        settings: &ExportSettings,
    ) -> Result<PackedWriter, ParserError> {
        let motion = &skeletal.motion;
        if motion.channels.len() != skeletal.bones.len() * CHANNELS_PER_BONE {
            return Err(ParserError::FormatError {
                reason: "A skeletal motion needs 6 channels per bone",
            });
        }

        let bone_count: u16 = checked_count(skeletal.bones.len(), "bone count")?;

        let mut wtr = PackedWriter::new();
        MotionWriter::write_prefix(&mut wtr, motion, settings)?;
        skeletal.params.write(&mut wtr);
        wtr.write_u16(bone_count);

        for (bone, channels) in skeletal.bones.iter().zip(motion.channels.chunks_exact(CHANNELS_PER_BONE)) {
            bone.write(&mut wtr);
            for channel in channels {
                MotionWriter::write_channel(&mut wtr, channel, motion, settings)?;
            }
        }

        if settings.format_version >= MOTION_VERSION_MARKERS {
            wtr.write_u32(checked_count(skeletal.markers.len(), "marker count")?);

            for marker in &skeletal.markers {
                wtr.write_cstring(&marker.name);
                wtr.write_u32(checked_count(marker.intervals.len(), "marker interval count")?);
                for interval in &marker.intervals {
                    interval.write(&mut wtr);
                }
            }
        } else if !skeletal.markers.is_empty() {
            warn!(
                "Format version {} has no markers, dropping {} markers of '{}'",
                settings.format_version,
                skeletal.markers.len(),
                motion.name
            );
        }

        Ok(wtr)
    }

    fn write_prefix(wtr: &mut PackedWriter, motion: &Motion, settings: &ExportSettings) -> Result<(), ParserError> {
        if !is_known_version(settings.format_version) {
            return Err(ParserError::UnsupportedVersion {
                version: settings.format_version as u32,
            });
        }
        motion.validate()?;

        wtr.write_cstring(&motion.name)
            .write_u32(motion.frame_range.0)
            .write_u32(motion.frame_range.1)
            .write_f32(motion.fps)
            .write_u16(settings.format_version);
        Ok(())
    }

    /// Refines the keys (if configured), pads them to the clip end and stores the times in seconds.
    fn write_channel(
        wtr: &mut PackedWriter,
        channel: &Envelope,
        motion: &Motion,
        settings: &ExportSettings,
    ) -> Result<(), ParserError> {
        let mut keys = match settings.epsilon {
            Some(epsilon) => refine(&channel.keyframes, epsilon),
            None => channel.keyframes.clone(),
        };

        if pad_to_clip_end(&mut keys, motion.frame_range.1 as f32) {
            debug!("'{}': padded a channel to frame {}", motion.name, motion.frame_range.1);
        }

        for key in keys.iter_mut() {
            key.time /= motion.fps;
        }

        encode_envelope(wtr, channel.behavior, &keys, settings.format_version)
    }
}
