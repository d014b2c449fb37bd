use bitflags::bitflags;
use glam::Vec3;
use xrmotion_files_derive_parseable::{Parse, Write};

use crate::ParserError;
use crate::common::packed::{PackedReader, PackedWriter};
use crate::common::reader::{Parseable, Writable};
use crate::envelope::{DEFAULT_EPSILON, Envelope};

pub const CHUNK_OBJECT_MOTION: u32 = 0x1100;
pub const CHUNK_SKELETAL_MOTIONS: u32 = 0x1200;

pub const MOTION_VERSION_MIN: u16 = 1;
/// Skeletal motions carry markers starting with this version
pub const MOTION_VERSION_MARKERS: u16 = 5;
pub const MOTION_VERSION_LATEST: u16 = MOTION_VERSION_MARKERS;

/// translate x, y, z, then rotate x, y, z
pub const CHANNELS_PER_BONE: usize = 6;

/// Bone index meaning "no bone/part restriction"
pub const BONE_OR_PART_NONE: u16 = u16::MAX;

pub fn is_known_version(version: u16) -> bool {
    (MOTION_VERSION_MIN..=MOTION_VERSION_LATEST).contains(&version)
}

/// A decoded clip. Channels come in groups of [`CHANNELS_PER_BONE`], one group per bone (or a single group for
/// object motions).
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub name: String,
    /// first and last frame, inclusive
    pub frame_range: (u32, u32),
    pub fps: f32,
    pub channels: Vec<Envelope>,
}

impl Motion {
    pub fn bone_count(&self) -> usize {
        self.channels.len() / CHANNELS_PER_BONE
    }

    pub fn bone_channels(&self, bone: usize) -> Option<&[Envelope]> {
        self.channels.chunks_exact(CHANNELS_PER_BONE).nth(bone)
    }

    /// Evaluates translation and rotation (euler angles, as stored) of `bone` at `frame`.
    pub fn pose_at(&self, bone: usize, frame: f32) -> Option<(Vec3, Vec3)> {
        let channels = self.bone_channels(bone)?;
        let translation = Vec3::new(
            channels[0].evaluate(frame),
            channels[1].evaluate(frame),
            channels[2].evaluate(frame),
        );
        let rotation = Vec3::new(
            channels[3].evaluate(frame),
            channels[4].evaluate(frame),
            channels[5].evaluate(frame),
        );
        Some((translation, rotation))
    }

    pub fn keyframe_count(&self) -> usize {
        self.channels.iter().map(|channel| channel.keyframes.len()).sum()
    }

    pub fn validate(&self) -> Result<(), ParserError> {
        if self.channels.is_empty() || self.channels.len() % CHANNELS_PER_BONE != 0 {
            return Err(ParserError::FormatError {
                reason: "A motion needs 6 channels per bone",
            });
        }

        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ParserError::FormatError {
                reason: "The frame rate has to be positive",
            });
        }

        if self.channels.iter().any(|channel| !channel.is_ordered()) {
            return Err(ParserError::FormatError {
                reason: "Keyframes have to be ordered by time",
            });
        }

        Ok(())
    }
}

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct MotionFlags: u8 {
        const FX = 0x01;
        const STOP_AT_END = 0x02;
        const NO_MIX = 0x04;
        const SYNC_PART = 0x08;
        const FOOT_STEPS = 0x10;
        const ROOT_MOVER = 0x20;
        const IDLE = 0x40;
        const WEAPON_BONE = 0x80;
    }
}

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct BoneMotionFlags: u8 {
        const WORLD_ORIENT = 0x01;

        // keep whatever else the file had set
        const _ = !0;
    }
}

impl Parseable<MotionFlags> for MotionFlags {
    fn parse(rdr: &mut PackedReader<'_>) -> Result<MotionFlags, ParserError> {
        Ok(MotionFlags::from_bits_retain(rdr.read_u8()?))
    }
}

impl Writable for MotionFlags {
    fn write(&self, wtr: &mut PackedWriter) {
        wtr.write_u8(self.bits());
    }
}

impl Parseable<BoneMotionFlags> for BoneMotionFlags {
    fn parse(rdr: &mut PackedReader<'_>) -> Result<BoneMotionFlags, ParserError> {
        Ok(BoneMotionFlags::from_bits_retain(rdr.read_u8()?))
    }
}

impl Writable for BoneMotionFlags {
    fn write(&self, wtr: &mut PackedWriter) {
        wtr.write_u8(self.bits());
    }
}

/// Playback parameters of a skeletal motion.
#[derive(Debug, Copy, Clone, PartialEq, Parse, Write)]
pub struct MotionParams {
    pub flags: MotionFlags,
    pub bone_or_part: u16,
    pub speed: f32,
    pub accrue: f32,
    pub falloff: f32,
    pub power: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        MotionParams {
            flags: MotionFlags::empty(),
            bone_or_part: BONE_OR_PART_NONE,
            speed: 1.0,
            accrue: 2.0,
            falloff: 2.0,
            power: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Write)]
pub struct BoneInfo {
    pub name: String,
    pub flags: BoneMotionFlags,
}

/// Times in seconds
#[derive(Debug, Copy, Clone, PartialEq, Parse, Write)]
pub struct MarkerInterval {
    pub start: f32,
    pub end: f32,
}

/// Named time intervals, e.g. the foot steps of a walk cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionMarker {
    pub name: String,
    pub intervals: Vec<MarkerInterval>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkeletalMotion {
    pub motion: Motion,
    pub params: MotionParams,
    /// one entry per channel group of `motion`
    pub bones: Vec<BoneInfo>,
    pub markers: Vec<MotionMarker>,
}

impl SkeletalMotion {
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|bone| bone.name == name)
    }
}

/// A skeletal motion that could not be decoded. The other motions of the file are not affected.
#[derive(Debug)]
pub struct MotionFailure {
    /// id of the motion's chunk inside the skeletal motions chunk
    pub chunk_id: u32,
    pub error: ParserError,
}

/// Everything a motion file contained.
#[derive(Debug, Default)]
pub struct MotionFile {
    pub object_motion: Option<Motion>,
    pub skeletal_motions: Vec<SkeletalMotion>,
    pub failures: Vec<MotionFailure>,
}

impl MotionFile {
    pub fn motions(&self) -> impl Iterator<Item = &Motion> {
        self.object_motion
            .iter()
            .chain(self.skeletal_motions.iter().map(|skeletal| &skeletal.motion))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ExportSettings {
    pub format_version: u16,
    /// Refinement tolerance, `None` writes every key as is.
    pub epsilon: Option<f32>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            format_version: MOTION_VERSION_LATEST,
            epsilon: Some(DEFAULT_EPSILON),
        }
    }
}
