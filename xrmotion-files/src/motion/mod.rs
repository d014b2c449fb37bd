//! Object and skeletal motions.
//!
//! # Layout
//! ```text
//! chunk 0x1100 (object motion):
//!   name cstring, frame_start u32, frame_end u32, fps f32, version u16
//!   6 envelopes (translate x, y, z, rotate x, y, z), key times in seconds
//!
//! chunk 0x1200 (skeletal motions), a nested chunk stream with one chunk per motion:
//!   name cstring, frame_start u32, frame_end u32, fps f32, version u16
//!   flags u8, bone_or_part u16, speed f32, accrue f32, falloff f32, power f32
//!   bone_count u16, per bone: name cstring, flags u8, 6 envelopes
//!   version >= 5: marker_count u32, per marker: name cstring, interval_count u32, (start f32, end f32) * count
//! ```

pub mod reader;
pub mod types;
pub mod writer;
