use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use glam::Vec3;
use itertools::Itertools;
use log::{error, info};
use xrmotion_files::Warning;
use xrmotion_files::common::chunked::{ChunkNode, walk_chunk_tree};
use xrmotion_files::common::context::DecodeContext;
use xrmotion_files::motion::reader::MotionReader;
use xrmotion_files::motion::types::{ExportSettings, Motion, MotionFile};
use xrmotion_files::motion::writer::MotionWriter;

use crate::io::loader::RawFileLoader;
use crate::settings::{CliArgs, Command};


/// Runs the selected command and returns how many files failed. A failing file never stops the others.
pub fn run(args: &CliArgs, loader: &impl RawFileLoader, out: &mut impl Write) -> usize {
    match &args.command {
        Command::Chunks { files, max_depth } => {
            for_each_file(files, |path| print_chunks(loader, path, *max_depth, out))
        }
        Command::Info { files } => for_each_file(files, |path| print_info(loader, path, args.strict, out)),
        Command::Sample {
            file,
            motion,
            bone,
            frame,
        } => report(
            file,
            print_samples(loader, file, args.strict, motion, *bone, *frame, out),
        ),
        Command::Refine { input, output, export } => report(
            input,
            refine_file(loader, input, output, args.strict, export.into(), out),
        ),
    }
}

fn for_each_file(files: &[PathBuf], mut f: impl FnMut(&Path) -> Result<(), anyhow::Error>) -> usize {
    files.iter().map(|path| report(path, f(path))).sum()
}

fn report(path: &Path, result: Result<(), anyhow::Error>) -> usize {
    match result {
        Ok(()) => 0,
        Err(err) => {
            error!("{}: {:#}", path.display(), err);
            1
        }
    }
}

fn decode(loader: &impl RawFileLoader, path: &Path, strict: bool) -> Result<(MotionFile, Vec<Warning>), anyhow::Error> {
    let data = loader.load_raw_owned(path)?;
    let mut ctx = DecodeContext::new(strict);
    let file = MotionReader::parse_file(&data, &mut ctx).with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok((file, ctx.take_warnings()))
}

fn print_chunks(
    loader: &impl RawFileLoader,
    path: &Path,
    max_depth: usize,
    out: &mut impl Write,
) -> Result<(), anyhow::Error> {
    let data = loader.load_raw_owned(path)?;
    let tree = walk_chunk_tree(&data, max_depth)?;
    writeln!(out, "{} ({} bytes)", path.display(), data.len())?;
    print_nodes(&tree, 1, out)
}

fn print_nodes(nodes: &[ChunkNode], depth: usize, out: &mut impl Write) -> Result<(), anyhow::Error> {
    for node in nodes {
        writeln!(
            out,
            "{:indent$}0x{:04x} @ {} ({} bytes)",
            "",
            node.id,
            node.offset,
            node.size,
            indent = depth * 2
        )?;
        print_nodes(&node.children, depth + 1, out)?;
    }
    Ok(())
}

fn describe(motion: &Motion) -> String {
    format!(
        "'{}': frames {}..={} @ {} fps, {} bones, {} keyframes",
        motion.name,
        motion.frame_range.0,
        motion.frame_range.1,
        motion.fps,
        motion.bone_count(),
        motion.keyframe_count()
    )
}

fn print_info(
    loader: &impl RawFileLoader,
    path: &Path,
    strict: bool,
    out: &mut impl Write,
) -> Result<(), anyhow::Error> {
    let (file, warnings) = decode(loader, path, strict)?;

    writeln!(out, "{}", path.display())?;
    if let Some(motion) = &file.object_motion {
        writeln!(out, "  object motion {}", describe(motion))?;
    }

    for skeletal in &file.skeletal_motions {
        writeln!(out, "  skeletal motion {}", describe(&skeletal.motion))?;
        writeln!(
            out,
            "    flags {:?}, speed {}, bones: {}",
            skeletal.params.flags,
            skeletal.params.speed,
            skeletal.bones.iter().map(|bone| &bone.name).join(", ")
        )?;
        for marker in &skeletal.markers {
            writeln!(out, "    marker '{}': {} intervals", marker.name, marker.intervals.len())?;
        }
    }

    for failure in &file.failures {
        writeln!(out, "  motion chunk {} failed: {}", failure.chunk_id, failure.error)?;
    }

    for warning in &warnings {
        writeln!(out, "  warning: {}", warning)?;
    }

    if !file.failures.is_empty() {
        bail!(
            "{} of {} skeletal motions failed to decode",
            file.failures.len(),
            file.failures.len() + file.skeletal_motions.len()
        );
    }
    Ok(())
}

fn format_vec(v: Vec3) -> String {
    format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
}

fn print_samples(
    loader: &impl RawFileLoader,
    path: &Path,
    strict: bool,
    motion_name: &str,
    bone: usize,
    frame: Option<f32>,
    out: &mut impl Write,
) -> Result<(), anyhow::Error> {
    let (file, _) = decode(loader, path, strict)?;
    let motion = file.motions().find(|motion| motion.name == motion_name).ok_or_else(|| {
        anyhow!(
            "There is no motion '{}', available are: {}",
            motion_name,
            file.motions().map(|motion| &motion.name).join(", ")
        )
    })?;

    let frames = match frame {
        Some(frame) => vec![frame],
        None => (motion.frame_range.0..=motion.frame_range.1)
            .map(|frame| frame as f32)
            .collect_vec(),
    };

    for frame in frames {
        let (translation, rotation) = motion.pose_at(bone, frame).ok_or_else(|| {
            anyhow!(
                "Motion '{}' has {} bones, there is no bone {}",
                motion.name,
                motion.bone_count(),
                bone
            )
        })?;
        writeln!(
            out,
            "{:>8.2}  translation {}  rotation {}",
            frame,
            format_vec(translation),
            format_vec(rotation)
        )?;
    }
    Ok(())
}

fn refine_file(
    loader: &impl RawFileLoader,
    input: &Path,
    output: &Path,
    strict: bool,
    settings: ExportSettings,
    out: &mut impl Write,
) -> Result<(), anyhow::Error> {
    let (file, _) = decode(loader, input, strict)?;
    if !file.failures.is_empty() {
        bail!(
            "Not writing {}, {} motions could not be decoded",
            output.display(),
            file.failures.len()
        );
    }

    let data = MotionWriter::write_file(&file, &settings)?;
    loader.store_raw(output, &data)?;

    // count what a reader gets back, including the keys padding the clip end
    let written = MotionReader::parse_file(&data, &mut DecodeContext::new(true))?;
    let before: usize = file.motions().map(Motion::keyframe_count).sum();
    let after: usize = written.motions().map(Motion::keyframe_count).sum();
    info!(
        "{}: refined with {:?} into format version {}",
        input.display(),
        settings.epsilon,
        settings.format_version
    );

    writeln!(
        out,
        "{}: {} -> {} keyframes, {} bytes written to {}",
        input.display(),
        before,
        after,
        data.len(),
        output.display()
    )?;
    Ok(())
}
