//! Finished footprint artifacts and their persistence.
//!
//! The right foot is the canonically synthesized orientation; the left
//! foot is always derived from it by horizontal reflection, which makes
//! the two exact mirror images by construction.

use crate::{
    Error,
    color::RGBA,
    image::{Image, ImageOwned, write_png},
};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Right,
    Left,
}

impl Handedness {
    pub fn mirrored(self) -> Self {
        match self {
            Handedness::Right => Handedness::Left,
            Handedness::Left => Handedness::Right,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Handedness::Right => "boot_print_right.png",
            Handedness::Left => "boot_print_left.png",
        }
    }
}

/// A finished texture plus its handedness.
#[derive(Clone, PartialEq, Eq)]
pub struct Footprint {
    pub handedness: Handedness,
    pub image: ImageOwned<RGBA>,
}

impl Footprint {
    pub fn right(image: ImageOwned<RGBA>) -> Self {
        Self {
            handedness: Handedness::Right,
            image,
        }
    }

    /// Opposite-foot variant, `x ↦ width-1-x`, no recoloring.
    pub fn mirrored(&self) -> Self {
        Self {
            handedness: self.handedness.mirrored(),
            image: self.image.flip_horizontal(),
        }
    }
}

/// Paths and byte sizes of a persisted pair, for console reporting.
#[derive(Debug, Clone)]
pub struct EmitReport {
    pub right_path: PathBuf,
    pub left_path: PathBuf,
    pub right_bytes: u64,
    pub left_bytes: u64,
}

/// Persists a footprint pair into one output directory.
///
/// Writes are all-or-nothing: both PNGs are staged as `.tmp` siblings
/// first, then renamed into place; any failure removes whatever this emit
/// has produced so far, so either both final files exist or neither does.
#[derive(Debug, Clone)]
pub struct Emitter {
    output_dir: PathBuf,
}

impl Emitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Derive the left foot from `right` and persist both textures.
    pub fn emit(&self, right: &ImageOwned<RGBA>) -> Result<EmitReport, Error> {
        tracing::debug_span!("[save]", dir = %self.output_dir.display()).in_scope(|| {
            fs::create_dir_all(&self.output_dir)?;

            let right = Footprint::right(right.clone());
            let left = right.mirrored();
            let right_final = self.output_dir.join(right.handedness.file_name());
            let left_final = self.output_dir.join(left.handedness.file_name());
            let right_tmp = tmp_sibling(&right_final);
            let left_tmp = tmp_sibling(&left_final);

            let right_bytes = self.stage(&right, &right_tmp).map_err(|err| {
                discard(&[&right_tmp]);
                err
            })?;
            let left_bytes = self.stage(&left, &left_tmp).map_err(|err| {
                discard(&[&right_tmp, &left_tmp]);
                err
            })?;
            fs::rename(&right_tmp, &right_final).map_err(|err| {
                discard(&[&right_tmp, &left_tmp]);
                Error::from(err)
            })?;
            fs::rename(&left_tmp, &left_final).map_err(|err| {
                discard(&[&left_tmp, &right_final]);
                Error::from(err)
            })?;

            tracing::debug!(right = %right_final.display(), left = %left_final.display(), "emitted pair");
            Ok(EmitReport {
                right_path: right_final,
                left_path: left_final,
                right_bytes,
                left_bytes,
            })
        })
    }

    /// Encode one footprint into its temporary file, returning the encoded size.
    fn stage(&self, footprint: &Footprint, tmp: &Path) -> Result<u64, Error> {
        let mut out = BufWriter::new(fs::File::create(tmp)?);
        write_png(&footprint.image, &mut out)?;
        out.flush()?;
        Ok(fs::metadata(tmp)?.len())
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn discard<P: AsRef<Path>>(paths: &[P]) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}
