//! Dataset routing.
//!
//! Copies annotated `<name>.jpg` / `<name>.txt` pairs from a flat frames
//! directory into the `images/` + `labels/` layout expected by detection
//! trainers, renaming them `frame_{i:06}` in file-name order. The
//! `classes.txt` file written by labelling tools is skipped.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::FramesiftError;

/// Annotation file that lists class names rather than labelling a frame.
pub const CLASSES_FILE_NAME: &str = "classes.txt";

/// One copied image/label pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedPair {
    /// Base name shared by the source files.
    pub source_stem: String,
    /// 0-based pair index used in the destination names.
    pub index: usize,
    /// Destination image path.
    pub image: PathBuf,
    /// Destination label path.
    pub label: PathBuf,
}

/// Pairs copied by [`route_dataset`], in index order.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct RouteReport {
    /// Copied pairs.
    pub pairs: Vec<RoutedPair>,
}

/// Destination stem for pair `index`.
pub fn routed_file_stem(index: usize) -> String {
    format!("frame_{index:06}")
}

/// Copy every labelled frame in `frames_dir` into `data_dir/images` and
/// `data_dir/labels`.
///
/// Every `*.txt` other than `classes.txt` is a label whose image is the
/// `.jpg` with the same base name. Images without a label are ignored.
/// Source file names are discarded. `images/` and `labels/` are created when
/// missing and existing files with the same destination name are replaced.
///
/// # Errors
///
/// - [`FramesiftError::InputDirectoryMissing`] if `frames_dir` is not a
///   directory.
/// - [`FramesiftError::Copy`] if a copy fails, for example when a label has
///   no matching image. Pairs copied before the failure stay in place.
///
/// # Example
///
/// ```no_run
/// let report = framesift::route_dataset("frames".as_ref(), "data".as_ref())?;
/// println!("routed {} pairs", report.pairs.len());
/// # Ok::<(), framesift::FramesiftError>(())
/// ```
pub fn route_dataset(frames_dir: &Path, data_dir: &Path) -> Result<RouteReport, FramesiftError> {
    if !frames_dir.is_dir() {
        return Err(FramesiftError::InputDirectoryMissing(
            frames_dir.to_path_buf(),
        ));
    }

    let labelled = label_files(frames_dir)?;
    log::info!(
        "Found {} labelled frame(s) in {}",
        labelled.len(),
        frames_dir.display()
    );

    let images_dir = data_dir.join("images");
    let labels_dir = data_dir.join("labels");
    fs::create_dir_all(&images_dir)?;
    fs::create_dir_all(&labels_dir)?;

    let mut report = RouteReport::default();
    for (index, source_label) in labelled.iter().enumerate() {
        let stem = routed_file_stem(index);
        let image = images_dir.join(format!("{stem}.jpg"));
        let label = labels_dir.join(format!("{stem}.txt"));

        copy_file(&source_label.with_extension("jpg"), &image)?;
        copy_file(source_label, &label)?;
        log::debug!("{} -> {stem}", source_label.display());

        report.pairs.push(RoutedPair {
            source_stem: source_label
                .file_stem()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            index,
            image,
            label,
        });
    }

    Ok(report)
}

/// Label files in `frames_dir`, sorted by file name.
fn label_files(frames_dir: &Path) -> Result<Vec<PathBuf>, FramesiftError> {
    let mut labels = Vec::new();
    for entry in fs::read_dir(frames_dir)? {
        let path = entry?.path();
        let is_label = path.extension().is_some_and(|extension| extension == "txt")
            && path.file_name().is_some_and(|name| name != CLASSES_FILE_NAME);
        if is_label && path.is_file() {
            labels.push(path);
        }
    }
    labels.sort_by(|left, right| left.file_name().cmp(&right.file_name()));
    Ok(labels)
}

fn copy_file(from: &Path, to: &Path) -> Result<(), FramesiftError> {
    fs::copy(from, to).map_err(|source| FramesiftError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}
