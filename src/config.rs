//! Sampler configuration.
//!
//! [`SamplerOptions`] is a builder that threads the video extension filter
//! and the progress callback through the batch driver without widening
//! every signature.
//!
//! # Example
//!
//! ```
//! use framesift::SamplerOptions;
//!
//! let options = SamplerOptions::new().with_extensions(["mp4", "MOV"]);
//! assert!(options.matches_extension("clip.mov".as_ref()));
//! assert!(!options.matches_extension("notes.txt".as_ref()));
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::Path,
    sync::Arc,
};

use crate::progress::{NoOpProgress, ProgressCallback};

/// Extension matched when none is configured.
pub const DEFAULT_VIDEO_EXTENSION: &str = "mp4";

/// Configuration for [`FrameSampler`](crate::FrameSampler).
#[derive(Clone)]
pub struct SamplerOptions {
    /// Lowercased extensions (without the dot) of files treated as videos.
    pub(crate) extensions: Vec<String>,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for SamplerOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SamplerOptions")
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplerOptions {
    /// Defaults: `mp4` files only, no progress callback.
    pub fn new() -> Self {
        Self {
            extensions: vec![DEFAULT_VIDEO_EXTENSION.to_string()],
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Replace the set of video extensions.
    ///
    /// Leading dots are stripped and matching is ASCII case-insensitive. An
    /// empty list falls back to the default.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|extension| extension.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|extension| !extension.is_empty())
            .collect();
        self.extensions = if extensions.is_empty() {
            vec![DEFAULT_VIDEO_EXTENSION.to_string()]
        } else {
            extensions
        };
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Configured video extensions.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Upper-cased extensions joined with `/` for console messages, e.g.
    /// `MP4` or `MP4/MOV`.
    pub fn extension_label(&self) -> String {
        self.extensions.join("/").to_ascii_uppercase()
    }

    /// Whether `path` carries one of the configured extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(extension))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_mp4_only() {
        let options = SamplerOptions::new();
        assert!(options.matches_extension(Path::new("a.mp4")));
        assert!(options.matches_extension(Path::new("dir/b.MP4")));
        assert!(!options.matches_extension(Path::new("c.mkv")));
        assert!(!options.matches_extension(Path::new("mp4")));
    }

    #[test]
    fn extensions_are_normalised() {
        let options = SamplerOptions::new().with_extensions([".MKV", "avi", ""]);
        assert_eq!(options.extensions(), ["mkv", "avi"]);
    }

    #[test]
    fn extension_label_is_upper_cased() {
        assert_eq!(SamplerOptions::new().extension_label(), "MP4");
        let options = SamplerOptions::new().with_extensions(["mp4", "mov"]);
        assert_eq!(options.extension_label(), "MP4/MOV");
    }

    #[test]
    fn empty_extension_list_keeps_default() {
        let options = SamplerOptions::new().with_extensions(Vec::<String>::new());
        assert_eq!(options.extensions(), [DEFAULT_VIDEO_EXTENSION]);
    }
}
