//! Frame index selection and output naming.
//!
//! Frame indices are approximate: a video is assumed to have
//! `floor(duration * fps)` frames and index `n` is fetched at `n / fps`
//! seconds. What the decoder returns for that timestamp is the frame.
//!
//! # Example
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let indices = framesift::sample_frame_indices(20, 5, &mut rng);
//! assert_eq!(indices.len(), 5);
//! assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
//! assert_eq!(framesift::frame_file_name("clip", 1), "clip_frame_001.jpg");
//! ```

use std::{collections::BTreeSet, time::Duration};

use rand::Rng;

/// Estimated frame count of a video: `floor(duration * fps)`.
///
/// Returns 0 when the product is not a positive finite number.
pub fn total_frame_count(duration_seconds: f64, frames_per_second: f64) -> u64 {
    let frames = (duration_seconds * frames_per_second).floor();
    if frames.is_finite() && frames > 0.0 {
        frames as u64
    } else {
        0
    }
}

/// Timestamp at which frame `index` is fetched.
pub fn frame_timestamp(index: u64, frames_per_second: f64) -> Duration {
    if frames_per_second <= 0.0 || !frames_per_second.is_finite() {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(index as f64 / frames_per_second)
}

/// Draw `min(requested, total)` distinct frame indices from `[0, total)`.
///
/// Sampling is uniform and without replacement. The result is sorted
/// ascending. When every frame is requested the full range is returned
/// without consuming randomness.
pub fn sample_frame_indices<R: Rng + ?Sized>(total: u64, requested: u64, rng: &mut R) -> Vec<u64> {
    let count = requested.min(total);
    if count == 0 {
        return Vec::new();
    }
    if count == total {
        return (0..total).collect();
    }

    let Ok(amount) = usize::try_from(count) else {
        return Vec::new();
    };
    let Ok(length) = usize::try_from(total) else {
        return sample_by_rejection(total, amount, rng);
    };

    let mut indices: Vec<u64> = rand::seq::index::sample(rng, length, amount)
        .into_vec()
        .into_iter()
        .map(|index| index as u64)
        .collect();
    indices.sort_unstable();
    indices
}

/// Sampling for populations wider than `usize`, where `amount` is always far
/// smaller than `total`.
fn sample_by_rejection<R: Rng + ?Sized>(total: u64, amount: usize, rng: &mut R) -> Vec<u64> {
    let mut chosen = BTreeSet::new();
    while chosen.len() < amount {
        chosen.insert(rng.gen_range(0..total));
    }
    chosen.into_iter().collect()
}

/// Output file name for the frame with 1-based `rank` within a video.
pub fn frame_file_name(video_stem: &str, rank: usize) -> String {
    format!("{video_stem}_frame_{rank:03}.jpg")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn frame_count_floors_the_product() {
        assert_eq!(total_frame_count(10.0, 2.0), 20);
        assert_eq!(total_frame_count(1.99, 1.0), 1);
        assert_eq!(total_frame_count(0.4, 2.0), 0);
    }

    #[test]
    fn frame_count_rejects_degenerate_inputs() {
        assert_eq!(total_frame_count(0.0, 30.0), 0);
        assert_eq!(total_frame_count(5.0, 0.0), 0);
        assert_eq!(total_frame_count(-1.0, 30.0), 0);
        assert_eq!(total_frame_count(f64::NAN, 30.0), 0);
        assert_eq!(total_frame_count(f64::INFINITY, 30.0), 0);
    }

    #[test]
    fn timestamp_divides_by_rate() {
        assert_eq!(frame_timestamp(5, 2.0), Duration::from_millis(2500));
        assert_eq!(frame_timestamp(0, 25.0), Duration::ZERO);
        assert_eq!(frame_timestamp(3, 0.0), Duration::ZERO);
    }

    #[test]
    fn samples_are_distinct_sorted_and_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for (total, requested) in [(20, 5), (100, 99), (1, 1), (1000, 3)] {
            let indices = sample_frame_indices(total, requested, &mut rng);
            assert_eq!(indices.len() as u64, requested.min(total));
            assert!(indices.iter().all(|&index| index < total));
            assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
            let unique: HashSet<_> = indices.iter().collect();
            assert_eq!(unique.len(), indices.len());
        }
    }

    #[test]
    fn oversized_request_takes_every_frame() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_frame_indices(3, 10, &mut rng), vec![0, 1, 2]);
    }

    #[test]
    fn empty_population_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_frame_indices(0, 5, &mut rng).is_empty());
        assert!(sample_frame_indices(10, 0, &mut rng).is_empty());
    }

    #[test]
    fn rejection_sampling_is_distinct_and_sorted() {
        let mut rng = StdRng::seed_from_u64(5);
        let indices = sample_by_rejection(50, 10, &mut rng);
        assert_eq!(indices.len(), 10);
        assert!(indices.iter().all(|&index| index < 50));
        assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn huge_population_samples_without_enumerating() {
        let mut rng = StdRng::seed_from_u64(5);
        let indices = sample_frame_indices(u64::MAX, 4, &mut rng);
        assert_eq!(indices.len(), 4);
        assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn same_seed_same_indices() {
        let first = sample_frame_indices(500, 12, &mut StdRng::seed_from_u64(9));
        let second = sample_frame_indices(500, 12, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }

    #[test]
    fn file_name_pads_rank() {
        assert_eq!(frame_file_name("clip", 1), "clip_frame_001.jpg");
        assert_eq!(frame_file_name("clip", 42), "clip_frame_042.jpg");
        assert_eq!(frame_file_name("clip", 1234), "clip_frame_1234.jpg");
    }
}
