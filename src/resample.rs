//! Maps sparse detection-rate trajectories onto the display frame rate.

use std::collections::HashMap;

use crate::bbox::BBox;
use crate::error::Error;
use crate::FrameIdx;

/// Display frame index paired with the box shown on it, strictly increasing
pub type DisplayTrajectory = Vec<(FrameIdx, BBox)>;

/// Box at step `i` of `num` between `b1` and `b2`.
#[inline]
pub fn interpolate(b1: &BBox, b2: &BBox, i: u64, num: u64) -> BBox {
    b1.lerp(b2, i, num)
}

/// Display frame that detection frame `idx` falls on.
#[inline]
pub fn display_index(idx: u32, fps_ratio: f64) -> FrameIdx {
    (idx as f64 * fps_ratio).floor() as FrameIdx
}

/// Resamples one object's boxes with `fps_ratio = display_fps / detection_fps`.
///
/// Every display frame from the first sample up to, but excluding, the last
/// sample gets a box. The last sample's own frame is never emitted.
// NOTE: the right-open end reproduces the tracker visualisation as it was
// shipped; whether the final sample should be drawn is an open question.
pub fn resample(frame_to_box: &HashMap<u32, BBox>, fps_ratio: f64) -> Result<DisplayTrajectory, Error> {
    if frame_to_box.is_empty() {
        return Err(Error::invalid("cannot resample an empty trajectory"));
    }

    if !fps_ratio.is_finite() || fps_ratio <= 0.0 {
        return Err(Error::invalid(format!(
            "fps ratio must be positive, got {}",
            fps_ratio
        )));
    }

    let mut samples: Vec<(u32, &BBox)> = frame_to_box.iter().map(|(k, v)| (*k, v)).collect();
    samples.sort_unstable_by_key(|(k, _)| *k);

    let mut out = DisplayTrajectory::new();

    let (first_idx, first_box) = samples[0];
    if samples.len() == 1 {
        out.push((display_index(first_idx, fps_ratio), *first_box));
        return Ok(out);
    }

    for pair in samples.windows(2) {
        let (i_prev, b_prev) = pair[0];
        let (i_next, b_next) = pair[1];
        let d_prev = display_index(i_prev, fps_ratio);
        let d_next = display_index(i_next, fps_ratio);

        // samples collapsing onto one display frame keep the earliest
        if out.last().map_or(true, |(last, _)| *last < d_prev) {
            out.push((d_prev, *b_prev));
        }

        let num = (d_next - d_prev).max(0) as u64;
        for d in (d_prev + 1)..d_next {
            out.push((d, interpolate(b_prev, b_next, (d - d_prev) as u64, num)));
        }
    }

    Ok(out)
}
