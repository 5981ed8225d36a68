use std::collections::BTreeMap;

use crate::bbox::BBox;
use crate::error::Error;
use crate::label::{Counts, Label};
use crate::resample;
use crate::tracking::TrackingResult;
use crate::FrameIdx;

/// A box to draw on a display frame
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Annotation {
    pub bbox: BBox,
    pub label: Label,
}

/// Effective HUD counts for a display frame
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct HudState {
    pub counts: Counts,
    /// set when a count changed on exactly this frame
    pub just_updated: bool,
}

/// Per-display-frame lookup tables built from a tracking result
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnnotationIndex {
    boxes: BTreeMap<FrameIdx, Vec<Annotation>>,
    hud: BTreeMap<FrameIdx, Counts>,
}

impl AnnotationIndex {
    /// Resamples every tracked object onto `display_fps` and groups the
    /// result by display frame.
    ///
    /// HUD snapshots are threaded through the objects in input order, so a
    /// later object that appears earlier on screen still counts on top of
    /// all objects listed before it.
    // NOTE: counting in input order rather than time order is inherited from
    // the shipped visualisation and left open for the product owners.
    pub fn process(result: &TrackingResult, display_fps: f64) -> Result<Self, Error> {
        if !display_fps.is_finite() || display_fps <= 0.0 {
            return Err(Error::invalid(format!(
                "display fps must be positive, got {}",
                display_fps
            )));
        }

        let fps_ratio = display_fps / result.fps;
        let mut index = AnnotationIndex::default();
        let mut running = Counts::default();

        for obj in &result.detected_trash {
            let traj = resample::resample(&obj.frame_to_box, fps_ratio).map_err(|err| match err {
                Error::InvalidInput(msg) => {
                    Error::InvalidInput(format!("tracked object {}: {}", obj.id, msg))
                }
                err => err,
            })?;

            // resample never returns an empty trajectory
            let d0 = traj[0].0;

            log::debug!(
                "object {} ({}): {} samples -> frames {}..={}",
                obj.id,
                obj.label,
                obj.len(),
                d0,
                traj[traj.len() - 1].0
            );

            for (d, bbox) in traj {
                index.boxes.entry(d).or_default().push(Annotation {
                    bbox,
                    label: obj.label,
                });
            }

            running = running.incremented(obj.label);
            index.hud.insert(d0, running);
        }

        log::info!(
            "annotation index: {} objects, {} frames with boxes, {} hud updates (ratio {:.3})",
            result.detected_trash.len(),
            index.boxes.len(),
            index.hud.len(),
            fps_ratio
        );

        Ok(index)
    }

    /// Boxes visible on exactly `frame`.
    #[inline]
    pub fn boxes_at(&self, frame: FrameIdx) -> &[Annotation] {
        self.boxes.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// HUD state in effect on `frame`, carried forward from the last update.
    pub fn hud_at(&self, frame: FrameIdx) -> HudState {
        if let Some(counts) = self.hud.get(&frame) {
            return HudState {
                counts: *counts,
                just_updated: true,
            };
        }

        self.hud
            .range(..=frame)
            .next_back()
            .map(|(_, counts)| HudState {
                counts: *counts,
                just_updated: false,
            })
            .unwrap_or_default()
    }

    /// Display frames that carry at least one box, ascending
    pub fn frames(&self) -> impl DoubleEndedIterator<Item = FrameIdx> + '_ {
        self.boxes.keys().copied()
    }

    /// HUD snapshots in frame order
    pub fn hud_updates(&self) -> impl Iterator<Item = (FrameIdx, &Counts)> + '_ {
        self.hud.iter().map(|(k, v)| (*k, v))
    }

    /// Counts shown once every object has appeared
    pub fn final_counts(&self) -> Counts {
        self.hud.values().next_back().copied().unwrap_or_default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn with_hud(hud: BTreeMap<FrameIdx, Counts>) -> Self {
        Self {
            boxes: BTreeMap::new(),
            hud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::TrackedObject;

    fn object(id: u64, label: Label, samples: &[(u32, [f32; 4])]) -> TrackedObject {
        TrackedObject::new(
            id,
            label,
            samples.iter().map(|(k, b)| (*k, BBox::from(*b))).collect(),
        )
    }

    fn fragment_result() -> TrackingResult {
        TrackingResult::new(
            4.0,
            vec![object(
                195,
                Label::Fragment,
                &[
                    (212, [704.64, 478.08, 768., 514.56]),
                    (213, [721.92, 476., 789., 510.]),
                ],
            )],
        )
    }

    #[test]
    fn single_fragment_end_to_end() {
        let index = AnnotationIndex::process(&fragment_result(), 30.0).unwrap();

        let boxes = index.boxes_at(1590);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].label, Label::Fragment);
        assert_eq!(index.boxes_at(1592).len(), 1);
        assert!(index.boxes_at(1597).is_empty());

        let hud = index.hud_at(1590);
        assert!(hud.just_updated);
        assert_eq!(hud.counts, Counts::from([0, 1, 0]));
    }

    #[test]
    fn ntsc_display_rate_keeps_full_precision() {
        let result = TrackingResult::new(
            3.0,
            vec![object(
                1,
                Label::Bottle,
                &[(100, [10., 10., 20., 20.]), (200, [30., 30., 40., 40.])],
            )],
        );
        let index = AnnotationIndex::process(&result, 29.97).unwrap();

        assert_eq!(index.boxes_at(999).len(), 1);
        assert!(index.boxes_at(998).is_empty());
        assert!(index.hud_at(999).just_updated);
        assert_eq!(index.frames().next_back(), Some(1997));
    }

    #[test]
    fn hud_carries_forward() {
        let mut hud = BTreeMap::new();
        hud.insert(0, Counts::from([1, 0, 0]));
        hud.insert(100, Counts::from([2, 0, 0]));
        let index = AnnotationIndex::with_hud(hud);

        assert_eq!(
            index.hud_at(50),
            HudState {
                counts: Counts::from([1, 0, 0]),
                just_updated: false
            }
        );
        assert_eq!(
            index.hud_at(100),
            HudState {
                counts: Counts::from([2, 0, 0]),
                just_updated: true
            }
        );
        assert_eq!(index.hud_at(-1), HudState::default());
        assert_eq!(index.hud_at(5000).counts, Counts::from([2, 0, 0]));
    }

    #[test]
    fn hud_below_first_update_is_zero() {
        let index = AnnotationIndex::process(&fragment_result(), 30.0).unwrap();

        assert_eq!(index.hud_at(0), HudState::default());
        assert_eq!(index.hud_at(1589), HudState::default());
        assert!(!index.hud_at(1591).just_updated);
    }

    #[test]
    fn process_is_deterministic() {
        let result = TrackingResult::new(
            4.0,
            vec![
                object(1, Label::Bottle, &[(0, [0.; 4]), (3, [30.; 4]), (1, [10.; 4])]),
                object(2, Label::Other, &[(2, [5.; 4]), (6, [9.; 4])]),
                object(3, Label::Bottle, &[(4, [1.; 4])]),
            ],
        );

        let a = AnnotationIndex::process(&result, 25.0).unwrap();
        let b = AnnotationIndex::process(&result, 25.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tables_follow_trajectories() {
        let result = TrackingResult::new(
            1.0,
            vec![
                object(1, Label::Bottle, &[(0, [0.; 4]), (2, [2.; 4])]),
                object(2, Label::Other, &[(1, [5.; 4]), (3, [9.; 4])]),
            ],
        );
        let index = AnnotationIndex::process(&result, 2.0).unwrap();

        assert_eq!(index.frames().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(index.boxes_at(2).len(), 2);
        assert_eq!(index.boxes_at(2)[0].label, Label::Bottle);
        assert_eq!(index.boxes_at(2)[1].label, Label::Other);
        assert_eq!(
            index.hud_updates().map(|(k, _)| k).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert_eq!(index.final_counts(), Counts::from([1, 0, 1]));
    }

    #[test]
    fn counts_are_monotonic_for_time_ordered_input() {
        let result = TrackingResult::new(
            2.0,
            vec![
                object(1, Label::Fragment, &[(0, [0.; 4]), (4, [1.; 4])]),
                object(2, Label::Bottle, &[(3, [0.; 4])]),
                object(3, Label::Fragment, &[(7, [0.; 4]), (9, [1.; 4])]),
                object(4, Label::Other, &[(12, [0.; 4])]),
            ],
        );
        let index = AnnotationIndex::process(&result, 30.0).unwrap();
        let updates: Vec<_> = index.hud_updates().map(|(_, c)| *c).collect();

        assert_eq!(updates.len(), 4);
        for w in updates.windows(2) {
            for label in Label::ALL {
                assert!(w[1][label] >= w[0][label]);
            }
        }
        assert_eq!(index.final_counts(), Counts::from([1, 2, 1]));
    }

    #[test]
    fn counts_follow_input_order_not_time_order() {
        // open question: an object listed later but seen earlier is counted last
        let result = TrackingResult::new(
            1.0,
            vec![
                object(1, Label::Bottle, &[(10, [0.; 4])]),
                object(2, Label::Other, &[(0, [0.; 4])]),
            ],
        );
        let index = AnnotationIndex::process(&result, 1.0).unwrap();

        assert_eq!(index.hud_at(0).counts, Counts::from([1, 0, 1]));
        assert_eq!(index.hud_at(10).counts, Counts::from([1, 0, 0]));
    }

    #[test]
    fn same_start_frame_keeps_latest_snapshot() {
        let result = TrackingResult::new(
            1.0,
            vec![
                object(1, Label::Bottle, &[(5, [0.; 4])]),
                object(2, Label::Bottle, &[(5, [1.; 4])]),
            ],
        );
        let index = AnnotationIndex::process(&result, 1.0).unwrap();

        assert_eq!(index.boxes_at(5).len(), 2);
        assert_eq!(index.hud_at(5).counts, Counts::from([2, 0, 0]));
        assert_eq!(index.hud_updates().count(), 1);
    }

    #[test]
    fn failed_build_reports_invalid_input() {
        let mut result = fragment_result();
        result
            .detected_trash
            .push(TrackedObject::new(9, Label::Other, Default::default()));

        assert!(matches!(
            AnnotationIndex::process(&result, 30.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            AnnotationIndex::process(&fragment_result(), 0.0),
            Err(Error::InvalidInput(_))
        ));
    }
}
