use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::bbox::BBox;
use crate::error::Error;
use crate::label::Label;

/// One tracked item: its boxes keyed by detection frame index
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackedObject {
    pub id: u64,
    pub label: Label,
    pub frame_to_box: HashMap<u32, BBox>,
}

impl TrackedObject {
    pub fn new(id: u64, label: Label, frame_to_box: HashMap<u32, BBox>) -> Self {
        Self {
            id,
            label,
            frame_to_box,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frame_to_box.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame_to_box.is_empty()
    }
}

/// Output of the upstream tracker
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackingResult {
    /// rate at which the tracker sampled the source video
    pub fps: f64,
    pub detected_trash: Vec<TrackedObject>,
}

impl TrackingResult {
    pub fn new(fps: f64, detected_trash: Vec<TrackedObject>) -> Self {
        Self {
            fps,
            detected_trash,
        }
    }

    pub fn from_json(src: &str) -> Result<Self, Error> {
        let result: Self = serde_json::from_str(src).map_err(Error::invalid)?;
        result.validate()?;
        Ok(result)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let result: Self = serde_json::from_reader(reader).map_err(Error::invalid)?;
        result.validate()?;
        Ok(result)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = std::fs::File::open(path.as_ref())?;
        let result = Self::from_reader(std::io::BufReader::new(file))?;

        log::info!(
            "loaded {} tracked objects from {:?} ({} fps)",
            result.detected_trash.len(),
            path.as_ref(),
            result.fps
        );

        Ok(result)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(Error::invalid(format!(
                "detection fps must be positive, got {}",
                self.fps
            )));
        }

        if let Some(obj) = self.detected_trash.iter().find(|o| o.is_empty()) {
            return Err(Error::invalid(format!(
                "tracked object {} has no boxes",
                obj.id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "detected_trash": [
            {
                "frame_to_box": {
                    "213": [721.92, 476.0, 789.0, 510.0],
                    "212": [704.64, 478.08, 768.0, 514.56]
                },
                "id": 195,
                "label": "fragments"
            }
        ],
        "fps": 4
    }"#;

    #[test]
    fn parses_tracker_output() {
        let result = TrackingResult::from_json(SAMPLE).unwrap();

        assert_eq!(result.fps, 4.0);
        assert_eq!(result.detected_trash.len(), 1);

        let obj = &result.detected_trash[0];
        assert_eq!(obj.id, 195);
        assert_eq!(obj.label, Label::Fragment);
        assert_eq!(obj.len(), 2);
        assert_eq!(
            obj.frame_to_box[&212],
            BBox::ltrb(704.64, 478.08, 768., 514.56)
        );
        assert_eq!(obj.frame_to_box[&213], BBox::ltrb(721.92, 476., 789., 510.));
    }

    #[test]
    fn rejects_malformed_box() {
        let src = r#"{"detected_trash": [{"frame_to_box": {"1": [1.0, 2.0]}, "id": 1, "label": "bottles"}], "fps": 4}"#;

        assert!(matches!(
            TrackingResult::from_json(src),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_unknown_label() {
        let src = r#"{"detected_trash": [{"frame_to_box": {"1": [1, 2, 3, 4]}, "id": 1, "label": "cans"}], "fps": 4}"#;

        assert!(matches!(
            TrackingResult::from_json(src),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_bad_fps_and_empty_objects() {
        let zero_fps = r#"{"detected_trash": [], "fps": 0}"#;
        assert!(matches!(
            TrackingResult::from_json(zero_fps),
            Err(Error::InvalidInput(_))
        ));

        let empty = r#"{"detected_trash": [{"frame_to_box": {}, "id": 7, "label": "others"}], "fps": 4}"#;
        assert!(matches!(
            TrackingResult::from_json(empty),
            Err(Error::InvalidInput(_))
        ));
    }
}
