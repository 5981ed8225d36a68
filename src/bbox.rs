use serde_derive::{Deserialize, Serialize};

/// Left-top-right-bottom box in detector pixel space
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct BBox([f32; 4]);

impl From<BBox> for [f32; 4] {
    fn from(bbox: BBox) -> Self {
        bbox.0
    }
}

impl From<[f32; 4]> for BBox {
    fn from(slice: [f32; 4]) -> Self {
        BBox(slice)
    }
}

impl BBox {
    #[inline]
    pub fn ltrb(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        BBox([x1, y1, x2, y2])
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32; 4] {
        &self.0
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.0[3]
    }

    /// Point `i` of `num` on the straight line from `self` to `other`.
    ///
    /// `i == 0` yields `self` and `i == num` yields `other` bit-for-bit.
    pub fn lerp(&self, other: &BBox, i: u64, num: u64) -> BBox {
        let mut out = [0.0f32; 4];

        for (o, (a, b)) in out.iter_mut().zip(self.0.iter().zip(other.0.iter())) {
            let (a, b) = (*a as f64, *b as f64);
            *o = (a + (b - a) * i as f64 / num as f64) as f32;
        }

        BBox(out)
    }

    /// Maps the box from a `src` sized image onto a `dst` sized one.
    ///
    /// Coordinates are truncated to whole pixels first, then each axis is
    /// scaled on its own and floored. No aspect ratio correction is made.
    pub fn scale(&self, dst: (u32, u32), src: (u32, u32)) -> PixelBox {
        let sx = dst.0 as f64 / src.0 as f64;
        let sy = dst.1 as f64 / src.1 as f64;
        let px = |v: f32, s: f64| ((v as i64) as f64 * s).floor() as i32;

        PixelBox {
            x1: px(self.0[0], sx),
            y1: px(self.0[1], sy),
            x2: px(self.0[2], sx),
            y2: px(self.0[3], sy),
        }
    }
}

/// Box in display pixel space
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl PixelBox {
    #[inline]
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }
}
