pub mod bbox;
pub mod canvas;
pub mod error;
pub mod icons;
pub mod index;
pub mod label;
pub mod render;
pub mod resample;
pub mod tracking;

pub use bbox::{BBox, PixelBox};
pub use icons::{IconConfig, IconSet};
pub use index::{Annotation, AnnotationIndex, HudState};
pub use label::{Counts, Label};
pub use render::{Canvas, Renderer, Style};
pub use tracking::{TrackedObject, TrackingResult};

use error::Error;

/// Display frame index; signed so that lookups before the first frame are valid
pub type FrameIdx = i64;

/// Builds the per-frame lookup tables for a video played at `display_fps`.
#[inline]
pub fn process(result: &TrackingResult, display_fps: f64) -> Result<AnnotationIndex, Error> {
    AnnotationIndex::process(result, display_fps)
}

/// Everything needed to annotate the frames of one video
pub struct VideoVisu<'a, B> {
    index: AnnotationIndex,
    renderer: Renderer<'a, B>,
}

impl<'a, B: render::Bitmap> VideoVisu<'a, B> {
    pub fn new(
        result: &TrackingResult,
        icons: &'a IconSet<B>,
        video_w: u32,
        video_h: u32,
        video_fps: f64,
    ) -> Result<Self, Error> {
        Self::with_style(result, icons, Style::default(), video_w, video_h, video_fps)
    }

    pub fn with_style(
        result: &TrackingResult,
        icons: &'a IconSet<B>,
        style: Style,
        video_w: u32,
        video_h: u32,
        video_fps: f64,
    ) -> Result<Self, Error> {
        Ok(Self {
            index: AnnotationIndex::process(result, video_fps)?,
            renderer: Renderer::with_style(icons, style, video_w, video_h),
        })
    }

    #[inline]
    pub fn index(&self) -> &AnnotationIndex {
        &self.index
    }

    #[inline]
    pub fn renderer(&self) -> &Renderer<'a, B> {
        &self.renderer
    }

    /// Annotates `canvas`, the decoded frame number `frame`, in place.
    #[inline]
    pub fn draw_frame<C>(&self, canvas: &mut C, frame: FrameIdx) -> Result<(), Error>
    where
        C: Canvas<Bitmap = B>,
    {
        self.renderer.draw_frame(canvas, &self.index, frame)
    }
}
