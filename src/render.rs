use crate::bbox::{BBox, PixelBox};
use crate::error::Error;
use crate::icons::IconSet;
use crate::index::{Annotation, AnnotationIndex, HudState};
use crate::label::Label;
use crate::FrameIdx;

/// Input resolution of the trash detector
pub const DETECTION_SIZE: (u32, u32) = (1024, 768);

/// Colour in blue-green-red order
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
}

pub trait Bitmap {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
}

/// Image buffer the renderer draws into in place
pub trait Canvas {
    type Bitmap: Bitmap;

    fn fill_rect(&mut self, rect: PixelBox, color: Color) -> Result<(), Error>;

    fn outline_rect(&mut self, rect: PixelBox, color: Color, thickness: i32) -> Result<(), Error>;

    /// Alpha-composites `bitmap` with its top-left corner at `(x, y)`,
    /// clipping whatever falls outside the canvas
    fn blend(&mut self, bitmap: &Self::Bitmap, x: i32, y: i32) -> Result<(), Error>;

    /// `(x, y)` is the bottom-left corner of the text
    fn put_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        scale: f64,
        color: Color,
        thickness: i32,
    ) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct Style {
    pub color: Color,
    pub thickness: i32,
    pub update_thickness: i32,
    pub font_scale: f64,
    pub hud_panel: PixelBox,
    pub hud_background: Color,
    /// top-left corner of each label icon, in `Label::ALL` order
    pub hud_icons: [(i32, i32); Label::COUNT],
    /// bottom-left corner of each count
    pub hud_counts: [(i32, i32); Label::COUNT],
    pub box_thickness: i32,
    /// pixels between a box icon and the box top edge
    pub icon_gap: i32,
    pub detection_size: (u32, u32),
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Color(238, 221, 192),
            thickness: 2,
            update_thickness: 3,
            font_scale: 1.0,
            hud_panel: PixelBox::new(30, 30, 200, 200),
            hud_background: Color::BLACK,
            hud_icons: [(65, 40), (60, 95), (60, 150)],
            hud_counts: [(110, 75), (110, 125), (110, 175)],
            box_thickness: 2,
            icon_gap: 5,
            detection_size: DETECTION_SIZE,
        }
    }
}

/// Maps a detector box onto a `video_w` x `video_h` frame.
#[inline]
pub fn scale_box(bbox: &BBox, video_w: u32, video_h: u32, det_w: u32, det_h: u32) -> PixelBox {
    bbox.scale((video_w, video_h), (det_w, det_h))
}

/// Burns annotations into frames of one video
pub struct Renderer<'a, B> {
    icons: &'a IconSet<B>,
    style: Style,
    video_size: (u32, u32),
}

impl<'a, B: Bitmap> Renderer<'a, B> {
    pub fn new(icons: &'a IconSet<B>, video_w: u32, video_h: u32) -> Self {
        Self::with_style(icons, Style::default(), video_w, video_h)
    }

    pub fn with_style(icons: &'a IconSet<B>, style: Style, video_w: u32, video_h: u32) -> Self {
        Self {
            icons,
            style,
            video_size: (video_w, video_h),
        }
    }

    #[inline]
    pub fn style(&self) -> &Style {
        &self.style
    }

    #[inline]
    pub fn scale(&self, bbox: &BBox) -> PixelBox {
        bbox.scale(self.video_size, self.style.detection_size)
    }

    pub fn draw_hud<C>(&self, canvas: &mut C, hud: &HudState) -> Result<(), Error>
    where
        C: Canvas<Bitmap = B>,
    {
        let style = &self.style;
        canvas.fill_rect(style.hud_panel, style.hud_background)?;

        let thickness = if hud.just_updated {
            style.update_thickness
        } else {
            style.thickness
        };

        for label in Label::ALL {
            let (ix, iy) = style.hud_icons[label.index()];
            canvas.blend(self.icons.get(label), ix, iy)?;

            let (tx, ty) = style.hud_counts[label.index()];
            canvas.put_text(
                &hud.counts[label].to_string(),
                tx,
                ty,
                style.font_scale,
                style.color,
                thickness,
            )?;
        }

        Ok(())
    }

    pub fn draw_boxes<C>(&self, canvas: &mut C, boxes: &[Annotation]) -> Result<(), Error>
    where
        C: Canvas<Bitmap = B>,
    {
        for ann in boxes {
            let rect = self.scale(&ann.bbox);
            let icon = self.icons.get(ann.label);

            canvas.blend(icon, rect.x1, rect.y1 - icon.height() - self.style.icon_gap)?;
            canvas.outline_rect(rect, self.style.color, self.style.box_thickness)?;
        }

        Ok(())
    }

    /// Draws the boxes visible on `frame` and then the HUD.
    pub fn draw_frame<C>(
        &self,
        canvas: &mut C,
        index: &AnnotationIndex,
        frame: FrameIdx,
    ) -> Result<(), Error>
    where
        C: Canvas<Bitmap = B>,
    {
        self.draw_boxes(canvas, index.boxes_at(frame))?;
        self.draw_hud(canvas, &index.hud_at(frame))
    }
}
