//! OpenCV backed drawing: frames are BGR `CV_8UC3`, icons BGRA `CV_8UC4`.

use opencv::{
    core::{self, Mat, Vec3b, Vec4b},
    imgproc,
    prelude::*,
};

use crate::bbox::PixelBox;
use crate::error::Error;
use crate::render::{Bitmap, Canvas, Color};

#[inline]
fn scalar(color: Color) -> core::Scalar {
    core::Scalar::new(color.0 as f64, color.1 as f64, color.2 as f64, 0.0)
}

// corners inclusive, as with two-point rectangles
#[inline]
fn rect(b: PixelBox) -> core::Rect {
    core::Rect::new(b.x1, b.y1, b.width() + 1, b.height() + 1)
}

impl Bitmap for Mat {
    #[inline]
    fn width(&self) -> i32 {
        self.cols()
    }

    #[inline]
    fn height(&self) -> i32 {
        self.rows()
    }
}

impl Canvas for Mat {
    type Bitmap = Mat;

    fn fill_rect(&mut self, b: PixelBox, color: Color) -> Result<(), Error> {
        imgproc::rectangle(
            self,
            rect(b),
            scalar(color),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )?;

        Ok(())
    }

    fn outline_rect(&mut self, b: PixelBox, color: Color, thickness: i32) -> Result<(), Error> {
        imgproc::rectangle(
            self,
            rect(b),
            scalar(color),
            thickness,
            imgproc::LINE_8,
            0,
        )?;

        Ok(())
    }

    fn blend(&mut self, icon: &Mat, x: i32, y: i32) -> Result<(), Error> {
        let (rows, cols) = (self.rows(), self.cols());

        let (y0, y1) = (y.max(0), (y + icon.rows()).min(rows));
        let (x0, x1) = (x.max(0), (x + icon.cols()).min(cols));

        for row in y0..y1 {
            for col in x0..x1 {
                let over = *icon.at_2d::<Vec4b>(row - y, col - x)?;
                let px = self.at_2d_mut::<Vec3b>(row, col)?;

                let alpha = over[3] as f32 / 255.0;
                for ch in 0..3 {
                    px[ch] = (alpha * over[ch] as f32 + (1.0 - alpha) * px[ch] as f32) as u8;
                }
            }
        }

        Ok(())
    }

    fn put_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        scale: f64,
        color: Color,
        thickness: i32,
    ) -> Result<(), Error> {
        imgproc::put_text(
            self,
            text,
            core::Point::new(x, y),
            imgproc::FONT_HERSHEY_SIMPLEX,
            scale,
            scalar(color),
            thickness,
            imgproc::LINE_AA,
            false,
        )?;

        Ok(())
    }
}
