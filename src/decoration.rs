//! Overlays repeated on every page, outside the normal flow of elements.

use crate::image::ImageHandle;
use crate::layout::ContentArea;
use crate::page::{ImageLayout, Page};
use crate::rect::Rect;
use crate::transform::Transform;
use crate::units::Pt;

/// Watermarks are painted at roughly 25% opacity
pub const WATERMARK_ALPHA: u8 = 65;
/// Where the watermark's top-left corner sits, as fractions of the content
/// width and height measured from the top-left corner of the page
const WATERMARK_ANCHOR: (f32, f32) = (0.1, 0.7);
/// Watermarks rise at 45° from left to right
const WATERMARK_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

const SIGN_WIDTH: Pt = Pt(150.0);
const SIGN_HEIGHT: Pt = Pt(30.0);
/// Gap between the sign and the right edge of the page
const SIGN_INSET: Pt = Pt(10.0);

/// The images drawn on every page as soon as it is opened
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Decorations {
    pub watermark: Option<ImageHandle>,
    pub sign: Option<ImageHandle>,
}

impl Decorations {
    /// Draw the watermark and sign (whichever are set) onto a freshly opened page.
    /// Neither affects where elements are placed.
    pub fn apply(&self, page: &mut Page, area: &ContentArea) {
        if let Some(layout) = self.watermark.and_then(|w| watermark_layout(w, area)) {
            page.add_image(layout);
        }
        if let Some(sign) = self.sign {
            page.add_image(sign_layout(sign, area));
        }
    }
}

/// The watermark scaled to fit inside the content area, turned 45° and drawn
/// translucent. Images without any pixels are skipped.
pub fn watermark_layout(image: ImageHandle, area: &ContentArea) -> Option<ImageLayout> {
    if image.width == 0 || image.height == 0 {
        return None;
    }
    let scale = (*area.content_width / image.width as f32)
        .min(*area.content_height / image.height as f32);
    let width = image.width as f32 * scale;
    let height = image.height as f32 * scale;

    let anchor_x = *area.content_width * WATERMARK_ANCHOR.0;
    let anchor_y = *area.page_height - *area.content_height * WATERMARK_ANCHOR.1;
    // the image's bottom-left corner lies one rotated image-height below its top-left
    let (sin, cos) = WATERMARK_ANGLE.sin_cos();
    let origin_x = anchor_x + height * sin;
    let origin_y = anchor_y - height * cos;

    Some(ImageLayout {
        image: image.id,
        transform: Transform::scale(width, height)
            .then(Transform::rotate(WATERMARK_ANGLE))
            .with_translate(Pt(origin_x), Pt(origin_y)),
        alpha: WATERMARK_ALPHA,
    })
}

/// The sign squeezed into a fixed 150×30 box in the bottom-right corner of the page
pub fn sign_layout(image: ImageHandle, area: &ContentArea) -> ImageLayout {
    let rect = Rect::from_top_left(
        area.page_width - SIGN_WIDTH - SIGN_INSET,
        area.page_height - SIGN_HEIGHT,
        SIGN_WIDTH,
        SIGN_HEIGHT,
        area.page_height,
    );
    ImageLayout {
        image: image.id,
        transform: Transform::fit(&rect),
        alpha: u8::MAX,
    }
}
