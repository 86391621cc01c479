use crate::error::{ConfigError, Side};
use crate::pagesize::PageSize;
use crate::units::Pt;

/// Margins are the blank border left around the content area of every page.
/// Elements flow inside them; decorations such as a signature may sit outside.
/// They are also written to each page as its `ArtBox`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric<D: Into<Pt>>(vertical: D, horizontal: D) -> Margins {
        let (vertical, horizontal) = (vertical.into(), horizontal.into());
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::all(Pt(0.0))
    }

    fn sides(&self) -> [(Side, Pt); 4] {
        [
            (Side::Top, self.top),
            (Side::Right, self.right),
            (Side::Bottom, self.bottom),
            (Side::Left, self.left),
        ]
    }
}

/// The usable region of a page once margins are taken away.
///
/// Vertical offsets are measured downwards from the top edge of the page, the
/// way a layout cursor moves; horizontal offsets from the left edge.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ContentArea {
    pub page_width: Pt,
    pub page_height: Pt,
    pub content_width: Pt,
    pub content_height: Pt,
    /// Lowest offset content may reach: `page_height - margins.bottom`
    pub bottom: Pt,
    /// Right edge of the content: `page_width - margins.right`
    pub end: Pt,
    /// Left edge of the content; every element starts here
    pub origin_x: Pt,
    /// Top edge of the content; every page starts here
    pub origin_y: Pt,
}

impl ContentArea {
    /// Resolve a page size and margins, failing if any margin is negative (or
    /// not a number) or if the margins leave no room for content.
    pub fn resolve(size: PageSize, margins: &Margins) -> Result<ContentArea, ConfigError> {
        let (page_width, page_height) = size.dimensions();
        let valid_size = |v: Pt| v.is_finite() && v > Pt(0.0);
        if !valid_size(page_width) || !valid_size(page_height) {
            return Err(ConfigError::InvalidPageSize {
                width: *page_width,
                height: *page_height,
            });
        }

        for (side, value) in margins.sides() {
            if !value.is_finite() || value < Pt(0.0) {
                return Err(ConfigError::NegativeMargin { side, value: *value });
            }
        }

        let content_width = page_width - (margins.left + margins.right);
        let content_height = page_height - (margins.top + margins.bottom);
        if content_width <= Pt(0.0) || content_height <= Pt(0.0) {
            return Err(ConfigError::EmptyContentArea {
                width: *content_width,
                height: *content_height,
            });
        }

        Ok(ContentArea {
            page_width,
            page_height,
            content_width,
            content_height,
            bottom: page_height - margins.bottom,
            end: page_width - margins.right,
            origin_x: margins.left,
            origin_y: margins.top,
        })
    }

    pub fn page_size(&self) -> (Pt, Pt) {
        (self.page_width, self.page_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_constructors() {
        assert_eq!(
            Margins::symmetric(Pt(10.0), Pt(20.0)),
            Margins::trbl(Pt(10.0), Pt(20.0), Pt(10.0), Pt(20.0))
        );
        assert_eq!(Margins::all(Pt(3.0)).left, Pt(3.0));
        assert_eq!(Margins::empty(), Margins::default());
    }

    #[test]
    fn letter_with_fifty_point_margins() {
        let area = ContentArea::resolve(PageSize::UsLetter, &Margins::all(Pt(50.0))).unwrap();
        assert_eq!(area.content_width, Pt(512.0));
        assert_eq!(area.content_height, Pt(692.0));
        assert_eq!(area.bottom, Pt(742.0));
        assert_eq!(area.end, Pt(562.0));
        assert_eq!((area.origin_x, area.origin_y), (Pt(50.0), Pt(50.0)));
    }

    #[test]
    fn asymmetric_margins_resolve_each_edge() {
        let margins = Margins::trbl(Pt(10.0), Pt(20.0), Pt(30.0), Pt(40.0));
        let area = ContentArea::resolve(PageSize::A4, &margins).unwrap();
        assert_eq!(area.content_width, Pt(595.0 - 60.0));
        assert_eq!(area.content_height, Pt(842.0 - 40.0));
        assert_eq!(area.bottom, Pt(812.0));
        assert_eq!(area.end, Pt(575.0));
        assert_eq!((area.origin_x, area.origin_y), (Pt(40.0), Pt(10.0)));
    }

    #[test]
    fn margins_that_swallow_the_page_are_rejected() {
        let err = ContentArea::resolve(PageSize::UsLetter, &Margins::symmetric(Pt(10.0), Pt(306.0)))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyContentArea { .. }));

        let err = ContentArea::resolve(PageSize::UsLetter, &Margins::symmetric(Pt(400.0), Pt(0.0)))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyContentArea { .. }));
    }

    #[test]
    fn negative_margins_name_their_side() {
        let margins = Margins::trbl(Pt(0.0), Pt(0.0), Pt(-1.0), Pt(0.0));
        assert_eq!(
            ContentArea::resolve(PageSize::A4, &margins),
            Err(ConfigError::NegativeMargin {
                side: Side::Bottom,
                value: -1.0
            })
        );
        let margins = Margins::all(Pt(f32::NAN));
        assert!(ContentArea::resolve(PageSize::A4, &margins).is_err());
    }

    #[test]
    fn degenerate_custom_sizes_are_rejected() {
        let size = PageSize::Custom(Pt(0.0), Pt(100.0));
        assert!(matches!(
            ContentArea::resolve(size, &Margins::empty()),
            Err(ConfigError::InvalidPageSize { .. })
        ));
    }

    #[test]
    fn any_margins_inside_the_page_leave_positive_content() {
        let (w, h) = PageSize::UsLetter.dimensions();
        for step in 0..40 {
            let horizontal = Pt(step as f32 * 8.0);
            let vertical = Pt(step as f32 * 10.5);
            let fits = horizontal * 2.0 < w && vertical * 2.0 < h;
            let resolved = ContentArea::resolve(
                PageSize::UsLetter,
                &Margins::symmetric(vertical, horizontal),
            );
            assert_eq!(resolved.is_ok(), fits, "step {step}");
            if let Ok(area) = resolved {
                assert!(area.content_width > Pt(0.0));
                assert!(area.content_height > Pt(0.0));
            }
        }
    }
}
