//! Page layout: fit an image inside the margins and center it

use pdf_core::PageSize;

/// Margin on every side, in points
pub const DEFAULT_MARGIN: f64 = 50.0;

/// Where and how large an image is drawn, in PDF points
///
/// `x`/`y` are the lower-left corner measured from the page's lower-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Page geometry shared by every page of a document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page: PageSize,
    pub margin: f64,
}

impl PageLayout {
    pub fn new(page: PageSize, margin: f64) -> Self {
        Self { page, margin }
    }

    /// Width left between the left and right margins
    pub fn available_width(&self) -> f64 {
        self.page.width - 2.0 * self.margin
    }

    /// Height left between the top and bottom margins
    pub fn available_height(&self) -> f64 {
        self.page.height - 2.0 * self.margin
    }

    /// Scale a `width` x `height` pixel image to fit the drawable area
    ///
    /// The scale is the smaller of the two fit ratios and is not capped at
    /// 1.0, so small images grow until one side touches the margins.
    pub fn fit(&self, width: u32, height: u32) -> Placement {
        let width = width as f64;
        let height = height as f64;

        let width_ratio = self.available_width() / width;
        let height_ratio = self.available_height() / height;
        let scale = width_ratio.min(height_ratio);

        let final_width = width * scale;
        let final_height = height * scale;

        Placement {
            scale,
            x: (self.page.width - final_width) / 2.0,
            y: (self.page.height - final_height) / 2.0,
            width: final_width,
            height: final_height,
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::new(PageSize::A4, DEFAULT_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_centered(layout: &PageLayout, p: &Placement) {
        assert_close(p.x + p.width / 2.0, layout.page.width / 2.0);
        assert_close(p.y + p.height / 2.0, layout.page.height / 2.0);
    }

    #[test]
    fn test_available_area_a4() {
        let layout = PageLayout::default();
        assert_close(layout.available_width(), 495.2755905511812);
        assert_close(layout.available_height(), 741.8897637795277);
    }

    #[test]
    fn test_wide_image_is_width_limited() {
        let layout = PageLayout::default();
        let p = layout.fit(100, 50);

        assert_close(p.scale, layout.available_width() / 100.0);
        assert_close(p.width, layout.available_width());
        assert_close(p.height, layout.available_width() / 2.0);
        assert_close(p.x, DEFAULT_MARGIN);
        assert_centered(&layout, &p);
    }

    #[test]
    fn test_tall_image_is_height_limited() {
        let layout = PageLayout::default();
        let p = layout.fit(300, 2000);

        assert_close(p.scale, layout.available_height() / 2000.0);
        assert_close(p.height, layout.available_height());
        assert_close(p.y, DEFAULT_MARGIN);
        assert_centered(&layout, &p);
    }

    #[test]
    fn test_small_image_scales_up() {
        let layout = PageLayout::new(PageSize::new(300.0, 300.0), 50.0);
        let p = layout.fit(10, 20);

        assert_close(p.scale, 10.0);
        assert_close(p.width, 100.0);
        assert_close(p.height, 200.0);
        assert_close(p.x, 100.0);
        assert_close(p.y, 50.0);
    }

    #[test]
    fn test_exact_fit_has_unit_scale() {
        let layout = PageLayout::new(PageSize::new(600.0, 800.0), 50.0);
        let p = layout.fit(500, 700);

        assert_close(p.scale, 1.0);
        assert_close(p.x, 50.0);
        assert_close(p.y, 50.0);
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let layout = PageLayout::new(PageSize::LETTER.landscape(), 36.0);
        for (w, h) in [(1, 1), (4000, 3), (3, 4000), (1920, 1080), (17, 23)] {
            let p = layout.fit(w, h);
            let expected = w as f64 / h as f64;
            assert!(((p.width / p.height) - expected).abs() / expected < 1e-12);
            assert!(p.width <= layout.available_width() + EPSILON);
            assert!(p.height <= layout.available_height() + EPSILON);
            assert_centered(&layout, &p);
        }
    }

    #[test]
    fn test_zero_margin_fills_page_edge() {
        let layout = PageLayout::new(PageSize::new(200.0, 100.0), 0.0);
        let p = layout.fit(50, 50);

        assert_close(p.height, 100.0);
        assert_close(p.x, 50.0);
        assert_close(p.y, 0.0);
    }
}
