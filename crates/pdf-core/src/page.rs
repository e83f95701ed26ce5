//! Page geometry in PDF points

/// Points per inch
const INCH: f64 = 72.0;
/// Points per millimetre
const MM: f64 = INCH / 25.4;

/// Page size in points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A3 portrait (297 x 420 mm)
    pub const A3: PageSize = PageSize {
        width: 297.0 * MM,
        height: 420.0 * MM,
    };

    /// ISO A4 portrait (210 x 297 mm)
    pub const A4: PageSize = PageSize {
        width: 210.0 * MM,
        height: 297.0 * MM,
    };

    /// ISO A5 portrait (148 x 210 mm)
    pub const A5: PageSize = PageSize {
        width: 148.0 * MM,
        height: 210.0 * MM,
    };

    /// US Letter portrait (8.5 x 11 in)
    pub const LETTER: PageSize = PageSize {
        width: 8.5 * INCH,
        height: 11.0 * INCH,
    };

    /// US Legal portrait (8.5 x 14 in)
    pub const LEGAL: PageSize = PageSize {
        width: 8.5 * INCH,
        height: 14.0 * INCH,
    };

    /// Create a custom page size in points
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Look up a named preset (case-insensitive)
    ///
    /// Recognized names: `a3`, `a4`, `a5`, `letter`, `legal`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "a3" => Some(Self::A3),
            "a4" => Some(Self::A4),
            "a5" => Some(Self::A5),
            "letter" => Some(Self::LETTER),
            "legal" => Some(Self::LEGAL),
            _ => None,
        }
    }

    /// Same page rotated to landscape (width >= height)
    pub fn landscape(self) -> Self {
        if self.width >= self.height {
            self
        } else {
            Self {
                width: self.height,
                height: self.width,
            }
        }
    }

    /// Same page rotated to portrait (height >= width)
    pub fn portrait(self) -> Self {
        if self.height >= self.width {
            self
        } else {
            Self {
                width: self.height,
                height: self.width,
            }
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_a4_points() {
        assert!(approx(PageSize::A4.width, 595.2755905511812));
        assert!(approx(PageSize::A4.height, 841.8897637795277));
    }

    #[test]
    fn test_letter_points() {
        assert_eq!(PageSize::LETTER, PageSize::new(612.0, 792.0));
        assert_eq!(PageSize::LEGAL, PageSize::new(612.0, 1008.0));
    }

    #[test]
    fn test_default_is_a4() {
        assert_eq!(PageSize::default(), PageSize::A4);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(PageSize::from_name("A4"), Some(PageSize::A4));
        assert_eq!(PageSize::from_name(" letter "), Some(PageSize::LETTER));
        assert_eq!(PageSize::from_name("a5"), Some(PageSize::A5));
        assert_eq!(PageSize::from_name("tabloid"), None);
    }

    #[test]
    fn test_landscape_swaps_once() {
        let landscape = PageSize::A4.landscape();
        assert_eq!(landscape.width, PageSize::A4.height);
        assert_eq!(landscape.height, PageSize::A4.width);
        assert_eq!(landscape.landscape(), landscape);
        assert_eq!(landscape.portrait(), PageSize::A4);
    }
}
