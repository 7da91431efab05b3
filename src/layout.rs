//! Page geometry: lengths, page sizes, margins and the content frame

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from centimeters
    pub fn from_cm(cm: f64) -> Self {
        Length(cm * 10.0)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 25.4)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f32 {
        (self.0 * 72.0 / 25.4) as f32
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: Length::from_mm(210.0),
            height: Length::from_mm(297.0),
        }
    }
}

impl Default for PageDimensions {
    fn default() -> Self {
        Self::a4()
    }
}

/// Margins for page content
#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub top: Length,
    pub bottom: Length,
    pub left: Length,
    pub right: Length,
}

impl Margins {
    /// Create margins with same value on all sides
    pub fn uniform(margin: Length) -> Self {
        Self {
            top: margin,
            bottom: margin,
            left: margin,
            right: margin,
        }
    }

    /// Standard 1-inch margins on all sides
    pub fn standard() -> Self {
        Self::uniform(Length::from_inches(1.0))
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::standard()
    }
}

/// Inner padding applied on every side of the content frame, in points
pub const FRAME_PADDING: f32 = 6.0;

/// The single rectangle content flows into on every page.
///
/// Coordinates are in points with the origin at the bottom-left of the page.
/// `x`/`y`/`width`/`height` describe the usable area after padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    /// Top edge of the usable area
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Calculate the content frame for a page
///
/// The frame sits inside the margins and is shrunk by [`FRAME_PADDING`] on each side.
pub fn content_frame(page: &PageDimensions, margins: &Margins) -> Frame {
    let x = margins.left.pt() + FRAME_PADDING;
    let y = margins.bottom.pt() + FRAME_PADDING;
    let width = page.width.pt() - margins.left.pt() - margins.right.pt() - 2.0 * FRAME_PADDING;
    let height = page.height.pt() - margins.top.pt() - margins.bottom.pt() - 2.0 * FRAME_PADDING;

    Frame { x, y, width, height }
}
