//! Geometry
//!
//! DOMRect and root margin resolution.

use lazyvid_core::PlatformError;

/// DOMRect - rectangle geometry, in document coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 { self.y }
    pub fn left(&self) -> f64 { self.x }
    pub fn right(&self) -> f64 { self.x + self.width }
    pub fn bottom(&self) -> f64 { self.y + self.height }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Intersection with another rect
    ///
    /// Edge-adjacent rects intersect with zero area.
    pub fn intersection(&self, other: &DOMRect) -> Option<DOMRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right >= x && bottom >= y {
            Some(DOMRect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Grow each edge outwards (negative values shrink)
    pub fn expand(&self, top: f64, right: f64, bottom: f64, left: f64) -> DOMRect {
        DOMRect {
            x: self.x - left,
            y: self.y - top,
            width: (self.width + left + right).max(0.0),
            height: (self.height + top + bottom).max(0.0),
        }
    }

    /// Move by an offset
    pub fn translate(&self, dx: f64, dy: f64) -> DOMRect {
        DOMRect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// A margin length
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    fn resolve(self, basis: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => basis * pct / 100.0,
        }
    }

    fn parse(token: &str) -> Option<Length> {
        if let Some(px) = token.strip_suffix("px") {
            return px.parse().ok().filter(|v: &f64| v.is_finite()).map(Length::Px);
        }
        if let Some(pct) = token.strip_suffix('%') {
            return pct.parse().ok().filter(|v: &f64| v.is_finite()).map(Length::Percent);
        }
        // Unitless zero only
        match token.parse::<f64>() {
            Ok(v) if v == 0.0 => Some(Length::Px(0.0)),
            _ => None,
        }
    }
}

/// Root margin in CSS shorthand order: top, right, bottom, left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::uniform(Length::Px(0.0))
    }
}

impl RootMargin {
    pub fn uniform(length: Length) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    /// Parse `"200px"`, `"10px 5%"`, `"1px 2px 3px"` or `"1px 2px 3px 4px"`
    pub fn parse(margin: &str) -> Result<Self, PlatformError> {
        let invalid = || PlatformError::InvalidRootMargin(margin.to_string());

        let lengths = margin
            .split_whitespace()
            .map(Length::parse)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        let (top, right, bottom, left) = match lengths[..] {
            [] => return Ok(Self::default()),
            [all] => (all, all, all, all),
            [vertical, horizontal] => (vertical, horizontal, vertical, horizontal),
            [top, horizontal, bottom] => (top, horizontal, bottom, horizontal),
            [top, right, bottom, left] => (top, right, bottom, left),
            _ => return Err(invalid()),
        };

        Ok(Self { top, right, bottom, left })
    }

    /// Grow `root` by this margin. Percentages resolve against the root size.
    pub fn apply(&self, root: DOMRect) -> DOMRect {
        root.expand(
            self.top.resolve(root.height),
            self.right.resolve(root.width),
            self.bottom.resolve(root.height),
            self.left.resolve(root.width),
        )
    }
}
