//! Geometry APIs
//!
//! DOMRect, the window viewport and the platform capability flags.

use std::collections::HashMap;

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Same rect moved by (-dx, -dy)
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::from_xywh(self.x - dx, self.y - dy, self.width, self.height)
    }

    /// Overlap with positive area
    pub fn overlaps(&self, other: &DOMRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Get intersection rect
    pub fn intersection(&self, other: &DOMRect) -> Option<DOMRect> {
        if !self.overlaps(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(DOMRect::from_xywh(x, y, right - x, bottom - y))
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Which optional platform primitives the host provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformFeatures {
    pub intersection_observer: bool,
    pub mutation_observer: bool,
}

impl Default for PlatformFeatures {
    fn default() -> Self {
        Self {
            intersection_observer: true,
            mutation_observer: true,
        }
    }
}

impl PlatformFeatures {
    /// A legacy host with neither observer
    pub fn none() -> Self {
        Self {
            intersection_observer: false,
            mutation_observer: false,
        }
    }
}

/// Window state visible to page scripts
#[derive(Debug, Clone, Default)]
pub struct Window {
    /// `innerWidth`; `None` when the host does not report it
    pub inner_width: Option<f64>,
    /// `innerHeight`; `None` when the host does not report it
    pub inner_height: Option<f64>,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub features: PlatformFeatures,
    /// Script-visible globals, JSON encoded
    globals: HashMap<String, String>,
}

impl Window {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            inner_width: Some(width),
            inner_height: Some(height),
            ..Self::default()
        }
    }

    /// Scroll to position
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll_x = x.max(0.0);
        self.scroll_y = y.max(0.0);
    }

    /// Scroll by amount
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll_to(self.scroll_x + dx, self.scroll_y + dy);
    }

    pub fn set_global(&mut self, name: &str, json: &str) {
        self.globals.insert(name.to_string(), json.to_string());
    }

    pub fn global(&self, name: &str) -> Option<&str> {
        self.globals.get(name).map(String::as_str)
    }
}
