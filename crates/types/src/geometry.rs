use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Page geometry in PDF points, with one uniform margin on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFormat {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageFormat {
    /// A4 portrait with a 40pt margin.
    fn default() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin: 40.0,
        }
    }
}

impl PageFormat {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The area inside the margins.
    pub fn content_size(&self) -> Size {
        Size::new(
            (self.width - 2.0 * self.margin).max(0.0),
            (self.height - 2.0 * self.margin).max(0.0),
        )
    }
}
