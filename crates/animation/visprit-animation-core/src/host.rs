//! Contracts with the host environment.
//!
//! The core never reads a page itself. Element geometry and live computed
//! styles come in through [`ElementProbe`]; scroll state comes in as
//! [`ScrollSample`] values. Results go back out as plain data
//! ([`crate::Cycle`], [`crate::Playback`]) for the host to play.

use serde::{Deserialize, Serialize};

/// Bounding box relative to the viewport, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub height: f64,
    #[serde(default)]
    pub width: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// One scroll notification: the current scroll offset plus the offset seen at
/// the previous notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollSample {
    pub scroll_y: f64,
    pub previous_scroll_y: f64,
    pub viewport: Viewport,
}

/// Read-only view of one element.
pub trait ElementProbe {
    fn bounding_rect(&self) -> Rect;

    fn offset_height(&self) -> f64 {
        self.bounding_rect().height
    }

    /// Live computed transform; `None` for the identity (`none`).
    fn computed_transform(&self) -> Option<String>;

    fn computed_clip_path(&self) -> Option<String>;

    fn computed_opacity(&self) -> Option<f64>;

    /// Text content, used by the counter to validate its target.
    fn text_content(&self) -> Option<String> {
        None
    }

    /// Upper-case tag name (`P`, `H1`, ...).
    fn tag_name(&self) -> Option<String> {
        None
    }
}

/// Serializable snapshot of an element, taken by the host right before a call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    pub rect: Rect,
    #[serde(default)]
    pub offset_height: Option<f64>,
    #[serde(default)]
    pub transform: Option<String>,
    #[serde(default)]
    pub clip_path: Option<String>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl ElementSnapshot {
    /// Snapshot at rest: given geometry, no transform, fully opaque.
    pub fn at(top: f64, height: f64) -> Self {
        Self {
            rect: Rect {
                top,
                bottom: top + height,
                height,
                width: 0.0,
            },
            opacity: Some(1.0),
            ..Self::default()
        }
    }
}

impl ElementProbe for ElementSnapshot {
    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    fn offset_height(&self) -> f64 {
        self.offset_height.unwrap_or(self.rect.height)
    }

    fn computed_transform(&self) -> Option<String> {
        match self.transform.as_deref() {
            None | Some("none") | Some("") => None,
            Some(t) => Some(t.to_string()),
        }
    }

    fn computed_clip_path(&self) -> Option<String> {
        self.clip_path.clone()
    }

    fn computed_opacity(&self) -> Option<f64> {
        self.opacity
    }

    fn text_content(&self) -> Option<String> {
        self.text.clone()
    }

    fn tag_name(&self) -> Option<String> {
        self.tag.as_ref().map(|t| t.to_ascii_uppercase())
    }
}
