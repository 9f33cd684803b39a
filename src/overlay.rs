//! Preview overlay management on top of a host renderer.
use crate::*;
use std::error::Error;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// Visual style of the preview polyline.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    pub weight: f32,
    /// RGBA.
    pub color: [u8; 4],
}

impl Default for Style {
    fn default() -> Self {
        Self {
            weight: 3.0,
            color: [255, 0, 128, 100],
        }
    }
}

/// A host viewport that can draw and remove polylines.
pub trait OverlaySink {
    /// Identifies a drawn polyline so it can be removed.
    type Handle;

    fn draw(&mut self, polyline: &Polyline3, style: &Style) -> Result<Self::Handle>;

    fn remove(&mut self, handle: &Self::Handle) -> Result<()>;
}

/// Keeps at most one preview polyline drawn on a sink.
///
/// Sink failures are logged and swallowed. If the previous polyline cannot be removed it is
/// retained for another attempt and nothing new is drawn.
pub struct Overlay<S: OverlaySink> {
    sink: S,
    style: Style,
    current: Option<S::Handle>,
}

impl<S: OverlaySink> Overlay<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            style: Style::default(),
            current: None,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Returns if a polyline is currently drawn.
    pub fn is_drawn(&self) -> bool {
        self.current.is_some()
    }

    /// Replace the drawn polyline with one through `points`.
    ///
    /// Fewer than 2 points only clears. Returns if a new polyline was drawn.
    pub fn show(&mut self, points: &[Point3]) -> bool {
        if !self.clear() {
            return false;
        }

        let polyline = match Polyline3::new(points.iter().copied()) {
            Ok(x) => x,
            Err(_) => return false,
        };

        match self.sink.draw(&polyline, &self.style) {
            Ok(h) => {
                self.current = Some(h);
                true
            }
            Err(e) => {
                log::error!("failed to draw preview overlay: {}", e);
                false
            }
        }
    }

    /// Remove the drawn polyline, if any. Returns `false` if removal failed.
    pub fn clear(&mut self) -> bool {
        if let Some(h) = self.current.take() {
            if let Err(e) = self.sink.remove(&h) {
                log::error!("failed to remove preview overlay: {}", e);
                self.current = Some(h);
                return false;
            }
            log::debug!("removed existing overlay");
        }

        true
    }
}
