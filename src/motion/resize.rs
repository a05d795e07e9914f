/// Sidebar width drag, in the same logical pixels as the pointer stream.
#[derive(Debug, Clone)]
pub struct SidebarResize {
    width: f64,
    min: f64,
    max: f64,
    drag: Option<(f64, f64)>,
}

impl SidebarResize {
    pub fn new(width: f64, min: f64, max: f64) -> Self {
        let max = max.max(min);
        SidebarResize {
            width: width.clamp(min, max),
            min,
            max,
            drag: None,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width.clamp(self.min, self.max);
    }

    pub fn begin(&mut self, x: f64) {
        self.drag = Some((x, self.width));
    }

    /// Returns the new width while a resize is active.
    pub fn drag_to(&mut self, x: f64) -> Option<f64> {
        let (start_x, start_width) = self.drag?;
        self.width = (start_width + (x - start_x)).clamp(self.min, self.max);
        Some(self.width)
    }

    /// Ends the resize and reports the final width.
    pub fn end(&mut self) -> Option<f64> {
        self.drag.take().map(|_| self.width)
    }

    pub fn is_active(&self) -> bool {
        self.drag.is_some()
    }
}
