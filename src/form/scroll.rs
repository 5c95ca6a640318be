/// Horizontal scroll over the row of fields, in terminal columns.
///
/// Widths stay unknown until the first layout pass; until then the left
/// arrow is hidden and the right one shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    position: u16,
    step: u16,
    viewport: Option<u16>,
    content: Option<u16>,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> u16 {
        self.position
    }

    pub fn step(&self) -> u16 {
        self.step
    }

    pub fn set_viewport(&mut self, width: u16) {
        self.viewport = Some(width);
        self.step = width.div_ceil(2);
        self.clamp();
    }

    pub fn set_content(&mut self, width: u16) {
        self.content = Some(width);
        self.clamp();
    }

    pub fn left_hidden(&self) -> bool {
        self.position == 0
    }

    pub fn right_hidden(&self) -> bool {
        match (self.viewport, self.content) {
            (Some(viewport), Some(content)) => viewport.saturating_add(self.position) >= content,
            _ => false,
        }
    }

    pub fn scroll_to(&mut self, target: i32) {
        let max = i32::from(self.max_position());
        self.position = u16::try_from(target.clamp(0, max)).unwrap_or_default();
    }

    /// Moves one step (half a viewport) left for `-1`, right for `1`.
    pub fn scroll_by(&mut self, direction: i32) {
        self.scroll_to(i32::from(self.position) + direction * i32::from(self.step));
    }

    /// Scrolls the least amount needed to show `[start, start + width)`.
    pub fn scroll_into_view(&mut self, start: u16, width: u16) {
        let Some(viewport) = self.viewport else {
            return;
        };
        let end = start.saturating_add(width);
        if start < self.position {
            self.position = start;
        } else if end > self.position.saturating_add(viewport) {
            self.position = end.saturating_sub(viewport);
        }
        self.clamp();
    }

    fn max_position(&self) -> u16 {
        match (self.viewport, self.content) {
            (Some(viewport), Some(content)) => content.saturating_sub(viewport),
            _ => 0,
        }
    }

    fn clamp(&mut self) {
        self.position = self.position.min(self.max_position());
    }
}
