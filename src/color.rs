use std::collections::HashMap;

/// Color palette cycled through for series and categories
pub const PALETTE: &[&str] = &[
    "#5470C6", // Blue
    "#3BA272", // Green
    "#FC8452", // Orange
    "#73C0DE", // Light blue
    "#EE6666", // Red
    "#FAC858", // Yellow
    "#9A60B4", // Purple
    "#EA7CCC", // Pink
    "#91CC75", // Lime
    "#FF9F7F", // Coral
];

/// Stable key -> palette color table scoped to one displayed dataset
///
/// Owned by the session and reset whenever the active benchmark or group
/// changes.
#[derive(Debug, Clone, Default)]
pub struct ColorAssigner {
    assigned: HashMap<String, usize>,
    cursor: usize,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `key`, allocating the next palette slot on first use.
    pub fn color_for(&mut self, key: &str) -> &'static str {
        if let Some(&idx) = self.assigned.get(key) {
            return PALETTE[idx];
        }

        let idx = self.cursor;
        self.assigned.insert(key.to_string(), idx);
        self.cursor = (self.cursor + 1) % PALETTE.len();
        PALETTE[idx]
    }

    pub fn reset(&mut self) {
        self.assigned.clear();
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
