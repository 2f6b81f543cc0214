// Paginated sheet viewer state: one page per hymn, independent zoom per page.
//
// Zoom follows pinch semantics: during a gesture the scale is
// `base_scale * gesture_factor` and is only applied while it stays inside
// [MIN_SCALE, MAX_SCALE]; when the gesture ends the current scale becomes the
// base for the next one.
use crate::model::Catalog;
use std::collections::HashMap;

pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 5.0;
const KEY_ZOOM_STEP: f32 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    pub scale: f32,
    pub base_scale: f32,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            scale: MIN_SCALE,
            base_scale: MIN_SCALE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Viewer {
    index: usize,
    len: usize,
    zoom: HashMap<usize, ZoomState>,
}

impl Viewer {
    /// Opens the viewer at `index`, clamped into the catalog.
    pub fn open(index: usize, len: usize) -> Self {
        Self {
            index: index.min(len.saturating_sub(1)),
            len,
            zoom: HashMap::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves to the next page. No wrap-around; returns whether it moved.
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.len {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.len && index != self.index {
            self.index = index;
            true
        } else {
            false
        }
    }

    pub fn current_title(&self, catalog: &Catalog) -> String {
        catalog.title_or_placeholder(self.index)
    }

    /// "3 / 480", 1-based.
    pub fn page_label(&self) -> String {
        if self.len == 0 {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.index + 1, self.len)
    }

    pub fn zoom_state(&self, page: usize) -> ZoomState {
        self.zoom.get(&page).copied().unwrap_or_default()
    }

    pub fn scale(&self) -> f32 {
        self.zoom_state(self.index).scale
    }

    /// In-gesture update with the cumulative pinch factor.
    /// Returns whether the scale changed.
    pub fn pinch_update(&mut self, factor: f32) -> bool {
        let state = self.zoom.entry(self.index).or_default();
        let candidate = state.base_scale * factor;
        if (MIN_SCALE..=MAX_SCALE).contains(&candidate) {
            state.scale = candidate;
            true
        } else {
            false
        }
    }

    /// Gesture finished: the reached scale becomes the base.
    pub fn pinch_end(&mut self) {
        let state = self.zoom.entry(self.index).or_default();
        state.base_scale = state.scale;
    }

    /// Keyboard zoom: a complete gesture by one step, clamped at the bounds.
    pub fn zoom_in(&mut self) {
        self.step_zoom(KEY_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.step_zoom(1.0 / KEY_ZOOM_STEP);
    }

    fn step_zoom(&mut self, factor: f32) {
        let state = self.zoom.entry(self.index).or_default();
        let target = (state.base_scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        state.scale = target;
        state.base_scale = target;
    }

    pub fn reset_zoom(&mut self) {
        self.zoom.remove(&self.index);
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.scale() * 100.0).round() as u32
    }
}
