//! Integer picker and the labelled bar that hosts it.

use crate::config::IntegerPickerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerEvent {
    Changed(i64),
}

/// Picks one value out of `min..=max` in `step` increments.
#[derive(Debug, Clone)]
pub struct IntegerPicker {
    min: i64,
    max: i64,
    step: i64,
    value: i64,
    values: Vec<i64>,
}

impl Default for IntegerPicker {
    fn default() -> Self {
        Self::from_config(&IntegerPickerConfig::default())
    }
}

impl IntegerPicker {
    pub fn from_config(config: &IntegerPickerConfig) -> Self {
        let mut picker = Self {
            min: config.min,
            max: config.max,
            step: config.step,
            value: config.min,
            values: Vec::new(),
        };
        picker.generate_values();
        picker
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Index of the current value in [`values`](Self::values), if listed.
    pub fn selected_index(&self) -> Option<usize> {
        self.values.iter().position(|v| *v == self.value)
    }

    pub fn set_min(&mut self, min: i64) {
        self.min = min;
        self.generate_values();
    }

    pub fn set_max(&mut self, max: i64) {
        self.max = max;
        self.generate_values();
    }

    pub fn set_step(&mut self, step: i64) {
        self.step = step;
        self.generate_values();
    }

    pub fn set_value(&mut self, value: i64) {
        self.value = value;
    }

    /// Accepts any text; non-numbers fall back to `min`.
    pub fn set_value_str(&mut self, text: &str) {
        self.value = text.trim().parse().unwrap_or(self.min);
    }

    pub fn select(&mut self, index: usize) -> Option<IntegerEvent> {
        let value = *self.values.get(index)?;
        self.value = value;
        Some(IntegerEvent::Changed(value))
    }

    /// Move the selection by `delta` entries, stopping at either end.
    pub fn step_selection(&mut self, delta: i64) -> Option<IntegerEvent> {
        if self.values.is_empty() {
            return None;
        }
        let current = self.selected_index().unwrap_or(0) as i64;
        let last = self.values.len() as i64 - 1;
        let next = (current + delta).clamp(0, last) as usize;
        if Some(next) == self.selected_index() {
            return None;
        }
        self.select(next)
    }

    fn generate_values(&mut self) {
        if self.step <= 0 {
            tracing::warn!("Integer picker step {} is not positive, using 1", self.step);
            self.step = 1;
        }
        self.values = (self.min..=self.max).step_by(self.step as usize).collect();
    }
}

/// An [`IntegerPicker`] with a caption, an optional sublabel and a disabled
/// state.
#[derive(Debug, Clone)]
pub struct IntegerPickerBar {
    pub label: String,
    sublabel: String,
    disabled: bool,
    picker: IntegerPicker,
}

impl Default for IntegerPickerBar {
    fn default() -> Self {
        Self::new(IntegerPicker::default())
    }
}

impl IntegerPickerBar {
    pub fn new(picker: IntegerPicker) -> Self {
        Self {
            label: "Pick a value".to_string(),
            sublabel: String::new(),
            disabled: false,
            picker,
        }
    }

    pub fn picker(&self) -> &IntegerPicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut IntegerPicker {
        &mut self.picker
    }

    pub fn set_sublabel(&mut self, sublabel: impl Into<String>) {
        self.sublabel = sublabel.into();
    }

    /// Sublabel to show, `None` when it is empty.
    pub fn sublabel(&self) -> Option<&str> {
        (!self.sublabel.is_empty()).then_some(self.sublabel.as_str())
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Text for the picker button.
    pub fn button_text(&self) -> String {
        self.picker.value().to_string()
    }

    pub fn select(&mut self, index: usize) -> Option<IntegerEvent> {
        if self.disabled {
            return None;
        }
        self.picker.select(index)
    }

    pub fn step_selection(&mut self, delta: i64) -> Option<IntegerEvent> {
        if self.disabled {
            return None;
        }
        self.picker.step_selection(delta)
    }
}
