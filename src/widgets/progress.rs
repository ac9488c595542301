//! Modal progress dialog with optional cancel button.

use crate::config::ProgressConfig;

/// Per-tick share of the remaining distance covered when animating.
const ANIMATION_RATE: f64 = 0.35;
/// Below this distance the animation snaps to the target.
const SNAP_EPSILON: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Cancelled,
}

/// Fields to change when showing the dialog; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProgressUpdate {
    pub title: Option<String>,
    pub message: Option<String>,
    pub progress: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub cancel_text: Option<String>,
    pub animate_progress: Option<bool>,
    pub show_stripes: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ProgressDialog {
    pub title: String,
    message: String,
    target: f64,
    displayed: f64,
    min: f64,
    max: f64,
    cancel_text: String,
    pub animate_progress: bool,
    pub show_stripes: bool,
    visible: bool,
    stripe_phase: usize,
}

impl Default for ProgressDialog {
    fn default() -> Self {
        Self::from_config(&ProgressConfig::default())
    }
}

impl ProgressDialog {
    pub fn from_config(config: &ProgressConfig) -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            target: config.min,
            displayed: config.min,
            min: config.min,
            max: config.max,
            cancel_text: String::new(),
            animate_progress: false,
            show_stripes: false,
            visible: false,
            stripe_phase: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// `None` when the message line is hidden.
    pub fn message(&self) -> Option<&str> {
        (!self.message.is_empty()).then_some(self.message.as_str())
    }

    /// `None` when the cancel button is hidden.
    pub fn cancel_text(&self) -> Option<&str> {
        (!self.cancel_text.is_empty()).then_some(self.cancel_text.as_str())
    }

    pub fn progress(&self) -> f64 {
        self.target
    }

    pub fn stripe_phase(&self) -> usize {
        self.stripe_phase
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.target = progress;
        if !self.animate_progress {
            self.displayed = progress;
        }
    }

    pub fn show(&mut self, update: ProgressUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(message) = update.message {
            self.message = message;
        }
        if let Some(min) = update.min {
            self.min = min;
        }
        if let Some(max) = update.max {
            self.max = max;
        }
        if let Some(text) = update.cancel_text {
            self.cancel_text = text;
        }
        if let Some(animate) = update.animate_progress {
            self.animate_progress = animate;
        }
        if let Some(stripes) = update.show_stripes {
            self.show_stripes = stripes;
        }
        if let Some(progress) = update.progress {
            self.set_progress(progress);
        }
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Displayed progress as a share of `[min, max]`, clamped to `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return if self.displayed >= self.max { 1.0 } else { 0.0 };
        }
        ((self.displayed - self.min) / span).clamp(0.0, 1.0)
    }

    /// Advance the bar animation one frame.
    pub fn tick(&mut self) {
        if !self.visible {
            return;
        }
        if self.show_stripes {
            self.stripe_phase = (self.stripe_phase + 1) % 4;
        }
        let gap = self.target - self.displayed;
        if gap.abs() <= SNAP_EPSILON {
            self.displayed = self.target;
        } else {
            self.displayed += gap * ANIMATION_RATE;
        }
    }

    /// Only available while a cancel button is shown.
    pub fn cancel(&mut self) -> Option<ProgressEvent> {
        if !self.visible || self.cancel_text.is_empty() {
            return None;
        }
        self.hide();
        Some(ProgressEvent::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_applies_partial_update() {
        let mut dialog = ProgressDialog::default();
        dialog.show(ProgressUpdate {
            title: Some("Syncing".to_string()),
            progress: Some(40.0),
            ..ProgressUpdate::default()
        });
        assert!(dialog.is_visible());
        assert_eq!(dialog.title, "Syncing");
        assert_eq!(dialog.message(), None);
        assert_eq!(dialog.cancel_text(), None);
        assert!((dialog.fraction() - 0.4).abs() < 1e-9);

        dialog.show(ProgressUpdate {
            message: Some("Fetching calendars".to_string()),
            ..ProgressUpdate::default()
        });
        assert_eq!(dialog.title, "Syncing");
        assert_eq!(dialog.message(), Some("Fetching calendars"));
    }

    #[test]
    fn test_fraction_clamps() {
        let mut dialog = ProgressDialog::default();
        dialog.show(ProgressUpdate {
            min: Some(10.0),
            max: Some(20.0),
            progress: Some(25.0),
            ..ProgressUpdate::default()
        });
        assert_eq!(dialog.fraction(), 1.0);
        dialog.set_progress(5.0);
        assert_eq!(dialog.fraction(), 0.0);
        dialog.set_progress(15.0);
        assert!((dialog.fraction() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_animated_progress_converges() {
        let mut dialog = ProgressDialog::default();
        dialog.show(ProgressUpdate {
            animate_progress: Some(true),
            progress: Some(80.0),
            ..ProgressUpdate::default()
        });
        assert_eq!(dialog.fraction(), 0.0);

        dialog.tick();
        let first = dialog.fraction();
        assert!(first > 0.0 && first < 0.8);

        for _ in 0..50 {
            dialog.tick();
        }
        assert!((dialog.fraction() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_requires_button() {
        let mut dialog = ProgressDialog::default();
        dialog.show(ProgressUpdate::default());
        assert_eq!(dialog.cancel(), None);
        assert!(dialog.is_visible());

        dialog.show(ProgressUpdate {
            cancel_text: Some("Stop".to_string()),
            ..ProgressUpdate::default()
        });
        assert_eq!(dialog.cancel(), Some(ProgressEvent::Cancelled));
        assert!(!dialog.is_visible());
    }
}
