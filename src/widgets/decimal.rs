//! Numeric input for currency and other fixed-precision values.

use crate::config::DecimalConfig;

#[derive(Debug, Clone)]
pub struct DecimalInput {
    text: String,
    precision: u32,
    min: f64,
    max: Option<f64>,
    atm: bool,
    step: bool,
}

impl Default for DecimalInput {
    fn default() -> Self {
        Self::from_config(&DecimalConfig::default())
    }
}

impl DecimalInput {
    pub fn from_config(config: &DecimalConfig) -> Self {
        Self {
            text: String::new(),
            precision: config.precision,
            min: config.min,
            max: config.max,
            atm: config.atm,
            step: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder(&self) -> String {
        format_fixed(0.0, self.precision)
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn is_atm(&self) -> bool {
        self.atm
    }

    pub fn set_precision(&mut self, precision: u32) {
        self.precision = precision;
    }

    pub fn set_bounds(&mut self, min: f64, max: Option<f64>) {
        self.min = min;
        self.max = max;
    }

    pub fn set_atm(&mut self, atm: bool) {
        self.atm = atm;
    }

    pub fn set_step(&mut self, step: bool) {
        self.step = step;
    }

    /// Smallest increment at the current precision, e.g. `"0.01"`.
    pub fn step_attribute(&self) -> Option<String> {
        if !self.step {
            return None;
        }
        if self.precision == 0 {
            return Some("1".to_string());
        }
        Some(format!("0.{}1", "0".repeat(self.precision as usize - 1)))
    }

    /// Digits are always accepted; the decimal point only outside ATM mode.
    pub fn accepts_key(&self, c: char) -> bool {
        c.is_ascii_digit() || (c == '.' && !self.atm)
    }

    /// Typed character. Rejected keys leave the value untouched.
    pub fn push_char(&mut self, c: char) -> bool {
        if !self.accepts_key(c) {
            return false;
        }
        let mut next = self.text.clone();
        next.push(c);
        self.on_input(&next);
        true
    }

    pub fn backspace(&mut self) {
        let mut next = self.text.clone();
        next.pop();
        self.on_input(&next);
    }

    /// Replace the raw text. In ATM mode the digits are re-read as an
    /// integer count of the smallest unit, so typing `1`, `2`, `3` yields
    /// `0.01`, `0.12`, `1.23`.
    pub fn on_input(&mut self, text: &str) {
        if !self.atm {
            self.text = text.to_string();
            return;
        }

        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        let digits = digits.trim_start_matches('0');
        self.text = place_decimal_point(digits, self.precision as usize);
    }

    /// Current value rounded to precision. Text that does not parse is zero.
    pub fn value_as_number(&self) -> f64 {
        let cleaned: String = self
            .text
            .trim()
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => round_to(v, self.precision),
            _ => 0.0,
        }
    }

    /// Clamp to the bounds and reformat. Called when editing finishes.
    pub fn commit(&mut self) -> f64 {
        let mut amount = self.value_as_number();
        match self.max {
            Some(max) if amount > max => amount = max,
            _ if amount < self.min => amount = self.min,
            _ => {}
        }
        self.text = format_fixed(amount, self.precision);
        amount
    }
}

fn place_decimal_point(digits: &str, precision: usize) -> String {
    if precision == 0 {
        return if digits.is_empty() { "0".to_string() } else { digits.to_string() };
    }

    let padded = format!("{:0>width$}", digits, width = precision + 1);
    let (whole, frac) = padded.split_at(padded.len() - precision);
    format!("{}.{}", whole, frac)
}

fn round_to(v: f64, precision: u32) -> f64 {
    format_fixed(v, precision).parse().unwrap_or(0.0)
}

fn format_fixed(v: f64, precision: u32) -> String {
    format!("{:.*}", precision as usize, v)
}
