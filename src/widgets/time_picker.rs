//! Hour / minute / meridiem picker.

use chrono::{NaiveTime, Timelike};

use crate::config::TimePickerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn label(self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Hour,
    Minute,
    Meridiem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEvent {
    Changed(NaiveTime),
}

#[derive(Debug, Clone)]
pub struct TimePicker {
    value: NaiveTime,
    is_24hr: bool,
    minute_interval: u32,
    focus: TimeField,
}

impl TimePicker {
    pub fn new(now: NaiveTime, config: &TimePickerConfig) -> Self {
        let mut picker = Self {
            value: now,
            is_24hr: config.is_24hr,
            minute_interval: config.minute_interval.clamp(1, 60),
            focus: TimeField::Hour,
        };
        picker.value = picker.snap(now);
        picker
    }

    pub fn value(&self) -> NaiveTime {
        self.value
    }

    pub fn is_24hr(&self) -> bool {
        self.is_24hr
    }

    pub fn focus(&self) -> TimeField {
        self.focus
    }

    pub fn set_24hr(&mut self, is_24hr: bool) {
        self.is_24hr = is_24hr;
        if is_24hr && self.focus == TimeField::Meridiem {
            self.focus = TimeField::Minute;
        }
    }

    pub fn set_minute_interval(&mut self, interval: u32) {
        self.minute_interval = interval.clamp(1, 60);
        self.value = self.snap(self.value);
    }

    pub fn set_value(&mut self, value: NaiveTime) -> TimeEvent {
        self.value = self.snap(value);
        TimeEvent::Changed(self.value)
    }

    /// Parse `HH:MM` (24 hour) or `H:MM AM`; anything else selects `now`.
    pub fn set_value_str(&mut self, text: &str, now: NaiveTime) -> TimeEvent {
        let text = text.trim();
        let parsed = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok());

        match parsed {
            Some(time) => self.set_value(time),
            None => {
                tracing::debug!("Unparseable time {:?}, using current time", text);
                self.set_value(now)
            }
        }
    }

    /// Labels for the hour column: 1..=12 or 0..=23.
    pub fn hour_options(&self) -> Vec<u32> {
        if self.is_24hr {
            (0..24).collect()
        } else {
            (1..=12).collect()
        }
    }

    pub fn minute_options(&self) -> Vec<u32> {
        (0..60).step_by(self.minute_interval as usize).collect()
    }

    pub fn meridiem(&self) -> Meridiem {
        if self.value.hour() < 12 {
            Meridiem::Am
        } else {
            Meridiem::Pm
        }
    }

    /// Hour as shown in the hour column.
    pub fn display_hour(&self) -> u32 {
        if self.is_24hr {
            return self.value.hour();
        }
        match self.value.hour() % 12 {
            0 => 12,
            h => h,
        }
    }

    /// Set the hour from the displayed column value. In 12 hour mode the
    /// current meridiem is kept.
    pub fn set_hour(&mut self, hour: u32) -> Option<TimeEvent> {
        let hour24 = if self.is_24hr {
            if hour > 23 {
                return None;
            }
            hour
        } else {
            if !(1..=12).contains(&hour) {
                return None;
            }
            let base = hour % 12;
            match self.meridiem() {
                Meridiem::Am => base,
                Meridiem::Pm => base + 12,
            }
        };
        self.update(hour24, self.value.minute())
    }

    /// Minutes are snapped down to the interval.
    pub fn set_minute(&mut self, minute: u32) -> Option<TimeEvent> {
        if minute > 59 {
            return None;
        }
        self.update(self.value.hour(), minute)
    }

    pub fn set_meridiem(&mut self, meridiem: Meridiem) -> Option<TimeEvent> {
        if self.is_24hr || meridiem == self.meridiem() {
            return None;
        }
        let hour = (self.value.hour() + 12) % 24;
        self.update(hour, self.value.minute())
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            TimeField::Hour => TimeField::Minute,
            TimeField::Minute if !self.is_24hr => TimeField::Meridiem,
            _ => TimeField::Hour,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            TimeField::Hour if self.is_24hr => TimeField::Minute,
            TimeField::Hour => TimeField::Meridiem,
            TimeField::Minute => TimeField::Hour,
            TimeField::Meridiem => TimeField::Minute,
        };
    }

    /// Step the focused field by `delta`, wrapping inside the field.
    pub fn step(&mut self, delta: i32) -> Option<TimeEvent> {
        match self.focus {
            TimeField::Hour => {
                let hours = self.hour_options();
                let idx = hours.iter().position(|h| *h == self.display_hour())?;
                let next = hours[wrap(idx, delta, hours.len())];
                self.set_hour(next)
            }
            TimeField::Minute => {
                let minutes = self.minute_options();
                let idx = minutes.iter().position(|m| *m == self.value.minute())?;
                let next = minutes[wrap(idx, delta, minutes.len())];
                self.set_minute(next)
            }
            TimeField::Meridiem => {
                let flipped = match self.meridiem() {
                    Meridiem::Am => Meridiem::Pm,
                    Meridiem::Pm => Meridiem::Am,
                };
                self.set_meridiem(flipped)
            }
        }
    }

    pub fn label(&self) -> String {
        if self.is_24hr {
            format!("{:02}:{:02}", self.value.hour(), self.value.minute())
        } else {
            format!(
                "{}:{:02} {}",
                self.display_hour(),
                self.value.minute(),
                self.meridiem().label()
            )
        }
    }

    fn update(&mut self, hour: u32, minute: u32) -> Option<TimeEvent> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(self.set_value(time))
    }

    fn snap(&self, time: NaiveTime) -> NaiveTime {
        let minute = time.minute() - time.minute() % self.minute_interval;
        NaiveTime::from_hms_opt(time.hour(), minute, 0).unwrap_or(time)
    }
}

fn wrap(idx: usize, delta: i32, len: usize) -> usize {
    (idx as i64 + delta as i64).rem_euclid(len as i64) as usize
}
