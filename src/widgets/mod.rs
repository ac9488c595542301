pub mod autocomplete;
pub mod calendar;
pub mod date_picker;
pub mod debounce;
pub mod decimal;
pub mod divider;
pub mod integer_picker;
pub mod item;
pub mod lazy_list;
pub mod locale;
pub mod menu;
pub mod notification;
pub mod progress;
pub mod time_picker;
