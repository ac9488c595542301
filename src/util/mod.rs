pub mod color;
pub mod object;
pub mod strings;
