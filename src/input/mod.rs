//! Input validation and output naming

pub mod naming;
pub mod validator;

pub use naming::{date_stamp, normalize_stem, today_stamp, FALLBACK_STEM};
pub use validator::{validate_input, MIN_INPUT_BYTES};
