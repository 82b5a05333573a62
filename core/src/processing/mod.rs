pub mod window;

pub use window::{extract_window, extract_window_from, sample_index, WindowPlan, POWER_SIGNAL};
