pub mod battery;
pub mod energy_level;
pub mod outputs_mode;
pub mod plan;
pub mod segment;
pub mod time_segment;
