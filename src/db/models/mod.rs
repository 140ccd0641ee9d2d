pub mod reading;
pub mod setpoint;

pub use reading::{round_one_decimal, Reading};
pub use setpoint::{Setpoint, SetpointField, SETPOINT_KEY};
