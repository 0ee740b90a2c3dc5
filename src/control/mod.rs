//! Actuator timing primitives shared by the control loops.

pub mod timed_action;
