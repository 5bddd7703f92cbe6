//! Shared utilities.
//!
//! Currently only the frame clock that feeds `delta_time` into
//! [`Camera::update`](crate::camera::Camera::update).

mod frame_clock;

pub use frame_clock::FrameClock;
