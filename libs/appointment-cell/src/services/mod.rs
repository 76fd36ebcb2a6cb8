pub mod booking;
pub mod lifecycle;
