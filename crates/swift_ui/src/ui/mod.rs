//! UI modules for the SwiftRide demo.

pub mod app_shell;
pub mod booking_panel;
pub mod constants;
pub mod driver_panel;
pub mod notices;
pub mod rendering;
pub mod topbar;
pub mod utils;
