//! Native window bindings

pub mod headless;
#[cfg(windows)]
pub mod win32;

pub use headless::{HeadlessInstance, HeadlessWindow, ResourceCounters, ResourceEvent};
#[cfg(windows)]
pub use win32::{Win32Instance, Win32Window};
