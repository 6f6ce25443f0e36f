//! Exclusive pointer capture, as offered by the host window or browser.

use crate::error::PointerError;

/// The host side of pointer capture.
///
/// Capture may be refused at any time (the browser requires a user gesture, the window lost
/// focus, ...). Callers treat a refusal as "not captured" and move on.
pub trait PointerHost {
    fn request_capture(&mut self) -> Result<(), PointerError>;
    fn release_capture(&mut self);
}

/// A pointer host that always grants capture. Used by the headless driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrantingPointer;

impl PointerHost for GrantingPointer {
    fn request_capture(&mut self) -> Result<(), PointerError> {
        Ok(())
    }

    fn release_capture(&mut self) {}
}
