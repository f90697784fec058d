//! Latch for the user push button. The EXTI handler sets it, the polling
//! loop consumes it.

use portable_atomic::{AtomicBool, Ordering};

/// A press of the board button, remembered until someone takes it.
///
/// ```
/// use vl53l8a1_ranging::ButtonFlag;
///
/// static USER_BUTTON: ButtonFlag = ButtonFlag::new();
///
/// // in the interrupt handler
/// USER_BUTTON.notify();
///
/// assert!(USER_BUTTON.take());
/// assert!(!USER_BUTTON.take());
/// ```
#[derive(Debug, Default)]
pub struct ButtonFlag(AtomicBool);

impl ButtonFlag {
    /// A released button.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Record a press. Safe to call from interrupt context.
    #[inline]
    pub fn notify(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a press is pending, without consuming it.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Consume a pending press.
    #[inline]
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}
