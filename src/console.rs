//! The serial link the demo talks over, and the tick it measures time with.

use core::fmt::Write;

/// A text console with single-key input, typically the virtual COM port
/// of the board's debugger.
pub trait Console: Write {
    /// Take one received byte, if any. Must not block.
    fn read_key(&mut self) -> Option<u8>;
}

/// Free-running millisecond counter. Allowed to wrap.
pub trait Clock {
    /// Milliseconds since some fixed point in the past.
    fn now_ms(&self) -> u32;
}

impl<C: Console + ?Sized> Console for &mut C {
    #[inline]
    fn read_key(&mut self) -> Option<u8> {
        (**self).read_key()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    #[inline]
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

#[cfg(feature = "std")]
impl Clock for std::time::Instant {
    /// Milliseconds elapsed since this instant.
    fn now_ms(&self) -> u32 {
        self.elapsed().as_millis() as u32
    }
}
