//! Real-time interrupt control
//!
//! The interpolation timer interrupt reads waveforms straight out of
//! flash. Anything else that wants the flash bus has to stop that
//! interrupt first and restart it afterwards.

/// Pause/resume control over the real-time reader interrupt
///
/// Calls are not nested: every `pause` is followed by exactly one
/// `resume` before the next `pause`.
pub trait RealtimeIrq {
    /// Stop the interrupt from firing
    ///
    /// Must not return while a handler invocation is still running.
    fn pause(&mut self);

    /// Let the interrupt fire again
    fn resume(&mut self);
}

impl<T: RealtimeIrq + ?Sized> RealtimeIrq for &mut T {
    fn pause(&mut self) {
        T::pause(self)
    }

    fn resume(&mut self) {
        T::resume(self)
    }
}
