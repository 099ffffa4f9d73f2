//! Real-time interrupt pause guard

use wavesphere_hal::RealtimeIrq;

/// Keeps the real-time interrupt paused while alive
///
/// The interrupt is resumed when the guard is dropped, including on early
/// return through `?`.
pub struct IrqPause<'a, I: RealtimeIrq> {
    irq: &'a mut I,
}

impl<'a, I: RealtimeIrq> IrqPause<'a, I> {
    /// Pause the interrupt
    pub fn new(irq: &'a mut I) -> Self {
        irq.pause();
        Self { irq }
    }
}

impl<I: RealtimeIrq> Drop for IrqPause<'_, I> {
    fn drop(&mut self) {
        self.irq.resume();
    }
}
