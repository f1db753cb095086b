#![deny(unsafe_code)]

use cortex_m::peripheral::{DCB, DWT};
use stm32f4xx_hal::time::Hertz;
use logic::hal_ext::clock::{MonotonicClock, RelativeMillis};

/// Millisecond counter on top of the DWT cycle counter.
/// `now` has to be polled at least once per cycle counter wrap (about 51 s at 84 MHz).
pub struct DwtMillis {
    _dwt: DWT,
    cycles_per_milli: u32,
    last_cycles: u32,
    carry: u32,
    millis: u32,
}

impl DwtMillis {
    pub fn new(dcb: &mut DCB, mut dwt: DWT, sysclk: Hertz) -> Self {
        dcb.enable_trace();
        DWT::unlock();
        dwt.enable_cycle_counter();
        Self {
            _dwt: dwt,
            cycles_per_milli: sysclk.raw() / 1_000,
            last_cycles: DWT::cycle_count(),
            carry: 0,
            millis: 0,
        }
    }
}

impl MonotonicClock for DwtMillis {
    fn now(&mut self) -> RelativeMillis {
        let cycles = DWT::cycle_count();
        let elapsed = cycles.wrapping_sub(self.last_cycles) as u64 + self.carry as u64;
        let cycles_per_milli = self.cycles_per_milli as u64;
        self.millis = self.millis.wrapping_add((elapsed / cycles_per_milli) as u32);
        self.carry = (elapsed % cycles_per_milli) as u32;
        self.last_cycles = cycles;
        RelativeMillis::new(self.millis)
    }
}
