use time::PrimitiveDateTime;
use logic::hal_ext::clock::SystemClock;

/// The MCU's own RTC, used as the host wall clock.
pub struct RtcWrapper {
    rtc: stm32f4xx_hal::rtc::Rtc,
    initialized: bool,
}

impl RtcWrapper {
    /// `initialized` is the INITS flag read before the peripheral was constructed.
    pub fn new(rtc: stm32f4xx_hal::rtc::Rtc, initialized: bool) -> Self {
        Self {
            rtc,
            initialized,
        }
    }
}

impl SystemClock for RtcWrapper {
    type Error = stm32f4xx_hal::rtc::Error;

    #[inline(always)]
    fn get_datetime(&mut self) -> Option<PrimitiveDateTime> {
        if self.initialized {
            Some(self.rtc.get_datetime())
        } else {
            None
        }
    }

    #[inline(always)]
    fn set_datetime(&mut self, date: &PrimitiveDateTime) -> Result<(), Self::Error> {
        self.rtc.set_datetime(date)?;
        self.initialized = true;
        Ok(())
    }
}
