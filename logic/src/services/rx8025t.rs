#![deny(unsafe_code)]

use core::convert::TryFrom;
use embedded_hal::i2c::I2c;
use time::{Duration, PrimitiveDateTime};
use crate::errors::Errors;
use crate::hal_ext::clock::{MonotonicClock, RelativeMillis};
use crate::services::rx8025t::config::Rx8025tConfig;
use crate::services::rx8025t::domain::{FlagRegister, FRAME_LEN, READ_BLOCK_LEN, RegisterFrame, registers, RtcTime};

pub mod actions;
pub mod config;
pub mod domain;

/// Setup priority of components providing data to others.
pub const SETUP_PRIORITY_DATA: f32 = 600.0;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockValidity {
    Invalid,
    Valid,
}

impl ClockValidity {
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        *self == ClockValidity::Valid
    }
}

/// Closed set of hooks and actions the host drives a time source with.
pub trait TimeSourceComponent {
    fn setup(&mut self) -> Result<(), Errors>;
    fn update(&mut self) -> Result<(), Errors>;
    fn write_time(&mut self, time: RtcTime) -> Result<(), Errors>;
    fn read_time(&mut self) -> Result<RtcTime, Errors>;
    /// Host visible time, `None` while the clock is not trusted.
    fn now(&mut self) -> Option<RtcTime>;
    fn is_valid(&self) -> bool;
    fn dump_config(&self);

    fn setup_priority(&self) -> f32 {
        SETUP_PRIORITY_DATA
    }
}

#[derive(Copy, Clone)]
struct CachedTime {
    base: PrimitiveDateTime,
    taken_at: RelativeMillis,
}

impl CachedTime {
    fn project(&self, now: RelativeMillis) -> Option<PrimitiveDateTime> {
        self.base.checked_add(Duration::milliseconds(now.elapsed_since(self.taken_at) as i64))
    }
}

pub struct Rx8025t<I2C, MC>
    where
        I2C: I2c,
        MC: MonotonicClock,
{
    i2c: I2C,
    monotonic: MC,
    config: Rx8025tConfig,
    validity: ClockValidity,
    cache: Option<CachedTime>,
    last_reported: Option<PrimitiveDateTime>,
    last_read_attempt: Option<RelativeMillis>,
    consecutive_errors: u8,
    flags: Option<FlagRegister>,
}

impl <I2C, MC> Rx8025t<I2C, MC>
    where
        I2C: I2c,
        MC: MonotonicClock,
{
    pub fn new(i2c: I2C, monotonic: MC, config: Rx8025tConfig) -> Result<Self, Errors> {
        Ok(Self {
            i2c,
            monotonic,
            config: config.validate()?,
            validity: ClockValidity::Invalid,
            cache: None,
            last_reported: None,
            last_read_attempt: None,
            consecutive_errors: 0,
            flags: None,
        })
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    #[inline(always)]
    pub fn validity(&self) -> ClockValidity {
        self.validity
    }

    #[inline(always)]
    pub fn config(&self) -> &Rx8025tConfig {
        &self.config
    }

    /// FLAG register as seen by the last successful read.
    #[inline(always)]
    pub fn last_flags(&self) -> Option<FlagRegister> {
        self.flags
    }

    #[inline(always)]
    pub fn consecutive_errors(&self) -> u8 {
        self.consecutive_errors
    }

    fn within_read_guard(&self, now: RelativeMillis) -> bool {
        match self.last_read_attempt {
            Some(last) => now.elapsed_since(last) < self.config.min_read_interval_ms,
            None => false,
        }
    }

    fn refresh_due(&self, now: RelativeMillis) -> bool {
        match self.last_read_attempt {
            None => true,
            Some(_) if self.within_read_guard(now) => false,
            Some(_) if self.consecutive_errors > 0 || !self.validity.is_valid() => true,
            Some(last) => now.elapsed_since(last) >= self.config.update_interval_ms,
        }
    }

    fn invalidate(&mut self) {
        if self.validity.is_valid() {
            warn!("rx8025t: clock marked invalid");
        }
        self.validity = ClockValidity::Invalid;
    }

    fn remember(&mut self, time: &RtcTime, now: RelativeMillis) -> Result<(), Errors> {
        self.cache = Some(CachedTime { base: time.to_date_time()?, taken_at: now });
        self.validity = ClockValidity::Valid;
        self.consecutive_errors = 0;
        Ok(())
    }

    fn read_registers(&mut self) -> Result<(RegisterFrame, FlagRegister), Errors> {
        let mut block = [0_u8; READ_BLOCK_LEN];
        self.i2c.write_read(self.config.address, &[registers::SECONDS], &mut block)
            .map_err(|e| {
                let error = Errors::from_bus(e);
                error!("rx8025t: can't read I2C data: {:?}", error);
                error
            })?;
        let mut frame = [0_u8; FRAME_LEN];
        frame.copy_from_slice(&block[..FRAME_LEN]);
        Ok((RegisterFrame::from_bytes(frame), FlagRegister::new(block[registers::FLAG as usize])))
    }

    /// One bus read. Leaves the validity untouched on failure, callers apply their policy.
    fn fetch(&mut self, now: RelativeMillis) -> Result<RtcTime, Errors> {
        self.last_read_attempt = Some(now);
        let (frame, flags) = self.read_registers()?;
        self.flags = Some(flags);
        let bytes = frame.as_bytes();
        debug!("rx8025t: read {:?} flags {}", bytes, flags.bits());
        if flags.voltage_low() {
            warn!("rx8025t: voltage low flag is set, time data may be invalid");
            return Err(Errors::VoltageLow);
        }
        let time = frame.decode().map_err(|e| {
            error!("rx8025t: invalid register data: {:?}", e);
            e
        })?;
        self.remember(&time, now)?;
        Ok(time)
    }

    fn read_flags(&mut self) -> Result<FlagRegister, Errors> {
        let mut buffer = [0_u8; 1];
        self.i2c.write_read(self.config.address, &[registers::FLAG], &mut buffer)
            .map_err(Errors::from_bus)?;
        let flags = FlagRegister::new(buffer[0]);
        self.flags = Some(flags);
        Ok(flags)
    }

    /// Only VLF is cleared, the other FLAG bits are written back as read.
    fn clear_voltage_low(&mut self) -> Result<(), Errors> {
        let flags = match self.flags {
            Some(flags) => flags,
            None => self.read_flags()?,
        };
        if !flags.voltage_low() {
            return Ok(());
        }
        let cleared = flags.with_voltage_low_cleared();
        debug!("rx8025t: clearing voltage low flag");
        self.i2c.write(self.config.address, &[registers::FLAG, cleared.bits()])
            .map_err(Errors::from_bus)?;
        self.flags = Some(cleared);
        Ok(())
    }

    fn write_registers(&mut self, frame: &RegisterFrame) -> Result<(), Errors> {
        let mut data = [0_u8; FRAME_LEN + 1];
        data[0] = registers::SECONDS;
        data[1..].copy_from_slice(frame.as_bytes());
        self.i2c.write(self.config.address, &data).map_err(Errors::from_bus)?;
        self.clear_voltage_low()
    }
}

impl <I2C, MC> TimeSourceComponent for Rx8025t<I2C, MC>
    where
        I2C: I2c,
        MC: MonotonicClock,
{
    fn setup(&mut self) -> Result<(), Errors> {
        let now = self.monotonic.now();
        match self.fetch(now) {
            Ok(time) => {
                info!("rx8025t: clock valid, {}-{}-{} {}:{}:{}",
                    time.year, time.month, time.day, time.hour, time.minute, time.second);
                Ok(())
            }
            Err(error) => {
                error!("rx8025t: setup failed: {:?}", error);
                self.invalidate();
                Err(error)
            }
        }
    }

    fn update(&mut self) -> Result<(), Errors> {
        let now = self.monotonic.now();
        if !self.refresh_due(now) {
            return Ok(());
        }
        match self.fetch(now) {
            Ok(_) => Ok(()),
            Err(error @ Errors::BusTransactionError(_)) => {
                self.consecutive_errors = self.consecutive_errors.saturating_add(1);
                if self.consecutive_errors >= self.config.max_consecutive_errors {
                    error!("rx8025t: {} consecutive bus errors", self.consecutive_errors);
                    self.invalidate();
                }
                Err(error)
            }
            Err(error) => {
                self.invalidate();
                Err(error)
            }
        }
    }

    fn write_time(&mut self, time: RtcTime) -> Result<(), Errors> {
        let frame = RegisterFrame::encode(&time)?;
        if let Err(error) = self.write_registers(&frame) {
            error!("rx8025t: can't write I2C data: {:?}", error);
            self.invalidate();
            return Err(error);
        }
        debug!("rx8025t: wrote {}-{}-{} {}:{}:{} weekday {}",
            time.year, time.month, time.day, time.hour, time.minute, time.second, time.weekday);
        let now = self.monotonic.now();
        self.remember(&time, now)?;
        self.last_reported = self.cache.map(|cache| cache.base);
        Ok(())
    }

    fn read_time(&mut self) -> Result<RtcTime, Errors> {
        let now = self.monotonic.now();
        if self.within_read_guard(now) {
            trace!("rx8025t: read inside the minimal interval, using cached time");
            return self.now().ok_or(Errors::AccessTooFrequent);
        }
        self.fetch(now).map_err(|error| {
            self.invalidate();
            error
        })
    }

    fn now(&mut self) -> Option<RtcTime> {
        if !self.validity.is_valid() {
            return None;
        }
        let projected = self.cache?.project(self.monotonic.now())?;
        let visible = match self.last_reported {
            Some(last) if last > projected => last,
            _ => projected,
        };
        let time = RtcTime::try_from(visible).ok()?;
        self.last_reported = Some(visible);
        Some(time)
    }

    #[inline(always)]
    fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    fn dump_config(&self) {
        info!("rx8025t:");
        info!("  address: {}", self.config.address);
        info!("  update interval: {} ms", self.config.update_interval_ms);
        info!("  min read interval: {} ms", self.config.min_read_interval_ms);
        info!("  max consecutive errors: {}", self.config.max_consecutive_errors);
        info!("  valid: {}", self.validity.is_valid());
        if let Some(flags) = self.flags {
            info!("  flags: {}", flags.bits());
        }
    }
}
