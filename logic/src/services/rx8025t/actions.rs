#![deny(unsafe_code)]

use core::convert::TryFrom;
use crate::errors::Errors;
use crate::hal_ext::clock::SystemClock;
use crate::services::rx8025t::TimeSourceComponent;
use crate::services::rx8025t::domain::RtcTime;

/// Actions the automation layer can fire at a time source.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcAction {
    /// Copy the host clock into the chip.
    WriteTime,
    /// Copy the chip into the host clock.
    ReadTime,
}

impl RtcAction {
    pub fn play<C, S>(&self, component: &mut C, clock: &mut S) -> Result<RtcTime, Errors>
        where
            C: TimeSourceComponent,
            S: SystemClock,
    {
        match self {
            RtcAction::WriteTime => write_system_time(component, clock),
            RtcAction::ReadTime => read_into_system_clock(component, clock),
        }
    }
}

fn write_system_time<C, S>(component: &mut C, clock: &mut S) -> Result<RtcTime, Errors>
    where
        C: TimeSourceComponent,
        S: SystemClock,
{
    let now = clock.get_datetime().ok_or_else(|| {
        error!("rx8025t: invalid system time, not syncing to RTC");
        Errors::SystemClockNotSet
    })?;
    let time = RtcTime::try_from(now)?;
    component.write_time(time)?;
    Ok(time)
}

fn read_into_system_clock<C, S>(component: &mut C, clock: &mut S) -> Result<RtcTime, Errors>
    where
        C: TimeSourceComponent,
        S: SystemClock,
{
    let time = component.read_time()?;
    let date_time = time.to_date_time()?;
    clock.set_datetime(&date_time).map_err(|_| {
        error!("rx8025t: system clock rejected RTC time");
        Errors::SystemClockRejected
    })?;
    Ok(time)
}
