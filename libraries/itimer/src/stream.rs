use std::io::{Read, Write};

use itimer_abstractions::IIntervalClock;
use log::debug;
use timing::{ITimerVal, ITIMERVAL_RECORD_SIZE};

use crate::{IntervalTimer, TimerError};

impl<C: IIntervalClock> IntervalTimer<C> {
    /// Writes the interval and remaining value, both at nominal speed.
    ///
    /// A running timer is sampled, not stopped. The kind and speed factor are
    /// not part of the record.
    pub fn write_to(&self, mut writer: impl Write) -> Result<(), TimerError> {
        let record = ITimerVal::new(self.interval, self.get_value()?);
        writer.write_all(&record.to_ne_bytes())?;

        debug!("{} timer saved as {record:?}", self.kind());
        Ok(())
    }

    /// Replaces interval and value with a record written by
    /// [`IntervalTimer::write_to`]. The timer must be stopped.
    pub fn read_from(&mut self, mut reader: impl Read) -> Result<(), TimerError> {
        if self.is_running() {
            return Err(TimerError::NotStopped);
        }

        let mut bytes = [0u8; ITIMERVAL_RECORD_SIZE];
        reader.read_exact(&mut bytes)?;

        let record = ITimerVal::from_ne_bytes(&bytes);
        if !record.it_interval.is_valid() || !record.it_value.is_valid() {
            return Err(TimerError::CorruptRecord);
        }

        self.interval = record.it_interval;
        self.value = record.it_value;

        debug!("{} timer loaded from {record:?}", self.kind());
        Ok(())
    }
}
