//! Voltage-defining parts: Ground, DC voltage source and Clock.
//!
//! Sources never react to changes on their own nodes; they only define the
//! voltage of their terminals.

use crate::circuit::NodeId;
use crate::error::{CircuitError, Result};
use crate::{DEFAULT_CLOCK_INTERVAL_MS, DEFAULT_SOURCE_VOLTAGE};

/// Terminal slot driven to 0 V on two-terminal sources.
pub const REFERENCE: usize = 0;
/// Terminal slot driven to the configured voltage.
pub const POSITIVE: usize = 1;

/// The 0 V reference.
#[derive(Debug, Clone, Default)]
pub struct Ground {
    pub name: String,
    pub rotation: i32,
    pub(crate) terminals: [Option<NodeId>; 1],
}

impl Ground {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voltage(&self) -> f64 {
        0.0
    }
}

/// An ideal DC voltage source.
#[derive(Debug, Clone)]
pub struct DcVoltage {
    pub name: String,
    pub rotation: i32,
    pub(crate) terminals: [Option<NodeId>; 2], // [reference, positive]
    voltage: f64,
}

impl DcVoltage {
    pub fn new(voltage: f64) -> Self {
        Self {
            name: String::new(),
            rotation: 0,
            terminals: [None; 2],
            voltage,
        }
    }

    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    pub(crate) fn set_voltage(&mut self, voltage: f64) {
        self.voltage = voltage;
    }

    /// Voltage this source defines at terminal `slot`.
    pub fn drive(&self, slot: usize) -> f64 {
        if slot == POSITIVE {
            self.voltage
        } else {
            0.0
        }
    }
}

impl Default for DcVoltage {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_VOLTAGE)
    }
}

/// A square-wave source toggling between its amplitude and 0 V.
///
/// The clock does not keep time itself: a timer owned by the host calls
/// [`Circuit::tick`](crate::Circuit::tick) (or
/// [`Circuit::advance_clocks`](crate::Circuit::advance_clocks)) once per
/// interval.
#[derive(Debug, Clone)]
pub struct Clock {
    pub name: String,
    pub rotation: i32,
    pub(crate) terminals: [Option<NodeId>; 2], // [reference, positive]
    amplitude: f64,
    high: bool,
    time_interval_ms: u64,
    /// Time accumulated since the last tick
    pub(crate) elapsed_ms: u64,
}

impl Clock {
    /// Create a clock, starting in the high phase.
    pub fn new(amplitude: f64, time_interval_ms: u64) -> Result<Self> {
        validate_interval("clock", time_interval_ms)?;
        Ok(Self {
            name: String::new(),
            rotation: 0,
            terminals: [None; 2],
            amplitude,
            high: true,
            time_interval_ms,
            elapsed_ms: 0,
        })
    }

    /// Current output voltage.
    pub fn voltage(&self) -> f64 {
        if self.high {
            self.amplitude
        } else {
            0.0
        }
    }

    /// Output voltage before the last tick.
    pub fn old_voltage(&self) -> f64 {
        if self.high {
            0.0
        } else {
            self.amplitude
        }
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    pub(crate) fn set_voltage(&mut self, amplitude: f64) {
        self.amplitude = amplitude;
    }

    pub fn time_interval_ms(&self) -> u64 {
        self.time_interval_ms
    }

    pub fn set_time_interval_ms(&mut self, time_interval_ms: u64) -> Result<()> {
        validate_interval(&self.name, time_interval_ms)?;
        self.time_interval_ms = time_interval_ms;
        Ok(())
    }

    /// Flip the output phase.
    pub(crate) fn tick(&mut self) {
        self.high = !self.high;
    }

    /// Accumulate `elapsed_ms` and return how many ticks are due.
    pub(crate) fn advance(&mut self, elapsed_ms: u64) -> u64 {
        let total = self.elapsed_ms.saturating_add(elapsed_ms);
        self.elapsed_ms = total % self.time_interval_ms;
        total / self.time_interval_ms
    }

    pub fn drive(&self, slot: usize) -> f64 {
        if slot == POSITIVE {
            self.voltage()
        } else {
            0.0
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            name: String::new(),
            rotation: 0,
            terminals: [None; 2],
            amplitude: DEFAULT_SOURCE_VOLTAGE,
            high: true,
            time_interval_ms: DEFAULT_CLOCK_INTERVAL_MS,
            elapsed_ms: 0,
        }
    }
}

fn validate_interval(component: &str, interval_ms: u64) -> Result<()> {
    if interval_ms == 0 {
        return Err(CircuitError::InvalidTimeInterval {
            component: component.to_string(),
            interval_ms,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dc_source_drives_positive_terminal_only() {
        let v = DcVoltage::new(5.0);
        assert_eq!(v.drive(POSITIVE), 5.0);
        assert_eq!(v.drive(REFERENCE), 0.0);
    }

    #[test]
    fn test_clock_toggles_between_amplitude_and_zero() {
        let mut clk = Clock::new(3.3, 100).unwrap();
        assert_eq!(clk.voltage(), 3.3);
        assert_eq!(clk.old_voltage(), 0.0);

        clk.tick();
        assert_eq!(clk.voltage(), 0.0);
        assert_eq!(clk.old_voltage(), 3.3);

        clk.tick();
        assert_eq!(clk.voltage(), 3.3);
    }

    #[test]
    fn test_clock_advance_accumulates_partial_intervals() {
        let mut clk = Clock::new(5.0, 500).unwrap();
        assert_eq!(clk.advance(300), 0);
        assert_eq!(clk.advance(300), 1);
        assert_eq!(clk.elapsed_ms, 100);
        assert_eq!(clk.advance(1400), 3);
        assert_eq!(clk.elapsed_ms, 0);
    }

    #[test]
    fn test_clock_rejects_zero_interval() {
        assert!(Clock::new(5.0, 0).is_err());
        let mut clk = Clock::default();
        assert!(clk.set_time_interval_ms(0).is_err());
        assert_eq!(clk.time_interval_ms(), DEFAULT_CLOCK_INTERVAL_MS);
    }
}
