//! Rangefinder adapters.
//!
//! No ultrasonic driver ships with the host build.  [`FixedRangefinders`]
//! replays configured readings (bench runs, tests) and [`NoRangefinders`]
//! stands in for a chassis with nothing fitted.

use crate::app::ports::{DistancePort, DistanceReading, DistanceReadings, SensorName};
use crate::error::SensorError;

/// Always answers with the same readings.
#[derive(Debug, Clone, Default)]
pub struct FixedRangefinders {
    readings: DistanceReadings,
}

impl FixedRangefinders {
    pub fn new(readings: DistanceReadings) -> Self {
        Self { readings }
    }

    /// Append one reading.  Returns it back if the chassis is already full.
    pub fn push(&mut self, reading: DistanceReading) -> Result<(), DistanceReading> {
        self.readings.push(reading)
    }
}

impl DistancePort for FixedRangefinders {
    fn distances_cm(&mut self) -> Result<DistanceReadings, SensorError> {
        if self.readings.is_empty() {
            return Err(SensorError::Unavailable);
        }
        Ok(self.readings.clone())
    }
}

/// A chassis without rangefinders.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRangefinders;

impl DistancePort for NoRangefinders {
    fn distances_cm(&mut self) -> Result<DistanceReadings, SensorError> {
        Err(SensorError::Unavailable)
    }
}

/// Parse `name=centimeters`, e.g. `front=42.5`.
pub fn parse_reading(s: &str) -> Result<DistanceReading, String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <name>=<cm>, got '{s}'"))?;
    let name = SensorName::try_from(name.trim())
        .map_err(|()| format!("sensor name '{name}' is too long"))?;
    if name.is_empty() {
        return Err("sensor name is empty".into());
    }
    let centimeters: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a distance"))?;
    if !centimeters.is_finite() || centimeters < 0.0 {
        return Err(format!("'{value}' is not a distance"));
    }
    Ok(DistanceReading { name, centimeters })
}
