//! Publishing results to the robot controller
//!
//! A [TelemetrySession] owns a [Transport] (a key/value table service) and
//! writes one [TelemetrySample] per frame into the `TagInfo` table. It also
//! reads the alliance color from the `FMSInfo` table.
mod error;
mod memory;
mod sample;

use serde::Serialize;
use tracing::{debug, info};

pub use error::TelemetryError;
pub use memory::MemoryTable;
pub use sample::TelemetrySample;

/// Default FRC team number
pub const DEFAULT_TEAM_NUMBER: u16 = 2199;

/// Table names and keys
pub mod keys {
    pub const TAG_INFO: &str = "TagInfo";
    /// Boolean
    pub const TARGET_VALID: &str = "tv";
    /// Double array: `[id, x, y, z, roll, pitch, yaw]`
    pub const BEST_RESULT: &str = "BestResult";
    /// Double
    pub const BEST_RESULT_ID: &str = "BestResultId";
    /// Double (seconds)
    pub const DETECTION_TIME: &str = "DetectionTime";

    pub const FMS_INFO: &str = "FMSInfo";
    /// Boolean
    pub const IS_RED_ALLIANCE: &str = "IsRedAlliance";
}

/// A value stored in a table
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableValue {
    Boolean(bool),
    Double(f64),
    DoubleArray(Vec<f64>),
}

impl TableValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double_array(&self) -> Option<&[f64]> {
        match self {
            Self::DoubleArray(value) => Some(value),
            _ => None,
        }
    }
}

/// Key/value table service
pub trait Transport {
    /// Open a client connection to the given team's server
    fn connect(&mut self, team_number: u16) -> Result<(), TelemetryError>;

    fn disconnect(&mut self);

    fn put(&mut self, table: &str, key: &str, value: TableValue) -> Result<(), TelemetryError>;

    fn get(&self, table: &str, key: &str) -> Option<TableValue>;
}

/// Receives one sample per processed frame
pub trait Publisher {
    fn publish(&mut self, sample: &TelemetrySample) -> Result<(), TelemetryError>;
}

/// Collects samples (useful for testing and replay)
impl Publisher for Vec<TelemetrySample> {
    fn publish(&mut self, sample: &TelemetrySample) -> Result<(), TelemetryError> {
        self.push(*sample);
        Ok(())
    }
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    fn publish(&mut self, sample: &TelemetrySample) -> Result<(), TelemetryError> {
        (**self).publish(sample)
    }
}

/// Explicitly owned connection to the robot controller
///
/// Must be [started](Self::start) before publishing.
#[derive(Debug)]
pub struct TelemetrySession<T: Transport> {
    transport: T,
    team_number: u16,
    started: bool,
}

impl<T: Transport> TelemetrySession<T> {
    pub fn new(transport: T) -> Self {
        Self::with_team(transport, DEFAULT_TEAM_NUMBER)
    }

    pub fn with_team(transport: T, team_number: u16) -> Self {
        Self {
            transport,
            team_number,
            started: false,
        }
    }

    pub const fn team_number(&self) -> u16 {
        self.team_number
    }

    pub const fn is_started(&self) -> bool {
        self.started
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn start(&mut self) -> Result<(), TelemetryError> {
        if self.started {
            return Err(TelemetryError::AlreadyStarted);
        }
        self.transport.connect(self.team_number)?;
        self.started = true;
        info!(team = self.team_number, "Telemetry session started");
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), TelemetryError> {
        if !self.started {
            return Err(TelemetryError::NotStarted);
        }
        self.transport.disconnect();
        self.started = false;
        info!(team = self.team_number, "Telemetry session stopped");
        Ok(())
    }

    /// Alliance color reported by the field management system
    ///
    /// Returns `None` if the value has not been published (e.g. not on a field).
    pub fn is_red_alliance(&self) -> Result<Option<bool>, TelemetryError> {
        if !self.started {
            return Err(TelemetryError::NotStarted);
        }
        Ok(self.transport
            .get(keys::FMS_INFO, keys::IS_RED_ALLIANCE)
            .and_then(|value| value.as_bool()))
    }

    /// Consume the session, returning the transport
    pub fn into_inner(mut self) -> T {
        if self.started {
            self.transport.disconnect();
            self.started = false;
        }
        self.transport
    }
}

impl<T: Transport> Publisher for TelemetrySession<T> {
    /// Writes `tv` every frame. The best result, its id and the detection
    /// time are only written when there is a target, so the controller keeps
    /// the last seen target otherwise.
    fn publish(&mut self, sample: &TelemetrySample) -> Result<(), TelemetryError> {
        if !self.started {
            return Err(TelemetryError::NotStarted);
        }
        if sample.target_valid {
            // BestResult first, it carries its own id
            let transport = &mut self.transport;
            transport.put(keys::TAG_INFO, keys::BEST_RESULT, TableValue::DoubleArray(sample.best_result_array().to_vec()))?;
            transport.put(keys::TAG_INFO, keys::BEST_RESULT_ID, TableValue::Double(sample.tag_id as f64))?;
            transport.put(keys::TAG_INFO, keys::DETECTION_TIME, TableValue::Double(sample.timestamp_sec))?;
        }
        self.transport.put(keys::TAG_INFO, keys::TARGET_VALID, TableValue::Boolean(sample.target_valid))?;
        debug!(id = sample.tag_id, valid = sample.target_valid, "Published sample");
        Ok(())
    }
}
