//! Measurement and evaluation core for airsense
//!
//! Samples climate, particulate, gas and ozone sensors once per tick,
//! averages them over a measurement cycle, converts raw gas-sensor signals to
//! µg/m³ and reduces everything to a 0–4 air-quality index.
//!
//! Key constraints:
//! - Runs on a single-core microcontroller with a cooperative control loop
//! - No heap allocation anywhere in the core
//! - A sensor that stops answering degrades the record, never the cycle
//!
//! ```no_run
//! use airsense_core::{
//!     CalibrationData, CycleController, CycleSettings, DeviceContext, FirmwareVersion,
//! };
//!
//! let context = DeviceContext::new(
//!     CycleSettings::default(),
//!     CalibrationData::default(),
//!     FirmwareVersion::new(1, 0, 0),
//! )
//! .unwrap();
//! // context.boot(&mut sensors, &mut eeprom);
//! let mut controller = CycleController::new(context);
//! // loop { controller.step(&mut collaborators); }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod accumulator;
pub mod averaging;
pub mod calibration;
pub mod channel;
pub mod constants;
pub mod cycle;
pub mod errors;
pub mod gas;
pub mod health;
pub mod index;
pub mod mailbox;
pub mod readings;
pub mod record;
pub mod settings;
pub mod time;
pub mod traits;
pub mod units;

// Public API
pub use accumulator::MeasurementAccumulator;
pub use averaging::{finalize, CycleAverages};
pub use calibration::{BaselineResistances, CalibrationData, CompensationCoefficients};
pub use channel::{ChannelStatus, DegradationFlags, FamilySet, SensorFamily};
pub use cycle::{CycleController, CycleState, DeviceContext, StateMachine, StepOutcome};
pub use errors::{BusFault, CoreError, CoreResult, CycleFault, ErrorKind, NetworkFault, StorageFault};
pub use index::AirQualityIndex;
pub use mailbox::ConfigMailbox;
pub use readings::{AdcPair, ClimateReading, GasTriplet, ParticulateReading, Sample};
pub use record::MeasurementRecord;
pub use settings::{ConfigUpdate, CycleSettings, GasSensorKind};
pub use time::{Deadline, FixedTime, Millis, TimeSource, Timestamp};
pub use traits::{
    CalibrationStore, Collaborators, ConfigDecoder, FirmwareVersion, Network, SensorHub, Storage,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
