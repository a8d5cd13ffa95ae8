//! Device context
//!
//! All mutable device state in one owned value, constructed once at boot and
//! passed by reference through the state machine.

use crate::{
    accumulator::MeasurementAccumulator,
    calibration::CalibrationData,
    channel::{ChannelStatus, DegradationFlags},
    errors::{CoreError, CoreResult},
    health::probe_channels,
    mailbox::ConfigMailbox,
    record::MeasurementRecord,
    settings::CycleSettings,
    time::Timestamp,
    traits::{CalibrationStore, FirmwareVersion, SensorHub},
};

/// Mutable device state
#[derive(Debug, Clone)]
pub struct DeviceContext {
    /// Cycle timing and policy
    pub settings: CycleSettings,
    /// Conversion constants
    pub calibration: CalibrationData,
    /// Channel enable flags
    pub status: ChannelStatus,
    /// Channels that dropped out and have not been reported yet
    pub flags: DegradationFlags,
    /// Current cycle's sums
    pub accumulator: MeasurementAccumulator,
    /// Server configuration message slot
    pub mailbox: ConfigMailbox,
    /// Running (or staged) firmware
    pub firmware: FirmwareVersion,
    /// UTC day of the last successful time sync
    pub ntp_last_sync_day: Option<u64>,
    /// UTC ms minus monotonic ms, known after the first sync
    pub wall_offset_ms: Option<i64>,
    /// Record produced by the last evaluation
    pub last_record: Option<MeasurementRecord>,
    /// Last record was appended to storage
    pub data_stored: bool,
    /// Last record was handed to the network
    pub data_transmitted: bool,
    /// Network states are skipped until this cycle ends
    pub offline_cycle: bool,
    /// Fault that sent the machine into Error
    pub last_fault: Option<CoreError>,
    /// Consecutive Error entries without progress
    pub error_retries: u8,
}

impl DeviceContext {
    /// Validate inputs and build a context with every channel disabled
    ///
    /// Call [`boot`](Self::boot) before the first step.
    pub fn new(
        settings: CycleSettings,
        calibration: CalibrationData,
        firmware: FirmwareVersion,
    ) -> CoreResult<Self> {
        settings.validate()?;
        calibration.validate()?;

        let status = ChannelStatus::new();
        Ok(Self {
            settings,
            calibration,
            status,
            flags: DegradationFlags::new(),
            accumulator: MeasurementAccumulator::new(&status),
            mailbox: ConfigMailbox::new(),
            firmware,
            ntp_last_sync_day: None,
            wall_offset_ms: None,
            last_record: None,
            data_stored: false,
            data_transmitted: false,
            offline_cycle: false,
            last_fault: None,
            error_retries: 0,
        })
    }

    /// Probe the sensors and start the first cycle's accumulator
    pub fn boot(&mut self, sensors: &mut dyn SensorHub, store: &mut dyn CalibrationStore) {
        self.status = probe_channels(sensors, store, &self.calibration, self.settings.gas_sensor);
        self.accumulator.reset(&self.status);
        if self.status.none_enabled() {
            log_error!("no sensor channel available");
        }
    }

    /// Map a monotonic reading to UTC ms, or pass it through before the first sync
    pub fn wall_time(&self, monotonic: Timestamp) -> Timestamp {
        match self.wall_offset_ms {
            Some(offset) => monotonic.saturating_add_signed(offset),
            None => monotonic,
        }
    }

    /// Record a completed time sync
    pub fn set_wall_time(&mut self, monotonic: Timestamp, utc: Timestamp) {
        self.wall_offset_ms = Some(utc as i64 - monotonic as i64);
    }

    /// Throw away the current cycle's partial state
    pub fn abandon_cycle(&mut self) {
        self.accumulator.reset(&self.status);
        self.last_record = None;
        self.data_stored = false;
        self.data_transmitted = false;
    }
}
