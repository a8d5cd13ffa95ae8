//! Scripted collaborator fakes
//!
//! Each fake records what the controller asked of it so tests can assert on
//! the interaction as well as on the emitted record.

use std::collections::VecDeque;

use airsense_core::{
    calibration::BASELINE_COMMAND_LEN,
    cycle::CycleState,
    errors::{BusFault, CoreError, CoreResult, NetworkFault, StorageFault},
    health::FusionStatus,
    settings::ConfigUpdate,
    traits::{CalibrationStore, ConfigDecoder, Display, FirmwareVersion, Network, SensorHub, Storage},
    AdcPair, BaselineResistances, ClimateReading, FamilySet, GasTriplet, MeasurementRecord,
    Millis, ParticulateReading, SensorFamily, Timestamp,
};

/// Sensor hub returning fixed readings, with per-family forced misses
#[derive(Debug, Clone)]
pub struct ScriptedSensors {
    pub climate: Option<ClimateReading>,
    pub particulate: Option<ParticulateReading>,
    pub primary_gas: Option<GasTriplet>,
    pub alternate_gas: Option<AdcPair>,
    pub ozone_points: Option<i32>,
    /// Families whose reads always miss
    pub missing: FamilySet,
    /// Number of upcoming `prepare` calls that fail
    pub bus_failures: u32,
    pub fusion: FusionStatus,
    /// Digital sensors that answer their handshake
    pub responding: FamilySet,
    /// Raw analog level per family (indexed by family discriminant)
    pub analog: [i32; 5],
    pub prepares: u32,
    pub reads: Vec<SensorFamily>,
}

impl Default for ScriptedSensors {
    fn default() -> Self {
        Self {
            climate: None,
            particulate: None,
            primary_gas: None,
            alternate_gas: None,
            ozone_points: None,
            missing: FamilySet::empty(),
            bus_failures: 0,
            fusion: FusionStatus::default(),
            responding: FamilySet::empty(),
            analog: [0; 5],
            prepares: 0,
            reads: Vec::new(),
        }
    }
}

impl ScriptedSensors {
    fn read<T: Copy>(&mut self, family: SensorFamily, value: Option<T>) -> Option<T> {
        self.reads.push(family);
        if self.missing.contains(family) {
            None
        } else {
            value
        }
    }

    /// How many times a family was read
    pub fn read_count(&self, family: SensorFamily) -> usize {
        self.reads.iter().filter(|f| **f == family).count()
    }
}

impl SensorHub for ScriptedSensors {
    fn prepare(&mut self) -> Result<(), BusFault> {
        self.prepares += 1;
        if self.bus_failures > 0 {
            self.bus_failures -= 1;
            return Err(BusFault::NotAwake);
        }
        Ok(())
    }

    fn read_climate(&mut self) -> Option<ClimateReading> {
        self.read(SensorFamily::Climate, self.climate)
    }

    fn read_particulate(&mut self) -> Option<ParticulateReading> {
        self.read(SensorFamily::Particulate, self.particulate)
    }

    fn read_primary_gas(&mut self) -> Option<GasTriplet> {
        self.read(SensorFamily::PrimaryGas, self.primary_gas)
    }

    fn read_alternate_gas(&mut self) -> Option<AdcPair> {
        self.read(SensorFamily::AlternateGas, self.alternate_gas)
    }

    fn read_ozone_points(&mut self) -> Option<i32> {
        self.read(SensorFamily::Ozone, self.ozone_points)
    }

    fn fusion_status(&mut self) -> FusionStatus {
        self.fusion
    }

    fn responds(&mut self, family: SensorFamily) -> bool {
        self.responding.contains(family)
    }

    fn analog_level(&mut self, family: SensorFamily) -> i32 {
        self.analog[family as usize]
    }
}

/// Gas sensor EEPROM
#[derive(Debug, Clone)]
pub struct FakeEeprom {
    pub stored: BaselineResistances,
    pub accepts_writes: bool,
    pub writes: Vec<[u8; BASELINE_COMMAND_LEN]>,
}

impl FakeEeprom {
    pub fn holding(stored: BaselineResistances) -> Self {
        Self { stored, accepts_writes: true, writes: Vec::new() }
    }
}

impl CalibrationStore for FakeEeprom {
    fn read_baselines(&mut self) -> Result<BaselineResistances, BusFault> {
        Ok(self.stored)
    }

    fn write_baselines(&mut self, command: &[u8; BASELINE_COMMAND_LEN]) -> Result<(), BusFault> {
        self.writes.push(*command);
        if self.accepts_writes {
            self.stored = BaselineResistances {
                nh3: u16::from_be_bytes([command[1], command[2]]),
                red: u16::from_be_bytes([command[3], command[4]]),
                ox: u16::from_be_bytes([command[5], command[6]]),
            };
        }
        Ok(())
    }
}

/// One scripted answer to a time-sync poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NtpReply {
    Synced(Timestamp),
    Pending,
    Fail(NetworkFault),
}

/// Network link with scripted failures
#[derive(Debug, Clone)]
pub struct ScriptedNetwork {
    /// Upcoming `connect` calls that fail; `u32::MAX` means always
    pub connect_failures: u32,
    /// Replies consumed in order; `ntp_default` once empty
    pub ntp_script: VecDeque<NtpReply>,
    pub ntp_default: NtpReply,
    pub latest: FirmwareVersion,
    pub send_failures: u32,
    pub connects: u32,
    pub config_requests: u32,
    pub ntp_polls: u32,
    pub updates_applied: Vec<FirmwareVersion>,
    pub sent: Vec<MeasurementRecord>,
}

impl ScriptedNetwork {
    pub fn synced_at(utc: Timestamp) -> Self {
        Self {
            connect_failures: 0,
            ntp_script: VecDeque::new(),
            ntp_default: NtpReply::Synced(utc),
            latest: FirmwareVersion::default(),
            send_failures: 0,
            connects: 0,
            config_requests: 0,
            ntp_polls: 0,
            updates_applied: Vec::new(),
            sent: Vec::new(),
        }
    }
}

impl Network for ScriptedNetwork {
    fn connect(&mut self) -> Result<(), NetworkFault> {
        self.connects += 1;
        if self.connect_failures > 0 {
            if self.connect_failures != u32::MAX {
                self.connect_failures -= 1;
            }
            return Err(NetworkFault::NotConnected);
        }
        Ok(())
    }

    fn request_config(&mut self) -> Result<(), NetworkFault> {
        self.config_requests += 1;
        Ok(())
    }

    fn poll_time_sync(&mut self) -> nb::Result<Timestamp, NetworkFault> {
        self.ntp_polls += 1;
        match self.ntp_script.pop_front().unwrap_or(self.ntp_default) {
            NtpReply::Synced(utc) => Ok(utc),
            NtpReply::Pending => Err(nb::Error::WouldBlock),
            NtpReply::Fail(fault) => Err(nb::Error::Other(fault)),
        }
    }

    fn latest_firmware(&mut self) -> Result<FirmwareVersion, NetworkFault> {
        Ok(self.latest)
    }

    fn apply_update(&mut self, version: FirmwareVersion) -> Result<(), NetworkFault> {
        self.updates_applied.push(version);
        Ok(())
    }

    fn send(&mut self, record: &MeasurementRecord) -> Result<(), NetworkFault> {
        if self.send_failures > 0 {
            self.send_failures -= 1;
            return Err(NetworkFault::Timeout);
        }
        self.sent.push(*record);
        Ok(())
    }
}

/// In-memory measurement log
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    pub present: bool,
    pub append_failures: u32,
    pub records: Vec<MeasurementRecord>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self { present: true, append_failures: 0, records: Vec::new() }
    }
}

impl Storage for MemoryStorage {
    fn is_present(&mut self) -> bool {
        self.present
    }

    fn append(&mut self, record: &MeasurementRecord) -> Result<(), StorageFault> {
        if self.append_failures > 0 {
            self.append_failures -= 1;
            return Err(StorageFault::WriteFailed);
        }
        self.records.push(*record);
        Ok(())
    }
}

/// Display that remembers what it was asked to draw
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pub states: Vec<CycleState>,
    pub countdowns: Vec<Millis>,
    pub records: Vec<MeasurementRecord>,
    pub live_gas: Vec<GasTriplet>,
}

impl Display for RecordingDisplay {
    fn show_state(&mut self, state: CycleState) {
        self.states.push(state);
    }

    fn show_countdown(&mut self, remaining: Millis) {
        self.countdowns.push(remaining);
    }

    fn show_record(&mut self, record: &MeasurementRecord) {
        self.records.push(*record);
    }

    fn show_live_gas(&mut self, gas: &GasTriplet) {
        self.live_gas.push(*gas);
    }
}

/// Decoder for `key=value` lines, enough to exercise the mailbox path
#[derive(Debug, Clone, Default)]
pub struct KeyValueDecoder;

impl ConfigDecoder for KeyValueDecoder {
    fn decode(&self, payload: &[u8]) -> CoreResult<ConfigUpdate> {
        let text = std::str::from_utf8(payload).map_err(|_| CoreError::InvalidSettings {
            reason: "payload is not UTF-8",
        })?;

        let mut update = ConfigUpdate::default();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let (key, value) = line.split_once('=').ok_or(CoreError::InvalidSettings {
                reason: "expected key=value",
            })?;
            if key.trim() == "baselines" {
                update.baselines = Some(parse_baselines(value)?);
                continue;
            }
            let number: u64 = value.trim().parse().map_err(|_| CoreError::InvalidSettings {
                reason: "value is not a number",
            })?;
            match key.trim() {
                "samples" => update.samples_per_cycle = Some(number as u16),
                "interval_s" => update.sample_interval = Some(Millis::secs(number)),
                "auto_upgrade" => update.firmware_auto_upgrade = Some(number != 0),
                _ => {
                    return Err(CoreError::InvalidSettings { reason: "unknown key" });
                }
            }
        }
        Ok(update)
    }
}

/// `red,ox,nh3`
fn parse_baselines(value: &str) -> CoreResult<BaselineResistances> {
    let counts = value
        .split(',')
        .map(|part| part.trim().parse::<u16>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| CoreError::InvalidSettings { reason: "baseline is not a number" })?;
    match counts.as_slice() {
        [red, ox, nh3] => Ok(BaselineResistances { red: *red, ox: *ox, nh3: *nh3 }),
        _ => Err(CoreError::InvalidSettings { reason: "expected red,ox,nh3" }),
    }
}
