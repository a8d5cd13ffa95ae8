//! Cycle controller
//!
//! [`CycleController::step`] runs the current state's action exactly once
//! and returns. Waiting states keep a [`Deadline`] and report
//! [`Transition::Stay`] until it expires, so nothing in here blocks.
//!
//! Fault routing:
//!
//! - `Fatal` errors halt the controller; every later step returns
//!   [`StepOutcome::Halted`].
//! - Any other error diverts into `Error`, which backs off and resumes at the
//!   interrupted state while retries remain. Once they are used up the cycle
//!   restarts and runs offline until it completes.
//! - Sensor read misses never get here; the accumulator absorbs them.

use crate::{
    averaging::finalize,
    channel::SensorFamily,
    errors::{CoreError, CoreResult, CycleFault},
    gas::immediate_concentrations,
    health::{verify_baselines, BaselineCheck},
    index::AirQualityIndex,
    readings::Sample,
    record::MeasurementRecord,
    time::{utc_day, Deadline, Millis, Timestamp},
    traits::Collaborators,
};

use super::{CycleState, DeviceContext, StateMachine};

/// What a single step produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Nothing externally visible
    Running,
    /// A record was stored and handed to the network
    Emitted(MeasurementRecord),
    /// Automated operation stopped; the device-level fault policy takes over
    Halted(CoreError),
}

/// Result of one state action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Stay,
    Go(CycleState),
}

/// Drives the state machine against a device context
#[derive(Debug, Clone)]
pub struct CycleController {
    machine: StateMachine,
    context: DeviceContext,
    deadline: Option<Deadline>,
    emitted: Option<MeasurementRecord>,
    halted: Option<CoreError>,
}

impl CycleController {
    /// Controller at the first state; the context should already be booted
    pub fn new(context: DeviceContext) -> Self {
        Self {
            machine: StateMachine::new(),
            context,
            deadline: None,
            emitted: None,
            halted: None,
        }
    }

    /// State bookkeeping
    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// Active state
    pub fn state(&self) -> CycleState {
        self.machine.current()
    }

    /// Device state
    pub fn context(&self) -> &DeviceContext {
        &self.context
    }

    /// Device state, for the platform glue (e.g. posting to the mailbox)
    pub fn context_mut(&mut self) -> &mut DeviceContext {
        &mut self.context
    }

    /// Fatal error that stopped the controller, if any
    pub fn halted(&self) -> Option<CoreError> {
        self.halted
    }

    /// Advance by one control-loop iteration
    pub fn step(&mut self, io: &mut Collaborators<'_>) -> StepOutcome {
        if let Some(err) = self.halted {
            return StepOutcome::Halted(err);
        }

        let now = io.clock.now();
        let state = self.machine.current();
        let entering = self.machine.enter();
        if entering {
            io.display.show_state(state);
        }

        let result = match state {
            CycleState::UpdateConfigFromServer => self.update_config(io, entering, now),
            CycleState::WaitForNtpSync => self.wait_for_ntp(io, entering, now),
            CycleState::FirmwareVersionCheck => self.check_firmware(io),
            CycleState::WaitForTimeout => self.wait_for_tick(io, entering, now),
            CycleState::ReadSensors => self.read_sensors(io),
            CycleState::EvalSensorStatus => self.evaluate(io, now),
            CycleState::SendData => self.send_data(io),
            CycleState::Error => Ok(self.recover(entering, now)),
        };

        match result {
            Ok(Transition::Stay) => {}
            Ok(Transition::Go(next)) => {
                if state != CycleState::Error {
                    self.context.error_retries = 0;
                }
                self.deadline = None;
                self.machine.advance(next);
            }
            Err(err) if !err.is_recoverable() => {
                log_error!("halting in {}: {}", state, err);
                self.halted = Some(err);
                return StepOutcome::Halted(err);
            }
            Err(err) => {
                log_warn!("fault in {}: {}", state, err);
                self.context.last_fault = Some(err);
                self.deadline = None;
                self.machine.fault();
            }
        }

        match self.emitted.take() {
            Some(record) => StepOutcome::Emitted(record),
            None => StepOutcome::Running,
        }
    }

    fn start_wait(&mut self, now: Timestamp, duration: Millis) -> Deadline {
        let deadline = Deadline::after(now, duration);
        self.deadline = Some(deadline);
        deadline
    }

    fn update_config(
        &mut self,
        io: &mut Collaborators<'_>,
        entering: bool,
        now: Timestamp,
    ) -> CoreResult<Transition> {
        if self.context.offline_cycle {
            return Ok(Transition::Go(CycleState::WaitForNtpSync));
        }

        if entering || self.deadline.is_none() {
            io.network.connect().map_err(CycleFault::Network)?;
            io.network.request_config().map_err(CycleFault::Network)?;
            self.start_wait(now, self.context.settings.config_timeout);
        }

        if let Some(payload) = self.context.mailbox.take() {
            let ctx = &mut self.context;
            match io.decoder.decode(&payload) {
                Ok(update) if update.is_empty() => log_debug!("server config has no overrides"),
                Ok(update) => match update.apply(&mut ctx.settings, &mut ctx.calibration) {
                    Ok(()) => {
                        log_info!("server config applied");
                        if update.baselines.is_some() {
                            self.sync_baselines(io);
                        }
                    }
                    Err(err) => log_warn!("server config rejected: {}", err),
                },
                Err(err) => log_warn!("server config unreadable: {}", err),
            }
            return Ok(Transition::Go(CycleState::WaitForNtpSync));
        }

        match self.deadline {
            Some(deadline) if deadline.expired(now) => {
                log_info!("no server config received, keeping current settings");
                Ok(Transition::Go(CycleState::WaitForNtpSync))
            }
            _ => Ok(Transition::Stay),
        }
    }

    /// Push new baselines into the primary gas sensor's EEPROM
    ///
    /// Runs before the first tick, so the accumulator holds nothing yet. A
    /// write-back that does not verify takes the channel out like a failed
    /// boot check would.
    fn sync_baselines(&mut self, io: &mut Collaborators<'_>) {
        let ctx = &mut self.context;
        if !ctx.status.is_enabled(SensorFamily::PrimaryGas) {
            return;
        }

        match verify_baselines(io.calibration_store, &ctx.calibration.baselines) {
            Ok(BaselineCheck::Verified) => log_debug!("sensor already holds the new baselines"),
            Ok(BaselineCheck::Rewritten) => log_info!("sensor baselines rewritten"),
            Err(err) => {
                log_error!("primary gas disabled: {}", err);
                ctx.status.disable(SensorFamily::PrimaryGas);
                ctx.flags.raise(SensorFamily::PrimaryGas);
                ctx.accumulator.reset(&ctx.status);
            }
        }
    }

    fn wait_for_ntp(
        &mut self,
        io: &mut Collaborators<'_>,
        entering: bool,
        now: Timestamp,
    ) -> CoreResult<Transition> {
        if self.context.offline_cycle {
            return Ok(Transition::Go(CycleState::FirmwareVersionCheck));
        }

        if entering || self.deadline.is_none() {
            let synced_today = self.context.wall_offset_ms.is_some()
                && self.context.ntp_last_sync_day == Some(utc_day(self.context.wall_time(now)));
            if synced_today {
                log_debug!("time already synced today");
                return Ok(Transition::Go(CycleState::FirmwareVersionCheck));
            }
            self.start_wait(now, self.context.settings.ntp_timeout);
        }

        match io.network.poll_time_sync() {
            Ok(utc) => {
                self.context.set_wall_time(now, utc);
                self.context.ntp_last_sync_day = Some(utc_day(utc));
                log_info!("time synced, UTC day {}", utc_day(utc));
                Ok(Transition::Go(CycleState::FirmwareVersionCheck))
            }
            Err(nb::Error::WouldBlock) => match self.deadline {
                Some(deadline) if deadline.expired(now) => Err(CycleFault::NtpTimeout.into()),
                _ => Ok(Transition::Stay),
            },
            Err(nb::Error::Other(fault)) => Err(CycleFault::Network(fault).into()),
        }
    }

    fn check_firmware(&mut self, io: &mut Collaborators<'_>) -> CoreResult<Transition> {
        if self.context.offline_cycle {
            return Ok(Transition::Go(CycleState::WaitForTimeout));
        }

        let latest = io.network.latest_firmware().map_err(CycleFault::Network)?;
        let running = self.context.firmware;
        if latest > running {
            if self.context.settings.firmware_auto_upgrade {
                io.network.apply_update(latest).map_err(CycleFault::Network)?;
                log_info!("firmware {} staged (was {})", latest, running);
                self.context.firmware = latest;
            } else {
                log_info!("firmware {} available, auto-upgrade off", latest);
            }
        }
        Ok(Transition::Go(CycleState::WaitForTimeout))
    }

    fn wait_for_tick(
        &mut self,
        io: &mut Collaborators<'_>,
        entering: bool,
        now: Timestamp,
    ) -> CoreResult<Transition> {
        let interval = self.context.settings.sample_interval;
        let deadline = match (self.deadline, entering) {
            (Some(deadline), false) => deadline,
            _ => self.start_wait(now, interval),
        };

        if !deadline.expired(now) {
            io.display.show_countdown(deadline.remaining(now));
            return Ok(Transition::Stay);
        }

        // A stall longer than a whole interval means ticks were lost
        if now.saturating_sub(deadline.at()) > interval.ticks() {
            return Err(CycleFault::WaitOverrun.into());
        }
        Ok(Transition::Go(CycleState::ReadSensors))
    }

    fn read_sensors(&mut self, io: &mut Collaborators<'_>) -> CoreResult<Transition> {
        io.sensors.prepare().map_err(CycleFault::SensorBus)?;

        let status = self.context.status;
        let sensors = &mut *io.sensors;
        let sample = Sample {
            climate: if status.is_enabled(SensorFamily::Climate) {
                sensors.read_climate()
            } else {
                None
            },
            particulate: if status.is_enabled(SensorFamily::Particulate) {
                sensors.read_particulate()
            } else {
                None
            },
            primary_gas: if status.is_enabled(SensorFamily::PrimaryGas) {
                sensors.read_primary_gas()
            } else {
                None
            },
            alternate_gas: if status.is_enabled(SensorFamily::AlternateGas) {
                sensors.read_alternate_gas()
            } else {
                None
            },
            ozone_points: if status.is_enabled(SensorFamily::Ozone) {
                sensors.read_ozone_points()
            } else {
                None
            },
        };

        let ctx = &mut self.context;
        if let Some(adc) = sample.alternate_gas {
            match immediate_concentrations(adc, &ctx.calibration.baselines) {
                Ok(live) => io.display.show_live_gas(&live),
                Err(err) => log_debug!("no live gas reading: {}", err),
            }
        }
        ctx.accumulator.accumulate(&status, &sample, &ctx.calibration);

        if ctx.accumulator.samples() >= ctx.settings.samples_per_cycle {
            Ok(Transition::Go(CycleState::EvalSensorStatus))
        } else {
            Ok(Transition::Go(CycleState::WaitForTimeout))
        }
    }

    fn evaluate(&mut self, io: &mut Collaborators<'_>, now: Timestamp) -> CoreResult<Transition> {
        let ctx = &mut self.context;
        let cycle_length = ctx.accumulator.samples();
        let averages = finalize(
            &mut ctx.accumulator,
            cycle_length,
            &mut ctx.status,
            &mut ctx.flags,
            &ctx.calibration,
        );
        if ctx.status.none_enabled() {
            log_warn!("every channel is disabled");
        }

        let index = AirQualityIndex::evaluate(&averages, &ctx.status);
        let record = MeasurementRecord::from_cycle(ctx.wall_time(now), &averages, index);
        record.log_summary();
        io.display.show_record(&record);

        ctx.last_record = Some(record);
        ctx.data_stored = false;
        ctx.data_transmitted = false;
        Ok(Transition::Go(CycleState::SendData))
    }

    fn send_data(&mut self, io: &mut Collaborators<'_>) -> CoreResult<Transition> {
        let ctx = &mut self.context;
        let Some(record) = ctx.last_record else {
            log_warn!("nothing to send");
            return Ok(Transition::Go(CycleState::INITIAL));
        };

        if !io.storage.is_present() {
            return Err(CoreError::Fatal {
                reason: "measurement storage not present",
            });
        }

        if !ctx.data_stored {
            io.storage.append(&record).map_err(CycleFault::Storage)?;
            ctx.data_stored = true;
        }

        if ctx.data_transmitted {
            log_warn!("record already transmitted this cycle, skipping");
        } else {
            if ctx.offline_cycle {
                log_warn!("offline cycle, record kept in storage only");
            } else {
                io.network.send(&record).map_err(CycleFault::Network)?;
            }
            ctx.data_transmitted = true;
            ctx.flags.take();
            self.emitted = Some(record);
        }

        ctx.offline_cycle = false;
        Ok(Transition::Go(CycleState::INITIAL))
    }

    fn recover(&mut self, entering: bool, now: Timestamp) -> Transition {
        let deadline = match (self.deadline, entering) {
            (Some(deadline), false) => deadline,
            _ => {
                self.context.error_retries = self.context.error_retries.saturating_add(1);
                self.start_wait(now, self.context.settings.error_backoff)
            }
        };
        if !deadline.expired(now) {
            return Transition::Stay;
        }

        let return_state = self.machine.return_state();
        if self.context.error_retries <= self.context.settings.max_error_retries {
            log_warn!(
                "resuming at {} (attempt {} of {})",
                return_state,
                self.context.error_retries,
                self.context.settings.max_error_retries
            );
            return Transition::Go(return_state);
        }

        log_warn!("retries exhausted in {}, restarting cycle offline", return_state);
        self.context.error_retries = 0;
        self.context.offline_cycle = true;
        self.context.abandon_cycle();
        self.deadline = None;
        self.machine.restart();
        Transition::Stay
    }
}
