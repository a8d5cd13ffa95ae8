//! Shared integration-test support
//!
//! - [`fakes`]: scripted collaborators
//! - [`scenarios`]: ready-made sensor setups and settings
//! - [`Rig`]: owns one of each fake plus a manual clock and drives a
//!   [`CycleController`] step by step

#![allow(dead_code)]

pub mod fakes;
pub mod scenarios;

use airsense_core::{
    Collaborators, CycleController, CycleState, DeviceContext, FixedTime, MeasurementRecord,
    Millis, StepOutcome,
};

use fakes::{
    FakeEeprom, KeyValueDecoder, MemoryStorage, RecordingDisplay, ScriptedNetwork,
    ScriptedSensors,
};

/// Upper bound on steps for any helper loop
pub const MAX_STEPS: usize = 10_000;

/// One device's worth of fakes
pub struct Rig {
    pub sensors: ScriptedSensors,
    pub eeprom: FakeEeprom,
    pub network: ScriptedNetwork,
    pub storage: MemoryStorage,
    pub display: RecordingDisplay,
    pub clock: FixedTime,
    pub decoder: KeyValueDecoder,
    /// Clock advance after every step
    pub tick: Millis,
}

impl Rig {
    pub fn new(sensors: ScriptedSensors, eeprom: FakeEeprom, network: ScriptedNetwork) -> Self {
        Self {
            sensors,
            eeprom,
            network,
            storage: MemoryStorage::default(),
            display: RecordingDisplay::default(),
            clock: FixedTime::new(0),
            decoder: KeyValueDecoder,
            tick: Millis::millis(500),
        }
    }

    /// Probe sensors into the context, as the device does at power-up
    pub fn boot(&mut self, context: &mut DeviceContext) {
        context.boot(&mut self.sensors, &mut self.eeprom);
    }

    /// One controller step, then advance the clock by [`Rig::tick`]
    pub fn step(&mut self, controller: &mut CycleController) -> StepOutcome {
        let mut io = Collaborators {
            sensors: &mut self.sensors,
            calibration_store: &mut self.eeprom,
            network: &mut self.network,
            storage: &mut self.storage,
            display: &mut self.display,
            clock: &self.clock,
            decoder: &self.decoder,
        };
        let outcome = controller.step(&mut io);
        self.clock.advance(self.tick);
        outcome
    }

    /// Step until a record is emitted
    pub fn run_until_record(&mut self, controller: &mut CycleController) -> MeasurementRecord {
        for _ in 0..MAX_STEPS {
            match self.step(controller) {
                StepOutcome::Emitted(record) => return record,
                StepOutcome::Halted(err) => panic!("controller halted: {}", err),
                StepOutcome::Running => {}
            }
        }
        panic!("no record after {} steps", MAX_STEPS);
    }

    /// Step until the controller is in `state`, returning the steps taken
    pub fn run_until_state(&mut self, controller: &mut CycleController, state: CycleState) -> usize {
        for steps in 0..MAX_STEPS {
            if controller.state() == state {
                return steps;
            }
            if let StepOutcome::Halted(err) = self.step(controller) {
                panic!("controller halted: {}", err);
            }
        }
        panic!("never reached {} after {} steps", state, MAX_STEPS);
    }
}
