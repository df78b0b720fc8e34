// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transition logic of the kettle.
//!
//! [`KettleCore`] holds the state record and both timers. It is only ever
//! reached through the mutex in [`Kettle`](super::Kettle), so every method
//! here runs as one indivisible transition: a timer is cancelled in the
//! same critical section as the state change that invalidates it.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::config::KettleConfig;
use crate::error::KettleError;
use crate::event::{EventBus, KettleEvent};
use crate::state::{KettleState, StateChange};
use crate::timer::{PeriodicTimer, Scheduler};
use crate::types::WaterLevel;

#[derive(Debug)]
pub(crate) struct KettleCore {
    config: KettleConfig,
    state: KettleState,
    heating_timer: PeriodicTimer,
    cooldown_timer: PeriodicTimer,
    scheduler: Arc<dyn Scheduler>,
    events: EventBus,
    state_tx: watch::Sender<KettleState>,
    /// Handle given to timer callbacks; never upgraded while `self` is borrowed.
    this: Weak<Mutex<KettleCore>>,
}

impl KettleCore {
    pub(crate) fn new(
        config: KettleConfig,
        scheduler: Arc<dyn Scheduler>,
        events: EventBus,
        state_tx: watch::Sender<KettleState>,
        this: Weak<Mutex<KettleCore>>,
    ) -> Self {
        let state = KettleState::initial(&config);
        Self {
            heating_timer: PeriodicTimer::new("heating", config.heating_interval),
            cooldown_timer: PeriodicTimer::new("cooldown", config.cooldown_interval),
            config,
            state,
            scheduler,
            events,
            state_tx,
            this,
        }
    }

    pub(crate) fn state(&self) -> KettleState {
        self.state
    }

    pub(crate) fn is_heating_timer_active(&self) -> bool {
        self.heating_timer.is_active()
    }

    pub(crate) fn is_cooldown_timer_active(&self) -> bool {
        self.cooldown_timer.is_active()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub(crate) fn toggle_power(&mut self) -> Result<(), KettleError> {
        if !self.state.is_plugged_in {
            return self.reject(KettleError::NotPluggedIn);
        }
        if self.state.is_heating {
            self.switch_off("power toggled off");
            return Ok(());
        }
        if self.state.water_level.is_empty() {
            return self.reject(KettleError::NoWater);
        }
        self.switch_on();
        Ok(())
    }

    pub(crate) fn toggle_plug(&mut self) {
        let plugged = !self.state.is_plugged_in;
        if !plugged && self.state.is_heating {
            tracing::info!("Kettle unplugged while heating, forcing heating off");
            self.heating_timer.cancel();
            self.commit(StateChange::batch(vec![
                StateChange::Plug(false),
                StateChange::Heating(false),
            ]));
            self.start_cooldown_if_warm();
            return;
        }
        tracing::debug!(plugged, "Plug toggled");
        self.commit(StateChange::Plug(plugged));
    }

    pub(crate) fn add_water(&mut self, amount: f64) -> Result<(), KettleError> {
        if !amount.is_finite() || amount < 0.0 {
            return self.reject(KettleError::InvalidAmount(amount));
        }
        if amount == 0.0 {
            self.empty();
            return Ok(());
        }

        let level = self.state.water_level.saturating_add(amount);
        tracing::debug!(amount, level = %level, "Water added");
        self.commit(StateChange::batch(vec![
            StateChange::WaterLevel(level),
            StateChange::Temperature(self.config.room_temperature),
        ]));
        Ok(())
    }

    /// Empties the kettle and drops the temperature to the initial value.
    pub(crate) fn empty(&mut self) {
        let mut changes = Vec::with_capacity(3);
        if self.state.is_heating {
            tracing::info!("Kettle emptied while heating, forcing heating off");
            self.heating_timer.cancel();
            changes.push(StateChange::Heating(false));
        }
        changes.push(StateChange::WaterLevel(WaterLevel::EMPTY));
        changes.push(StateChange::Temperature(self.config.initial_temperature));
        tracing::debug!("Kettle emptied");
        self.commit(StateChange::batch(changes));
    }

    pub(crate) fn stop(&mut self) -> bool {
        if !self.state.is_heating {
            return false;
        }
        self.switch_off("stopped");
        true
    }

    // =========================================================================
    // Ticks
    // =========================================================================

    /// Heating tick. `generation` is `Some` for ticks coming from the timer.
    pub(crate) fn heating_tick(&mut self, generation: Option<u64>) {
        if let Some(generation) = generation
            && !self.heating_timer.is_current(generation)
        {
            tracing::trace!(generation, "Discarding stale heating tick");
            return;
        }
        if !self.state.is_heating {
            return;
        }

        let (next, reached) = self
            .state
            .temperature
            .heated_by(self.config.heating_step, self.config.max_temperature);
        if !reached {
            tracing::trace!(temperature = %next, "Heating tick");
            self.commit(StateChange::Temperature(next));
            return;
        }

        self.heating_timer.cancel();
        self.commit(StateChange::batch(vec![
            StateChange::Temperature(next),
            StateChange::Heating(false),
        ]));
        tracing::info!(temperature = %next, "Boiling point reached, kettle switched off");
        self.events.publish(KettleEvent::Boiled { temperature: next });
        self.start_cooldown_if_warm();
    }

    /// Cooldown tick. `generation` is `Some` for ticks coming from the timer.
    pub(crate) fn cooldown_tick(&mut self, generation: Option<u64>) {
        if let Some(generation) = generation
            && !self.cooldown_timer.is_current(generation)
        {
            tracing::trace!(generation, "Discarding stale cooldown tick");
            return;
        }
        if self.state.is_heating {
            return;
        }
        let room = self.config.room_temperature;
        if self.state.temperature <= room {
            self.cooldown_timer.cancel();
            return;
        }

        let (next, reached) = self
            .state
            .temperature
            .cooled_by(self.config.cooling_step, room);
        tracing::trace!(temperature = %next, "Cooldown tick");
        self.commit(StateChange::Temperature(next));
        if reached {
            self.cooldown_timer.cancel();
            tracing::debug!(temperature = %next, "Cooled down to room temperature");
            self.events.publish(KettleEvent::CooledDown { temperature: next });
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn switch_on(&mut self) {
        self.cooldown_timer.cancel();
        self.commit(StateChange::Heating(true));
        if !self.heating_timer.is_active() {
            let core = self.this.clone();
            self.heating_timer
                .start(self.scheduler.as_ref(), move |generation| {
                    if let Some(core) = core.upgrade() {
                        core.lock().heating_tick(Some(generation));
                    }
                });
        }
        tracing::info!(temperature = %self.state.temperature, "Heating started");
    }

    fn switch_off(&mut self, reason: &'static str) {
        self.heating_timer.cancel();
        self.commit(StateChange::Heating(false));
        tracing::info!(reason, temperature = %self.state.temperature, "Heating stopped");
        self.start_cooldown_if_warm();
    }

    /// Starts (or restarts) the cooldown timer when the water is above room temperature.
    fn start_cooldown_if_warm(&mut self) {
        if self.state.is_heating || self.state.temperature <= self.config.room_temperature {
            return;
        }
        let core = self.this.clone();
        self.cooldown_timer
            .start(self.scheduler.as_ref(), move |generation| {
                if let Some(core) = core.upgrade() {
                    core.lock().cooldown_tick(Some(generation));
                }
            });
    }

    fn reject(&self, error: KettleError) -> Result<(), KettleError> {
        tracing::info!(error = %error, "Command rejected");
        self.events.publish(KettleEvent::notice(error));
        Err(error)
    }

    fn commit(&mut self, change: StateChange) {
        if !self.state.apply(&change) {
            return;
        }
        debug_assert_eq!(self.state.violated_invariant(&self.config), None);
        debug_assert!(!(self.heating_timer.is_active() && self.cooldown_timer.is_active()));
        self.state_tx.send_replace(self.state);
        self.events
            .publish(KettleEvent::state_changed(change, self.state));
    }
}
