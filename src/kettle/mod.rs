// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The kettle controller.
//!
//! [`Kettle`] is the only component with logic. It owns the
//! [`KettleState`], accepts the user commands, and runs the heating and
//! cooldown timers on a [`Scheduler`].
//!
//! # State machine
//!
//! ```text
//!            toggle_power (plugged in, has water)
//!   ┌──────┐ ─────────────────────────────────────► ┌─────────┐
//!   │ Idle │                                        │ Heating │
//!   └──────┘ ◄──────────────────────────────────── └─────────┘
//!      ▲      toggle_power / stop / unplug / empty      │
//!      │                                                │ tick reaches
//!      │              ┌────────┐                        │ boiling point
//!      └───────────── │ Boiled │ ◄──────────────────────┘
//!                     └────────┘
//! ```
//!
//! While idle and above room temperature, the cooldown timer lowers the
//! temperature until it reaches room temperature and then stops itself.
//! Heating and cooldown timers are never active at the same time.

mod controller;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};

use crate::config::KettleConfig;
use crate::error::{ConfigError, KettleError};
use crate::event::{EventBus, KettleEvent};
use crate::state::{HeatingPhase, KettleState};
use crate::timer::{Scheduler, TokioScheduler};

use self::controller::KettleCore;

/// Handle to a kettle controller.
///
/// Clones share the same kettle. Commands are synchronous: they apply their
/// effect under the controller lock and return immediately. Dropping the last
/// handle cancels both timers.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use kettle_lib::{Kettle, KettleError};
/// use kettle_lib::timer::ManualScheduler;
///
/// # fn main() -> kettle_lib::Result<()> {
/// let clock = ManualScheduler::new();
/// let kettle = Kettle::builder().scheduler(clock.clone()).build()?;
///
/// assert_eq!(kettle.toggle_power(), Err(KettleError::NotPluggedIn));
///
/// kettle.toggle_plug();
/// kettle.add_water(0.5)?;
/// kettle.toggle_power()?;
///
/// clock.advance(Duration::from_secs(1));
/// assert_eq!(kettle.state().temperature.celsius(), 28.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Kettle {
    core: Arc<Mutex<KettleCore>>,
    config: Arc<KettleConfig>,
    events: EventBus,
    state_rx: watch::Receiver<KettleState>,
}

impl Kettle {
    /// Creates a kettle with the default configuration on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a tokio runtime. Use
    /// [`Kettle::builder`] with an explicit scheduler in that case.
    pub fn new() -> crate::Result<Self> {
        Self::builder().build()
    }

    /// Returns a builder for a kettle.
    #[must_use]
    pub fn builder() -> KettleBuilder {
        KettleBuilder::default()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Switches heating on or off.
    ///
    /// Switching on cancels a running cooldown and starts the heating timer.
    /// Switching off stops the heating timer and starts cooling down if the
    /// water is above room temperature.
    ///
    /// # Errors
    ///
    /// - `KettleError::NotPluggedIn` if the kettle is not plugged in
    /// - `KettleError::NoWater` when switching on an empty kettle
    ///
    /// The state is unchanged on error and the error is also published as a
    /// [`KettleEvent::Notice`].
    pub fn toggle_power(&self) -> Result<(), KettleError> {
        self.core.lock().toggle_power()
    }

    /// Plugs the kettle in or unplugs it.
    ///
    /// Unplugging while heating forces heating off.
    pub fn toggle_plug(&self) {
        self.core.lock().toggle_plug();
    }

    /// Adds water, saturating at a full reservoir.
    ///
    /// Fresh water resets the temperature to room temperature. Adding `0.0`
    /// empties the kettle instead, like [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// Returns `KettleError::InvalidAmount` for negative or non-finite amounts.
    pub fn add_water(&self, amount: f64) -> Result<(), KettleError> {
        self.core.lock().add_water(amount)
    }

    /// Empties the kettle and sets the temperature to the configured initial
    /// temperature. Heating, if on, is switched off.
    pub fn reset(&self) {
        self.core.lock().empty();
    }

    /// Switches heating off if it is on.
    ///
    /// Returns `false` and does nothing when the kettle is not heating.
    pub fn stop(&self) -> bool {
        self.core.lock().stop()
    }

    // =========================================================================
    // Ticks
    // =========================================================================

    /// Runs one heating step.
    ///
    /// This is what the heating timer calls every heating interval. It does
    /// nothing unless the kettle is heating.
    pub fn on_heating_tick(&self) {
        self.core.lock().heating_tick(None);
    }

    /// Runs one cooldown step.
    ///
    /// This is what the cooldown timer calls every cooldown interval. It does
    /// nothing while heating or at room temperature.
    pub fn on_cooldown_tick(&self) {
        self.core.lock().cooldown_tick(None);
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Returns a snapshot of the kettle state.
    #[must_use]
    pub fn state(&self) -> KettleState {
        self.core.lock().state()
    }

    /// Returns the current heating phase.
    #[must_use]
    pub fn phase(&self) -> HeatingPhase {
        self.state().phase()
    }

    /// Returns a receiver that always holds the latest state.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<KettleState> {
        self.state_rx.clone()
    }

    /// Subscribes to kettle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<KettleEvent> {
        self.events.subscribe()
    }

    /// Returns `true` while the heating timer is running.
    #[must_use]
    pub fn is_heating_timer_active(&self) -> bool {
        self.core.lock().is_heating_timer_active()
    }

    /// Returns `true` while the cooldown timer is running.
    ///
    /// Refilling a warm idle kettle drops the temperature to room level but
    /// leaves the timer running; it stops itself on its next tick. Until
    /// then this returns `true` at room temperature.
    #[must_use]
    pub fn is_cooldown_timer_active(&self) -> bool {
        self.core.lock().is_cooldown_timer_active()
    }

    /// Returns the configuration the kettle was built with.
    #[must_use]
    pub fn config(&self) -> &KettleConfig {
        &self.config
    }
}

/// Builder for [`Kettle`].
#[derive(Debug, Default)]
pub struct KettleBuilder {
    config: KettleConfig,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl KettleBuilder {
    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: KettleConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the scheduler that drives the timers.
    ///
    /// Defaults to a [`TokioScheduler`] on the runtime calling [`build`](Self::build).
    #[must_use]
    pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        let scheduler: Arc<dyn Scheduler> = Arc::new(scheduler);
        self.scheduler = Some(scheduler);
        self
    }

    /// Builds the kettle.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid or if no
    /// scheduler was given and the caller is not inside a tokio runtime.
    pub fn build(self) -> crate::Result<Kettle> {
        self.config.validate()?;

        let scheduler = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Arc::new(TokioScheduler::current().ok_or_else(|| {
                ConfigError::invalid("scheduler", "no tokio runtime available")
            })?) as Arc<dyn Scheduler>,
        };

        let events = EventBus::with_capacity(self.config.event_capacity);
        let (state_tx, state_rx) = watch::channel(KettleState::initial(&self.config));
        let config = Arc::new(self.config);

        let core = {
            let config = KettleConfig::clone(&config);
            let events = events.clone();
            Arc::new_cyclic(|this| {
                Mutex::new(KettleCore::new(
                    config,
                    scheduler,
                    events,
                    state_tx,
                    this.clone(),
                ))
            })
        };

        tracing::debug!(config = ?config, "Kettle created");
        Ok(Kettle {
            core,
            config,
            events,
            state_rx,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::Error;
    use crate::timer::ManualScheduler;
    use crate::types::WaterLevel;

    const HEATING: Duration = Duration::from_millis(1000);
    const COOLDOWN: Duration = Duration::from_millis(3000);

    fn kettle() -> (Kettle, ManualScheduler) {
        let clock = ManualScheduler::new();
        let kettle = Kettle::builder().scheduler(clock.clone()).build().unwrap();
        (kettle, clock)
    }

    fn heating_kettle() -> (Kettle, ManualScheduler) {
        let (kettle, clock) = kettle();
        kettle.toggle_plug();
        kettle.add_water(0.5).unwrap();
        kettle.toggle_power().unwrap();
        (kettle, clock)
    }

    fn assert_invariants(kettle: &Kettle) {
        let state = kettle.state();
        assert_eq!(state.violated_invariant(kettle.config()), None, "{state:?}");
        assert!(!(kettle.is_heating_timer_active() && kettle.is_cooldown_timer_active()));
        assert_eq!(kettle.is_heating_timer_active(), state.is_heating);
    }

    #[test]
    fn fresh_kettle_is_idle_and_unplugged() {
        let (kettle, _clock) = kettle();
        let state = kettle.state();
        assert!(!state.is_plugged_in);
        assert!(!state.is_heating);
        assert_eq!(state.water_level, WaterLevel::EMPTY);
        assert_eq!(state.temperature.celsius(), 20.0);
        assert_invariants(&kettle);
    }

    #[test]
    fn build_without_runtime_or_scheduler_fails() {
        let err = Kettle::new().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::Invalid {
                field: "scheduler",
                ..
            })
        ));
    }

    #[test]
    fn build_rejects_invalid_config() {
        let err = Kettle::builder()
            .config(KettleConfig::default().with_heating_step(-1.0))
            .scheduler(ManualScheduler::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn power_while_unplugged_is_rejected() {
        let (kettle, _clock) = kettle();
        let before = kettle.state();

        assert_eq!(kettle.toggle_power(), Err(KettleError::NotPluggedIn));
        assert_eq!(kettle.state(), before);
        assert!(!kettle.is_heating_timer_active());
    }

    #[test]
    fn power_without_water_is_rejected() {
        let (kettle, _clock) = kettle();
        kettle.toggle_plug();
        let before = kettle.state();

        assert_eq!(kettle.toggle_power(), Err(KettleError::NoWater));
        assert_eq!(kettle.state(), before);
        assert!(!kettle.is_heating_timer_active());
    }

    #[test]
    fn rejections_are_published_as_notices() {
        let (kettle, _clock) = kettle();
        let mut events = kettle.subscribe();

        let _ = kettle.toggle_power();
        assert_eq!(
            events.try_recv().unwrap(),
            KettleEvent::Notice(KettleError::NotPluggedIn)
        );
    }

    #[test]
    fn heating_tick_adds_step() {
        let (kettle, clock) = heating_kettle();
        assert!(kettle.state().is_heating);
        assert!(kettle.is_heating_timer_active());

        clock.advance(HEATING);
        assert_eq!(kettle.state().temperature.celsius(), 28.0);
        assert_invariants(&kettle);
    }

    #[test]
    fn heating_stops_at_boiling_point() {
        let (kettle, clock) = heating_kettle();

        // 20 + 8 * 10 = 100
        clock.advance(HEATING * 10);

        let state = kettle.state();
        assert_eq!(state.temperature.celsius(), 100.0);
        assert!(!state.is_heating);
        assert!(!kettle.is_heating_timer_active());
        assert!(kettle.is_cooldown_timer_active());
        assert_invariants(&kettle);
    }

    #[test]
    fn overshooting_step_clamps_to_boiling_point() {
        let clock = ManualScheduler::new();
        let config = KettleConfig::default()
            .with_room_temperature(crate::types::Temperature::new(24.0).unwrap());
        let kettle = Kettle::builder()
            .config(config)
            .scheduler(clock.clone())
            .build()
            .unwrap();
        kettle.toggle_plug();
        kettle.add_water(1.0).unwrap();
        kettle.toggle_power().unwrap();

        // 24 + 8 * 9 = 96, then 96 + 8 = 104 clamps to 100
        clock.advance(HEATING * 9);
        assert_eq!(kettle.state().temperature.celsius(), 96.0);
        clock.advance(HEATING);
        assert_eq!(kettle.state().temperature.celsius(), 100.0);
        assert!(!kettle.state().is_heating);
    }

    #[test]
    fn boiling_publishes_event() {
        let (kettle, clock) = heating_kettle();
        let mut events = kettle.subscribe();

        clock.advance(HEATING * 10);

        let mut boiled = false;
        while let Ok(event) = events.try_recv() {
            if let KettleEvent::Boiled { temperature } = event {
                assert_eq!(temperature.celsius(), 100.0);
                boiled = true;
            }
        }
        assert!(boiled);
    }

    #[test]
    fn boil_is_reported_as_transient_phase() {
        let (kettle, clock) = heating_kettle();
        let mut events = kettle.subscribe();

        let mut snapshots = Vec::new();
        for _ in 0..12 {
            clock.advance(HEATING);
            snapshots.push(kettle.phase());
        }

        let phases: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
            .filter_map(|event| event.phase())
            .collect();
        let boiled_at = phases
            .iter()
            .position(|phase| *phase == HeatingPhase::Boiled)
            .unwrap();
        assert_eq!(phases[boiled_at - 1], HeatingPhase::Idle);
        assert!(phases[..boiled_at - 1].iter().all(|p| *p == HeatingPhase::Heating));
        assert!(!snapshots.contains(&HeatingPhase::Boiled));
        assert_eq!(kettle.phase(), HeatingPhase::Idle);
    }

    #[test]
    fn cooldown_converges_to_room_temperature() {
        let (kettle, clock) = heating_kettle();
        clock.advance(HEATING * 10);

        clock.advance(COOLDOWN);
        assert_eq!(kettle.state().temperature.celsius(), 98.0);

        // (98 - 20) / 2 = 39 more ticks
        clock.advance(COOLDOWN * 39);
        assert_eq!(kettle.state().temperature.celsius(), 20.0);
        assert!(!kettle.is_cooldown_timer_active());

        assert_eq!(clock.advance(COOLDOWN * 5), 0);
        assert_eq!(kettle.state().temperature.celsius(), 20.0);
    }

    #[test]
    fn power_off_starts_cooldown_when_warm() {
        let (kettle, clock) = heating_kettle();
        clock.advance(HEATING * 2);

        kettle.toggle_power().unwrap();
        assert!(!kettle.state().is_heating);
        assert!(!kettle.is_heating_timer_active());
        assert!(kettle.is_cooldown_timer_active());
        assert_invariants(&kettle);

        clock.advance(COOLDOWN);
        assert_eq!(kettle.state().temperature.celsius(), 34.0);
    }

    #[test]
    fn power_off_at_room_temperature_skips_cooldown() {
        let (kettle, _clock) = heating_kettle();
        kettle.toggle_power().unwrap();
        assert!(!kettle.is_cooldown_timer_active());
    }

    #[test]
    fn power_on_cancels_cooldown() {
        let (kettle, clock) = heating_kettle();
        clock.advance(HEATING * 3);
        kettle.toggle_power().unwrap();
        assert!(kettle.is_cooldown_timer_active());

        kettle.toggle_power().unwrap();
        assert!(!kettle.is_cooldown_timer_active());
        assert!(kettle.is_heating_timer_active());

        // The old cooldown deadline passes without lowering the temperature.
        clock.advance(COOLDOWN);
        assert_eq!(kettle.state().temperature.celsius(), 44.0 + 24.0);
        assert_invariants(&kettle);
    }

    #[test]
    fn unplugging_forces_heating_off() {
        let (kettle, clock) = heating_kettle();
        clock.advance(HEATING);

        kettle.toggle_plug();
        let state = kettle.state();
        assert!(!state.is_plugged_in);
        assert!(!state.is_heating);
        assert!(!kettle.is_heating_timer_active());
        assert!(kettle.is_cooldown_timer_active());
        assert_invariants(&kettle);
    }

    #[test]
    fn plugging_in_does_not_start_heating() {
        let (kettle, _clock) = kettle();
        kettle.add_water(1.0).unwrap();
        kettle.toggle_plug();
        assert!(kettle.state().is_plugged_in);
        assert!(!kettle.state().is_heating);
        assert!(!kettle.is_heating_timer_active());
    }

    #[test]
    fn add_water_saturates_and_resets_temperature() {
        let (kettle, clock) = heating_kettle();
        clock.advance(HEATING * 3);

        kettle.add_water(0.8).unwrap();
        let state = kettle.state();
        assert_eq!(state.water_level, WaterLevel::FULL);
        assert_eq!(state.temperature.celsius(), 20.0);
        assert!(state.is_heating);
    }

    #[test]
    fn refill_during_cooldown_leaves_timer_to_stop_itself() {
        let (kettle, clock) = heating_kettle();
        clock.advance(HEATING * 10);
        assert!(kettle.is_cooldown_timer_active());

        kettle.add_water(0.2).unwrap();
        assert_eq!(kettle.state().temperature.celsius(), 20.0);
        assert!(kettle.is_cooldown_timer_active());

        let mut events = kettle.subscribe();
        assert_eq!(clock.advance(COOLDOWN), 1);
        assert!(!kettle.is_cooldown_timer_active());
        assert_eq!(kettle.state().temperature.celsius(), 20.0);
        assert!(events.try_recv().is_err());
        assert_invariants(&kettle);
    }

    #[test]
    fn add_water_rejects_negative_and_non_finite_amounts() {
        let (kettle, _clock) = kettle();
        let before = kettle.state();

        assert_eq!(
            kettle.add_water(-0.1),
            Err(KettleError::InvalidAmount(-0.1))
        );
        assert!(matches!(
            kettle.add_water(f64::NAN),
            Err(KettleError::InvalidAmount(_))
        ));
        assert_eq!(
            kettle.add_water(f64::INFINITY),
            Err(KettleError::InvalidAmount(f64::INFINITY))
        );
        assert_eq!(kettle.state(), before);
    }

    #[test]
    fn add_zero_water_empties_the_kettle() {
        let (kettle, _clock) = kettle();
        kettle.add_water(0.7).unwrap();

        kettle.add_water(0.0).unwrap();
        let state = kettle.state();
        assert_eq!(state.water_level, WaterLevel::EMPTY);
        assert_eq!(state.temperature.celsius(), 0.0);
        assert_invariants(&kettle);
    }

    #[test]
    fn emptying_while_heating_stops_heating() {
        let (kettle, clock) = heating_kettle();
        clock.advance(HEATING);

        kettle.reset();
        let state = kettle.state();
        assert!(!state.is_heating);
        assert!(state.water_level.is_empty());
        assert!(!kettle.is_heating_timer_active());
        assert!(!kettle.is_cooldown_timer_active());
        assert_invariants(&kettle);
    }

    #[test]
    fn stop_is_a_no_op_when_idle() {
        let (kettle, _clock) = kettle();
        assert!(!kettle.stop());

        let (kettle, _clock) = heating_kettle();
        assert!(kettle.stop());
        assert!(!kettle.state().is_heating);
    }

    #[test]
    fn manual_heating_tick_is_idempotent_after_cancel() {
        let (kettle, clock) = heating_kettle();
        clock.advance(HEATING);
        kettle.toggle_power().unwrap();
        let before = kettle.state();

        kettle.on_heating_tick();
        kettle.on_heating_tick();
        assert_eq!(kettle.state(), before);
    }

    #[test]
    fn manual_cooldown_tick_is_ignored_while_heating() {
        let (kettle, clock) = heating_kettle();
        clock.advance(HEATING * 2);
        let before = kettle.state();

        kettle.on_cooldown_tick();
        assert_eq!(kettle.state(), before);
    }

    /// Scheduler that never cancels, so stale ticks can be fired by hand.
    struct LeakyScheduler {
        ticks: Arc<Mutex<Vec<crate::timer::TickFn>>>,
    }

    impl std::fmt::Debug for LeakyScheduler {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("LeakyScheduler")
        }
    }

    impl Scheduler for LeakyScheduler {
        fn schedule_every(
            &self,
            _period: Duration,
            tick: crate::timer::TickFn,
        ) -> crate::timer::ScheduledTask {
            self.ticks.lock().push(tick);
            crate::timer::ScheduledTask::new(|| {})
        }
    }

    #[test]
    fn stale_timer_ticks_are_discarded() {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let kettle = Kettle::builder()
            .scheduler(LeakyScheduler {
                ticks: Arc::clone(&ticks),
            })
            .build()
            .unwrap();
        kettle.toggle_plug();
        kettle.add_water(0.5).unwrap();

        kettle.toggle_power().unwrap();
        let first = Arc::clone(&ticks.lock()[0]);
        first();
        assert_eq!(kettle.state().temperature.celsius(), 28.0);

        // Off and on again: the first heating task is now stale.
        kettle.toggle_power().unwrap();
        kettle.toggle_power().unwrap();
        let cooldown = Arc::clone(&ticks.lock()[1]);
        let second = Arc::clone(&ticks.lock()[2]);

        first();
        cooldown();
        assert_eq!(kettle.state().temperature.celsius(), 28.0);

        second();
        assert_eq!(kettle.state().temperature.celsius(), 36.0);

        kettle.toggle_power().unwrap();
        second();
        assert_eq!(kettle.state().temperature.celsius(), 36.0);
    }

    #[test]
    fn watch_tracks_latest_state() {
        let (kettle, clock) = heating_kettle();
        let rx = kettle.watch();

        clock.advance(HEATING);
        assert_eq!(rx.borrow().temperature.celsius(), 28.0);
        assert!(rx.borrow().is_heating);
    }

    #[test]
    fn dropping_the_kettle_cancels_timers() {
        let (kettle, clock) = heating_kettle();
        assert_eq!(clock.pending(), 1);

        drop(kettle);
        assert_eq!(clock.pending(), 0);
        assert_eq!(clock.advance(HEATING * 3), 0);
    }
}
