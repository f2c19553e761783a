//! The per-frame gesture dispatcher.
//!
//! [`Keybinder`] owns the injection backend, the per-binding state
//! slots, and the monitor table. Lifecycle is explicit: construct,
//! [`start`](Keybinder::start), one [`dispatch`](Keybinder::dispatch)
//! per inference frame, [`shutdown`](Keybinder::shutdown).
//!
//! State is mutated before the corresponding platform call is
//! attempted. If injection fails the error propagates to the caller
//! with the slot left as "attempted": the caller logs and carries on
//! with the next frame, and the bookkeeping stays aligned with what
//! was emitted rather than silently drifting.

use std::sync::PoisonError;

use facepilot_common::clock::FrameClock;
use facepilot_common::error::{FacepilotError, FacepilotResult};
use facepilot_gesture_model::{
    Binding, BindingAction, BindingSet, GestureVocabulary, MouseAction, SharedProfile,
};
use facepilot_platform_core::{InputPlatform, MouseButton};

use crate::monitors::MonitorLocator;
use crate::registry::BindingStates;
use crate::ActivityFlag;

/// The binding-to-input-event dispatcher.
pub struct Keybinder {
    platform: Box<dyn InputPlatform>,
    profile: SharedProfile,
    vocabulary: GestureVocabulary,
    activity: ActivityFlag,
    states: BindingStates,
    locator: Option<MonitorLocator>,
    clock: Option<FrameClock>,
    screen: (u32, u32),
    /// Single-mode auto-hold in progress (a click was promoted to a
    /// synthetic hold).
    auto_hold: bool,
    /// When the current single-mode press crossed the threshold;
    /// infinity means no hold in progress.
    start_hold_ts_ms: f64,
    started: bool,
}

impl Keybinder {
    /// Create a keybinder over a platform backend and a shared
    /// profile, with the standard gesture vocabulary.
    pub fn new(
        platform: Box<dyn InputPlatform>,
        profile: SharedProfile,
        activity: ActivityFlag,
    ) -> Self {
        Self {
            platform,
            profile,
            vocabulary: GestureVocabulary::mediapipe(),
            activity,
            states: BindingStates::new(),
            locator: None,
            clock: None,
            screen: (0, 0),
            auto_hold: false,
            start_hold_ts_ms: f64::INFINITY,
            started: false,
        }
    }

    /// Replace the gesture vocabulary (tests, alternative trackers).
    pub fn with_vocabulary(mut self, vocabulary: GestureVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Idempotent initialization: sync state slots to the current
    /// profile, read the screen size, and enumerate monitors.
    pub fn start(&mut self) -> FacepilotResult<()> {
        if self.started {
            return Ok(());
        }

        let (bindings, _) = self.snapshot_bindings();
        self.states.resync(&bindings);
        self.screen = self.platform.screen_size()?;
        self.locator = Some(MonitorLocator::enumerate(self.platform.as_mut())?);
        self.clock = Some(FrameClock::start());
        self.started = true;

        tracing::info!(
            backend = %self.platform.name(),
            bindings = bindings.len(),
            monitors = self.locator.as_ref().map(|l| l.len()).unwrap_or(0),
            screen_w = self.screen.0,
            screen_h = self.screen.1,
            "Keybinder started"
        );
        Ok(())
    }

    /// Whether `start` has run.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Re-enumerate monitors. This is the only point the monitor
    /// table changes after `start`; it is never re-queried per frame.
    pub fn refresh_monitors(&mut self) -> FacepilotResult<()> {
        self.locator = Some(MonitorLocator::enumerate(self.platform.as_mut())?);
        Ok(())
    }

    /// Flip the global hold-mode toggle for mouse buttons.
    pub fn set_hold_mode(&mut self, holding: bool) {
        self.states.set_holding(holding);
    }

    /// Handle to the externally-owned activity flag.
    pub fn activity(&self) -> &ActivityFlag {
        &self.activity
    }

    /// Backend name, for diagnostics.
    pub fn platform_name(&self) -> &str {
        self.platform.name()
    }

    /// Dispatch one frame of gesture intensities against the clock
    /// started by `start`.
    pub fn dispatch(&mut self, frame: &[f32]) -> FacepilotResult<()> {
        let now_ms = self
            .clock
            .as_ref()
            .ok_or_else(|| FacepilotError::not_started("call start() before dispatch"))?
            .elapsed_ms();
        self.dispatch_at(frame, now_ms)
    }

    /// Dispatch one frame at an explicit timestamp (milliseconds since
    /// start). Deterministic entry point for replays and tests.
    ///
    /// An empty frame is a no-op. A frame shorter than the vocabulary
    /// demands is a caller contract violation and panics on the first
    /// out-of-range gesture index.
    pub fn dispatch_at(&mut self, frame: &[f32], now_ms: f64) -> FacepilotResult<()> {
        if !self.started {
            return Err(FacepilotError::not_started("call start() before dispatch"));
        }
        if frame.is_empty() {
            return Ok(());
        }

        let (bindings, hold_trigger_ms) = self.snapshot_bindings();
        if self.states.needs_resync(&bindings) {
            tracing::debug!(
                bindings = bindings.len(),
                "Binding set changed, resyncing state slots"
            );
            self.states.resync(&bindings);
        }

        for (gesture, binding) in bindings.iter() {
            let Some(idx) = self.vocabulary.index_of(gesture) else {
                continue;
            };
            // the index into the frame is the caller's contract
            let value = f64::from(frame[idx]);
            let key = binding.state_key();

            match &binding.action {
                BindingAction::Mouse(MouseAction::Pause) => {
                    self.pause_action(value, binding.threshold, &key);
                }
                _ if !self.activity.is_active() => {}
                BindingAction::Mouse(MouseAction::Reset) => {
                    self.reset_action(value, binding.threshold, &key)?;
                }
                BindingAction::Mouse(MouseAction::Cycle) => {
                    self.cycle_action(value, binding.threshold, &key)?;
                }
                BindingAction::Mouse(MouseAction::Button(button)) => {
                    self.mouse_action(
                        value,
                        *button,
                        binding.threshold,
                        &key,
                        now_ms,
                        hold_trigger_ms,
                    )?;
                }
                BindingAction::Key(keysym) => {
                    self.keyboard_action(value, keysym, binding, &key, now_ms)?;
                }
            }
        }

        Ok(())
    }

    /// Force-release everything currently asserted and stop.
    ///
    /// Safe to call repeatedly; a stopped keybinder is a no-op. After
    /// shutdown, `start` may be called again to re-initialize.
    pub fn shutdown(&mut self) -> FacepilotResult<()> {
        if !self.started {
            return Ok(());
        }

        let snapshot = self.states.snapshot().clone();
        let mut released = 0usize;
        for (_, binding) in snapshot.iter() {
            let key = binding.state_key();
            if !self.states.get(&key) {
                continue;
            }
            self.states.set(&key, false);
            match &binding.action {
                BindingAction::Mouse(MouseAction::Button(button)) => {
                    // in single mode only a promoted auto-hold leaves
                    // the physical button down
                    if self.states.is_holding() || self.auto_hold {
                        self.platform.mouse_up(*button)?;
                        released += 1;
                    }
                }
                BindingAction::Key(keysym) if binding.hold => {
                    self.platform.key_up(keysym)?;
                    released += 1;
                }
                // throttled presses are instantaneous, special mouse
                // actions hold nothing
                _ => {}
            }
        }

        self.auto_hold = false;
        self.start_hold_ts_ms = f64::INFINITY;
        self.started = false;
        tracing::info!(released, "Keybinder shut down");
        Ok(())
    }

    /// Take one consistent snapshot of the live profile.
    fn snapshot_bindings(&self) -> (BindingSet, f64) {
        let profile = self.profile.lock().unwrap_or_else(PoisonError::into_inner);
        (profile.combined(), profile.hold_trigger_ms)
    }

    /// Edge-triggered toggle of the activity flag. This is the only
    /// action processed while control is paused.
    fn pause_action(&mut self, value: f64, threshold: f64, key: &str) {
        if value > threshold && !self.states.get(key) {
            self.states.set(key, true);
            let active = self.activity.toggle();
            tracing::info!(active, "Pause gesture toggled mouse control");
        } else if value < threshold && self.states.get(key) {
            self.states.set(key, false);
        }
    }

    /// Edge-triggered: park the cursor at the center of the monitor
    /// currently containing it.
    fn reset_action(&mut self, value: f64, threshold: f64, key: &str) -> FacepilotResult<()> {
        if value > threshold && !self.states.get(key) {
            self.states.set(key, true);
            let (x, y) = self.platform.pointer_position()?;
            let center = {
                let locator = self.locator()?;
                *locator.get(locator.locate(x, y))
            };
            self.platform.move_to(center.center_x, center.center_y)?;
        } else if value < threshold && self.states.get(key) {
            self.states.set(key, false);
        }
        Ok(())
    }

    /// Edge-triggered: park the cursor at the center of the next
    /// monitor in cyclic order.
    fn cycle_action(&mut self, value: f64, threshold: f64, key: &str) -> FacepilotResult<()> {
        if value > threshold && !self.states.get(key) {
            self.states.set(key, true);
            let (x, y) = self.platform.pointer_position()?;
            let next = {
                let locator = self.locator()?;
                *locator.get(locator.next(locator.locate(x, y)))
            };
            self.platform.move_to(next.center_x, next.center_y)?;
        } else if value < threshold && self.states.get(key) {
            self.states.set(key, false);
        }
        Ok(())
    }

    /// Mouse button handler. The effective mode comes from the global
    /// hold toggle, not the binding's stored mode.
    fn mouse_action(
        &mut self,
        value: f64,
        button: MouseButton,
        threshold: f64,
        key: &str,
        now_ms: f64,
        hold_trigger_ms: f64,
    ) -> FacepilotResult<()> {
        if self.states.is_holding() {
            // hold mode: press while above threshold
            if value > threshold && !self.states.get(key) {
                self.states.set(key, true);
                self.platform.mouse_down(button)?;
            } else if value < threshold && self.states.get(key) {
                self.states.set(key, false);
                self.platform.mouse_up(button)?;
            }
        } else {
            // single mode: click on crossing, promote to a synthetic
            // hold when the gesture stays asserted long enough
            if value > threshold {
                if !self.states.get(key) {
                    self.states.set(key, true);
                    self.start_hold_ts_ms = now_ms;
                    self.platform.click(button)?;
                }

                if !self.auto_hold && now_ms - self.start_hold_ts_ms >= hold_trigger_ms {
                    self.auto_hold = true;
                    tracing::debug!(button = button.as_str(), "Promoting click to hold");
                    self.platform.mouse_down(button)?;
                }
            } else if value < threshold && self.states.get(key) {
                self.states.set(key, false);
                if self.auto_hold {
                    self.auto_hold = false;
                    self.start_hold_ts_ms = f64::INFINITY;
                    self.platform.mouse_up(button)?;
                }
            }
        }
        Ok(())
    }

    /// Keyboard handler: continuous hold or throttled single presses.
    fn keyboard_action(
        &mut self,
        value: f64,
        keysym: &str,
        binding: &Binding,
        key: &str,
        now_ms: f64,
    ) -> FacepilotResult<()> {
        let threshold = binding.threshold;
        if binding.hold {
            if value > threshold && !self.states.get(key) {
                tracing::debug!(keysym, value, threshold, "Hold key down");
                self.states.set(key, true);
                self.platform.key_down(keysym)?;
            } else if value < threshold && self.states.get(key) {
                tracing::debug!(keysym, value, threshold, "Hold key up");
                self.states.set(key, false);
                self.platform.key_up(keysym)?;
            }
        } else if value > threshold {
            if now_ms - self.states.last_fire_ms(key) >= binding.throttle_ms {
                tracing::debug!(
                    keysym,
                    throttle_ms = binding.throttle_ms,
                    "Throttled key press"
                );
                self.states.record_fire(key, now_ms);
                self.states.set(key, true);
                self.platform.key_press(keysym)?;
            }
        } else {
            self.states.set(key, false);
        }
        Ok(())
    }

    fn locator(&self) -> FacepilotResult<&MonitorLocator> {
        self.locator
            .as_ref()
            .ok_or_else(|| FacepilotError::not_started("monitors not enumerated"))
    }
}
