//! Frame pacing for the backdrops.
//!
//! The host calls [`FrameScheduler::frame`] once per redraw. Each backdrop
//! gates its own work with [`IntervalGate`]s, so simulation and redraw cadence
//! are independent of the host's frame rate.

use std::cell::Cell;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{AutomatonConfig, ContourConfig};
use crate::contour::{ContourField, GradientNoiseField};
use crate::raster::PixelBuffer;
use crate::simulation::ToroidalAutomatonField;

/// Monotonic time source.
pub trait Clock {
    /// Time since the clock's origin
    fn now(&self) -> Duration;
}

/// Wall clock anchored at construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Fires at most once per `interval`.
#[derive(Clone, Debug)]
pub struct IntervalGate {
    interval: Duration,
    last: Option<Duration>,
}

impl IntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Forget the previous firing so the next poll opens immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Returns the time since the previous firing when the gate opens. The
    /// first poll always opens and reports one interval.
    pub fn poll(&mut self, now: Duration) -> Option<Duration> {
        let elapsed = match self.last {
            None => self.interval,
            Some(last) => {
                let elapsed = now.saturating_sub(last);
                if elapsed < self.interval {
                    return None;
                }
                elapsed
            }
        };
        self.last = Some(now);
        Some(elapsed)
    }
}

/// An animated layer drawn into its own pixel buffer.
pub trait Backdrop {
    fn name(&self) -> &'static str;

    /// Rebuild for a new viewport size in device pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Advance to `now` and paint. Returns false when the frame was skipped
    /// and `surface` still holds the previous image.
    fn frame(&mut self, now: Duration, surface: &mut PixelBuffer) -> bool;

    /// Pointer click in viewport pixels.
    fn click(&mut self, _x: f64, _y: f64) {}
}

/// Automaton layer: fixed-period simulation ticks, opacity easing and
/// redraw on every frame.
pub struct AutomatonBackdrop {
    field: ToroidalAutomatonField,
    sim_gate: IntervalGate,
    rng: StdRng,
    ticks: u64,
}

impl AutomatonBackdrop {
    pub fn new(width: u32, height: u32, config: AutomatonConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let sim_gate = IntervalGate::new(config.update_interval);
        let field = ToroidalAutomatonField::new(width, height, config, &mut rng);
        Self {
            field,
            sim_gate,
            rng,
            ticks: 0,
        }
    }

    pub fn field(&self) -> &ToroidalAutomatonField {
        &self.field
    }

    /// Simulation steps run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Backdrop for AutomatonBackdrop {
    fn name(&self) -> &'static str {
        "automaton"
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.field.resize(width, height, &mut self.rng);
    }

    fn frame(&mut self, now: Duration, surface: &mut PixelBuffer) -> bool {
        if self.sim_gate.poll(now).is_some() {
            self.field.step(&mut self.rng);
            self.ticks += 1;
        }
        self.field.ease_opacity();
        self.field.render(surface);
        true
    }

    fn click(&mut self, x: f64, y: f64) {
        self.field.click(x, y, &mut self.rng);
    }
}

/// Contour layer: continuous z drift, redrawn at a throttled rate.
pub struct ContourBackdrop {
    contours: ContourField,
    redraw_gate: IntervalGate,
}

impl ContourBackdrop {
    pub fn new(width: u32, height: u32, config: ContourConfig, seed: u64) -> Self {
        let noise = GradientNoiseField::from_rng(&mut StdRng::seed_from_u64(seed));
        let redraw_gate = IntervalGate::new(config.frame_interval);
        Self {
            contours: ContourField::new(width, height, config, noise),
            redraw_gate,
        }
    }

    pub fn contours(&self) -> &ContourField {
        &self.contours
    }
}

impl Backdrop for ContourBackdrop {
    fn name(&self) -> &'static str {
        "contours"
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.contours.resize(width, height);
        // The fresh buffer is blank, so paint on the very next frame.
        self.redraw_gate.reset();
    }

    fn frame(&mut self, now: Duration, surface: &mut PixelBuffer) -> bool {
        let Some(elapsed) = self.redraw_gate.poll(now) else {
            return false;
        };
        self.contours.advance(elapsed);
        self.contours.rebuild();
        self.contours.render(surface);
        true
    }
}

/// Drives backdrops one frame at a time from an injectable clock.
pub struct FrameScheduler<C: Clock> {
    clock: C,
    frames: u64,
}

impl<C: Clock> FrameScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, frames: 0 }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Start a frame: count it and read the clock once so every layer
    /// drawn in this frame sees the same timestamp.
    pub fn begin_frame(&mut self) -> Duration {
        self.frames += 1;
        self.clock.now()
    }

    /// Run a single backdrop for one frame.
    pub fn frame<B: Backdrop + ?Sized>(&mut self, backdrop: &mut B, surface: &mut PixelBuffer) -> bool {
        let now = self.begin_frame();
        backdrop.frame(now, surface)
    }
}
