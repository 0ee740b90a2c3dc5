//! Mock hardware adapters for integration tests.
//!
//! Every mock records what the loops did so tests can assert on the full
//! history. Scripted inputs end with `Error::Interrupted` once exhausted,
//! which is how a test stops a loop that would otherwise run forever.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::time::Duration;

use homealarm::adapters::shared_port::SharedPort;
use homealarm::app::events::AppEvent;
use homealarm::app::ports::{
    Clock, DigitalIoPort, Direction, EventSink, MotionEvent, MotionPort, PinLevel, Pull,
    ServicePort,
};
use homealarm::error::{Error, GpioError, MotionError, Result};
use homealarm::termination::{ShutdownToken, TerminationCoordinator};

// ── ScriptedPort ──────────────────────────────────────────────

/// GPIO port whose inputs replay a script and whose outputs are recorded.
#[derive(Debug, Default)]
pub struct ScriptedPort {
    inputs: HashMap<u8, VecDeque<PinLevel>>,
    directions: HashMap<u8, Direction>,
    levels: HashMap<u8, PinLevel>,
    pub writes: Vec<(u8, PinLevel)>,
    pub reads: usize,
    pub releases: usize,
}

#[allow(dead_code)]
impl ScriptedPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels returned by successive reads of `pin`.
    pub fn with_input(mut self, pin: u8, script: impl IntoIterator<Item = PinLevel>) -> Self {
        self.inputs.insert(pin, script.into_iter().collect());
        self
    }

    pub fn level(&self, pin: u8) -> Option<PinLevel> {
        self.levels.get(&pin).copied()
    }

    pub fn writes_to(&self, pin: u8) -> Vec<PinLevel> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
            .collect()
    }

    pub fn is_configured(&self, pin: u8) -> bool {
        self.directions.contains_key(&pin)
    }
}

impl DigitalIoPort for ScriptedPort {
    fn configure(&mut self, pin: u8, direction: Direction, _pull: Pull, initial: PinLevel) -> Result<()> {
        self.directions.insert(pin, direction);
        if direction == Direction::Out {
            self.levels.insert(pin, initial);
        }
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<PinLevel> {
        if !self.directions.contains_key(&pin) {
            return Err(GpioError::NotConfigured(pin).into());
        }
        self.reads += 1;
        match self.inputs.get_mut(&pin).and_then(VecDeque::pop_front) {
            Some(level) => Ok(level),
            None => Err(Error::Interrupted),
        }
    }

    fn write(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        match self.directions.get(&pin) {
            Some(Direction::Out) => {
                self.writes.push((pin, level));
                self.levels.insert(pin, level);
                Ok(())
            }
            Some(Direction::In) => Err(GpioError::WrongDirection(pin).into()),
            None => Err(GpioError::NotConfigured(pin).into()),
        }
    }

    fn release_all(&mut self) -> Result<()> {
        self.directions.clear();
        self.releases += 1;
        Ok(())
    }
}

// ── FakeClock ─────────────────────────────────────────────────

/// Clock that advances instantly and records every completed sleep.
#[derive(Debug, Default)]
pub struct FakeClock {
    now: Duration,
    pub sleeps: Vec<Duration>,
    limit: Option<usize>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` sleeps complete; the next one is interrupted.
    pub fn interrupt_after(n: usize) -> Self {
        Self {
            limit: Some(n),
            ..Self::default()
        }
    }

    pub fn sleeps_of(&self, d: Duration) -> usize {
        self.sleeps.iter().filter(|s| **s == d).count()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) -> Result<()> {
        if self.limit.is_some_and(|n| self.sleeps.len() >= n) {
            return Err(Error::Interrupted);
        }
        self.sleeps.push(duration);
        self.now += duration;
        Ok(())
    }
}

// ── ScriptedMotion ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStep {
    Event(i32),
    Missing,
    Disconnect,
}

/// Motion sensor that replays a script, then reports an interruption.
#[derive(Debug, Default)]
pub struct ScriptedMotion {
    script: VecDeque<MotionStep>,
    pub waits: usize,
    pub discards: usize,
}

#[allow(dead_code)]
impl ScriptedMotion {
    pub fn new(script: impl IntoIterator<Item = MotionStep>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn events(values: impl IntoIterator<Item = i32>) -> Self {
        Self::new(values.into_iter().map(MotionStep::Event))
    }

    pub fn missing() -> Self {
        Self::new([MotionStep::Missing])
    }
}

impl MotionPort for ScriptedMotion {
    fn next_event(&mut self) -> Result<MotionEvent> {
        self.waits += 1;
        match self.script.pop_front() {
            Some(MotionStep::Event(value)) => Ok(MotionEvent { value }),
            Some(MotionStep::Missing) => {
                Err(MotionError::DeviceNotFound("/dev/input/mock".into()).into())
            }
            Some(MotionStep::Disconnect) => Err(MotionError::Disconnected.into()),
            None => Err(Error::Interrupted),
        }
    }

    fn discard_pending(&mut self) {
        self.discards += 1;
    }
}

// ── MockService ───────────────────────────────────────────────

/// Service manager double. By default start/stop take effect immediately;
/// a stuck service ignores them.
#[derive(Debug, Default)]
pub struct MockService {
    running: bool,
    stuck: bool,
    pub starts: usize,
    pub stops: usize,
    pub status_queries: usize,
}

#[allow(dead_code)]
impl MockService {
    pub fn new(running: bool) -> Self {
        Self {
            running,
            ..Self::default()
        }
    }

    pub fn stuck(running: bool) -> Self {
        Self {
            running,
            stuck: true,
            ..Self::default()
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }
}

impl ServicePort for MockService {
    fn start_service(&mut self) -> Result<()> {
        self.starts += 1;
        if !self.stuck {
            self.running = true;
        }
        Ok(())
    }

    fn stop_service(&mut self) -> Result<()> {
        self.stops += 1;
        if !self.stuck {
            self.running = false;
        }
        Ok(())
    }

    fn service_status(&mut self) -> Result<i32> {
        self.status_queries += 1;
        Ok(if self.running { 0 } else { 3 })
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, event: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Coordinator harness ───────────────────────────────────────

/// Coordinator whose cleanup runs `cleanup` against a shared port and
/// whose exit hook records the code instead of exiting.
pub struct Harness<P> {
    pub port: SharedPort<P>,
    pub coordinator: Arc<TerminationCoordinator>,
    pub cleanups: Arc<AtomicUsize>,
    pub exit_code: Arc<AtomicI32>,
}

#[allow(dead_code)]
impl<P: Send + 'static> Harness<P> {
    pub fn new(port: P, token: ShutdownToken, cleanup: impl Fn(&mut P) + Send + Sync + 'static) -> Self {
        let port = SharedPort::new(port);
        let cleanups = Arc::new(AtomicUsize::new(0));
        let exit_code = Arc::new(AtomicI32::new(-1));

        let cleanup_port = port.clone();
        let counter = Arc::clone(&cleanups);
        let code = Arc::clone(&exit_code);
        let coordinator = TerminationCoordinator::new(token, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            cleanup_port.with(|p| cleanup(p));
        })
        .with_exit_hook(move |c| code.store(c, Ordering::SeqCst));

        Self {
            port,
            coordinator: Arc::new(coordinator),
            cleanups,
            exit_code,
        }
    }

    pub fn cleanup_count(&self) -> usize {
        self.cleanups.load(Ordering::SeqCst)
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code.load(Ordering::SeqCst)
    }

    pub fn inspect<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        self.port.with(|p| f(p))
    }
}
