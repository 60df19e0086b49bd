//! Cooperative, timer-driven task scheduler.
//!
//! Tasks are registered once at start-up and never removed. Every tick of the
//! base period (the GCD of all task periods) marks due tasks ready, and ready
//! tasks then run to completion in registration order. A task that blocks
//! simply delays the ones after it.

use alloc::boxed::Box;
use alloc::vec::Vec;

use embassy_time::{Duration, Ticker};
use log::debug;

use crate::error::{Error, Result};

pub const MAX_TASKS: usize = 8;

/// One schedulable unit of work over the shared context `C`.
pub trait Tick<C> {
    fn tick(&mut self, ctx: &mut C);
}

/// Finite-state task: each run maps the current state to the next one.
pub struct StateTask<S, C> {
    current_state: S,
    tick_fn: fn(S, &mut C) -> S,
}

impl<S, C> StateTask<S, C>
where
    S: Copy,
{
    pub fn new(initial: S, tick_fn: fn(S, &mut C) -> S) -> Self {
        Self {
            current_state: initial,
            tick_fn,
        }
    }

    pub fn state(&self) -> S {
        self.current_state
    }
}

impl<S, C> Tick<C> for StateTask<S, C>
where
    S: Copy,
{
    fn tick(&mut self, ctx: &mut C) {
        self.current_state = (self.tick_fn)(self.current_state, ctx);
    }
}

struct TaskSlot<C> {
    name: &'static str,
    period: Duration,
    remaining: Duration,
    ready: bool,
    task: Box<dyn Tick<C>>,
}

pub struct Scheduler<C> {
    tasks: Vec<TaskSlot<C>>,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::with_capacity(MAX_TASKS),
        }
    }

    /// Registers a task. It becomes ready on the very first tick.
    pub fn add_task<T>(&mut self, name: &'static str, period: Duration, task: T) -> Result<()>
    where
        T: Tick<C> + 'static,
    {
        if period.as_millis() == 0 {
            return Err(Error::InvalidPeriod);
        }
        if self.tasks.len() >= MAX_TASKS {
            return Err(Error::SchedulerFull);
        }

        debug!("Registered task {} every {} ms", name, period.as_millis());
        self.tasks.push(TaskSlot {
            name,
            period,
            remaining: Duration::from_millis(0),
            ready: false,
            task: Box::new(task),
        });
        Ok(())
    }

    /// Convenience for [`StateTask`] registration.
    pub fn add_state_task<S>(
        &mut self,
        name: &'static str,
        period: Duration,
        initial: S,
        tick_fn: fn(S, &mut C) -> S,
    ) -> Result<()>
    where
        S: Copy + 'static,
        C: 'static,
    {
        self.add_task(name, period, StateTask::new(initial, tick_fn))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tasks.iter().map(|slot| slot.name)
    }

    /// Greatest common divisor of all task periods, `None` without tasks.
    pub fn base_period(&self) -> Option<Duration> {
        self.tasks
            .iter()
            .map(|slot| slot.period.as_millis())
            .reduce(gcd)
            .map(Duration::from_millis)
    }

    /// Timer half of a tick: advances every countdown by one base period and
    /// flags the tasks that came due.
    pub fn elapse(&mut self) {
        let Some(base) = self.base_period() else {
            return;
        };

        for slot in self.tasks.iter_mut() {
            if slot.remaining <= base {
                slot.ready = true;
                slot.remaining = slot.period;
            } else {
                slot.remaining = slot.remaining - base;
            }
        }
    }

    /// Main-loop half of a tick: runs every ready task once.
    pub fn dispatch(&mut self, ctx: &mut C) {
        for slot in self.tasks.iter_mut().filter(|slot| slot.ready) {
            slot.ready = false;
            slot.task.tick(ctx);
        }
    }

    pub fn tick(&mut self, ctx: &mut C) {
        self.elapse();
        self.dispatch(ctx);
    }

    /// Ticks forever at the base period. Returns at once when no task is
    /// registered.
    pub async fn run(&mut self, ctx: &mut C) {
        let Some(base) = self.base_period() else {
            return;
        };

        let mut ticker = Ticker::every(base);
        loop {
            ticker.next().await;
            self.tick(ctx);
        }
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}
