//! Scheduler entry points, one per window task.

use crate::control::{AutoState, FaultState, ManualState};
use crate::hal::WindowHal;
use crate::node::WindowNode;
use crate::radio::RadioTransport;

/// Link state lives in the radio session, so this task keeps none.
pub fn radio<H, R>(_state: (), node: &mut WindowNode<H, R>)
where
    H: WindowHal,
    R: RadioTransport,
{
    node.radio_cycle();
}

/// The motion in flight is owned by the motor controller.
pub fn motor<H, R>(_state: (), node: &mut WindowNode<H, R>)
where
    H: WindowHal,
    R: RadioTransport,
{
    node.run_motor();
}

pub fn auto<H, R>(state: AutoState, node: &mut WindowNode<H, R>) -> AutoState
where
    H: WindowHal,
    R: RadioTransport,
{
    node.auto_cycle(state)
}

pub fn manual<H, R>(state: ManualState, node: &mut WindowNode<H, R>) -> ManualState
where
    H: WindowHal,
    R: RadioTransport,
{
    node.manual_cycle(state)
}

pub fn fault<H, R>(state: FaultState, node: &mut WindowNode<H, R>) -> FaultState
where
    H: WindowHal,
    R: RadioTransport,
{
    node.fault_cycle(state)
}

pub fn sampler<H, R>(_state: (), node: &mut WindowNode<H, R>)
where
    H: WindowHal,
    R: RadioTransport,
{
    node.sample();
}
