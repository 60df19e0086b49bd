#![allow(dead_code)]

pub mod sim_board;

use ventsync_embedded::{NodeConfig, WindowNode};

use sim_board::{ScriptedRadio, SimHal};

pub type SimNode = WindowNode<SimHal, ScriptedRadio>;

pub fn node() -> SimNode {
    node_with(NodeConfig::default())
}

pub fn node_with(config: NodeConfig) -> SimNode {
    WindowNode::new(SimHal::new(), ScriptedRadio::default(), config)
}

/// Status byte of the most recent frame sent to the remote node.
pub fn last_status_byte(node: &SimNode) -> Option<u8> {
    node.radio().transport().last_sent().map(|frame| frame[2])
}
