//! Lossy half-duplex radio link between the window and the remote node.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ventsync_api::FRAME_LEN;
use ventsync_embedded::RadioTransport;

use crate::settings::Radio;

/// Receive FIFO depth of an nRF24L01
pub const RX_FIFO_DEPTH: usize = 3;

#[derive(Debug, Default)]
struct Air {
    fifos: [VecDeque<[u8; FRAME_LEN]>; 2],
    online: [bool; 2],
}

pub struct Endpoint {
    air: Rc<RefCell<Air>>,
    side: usize,
    loss: f64,
    max_retransmissions: u8,
    rng: StdRng,
    retries: u8,
    listening: bool,
}

/// Window endpoint first, remote endpoint second.
pub fn pair(radio: &Radio, seed: u64) -> (Endpoint, Endpoint) {
    let air = Rc::new(RefCell::new(Air {
        online: [true, true],
        ..Air::default()
    }));

    let endpoint = |side: usize| Endpoint {
        air: air.clone(),
        side,
        loss: radio.loss.clamp(0.0, 1.0),
        max_retransmissions: radio.max_retransmissions,
        rng: StdRng::seed_from_u64(seed.wrapping_add(side as u64)),
        retries: 0,
        listening: true,
    };

    (endpoint(0), endpoint(1))
}

impl Endpoint {
    pub fn set_online(&self, online: bool) {
        self.air.borrow_mut().online[self.side] = online;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    fn peer(&self) -> usize {
        1 - self.side
    }
}

impl RadioTransport for Endpoint {
    fn transmit(&mut self, payload: &[u8; FRAME_LEN]) {
        self.listening = false;
        let peer = self.peer();
        let mut air = self.air.borrow_mut();

        // Reaching the maximum count means every attempt went unanswered
        for attempt in 0..self.max_retransmissions {
            let heard = air.online[peer] && !self.rng.random_bool(self.loss);
            // A full receive FIFO withholds the acknowledgement
            if heard && air.fifos[peer].len() < RX_FIFO_DEPTH {
                air.fifos[peer].push_back(*payload);
                self.retries = attempt;
                return;
            }
        }

        self.retries = self.max_retransmissions;
    }

    fn data_ready(&mut self) -> bool {
        !self.air.borrow().fifos[self.side].is_empty()
    }

    fn receive(&mut self, payload: &mut [u8; FRAME_LEN]) {
        if let Some(frame) = self.air.borrow_mut().fifos[self.side].pop_front() {
            *payload = frame;
        }
    }

    fn retransmission_count(&mut self) -> u8 {
        self.retries
    }

    fn resume_receive_mode(&mut self) {
        self.listening = true;
    }
}
