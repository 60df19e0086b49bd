//! Half-duplex radio link to the remote node.

use log::{debug, info, warn};
use ventsync_api::{FRAME_LEN, RadioFrame};

/// Packet radio with hardware acknowledgement and auto-retransmit
/// (nRF24L01-style). Transfers are fixed 4-byte payloads.
pub trait RadioTransport {
    /// Sends one payload and blocks until the transfer (including automatic
    /// retransmissions) is complete.
    fn transmit(&mut self, payload: &[u8; FRAME_LEN]);

    /// A received payload is waiting.
    fn data_ready(&mut self) -> bool;

    fn receive(&mut self, payload: &mut [u8; FRAME_LEN]);

    /// Retransmissions spent on the last transmit.
    fn retransmission_count(&mut self) -> u8;

    fn resume_receive_mode(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    PeerUnreachable,
}

pub struct RadioSession<R>
where
    R: RadioTransport,
{
    transport: R,
    max_retransmissions: u8,
    link_up: bool,
    sent: u32,
    lost: u32,
}

impl<R> RadioSession<R>
where
    R: RadioTransport,
{
    pub fn new(transport: R, max_retransmissions: u8) -> Self {
        Self {
            transport,
            max_retransmissions,
            link_up: true,
            sent: 0,
            lost: 0,
        }
    }

    /// Transmits `frame` and judges delivery from the retransmission count.
    /// The transport is back in receive mode when this returns.
    pub fn send_and_confirm(&mut self, frame: &RadioFrame) -> Delivery {
        self.transport.transmit(&frame.to_bytes());
        let retries = self.transport.retransmission_count();
        self.transport.resume_receive_mode();
        self.sent = self.sent.wrapping_add(1);

        let delivery = if retries >= self.max_retransmissions {
            self.lost = self.lost.wrapping_add(1);
            Delivery::PeerUnreachable
        } else {
            Delivery::Delivered
        };

        match (self.link_up, delivery) {
            (true, Delivery::PeerUnreachable) => {
                warn!("Radio link lost after {} retransmissions", retries);
                self.link_up = false;
            }
            (false, Delivery::Delivered) => {
                info!("Radio link restored");
                self.link_up = true;
            }
            _ => {}
        }

        delivery
    }

    pub fn data_ready(&mut self) -> bool {
        self.transport.data_ready()
    }

    /// Takes the next queued frame, if any.
    pub fn poll_incoming(&mut self) -> Option<RadioFrame> {
        if !self.transport.data_ready() {
            return None;
        }

        let mut payload = [0u8; FRAME_LEN];
        self.transport.receive(&mut payload);
        debug!("Received frame {:?}", payload);
        Some(RadioFrame::from_bytes(payload))
    }

    pub fn is_link_up(&self) -> bool {
        self.link_up
    }

    /// Frames transmitted and frames the peer never acknowledged.
    pub fn counters(&self) -> (u32, u32) {
        (self.sent, self.lost)
    }

    pub fn transport(&self) -> &R {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut R {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::vec::Vec;

    use super::*;

    #[derive(Default)]
    struct MockRadio {
        retries: u8,
        inbox: VecDeque<[u8; FRAME_LEN]>,
        sent: Vec<[u8; FRAME_LEN]>,
        receive_mode_calls: usize,
    }

    impl RadioTransport for MockRadio {
        fn transmit(&mut self, payload: &[u8; FRAME_LEN]) {
            self.sent.push(*payload);
        }

        fn data_ready(&mut self) -> bool {
            !self.inbox.is_empty()
        }

        fn receive(&mut self, payload: &mut [u8; FRAME_LEN]) {
            if let Some(next) = self.inbox.pop_front() {
                *payload = next;
            }
        }

        fn retransmission_count(&mut self) -> u8 {
            self.retries
        }

        fn resume_receive_mode(&mut self) {
            self.receive_mode_calls += 1;
        }
    }

    #[test]
    fn test_unreachable_exactly_at_maximum() {
        let mut session = RadioSession::new(MockRadio::default(), 15);
        let frame = RadioFrame::new(72, 68, 1, 0);

        session.transport_mut().retries = 14;
        assert_eq!(session.send_and_confirm(&frame), Delivery::Delivered);

        session.transport_mut().retries = 15;
        assert_eq!(session.send_and_confirm(&frame), Delivery::PeerUnreachable);
        assert!(!session.is_link_up());

        session.transport_mut().retries = 0;
        assert_eq!(session.send_and_confirm(&frame), Delivery::Delivered);
        assert!(session.is_link_up());

        assert_eq!(session.counters(), (3, 1));
    }

    #[test]
    fn test_always_returns_to_receive_mode() {
        let mut session = RadioSession::new(MockRadio::default(), 15);
        let frame = RadioFrame::new(0, 0, 1, 0);

        session.send_and_confirm(&frame);
        session.transport_mut().retries = 15;
        session.send_and_confirm(&frame);

        assert_eq!(session.transport().receive_mode_calls, 2);
        assert_eq!(session.transport().sent, vec![[0, 0, 1, 0], [0, 0, 1, 0]]);
    }

    #[test]
    fn test_poll_incoming() {
        let mut session = RadioSession::new(MockRadio::default(), 15);
        assert!(session.poll_incoming().is_none());

        session.transport_mut().inbox.push_back([72, 68, 2, 0]);
        assert!(session.data_ready());
        assert_eq!(
            session.poll_incoming(),
            Some(RadioFrame::new(72, 68, 2, 0))
        );
        assert!(!session.data_ready());
    }
}
