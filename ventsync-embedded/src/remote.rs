//! Remote-node side of the link: shows the window's status frames on a
//! 2x16 character display and sends commands back.

use alloc::format;
use alloc::string::String;

use ventsync_api::{PeerCommand, ReportedStatus, StatusReport};

use crate::radio::{Delivery, RadioSession, RadioTransport};

pub const DISPLAY_COLUMNS: usize = 16;

pub struct RemoteSession<R>
where
    R: RadioTransport,
{
    radio: RadioSession<R>,
    last_report: Option<StatusReport>,
}

impl<R> RemoteSession<R>
where
    R: RadioTransport,
{
    pub fn new(transport: R, max_retransmissions: u8) -> Self {
        Self {
            radio: RadioSession::new(transport, max_retransmissions),
            last_report: None,
        }
    }

    /// Drains queued frames and returns the newest report, if any arrived.
    pub fn poll(&mut self) -> Option<StatusReport> {
        let mut newest = None;
        while let Some(frame) = self.radio.poll_incoming() {
            newest = Some(StatusReport::decode(&frame));
        }

        if newest.is_some() {
            self.last_report = newest;
        }
        newest
    }

    pub fn send(&mut self, command: PeerCommand) -> Delivery {
        self.radio.send_and_confirm(&command.encode())
    }

    pub fn last_report(&self) -> Option<&StatusReport> {
        self.last_report.as_ref()
    }

    pub fn display(&self) -> [String; 2] {
        render(self.last_report.as_ref())
    }

    pub fn radio(&self) -> &RadioSession<R> {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut RadioSession<R> {
        &mut self.radio
    }
}

/// Formats a report as two display lines of exactly [`DISPLAY_COLUMNS`].
pub fn render(report: Option<&StatusReport>) -> [String; 2] {
    let Some(report) = report else {
        return [
            format!("{:<16}", "Waiting..."),
            format!("{:<16}", ""),
        ];
    };

    let temperatures = format!(
        "In{:>4}F Out{:>4}F",
        report.reading.indoor, report.reading.outdoor
    );

    let status = match report.status {
        ReportedStatus::Window(status) => String::from(status.name()),
        ReportedStatus::Fault => String::from("FAULT"),
        ReportedStatus::Unknown(code) => format!("Code {}", code),
    };
    let mode = if report.auto { "AUTO" } else { "" };

    [temperatures, format!("{:<12}{:>4}", status, mode)]
}
