use std::error::Error;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time;
use ventsync_api::{PeerCommand, ReportedStatus, TemperatureReading, WindowStatus};
use ventsync_embedded::{Input, RemoteSession, WindowNode};

use crate::link::Endpoint;
use crate::plant::{Plant, SharedPlant, SimBoard};
use crate::settings::{Action, Settings};

pub mod link;
pub mod plant;
pub mod settings;

/// End-of-run state, printed as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub simulated_secs: f64,
    pub status: WindowStatus,
    pub revolutions: u8,
    pub reading: TemperatureReading,
    pub auto: bool,
    pub force_fault: bool,
    pub frames_sent: u32,
    pub frames_lost: u32,
    pub link_up: bool,
    pub motor_pulses: u64,
    /// Status as last heard by the remote node
    pub remote_status: Option<ReportedStatus>,
    pub display: [String; 2],
}

struct Release {
    at_ms: u64,
    input: Input,
}

pub async fn run(settings: &Settings) -> Result<Snapshot, Box<dyn Error>> {
    let config = settings.node.config(&settings.radio);
    let steps_per_rev = i64::from(config.steps_per_rev);
    let full_travel = i64::from(config.rev_open) * steps_per_rev;
    let plant = Plant::shared(&settings.climate, full_travel, settings.node.contact_force);

    let (window_radio, remote_radio) = link::pair(&settings.radio, settings.simulation.seed);
    let mut node = WindowNode::new(plant::board(&plant), window_radio, config);
    let mut scheduler = node.scheduler()?;
    let mut remote = RemoteSession::new(remote_radio, settings.radio.max_retransmissions);

    let base_ms = scheduler
        .base_period()
        .map(|period| period.as_millis())
        .unwrap_or(1)
        .max(1);
    let total_ticks = settings.simulation.duration_secs * 1000 / base_ms;
    tracing::info!(
        "Simulating {}s in {} ticks of {} ms",
        settings.simulation.duration_secs,
        total_ticks,
        base_ms
    );

    let mut interval = time::interval(Duration::from_millis(
        settings.simulation.tick_interval_ms.max(1),
    ));
    let mut script = settings.script.iter().peekable();
    let mut releases: Vec<Release> = Vec::new();
    let mut shown: Option<[String; 2]> = None;

    for tick in 0..total_ticks {
        if settings.simulation.tick_interval_ms > 0 {
            interval.tick().await;
        }
        let now_ms = tick * base_ms;

        while let Some(event) = script.next_if(|event| event.at_secs * 1000.0 <= now_ms as f64) {
            tracing::info!("t={:.1}s {:?}", now_ms as f64 / 1000.0, event.action);
            apply(&event.action, now_ms, &plant, &mut remote, &mut releases, steps_per_rev);
        }

        releases.retain(|release| {
            if release.at_ms <= now_ms {
                plant.borrow_mut().press(release.input, false);
                false
            } else {
                true
            }
        });

        plant.borrow_mut().advance_climate(base_ms as f64 / 1000.0);
        scheduler.tick(&mut node);

        if remote.poll().is_some() {
            let lines = remote.display();
            if shown.as_ref() != Some(&lines) {
                tracing::info!("Remote [{}] [{}]", lines[0], lines[1]);
                shown = Some(lines);
            }
        }
    }

    let snapshot = snapshot(&node, &remote, &plant, total_ticks * base_ms);
    tracing::info!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(snapshot)
}

fn apply(
    action: &Action,
    now_ms: u64,
    plant: &SharedPlant,
    remote: &mut RemoteSession<Endpoint>,
    releases: &mut Vec<Release>,
    steps_per_rev: i64,
) {
    let mut press = |input: Input, hold_ms: u64| {
        plant.borrow_mut().press(input, true);
        releases.push(Release {
            at_ms: now_ms + hold_ms,
            input,
        });
    };

    match action {
        Action::ConfigureAuto { max, min } => {
            let delivery = remote.send(PeerCommand::ConfigureAuto {
                max: *max,
                min: *min,
            });
            tracing::debug!("Configure auto: {:?}", delivery);
        }
        Action::Open => {
            tracing::debug!("Remote open: {:?}", remote.send(PeerCommand::Open));
        }
        Action::Close => {
            tracing::debug!("Remote close: {:?}", remote.send(PeerCommand::Close));
        }
        Action::PressOpen { hold_ms } => press(Input::OpenButton, *hold_ms),
        Action::PressClose { hold_ms } => press(Input::CloseButton, *hold_ms),
        Action::PressStop { hold_ms } => press(Input::StopButton, *hold_ms),
        Action::FaultReset { hold_ms } => press(Input::FaultReset, *hold_ms),
        Action::Obstruct { revolution } => {
            plant.borrow_mut().obstruction = Some(i64::from(*revolution) * steps_per_rev);
        }
        Action::ClearObstruction => plant.borrow_mut().obstruction = None,
        Action::ForceSensor { working } => plant.borrow_mut().force_sensor_ok = *working,
        Action::RemoteOffline => remote.radio().transport().set_online(false),
        Action::RemoteOnline => remote.radio().transport().set_online(true),
    }
}

fn snapshot(
    node: &WindowNode<SimBoard, Endpoint>,
    remote: &RemoteSession<Endpoint>,
    plant: &SharedPlant,
    simulated_ms: u64,
) -> Snapshot {
    let shared = node.shared();
    let (frames_sent, frames_lost) = node.radio().counters();

    Snapshot {
        simulated_secs: simulated_ms as f64 / 1000.0,
        status: shared.status,
        revolutions: node.position().revolutions,
        reading: shared.reading,
        auto: shared.auto.enabled,
        force_fault: shared.force_fault,
        frames_sent,
        frames_lost,
        link_up: node.radio().is_link_up(),
        motor_pulses: plant.borrow().pulses,
        remote_status: remote.last_report().map(|report| report.status),
        display: remote.display(),
    }
}
