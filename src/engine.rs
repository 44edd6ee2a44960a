use anyhow::{Context, Result};
use crate::{
    args::*,
    game::{
        config::GameConfig,
        models::{ load_model_async, model_path },
        MatchEvent, MatchState, Role, RoleModel, Snapshot,
    },
};
use simple_moving_average::{SumTreeSMA, SMA};
use std::{
    io::BufRead,
    path::PathBuf,
    time::{Duration, Instant},
};
use tokio::{
    sync::mpsc,
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};

const STATS_WINDOW: usize = 64;

/// Requests from outside the loop, applied between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Pause,
    Resume,
    TogglePause,
    SetSpeed(f32),
    Reset,
    InstallModel(Role, RoleModel),
}

/// Parses one line of the stdin control protocol.
pub fn parse_control(line: &str) -> Result<Control, String> {
    let mut words = line.split_whitespace();
    let cmd = words.next().ok_or_else(|| "empty command".to_string())?;
    let control = match cmd {
        "pause" => Control::Pause,
        "resume" => Control::Resume,
        "toggle" | "p" => Control::TogglePause,
        "reset" | "r" => Control::Reset,
        "speed" => {
            let arg = words.next().ok_or_else(|| "speed needs a value".to_string())?;
            Control::SetSpeed(parse_speed(arg)?)
        }
        _ => return Err(format!("unknown command '{}'", cmd)),
    };
    match words.next() {
        Some(extra) => Err(format!("unexpected argument '{}'", extra)),
        None => Ok(control),
    }
}

/// Output of one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub snapshot: Snapshot,
    pub events: Vec<MatchEvent>,
}

pub struct SimulationLoop {
    state: MatchState,
    controls: mpsc::UnboundedReceiver<Control>,
    tick_time: SumTreeSMA<Duration, u32, STATS_WINDOW>,
    frames: u64,
}

impl SimulationLoop {
    pub fn new(state: MatchState, controls: mpsc::UnboundedReceiver<Control>) -> Self {
        Self {
            state,
            controls,
            tick_time: SumTreeSMA::from_zero(Duration::ZERO),
            frames: 0,
        }
    }

    fn apply(&mut self, control: Control, events: &mut Vec<MatchEvent>) {
        debug!(?control, "control");
        match control {
            Control::Pause => self.state.pause(),
            Control::Resume => self.state.resume(),
            Control::TogglePause => {
                self.state.toggle_pause();
            }
            Control::SetSpeed(speed) => self.state.set_speed_multiplier(speed),
            Control::Reset => events.push(self.state.reset()),
            Control::InstallModel(role, model) => self.state.install_model(role, model),
        }
    }

    /// Applies pending controls, then runs exactly one tick.
    pub fn frame(&mut self) -> Frame {
        let mut events = Vec::new();
        while let Ok(control) = self.controls.try_recv() {
            self.apply(control, &mut events);
        }

        let start = Instant::now();
        events.extend(self.state.tick());
        self.tick_time.add_sample(start.elapsed());
        self.frames += 1;

        Frame { snapshot: self.state.snapshot(), events }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn average_tick_time(&self) -> Duration {
        self.tick_time.get_average()
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }
}

/// Loads every role model in the background and hands each success to the
/// loop. The loop never waits for this.
fn spawn_model_loader(dir: PathBuf, tx: mpsc::UnboundedSender<Control>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        for role in Role::ALL {
            let path = model_path(&dir, role);
            match load_model_async(&path).await {
                Ok(model) => {
                    info!(%role, "model loaded");
                    if tx.send(Control::InstallModel(role, model)).is_err() {
                        return;
                    }
                }
                Err(e) => warn!(%role, error = %e, "no model, using scripted behaviour"),
            }
        }
    })
}

/// Forwards parsed control lines until the input ends or the loop is gone.
fn read_controls(input: impl BufRead, tx: &mpsc::UnboundedSender<Control>) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        match parse_control(&line) {
            Ok(control) => {
                if tx.send(control).is_err() {
                    break;
                }
            }
            Err(e) => warn!("ignoring control: {e}"),
        }
    }
}

/// Reads stdin on a detached thread. A pending read cannot be cancelled, so
/// the runtime must not own it or shutdown would wait for the next line.
fn spawn_control_reader(tx: mpsc::UnboundedSender<Control>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("controls".into())
        .spawn(move || read_controls(std::io::stdin().lock(), &tx))?;
    Ok(())
}

/// First gamelog line: the effective config and the geometry derived from it.
fn gamelog_header(state: &MatchState) -> serde_json::Value {
    serde_json::json!({
        "config": state.config(),
        "field": state.field(),
    })
}

pub async fn run(args: ArgConfig) -> Result<()> {
    let (tx, recv_task) = spawn_reciever(&args)?;

    let conf = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut state = MatchState::new(conf, args.seed).context("invalid game config")?;
    state.set_speed_multiplier(args.speed);

    send!(tx, OutputSource::Gamelog, "{}", gamelog_header(&state));

    let (ctl_tx, ctl_rx) = mpsc::unbounded_channel();
    let loader = args.models.clone().map(|dir| spawn_model_loader(dir, ctl_tx.clone()));
    if args.controls {
        spawn_control_reader(ctl_tx.clone()).context("failed to start control reader")?;
    }
    drop(ctl_tx);

    let mut sim = SimulationLoop::new(state, ctl_rx);
    let mut interval = tokio::time::interval(Duration::from_secs(1) / args.fps);
    // a late frame pushes the schedule back instead of bursting to catch up
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let start = Instant::now();
    info!(fps = args.fps, seed = ?args.seed, "match started");

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => {
                info!("interrupted");
                break;
            }
        }

        let frame = sim.frame();

        send!(
            tx,
            OutputSource::Gamelog,
            "{}",
            serde_json::to_string(&frame.snapshot)?
        );
        for event in &frame.events {
            send!(
                tx,
                OutputSource::Events,
                "{}",
                serde_json::to_string(&json_event(frame.snapshot.tick, event))?
            );
        }
        if sim.frames() % u64::from(args.fps) == 0 {
            send!(
                tx,
                OutputSource::Stats,
                "# tick {} score {}-{} avg tick {:?}",
                frame.snapshot.tick,
                frame.snapshot.score.a,
                frame.snapshot.score.b,
                sim.average_tick_time()
            );
        }

        if args.ticks.is_some_and(|max| sim.frames() >= max) {
            break;
        }
    }

    let score = sim.state().score();
    let teams = &sim.state().config().teams;
    send!(
        tx,
        OutputSource::Stats,
        "# time elapsed: {:?}\n{}",
        start.elapsed(),
        if score.a > score.b {
            format!("# Winner: {} {}-{}", teams.a.name, score.a, score.b)
        } else if score.a < score.b {
            format!("# Winner: {} {}-{}", teams.b.name, score.b, score.a)
        } else {
            format!("# TIE {}-{}", score.a, score.b)
        }
    );

    if let Some(task) = loader {
        task.abort();
    }

    drop(tx);
    drop(sim);
    recv_task.await??;
    Ok(())
}

fn json_event(tick: u64, event: &MatchEvent) -> serde_json::Value {
    let mut value = serde_json::to_value(event).unwrap_or_default();
    if let Some(obj) = value.as_object_mut() {
        obj.insert("tick".into(), tick.into());
    }
    value
}
