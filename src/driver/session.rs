// src/driver/session.rs

use core::fmt;
use core::time::Duration;

use log::{debug, info, warn};

use super::deadline::RetryCounter;
use super::stats::Stats;
use crate::common::{
    command::Command,
    config::DriverConfig,
    error::{DecodeError, Fault},
    response::{match_line, MatchResult, ResponsePattern},
    types::{decode, FirmwareVersion, Measurement},
};

/// Protocol phase of a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum State {
    /// Draining stray output until the bridge goes quiet.
    Flushing,
    /// Waiting for the firmware tag.
    GetVersion,
    /// Waiting for the sensor to acknowledge a reset.
    ResetSensor,
    /// Waiting for the single-shot start to be acknowledged.
    StartMeasurement,
    /// Conversion in progress; no data expected.
    AwaitConversion,
    /// Waiting for the six measurement bytes.
    ReadMeasurement,
}

impl State {
    /// The command sent when this state is entered, if any.
    pub const fn command(&self) -> Option<Command> {
        match self {
            State::Flushing | State::AwaitConversion => None,
            State::GetVersion => Some(Command::Version),
            State::ResetSensor => Some(Command::ResetSensor),
            State::StartMeasurement => Some(Command::StartSingleShot),
            State::ReadMeasurement => Some(Command::ReadMeasurement),
        }
    }

    /// The response shape expected while in this state.
    pub const fn expected_response(&self) -> Option<ResponsePattern> {
        match self.command() {
            Some(cmd) => Some(cmd.expected_response()),
            None => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Flushing => "flushing",
            State::GetVersion => "get version",
            State::ResetSensor => "resetting sensor",
            State::StartMeasurement => "start single",
            State::AwaitConversion => "await conversion",
            State::ReadMeasurement => "read measurement",
        };
        f.write_str(name)
    }
}

/// Input to the state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    /// A complete response line from the transport.
    LineReceived(&'a str),
    /// The pending deadline expired without a line.
    TimedOut,
}

/// Human-readable phase information for the sink.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// Looking for the bridge.
    Probing,
    /// The bridge answered the version query.
    Firmware(FirmwareVersion),
    /// The ENS210 acknowledged its reset.
    SensorFound,
    /// The reset was not acknowledged; `attempt` failures so far.
    SensorNotFound { attempt: u8 },
    /// The machine restarted at `Flushing`.
    Restart { from: State, cause: Fault },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Probing => f.write_str("probing dongle ..."),
            Status::Firmware(version) => write!(f, "firmware {}", version),
            Status::SensorFound => f.write_str("ENS210 found"),
            Status::SensorNotFound { .. } => f.write_str("no ENS210"),
            Status::Restart { from, cause } => write!(f, "{}: {}, restarting", from, cause),
        }
    }
}

/// Outcome of one read cycle, handed to the sink.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Report {
    pub sample: Result<Measurement, DecodeError>,
    pub stats: Stats,
}

/// Everything a single event asks the outside world to do.
///
/// A transition sends at most one command and always arms exactly one
/// deadline; the types make "two of either" unrepresentable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transition {
    /// State entered.
    pub state: State,
    /// Command to send on entry.
    pub command: Option<Command>,
    /// Deadline to arm, replacing the pending one.
    pub timeout: Duration,
    pub status: Option<Status>,
    pub report: Option<Report>,
}

impl Transition {
    fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    fn with_report(mut self, report: Report) -> Self {
        self.report = Some(report);
        self
    }
}

/// One live bridge+sensor session: the protocol state machine and its data.
///
/// The session performs no I/O. Each event yields a [`Transition`] that the
/// caller (normally [`Driver`](super::Driver)) carries out.
#[derive(Debug, Clone)]
pub struct Session {
    state: State,
    retries: RetryCounter,
    stats: Stats,
    firmware: Option<FirmwareVersion>,
    config: DriverConfig,
}

impl Session {
    pub fn new(config: DriverConfig) -> Self {
        Session {
            state: State::Flushing,
            retries: RetryCounter::new(config.reset_retry_limit),
            stats: Stats::new(),
            firmware: None,
            config,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn retry_count(&self) -> u8 {
        self.retries.count()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Firmware tag from the last successful version query.
    pub fn firmware(&self) -> Option<FirmwareVersion> {
        self.firmware
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// (Re)starts the machine at `Flushing`. Used on connect and for explicit restarts.
    pub fn start(&mut self) -> Transition {
        debug!("start state machine");
        self.retries.reset();
        self.enter(State::Flushing, self.config.restart_delay)
    }

    /// Advances the machine by one event.
    ///
    /// `now_ms` timestamps read cycles for the interval statistics.
    pub fn handle(&mut self, event: Event<'_>, now_ms: u64) -> Transition {
        let line = match event {
            Event::TimedOut => return self.on_timeout(),
            Event::LineReceived(line) => line,
        };

        match self.state {
            State::Flushing => {
                debug!("{}: drain '{}'", self.state, line);
                self.enter(State::Flushing, self.config.flush_settle)
                    .with_status(Status::Probing)
            }
            State::GetVersion => {
                let version = match_line(ResponsePattern::Version, line)
                    .payload()
                    .and_then(FirmwareVersion::new);
                match version {
                    Some(version) => {
                        info!("bridge firmware {}", version);
                        self.firmware = Some(version);
                        self.retries.reset();
                        self.enter(State::ResetSensor, self.config.command_timeout)
                            .with_status(Status::Firmware(version))
                    }
                    None => self.restart_on_mismatch(line),
                }
            }
            State::ResetSensor => {
                if match_line(ResponsePattern::ResetAck, line).is_ack() {
                    info!("ENS210 found after {} retries", self.retries.count());
                    self.retries.reset();
                    self.stats.reset();
                    return self
                        .enter(State::StartMeasurement, self.config.command_timeout)
                        .with_status(Status::SensorFound);
                }
                match self.retries.record_failure() {
                    Ok(attempt) => {
                        debug!("{}: no ack '{}', retry {}", self.state, line, attempt);
                        self.enter(State::ResetSensor, self.config.command_timeout)
                            .with_status(Status::SensorNotFound { attempt })
                    }
                    Err(fault) => self.restart(fault),
                }
            }
            State::StartMeasurement => match match_line(ResponsePattern::StartAck, line) {
                MatchResult::Ack => self.enter(State::AwaitConversion, self.config.conversion_delay),
                _ => self.restart_on_mismatch(line),
            },
            State::AwaitConversion => self.restart_on_mismatch(line),
            State::ReadMeasurement => match match_line(ResponsePattern::Measurement, line) {
                MatchResult::Payload(hex) => {
                    let sample = decode(hex, self.config.crc_check);
                    match &sample {
                        Ok(m) => debug!("T={} H={}", m.temperature_c, m.humidity_rh),
                        Err(e) => debug!("{}", e.tag()),
                    }
                    self.stats.record(now_ms, &sample);
                    let report = Report { sample, stats: self.stats };
                    self.enter(State::StartMeasurement, self.config.command_timeout)
                        .with_report(report)
                }
                _ => self.restart_on_mismatch(line),
            },
        }
    }

    fn on_timeout(&mut self) -> Transition {
        match self.state {
            State::Flushing => self
                .enter(State::GetVersion, self.config.command_timeout)
                .with_status(Status::Probing),
            State::AwaitConversion => self.enter(State::ReadMeasurement, self.config.command_timeout),
            State::GetVersion
            | State::ResetSensor
            | State::StartMeasurement
            | State::ReadMeasurement => self.restart(Fault::Timeout),
        }
    }

    fn restart_on_mismatch(&mut self, line: &str) -> Transition {
        debug!("{}: unexpected '{}'", self.state, line);
        self.restart(Fault::ProtocolMismatch)
    }

    fn restart(&mut self, cause: Fault) -> Transition {
        let from = self.state;
        warn!("{}: {}, restarting", from, cause);
        self.retries.reset();
        self.enter(State::Flushing, self.config.restart_delay)
            .with_status(Status::Restart { from, cause })
    }

    fn enter(&mut self, state: State, timeout: Duration) -> Transition {
        self.state = state;
        Transition {
            state,
            command: state.command(),
            timeout,
            status: None,
            report: None,
        }
    }
}
