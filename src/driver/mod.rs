// src/driver/mod.rs

mod deadline;
mod session;
mod stats;
pub mod serial;

pub use deadline::{Deadline, RetryCounter, TimerToken};
pub use serial::SerialTransport;
pub use session::{Event, Report, Session, State, Status, Transition};
pub use stats::Stats;

use log::debug;

use crate::common::{
    config::DriverConfig,
    error::Ens210Error,
    hal_traits::{LineSource, Sink, Timer, Transport},
};

/// Binds a [`Session`] to its collaborators and carries out its transitions.
///
/// The driver is single-threaded and never blocks: the host feeds it lines
/// ([`on_line`](Self::on_line)) and timer expiries ([`on_timeout`](Self::on_timeout)),
/// one at a time, and every call runs to completion.
#[derive(Debug)]
pub struct Driver<T, S, K>
where
    T: Transport,
    S: Sink,
    K: Timer,
{
    transport: T,
    sink: S,
    timer: K,
    session: Session,
    deadline: Deadline,
}

impl<T, S, K> Driver<T, S, K>
where
    T: Transport,
    S: Sink,
    K: Timer,
{
    /// Starts a fresh session on a just-connected transport.
    pub fn connect(transport: T, sink: S, timer: K, config: DriverConfig) -> Self {
        let mut driver = Driver {
            transport,
            sink,
            timer,
            session: Session::new(config),
            deadline: Deadline::new(),
        };
        let transition = driver.session.start();
        // Flushing sends nothing, so this cannot fail.
        let _ = driver.apply(transition);
        driver
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Token of the deadline currently armed.
    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.deadline.pending()
    }

    /// Handles a complete line from the transport.
    pub fn on_line(&mut self, line: &str) -> Result<(), Ens210Error<T::Error>> {
        self.deadline.cancel();
        let now = self.timer.now_ms();
        let transition = self.session.handle(Event::LineReceived(line), now);
        self.apply(transition)
    }

    /// Handles a timer expiry. Expiries for a replaced deadline are ignored.
    pub fn on_timeout(&mut self, token: TimerToken) -> Result<(), Ens210Error<T::Error>> {
        if !self.deadline.expire(token) {
            debug!("stale timer {} ignored", token.id());
            return Ok(());
        }
        let now = self.timer.now_ms();
        let transition = self.session.handle(Event::TimedOut, now);
        self.apply(transition)
    }

    /// Restarts the machine at `Flushing`.
    pub fn restart(&mut self) -> Result<(), Ens210Error<T::Error>> {
        let transition = self.session.start();
        self.apply(transition)
    }

    /// Ends the session: cancels the pending deadline and hands the collaborators back.
    ///
    /// The session is dropped; nothing can reach it afterwards.
    pub fn disconnect(mut self) -> (T, S, K) {
        if self.deadline.cancel().is_some() {
            self.timer.cancel();
        }
        debug!("disconnected in state {}", self.session.state());
        (self.transport, self.sink, self.timer)
    }

    fn apply(&mut self, transition: Transition) -> Result<(), Ens210Error<T::Error>> {
        debug!("step: {} (timeout {:?})", transition.state, transition.timeout);

        // Arm before sending: a failed send then surfaces as a timeout and restart.
        let token = self.deadline.arm(transition.timeout);
        self.timer.arm(token, transition.timeout);

        if let Some(status) = &transition.status {
            self.sink.status(status);
        }
        if let Some(report) = &transition.report {
            self.sink.report(report);
        }
        if let Some(command) = transition.command {
            debug!("send '{}'", command);
            self.transport.send(command.encode()).map_err(Ens210Error::Io)?;
        }
        Ok(())
    }
}

impl<T, S, K> Driver<T, S, K>
where
    T: LineSource,
    S: Sink,
    K: Timer,
{
    /// Pulls one line from a polled transport and handles it.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` when no complete line is available.
    pub fn poll(&mut self) -> nb::Result<(), Ens210Error<T::Error>> {
        let line = self.transport.poll_line()?;
        self.on_line(line.as_str()).map_err(nb::Error::Other)
    }
}
