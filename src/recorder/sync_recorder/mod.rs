// src/recorder/sync_recorder/mod.rs

use crate::common::{
    error::HumonError,
    frame::LinkConfiguration,
    hal_traits::{LinkClock, LinkDriver},
    reading::{self, Reading},
    SamplingRequest,
};
use core::ops::{Deref, DerefMut};
use tracing::{debug, error, info, info_span, Span};

mod drainer;
mod io_helpers;
pub mod link;
mod poller;

#[cfg(test)]
mod mock;

pub use link::{LinkManager, PortError};

/// Where a [`SensorSession`] is in its lifecycle, or (through
/// [`SensorSession::last_stage`]) how far its last `run` got.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    LinkOpen,
    CommandSent,
    Polling,
    Draining,
    Decoded,
    Closed,
}

/// One HumonSens on one link, measured SYNCHRONOUSLY.
///
/// Each [`run`](SensorSession::run) opens the link, sends the frequency
/// command, waits for the device, drains its output down to the newest line,
/// decodes it and closes the link again. Failures never escape `run`: they
/// are logged and the result is [`Reading::Empty`].
///
/// Log events are emitted inside the session's own span, so several sessions
/// (or tests) never share hidden logger state.
pub struct SensorSession<D, C>
where
    D: LinkDriver,
    C: LinkClock,
{
    link: LinkManager<D>,
    clock: C,
    state: SessionState,
    last_stage: SessionState,
    span: Span,
}

impl<D, C> SensorSession<D, C>
where
    D: LinkDriver,
    C: LinkClock,
{
    pub fn new(config: LinkConfiguration, driver: D, clock: C) -> Self {
        let span = info_span!("sensor_session", port = config.port());
        SensorSession {
            link: LinkManager::new(config, driver),
            clock,
            state: SessionState::Idle,
            last_stage: SessionState::Idle,
            span,
        }
    }

    /// Replaces the span the session logs under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// `Idle` before the first run, `Closed` after any run.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Last stage the most recent `run` completed: `Idle` if the link never
    /// opened, `Decoded` if the run went all the way through.
    #[inline]
    pub fn last_stage(&self) -> SessionState {
        self.last_stage
    }

    #[inline]
    pub fn link(&self) -> &LinkManager<D> {
        &self.link
    }

    #[inline]
    pub fn config(&self) -> &LinkConfiguration {
        self.link.config()
    }

    // --- Public Blocking Methods ---

    /// Performs one measurement. The link is closed before this returns,
    /// whatever happened in between.
    pub fn run(&mut self, request: &SamplingRequest) -> Reading {
        let span = self.span.clone();
        let _entered = span.enter();

        self.last_stage = SessionState::Idle;
        let mut scope = LinkScope::new(self);
        let reading = match scope.measure(request) {
            Ok(reading) => reading,
            Err(e) => {
                error!(error = %e, "measurement routine failed");
                Reading::Empty
            }
        };
        info!(%reading, "reading received");
        reading
    }

    // --- Core Measurement Logic (Private Helper) ---
    fn measure(&mut self, request: &SamplingRequest) -> Result<Reading, HumonError<PortError<D>>> {
        self.link.open()?;
        self.advance(SessionState::LinkOpen);

        info!(frequency = request.frequency(), "requesting measurement");
        self.send_frequency(request.frequency())?;
        self.advance(SessionState::CommandSent);

        let ready = self.await_data(request.wait_period(), request.max_checks())?;
        if !ready {
            debug!("draining without readiness");
        }
        self.advance(SessionState::Polling);

        let frame = self.drain_to_last()?;
        self.advance(SessionState::Draining);

        let reading = reading::decode(frame.as_str(), request.frequency());
        self.advance(SessionState::Decoded);
        Ok(reading)
    }

    fn advance(&mut self, stage: SessionState) {
        self.state = stage;
        self.last_stage = stage;
    }

    fn close_link(&mut self) {
        self.link.close();
        self.state = SessionState::Closed;
    }
}

/// Keeps the link open for the lifetime of one measurement; dropping it
/// closes the link on every exit path.
struct LinkScope<'s, D, C>
where
    D: LinkDriver,
    C: LinkClock,
{
    session: &'s mut SensorSession<D, C>,
}

impl<'s, D, C> LinkScope<'s, D, C>
where
    D: LinkDriver,
    C: LinkClock,
{
    fn new(session: &'s mut SensorSession<D, C>) -> Self {
        LinkScope { session }
    }
}

impl<D, C> Deref for LinkScope<'_, D, C>
where
    D: LinkDriver,
    C: LinkClock,
{
    type Target = SensorSession<D, C>;

    fn deref(&self) -> &Self::Target {
        &*self.session
    }
}

impl<D, C> DerefMut for LinkScope<'_, D, C>
where
    D: LinkDriver,
    C: LinkClock,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.session
    }
}

impl<D, C> Drop for LinkScope<'_, D, C>
where
    D: LinkDriver,
    C: LinkClock,
{
    fn drop(&mut self) {
        self.session.close_link();
    }
}
