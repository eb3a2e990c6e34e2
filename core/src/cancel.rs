//! Cancellation of requests already on the wire.
//!
//! # Design
//! ureq performs the whole exchange on the calling thread, so the cancel
//! flag of the active `Context` is parked in a thread-local for the duration
//! of the call (`CancelScope`). `CancelConnector` sits at the end of ureq's
//! connector chain and wraps every transport it hands out, TLS included, in
//! a `CancelTransport`. That wrapper never blocks on the socket for longer
//! than `POLL_INTERVAL` at a time and checks the flag between waits, so a
//! cancel lands within one interval while the server is silent. Pooled
//! connections read whichever flag is active when they are next used.

use std::cell::RefCell;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ureq::unversioned::transport::time::Duration as WireDuration;
use ureq::unversioned::transport::{
    Buffers, ConnectionDetails, Connector, DefaultConnector, NextTimeout, Transport,
};

/// Longest single socket wait between two looks at the cancel flag.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(25);

thread_local! {
    static ACTIVE: RefCell<Option<Arc<AtomicBool>>> = const { RefCell::new(None) };
}

/// Installs a cancel flag for the current thread until dropped.
pub(crate) struct CancelScope {
    previous: Option<Arc<AtomicBool>>,
}

impl CancelScope {
    pub(crate) fn enter(flag: Arc<AtomicBool>) -> Self {
        let previous = ACTIVE.with(|active| active.replace(Some(flag)));
        Self { previous }
    }
}

impl Drop for CancelScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|active| *active.borrow_mut() = previous);
    }
}

fn cancelled() -> bool {
    ACTIVE.with(|active| {
        active
            .borrow()
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    })
}

fn cancel_error() -> ureq::Error {
    ureq::Error::Io(io::Error::new(io::ErrorKind::Interrupted, "context canceled"))
}

/// ureq's default connector chain with every transport wrapped in a
/// `CancelTransport`.
pub(crate) fn connector() -> impl Connector {
    DefaultConnector::new().chain(CancelConnector)
}

#[derive(Debug)]
pub(crate) struct CancelConnector;

impl Connector<Box<dyn Transport>> for CancelConnector {
    type Out = CancelTransport;

    fn connect(
        &self,
        _details: &ConnectionDetails,
        chained: Option<Box<dyn Transport>>,
    ) -> Result<Option<Self::Out>, ureq::Error> {
        if cancelled() {
            return Err(cancel_error());
        }
        Ok(chained.map(|inner| CancelTransport { inner }))
    }
}

pub(crate) struct CancelTransport {
    inner: Box<dyn Transport>,
}

impl fmt::Debug for CancelTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelTransport")
            .field("inner", &self.inner)
            .finish()
    }
}

impl Transport for CancelTransport {
    fn buffers(&mut self) -> &mut dyn Buffers {
        self.inner.buffers()
    }

    fn transmit_output(&mut self, amount: usize, timeout: NextTimeout) -> Result<(), ureq::Error> {
        if cancelled() {
            return Err(cancel_error());
        }
        self.inner.transmit_output(amount, timeout)
    }

    fn await_input(&mut self, timeout: NextTimeout) -> Result<bool, ureq::Error> {
        let budget = *timeout.after;
        let started = Instant::now();
        loop {
            if cancelled() {
                return Err(cancel_error());
            }
            let left = budget.saturating_sub(started.elapsed());
            let slice = left.min(POLL_INTERVAL).max(Duration::from_millis(1));
            let last = slice >= left;
            let sliced = NextTimeout {
                after: WireDuration::Exact(slice),
                reason: timeout.reason,
            };
            match self.inner.await_input(sliced) {
                Err(ureq::Error::Timeout(_)) if !last => continue,
                outcome => return outcome,
            }
        }
    }

    fn is_open(&mut self) -> bool {
        self.inner.is_open()
    }

    fn is_tls(&self) -> bool {
        self.inner.is_tls()
    }
}
