use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use super::{config::Config, supervisor::Supervisor};
use crate::{
    channel::Transport,
    events::Bus,
    registry::Registry,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: Config,
    registry: Arc<dyn Registry>,
    transport: Arc<dyn Transport>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SupervisorBuilder {
    /// Creates a new builder around the two external collaborators.
    pub fn new(cfg: Config, registry: Arc<dyn Registry>, transport: Arc<dyn Transport>) -> Self {
        Self {
            cfg,
            registry,
            transport,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (bindings, evictions, ping results)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the supervisor.
    ///
    /// Spawns the subscriber workers and the bus listener, so this must be
    /// called from within a tokio runtime. The loop itself is not started;
    /// call [`Supervisor::spawn`] or [`Supervisor::run`].
    pub fn build(self) -> Arc<Supervisor> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        if !self.subscribers.is_empty() {
            let subs = SubscriberSet::new(self.subscribers, &bus);
            subscriber_listener(&bus, subs);
        }

        Arc::new(Supervisor::new_internal(
            self.cfg,
            bus,
            self.registry,
            self.transport,
        ))
    }
}

/// Forwards bus events to the subscriber set until the supervisor (the only
/// strong bus handle) is dropped, then drains and stops the workers.
fn subscriber_listener(bus: &Bus, subs: SubscriberSet) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => subs.emit(ev),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        subs.shutdown().await;
    });
}
