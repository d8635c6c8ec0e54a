//! # Supervisor: keeps one live player bound at all times.
//!
//! The [`Supervisor`] owns the active-player slot and runs a polling loop that
//! reconciles it with the registry and with the player itself. Callers never
//! touch the slot directly; they go through [`Supervisor::has_player`],
//! [`Supervisor::with_channel`] and [`Supervisor::shutdown_player`].
//!
//! ## Tick
//! ```text
//! tick(now):
//!   1. pool       pool_fill_interval elapsed?  → registry.fill_pool()
//!                                                  ├─ Ok  → PoolFilled
//!                                                  └─ Err → PoolFillFailed
//!   2. refresh    slot bound?                  → registry.find_by_id(id)
//!                                                  ├─ Found(state)  → slot := state
//!                                                  ├─ Found(port 0) → slot := empty, PlayerOffline
//!                                                  ├─ NotFound      → slot := empty, PlayerOffline
//!                                                  └─ Transient(e)  → untouched, RefreshFailed
//!   3. acquire    slot empty?                  → await_ok(find_player_timeout, find_available)
//!                                                  ├─ Ok(player) → slot := player, PlayerFound
//!                                                  └─ Err        → NoPlayerAvailable
//!   4. ping       bound && ping_interval elapsed? → await_ok(ping_timeout, channel.send_ping)
//!                                                  ├─ Ok  → PingSent
//!                                                  └─ Err → slot := empty, PlayerUnreachable
//! ```
//!
//! ## Rules
//! - Each step sees the slot as left by the previous step of the same tick.
//! - Failures are published as events and never stop the loop.
//! - A single failed ping evicts the player; there is no "unhealthy but bound" state.
//! - The loop runs for the lifetime of the process; it has no stop signal.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::{
    channel::{Channel, Transport},
    core::{
        builder::SupervisorBuilder,
        config::Config,
        wait::{await_ok, bounded},
    },
    error::PlayerError,
    events::{Bus, Event, EventKind},
    player::{PlayerSlot, PlayerState},
    registry::{Lookup, Registry},
};

/// Last-performed timestamps of the periodic steps.
///
/// Owned by whoever drives [`Supervisor::tick`]; `None` means "never", which is always due.
#[derive(Debug, Default, Clone, Copy)]
pub struct Timing {
    pool_filled_at: Option<Instant>,
    pinged_at: Option<Instant>,
}

impl Timing {
    fn due(last: Option<Instant>, now: Instant, interval: Duration) -> bool {
        match last {
            None => true,
            Some(at) => now.saturating_duration_since(at) > interval,
        }
    }
}

/// Keeps a single player bound and healthy, hiding player churn from callers.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    registry: Arc<dyn Registry>,
    transport: Arc<dyn Transport>,
    slot: PlayerSlot,
}

impl Supervisor {
    /// Returns a builder for the supervisor.
    pub fn builder(
        cfg: Config,
        registry: Arc<dyn Registry>,
        transport: Arc<dyn Transport>,
    ) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg, registry, transport)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        registry: Arc<dyn Registry>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            cfg,
            bus,
            registry,
            transport,
            slot: PlayerSlot::new(),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Creates a raw receiver of runtime events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    // ---- Accessors ----

    /// Returns `true` iff a player is currently bound.
    pub fn has_player(&self) -> bool {
        self.slot.has_player()
    }

    /// Returns the currently bound player, if any.
    pub fn current_player(&self) -> Option<PlayerState> {
        self.slot.current()
    }

    /// Builds a channel to the currently bound player.
    ///
    /// Fails with [`PlayerError::NoPlayerAvailable`] if the slot is empty.
    pub fn current_channel(&self) -> Result<Channel, PlayerError> {
        self.slot
            .current()
            .map(|player| self.channel_for(&player))
            .ok_or(PlayerError::NoPlayerAvailable)
    }

    /// Waits (up to `find_player_timeout`) for a bound player, then runs `execute`
    /// with a channel to it.
    ///
    /// A player that gets bound while we are waiting is picked up on the next poll.
    /// The channel may point at a player that gets evicted concurrently; the send
    /// then fails and the error reaches the caller.
    pub async fn with_channel<T, F, Fut>(&self, execute: F) -> Result<T, PlayerError>
    where
        F: FnOnce(Channel) -> Fut,
        Fut: Future<Output = Result<T, PlayerError>>,
    {
        let channel = await_ok(self.cfg.find_player_timeout, self.cfg.poll, || {
            future::ready(self.current_channel())
        })
        .await?;

        execute(channel).await
    }

    /// Asks the bound player to shut down and unbinds it.
    ///
    /// The loop may clear the slot at the same moment (it will notice the player
    /// going away too). Both clears are idempotent; ending up empty is all that matters.
    pub async fn shutdown_player(&self) -> Result<(), PlayerError> {
        let port = self
            .with_channel(|channel| async move {
                channel.send_shutdown(0).await?;
                Ok::<_, PlayerError>(channel.port())
            })
            .await?;

        self.slot.clear();
        self.bus.publish(Event::new(EventKind::ShutdownSent).with_port(port));
        Ok(())
    }

    // ---- Loop ----

    /// Spawns [`run`](Self::run) on the tokio runtime.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let me = Arc::clone(self);
        tokio::spawn(async move { me.run().await })
    }

    /// Runs the supervisor loop forever, one [`tick`](Self::tick) every `cfg.tick`.
    pub async fn run(&self) {
        let mut timing = Timing::default();
        loop {
            self.tick(&mut timing, Instant::now()).await;
            time::sleep(self.cfg.tick).await;
        }
    }

    /// Performs one reconciliation pass as of `now`.
    pub async fn tick(&self, timing: &mut Timing, now: Instant) {
        self.fill_pool(timing, now).await;
        self.refresh().await;
        self.acquire().await;
        self.ping(timing, now).await;
    }

    async fn fill_pool(&self, timing: &mut Timing, now: Instant) {
        if !Timing::due(timing.pool_filled_at, now, self.cfg.pool_fill_interval) {
            return;
        }

        match bounded(self.cfg.registry_timeout, self.registry.fill_pool()).await {
            Ok(()) => self.bus.publish(Event::new(EventKind::PoolFilled)),
            Err(e) => self
                .bus
                .publish(Event::new(EventKind::PoolFillFailed).with_reason(e.as_message())),
        }
        timing.pool_filled_at = Some(now);
    }

    async fn refresh(&self) {
        let Some(player) = self.slot.current() else {
            return;
        };

        let lookup = bounded(self.cfg.registry_timeout, async {
            Ok::<_, PlayerError>(self.registry.find_by_id(&player.id).await)
        })
        .await
        .unwrap_or_else(|e| Lookup::Transient(e.as_message()));

        match lookup {
            Lookup::Found(state) if !state.is_reachable() => {
                if self.slot.refresh(state) {
                    self.bus.publish(
                        Event::new(EventKind::PlayerOffline)
                            .with_state(&player)
                            .with_reason("registry reports no port"),
                    );
                }
            }
            Lookup::Found(state) => {
                if state != player && self.slot.refresh(state.clone()) {
                    self.bus
                        .publish(Event::new(EventKind::PlayerRefreshed).with_state(&state));
                }
            }
            Lookup::NotFound => {
                self.slot.clear();
                self.bus
                    .publish(Event::new(EventKind::PlayerOffline).with_state(&player));
            }
            Lookup::Transient(err) => {
                self.bus.publish(
                    Event::new(EventKind::RefreshFailed)
                        .with_state(&player)
                        .with_reason(err),
                );
            }
        }
    }

    async fn acquire(&self) {
        if self.slot.has_player() {
            return;
        }

        let found = await_ok(self.cfg.find_player_timeout, self.cfg.poll, || async move {
            let player = self.registry.find_available().await?;
            if player.is_reachable() {
                Ok(player)
            } else {
                Err(PlayerError::NoPlayerAvailable)
            }
        })
        .await;

        match found {
            Ok(player) => {
                self.bus
                    .publish(Event::new(EventKind::PlayerFound).with_state(&player));
                self.slot.bind(player);
            }
            Err(e) => self
                .bus
                .publish(Event::new(EventKind::NoPlayerAvailable).with_reason(e.as_message())),
        }
    }

    async fn ping(&self, timing: &mut Timing, now: Instant) {
        let Some(player) = self.slot.current() else {
            return;
        };
        if !Timing::due(timing.pinged_at, now, self.cfg.ping_interval) {
            return;
        }

        let channel = self.channel_for(&player);
        match await_ok(self.cfg.ping_timeout, self.cfg.poll, || channel.send_ping()).await {
            Ok(()) => self
                .bus
                .publish(Event::new(EventKind::PingSent).with_state(&player)),
            Err(e) => {
                self.slot.clear();
                self.bus.publish(
                    Event::new(EventKind::PlayerUnreachable)
                        .with_state(&player)
                        .with_reason(e.as_message()),
                );
            }
        }
        timing.pinged_at = Some(now);
    }

    fn channel_for(&self, player: &PlayerState) -> Channel {
        Channel::new(player.port, Arc::clone(&self.transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Message;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Registry that replays scripted answers; an exhausted script means "nothing available".
    #[derive(Default)]
    struct Scripted {
        available: Mutex<VecDeque<Result<PlayerState, PlayerError>>>,
        lookups: Mutex<VecDeque<Lookup>>,
        fills: AtomicU32,
        fill_fails: bool,
        hangs: bool,
    }

    impl Scripted {
        fn offer(&self, res: Result<PlayerState, PlayerError>) {
            self.available.lock().unwrap().push_back(res);
        }
        fn answer(&self, lookup: Lookup) {
            self.lookups.lock().unwrap().push_back(lookup);
        }
    }

    #[async_trait]
    impl Registry for Scripted {
        async fn find_available(&self) -> Result<PlayerState, PlayerError> {
            self.available
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(PlayerError::NoPlayerAvailable))
        }

        async fn find_by_id(&self, id: &str) -> Lookup {
            if self.hangs {
                time::sleep(Duration::from_secs(3600)).await;
            }
            self.lookups
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Lookup::Transient(format!("no script for {id}")))
        }

        async fn fill_pool(&self) -> Result<(), PlayerError> {
            self.fills.fetch_add(1, Ordering::SeqCst);
            if self.hangs {
                time::sleep(Duration::from_secs(3600)).await;
            }
            if self.fill_fails {
                Err(PlayerError::Registry {
                    error: "pool exhausted".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Reply {
        Ok,
        Fail,
        Hang,
    }

    struct Wire {
        reply: Mutex<Reply>,
        sent: Mutex<Vec<(u16, Message)>>,
    }

    impl Wire {
        fn new(reply: Reply) -> Self {
            Self {
                reply: Mutex::new(reply),
                sent: Mutex::new(Vec::new()),
            }
        }
        fn set(&self, reply: Reply) {
            *self.reply.lock().unwrap() = reply;
        }
    }

    #[async_trait]
    impl Transport for Wire {
        async fn send(&self, port: u16, message: Message) -> Result<(), PlayerError> {
            self.sent.lock().unwrap().push((port, message));
            let reply = *self.reply.lock().unwrap();
            match reply {
                Reply::Ok => Ok(()),
                Reply::Fail => Err(PlayerError::Send {
                    error: "connection refused".into(),
                }),
                Reply::Hang => {
                    time::sleep(Duration::from_secs(3600)).await;
                    Ok(())
                }
            }
        }
    }

    fn supervisor(registry: Arc<Scripted>, wire: Arc<Wire>) -> Supervisor {
        let cfg = Config::default();
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Supervisor::new_internal(cfg, bus, registry, wire)
    }

    fn p1() -> PlayerState {
        PlayerState::new("p1", 27713)
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_acquires_and_pings() {
        let reg = Arc::new(Scripted::default());
        reg.offer(Ok(p1()));
        let wire = Arc::new(Wire::new(Reply::Ok));
        let sup = supervisor(reg.clone(), wire.clone());

        let mut timing = Timing::default();
        sup.tick(&mut timing, Instant::now()).await;

        assert_eq!(sup.current_player(), Some(p1()));
        assert_eq!(reg.fills.load(Ordering::SeqCst), 1);
        assert_eq!(*wire.sent.lock().unwrap(), vec![(27713, Message::Ping)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_steps_respect_intervals() {
        let reg = Arc::new(Scripted::default());
        reg.offer(Ok(p1()));
        let wire = Arc::new(Wire::new(Reply::Ok));
        let sup = supervisor(reg.clone(), wire.clone());

        let start = Instant::now();
        let mut timing = Timing::default();
        sup.tick(&mut timing, start).await;

        sup.tick(&mut timing, start + Duration::from_millis(500)).await;
        assert_eq!(wire.sent.lock().unwrap().len(), 1);

        sup.tick(&mut timing, start + Duration::from_millis(1_100)).await;
        assert_eq!(wire.sent.lock().unwrap().len(), 2);
        assert_eq!(reg.fills.load(Ordering::SeqCst), 1);

        sup.tick(&mut timing, start + Duration::from_secs(16)).await;
        assert_eq!(reg.fills.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pool_fill_failure_is_absorbed() {
        let reg = Arc::new(Scripted {
            fill_fails: true,
            ..Default::default()
        });
        reg.offer(Ok(p1()));
        let sup = supervisor(reg.clone(), Arc::new(Wire::new(Reply::Ok)));
        let mut rx = sup.subscribe();

        sup.tick(&mut Timing::default(), Instant::now()).await;

        assert!(sup.has_player());
        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, EventKind::PoolFillFailed);
        assert_eq!(first.reason.as_deref(), Some("registry: pool exhausted"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_pool_fill_is_cut_off() {
        let reg = Arc::new(Scripted {
            hangs: true,
            ..Default::default()
        });
        let sup = supervisor(reg.clone(), Arc::new(Wire::new(Reply::Ok)));
        let mut rx = sup.subscribe();

        let started = Instant::now();
        let mut timing = Timing::default();
        sup.fill_pool(&mut timing, started).await;

        assert_eq!(started.elapsed(), sup.config().registry_timeout);
        assert_eq!(timing.pool_filled_at, Some(started));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::PoolFillFailed);
        assert_eq!(ev.reason.as_deref(), Some("timeout: 5s"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_refresh_keeps_player() {
        let reg = Arc::new(Scripted {
            hangs: true,
            ..Default::default()
        });
        let sup = supervisor(reg.clone(), Arc::new(Wire::new(Reply::Ok)));
        sup.slot.bind(p1());
        let mut rx = sup.subscribe();

        let started = Instant::now();
        sup.refresh().await;

        assert_eq!(started.elapsed(), sup.config().registry_timeout);
        assert_eq!(sup.current_player(), Some(p1()));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::RefreshFailed);
        assert_eq!(ev.reason.as_deref(), Some("timeout: 5s"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_to_zero_port_reports_offline() {
        let reg = Arc::new(Scripted::default());
        let sup = supervisor(reg.clone(), Arc::new(Wire::new(Reply::Ok)));
        sup.slot.bind(p1());
        let mut rx = sup.subscribe();

        reg.answer(Lookup::Found(PlayerState::new("p1", 0)));
        sup.refresh().await;

        assert!(!sup.has_player());
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::PlayerOffline);
        assert_eq!(ev.port, Some(27713));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_not_found_evicts() {
        let reg = Arc::new(Scripted::default());
        let sup = supervisor(reg.clone(), Arc::new(Wire::new(Reply::Ok)));
        sup.slot.bind(p1());

        reg.answer(Lookup::from_result(Err("player not found: p1".into())));
        sup.refresh().await;

        assert!(!sup.has_player());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_transient_error_keeps_player() {
        let reg = Arc::new(Scripted::default());
        let sup = supervisor(reg.clone(), Arc::new(Wire::new(Reply::Ok)));
        sup.slot.bind(p1());

        reg.answer(Lookup::from_result(Err("connection refused".into())));
        sup.refresh().await;

        assert_eq!(sup.current_player(), Some(p1()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_found_overwrites_descriptor() {
        let reg = Arc::new(Scripted::default());
        let sup = supervisor(reg.clone(), Arc::new(Wire::new(Reply::Ok)));
        sup.slot.bind(p1());

        reg.answer(Lookup::Found(PlayerState::new("p1", 27800)));
        sup.refresh().await;

        assert_eq!(sup.current_player(), Some(PlayerState::new("p1", 27800)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_ping_evicts_in_same_tick() {
        let reg = Arc::new(Scripted::default());
        reg.offer(Ok(p1()));
        let wire = Arc::new(Wire::new(Reply::Fail));
        let sup = supervisor(reg.clone(), wire.clone());

        sup.tick(&mut Timing::default(), Instant::now()).await;

        assert!(!sup.has_player());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_ping_evicts_after_timeout() {
        let reg = Arc::new(Scripted::default());
        reg.offer(Ok(p1()));
        let wire = Arc::new(Wire::new(Reply::Hang));
        let sup = supervisor(reg.clone(), wire.clone());
        let mut rx = sup.subscribe();

        let started = Instant::now();
        sup.tick(&mut Timing::default(), started).await;

        assert!(!sup.has_player());
        assert_eq!(started.elapsed(), Duration::from_secs(5));

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(kinds.last(), Some(&EventKind::PlayerUnreachable));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reacquires_new_player_after_eviction() {
        let reg = Arc::new(Scripted::default());
        reg.offer(Ok(p1()));
        let wire = Arc::new(Wire::new(Reply::Fail));
        let sup = supervisor(reg.clone(), wire.clone());

        let start = Instant::now();
        let mut timing = Timing::default();
        sup.tick(&mut timing, start).await;
        assert!(!sup.has_player());

        wire.set(Reply::Ok);
        reg.offer(Ok(PlayerState::new("p2", 27714)));
        sup.tick(&mut timing, start + Duration::from_millis(100)).await;

        assert_eq!(sup.current_player(), Some(PlayerState::new("p2", 27714)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquisition_gives_up_after_discovery_timeout() {
        let reg = Arc::new(Scripted::default());
        let sup = supervisor(reg.clone(), Arc::new(Wire::new(Reply::Ok)));

        let started = Instant::now();
        sup.acquire().await;

        assert!(!sup.has_player());
        assert_eq!(started.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquisition_skips_unreachable_descriptors() {
        let reg = Arc::new(Scripted::default());
        reg.offer(Ok(PlayerState::new("ghost", 0)));
        reg.offer(Ok(p1()));
        let sup = supervisor(reg.clone(), Arc::new(Wire::new(Reply::Ok)));

        sup.acquire().await;

        assert_eq!(sup.current_player(), Some(p1()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_current_channel_requires_player() {
        let sup = supervisor(
            Arc::new(Scripted::default()),
            Arc::new(Wire::new(Reply::Ok)),
        );
        assert_eq!(
            sup.current_channel().unwrap_err(),
            PlayerError::NoPlayerAvailable
        );

        sup.slot.bind(p1());
        assert_eq!(sup.current_channel().unwrap().port(), 27713);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_without_player_fails_and_stays_empty() {
        let sup = supervisor(
            Arc::new(Scripted::default()),
            Arc::new(Wire::new(Reply::Ok)),
        );

        let res = sup.shutdown_player().await;

        assert_eq!(res, Err(PlayerError::NoPlayerAvailable));
        assert!(!sup.has_player());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_sends_message_and_unbinds() {
        let wire = Arc::new(Wire::new(Reply::Ok));
        let sup = supervisor(Arc::new(Scripted::default()), wire.clone());
        sup.slot.bind(p1());

        sup.shutdown_player().await.unwrap();

        assert!(!sup.has_player());
        assert_eq!(
            *wire.sent.lock().unwrap(),
            vec![(27713, Message::Shutdown { offset: 0 })]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_send_failure_propagates() {
        let wire = Arc::new(Wire::new(Reply::Fail));
        let sup = supervisor(Arc::new(Scripted::default()), wire);
        sup.slot.bind(p1());

        let res = sup.shutdown_player().await;

        assert!(matches!(res, Err(PlayerError::Send { .. })));
    }
}
