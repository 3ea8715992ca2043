//! Periodic aging sweeps.

use super::ActivityProbe;
use crate::bridge::FdbRegistry;
use crate::{debug_log, info_log};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Timer-driven aging sweeper for all registered bridges.
///
/// The sweep itself is synchronous and bounded by table size; the runner
/// just schedules it. Deploy with a period no longer than half the smallest
/// configured age time for timely expiry.
pub struct AgingEngine {
    registry: FdbRegistry,
    probe: Arc<dyn ActivityProbe>,
}

impl AgingEngine {
    /// Creates an engine over the given registry and activity probe.
    pub fn new(registry: FdbRegistry, probe: Arc<dyn ActivityProbe>) -> Self {
        Self { registry, probe }
    }

    /// Runs one sweep over every registered bridge.
    ///
    /// Returns the total number of expired entries.
    pub fn sweep_all(&self) -> usize {
        let expired = self.registry.sweep_all(self.probe.as_ref(), Utc::now());
        if expired > 0 {
            info_log!("AgingEngine", expired, "aging sweep expired entries");
        } else {
            debug_log!("AgingEngine", "aging sweep expired nothing");
        }
        expired
    }

    /// Sweeps every `period` until cancelled.
    pub async fn run(self, period: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        info_log!("AgingEngine", period_secs = period.as_secs(), "aging engine started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_all();
                }
                _ = cancel.cancelled() => {
                    info_log!("AgingEngine", "aging engine stopped");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeConfig;
    use crate::learn::LearnEvent;
    use crate::uc::FdbKey;
    use chrono::Duration as ChronoDuration;
    use pretty_assertions::assert_eq;
    use switch_types::{BridgeId, LogicalPort, MacAddress, VlanId};

    struct IdleProbe;

    impl ActivityProbe for IdleProbe {
        fn is_active(&self, _bridge: BridgeId, _key: &FdbKey) -> bool {
            false
        }
    }

    fn stale_event(bridge: BridgeId, last: u8) -> LearnEvent {
        LearnEvent {
            bridge,
            vlan: VlanId::new(10).unwrap(),
            mac: MacAddress::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, last]),
            port: LogicalPort::new(3),
            seen_at: Utc::now() - ChronoDuration::seconds(3600),
        }
    }

    #[test]
    fn test_sweep_all_covers_every_bridge() {
        let registry = FdbRegistry::new();
        let b1 = BridgeId::new(1);
        let b2 = BridgeId::new(2);
        let config = BridgeConfig {
            age_time: 30,
            ..BridgeConfig::default()
        };
        registry.create_bridge(b1, config.clone(), None).unwrap();
        registry.create_bridge(b2, config, None).unwrap();

        registry.learn_event(&stale_event(b1, 0x01)).unwrap();
        registry.learn_event(&stale_event(b2, 0x02)).unwrap();

        let engine = AgingEngine::new(registry.clone(), Arc::new(IdleProbe));
        assert_eq!(engine.sweep_all(), 2);
        assert_eq!(registry.count_uc_entries(b1, None).unwrap(), 0);
        assert_eq!(registry.count_uc_entries(b2, None).unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sweeps_periodically_until_cancelled() {
        let registry = FdbRegistry::new();
        let b1 = BridgeId::new(1);
        registry
            .create_bridge(
                b1,
                BridgeConfig {
                    age_time: 30,
                    ..BridgeConfig::default()
                },
                None,
            )
            .unwrap();
        registry.learn_event(&stale_event(b1, 0x01)).unwrap();

        let cancel = CancellationToken::new();
        let engine = AgingEngine::new(registry.clone(), Arc::new(IdleProbe));
        let task = tokio::spawn(engine.run(Duration::from_secs(15), cancel.clone()));

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(registry.count_uc_entries(b1, None).unwrap(), 0);

        cancel.cancel();
        task.await.unwrap();
    }
}
