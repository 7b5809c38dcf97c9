//! Loop controller: sample, filter, diff, format, render, sleep.
//!
//! The monitor owns the only piece of cross-cycle state, the kept-pid set of
//! the previous cycle. Everything runs on one task; the inter-cycle sleep is
//! the single suspension point and the place where Ctrl-C is observed.

use crate::config::MonitorConfig;
use crate::delta;
use crate::display::{build_model, TableModel};
use crate::filter;
use crate::process::SnapshotSource;
use crate::render::RenderSink;
use ahash::AHashSet as HashSet;
use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info};

pub struct Monitor {
    config: MonitorConfig,
    previous_pids: HashSet<u32>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            previous_pids: HashSet::new(),
        }
    }

    /// One full cycle minus the render: filter the snapshot, diff against the
    /// previous kept set, build the display model, and persist the current
    /// set as the new previous.
    pub fn cycle(&mut self, snapshot: Vec<crate::process::ProcessRecord>) -> TableModel {
        let kept: Vec<_> = snapshot
            .iter()
            .filter_map(|rec| filter::evaluate(rec, &self.config))
            .collect();

        let current_pids: HashSet<u32> = kept.iter().map(|k| k.record.pid).collect();
        let delta = delta::diff(&current_pids, &self.previous_pids);
        debug!(
            "cycle: kept={} arrivals={} departures={}",
            kept.len(),
            delta.arrivals.len(),
            delta.departures.len()
        );

        let model = build_model(&kept, &delta);
        self.previous_pids = current_pids;
        model
    }

    /// Runs the monitor until interrupted. On Ctrl-C the sink is cleared and
    /// the loop returns cleanly.
    pub async fn run<S, R>(&mut self, source: &mut S, sink: &mut R) -> Result<()>
    where
        S: SnapshotSource,
        R: RenderSink,
    {
        let interval = Duration::from_secs_f64(self.config.interval_secs);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            let snapshot = source.sample();
            let model = self.cycle(snapshot);
            sink.draw(&model)?;

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Interrupt received, shutting down");
                    sink.clear()?;
                    return Ok(());
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}
