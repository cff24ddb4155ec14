#![allow(dead_code)]

use ctxlog_core::probe::ExecutionUnitProbe;
use ctxlog_core::sink::MemorySink;
use ctxlog_core::{Level, Logger};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Execution-unit probe that counts how often it is consulted
#[derive(Default)]
pub struct CountingProbe {
    calls: AtomicUsize,
}

impl CountingProbe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExecutionUnitProbe for CountingProbe {
    fn current_id(&self) -> u64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        41
    }
}

/// A logger writing to memory, with a counting probe
pub fn memory_logger(min_level: Level) -> (Logger, Arc<MemorySink>, Arc<CountingProbe>) {
    let sink = Arc::new(MemorySink::new());
    let probe = Arc::new(CountingProbe::default());
    let logger = Logger::new(min_level, sink.clone()).with_execution_unit_probe(probe.clone());
    (logger, sink, probe)
}
