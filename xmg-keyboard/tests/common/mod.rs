//! Scripted firmware backend for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use xmg_transport::{AcpiObject, AcpiStatus, DsmEnvelope, Firmware, FirmwareInfo};

pub type FirmwareResult = Result<Option<AcpiObject>, AcpiStatus>;

/// Records every envelope and answers from a queue (empty queue: no object)
#[derive(Default)]
pub struct MockFirmware {
    calls: Mutex<Vec<DsmEnvelope>>,
    responses: Mutex<VecDeque<FirmwareResult>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Option<Duration>,
}

impl MockFirmware {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mock that holds each call for `delay`, to expose overlapping calls
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn push_response(&self, response: FirmwareResult) {
        self.responses.lock().push_back(response);
    }

    pub fn fail_next(&self, status: AcpiStatus) {
        self.push_response(Err(status));
    }

    pub fn calls(&self) -> Vec<DsmEnvelope> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// (function id, first payload word) of every call
    pub fn words(&self) -> Vec<(u32, u32)> {
        self.calls
            .lock()
            .iter()
            .map(|env| {
                let p = env.payload();
                (env.function_id(), u32::from_le_bytes([p[0], p[1], p[2], p[3]]))
            })
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Firmware for MockFirmware {
    fn evaluate(&self, envelope: &DsmEnvelope) -> FirmwareResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        self.calls.lock().push(envelope.clone());
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        let result = self.responses.lock().pop_front().unwrap_or(Ok(None));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn info(&self) -> FirmwareInfo {
        FirmwareInfo::new("mock")
    }
}

/// 22-byte fan record with the given tachometer samples
pub fn fan_record(cpu: u16, gpu: u16, gpu2: u16) -> Vec<u8> {
    let mut data = vec![0u8; 22];
    data[2..4].copy_from_slice(&cpu.to_be_bytes());
    data[4..6].copy_from_slice(&gpu.to_be_bytes());
    data[6..8].copy_from_slice(&gpu2.to_be_bytes());
    data[16..22].copy_from_slice(&[35, 51, 20, 60, 10, 45]);
    data
}
