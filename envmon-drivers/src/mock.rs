//! Test doubles for the bus and timing traits

use embedded_hal::delay::DelayNs;
use envmon_hal::{BusFault, I2cBus};
use heapless::Vec;

/// One recorded bus write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub address: u8,
    pub data: Vec<u8, 4>,
}

/// Scriptable I2C bus that records every successful write
pub struct MockBus {
    pub writes: Vec<Write, 512>,
    /// Bytes returned by reads
    pub response: [u8; 7],
    /// Number of bytes a read reports
    pub read_len: usize,
    pub reads: usize,
    /// Fail this many upcoming writes with a NACK
    pub fail_writes: usize,
    /// Report this many upcoming writes as zero bytes written
    pub short_writes: usize,
    pub fail_reads: bool,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            response: [0; 7],
            read_len: 7,
            reads: 0,
            fail_writes: 0,
            short_writes: 0,
            fail_reads: false,
        }
    }

    /// Data bytes of all single-byte writes, in order
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.writes.iter().flat_map(|w| w.data.iter().copied())
    }
}

impl I2cBus for MockBus {
    type Error = BusFault;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(BusFault::Nack);
        }
        if self.short_writes > 0 {
            self.short_writes -= 1;
            return Ok(0);
        }
        let mut recorded = Vec::new();
        recorded.extend_from_slice(data).unwrap();
        self.writes.push(Write { address, data: recorded }).unwrap();
        Ok(data.len())
    }

    fn read(&mut self, _address: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_reads {
            return Err(BusFault::Nack);
        }
        self.reads += 1;
        let n = self.read_len.min(buf.len());
        buf[..n].copy_from_slice(&self.response[..n]);
        Ok(n)
    }
}

/// Delay that only records the requested durations
#[derive(Default)]
pub struct MockDelay {
    pub calls: Vec<u32, 512>,
    pub total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        let _ = self.calls.push(ns);
        self.total_ns += ns as u64;
    }
}
