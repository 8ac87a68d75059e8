//! Payload vs. parity accounting

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul};
use tracing::info;

/// Bytes written as data (including replica copies) and as EC parity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStats {
    pub payload: u64,
    pub parity: u64,
}

impl CellStats {
    pub fn new(payload: u64, parity: u64) -> Self {
        Self { payload, parity }
    }

    pub fn total(&self) -> u64 {
        self.payload.saturating_add(self.parity)
    }

    /// `None` when either counter would overflow
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self {
            payload: self.payload.checked_add(rhs.payload)?,
            parity: self.parity.checked_add(rhs.parity)?,
        })
    }

    /// `None` when either counter would overflow
    pub fn checked_mul(self, rhs: u64) -> Option<Self> {
        Some(Self {
            payload: self.payload.checked_mul(rhs)?,
            parity: self.parity.checked_mul(rhs)?,
        })
    }

    pub fn payload_percent(&self) -> f64 {
        percent(self.payload, self.total())
    }

    pub fn parity_percent(&self) -> f64 {
        percent(self.parity, self.total())
    }

    /// Log the split at info level
    pub fn show(&self) {
        info!(
            payload = self.payload,
            parity = self.parity,
            "Cell stats: {}",
            self
        );
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

// Operators saturate at u64::MAX; the layout builder uses the checked forms.

impl Add for CellStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            payload: self.payload.saturating_add(rhs.payload),
            parity: self.parity.saturating_add(rhs.parity),
        }
    }
}

impl AddAssign for CellStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<u64> for CellStats {
    type Output = Self;

    fn mul(self, rhs: u64) -> Self {
        Self {
            payload: self.payload.saturating_mul(rhs),
            parity: self.parity.saturating_mul(rhs),
        }
    }
}

impl std::fmt::Display for CellStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "payload {} bytes ({:.2}%), parity {} bytes ({:.2}%)",
            self.payload,
            self.payload_percent(),
            self.parity,
            self.parity_percent()
        )
    }
}
