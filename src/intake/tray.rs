use serde::{Deserialize, Serialize};

pub const DEFAULT_TRAY_CAPACITY: usize = 50;
pub const DEFAULT_TRAY_PREFIX: &str = "TRAY";

/// Positional tray packing for one scan session.
///
/// Device `n` (0-indexed) always lands in tray `start + n / capacity`, so the
/// assignment is a pure function of list position and never leaves gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayAllocator {
    prefix: String,
    capacity: usize,
    start: u32,
}

impl TrayAllocator {
    pub fn new(prefix: impl Into<String>, capacity: usize, start: u32) -> Self {
        Self {
            prefix: prefix.into(),
            capacity: capacity.max(1),
            start,
        }
    }

    /// Start tray for a session given the highest tray number already persisted.
    ///
    /// `None` once the persisted maximum is the last representable number.
    pub fn starting_after(
        prefix: impl Into<String>,
        capacity: usize,
        persisted_max: Option<u32>,
    ) -> Option<Self> {
        let start = match persisted_max {
            Some(max) => max.checked_add(1)?,
            None => 1,
        };
        Some(Self::new(prefix, capacity, start))
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Tray for the device at `index`, or `None` past the last tray number.
    pub fn tray_number(&self, index: usize) -> Option<u32> {
        u32::try_from(index / self.capacity)
            .ok()
            .and_then(|offset| self.start.checked_add(offset))
    }

    pub fn tray_code(&self, index: usize) -> Option<String> {
        self.tray_number(index)
            .map(|number| format_tray_code(&self.prefix, number))
    }

    pub fn start_code(&self) -> String {
        format_tray_code(&self.prefix, self.start)
    }

    /// Number of trays needed for `count` devices.
    pub fn trays_needed(&self, count: usize) -> usize {
        count.div_ceil(self.capacity)
    }
}

impl Default for TrayAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_TRAY_PREFIX, DEFAULT_TRAY_CAPACITY, 1)
    }
}

/// `TRAY` + number zero-padded to three digits.
pub fn format_tray_code(prefix: &str, number: u32) -> String {
    format!("{}{:03}", prefix, number)
}

/// Inverse of [`format_tray_code`]; `None` for codes outside the tray scheme.
pub fn parse_tray_number(prefix: &str, code: &str) -> Option<u32> {
    let digits = code.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
