//! Human readable sizes

use byte_unit::{Byte, UnitType};

/// Format a byte count with binary units (e.g. `1.5 KiB`)
#[must_use]
pub fn format_size(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}
