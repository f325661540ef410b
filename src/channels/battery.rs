// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Battery level derived from pack voltage.

/// Number of cells in a device battery pack.
pub const CELL_COUNT: f64 = 4.0;

/// Nominal voltage of a fresh cell.
pub const CELL_VOLTAGE: f64 = 1.5;

/// Voltage of a full pack.
pub const FULL_VOLTAGE: f64 = CELL_COUNT * CELL_VOLTAGE;

/// Fraction of [`FULL_VOLTAGE`] below which the battery is reported low.
pub const LOW_FRACTION: f64 = 0.6;

/// Returns the charge level in percent, capped at 100.
///
/// # Examples
///
/// ```
/// use cloudstate_lib::channels::battery_level;
///
/// assert_eq!(battery_level(6.0), 100.0);
/// assert_eq!(battery_level(3.0), 50.0);
/// assert_eq!(battery_level(6.4), 100.0);
/// ```
#[must_use]
pub fn battery_level(voltage: f64) -> f64 {
    (voltage / FULL_VOLTAGE * 100.0).min(100.0)
}

/// Returns `true` when the pack voltage is below the low threshold.
#[must_use]
pub fn is_low_battery(voltage: f64) -> bool {
    voltage < FULL_VOLTAGE * LOW_FRACTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_at_reference_voltages() {
        assert!((battery_level(6.0) - 100.0).abs() < f64::EPSILON);
        assert!((battery_level(3.0) - 50.0).abs() < f64::EPSILON);
        assert!((battery_level(4.5) - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn level_is_monotone_and_capped() {
        let mut previous = battery_level(0.0);
        for step in 1..=80 {
            let level = battery_level(f64::from(step) * 0.1);
            assert!(level >= previous);
            assert!(level <= 100.0);
            previous = level;
        }
    }

    #[test]
    fn low_threshold() {
        assert!(is_low_battery(3.5));
        assert!(!is_low_battery(3.6));
        assert!(!is_low_battery(5.2));
    }
}
