// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-text flight dynamics parser.
//!
//! Spreadsheet cells describe dynamics as labeled lines such as
//! `最大速度：670 m/s`. Recognized labels become [`DynamicsParameters`]
//! fields; anything else is ignored.

use std::f64::consts::PI;
use std::sync::LazyLock;

use lavic_core::DynamicsParameters;
use regex::Regex;

/// Builds a pattern matching `<label>：<number>` or `<label>:<number>`.
fn labeled(labels: &str) -> Regex {
    // Labels are fixed literals, so compilation cannot fail.
    Regex::new(&format!(r"(?:{labels})[：:]\s*(\d+(?:\.\d+)?)")).expect("valid dynamics pattern")
}

static V_MAX: LazyLock<Regex> = LazyLock::new(|| labeled("最大速度"));
static V_MIN: LazyLock<Regex> = LazyLock::new(|| labeled("最小速度"));
static A_MAX: LazyLock<Regex> = LazyLock::new(|| labeled("最大加速度"));
static LANDING_DISTANCE: LazyLock<Regex> = LazyLock::new(|| labeled("着舰距离|着陆距离"));
static OMEGA_MAX: LazyLock<Regex> = LazyLock::new(|| labeled("最大角速度"));

fn capture(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Converts deg/s to rad/s, rounded to two decimals.
fn deg_to_rad_2dp(deg: f64) -> f64 {
    (deg * PI / 180.0 * 100.0).round() / 100.0
}

/// Extracts the recognized dynamics fields from `text`.
pub fn parse_dynamics(text: &str) -> DynamicsParameters {
    DynamicsParameters {
        v_max: capture(&V_MAX, text),
        v_min: capture(&V_MIN, text),
        a_max: capture(&A_MAX, text),
        landing_distance: capture(&LANDING_DISTANCE, text),
        omega_max: capture(&OMEGA_MAX, text).map(deg_to_rad_2dp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "最大速度：670 m/s\n最小速度：70 m/s\n最大加速度：25 m/s²\n着舰距离：1500 m\n最大角速度：35 deg/s";

    #[test]
    fn parses_all_five_fields() {
        let params = parse_dynamics(FULL);
        assert_eq!(params.v_max, Some(670.0));
        assert_eq!(params.v_min, Some(70.0));
        assert_eq!(params.a_max, Some(25.0));
        assert_eq!(params.landing_distance, Some(1500.0));
        assert_eq!(params.omega_max, Some(0.61));
    }

    #[test]
    fn subset_yields_exactly_that_subset() {
        let params = parse_dynamics("最大速度: 580.5 m/s\n最大角速度:35 deg/s");
        assert_eq!(params.entries(), vec![("V_max", 580.5), ("omega_max", 0.61)]);
        assert_eq!(params.landing_distance, None);
    }

    #[test]
    fn angular_rate_converts_to_radians() {
        let params = parse_dynamics("最大角速度：35");
        let omega = params.omega_max.unwrap();
        assert!((omega - 0.61).abs() < 1e-9, "got {omega}");

        let params = parse_dynamics("最大角速度：90 deg/s");
        assert_eq!(params.omega_max, Some(1.57));
    }

    #[test]
    fn landing_distance_accepts_both_labels() {
        assert_eq!(parse_dynamics("着陆距离：800 m").landing_distance, Some(800.0));
        assert_eq!(parse_dynamics("着舰距离：120 m").landing_distance, Some(120.0));
    }

    #[test]
    fn max_speed_does_not_capture_max_acceleration() {
        let params = parse_dynamics("最大加速度：25 m/s²");
        assert_eq!(params.a_max, Some(25.0));
        assert_eq!(params.v_max, None);
    }

    #[test]
    fn malformed_and_unknown_fields_are_ignored() {
        let params = parse_dynamics("最大速度：很快\n巡航高度：12000 m\n");
        assert!(params.is_empty());
        assert!(parse_dynamics("").is_empty());
    }
}
