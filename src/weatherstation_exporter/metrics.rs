// weatherstation_exporter - Prometheus metrics exporter for weather stations
//
// Copyright 2022 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use crate::query::{parse_reading, QueryParams};
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::error;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

const NAMESPACE: &str = "weather";

/// Content type of the text produced by `StationMetrics::render()`.
pub const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Query parameters sent by the weather station that are exported as gauges.
pub const PARAMETERS: &[&str] = &[
    "indoortempf",
    "indoorhumidity",
    "tempf",
    "humidity",
    "dewptf",
    "windchillf",
    "absbaromin",
    "baromin",
    "windspeedmph",
    "windgustmph",
    "winddir",
    "windspdmph_avg2m",
    "winddir_avg2m",
    "windgustmph_10m",
    "windgustdir_10m",
    "rainin",
    "dailyrainin",
    "weeklyrainin",
    "monthlyrainin",
    "solarradiation",
    "UV",
];

#[derive(Debug)]
pub enum MetricsError {
    UnknownParameter(String),
    Encoding(fmt::Error),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParameter(p) => write!(f, "unknown parameter {}", p),
            Self::Encoding(e) => write!(f, "unable to encode metrics: {}", e),
        }
    }
}

impl error::Error for MetricsError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Encoding(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of applying a single station update.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Observed {
    /// Parameters present in the update that were set.
    pub updated: usize,
    /// Parameters present in the update that could not be parsed.
    pub skipped: usize,
}

#[derive(Debug)]
struct StationGauge {
    parameter: &'static str,
    gauge: Gauge<f64, AtomicU64>,
    updated: AtomicBool,
}

impl StationGauge {
    fn set(&self, value: f64) {
        self.gauge.set(value);
        self.updated.store(true, Ordering::Release);
    }
}

/// Holder for gauges that can be set from station updates.
///
/// All metrics are created and registered upon call to `StationMetrics::new()`, one
/// for each of `PARAMETERS`. Metrics all share the prefix "weather_" followed by the
/// parameter name made safe for Prometheus (e.g. `UV` becomes `weather_uv`). The set of
/// metrics never changes after creation.
#[derive(Debug)]
pub struct StationMetrics {
    registry: Registry,
    gauges: Vec<StationGauge>,
}

impl StationMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix(NAMESPACE);
        let gauges = PARAMETERS
            .iter()
            .map(|&parameter| {
                let gauge = Gauge::<f64, AtomicU64>::default();
                registry.register(
                    metric_name(parameter),
                    format!("Weather station metric {}", parameter),
                    gauge.clone(),
                );

                StationGauge {
                    parameter,
                    gauge,
                    updated: AtomicBool::new(false),
                }
            })
            .collect();

        Self { registry, gauges }
    }

    /// Names of all exported parameters, in the order they are applied.
    pub fn parameters(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.gauges.iter().map(|g| g.parameter)
    }

    /// Current value of a parameter or `None` if it has never been set or isn't known.
    pub fn get(&self, parameter: &str) -> Option<f64> {
        self.find(parameter)
            .filter(|g| g.updated.load(Ordering::Acquire))
            .map(|g| g.gauge.get())
    }

    /// Overwrite the current value of a parameter.
    pub fn set(&self, parameter: &str, value: f64) -> Result<(), MetricsError> {
        let g = self
            .find(parameter)
            .ok_or_else(|| MetricsError::UnknownParameter(parameter.to_owned()))?;

        g.set(value);
        Ok(())
    }

    /// Set metrics from the provided update for each known parameter with a numeric value.
    ///
    /// Only the first value of a repeated parameter is used. Parameters that don't parse
    /// as numbers are skipped and leave the metric at its previous value, unknown
    /// parameters are ignored.
    pub fn observe(&self, params: &QueryParams) -> Observed {
        let mut observed = Observed::default();

        for g in self.gauges.iter() {
            let raw = match params.first(g.parameter) {
                Some(v) => v,
                None => continue,
            };

            match parse_reading(raw) {
                Ok(v) => {
                    g.set(v);
                    observed.updated += 1;
                }
                Err(e) => {
                    tracing::debug!(
                        message = "skipping non-numeric value",
                        parameter = g.parameter,
                        value = raw,
                        error = %e,
                    );
                    observed.skipped += 1;
                }
            }
        }

        observed
    }

    /// Encode all metrics in the OpenMetrics text format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buf = String::new();
        encode(&mut buf, &self.registry).map_err(MetricsError::Encoding)?;
        Ok(buf)
    }

    fn find(&self, parameter: &str) -> Option<&StationGauge> {
        self.gauges.iter().find(|g| g.parameter == parameter)
    }
}

impl Default for StationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metric name for a parameter without the "weather_" namespace.
///
/// Parameters are lower-cased and anything outside of `[a-z0-9_]` becomes `_`.
pub fn metric_name(parameter: &str) -> String {
    parameter
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{metric_name, MetricsError, Observed, StationMetrics, PARAMETERS};
    use crate::query::QueryParams;

    #[test]
    fn test_metric_name() {
        assert_eq!("tempf", metric_name("tempf"));
        assert_eq!("uv", metric_name("UV"));
        assert_eq!("windgustmph_10m", metric_name("windgustmph_10m"));
        assert_eq!("rain_in_", metric_name("rain-in!"));
    }

    #[test]
    fn test_get_never_set() {
        let metrics = StationMetrics::new();

        assert_eq!(None, metrics.get("tempf"));
        assert_eq!(None, metrics.get("notaparameter"));
    }

    #[test]
    fn test_set_overwrites() {
        let metrics = StationMetrics::new();
        metrics.set("tempf", 50.0).unwrap();
        metrics.set("tempf", 48.2).unwrap();

        assert_eq!(Some(48.2), metrics.get("tempf"));
    }

    #[test]
    fn test_set_unknown_parameter() {
        let metrics = StationMetrics::new();
        let res = metrics.set("foo", 1.0);

        assert!(matches!(res, Err(MetricsError::UnknownParameter(p)) if p == "foo"));
        assert!(!metrics.render().unwrap().contains("weather_foo"));
    }

    #[test]
    fn test_parameters_in_declaration_order() {
        let metrics = StationMetrics::new();
        let params: Vec<&str> = metrics.parameters().collect();

        assert_eq!(PARAMETERS, params.as_slice());
    }

    #[test]
    fn test_observe() {
        let metrics = StationMetrics::new();
        let params = QueryParams::parse("tempf=72.5&humidity=abc&foo=1&UV=3&tempf=10");
        let observed = metrics.observe(&params);

        assert_eq!(Observed { updated: 2, skipped: 1 }, observed);
        assert_eq!(Some(72.5), metrics.get("tempf"));
        assert_eq!(Some(3.0), metrics.get("UV"));
        assert_eq!(None, metrics.get("humidity"));
    }

    #[test]
    fn test_observe_invalid_keeps_previous() {
        let metrics = StationMetrics::new();
        metrics.observe(&QueryParams::parse("humidity=41"));
        metrics.observe(&QueryParams::parse("humidity=n/a"));

        assert_eq!(Some(41.0), metrics.get("humidity"));
    }

    #[test]
    fn test_observe_is_idempotent() {
        let metrics = StationMetrics::new();
        let params = QueryParams::parse("baromin=29.92&winddir=270");
        metrics.observe(&params);
        let first = metrics.render().unwrap();
        metrics.observe(&params);

        assert_eq!(first, metrics.render().unwrap());
    }

    #[test]
    fn test_render_lists_every_parameter() {
        let metrics = StationMetrics::new();
        let out = metrics.render().unwrap();

        for p in PARAMETERS {
            let name = format!("weather_{}", metric_name(p));
            assert!(out.contains(&format!("# TYPE {} gauge\n", name)), "missing {}", name);
            assert!(out.contains(&format!("{} 0.0\n", name)), "missing default for {}", name);
        }
    }

    #[test]
    fn test_render_does_not_mutate() {
        let metrics = StationMetrics::new();
        metrics.set("dailyrainin", 0.12).unwrap();

        let first = metrics.render().unwrap();
        let second = metrics.render().unwrap();

        assert_eq!(first, second);
        assert!(first.contains("weather_dailyrainin 0.12\n"));
        assert_eq!(Some(0.12), metrics.get("dailyrainin"));
    }
}
