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

//! Prometheus metrics exporter for personal weather stations
//!
//! ## Features
//!
//! `weatherstation_exporter` accepts the updates that many consumer weather stations (Ambient Weather,
//! Ecowitt, Sainlogic and friends) push to Weather Underground and exposes the readings as Prometheus
//! metrics. Stations send readings as query string parameters of a `GET` to a path ending with
//! `/updateweatherstation.php`. The following metrics are emitted, one for each reading the station
//! may send. Metrics that the station hasn't sent yet are reported as `0`.
//!
//! * `weather_indoortempf` - Indoor temperature, in degrees fahrenheit.
//! * `weather_indoorhumidity` - Indoor relative humidity (0-100).
//! * `weather_tempf` - Outdoor temperature, in degrees fahrenheit.
//! * `weather_humidity` - Outdoor relative humidity (0-100).
//! * `weather_dewptf` - Dewpoint, in degrees fahrenheit.
//! * `weather_windchillf` - Temperature with wind chill, in degrees fahrenheit.
//! * `weather_absbaromin` - Absolute barometric pressure, in inches of mercury.
//! * `weather_baromin` - Relative barometric pressure, in inches of mercury.
//! * `weather_windspeedmph` - Wind speed, in miles per hour.
//! * `weather_windgustmph` - Wind gust, in miles per hour.
//! * `weather_winddir` - Wind direction, in degrees.
//! * `weather_windspdmph_avg2m` - Two minute average wind speed, in miles per hour.
//! * `weather_winddir_avg2m` - Two minute average wind direction, in degrees.
//! * `weather_windgustmph_10m` - Ten minute wind gust, in miles per hour.
//! * `weather_windgustdir_10m` - Ten minute wind gust direction, in degrees.
//! * `weather_rainin` - Rain over the last hour, in inches.
//! * `weather_dailyrainin` - Rain so far today, in inches.
//! * `weather_weeklyrainin` - Rain so far this week, in inches.
//! * `weather_monthlyrainin` - Rain so far this month, in inches.
//! * `weather_solarradiation` - Solar radiation, in watts per square meter.
//! * `weather_uv` - UV index.
//!
//! ## Build
//!
//! `weatherstation_exporter` is a Rust program and must be built from source using a
//! [Rust toolchain](https://rustup.rs/).
//!
//! ```text
//! cargo build --release
//! ```
//!
//! ## Usage
//!
//! ### Run
//!
//! By default, `weatherstation_exporter` listens on port `8080` on all interfaces. Use `--port` to
//! pick a different one.
//!
//! ```text
//! ./weatherstation_exporter --port 8080
//! ```
//!
//! ### Weather station
//!
//! Configure the "customized" upload server of your station (usually through the vendor app) to point
//! at the host running `weatherstation_exporter`, using the Weather Underground protocol and a path of
//! `/weatherstation/updateweatherstation.php`. Station ID and key are required by most apps but are
//! ignored. You can simulate an update using `curl`.
//!
//! ```text
//! curl -sS 'http://localhost:8080/weatherstation/updateweatherstation.php?tempf=72.5&humidity=40'
//! ```
//!
//! ### Prometheus
//!
//! Prometheus metrics are exposed on port `8080` at `/metrics`. Once `weatherstation_exporter`
//! is running, configure scrapes of it by your Prometheus server. Add the host running
//! `weatherstation_exporter` as a target under the Prometheus `scrape_configs` section as
//! described by the example below.
//!
//! ```yaml
//! # Sample config for Prometheus.
//!
//! global:
//!   scrape_interval:     15s
//!   evaluation_interval: 15s
//!   external_labels:
//!     monitor: 'my_prom'
//!
//! scrape_configs:
//! - job_name: weatherstation_exporter
//!   static_configs:
//!   - targets: ['example:8080']
//! ```
//!

pub mod http;
pub mod metrics;
pub mod query;
