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

use clap::Parser;
use std::error::Error;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::process;
use std::sync::Arc;
use tokio::signal::unix::{self, SignalKind};
use tracing::Level;
use weatherstation_exporter::http::{RequestContext, METRICS_PATH, UPDATE_SUFFIX};
use weatherstation_exporter::metrics::StationMetrics;

const DEFAULT_LOG_LEVEL: Level = Level::INFO;
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Parser)]
#[clap(name = "weatherstation_exporter", version = clap::crate_version!())]
struct WeatherStationExporterApplication {
    /// Port to listen on for station updates and Prometheus scrapes. The exporter binds
    /// to all interfaces since both the station and Prometheus connect from other hosts.
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[clap(long, default_value_t = DEFAULT_LOG_LEVEL)]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let opts = WeatherStationExporterApplication::parse();
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(opts.log_level)
            .finish(),
    )
    .expect("failed to set tracing subscriber");

    let context = Arc::new(RequestContext::new(StationMetrics::new()));
    let handler = weatherstation_exporter::http::app(context);
    let bind = SocketAddr::from((Ipv4Addr::UNSPECIFIED, opts.port));

    let server = axum::Server::try_bind(&bind)
        .unwrap_or_else(|e| {
            tracing::error!(message = "error binding to address", address = %bind, error = %e);
            process::exit(1)
        })
        .serve(handler.into_make_service());

    tracing::info!(
        message = "server started",
        address = %server.local_addr(),
        updates = %format!("*{}", UPDATE_SUFFIX),
        scrapes = METRICS_PATH,
    );

    server
        .with_graceful_shutdown(async {
            // Wait for either SIGTERM or SIGINT to shutdown
            tokio::select! {
                _ = sigterm() => {}
                _ = sigint() => {}
            }
        })
        .await?;

    tracing::info!("server shutdown");
    Ok(())
}

/// Return after the first SIGTERM signal received by this process
async fn sigterm() -> io::Result<()> {
    unix::signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

/// Return after the first SIGINT signal received by this process
async fn sigint() -> io::Result<()> {
    unix::signal(SignalKind::interrupt())?.recv().await;
    Ok(())
}
