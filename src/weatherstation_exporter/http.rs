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

use crate::metrics::{StationMetrics, OPENMETRICS_CONTENT_TYPE};
use crate::query::QueryParams;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const METRICS_PATH: &str = "/metrics";
pub const UPDATE_SUFFIX: &str = "/updateweatherstation.php";

/// State shared by all HTTP handlers.
#[derive(Debug)]
pub struct RequestContext {
    metrics: StationMetrics,
}

impl RequestContext {
    pub fn new(metrics: StationMetrics) -> Self {
        RequestContext { metrics }
    }

    pub fn metrics(&self) -> &StationMetrics {
        &self.metrics
    }
}

/// Build the router for station updates and Prometheus scrapes.
///
/// * `GET /metrics` renders all metrics.
/// * `GET` or `POST` to any other path is a station update. Updates are only applied
///   when the path ends with `/updateweatherstation.php`, otherwise the response is a 404.
/// * Anything else is rejected with a 405.
pub fn app(context: Arc<RequestContext>) -> Router {
    Router::new()
        .route(METRICS_PATH, get(text_metrics).post(station_update))
        .fallback(any_path)
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

async fn text_metrics(State(context): State<Arc<RequestContext>>) -> Response {
    match context.metrics.render() {
        Ok(buf) => {
            tracing::debug!(
                message = "encoded prometheus metrics to text format",
                num_bytes = buf.len(),
            );

            ([(CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], buf).into_response()
        }
        Err(e) => {
            tracing::error!(message = "error encoding metrics", error = %e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

async fn any_path(State(context): State<Arc<RequestContext>>, method: Method, uri: Uri) -> StatusCode {
    if method == Method::GET || method == Method::POST {
        station_update(State(context), uri).await
    } else {
        StatusCode::METHOD_NOT_ALLOWED
    }
}

/// Apply the readings in the query string of a station update.
///
/// The station only cares that it gets a 200 back so any update to the right path
/// succeeds, even when none of the readings could be used.
async fn station_update(State(context): State<Arc<RequestContext>>, uri: Uri) -> StatusCode {
    if !uri.path().ends_with(UPDATE_SUFFIX) {
        return StatusCode::NOT_FOUND;
    }

    let params = QueryParams::parse(uri.query().unwrap_or_default());
    let observed = context.metrics.observe(&params);
    tracing::debug!(
        message = "applied station update",
        num_params = params.len(),
        updated = observed.updated,
        skipped = observed.skipped,
    );

    StatusCode::OK
}
