/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use prometheus::{register_int_counter, register_int_gauge, IntCounter, IntGauge};

pub static CONNECTED_CLIENTS: once_cell::sync::Lazy<IntGauge> = once_cell::sync::Lazy::new(|| {
    register_int_gauge!("connected_clients", "Connected Clients")
        .expect("Failed to register connected clients metrics")
});

pub static DISPATCHED_NOTIFICATIONS: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("dispatched_notifications", "Dispatched Notifications")
            .expect("Failed to register dispatched notifications metrics")
    });

pub static SUPPRESSED_NOTIFICATIONS: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!(
            "suppressed_notifications",
            "Notifications Suppressed By Cooldown"
        )
        .expect("Failed to register suppressed notifications metrics")
    });

pub static DROPPED_BROADCASTS: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("dropped_broadcasts", "Broadcasts Dropped On Full Channels")
            .expect("Failed to register dropped broadcasts metrics")
    });

/// Prometheus middleware exposing `/metrics`, with the realtime and
/// notification collectors registered on top of the request metrics.
pub fn prometheus_metrics() -> PrometheusMetrics {
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus Metrics");

    prometheus
        .registry
        .register(Box::new(CONNECTED_CLIENTS.to_owned()))
        .expect("Failed to register connected clients metrics");

    prometheus
        .registry
        .register(Box::new(DISPATCHED_NOTIFICATIONS.to_owned()))
        .expect("Failed to register dispatched notifications metrics");

    prometheus
        .registry
        .register(Box::new(SUPPRESSED_NOTIFICATIONS.to_owned()))
        .expect("Failed to register suppressed notifications metrics");

    prometheus
        .registry
        .register(Box::new(DROPPED_BROADCASTS.to_owned()))
        .expect("Failed to register dropped broadcasts metrics");

    prometheus
}
