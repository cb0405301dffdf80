use crate::{models::DiagnosticsResponse, AppState};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use std::sync::{Mutex, OnceLock};
use sysinfo::System;
use tracing::info;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Report hub sizes and process resource usage
pub async fn diagnostics(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<DiagnosticsResponse>) {
    let stats = state.hub.stats().await;

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| Mutex::new(System::new_all()));
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0),
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Conn: {}, Rooms: {}, Sessions: {} live / {} archived",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        stats.connections,
        stats.rooms,
        stats.live_sessions,
        stats.archived_sessions
    );

    (
        StatusCode::OK,
        Json(DiagnosticsResponse {
            service_name: state.config.service_name.clone(),
            n_conn: gauge(stats.connections),
            n_rooms: gauge(stats.rooms),
            n_live_sessions: gauge(stats.live_sessions),
            n_archived_sessions: stats.archived_sessions,
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    )
}

fn gauge(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
