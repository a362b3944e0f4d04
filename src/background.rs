use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};

use crate::state::AppState;

/// Outbox dispatch worker. Polls pending events and hands them to the
/// notification/audit sink; the owning request has long since returned,
/// so failures only mark the row, they never affect a booking.
pub async fn start_outbox_worker(state: Arc<AppState>) {
    info!("Starting outbox dispatch worker...");

    loop {
        match state.outbox_repo.find_pending(10).await {
            Ok(events) => {
                for event in events {
                    let span = info_span!(
                        "outbox_dispatch",
                        event_id = %event.id,
                        event_type = %event.event_type,
                        tenant_id = %event.tenant_id,
                    );

                    let state = state.clone();
                    async move {
                        match state.notification_sink.dispatch(&event).await {
                            Ok(_) => {
                                info!("Event dispatched");
                                if let Err(e) = state
                                    .outbox_repo
                                    .update_status(&event.id, "dispatched", None)
                                    .await
                                {
                                    error!("Failed to mark event as dispatched: {:?}", e);
                                }
                            }
                            Err(e) => {
                                let err_msg = format!("{}", e);
                                error!("Dispatch failed: {}", err_msg);
                                if let Err(up_err) = state
                                    .outbox_repo
                                    .update_status(&event.id, "failed", Some(err_msg))
                                    .await
                                {
                                    error!("Failed to mark event as failed: {:?}", up_err);
                                }
                            }
                        }
                    }
                    .instrument(span)
                    .await;
                }
            }
            Err(e) => error!("Failed to fetch pending outbox events: {:?}", e),
        }
        sleep(Duration::from_secs(5)).await;
    }
}
