use crate::influx::PointSink;
use crate::open311_client::ServiceRequestSource;
use crate::pipeline::Pipeline;
use open311_influx_shared::InvocationResponse;

/// Run one invocation for a trigger event and translate the outcome.
///
/// The event payload is opaque and ignored. Pipeline errors come back as a
/// 500 response instead of ending the process.
pub async fn handle_invocation<S, K>(pipeline: &Pipeline<S, K>, event: &[u8]) -> InvocationResponse
where
    S: ServiceRequestSource,
    K: PointSink,
{
    log::debug!("Invocation triggered ({} byte payload ignored)", event.len());

    match pipeline.run().await {
        Ok(summary) => {
            log::info!(
                "Invocation completed: fetched {}, wrote {} ({} without timestamp)",
                summary.fetched,
                summary.written,
                summary.untimestamped
            );
            InvocationResponse::success()
        }
        Err(e) => {
            log::error!("Invocation aborted while {}: {}", e.stage(), e);
            InvocationResponse::failure(&e)
        }
    }
}
