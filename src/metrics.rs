use crate::records::EntityKind;
use std::time::Instant;
use tracing::info;

/// Logs how long a ledger operation took when dropped.
///
/// ```ignore
/// let _timer = OperationTimer::new("restore", EntityKind::Vendor, &request_id);
/// ```
pub struct OperationTimer {
    name: &'static str,
    kind: EntityKind,
    request_id: String,
    start: Instant,
}

impl OperationTimer {
    #[must_use]
    pub fn new(name: &'static str, kind: EntityKind, request_id: &str) -> Self {
        Self {
            name,
            kind,
            request_id: request_id.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.name,
            entity_type = %self.kind,
            request_id = %self.request_id,
            duration_ms = %duration.as_millis(),
            "Operation completed"
        );
    }
}

/// Short id used to correlate the log lines and audit entry of one request.
#[must_use]
pub fn generate_request_id() -> String {
    let uuid_str = uuid::Uuid::new_v4().simple().to_string();
    uuid_str.get(..8).unwrap_or(&uuid_str).to_string()
}
