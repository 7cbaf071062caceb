use crate::core::views::DashboardSnapshot;
use crate::domain::model::RepairRequest;
use crate::utils::error::{PortalError, Result};

/// Request history as CSV, one row per request in store order.
pub fn requests_csv(requests: &[RepairRequest]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "title",
        "location",
        "status",
        "priority",
        "submitted_by",
        "submitted_at",
        "estimated_completion_date",
    ])?;

    for request in requests {
        let status = request.status.to_string();
        let priority = request
            .priority
            .map(|p| p.to_string())
            .unwrap_or_default();
        let submitted_at = request.submitted_at.to_rfc3339();
        let estimated = request
            .estimated_completion_date
            .map(|d| d.to_rfc3339())
            .unwrap_or_default();
        writer.write_record([
            request.id.as_str(),
            request.title.as_str(),
            request.location.as_str(),
            status.as_str(),
            priority.as_str(),
            request.submitted_by.as_str(),
            submitted_at.as_str(),
            estimated.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PortalError::ReportError {
            message: format!("CSV buffer error: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| PortalError::ReportError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

pub fn dashboard_json(snapshot: &DashboardSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}
