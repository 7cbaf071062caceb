use crate::core::views::DashboardSnapshot;

/// Plain-text rendering of the dashboard, one section per card.
pub fn render(snapshot: &DashboardSnapshot) -> String {
    let mut lines = Vec::new();
    lines.push("== Road Repair Dashboard ==".to_string());
    lines.push(format!("Total requests: {}", snapshot.total_requests));
    lines.push(format!(
        "Completion rate: {}%",
        snapshot.completion_rate_percent
    ));

    lines.push(String::new());
    lines.push("Requests by status:".to_string());
    for entry in &snapshot.status_counts {
        lines.push(format!("  {:<12} {}", entry.status.to_string(), entry.count));
    }

    lines.push(String::new());
    lines.push("Requests by priority:".to_string());
    for entry in &snapshot.priority_counts {
        lines.push(format!(
            "  {:<12} {}",
            entry.priority.to_string(),
            entry.count
        ));
    }

    lines.push(String::new());
    lines.push("Resource utilization:".to_string());
    for usage in &snapshot.resource_utilization {
        lines.push(format!(
            "  {}: {}/{} {} in use ({} available)",
            usage.name, usage.used, usage.quantity, usage.unit, usage.available
        ));
    }

    lines.push(String::new());
    if snapshot.low_stock.is_empty() {
        lines.push("Low stock: none".to_string());
    } else {
        lines.push("Low stock:".to_string());
        for usage in &snapshot.low_stock {
            let percent = if usage.quantity == 0 {
                0
            } else {
                (usage.available as f64 / usage.quantity as f64 * 100.0).round() as u32
            };
            lines.push(format!(
                "  {} ({}% remaining)",
                usage.name, percent
            ));
        }
    }

    if !snapshot.monthly_activity.is_empty() {
        lines.push(String::new());
        lines.push("Monthly activity:".to_string());
        for month in &snapshot.monthly_activity {
            lines.push(format!(
                "  {}-{:02}: {} submitted, {} completed",
                month.year, month.month, month.submitted, month.completed
            ));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}
