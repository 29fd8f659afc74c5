//! Notification Service
//!
//! Fan-out to the configured recipient list plus template rendering. Each
//! recipient is independent; the overall send counts as successful when at
//! least one message went out.

use serde::Serialize;
use std::collections::HashMap;

use crate::core::ServerState;
use crate::db::repository::{settings, sync_log};

/// Per-recipient send result
#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    pub recipient: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a fan-out
#[derive(Debug, Serialize)]
pub struct NotifyOutcome {
    pub success: bool,
    pub outcomes: Vec<SendOutcome>,
}

impl NotifyOutcome {
    pub fn sent_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }
}

/// Send `message` to every recipient independently. An empty recipient list
/// is a no-op reported as unsuccessful (nothing was sent).
pub async fn notify(state: &ServerState, recipients: &[String], message: &str) -> NotifyOutcome {
    let mut outcomes = Vec::with_capacity(recipients.len());

    for recipient in recipients {
        match state.messaging.send(recipient, message).await {
            Ok(id) => outcomes.push(SendOutcome {
                recipient: recipient.clone(),
                success: true,
                message_id: Some(id),
                error: None,
            }),
            Err(e) => {
                tracing::warn!(recipient, "Message send failed: {}", e);
                outcomes.push(SendOutcome {
                    recipient: recipient.clone(),
                    success: false,
                    message_id: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let outcome = NotifyOutcome {
        success: outcomes.iter().any(|o| o.success),
        outcomes,
    };

    sync_log::record(
        &state.pool,
        "messaging",
        "notify",
        outcome.success,
        format!("Sent {}/{} messages", outcome.sent_count(), recipients.len()),
        serde_json::to_value(&outcome.outcomes).ok(),
    )
    .await;

    outcome
}

/// Send a templated message to the settings recipient list
pub async fn notify_template(
    state: &ServerState,
    template: &str,
    vars: &[(&str, String)],
) -> NotifyOutcome {
    let cfg = settings::get(&state.pool).await.unwrap_or_default();
    let body = render_template(template, &cfg.templates, vars);
    notify(state, &cfg.recipients, &body).await
}

/// Built-in template bodies, overridable per name through settings
fn default_template(name: &str) -> &'static str {
    match name {
        "new_order" => "Nuevo encargo {order_number} de {customer_name}: {total} EUR",
        "status_change" => "Encargo {order_number}: {status}",
        "low_stock" => "Stock bajo: {product_name} ({stock} uds, minimo {stock_min})",
        "order_cancelled" => "Encargo {order_number} cancelado, stock repuesto",
        _ => "{message}",
    }
}

/// Render a template with `{placeholder}` substitution. Unknown
/// placeholders are left as-is.
pub fn render_template(
    name: &str,
    overrides: &HashMap<String, String>,
    vars: &[(&str, String)],
) -> String {
    let mut body = overrides
        .get(name)
        .map(String::as_str)
        .unwrap_or_else(|| default_template(name))
        .to_string();
    for (key, value) in vars {
        body = body.replace(&format!("{{{key}}}"), value);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_default_template() {
        let body = render_template(
            "status_change",
            &HashMap::new(),
            &[
                ("order_number", "ENC-2026-0001".to_string()),
                ("status", "ready".to_string()),
            ],
        );
        assert_eq!(body, "Encargo ENC-2026-0001: ready");
    }

    #[test]
    fn settings_override_wins() {
        let mut overrides = HashMap::new();
        overrides.insert("low_stock".to_string(), "Reponer {product_name}!".to_string());
        let body = render_template(
            "low_stock",
            &overrides,
            &[("product_name", "Traje lunares rojo".to_string())],
        );
        assert_eq!(body, "Reponer Traje lunares rojo!");
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        let body = render_template("new_order", &HashMap::new(), &[]);
        assert!(body.contains("{order_number}"));
    }
}
