//! MCP tool handlers for the notification server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::domain::{self, PhoneNumber};
use crate::error::DispatchError;
use crate::metrics::Metrics;
use crate::models::{DispatchResult, DomainEvent, Order};
use crate::services::NotificationService;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server that exposes the HASH India SMS dispatcher as tools.
#[derive(Clone)]
pub struct HashNotifyServer {
    notification_service: Arc<dyn NotificationService>,
    metrics: Metrics,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for HashNotifyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "hash-notify".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server for HASH India customer SMS - normalizes phone numbers, previews templated messages and sends order, OTP and promotional notifications.".into()),
        }
    }
}

// Helper structs for tool parameters
#[derive(Debug, Deserialize, JsonSchema)]
struct PhoneParams {
    phone: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PreviewMessageParams {
    event: DomainEvent,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SendSmsParams {
    phone: String,
    body: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SendOtpParams {
    phone: String,
    otp: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct OrderParams {
    order: Order,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct DeliveryOtpParams {
    order: Order,
    otp: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct StatusUpdateParams {
    order: Order,
    status: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PasswordResetParams {
    phone: String,
    code: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PromotionalBlastParams {
    recipients: Vec<String>,
    body: String,
    #[serde(default)]
    name: Option<String>,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

/// Client-side dispatch failures become invalid-params errors.
fn dispatch_error(e: DispatchError) -> McpError {
    let code = if e.status_code() < 500 {
        ErrorCode::INVALID_PARAMS
    } else {
        ErrorCode::INTERNAL_ERROR
    };
    tracing::error!("Dispatch failed: {}", e);
    let data = e.transport_error().map(|source| {
        serde_json::json!({
            "retryable": source.is_retryable(),
        })
    });
    McpError {
        code,
        message: Cow::from(e.to_string()),
        data,
    }
}

fn json_result(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let json_response = serde_json::to_string_pretty(value).map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(json_response)]))
}

fn batch_result(results: &[DispatchResult]) -> Result<CallToolResult, McpError> {
    let succeeded = results.iter().filter(|r| r.success).count();
    json_result(&serde_json::json!({
        "total": results.len(),
        "succeeded": succeeded,
        "failed": results.len() - succeeded,
        "results": results,
    }))
}

// Tool router implementation
#[tool_router]
impl HashNotifyServer {
    /// Create a new notification MCP server.
    pub fn new(notification_service: Arc<dyn NotificationService>, metrics: Metrics) -> Self {
        Self {
            notification_service,
            metrics,
            tool_router: Self::tool_router(),
        }
    }

    /// Normalize a phone number to international form.
    #[tool(
        description = "Normalize a phone number: strips formatting and adds +91 to bare 10-digit Indian numbers. Reports whether the result is a sendable E.164 number."
    )]
    async fn normalize_phone(
        &self,
        params: Parameters<PhoneParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let normalized = domain::normalize(&params.phone);
        let e164 = PhoneNumber::parse(&params.phone).is_ok();

        json_result(&serde_json::json!({
            "input": params.phone,
            "normalized": normalized,
            "e164": e164,
        }))
    }

    /// Check whether a phone number looks dialable.
    #[tool(
        description = "Validate a phone number: 10 digits, optionally preceded by + and a 1-3 digit country code"
    )]
    async fn validate_phone(
        &self,
        params: Parameters<PhoneParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let valid = domain::validate(&params.phone);

        json_result(&serde_json::json!({
            "input": params.phone,
            "valid": valid,
        }))
    }

    /// Render a notification without sending it.
    #[tool(description = "Render the SMS text for a notification event without sending it")]
    async fn preview_message(
        &self,
        params: Parameters<PreviewMessageParams>,
    ) -> Result<CallToolResult, McpError> {
        let event = params.0.event;
        let body = self.notification_service.render_template(&event);

        json_result(&serde_json::json!({
            "type": event.kind(),
            "body": body,
            "length": body.chars().count(),
        }))
    }

    /// Send a free-form SMS.
    #[tool(description = "Send a free-form SMS to one phone number")]
    async fn send_sms(&self, params: Parameters<SendSmsParams>) -> Result<CallToolResult, McpError> {
        let params = params.0;

        tracing::info!("MCP Handler: send_sms called");
        let result = self
            .notification_service
            .send(&params.phone, &params.body)
            .await
            .map_err(dispatch_error)?;

        json_result(&result)
    }

    /// Send a verification OTP.
    #[tool(description = "Send a login/sign-up verification code (valid 10 minutes)")]
    async fn send_otp(&self, params: Parameters<SendOtpParams>) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let result = self
            .notification_service
            .send_otp(
                &params.phone,
                &params.otp,
                params.name.as_deref().unwrap_or("there"),
            )
            .await
            .map_err(dispatch_error)?;

        json_result(&result)
    }

    /// Send an order confirmation.
    #[tool(description = "Send an order confirmation with total and tracking link to the order's phone")]
    async fn send_order_confirmation(
        &self,
        params: Parameters<OrderParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .notification_service
            .send_order_confirmation(&params.0.order)
            .await
            .map_err(dispatch_error)?;

        json_result(&result)
    }

    /// Send a shipping update.
    #[tool(description = "Send a shipped notification, including the courier tracking number when set")]
    async fn send_shipping_update(
        &self,
        params: Parameters<OrderParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .notification_service
            .send_shipping_update(&params.0.order)
            .await
            .map_err(dispatch_error)?;

        json_result(&result)
    }

    /// Send the delivery handover OTP.
    #[tool(description = "Send the out-for-delivery OTP the customer shares with the delivery partner")]
    async fn send_delivery_otp(
        &self,
        params: Parameters<DeliveryOtpParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let result = self
            .notification_service
            .send_delivery_otp(&params.order, &params.otp)
            .await
            .map_err(dispatch_error)?;

        json_result(&result)
    }

    /// Send an order status change.
    #[tool(
        description = "Send an order status update (confirmed, packed, delivered, cancelled or any other status)"
    )]
    async fn send_status_update(
        &self,
        params: Parameters<StatusUpdateParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let result = self
            .notification_service
            .send_status_update(&params.order, &params.status)
            .await
            .map_err(dispatch_error)?;

        json_result(&result)
    }

    /// Send a password reset code.
    #[tool(description = "Send a password reset code (valid 1 hour)")]
    async fn send_password_reset(
        &self,
        params: Parameters<PasswordResetParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let result = self
            .notification_service
            .send_password_reset(
                &params.phone,
                &params.code,
                params.name.as_deref().unwrap_or("there"),
            )
            .await
            .map_err(dispatch_error)?;

        json_result(&result)
    }

    /// Send a promotional message to many recipients.
    #[tool(
        description = "Send a promotional SMS to a list of phone numbers, one at a time at the configured rate. Returns a per-recipient result in input order."
    )]
    async fn send_promotional_blast(
        &self,
        params: Parameters<PromotionalBlastParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        tracing::info!(
            "MCP Handler: send_promotional_blast called with {} recipients",
            params.recipients.len()
        );

        let results = self
            .notification_service
            .send_promotional(
                &params.recipients,
                &params.body,
                params.name.as_deref().unwrap_or(""),
            )
            .await;

        batch_result(&results)
    }

    /// Report dispatch counters.
    #[tool(description = "Report counts of sent, failed, rejected and retried messages")]
    async fn dispatch_stats(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.metrics.summary())
    }
}
