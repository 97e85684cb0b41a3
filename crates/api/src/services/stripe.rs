//! # Stripe Billing
//!
//! Verifies `Stripe-Signature` headers and turns subscription events into
//! plan changes on the paying user.
//!
//! Signatures follow Stripe's v1 scheme: the header carries a unix timestamp
//! `t` and one or more `v1` entries, each a hex HMAC-SHA256 of
//! `"{t}.{raw body}"` keyed with the endpoint's signing secret.

use clinicly_core::{
    errors::{ClinicError, ClinicResult},
    models::user::{ESSENTIAL_PLAN, PlanActivation},
    repositories::Store,
};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::info;

type HmacSha256 = Hmac<Sha256>;

pub const INVOICE_PAID: &str = "invoice.paid";
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

fn rejected(reason: &str) -> ClinicError {
    ClinicError::Validation(format!("Webhook signature verification failed: {}", reason))
}

fn signer(secret: &str, timestamp: i64, payload: &[u8]) -> ClinicResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ClinicError::Internal(e.to_string().into()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Hex signature Stripe would send for `payload` at `timestamp`.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> ClinicResult<String> {
    let digest = signer(secret, timestamp, payload)?.finalize().into_bytes();
    Ok(hex::encode(digest))
}

/// Checks a `Stripe-Signature` header against the raw request body.
///
/// `now` and the header timestamp may differ by at most `tolerance` seconds.
pub fn verify_signature(
    header: &str,
    payload: &[u8],
    secret: &str,
    tolerance: u64,
    now: i64,
) -> ClinicResult<()> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| rejected("missing timestamp"))?;
    if signatures.is_empty() {
        return Err(rejected("no v1 signature"));
    }

    if now.abs_diff(timestamp) > tolerance {
        return Err(rejected("timestamp outside the tolerance zone"));
    }

    let mac = signer(secret, timestamp, payload)?;
    let matched = signatures
        .iter()
        .filter_map(|signature| hex::decode(signature).ok())
        .any(|expected| mac.clone().verify_slice(&expected).is_ok());

    if matched {
        Ok(())
    } else {
        Err(rejected("no matching signature"))
    }
}

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Invoice {
    customer: Option<String>,
    subscription_details: Option<SubscriptionDetails>,
    lines: Option<InvoiceLines>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionDetails {
    subscription: Option<String>,
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct InvoiceLines {
    #[serde(default)]
    data: Vec<InvoiceLine>,
}

#[derive(Debug, Deserialize)]
struct InvoiceLine {
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct Subscription {
    metadata: Option<Metadata>,
}

/// What a webhook event asks us to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingAction {
    Activate {
        user_id: String,
        activation: PlanActivation,
    },
    Cancel {
        user_id: String,
    },
    Ignore {
        event_type: String,
    },
}

fn missing_user() -> ClinicError {
    ClinicError::Validation("User ID not found in event metadata".to_string())
}

fn object<T: for<'de> Deserialize<'de>>(event: &StripeEvent) -> ClinicResult<T> {
    serde_json::from_value(event.data.object.clone())
        .map_err(|e| ClinicError::Validation(format!("Malformed {} event: {}", event.event_type, e)))
}

pub fn parse_event(payload: &[u8]) -> ClinicResult<BillingAction> {
    let event: StripeEvent = serde_json::from_slice(payload)
        .map_err(|e| ClinicError::Validation(format!("Malformed webhook payload: {}", e)))?;

    match event.event_type.as_str() {
        INVOICE_PAID => {
            let invoice: Invoice = object(&event)?;
            let details = invoice.subscription_details;

            let user_id = details
                .as_ref()
                .and_then(|details| details.metadata.as_ref())
                .and_then(|metadata| metadata.user_id.clone())
                .or_else(|| {
                    invoice
                        .lines
                        .as_ref()
                        .and_then(|lines| lines.data.first())
                        .and_then(|line| line.metadata.as_ref())
                        .and_then(|metadata| metadata.user_id.clone())
                })
                .ok_or_else(missing_user)?;

            let stripe_customer_id = invoice.customer.ok_or_else(|| {
                ClinicError::Validation("Invoice has no customer".to_string())
            })?;

            Ok(BillingAction::Activate {
                user_id,
                activation: PlanActivation {
                    plan: ESSENTIAL_PLAN.to_string(),
                    stripe_customer_id,
                    stripe_subscription_id: details.and_then(|details| details.subscription),
                },
            })
        }
        SUBSCRIPTION_DELETED => {
            let subscription: Subscription = object(&event)?;
            let user_id = subscription
                .metadata
                .and_then(|metadata| metadata.user_id)
                .ok_or_else(missing_user)?;

            Ok(BillingAction::Cancel { user_id })
        }
        _ => Ok(BillingAction::Ignore {
            event_type: event.event_type,
        }),
    }
}

/// Applies the action; an unknown user is reported as a bad request.
pub async fn apply(store: &dyn Store, action: BillingAction) -> ClinicResult<()> {
    let unknown_user = |e: ClinicError| match e {
        ClinicError::NotFound(message) => ClinicError::Validation(message),
        other => other,
    };

    match action {
        BillingAction::Activate { user_id, activation } => {
            store
                .activate_plan(&user_id, activation)
                .await
                .map_err(unknown_user)?;
            info!("Subscription activated for user {}", user_id);
        }
        BillingAction::Cancel { user_id } => {
            store.clear_plan(&user_id).await.map_err(unknown_user)?;
            info!("Subscription cancelled for user {}", user_id);
        }
        BillingAction::Ignore { event_type } => {
            info!("Unhandled event type {}", event_type);
        }
    }

    Ok(())
}
