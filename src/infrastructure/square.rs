use crate::domain::ports::TransactionSource;
use crate::domain::transaction::Transaction;
use crate::error::{Result, TrackerError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct PaymentsEnvelope {
    payments: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct RawPayment {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    source_type: Option<String>,
    created_at: String,
}

impl TryFrom<RawPayment> for Transaction {
    type Error = chrono::ParseError;

    fn try_from(raw: RawPayment) -> std::result::Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&raw.created_at)?.with_timezone(&Utc);
        Ok(Transaction::new(raw.id, raw.status, raw.source_type.as_deref(), created_at))
    }
}

/// Parses a `/v2/payments` response body.
///
/// A body without a `payments` array is malformed. Records that cannot be
/// read are dropped individually so one bad entry does not hide the rest.
pub fn parse_payments(body: &str) -> Result<Vec<Transaction>> {
    let envelope: PaymentsEnvelope = serde_json::from_str(body)
        .map_err(|e| TrackerError::MalformedResponse(e.to_string()))?;
    let records = envelope
        .payments
        .ok_or_else(|| TrackerError::MalformedResponse("missing payments array".to_string()))?;

    let mut transactions = Vec::with_capacity(records.len());
    for record in records {
        let parsed = serde_json::from_value::<RawPayment>(record)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                let id = raw.id.clone();
                Transaction::try_from(raw).map_err(|e| format!("payment {}: {}", id, e))
            });
        match parsed {
            Ok(tx) => transactions.push(tx),
            Err(reason) => warn!(%reason, "Skipping unreadable payment record"),
        }
    }
    Ok(transactions)
}

/// Polls the Square payments endpoint with bearer-token auth.
pub struct SquareTransactionSource {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl SquareTransactionSource {
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl TransactionSource for SquareTransactionSource {
    async fn fetch(&self) -> Result<Vec<Transaction>> {
        let response = self
            .client
            .get(&self.url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Fetch(format!("payments API returned {}", status)));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched payments");
        parse_payments(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payments() {
        let body = r#"{
            "payments": [
                { "id": "p1", "status": "COMPLETED", "source_type": "CARD",
                  "created_at": "2024-01-01T10:00:00.000Z", "amount_money": { "amount": 100 } },
                { "id": "p2", "status": "PENDING", "created_at": "2024-01-01T11:00:00Z" }
            ]
        }"#;
        let txs = parse_payments(body).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].source_type.as_deref(), Some("CARD"));
        assert_eq!(txs[1].source_type, None);
        assert_eq!(txs[1].raw_status, "PENDING");
    }

    #[test]
    fn test_empty_object_is_malformed() {
        assert!(matches!(parse_payments("{}"), Err(TrackerError::MalformedResponse(_))));
        assert!(matches!(
            parse_payments(r#"{ "payments": "nope" }"#),
            Err(TrackerError::MalformedResponse(_))
        ));
        assert!(matches!(parse_payments("<html>"), Err(TrackerError::MalformedResponse(_))));
    }

    #[test]
    fn test_empty_payments_array() {
        assert!(parse_payments(r#"{ "payments": [] }"#).unwrap().is_empty());
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let body = r#"{
            "payments": [
                { "status": "COMPLETED", "created_at": "2024-01-01T10:00:00Z" },
                { "id": "p2", "status": "COMPLETED", "created_at": "yesterday" },
                { "id": "p3", "status": "FAILED", "created_at": "2024-01-01T10:00:00+02:00" }
            ]
        }"#;
        let txs = parse_payments(body).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].id, "p3");
        assert_eq!(txs[0].created_at.to_rfc3339(), "2024-01-01T08:00:00+00:00");
    }
}
