use chrono::{DateTime, Utc};

/// Payment status as reported by the payments API.
///
/// Unknown raw strings collapse into `Other` so that new upstream states never
/// trigger an output line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StatusCode {
    Approved,
    Completed,
    Pending,
    Canceled,
    Failed,
    Other,
}

impl StatusCode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => Self::Approved,
            "COMPLETED" => Self::Completed,
            "PENDING" => Self::Pending,
            "CANCELED" => Self::Canceled,
            "FAILED" => Self::Failed,
            _ => Self::Other,
        }
    }
}

/// A single payment as observed at poll time.
///
/// Immutable once fetched; identity is `id`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Transaction {
    pub id: String,
    pub status: StatusCode,
    /// The status string exactly as the API returned it.
    pub raw_status: String,
    pub source_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        raw_status: impl Into<String>,
        source_type: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let raw_status = raw_status.into();
        Self {
            id: id.into(),
            status: StatusCode::parse(&raw_status),
            raw_status,
            source_type: source_type.map(str::to_owned),
            created_at,
        }
    }
}

/// Picks the most recent transaction.
///
/// Orders by `created_at`, then by `id`, so the choice is total and stable for
/// payments created in the same instant.
pub fn select_latest(transactions: Vec<Transaction>) -> Option<Transaction> {
    transactions
        .into_iter()
        .max_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)))
}
