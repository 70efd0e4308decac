use super::tracker::Transition;
use serde::{Deserialize, Serialize};

const NULL_ID: &str = "null";

/// Last six characters of a payment id, or `"null"` when there is none.
pub fn shortened_id(payment_id: Option<&str>) -> String {
    tail(payment_id, 6)
}

/// Last four characters of a payment id, or `"null"` when there is none.
pub fn last4_digits(payment_id: Option<&str>) -> String {
    tail(payment_id, 4)
}

fn tail(payment_id: Option<&str>, n: usize) -> String {
    match payment_id {
        Some(id) => {
            let skip = id.chars().count().saturating_sub(n);
            id.chars().skip(skip).collect()
        }
        None => NULL_ID.to_string(),
    }
}

/// Summary written after every transition.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReport {
    pub new_payment_id: String,
    pub old_payment_id: String,
    pub new_payment_status: String,
    pub old_payment_status: Option<String>,
    pub new_payment_source_type: Option<String>,
    pub old_payment_source_type: Option<String>,
    pub new_payment_last4: String,
    pub old_payment_last4: String,
    pub actuated: bool,
    pub alarm: bool,
}

impl PaymentReport {
    pub fn new(transition: &Transition, actuated: bool, alarm: bool) -> Self {
        let old = transition.old.as_ref();
        let old_id = old.map(|tx| tx.id.as_str());
        let new = &transition.new;

        Self {
            new_payment_id: shortened_id(Some(&new.id)),
            old_payment_id: shortened_id(old_id),
            new_payment_status: new.raw_status.clone(),
            old_payment_status: old.map(|tx| tx.raw_status.clone()),
            new_payment_source_type: new.source_type.clone(),
            old_payment_source_type: old.and_then(|tx| tx.source_type.clone()),
            new_payment_last4: last4_digits(Some(&new.id)),
            old_payment_last4: last4_digits(old_id),
            actuated,
            alarm,
        }
    }
}
