use chrono::{DateTime, Utc};

use super::domain::Company;

/// Errors raised by point-ledger mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("credit amount must be at least one point")]
    InvalidAmount,
    #[error("insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: u32, available: u32 },
}

/// Add `amount + bonus` points to the company balance.
///
/// `bonus` may be zero, `amount` may not; a bonus is only granted alongside a
/// paid credit.
pub fn credit(
    company: &mut Company,
    amount: u32,
    bonus: u32,
    at: DateTime<Utc>,
) -> Result<u32, LedgerError> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }

    company.job_posting_points = company
        .job_posting_points
        .saturating_add(amount)
        .saturating_add(bonus);
    company.points_last_updated = Some(at);

    Ok(company.job_posting_points)
}

/// Subtract `amount` points, failing without any mutation if the balance
/// would go negative. Callers provide isolation: this runs inside a single
/// repository read-modify-write so concurrent debits cannot interleave.
pub fn debit(company: &mut Company, amount: u32, at: DateTime<Utc>) -> Result<u32, LedgerError> {
    let available = company.job_posting_points;
    if amount > available {
        return Err(LedgerError::InsufficientPoints {
            requested: amount,
            available,
        });
    }

    company.job_posting_points = available - amount;
    company.points_last_updated = Some(at);

    Ok(company.job_posting_points)
}

/// Current balance, no side effects.
pub fn balance(company: &Company) -> u32 {
    company.job_posting_points
}
