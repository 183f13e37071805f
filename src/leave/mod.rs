//! Leave validation & balance engine.
//!
//! Pure business rules: date-range arithmetic, the per-type balance ledger,
//! overlap detection against existing records, and the validator that
//! aggregates rule violations into a field-keyed error map. No database or
//! HTTP types in here; handlers in `crate::api` feed it snapshots.

pub mod accrual;
pub mod balance;
pub mod date_range;
pub mod overlap;
pub mod validator;
