//! # Quota Allocation Engine
//!
//! This crate holds the computational core of the quota reform calculator:
//! turning each director's economic indicators into a calculated quota and
//! distributing a pool of new shares in proportion to those quotas.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** No I/O and no knowledge of where the indicator table or
//!   the share table came from. It depends only on `core-types`.
//! - **Stateless calculation:** `QuotaScorer` and `ShareAllocator` hold only
//!   their formula. Every call is a single pass over request-local data, so
//!   both can be shared freely between threads.
//! - **Explicit failure:** Zero totals surface as
//!   `AllocationError::DegenerateInput` instead of `NaN` percentages.
//!
//! ## Public API
//!
//! - `QuotaScorer`: weighted indicator sum times the compression factor.
//! - `ShareAllocator`: the per-pass allocation, rounding and percentages.
//! - `AllocationReport` / `CalculationResult`: the ordered output rows.
//! - `AllocationError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod allocator;
pub mod error;
pub mod report;
pub mod scorer;

// Re-export the key components to create a clean, public-facing API.
pub use allocator::ShareAllocator;
pub use error::{AllocationError, DegenerateTotal};
pub use report::{AllocationReport, CalculationResult, format_percentage, parse_percentage};
pub use scorer::{QuotaScorer, score_vectors};

use core_types::{DirectorRecord, Formula, OriginalShareTable};

/// One-shot helper: runs a full calculation pass, using the historical
/// baseline formula unless `baseline` overrides it.
pub fn calculate_quotas(
    directors: &[DirectorRecord],
    original_shares: &OriginalShareTable,
    formula: &Formula,
    new_shares_total: u64,
    baseline: Option<Formula>,
) -> Result<AllocationReport, AllocationError> {
    ShareAllocator::new(baseline.unwrap_or_default()).calculate(
        directors,
        formula,
        new_shares_total,
        original_shares,
    )
}
