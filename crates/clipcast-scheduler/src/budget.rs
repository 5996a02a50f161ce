//! Daily spend tracking, keyed by UTC calendar date. Guarded by a single
//! mutex so admission's read+update is atomic, per the shared-resource policy.

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

struct BudgetState {
    day: NaiveDate,
    spent: f64,
}

/// Tracks today's admitted spend against `DailySpendCap`. Crossing UTC
/// midnight resets the bucket lazily, on the next access.
pub struct DailyBudget {
    state: Mutex<BudgetState>,
}

impl DailyBudget {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BudgetState { day: Utc::now().date_naive(), spent: 0.0 }),
        }
    }

    /// Atomically check `spent_today + estimate <= cap` and, if so, record
    /// the admission. Returns whether the job was admitted.
    pub async fn try_admit(&self, estimate: f64, cap: f64) -> bool {
        let mut state = self.state.lock().await;
        roll_if_new_day(&mut state);

        if state.spent + estimate > cap {
            return false;
        }
        state.spent += estimate;
        true
    }

    /// Today's admitted spend so far, for status/diagnostic surfaces.
    pub async fn spent_today(&self) -> f64 {
        let mut state = self.state.lock().await;
        roll_if_new_day(&mut state);
        state.spent
    }

    /// Record a completed job's realized cost. Reconciliation only: logged,
    /// never retroactively rejects an already-admitted job, and never feeds
    /// back into the admission gate beyond today's total (same bucket).
    pub async fn record_realized(&self, realized_cost: f64) {
        let mut state = self.state.lock().await;
        roll_if_new_day(&mut state);
        tracing::debug!(realized_cost, spent_today = state.spent, "realized cost reconciled against daily budget");
    }
}

impl Default for DailyBudget {
    fn default() -> Self {
        Self::new()
    }
}

fn roll_if_new_day(state: &mut BudgetState) {
    let today = Utc::now().date_naive();
    if today != state.day {
        state.day = today;
        state.spent = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn admits_while_under_cap() {
        let budget = DailyBudget::new();
        assert!(budget.try_admit(0.01, 0.05).await);
        assert!((budget.spent_today().await - 0.01).abs() < 1e-9);
    }

    #[tokio::test]
    async fn rejects_when_estimate_would_exceed_cap() {
        let budget = DailyBudget::new();
        assert!(budget.try_admit(0.019, 0.02).await);
        assert!(!budget.try_admit(0.005, 0.02).await, "0.019 + 0.005 > 0.02 must be rejected");
        assert!((budget.spent_today().await - 0.019).abs() < 1e-9, "rejected admission must not change spend");
    }

    #[tokio::test]
    async fn exact_boundary_is_admitted() {
        let budget = DailyBudget::new();
        assert!(budget.try_admit(0.02, 0.02).await);
    }
}
