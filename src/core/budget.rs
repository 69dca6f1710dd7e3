//! Budget arithmetic shared by the engine, the achievement rules and the projections.

/// Remaining budget as a pure function of the budget and what has been spent.
///
/// Always within `[0, monthly_budget]`; a non-positive budget leaves nothing remaining.
pub fn remaining(monthly_budget: f64, total_spent: f64) -> f64 {
    if monthly_budget.is_nan() || monthly_budget <= 0.0 {
        return 0.0;
    }
    (monthly_budget - total_spent).clamp(0.0, monthly_budget)
}

/// Share of the budget still available, in percent. Zero for a non-positive budget.
pub fn percentage(remaining: f64, monthly_budget: f64) -> f64 {
    if monthly_budget.is_nan() || monthly_budget <= 0.0 {
        return 0.0;
    }
    remaining / monthly_budget * 100.0
}
