use crate::leave::balance::{Balance, TypeBalance};
use crate::model::trainer::TrainerCategory;

/// Accrual and rollover knobs. The exact numbers are an organizational
/// policy, so they come from configuration rather than being baked into
/// the arithmetic.
#[derive(Debug, Clone)]
pub struct AccrualPolicy {
    /// Days added to each finite balance of a permanent trainer per month.
    pub monthly_accrual_days: i64,
    /// Most days a finite balance may carry into the next year.
    pub rollover_cap_days: i64,
}

impl Default for AccrualPolicy {
    fn default() -> Self {
        AccrualPolicy {
            monthly_accrual_days: 1,
            rollover_cap_days: 10,
        }
    }
}

/// Monthly accrual tick for one counter set.
///
/// Permanent trainers accrue on finite balances; contracted balances are
/// fixed and unlimited balances have nothing to accrue into.
pub fn apply_monthly_accrual(
    balance: &TypeBalance,
    category: TrainerCategory,
    policy: &AccrualPolicy,
) -> TypeBalance {
    if category == TrainerCategory::Contracted {
        return *balance;
    }
    match balance.available {
        Balance::Unlimited => *balance,
        Balance::Finite(n) => TypeBalance {
            available: Balance::Finite(n + policy.monthly_accrual_days),
            ..*balance
        },
    }
}

/// Yearly rollover for one counter set: unused finite balance moves into
/// `carry_forward` up to the cap, `available` resets and subsequent accruals
/// rebuild it. Carry-forward stays display-only and replaces last year's.
pub fn apply_yearly_rollover(balance: &TypeBalance, policy: &AccrualPolicy) -> TypeBalance {
    match balance.available {
        Balance::Unlimited => *balance,
        Balance::Finite(n) => TypeBalance {
            available: Balance::Finite(0),
            used: 0,
            carry_forward: n.clamp(0, policy.rollover_cap_days),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(available: i64, used: i64, carry: i64) -> TypeBalance {
        TypeBalance {
            available: Balance::Finite(available),
            used,
            carry_forward: carry,
        }
    }

    #[test]
    fn permanent_finite_balance_accrues() {
        let policy = AccrualPolicy::default();
        let after = apply_monthly_accrual(&finite(5, 2, 0), TrainerCategory::Permanent, &policy);
        assert_eq!(after.available, Balance::Finite(6));
        assert_eq!(after.used, 2);
    }

    #[test]
    fn contracted_balance_is_fixed() {
        let policy = AccrualPolicy::default();
        let before = finite(12, 0, 0);
        let after = apply_monthly_accrual(&before, TrainerCategory::Contracted, &policy);
        assert_eq!(after, before);
    }

    #[test]
    fn unlimited_balance_does_not_accrue() {
        let policy = AccrualPolicy::default();
        let before = TypeBalance::unlimited();
        let after = apply_monthly_accrual(&before, TrainerCategory::Permanent, &policy);
        assert_eq!(after, before);
    }

    #[test]
    fn rollover_caps_carry_forward() {
        let policy = AccrualPolicy {
            monthly_accrual_days: 1,
            rollover_cap_days: 10,
        };
        let after = apply_yearly_rollover(&finite(14, 6, 3), &policy);
        assert_eq!(after.carry_forward, 10);
        assert_eq!(after.available, Balance::Finite(0));
        assert_eq!(after.used, 0);
    }

    #[test]
    fn rollover_below_cap_carries_everything() {
        let policy = AccrualPolicy::default();
        let after = apply_yearly_rollover(&finite(4, 8, 9), &policy);
        assert_eq!(after.carry_forward, 4);
    }

    #[test]
    fn rollover_leaves_unlimited_untouched() {
        let policy = AccrualPolicy::default();
        let before = TypeBalance::unlimited();
        let after = apply_yearly_rollover(&before, &policy);
        assert_eq!(after, before);
    }

    #[test]
    fn rollover_never_carries_negative_balance() {
        let policy = AccrualPolicy::default();
        let after = apply_yearly_rollover(&finite(-3, 20, 0), &policy);
        assert_eq!(after.carry_forward, 0);
    }
}
