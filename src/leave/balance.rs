use crate::model::leave_request::LeaveType;
use crate::model::role::Role;
use crate::model::trainer::TrainerCategory;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Available leave for one (trainer, leave type) pair.
///
/// Modelled as a tagged variant instead of overloading a number with a
/// string sentinel. The wire format still accepts the legacy `"Unlimited"`
/// and `"Infinity"` strings on input and emits `"Unlimited"` on output.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Balance {
    Finite(i64),
    Unlimited,
}

impl Balance {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Balance::Unlimited)
    }

    /// NULL in the ledger table means unlimited.
    pub fn from_stored(available: Option<i64>) -> Self {
        match available {
            Some(n) => Balance::Finite(n),
            None => Balance::Unlimited,
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Balance::Finite(n) => write!(f, "{}", n),
            Balance::Unlimited => write!(f, "Unlimited"),
        }
    }
}

impl Serialize for Balance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Balance::Finite(n) => serializer.serialize_i64(*n),
            Balance::Unlimited => serializer.serialize_str("Unlimited"),
        }
    }
}

impl<'de> Deserialize<'de> for Balance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BalanceVisitor;

        impl<'de> Visitor<'de> for BalanceVisitor {
            type Value = Balance;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a non-negative day count or \"Unlimited\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Balance, E> {
                Ok(Balance::Finite(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Balance, E> {
                Ok(Balance::Finite(v as i64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Balance, E> {
                if v.is_infinite() {
                    Ok(Balance::Unlimited)
                } else {
                    Ok(Balance::Finite(v as i64))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Balance, E> {
                match v {
                    "Unlimited" | "unlimited" | "Infinity" => Ok(Balance::Unlimited),
                    other => other
                        .parse::<i64>()
                        .map(Balance::Finite)
                        .map_err(|_| E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(BalanceVisitor)
    }
}

impl<'s> ToSchema<'s> for Balance {
    fn schema() -> (&'s str, utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>) {
        (
            "Balance",
            utoipa::openapi::ObjectBuilder::new()
                .description(Some("Available days, or the string \"Unlimited\""))
                .into(),
        )
    }
}

/// Counters for one leave type. `carry_forward` is informational only —
/// displayed, never added into sufficiency checks.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeBalance {
    #[schema(example = 10)]
    pub available: Balance,
    #[schema(example = 2)]
    pub used: i64,
    #[schema(example = 3)]
    pub carry_forward: i64,
}

impl TypeBalance {
    pub fn zero() -> Self {
        TypeBalance {
            available: Balance::Finite(0),
            used: 0,
            carry_forward: 0,
        }
    }

    pub fn unlimited() -> Self {
        TypeBalance {
            available: Balance::Unlimited,
            used: 0,
            carry_forward: 0,
        }
    }
}

/// Per-trainer ledger snapshot, one counter set per leave type.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaveBalances {
    pub sick: TypeBalance,
    pub casual: TypeBalance,
    pub paid: TypeBalance,
}

impl LeaveBalances {
    pub fn all_zero() -> Self {
        LeaveBalances {
            sick: TypeBalance::zero(),
            casual: TypeBalance::zero(),
            paid: TypeBalance::zero(),
        }
    }

    pub fn all_unlimited() -> Self {
        LeaveBalances {
            sick: TypeBalance::unlimited(),
            casual: TypeBalance::unlimited(),
            paid: TypeBalance::unlimited(),
        }
    }

    pub fn get(&self, leave_type: LeaveType) -> &TypeBalance {
        match leave_type {
            LeaveType::Sick => &self.sick,
            LeaveType::Casual => &self.casual,
            LeaveType::Paid => &self.paid,
        }
    }

    pub fn get_mut(&mut self, leave_type: LeaveType) -> &mut TypeBalance {
        match leave_type {
            LeaveType::Sick => &mut self.sick,
            LeaveType::Casual => &mut self.casual,
            LeaveType::Paid => &mut self.paid,
        }
    }
}

/// Contracted trainers are offered paid leave only. Sick/casual for them is
/// "not offered", which is a different condition than a zero balance.
pub fn leave_type_offered(category: TrainerCategory, leave_type: LeaveType) -> bool {
    match category {
        TrainerCategory::Permanent => true,
        TrainerCategory::Contracted => leave_type == LeaveType::Paid,
    }
}

/// HR balances are unlimited by construction regardless of what the ledger
/// table stores for them.
pub fn available_days(role: Role, balances: &LeaveBalances, leave_type: LeaveType) -> Balance {
    if role == Role::Hr {
        return Balance::Unlimited;
    }
    balances.get(leave_type).available
}

pub fn has_sufficient_balance(available: Balance, requested_days: i64) -> bool {
    match available {
        Balance::Unlimited => true,
        Balance::Finite(n) => requested_days <= n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hr_is_always_unlimited() {
        let balances = LeaveBalances::all_zero();
        for lt in [LeaveType::Sick, LeaveType::Casual, LeaveType::Paid] {
            let available = available_days(Role::Hr, &balances, lt);
            assert_eq!(available, Balance::Unlimited);
            assert!(has_sufficient_balance(available, 0));
            assert!(has_sufficient_balance(available, 365));
        }
    }

    #[test]
    fn trainer_reads_stored_balance() {
        let mut balances = LeaveBalances::all_zero();
        balances.casual.available = Balance::Finite(5);

        let available = available_days(Role::Trainer, &balances, LeaveType::Casual);
        assert_eq!(available, Balance::Finite(5));
        assert!(has_sufficient_balance(available, 5));
        assert!(!has_sufficient_balance(available, 6));
    }

    #[test]
    fn contracted_offered_paid_only() {
        assert!(leave_type_offered(TrainerCategory::Contracted, LeaveType::Paid));
        assert!(!leave_type_offered(TrainerCategory::Contracted, LeaveType::Sick));
        assert!(!leave_type_offered(TrainerCategory::Contracted, LeaveType::Casual));

        assert!(leave_type_offered(TrainerCategory::Permanent, LeaveType::Sick));
        assert!(leave_type_offered(TrainerCategory::Permanent, LeaveType::Casual));
        assert!(leave_type_offered(TrainerCategory::Permanent, LeaveType::Paid));
    }

    #[test]
    fn stored_null_means_unlimited() {
        assert_eq!(Balance::from_stored(None), Balance::Unlimited);
        assert_eq!(Balance::from_stored(Some(12)), Balance::Finite(12));
    }

    #[test]
    fn serializes_unlimited_as_string() {
        let json = serde_json::to_string(&Balance::Unlimited).unwrap();
        assert_eq!(json, "\"Unlimited\"");
        let json = serde_json::to_string(&Balance::Finite(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn deserializes_legacy_sentinels() {
        for raw in ["\"Unlimited\"", "\"unlimited\"", "\"Infinity\""] {
            let b: Balance = serde_json::from_str(raw).unwrap();
            assert_eq!(b, Balance::Unlimited);
        }
        let b: Balance = serde_json::from_str("14").unwrap();
        assert_eq!(b, Balance::Finite(14));
    }

    #[test]
    fn type_balance_uses_camel_case_keys() {
        let tb = TypeBalance {
            available: Balance::Finite(8),
            used: 2,
            carry_forward: 3,
        };
        let json = serde_json::to_value(tb).unwrap();
        assert_eq!(json["available"], 8);
        assert_eq!(json["used"], 2);
        assert_eq!(json["carryForward"], 3);
    }
}
