// src/reconciliation.rs
//
// Domain core: turns one shift's raw entries (sales, vouchers, expenses,
// card settlement, cash deposits) into the five derived totals. Pure
// arithmetic, no error path; called both for live feedback and to snapshot
// totals at save time.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Expense keys with special treatment somewhere in the service. The map is
// open: any other key ("anticipos", "horasExtras", "tercerDomingo", ...)
// flows through untouched, so a new category never needs a schema change.
pub const EXPENSE_INTERNAL_FUEL: &str = "bencinaEnzo";
pub const EXPENSE_FUEL_LOSS: &str = "perrosMuertos";
pub const EXPENSE_EXTRA_SHIFT: &str = "turnoExtra";
pub const EXPENSE_OTHER: &str = "otros";

/// Lenient money parsing: blank, missing or garbage input counts as zero.
/// Data entry is never blocked on a bad amount.
pub fn coerce_amount(raw: &Value) -> Decimal {
    match raw {
        Value::Number(n) => n.to_string().parse().unwrap_or(Decimal::ZERO),
        Value::String(s) => s.trim().parse().unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(coerce_amount).unwrap_or(Decimal::ZERO))
}

/// One voucher settled outside the cash drawer (fleet card, internal voucher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherEntry {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    #[serde(default)]
    pub reference: String,
}

/// One physical cash deposit (bag / deposit slip).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositEntry {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    #[serde(default)]
    pub reference: String,
}

/// Open expense-kind -> amount mapping. Values are coerced leniently on the
/// way in; unrecognized keys are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExpenseMap(BTreeMap<String, Decimal>);

impl<'de> Deserialize<'de> for ExpenseMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(ExpenseMap(
            raw.into_iter()
                .map(|(key, value)| (key, coerce_amount(&value)))
                .collect(),
        ))
    }
}

impl ExpenseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Decimal {
        self.0.get(key).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn set(&mut self, key: impl Into<String>, amount: Decimal) {
        self.0.insert(key.into(), amount);
    }

    /// Sum counted against the cash drawer. The fuel-loss key
    /// (`perrosMuertos`) is recorded but excluded: it never reduces the cash
    /// the attendant is expected to deposit.
    pub fn settlement_total(&self) -> Decimal {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != EXPENSE_FUEL_LOSS)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

/// Raw entry fields of one shift, exactly as typed by the attendant.
/// Negative amounts are allowed through unclamped; the source system never
/// clamped them and a clamp here would silently change stored differences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftEntries {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub fuel_sales: Decimal,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub store_sales: Decimal,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub card_total: Decimal,
    #[serde(default)]
    pub vouchers: Vec<VoucherEntry>,
    #[serde(default)]
    pub expenses: ExpenseMap,
    #[serde(default)]
    pub deposits: Vec<DepositEntry>,
}

/// Derived totals. Persisted as a snapshot next to the raw entries, but the
/// raw entries stay the source of truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftTotals {
    pub total_revenue: Decimal,
    pub total_non_cash: Decimal,
    pub expected_cash: Decimal,
    pub actual_cash: Decimal,
    /// actual - expected; positive is surplus cash, negative a shortfall.
    pub difference: Decimal,
}

/// Computes the five derived totals from one snapshot of raw entries.
///
/// Total and deterministic: empty lists contribute zero, recomputing from an
/// unchanged snapshot yields identical results, and there is no error path.
pub fn compute_totals(entries: &ShiftEntries) -> ShiftTotals {
    let total_revenue = entries.fuel_sales + entries.store_sales;

    let voucher_total: Decimal = entries.vouchers.iter().map(|v| v.amount).sum();
    let total_non_cash = voucher_total + entries.expenses.settlement_total() + entries.card_total;

    let expected_cash = total_revenue - total_non_cash;
    let actual_cash: Decimal = entries.deposits.iter().map(|d| d.amount).sum();

    ShiftTotals {
        total_revenue,
        total_non_cash,
        expected_cash,
        actual_cash,
        difference: actual_cash - expected_cash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn vouchers(amounts: &[Decimal]) -> Vec<VoucherEntry> {
        amounts
            .iter()
            .map(|&amount| VoucherEntry {
                amount,
                reference: String::new(),
            })
            .collect()
    }

    fn deposits(amounts: &[Decimal]) -> Vec<DepositEntry> {
        amounts
            .iter()
            .map(|&amount| DepositEntry {
                amount,
                reference: String::new(),
            })
            .collect()
    }

    fn balanced_shift() -> ShiftEntries {
        let mut expenses = ExpenseMap::new();
        expenses.set(EXPENSE_EXTRA_SHIFT, dec!(20000));
        expenses.set(EXPENSE_FUEL_LOSS, dec!(999999));

        ShiftEntries {
            fuel_sales: dec!(1000000),
            store_sales: dec!(200000),
            card_total: dec!(300000),
            vouchers: vouchers(&[dec!(50000)]),
            expenses,
            deposits: deposits(&[dec!(830000)]),
        }
    }

    #[test]
    fn balanced_shift_has_zero_difference() {
        let totals = compute_totals(&balanced_shift());

        assert_eq!(totals.total_revenue, dec!(1200000));
        assert_eq!(totals.total_non_cash, dec!(370000));
        assert_eq!(totals.expected_cash, dec!(830000));
        assert_eq!(totals.actual_cash, dec!(830000));
        assert_eq!(totals.difference, Decimal::ZERO);
    }

    #[test]
    fn short_deposit_shows_shortfall() {
        let mut entries = balanced_shift();
        entries.deposits = deposits(&[dec!(800000)]);

        let totals = compute_totals(&entries);
        assert_eq!(totals.difference, dec!(-30000));
    }

    #[test]
    fn all_zero_record_yields_all_zero_totals() {
        let totals = compute_totals(&ShiftEntries::default());
        assert_eq!(totals, ShiftTotals::default());
    }

    #[test]
    fn fuel_loss_is_recorded_but_never_reduces_expected_cash() {
        let base = balanced_shift();
        let mut bumped = base.clone();
        bumped
            .expenses
            .set(EXPENSE_FUEL_LOSS, dec!(5000000));

        let before = compute_totals(&base);
        let after = compute_totals(&bumped);

        assert_eq!(before.expected_cash, after.expected_cash);
        assert_eq!(before.difference, after.difference);
        // still retrievable for loss reporting
        assert_eq!(bumped.expenses.get(EXPENSE_FUEL_LOSS), dec!(5000000));
    }

    #[test]
    fn recomputation_is_idempotent() {
        let entries = balanced_shift();
        assert_eq!(compute_totals(&entries), compute_totals(&entries));
    }

    #[test]
    fn multiple_deposits_and_vouchers_sum() {
        let mut entries = balanced_shift();
        entries.vouchers = vouchers(&[dec!(30000), dec!(20000)]);
        entries.deposits = deposits(&[dec!(500000), dec!(330000)]);

        let totals = compute_totals(&entries);
        assert_eq!(totals.total_non_cash, dec!(370000));
        assert_eq!(totals.actual_cash, dec!(830000));
        assert_eq!(totals.difference, Decimal::ZERO);
    }

    #[test]
    fn negative_amounts_flow_through_unclamped() {
        let entries = ShiftEntries {
            fuel_sales: dec!(-1000),
            deposits: deposits(&[dec!(-500)]),
            ..ShiftEntries::default()
        };

        let totals = compute_totals(&entries);
        assert_eq!(totals.total_revenue, dec!(-1000));
        assert_eq!(totals.expected_cash, dec!(-1000));
        assert_eq!(totals.actual_cash, dec!(-500));
        assert_eq!(totals.difference, dec!(500));
    }

    #[test]
    fn unknown_expense_keys_pass_through_and_count() {
        let mut entries = ShiftEntries {
            fuel_sales: dec!(100000),
            ..ShiftEntries::default()
        };
        entries.expenses.set("nuevoConvenio", dec!(10000));

        let totals = compute_totals(&entries);
        assert_eq!(totals.total_non_cash, dec!(10000));
        assert_eq!(totals.expected_cash, dec!(90000));
    }

    #[test]
    fn coercion_treats_garbage_as_zero() {
        assert_eq!(coerce_amount(&json!(12_500)), dec!(12500));
        assert_eq!(coerce_amount(&json!("12500")), dec!(12500));
        assert_eq!(coerce_amount(&json!(" 300 ")), dec!(300));
        assert_eq!(coerce_amount(&json!("")), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!("abc")), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!(null)), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!(true)), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!({"x": 1})), Decimal::ZERO);
    }

    #[test]
    fn entries_deserialize_leniently_from_form_shaped_json() {
        let entries: ShiftEntries = serde_json::from_value(json!({
            "fuel_sales": "1000000",
            "store_sales": null,
            "card_total": "not a number",
            "vouchers": [{ "amount": "50000", "reference": "ShellCard 443" }],
            "expenses": { "turnoExtra": 20000, "perrosMuertos": "", "nuevoConvenio": "77" },
            "deposits": [{ "amount": 830000, "reference": "Bolsa 1" }]
        }))
        .expect("lenient deserialization never fails on bad amounts");

        assert_eq!(entries.fuel_sales, dec!(1000000));
        assert_eq!(entries.store_sales, Decimal::ZERO);
        assert_eq!(entries.card_total, Decimal::ZERO);
        assert_eq!(entries.vouchers[0].amount, dec!(50000));
        assert_eq!(entries.expenses.get(EXPENSE_EXTRA_SHIFT), dec!(20000));
        assert_eq!(entries.expenses.get(EXPENSE_FUEL_LOSS), Decimal::ZERO);
        assert_eq!(entries.expenses.get("nuevoConvenio"), dec!(77));
        assert_eq!(entries.deposits[0].amount, dec!(830000));
    }

    #[test]
    fn missing_fields_default_to_empty_and_zero() {
        let entries: ShiftEntries = serde_json::from_value(json!({})).unwrap();
        assert_eq!(entries, ShiftEntries::default());
        assert_eq!(compute_totals(&entries), ShiftTotals::default());
    }

    #[test]
    fn expense_map_round_trips_as_plain_object() {
        let mut expenses = ExpenseMap::new();
        expenses.set(EXPENSE_INTERNAL_FUEL, dec!(4500));
        expenses.set(EXPENSE_OTHER, dec!(1200));

        let value = serde_json::to_value(&expenses).unwrap();
        assert_eq!(value, json!({ "bencinaEnzo": 4500.0, "otros": 1200.0 }));

        let back: ExpenseMap = serde_json::from_value(value).unwrap();
        assert_eq!(back, expenses);
    }

    #[test]
    fn totals_serialize_as_json_numbers() {
        let totals = compute_totals(&balanced_shift());
        let value = serde_json::to_value(totals).unwrap();

        assert!(value["total_revenue"].is_number());
        assert!(value["expected_cash"].is_number());
        assert_eq!(value["total_revenue"], json!(1200000.0));
        assert_eq!(value["difference"], json!(0.0));
    }

    #[test]
    fn entry_amounts_serialize_as_json_numbers() {
        let entries = balanced_shift();
        let value = serde_json::to_value(&entries).unwrap();

        assert_eq!(value["fuel_sales"], json!(1000000.0));
        assert_eq!(value["vouchers"][0]["amount"], json!(50000.0));
        assert_eq!(value["deposits"][0]["amount"], json!(830000.0));
        assert_eq!(value["expenses"]["turnoExtra"], json!(20000.0));
    }
}
