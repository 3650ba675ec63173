use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::AggregateRoot;
use crate::shared::money::{is_zero, round_money};
use crate::shared::validation::validate_positive_amount;

// ============================================================================
// Payment method
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    EWallet,
    Card,
}

impl PaymentMethod {
    pub fn all() -> Vec<PaymentMethod> {
        vec![
            PaymentMethod::Cash,
            PaymentMethod::BankTransfer,
            PaymentMethod::EWallet,
            PaymentMethod::Card,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::EWallet => "e_wallet",
            PaymentMethod::Card => "card",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|m| m.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::EWallet => "E-wallet",
            PaymentMethod::Card => "Card",
        }
    }

    /// Non-cash payments must carry a transaction/reference number
    pub fn requires_reference(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

// ============================================================================
// Discount
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    #[default]
    None,
    Percent(f64),
    Fixed(f64),
}

impl Discount {
    /// Amount taken off `subtotal`, capped so the total never goes negative
    pub fn amount_for(&self, subtotal: f64) -> f64 {
        let raw = match self {
            Discount::None => 0.0,
            Discount::Percent(p) => subtotal * p.clamp(0.0, 100.0) / 100.0,
            Discount::Fixed(v) => v.max(0.0),
        };
        round_money(raw.min(subtotal.max(0.0)))
    }

    pub fn validate(&self, subtotal: f64) -> Result<(), String> {
        match *self {
            Discount::None => Ok(()),
            Discount::Percent(p) if !(0.0..=100.0).contains(&p) => {
                Err("Discount percent must be between 0 and 100".into())
            }
            Discount::Fixed(v) if v < 0.0 || v.is_nan() => {
                Err("Discount amount cannot be negative".into())
            }
            Discount::Fixed(v) if v > subtotal + 0.005 => {
                Err("Discount cannot exceed the subtotal".into())
            }
            _ => Ok(()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Discount::None => "No discount".into(),
            Discount::Percent(p) => format!("{}%", p),
            Discount::Fixed(v) => format!("{:.2} off", v),
        }
    }
}

// ============================================================================
// Lines and payments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingLine {
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub paid_at: DateTime<Utc>,
    /// Name of the staff member who recorded the payment
    pub received_by: Option<String>,
}

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    Unpaid,
    PartiallyPaid,
    FullyPaid,
}

impl BillingStatus {
    pub fn all() -> Vec<BillingStatus> {
        vec![
            BillingStatus::Unpaid,
            BillingStatus::PartiallyPaid,
            BillingStatus::FullyPaid,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            BillingStatus::Unpaid => "unpaid",
            BillingStatus::PartiallyPaid => "partially_paid",
            BillingStatus::FullyPaid => "fully_paid",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillingStatus::Unpaid => "Unpaid",
            BillingStatus::PartiallyPaid => "Partially paid",
            BillingStatus::FullyPaid => "Fully paid",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            BillingStatus::Unpaid => "badge badge--error",
            BillingStatus::PartiallyPaid => "badge badge--warning",
            BillingStatus::FullyPaid => "badge badge--success",
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Money owed for one booking: package, add-ons, discount and payments received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billing {
    pub id: String,
    pub booking_id: String,
    pub booking_code: String,
    pub client_id: String,
    pub client_name: String,
    pub event_date: NaiveDate,
    pub package_name: String,
    pub package_price: f64,
    #[serde(default)]
    pub add_ons: Vec<BillingLine>,
    #[serde(default)]
    pub discount: Discount,
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Falls back to the event date when absent
    pub due_date: Option<NaiveDate>,
}

impl Billing {
    pub fn add_ons_total(&self) -> f64 {
        round_money(self.add_ons.iter().map(|l| l.amount).sum())
    }

    pub fn subtotal(&self) -> f64 {
        round_money(self.package_price + self.add_ons_total())
    }

    pub fn discount_amount(&self) -> f64 {
        self.discount.amount_for(self.subtotal())
    }

    pub fn total(&self) -> f64 {
        round_money((self.subtotal() - self.discount_amount()).max(0.0))
    }

    pub fn amount_paid(&self) -> f64 {
        round_money(self.payments.iter().map(|p| p.amount).sum())
    }

    /// Overpayment is reported as zero balance
    pub fn balance(&self) -> f64 {
        round_money((self.total() - self.amount_paid()).max(0.0))
    }

    pub fn status(&self) -> BillingStatus {
        if is_zero(self.balance()) {
            BillingStatus::FullyPaid
        } else if is_zero(self.amount_paid()) {
            BillingStatus::Unpaid
        } else {
            BillingStatus::PartiallyPaid
        }
    }

    pub fn effective_due_date(&self) -> NaiveDate {
        self.due_date.unwrap_or(self.event_date)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status() != BillingStatus::FullyPaid && self.effective_due_date() < today
    }

    pub fn last_payment(&self) -> Option<&Payment> {
        self.payments.iter().max_by_key(|p| p.paid_at)
    }

    pub fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        needle.is_empty()
            || self.booking_code.to_lowercase().contains(&needle)
            || self.client_name.to_lowercase().contains(&needle)
            || self.package_name.to_lowercase().contains(&needle)
    }
}

impl AggregateRoot for Billing {
    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.booking_code
    }

    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn entity_key() -> &'static str {
        "billing"
    }

    fn collection_name() -> &'static str {
        "billings"
    }

    fn element_name() -> &'static str {
        "Billing"
    }

    fn list_name() -> &'static str {
        "Billings"
    }
}

/// Sums shown in the list footer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BillingTotals {
    pub total: f64,
    pub paid: f64,
    pub balance: f64,
}

impl BillingTotals {
    pub fn of<'a>(billings: impl IntoIterator<Item = &'a Billing>) -> Self {
        let t = billings.into_iter().fold(Self::default(), |acc, b| Self {
            total: acc.total + b.total(),
            paid: acc.paid + b.amount_paid(),
            balance: acc.balance + b.balance(),
        });
        Self {
            total: round_money(t.total),
            paid: round_money(t.paid),
            balance: round_money(t.balance),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDto {
    pub billing_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

impl PaymentDto {
    pub fn new(billing_id: &str) -> Self {
        Self {
            billing_id: billing_id.to_string(),
            amount: 0.0,
            method: PaymentMethod::Cash,
            reference: None,
        }
    }

    pub fn validate(&self, balance: f64) -> Result<(), String> {
        if is_zero(balance) {
            return Err("This billing is already fully paid".into());
        }
        validate_positive_amount(self.amount, "Payment amount")?;
        if round_money(self.amount) > round_money(balance) {
            return Err(format!(
                "Payment amount cannot exceed the balance of {:.2}",
                balance
            ));
        }
        let has_reference = self
            .reference
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false);
        if self.method.requires_reference() && !has_reference {
            return Err(format!(
                "Reference number is required for {} payments",
                self.method.label().to_lowercase()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDiscountDto {
    pub billing_id: String,
    pub discount: Discount,
}

impl UpdateDiscountDto {
    pub fn validate(&self, subtotal: f64) -> Result<(), String> {
        self.discount.validate(subtotal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(amount: f64, day: u32) -> Payment {
        Payment {
            id: format!("pay-{}", day),
            amount,
            method: PaymentMethod::Cash,
            reference: None,
            paid_at: Utc.with_ymd_and_hms(2026, 10, day, 9, 0, 0).unwrap(),
            received_by: Some("Sam".into()),
        }
    }

    fn billing() -> Billing {
        Billing {
            id: "bill-1".into(),
            booking_id: "b1".into(),
            booking_code: "BK-0001".into(),
            client_id: "c1".into(),
            client_name: "Ana Cruz".into(),
            event_date: date(2026, 11, 14),
            package_name: "Gold".into(),
            package_price: 40_000.0,
            add_ons: vec![
                BillingLine {
                    description: "Drone".into(),
                    amount: 5_000.0,
                },
                BillingLine {
                    description: "Photo booth".into(),
                    amount: 5_000.0,
                },
            ],
            discount: Discount::None,
            payments: vec![],
            due_date: None,
        }
    }

    #[test]
    fn totals_and_status() {
        let mut b = billing();
        assert_eq!(b.subtotal(), 50_000.0);
        assert_eq!(b.total(), 50_000.0);
        assert_eq!(b.status(), BillingStatus::Unpaid);

        b.discount = Discount::Percent(10.0);
        assert_eq!(b.discount_amount(), 5_000.0);
        assert_eq!(b.total(), 45_000.0);

        b.payments.push(payment(20_000.0, 1));
        assert_eq!(b.balance(), 25_000.0);
        assert_eq!(b.status(), BillingStatus::PartiallyPaid);

        b.payments.push(payment(25_000.0, 10));
        assert_eq!(b.status(), BillingStatus::FullyPaid);
        assert_eq!(b.last_payment().map(|p| p.id.as_str()), Some("pay-10"));
    }

    #[test]
    fn discount_never_makes_total_negative() {
        let mut b = billing();
        b.discount = Discount::Fixed(80_000.0);
        assert_eq!(b.discount_amount(), 50_000.0);
        assert_eq!(b.total(), 0.0);
        assert_eq!(b.status(), BillingStatus::FullyPaid);
    }

    #[test]
    fn overpayment_leaves_zero_balance() {
        let mut b = billing();
        b.payments.push(payment(60_000.0, 2));
        assert_eq!(b.balance(), 0.0);
    }

    #[test]
    fn overdue_uses_event_date_by_default() {
        let mut b = billing();
        assert!(!b.is_overdue(date(2026, 11, 14)));
        assert!(b.is_overdue(date(2026, 11, 15)));
        b.due_date = Some(date(2026, 12, 31));
        assert!(!b.is_overdue(date(2026, 11, 15)));
        b.payments.push(payment(50_000.0, 3));
        assert!(!b.is_overdue(date(2027, 1, 1)));
    }

    #[test]
    fn payment_validation() {
        let mut dto = PaymentDto::new("bill-1");
        assert_eq!(
            dto.validate(1_000.0),
            Err("Payment amount must be greater than zero".to_string())
        );

        dto.amount = 1_500.0;
        assert_eq!(
            dto.validate(1_000.0),
            Err("Payment amount cannot exceed the balance of 1000.00".to_string())
        );

        dto.amount = 1_000.0;
        assert!(dto.validate(1_000.0).is_ok());

        dto.method = PaymentMethod::BankTransfer;
        assert_eq!(
            dto.validate(1_000.0),
            Err("Reference number is required for bank transfer payments".to_string())
        );
        dto.reference = Some("TRX-99812".into());
        assert!(dto.validate(1_000.0).is_ok());

        assert!(dto.validate(0.0).is_err());
    }

    #[test]
    fn discount_validation() {
        let upd = |discount| UpdateDiscountDto {
            billing_id: "bill-1".into(),
            discount,
        };
        assert!(upd(Discount::Percent(100.0)).validate(50_000.0).is_ok());
        assert!(upd(Discount::Percent(120.0)).validate(50_000.0).is_err());
        assert!(upd(Discount::Fixed(-1.0)).validate(50_000.0).is_err());
        assert!(upd(Discount::Fixed(50_001.0)).validate(50_000.0).is_err());
        assert!(upd(Discount::None).validate(0.0).is_ok());
    }

    #[test]
    fn discount_wire_format() {
        let json = serde_json::to_value(Discount::Percent(15.0)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "percent", "value": 15.0}));
        let none: Discount = serde_json::from_str(r#"{"kind":"none"}"#).unwrap();
        assert_eq!(none, Discount::None);
    }

    #[test]
    fn list_totals() {
        let mut paid = billing();
        paid.payments.push(payment(50_000.0, 5));
        let totals = BillingTotals::of(&[billing(), paid]);
        assert_eq!(totals.total, 100_000.0);
        assert_eq!(totals.paid, 50_000.0);
        assert_eq!(totals.balance, 50_000.0);
    }
}
