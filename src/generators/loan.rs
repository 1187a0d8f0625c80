// 🏠 Loan Generator - loans plus their full amortization schedules
//
// A loan needs both a customer and one of that customer's accounts;
// customers without accounts get no loans. Each loan emits a payment row
// per month of its term, walking the amortization so the schedule sums back
// to the principal.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{fmt_date, pick, random_id, round2, round4, unique_id, weighted_pick};
use crate::config::FanOut;
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Account, Customer, Loan, LoanPayment, TableKind};
use crate::vocab;

pub struct LoanGenerator {
    fan_out: FanOut,
    today: NaiveDate,
}

impl LoanGenerator {
    pub fn new(fan_out: FanOut, today: NaiveDate) -> Self {
        LoanGenerator { fan_out, today }
    }

    pub fn generate(
        &self,
        customers: &[Customer],
        accounts: &[Account],
        rng: &mut ChaCha8Rng,
        loan_injector: &mut DefectInjector,
        payment_injector: &mut DefectInjector,
    ) -> (Vec<Loan>, Vec<LoanPayment>) {
        let mut loans = Vec::new();
        let mut payments = Vec::new();
        let mut loan_ids = HashSet::new();

        for customer in customers {
            let owned: Vec<&Account> = accounts
                .iter()
                .filter(|a| a.customer_id == customer.customer_id)
                .collect();
            let count = self.fan_out.sample(rng);
            if owned.is_empty() || count == 0 {
                continue;
            }

            for _ in 0..count {
                let account = owned[rng.gen_range(0..owned.len())];
                let loan_id = unique_id(rng, &mut loan_ids, "LN", 1_000_000, 9_999_999);
                let mut loan = build_loan(
                    rng,
                    self.today,
                    loan_id,
                    customer.customer_id.clone(),
                    account.account_id.clone(),
                );
                loan_injector.maybe_corrupt(&mut loan, rng);

                // Schedule only when the pricing fields survived corruption.
                if loan.interest_rate.is_some()
                    && loan.term_months.is_some()
                    && loan.monthly_payment.is_some()
                {
                    schedule_payments(rng, &loan, payment_injector, &mut payments);
                }

                loans.push(loan);
            }
        }

        (loans, payments)
    }
}

/// Build one clean loan for an existing customer/account pair.
pub fn synthesize(
    rng: &mut ChaCha8Rng,
    today: NaiveDate,
    customer_id: &str,
    account_id: &str,
) -> Loan {
    let loan_id = random_id(rng, "LN", 1_000_000, 9_999_999);
    build_loan(
        rng,
        today,
        loan_id,
        customer_id.to_string(),
        account_id.to_string(),
    )
}

fn build_loan(
    rng: &mut ChaCha8Rng,
    today: NaiveDate,
    loan_id: String,
    customer_id: String,
    account_id: String,
) -> Loan {
    let loan_type = pick(rng, vocab::LOAN_TYPES);
    let credit_score = rng.gen_range(600..=850);
    let amount = loan_amount(rng, loan_type);
    let term_months = pick(rng, vocab::LOAN_TERMS);
    let rate = interest_rate(rng, loan_type, credit_score);
    let monthly = monthly_payment(amount, rate, term_months);

    let start = today - Duration::days(rng.gen_range(0..=365 * 5));
    let end = start + Duration::days(i64::from(term_months) * 30);

    Loan {
        loan_id,
        customer_id,
        account_id,
        loan_type: Some(loan_type.to_string()),
        loan_amount: amount,
        interest_rate: Some(rate),
        term_months: Some(term_months),
        start_date: fmt_date(start),
        end_date: fmt_date(end),
        monthly_payment: Some(monthly),
        remaining_balance: amount,
        status: weighted_pick(rng, vocab::LOAN_STATUS, &[0.6, 0.2, 0.05, 0.1, 0.04, 0.01])
            .to_string(),
        interest_type: pick(rng, vocab::INTEREST_TYPES).to_string(),
        created_at: format!("{} 00:00:00", fmt_date(start)),
        is_bad_data: false,
        bad_data_type: None,
    }
}

fn loan_amount(rng: &mut ChaCha8Rng, loan_type: &str) -> f64 {
    let value = match loan_type {
        "Personal Loan" => rng.gen_range(1_000.0..=50_000.0),
        "Auto Loan" => rng.gen_range(5_000.0..=100_000.0),
        "Home Loan" => rng.gen_range(100_000.0..=1_000_000.0),
        "Mortgage" => rng.gen_range(150_000.0..=2_000_000.0),
        _ => rng.gen_range(5_000.0..=250_000.0),
    };
    round2(value)
}

/// Annual rate shaped by loan type and credit score, floored at 2%.
fn interest_rate(rng: &mut ChaCha8Rng, loan_type: &str, credit_score: u32) -> f64 {
    let mut rate: f64 = 0.05;

    rate -= match credit_score {
        750..=850 => 0.02,
        700..=749 => 0.015,
        650..=699 => 0.01,
        600..=649 => 0.005,
        _ => 0.0,
    };

    rate += match loan_type {
        "Home Loan" | "Mortgage" => 0.01,
        "Personal Loan" => 0.03,
        _ => 0.0,
    };

    rate += rng.gen_range(-0.005..=0.005);
    round4(rate.max(0.02))
}

/// Standard amortization formula; falls back to straight division when the
/// rate rounds to zero.
pub(crate) fn monthly_payment(principal: f64, annual_rate: f64, months: u32) -> f64 {
    let months = months.max(1);
    if principal <= 0.0 {
        return 0.0;
    }
    if annual_rate <= 0.0 {
        return round2(principal / f64::from(months));
    }

    let monthly_rate = annual_rate / 12.0;
    let factor = (1.0 + monthly_rate).powi(months as i32);
    round2(principal * (monthly_rate * factor) / (factor - 1.0))
}

fn schedule_payments(
    rng: &mut ChaCha8Rng,
    loan: &Loan,
    injector: &mut DefectInjector,
    payments: &mut Vec<LoanPayment>,
) {
    let principal = loan.loan_amount;
    let term = loan.term_months.unwrap_or(12).max(1);
    let monthly_rate = loan.interest_rate.unwrap_or(0.05) / 12.0;
    let mut payment_amount = loan
        .monthly_payment
        .unwrap_or_else(|| round2(principal / f64::from(term)));

    let mut due = NaiveDate::parse_from_str(&loan.start_date, super::DATE_FMT)
        .unwrap_or_else(|_| NaiveDate::default());
    let mut remaining = principal;

    for number in 1..=term {
        let interest = round2(remaining * monthly_rate);
        let mut principal_part = round2((payment_amount - interest).min(remaining));
        if number == term {
            // Final payment clears whatever is left.
            principal_part = round2(remaining);
            payment_amount = round2(principal_part + interest);
        }
        remaining = round2((remaining - principal_part).max(0.0));

        let mut payment = LoanPayment {
            payment_id: format!(
                "PAY{}{:03}{}",
                loan.loan_id.trim_start_matches("LN"),
                number,
                loan.customer_id.trim_start_matches('C')
            ),
            loan_id: loan.loan_id.clone(),
            customer_id: loan.customer_id.clone(),
            payment_number: number,
            payment_date: fmt_date(due),
            due_date: fmt_date(due),
            amount_due: Some(payment_amount),
            principal_amount: Some(principal_part),
            interest_amount: Some(interest),
            total_paid: 0.0,
            status: "Pending".to_string(),
            created_at: format!("{} 00:00:00", fmt_date(due)),
            is_bad_data: false,
            bad_data_type: None,
        };

        // Settle most payments: 70% on time, 15% late, 10% missed, 5% partial.
        let roll = rng.gen::<f64>();
        if roll < 0.70 {
            payment.total_paid = payment_amount;
            payment.status = "Paid".to_string();
        } else if roll < 0.85 {
            payment.total_paid = round2(payment_amount * rng.gen_range(0.5..=0.95));
            payment.status = "Late".to_string();
        } else if roll < 0.95 {
            payment.total_paid = 0.0;
            payment.status = "Missed".to_string();
        } else {
            payment.total_paid = round2(payment_amount * rng.gen_range(0.1..=0.5));
            payment.status = "Partial".to_string();
        }

        injector.maybe_corrupt(&mut payment, rng);
        payments.push(payment);
        due += Duration::days(30);
    }
}

// ============================================================================
// CORRUPTION
// ============================================================================

impl Corruptible for Loan {
    const TABLE: TableKind = TableKind::Loans;
    const SUPPORTED: &'static [DefectClass] = &DefectClass::ALL;

    fn record_id(&self) -> &str {
        &self.loan_id
    }

    fn mark(&mut self, class: DefectClass) {
        self.is_bad_data = true;
        self.bad_data_type = Some(class);
    }

    fn corrupt(&mut self, class: DefectClass, rng: &mut ChaCha8Rng) {
        match class {
            DefectClass::MissingData => {
                let mut slots = [0usize, 1, 2, 3];
                slots.shuffle(rng);
                for slot in slots.iter().take(2) {
                    match slot {
                        0 => self.interest_rate = None,
                        1 => self.term_months = None,
                        2 => self.monthly_payment = None,
                        _ => self.loan_type = None,
                    }
                }
            }
            DefectClass::InvalidFormat => {
                // Rate nobody would quote, but still a decimal.
                self.interest_rate = Some(999.9999);
            }
            DefectClass::OutOfRange => {
                self.interest_rate = Some(round4(rng.gen_range(-0.1..=-0.01)));
            }
            DefectClass::InconsistentData => {
                // Payment far too small to ever amortize the principal.
                self.monthly_payment = Some(round2(self.loan_amount * 0.01 / 12.0));
            }
            DefectClass::MalformedData => {
                let payload = pick(rng, vocab::ADVERSARIAL_PAYLOADS);
                if rng.gen_bool(0.5) {
                    match &mut self.loan_type {
                        Some(loan_type) => loan_type.push_str(payload),
                        None => self.status.push_str(payload),
                    }
                } else {
                    self.status.push_str(payload);
                }
            }
        }
    }
}

impl Corruptible for LoanPayment {
    const TABLE: TableKind = TableKind::LoanPayments;
    const SUPPORTED: &'static [DefectClass] = &[
        DefectClass::MissingData,
        DefectClass::InvalidFormat,
        DefectClass::OutOfRange,
        DefectClass::InconsistentData,
    ];

    fn record_id(&self) -> &str {
        &self.payment_id
    }

    fn mark(&mut self, class: DefectClass) {
        self.is_bad_data = true;
        self.bad_data_type = Some(class);
    }

    fn corrupt(&mut self, class: DefectClass, rng: &mut ChaCha8Rng) {
        match class {
            DefectClass::MissingData => {
                let mut slots = [0usize, 1, 2];
                slots.shuffle(rng);
                for slot in slots.iter().take(2) {
                    match slot {
                        0 => self.amount_due = None,
                        1 => self.principal_amount = None,
                        _ => self.interest_amount = None,
                    }
                }
            }
            DefectClass::InvalidFormat => {
                self.due_date = "9999-12-31".to_string();
            }
            DefectClass::OutOfRange => {
                // Paid double what was due.
                self.total_paid = round2(self.amount_due.unwrap_or(5_000.0) * 2.0);
            }
            DefectClass::InconsistentData => {
                // Settled in full yet marked late.
                if let Some(due) = self.amount_due {
                    self.total_paid = due;
                }
                self.status = "Late".to_string();
            }
            DefectClass::MalformedData => {}
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::account::AccountGenerator;
    use crate::generators::customer::CustomerGenerator;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_monthly_payment_amortizes() {
        // 100k at 6% over 360 months is about 599.55.
        let payment = monthly_payment(100_000.0, 0.06, 360);
        assert!((payment - 599.55).abs() < 0.5, "got {payment}");

        // Zero rate degrades to straight division.
        assert_eq!(monthly_payment(12_000.0, 0.0, 12), 1_000.0);
    }

    #[test]
    fn test_schedule_principal_sums_to_loan_amount() {
        let mut rng = ChaCha8Rng::seed_from_u64(81);
        let loan = synthesize(&mut rng, today(), "C12345678", "ACC1234567");
        let mut payments = Vec::new();
        schedule_payments(&mut rng, &loan, &mut DefectInjector::disabled(), &mut payments);

        assert_eq!(payments.len(), loan.term_months.unwrap() as usize);
        let principal_total: f64 = payments.iter().filter_map(|p| p.principal_amount).sum();
        assert!(
            (principal_total - loan.loan_amount).abs() < 1.0,
            "principal {principal_total} vs loan {}",
            loan.loan_amount
        );
    }

    #[test]
    fn test_customers_without_accounts_get_no_loans() {
        let mut rng = ChaCha8Rng::seed_from_u64(82);
        let (customers, _) = CustomerGenerator::new(10, today()).generate(
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );
        let (loans, payments) = LoanGenerator::new(FanOut::new(1, 2), today()).generate(
            &customers,
            &[],
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );
        assert!(loans.is_empty());
        assert!(payments.is_empty());
    }

    #[test]
    fn test_payments_link_back_to_their_loan() {
        let mut rng = ChaCha8Rng::seed_from_u64(83);
        let (customers, _) = CustomerGenerator::new(15, today()).generate(
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );
        let accounts = AccountGenerator::new(FanOut::new(1, 2), today()).generate(
            &customers,
            &mut rng,
            &mut DefectInjector::disabled(),
        );
        let (loans, payments) = LoanGenerator::new(FanOut::new(1, 1), today()).generate(
            &customers,
            &accounts,
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );

        let loan_ids: HashSet<&str> = loans.iter().map(|l| l.loan_id.as_str()).collect();
        assert!(!payments.is_empty());
        for payment in &payments {
            assert!(loan_ids.contains(payment.loan_id.as_str()));
        }
    }
}
