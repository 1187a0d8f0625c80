// 🏦 Entity Model - typed records for every table in the synthetic bank
//
// Each record carries a stable synthetic id, the foreign keys wiring it to
// its parents, and the two corruption bookkeeping fields (`is_bad_data`,
// `bad_data_type`). Fields that the missing-data defect class may blank out
// are Options; everything else is concrete.
//
// Dates and timestamps are kept as display strings ("%Y-%m-%d" and
// "%Y-%m-%d %H:%M:%S") so that corrupted values like "2024/13/45" remain
// representable, the same way the transaction store keeps them.

use serde::{Deserialize, Serialize};

use crate::corruption::DefectClass;

// ============================================================================
// TABLE TAGS
// ============================================================================

/// Tag for every table the generator produces, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    Customers,
    CustomerDetails,
    Branches,
    Merchants,
    ExchangeRates,
    Accounts,
    Employees,
    Cards,
    Transactions,
    Loans,
    LoanPayments,
    AuditLogs,
    InvestmentAccounts,
    FraudAlerts,
    UserLogins,
}

impl TableKind {
    /// All tables, in the order the orchestrator generates them.
    pub const ALL: [TableKind; 15] = [
        TableKind::Customers,
        TableKind::CustomerDetails,
        TableKind::Branches,
        TableKind::Merchants,
        TableKind::ExchangeRates,
        TableKind::Accounts,
        TableKind::Employees,
        TableKind::Cards,
        TableKind::Transactions,
        TableKind::Loans,
        TableKind::LoanPayments,
        TableKind::AuditLogs,
        TableKind::InvestmentAccounts,
        TableKind::FraudAlerts,
        TableKind::UserLogins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Customers => "customers",
            TableKind::CustomerDetails => "customer_details",
            TableKind::Branches => "branches",
            TableKind::Merchants => "merchants",
            TableKind::ExchangeRates => "exchange_rates",
            TableKind::Accounts => "accounts",
            TableKind::Employees => "employees",
            TableKind::Cards => "cards",
            TableKind::Transactions => "transactions",
            TableKind::Loans => "loans",
            TableKind::LoanPayments => "loan_payments",
            TableKind::AuditLogs => "audit_logs",
            TableKind::InvestmentAccounts => "investment_accounts",
            TableKind::FraudAlerts => "fraud_alerts",
            TableKind::UserLogins => "user_logins",
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ENTITIES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

/// 1:1 companion row for a customer (employment and income profile).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetail {
    pub detail_id: String,
    pub customer_id: String,
    pub employment_status: Option<String>,
    pub annual_income: Option<f64>,
    pub credit_score: Option<i64>,
    pub marital_status: String,
    pub education_level: String,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub customer_id: String,
    pub account_number: Option<String>,
    pub account_type: String,
    pub balance: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub opened_date: String,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub card_id: String,
    pub customer_id: String,
    pub account_id: String,
    pub card_number: Option<String>,
    pub card_type: String,
    pub card_network: String,
    /// "MM/YY"
    pub expiration_date: Option<String>,
    pub cvv: Option<String>,
    pub credit_limit: Option<f64>,
    pub status: String,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub account_id: String,
    /// Present only for card-present transaction types.
    pub card_id: Option<String>,
    pub transaction_type: String,
    pub amount: Option<f64>,
    pub currency: String,
    pub transaction_date: Option<String>,
    pub transaction_time: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub branch_id: String,
    pub branch_name: String,
    pub branch_code: String,
    pub branch_type: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub manager_name: Option<String>,
    pub opening_date: String,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub branch_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_extension: Option<String>,
    pub role: String,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub hire_date: String,
    /// Self-reference; None for the top of the hierarchy.
    pub manager_id: Option<String>,
    pub status: String,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: String,
    pub customer_id: String,
    pub account_id: String,
    pub loan_type: Option<String>,
    pub loan_amount: f64,
    pub interest_rate: Option<f64>,
    pub term_months: Option<u32>,
    pub start_date: String,
    pub end_date: String,
    pub monthly_payment: Option<f64>,
    pub remaining_balance: f64,
    pub status: String,
    pub interest_type: String,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPayment {
    pub payment_id: String,
    pub loan_id: String,
    pub customer_id: String,
    pub payment_number: u32,
    pub payment_date: String,
    pub due_date: String,
    pub amount_due: Option<f64>,
    pub principal_amount: Option<f64>,
    pub interest_amount: Option<f64>,
    pub total_paid: f64,
    pub status: String,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Merchant {
    pub merchant_id: String,
    pub merchant_name: String,
    pub category: Option<String>,
    pub mcc_code: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: String,
    pub status: String,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

/// One audited action by a customer or an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub audit_id: String,
    pub user_id: String,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub action_date: String,
    pub action_time: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status_code: Option<String>,
    pub action_details: Option<String>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub rate_id: String,
    pub base_currency: String,
    pub target_currency: String,
    pub buy_rate: Option<f64>,
    pub sell_rate: Option<f64>,
    pub mid_rate: Option<f64>,
    pub rate_date: String,
    pub source: String,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudAlert {
    pub alert_id: String,
    pub transaction_id: String,
    pub account_id: String,
    pub customer_id: String,
    pub alert_timestamp: String,
    pub detection_method: Option<String>,
    pub fraud_reason: Option<String>,
    pub fraud_type: String,
    pub severity: Option<String>,
    pub severity_score: i64,
    pub alert_status: String,
    pub financial_loss: Option<f64>,
    pub is_false_positive: bool,
    pub resolution_date: Option<String>,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLogin {
    pub login_id: String,
    pub customer_id: String,
    pub login_timestamp: String,
    pub ip_address: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub operating_system: String,
    pub login_method: String,
    pub login_status: String,
    pub failure_reason: Option<String>,
    pub session_duration_minutes: Option<i64>,
    pub geolocation: Option<String>,
    pub is_vpn_used: bool,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentAccount {
    pub investment_account_id: String,
    pub customer_id: String,
    pub account_id: String,
    pub investment_type: Option<String>,
    pub risk_tolerance: Option<String>,
    pub account_status: String,
    pub investment_strategy: String,
    pub primary_asset_class: String,
    pub opening_date: String,
    pub current_balance: f64,
    pub total_deposits: f64,
    pub ytd_return_rate: f64,
    pub annual_return_rate: f64,
    pub management_fee_rate: Option<f64>,
    pub total_value: f64,
    pub is_managed_account: bool,
    pub created_at: String,
    pub is_bad_data: bool,
    pub bad_data_type: Option<DefectClass>,
}

// ============================================================================
// DATASET
// ============================================================================

/// The full entity graph produced by one generation pass.
///
/// Tables are typed vectors in insertion order; `rows_for` flattens a table
/// into field-name/value records for external serializers.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub customer_details: Vec<CustomerDetail>,
    pub branches: Vec<Branch>,
    pub merchants: Vec<Merchant>,
    pub exchange_rates: Vec<ExchangeRate>,
    pub accounts: Vec<Account>,
    pub employees: Vec<Employee>,
    pub cards: Vec<Card>,
    pub transactions: Vec<Transaction>,
    pub loans: Vec<Loan>,
    pub loan_payments: Vec<LoanPayment>,
    pub audit_logs: Vec<AuditLog>,
    pub investment_accounts: Vec<InvestmentAccount>,
    pub fraud_alerts: Vec<FraudAlert>,
    pub user_logins: Vec<UserLogin>,
}

macro_rules! per_table {
    ($self:ident, $kind:ident, $records:ident => $body:expr) => {
        match $kind {
            TableKind::Customers => {
                let $records = &$self.customers;
                $body
            }
            TableKind::CustomerDetails => {
                let $records = &$self.customer_details;
                $body
            }
            TableKind::Branches => {
                let $records = &$self.branches;
                $body
            }
            TableKind::Merchants => {
                let $records = &$self.merchants;
                $body
            }
            TableKind::ExchangeRates => {
                let $records = &$self.exchange_rates;
                $body
            }
            TableKind::Accounts => {
                let $records = &$self.accounts;
                $body
            }
            TableKind::Employees => {
                let $records = &$self.employees;
                $body
            }
            TableKind::Cards => {
                let $records = &$self.cards;
                $body
            }
            TableKind::Transactions => {
                let $records = &$self.transactions;
                $body
            }
            TableKind::Loans => {
                let $records = &$self.loans;
                $body
            }
            TableKind::LoanPayments => {
                let $records = &$self.loan_payments;
                $body
            }
            TableKind::AuditLogs => {
                let $records = &$self.audit_logs;
                $body
            }
            TableKind::InvestmentAccounts => {
                let $records = &$self.investment_accounts;
                $body
            }
            TableKind::FraudAlerts => {
                let $records = &$self.fraud_alerts;
                $body
            }
            TableKind::UserLogins => {
                let $records = &$self.user_logins;
                $body
            }
        }
    };
}

impl Dataset {
    /// Number of records in a table.
    pub fn len_of(&self, kind: TableKind) -> usize {
        per_table!(self, kind, records => records.len())
    }

    /// Number of records flagged as corrupted in a table.
    pub fn bad_count_of(&self, kind: TableKind) -> usize {
        per_table!(self, kind, records => records.iter().filter(|r| r.is_bad_data).count())
    }

    /// Total records across all tables.
    pub fn total_records(&self) -> usize {
        TableKind::ALL.iter().map(|k| self.len_of(*k)).sum()
    }

    /// Table rows as field-name/value JSON objects, in insertion order.
    /// This is the handoff shape consumed by serializers and importers.
    pub fn rows_for(&self, kind: TableKind) -> Vec<serde_json::Value> {
        per_table!(self, kind, records => records
            .iter()
            .map(|r| serde_json::to_value(r).unwrap_or(serde_json::Value::Null))
            .collect())
    }

    /// Rows flagged as corrupted, serialized; used for report examples.
    pub fn bad_rows_for(&self, kind: TableKind, limit: usize) -> Vec<serde_json::Value> {
        per_table!(self, kind, records => records
            .iter()
            .filter(|r| r.is_bad_data)
            .take(limit)
            .map(|r| serde_json::to_value(r).unwrap_or(serde_json::Value::Null))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_kind_names_are_unique() {
        let mut names: Vec<&str> = TableKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TableKind::ALL.len());
    }

    #[test]
    fn test_empty_dataset_counts() {
        let ds = Dataset::default();
        assert_eq!(ds.total_records(), 0);
        for kind in TableKind::ALL {
            assert_eq!(ds.len_of(kind), 0);
            assert_eq!(ds.bad_count_of(kind), 0);
        }
    }
}
