// 🗄️ Persisted Store - SQLite-backed home for a generated dataset
//
// `StoreGateway` is the seam the Mutation Simulator talks through: sample
// existing row ids, look up linkage, insert freshly synthesized rows, and
// apply the four domain updates. `SqliteStore` is the bundled
// implementation; `import_dataset` loads a full generation pass so a
// simulation run has something to mutate.
//
// The corruption bookkeeping fields stay in memory; persisted rows carry
// only the domain columns, like a real downstream store would.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::model::{
    Account, AuditLog, Branch, Card, Customer, CustomerDetail, Dataset, Employee, ExchangeRate,
    FraudAlert, InvestmentAccount, Loan, LoanPayment, Merchant, TableKind, Transaction, UserLogin,
};

// ============================================================================
// GATEWAY
// ============================================================================

/// Operations the Mutation Simulator needs from whatever store holds the
/// dataset.
pub trait StoreGateway {
    /// Up to `limit` existing ids from the table, in random order.
    fn sample_ids(&self, table: TableKind, limit: usize) -> Result<Vec<String>>;

    /// Owning customer of an account, if the account exists.
    fn account_owner(&self, account_id: &str) -> Result<Option<String>>;

    /// Any one account belonging to the customer.
    fn account_for_customer(&self, customer_id: &str) -> Result<Option<String>>;

    /// A random completed transaction with its account, for fraud alerts.
    fn completed_transaction(&self) -> Result<Option<(String, String, f64)>>;

    fn insert_customer(&self, customer: &Customer) -> Result<()>;
    fn insert_account(&self, account: &Account) -> Result<()>;
    fn insert_card(&self, card: &Card) -> Result<()>;
    fn insert_transaction(&self, transaction: &Transaction) -> Result<()>;
    fn insert_loan(&self, loan: &Loan) -> Result<()>;
    fn insert_fraud_alert(&self, alert: &FraudAlert) -> Result<()>;
    fn insert_user_login(&self, login: &UserLogin) -> Result<()>;

    /// Each update returns whether a row was actually touched.
    fn update_customer_contact(&self, customer_id: &str, phone: &str, email: &str) -> Result<bool>;
    fn adjust_account_balance(&self, account_id: &str, delta: f64) -> Result<bool>;
    fn set_transaction_status(&self, transaction_id: &str, status: &str) -> Result<bool>;
    fn set_card_status(&self, card_id: &str, status: &str) -> Result<bool>;
    fn set_loan_status(&self, loan_id: &str, status: &str) -> Result<bool>;
}

/// Primary key column per table.
fn id_column(table: TableKind) -> &'static str {
    match table {
        TableKind::Customers => "customer_id",
        TableKind::CustomerDetails => "detail_id",
        TableKind::Branches => "branch_id",
        TableKind::Merchants => "merchant_id",
        TableKind::ExchangeRates => "rate_id",
        TableKind::Accounts => "account_id",
        TableKind::Employees => "employee_id",
        TableKind::Cards => "card_id",
        TableKind::Transactions => "transaction_id",
        TableKind::Loans => "loan_id",
        TableKind::LoanPayments => "payment_id",
        TableKind::AuditLogs => "audit_id",
        TableKind::InvestmentAccounts => "investment_account_id",
        TableKind::FraudAlerts => "alert_id",
        TableKind::UserLogins => "login_id",
    }
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        let store = SqliteStore { conn };
        store.setup_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = SqliteStore {
            conn: Connection::open_in_memory()?,
        };
        store.setup_schema()?;
        Ok(store)
    }

    /// Create every table. WAL keeps the file usable if a run dies mid-write.
    fn setup_schema(&self) -> Result<()> {
        let _ = self.conn.pragma_update(None, "journal_mode", "WAL");

        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS customers (
                customer_id TEXT PRIMARY KEY,
                first_name TEXT,
                last_name TEXT,
                email TEXT,
                phone TEXT,
                date_of_birth TEXT,
                street TEXT,
                city TEXT,
                state TEXT,
                zip_code TEXT,
                country TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS customer_details (
                detail_id TEXT PRIMARY KEY,
                customer_id TEXT,
                employment_status TEXT,
                annual_income REAL,
                credit_score INTEGER,
                marital_status TEXT,
                education_level TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS branches (
                branch_id TEXT PRIMARY KEY,
                branch_name TEXT,
                branch_code TEXT,
                branch_type TEXT,
                street TEXT,
                city TEXT,
                state TEXT,
                zip_code TEXT,
                country TEXT,
                phone TEXT,
                email TEXT,
                manager_name TEXT,
                opening_date TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS merchants (
                merchant_id TEXT PRIMARY KEY,
                merchant_name TEXT,
                category TEXT,
                mcc_code TEXT,
                street TEXT,
                city TEXT,
                state TEXT,
                zip_code TEXT,
                country TEXT,
                phone TEXT,
                email TEXT,
                website TEXT,
                status TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS exchange_rates (
                rate_id TEXT PRIMARY KEY,
                base_currency TEXT,
                target_currency TEXT,
                buy_rate REAL,
                sell_rate REAL,
                mid_rate REAL,
                rate_date TEXT,
                source TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS accounts (
                account_id TEXT PRIMARY KEY,
                customer_id TEXT,
                account_number TEXT,
                account_type TEXT,
                balance REAL,
                currency TEXT,
                status TEXT,
                opened_date TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS employees (
                employee_id TEXT PRIMARY KEY,
                branch_id TEXT,
                first_name TEXT,
                last_name TEXT,
                email TEXT,
                phone_extension TEXT,
                role TEXT,
                department TEXT,
                salary REAL,
                hire_date TEXT,
                manager_id TEXT,
                status TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS cards (
                card_id TEXT PRIMARY KEY,
                customer_id TEXT,
                account_id TEXT,
                card_number TEXT,
                card_type TEXT,
                card_network TEXT,
                expiration_date TEXT,
                cvv TEXT,
                credit_limit REAL,
                status TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS transactions (
                transaction_id TEXT PRIMARY KEY,
                account_id TEXT,
                card_id TEXT,
                transaction_type TEXT,
                amount REAL,
                currency TEXT,
                transaction_date TEXT,
                transaction_time TEXT,
                description TEXT,
                status TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS loans (
                loan_id TEXT PRIMARY KEY,
                customer_id TEXT,
                account_id TEXT,
                loan_type TEXT,
                loan_amount REAL,
                interest_rate REAL,
                term_months INTEGER,
                start_date TEXT,
                end_date TEXT,
                monthly_payment REAL,
                remaining_balance REAL,
                status TEXT,
                interest_type TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS loan_payments (
                payment_id TEXT PRIMARY KEY,
                loan_id TEXT,
                customer_id TEXT,
                payment_number INTEGER,
                payment_date TEXT,
                due_date TEXT,
                amount_due REAL,
                principal_amount REAL,
                interest_amount REAL,
                total_paid REAL,
                status TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS audit_logs (
                audit_id TEXT PRIMARY KEY,
                user_id TEXT,
                action_type TEXT,
                entity_type TEXT,
                entity_id TEXT,
                action_date TEXT,
                action_time TEXT,
                ip_address TEXT,
                user_agent TEXT,
                status_code TEXT,
                action_details TEXT,
                error_message TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS investment_accounts (
                investment_account_id TEXT PRIMARY KEY,
                customer_id TEXT,
                account_id TEXT,
                investment_type TEXT,
                risk_tolerance TEXT,
                account_status TEXT,
                investment_strategy TEXT,
                primary_asset_class TEXT,
                opening_date TEXT,
                current_balance REAL,
                total_deposits REAL,
                ytd_return_rate REAL,
                annual_return_rate REAL,
                management_fee_rate REAL,
                total_value REAL,
                is_managed_account INTEGER,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS fraud_alerts (
                alert_id TEXT PRIMARY KEY,
                transaction_id TEXT,
                account_id TEXT,
                customer_id TEXT,
                alert_timestamp TEXT,
                detection_method TEXT,
                fraud_reason TEXT,
                fraud_type TEXT,
                severity TEXT,
                severity_score INTEGER,
                alert_status TEXT,
                financial_loss REAL,
                is_false_positive INTEGER,
                resolution_date TEXT,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS user_logins (
                login_id TEXT PRIMARY KEY,
                customer_id TEXT,
                login_timestamp TEXT,
                ip_address TEXT,
                device_type TEXT,
                browser TEXT,
                operating_system TEXT,
                login_method TEXT,
                login_status TEXT,
                failure_reason TEXT,
                session_duration_minutes INTEGER,
                geolocation TEXT,
                is_vpn_used INTEGER,
                created_at TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_accounts_customer ON accounts(customer_id);
            CREATE INDEX IF NOT EXISTS idx_cards_account ON cards(account_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id);
            CREATE INDEX IF NOT EXISTS idx_loans_customer ON loans(customer_id);
            CREATE INDEX IF NOT EXISTS idx_payments_loan ON loan_payments(loan_id);",
        )?;

        Ok(())
    }

    /// Load a full generated dataset in one transaction, dependency order.
    pub fn import_dataset(&mut self, dataset: &Dataset) -> Result<usize> {
        let tx = self.conn.transaction()?;

        for customer in &dataset.customers {
            insert_customer_row(&tx, customer)?;
        }
        for detail in &dataset.customer_details {
            insert_detail_row(&tx, detail)?;
        }
        for branch in &dataset.branches {
            insert_branch_row(&tx, branch)?;
        }
        for merchant in &dataset.merchants {
            insert_merchant_row(&tx, merchant)?;
        }
        for rate in &dataset.exchange_rates {
            insert_rate_row(&tx, rate)?;
        }
        for account in &dataset.accounts {
            insert_account_row(&tx, account)?;
        }
        for employee in &dataset.employees {
            insert_employee_row(&tx, employee)?;
        }
        for card in &dataset.cards {
            insert_card_row(&tx, card)?;
        }
        for transaction in &dataset.transactions {
            insert_transaction_row(&tx, transaction)?;
        }
        for loan in &dataset.loans {
            insert_loan_row(&tx, loan)?;
        }
        for payment in &dataset.loan_payments {
            insert_payment_row(&tx, payment)?;
        }
        for log in &dataset.audit_logs {
            insert_audit_row(&tx, log)?;
        }
        for investment in &dataset.investment_accounts {
            insert_investment_row(&tx, investment)?;
        }
        for alert in &dataset.fraud_alerts {
            insert_alert_row(&tx, alert)?;
        }
        for login in &dataset.user_logins {
            insert_login_row(&tx, login)?;
        }

        tx.commit()?;
        Ok(dataset.total_records())
    }

    pub fn count(&self, table: TableKind) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.as_str()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

// Row writers shared by `import_dataset` and the gateway inserts. They take
// the raw connection so they work inside and outside a transaction.

fn insert_customer_row(conn: &Connection, c: &Customer) -> Result<()> {
    conn.execute(
        "INSERT INTO customers (customer_id, first_name, last_name, email, phone,
            date_of_birth, street, city, state, zip_code, country, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            c.customer_id,
            c.first_name,
            c.last_name,
            c.email,
            c.phone,
            c.date_of_birth,
            c.street,
            c.city,
            c.state,
            c.zip_code,
            c.country,
            c.created_at
        ],
    )?;
    Ok(())
}

fn insert_detail_row(conn: &Connection, d: &CustomerDetail) -> Result<()> {
    conn.execute(
        "INSERT INTO customer_details (detail_id, customer_id, employment_status,
            annual_income, credit_score, marital_status, education_level, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            d.detail_id,
            d.customer_id,
            d.employment_status,
            d.annual_income,
            d.credit_score,
            d.marital_status,
            d.education_level,
            d.created_at
        ],
    )?;
    Ok(())
}

fn insert_branch_row(conn: &Connection, b: &Branch) -> Result<()> {
    conn.execute(
        "INSERT INTO branches (branch_id, branch_name, branch_code, branch_type, street,
            city, state, zip_code, country, phone, email, manager_name, opening_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            b.branch_id,
            b.branch_name,
            b.branch_code,
            b.branch_type,
            b.street,
            b.city,
            b.state,
            b.zip_code,
            b.country,
            b.phone,
            b.email,
            b.manager_name,
            b.opening_date,
            b.created_at
        ],
    )?;
    Ok(())
}

fn insert_merchant_row(conn: &Connection, m: &Merchant) -> Result<()> {
    conn.execute(
        "INSERT INTO merchants (merchant_id, merchant_name, category, mcc_code, street,
            city, state, zip_code, country, phone, email, website, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            m.merchant_id,
            m.merchant_name,
            m.category,
            m.mcc_code,
            m.street,
            m.city,
            m.state,
            m.zip_code,
            m.country,
            m.phone,
            m.email,
            m.website,
            m.status,
            m.created_at
        ],
    )?;
    Ok(())
}

fn insert_rate_row(conn: &Connection, r: &ExchangeRate) -> Result<()> {
    conn.execute(
        "INSERT INTO exchange_rates (rate_id, base_currency, target_currency, buy_rate,
            sell_rate, mid_rate, rate_date, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            r.rate_id,
            r.base_currency,
            r.target_currency,
            r.buy_rate,
            r.sell_rate,
            r.mid_rate,
            r.rate_date,
            r.source,
            r.created_at
        ],
    )?;
    Ok(())
}

fn insert_account_row(conn: &Connection, a: &Account) -> Result<()> {
    conn.execute(
        "INSERT INTO accounts (account_id, customer_id, account_number, account_type,
            balance, currency, status, opened_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            a.account_id,
            a.customer_id,
            a.account_number,
            a.account_type,
            a.balance,
            a.currency,
            a.status,
            a.opened_date,
            a.created_at
        ],
    )?;
    Ok(())
}

fn insert_employee_row(conn: &Connection, e: &Employee) -> Result<()> {
    conn.execute(
        "INSERT INTO employees (employee_id, branch_id, first_name, last_name, email,
            phone_extension, role, department, salary, hire_date, manager_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            e.employee_id,
            e.branch_id,
            e.first_name,
            e.last_name,
            e.email,
            e.phone_extension,
            e.role,
            e.department,
            e.salary,
            e.hire_date,
            e.manager_id,
            e.status,
            e.created_at
        ],
    )?;
    Ok(())
}

fn insert_card_row(conn: &Connection, c: &Card) -> Result<()> {
    conn.execute(
        "INSERT INTO cards (card_id, customer_id, account_id, card_number, card_type,
            card_network, expiration_date, cvv, credit_limit, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            c.card_id,
            c.customer_id,
            c.account_id,
            c.card_number,
            c.card_type,
            c.card_network,
            c.expiration_date,
            c.cvv,
            c.credit_limit,
            c.status,
            c.created_at
        ],
    )?;
    Ok(())
}

fn insert_transaction_row(conn: &Connection, t: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions (transaction_id, account_id, card_id, transaction_type,
            amount, currency, transaction_date, transaction_time, description, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            t.transaction_id,
            t.account_id,
            t.card_id,
            t.transaction_type,
            t.amount,
            t.currency,
            t.transaction_date,
            t.transaction_time,
            t.description,
            t.status,
            t.created_at
        ],
    )?;
    Ok(())
}

fn insert_loan_row(conn: &Connection, l: &Loan) -> Result<()> {
    conn.execute(
        "INSERT INTO loans (loan_id, customer_id, account_id, loan_type, loan_amount,
            interest_rate, term_months, start_date, end_date, monthly_payment,
            remaining_balance, status, interest_type, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            l.loan_id,
            l.customer_id,
            l.account_id,
            l.loan_type,
            l.loan_amount,
            l.interest_rate,
            l.term_months,
            l.start_date,
            l.end_date,
            l.monthly_payment,
            l.remaining_balance,
            l.status,
            l.interest_type,
            l.created_at
        ],
    )?;
    Ok(())
}

fn insert_payment_row(conn: &Connection, p: &LoanPayment) -> Result<()> {
    conn.execute(
        "INSERT INTO loan_payments (payment_id, loan_id, customer_id, payment_number,
            payment_date, due_date, amount_due, principal_amount, interest_amount,
            total_paid, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            p.payment_id,
            p.loan_id,
            p.customer_id,
            p.payment_number,
            p.payment_date,
            p.due_date,
            p.amount_due,
            p.principal_amount,
            p.interest_amount,
            p.total_paid,
            p.status,
            p.created_at
        ],
    )?;
    Ok(())
}

fn insert_audit_row(conn: &Connection, a: &AuditLog) -> Result<()> {
    conn.execute(
        "INSERT INTO audit_logs (audit_id, user_id, action_type, entity_type, entity_id,
            action_date, action_time, ip_address, user_agent, status_code, action_details,
            error_message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            a.audit_id,
            a.user_id,
            a.action_type,
            a.entity_type,
            a.entity_id,
            a.action_date,
            a.action_time,
            a.ip_address,
            a.user_agent,
            a.status_code,
            a.action_details,
            a.error_message,
            a.created_at
        ],
    )?;
    Ok(())
}

fn insert_investment_row(conn: &Connection, i: &InvestmentAccount) -> Result<()> {
    conn.execute(
        "INSERT INTO investment_accounts (investment_account_id, customer_id, account_id,
            investment_type, risk_tolerance, account_status, investment_strategy,
            primary_asset_class, opening_date, current_balance, total_deposits,
            ytd_return_rate, annual_return_rate, management_fee_rate, total_value,
            is_managed_account, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            i.investment_account_id,
            i.customer_id,
            i.account_id,
            i.investment_type,
            i.risk_tolerance,
            i.account_status,
            i.investment_strategy,
            i.primary_asset_class,
            i.opening_date,
            i.current_balance,
            i.total_deposits,
            i.ytd_return_rate,
            i.annual_return_rate,
            i.management_fee_rate,
            i.total_value,
            i.is_managed_account,
            i.created_at
        ],
    )?;
    Ok(())
}

fn insert_alert_row(conn: &Connection, f: &FraudAlert) -> Result<()> {
    conn.execute(
        "INSERT INTO fraud_alerts (alert_id, transaction_id, account_id, customer_id,
            alert_timestamp, detection_method, fraud_reason, fraud_type, severity,
            severity_score, alert_status, financial_loss, is_false_positive,
            resolution_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            f.alert_id,
            f.transaction_id,
            f.account_id,
            f.customer_id,
            f.alert_timestamp,
            f.detection_method,
            f.fraud_reason,
            f.fraud_type,
            f.severity,
            f.severity_score,
            f.alert_status,
            f.financial_loss,
            f.is_false_positive,
            f.resolution_date,
            f.created_at
        ],
    )?;
    Ok(())
}

fn insert_login_row(conn: &Connection, l: &UserLogin) -> Result<()> {
    conn.execute(
        "INSERT INTO user_logins (login_id, customer_id, login_timestamp, ip_address,
            device_type, browser, operating_system, login_method, login_status,
            failure_reason, session_duration_minutes, geolocation, is_vpn_used, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            l.login_id,
            l.customer_id,
            l.login_timestamp,
            l.ip_address,
            l.device_type,
            l.browser,
            l.operating_system,
            l.login_method,
            l.login_status,
            l.failure_reason,
            l.session_duration_minutes,
            l.geolocation,
            l.is_vpn_used,
            l.created_at
        ],
    )?;
    Ok(())
}

// ============================================================================
// GATEWAY IMPLEMENTATION
// ============================================================================

impl StoreGateway for SqliteStore {
    fn sample_ids(&self, table: TableKind, limit: usize) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY RANDOM() LIMIT ?1",
            id_column(table),
            table.as_str()
        );
        let mut statement = self.conn.prepare(&sql)?;
        let ids = statement
            .query_map(params![limit as i64], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    fn account_owner(&self, account_id: &str) -> Result<Option<String>> {
        let owner = self
            .conn
            .query_row(
                "SELECT customer_id FROM accounts WHERE account_id = ?1",
                params![account_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(owner)
    }

    fn account_for_customer(&self, customer_id: &str) -> Result<Option<String>> {
        let account = self
            .conn
            .query_row(
                "SELECT account_id FROM accounts WHERE customer_id = ?1 LIMIT 1",
                params![customer_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(account)
    }

    fn completed_transaction(&self) -> Result<Option<(String, String, f64)>> {
        let row = self
            .conn
            .query_row(
                "SELECT transaction_id, account_id, COALESCE(amount, 0.0)
                 FROM transactions WHERE status = 'Completed'
                 ORDER BY RANDOM() LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        Ok(row)
    }

    fn insert_customer(&self, customer: &Customer) -> Result<()> {
        insert_customer_row(&self.conn, customer)
    }

    fn insert_account(&self, account: &Account) -> Result<()> {
        insert_account_row(&self.conn, account)
    }

    fn insert_card(&self, card: &Card) -> Result<()> {
        insert_card_row(&self.conn, card)
    }

    fn insert_transaction(&self, transaction: &Transaction) -> Result<()> {
        insert_transaction_row(&self.conn, transaction)
    }

    fn insert_loan(&self, loan: &Loan) -> Result<()> {
        insert_loan_row(&self.conn, loan)
    }

    fn insert_fraud_alert(&self, alert: &FraudAlert) -> Result<()> {
        insert_alert_row(&self.conn, alert)
    }

    fn insert_user_login(&self, login: &UserLogin) -> Result<()> {
        insert_login_row(&self.conn, login)
    }

    fn update_customer_contact(&self, customer_id: &str, phone: &str, email: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE customers SET phone = ?1, email = ?2 WHERE customer_id = ?3",
            params![phone, email, customer_id],
        )?;
        Ok(changed > 0)
    }

    fn adjust_account_balance(&self, account_id: &str, delta: f64) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE accounts SET balance = COALESCE(balance, 0.0) + ?1 WHERE account_id = ?2",
            params![delta, account_id],
        )?;
        Ok(changed > 0)
    }

    fn set_transaction_status(&self, transaction_id: &str, status: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE transactions SET status = ?1 WHERE transaction_id = ?2",
            params![status, transaction_id],
        )?;
        Ok(changed > 0)
    }

    fn set_card_status(&self, card_id: &str, status: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE cards SET status = ?1 WHERE card_id = ?2",
            params![status, card_id],
        )?;
        Ok(changed > 0)
    }

    fn set_loan_status(&self, loan_id: &str, status: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE loans SET status = ?1 WHERE loan_id = ?2",
            params![status, loan_id],
        )?;
        Ok(changed > 0)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BadDataRates, FanOut, GeneratorConfig};
    use crate::orchestrator::generate_dataset;
    use chrono::NaiveDate;

    fn small_dataset() -> Dataset {
        let config = GeneratorConfig {
            seed: 3,
            anchor_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            num_customers: 20,
            num_branches: 3,
            num_employees: 10,
            num_merchants: 5,
            exchange_rate_days: 5,
            accounts_per_customer: FanOut::new(1, 2),
            cards_per_customer: FanOut::new(0, 1),
            transactions_per_account: FanOut::new(2, 4),
            loans_per_customer: FanOut::new(0, 1),
            audit_logs_per_user: FanOut::new(1, 2),
            user_logins_per_customer: FanOut::new(1, 3),
            fraud_alerts_per_transaction: 0.1,
            num_investment_accounts: Some(5),
            bad_data_rates: BadDataRates::clean(),
            ..GeneratorConfig::default()
        };
        generate_dataset(&config).unwrap().dataset
    }

    #[test]
    fn test_import_round_trips_row_counts() {
        let dataset = small_dataset();
        let mut store = SqliteStore::open_in_memory().unwrap();
        let imported = store.import_dataset(&dataset).unwrap();

        assert_eq!(imported, dataset.total_records());
        for kind in TableKind::ALL {
            assert_eq!(store.count(kind).unwrap(), dataset.len_of(kind), "{kind}");
        }
    }

    #[test]
    fn test_sample_ids_returns_known_rows() {
        let dataset = small_dataset();
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.import_dataset(&dataset).unwrap();

        let sampled = store.sample_ids(TableKind::Customers, 10).unwrap();
        assert!(!sampled.is_empty());
        assert!(sampled.len() <= 10);
        for id in &sampled {
            assert!(dataset.customers.iter().any(|c| &c.customer_id == id));
        }

        // Empty table samples to nothing.
        let empty = SqliteStore::open_in_memory().unwrap();
        assert!(empty.sample_ids(TableKind::Loans, 10).unwrap().is_empty());
    }

    #[test]
    fn test_linkage_lookups() {
        let dataset = small_dataset();
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.import_dataset(&dataset).unwrap();

        let account = &dataset.accounts[0];
        assert_eq!(
            store.account_owner(&account.account_id).unwrap().as_deref(),
            Some(account.customer_id.as_str())
        );
        assert!(store
            .account_for_customer(&account.customer_id)
            .unwrap()
            .is_some());

        assert!(store.account_owner("ACC0000000").unwrap().is_none());
        assert!(store.account_for_customer("C00000000").unwrap().is_none());
    }

    #[test]
    fn test_updates_report_touched_rows() {
        let dataset = small_dataset();
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.import_dataset(&dataset).unwrap();

        let account = &dataset.accounts[0];
        assert!(store
            .adjust_account_balance(&account.account_id, 250.0)
            .unwrap());
        assert!(!store.adjust_account_balance("ACC0000000", 250.0).unwrap());

        let customer = &dataset.customers[0];
        assert!(store
            .update_customer_contact(&customer.customer_id, "+1-555-000-1111", "x@y.com")
            .unwrap());
    }

    #[test]
    fn test_duplicate_primary_key_is_an_error() {
        let dataset = small_dataset();
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.import_dataset(&dataset).unwrap();

        let customer = dataset.customers[0].clone();
        assert!(store.insert_customer(&customer).is_err());
    }
}
