// 📚 Domain Vocabulary - static reference lists for the entity generators
// Pure data, no logic. Generators sample these with their own RNG.

// ============================================================================
// PEOPLE & ADDRESSES
// ============================================================================

pub const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael",
    "Linda", "David", "Elizabeth", "William", "Barbara", "Richard", "Susan",
    "Joseph", "Jessica", "Thomas", "Sarah", "Christopher", "Karen", "Charles",
    "Lisa", "Daniel", "Nancy", "Matthew", "Betty", "Anthony", "Sandra",
    "Mark", "Margaret", "Donald", "Ashley", "Steven", "Kimberly", "Andrew",
    "Emily", "Paul", "Donna", "Joshua", "Michelle",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller",
    "Davis", "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez",
    "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Jackson", "Martin",
    "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez", "Clark",
    "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King",
    "Wright", "Scott", "Torres", "Nguyen", "Hill", "Flores",
];

pub const STREET_NAMES: &[&str] = &[
    "Main", "Oak", "Pine", "Maple", "Cedar", "Elm", "Washington", "Lincoln",
    "Jefferson", "Madison", "Lake", "Hill", "Park", "Sunset", "River",
    "Highland", "Broadway", "Church", "Willow", "Forest", "Ridge", "Meadow",
    "Spring", "Valley",
];

pub const STREET_TYPES: &[&str] = &["St", "Ave", "Blvd", "Rd", "Ln", "Dr", "Ct", "Pl", "Way"];

pub const CITIES: &[&str] = &[
    "New York", "Los Angeles", "Chicago", "Houston", "Phoenix",
    "Philadelphia", "San Antonio", "San Diego", "Dallas", "San Jose",
];

pub const STATES: &[&str] = &[
    "NY", "CA", "IL", "TX", "AZ", "PA", "FL", "OH", "GA", "NC", "MI", "WA",
];

/// Zip code anchored to a known city, or None for the fallback random zip.
pub fn zip_for_city(city: &str) -> Option<&'static str> {
    match city {
        "New York" => Some("10001"),
        "Los Angeles" => Some("90001"),
        "Chicago" => Some("60601"),
        "Houston" => Some("77001"),
        "Phoenix" => Some("85001"),
        "Philadelphia" => Some("19101"),
        "San Antonio" => Some("78201"),
        "San Diego" => Some("92101"),
        "Dallas" => Some("75201"),
        "San Jose" => Some("95101"),
        _ => None,
    }
}

pub const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com", "yahoo.com", "hotmail.com", "outlook.com", "company.com",
];

pub const EMPLOYMENT_TYPES: &[&str] = &[
    "Employed", "Self-Employed", "Unemployed", "Retired", "Student", "Homemaker",
];

pub const EDUCATION_LEVELS: &[&str] = &[
    "High School", "Associate", "Bachelor", "Master", "Doctorate", "None",
];

pub const MARITAL_STATUSES: &[&str] = &["Single", "Married", "Divorced", "Widowed", "Separated"];

// ============================================================================
// ACCOUNTS, CARDS, TRANSACTIONS
// ============================================================================

pub const ACCOUNT_TYPES: &[&str] = &[
    "Savings", "Checking", "Money Market", "Certificate of Deposit",
];

pub const ACCOUNT_STATUS: &[&str] = &["Active", "Inactive", "Frozen", "Dormant", "Closed"];

pub const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "CAD"];

pub const CARD_TYPES: &[&str] = &["Credit", "Debit", "Prepaid"];

pub const CARD_NETWORKS: &[&str] = &["Visa", "MasterCard", "American Express", "Discover"];

pub const CARD_STATUS: &[&str] = &["Active", "Inactive", "Blocked", "Expired"];

pub const TRANSACTION_TYPES: &[&str] = &[
    "Deposit", "Withdrawal", "Transfer", "Payment", "Purchase", "Refund",
];

pub const TRANSACTION_STATUS: &[&str] = &["Completed", "Pending", "Failed", "Reversed"];

/// Description phrases per transaction type.
pub fn transaction_descriptions(transaction_type: &str) -> &'static [&'static str] {
    match transaction_type {
        "Deposit" => &[
            "Salary Deposit", "Check Deposit", "Cash Deposit", "ATM Deposit", "Mobile Deposit",
        ],
        "Withdrawal" => &["ATM Withdrawal", "Cash Withdrawal", "Bank Withdrawal"],
        "Transfer" => &[
            "Transfer to Savings", "Bill Payment", "Money Transfer", "Online Transfer",
        ],
        "Payment" => &[
            "Credit Card Payment", "Loan Payment", "Utility Bill", "Mortgage Payment",
        ],
        "Purchase" => &[
            "Grocery Store", "Gas Station", "Online Shopping", "Restaurant", "Retail Store",
        ],
        "Refund" => &["Purchase Refund", "Service Refund", "Overcharge Refund"],
        _ => &["Transaction"],
    }
}

// ============================================================================
// LOANS & INVESTMENTS
// ============================================================================

pub const LOAN_TYPES: &[&str] = &[
    "Personal Loan", "Home Loan", "Auto Loan", "Education Loan",
    "Business Loan", "Credit Line", "Mortgage", "Overdraft",
];

pub const LOAN_STATUS: &[&str] = &[
    "Active", "Paid Off", "Defaulted", "In Arrears", "Approved", "Rejected",
];

pub const LOAN_TERMS: &[u32] = &[12, 24, 36, 48, 60, 84, 120, 180, 240, 360];

pub const INTEREST_TYPES: &[&str] = &["Fixed", "Variable", "Floating"];

pub const INVESTMENT_TYPES: &[&str] = &[
    "Mutual Fund", "Stocks", "Bonds", "ETF", "Fixed Deposit", "Retirement Account",
];

pub const RISK_TOLERANCE: &[&str] = &[
    "Conservative", "Moderate", "Balanced", "Growth", "Aggressive",
];

pub const INVESTMENT_ACCOUNT_STATUSES: &[&str] = &["Active", "Suspended", "Closed", "Pending"];

pub const INVESTMENT_STRATEGIES: &[&str] = &[
    "Income", "Growth", "Index Tracking", "Capital Preservation", "Speculative",
];

pub const ASSET_CLASSES: &[&str] = &[
    "Equities", "Fixed Income", "Real Estate", "Commodities", "Cash Equivalents",
];

// ============================================================================
// BRANCHES, EMPLOYEES, MERCHANTS
// ============================================================================

pub const BRANCH_TYPES: &[&str] = &[
    "Main Branch", "Regional Branch", "Sub-Branch", "Express Branch", "Digital Only",
];

pub const BRANCH_QUALIFIERS: &[&str] = &["Main", "Central", "Downtown", "Plaza"];

pub const EMPLOYEE_ROLES: &[&str] = &[
    "Teller", "Loan Officer", "Branch Manager", "Customer Service", "Operations", "Compliance",
];

pub const DEPARTMENT_TYPES: &[&str] = &[
    "Retail Banking", "Corporate Banking", "Wealth Management", "Operations", "Risk Management",
];

/// Salary band per employee role.
pub fn salary_band(role: &str) -> (u32, u32) {
    match role {
        "Teller" => (30_000, 45_000),
        "Customer Service" => (35_000, 50_000),
        "Loan Officer" => (50_000, 80_000),
        "Branch Manager" => (70_000, 120_000),
        "Operations" => (45_000, 70_000),
        "Compliance" => (60_000, 90_000),
        _ => (40_000, 60_000),
    }
}

pub const MERCHANT_CATEGORIES: &[&str] = &[
    "Retail", "Restaurant", "Travel", "Entertainment", "Utilities", "Healthcare",
];

pub fn merchant_name_parts(category: &str) -> (&'static [&'static str], &'static [&'static str]) {
    match category {
        "Retail" => (
            &["Best", "Super", "Mega", "Quality", "Prime"],
            &["Mart", "Store", "Shop", "Center", "Outlet"],
        ),
        "Restaurant" => (
            &["Golden", "Royal", "Tasty", "Delicious", "Gourmet"],
            &["Grill", "Bistro", "Cafe", "Kitchen", "Diner"],
        ),
        "Travel" => (
            &["Global", "Express", "First Class", "Premium", "Luxury"],
            &["Travels", "Tours", "Airlines", "Hotels", "Cruises"],
        ),
        "Entertainment" => (
            &["Star", "Magic", "Dream", "Fantasy", "Epic"],
            &["Cinema", "Theater", "Games", "Fun", "Entertainment"],
        ),
        "Utilities" => (
            &["City", "Metro", "National", "Regional", "Local"],
            &["Services", "Utility", "Company", "Corp", "Inc"],
        ),
        "Healthcare" => (
            &["Medi", "Health", "Care", "Wellness", "Clinic"],
            &["Hospital", "Clinic", "Center", "Care", "Medical"],
        ),
        _ => (&["Super"], &["Store"]),
    }
}

/// Merchant category codes per category.
pub fn mcc_codes(category: &str) -> &'static [&'static str] {
    match category {
        "Retail" => &["5411", "5311", "5331", "5399"],
        "Restaurant" => &["5812", "5814", "5813"],
        "Travel" => &["4722", "4511", "4111", "4131"],
        "Entertainment" => &["7832", "7996", "7997", "7999"],
        "Utilities" => &["4900", "4814", "4899"],
        "Healthcare" => &["8011", "8021", "8031", "8049"],
        _ => &["5399"],
    }
}

// ============================================================================
// LOGINS, FRAUD, AUDIT
// ============================================================================

pub const DEVICE_TYPES: &[&str] = &[
    "iPhone 14", "Samsung Galaxy S23", "Google Pixel 7", "Windows Desktop",
    "MacBook Pro", "iPad", "Android Tablet", "Mobile Web", "Desktop Web",
    "Unknown Device",
];

pub const BROWSERS: &[&str] = &[
    "Chrome", "Safari", "Firefox", "Edge", "Opera", "Brave", "Internet Explorer",
];

pub const OPERATING_SYSTEMS: &[&str] = &[
    "iOS 16", "Android 13", "Windows 11", "macOS Ventura", "Linux",
    "Chrome OS", "Ubuntu", "Windows 10",
];

pub const LOGIN_METHODS: &[&str] = &[
    "PASSWORD", "BIOMETRIC", "2FA", "SSO", "OTP", "HARDWARE_TOKEN",
];

pub const LOGIN_FAILURE_REASONS: &[&str] = &[
    "INVALID_PASSWORD", "EXPIRED_PASSWORD", "ACCOUNT_LOCKED",
    "DEVICE_NOT_RECOGNIZED", "LOCATION_SUSPICIOUS", "2FA_FAILED",
    "SESSION_EXPIRED", "BRUTE_FORCE_ATTEMPT", "IP_BLOCKED",
];

pub const FRAUD_REASONS: &[&str] = &[
    "Unusual transaction amount", "Velocity check failed",
    "Geo-location mismatch", "Card testing pattern",
    "Account takeover suspected", "Merchant risk flag",
    "Device fingerprint mismatch",
];

pub const FRAUD_TYPES: &[&str] = &[
    "Card Not Present", "Identity Theft", "Account Takeover",
    "Friendly Fraud", "Money Laundering", "Phishing",
];

pub const DETECTION_METHODS: &[&str] = &[
    "Rules Engine", "ML Model", "Manual Review", "Velocity Check", "Customer Report",
];

pub const ALERT_STATUSES: &[&str] = &[
    "OPEN", "INVESTIGATING", "RESOLVED", "FALSE_POSITIVE", "CONFIRMED_FRAUD", "ESCALATED",
];

pub const AUDIT_ACTIONS: &[&str] = &[
    "LOGIN", "LOGOUT", "CREATE", "UPDATE", "DELETE", "VIEW", "APPROVE",
    "REJECT", "TRANSFER", "WITHDRAWAL", "PASSWORD_CHANGE", "PROFILE_UPDATE",
    "ACCOUNT_CREATE", "LOAN_APPLICATION", "CARD_ISSUE", "STATEMENT_GENERATE",
];

pub const AUDIT_ENTITY_TYPES: &[&str] = &[
    "CUSTOMER", "ACCOUNT", "TRANSACTION", "LOAN", "CARD", "EMPLOYEE",
    "BRANCH", "MERCHANT", "USER", "SYSTEM",
];

pub const AUDIT_STATUS_CODES: &[&str] = &["SUCCESS", "FAILURE", "PENDING", "ERROR", "WARNING"];

pub const AUDIT_ERROR_MESSAGES: &[&str] = &[
    "Database connection failed", "Invalid credentials",
    "Insufficient permissions", "Resource not found", "Validation error",
];

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15",
    "Mozilla/5.0 (Android 11; Mobile) AppleWebKit/537.36",
    "PostmanRuntime/7.28.4",
    "curl/7.68.0",
];

pub const RATE_SOURCES: &[&str] = &["Central Bank", "Reuters", "Bloomberg", "Internal"];

/// Currency pairs with an anchor mid rate; daily history fluctuates around these.
pub const CURRENCY_PAIRS: &[(&str, &str, f64)] = &[
    ("USD", "EUR", 0.92),
    ("USD", "GBP", 0.79),
    ("USD", "JPY", 150.0),
    ("USD", "CAD", 1.35),
    ("USD", "AUD", 1.52),
    ("USD", "CHF", 0.88),
    ("EUR", "GBP", 0.86),
    ("EUR", "JPY", 163.0),
    ("GBP", "JPY", 190.0),
    ("AUD", "USD", 0.66),
    ("CAD", "USD", 0.74),
];

// ============================================================================
// CORRUPTION MATERIAL
// ============================================================================

pub const INVALID_EMAILS: &[&str] = &[
    "invalid.email", "missing@domain", "@nodomain.com", "spaces in@email.com",
    "NULL", "",
];

pub const INVALID_PHONES: &[&str] = &[
    "123", "11111111111111111111", "abc-def-ghij", "123-456-789",
    "000-000-0000", "+999-999-9999", "",
];

pub const INVALID_ACCOUNT_NUMBERS: &[&str] = &[
    "123", "ABC123XYZ", "0000000000", "", "123-456-789", "NULL",
];

pub const INVALID_CARD_NUMBERS: &[&str] = &[
    "1234567890123456", "1111-2222-3333-4444", "abcd-efgh-ijkl-mnop",
    "1111111111111111111", "0000000000000000", "", "NULL",
];

pub const INVALID_EXPIRY_DATES: &[&str] = &[
    "13/25", "00/23", "AA/BB", "05/2025", "05-25", "", "99/99",
];

pub const INVALID_CVVS: &[&str] = &["12", "12345", "abc", "000", "", "NULL"];

pub const INVALID_DATES: &[&str] = &["9999-12-31", "1800-01-01", ""];

pub const INVALID_DESCRIPTIONS: &[&str] = &[
    "", "NULL", "<script>alert(1)</script>", "DROP TABLE transactions;",
];

/// Adversarial payloads appended to free-text fields by the malformed class.
pub const ADVERSARIAL_PAYLOADS: &[&str] = &[
    "' OR '1'='1",
    "'; DROP TABLE accounts; --",
    "<script>alert('xss')</script>",
    "../../../etc/passwd",
    "/* COMMENT */",
    " OR 1=1",
    "[test]",
];
