// 🔐 User Login Generator - authentication history per customer
//
// Logins land in a 90-day window with a 95% success rate. A small share of
// customers also gets a burst of failed attempts from private-range
// addresses, the shape a credential-stuffing run leaves behind.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{fmt_datetime, pick, random_id, random_time, unique_id};
use crate::config::FanOut;
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Customer, TableKind, UserLogin};
use crate::vocab;

pub struct UserLoginGenerator {
    fan_out: FanOut,
    today: NaiveDate,
}

impl UserLoginGenerator {
    pub fn new(fan_out: FanOut, today: NaiveDate) -> Self {
        UserLoginGenerator { fan_out, today }
    }

    pub fn generate(
        &self,
        customers: &[Customer],
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<UserLogin> {
        let mut logins = Vec::new();
        let mut login_ids = HashSet::new();

        for customer in customers {
            for _ in 0..self.fan_out.sample(rng) {
                let login_id = unique_id(rng, &mut login_ids, "LGN", 10_000_000, 99_999_999);
                let mut login =
                    build_login(rng, self.today, login_id, customer.customer_id.clone());
                injector.maybe_corrupt(&mut login, rng);
                logins.push(login);
            }
        }

        // Brute-force bursts for roughly 5% of customers.
        for customer in customers {
            if rng.gen::<f64>() >= 0.05 {
                continue;
            }
            for _ in 0..rng.gen_range(5..=20) {
                let at = (self.today - Duration::days(rng.gen_range(0..=90)))
                    .and_time(random_time(rng));
                logins.push(UserLogin {
                    login_id: unique_id(rng, &mut login_ids, "LGN", 10_000_000, 99_999_999),
                    customer_id: customer.customer_id.clone(),
                    login_timestamp: fmt_datetime(at),
                    ip_address: Some(format!("10.0.0.{}", rng.gen_range(1..=255))),
                    device_type: Some("Unknown Device".to_string()),
                    browser: Some("UNKNOWN".to_string()),
                    operating_system: "UNKNOWN".to_string(),
                    login_method: "PASSWORD".to_string(),
                    login_status: "FAILED".to_string(),
                    failure_reason: Some("BRUTE_FORCE_ATTEMPT".to_string()),
                    session_duration_minutes: Some(0),
                    geolocation: None,
                    is_vpn_used: true,
                    created_at: fmt_datetime(at),
                    is_bad_data: false,
                    bad_data_type: None,
                });
            }
        }

        logins
    }
}

/// Build one clean login for an existing customer.
pub fn synthesize(rng: &mut ChaCha8Rng, today: NaiveDate, customer_id: &str) -> UserLogin {
    let login_id = random_id(rng, "LGN", 10_000_000, 99_999_999);
    build_login(rng, today, login_id, customer_id.to_string())
}

fn build_login(
    rng: &mut ChaCha8Rng,
    today: NaiveDate,
    login_id: String,
    customer_id: String,
) -> UserLogin {
    let at = (today - Duration::days(rng.gen_range(0..=90))).and_time(random_time(rng));
    let successful = rng.gen::<f64>() > 0.05;
    let login_status = if successful {
        "SUCCESS".to_string()
    } else {
        pick(rng, &["FAILED", "BLOCKED"]).to_string()
    };

    let mut ip_address = format!(
        "{}.{}.{}.{}",
        rng.gen_range(192..=223),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255)
    );
    if !successful && rng.gen_bool(0.5) {
        let prefix = pick(rng, &["10.0.0.", "192.168.", "172.16."]);
        ip_address = format!("{prefix}{}", rng.gen_range(1..=255));
    }

    UserLogin {
        login_id,
        customer_id,
        login_timestamp: fmt_datetime(at),
        ip_address: Some(ip_address),
        device_type: Some(pick(rng, vocab::DEVICE_TYPES).to_string()),
        browser: Some(pick(rng, vocab::BROWSERS).to_string()),
        operating_system: pick(rng, vocab::OPERATING_SYSTEMS).to_string(),
        login_method: pick(rng, vocab::LOGIN_METHODS).to_string(),
        login_status,
        failure_reason: (!successful)
            .then(|| pick(rng, vocab::LOGIN_FAILURE_REASONS).to_string()),
        session_duration_minutes: successful.then(|| rng.gen_range(1..=240)),
        geolocation: Some(format!(
            "{:.4},{:.4}",
            rng.gen_range(-90.0..=90.0),
            rng.gen_range(-180.0..=180.0)
        )),
        is_vpn_used: rng.gen_bool(0.5),
        created_at: fmt_datetime(at),
        is_bad_data: false,
        bad_data_type: None,
    }
}

impl Corruptible for UserLogin {
    const TABLE: TableKind = TableKind::UserLogins;
    const SUPPORTED: &'static [DefectClass] = &DefectClass::ALL;

    fn record_id(&self) -> &str {
        &self.login_id
    }

    fn mark(&mut self, class: DefectClass) {
        self.is_bad_data = true;
        self.bad_data_type = Some(class);
    }

    fn corrupt(&mut self, class: DefectClass, rng: &mut ChaCha8Rng) {
        match class {
            DefectClass::MissingData => {
                self.ip_address = None;
                self.device_type = None;
                self.browser = None;
            }
            DefectClass::InvalidFormat => {
                self.ip_address = Some("999.999.999.999".to_string());
                self.login_timestamp = "2024/13/45".to_string();
            }
            DefectClass::OutOfRange => {
                // Session longer than a week, stamped in the far future.
                self.session_duration_minutes = Some(10_000);
                self.login_timestamp = "2150-01-01 00:00:00".to_string();
            }
            DefectClass::InconsistentData => {
                self.login_status = "SUCCESS".to_string();
                self.failure_reason = Some("INVALID_PASSWORD".to_string());
            }
            DefectClass::MalformedData => {
                self.device_type = Some(pick(rng, vocab::ADVERSARIAL_PAYLOADS).to_string());
                self.browser = Some("'; DROP TABLE users; --".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::customer::CustomerGenerator;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_fan_out_is_a_lower_bound_with_bursts() {
        let mut rng = ChaCha8Rng::seed_from_u64(121);
        let (customers, _) = CustomerGenerator::new(50, today()).generate(
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );
        let logins = UserLoginGenerator::new(FanOut::new(8, 30), today()).generate(
            &customers,
            &mut rng,
            &mut DefectInjector::disabled(),
        );

        for customer in &customers {
            let count = logins
                .iter()
                .filter(|l| l.customer_id == customer.customer_id)
                .count();
            assert!(count >= 8, "{} has only {count} logins", customer.customer_id);
        }
    }

    #[test]
    fn test_success_and_failure_fields_are_exclusive() {
        let mut rng = ChaCha8Rng::seed_from_u64(122);
        for _ in 0..200 {
            let login = synthesize(&mut rng, today(), "C00000001");
            if login.login_status == "SUCCESS" {
                assert!(login.failure_reason.is_none());
                assert!(login.session_duration_minutes.is_some());
            } else {
                assert!(login.failure_reason.is_some());
                assert!(login.session_duration_minutes.is_none());
            }
        }
    }
}
