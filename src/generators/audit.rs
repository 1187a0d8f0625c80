// 📝 Audit Log Generator - actions attributed to customers and employees

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{datetime_days_back, pick, unique_id, weighted_pick};
use crate::config::FanOut;
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{AuditLog, TableKind};
use crate::vocab;

pub struct AuditLogGenerator {
    fan_out: FanOut,
    today: NaiveDate,
}

impl AuditLogGenerator {
    pub fn new(fan_out: FanOut, today: NaiveDate) -> Self {
        AuditLogGenerator { fan_out, today }
    }

    /// `actor_ids` is the combined pool of customer and employee ids.
    pub fn generate(
        &self,
        actor_ids: &[String],
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<AuditLog> {
        let mut logs = Vec::new();
        let mut audit_ids = HashSet::new();

        for actor_id in actor_ids {
            for _ in 0..self.fan_out.sample(rng) {
                let at = datetime_days_back(rng, self.today, 0, 365);
                let status_code = weighted_pick(
                    rng,
                    vocab::AUDIT_STATUS_CODES,
                    &[0.85, 0.08, 0.04, 0.02, 0.01],
                );

                let mut error_message = if rng.gen::<f64>() < 0.1 {
                    Some(
                        pick(
                            rng,
                            &[
                                "Access denied",
                                "Invalid input",
                                "System error",
                                "Timeout",
                                "Connection failed",
                            ],
                        )
                        .to_string(),
                    )
                } else {
                    None
                };
                if matches!(status_code, "FAILURE" | "ERROR") && error_message.is_none() {
                    error_message = Some(pick(rng, vocab::AUDIT_ERROR_MESSAGES).to_string());
                }

                let mut log = AuditLog {
                    audit_id: unique_id(rng, &mut audit_ids, "AUD", 100_000_000, 999_999_999),
                    user_id: actor_id.clone(),
                    action_type: pick(rng, vocab::AUDIT_ACTIONS).to_string(),
                    entity_type: pick(rng, vocab::AUDIT_ENTITY_TYPES).to_string(),
                    entity_id: format!("ENT{}", rng.gen_range(10_000..=99_999)),
                    action_date: at.date().format(super::DATE_FMT).to_string(),
                    action_time: at.time().format("%H:%M:%S").to_string(),
                    ip_address: Some(random_ip(rng)),
                    user_agent: Some(pick(rng, vocab::USER_AGENTS).to_string()),
                    status_code: Some(status_code.to_string()),
                    action_details: Some(format!(
                        "Performed {} operation",
                        pick(rng, &["created", "updated", "viewed", "deleted"])
                    )),
                    error_message,
                    created_at: at.format(super::DATETIME_FMT).to_string(),
                    is_bad_data: false,
                    bad_data_type: None,
                };

                injector.maybe_corrupt(&mut log, rng);
                logs.push(log);
            }
        }

        logs
    }
}

fn random_ip(rng: &mut ChaCha8Rng) -> String {
    format!(
        "{}.{}.{}.{}",
        rng.gen_range(1..=255),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(1..=255)
    )
}

impl Corruptible for AuditLog {
    const TABLE: TableKind = TableKind::AuditLogs;
    const SUPPORTED: &'static [DefectClass] = &[
        DefectClass::MissingData,
        DefectClass::InvalidFormat,
        DefectClass::InconsistentData,
        DefectClass::MalformedData,
    ];

    fn record_id(&self) -> &str {
        &self.audit_id
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
                        0 => self.ip_address = None,
                        1 => self.user_agent = None,
                        2 => self.status_code = None,
                        _ => self.action_details = None,
                    }
                }
            }
            DefectClass::InvalidFormat => {
                self.ip_address = Some("999.999.999.999".to_string());
            }
            DefectClass::InconsistentData => {
                // Success that still reports a critical error.
                self.status_code = Some("SUCCESS".to_string());
                self.error_message = Some("Critical error occurred".to_string());
            }
            DefectClass::MalformedData => {
                let payload = pick(rng, vocab::ADVERSARIAL_PAYLOADS);
                match &mut self.action_details {
                    Some(details) => details.push_str(payload),
                    None => self.action_details = Some(payload.to_string()),
                }
            }
            DefectClass::OutOfRange => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_failure_logs_carry_an_error_message() {
        let mut rng = ChaCha8Rng::seed_from_u64(91);
        let actors: Vec<String> = (0..30).map(|i| format!("C{i:08}")).collect();
        let logs = AuditLogGenerator::new(
            FanOut::new(5, 10),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
        .generate(&actors, &mut rng, &mut DefectInjector::disabled());

        for log in &logs {
            if matches!(log.status_code.as_deref(), Some("FAILURE") | Some("ERROR")) {
                assert!(log.error_message.is_some());
            }
        }
    }

    #[test]
    fn test_every_log_names_a_known_actor() {
        let mut rng = ChaCha8Rng::seed_from_u64(92);
        let actors: Vec<String> = (0..10).map(|i| format!("EMP{i:05}")).collect();
        let logs = AuditLogGenerator::new(
            FanOut::new(1, 3),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
        .generate(&actors, &mut rng, &mut DefectInjector::disabled());

        let known: HashSet<&str> = actors.iter().map(|a| a.as_str()).collect();
        assert!(!logs.is_empty());
        for log in &logs {
            assert!(known.contains(log.user_id.as_str()));
        }
    }
}
