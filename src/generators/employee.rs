// 👔 Employee Generator - branch staff with an acyclic manager hierarchy
//
// Two-pass construction guarantees the self-reference can never cycle: pass
// one creates exactly one Branch Manager per branch with no manager of their
// own, pass two fills the remaining headcount with staff whose manager_id
// only ever points at an employee created in pass one.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{datetime_days_back, fmt_date, fmt_datetime, pick, unique_id, weighted_pick};
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Branch, Employee, TableKind};
use crate::vocab;

pub struct EmployeeGenerator {
    count: usize,
    today: NaiveDate,
}

impl EmployeeGenerator {
    pub fn new(count: usize, today: NaiveDate) -> Self {
        EmployeeGenerator { count, today }
    }

    pub fn generate(
        &self,
        branches: &[Branch],
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<Employee> {
        let mut employees = Vec::with_capacity(self.count);
        let mut employee_ids = HashSet::new();
        // branch_id -> manager employee_id, filled during pass one.
        let mut managers: HashMap<String, String> = HashMap::new();

        // Pass one: every branch gets its manager, top of the hierarchy.
        for branch in branches {
            let employee_id = unique_id(rng, &mut employee_ids, "EMP", 10_000, 99_999);
            managers.insert(branch.branch_id.clone(), employee_id.clone());

            let mut manager = self.build_employee(
                rng,
                employee_id,
                branch.branch_id.clone(),
                "Branch Manager",
                Some("Branch Management".to_string()),
                None,
                365,
                365 * 10,
            );
            manager.status = "Active".to_string();
            injector.maybe_corrupt(&mut manager, rng);
            employees.push(manager);
        }

        // Pass two: remaining staff, managed by their branch's manager.
        let remaining = self.count.saturating_sub(branches.len());
        for _ in 0..remaining {
            let branch = &branches[rng.gen_range(0..branches.len())];
            let role = pick(rng, vocab::EMPLOYEE_ROLES);
            let manager_id = if role == "Branch Manager" {
                None
            } else {
                managers.get(&branch.branch_id).cloned()
            };

            let employee_id = unique_id(rng, &mut employee_ids, "EMP", 10_000, 99_999);
            let department = pick(rng, vocab::DEPARTMENT_TYPES).to_string();
            let mut employee = self.build_employee(
                rng,
                employee_id,
                branch.branch_id.clone(),
                role,
                Some(department),
                manager_id,
                30,
                365 * 5,
            );
            employee.status =
                weighted_pick(rng, &["Active", "Inactive", "On Leave"], &[0.9, 0.05, 0.05])
                    .to_string();
            injector.maybe_corrupt(&mut employee, rng);
            employees.push(employee);
        }

        employees
    }

    #[allow(clippy::too_many_arguments)]
    fn build_employee(
        &self,
        rng: &mut ChaCha8Rng,
        employee_id: String,
        branch_id: String,
        role: &str,
        department: Option<String>,
        manager_id: Option<String>,
        min_tenure_days: i64,
        max_tenure_days: i64,
    ) -> Employee {
        let first_name = pick(rng, vocab::FIRST_NAMES).to_string();
        let last_name = pick(rng, vocab::LAST_NAMES).to_string();
        let (salary_low, salary_high) = vocab::salary_band(role);
        let hired = datetime_days_back(rng, self.today, min_tenure_days, max_tenure_days);
        let created = datetime_days_back(rng, self.today, 0, 30);

        Employee {
            employee_id,
            branch_id,
            email: Some(format!(
                "{}.{}@bank.com",
                first_name.to_lowercase(),
                last_name.to_lowercase()
            )),
            first_name,
            last_name,
            phone_extension: Some(format!("x{}", rng.gen_range(1000..=9999))),
            role: role.to_string(),
            department,
            salary: Some(rng.gen_range(salary_low..=salary_high) as f64),
            hire_date: fmt_date(hired.date()),
            manager_id,
            status: "Active".to_string(),
            created_at: fmt_datetime(created),
            is_bad_data: false,
            bad_data_type: None,
        }
    }
}

impl Corruptible for Employee {
    const TABLE: TableKind = TableKind::Employees;
    const SUPPORTED: &'static [DefectClass] = &[
        DefectClass::MissingData,
        DefectClass::InvalidFormat,
        DefectClass::OutOfRange,
        DefectClass::InconsistentData,
    ];

    fn record_id(&self) -> &str {
        &self.employee_id
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
                        0 => self.email = None,
                        1 => self.phone_extension = None,
                        2 => self.salary = None,
                        _ => self.department = None,
                    }
                }
            }
            DefectClass::InvalidFormat => {
                self.email = Some("invalid-email".to_string());
            }
            DefectClass::OutOfRange => {
                self.salary = Some(-50_000.0);
            }
            DefectClass::InconsistentData => {
                // Teller paid like a manager.
                self.role = "Teller".to_string();
                self.salary = Some(100_000.0);
            }
            DefectClass::MalformedData => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::branch::BranchGenerator;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn generate_staff(seed: u64, branches: usize, count: usize) -> Vec<Employee> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let branches = BranchGenerator::new(branches, today())
            .generate(&mut rng, &mut DefectInjector::disabled());
        EmployeeGenerator::new(count, today()).generate(
            &branches,
            &mut rng,
            &mut DefectInjector::disabled(),
        )
    }

    #[test]
    fn test_manager_chains_terminate() {
        let employees = generate_staff(61, 10, 120);
        let by_id: HashMap<&str, &Employee> = employees
            .iter()
            .map(|e| (e.employee_id.as_str(), e))
            .collect();

        for employee in &employees {
            let mut seen = HashSet::new();
            let mut current = employee;
            while let Some(manager_id) = &current.manager_id {
                assert!(
                    seen.insert(manager_id.clone()),
                    "cycle through {manager_id}"
                );
                current = by_id.get(manager_id.as_str()).expect("dangling manager_id");
            }
        }
    }

    #[test]
    fn test_some_employees_have_no_manager() {
        let employees = generate_staff(62, 8, 100);
        let top_count = employees.iter().filter(|e| e.manager_id.is_none()).count();
        assert!(top_count >= 8, "expected at least one top per branch");
    }

    #[test]
    fn test_managers_belong_to_same_branch() {
        let employees = generate_staff(63, 6, 80);
        let by_id: HashMap<&str, &Employee> = employees
            .iter()
            .map(|e| (e.employee_id.as_str(), e))
            .collect();

        for employee in &employees {
            if let Some(manager_id) = &employee.manager_id {
                let manager = by_id.get(manager_id.as_str()).expect("dangling manager_id");
                assert_eq!(manager.branch_id, employee.branch_id);
                assert_eq!(manager.role, "Branch Manager");
            }
        }
    }
}
