//! Employee model.
//!
//! This module defines the [`Employee`] struct for representing staff who
//! organize or support events.

use serde::{Deserialize, Serialize};

/// Represents an employee who can organize or support events.
///
/// The job title is a free-form label; its position in the configured
/// seniority ladder decides sort order and allowance exemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The department the employee belongs to.
    pub department: String,
    /// The employee's job title (e.g., "Manager").
    pub job_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_employee() {
        let json = r#"{
            "id": "emp_001",
            "name": "Kim Minji",
            "department": "Conference Team 1",
            "job_title": "Manager"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_001");
        assert_eq!(employee.name, "Kim Minji");
        assert_eq!(employee.department, "Conference Team 1");
        assert_eq!(employee.job_title, "Manager");
    }

    #[test]
    fn test_deserialize_employee_missing_title_fails() {
        let json = r#"{ "id": "emp_001", "name": "Kim Minji", "department": "Ops" }"#;
        assert!(serde_json::from_str::<Employee>(json).is_err());
    }
}
