//! Seed rows and seeding configuration.

use chrono::{DateTime, Utc};
use rollbook_models::{Gender, StudentStatus, UserRole};
use uuid::Uuid;

/// Every seeded account and student e-mail uses this domain, which is how
/// `clear-seed` finds them again.
pub const SEED_EMAIL_DOMAIN: &str = "example.com";

/// Password shared by all seeded accounts.
pub const SEED_PASSWORD: &str = "password123";

pub struct UserSeed {
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub department: Option<String>,
    pub position: Option<String>,
    pub phone_number: Option<String>,
}

pub struct StudentSeed {
    pub name: String,
    pub class_name: String,
    pub section: String,
    pub roll_no: String,
    pub gender: Gender,
    pub father_name: String,
    pub mother_name: String,
    pub contact_no: String,
    pub email: Option<String>,
    pub address: String,
    pub joining_date: DateTime<Utc>,
    pub status: StudentStatus,
    pub created_by: Option<Uuid>,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub teachers: usize,
    pub staff: usize,
    pub students: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 5,
            staff: 3,
            students: 100,
        }
    }
}

impl SeedConfig {
    pub fn new(teachers: usize, students: usize) -> Self {
        Self {
            teachers,
            students,
            ..Default::default()
        }
    }

    pub fn with_staff(mut self, staff: usize) -> Self {
        self.staff = staff;
        self
    }

    pub fn total_users(&self) -> usize {
        self.teachers + self.staff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_config_builder() {
        let config = SeedConfig::new(4, 50).with_staff(2);
        assert_eq!(config.teachers, 4);
        assert_eq!(config.students, 50);
        assert_eq!(config.total_users(), 6);
    }
}
