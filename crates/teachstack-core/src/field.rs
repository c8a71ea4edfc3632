use crate::error::{Result, TeachStackError};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static STUDENT_ID_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static GROUP_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ]*$").unwrap())
}

fn student_id_re() -> &'static Regex {
    STUDENT_ID_RE.get_or_init(|| Regex::new(r"^[A-Z][0-9]{7}[A-Z]$").unwrap())
}

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+_.\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)+$").unwrap()
    })
}

fn group_re() -> &'static Regex {
    GROUP_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ]*$").unwrap())
}

/// The closed set of accepted grade tokens, in display order.
pub const VALID_GRADES: &[&str] = &[
    "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F",
];

const MAX_GROUP_LEN: usize = 50;

// ---------------------------------------------------------------------------
// Name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    /// Trims `raw` and validates it as a student name.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !name_re().is_match(trimmed) {
            return Err(TeachStackError::InvalidName(raw.to_string()));
        }
        Ok(Name(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// StudentId
// ---------------------------------------------------------------------------

/// Unique roster key: uppercase letter, seven digits, uppercase letter.
/// Case-sensitive; no trailing or embedded whitespace survives validation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !student_id_re().is_match(trimmed) {
            return Err(TeachStackError::InvalidStudentId(raw.to_string()));
        }
        Ok(StudentId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !email_re().is_match(trimmed) {
            return Err(TeachStackError::InvalidEmail(raw.to_string()));
        }
        Ok(Email(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

/// One token out of [`VALID_GRADES`]. The set is a table, not an enum, so the
/// accepted bands can change without touching match arms everywhere.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grade(String);

impl Grade {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !VALID_GRADES.contains(&trimmed) {
            return Err(TeachStackError::InvalidGrade(raw.to_string()));
        }
        Ok(Grade(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Group(String);

impl Group {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.len() > MAX_GROUP_LEN || !group_re().is_match(trimmed) {
            return Err(TeachStackError::InvalidGroup(raw.to_string()));
        }
        Ok(Group(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for raw in ["Alice Pauline", "Benson Meier", "R2", " Carl Kurz "] {
            let name = Name::new(raw).unwrap_or_else(|_| panic!("expected valid: {raw}"));
            assert_eq!(name.as_str(), raw.trim());
        }
    }

    #[test]
    fn invalid_names() {
        for raw in ["", "   ", "R@chel", "peter*", "-dash"] {
            assert!(Name::new(raw).is_err(), "expected invalid: {raw}");
        }
    }

    #[test]
    fn valid_student_ids() {
        for raw in ["A0123456A", "B9999999Z", " A0000000A "] {
            StudentId::new(raw).unwrap_or_else(|_| panic!("expected valid: {raw}"));
        }
    }

    #[test]
    fn invalid_student_ids() {
        for raw in [
            "",
            "P034&",
            "a0123456A",  // lowercase leading letter
            "A0123456a",  // lowercase check letter
            "A012345A",   // six digits
            "A01234567A", // eight digits
            "A0123456",   // no check letter
            "A 0123456A",
        ] {
            assert!(StudentId::new(raw).is_err(), "expected invalid: {raw}");
        }
    }

    #[test]
    fn valid_emails() {
        for raw in [
            "alice@example.com",
            "benson_meier@u.nus.edu",
            "a+b@mail-host.org",
        ] {
            Email::new(raw).unwrap_or_else(|_| panic!("expected valid: {raw}"));
        }
    }

    #[test]
    fn invalid_emails() {
        for raw in ["example.com", "alice@", "@example.com", "alice@localhost", ""] {
            assert!(Email::new(raw).is_err(), "expected invalid: {raw}");
        }
    }

    #[test]
    fn grade_closed_set() {
        for raw in VALID_GRADES {
            Grade::new(raw).unwrap_or_else(|_| panic!("expected valid: {raw}"));
        }
        for raw in ["F-", "E", "a", "A +", ""] {
            assert!(Grade::new(raw).is_err(), "expected invalid: {raw}");
        }
    }

    #[test]
    fn valid_groups() {
        for raw in ["Group 1", "Group 2B", "Consultation Group"] {
            Group::new(raw).unwrap_or_else(|_| panic!("expected valid: {raw}"));
        }
    }

    #[test]
    fn invalid_groups() {
        assert!(Group::new("#group").is_err());
        assert!(Group::new("").is_err());
        assert!(Group::new(&"x".repeat(51)).is_err());
        assert!(Group::new(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn constraint_messages_are_fixed() {
        let err = StudentId::new("P034&").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid student id 'P034&': must be an uppercase letter, seven digits, then an uppercase letter, e.g. A0123456B"
        );
    }
}
