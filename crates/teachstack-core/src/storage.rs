use crate::error::{Result, TeachStackError};
use crate::field::{Email, Grade, Group, Name, StudentId};
use crate::io;
use crate::roster::Roster;
use crate::student::Student;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// Storage shapes
// ---------------------------------------------------------------------------

/// JSON shape of one student. Fields are nullable so a hand-edited file with
/// a missing key reports `missing field: ...` instead of a serde error, and
/// `to_student` re-runs the live field validators so corruption fails with
/// the same constraint messages as typed input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredStudent {
    name: Option<String>,
    student_id: Option<String>,
    email: Option<String>,
    grade: Option<String>,
    #[serde(default)]
    groups: Vec<String>,
}

impl StoredStudent {
    pub fn from_student(student: &Student) -> Self {
        StoredStudent {
            name: Some(student.name.to_string()),
            student_id: Some(student.student_id.to_string()),
            email: Some(student.email.to_string()),
            grade: Some(student.grade.to_string()),
            groups: student.groups.iter().map(|g| g.to_string()).collect(),
        }
    }

    pub fn to_student(&self) -> Result<Student> {
        let name = self
            .name
            .as_deref()
            .ok_or(TeachStackError::MissingField("name"))?;
        let student_id = self
            .student_id
            .as_deref()
            .ok_or(TeachStackError::MissingField("studentId"))?;
        let email = self
            .email
            .as_deref()
            .ok_or(TeachStackError::MissingField("email"))?;
        let grade = self
            .grade
            .as_deref()
            .ok_or(TeachStackError::MissingField("grade"))?;
        // Field order matters: the first missing or invalid field is the one
        // reported.
        let name = Name::new(name)?;
        let student_id = StudentId::new(student_id)?;
        let email = Email::new(email)?;
        let grade = Grade::new(grade)?;
        let groups = self
            .groups
            .iter()
            .map(|g| Group::new(g))
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(Student {
            name,
            student_id,
            email,
            grade,
            groups,
        })
    }
}

/// Whole-file shape: `{active: [...], archived: [...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoredRoster {
    #[serde(default)]
    pub active: Vec<StoredStudent>,
    #[serde(default)]
    pub archived: Vec<StoredStudent>,
}

impl StoredRoster {
    pub fn from_roster(roster: &Roster) -> Self {
        StoredRoster {
            active: roster.active().iter().map(StoredStudent::from_student).collect(),
            archived: roster
                .archived()
                .iter()
                .map(StoredStudent::from_student)
                .collect(),
        }
    }

    /// Fails on the first invalid record; per-partition uniqueness is
    /// re-checked so a duplicated id in the file is rejected like any other
    /// corruption.
    pub fn to_roster(&self) -> Result<Roster> {
        let mut roster = Roster::default();
        for stored in &self.active {
            roster.add(stored.to_student()?)?;
        }
        for stored in &self.archived {
            roster.add_archived(stored.to_student()?)?;
        }
        Ok(roster)
    }
}

// ---------------------------------------------------------------------------
// File round trip
// ---------------------------------------------------------------------------

/// Outcome of loading the roster file. Loading never fails: an unreadable or
/// invalid file yields an empty roster plus a warning for the UI, and a
/// missing file is just a first run.
#[derive(Debug)]
pub struct LoadReport {
    pub roster: Roster,
    pub warning: Option<String>,
}

pub fn load(path: &Path) -> LoadReport {
    if !path.exists() {
        return LoadReport {
            roster: Roster::default(),
            warning: None,
        };
    }

    let fallback = |reason: String| LoadReport {
        roster: Roster::default(),
        warning: Some(format!(
            "could not load {}: {reason}; starting with an empty roster",
            path.display()
        )),
    };

    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => return fallback(e.to_string()),
    };
    let stored: StoredRoster = match serde_json::from_str(&data) {
        Ok(stored) => stored,
        Err(e) => return fallback(e.to_string()),
    };
    match stored.to_roster() {
        Ok(roster) => LoadReport {
            roster,
            warning: None,
        },
        Err(e) => fallback(e.to_string()),
    }
}

pub fn save(path: &Path, roster: &Roster) -> Result<()> {
    let stored = StoredRoster::from_roster(roster);
    let data = serde_json::to_vec_pretty(&stored)?;
    io::atomic_write(path, &data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
