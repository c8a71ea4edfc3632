use crate::field::{Email, Grade, Group, Name, StudentId};
use std::collections::BTreeSet;
use std::fmt;

/// One roster record. Field types enforce their own constraints, so a
/// `Student` can only hold validated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub name: Name,
    pub student_id: StudentId,
    pub email: Email,
    pub grade: Grade,
    pub groups: BTreeSet<Group>,
}

impl Student {
    pub fn has_group(&self, group: &Group) -> bool {
        self.groups.contains(group)
    }

    /// One-line rendering used in command result messages.
    pub fn summary_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; id: {}; email: {}; grade: {}",
            self.name, self.student_id, self.email, self.grade
        )?;
        if !self.groups.is_empty() {
            let groups: Vec<&str> = self.groups.iter().map(|g| g.as_str()).collect();
            write!(f, "; groups: [{}]", groups.join(", "))?;
        }
        Ok(())
    }
}
