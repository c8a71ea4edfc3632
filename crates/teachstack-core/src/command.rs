use crate::error::{Result, TeachStackError};
use crate::field::{Email, Grade, Group, Name, StudentId, VALID_GRADES};
use crate::roster::{Filter, Roster};
use crate::student::Student;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Usage strings
// ---------------------------------------------------------------------------

pub mod usage {
    pub const ADD: &str = "add n/NAME id/STUDENT_ID e/EMAIL gr/GRADE [g/GROUP]...";
    pub const EDIT: &str =
        "edit STUDENT_ID [n/NAME] [id/STUDENT_ID] [e/EMAIL] [gr/GRADE] [g/GROUP]...";
    pub const DELETE: &str = "delete STUDENT_ID";
    pub const ARCHIVE: &str = "archive STUDENT_ID";
    pub const UNARCHIVE: &str = "unarchive STUDENT_ID";
    pub const DELETE_ARCHIVED: &str = "delete_archived STUDENT_ID";
    pub const GROUP: &str = "group g/GROUP id/STUDENT_ID...";
    pub const UNGROUP: &str = "ungroup g/GROUP id/STUDENT_ID...";
    pub const FIND: &str = "find g/GROUP...";
    pub const VIEW: &str = "view STUDENT_ID";
    pub const RANDOM: &str = "random COUNT g/GROUP";
}

pub const HELP_TEXT: &str = "\
Commands:
  add n/NAME id/STUDENT_ID e/EMAIL gr/GRADE [g/GROUP]...   add a student
  edit STUDENT_ID [n/] [id/] [e/] [gr/] [g/]...            edit a student
  delete STUDENT_ID                                        delete a student
  archive STUDENT_ID                                       move a student to the archive
  unarchive STUDENT_ID                                     restore an archived student
  delete_archived STUDENT_ID                               delete an archived student
  archived                                                 list archived students
  group g/GROUP id/STUDENT_ID...                           add students to a group
  ungroup g/GROUP id/STUDENT_ID...                         remove students from a group
  find g/GROUP...                                          filter the list by group membership
  list                                                     show all students
  view STUDENT_ID                                          show one student in full
  random COUNT g/GROUP                                     draw random students from a group
  summary                                                  roster statistics
  clear                                                    remove all active students
  help                                                     this text
  exit                                                     leave the shell";

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of executing one command: the message for the user, whether the
/// roster changed (the caller persists iff it did), and whether the session
/// should end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub mutated: bool,
    pub exit: bool,
}

impl Outcome {
    fn shown(message: impl Into<String>) -> Self {
        Outcome {
            message: message.into(),
            mutated: false,
            exit: false,
        }
    }

    fn changed(message: impl Into<String>) -> Self {
        Outcome {
            message: message.into(),
            mutated: true,
            exit: false,
        }
    }
}

// ---------------------------------------------------------------------------
// EditFields
// ---------------------------------------------------------------------------

/// The optional replacements carried by an edit command. At least one field
/// is set; the parser rejects an empty descriptor. `groups: Some(empty)`
/// means "clear all groups".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditFields {
    pub name: Option<Name>,
    pub student_id: Option<StudentId>,
    pub email: Option<Email>,
    pub grade: Option<Grade>,
    pub groups: Option<BTreeSet<Group>>,
}

impl EditFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.student_id.is_none()
            && self.email.is_none()
            && self.grade.is_none()
            && self.groups.is_none()
    }

    fn apply(&self, original: &Student) -> Student {
        Student {
            name: self.name.clone().unwrap_or_else(|| original.name.clone()),
            student_id: self
                .student_id
                .clone()
                .unwrap_or_else(|| original.student_id.clone()),
            email: self.email.clone().unwrap_or_else(|| original.email.clone()),
            grade: self.grade.clone().unwrap_or_else(|| original.grade.clone()),
            groups: self.groups.clone().unwrap_or_else(|| original.groups.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// One parsed user intent. Immutable; executed exactly once against the
/// roster, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Student),
    Edit {
        target: StudentId,
        fields: EditFields,
    },
    Delete(StudentId),
    Archive(StudentId),
    Unarchive(StudentId),
    DeleteArchived(StudentId),
    ListArchived,
    Group {
        group: Group,
        ids: BTreeSet<StudentId>,
    },
    Ungroup {
        group: Group,
        ids: BTreeSet<StudentId>,
    },
    Find(BTreeSet<Group>),
    List,
    View(StudentId),
    Random {
        count: usize,
        group: Group,
    },
    Summary,
    Clear,
    Help,
    Exit,
}

impl Command {
    /// Applies the command to the roster. Validate-then-apply: when this
    /// returns an error the roster is exactly as it was.
    pub fn execute(&self, roster: &mut Roster) -> Result<Outcome> {
        match self {
            Command::Add(student) => {
                roster.add(student.clone())?;
                Ok(Outcome::changed(format!("Added student: {student}")))
            }

            Command::Edit { target, fields } => {
                let original = roster
                    .get(target)
                    .ok_or_else(|| TeachStackError::StudentNotFound(target.to_string()))?;
                let edited = fields.apply(original);
                roster.replace(target, edited.clone())?;
                roster.set_filter(Filter::All);
                Ok(Outcome::changed(format!("Edited student: {edited}")))
            }

            Command::Delete(id) => {
                let student = roster.remove(id)?;
                Ok(Outcome::changed(format!("Deleted student: {student}")))
            }

            Command::Archive(id) => {
                let student = roster.archive(id)?;
                Ok(Outcome::changed(format!("Archived student: {student}")))
            }

            Command::Unarchive(id) => {
                let student = roster.unarchive(id)?;
                Ok(Outcome::changed(format!("Unarchived student: {student}")))
            }

            Command::DeleteArchived(id) => {
                let student = roster.remove_archived(id)?;
                Ok(Outcome::changed(format!(
                    "Deleted archived student: {student}"
                )))
            }

            Command::ListArchived => {
                if roster.archived().is_empty() {
                    return Ok(Outcome::shown("No archived students"));
                }
                let mut message = format!("{} archived students:", roster.archived().len());
                for student in roster.archived() {
                    message.push_str("\n  ");
                    message.push_str(&student.summary_line());
                }
                Ok(Outcome::shown(message))
            }

            Command::Group { group, ids } => {
                let tagged = roster.add_group(group, ids)?;
                Ok(Outcome::changed(format!(
                    "Added group '{group}' to {tagged} of {} students",
                    ids.len()
                )))
            }

            Command::Ungroup { group, ids } => {
                let untagged = roster.remove_group(group, ids)?;
                Ok(Outcome::changed(format!(
                    "Removed group '{group}' from {untagged} of {} students",
                    ids.len()
                )))
            }

            Command::Find(groups) => {
                roster.set_filter(Filter::InGroups(groups.clone()));
                Ok(Outcome::shown(listing(roster)))
            }

            Command::List => {
                roster.set_filter(Filter::All);
                Ok(Outcome::shown(listing(roster)))
            }

            Command::View(id) => {
                let student = roster
                    .get(id)
                    .ok_or_else(|| TeachStackError::StudentNotFound(id.to_string()))?;
                let groups: Vec<&str> = student.groups.iter().map(|g| g.as_str()).collect();
                Ok(Outcome::shown(format!(
                    "Name:   {}\nId:     {}\nEmail:  {}\nGrade:  {}\nGroups: {}",
                    student.name,
                    student.student_id,
                    student.email,
                    student.grade,
                    if groups.is_empty() {
                        "-".to_string()
                    } else {
                        groups.join(", ")
                    },
                )))
            }

            Command::Random { count, group } => {
                let members: Vec<&Student> = roster
                    .active()
                    .iter()
                    .filter(|s| s.has_group(group))
                    .collect();
                if members.is_empty() {
                    return Err(TeachStackError::EmptyGroup(group.to_string()));
                }
                if *count == 0 || *count > members.len() {
                    return Err(TeachStackError::BadDrawCount {
                        requested: *count,
                        available: members.len(),
                    });
                }
                let mut drawn = members;
                drawn.shuffle(&mut rand::thread_rng());
                drawn.truncate(*count);
                let mut message = format!("Drew {count} from group '{group}':");
                for student in drawn {
                    message.push_str("\n  ");
                    message.push_str(&student.summary_line());
                }
                Ok(Outcome::shown(message))
            }

            Command::Summary => {
                let mut message = format!(
                    "Total students: {} active, {} archived",
                    roster.active().len(),
                    roster.archived().len()
                );
                for &grade in VALID_GRADES {
                    let count = roster
                        .active()
                        .iter()
                        .filter(|s| s.grade.as_str() == grade)
                        .count();
                    if count > 0 {
                        message.push_str(&format!("\n  {grade}: {count}"));
                    }
                }
                Ok(Outcome::shown(message))
            }

            Command::Clear => {
                roster.clear_active();
                Ok(Outcome::changed("Roster has been cleared"))
            }

            Command::Help => Ok(Outcome::shown(HELP_TEXT)),

            Command::Exit => Ok(Outcome {
                message: "Exiting TeachStack".to_string(),
                mutated: false,
                exit: true,
            }),
        }
    }
}

fn listing(roster: &Roster) -> String {
    let visible = roster.visible();
    let mut message = format!("{} students listed", visible.len());
    for student in visible {
        message.push_str("\n  ");
        message.push_str(&student.summary_line());
    }
    message
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
