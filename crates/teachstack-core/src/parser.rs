use crate::command::{usage, Command, EditFields};
use crate::error::{Result, TeachStackError};
use crate::field::{Email, Grade, Group, Name, StudentId};
use crate::student::Student;
use crate::tokenizer::{
    tokenize, Tokenized, MARKER_EMAIL, MARKER_GRADE, MARKER_GROUP, MARKER_ID, MARKER_NAME,
};
use std::collections::BTreeSet;

/// Parses one input line into a command.
///
/// The first whitespace-delimited token selects the per-keyword parser; the
/// rest of the line is handed to it verbatim. Empty input and unknown
/// keywords get their own grammar errors.
pub fn parse_command(line: &str) -> Result<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(TeachStackError::EmptyCommand);
    }
    let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim_start()),
        None => (trimmed, ""),
    };

    match keyword {
        "add" => parse_add(rest),
        "edit" => parse_edit(rest),
        "delete" => parse_id_only(rest, usage::DELETE).map(Command::Delete),
        "archive" => parse_id_only(rest, usage::ARCHIVE).map(Command::Archive),
        "unarchive" => parse_id_only(rest, usage::UNARCHIVE).map(Command::Unarchive),
        "delete_archived" => {
            parse_id_only(rest, usage::DELETE_ARCHIVED).map(Command::DeleteArchived)
        }
        "archived" => Ok(Command::ListArchived),
        "group" => parse_membership(rest, usage::GROUP)
            .map(|(group, ids)| Command::Group { group, ids }),
        "ungroup" => parse_membership(rest, usage::UNGROUP)
            .map(|(group, ids)| Command::Ungroup { group, ids }),
        "find" => parse_find(rest),
        "list" => Ok(Command::List),
        "view" => parse_id_only(rest, usage::VIEW).map(Command::View),
        "random" => parse_random(rest),
        "summary" => Ok(Command::Summary),
        "clear" => Ok(Command::Clear),
        "help" => Ok(Command::Help),
        "exit" => Ok(Command::Exit),
        _ => Err(TeachStackError::UnknownCommand(keyword.to_string())),
    }
}

fn invalid_format(usage: &'static str) -> TeachStackError {
    TeachStackError::InvalidCommandFormat { usage }
}

// ---------------------------------------------------------------------------
// Per-command parsers
// ---------------------------------------------------------------------------

const ADD_MARKERS: &[&str] = &[MARKER_NAME, MARKER_ID, MARKER_EMAIL, MARKER_GRADE, MARKER_GROUP];

fn parse_add(args: &str) -> Result<Command> {
    let toks = tokenize(args, ADD_MARKERS);
    let required_present = toks.has(MARKER_NAME)
        && toks.has(MARKER_ID)
        && toks.has(MARKER_EMAIL)
        && toks.has(MARKER_GRADE);
    if !required_present || !toks.preamble().is_empty() {
        return Err(invalid_format(usage::ADD));
    }
    toks.reject_duplicates(&[MARKER_NAME, MARKER_ID, MARKER_EMAIL, MARKER_GRADE])?;

    let (Some(name), Some(id), Some(email), Some(grade)) = (
        toks.value(MARKER_NAME),
        toks.value(MARKER_ID),
        toks.value(MARKER_EMAIL),
        toks.value(MARKER_GRADE),
    ) else {
        return Err(invalid_format(usage::ADD));
    };

    Ok(Command::Add(Student {
        name: Name::new(name)?,
        student_id: StudentId::new(id)?,
        email: Email::new(email)?,
        grade: Grade::new(grade)?,
        groups: parse_groups(&toks)?,
    }))
}

fn parse_edit(args: &str) -> Result<Command> {
    let toks = tokenize(args, ADD_MARKERS);
    if toks.preamble().is_empty() {
        return Err(invalid_format(usage::EDIT));
    }
    let target = StudentId::new(toks.preamble())?;
    toks.reject_duplicates(&[MARKER_NAME, MARKER_ID, MARKER_EMAIL, MARKER_GRADE])?;

    let fields = EditFields {
        name: toks.value(MARKER_NAME).map(Name::new).transpose()?,
        student_id: toks.value(MARKER_ID).map(StudentId::new).transpose()?,
        email: toks.value(MARKER_EMAIL).map(Email::new).transpose()?,
        grade: toks.value(MARKER_GRADE).map(Grade::new).transpose()?,
        groups: parse_groups_for_edit(&toks)?,
    };
    if fields.is_empty() {
        return Err(TeachStackError::NothingToEdit);
    }
    Ok(Command::Edit { target, fields })
}

fn parse_id_only(args: &str, usage: &'static str) -> Result<StudentId> {
    let trimmed = args.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return Err(invalid_format(usage));
    }
    StudentId::new(trimmed)
}

/// Shared grammar of `group` and `ungroup`: exactly one `g/`, one or more
/// `id/`, nothing else.
fn parse_membership(args: &str, usage: &'static str) -> Result<(Group, BTreeSet<StudentId>)> {
    let toks = tokenize(args, &[MARKER_GROUP, MARKER_ID]);
    if !toks.has(MARKER_GROUP) || !toks.has(MARKER_ID) || !toks.preamble().is_empty() {
        return Err(invalid_format(usage));
    }
    toks.reject_duplicates(&[MARKER_GROUP])?;

    let Some(group) = toks.value(MARKER_GROUP) else {
        return Err(invalid_format(usage));
    };
    let group = Group::new(group)?;
    let ids = toks
        .all_values(MARKER_ID)
        .into_iter()
        .map(StudentId::new)
        .collect::<Result<BTreeSet<_>>>()?;
    Ok((group, ids))
}

fn parse_find(args: &str) -> Result<Command> {
    let toks = tokenize(args, &[MARKER_GROUP]);
    if !toks.has(MARKER_GROUP) || !toks.preamble().is_empty() {
        return Err(invalid_format(usage::FIND));
    }
    Ok(Command::Find(parse_groups(&toks)?))
}

fn parse_random(args: &str) -> Result<Command> {
    let toks = tokenize(args, &[MARKER_GROUP]);
    let count: usize = toks
        .preamble()
        .parse()
        .map_err(|_| invalid_format(usage::RANDOM))?;
    if !toks.has(MARKER_GROUP) {
        return Err(invalid_format(usage::RANDOM));
    }
    toks.reject_duplicates(&[MARKER_GROUP])?;
    let Some(group) = toks.value(MARKER_GROUP) else {
        return Err(invalid_format(usage::RANDOM));
    };
    Ok(Command::Random {
        count,
        group: Group::new(group)?,
    })
}

// ---------------------------------------------------------------------------
// Marker helpers
// ---------------------------------------------------------------------------

fn parse_groups(toks: &Tokenized) -> Result<BTreeSet<Group>> {
    toks.all_values(MARKER_GROUP)
        .into_iter()
        .map(Group::new)
        .collect()
}

/// Edit treats a lone empty `g/` as "clear all groups"; otherwise every group
/// value must validate. `None` means the groups were not touched.
fn parse_groups_for_edit(toks: &Tokenized) -> Result<Option<BTreeSet<Group>>> {
    let values = toks.all_values(MARKER_GROUP);
    if values.is_empty() {
        return Ok(None);
    }
    if values.len() == 1 && values[0].is_empty() {
        return Ok(Some(BTreeSet::new()));
    }
    values
        .into_iter()
        .map(Group::new)
        .collect::<Result<BTreeSet<_>>>()
        .map(Some)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
