use crate::error::{Result, TeachStackError};
use crate::field::{Group, StudentId};
use crate::student::Student;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Predicate over the active view. `InGroups` matches students belonging to
/// every listed group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    InGroups(BTreeSet<Group>),
}

impl Filter {
    pub fn matches(&self, student: &Student) -> bool {
        match self {
            Filter::All => true,
            Filter::InGroups(groups) => groups.iter().all(|g| student.has_group(g)),
        }
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// In-memory model: the active and archived partitions plus the current view
/// filter. Student ids are unique within each partition independently; the
/// mutating methods below are the only write paths and each enforces that
/// invariant before touching either list.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    active: Vec<Student>,
    archived: Vec<Student>,
    filter: Filter,
}

impl Roster {
    pub fn new(active: Vec<Student>, archived: Vec<Student>) -> Self {
        Roster {
            active,
            archived,
            filter: Filter::All,
        }
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn active(&self) -> &[Student] {
        &self.active
    }

    pub fn archived(&self) -> &[Student] {
        &self.archived
    }

    pub fn get(&self, id: &StudentId) -> Option<&Student> {
        self.active.iter().find(|s| s.student_id == *id)
    }

    pub fn get_archived(&self, id: &StudentId) -> Option<&Student> {
        self.archived.iter().find(|s| s.student_id == *id)
    }

    pub fn contains(&self, id: &StudentId) -> bool {
        self.get(id).is_some()
    }

    pub fn contains_archived(&self, id: &StudentId) -> bool {
        self.get_archived(id).is_some()
    }

    /// The active students matching the current filter, in roster order.
    pub fn visible(&self) -> Vec<&Student> {
        self.active.iter().filter(|s| self.filter.matches(s)).collect()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    // -----------------------------------------------------------------------
    // Mutations (each validates before applying)
    // -----------------------------------------------------------------------

    pub fn add(&mut self, student: Student) -> Result<()> {
        if self.contains(&student.student_id) {
            return Err(TeachStackError::DuplicateStudent(
                student.student_id.to_string(),
            ));
        }
        self.active.push(student);
        Ok(())
    }

    pub fn add_archived(&mut self, student: Student) -> Result<()> {
        if self.contains_archived(&student.student_id) {
            return Err(TeachStackError::DuplicateArchivedStudent(
                student.student_id.to_string(),
            ));
        }
        self.archived.push(student);
        Ok(())
    }

    pub fn remove(&mut self, id: &StudentId) -> Result<Student> {
        let pos = self
            .active
            .iter()
            .position(|s| s.student_id == *id)
            .ok_or_else(|| TeachStackError::StudentNotFound(id.to_string()))?;
        Ok(self.active.remove(pos))
    }

    /// Replaces the student keyed by `target` with `edited`, in place. When the
    /// edit changes the id, the new id must not collide with another active
    /// student.
    pub fn replace(&mut self, target: &StudentId, edited: Student) -> Result<()> {
        let pos = self
            .active
            .iter()
            .position(|s| s.student_id == *target)
            .ok_or_else(|| TeachStackError::StudentNotFound(target.to_string()))?;
        if edited.student_id != *target && self.contains(&edited.student_id) {
            return Err(TeachStackError::DuplicateStudent(
                edited.student_id.to_string(),
            ));
        }
        self.active[pos] = edited;
        Ok(())
    }

    pub fn archive(&mut self, id: &StudentId) -> Result<Student> {
        if !self.contains(id) {
            return Err(TeachStackError::StudentNotFound(id.to_string()));
        }
        if self.contains_archived(id) {
            return Err(TeachStackError::DuplicateArchivedStudent(id.to_string()));
        }
        let student = self.remove(id)?;
        self.archived.push(student.clone());
        Ok(student)
    }

    pub fn unarchive(&mut self, id: &StudentId) -> Result<Student> {
        let pos = self
            .archived
            .iter()
            .position(|s| s.student_id == *id)
            .ok_or_else(|| TeachStackError::ArchivedStudentNotFound(id.to_string()))?;
        if self.contains(id) {
            return Err(TeachStackError::DuplicateStudent(id.to_string()));
        }
        let student = self.archived.remove(pos);
        self.active.push(student.clone());
        Ok(student)
    }

    pub fn remove_archived(&mut self, id: &StudentId) -> Result<Student> {
        let pos = self
            .archived
            .iter()
            .position(|s| s.student_id == *id)
            .ok_or_else(|| TeachStackError::ArchivedStudentNotFound(id.to_string()))?;
        Ok(self.archived.remove(pos))
    }

    /// Adds `group` to every student named in `ids`. Every id must exist in
    /// the active roster; nothing is tagged otherwise. Returns how many
    /// students were newly tagged.
    pub fn add_group(&mut self, group: &Group, ids: &BTreeSet<StudentId>) -> Result<usize> {
        for id in ids {
            if !self.contains(id) {
                return Err(TeachStackError::StudentNotFound(id.to_string()));
            }
        }
        let mut changed = 0;
        for student in &mut self.active {
            if ids.contains(&student.student_id) && student.groups.insert(group.clone()) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Removes `group` from every student named in `ids`, with the same
    /// all-ids-must-exist check as [`Roster::add_group`].
    pub fn remove_group(&mut self, group: &Group, ids: &BTreeSet<StudentId>) -> Result<usize> {
        for id in ids {
            if !self.contains(id) {
                return Err(TeachStackError::StudentNotFound(id.to_string()));
            }
        }
        let mut changed = 0;
        for student in &mut self.active {
            if ids.contains(&student.student_id) && student.groups.remove(group) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    pub fn clear_active(&mut self) {
        self.active.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Email, Grade, Name};

    fn student(name: &str, id: &str) -> Student {
        Student {
            name: Name::new(name).unwrap(),
            student_id: StudentId::new(id).unwrap(),
            email: Email::new("someone@example.com").unwrap(),
            grade: Grade::new("B+").unwrap(),
            groups: BTreeSet::new(),
        }
    }

    fn id(raw: &str) -> StudentId {
        StudentId::new(raw).unwrap()
    }

    #[test]
    fn add_then_get() {
        let mut roster = Roster::default();
        roster.add(student("Alice", "A0123456A")).unwrap();
        assert_eq!(roster.get(&id("A0123456A")).unwrap().name.as_str(), "Alice");
    }

    #[test]
    fn add_duplicate_leaves_roster_unchanged() {
        let mut roster = Roster::default();
        roster.add(student("Alice", "A0123456A")).unwrap();
        let err = roster.add(student("Other Alice", "A0123456A")).unwrap_err();
        assert!(matches!(err, TeachStackError::DuplicateStudent(_)));
        assert_eq!(roster.active().len(), 1);
        assert_eq!(roster.get(&id("A0123456A")).unwrap().name.as_str(), "Alice");
    }

    #[test]
    fn remove_missing_fails() {
        let mut roster = Roster::default();
        assert!(matches!(
            roster.remove(&id("A0123456A")),
            Err(TeachStackError::StudentNotFound(_))
        ));
    }

    #[test]
    fn replace_preserves_position() {
        let mut roster = Roster::default();
        roster.add(student("Alice", "A0123456A")).unwrap();
        roster.add(student("Bob", "A0234567B")).unwrap();
        roster
            .replace(&id("A0123456A"), student("Alice Tan", "A0123456A"))
            .unwrap();
        assert_eq!(roster.active()[0].name.as_str(), "Alice Tan");
    }

    #[test]
    fn replace_rejects_id_collision() {
        let mut roster = Roster::default();
        roster.add(student("Alice", "A0123456A")).unwrap();
        roster.add(student("Bob", "A0234567B")).unwrap();
        let err = roster
            .replace(&id("A0123456A"), student("Alice", "A0234567B"))
            .unwrap_err();
        assert!(matches!(err, TeachStackError::DuplicateStudent(_)));
    }

    #[test]
    fn replace_allows_same_id() {
        let mut roster = Roster::default();
        roster.add(student("Alice", "A0123456A")).unwrap();
        roster
            .replace(&id("A0123456A"), student("Alice Tan", "A0123456A"))
            .unwrap();
    }

    #[test]
    fn archive_round_trip() {
        let mut roster = Roster::default();
        roster.add(student("Alice", "A0123456A")).unwrap();
        roster.archive(&id("A0123456A")).unwrap();
        assert!(roster.active().is_empty());
        assert!(roster.contains_archived(&id("A0123456A")));

        roster.unarchive(&id("A0123456A")).unwrap();
        assert!(roster.archived().is_empty());
        assert!(roster.contains(&id("A0123456A")));
    }

    #[test]
    fn archive_rejects_archived_duplicate() {
        let mut roster = Roster::new(
            vec![student("Alice", "A0123456A")],
            vec![student("Old Alice", "A0123456A")],
        );
        let err = roster.archive(&id("A0123456A")).unwrap_err();
        assert!(matches!(err, TeachStackError::DuplicateArchivedStudent(_)));
        assert_eq!(roster.active().len(), 1);
        assert_eq!(roster.archived().len(), 1);
    }

    #[test]
    fn unarchive_rejects_active_duplicate() {
        let mut roster = Roster::new(
            vec![student("New Alice", "A0123456A")],
            vec![student("Alice", "A0123456A")],
        );
        let err = roster.unarchive(&id("A0123456A")).unwrap_err();
        assert!(matches!(err, TeachStackError::DuplicateStudent(_)));
        assert_eq!(roster.archived().len(), 1);
    }

    #[test]
    fn remove_archived() {
        let mut roster = Roster::new(vec![], vec![student("Alice", "A0123456A")]);
        roster.remove_archived(&id("A0123456A")).unwrap();
        assert!(roster.archived().is_empty());
    }

    #[test]
    fn filter_in_groups_requires_all() {
        let mut roster = Roster::default();
        let mut alice = student("Alice", "A0123456A");
        alice.groups.insert(Group::new("Group 1").unwrap());
        alice.groups.insert(Group::new("Group 2B").unwrap());
        let mut bob = student("Bob", "A0234567B");
        bob.groups.insert(Group::new("Group 1").unwrap());
        roster.add(alice).unwrap();
        roster.add(bob).unwrap();

        roster.set_filter(Filter::InGroups(
            [Group::new("Group 1").unwrap(), Group::new("Group 2B").unwrap()]
                .into_iter()
                .collect(),
        ));
        let visible = roster.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name.as_str(), "Alice");

        roster.set_filter(Filter::All);
        assert_eq!(roster.visible().len(), 2);
    }

    #[test]
    fn add_group_tags_all_or_nothing() {
        let mut roster = Roster::default();
        roster.add(student("Alice", "A0123456A")).unwrap();
        roster.add(student("Bob", "A0234567B")).unwrap();

        let group = Group::new("Group 2B").unwrap();
        let ids: BTreeSet<StudentId> = [id("A0123456A"), id("A9999999Z")].into_iter().collect();
        let err = roster.add_group(&group, &ids).unwrap_err();
        assert!(matches!(err, TeachStackError::StudentNotFound(_)));
        // Alice was listed first but must not have been tagged
        assert!(!roster.get(&id("A0123456A")).unwrap().has_group(&group));

        let ids: BTreeSet<StudentId> = [id("A0123456A"), id("A0234567B")].into_iter().collect();
        assert_eq!(roster.add_group(&group, &ids).unwrap(), 2);
        // Re-tagging is a no-op
        assert_eq!(roster.add_group(&group, &ids).unwrap(), 0);
    }

    #[test]
    fn remove_group_counts_actual_removals() {
        let mut roster = Roster::default();
        let mut alice = student("Alice", "A0123456A");
        let group = Group::new("Group 1").unwrap();
        alice.groups.insert(group.clone());
        roster.add(alice).unwrap();
        roster.add(student("Bob", "A0234567B")).unwrap();

        let ids: BTreeSet<StudentId> = [id("A0123456A"), id("A0234567B")].into_iter().collect();
        assert_eq!(roster.remove_group(&group, &ids).unwrap(), 1);
        assert!(!roster.get(&id("A0123456A")).unwrap().has_group(&group));
    }

    #[test]
    fn clear_active_keeps_archive() {
        let mut roster = Roster::new(
            vec![student("Alice", "A0123456A")],
            vec![student("Bob", "A0234567B")],
        );
        roster.clear_active();
        assert!(roster.active().is_empty());
        assert_eq!(roster.archived().len(), 1);
    }
}
