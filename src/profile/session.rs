use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::profile::chunks::{compress, Chunk};
use crate::profile::delete::{delete_chunk, DeleteRejected};
use crate::profile::edit::{ChunkEdit, ChunkEditor, ValidationError};
use crate::profile::priority::ProfileList;
use crate::profile::records::DayRecords;
use crate::profile::{DayOfWeek, Profile};
use crate::time_util::mytime::TimeProvider;

pub const NEW_PROFILE_NAME: &str = "New Profile";

#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    /// The default profile's days and bands cannot be changed.
    Locked,
    Invalid(ValidationError),
    Delete(DeleteRejected),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::Locked => write!(f, "The default profile cannot be changed."),
            EditError::Invalid(e) => write!(f, "{}", e),
            EditError::Delete(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EditError {}

impl From<ValidationError> for EditError {
    fn from(e: ValidationError) -> Self {
        EditError::Invalid(e)
    }
}

impl From<DeleteRejected> for EditError {
    fn from(e: DeleteRejected) -> Self {
        EditError::Delete(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveValidationError {
    DuplicateName(String),
    FromNotBeforeTo { from: NaiveDate, to: NaiveDate },
}

impl Display for SaveValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveValidationError::DuplicateName(_) => {
                write!(f, "A profile with this name already exists. Please choose a unique name.")
            }
            SaveValidationError::FromNotBeforeTo { .. } => {
                write!(f, "The 'Active From' date must be before the 'Active To' date.")
            }
        }
    }
}

impl std::error::Error for SaveValidationError {}

/// One profile open for editing. Every change replaces the record array wholesale,
/// so the profile as loaded is kept alongside to tell whether anything changed.
#[derive(Debug, Clone)]
pub struct EditingSession {
    /// The profile as loaded, `None` when creating a new one.
    original: Option<Profile>,
    draft: Profile,
    editor: ChunkEditor,
    /// Fixed when the session starts, so renaming the draft cannot unlock it.
    locked: bool,
}

impl EditingSession {
    pub fn open(profile: Profile, editor: ChunkEditor) -> Self {
        debug!("Opening {} for editing", profile);
        Self {
            locked: profile.is_default(),
            original: Some(profile.clone()),
            draft: profile,
            editor,
        }
    }

    /// Start a new profile with defaults: active from today for a year, no days,
    /// the configured band all day and a priority above every existing profile.
    pub fn new_profile(existing: &ProfileList, config: &EditorConfig, time_provider: &impl TimeProvider) -> Self {
        let today = time_provider.get_local_date();
        let profile = Profile::new(
            Uuid::new_v4().to_string(),
            NEW_PROFILE_NAME.to_owned(),
            existing.next_priority(),
            today,
            one_year_after(today),
            BTreeSet::new(),
            DayRecords::uniform(*config.get_new_profile_band()),
        );
        info!("Creating new profile {}", profile);
        Self {
            original: None,
            draft: profile,
            editor: ChunkEditor::new(config.get_min_band_width()),
            locked: false,
        }
    }

    pub fn get_profile(&self) -> &Profile {
        &self.draft
    }

    /// Name the profile had when it was loaded, `None` for a new profile.
    pub fn get_original_name(&self) -> Option<&str> {
        self.original.as_ref().map(Profile::get_name)
    }

    pub fn is_new(&self) -> bool {
        self.original.is_none()
    }

    /// Whether this is the default profile, whose name, dates, days and bands are fixed.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether saving would change anything. New profiles always count as changed.
    pub fn has_changes(&self) -> bool {
        match &self.original {
            None => true,
            Some(original) => *original != self.draft,
        }
    }

    /// The chunks of the current draft, indexed for this edit cycle.
    pub fn chunks(&self) -> Vec<Chunk> {
        compress(self.draft.get_records().records())
    }

    pub fn submit_edit(&mut self, edit: &ChunkEdit) -> Result<(), EditError> {
        self.check_unlocked()?;
        let updated = self.editor.apply(self.draft.get_records(), edit)?;
        self.draft.set_records(updated);
        Ok(())
    }

    /// Delete the chunk at `index` of [`Self::chunks`]. The first and last chunks are kept.
    pub fn delete_chunk(&mut self, index: usize) -> Result<(), EditError> {
        self.check_unlocked()?;
        let chunks = self.chunks();
        let chunk = chunks.get(index).ok_or(DeleteRejected::UnknownChunk { index })?;
        if chunk.is_first() {
            return Err(DeleteRejected::FirstChunk.into());
        }
        if chunk.is_last() {
            return Err(DeleteRejected::LastChunk.into());
        }
        let updated = delete_chunk(self.draft.get_records(), chunk)?;
        self.draft.set_records(updated);
        Ok(())
    }

    pub fn set_name(&mut self, name: String) -> Result<(), EditError> {
        self.check_unlocked()?;
        self.draft.set_name(name);
        Ok(())
    }

    pub fn set_dates(&mut self, from_date: NaiveDate, to_date: NaiveDate) -> Result<(), EditError> {
        self.check_unlocked()?;
        self.draft.set_dates(from_date, to_date);
        Ok(())
    }

    pub fn toggle_day(&mut self, day: DayOfWeek) -> Result<(), EditError> {
        self.check_unlocked()?;
        let days = self.draft.days_mut();
        if !days.remove(&day) {
            days.insert(day);
        }
        Ok(())
    }

    /// Checks made before handing the profile to the store.
    /// The default profile cannot be renamed or re-dated, so it is saved as is.
    pub fn validate_for_save(&self, all_profiles: &ProfileList) -> Result<(), SaveValidationError> {
        if self.is_locked() {
            return Ok(());
        }
        let name = self.draft.get_name();
        let duplicate = all_profiles
            .iter()
            .filter(|other| other.get_key() != self.draft.get_key())
            .any(|other| other.get_name() == name);
        if duplicate {
            return Err(SaveValidationError::DuplicateName(name.to_owned()));
        }

        let (from, to) = (self.draft.get_from_date(), self.draft.get_to_date());
        if from >= to {
            return Err(SaveValidationError::FromNotBeforeTo { from, to });
        }
        Ok(())
    }

    fn check_unlocked(&self) -> Result<(), EditError> {
        if self.is_locked() {
            return Err(EditError::Locked);
        }
        Ok(())
    }
}

fn one_year_after(date: NaiveDate) -> NaiveDate {
    date.with_year(date.year() + 1)
        // 29th February
        .or_else(|| date.succ_opt().and_then(|next| next.with_year(date.year() + 1)))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::edit::EditTarget;
    use crate::profile::test_utils::{band, day_of};
    use crate::time_util::mytime::DummyTimeProvider;
    use crate::time_util::test_utils::{date, slot};

    fn profile(key: &str, name: &str, records: DayRecords) -> Profile {
        Profile::new(
            key.to_owned(),
            name.to_owned(),
            1,
            date(2024, 1, 1),
            date(2025, 1, 1),
            BTreeSet::from([DayOfWeek::Monday]),
            records,
        )
    }

    fn three_chunk_day() -> DayRecords {
        day_of(&[(0, band(18.0, 21.0)), (16, band(19.0, 23.0)), (34, band(18.0, 21.0))])
    }

    #[test]
    fn test_opened_session_has_no_changes() {
        let session = EditingSession::open(profile("a", "Weekdays", three_chunk_day()), ChunkEditor::default());
        assert!(!session.has_changes());
        assert!(!session.is_new());
        assert_eq!(session.get_original_name(), Some("Weekdays"));
        assert_eq!(session.chunks().len(), 3);
    }

    #[test]
    fn test_edit_marks_changed_and_revert_clears() {
        let mut session = EditingSession::open(profile("a", "Weekdays", three_chunk_day()), ChunkEditor::default());
        let chunks = session.chunks();

        let mut edit = ChunkEdit::for_chunk(&chunks[1]);
        edit.set_band(band(20.0, 22.0));
        session.submit_edit(&edit).unwrap();
        assert!(session.has_changes());
        assert_eq!(session.chunks()[1].get_band(), band(20.0, 22.0));

        edit.set_band(band(19.0, 23.0));
        session.submit_edit(&edit).unwrap();
        assert!(!session.has_changes());
    }

    #[test]
    fn test_invalid_edit_keeps_other_changes() {
        let mut session = EditingSession::open(profile("a", "Weekdays", three_chunk_day()), ChunkEditor::default());
        session.set_name("Workdays".to_owned()).unwrap();

        let edit = ChunkEdit::new(EditTarget::New, slot(10, 0), slot(9, 0), band(18.0, 21.0));
        let result = session.submit_edit(&edit);

        assert!(matches!(result, Err(EditError::Invalid(ValidationError::StartNotBeforeEnd { .. }))));
        assert_eq!(session.get_profile().get_name(), "Workdays");
        assert_eq!(session.get_profile().get_records(), &three_chunk_day());
    }

    #[test]
    fn test_delete_middle_chunk() {
        let mut session = EditingSession::open(profile("a", "Weekdays", three_chunk_day()), ChunkEditor::default());
        session.delete_chunk(1).unwrap();
        assert_eq!(session.chunks().len(), 1);
        assert!(session.has_changes());
    }

    #[test]
    fn test_rejected_delete_is_not_a_change() {
        let mut session = EditingSession::open(profile("a", "Weekdays", three_chunk_day()), ChunkEditor::default());
        assert_eq!(session.delete_chunk(0), Err(EditError::Delete(DeleteRejected::FirstChunk)));
        assert_eq!(session.delete_chunk(2), Err(EditError::Delete(DeleteRejected::LastChunk)));
        assert_eq!(
            session.delete_chunk(3),
            Err(EditError::Delete(DeleteRejected::UnknownChunk { index: 3 }))
        );
        assert!(!session.has_changes());
    }

    #[test]
    fn test_default_profile_is_locked() {
        let mut session = EditingSession::open(profile("d", "Default", three_chunk_day()), ChunkEditor::default());
        assert!(session.is_locked());
        assert_eq!(session.toggle_day(DayOfWeek::Friday), Err(EditError::Locked));
        assert_eq!(session.delete_chunk(1), Err(EditError::Locked));
        let edit = ChunkEdit::for_chunk(&session.chunks()[1]);
        assert_eq!(session.submit_edit(&edit), Err(EditError::Locked));
        assert!(!session.has_changes());
    }

    #[test]
    fn test_default_profile_cannot_be_renamed_or_redated() {
        let existing = ProfileList::from_profiles(vec![profile("d", "Default", three_chunk_day())]);
        let mut session = EditingSession::open(profile("d", "Default", three_chunk_day()), ChunkEditor::default());

        assert_eq!(session.set_dates(date(2025, 6, 1), date(2024, 1, 1)), Err(EditError::Locked));
        assert_eq!(session.set_name("Holiday".to_owned()), Err(EditError::Locked));

        assert!(session.is_locked());
        assert_eq!(session.toggle_day(DayOfWeek::Friday), Err(EditError::Locked));
        assert_eq!(session.get_profile().get_name(), "Default");
        assert_eq!(session.get_profile().get_from_date(), date(2024, 1, 1));
        assert_eq!(session.validate_for_save(&existing), Ok(()));
        assert!(!session.has_changes());
    }

    #[test]
    fn test_renaming_onto_default_does_not_lock() {
        let mut session = EditingSession::open(profile("a", "Weekdays", three_chunk_day()), ChunkEditor::default());
        session.set_name("Default Weekdays".to_owned()).unwrap();
        assert!(!session.is_locked());
        assert_eq!(session.toggle_day(DayOfWeek::Friday), Ok(()));
    }

    #[test]
    fn test_toggle_day() {
        let mut session = EditingSession::open(profile("a", "Weekdays", three_chunk_day()), ChunkEditor::default());
        session.toggle_day(DayOfWeek::Tuesday).unwrap();
        assert!(session.get_profile().get_days().contains(&DayOfWeek::Tuesday));
        assert!(session.has_changes());
        session.toggle_day(DayOfWeek::Tuesday).unwrap();
        assert!(!session.has_changes());
    }

    #[test]
    fn test_new_profile_defaults() {
        let existing = ProfileList::from_profiles(vec![
            profile("a", "Weekdays", three_chunk_day()),
            profile("b", "Weekends", three_chunk_day()),
        ]);
        let time_provider = DummyTimeProvider::at_date(date(2024, 3, 15));

        let session = EditingSession::new_profile(&existing, &EditorConfig::default(), &time_provider);

        let new = session.get_profile();
        assert!(session.is_new());
        assert!(session.has_changes());
        assert_eq!(session.get_original_name(), None);
        assert_eq!(new.get_name(), NEW_PROFILE_NAME);
        assert_eq!(new.get_priority(), 2);
        assert_eq!(new.get_from_date(), date(2024, 3, 15));
        assert_eq!(new.get_to_date(), date(2025, 3, 15));
        assert!(new.get_days().is_empty());
        assert_eq!(new.get_records(), &DayRecords::uniform(band(18.0, 21.0)));
        assert!(Uuid::parse_str(new.get_key()).is_ok());
    }

    #[test]
    fn test_save_validation() {
        let existing = ProfileList::from_profiles(vec![
            profile("a", "Weekdays", three_chunk_day()),
            profile("b", "Weekends", three_chunk_day()),
        ]);
        let mut session = EditingSession::open(profile("a", "Weekdays", three_chunk_day()), ChunkEditor::default());
        assert_eq!(session.validate_for_save(&existing), Ok(()));

        session.set_name("Weekends".to_owned()).unwrap();
        let result = session.validate_for_save(&existing);
        assert_eq!(result, Err(SaveValidationError::DuplicateName("Weekends".to_owned())));
        assert_eq!(
            result.unwrap_err().to_string(),
            "A profile with this name already exists. Please choose a unique name."
        );

        session.set_name("Holidays".to_owned()).unwrap();
        session.set_dates(date(2024, 6, 1), date(2024, 6, 1)).unwrap();
        assert!(matches!(
            session.validate_for_save(&existing),
            Err(SaveValidationError::FromNotBeforeTo { .. })
        ));
    }

    #[test]
    fn test_default_profile_skips_save_validation() {
        let mut locked = profile("d", "Default", three_chunk_day());
        locked.set_dates(date(2024, 6, 1), date(2024, 1, 1));
        let existing = ProfileList::from_profiles(vec![locked.clone()]);
        let session = EditingSession::open(locked, ChunkEditor::default());
        assert_eq!(session.validate_for_save(&existing), Ok(()));
    }

    #[test]
    fn test_one_year_after_leap_day() {
        assert_eq!(one_year_after(date(2024, 2, 29)), date(2025, 3, 1));
        assert_eq!(one_year_after(date(2023, 12, 31)), date(2024, 12, 31));
    }
}
