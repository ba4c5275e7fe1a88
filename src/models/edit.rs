/// Where the outcome field is in its edit lifecycle
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EditPhase {
    #[default]
    Idle,
    Editing,
    Saving,
}

/// Transient state of the outcome field while the user edits it
#[derive(Clone, PartialEq, Debug, Default)]
pub struct DraftEditState {
    pub phase: EditPhase,
    pub draft: String,
}

impl DraftEditState {
    pub fn editing(&self) -> bool {
        matches!(self.phase, EditPhase::Editing | EditPhase::Saving)
    }

    pub fn saving(&self) -> bool {
        self.phase == EditPhase::Saving
    }
}
