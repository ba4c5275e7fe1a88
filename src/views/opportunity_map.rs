// ============================================================================
// OPPORTUNITY MAP - the "desired outcome" node of the project page
// ============================================================================
// The node only carries data. What happens on edit/save/cancel/refresh goes
// through `OutcomeActions`, which the page passes alongside the graph.
// ============================================================================

use futures::future::{FutureExt, LocalBoxFuture};
use serde::Serialize;

use crate::error::ApiError;
use crate::viewmodels::{OutcomeViewModel, ProjectDetailState};
use crate::views::graph::{Graph, GraphNode, Position};

pub const DESIRED_NODE_ID: &str = "desired";
pub const NOT_SET_LABEL: &str = "Not set";

/// Everything the outcome node can ask its page to do
pub trait OutcomeActions {
    fn edit_request(&self);
    fn draft_change(&self, draft: String);
    fn cancel(&self);
    fn save(&self) -> LocalBoxFuture<'_, Result<(), ApiError>>;
    fn ai_refresh(&self) -> LocalBoxFuture<'_, Result<(), ApiError>>;
}

impl OutcomeActions for OutcomeViewModel {
    fn edit_request(&self) {
        self.begin_edit();
    }

    fn draft_change(&self, draft: String) {
        self.set_draft(draft);
    }

    fn cancel(&self) {
        OutcomeViewModel::cancel(self);
    }

    fn save(&self) -> LocalBoxFuture<'_, Result<(), ApiError>> {
        OutcomeViewModel::save(self).boxed_local()
    }

    fn ai_refresh(&self) -> LocalBoxFuture<'_, Result<(), ApiError>> {
        OutcomeViewModel::ai_refresh(self).boxed_local()
    }
}

#[derive(Clone, PartialEq, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DesiredOutcomeData {
    /// Outcome text, or "Not set"
    pub outcome: String,
    pub editing: bool,
    pub draft: String,
    pub saving: bool,
    pub ai_refreshing: bool,
}

pub fn build_graph(state: &ProjectDetailState) -> Graph<DesiredOutcomeData> {
    let data = DesiredOutcomeData {
        outcome: state.outcome().unwrap_or(NOT_SET_LABEL).to_string(),
        editing: state.edit.editing(),
        draft: state.edit.draft.clone(),
        saving: state.edit.saving(),
        ai_refreshing: state.ai_refreshing,
    };

    Graph {
        nodes: vec![GraphNode {
            id: DESIRED_NODE_ID.to_string(),
            kind: Some(DESIRED_NODE_ID.to_string()),
            position: Position { x: 0.0, y: 0.0 },
            data,
        }],
        edges: Vec::new(),
    }
}

/// Key press inside the outcome editor
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyChord<'a> {
    pub key: &'a str,
    pub ctrl: bool,
    pub meta: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyAction {
    Save,
    Cancel,
}

/// ⌘/Ctrl+Enter saves, Escape cancels
pub fn key_action(chord: &KeyChord<'_>) -> Option<KeyAction> {
    match chord.key {
        "Enter" if chord.ctrl || chord.meta => Some(KeyAction::Save),
        "Escape" => Some(KeyAction::Cancel),
        _ => None,
    }
}

/// Runs the action bound to `chord`. `Ok(true)` means the key was consumed
/// and the browser default should be prevented.
pub async fn handle_key(actions: &dyn OutcomeActions, chord: &KeyChord<'_>) -> Result<bool, ApiError> {
    match key_action(chord) {
        Some(KeyAction::Save) => {
            actions.save().await?;
            Ok(true)
        }
        Some(KeyAction::Cancel) => {
            actions.cancel();
            Ok(true)
        }
        None => Ok(false),
    }
}
