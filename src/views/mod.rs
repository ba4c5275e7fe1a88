pub mod graph;
pub mod journey_map;
pub mod opportunity_map;
pub mod screens;

pub use graph::{Graph, GraphEdge, GraphNode, Position};
pub use screens::{HomeScreen, LoginScreen, UploadScreen};
pub use opportunity_map::{handle_key, key_action, KeyAction, KeyChord, OutcomeActions};
