// ============================================================================
// GRAPH - node/edge model handed to the JS flow renderer as JSON
// ============================================================================

use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Serialize, Debug)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct GraphNode<D> {
    pub id: String,
    /// Renderer node type; `None` uses the renderer's default node
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub position: Position,
    pub data: D,
}

#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub animated: bool,
}

#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct Graph<D> {
    pub nodes: Vec<GraphNode<D>>,
    pub edges: Vec<GraphEdge>,
}

impl<D: Serialize> Graph<D> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Hands a graph to the page's flow renderer
#[cfg(target_arch = "wasm32")]
pub fn render<D: Serialize>(container_id: &str, graph: &Graph<D>) {
    match graph.to_json() {
        Ok(json) => {
            log::debug!("📤 Graph for #{} ({} bytes)", container_id, json.len());
            crate::utils::flow_ffi::render_flow_graph(container_id, &json);
        }
        Err(e) => log::error!("❌ Error serializing graph: {}", e),
    }
}
