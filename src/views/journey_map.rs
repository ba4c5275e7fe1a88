// Journey map: fixed Discover → Evaluate → Decide flow

use serde::Serialize;

use crate::views::graph::{Graph, GraphEdge, GraphNode, Position};

#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct StageData {
    pub label: String,
}

const STAGES: [(&str, &str, Option<&str>, f64); 3] = [
    ("j1", "Discover", Some("input"), 80.0),
    ("j2", "Evaluate", None, 300.0),
    ("j3", "Decide", Some("output"), 520.0),
];

const ROW_Y: f64 = 30.0;

pub fn build_graph() -> Graph<StageData> {
    let nodes = STAGES
        .iter()
        .map(|(id, label, kind, x)| GraphNode {
            id: id.to_string(),
            kind: kind.map(str::to_string),
            position: Position { x: *x, y: ROW_Y },
            data: StageData {
                label: label.to_string(),
            },
        })
        .collect();

    let edges = STAGES
        .windows(2)
        .map(|pair| {
            let (source, target) = (pair[0].0, pair[1].0);
            GraphEdge {
                id: format!("e{}-{}", &source[1..], &target[1..]),
                source: source.to_string(),
                target: target.to_string(),
                animated: true,
            }
        })
        .collect();

    Graph { nodes, edges }
}
