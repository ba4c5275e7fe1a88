// ============================================================================
// FLOW FFI - bindings to the page's renderers
// ============================================================================
// Only wrappers for JS functions. Graphs and page snapshots cross the
// boundary as JSON.
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = renderFlowGraph)]
    pub fn render_flow_graph(container_id: &str, graph_json: &str);

    #[wasm_bindgen(js_name = renderView)]
    pub fn render_view(container_id: &str, view_json: &str);
}
