//! KinTree - WASM Module
//!
//! Progressive-disclosure family tree layout. The JS side owns the DOM and
//! rendering; this module owns the node collection, selection chain, display
//! mode, per-level geometry, connector paths and drag-to-pan math, and is
//! compiled to WebAssembly with a JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `tree`: node arena keyed by id, structure queries, edits
//! - `selection`: per-level selection chain and entrance bookkeeping
//! - `layout`: visibility, display mode, ratio tables, geometry, connectors
//! - `spatial`: R-tree hit testing over laid-out nodes
//! - `viewport`: viewport lifecycle, window binding, panning
//! - `storage`: tree source/sink capabilities and the backend wire format
//! - `session`: the pull-based recompute tying it all together

use std::cell::RefCell;
use std::rc::Rc;

use log::{Level, info, warn};
use wasm_bindgen::prelude::*;

pub mod config;
pub mod layout;
pub mod selection;
pub mod session;
pub mod spatial;
pub mod storage;
pub mod tree;
pub mod viewport;

use config::SessionConfig;
use session::TreeSession;
use storage::{decode_tree_response, encode_tree_request};
use tree::{NodeId, TreeNode};
use viewport::{DomResizeListener, ScrollOffset, Viewport};

/// Initialize logging and the panic hook.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(Level::Debug);
    console_error_panic_hook::set_once();
    info!("kintree: logging initialized");
}

/// Main entry point for the tree view.
///
/// This struct wraps a `TreeSession` and provides the public API exposed to
/// JavaScript. Every mutating call recomputes the scene; read it back with
/// `scene()`.
#[wasm_bindgen]
pub struct KinTreeWasm {
    session: Rc<RefCell<TreeSession>>,
    listener: Option<DomResizeListener>,
}

#[wasm_bindgen]
impl KinTreeWasm {
    /// Create a new unmounted view.
    ///
    /// `config` is an optional object with any of `panSpeed`,
    /// `boundsPadding` and `selectionPolicy` (`"levelRange"` or
    /// `"hasChildren"`).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<KinTreeWasm, JsValue> {
        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        Ok(Self {
            session: Rc::new(RefCell::new(TreeSession::new(config))),
            listener: None,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mount with the viewport size sampled by the host.
    pub fn mount(&mut self, width: f64, height: f64) {
        self.session.borrow_mut().mount(Viewport::new(width, height));
    }

    /// Tear down: window listeners are removed and pending loads ignored.
    pub fn teardown(&mut self) {
        self.listener = None;
        self.session.borrow_mut().teardown();
    }

    /// Follow the browser window's size. `on_change` is called with no
    /// arguments after each resize that changed the scene.
    ///
    /// Returns false outside a browser window.
    #[wasm_bindgen(js_name = attachWindow)]
    pub fn attach_window(&mut self, on_change: js_sys::Function) -> bool {
        let session = Rc::clone(&self.session);
        let listener = DomResizeListener::attach(move |viewport| {
            let changed = session.borrow_mut().resize(viewport);
            if changed && on_change.call0(&JsValue::NULL).is_err() {
                warn!("kintree: resize callback threw");
            }
        });

        let attached = listener.is_some();
        self.listener = listener;
        attached
    }

    /// Record a viewport size change. Returns true if the scene changed.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.session.borrow_mut().resize(Viewport::new(width, height))
    }

    // =========================================================================
    // Loading and saving
    // =========================================================================

    /// Apply a backend tree response (`{ treeId, treeName, nodeDTOS }`).
    ///
    /// A payload that fails to decode is treated as a failed load and leaves
    /// the tree empty. Returns false if the view was already torn down.
    #[wasm_bindgen(js_name = loadTreeJson)]
    pub fn load_tree_json(&mut self, json: &str) -> bool {
        self.session.borrow_mut().apply_load(decode_tree_response(json))
    }

    /// Replace the tree with an array of `{ id, parentId, level, name }`.
    #[wasm_bindgen(js_name = loadNodes)]
    pub fn load_nodes(&mut self, nodes: JsValue) -> Result<(), JsValue> {
        let nodes: Vec<TreeNode> = serde_wasm_bindgen::from_value(nodes)?;
        self.session.borrow_mut().load_nodes(nodes);
        Ok(())
    }

    /// Serialize the full node collection as a backend save request.
    #[wasm_bindgen(js_name = exportTreeJson)]
    pub fn export_tree_json(&self, tree_id: u32, tree_name: &str) -> Result<String, JsError> {
        let session = self.session.borrow();
        Ok(encode_tree_request(tree_id, tree_name, &session.tree().snapshot())?)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Handle a click on a node. Throws if the node is unknown or not
    /// selectable; the scene is unchanged in that case.
    #[wasm_bindgen(js_name = selectNode)]
    pub fn select_node(&mut self, node_id: u32) -> Result<(), JsError> {
        self.session.borrow_mut().select_node(NodeId(node_id))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.session.borrow_mut().clear_selection();
    }

    /// Whether the node is selected at any level, for highlighting.
    #[wasm_bindgen(js_name = isSelected)]
    pub fn is_selected(&self, node_id: u32) -> bool {
        self.session.borrow().selection().is_selected(NodeId(node_id))
    }

    /// Selected node id at a level, if any.
    #[wasm_bindgen(js_name = selectedAt)]
    pub fn selected_at(&self, level: u8) -> Option<u32> {
        self.session.borrow().selection().get(level).map(|id| id.0)
    }

    // =========================================================================
    // Editing
    // =========================================================================

    #[wasm_bindgen(js_name = addRoot)]
    pub fn add_root(&mut self, name: &str) -> Result<u32, JsError> {
        Ok(self.session.borrow_mut().add_root(name)?.0)
    }

    #[wasm_bindgen(js_name = addChild)]
    pub fn add_child(&mut self, parent_id: u32, name: &str) -> Result<u32, JsError> {
        Ok(self.session.borrow_mut().add_child(NodeId(parent_id), name)?.0)
    }

    #[wasm_bindgen(js_name = renameNode)]
    pub fn rename_node(&mut self, node_id: u32, name: &str) -> Result<(), JsError> {
        self.session.borrow_mut().rename(NodeId(node_id), name)?;
        Ok(())
    }

    /// Remove a node and its descendants. Returns the removed ids.
    #[wasm_bindgen(js_name = removeNode)]
    pub fn remove_node(&mut self, node_id: u32) -> Result<Vec<u32>, JsError> {
        let removed = self.session.borrow_mut().remove_subtree(NodeId(node_id))?;
        Ok(removed.into_iter().map(|id| id.0).collect())
    }

    /// Drag a visible node and its descendants by `(dx, dy)` pixels.
    /// Returns the moved ids. Offsets are dropped on the next re-layout.
    #[wasm_bindgen(js_name = moveNode)]
    pub fn move_node(&mut self, node_id: u32, dx: f64, dy: f64) -> Result<Vec<u32>, JsError> {
        let moved = self.session.borrow_mut().move_node(NodeId(node_id), dx, dy)?;
        Ok(moved.into_iter().map(|id| id.0).collect())
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.session.borrow().tree().len()
    }

    // =========================================================================
    // Scene
    // =========================================================================

    /// The current scene: `{ mode, groups, links, bounds, selected }`.
    pub fn scene(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.session.borrow().scene())?)
    }

    /// Current display mode: 1 (coarse), 2 (medium) or 3 (fine).
    #[wasm_bindgen(js_name = displayMode)]
    pub fn display_mode(&self) -> u8 {
        self.session.borrow().scene().mode.as_u8()
    }

    /// Topmost visible node at a point in scene coordinates.
    #[wasm_bindgen(js_name = nodeAt)]
    pub fn node_at(&self, x: f64, y: f64) -> Option<u32> {
        self.session.borrow().node_at(x, y).map(|id| id.0)
    }

    #[wasm_bindgen(js_name = isNodeNew)]
    pub fn is_node_new(&self, node_id: u32) -> bool {
        self.session.borrow().is_node_new(NodeId(node_id))
    }

    #[wasm_bindgen(js_name = markAnimated)]
    pub fn mark_animated(&mut self, node_id: u32) {
        self.session.borrow_mut().mark_animated(NodeId(node_id));
    }

    // =========================================================================
    // Panning
    // =========================================================================

    /// Pointer press inside the scroll container.
    ///
    /// `origin_*` is the container's page offset, `scroll_*` its current
    /// scroll position. Returns true if a drag started.
    #[wasm_bindgen(js_name = panStart)]
    #[allow(clippy::too_many_arguments)]
    pub fn pan_start(
        &mut self,
        page_x: f64,
        page_y: f64,
        button: i16,
        origin_x: f64,
        origin_y: f64,
        scroll_left: f64,
        scroll_top: f64,
    ) -> bool {
        self.session.borrow_mut().pointer_down(
            page_x,
            page_y,
            button,
            (origin_x, origin_y),
            ScrollOffset::new(scroll_left, scroll_top),
        )
    }

    /// Pointer movement. Returns `[scrollLeft, scrollTop]` to apply while
    /// dragging, otherwise `undefined`.
    #[wasm_bindgen(js_name = panMove)]
    pub fn pan_move(&mut self, page_x: f64, page_y: f64) -> Option<Vec<f64>> {
        self.session
            .borrow_mut()
            .pointer_move(page_x, page_y)
            .map(|offset| vec![offset.left, offset.top])
    }

    /// Pointer release anywhere. Returns true if a drag ended.
    #[wasm_bindgen(js_name = panEnd)]
    pub fn pan_end(&mut self) -> bool {
        self.session.borrow_mut().pointer_up()
    }
}

#[cfg(test)]
mod integration_tests {
    use crate::layout::{DisplayMode, calculate_layout, generate_connections, get_visible_groups};
    use crate::selection::SelectionState;
    use crate::session::TreeSession;
    use crate::storage::{MemoryTreeStore, load_or_empty};
    use crate::tree::{NodeId, TreeNode, get_root};
    use crate::viewport::Viewport;

    const EPS: f64 = 1e-9;
    const VP: Viewport = Viewport::new(1200.0, 800.0);

    fn gen1_family() -> Vec<TreeNode> {
        vec![
            TreeNode::new(1, 0, 0, "Gen1"),
            TreeNode::new(2, 1, 1, "Ann"),
            TreeNode::new(3, 1, 1, "Bob"),
        ]
    }

    /// A single line of descent from the root down to level 6, with a
    /// sibling at every level so each row has two nodes.
    fn deep_family() -> Vec<TreeNode> {
        let mut nodes = vec![TreeNode::new(1, 0, 0, "Gen1")];
        let mut parent = 1;
        for level in 1..=6u8 {
            let first = u32::from(level) * 10;
            nodes.push(TreeNode::new(first, parent, level, format!("L{level}a")));
            nodes.push(TreeNode::new(first + 1, parent, level, format!("L{level}b")));
            parent = first;
        }
        nodes
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_root_and_two_children_scenario() {
        let store = MemoryTreeStore::with_tree(1, gen1_family());
        let mut session = TreeSession::default();
        session.mount(VP);
        session.apply_load(Ok(load_or_empty(&store, 1)));

        let scene = session.scene();
        assert_eq!(scene.mode, DisplayMode::Coarse);
        assert_eq!(scene.groups.len(), 2);

        let root = scene.groups[0].node_list[0].layout.unwrap();
        assert!(approx(root.node_width, 144.0));
        assert!(approx(root.node_height, 108.0));
        assert!(approx(root.left_space_x, 528.0));
        assert!(approx(root.top_space_y, 40.0));

        let kids: Vec<_> = scene.groups[1].node_list.iter().map(|n| n.layout.unwrap()).collect();
        assert!(approx(kids[0].left_space_x, 443.76));
        assert!(approx(kids[1].left_space_x, 612.24));
        assert!(approx(kids[0].node_width, 144.0));
    }

    #[test]
    fn test_selecting_leaf_keeps_two_groups() {
        let mut session = TreeSession::default();
        session.mount(VP);
        session.load_nodes(gen1_family());

        session.select_node(NodeId(2)).unwrap();
        let levels: Vec<u8> = session.scene().groups.iter().map(|g| g.level).collect();
        assert_eq!(levels, vec![0, 1]);
        assert_eq!(session.scene().mode, DisplayMode::Coarse);
    }

    #[test]
    fn test_get_root_contract() {
        assert!(get_root(&[]).is_none());
        assert!(get_root(&[TreeNode::new(2, 1, 1, "orphan")]).is_none());
        let group = get_root(&gen1_family()).unwrap();
        assert_eq!(group.level, 0);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_reselect_clears_deeper_levels() {
        let mut session = TreeSession::default();
        session.mount(VP);
        session.load_nodes(deep_family());

        for id in [10, 20, 30, 40, 50] {
            session.select_node(NodeId(id)).unwrap();
        }
        assert_eq!(session.selection().deepest_level(), Some(5));
        assert_eq!(session.scene().groups.len(), 7);
        assert_eq!(session.scene().mode, DisplayMode::Fine);

        session.select_node(NodeId(31)).unwrap();
        assert_eq!(session.selection().get(3), Some(NodeId(31)));
        assert_eq!(session.selection().get(4), None);
        assert_eq!(session.selection().get(5), None);
        assert_eq!(session.scene().mode, DisplayMode::Medium);
        // 31 has no children.
        assert_eq!(session.scene().groups.len(), 4);
    }

    #[test]
    fn test_every_visible_row_is_centered_and_in_order() {
        let mut session = TreeSession::default();
        session.mount(VP);
        session.load_nodes(deep_family());

        for id in [10, 20, 30, 40, 50] {
            session.select_node(NodeId(id)).unwrap();
            for group in &session.scene().groups {
                let layouts: Vec<_> = group.node_list.iter().map(|n| n.layout.unwrap()).collect();
                let min = layouts.iter().map(|l| l.left_space_x).fold(f64::INFINITY, f64::min);
                let max = layouts.iter().map(|l| l.right()).fold(f64::NEG_INFINITY, f64::max);
                assert!((min + max - VP.width).abs() < 1e-6, "level {} off center", group.level);
                assert!(layouts.windows(2).all(|w| w[0].left_space_x < w[1].left_space_x));
            }
        }
    }

    #[test]
    fn test_rows_descend_with_level() {
        let mut session = TreeSession::default();
        session.mount(VP);
        session.load_nodes(deep_family());
        for id in [10, 20, 30, 40, 50] {
            session.select_node(NodeId(id)).unwrap();
        }

        let tops: Vec<f64> = session
            .scene()
            .groups
            .iter()
            .map(|g| g.node_list[0].layout.unwrap().top_space_y)
            .collect();
        assert!(tops.windows(2).all(|w| w[0] < w[1]), "{tops:?}");
    }

    #[test]
    fn test_connectors_anchor_on_node_edges() {
        let mut session = TreeSession::default();
        session.mount(VP);
        session.load_nodes(deep_family());
        session.select_node(NodeId(10)).unwrap();
        session.select_node(NodeId(20)).unwrap();

        let scene = session.scene();
        assert_eq!(scene.links.len(), 6);
        for link in &scene.links {
            let child = scene.node(link.child_id).unwrap();
            let parent = scene.node(child.parent_id).unwrap();
            let (p, c) = (parent.layout.unwrap(), child.layout.unwrap());

            assert_eq!(link.start.x, p.left_space_x + p.node_width / 2.0);
            assert_eq!(link.start.y, p.top_space_y + p.node_height);
            assert_eq!(link.end.x, c.left_space_x + c.node_width / 2.0);
            assert_eq!(link.end.y, c.top_space_y);
        }
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let mut selection = SelectionState::new();
        selection.select(1, NodeId(10)).unwrap();
        selection.select(2, NodeId(20)).unwrap();
        let nodes = deep_family();
        let mode = DisplayMode::for_selection(&selection);

        let first = calculate_layout(get_visible_groups(&nodes, &selection), mode, VP);
        let second = calculate_layout(first.clone(), mode, VP);
        assert_eq!(first, second);
        assert_eq!(generate_connections(&first), generate_connections(&second));
    }

    #[test]
    fn test_scene_bounds_grow_with_deep_rows() {
        let mut session = TreeSession::default();
        session.mount(Viewport::new(1200.0, 300.0));
        session.load_nodes(deep_family());
        for id in [10, 20, 30, 40, 50] {
            session.select_node(NodeId(id)).unwrap();
        }

        let bounds = session.scene().bounds;
        let bottom = session
            .scene()
            .groups
            .iter()
            .flat_map(|g| g.node_list.iter())
            .filter_map(|n| n.layout)
            .map(|l| l.bottom())
            .fold(0.0, f64::max);
        assert!(bounds.height + EPS >= bottom + 100.0);
        assert!(bounds.width + EPS >= 1300.0);
    }

    #[test]
    fn test_hit_testing_matches_layout() {
        let mut session = TreeSession::default();
        session.mount(VP);
        session.load_nodes(gen1_family());

        assert_eq!(session.node_at(600.0, 100.0), Some(NodeId(1)));
        assert_eq!(session.node_at(10.0, 10.0), None);
    }
}
