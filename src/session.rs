//! TreeSession - the interactive tree view.
//!
//! Owns the node arena, selection, viewport and pan state, and keeps one
//! derived `Scene`. Every mutating call ends in a single full recompute:
//!
//! selection → visible groups → display mode → layout → drag offsets →
//! connectors → bounds
//!
//! There is no incremental patching; the scene is always a pure function of
//! the current state. Drag offsets sit on top of the computed layout and are
//! discarded whenever the layout itself changes (load, resize, selection).

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::SessionConfig;
use crate::layout::{
    DisplayMode, LayoutEngine, Link, SceneBounds, generate_connections, get_visible_groups,
    scene_bounds,
};
use crate::selection::{EntranceTracker, SelectionState};
use crate::spatial::NodeHitIndex;
use crate::storage::{StoreError, TreeSink};
use crate::tree::{FamilyTree, NodeGroup, NodeId, TreeError, TreeNode};
use crate::viewport::{
    PanController, PointerSample, ScrollOffset, ScrollState, Viewport, ViewportService,
};

/// Everything the rendering surface needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub mode: DisplayMode,
    pub groups: Vec<NodeGroup>,
    pub links: Vec<Link>,
    pub bounds: SceneBounds,
    /// Selected node ids, shallowest level first.
    pub selected: Vec<NodeId>,
}

impl Scene {
    fn empty(viewport: Viewport, padding: f64) -> Self {
        Self {
            mode: DisplayMode::Coarse,
            groups: Vec::new(),
            links: Vec::new(),
            bounds: scene_bounds(&[], viewport, padding),
            selected: Vec::new(),
        }
    }

    /// Find a visible node by id.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.groups
            .iter()
            .flat_map(|g| g.node_list.iter())
            .find(|n| n.id == id)
    }
}

/// The interactive tree view state.
#[derive(Debug)]
pub struct TreeSession {
    config: SessionConfig,
    tree: FamilyTree,
    selection: SelectionState,
    viewport: ViewportService,
    engine: LayoutEngine,
    entrance: EntranceTracker,
    pan: PanController,
    scroll: ScrollState,
    mounted: bool,
    scene: Scene,
    hits: NodeHitIndex,
    /// Accumulated (dx, dy) per dragged node.
    drag_offsets: HashMap<NodeId, (f64, f64)>,
}

impl TreeSession {
    /// Create an unmounted session with an empty tree.
    pub fn new(config: SessionConfig) -> Self {
        let pan = PanController::new(config.pan_speed);
        let scene = Scene::empty(Viewport::default(), config.bounds_padding);
        Self {
            config,
            tree: FamilyTree::new(),
            selection: SelectionState::new(),
            viewport: ViewportService::new(),
            engine: LayoutEngine::new(),
            entrance: EntranceTracker::new(),
            pan,
            scroll: ScrollState::default(),
            mounted: false,
            scene,
            hits: NodeHitIndex::new(),
            drag_offsets: HashMap::new(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start the view with the viewport size sampled on mount.
    pub fn mount(&mut self, viewport: Viewport) {
        self.mounted = true;
        self.viewport.attach(viewport);
        self.recompute();
    }

    /// Stop the view. Later resizes and load results are ignored.
    pub fn teardown(&mut self) {
        self.mounted = false;
        self.viewport.detach();
        self.pan.pointer_up();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Apply the outcome of an asynchronous load.
    ///
    /// Returns false when the session was torn down before the result
    /// arrived. A failed load leaves the tree empty.
    pub fn apply_load(&mut self, result: Result<Vec<TreeNode>, StoreError>) -> bool {
        if !self.mounted {
            debug!("session: dropping load result that arrived after teardown");
            return false;
        }

        match result {
            Ok(nodes) => self.load_nodes(nodes),
            Err(e) => {
                warn!("session: tree load failed: {e}");
                self.load_nodes(Vec::new());
            }
        }
        true
    }

    /// Replace the whole node collection. Selections are reset.
    pub fn load_nodes(&mut self, nodes: Vec<TreeNode>) {
        self.tree = FamilyTree::from_nodes(nodes);
        for problem in self.tree.validate() {
            warn!("session: {problem}");
        }
        info!("session: loaded {} nodes", self.tree.len());

        self.selection.clear();
        self.drag_offsets.clear();
        self.recompute();
    }

    /// Record a viewport change. Returns true if the scene was recomputed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if !self.viewport.resize(viewport) {
            return false;
        }
        self.drag_offsets.clear();
        self.recompute();
        true
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Handle a click on a node.
    ///
    /// Only nodes in the current scene can be clicked. Nodes rejected by the
    /// selection policy are a logged no-op.
    pub fn select_node(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.tree.get(id).ok_or(TreeError::UnknownNode(id))?;
        if self.scene.node(id).is_none() {
            warn!("session: ignoring selection of {id}, not in the current scene");
            return Err(TreeError::NotVisible(id));
        }
        if !self.config.selection_policy.allows(node, self.tree.nodes()) {
            warn!("session: node selection restricted for level {}", node.level);
            return Err(TreeError::NotSelectable { id, level: node.level });
        }

        self.selection.select(node.level, id)?;
        self.drag_offsets.clear();
        self.recompute();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.drag_offsets.clear();
        self.recompute();
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    // =========================================================================
    // Editing
    // =========================================================================

    pub fn add_root(&mut self, name: impl Into<String>) -> Result<NodeId, TreeError> {
        let id = self.tree.add_root(name)?;
        self.recompute();
        Ok(id)
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let id = self.tree.add_child(parent, name)?;
        self.recompute();
        Ok(id)
    }

    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        self.tree.rename(id, name)?;
        self.recompute();
        Ok(())
    }

    /// Remove a node and its descendants, dropping selections that pointed
    /// into the removed subtree.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let removed = self.tree.remove_subtree(id)?;
        let tree = &self.tree;
        if self.selection.prune(|selected| tree.contains(selected)) {
            debug!("session: selection pruned after removing {id}");
        }
        self.drag_offsets.retain(|node, _| tree.contains(*node));
        self.recompute();
        Ok(removed)
    }

    pub fn tree(&self) -> &FamilyTree {
        &self.tree
    }

    // =========================================================================
    // Node dragging
    // =========================================================================

    /// Move a visible node and all of its descendants by `(dx, dy)` pixels.
    ///
    /// Deltas accumulate across calls until the next re-layout. Returns the
    /// ids that moved, starting with `id`.
    pub fn move_node(&mut self, id: NodeId, dx: f64, dy: f64) -> Result<Vec<NodeId>, TreeError> {
        if !self.tree.contains(id) {
            return Err(TreeError::UnknownNode(id));
        }
        if self.scene.node(id).and_then(|n| n.layout).is_none() {
            warn!("session: cannot drag {id}, not laid out in the current scene");
            return Err(TreeError::NotVisible(id));
        }
        if !dx.is_finite() || !dy.is_finite() {
            warn!("session: ignoring non-finite drag of {id}");
            return Ok(Vec::new());
        }

        let moved = self.tree.subtree(id);
        for &node in &moved {
            let offset = self.drag_offsets.entry(node).or_insert((0.0, 0.0));
            offset.0 += dx;
            offset.1 += dy;
        }
        self.recompute();
        Ok(moved)
    }

    /// Accumulated drag offset of a node, if it has been moved.
    pub fn drag_offset(&self, id: NodeId) -> Option<(f64, f64)> {
        self.drag_offsets.get(&id).copied()
    }

    fn apply_drag_offsets(&self, groups: &mut [NodeGroup]) {
        if self.drag_offsets.is_empty() {
            return;
        }
        for node in groups.iter_mut().flat_map(|g| g.node_list.iter_mut()) {
            let Some(&(dx, dy)) = self.drag_offsets.get(&node.id) else {
                continue;
            };
            if let Some(layout) = node.layout.as_mut() {
                layout.left_space_x += dx;
                layout.top_space_y += dy;
            }
        }
    }

    /// Persist the current collection. On failure the in-memory tree is left
    /// untouched so the user can retry.
    pub fn save_to(&self, sink: &mut impl TreeSink) -> Result<(), StoreError> {
        sink.save_tree(&self.tree.snapshot()).inspect_err(|e| {
            warn!("session: save failed: {e}");
        })
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    fn recompute(&mut self) {
        let viewport = self.viewport.current();
        let groups = get_visible_groups(self.tree.nodes(), &self.selection);
        let mode = DisplayMode::for_selection(&self.selection);
        let mut groups = self.engine.calculate_layout(groups, mode, viewport);
        self.apply_drag_offsets(&mut groups);
        let links = generate_connections(&groups);
        let bounds = scene_bounds(&groups, viewport, self.config.bounds_padding);

        self.hits = NodeHitIndex::from_groups(&groups);
        self.entrance.sync(&groups);
        self.scene = Scene {
            mode,
            groups,
            links,
            bounds,
            selected: self.selection.iter().map(|(_, id)| id).collect(),
        };
    }

    /// The scene produced by the last recompute.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.current()
    }

    /// Topmost visible node at a point in scene coordinates.
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        self.hits.node_at(x, y)
    }

    /// Whether the node should still play its entrance animation.
    pub fn is_node_new(&self, id: NodeId) -> bool {
        self.entrance.is_new(id)
    }

    pub fn mark_animated(&mut self, id: NodeId) {
        self.entrance.mark_animated(id);
    }

    // =========================================================================
    // Panning
    // =========================================================================

    /// Pointer press on the scroll container. `origin` is the container's
    /// page position and `scroll` its current scroll offset. Presses that
    /// land on a node do not start a pan. Returns true if a drag started.
    pub fn pointer_down(
        &mut self,
        page_x: f64,
        page_y: f64,
        button: i16,
        origin: (f64, f64),
        scroll: ScrollOffset,
    ) -> bool {
        self.scroll = ScrollState {
            origin_x: origin.0,
            origin_y: origin.1,
            offset: scroll,
        };
        let on_node = self
            .node_at(page_x - origin.0 + scroll.left, page_y - origin.1 + scroll.top)
            .is_some();

        self.pan.pointer_down(
            &self.scroll,
            PointerSample {
                page_x,
                page_y,
                button,
                on_node,
            },
        )
    }

    /// Pointer movement anywhere. Returns the scroll offset to apply.
    pub fn pointer_move(&mut self, page_x: f64, page_y: f64) -> Option<ScrollOffset> {
        self.pan.pointer_move(
            &mut self.scroll,
            PointerSample {
                page_x,
                page_y,
                button: crate::viewport::PRIMARY_BUTTON,
                on_node: false,
            },
        )
    }

    /// Pointer release anywhere. Returns true if a drag ended.
    pub fn pointer_up(&mut self) -> bool {
        self.pan.pointer_up()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_dragging()
    }
}

impl Default for TreeSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
