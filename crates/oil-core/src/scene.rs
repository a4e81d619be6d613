//! Scene graph and capability-based event dispatch.
//!
//! Nodes live in an arena owned by [`SceneGraph`] and are addressed by
//! [`NodeId`]. Each node declares the events it handles through
//! [`Capabilities`]; the set is captured when the node is inserted, and
//! [`SceneGraph::dispatch`] only calls into nodes that opted in. Nothing has
//! to share a concrete type beyond implementing [`SceneNode`].

use glam::Vec3;
use smallvec::SmallVec;

use crate::clock::FrameStep;
use crate::error::SceneError;
use crate::layout::Viewport;
use crate::pointer::PointerEvent;
use crate::tuning::Tunable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Events a node may opt into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub update: bool,
    pub resize: bool,
    pub pointer_move: bool,
}

impl Capabilities {
    pub const NONE: Self = Self {
        update: false,
        resize: false,
        pointer_move: false,
    };

    pub const fn with_update(mut self) -> Self {
        self.update = true;
        self
    }

    pub const fn with_resize(mut self) -> Self {
        self.resize = true;
        self
    }

    pub const fn with_pointer_move(mut self) -> Self {
        self.pointer_move = true;
        self
    }

    pub fn handles(&self, event: &NodeEvent) -> bool {
        match event {
            NodeEvent::Update(_) => self.update,
            NodeEvent::Resize(_) => self.resize,
            NodeEvent::PointerMove(_) => self.pointer_move,
        }
    }
}

/// A lifecycle or input event fanned out through the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeEvent {
    Update(FrameStep),
    Resize(Viewport),
    PointerMove(PointerEvent),
}

/// Anything that can sit in the scene graph.
///
/// Every hook has a no-op default; a node only needs to implement the ones it
/// advertises in [`SceneNode::capabilities`].
pub trait SceneNode {
    fn label(&self) -> &str {
        "node"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    fn update(&mut self, _step: FrameStep) {}

    fn on_resize(&mut self, _viewport: Viewport) {}

    fn on_pointer_move(&mut self, _event: &PointerEvent) {}

    /// Exposes runtime-tunable parameters, if the node has any.
    fn as_tunable_mut(&mut self) -> Option<&mut dyn Tunable> {
        None
    }
}

struct Slot<N: ?Sized> {
    node: Box<N>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    translation: Vec3,
    caps: Capabilities,
}

/// Tree of boxed nodes with a local translation per node.
///
/// Traversal is depth-first, parents before children, siblings in insertion
/// order.
pub struct SceneGraph<N: ?Sized> {
    slots: Vec<Slot<N>>,
    roots: SmallVec<[NodeId; 4]>,
}

impl<N: ?Sized> Default for SceneGraph<N> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            roots: SmallVec::new(),
        }
    }
}

impl<N: SceneNode + ?Sized> SceneGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn add_root(&mut self, node: Box<N>) -> NodeId {
        let id = self.insert(node, None);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, node: Box<N>) -> Result<NodeId, SceneError> {
        if parent.index() >= self.slots.len() {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = self.insert(node, Some(parent));
        self.slots[parent.index()].children.push(id);
        Ok(id)
    }

    fn insert(&mut self, node: Box<N>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        let caps = node.capabilities();
        log::debug!("[scene] add {:?} `{}` caps={:?}", id, node.label(), caps);
        self.slots.push(Slot {
            node,
            parent,
            children: SmallVec::new(),
            translation: Vec3::ZERO,
            caps,
        });
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.slots.get(id.index()).map(|slot| &*slot.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.slots.get_mut(id.index()).map(|slot| &mut *slot.node)
    }

    pub fn capabilities(&self, id: NodeId) -> Option<Capabilities> {
        self.slots.get(id.index()).map(|slot| slot.caps)
    }

    pub fn translation(&self, id: NodeId) -> Option<Vec3> {
        self.slots.get(id.index()).map(|slot| slot.translation)
    }

    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) -> Result<(), SceneError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(SceneError::UnknownNode(id))?;
        slot.translation = translation;
        Ok(())
    }

    /// Sum of local translations from the root down to `id`.
    pub fn world_translation(&self, id: NodeId) -> Option<Vec3> {
        let mut slot = self.slots.get(id.index())?;
        let mut world = slot.translation;
        while let Some(parent) = slot.parent {
            slot = &self.slots[parent.index()];
            world += slot.translation;
        }
        Some(world)
    }

    /// Depth-first pre-order listing with world translations.
    fn order(&self) -> Vec<(NodeId, Vec3)> {
        let mut out = Vec::with_capacity(self.slots.len());
        let mut stack: Vec<(NodeId, Vec3)> = self
            .roots
            .iter()
            .rev()
            .map(|&id| (id, Vec3::ZERO))
            .collect();
        while let Some((id, parent_world)) = stack.pop() {
            let slot = &self.slots[id.index()];
            let world = parent_world + slot.translation;
            out.push((id, world));
            for &child in slot.children.iter().rev() {
                stack.push((child, world));
            }
        }
        out
    }

    pub fn walk(&self) -> Vec<NodeId> {
        self.order().into_iter().map(|(id, _)| id).collect()
    }

    pub fn visit(&self, mut f: impl FnMut(NodeId, Vec3, &N)) {
        for (id, world) in self.order() {
            f(id, world, &*self.slots[id.index()].node);
        }
    }

    pub fn visit_mut(&mut self, mut f: impl FnMut(NodeId, Vec3, &mut N)) {
        for (id, world) in self.order() {
            f(id, world, &mut *self.slots[id.index()].node);
        }
    }

    /// Delivers `event` to every node whose capabilities include it.
    /// Returns how many nodes received it.
    pub fn dispatch(&mut self, event: NodeEvent) -> usize {
        let mut delivered = 0;
        for (id, _) in self.order() {
            let slot = &mut self.slots[id.index()];
            if !slot.caps.handles(&event) {
                continue;
            }
            match &event {
                NodeEvent::Update(step) => slot.node.update(*step),
                NodeEvent::Resize(viewport) => slot.node.on_resize(*viewport),
                NodeEvent::PointerMove(pointer) => slot.node.on_pointer_move(pointer),
            }
            delivered += 1;
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        name: &'static str,
        caps: Capabilities,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl SceneNode for Probe {
        fn label(&self) -> &str {
            self.name
        }
        fn capabilities(&self) -> Capabilities {
            self.caps
        }
        fn update(&mut self, step: FrameStep) {
            self.log
                .borrow_mut()
                .push(format!("{}:update:{:.2}", self.name, step.time));
        }
        fn on_resize(&mut self, viewport: Viewport) {
            self.log
                .borrow_mut()
                .push(format!("{}:resize:{}", self.name, viewport.width));
        }
        fn on_pointer_move(&mut self, event: &PointerEvent) {
            self.log.borrow_mut().push(format!(
                "{}:pointer:{},{}",
                self.name, event.normalized.x, event.normalized.y
            ));
        }
    }

    fn probe(
        name: &'static str,
        caps: Capabilities,
        log: &Rc<RefCell<Vec<String>>>,
    ) -> Box<dyn SceneNode> {
        Box::new(Probe {
            name,
            caps,
            log: log.clone(),
        })
    }

    #[test]
    fn walk_is_preorder_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene: SceneGraph<dyn SceneNode> = SceneGraph::new();
        let a = scene.add_root(probe("a", Capabilities::NONE, &log));
        let b = scene.add_root(probe("b", Capabilities::NONE, &log));
        let a1 = scene.add_child(a, probe("a1", Capabilities::NONE, &log)).unwrap();
        let a2 = scene.add_child(a, probe("a2", Capabilities::NONE, &log)).unwrap();
        let a1x = scene.add_child(a1, probe("a1x", Capabilities::NONE, &log)).unwrap();
        assert_eq!(scene.walk(), vec![a, a1, a1x, a2, b]);
    }

    #[test]
    fn dispatch_skips_nodes_without_capability() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene: SceneGraph<dyn SceneNode> = SceneGraph::new();
        let root = scene.add_root(probe("root", Capabilities::NONE, &log));
        scene
            .add_child(root, probe("moving", Capabilities::NONE.with_update(), &log))
            .unwrap();
        scene
            .add_child(root, probe("sized", Capabilities::NONE.with_resize(), &log))
            .unwrap();

        let step = FrameStep { dt: 0.01, time: 0.5 };
        assert_eq!(scene.dispatch(NodeEvent::Update(step)), 1);
        assert_eq!(
            scene.dispatch(NodeEvent::Resize(Viewport::new(640.0, 480.0))),
            1
        );
        assert_eq!(
            *log.borrow(),
            vec!["moving:update:0.50".to_string(), "sized:resize:640".to_string()]
        );
    }

    #[test]
    fn pointer_move_reaches_only_listeners_in_preorder() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene: SceneGraph<dyn SceneNode> = SceneGraph::new();
        let listening = Capabilities::NONE.with_pointer_move();
        let root = scene.add_root(probe("root", Capabilities::NONE.with_update(), &log));
        let first = scene.add_child(root, probe("first", listening, &log)).unwrap();
        scene.add_child(root, probe("deaf", Capabilities::NONE.with_resize(), &log)).unwrap();
        scene.add_child(first, probe("nested", listening, &log)).unwrap();
        scene.add_root(probe("last", listening, &log));

        let event = PointerEvent {
            kind: crate::pointer::PointerKind::Mouse,
            client: glam::Vec2::new(640.0, 360.0),
            normalized: glam::Vec2::new(0.25, 0.75),
        };
        assert_eq!(scene.dispatch(NodeEvent::PointerMove(event)), 3);
        assert_eq!(
            *log.borrow(),
            vec![
                "first:pointer:0.25,0.75".to_string(),
                "nested:pointer:0.25,0.75".into(),
                "last:pointer:0.25,0.75".into(),
            ]
        );
    }

    #[test]
    fn world_translation_accumulates_parents() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene: SceneGraph<dyn SceneNode> = SceneGraph::new();
        let root = scene.add_root(probe("root", Capabilities::NONE, &log));
        let child = scene.add_child(root, probe("child", Capabilities::NONE, &log)).unwrap();
        scene.set_translation(root, Vec3::new(0.0, 10.0, 0.0)).unwrap();
        scene.set_translation(child, Vec3::new(5.0, -2.0, 0.0)).unwrap();
        assert_eq!(scene.world_translation(child), Some(Vec3::new(5.0, 8.0, 0.0)));

        let mut seen = Vec::new();
        scene.visit(|id, world, _| seen.push((id, world)));
        assert_eq!(seen[1], (child, Vec3::new(5.0, 8.0, 0.0)));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene: SceneGraph<dyn SceneNode> = SceneGraph::new();
        let err = scene
            .add_child(NodeId(7), probe("orphan", Capabilities::NONE, &log))
            .unwrap_err();
        assert_eq!(err, SceneError::UnknownNode(NodeId(7)));
        assert!(scene.is_empty());
    }
}
