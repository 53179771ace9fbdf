use std::mem;
use std::rc::Rc;

use itertools::Itertools;
use log::{debug, trace};

use crate::shapes::{Bounds, Indexable};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct QuadtreeConfig {
    /// Objects a node holds before it splits.
    pub max_objects: usize,
    /// Depth below which nodes never split, the root is level 0.
    pub max_levels: usize,
}

impl Default for QuadtreeConfig {
    fn default() -> QuadtreeConfig {
        QuadtreeConfig {
            max_objects: 10,
            max_levels: 4,
        }
    }
}

/// A region quadtree over shared shapes.
///
/// The tree holds `Rc` handles, never the shapes themselves. Identity is the allocation: two
/// geometrically equal shapes are different objects, and a handle cloned from one is the same
/// object. A shape straddling a split line is stored in every child it overlaps.
///
/// A node is either a leaf or has exactly four children (north east, north west, south west,
/// south east). Nodes at `max_levels` never split and hold any number of objects.
#[derive(Debug)]
pub struct Quadtree<T: ?Sized> {
    bounds: Bounds,
    config: QuadtreeConfig,
    level: usize,
    objects: Vec<Rc<T>>,
    nodes: Option<Box<[Quadtree<T>; 4]>>,
}

#[inline]
fn object_address<T: ?Sized>(object: &Rc<T>) -> usize {
    Rc::as_ptr(object) as *const () as usize
}

#[inline]
fn is_same_object<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    object_address(a) == object_address(b)
}

/// First occurrence of every object, in order.
fn unique_objects<T: ?Sized>(objects: &[Rc<T>]) -> Vec<Rc<T>> {
    objects.iter().cloned().unique_by(object_address).collect()
}

impl<T: ?Sized + Indexable> Quadtree<T> {
    pub fn new(bounds: Bounds, config: QuadtreeConfig) -> Quadtree<T> {
        Quadtree::with_level(bounds, config, 0)
    }

    fn with_level(bounds: Bounds, config: QuadtreeConfig, level: usize) -> Quadtree<T> {
        Quadtree {
            bounds,
            config,
            level,
            objects: vec![],
            nodes: None,
        }
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    pub fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Objects held directly by this node, not its children.
    #[inline]
    pub fn objects(&self) -> &[Rc<T>] {
        &self.objects
    }

    #[inline]
    pub fn nodes(&self) -> Option<&[Quadtree<T>; 4]> {
        self.nodes.as_deref()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.nodes.is_none()
    }

    /// Give this node four children covering its quarters. Does nothing if it already has them.
    pub fn split(&mut self) {
        if self.nodes.is_some() {
            return;
        }
        let level = self.level + 1;
        let [ne, nw, sw, se] = self.bounds.quadrants();
        self.nodes = Some(Box::new([Quadtree::with_level(ne, self.config, level),
                                    Quadtree::with_level(nw, self.config, level),
                                    Quadtree::with_level(sw, self.config, level),
                                    Quadtree::with_level(se, self.config, level)]));
        trace!("split node at level {} {:?}", self.level, self.bounds);
    }

    /// Store an object in every leaf it may overlap, splitting full leaves on the way.
    pub fn insert(&mut self, object: Rc<T>) {
        if let Some(nodes) = self.nodes.as_mut() {
            for quadrant in object.qt_index(&self.bounds) {
                nodes[quadrant.index()].insert(Rc::clone(&object));
            }
            return;
        }

        self.objects.push(object);

        if self.objects.len() > self.config.max_objects && self.level < self.config.max_levels {
            self.split();
            let objects = mem::take(&mut self.objects);
            if let Some(nodes) = self.nodes.as_mut() {
                for object in objects {
                    for quadrant in object.qt_index(&self.bounds) {
                        nodes[quadrant.index()].insert(Rc::clone(&object));
                    }
                }
            }
        }
    }

    /// Every object stored in a node `shape` may overlap. Candidates, not hits: callers test the
    /// exact geometry themselves.
    ///
    /// Retrieving from the root lists each object once, even when it was stored in several leaves.
    pub fn retrieve<Q: ?Sized + Indexable>(&self, shape: &Q) -> Vec<Rc<T>> {
        let mut found = vec![];
        self.collect_candidates(shape, &mut found);
        if self.level == 0 {
            unique_objects(&found)
        } else {
            found
        }
    }

    fn collect_candidates<Q: ?Sized + Indexable>(&self, shape: &Q, found: &mut Vec<Rc<T>>) {
        found.extend(self.objects.iter().cloned());
        if let Some(nodes) = self.nodes.as_ref() {
            for quadrant in shape.qt_index(&self.bounds) {
                nodes[quadrant.index()].collect_candidates(shape, found);
            }
        }
    }

    /// Remove an object from this node and every descendant, wherever it was stored.
    ///
    /// Every child is searched, not only those the object's current geometry selects, since it
    /// may have moved since it was inserted. This makes removal linear in the tree size.
    /// Unless `fast` is set, removing through the root then joins under-populated subtrees.
    ///
    /// Returns whether the object was held directly by this node.
    pub fn remove(&mut self, object: &Rc<T>, fast: bool) -> bool {
        let position = self.objects.iter().position(|held| is_same_object(held, object));
        if let Some(index) = position {
            self.objects.remove(index);
        }

        if let Some(nodes) = self.nodes.as_mut() {
            for node in nodes.iter_mut() {
                node.remove(object, fast);
            }
        }

        if self.level == 0 && !fast {
            self.join();
        }

        position.is_some()
    }

    /// Re-file an object after its geometry changed. With `fast` set the tree is not tidied
    /// afterwards, for moving many objects in a batch followed by one `join`.
    pub fn update(&mut self, object: Rc<T>, fast: bool) {
        self.remove(&object, fast);
        self.insert(object);
    }

    /// Collapse every subtree whose objects, counted once each, fit in a single node.
    ///
    /// Returns everything found in this node and below, duplicates included.
    pub fn join(&mut self) -> Vec<Rc<T>> {
        let mut all_objects = self.objects.clone();
        if let Some(nodes) = self.nodes.as_mut() {
            for node in nodes.iter_mut() {
                all_objects.extend(node.join());
            }
        }

        let unique = unique_objects(&all_objects);
        if unique.len() <= self.config.max_objects {
            if self.nodes.take().is_some() {
                debug!("joined node at level {} holding {} objects", self.level, unique.len());
            }
            self.objects = unique;
        }

        all_objects
    }

    /// Drop every object and child.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.nodes = None;
    }
}
