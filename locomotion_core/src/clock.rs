//! Hierarchical time control.
//!
//! A [`ClockTree`] owns every clock of the application. The root receives the
//! raw platform delta; each child derives its delta from its parent's
//! effective delta at tick time, so pausing or scaling a node affects its whole
//! subtree and nothing else.

use crate::error::ClockError;

/// Effective delta produced by a single-step tick.
pub const NOMINAL_STEP_SECONDS: f32 = 1.0 / 60.0;

/// Generational handle into a [`ClockTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockId {
    index: u32,
    generation: u32,
}

impl ClockId {
    /// Arena slot; reused by the next clock created after this one is destroyed.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }
}

#[derive(Debug, Clone)]
pub struct Clock {
    raw_delta: f32,
    effective_delta: f32,
    time_scale: f32,
    paused: bool,
    step_pending: bool,
    total_seconds: f64,
    frame_count: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            raw_delta: 0.0,
            effective_delta: 0.0,
            time_scale: 1.0,
            paused: false,
            step_pending: false,
            total_seconds: 0.0,
            frame_count: 0,
        }
    }
}

impl Clock {
    #[inline]
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unpausing also drops a step that was requested but not yet consumed.
    #[inline]
    pub fn unpause(&mut self) {
        self.paused = false;
        self.step_pending = false;
    }

    #[inline]
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.unpause();
        } else {
            self.pause();
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Negative and non-finite factors are stored as 0.
    #[inline]
    pub fn set_time_scale(&mut self, factor: f32) {
        self.time_scale = if factor.is_finite() { factor.max(0.0) } else { 0.0 };
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Requests one tick of [`NOMINAL_STEP_SECONDS`]. Ignored unless paused.
    #[inline]
    pub fn step_single_frame(&mut self) {
        if self.paused {
            self.step_pending = true;
        }
    }

    #[inline]
    pub fn is_step_pending(&self) -> bool {
        self.step_pending
    }

    /// Input delta this clock received on its last tick (before scale/pause).
    #[inline]
    pub fn raw_delta(&self) -> f32 {
        self.raw_delta
    }

    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.effective_delta
    }

    #[inline]
    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second over the clock's lifetime.
    pub fn average_fps(&self) -> f32 {
        if self.total_seconds <= 0.0 {
            return 0.0;
        }
        (self.frame_count as f64 / self.total_seconds) as f32
    }

    fn advance(&mut self, input_delta: f32) -> f32 {
        self.raw_delta = input_delta;

        let effective = if self.paused {
            if self.step_pending {
                self.step_pending = false;
                NOMINAL_STEP_SECONDS
            } else {
                0.0
            }
        } else {
            input_delta * self.time_scale
        };

        self.effective_delta = effective;
        self.total_seconds += effective as f64;
        self.frame_count += 1;
        effective
    }
}

#[derive(Debug)]
struct Node {
    clock: Clock,
    parent: Option<u32>,
    children: Vec<u32>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of clocks with parent/child links.
#[derive(Debug)]
pub struct ClockTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ClockId,
}

impl Default for ClockTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockTree {
    pub fn new() -> Self {
        let root_node = Node {
            clock: Clock::default(),
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root_node),
            }],
            free: Vec::new(),
            root: ClockId {
                index: 0,
                generation: 0,
            },
        }
    }

    #[inline]
    pub fn root(&self) -> ClockId {
        self.root
    }

    /// Number of live clocks, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    #[inline]
    pub fn contains(&self, id: ClockId) -> bool {
        self.node(id).is_some()
    }

    #[inline]
    pub fn get(&self, id: ClockId) -> Option<&Clock> {
        self.node(id).map(|n| &n.clock)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ClockId) -> Option<&mut Clock> {
        self.node_mut(id).map(|n| &mut n.clock)
    }

    pub fn parent(&self, id: ClockId) -> Option<ClockId> {
        let parent = self.node(id)?.parent?;
        Some(ClockId {
            index: parent,
            generation: self.slots[parent as usize].generation,
        })
    }

    /// Creates a fresh clock (defaults, zero elapsed) under `parent`.
    pub fn create_child(&mut self, parent: ClockId) -> Result<ClockId, ClockError> {
        if !self.contains(parent) {
            return Err(ClockError::UnknownClock(parent));
        }

        let node = Node {
            clock: Clock::default(),
            parent: Some(parent.index),
            children: Vec::new(),
        };

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                ClockId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                ClockId {
                    index,
                    generation: 0,
                }
            }
        };

        if let Some(p) = self.node_mut(parent) {
            p.children.push(id.index);
        }
        Ok(id)
    }

    /// Destroys `id` and its whole subtree. Handles to them become stale.
    pub fn destroy(&mut self, id: ClockId) -> Result<(), ClockError> {
        if id == self.root {
            return Err(ClockError::RootClock);
        }
        let parent = match self.node(id) {
            Some(node) => node.parent,
            None => return Err(ClockError::UnknownClock(id)),
        };

        if let Some(parent) = parent {
            if let Some(p) = self.slots[parent as usize].node.as_mut() {
                p.children.retain(|&c| c != id.index);
            }
        }

        let mut stack = vec![id.index];
        while let Some(index) = stack.pop() {
            let slot = &mut self.slots[index as usize];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
        Ok(())
    }

    /// Advances every clock. Parents always tick before their children.
    pub fn tick(&mut self, raw_delta: f32) {
        let raw_delta = if raw_delta.is_finite() { raw_delta.max(0.0) } else { 0.0 };

        let mut stack: Vec<(u32, f32)> = vec![(self.root.index, raw_delta)];
        while let Some((index, input)) = stack.pop() {
            let Some(node) = self.slots[index as usize].node.as_mut() else {
                continue;
            };
            let effective = node.clock.advance(input);
            for &child in node.children.iter().rev() {
                stack.push((child, effective));
            }
        }
    }

    #[inline]
    fn node(&self, id: ClockId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    #[inline]
    fn node_mut(&mut self, id: ClockId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }
}
