use std::any::Any;

use glam::Vec3;

use crate::host::{Console, Input, Renderer, WindowHost};
use crate::math::{model_matrix, EulerAngles, Rgba8};

/// Identifies the mode scope that built an entity. Lookup only; an entity
/// never reaches back into its scope through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u64);

/// Kinematic state shared by every entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: EulerAngles,
    /// Degrees per second, per component.
    pub angular_velocity: EulerAngles,
    pub color: Rgba8,
    pub scope: ScopeId,
}

impl EntityState {
    pub fn new(scope: ScopeId, position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            orientation: EulerAngles::ZERO,
            angular_velocity: EulerAngles::ZERO,
            color: Rgba8::WHITE,
            scope,
        }
    }

    #[inline]
    pub fn model_matrix(&self) -> glam::Mat4 {
        model_matrix(self.position, &self.orientation)
    }
}

/// Collaborators an entity may consult during its update.
pub struct EntityCtx<'a> {
    pub input: &'a mut dyn Input,
    pub window: &'a dyn WindowHost,
    pub console: &'a dyn Console,
}

impl EntityCtx<'_> {
    /// Focused window and closed console: the player may take control.
    #[inline]
    pub fn has_control(&self) -> bool {
        self.window.has_focus() && !self.console.is_open()
    }
}

pub trait Entity: Any {
    fn update(&mut self, ctx: &mut EntityCtx<'_>, delta_seconds: f32);
    fn render(&self, renderer: &mut dyn Renderer);

    fn state(&self) -> &EntityState;
    fn state_mut(&mut self) -> &mut EntityState;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Position of an entity inside its [`EntitySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityIndex(usize);

impl EntityIndex {
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Ordered, append-only entity collection owned by a mode scope.
///
/// Slots may be empty; both passes skip them.
#[derive(Default)]
pub struct EntitySet {
    slots: Vec<Option<Box<dyn Entity>>>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, entity: Box<dyn Entity>) -> EntityIndex {
        self.push_slot(Some(entity))
    }

    pub fn push_slot(&mut self, slot: Option<Box<dyn Entity>>) -> EntityIndex {
        self.slots.push(slot);
        EntityIndex(self.slots.len() - 1)
    }

    /// Slots, empty ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn update_all(&mut self, ctx: &mut EntityCtx<'_>, delta_seconds: f32) {
        for entity in self.slots.iter_mut().flatten() {
            entity.update(ctx, delta_seconds);
        }
    }

    pub fn render_all(&self, renderer: &mut dyn Renderer) {
        for entity in self.slots.iter().flatten() {
            entity.render(renderer);
        }
    }

    pub fn get<T: Entity>(&self, index: EntityIndex) -> Option<&T> {
        self.slots
            .get(index.0)?
            .as_deref()
            .and_then(|e| e.as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: Entity>(&mut self, index: EntityIndex) -> Option<&mut T> {
        self.slots
            .get_mut(index.0)?
            .as_deref_mut()
            .and_then(|e| e.as_any_mut().downcast_mut::<T>())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Entity> + '_ {
        self.slots.iter().flatten().map(|e| e.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::host::{HeadlessConsole, HeadlessWindow, NullRenderer, SharedInput};

    struct Counter {
        state: EntityState,
        updates: Rc<Cell<u32>>,
        renders: Rc<Cell<u32>>,
    }

    impl Entity for Counter {
        fn update(&mut self, _ctx: &mut EntityCtx<'_>, delta_seconds: f32) {
            self.state.position.x += delta_seconds;
            self.updates.set(self.updates.get() + 1);
        }

        fn render(&self, _renderer: &mut dyn Renderer) {
            self.renders.set(self.renders.get() + 1);
        }

        fn state(&self) -> &EntityState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut EntityState {
            &mut self.state
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn counter(updates: &Rc<Cell<u32>>, renders: &Rc<Cell<u32>>) -> Box<dyn Entity> {
        Box::new(Counter {
            state: EntityState::new(ScopeId(1), Vec3::ZERO),
            updates: Rc::clone(updates),
            renders: Rc::clone(renders),
        })
    }

    #[test]
    fn empty_slots_are_skipped_by_both_passes() {
        let updates = Rc::new(Cell::new(0));
        let renders = Rc::new(Cell::new(0));

        let mut set = EntitySet::new();
        let first = set.push(counter(&updates, &renders));
        set.push_slot(None);
        set.push(counter(&updates, &renders));
        assert_eq!(set.len(), 3);
        assert_eq!(set.live_count(), 2);

        let mut input = SharedInput::new();
        let window = HeadlessWindow::new(2.0);
        let console = HeadlessConsole::new();
        let mut ctx = EntityCtx {
            input: &mut input,
            window: &window,
            console: &console,
        };
        set.update_all(&mut ctx, 0.5);
        set.render_all(&mut NullRenderer::new());

        assert_eq!(updates.get(), 2);
        assert_eq!(renders.get(), 2);
        assert_eq!(set.get::<Counter>(first).map(|c| c.state.position.x), Some(0.5));
    }

    #[test]
    fn typed_lookup_misses_on_empty_slot() {
        let mut set = EntitySet::new();
        let empty = set.push_slot(None);
        assert!(set.get::<Counter>(empty).is_none());
        assert!(set.get_mut::<Counter>(EntityIndex(7)).is_none());
    }
}
