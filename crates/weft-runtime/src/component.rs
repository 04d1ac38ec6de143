#![forbid(unsafe_code)]

//! Interactive components: stateful objects that render a document and
//! consume events.

use weft_core::{Event, Key};
use weft_dom::{Element, hbox, vbox};

use crate::interactive::LoopContext;

/// A stateful piece of UI.
///
/// `render` produces a fresh element tree for the current state;
/// `on_event` mutates state and reports whether the event was consumed.
/// Unconsumed events bubble up to the enclosing container.
pub trait Component {
    /// Build the element tree for the current state.
    fn render(&self) -> Element;

    /// Handle an event. Return `true` to stop propagation.
    fn on_event(&mut self, _event: &Event, _ctx: &LoopContext) -> bool {
        false
    }

    /// Called with `true` when the component gains focus, `false` when
    /// it loses it.
    fn on_focus_change(&mut self, _focused: bool) {}

    /// Whether the component can take focus.
    fn focusable(&self) -> bool {
        false
    }
}

/// Which axis a container lays out (and navigates focus) along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Horizontal,
    Vertical,
}

/// A component that owns children and routes events to the focused one.
///
/// The focused child is tracked by index and re-clamped whenever the
/// child list changes. Dispatch goes to the focused child first; an
/// unconsumed arrow key along the container's axis, or Tab/BackTab,
/// moves focus instead.
pub struct Container {
    children: Vec<Box<dyn Component>>,
    focused: usize,
    orientation: Orientation,
}

impl Container {
    /// Children side by side; ←/→ move focus.
    #[must_use]
    pub fn horizontal(children: Vec<Box<dyn Component>>) -> Self {
        Self {
            children,
            focused: 0,
            orientation: Orientation::Horizontal,
        }
    }

    /// Children stacked; ↑/↓ move focus.
    #[must_use]
    pub fn vertical(children: Vec<Box<dyn Component>>) -> Self {
        Self {
            children,
            focused: 0,
            orientation: Orientation::Vertical,
        }
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the container has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the focused child (0 when empty).
    #[must_use]
    pub fn focused_index(&self) -> usize {
        self.focused
    }

    /// Append a child.
    pub fn push(&mut self, child: Box<dyn Component>) {
        self.children.push(child);
    }

    /// Remove the child at `index`, re-clamping focus so the index can
    /// never dangle.
    pub fn remove(&mut self, index: usize) -> Box<dyn Component> {
        let child = self.children.remove(index);
        self.focused = self.focused.min(self.children.len().saturating_sub(1));
        child
    }

    /// Move focus to `index` (clamped), firing focus-change callbacks on
    /// both sides.
    pub fn set_focus(&mut self, index: usize) {
        let index = index.min(self.children.len().saturating_sub(1));
        if index == self.focused {
            return;
        }
        if let Some(old) = self.children.get_mut(self.focused) {
            old.on_focus_change(false);
        }
        self.focused = index;
        if let Some(new) = self.children.get_mut(self.focused) {
            new.on_focus_change(true);
        }
    }

    /// Step focus to the nearest focusable sibling in `direction`
    /// (+1 or -1). Returns whether focus moved.
    fn move_focus(&mut self, direction: isize) -> bool {
        let len = self.children.len() as isize;
        let mut candidate = self.focused as isize + direction;
        while candidate >= 0 && candidate < len {
            if self.children[candidate as usize].focusable() {
                self.set_focus(candidate as usize);
                return true;
            }
            candidate += direction;
        }
        false
    }
}

impl Component for Container {
    fn render(&self) -> Element {
        let children: Vec<Element> = self.children.iter().map(|c| c.render()).collect();
        match self.orientation {
            Orientation::Horizontal => hbox(children),
            Orientation::Vertical => vbox(children),
        }
    }

    fn on_event(&mut self, event: &Event, ctx: &LoopContext) -> bool {
        if let Some(child) = self.children.get_mut(self.focused)
            && child.on_event(event, ctx)
        {
            return true;
        }

        let Event::Key(key) = event else {
            return false;
        };
        let (back, forward) = match self.orientation {
            Orientation::Horizontal => (Key::Left, Key::Right),
            Orientation::Vertical => (Key::Up, Key::Down),
        };
        match key.code {
            Key::Tab => self.move_focus(1),
            Key::BackTab => self.move_focus(-1),
            code if code == forward => self.move_focus(1),
            code if code == back => self.move_focus(-1),
            _ => false,
        }
    }

    fn on_focus_change(&mut self, focused: bool) {
        if let Some(child) = self.children.get_mut(self.focused) {
            child.on_focus_change(focused);
        }
    }

    fn focusable(&self) -> bool {
        self.children.iter().any(|c| c.focusable())
    }
}

/// A stateless leaf component built from a closure.
pub struct Renderer<F: Fn() -> Element> {
    render_fn: F,
}

/// Wrap a closure as a component.
pub fn renderer<F: Fn() -> Element>(render_fn: F) -> Renderer<F> {
    Renderer { render_fn }
}

impl<F: Fn() -> Element> Component for Renderer<F> {
    fn render(&self) -> Element {
        (self.render_fn)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use weft_core::KeyEvent;
    use weft_dom::text;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        log: Log,
        consume: bool,
    }

    impl Probe {
        fn boxed(name: &'static str, log: &Log, consume: bool) -> Box<dyn Component> {
            Box::new(Self {
                name,
                log: Rc::clone(log),
                consume,
            })
        }
    }

    impl Component for Probe {
        fn render(&self) -> Element {
            text(self.name)
        }

        fn on_event(&mut self, _event: &Event, _ctx: &LoopContext) -> bool {
            self.log.borrow_mut().push(format!("event:{}", self.name));
            self.consume
        }

        fn on_focus_change(&mut self, focused: bool) {
            self.log
                .borrow_mut()
                .push(format!("focus:{}:{focused}", self.name));
        }

        fn focusable(&self) -> bool {
            true
        }
    }

    fn key(code: Key) -> Event {
        Event::Key(KeyEvent::new(code))
    }

    #[test]
    fn focused_child_sees_events_first() {
        let log: Log = Rc::default();
        let mut container = Container::horizontal(vec![
            Probe::boxed("a", &log, true),
            Probe::boxed("b", &log, true),
        ]);
        let ctx = LoopContext::detached();

        assert!(container.on_event(&Event::character('x'), &ctx));
        assert_eq!(log.borrow().as_slice(), ["event:a"]);
    }

    #[test]
    fn unconsumed_arrow_moves_focus() {
        let log: Log = Rc::default();
        let mut container = Container::horizontal(vec![
            Probe::boxed("a", &log, false),
            Probe::boxed("b", &log, false),
        ]);
        let ctx = LoopContext::detached();

        assert!(container.on_event(&key(Key::Right), &ctx));
        assert_eq!(container.focused_index(), 1);
        assert_eq!(
            log.borrow().as_slice(),
            ["event:a", "focus:a:false", "focus:b:true"]
        );
    }

    #[test]
    fn consumed_arrow_does_not_move_focus() {
        let log: Log = Rc::default();
        let mut container = Container::horizontal(vec![
            Probe::boxed("a", &log, true),
            Probe::boxed("b", &log, true),
        ]);
        let ctx = LoopContext::detached();

        assert!(container.on_event(&key(Key::Right), &ctx));
        assert_eq!(container.focused_index(), 0);
    }

    #[test]
    fn vertical_container_ignores_horizontal_arrows() {
        let log: Log = Rc::default();
        let mut container = Container::vertical(vec![
            Probe::boxed("a", &log, false),
            Probe::boxed("b", &log, false),
        ]);
        let ctx = LoopContext::detached();

        assert!(!container.on_event(&key(Key::Right), &ctx));
        assert_eq!(container.focused_index(), 0);
        assert!(container.on_event(&key(Key::Down), &ctx));
        assert_eq!(container.focused_index(), 1);
    }

    #[test]
    fn tab_cycles_in_both_orientations() {
        let log: Log = Rc::default();
        let mut container = Container::vertical(vec![
            Probe::boxed("a", &log, false),
            Probe::boxed("b", &log, false),
            Probe::boxed("c", &log, false),
        ]);
        let ctx = LoopContext::detached();

        assert!(container.on_event(&key(Key::Tab), &ctx));
        assert!(container.on_event(&key(Key::Tab), &ctx));
        assert_eq!(container.focused_index(), 2);
        // Off the end: unhandled, focus stays.
        assert!(!container.on_event(&key(Key::Tab), &ctx));
        assert_eq!(container.focused_index(), 2);
        assert!(container.on_event(&key(Key::BackTab), &ctx));
        assert_eq!(container.focused_index(), 1);
    }

    #[test]
    fn focus_skips_unfocusable_children() {
        let log: Log = Rc::default();
        let mut container = Container::horizontal(vec![
            Probe::boxed("a", &log, false),
            Box::new(renderer(|| text("static"))),
            Probe::boxed("c", &log, false),
        ]);
        let ctx = LoopContext::detached();

        assert!(container.on_event(&key(Key::Tab), &ctx));
        assert_eq!(container.focused_index(), 2);
    }

    #[test]
    fn removing_children_reclamps_focus() {
        let log: Log = Rc::default();
        let mut container = Container::horizontal(vec![
            Probe::boxed("a", &log, false),
            Probe::boxed("b", &log, false),
            Probe::boxed("c", &log, false),
        ]);
        container.set_focus(2);
        container.remove(2);
        assert_eq!(container.focused_index(), 1);
        container.remove(0);
        container.remove(0);
        assert_eq!(container.focused_index(), 0);
        assert!(container.is_empty());
    }

    #[test]
    fn renderer_is_a_plain_leaf() {
        let leaf = renderer(|| text("hello"));
        assert!(!leaf.focusable());
        let mut element = leaf.render();
        let requirement = element.compute_requirement();
        assert_eq!(requirement.min_width, 5);
    }

    #[test]
    fn container_render_matches_orientation() {
        let log: Log = Rc::default();
        let container = Container::vertical(vec![
            Probe::boxed("aa", &log, false),
            Probe::boxed("b", &log, false),
        ]);
        let mut element = container.render();
        let requirement = element.compute_requirement();
        // Stacked: width is the max, height the sum.
        assert_eq!(requirement.min_width, 2);
        assert_eq!(requirement.min_height, 2);
    }
}
