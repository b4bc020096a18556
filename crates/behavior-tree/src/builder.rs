//! Builder utilities for ergonomic behavior tree construction.
//!
//! Instead of writing verbose `Box::new(Sequence::new(vec![...]))`, use
//! shorter functions like `sequence(vec![...])`.

use crate::{Action, Behavior, Condition, Selector, Sequence, Status};

/// Creates a sequence node.
#[inline]
pub fn sequence<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Sequence::new(children))
}

/// Creates a selector node.
#[inline]
pub fn selector<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Selector::new(children))
}

/// Creates a predicate leaf.
#[inline]
pub fn condition<C: 'static>(predicate: fn(&C) -> bool) -> Box<dyn Behavior<C>> {
    Box::new(Condition::new(predicate))
}

/// Creates an action leaf.
#[inline]
pub fn action<C: 'static>(run: fn(&mut C) -> Status) -> Box<dyn Behavior<C>> {
    Box::new(Action::new(run))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        armed: bool,
        hits: u32,
    }

    fn armed(ctx: &Counter) -> bool {
        ctx.armed
    }

    fn hit(ctx: &mut Counter) -> Status {
        ctx.hits += 1;
        Status::Success
    }

    fn reload(ctx: &mut Counter) -> Status {
        ctx.armed = true;
        Status::Running
    }

    #[test]
    fn assembled_tree_falls_back_until_guard_passes() {
        let tree = selector(vec![
            sequence(vec![condition(armed), action(hit)]),
            action(reload),
        ]);

        let mut ctx = Counter { armed: false, hits: 0 };
        assert_eq!(tree.tick(&mut ctx), Status::Running);
        assert_eq!(ctx.hits, 0);
        assert_eq!(tree.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.hits, 1);
    }
}
