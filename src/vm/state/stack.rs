//! This module contains the implementation of the abstract interpreter's
//! stack.

use std::collections::VecDeque;

use crate::{constant::MAXIMUM_STACK_DEPTH, vm::value::AbstractValue};

/// The representation of the abstract interpreter's stack.
///
/// # Indexing
///
/// Indexing into this stack is zero-based, where frame 0 is the top stack
/// frame.
///
/// # Unknown Frames
///
/// The abstract interpreter starts from states in which it does not know what
/// the stack holds, so the stack behaves as if it sat on top of an unbounded
/// number of [`AbstractValue::Top`] frames. Reading, popping or swapping below
/// the known frames is never an error, and simply produces `Top`.
///
/// # Depth
///
/// In a true EVM, it is a depth [`MAXIMUM_STACK_DEPTH`] stack, where each item
/// is word (256-bit) sized. Here the same maximum is kept, and pushing beyond
/// it discards the bottom-most frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stack {
    /// The known frames, with the bottom-most at the front.
    data: VecDeque<AbstractValue>,
}

impl Stack {
    /// Creates a new stack without any items on it.
    #[must_use]
    pub fn new() -> Self {
        Self { data: VecDeque::new() }
    }

    /// Pushes the provided value onto the top of the stack.
    ///
    /// If the stack is already at its maximum depth, the bottom-most frame is
    /// discarded to make room.
    pub fn push(&mut self, value: AbstractValue) {
        if self.data.len() >= MAXIMUM_STACK_DEPTH {
            tracing::debug!("Stack depth exceeded {MAXIMUM_STACK_DEPTH}, dropping the bottom frame");
            self.data.pop_front();
        }
        self.data.push_back(value);
    }

    /// Pops the top value from the stack, producing [`AbstractValue::Top`] if
    /// there is no known frame to pop.
    pub fn pop(&mut self) -> AbstractValue {
        self.data.pop_back().unwrap_or_default()
    }

    /// Reads from the stack frame at the provided `depth`.
    #[must_use]
    pub fn read(&self, depth: usize) -> AbstractValue {
        self.index_of(depth).map(|ix| self.data[ix]).unwrap_or_default()
    }

    /// Duplicates the stack item at `frame` onto the top of the stack.
    ///
    /// This is a more general case of the `DUP` opcodes as it can duplicate any
    /// stack frame. `DUPN` corresponds to `dup(N - 1)`.
    ///
    /// Returns the duplicated value.
    pub fn dup(&mut self, frame: usize) -> AbstractValue {
        let value = self.read(frame);
        self.push(value);
        value
    }

    /// Swaps the top stack item with the item in `frame`.
    ///
    /// This swaps with the indicated frame directly, so `SWAPN` corresponds to
    /// `swap(N)`. If `frame` lies below the known frames, the stack is first
    /// extended downwards with `Top` so that the swap is well defined.
    pub fn swap(&mut self, frame: usize) {
        if frame == 0 {
            return;
        }
        let missing = (frame + 1).saturating_sub(self.data.len());
        for _ in 0..missing {
            self.data.push_front(AbstractValue::Top);
        }

        let top = self.data.len() - 1;
        self.data.swap(top, top - frame);
    }

    /// Gets the number of known frames on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.data.len()
    }

    /// Checks if the stack has no known frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Computes the least upper bound of two stacks.
    ///
    /// The stacks are aligned at their tops and compared frame by frame. The
    /// result is only as deep as the shallower of the two, as anything below
    /// that is unknown on at least one side.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let depth = self.depth().min(other.depth());
        let data = (0..depth)
            .rev()
            .map(|frame| self.read(frame).join(other.read(frame)))
            .collect();
        Self { data }
    }

    /// Gets the vector index of the frame at `depth`, if it is known.
    fn index_of(&self, depth: usize) -> Option<usize> {
        self.data.len().checked_sub(depth + 1)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        constant::MAXIMUM_STACK_DEPTH,
        vm::{
            state::stack::Stack,
            value::{known::KnownWord, AbstractValue},
        },
    };

    /// Creates a new concrete value for testing purposes.
    fn known(value: u32) -> AbstractValue {
        AbstractValue::from(KnownWord::from(value))
    }

    /// Constructs a new stack holding the values `0..item_count`, with the last
    /// of them on top.
    fn new_stack_with_items(item_count: u32) -> Stack {
        let mut stack = Stack::new();
        for i in 0..item_count {
            stack.push(known(i));
        }

        stack
    }

    #[test]
    fn can_construct_new_stack() {
        let stack = Stack::new();
        assert_eq!(stack.depth(), 0);
        assert!(stack.is_empty());
    }

    #[test]
    fn can_push_and_pop_item() {
        let mut stack = Stack::new();
        stack.push(known(7));
        assert_eq!(stack.pop(), known(7));
        assert!(stack.is_empty());
    }

    #[test]
    fn pushing_beyond_capacity_drops_the_bottom_frame() {
        let mut stack = new_stack_with_items(MAXIMUM_STACK_DEPTH as u32);
        stack.push(known(5000));

        assert_eq!(stack.depth(), MAXIMUM_STACK_DEPTH);
        assert_eq!(stack.read(0), known(5000));
        assert_eq!(stack.read(MAXIMUM_STACK_DEPTH - 1), known(1));
    }

    #[test]
    fn repeated_overflow_keeps_the_newest_frames() {
        let mut stack = new_stack_with_items(2 * MAXIMUM_STACK_DEPTH as u32);

        assert_eq!(stack.depth(), MAXIMUM_STACK_DEPTH);
        assert_eq!(stack.read(0), known(2 * MAXIMUM_STACK_DEPTH as u32 - 1));
        assert_eq!(stack.read(MAXIMUM_STACK_DEPTH - 1), known(MAXIMUM_STACK_DEPTH as u32));

        stack.swap(1);
        assert_eq!(stack.read(1), known(2 * MAXIMUM_STACK_DEPTH as u32 - 1));
        assert_eq!(stack.pop(), known(2 * MAXIMUM_STACK_DEPTH as u32 - 2));
    }

    #[test]
    fn popping_empty_stack_gives_top() {
        let mut stack = Stack::default();
        assert!(stack.pop().is_top());
        assert!(stack.is_empty());
    }

    #[test]
    fn can_read_item_at_depth() {
        let stack = new_stack_with_items(10);
        assert_eq!(stack.read(0), known(9));
        assert_eq!(stack.read(7), known(2));
    }

    #[test]
    fn reading_below_the_stack_gives_top() {
        let stack = new_stack_with_items(10);
        assert!(stack.read(10).is_top());
        assert!(Stack::default().read(0).is_top());
    }

    #[test]
    fn can_dup_existing_item() {
        let mut stack = new_stack_with_items(10);
        let value = stack.dup(3);

        assert_eq!(value, known(6));
        assert_eq!(stack.depth(), 11);
        assert_eq!(stack.read(0), known(6));
    }

    #[test]
    fn dup_below_the_stack_pushes_top() {
        let mut stack = new_stack_with_items(2);
        assert!(stack.dup(5).is_top());
        assert_eq!(stack.depth(), 3);
    }

    #[test]
    fn can_swap_existing_items() {
        let mut stack = new_stack_with_items(10);
        stack.swap(2);

        assert_eq!(stack.read(0), known(7));
        assert_eq!(stack.read(2), known(9));
        assert_eq!(stack.read(1), known(8));
    }

    #[test]
    fn swap_below_the_stack_extends_with_top() {
        let mut stack = new_stack_with_items(1);
        stack.swap(2);

        assert_eq!(stack.depth(), 3);
        assert!(stack.read(0).is_top());
        assert_eq!(stack.read(2), known(0));
    }

    #[test]
    fn join_truncates_to_shallower_stack() {
        let mut left = new_stack_with_items(4);
        let right = new_stack_with_items(2);
        left.pop();
        left.pop();
        left.push(known(1));

        let joined = left.join(&right);
        assert_eq!(joined.depth(), 2);
        assert_eq!(joined.read(0), known(1));
        assert_eq!(joined.read(1), known(0).join(known(1)));
        assert!(joined.read(1).is_top());
    }
}
