//! A persistent singly-linked stack.
//!
//! Cloning is O(1) and shares structure, which lets choice points keep a
//! snapshot of the resolvent and of the cut barriers without copying them.

use std::fmt;
use std::sync::Arc;

struct Node<T> {
    head: T,
    tail: Stack<T>,
}

/// Immutable stack with structural sharing
pub struct Stack<T> {
    top: Option<Arc<Node<T>>>,
    len: usize,
}

impl<T> Stack<T> {
    /// The empty stack
    #[must_use]
    pub fn new() -> Self {
        Self { top: None, len: 0 }
    }

    /// A new stack with `value` on top of this one
    #[must_use]
    pub fn push(&self, value: T) -> Self {
        Self {
            top: Some(Arc::new(Node {
                head: value,
                tail: self.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// The top element and the stack below it
    #[must_use]
    pub fn split_first(&self) -> Option<(&T, Self)> {
        self.top.as_ref().map(|node| (&node.head, node.tail.clone()))
    }

    /// The top element
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.top.as_ref().map(|node| &node.head)
    }

    /// The stack without its top element (empty stays empty)
    #[must_use]
    pub fn pop(&self) -> Self {
        self.top
            .as_ref()
            .map_or_else(Self::new, |node| node.tail.clone())
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when there are no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// Iterate from top to bottom
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.top.as_deref(),
        }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Self {
            top: self.top.clone(),
            len: self.len,
        }
    }
}

// Unlink iteratively; a recursive drop of a long chain overflows the stack.
impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        let mut next = self.top.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.tail.top.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over a [`Stack`], top first
#[derive(Debug)]
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.head.fmt(f)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.tail.top.as_deref();
            &node.head
        })
    }
}

impl<'a, T> IntoIterator for &'a Stack<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> FromIterator<T> for Stack<T> {
    /// Builds a stack whose top is the first item of the iterator
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(Self::new(), |stack, item| stack.push(item))
    }
}
