//! Ordered-list moves for sorting-style answers.

use crate::error::ReorderError;

/// Move the item at `from` so it ends up at index `to`, shifting the items in
/// between by one.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), ReorderError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::OutOfBounds { index, len });
        }
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}
