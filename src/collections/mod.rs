/*!
 * Collections
 * Data structures shared between benchmark workers
 */

mod ordered_set;

pub use ordered_set::{Iter, Key, OrderedSet};
