/*!
 * Ordered Set
 *
 * Sorted, duplicate-free singly linked chain of integer keys.
 *
 * The set does no locking. Callers hold the reader-writer lock in shared mode
 * for `member` and in exclusive mode for `insert`/`delete`; the borrow rules
 * on `PriorityRwLock` guards enforce exactly that split.
 */

/// Key type stored in the set
pub type Key = i64;

type Link = Option<Box<Node>>;

struct Node {
    key: Key,
    next: Link,
}

/// Strictly ascending singly linked set
#[derive(Default)]
pub struct OrderedSet {
    head: Link,
    len: usize,
}

impl OrderedSet {
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Whether `key` is present
    pub fn member(&self, key: Key) -> bool {
        let mut cur = self.head.as_deref();
        while let Some(node) = cur {
            if node.key >= key {
                return node.key == key;
            }
            cur = node.next.as_deref();
        }
        false
    }

    /// Insert `key`, returning `false` if it was already present
    pub fn insert(&mut self, key: Key) -> bool {
        let mut cur = &mut self.head;
        while cur.as_ref().is_some_and(|node| node.key < key) {
            cur = &mut cur.as_mut().unwrap().next;
        }
        if cur.as_ref().is_some_and(|node| node.key == key) {
            return false;
        }

        let next = cur.take();
        *cur = Some(Box::new(Node { key, next }));
        self.len += 1;
        true
    }

    /// Remove `key`, returning `false` if it was absent
    pub fn delete(&mut self, key: Key) -> bool {
        let mut cur = &mut self.head;
        while cur.as_ref().is_some_and(|node| node.key < key) {
            cur = &mut cur.as_mut().unwrap().next;
        }

        match cur.take() {
            Some(node) if node.key == key => {
                *cur = node.next;
                self.len -= 1;
                true
            }
            other => {
                *cur = other;
                false
            }
        }
    }

    /// Reclaim every node
    pub fn clear(&mut self) {
        // Unlink one node at a time so long chains don't recurse in Drop
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
        self.len = 0;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Keys in ascending order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    pub fn to_vec(&self) -> Vec<Key> {
        self.iter().collect()
    }

    /// Check the chain is strictly increasing and agrees with `len`
    pub fn is_strictly_ascending(&self) -> bool {
        let mut count = 0usize;
        let mut prev: Option<Key> = None;
        for key in self.iter() {
            if prev.is_some_and(|p| p >= key) {
                return false;
            }
            prev = Some(key);
            count += 1;
        }
        count == self.len
    }
}

impl Drop for OrderedSet {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for OrderedSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Key> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

/// Ascending iterator over the keys of an [`OrderedSet`]
pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl Iterator for Iter<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            node.key
        })
    }
}
