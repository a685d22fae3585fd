use std::borrow::Borrow;
use std::cmp::Ordering;

use tracing::trace;

use crate::arena::Arena;

/// Cached height of a subtree, 0 when it is empty. Never descends.
#[inline]
pub fn height<T>(arena: &Arena<T>, node: Option<u32>) -> u32 {
    node.map_or(0, |i| arena[i].h)
}

/// Refreshes `arena[i].h` from the (already correct) child heights.
#[inline]
pub fn recompute_height<T>(arena: &mut Arena<T>, i: u32) {
    let n = &arena[i];
    let h = 1 + height(arena, n.l).max(height(arena, n.r));
    arena[i].h = h;
}

/// `height(right) - height(left)`.
#[inline]
pub fn balance_factor<T>(arena: &Arena<T>, i: u32) -> i32 {
    let n = &arena[i];
    height(arena, n.r) as i32 - height(arena, n.l) as i32
}

/// Points the child slot of `p` that held `old` at `new`.
#[inline]
fn relink_parent<T>(arena: &mut Arena<T>, p: u32, old: u32, new: Option<u32>) {
    if arena[p].l == Some(old) {
        arena[p].l = new;
    } else {
        arena[p].r = new;
    }
}

/// Promotes `n.r` into `n`'s position. Returns the tree root afterwards.
///
/// Heights are left stale: the caller recomputes `n` and then its new parent.
pub fn rotate_left<T>(arena: &mut Arena<T>, root: u32, n: u32) -> u32 {
    let nr = arena[n].r.expect("rotate_left needs a right child");
    let p = arena[n].p;
    let nrl = arena[nr].l;

    arena[n].r = nrl;
    if let Some(nrl) = nrl {
        arena[nrl].p = Some(n);
    }
    arena[nr].l = Some(n);
    arena[n].p = Some(nr);
    arena[nr].p = p;
    trace!(pivot = n, top = nr, "rotate left");

    match p {
        Some(p) => {
            relink_parent(arena, p, n, Some(nr));
            root
        }
        None => nr,
    }
}

/// Mirror of [`rotate_left`]: promotes `n.l`.
pub fn rotate_right<T>(arena: &mut Arena<T>, root: u32, n: u32) -> u32 {
    let nl = arena[n].l.expect("rotate_right needs a left child");
    let p = arena[n].p;
    let nlr = arena[nl].r;

    arena[n].l = nlr;
    if let Some(nlr) = nlr {
        arena[nlr].p = Some(n);
    }
    arena[nl].r = Some(n);
    arena[n].p = Some(nl);
    arena[nl].p = p;
    trace!(pivot = n, top = nl, "rotate right");

    match p {
        Some(p) => {
            relink_parent(arena, p, n, Some(nl));
            root
        }
        None => nl,
    }
}

/// Right-heavy `n` whose right child leans left.
pub fn rotate_right_left<T>(arena: &mut Arena<T>, root: u32, n: u32) -> u32 {
    let nr = arena[n].r.expect("rotate_right_left needs a right child");
    let root = rotate_right(arena, root, nr);
    rotate_left(arena, root, n)
}

/// Left-heavy `n` whose left child leans right.
pub fn rotate_left_right<T>(arena: &mut Arena<T>, root: u32, n: u32) -> u32 {
    let nl = arena[n].l.expect("rotate_left_right needs a left child");
    let root = rotate_left(arena, root, nl);
    rotate_right(arena, root, n)
}

/// Recomputes heights bottom-up around a finished rotation whose old top was
/// `n`, and returns the new top.
fn settle<T>(arena: &mut Arena<T>, n: u32) -> u32 {
    let top = arena[n].p.expect("rotated node hangs under the new top");
    if let Some(l) = arena[top].l {
        recompute_height(arena, l);
    }
    if let Some(r) = arena[top].r {
        recompute_height(arena, r);
    }
    recompute_height(arena, top);
    top
}

/// Walks from `start` to the root refreshing cached heights and rotating
/// every ancestor whose balance factor reached ±2. Returns the new root.
///
/// The walk never stops early: after a removal the height can shrink at
/// several levels, each of which may need its own rotation.
pub fn rebalance<T>(arena: &mut Arena<T>, mut root: u32, start: u32) -> u32 {
    let mut curr = Some(start);
    let mut rotations = 0u32;
    while let Some(n) = curr {
        recompute_height(arena, n);
        let bf = balance_factor(arena, n);
        debug_assert!((-2..=2).contains(&bf), "balance factor {bf} at node {n}");

        let top = if bf < -1 {
            let l = arena[n].l.expect("left-heavy node has a left child");
            root = if balance_factor(arena, l) <= 0 {
                rotate_right(arena, root, n)
            } else {
                rotate_left_right(arena, root, n)
            };
            rotations += 1;
            settle(arena, n)
        } else if bf > 1 {
            let r = arena[n].r.expect("right-heavy node has a right child");
            root = if balance_factor(arena, r) >= 0 {
                rotate_left(arena, root, n)
            } else {
                rotate_right_left(arena, root, n)
            };
            rotations += 1;
            settle(arena, n)
        } else {
            n
        };

        curr = arena[top].p;
    }
    trace!(start, rotations, "rebalanced");
    root
}

/// Where a key belongs relative to the current tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// The tree is empty.
    Root,
    /// Empty left slot under the given node.
    Left(u32),
    /// Empty right slot under the given node.
    Right(u32),
    /// The key is already stored at the given node.
    Occupied(u32),
}

/// Descends from `root` comparing `key` until an empty slot or a match.
pub fn find_slot<T: Ord>(arena: &Arena<T>, root: Option<u32>, key: &T) -> Slot {
    let Some(mut curr) = root else {
        return Slot::Root;
    };
    loop {
        let n = &arena[curr];
        match key.cmp(&n.k) {
            Ordering::Equal => return Slot::Occupied(curr),
            Ordering::Less => match n.l {
                Some(l) => curr = l,
                None => return Slot::Left(curr),
            },
            Ordering::Greater => match n.r {
                Some(r) => curr = r,
                None => return Slot::Right(curr),
            },
        }
    }
}

/// Hangs the detached node `n` as the left child of `p` and rebalances.
pub fn insert_left<T>(arena: &mut Arena<T>, root: u32, n: u32, p: u32) -> u32 {
    arena[p].l = Some(n);
    arena[n].p = Some(p);
    rebalance(arena, root, n)
}

/// Hangs the detached node `n` as the right child of `p` and rebalances.
pub fn insert_right<T>(arena: &mut Arena<T>, root: u32, n: u32, p: u32) -> u32 {
    arena[p].r = Some(n);
    arena[n].p = Some(p);
    rebalance(arena, root, n)
}

/// Index of the node holding `key`, if any.
pub fn find<T, Q>(arena: &Arena<T>, root: Option<u32>, key: &Q) -> Option<u32>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut curr = root;
    while let Some(i) = curr {
        let n = &arena[i];
        curr = match key.cmp(n.k.borrow()) {
            Ordering::Equal => return Some(i),
            Ordering::Less => n.l,
            Ordering::Greater => n.r,
        };
    }
    None
}

/// Leftmost node of the subtree at `root`.
pub fn first<T>(arena: &Arena<T>, root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(l) = arena[curr].l {
        curr = l;
    }
    Some(curr)
}

/// Rightmost node of the subtree at `root`.
pub fn last<T>(arena: &Arena<T>, root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(r) = arena[curr].r {
        curr = r;
    }
    Some(curr)
}

/// In-order successor of `node`.
pub fn next<T>(arena: &Arena<T>, node: u32) -> Option<u32> {
    if let Some(r) = arena[node].r {
        return first(arena, Some(r));
    }
    let mut curr = node;
    let mut p = arena[node].p;
    while let Some(pi) = p {
        if arena[pi].r == Some(curr) {
            curr = pi;
            p = arena[pi].p;
        } else {
            return Some(pi);
        }
    }
    None
}

/// Unlinks node `n` from the tree rooted at `root`, frees its slot and
/// rebalances from the lowest node whose subtree shrank.
///
/// Returns the new root (`None` once the tree is empty) and the detached node.
pub fn remove<T>(arena: &mut Arena<T>, root: u32, n: u32) -> (Option<u32>, T) {
    let (p, l, r) = {
        let node = &arena[n];
        (node.p, node.l, node.r)
    };

    let (root, start) = match (l, r) {
        (None, None) => match p {
            Some(p) => {
                relink_parent(arena, p, n, None);
                (Some(root), Some(p))
            }
            None => (None, None),
        },
        (Some(c), None) | (None, Some(c)) => {
            arena[c].p = p;
            let root = match p {
                Some(p) => {
                    relink_parent(arena, p, n, Some(c));
                    root
                }
                None => c,
            };
            (Some(root), Some(c))
        }
        (Some(l), Some(r)) => {
            let s = first(arena, Some(r)).expect("right subtree is not empty");
            let start = if s != r {
                // Lift the successor out, promoting its right child.
                let sp = arena[s].p.expect("successor below the right child has a parent");
                let sr = arena[s].r;
                arena[sp].l = sr;
                if let Some(sr) = sr {
                    arena[sr].p = Some(sp);
                }
                arena[s].r = Some(r);
                arena[r].p = Some(s);
                sp
            } else {
                s
            };
            arena[s].l = Some(l);
            arena[l].p = Some(s);
            arena[s].p = p;
            let root = match p {
                Some(p) => {
                    relink_parent(arena, p, n, Some(s));
                    root
                }
                None => s,
            };
            (Some(root), Some(start))
        }
    };

    let node = arena.release(n);
    let root = match (root, start) {
        (Some(root), Some(start)) => Some(rebalance(arena, root, start)),
        (root, _) => root,
    };
    (root, node.k)
}

/// Checks every structural invariant of the tree rooted at `root`: parent
/// links, cached heights, AVL balance, strict in-order key order, and that the
/// tree reaches every live arena node.
pub fn assert_avl_tree<T: Ord>(arena: &Arena<T>, root: Option<u32>) -> Result<(), String> {
    let Some(root) = root else {
        return if arena.is_empty() {
            Ok(())
        } else {
            Err(format!("Empty tree but {} live nodes", arena.len()))
        };
    };

    if arena[root].p.is_some() {
        return Err("Root has parent".to_string());
    }

    fn validate_links_and_height<T>(arena: &Arena<T>, node: u32) -> Result<u32, String> {
        let n = &arena[node];
        let mut lh = 0;
        let mut rh = 0;
        if let Some(l) = n.l {
            if arena[l].p != Some(node) {
                return Err(format!("Broken parent link on left child of node {node}"));
            }
            lh = validate_links_and_height(arena, l)?;
        }
        if let Some(r) = n.r {
            if arena[r].p != Some(node) {
                return Err(format!("Broken parent link on right child of node {node}"));
            }
            rh = validate_links_and_height(arena, r)?;
        }

        let expected = 1 + lh.max(rh);
        if n.h != expected {
            return Err(format!(
                "Height mismatch at node {node}: expected {expected}, got {}",
                n.h
            ));
        }
        let bf = rh as i32 - lh as i32;
        if !(-1..=1).contains(&bf) {
            return Err(format!("AVL balance violated at node {node}: bf={bf}"));
        }
        Ok(expected)
    }

    validate_links_and_height(arena, root)?;

    let mut count = 0usize;
    let mut curr = first(arena, Some(root));
    let mut prev: Option<u32> = None;
    while let Some(i) = curr {
        if let Some(prev) = prev {
            if arena[prev].k >= arena[i].k {
                return Err(format!("Node order violated between {prev} and {i}"));
            }
        }
        count += 1;
        prev = Some(i);
        curr = next(arena, i);
    }
    if count != arena.len() {
        return Err(format!(
            "Tree reaches {count} nodes but the arena holds {}",
            arena.len()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avl::types::AvlNode;

    fn build(keys: &[i32]) -> (Arena<i32>, Option<u32>) {
        let mut arena = Arena::new();
        let mut root = None;
        for &k in keys {
            let slot = find_slot(&arena, root, &k);
            let n = arena.alloc(AvlNode::new(k));
            root = Some(match slot {
                Slot::Root => n,
                Slot::Left(p) => insert_left(&mut arena, root.unwrap(), n, p),
                Slot::Right(p) => insert_right(&mut arena, root.unwrap(), n, p),
                Slot::Occupied(_) => panic!("duplicate key {k} in fixture"),
            });
        }
        (arena, root)
    }

    fn key_of(arena: &Arena<i32>, i: Option<u32>) -> Option<i32> {
        i.map(|i| arena[i].k)
    }

    #[test]
    fn height_of_empty_subtree_is_zero() {
        let arena = Arena::<i32>::new();
        assert_eq!(height(&arena, None), 0);
    }

    #[test]
    fn rotate_left_rewires_all_links() {
        let mut arena = Arena::new();
        let a = arena.alloc(AvlNode::new(1));
        let b = arena.alloc(AvlNode::new(2));
        let c = arena.alloc(AvlNode::new(3));
        let bl = arena.alloc(AvlNode::new(15));
        // a(1) -> r b(2) -> r c(3), b.l = bl; keys only matter for shape here
        arena[a].r = Some(b);
        arena[b].p = Some(a);
        arena[b].r = Some(c);
        arena[c].p = Some(b);
        arena[b].l = Some(bl);
        arena[bl].p = Some(b);

        let root = rotate_left(&mut arena, a, a);
        assert_eq!(root, b);
        assert_eq!(arena[b].p, None);
        assert_eq!(arena[b].l, Some(a));
        assert_eq!(arena[a].p, Some(b));
        assert_eq!(arena[a].r, Some(bl));
        assert_eq!(arena[bl].p, Some(a));
        assert_eq!(arena[b].r, Some(c));
    }

    #[test]
    fn rotate_right_under_parent_keeps_root() {
        let mut arena = Arena::new();
        let top = arena.alloc(AvlNode::new(100));
        let n = arena.alloc(AvlNode::new(50));
        let nl = arena.alloc(AvlNode::new(25));
        arena[top].l = Some(n);
        arena[n].p = Some(top);
        arena[n].l = Some(nl);
        arena[nl].p = Some(n);

        let root = rotate_right(&mut arena, top, n);
        assert_eq!(root, top);
        assert_eq!(arena[top].l, Some(nl));
        assert_eq!(arena[nl].p, Some(top));
        assert_eq!(arena[nl].r, Some(n));
        assert_eq!(arena[n].p, Some(nl));
        assert_eq!(arena[n].l, None);
    }

    #[test]
    fn ascending_inserts_rotate_left() {
        let (arena, root) = build(&[10, 20, 30]);
        let root = root.unwrap();
        assert_eq!(arena[root].k, 20);
        assert_eq!(arena[root].h, 2);
        assert_eq!(key_of(&arena, arena[root].l), Some(10));
        assert_eq!(key_of(&arena, arena[root].r), Some(30));
        assert_avl_tree(&arena, Some(root)).unwrap();
    }

    #[test]
    fn zig_zag_inserts_double_rotate() {
        let (arena, root) = build(&[30, 10, 20]);
        assert_eq!(key_of(&arena, root), Some(20));
        assert_avl_tree(&arena, root).unwrap();

        let (arena, root) = build(&[10, 30, 20]);
        assert_eq!(key_of(&arena, root), Some(20));
        assert_avl_tree(&arena, root).unwrap();
    }

    #[test]
    fn remove_two_children_with_deep_successor() {
        let (mut arena, root) = build(&[20, 10, 30, 5, 25, 40, 27]);
        let n = find(&arena, root, &20).unwrap();
        let (root, k) = remove(&mut arena, root.unwrap(), n);
        assert_eq!(k, 20);
        assert_eq!(key_of(&arena, root), Some(25));
        assert_eq!(find(&arena, root, &20), None);
        assert_avl_tree(&arena, root).unwrap();
    }

    #[test]
    fn remove_can_rotate_at_several_levels() {
        // Fibonacci-shaped tree: removing the shallowest leaf forces two rotations.
        let keys = [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1];
        let (mut arena, root) = build(&keys);
        assert_avl_tree(&arena, root).unwrap();
        let n = find(&arena, root, &12).unwrap();
        let (root, _) = remove(&mut arena, root.unwrap(), n);
        assert_avl_tree(&arena, root).unwrap();
        assert_eq!(arena.len(), keys.len() - 1);
        // 11 rotates under 10, then 8 rotates under 5.
        assert_eq!(key_of(&arena, root), Some(5));
        let r = arena[root.unwrap()].r;
        assert_eq!(key_of(&arena, r), Some(8));
        assert_eq!(key_of(&arena, arena[r.unwrap()].r), Some(10));
        assert_eq!(arena[root.unwrap()].h, 4);
    }

    #[test]
    fn remove_last_node_empties_tree() {
        let (mut arena, root) = build(&[5]);
        let n = find(&arena, root, &5).unwrap();
        let (root, k) = remove(&mut arena, root.unwrap(), n);
        assert_eq!(k, 5);
        assert_eq!(root, None);
        assert!(arena.is_empty());
    }

    #[test]
    fn next_walks_in_order() {
        let (arena, root) = build(&[4, 2, 6, 1, 3, 5, 7]);
        let mut out = Vec::new();
        let mut curr = first(&arena, root);
        while let Some(i) = curr {
            out.push(arena[i].k);
            curr = next(&arena, i);
        }
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(key_of(&arena, last(&arena, root)), Some(7));
    }

    #[test]
    fn validator_flags_stale_height() {
        let (mut arena, root) = build(&[2, 1, 3]);
        arena[root.unwrap()].h = 5;
        assert!(assert_avl_tree(&arena, root).is_err());
    }
}
