//! Diagnostic dumps. Neither format is meant to be parsed back.

use std::fmt::{Display, Write};

use crate::arena::Arena;

/// Renders one child branch given the indentation it should continue with.
pub type PrintChild<'a> = dyn Fn(&str) -> String + 'a;

/// Joins child renderings under a parent line using box-drawing branches.
pub fn print_tree(tab: &str, children: &[Option<&PrintChild>]) -> String {
    let mut out = String::new();

    let Some(last) = children.iter().rposition(Option::is_some) else {
        return out;
    };

    for (i, child_opt) in children.iter().enumerate().take(last + 1) {
        let Some(child_fn) = *child_opt else {
            continue;
        };

        let is_last = i == last;
        let child_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
        let child = child_fn(&child_tab);
        let branch = if child.is_empty() {
            "│"
        } else if is_last {
            "└─"
        } else {
            "├─"
        };

        out.push('\n');
        out.push_str(tab);
        out.push_str(branch);
        if !child.is_empty() {
            out.push(' ');
            out.push_str(&child);
        }
    }

    out
}

/// Pre-order single-line dump, e.g. `20 (height: 2) L 10 (height: 1) U R 30 (height: 1) U U`.
pub fn print_inline<T: Display>(arena: &Arena<T>, root: Option<u32>) -> String {
    fn walk<T: Display>(arena: &Arena<T>, i: u32, out: &mut String) {
        let n = &arena[i];
        let _ = write!(out, "{} (height: {})", n.k, n.h);
        if let Some(l) = n.l {
            out.push_str(" L ");
            walk(arena, l, out);
        }
        if let Some(r) = n.r {
            out.push_str(" R ");
            walk(arena, r, out);
        }
        out.push_str(" U");
    }

    let mut out = String::new();
    if let Some(root) = root {
        walk(arena, root, &mut out);
    }
    out
}

/// Multi-line dump with one node per line. A node with a single child shows
/// the missing side as `∅`.
pub fn print_layout<T: Display>(arena: &Arena<T>, root: Option<u32>, tab: &str) -> String {
    match root {
        None => "∅".to_string(),
        Some(i) => node_layout(arena, i, tab),
    }
}

fn node_layout<T: Display>(arena: &Arena<T>, i: u32, tab: &str) -> String {
    let n = &arena[i];
    let label = format!("{} [h={}]", n.k, n.h);
    if n.is_leaf() {
        return label;
    }
    let left = |tab: &str| side_layout(arena, n.l, "L", tab);
    let right = |tab: &str| side_layout(arena, n.r, "R", tab);
    label + &print_tree(tab, &[Some(&left as &PrintChild), Some(&right as &PrintChild)])
}

fn side_layout<T: Display>(arena: &Arena<T>, child: Option<u32>, tag: &str, tab: &str) -> String {
    match child {
        Some(c) => format!("{tag} {}", node_layout(arena, c, tab)),
        None => format!("{tag} ∅"),
    }
}
