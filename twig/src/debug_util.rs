//! Debugging utilities

/// A node of a tree, flattened to text for dumping.
#[derive(Clone, Debug)]
pub(crate) struct DebugTreeNode {
    pub label: String,
    pub children: Vec<DebugTreeNode>,
}

pub(crate) fn dump_tree_rec(
    node: &DebugTreeNode,
    indent: usize,
    lines: &mut Vec<usize>,
    is_last: bool,
    out: &mut String,
) {
    let mut pad = vec![' '; indent];
    for &p in lines.iter() {
        pad[p] = '│';
    }

    out.extend(pad);
    out.push(if is_last { '└' } else { '├' });
    out.push_str(&node.label);
    out.push('\n');

    if !is_last {
        lines.push(indent);
    }

    let n = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        dump_tree_rec(child, indent + 2, lines, i == n - 1, out);
    }

    if !is_last {
        lines.pop();
    }
}

/// Draws a tree with box-drawing characters, one node per line.
pub(crate) fn dump_tree(root: &DebugTreeNode) -> String {
    let mut out = String::new();
    dump_tree_rec(root, 0, &mut Vec::new(), true, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str) -> DebugTreeNode {
        DebugTreeNode {
            label: label.to_string(),
            children: vec![],
        }
    }

    #[test]
    fn draws_branches() {
        let tree = DebugTreeNode {
            label: "root".into(),
            children: vec![
                DebugTreeNode {
                    label: "a".into(),
                    children: vec![leaf("a1")],
                },
                leaf("b"),
            ],
        };
        assert_eq!(dump_tree(&tree), "└root\n  ├a\n  │ └a1\n  └b\n");
    }
}
