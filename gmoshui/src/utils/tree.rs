//! Tree rendering for archive hierarchies

use super::format::format_bytes;
use console::Style;
use gmod_gma::HierarchyNode;

/// Options for tree rendering
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Deepest level to print; the root is depth 0
    pub max_depth: Option<usize>,
    /// Disable colours
    pub no_color: bool,
    /// Append aggregated sizes
    pub show_sizes: bool,
}

/// Render a hierarchy as an indented tree
pub fn render_hierarchy(root: &HierarchyNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &HierarchyNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let (icon, style) = if node.is_root() {
        ("📦", Style::new().bold().cyan())
    } else if node.is_leaf() {
        ("📄", Style::new().green())
    } else {
        ("📁", Style::new().cyan())
    };
    let style = if options.no_color { Style::new() } else { style };

    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    output.push_str(&format!(
        "{prefix}{connector}{icon} {}",
        style.apply_to(&node.name)
    ));
    if options.show_sizes {
        output.push_str(&format!(" ({})", format_bytes(node.size)));
    }
    output.push('\n');

    let child_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{prefix}{}", if is_last { "    " } else { "│   " })
    };

    let count = node.children.len();
    for (i, child) in node.children.values().enumerate() {
        render_node(child, output, &child_prefix, i + 1 == count, depth + 1, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmod_gma::hierarchy;

    fn sample() -> HierarchyNode {
        hierarchy::build_from([("lua/init.lua", 10u64), ("lua/sub/a.lua", 5)])
    }

    #[test]
    fn test_render_hierarchy() {
        let options = TreeOptions {
            no_color: true,
            show_sizes: false,
            ..TreeOptions::default()
        };
        let output = render_hierarchy(&sample(), &options);

        assert_eq!(
            output,
            "📦 GMA File\n\
             └── 📁 lua\n    \
             ├── 📄 init.lua\n    \
             └── 📁 sub\n        \
             └── 📄 a.lua\n"
        );
    }

    #[test]
    fn test_max_depth() {
        let options = TreeOptions {
            max_depth: Some(1),
            no_color: true,
            show_sizes: true,
        };
        let output = render_hierarchy(&sample(), &options);

        assert!(output.contains("lua (15 B)"));
        assert!(!output.contains("init.lua"));
    }
}
