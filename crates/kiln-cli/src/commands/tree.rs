//! Handler for `kiln tree`.

use miette::Result;

use kiln_ops::ops_tree::{self, TreeOptions};

pub fn exec(
    depth: Option<usize>,
    why: Option<String>,
    inverted: Option<String>,
    registry: Option<&str>,
) -> Result<()> {
    let project_root = super::project_root()?;
    let opts = TreeOptions {
        depth,
        why,
        inverted,
        registry: registry.map(str::to_string),
    };
    ops_tree::tree(&project_root, &opts)
}
