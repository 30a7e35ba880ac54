//! Handler for `kiln lock`.

use miette::Result;

pub fn exec(registry: Option<&str>) -> Result<()> {
    let project_root = super::project_root()?;
    kiln_ops::ops_lock::lock(&project_root, registry)
}
