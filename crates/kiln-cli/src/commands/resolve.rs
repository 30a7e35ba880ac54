//! Handler for `kiln resolve`.

use miette::Result;

use kiln_ops::ops_resolve::{self, OutputFormat, ResolveOptions};

use crate::cli::Format;

pub fn exec(format: Format, registry: Option<&str>) -> Result<()> {
    let project_root = super::project_root()?;
    let opts = ResolveOptions {
        format: match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        },
        registry: registry.map(str::to_string),
    };
    ops_resolve::resolve(&project_root, &opts)
}
