//! The diagnostic check suite -- one module per service area.
//!
//! Every check provisions its own remote resources, exercises one slice of
//! the sandbox service, and tears its resources down best-effort, so checks
//! stay independent of each other.

pub mod exec;
pub mod files;
pub mod lifecycle;
pub mod lsp;
pub mod snapshots;
pub mod volumes;

use crate::suite::Check;

/// All checks, in suite run order.
pub fn registry() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(lifecycle::LifecycleCheck),
        Box::new(exec::ExecCheck),
        Box::new(files::FileOpsCheck),
        Box::new(volumes::VolumesCheck),
        Box::new(snapshots::SnapshotsCheck),
        Box::new(lsp::LspCheck),
    ]
}

/// Names of all registered checks, for `sandcheck list` and `--only`.
pub fn names() -> Vec<&'static str> {
    registry().iter().map(|c| c.name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_names_unique() {
        let names = names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert!(names.contains(&"sandbox-lifecycle"));
    }
}
