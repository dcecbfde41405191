/* --------------------------------------------------------------------- */
/*  Participant pool file                                                */
/* --------------------------------------------------------------------- */

use std::{fs, path::Path};

use anyhow::{Context, Result};
use itertools::repeat_n;
use log::info;

use crate::owners::EntriesByOwner;

/// One address per unit owned, owners in mapping order.
///
/// Fails before allocating if the total overflows or exceeds the pool limit.
pub fn expand(entries: &EntriesByOwner) -> Result<Vec<&str>> {
    let total = entries.checked_total()?;
    let mut pool = Vec::with_capacity(total as usize);
    for (owner, count) in entries.iter() {
        pool.extend(repeat_n(owner, count as usize));
    }
    Ok(pool)
}

/// Newline-joined pool, no trailing newline.
pub fn render(entries: &EntriesByOwner) -> Result<String> {
    Ok(expand(entries)?.join("\n"))
}

/// Replace whatever is at `path` with `contents`.
///
/// Blocking; a failure is returned to the caller.
pub fn write_pool<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    fs::write(&path, contents)
        .with_context(|| format!("writing participant pool to {:?}", path.as_ref()))?;
    info!(
        "[POOL] wrote {} bytes to {}",
        contents.len(),
        path.as_ref().display()
    );
    Ok(())
}
