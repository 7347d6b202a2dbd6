use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::data::model::VegIndex;
use crate::remote::collection::CollectionQuery;
use crate::remote::session::Session;

// ---------------------------------------------------------------------------
// Timelapse export
// ---------------------------------------------------------------------------

/// Frame rate of the exported animation.
pub const TIMELAPSE_FPS: u8 = 4;

/// A completed export: the written file plus the bytes the UI displays.
pub struct TimelapseExport {
    pub path: PathBuf,
    /// egui image URI; unique per output path so the loader cache stays
    /// coherent across re-exports.
    pub uri: String,
    pub bytes: Arc<[u8]>,
}

/// Output file name in the working directory. Re-exports overwrite.
pub fn timelapse_filename(index: VegIndex) -> String {
    format!("{}_timelapse.gif", index.band_name())
}

/// Request a rendered animation for the full collection and write it next to
/// the binary, returning the bytes for display.
pub fn export_timelapse(
    session: &Session,
    query: &CollectionQuery,
    index: VegIndex,
) -> Result<TimelapseExport> {
    let bytes = session
        .render_timelapse(query, TIMELAPSE_FPS)
        .context("requesting timelapse render")?;

    let path = PathBuf::from(timelapse_filename(index));
    std::fs::write(&path, &bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote timelapse {} ({} bytes)", path.display(), bytes.len());

    Ok(TimelapseExport {
        uri: format!("bytes://{}", path.display()),
        path,
        bytes: Arc::from(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_follows_the_index() {
        assert_eq!(timelapse_filename(VegIndex::Ndvi), "NDVI_timelapse.gif");
        assert_eq!(timelapse_filename(VegIndex::Evi), "EVI_timelapse.gif");
    }
}
