use serde::Serialize;

use crate::remote::collection::CollectionQuery;
use crate::remote::error::Result;
use crate::remote::session::Session;

// ---------------------------------------------------------------------------
// Bloom detection over a lazy collection handle
// ---------------------------------------------------------------------------

/// One server-side bloom frame: frame `curr` masked to the pixels whose
/// selected band rose by strictly more than `min_delta` relative to frame
/// `prev`. The masked frame keeps `curr`'s timestamp tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BloomFrame {
    pub prev: usize,
    pub curr: usize,
    /// Strict lower bound on the rise; a rise equal to this value is not a
    /// bloom.
    #[serde(rename = "gt")]
    pub min_delta: i32,
}

/// A derived lazy collection: one masked frame per consecutive pair of the
/// source collection. Like the query it wraps, this is a local description;
/// the service only evaluates it when a render takes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BloomCollection {
    pub query: CollectionQuery,
    pub frames: Vec<BloomFrame>,
    /// Frame count of the source collection the pairs were built from.
    pub source_len: usize,
}

impl BloomCollection {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// The pairwise specs for a source collection of `size` frames: one per
/// consecutive pair, so `size` 0 or 1 yields none.
pub fn pairwise_frames(size: usize, min_delta: i32) -> Vec<BloomFrame> {
    (1..size)
        .map(|i| BloomFrame {
            prev: i - 1,
            curr: i,
            min_delta,
        })
        .collect()
}

/// Flag frames whose index rose sharply against the previous frame.
///
/// Fetches the collection length (the single blocking round trip of this
/// stage), then builds one masked-difference spec per consecutive pair. The
/// specs stay local until a render materializes them.
pub fn detect_blooming(
    session: &Session,
    query: &CollectionQuery,
    min_delta: i32,
) -> Result<BloomCollection> {
    let size = session.collection_size(query)?;
    log::debug!("collection has {size} frames");
    Ok(BloomCollection {
        query: query.clone(),
        frames: pairwise_frames(size, min_delta),
        source_len: size,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::IndexScale;

    #[test]
    fn n_frames_give_n_minus_one_pairs() {
        let frames = pairwise_frames(5, IndexScale::BLOOM_DELTA);
        assert_eq!(frames.len(), 4);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.prev, i);
            assert_eq!(frame.curr, i + 1);
        }
    }

    #[test]
    fn short_collections_give_no_pairs() {
        assert!(pairwise_frames(0, IndexScale::BLOOM_DELTA).is_empty());
        assert!(pairwise_frames(1, IndexScale::BLOOM_DELTA).is_empty());
    }

    #[test]
    fn threshold_is_a_strict_lower_bound_on_the_wire() {
        // the service contract names the field "gt": rises equal to the
        // threshold are excluded
        let frame = &pairwise_frames(2, IndexScale::BLOOM_DELTA)[0];
        let json = serde_json::to_value(frame).unwrap();
        assert_eq!(json["gt"], 400);
        assert!(json.get("min_delta").is_none());
    }
}
