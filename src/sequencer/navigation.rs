/*!
 * Cursor arithmetic over the catalog.
 *
 * Navigation is circular. Parts without words are stepped over; a catalog with
 * no words at all has no valid position and every move is a no-op.
 */

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Cursor into the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackPosition {
    pub part_index: usize,
    pub word_index: usize,
}

impl PlaybackPosition {
    pub fn new(part_index: usize, word_index: usize) -> Self {
        Self {
            part_index,
            word_index,
        }
    }

    /// Whether the cursor points at an existing word
    pub fn is_valid(&self, catalog: &Catalog) -> bool {
        self.word_index < catalog.part_len(self.part_index)
    }
}

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Where the cursor lands
    pub position: PlaybackPosition,
    /// True when the step crossed the catalog boundary and wrapped around
    pub wrapped: bool,
}

/// First word of the catalog
pub fn first(catalog: &Catalog) -> Option<PlaybackPosition> {
    (0..catalog.len())
        .find(|&part| catalog.part_len(part) > 0)
        .map(|part| PlaybackPosition::new(part, 0))
}

/// Word after `from`, wrapping past the end of the catalog
pub fn next(catalog: &Catalog, from: PlaybackPosition) -> Option<Step> {
    if from.word_index + 1 < catalog.part_len(from.part_index) {
        return Some(Step {
            position: PlaybackPosition::new(from.part_index, from.word_index + 1),
            wrapped: false,
        });
    }

    let parts = catalog.len();
    for offset in 1..=parts {
        let part = from.part_index + offset;
        let wrapped = part >= parts;
        let part = part % parts;
        if catalog.part_len(part) > 0 {
            return Some(Step {
                position: PlaybackPosition::new(part, 0),
                wrapped,
            });
        }
    }
    None
}

/// Word before `from`, wrapping before the start of the catalog
pub fn previous(catalog: &Catalog, from: PlaybackPosition) -> Option<Step> {
    if from.word_index > 0 && from.word_index <= catalog.part_len(from.part_index) {
        return Some(Step {
            position: PlaybackPosition::new(from.part_index, from.word_index - 1),
            wrapped: false,
        });
    }

    let parts = catalog.len();
    for offset in 1..=parts {
        let wrapped = offset > from.part_index;
        let part = (from.part_index + parts - offset % parts) % parts;
        let len = catalog.part_len(part);
        if len > 0 {
            return Some(Step {
                position: PlaybackPosition::new(part, len - 1),
                wrapped,
            });
        }
    }
    None
}
