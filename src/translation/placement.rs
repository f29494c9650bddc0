/*!
 * Placeholder placement strategies.
 *
 * Used when a translation lost or duplicated a placeholder and the extract
 * has to be put back somewhere. The proportional strategy guesses a position
 * from the placeholder's relative position in the source; it is approximate
 * and can land a fragment a word or two away from where it belongs.
 */

use std::sync::Arc;

use crate::app_config::PlaceholderPolicy;

/// Chooses where a lost placeholder goes in a translation
pub trait PlaceholderPlacement: Send + Sync {
    /// Byte offset in `translation` for a placeholder found at char offset
    /// `source_offset` of a source text `source_len` chars long; `None`
    /// refuses to guess
    fn place(&self, source_offset: usize, source_len: usize, translation: &str) -> Option<usize>;

    fn name(&self) -> &'static str;
}

/// Map a source char offset proportionally into the translation and snap
/// forward to the start of the next word. Returns a byte offset.
pub fn proportional_offset(source_offset: usize, source_len: usize, translation: &str) -> usize {
    let chars: Vec<(usize, char)> = translation.char_indices().collect();
    let target_len = chars.len();
    if source_len == 0 || target_len == 0 {
        return 0;
    }

    let mut position = (source_offset.min(source_len) * target_len) / source_len;
    while position > 0 && position < target_len {
        let previous = chars[position - 1].1;
        let current = chars[position].1;
        if previous.is_whitespace() && !current.is_whitespace() {
            break;
        }
        position += 1;
    }

    chars.get(position).map(|(byte, _)| *byte).unwrap_or(translation.len())
}

/// Default strategy: proportional position, snapped to a word start
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalPlacement;

impl PlaceholderPlacement for ProportionalPlacement {
    fn place(&self, source_offset: usize, source_len: usize, translation: &str) -> Option<usize> {
        Some(proportional_offset(source_offset, source_len, translation))
    }

    fn name(&self) -> &'static str {
        "proportional"
    }
}

/// Never guesses; the record is reported instead
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictPlacement;

impl PlaceholderPlacement for StrictPlacement {
    fn place(&self, _source_offset: usize, _source_len: usize, _translation: &str) -> Option<usize> {
        None
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

/// Strategy for a configured policy
pub fn placement_for(policy: PlaceholderPolicy) -> Arc<dyn PlaceholderPlacement> {
    match policy {
        PlaceholderPolicy::Proportional => Arc::new(ProportionalPlacement),
        PlaceholderPolicy::Strict => Arc::new(StrictPlacement),
    }
}
