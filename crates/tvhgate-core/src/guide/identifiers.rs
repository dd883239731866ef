//! Backend channel id to device channel number mapping.

use std::collections::HashMap;

use super::GuideWarning;

/// Maps backend channel ids to device channel numbers for one transformation.
///
/// Built fresh on each run so no state leaks between refresh cycles.
#[derive(Debug, Default)]
pub struct ChannelIdentifierMap {
    by_id: HashMap<String, String>,
    owner_by_number: HashMap<String, String>,
}

impl ChannelIdentifierMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that backend channel `id` is shown as `number`.
    ///
    /// Returns a warning (and logs it) when another id already claimed the
    /// same number; both ids keep resolving to that number. When `id` itself
    /// was already recorded under a different number, the first number stays
    /// its resolution and the later number is only marked as present.
    pub fn record(&mut self, id: &str, number: &str) -> Option<GuideWarning> {
        if let Some(first) = self.by_id.get(id) {
            if first == number {
                return None;
            }
            tracing::warn!(
                id,
                first_number = %first,
                later_number = number,
                "Channel id listed twice, keeping first number"
            );
            let warning = GuideWarning::DuplicateChannelId {
                id: String::from(id),
                first_number: first.clone(),
                later_number: String::from(number),
            };
            self.owner_by_number
                .entry(String::from(number))
                .or_insert_with(|| String::from(id));
            return Some(warning);
        }
        self.by_id.insert(String::from(id), String::from(number));

        if let Some(owner) = self.owner_by_number.get(number) {
            if owner == id {
                return None;
            }
            tracing::warn!(
                number,
                first_id = %owner,
                duplicate_id = id,
                "Duplicate channel number in guide"
            );
            return Some(GuideWarning::DuplicateChannelNumber {
                number: String::from(number),
                first_id: owner.clone(),
                duplicate_id: String::from(id),
            });
        }

        self.owner_by_number
            .insert(String::from(number), String::from(id));
        None
    }

    /// Device number for a backend channel id.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    /// Whether any channel has been recorded under `number`.
    #[must_use]
    pub fn contains_number(&self, number: &str) -> bool {
        self.owner_by_number.contains_key(number)
    }

    /// Number of distinct backend ids recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
