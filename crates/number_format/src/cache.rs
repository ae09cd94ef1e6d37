use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::{NumberFormatOptions, NumberFormatter};

static GLOBAL: LazyLock<NumberFormatCache> = LazyLock::new(NumberFormatCache::new);

/// Memoizes formatters by locale and options.
///
/// Entries are never evicted. Each formatter is immutable, so lookups only
/// take the read lock; the write lock is held just long enough to insert a
/// missing entry.
#[derive(Debug, Default)]
pub struct NumberFormatCache {
    formatters: RwLock<IndexMap<String, Arc<NumberFormatter>>>,
}

impl NumberFormatCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by [`crate::format_number`] and [`crate::parse_number`].
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the formatter for `locale` and `options`, building it on first use.
    pub fn get_formatter(
        &self,
        locale: &str,
        options: &NumberFormatOptions,
    ) -> Arc<NumberFormatter> {
        let key = format!("{locale}:{}", options.cache_key());

        if let Some(formatter) = self.formatters.read().get(&key) {
            return formatter.clone();
        }

        let mut formatters = self.formatters.write();
        formatters
            .entry(key)
            .or_insert_with(|| {
                log::trace!("caching number formatter for {locale}");
                Arc::new(NumberFormatter::new(locale, options.clone()))
            })
            .clone()
    }

    /// Number of distinct formatters built so far.
    pub fn len(&self) -> usize {
        self.formatters.read().len()
    }

    /// Whether no formatter has been built yet.
    pub fn is_empty(&self) -> bool {
        self.formatters.read().is_empty()
    }
}
