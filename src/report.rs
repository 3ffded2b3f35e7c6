//! Text renderings of a word list: the numbered listing and the summary
//! statistics block.

use std::fmt;

use crate::{Result, WordList};

/// Numbered, ascending listing of a word list, one `"{n}. {word} {count}"`
/// line per word. Returned by [`WordList::listing`].
#[derive(Clone, Copy)]
pub struct WordListing<'a> {
    list: &'a WordList,
}

impl fmt::Display for WordListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (word, count)) in self.list.iter().enumerate() {
            writeln!(f, "{}. {} {}", i + 1, word, count)?;
        }
        Ok(())
    }
}

/// Snapshot of the aggregate queries of a non-empty word list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statistics {
    pub different_words: usize,
    pub total_words: usize,
    pub most_frequent: (String, usize),
    pub singletons: usize,
}

impl Statistics {
    /// Share of distinct words that are singletons, in percent.
    pub fn singleton_percentage(&self) -> f64 {
        if self.different_words == 0 {
            return 0.0;
        }
        100.0 * self.singletons as f64 / self.different_words as f64
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (word, count) = &self.most_frequent;
        writeln!(f, "Number of different words: {}", self.different_words)?;
        writeln!(f, "    Total number of words: {}", self.total_words)?;
        writeln!(f, "       Most frequent word: {} {}", word, count)?;
        writeln!(
            f,
            "     Number of singletons: {} ({:.0}%)",
            self.singletons,
            self.singleton_percentage()
        )
    }
}

impl WordList {
    pub fn listing(&self) -> WordListing<'_> {
        WordListing { list: self }
    }

    /// Collects the four aggregate queries.
    ///
    /// Fails with [`EmptyCollection`](crate::WordListError::EmptyCollection)
    /// on an empty list, since there is no most frequent word to report.
    pub fn statistics(&self) -> Result<Statistics> {
        let (word, count) = self.most_frequent()?;
        Ok(Statistics {
            different_words: self.different_words(),
            total_words: self.total_words(),
            most_frequent: (word.to_owned(), count),
            singletons: self.singletons(),
        })
    }
}
