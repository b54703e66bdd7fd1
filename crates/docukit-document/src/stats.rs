// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text statistics — character, word, sentence, and paragraph counts plus a
// reading-time estimate. Pure and total: every string, including the empty
// one, is valid input.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use docukit_core::ToolkitConfig;
use docukit_core::types::SentenceCounting;

/// Runs of sentence terminators.
static RE_TERMINATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// A blank line (only whitespace) separating two paragraphs.
static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

/// Default reading speed.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Counts derived from a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextStatistics {
    pub character_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub reading_time_minutes: usize,
}

/// Tunables for [`compute_statistics_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsOptions {
    pub words_per_minute: u32,
    pub sentence_counting: SentenceCounting,
}

impl Default for StatisticsOptions {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            sentence_counting: SentenceCounting::PerLine,
        }
    }
}

impl StatisticsOptions {
    pub fn from_config(config: &ToolkitConfig) -> Self {
        Self {
            words_per_minute: config.words_per_minute,
            sentence_counting: config.sentence_counting,
        }
    }
}

/// Compute statistics with the default options.
pub fn compute_statistics(text: &str) -> TextStatistics {
    compute_statistics_with(text, &StatisticsOptions::default())
}

/// Compute statistics for `text`.
pub fn compute_statistics_with(text: &str, options: &StatisticsOptions) -> TextStatistics {
    // UTF-16 code units, so astral-plane characters count twice.
    let character_count = text.encode_utf16().count();
    let word_count = count_words(text);
    let reading_time_minutes = word_count.div_ceil(options.words_per_minute.max(1) as usize);

    TextStatistics {
        character_count,
        word_count,
        sentence_count: count_sentences(text, options.sentence_counting),
        paragraph_count: count_paragraphs(text),
        reading_time_minutes,
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn count_paragraphs(text: &str) -> usize {
    RE_PARAGRAPH_BREAK
        .split(text)
        .filter(|group| !group.trim().is_empty())
        .count()
}

fn count_sentences(text: &str, mode: SentenceCounting) -> usize {
    match mode {
        SentenceCounting::TerminatorRuns => RE_TERMINATORS
            .split(text)
            .filter(|fragment| !fragment.trim().is_empty())
            .count(),
        SentenceCounting::PerLine => text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| RE_TERMINATORS.find_iter(line).count().max(1))
            .sum(),
    }
}
