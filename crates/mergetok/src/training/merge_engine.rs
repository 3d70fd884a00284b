//! # Merge Engine
//!
//! The training state machine: ``Running(iteration) -> Done``.
//!
//! Each [`MergeEngine::step`] picks the most frequent adjacent pair, rewrites
//! every word containing it, and updates the pair counts, as one atomic step.
//! Ties on frequency go to the lexicographically smallest
//! ``(first symbol, second symbol)``.

use crate::training::pair_index::{PairIndex, PairIndexOptions, count_pairs};
use crate::training::symbol_word::SymbolWord;
use crate::types::{CountType, Pair, PairCountMap, StringChunkType, Symbol, WordCountMap};
use ahash::{AHashMap, AHashSet};
use core::cmp::{Ordering, Reverse};
use dary_heap::OctonaryHeap;
use serde::{Deserialize, Serialize};

/// How each iteration recounts pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Maintain a pair index and a max-heap, updated by per-word deltas.
    ///
    /// Only words containing the merged pair are touched per iteration.
    #[default]
    Indexed,

    /// Recount every pair and rebuild the whole word table each iteration.
    Rescan,
}

/// A record of one merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    /// 0-based iteration at which the merge happened.
    pub iteration: usize,

    /// The merged pair.
    pub pair: Pair,

    /// The concatenated symbol.
    pub merged: Symbol,

    /// The pair frequency at the time of the merge.
    pub count: u64,
}

/// Training state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    /// More merges may follow.
    Running {
        /// Merges performed so far.
        iteration: usize,
    },

    /// Terminal; either `num_merges` were performed or no pair remains.
    Done {
        /// Merges performed in total.
        iteration: usize,
    },
}

impl MergeState {
    /// The number of merges performed so far.
    pub fn iteration(&self) -> usize {
        match self {
            Self::Running { iteration } | Self::Done { iteration } => *iteration,
        }
    }

    /// Is this the terminal state?
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// Outcome of one [`MergeEngine::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStep {
    /// A pair was merged.
    Merged(MergeRule),

    /// No merge happened; the engine is (now) done.
    Exhausted,
}

/// Heap entry for a pair that could be merged.
///
/// `count` may be stale; it is checked against the live count on pop.
#[derive(Debug, Eq)]
pub struct MergeJob<C: CountType> {
    /// The pair count when this job was pushed.
    pub count: C,

    /// The pair to merge.
    pub pair: Pair,
}

impl<C: CountType> MergeJob<C> {
    /// The job key.
    ///
    /// Max-heap by count; tie-break to ascending pair order (deterministic)
    pub fn heap_key(&self) -> (C, Reverse<&Pair>) {
        (self.count, Reverse(&self.pair))
    }
}

impl<C: CountType> PartialEq for MergeJob<C> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.heap_key() == other.heap_key()
    }
}

impl<C: CountType> PartialOrd for MergeJob<C> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: CountType> Ord for MergeJob<C> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.heap_key().cmp(&other.heap_key())
    }
}

/// Select the best pair of a count table: max count, then smallest pair.
pub fn select_best_pair<C: CountType>(pair_counts: &PairCountMap<C>) -> Option<(&Pair, C)> {
    pair_counts
        .iter()
        .filter(|&(_, &count)| count > C::zero())
        .max_by(|(pa, ca), (pb, cb)| ca.cmp(cb).then_with(|| pb.cmp(pa)))
        .map(|(pair, &count)| (pair, count))
}

/// Rewrite a whole word table by merging `pair` in every word.
///
/// Builds a fresh table; words whose rewritten representations coincide
/// have their counts summed.
pub fn merge_word_counts<K, C>(
    pair: &Pair,
    word_counts: &WordCountMap<K, C>,
) -> WordCountMap<String, C>
where
    K: StringChunkType,
    C: CountType,
{
    let mut merged: WordCountMap<String, C> = AHashMap::with_capacity(word_counts.len());
    for (word, &count) in word_counts {
        let mut w = SymbolWord::from_representation(word.as_ref());
        w.merge_pair_cb(pair, &mut |_, _| {});
        *merged.entry(w.to_representation()).or_default() += count;
    }
    merged
}

fn merged_symbol(pair: &Pair) -> Symbol {
    let mut s = pair.0.clone();
    s.push_str(&pair.1);
    s
}

/// Incremental state: unique words, their counts, a pair index, and a heap.
#[derive(Debug)]
struct IndexedMerger<C: CountType> {
    words: Vec<SymbolWord>,
    counts: Vec<C>,
    pair_counts: PairCountMap<C>,

    /// Superset of the words containing each pair; may hold stale indices.
    pair_to_word_index: AHashMap<Pair, AHashSet<usize>>,

    heap: OctonaryHeap<MergeJob<C>>,
}

impl<C: CountType> IndexedMerger<C> {
    fn new<K: StringChunkType>(
        word_counts: &WordCountMap<K, C>,
        parallel: bool,
    ) -> Self {
        let mut table: AHashMap<SymbolWord, C> = AHashMap::with_capacity(word_counts.len());
        for (word, &count) in word_counts {
            *table
                .entry(SymbolWord::from_representation(word.as_ref()))
                .or_default() += count;
        }
        let (words, counts): (Vec<SymbolWord>, Vec<C>) = table.into_iter().unzip();

        log::debug!("Building pair index over {} unique words", words.len());
        let PairIndex {
            pair_counts,
            pair_to_word_index,
        } = PairIndex::index_unique_word_counts_table(
            &words,
            &counts,
            PairIndexOptions::default().with_parallel(parallel),
        );

        log::debug!("Building heap with {} unique pairs", pair_counts.len());
        let mut heap = OctonaryHeap::with_capacity(pair_counts.len());
        for (pair, &count) in &pair_counts {
            heap.push(MergeJob {
                count,
                pair: pair.clone(),
            });
        }

        Self {
            words,
            counts,
            pair_counts,
            pair_to_word_index,
            heap,
        }
    }

    fn live_count(
        &self,
        pair: &Pair,
    ) -> C {
        self.pair_counts.get(pair).copied().unwrap_or_else(C::zero)
    }

    fn pop_best(&mut self) -> Option<(Pair, C)> {
        while let Some(mut job) = self.heap.pop() {
            // Lazy refresh the job count.
            let current = self.live_count(&job.pair);
            if job.count != current {
                job.count = current;
                if current > C::zero() {
                    self.heap.push(job);
                }
                continue;
            }
            if current == C::zero() {
                continue;
            }
            return Some((job.pair, current));
        }
        None
    }

    fn apply(
        &mut self,
        pair: &Pair,
    ) {
        let word_indices = self.pair_to_word_index.remove(pair).unwrap_or_default();

        let mut touched: AHashSet<Pair> = AHashSet::new();
        for word_idx in word_indices {
            let count = self.counts[word_idx];
            let pair_counts = &mut self.pair_counts;
            let pair_to_word_index = &mut self.pair_to_word_index;

            self.words[word_idx].merge_pair_cb(pair, &mut |p, delta| {
                if delta < 0 {
                    if let Some(c) = pair_counts.get_mut(&p) {
                        *c -= count;
                        if *c == C::zero() {
                            pair_counts.remove(&p);
                        }
                    }
                } else {
                    *pair_counts.entry(p.clone()).or_default() += count;
                    pair_to_word_index
                        .entry(p.clone())
                        .or_default()
                        .insert(word_idx);
                    touched.insert(p);
                }
            });
        }

        // Fresh counts for every pair that grew; shrunk pairs refresh lazily.
        for p in touched {
            let count = self.live_count(&p);
            if count > C::zero() {
                self.heap.push(MergeJob { count, pair: p });
            }
        }
    }

    fn into_word_counts(self) -> WordCountMap<String, C> {
        let mut table: WordCountMap<String, C> = AHashMap::with_capacity(self.words.len());
        for (word, count) in self.words.into_iter().zip(self.counts) {
            *table.entry(word.to_representation()).or_default() += count;
        }
        table
    }
}

#[derive(Debug)]
enum Merger<C: CountType> {
    Indexed(IndexedMerger<C>),
    Rescan(WordCountMap<String, C>),
}

/// Runs BPE merges over a word frequency table.
#[derive(Debug)]
pub struct MergeEngine<C: CountType = u64> {
    num_merges: usize,
    state: MergeState,
    merges: Vec<MergeRule>,
    merger: Merger<C>,
}

impl<C: CountType> MergeEngine<C> {
    /// Create an engine over a ``{word representation -> count}`` table.
    ///
    /// # Arguments
    /// * `word_counts` - the initial word frequency table.
    /// * `num_merges` - the ceiling on merge iterations.
    /// * `strategy` - how pairs are recounted.
    /// * `parallel` - whether to build the initial index with `rayon`.
    pub fn new<K: StringChunkType>(
        word_counts: &WordCountMap<K, C>,
        num_merges: usize,
        strategy: MergeStrategy,
        parallel: bool,
    ) -> Self {
        let merger = match strategy {
            MergeStrategy::Indexed => Merger::Indexed(IndexedMerger::new(word_counts, parallel)),
            MergeStrategy::Rescan => Merger::Rescan(
                word_counts
                    .iter()
                    .fold(AHashMap::default(), |mut acc, (k, &c)| {
                        let repr = SymbolWord::from_representation(k.as_ref()).to_representation();
                        *acc.entry(repr).or_default() += c;
                        acc
                    }),
            ),
        };

        let state = if num_merges == 0 {
            MergeState::Done { iteration: 0 }
        } else {
            MergeState::Running { iteration: 0 }
        };

        Self {
            num_merges,
            state,
            merges: Vec::with_capacity(num_merges.min(1 << 16)),
            merger,
        }
    }

    /// The current state.
    pub fn state(&self) -> MergeState {
        self.state
    }

    /// The configured merge ceiling.
    pub fn num_merges(&self) -> usize {
        self.num_merges
    }

    /// The merges performed so far, in order.
    pub fn merges(&self) -> &[MergeRule] {
        &self.merges
    }

    /// Perform one merge iteration.
    pub fn step(&mut self) -> MergeStep {
        let MergeState::Running { iteration } = self.state else {
            return MergeStep::Exhausted;
        };

        let best = match &mut self.merger {
            Merger::Indexed(m) => {
                let best = m.pop_best();
                if let Some((pair, _)) = &best {
                    m.apply(pair);
                }
                best
            }
            Merger::Rescan(table) => {
                let pair_counts = count_pairs(&*table);
                let best = select_best_pair(&pair_counts).map(|(p, c)| (p.clone(), c));
                if let Some((pair, _)) = &best {
                    let rewritten = merge_word_counts(pair, &*table);
                    *table = rewritten;
                }
                best
            }
        };

        let Some((pair, count)) = best else {
            log::debug!("No pairs left after {iteration} merges");
            self.state = MergeState::Done { iteration };
            return MergeStep::Exhausted;
        };

        let rule = MergeRule {
            iteration,
            merged: merged_symbol(&pair),
            pair,
            count: count.to_u64().unwrap_or(u64::MAX),
        };
        self.merges.push(rule.clone());

        let iteration = iteration + 1;
        self.state = if iteration == self.num_merges {
            MergeState::Done { iteration }
        } else {
            MergeState::Running { iteration }
        };

        MergeStep::Merged(rule)
    }

    /// Step until done.
    ///
    /// Logs progress every 1% of `num_merges`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn run(&mut self) -> usize {
        let mut last_log_percent = 0;
        while let MergeStep::Merged(rule) = self.step() {
            let merges_done = rule.iteration + 1;
            let current_percent = (merges_done * 100) / self.num_merges;
            if current_percent > last_log_percent {
                log::info!(
                    "Progress: {}% ({}/{} merges) - Last merge: {:?} + {:?} -> {:?} (frequency: {})",
                    current_percent,
                    merges_done,
                    self.num_merges,
                    rule.pair.0,
                    rule.pair.1,
                    rule.merged,
                    rule.count
                );
                last_log_percent = current_percent;
            }
        }
        self.state.iteration()
    }

    /// Consume the engine, returning the final word frequency table.
    pub fn finish(self) -> (WordCountMap<String, C>, Vec<MergeRule>) {
        let table = match self.merger {
            Merger::Indexed(m) => m.into_word_counts(),
            Merger::Rescan(table) => table,
        };
        (table, self.merges)
    }
}
