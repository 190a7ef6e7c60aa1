// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Builds the ordered card sequence for a study session from a pool of due
//! cards and a pool of never-studied cards.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::settings::DeckSettings;
use crate::settings::NewCardOrder;
use crate::settings::NewReviewMix;
use crate::settings::ReviewSort;
use crate::types::review_log::DailyCounts;
use crate::types::timestamp::Timestamp;

/// Anything that can be queued for study.
pub trait QueueCard {
    fn due(&self) -> Timestamp;

    /// A card is due from its due instant onward.
    fn is_due(&self, now: Timestamp) -> bool {
        self.due() <= now
    }
}

/// A card in the session, tagged with the pool it came from.
#[derive(Clone, PartialEq, Debug)]
pub enum StudyItem<C> {
    Review(C),
    New(C),
}

impl<C> StudyItem<C> {
    pub fn card(&self) -> &C {
        match self {
            StudyItem::Review(card) | StudyItem::New(card) => card,
        }
    }

    pub fn into_card(self) -> C {
        match self {
            StudyItem::Review(card) | StudyItem::New(card) => card,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, StudyItem::New(_))
    }
}

/// Order and cap both pools, then combine them.
///
/// `new` must already exclude suspended cards, and should be in creation
/// order: `sequential` keeps it as given.
pub fn build_queue<C, R>(
    mut due: Vec<C>,
    mut new: Vec<C>,
    counts: DailyCounts,
    settings: &DeckSettings,
    rng: &mut R,
) -> Vec<StudyItem<C>>
where
    C: QueueCard,
    R: Rng + ?Sized,
{
    sort_due(&mut due, settings.review_sort, rng);
    if settings.max_reviews_per_day > 0 {
        let remaining = settings
            .max_reviews_per_day
            .saturating_sub(counts.reviews_today) as usize;
        if due.len() > remaining {
            log::debug!(
                "Review cap reached: keeping {remaining} of {} due cards.",
                due.len()
            );
            due.truncate(remaining);
        }
    }

    if settings.new_card_order == NewCardOrder::Random {
        new.shuffle(rng);
    }
    let quota = settings
        .new_cards_per_day
        .saturating_sub(counts.new_cards_today) as usize;
    if new.len() > quota {
        log::debug!(
            "New card cap reached: keeping {quota} of {} new cards.",
            new.len()
        );
        new.truncate(quota);
    }

    let review = due.into_iter().map(StudyItem::Review);
    let new_items = new.into_iter().map(StudyItem::New);
    match settings.new_review_mix {
        NewReviewMix::ReviewFirst => review.chain(new_items).collect(),
        NewReviewMix::NewFirst => new_items.chain(review).collect(),
        NewReviewMix::Mix => interleave(review.collect(), new_items.collect()),
    }
}

fn sort_due<C: QueueCard, R: Rng + ?Sized>(due: &mut [C], sort: ReviewSort, rng: &mut R) {
    match sort {
        ReviewSort::DueDate => due.sort_by_key(|card| card.due()),
        ReviewSort::Random => due.shuffle(rng),
        ReviewSort::DueDateRandom => {
            due.sort_by_key(|card| card.due());
            for day in due.chunk_by_mut(|a, b| a.due().local_date() == b.due().local_date()) {
                day.shuffle(rng);
            }
        }
    }
}

/// Spread new cards evenly: at position `i` of `T`, emit a new card while
/// fewer than `round((i + 1) * |new| / T)` have gone out.
fn interleave<C>(review: Vec<StudyItem<C>>, new: Vec<StudyItem<C>>) -> Vec<StudyItem<C>> {
    let total = review.len() + new.len();
    let mut out = Vec::with_capacity(total);
    if total == 0 {
        return out;
    }
    let new_total = new.len();
    let mut review = review.into_iter();
    let mut new = new.into_iter();
    let mut emitted_new = 0;
    for i in 0..total {
        let expected = ((i + 1) as f64 * new_total as f64 / total as f64).round() as usize;
        if emitted_new < expected {
            if let Some(item) = new.next() {
                emitted_new += 1;
                out.push(item);
                continue;
            }
        }
        match review.next() {
            Some(item) => out.push(item),
            None => {
                if let Some(item) = new.next() {
                    emitted_new += 1;
                    out.push(item);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::error::Fallible;

    #[derive(Clone, PartialEq, Debug)]
    struct TestCard {
        id: u32,
        due: Timestamp,
    }

    impl QueueCard for TestCard {
        fn due(&self) -> Timestamp {
            self.due
        }
    }

    fn base() -> Fallible<Timestamp> {
        Timestamp::parse("2025-03-01T12:00:00Z")
    }

    #[test]
    fn test_is_due_includes_the_due_instant() -> Fallible<()> {
        let now = base()?;
        let card = TestCard { id: 0, due: now };
        assert!(card.is_due(now));
        let later = TestCard {
            id: 1,
            due: now.plus_minutes(1),
        };
        assert!(!later.is_due(now));
        assert!(later.is_due(now.plus_minutes(1)));
        Ok(())
    }

    /// Due cards with ids `0..n`, each due one hour earlier than the last.
    fn due_pool(n: u32) -> Fallible<Vec<TestCard>> {
        let base = base()?;
        Ok((0..n)
            .map(|id| TestCard {
                id,
                due: base.plus_minutes(60 * (n - id)),
            })
            .collect())
    }

    /// New cards with ids starting at 1000.
    fn new_pool(n: u32) -> Fallible<Vec<TestCard>> {
        let base = base()?;
        Ok((0..n).map(|i| TestCard { id: 1000 + i, due: base }).collect())
    }

    fn ids(queue: &[StudyItem<TestCard>]) -> Vec<u32> {
        queue.iter().map(|item| item.card().id).collect()
    }

    fn unlimited() -> DeckSettings {
        DeckSettings {
            new_cards_per_day: 100,
            max_reviews_per_day: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_pools() {
        let mut rng = StdRng::seed_from_u64(7);
        for mix in [
            NewReviewMix::ReviewFirst,
            NewReviewMix::NewFirst,
            NewReviewMix::Mix,
        ] {
            let settings = DeckSettings {
                new_review_mix: mix,
                ..Default::default()
            };
            let queue: Vec<StudyItem<TestCard>> =
                build_queue(vec![], vec![], DailyCounts::default(), &settings, &mut rng);
            assert!(queue.is_empty());
        }
    }

    #[test]
    fn test_due_date_sort() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let queue = build_queue(
            due_pool(4)?,
            vec![],
            DailyCounts::default(),
            &unlimited(),
            &mut rng,
        );
        assert_eq!(ids(&queue), vec![3, 2, 1, 0]);
        Ok(())
    }

    #[test]
    fn test_random_sort_is_a_permutation() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let settings = DeckSettings {
            review_sort: ReviewSort::Random,
            ..unlimited()
        };
        let queue = build_queue(due_pool(20)?, vec![], DailyCounts::default(), &settings, &mut rng);
        let mut got = ids(&queue);
        got.sort();
        assert_eq!(got, (0..20).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn test_due_date_random_keeps_day_order() -> Fallible<()> {
        let base = base()?;
        let mut due = Vec::new();
        for day in 0..3u32 {
            for i in 0..5u32 {
                due.push(TestCard {
                    id: day * 10 + i,
                    due: base.plus_days(day).plus_minutes(i),
                });
            }
        }
        due.reverse();
        let mut rng = StdRng::seed_from_u64(11);
        let settings = DeckSettings {
            review_sort: ReviewSort::DueDateRandom,
            ..unlimited()
        };
        let queue = build_queue(due, vec![], DailyCounts::default(), &settings, &mut rng);
        let days: Vec<u32> = ids(&queue).iter().map(|id| id / 10).collect();
        assert_eq!(days, vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2]);
        Ok(())
    }

    #[test]
    fn test_review_cap() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let settings = DeckSettings {
            max_reviews_per_day: 5,
            ..unlimited()
        };
        let counts = DailyCounts {
            reviews_today: 2,
            ..Default::default()
        };
        let queue = build_queue(due_pool(10)?, vec![], counts, &settings, &mut rng);
        assert_eq!(queue.len(), 3);

        let counts = DailyCounts {
            reviews_today: 9,
            ..Default::default()
        };
        let queue = build_queue(due_pool(10)?, vec![], counts, &settings, &mut rng);
        assert!(queue.is_empty());
        Ok(())
    }

    #[test]
    fn test_zero_review_cap_is_unlimited() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let counts = DailyCounts {
            reviews_today: 500,
            ..Default::default()
        };
        let queue = build_queue(due_pool(10)?, vec![], counts, &unlimited(), &mut rng);
        assert_eq!(queue.len(), 10);
        Ok(())
    }

    #[test]
    fn test_new_card_quota() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let settings = DeckSettings {
            new_cards_per_day: 5,
            ..unlimited()
        };
        let counts = DailyCounts {
            new_cards_today: 3,
            ..Default::default()
        };
        let queue = build_queue(vec![], new_pool(10)?, counts, &settings, &mut rng);
        assert_eq!(ids(&queue), vec![1000, 1001]);

        let counts = DailyCounts {
            new_cards_today: 8,
            ..Default::default()
        };
        let queue = build_queue(vec![], new_pool(10)?, counts, &settings, &mut rng);
        assert!(queue.is_empty());
        Ok(())
    }

    #[test]
    fn test_review_first_and_new_first() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let queue = build_queue(
            due_pool(2)?,
            new_pool(2)?,
            DailyCounts::default(),
            &unlimited(),
            &mut rng,
        );
        assert_eq!(ids(&queue), vec![1, 0, 1000, 1001]);

        let settings = DeckSettings {
            new_review_mix: NewReviewMix::NewFirst,
            ..unlimited()
        };
        let queue = build_queue(
            due_pool(2)?,
            new_pool(2)?,
            DailyCounts::default(),
            &settings,
            &mut rng,
        );
        assert_eq!(ids(&queue), vec![1000, 1001, 1, 0]);
        Ok(())
    }

    #[test]
    fn test_mix_spreads_new_cards() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let settings = DeckSettings {
            new_review_mix: NewReviewMix::Mix,
            ..unlimited()
        };
        let queue = build_queue(
            due_pool(8)?,
            new_pool(2)?,
            DailyCounts::default(),
            &settings,
            &mut rng,
        );
        let pattern: Vec<bool> = queue.iter().map(|item| item.is_new()).collect();
        assert_eq!(
            pattern,
            vec![false, false, true, false, false, false, false, true, false, false]
        );
        Ok(())
    }

    #[test]
    fn test_mix_with_only_new_cards() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let settings = DeckSettings {
            new_review_mix: NewReviewMix::Mix,
            ..unlimited()
        };
        let queue = build_queue(vec![], new_pool(3)?, DailyCounts::default(), &settings, &mut rng);
        assert_eq!(ids(&queue), vec![1000, 1001, 1002]);
        Ok(())
    }

    #[test]
    fn test_queue_is_a_partition() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(3);
        for mix in [
            NewReviewMix::ReviewFirst,
            NewReviewMix::NewFirst,
            NewReviewMix::Mix,
        ] {
            for (d, n) in [(0, 5), (5, 0), (7, 3), (1, 9), (13, 13)] {
                let settings = DeckSettings {
                    new_review_mix: mix,
                    review_sort: ReviewSort::Random,
                    new_card_order: NewCardOrder::Random,
                    ..unlimited()
                };
                let queue = build_queue(
                    due_pool(d)?,
                    new_pool(n)?,
                    DailyCounts::default(),
                    &settings,
                    &mut rng,
                );
                assert_eq!(queue.len(), (d + n) as usize);
                let unique: HashSet<u32> = ids(&queue).into_iter().collect();
                assert_eq!(unique.len(), queue.len());
                for item in &queue {
                    let id = item.card().id;
                    assert_eq!(item.is_new(), id >= 1000);
                }
            }
        }
        Ok(())
    }
}
