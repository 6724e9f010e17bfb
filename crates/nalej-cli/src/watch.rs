//! Polling loop behind `--watch` and `--follow`.
//!
//! The first fetch is printed in full and becomes the baseline. Every later
//! poll prints only entities that are new or whose watched fields changed,
//! preceded by a blank line. Entities that disappear are not reported.
//! The loop ends only when a fetch or a write fails.

use std::collections::HashMap;
use std::hash::Hash;
use std::io::Write;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, trace};

use crate::error::CliError;

/// Polling period of every watch loop.
pub const WATCH_INTERVAL: Duration = Duration::from_secs(5);

/// An entity tracked across polls.
pub trait Watched {
    /// Identity of the entity.
    type Key: Eq + Hash;

    /// Identity of this entity.
    fn key(&self) -> Self::Key;

    /// Whether `self` differs from `previous` on a watched field.
    fn changed(&self, previous: &Self) -> bool;
}

/// Last seen version of every entity.
#[derive(Debug)]
pub struct Baseline<T: Watched> {
    seen: HashMap<T::Key, T>,
}

impl<T: Watched + Clone> Baseline<T> {
    /// Start from an initial result set.
    #[must_use]
    pub fn seed(items: &[T]) -> Self {
        let seen = items.iter().map(|item| (item.key(), item.clone())).collect();
        Self { seen }
    }

    /// Entities that are new or changed since the last poll, in poll order.
    ///
    /// Every polled entity replaces its baseline entry.
    pub fn diff(&mut self, items: Vec<T>) -> Vec<T> {
        let mut changed = Vec::new();
        for item in items {
            let report = self
                .seen
                .get(&item.key())
                .is_none_or(|previous| item.changed(previous));
            if report {
                changed.push(item.clone());
            }
            self.seen.insert(item.key(), item);
        }
        changed
    }

    /// Forget every entity whose key fails `keep`.
    pub fn retain<F: FnMut(&T::Key) -> bool>(&mut self, mut keep: F) {
        self.seen.retain(|key, _| keep(key));
    }

    /// Number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Something that can be polled for the current result set.
#[allow(async_fn_in_trait)]
pub trait Source {
    /// Entity type.
    type Item: Watched + Clone;

    /// Issue the call once.
    async fn fetch(&mut self) -> Result<Vec<Self::Item>, CliError>;

    /// Whether an entity can still show up in a later fetch. Entities that
    /// cannot are dropped from the baseline after every poll.
    fn keeps(&self, _key: &<Self::Item as Watched>::Key) -> bool {
        true
    }
}

/// Run the loop: print the initial result set, then every change.
///
/// # Errors
///
/// Returns the first fetch or render error. It never returns `Ok`.
pub async fn watch<S, W, F>(
    source: &mut S,
    period: Duration,
    writer: &mut W,
    mut render: F,
) -> Result<(), CliError>
where
    S: Source,
    W: Write,
    F: FnMut(&mut W, Vec<S::Item>) -> Result<(), CliError>,
{
    let initial = source.fetch().await?;
    let mut baseline = Baseline::seed(&initial);
    render(writer, initial)?;
    writer.flush()?;
    debug!(tracked = baseline.len(), period = ?period, "watching for changes");

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let items = source.fetch().await?;
        let changed = baseline.diff(items);
        baseline.retain(|key| source.keeps(key));
        trace!(changed = changed.len(), "poll complete");
        if changed.is_empty() {
            continue;
        }
        writeln!(writer)?;
        render(writer, changed)?;
        writer.flush()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: &'static str,
        status: &'static str,
        heartbeat: u32,
    }

    impl Watched for Item {
        type Key = &'static str;

        fn key(&self) -> Self::Key {
            self.id
        }

        fn changed(&self, previous: &Self) -> bool {
            self.status != previous.status
        }
    }

    fn item(id: &'static str, status: &'static str) -> Item {
        Item {
            id,
            status,
            heartbeat: 0,
        }
    }

    #[test]
    fn diff_reports_new_and_changed() {
        let mut baseline = Baseline::seed(&[item("A", "v1")]);
        let changed = baseline.diff(vec![item("A", "v2"), item("B", "v3")]);
        assert_eq!(changed, vec![item("A", "v2"), item("B", "v3")]);
    }

    #[test]
    fn identical_poll_reports_nothing() {
        let mut baseline = Baseline::seed(&[item("A", "v1"), item("B", "v1")]);
        assert!(baseline.diff(vec![item("A", "v1"), item("B", "v1")]).is_empty());
    }

    #[test]
    fn unwatched_fields_are_ignored_but_stored() {
        let mut baseline = Baseline::seed(&[item("A", "v1")]);
        let mut beat = item("A", "v1");
        beat.heartbeat = 7;
        assert!(baseline.diff(vec![beat]).is_empty());
        assert_eq!(baseline.seen["A"].heartbeat, 7);
    }

    #[test]
    fn deletions_are_not_reported() {
        let mut baseline = Baseline::seed(&[item("A", "v1"), item("B", "v1")]);
        assert!(baseline.diff(vec![item("A", "v1")]).is_empty());
        assert_eq!(baseline.len(), 2);
    }

    #[test]
    fn baseline_is_replaced_after_change() {
        let mut baseline = Baseline::seed(&[item("A", "v1")]);
        assert_eq!(baseline.diff(vec![item("A", "v2")]).len(), 1);
        assert!(baseline.diff(vec![item("A", "v2")]).is_empty());
    }

    struct Scripted(VecDeque<Vec<Item>>);

    impl Source for Scripted {
        type Item = Item;

        async fn fetch(&mut self) -> Result<Vec<Item>, CliError> {
            self.0
                .pop_front()
                .ok_or_else(|| CliError::Connection("done".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn loop_prints_initial_then_changes() {
        let mut source = Scripted(VecDeque::from(vec![
            vec![item("A", "v1")],
            vec![item("A", "v1")],
            vec![item("A", "v2"), item("B", "v1")],
        ]));
        let mut out = Vec::new();
        let result = watch(&mut source, WATCH_INTERVAL, &mut out, |w, items| {
            for i in items {
                writeln!(w, "{} {}", i.id, i.status)?;
            }
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(CliError::Connection(_))));
        assert_eq!(String::from_utf8(out).unwrap(), "A v1\n\nA v2\nB v1\n");
    }

    #[test]
    fn retain_forgets_filtered_keys() {
        let mut baseline = Baseline::seed(&[item("A", "v1"), item("B", "v1")]);
        baseline.retain(|key| *key != "A");
        assert_eq!(baseline.len(), 1);
        assert_eq!(baseline.diff(vec![item("A", "v1")]), vec![item("A", "v1")]);
    }

    /// Source that only ever returns entities after a moving cursor.
    struct Cursor {
        polls: VecDeque<Vec<Item>>,
        floor: &'static str,
    }

    impl Source for Cursor {
        type Item = Item;

        async fn fetch(&mut self) -> Result<Vec<Item>, CliError> {
            let items = self
                .polls
                .pop_front()
                .ok_or_else(|| CliError::Connection("done".into()))?;
            if let Some(last) = items.last() {
                self.floor = last.id;
            }
            Ok(items)
        }

        fn keeps(&self, key: &&'static str) -> bool {
            *key >= self.floor
        }
    }

    #[tokio::test(start_paused = true)]
    async fn loop_prunes_entities_the_source_no_longer_keeps() {
        let mut source = Cursor {
            polls: VecDeque::from(vec![
                vec![item("A", "v1"), item("B", "v1")],
                vec![item("B", "v1"), item("C", "v1")],
                vec![item("A", "v1")],
            ]),
            floor: "",
        };
        let mut out = Vec::new();
        let result = watch(&mut source, WATCH_INTERVAL, &mut out, |w, items| {
            for i in items {
                writeln!(w, "{}", i.id)?;
            }
            Ok(())
        })
        .await;

        assert!(result.is_err());
        // A was forgotten once the cursor passed it, so it counts as new.
        assert_eq!(String::from_utf8(out).unwrap(), "A\nB\n\nC\n\nA\n");
    }

    #[tokio::test(start_paused = true)]
    async fn loop_stops_on_first_error() {
        let mut source = Scripted(VecDeque::new());
        let mut out = Vec::new();
        let result = watch(&mut source, WATCH_INTERVAL, &mut out, |_, _| Ok(())).await;
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
