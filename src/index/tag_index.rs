//! In-memory inverted index from tag to note paths.

use crate::domain::{Tag, normalize_tag};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Weak};

/// Number of entries [`TagIndex::popular_tags`] callers usually ask for.
pub const DEFAULT_POPULAR_LIMIT: usize = 10;

type Listener = Arc<dyn Fn() + Send + Sync>;

/// A tag and the notes that carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRecord {
    /// Normalized tag name.
    pub name: String,
    /// Number of notes carrying the tag.
    pub count: usize,
    pub color: &'static str,
    /// Note paths, sorted.
    pub notes: Vec<String>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Handle returned by [`TagIndex::subscribe`].
///
/// Dropping the handle leaves the listener registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Removes the listener. Does nothing if the index is gone.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Inverted index from normalized tag to the set of note paths carrying it.
///
/// Owned by the open [`Vault`](crate::vault::Vault). Mutations take
/// `&mut self`, so one writer at a time is enforced by the borrow checker;
/// queries and [`subscribe`](TagIndex::subscribe) only need `&self`.
///
/// Every mutating call (`index_note`, `remove_note`, `clear`) notifies each
/// listener exactly once, synchronously, after the mutation is complete.
///
/// # Examples
///
/// ```
/// use notemaker::index::TagIndex;
///
/// let mut index = TagIndex::new();
/// index.index_note("inbox.md", ["Project", "todo"]);
/// index.index_note("plan.md", ["project"]);
///
/// let popular = index.popular_tags(1);
/// assert_eq!(popular[0].name, "project");
/// assert_eq!(popular[0].count, 2);
/// assert_eq!(index.notes_with_tag("TODO"), vec!["inbox.md"]);
/// ```
#[derive(Default)]
pub struct TagIndex {
    buckets: HashMap<Tag, BTreeSet<String>>,
    listeners: Arc<Mutex<Listeners>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tags of `path`.
    ///
    /// The path is first removed from every bucket, then added to the bucket
    /// of each given tag after normalization. Blank tags are ignored.
    pub fn index_note<I>(&mut self, path: &str, tags: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.detach(path);
        for raw in tags {
            if let Ok(tag) = Tag::new(raw.as_ref()) {
                self.buckets.entry(tag).or_default().insert(path.to_string());
            }
        }
        self.notify();
    }

    /// Removes `path` from every tag.
    pub fn remove_note(&mut self, path: &str) {
        self.detach(path);
        self.notify();
    }

    /// Empties the index.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.notify();
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns every tag, most used first.
    ///
    /// Ties are ordered by name.
    pub fn all_tags(&self) -> Vec<TagRecord> {
        let mut records: Vec<TagRecord> = self
            .buckets
            .iter()
            .map(|(tag, notes)| record(tag, notes))
            .collect();
        records.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        records
    }

    /// Returns the record for one tag, if any note carries it.
    pub fn tag(&self, name: &str) -> Option<TagRecord> {
        let tag = Tag::new(name).ok()?;
        self.buckets.get(&tag).map(|notes| record(&tag, notes))
    }

    /// Returns the paths of notes carrying `tag`, sorted.
    pub fn notes_with_tag(&self, tag: &str) -> Vec<String> {
        Tag::new(tag)
            .ok()
            .and_then(|tag| self.buckets.get(&tag))
            .map(|notes| notes.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the normalized tags of one note, sorted.
    pub fn tags_for_note(&self, path: &str) -> Vec<String> {
        let mut tags: Vec<String> = self
            .buckets
            .iter()
            .filter(|(_, notes)| notes.contains(path))
            .map(|(tag, _)| tag.as_str().to_string())
            .collect();
        tags.sort();
        tags
    }

    /// Returns tags whose name contains `query`, most used first.
    pub fn search_tags(&self, query: &str) -> Vec<TagRecord> {
        let query = normalize_tag(query);
        self.all_tags()
            .into_iter()
            .filter(|record| record.name.contains(&query))
            .collect()
    }

    /// Returns the first `limit` entries of [`all_tags`](TagIndex::all_tags).
    pub fn popular_tags(&self, limit: usize) -> Vec<TagRecord> {
        let mut records = self.all_tags();
        records.truncate(limit);
        records
    }

    /// Registers a callback run after every mutation.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    fn detach(&mut self, path: &str) {
        self.buckets.retain(|_, notes| {
            notes.remove(path);
            !notes.is_empty()
        });
    }

    fn notify(&self) {
        // Snapshot so listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

fn record(tag: &Tag, notes: &BTreeSet<String>) -> TagRecord {
    TagRecord {
        name: tag.as_str().to_string(),
        count: notes.len(),
        color: tag.color(),
        notes: notes.iter().cloned().collect(),
    }
}

impl fmt::Debug for TagIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagIndex")
            .field("buckets", &self.buckets)
            .field("listeners", &self.listeners.lock().entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_TAG_COLOR;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn names(records: &[TagRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn counter(index: &TagIndex) -> (Arc<AtomicUsize>, Subscription) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let subscription = index.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (calls, subscription)
    }

    // ===========================================
    // index_note / remove_note
    // ===========================================

    #[test]
    fn case_variants_share_one_bucket() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["Project", "project"]);

        let tags = index.all_tags();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "project");
        assert_eq!(tags[0].count, 1);
        assert_eq!(tags[0].notes, vec!["/a.md"]);
    }

    #[test]
    fn remove_note_deletes_empty_buckets() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["x"]);
        index.remove_note("/a.md");
        assert!(index.all_tags().iter().all(|r| r.name != "x"));
        assert!(index.is_empty());
    }

    #[test]
    fn remove_note_keeps_other_notes() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["shared"]);
        index.index_note("/b.md", ["shared"]);
        index.remove_note("/a.md");
        assert_eq!(index.notes_with_tag("shared"), vec!["/b.md"]);
    }

    #[test]
    fn reindex_replaces_membership() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["old", "kept"]);
        index.index_note("/a.md", ["kept", "new"]);

        assert_eq!(names(&index.all_tags()).len(), 2);
        assert!(index.tag("old").is_none());
        assert_eq!(index.tags_for_note("/a.md"), vec!["kept", "new"]);
    }

    #[test]
    fn reindex_with_no_tags_removes_note() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["x"]);
        index.index_note("/a.md", Vec::<String>::new());
        assert!(index.is_empty());
    }

    #[test]
    fn blank_tags_are_ignored() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["", "   ", " Trimmed "]);
        assert_eq!(names(&index.all_tags()), vec!["trimmed"]);
    }

    #[test]
    fn remove_unknown_note_is_harmless() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["x"]);
        index.remove_note("/missing.md");
        assert_eq!(index.notes_with_tag("x"), vec!["/a.md"]);
    }

    // ===========================================
    // Queries
    // ===========================================

    #[test]
    fn all_tags_sorted_by_count_descending() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["rare", "common", "medium"]);
        index.index_note("/b.md", ["common", "medium"]);
        index.index_note("/c.md", ["common"]);

        let counts: Vec<usize> = index.all_tags().iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![3, 2, 1]);
        assert_eq!(index.all_tags()[0].name, "common");
    }

    #[test]
    fn records_carry_colors() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["todo", "zebra"]);
        assert_eq!(index.tag("todo").unwrap().color, "#f59e0b");
        assert_eq!(index.tag("zebra").unwrap().color, DEFAULT_TAG_COLOR);
    }

    #[test]
    fn notes_with_tag_normalizes_query() {
        let mut index = TagIndex::new();
        index.index_note("/b.md", ["rust"]);
        index.index_note("/a.md", ["Rust"]);
        assert_eq!(index.notes_with_tag("  RUST "), vec!["/a.md", "/b.md"]);
        assert!(index.notes_with_tag("python").is_empty());
        assert!(index.notes_with_tag("").is_empty());
    }

    #[test]
    fn search_tags_matches_substring() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["todo", "done", "meeting"]);

        let found = index.search_tags("do");
        let found = names(&found);
        assert!(found.contains(&"todo"));
        assert!(found.contains(&"done"));
        assert!(!found.contains(&"meeting"));
    }

    #[test]
    fn search_tags_normalizes_query() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["todo", "meeting"]);
        assert_eq!(names(&index.search_tags(" TOD ")), vec!["todo"]);
    }

    #[test]
    fn popular_tags_limits_results() {
        let mut index = TagIndex::new();
        for i in 0..15 {
            index.index_note(&format!("/{i}.md"), [format!("tag{i}")]);
        }
        assert_eq!(index.popular_tags(DEFAULT_POPULAR_LIMIT).len(), 10);
        assert_eq!(index.popular_tags(3).len(), 3);
        assert_eq!(index.popular_tags(100).len(), 15);
    }

    // ===========================================
    // Notifications
    // ===========================================

    #[test]
    fn each_mutation_notifies_once() {
        let mut index = TagIndex::new();
        let (calls, _subscription) = counter(&index);

        index.index_note("/a.md", ["a", "b", "c"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        index.index_note("/a.md", ["d"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        index.remove_note("/a.md");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        index.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn listener_may_unsubscribe_itself() {
        let mut index = TagIndex::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let seen = Arc::clone(&calls);
        let own = Arc::clone(&slot);
        let subscription = index.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
            if let Some(subscription) = own.lock().take() {
                subscription.unsubscribe();
            }
        });
        *slot.lock() = Some(subscription);

        index.index_note("/a.md", ["x"]);
        index.index_note("/b.md", ["y"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn queries_do_not_notify() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["x"]);
        let (calls, _subscription) = counter(&index);

        index.all_tags();
        index.search_tags("x");
        index.notes_with_tag("x");
        index.popular_tags(DEFAULT_POPULAR_LIMIT);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut index = TagIndex::new();
        let (calls, subscription) = counter(&index);
        index.index_note("/a.md", ["x"]);
        subscription.unsubscribe();
        index.index_note("/b.md", ["y"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_only_removes_its_listener() {
        let mut index = TagIndex::new();
        let (first, first_sub) = counter(&index);
        let (second, _second_sub) = counter(&index);
        first_sub.unsubscribe();
        index.clear();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_after_index_dropped_is_harmless() {
        let index = TagIndex::new();
        let subscription = index.subscribe(|| {});
        drop(index);
        subscription.unsubscribe();
    }

    #[test]
    fn clear_empties_everything() {
        let mut index = TagIndex::new();
        index.index_note("/a.md", ["x", "y"]);
        index.clear();
        assert!(index.all_tags().is_empty());
        assert!(index.tags_for_note("/a.md").is_empty());
    }
}
