//! In-memory state of the pull requests a repository monitor watches.
//!
//! Entries move through explicit transitions: [`TrackedPullRequests::baseline`]
//! and [`TrackedPullRequests::reconcile`] create them, a push resets them,
//! [`TrackedPullRequests::mark_notified`] settles them, and reconciling
//! against an open set that no longer contains them removes them.

use std::collections::{BTreeMap, BTreeSet};

use crate::github::{CommitSha, PullRequestNumber, PullRequestSnapshot};

/// Last observed state of one watched pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPullRequest {
    head_sha: CommitSha,
    title: String,
    notified: bool,
}

impl TrackedPullRequest {
    fn observe(snapshot: &PullRequestSnapshot, notified: bool) -> Self {
        Self {
            head_sha: snapshot.head_sha.clone(),
            title: snapshot.title.clone(),
            notified,
        }
    }

    /// Head commit the entry currently describes.
    #[must_use]
    pub const fn head_sha(&self) -> &CommitSha {
        &self.head_sha
    }

    /// Title as of the last poll.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// True once a completion notification went out for [`Self::head_sha`].
    #[must_use]
    pub const fn notified(&self) -> bool {
        self.notified
    }
}

/// Change detected while reconciling against a fresh open set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingEvent {
    /// A pull request entered the watched set.
    Added {
        /// Pull request number.
        number: PullRequestNumber,
        /// Title when first seen.
        title: String,
    },
    /// A tracked pull request received a push.
    NewCommit {
        /// Pull request number.
        number: PullRequestNumber,
        /// Head commit before the push.
        previous: CommitSha,
        /// Head commit after the push.
        current: CommitSha,
    },
    /// A tracked pull request left the open set.
    Removed {
        /// Pull request number.
        number: PullRequestNumber,
    },
}

/// A tracked entry still awaiting its completion notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheck {
    /// Pull request number.
    pub number: PullRequestNumber,
    /// Commit to evaluate.
    pub head_sha: CommitSha,
    /// Title for the notification.
    pub title: String,
}

/// Watched pull requests keyed by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedPullRequests {
    entries: BTreeMap<PullRequestNumber, TrackedPullRequest>,
}

impl TrackedPullRequests {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pull request seen on the first cycle.
    ///
    /// `already_complete` marks the current commit as notified so checks that
    /// finished before the monitor started stay silent.
    pub fn baseline(&mut self, snapshot: &PullRequestSnapshot, already_complete: bool) {
        self.entries.insert(
            snapshot.number,
            TrackedPullRequest::observe(snapshot, already_complete),
        );
    }

    /// Brings the map in line with the currently open pull requests.
    ///
    /// Unknown numbers are added unnotified, a changed head commit replaces
    /// the entry and clears `notified`, an unchanged one only refreshes the
    /// title, and numbers missing from `open` are dropped.
    pub fn reconcile(&mut self, open: &[PullRequestSnapshot]) -> Vec<TrackingEvent> {
        let mut events = Vec::new();

        for snapshot in open {
            match self.entries.get_mut(&snapshot.number) {
                None => {
                    self.entries
                        .insert(snapshot.number, TrackedPullRequest::observe(snapshot, false));
                    events.push(TrackingEvent::Added {
                        number: snapshot.number,
                        title: snapshot.title.clone(),
                    });
                }
                Some(entry) if entry.head_sha == snapshot.head_sha => {
                    entry.title.clone_from(&snapshot.title);
                }
                Some(entry) => {
                    let previous = entry.head_sha.clone();
                    *entry = TrackedPullRequest::observe(snapshot, false);
                    events.push(TrackingEvent::NewCommit {
                        number: snapshot.number,
                        previous,
                        current: snapshot.head_sha.clone(),
                    });
                }
            }
        }

        let still_open: BTreeSet<PullRequestNumber> =
            open.iter().map(|snapshot| snapshot.number).collect();
        let removed: Vec<PullRequestNumber> = self
            .entries
            .keys()
            .filter(|number| !still_open.contains(number))
            .copied()
            .collect();
        for number in removed {
            self.entries.remove(&number);
            events.push(TrackingEvent::Removed { number });
        }

        events
    }

    /// Marks `number` notified, provided its stored commit is still `sha`.
    ///
    /// Returns false when the entry is gone or moved to another commit, in
    /// which case nothing changes.
    pub fn mark_notified(&mut self, number: PullRequestNumber, sha: &CommitSha) -> bool {
        match self.entries.get_mut(&number) {
            Some(entry) if entry.head_sha == *sha => {
                entry.notified = true;
                true
            }
            _ => false,
        }
    }

    /// Entries whose current commit has not been announced yet, by number.
    #[must_use]
    pub fn pending(&self) -> Vec<PendingCheck> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.notified)
            .map(|(number, entry)| PendingCheck {
                number: *number,
                head_sha: entry.head_sha.clone(),
                title: entry.title.clone(),
            })
            .collect()
    }

    /// Looks up one entry.
    #[must_use]
    pub fn get(&self, number: PullRequestNumber) -> Option<&TrackedPullRequest> {
        self.entries.get(&number)
    }

    /// Tracked pull request numbers in ascending order.
    pub fn numbers(&self) -> impl Iterator<Item = PullRequestNumber> + '_ {
        self.entries.keys().copied()
    }

    /// Number of tracked pull requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
