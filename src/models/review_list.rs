use crate::models::review::ReviewSummary;

/// Reviews as currently displayed by a view, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewList {
    items: Vec<ReviewSummary>,
}

/// Snapshot taken before a tentative removal, used to undo it.
#[derive(Debug, Clone)]
#[must_use = "a pending removal must be committed or rolled back"]
pub struct PendingRemoval {
    id: String,
    previous: Vec<ReviewSummary>,
}

impl PendingRemoval {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl ReviewList {
    pub fn new(items: Vec<ReviewSummary>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ReviewSummary] {
        &self.items
    }

    pub fn replace(&mut self, items: Vec<ReviewSummary>) {
        self.items = items;
    }

    /// Shows a freshly created review at the top.
    pub fn prepend(&mut self, review: ReviewSummary) {
        self.items.insert(0, review);
    }

    /// Removes `id` right away and keeps what was shown before.
    pub fn begin_removal(&mut self, id: &str) -> PendingRemoval {
        let previous = self.items.clone();
        self.items.retain(|review| review.id != id);
        PendingRemoval {
            id: id.to_string(),
            previous,
        }
    }

    /// Puts back the list as it was before `pending` started.
    pub fn rollback(&mut self, pending: PendingRemoval) {
        self.items = pending.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> ReviewSummary {
        ReviewSummary {
            id: id.into(),
            name: format!("name {id}"),
            comment: format!("comment {id}"),
            audio: None,
        }
    }

    fn ids(list: &ReviewList) -> Vec<&str> {
        list.items().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let mut list = ReviewList::new(vec![summary("a")]);
        list.prepend(summary("b"));
        assert_eq!(ids(&list), vec!["b", "a"]);
    }

    #[test]
    fn test_removal_only_drops_target() {
        let mut list = ReviewList::new(vec![summary("a"), summary("b"), summary("c")]);
        let pending = list.begin_removal("b");
        assert_eq!(pending.id(), "b");
        assert_eq!(ids(&list), vec!["a", "c"]);
    }

    #[test]
    fn test_rollback_restores_previous_list() {
        let original = ReviewList::new(vec![summary("a"), summary("b")]);
        let mut list = original.clone();
        let pending = list.begin_removal("a");
        assert_eq!(list.items().len(), 1);
        list.rollback(pending);
        assert_eq!(list, original);
    }

    #[test]
    fn test_removal_of_unknown_id_is_noop() {
        let mut list = ReviewList::new(vec![summary("a")]);
        let _pending = list.begin_removal("zzz");
        assert_eq!(ids(&list), vec!["a"]);
    }
}
