/// Phase of an append-only paged list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    /// Rows are on screen; `ended` once a short page arrived.
    Shown { ended: bool },
    /// First page came back empty.
    Empty,
    /// A later page came back empty.
    EndReached,
    Error,
}

/// Handle for one in-flight page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub offset: usize,
}

/// State machine behind the infinite-scroll lists.
///
/// `reset` starts a new generation; a page answered for an older generation
/// is dropped, so the latest filter always wins. While a load is in flight
/// `begin` hands out no second ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteList<T> {
    items: Vec<T>,
    page_size: usize,
    phase: ListPhase,
    generation: u64,
}

impl<T> InfiniteList<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_size: page_size.max(1),
            phase: ListPhase::Idle,
            generation: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    /// No further page will be requested until the next reset.
    pub fn is_done(&self) -> bool {
        matches!(
            self.phase,
            ListPhase::Shown { ended: true } | ListPhase::Empty | ListPhase::EndReached | ListPhase::Error
        )
    }

    /// Drop every row and invalidate in-flight loads.
    pub fn reset(&mut self) {
        self.items.clear();
        self.phase = ListPhase::Idle;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Claim the next page, or `None` when loading or exhausted.
    pub fn begin(&mut self) -> Option<LoadTicket> {
        if self.is_loading() || self.is_done() {
            return None;
        }
        self.phase = ListPhase::Loading;
        Some(LoadTicket {
            generation: self.generation,
            offset: self.items.len(),
        })
    }

    /// Apply a loaded page. Returns `false` when the ticket is stale.
    pub fn finish(&mut self, ticket: LoadTicket, rows: Vec<T>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        let short = rows.len() < self.page_size;
        self.phase = if rows.is_empty() {
            if self.items.is_empty() {
                ListPhase::Empty
            } else {
                ListPhase::EndReached
            }
        } else {
            ListPhase::Shown { ended: short }
        };
        self.items.extend(rows);
        true
    }

    /// Record a failed load. Returns `false` when the ticket is stale.
    pub fn fail(&mut self, ticket: LoadTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.phase = ListPhase::Error;
        true
    }

    /// Footer text under the list.
    pub fn status_text(&self) -> String {
        match self.phase {
            ListPhase::Idle => "Pronto.".to_string(),
            ListPhase::Loading => "Carico…".to_string(),
            ListPhase::Empty => "Nessun risultato.".to_string(),
            ListPhase::EndReached => "Fine lista.".to_string(),
            ListPhase::Error => "Errore.".to_string(),
            ListPhase::Shown { ended: false } => format!("Mostrati: {}", self.items.len()),
            ListPhase::Shown { ended: true } => {
                format!("Mostrati: {} • Fine lista.", self.items.len())
            }
        }
    }
}

impl<T> Default for InfiniteList<T> {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pages_until_short_page() {
        let mut list = InfiniteList::new(3);
        assert_eq!(list.status_text(), "Pronto.");

        let t = list.begin().unwrap();
        assert_eq!(t.offset, 0);
        assert_eq!(list.status_text(), "Carico…");
        assert!(list.begin().is_none());
        assert!(list.finish(t, vec![1, 2, 3]));
        assert_eq!(list.status_text(), "Mostrati: 3");

        let t = list.begin().unwrap();
        assert_eq!(t.offset, 3);
        list.finish(t, vec![4]);
        assert_eq!(list.status_text(), "Mostrati: 4 • Fine lista.");
        assert!(list.begin().is_none());
    }

    #[test]
    fn empty_first_page() {
        let mut list: InfiniteList<i32> = InfiniteList::new(3);
        let t = list.begin().unwrap();
        list.finish(t, vec![]);
        assert_eq!(list.phase(), ListPhase::Empty);
        assert_eq!(list.status_text(), "Nessun risultato.");
    }

    #[test]
    fn empty_later_page_ends_the_list() {
        let mut list = InfiniteList::new(2);
        let t = list.begin().unwrap();
        list.finish(t, vec![1, 2]);
        let t = list.begin().unwrap();
        list.finish(t, vec![]);
        assert_eq!(list.status_text(), "Fine lista.");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn stale_page_is_dropped_after_reset() {
        let mut list = InfiniteList::new(2);
        let stale = list.begin().unwrap();
        list.reset();
        let fresh = list.begin().unwrap();
        assert!(!list.finish(stale, vec![9, 9]));
        assert!(list.is_empty());
        assert!(list.finish(fresh, vec![1]));
        assert_eq!(list.items(), &[1]);
        assert!(!list.fail(stale));
    }

    #[test]
    fn failure_stops_paging() {
        let mut list: InfiniteList<i32> = InfiniteList::new(2);
        let t = list.begin().unwrap();
        list.fail(t);
        assert_eq!(list.status_text(), "Errore.");
        assert!(list.begin().is_none());
        list.reset();
        assert!(list.begin().is_some());
    }
}
