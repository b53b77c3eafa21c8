use super::ListChange;

/// Collects the changes of one update pass.
///
/// Adjacent additions and adjacent updates are merged into one message each;
/// removals are kept one message per element.
pub struct ChangeBuilder<T> {
    changes: Vec<ListChange<T>>,
}

impl<T> ChangeBuilder<T> {
    pub fn new() -> Self {
        ChangeBuilder { changes: Vec::new() }
    }

    pub fn next_add(&mut self, from: usize, to: usize) {
        if let Some(ListChange::Replaced { to: last_to, removed, .. }) = self.changes.last_mut() {
            if removed.is_empty() && *last_to == from {
                *last_to = to;
                return;
            }
        }
        self.changes.push(ListChange::added(from, to));
    }

    pub fn next_remove(&mut self, at: usize, item: T) {
        self.changes.push(ListChange::removed(at, vec![item]));
    }

    pub fn next_update(&mut self, at: usize) {
        if let Some(ListChange::Updated { to, .. }) = self.changes.last_mut() {
            if *to == at {
                *to = at + 1;
                return;
            }
        }
        self.changes.push(ListChange::Updated { from: at, to: at + 1 });
    }

    pub fn next_permutation(&mut self, from: usize, to: usize, perm: Vec<usize>) {
        self.changes.push(ListChange::Permuted { from, to, perm });
    }

    pub fn finish(self) -> Vec<ListChange<T>> {
        self.changes
    }
}

impl<T> Default for ChangeBuilder<T> {
    fn default() -> Self {
        ChangeBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq};

    #[test]
    fn merges_add_runs() {
        let mut b = ChangeBuilder::<char>::new();
        b.next_add(0, 1);
        b.next_add(1, 2);
        b.next_add(3, 4);
        assert_eq!(b.finish(), vec![ListChange::added(0, 2), ListChange::added(3, 4)]);
    }

    #[test]
    fn removes_stay_per_element() {
        let mut b = ChangeBuilder::new();
        b.next_remove(2, 'a');
        b.next_remove(2, 'b');
        b.next_add(2, 3);
        assert_eq!(
            b.finish(),
            vec![
                ListChange::removed(2, vec!['a']),
                ListChange::removed(2, vec!['b']),
                ListChange::added(2, 3),
            ]
        );
    }

    #[test]
    fn merges_update_runs() {
        let mut b = ChangeBuilder::<u8>::new();
        b.next_update(4);
        b.next_update(5);
        b.next_add(6, 7);
        b.next_update(7);
        assert_eq!(
            b.finish(),
            vec![
                ListChange::Updated { from: 4, to: 6 },
                ListChange::added(6, 7),
                ListChange::Updated { from: 7, to: 8 },
            ]
        );
    }
}
