use {
    crate::{
        projection::projection_helper::{Projection, ProjectionHelper},
        view::{
            list::{ChangeBuilder, ListChange, ListError, ListView},
            singleton::SingletonView,
            Observer, ObserverBroadcast, ObserverExt, OuterViewPort, View, ViewPort,
        },
    },
    std::sync::{Arc, RwLock},
};

/// Inclusion test of a filtered list.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<T> OuterViewPort<dyn ListView<T>>
where
    T: Clone + Send + Sync + 'static,
{
    /// Live view of the elements satisfying `pred`, in source order.
    pub fn filter<P>(&self, pred: P) -> OuterViewPort<dyn ListView<T>>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filtered(pred).get_port()
    }

    /// Like [`filter`](Self::filter), returning a handle whose predicate can be replaced.
    ///
    /// The predicate runs while the filter holds its own lock: it must not
    /// read or modify this list or the filtered view.
    pub fn filtered<P>(&self, pred: P) -> FilteredList<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        FilteredList::new(self, Arc::new(pred))
    }

    /// Filtered list that is recomputed from scratch whenever `trigger` notifies,
    /// e.g. when a value the predicate reads has changed.
    pub fn bind_filtered<X, P>(
        &self,
        trigger: &OuterViewPort<dyn SingletonView<Item = X>>,
        pred: P,
    ) -> FilteredList<T>
    where
        X: 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let list = self.filtered(pred);
        list.filter.helper.observe(&list.filter, trigger);
        list
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Handle to a filtered view of a list.
#[derive(Clone)]
pub struct FilteredList<T>
where
    T: Clone + Send + Sync + 'static,
{
    filter: Arc<Filter<T>>,
    port: OuterViewPort<dyn ListView<T>>,
}

impl<T> FilteredList<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new(src: &OuterViewPort<dyn ListView<T>>, pred: Predicate<T>) -> Self {
        let port = ViewPort::new();
        let filter = Arc::new(Filter {
            state: RwLock::new(FilterState::new(pred)),
            cast: port.inner().get_broadcast(),
            helper: ProjectionHelper::new(),
        });

        filter.helper.observe(&filter, src);
        port.inner().set_view(Some(filter.clone()));

        FilteredList {
            filter,
            port: port.into_outer(),
        }
    }

    pub fn get_port(&self) -> OuterViewPort<dyn ListView<T>> {
        self.port.clone()
    }

    pub fn len(&self) -> usize {
        self.filter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<T> {
        self.filter.get(&idx)
    }

    pub fn try_get(&self, idx: usize) -> Result<T, ListError> {
        let state = self.filter.state.read().unwrap();
        ListError::check_index(idx, state.size)?;
        state
            .get(idx)
            .ok_or(ListError::IndexOutOfRange { index: idx, len: state.size })
    }

    /// Position in the source list of the element at `idx`.
    pub fn source_index_of(&self, idx: usize) -> Result<usize, ListError> {
        let state = self.filter.state.read().unwrap();
        ListError::check_index(idx, state.size)?;
        Ok(state.filtered[idx])
    }

    /// Source positions of all visible elements, ascending.
    pub fn source_indices(&self) -> Vec<usize> {
        let state = self.filter.state.read().unwrap();
        state.filtered[..state.size].to_vec()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.filter.state.read().unwrap().materialize()
    }

    pub fn predicate(&self) -> Predicate<T> {
        self.filter.state.read().unwrap().pred.clone()
    }

    /// Replace the predicate. Observers receive one change replacing
    /// the whole previous contents.
    pub fn set_predicate<P>(&self, pred: P)
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.set_predicate_arc(Arc::new(pred));
    }

    pub fn set_predicate_arc(&self, pred: Predicate<T>) {
        self.filter.resync("predicate replaced", move |state| state.pred = pred);
    }

    /// Re-evaluate the predicate on every source element.
    pub fn refilter(&self) {
        self.filter.resync("refilter requested", |_| {});
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct Filter<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: RwLock<FilterState<T>>,
    cast: Arc<RwLock<ObserverBroadcast<dyn ListView<T>>>>,
    helper: ProjectionHelper,
}

impl<T> Filter<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Rebuild the index from scratch after `f` and publish a single
    /// change replacing the previous contents.
    fn resync(&self, reason: &'static str, f: impl FnOnce(&mut FilterState<T>)) {
        let observed = self.cast.read().unwrap().has_observers();

        let change = {
            let mut state = self.state.write().unwrap();
            let removed = if observed { state.materialize() } else { Vec::new() };
            let old_size = state.size;

            f(&mut state);
            state.refilter();

            tracing::debug!(reason, old_size, new_size = state.size, "filter resynchronized");
            ListChange::Replaced { from: 0, to: state.size, removed }
        };

        if observed {
            self.cast.write().unwrap().notify(&change);
        }
    }

    fn publish(&self, changes: Vec<ListChange<T>>) {
        if changes.is_empty() {
            return;
        }
        self.cast.write().unwrap().notify_each(changes);
    }
}

impl<T> View for Filter<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Msg = ListChange<T>;
}

impl<T> ListView<T> for Filter<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        self.state.read().unwrap().size
    }

    fn get(&self, idx: &usize) -> Option<T> {
        self.state.read().unwrap().get(*idx)
    }
}

impl<T> Projection<dyn ListView<T>> for Filter<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn reset_source(&self, view: Option<Arc<dyn ListView<T>>>) {
        self.resync("source reset", move |state| state.src_view = view);
    }

    fn source_changed(&self, change: &ListChange<T>) {
        let changes = {
            let mut state = self.state.write().unwrap();
            let mut out = ChangeBuilder::new();

            let kind = match change {
                ListChange::Permuted { from, to, perm } => {
                    state.permute(*from, *to, perm, &mut out);
                    "permute"
                }
                ListChange::Replaced { from, to, removed } => {
                    state.add_remove(*from, *to, removed, &mut out);
                    "replace"
                }
                ListChange::Updated { from, to } => {
                    state.update(*from, *to, &mut out);
                    "update"
                }
            };

            state.check_invariants();
            tracing::trace!(
                kind,
                from = change.from(),
                to = change.to(),
                size = state.size,
                "filter synchronized"
            );
            out.finish()
        };

        self.publish(changes);
    }
}

/// Any notification of the trigger invalidates the whole filter.
impl<T, X> Projection<dyn SingletonView<Item = X>> for Filter<T>
where
    T: Clone + Send + Sync + 'static,
    X: 'static,
{
    fn reset_source(&self, _view: Option<Arc<dyn SingletonView<Item = X>>>) {
        self.resync("trigger reset", |_| {});
    }

    fn source_changed(&self, _msg: &()) {
        self.resync("trigger", |_| {});
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

struct FilterState<T>
where
    T: Clone + Send + Sync + 'static,
{
    src_view: Option<Arc<dyn ListView<T>>>,
    pred: Predicate<T>,

    /// `filtered[i]` is the source position of element `i`;
    /// strictly increasing on `..size`, spare capacity beyond.
    filtered: Vec<usize>,
    size: usize,
}

impl<T> FilterState<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new(pred: Predicate<T>) -> Self {
        FilterState {
            src_view: None,
            pred,
            filtered: Vec::new(),
            size: 0,
        }
    }

    fn source_len(&self) -> usize {
        self.src_view.as_ref().map_or(0, |src| src.len())
    }

    fn get(&self, idx: usize) -> Option<T> {
        if idx >= self.size {
            return None;
        }
        self.src_view.as_ref()?.get(&self.filtered[idx])
    }

    fn materialize(&self) -> Vec<T> {
        (0..self.size).filter_map(|i| self.get(i)).collect()
    }

    fn test(&self, item: &T) -> bool {
        (self.pred)(item)
    }

    fn accepts(&self, src_idx: usize) -> bool {
        self.src_view
            .as_ref()
            .and_then(|src| src.get(&src_idx))
            .map_or(false, |item| self.test(&item))
    }

    /// First position whose source index is `>= src_idx`.
    fn find_position(&self, src_idx: usize) -> usize {
        match self.filtered[..self.size].binary_search(&src_idx) {
            Ok(pos) | Err(pos) => pos,
        }
    }

    fn ensure_capacity(&mut self, len: usize) {
        if self.filtered.len() < len {
            self.filtered.resize(len * 3 / 2 + 1, 0);
        }
    }

    fn shift_indexes(&mut self, from: usize, delta: isize) {
        for idx in self.filtered[from..self.size].iter_mut() {
            *idx = idx.wrapping_add_signed(delta);
        }
    }

    fn insert_at(&mut self, pos: usize, src_idx: usize) {
        self.ensure_capacity(self.size + 1);
        self.filtered.copy_within(pos..self.size, pos + 1);
        self.filtered[pos] = src_idx;
        self.size += 1;
    }

    fn remove_at(&mut self, pos: usize) {
        self.filtered.copy_within(pos + 1..self.size, pos);
        self.size -= 1;
    }

    /// Holds after every message. Bounds against the source length only
    /// hold at the end of a batch: a source that is itself a projection
    /// already shows its final state while earlier messages are delivered.
    fn check_invariants(&self) {
        debug_assert!(self.size <= self.filtered.len());
        debug_assert!(self.filtered[..self.size].windows(2).all(|w| w[0] < w[1]));
    }

    //<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

    fn refilter(&mut self) {
        let len = self.source_len();
        self.ensure_capacity(len);

        self.size = 0;
        for src_idx in 0..len {
            if self.accepts(src_idx) {
                self.filtered[self.size] = src_idx;
                self.size += 1;
            }
        }
    }

    fn permute(&mut self, from: usize, to: usize, perm: &[usize], out: &mut ChangeBuilder<T>) {
        let filter_from = self.find_position(from);
        let filter_to = self.find_position(to);
        if filter_to <= filter_from {
            return;
        }

        // (new source index, old position)
        let mut moved: Vec<(usize, usize)> = (filter_from..filter_to)
            .map(|pos| (perm[self.filtered[pos] - from], pos))
            .collect();
        moved.sort_unstable();

        let mut derived = vec![0; filter_to - filter_from];
        for (offset, (src_idx, old_pos)) in moved.into_iter().enumerate() {
            self.filtered[filter_from + offset] = src_idx;
            derived[old_pos - filter_from] = filter_from + offset;
        }

        out.next_permutation(filter_from, filter_to, derived);
    }

    fn add_remove(&mut self, from: usize, to: usize, removed: &[T], out: &mut ChangeBuilder<T>) {
        let added_len = to - from;
        self.ensure_capacity(self.source_len());

        let filter_from = self.find_position(from);
        let filter_to = self.find_position(from + removed.len());

        for pos in filter_from..filter_to {
            out.next_remove(filter_from, removed[self.filtered[pos] - from].clone());
        }

        self.shift_indexes(filter_to, added_len as isize - removed.len() as isize);

        // reuse the slots of the removed elements first
        let mut fpos = filter_from;
        let mut src_idx = from;
        while fpos < filter_to && src_idx < to {
            if self.accepts(src_idx) {
                self.filtered[fpos] = src_idx;
                out.next_add(fpos, fpos + 1);
                fpos += 1;
            }
            src_idx += 1;
        }

        if fpos < filter_to {
            self.filtered.copy_within(filter_to..self.size, fpos);
            self.size -= filter_to - fpos;
        } else {
            while src_idx < to {
                if self.accepts(src_idx) {
                    self.insert_at(fpos, src_idx);
                    out.next_add(fpos, fpos + 1);
                    fpos += 1;
                }
                src_idx += 1;
            }
        }
    }

    fn update(&mut self, from: usize, to: usize, out: &mut ChangeBuilder<T>) {
        let Some(src) = self.src_view.clone() else {
            return;
        };
        self.ensure_capacity(src.len());

        let mut pos = self.find_position(from);
        let mut filter_to = self.find_position(to);

        // one source element per iteration; `filter_to` follows the
        // insertions and removals so that `pos..filter_to` always holds
        // the visible elements of `src_idx..to`
        for src_idx in from..to {
            let Some(item) = src.get(&src_idx) else {
                break;
            };
            let keep = self.test(&item);

            if pos < self.size && self.filtered[pos] == src_idx {
                if keep {
                    out.next_update(pos);
                    pos += 1;
                } else {
                    out.next_remove(pos, item);
                    self.remove_at(pos);
                    filter_to -= 1;
                }
            } else if keep {
                self.insert_at(pos, src_idx);
                out.next_add(pos, pos + 1);
                pos += 1;
                filter_to += 1;
            }
        }

        debug_assert_eq!(pos, filter_to);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
