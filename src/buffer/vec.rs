use {
    crate::view::{
        list::{ListChange, ListError, ListView},
        InnerViewPort, Observer, OuterViewPort, View, ViewPort,
    },
    std::{
        cmp::Ordering,
        ops::{Deref, DerefMut, Range},
        sync::{Arc, RwLock},
    },
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct VecBufferView<T>(Arc<RwLock<Vec<T>>>)
where
    T: Clone + Send + Sync + 'static;

impl<T> View for VecBufferView<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Msg = ListChange<T>;
}

impl<T> ListView<T> for VecBufferView<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        self.0.read().unwrap().len()
    }

    fn get(&self, idx: &usize) -> Option<T> {
        self.0.read().unwrap().get(*idx).cloned()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Observable list.
///
/// Every mutation publishes exactly one [`ListChange`] to the observers of
/// `get_port()`, after the data lock is released.
#[derive(Clone)]
pub struct VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    data: Arc<RwLock<Vec<T>>>,
    port: InnerViewPort<dyn ListView<T>>,
}

impl<T> VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn with_data_port(data: Vec<T>, port: InnerViewPort<dyn ListView<T>>) -> Self {
        let data = Arc::new(RwLock::new(data));
        port.set_view(Some(Arc::new(VecBufferView(data.clone()))));

        VecBuffer { data, port }
    }

    pub fn with_data(data: Vec<T>) -> Self {
        VecBuffer::with_data_port(data, ViewPort::new().into_inner())
    }

    pub fn with_port(port: InnerViewPort<dyn ListView<T>>) -> Self {
        VecBuffer::with_data_port(vec![], port)
    }

    pub fn new() -> Self {
        VecBuffer::with_port(ViewPort::new().into_inner())
    }

    pub fn get_port(&self) -> OuterViewPort<dyn ListView<T>> {
        self.port.0.outer()
    }

    fn publish(&self, change: ListChange<T>) {
        self.port.notify(&change);
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<T> {
        self.data.read().unwrap().get(idx).cloned()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.read().unwrap().clone()
    }

    //<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
    // insertion & removal

    pub fn push(&mut self, val: T) {
        let idx = {
            let mut data = self.data.write().unwrap();
            data.push(val);
            data.len() - 1
        };
        self.publish(ListChange::added(idx, idx + 1));
    }

    pub fn insert(&mut self, idx: usize, val: T) -> Result<(), ListError> {
        self.splice(idx..idx, Some(val)).map(|_| ())
    }

    pub fn remove(&mut self, idx: usize) -> Result<T, ListError> {
        ListError::check_index(idx, self.len())?;
        let mut removed = self.splice(idx..idx + 1, None)?;
        Ok(removed.remove(0))
    }

    pub fn remove_range(&mut self, range: Range<usize>) -> Result<Vec<T>, ListError> {
        self.splice(range, None)
    }

    /// Replace the element at `idx`, returning the previous one.
    /// Observers see a removal plus an addition, not an update.
    pub fn set(&mut self, idx: usize, val: T) -> Result<T, ListError> {
        ListError::check_index(idx, self.len())?;
        let mut removed = self.splice(idx..idx + 1, Some(val))?;
        Ok(removed.remove(0))
    }

    /// Replace `range` with `items`, returning the removed elements.
    pub fn splice(
        &mut self,
        range: Range<usize>,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Vec<T>, ListError> {
        let (removed, added) = {
            let mut data = self.data.write().unwrap();
            ListError::check_range(range.start, range.end, data.len())?;
            let old_len = data.len();
            let removed: Vec<T> = data.splice(range.clone(), items).collect();
            let added = data.len() + removed.len() - old_len;
            (removed, added)
        };

        if added > 0 || !removed.is_empty() {
            self.publish(ListChange::Replaced {
                from: range.start,
                to: range.start + added,
                removed: removed.clone(),
            });
        }
        Ok(removed)
    }

    pub fn clear(&mut self) {
        let removed = std::mem::take(&mut *self.data.write().unwrap());
        if !removed.is_empty() {
            self.publish(ListChange::removed(0, removed));
        }
    }

    //<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
    // updates in place

    /// Overwrite the element at `idx`; observers see an update.
    pub fn update(&mut self, idx: usize, val: T) -> Result<(), ListError> {
        {
            let mut data = self.data.write().unwrap();
            ListError::check_index(idx, data.len())?;
            data[idx] = val;
        }
        self.publish(ListChange::Updated { from: idx, to: idx + 1 });
        Ok(())
    }

    /// Announce that the elements in `range` changed by other means,
    /// e.g. through state they share.
    pub fn mark_updated(&mut self, range: Range<usize>) -> Result<(), ListError> {
        ListError::check_range(range.start, range.end, self.len())?;
        if !range.is_empty() {
            self.publish(ListChange::Updated { from: range.start, to: range.end });
        }
        Ok(())
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<MutableVecAccess<T>> {
        let val = self.get(idx)?;
        Some(MutableVecAccess {
            buf: self.clone(),
            idx,
            val,
        })
    }

    //<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
    // reordering

    /// Reorder `from..from + perm.len()`: the element at `i` moves to `perm[i - from]`.
    pub fn permute(&mut self, from: usize, perm: Vec<usize>) -> Result<(), ListError> {
        let to = from + perm.len();
        {
            let mut data = self.data.write().unwrap();
            ListError::check_range(from, to, data.len())?;

            let mut seen = vec![false; perm.len()];
            for &p in perm.iter() {
                if p < from || p >= to || std::mem::replace(&mut seen[p - from], true) {
                    return Err(ListError::InvalidPermutation { from, to });
                }
            }

            let old: Vec<T> = data[from..to].to_vec();
            for (i, val) in old.into_iter().enumerate() {
                data[perm[i]] = val;
            }
        }

        if to > from {
            self.publish(ListChange::Permuted { from, to, perm });
        }
        Ok(())
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), ListError> {
        let len = self.len();
        ListError::check_index(a, len)?;
        ListError::check_index(b, len)?;
        if a == b {
            return Ok(());
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let mut perm: Vec<usize> = (lo..=hi).collect();
        perm[0] = hi;
        perm[hi - lo] = lo;
        self.permute(lo, perm)
    }

    pub fn reverse(&mut self) {
        let len = self.len();
        let perm = (0..len).rev().collect();
        // a reversal of the whole list is always a valid permutation
        let _ = self.permute(0, perm);
    }

    /// Stable sort; observers see one permutation.
    pub fn sort_by(&mut self, mut cmp: impl FnMut(&T, &T) -> Ordering) {
        let perm = {
            let data = self.data.read().unwrap();
            let mut order: Vec<usize> = (0..data.len()).collect();
            order.sort_by(|&a, &b| cmp(&data[a], &data[b]));

            let mut perm = vec![0; order.len()];
            for (new_pos, old_pos) in order.into_iter().enumerate() {
                perm[old_pos] = new_pos;
            }
            perm
        };
        let _ = self.permute(0, perm);
    }

    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(T::cmp);
    }

    //<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

    /// Mirror `port` into this buffer.
    ///
    /// The buffer is reset to the contents of the observed list and then
    /// follows its changes, republishing them to its own observers.
    /// Mirroring stops when the returned target is dropped.
    pub fn attach_to(&self, port: OuterViewPort<dyn ListView<T>>) -> Arc<RwLock<VecBufferTarget<T>>> {
        let target = Arc::new(RwLock::new(VecBufferTarget {
            buffer: self.clone(),
            src_view: None,
        }));
        port.add_observer(target.clone());
        target
    }
}

impl<T> Default for VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        VecBuffer::new()
    }
}

impl<T> FromIterator<T> for VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        VecBuffer::with_data(iter.into_iter().collect())
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct VecBufferTarget<T>
where
    T: Clone + Send + Sync + 'static,
{
    buffer: VecBuffer<T>,
    src_view: Option<Arc<dyn ListView<T>>>,
}

impl<T> VecBufferTarget<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn source_items(&self, range: Range<usize>) -> Vec<T> {
        match self.src_view.as_ref() {
            Some(src) => range.filter_map(|i| src.get(&i)).collect(),
            None => Vec::new(),
        }
    }
}

impl<T> Observer<dyn ListView<T>> for VecBufferTarget<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn reset(&mut self, view: Option<Arc<dyn ListView<T>>>) {
        self.src_view = view;
        let items = self.source_items(0..self.src_view.as_ref().map_or(0, |v| v.len()));
        let len = self.buffer.len();
        if let Err(err) = self.buffer.splice(0..len, items) {
            tracing::warn!(%err, "mirror reset failed");
        }
    }

    fn notify(&mut self, change: &ListChange<T>) {
        let result = match change {
            ListChange::Replaced { from, to, removed } => {
                let items = self.source_items(*from..*to);
                self.buffer.splice(*from..*from + removed.len(), items).map(|_| ())
            }
            ListChange::Permuted { from, perm, .. } => self.buffer.permute(*from, perm.clone()),
            ListChange::Updated { from, to } => (*from..*to).try_for_each(|i| {
                match self.src_view.as_ref().and_then(|src| src.get(&i)) {
                    Some(val) => self.buffer.update(i, val),
                    None => Err(ListError::IndexOutOfRange { index: i, len: self.buffer.len() }),
                }
            }),
        };

        if let Err(err) = result {
            tracing::warn!(%err, "mirrored change could not be applied");
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct MutableVecAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    buf: VecBuffer<T>,
    idx: usize,
    val: T,
}

impl<T> Deref for MutableVecAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Target = T;

    fn deref(&self) -> &T {
        &self.val
    }
}

impl<T> DerefMut for MutableVecAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.val
    }
}

impl<T> Drop for MutableVecAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if let Err(err) = self.buf.update(self.idx, self.val.clone()) {
            tracing::warn!(%err, idx = self.idx, "element vanished before write-back");
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use {
        crate::{
            buffer::vec::*,
            view::list::{ListChange, ListViewExt},
        },
        pretty_assertions::assert_eq,
    };

    #[test]
    fn vec_buffer_changes() {
        let mut buffer = VecBuffer::new();
        let queue = buffer.get_port().queue_changes();

        buffer.push('a');
        buffer.push('b');
        buffer.insert(1, 'x').unwrap();
        assert_eq!(buffer.remove(0), Ok('a'));
        assert_eq!(buffer.set(1, 'c'), Ok('b'));
        buffer.update(0, 'y').unwrap();

        assert_eq!(buffer.to_vec(), vec!['y', 'c']);
        assert_eq!(
            queue.drain(),
            vec![
                ListChange::added(0, 1),
                ListChange::added(1, 2),
                ListChange::added(1, 2),
                ListChange::removed(0, vec!['a']),
                ListChange::Replaced { from: 1, to: 2, removed: vec!['b'] },
                ListChange::Updated { from: 0, to: 1 },
            ]
        );
    }

    #[test]
    fn out_of_range() {
        let mut buffer: VecBuffer<u8> = [1, 2].into_iter().collect();
        assert_eq!(buffer.remove(2), Err(ListError::IndexOutOfRange { index: 2, len: 2 }));
        assert_eq!(
            buffer.remove_range(1..3),
            Err(ListError::InvalidRange { start: 1, end: 3, len: 2 })
        );
        assert_eq!(buffer.insert(3, 0), Err(ListError::InvalidRange { start: 3, end: 3, len: 2 }));
        assert!(buffer.update(2, 0).is_err());
        assert_eq!(buffer.to_vec(), vec![1, 2]);
    }

    #[test]
    fn splice_and_clear() {
        let mut buffer: VecBuffer<u8> = (0..6).collect();
        let queue = buffer.get_port().queue_changes();

        assert_eq!(buffer.splice(1..4, vec![9, 9]), Ok(vec![1, 2, 3]));
        assert_eq!(buffer.to_vec(), vec![0, 9, 9, 4, 5]);

        buffer.splice(2..2, None).unwrap();
        buffer.clear();
        buffer.clear();

        assert_eq!(
            queue.drain(),
            vec![
                ListChange::Replaced { from: 1, to: 3, removed: vec![1, 2, 3] },
                ListChange::removed(0, vec![0, 9, 9, 4, 5]),
            ]
        );
    }

    #[test]
    fn reordering() {
        let mut buffer: VecBuffer<u8> = vec![3, 1, 2].into_iter().collect();
        let queue = buffer.get_port().queue_changes();

        buffer.sort();
        assert_eq!(buffer.to_vec(), vec![1, 2, 3]);

        buffer.reverse();
        assert_eq!(buffer.to_vec(), vec![3, 2, 1]);

        buffer.swap(0, 2).unwrap();
        assert_eq!(buffer.to_vec(), vec![1, 2, 3]);

        assert_eq!(
            buffer.permute(0, vec![0, 0, 1]),
            Err(ListError::InvalidPermutation { from: 0, to: 3 })
        );

        assert_eq!(
            queue.drain(),
            vec![
                ListChange::Permuted { from: 0, to: 3, perm: vec![2, 0, 1] },
                ListChange::Permuted { from: 0, to: 3, perm: vec![2, 1, 0] },
                ListChange::Permuted { from: 0, to: 3, perm: vec![2, 1, 0] },
            ]
        );
    }

    #[test]
    fn get_mut_writes_back_as_update() {
        let mut buffer: VecBuffer<u32> = vec![1, 2].into_iter().collect();
        let queue = buffer.get_port().queue_changes();

        *buffer.get_mut(1).unwrap() += 40;
        assert!(buffer.get_mut(2).is_none());

        assert_eq!(buffer.to_vec(), vec![1, 42]);
        assert_eq!(queue.drain(), vec![ListChange::Updated { from: 1, to: 2 }]);
    }

    #[test]
    fn mirror_follows_source() {
        let mut src: VecBuffer<char> = "abc".chars().collect();
        let mirror = VecBuffer::new();
        let _target = mirror.attach_to(src.get_port());
        assert_eq!(mirror.to_vec(), vec!['a', 'b', 'c']);

        src.push('d');
        src.remove(0).unwrap();
        src.reverse();
        src.update(0, 'z').unwrap();

        assert_eq!(mirror.to_vec(), src.to_vec());
        assert_eq!(mirror.get_port().get_view().unwrap().to_vec(), vec!['z', 'c', 'b']);
    }
}
