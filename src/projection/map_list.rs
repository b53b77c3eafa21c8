use {
    crate::{
        projection::projection_helper::{Projection, ProjectionHelper},
        view::{
            list::{ListChange, ListView, ListViewExt},
            Observer, ObserverBroadcast, OuterViewPort, View, ViewPort,
        },
    },
    std::sync::{Arc, RwLock},
};

pub type Transformation<S, D> = Arc<dyn Fn(&S) -> D + Send + Sync>;

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<S> OuterViewPort<dyn ListView<S>>
where
    S: Clone + Send + Sync + 'static,
{
    /// Live view applying `f` to every element.
    pub fn map<D, F>(&self, f: F) -> OuterViewPort<dyn ListView<D>>
    where
        D: Clone + Send + Sync + 'static,
        F: Fn(&S) -> D + Send + Sync + 'static,
    {
        self.mapped(f).get_port()
    }

    pub fn mapped<D, F>(&self, f: F) -> MappedList<S, D>
    where
        D: Clone + Send + Sync + 'static,
        F: Fn(&S) -> D + Send + Sync + 'static,
    {
        let port = ViewPort::new();
        let map = Arc::new(Map {
            state: RwLock::new(MapState {
                src_view: None,
                f: Arc::new(f),
            }),
            cast: port.inner().get_broadcast(),
            helper: ProjectionHelper::new(),
        });

        map.helper.observe(&map, self);
        port.inner().set_view(Some(map.clone()));

        MappedList {
            map,
            port: port.into_outer(),
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Handle to a mapped view of a list.
#[derive(Clone)]
pub struct MappedList<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    map: Arc<Map<S, D>>,
    port: OuterViewPort<dyn ListView<D>>,
}

impl<S, D> MappedList<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    pub fn get_port(&self) -> OuterViewPort<dyn ListView<D>> {
        self.port.clone()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<D> {
        self.map.get(&idx)
    }

    pub fn to_vec(&self) -> Vec<D> {
        self.map.to_vec()
    }

    pub fn transformation(&self) -> Transformation<S, D> {
        self.map.state.read().unwrap().f.clone()
    }

    /// Swap the mapping function. Observers receive one change
    /// replacing the whole previous contents.
    pub fn set_transformation<F>(&self, f: F)
    where
        F: Fn(&S) -> D + Send + Sync + 'static,
    {
        self.map.replace(move |state| state.f = Arc::new(f));
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct Map<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    state: RwLock<MapState<S, D>>,
    cast: Arc<RwLock<ObserverBroadcast<dyn ListView<D>>>>,
    helper: ProjectionHelper,
}

struct MapState<S, D>
where
    S: Clone + Send + Sync + 'static,
{
    src_view: Option<Arc<dyn ListView<S>>>,
    f: Transformation<S, D>,
}

impl<S, D> MapState<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        self.src_view.as_ref().map_or(0, |src| src.len())
    }

    fn get(&self, idx: usize) -> Option<D> {
        self.src_view.as_ref()?.get(&idx).map(|item| (self.f)(&item))
    }

    fn materialize(&self) -> Vec<D> {
        (0..self.len()).filter_map(|idx| self.get(idx)).collect()
    }
}

impl<S, D> Map<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    fn replace(&self, f: impl FnOnce(&mut MapState<S, D>)) {
        let observed = self.cast.read().unwrap().has_observers();

        let change = {
            let mut state = self.state.write().unwrap();
            let removed = if observed { state.materialize() } else { Vec::new() };
            f(&mut state);
            ListChange::Replaced { from: 0, to: state.len(), removed }
        };

        if observed {
            tracing::debug!(len = change.to(), "mapped list replaced");
            self.cast.write().unwrap().notify(&change);
        }
    }
}

impl<S, D> View for Map<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    type Msg = ListChange<D>;
}

impl<S, D> ListView<D> for Map<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        self.state.read().unwrap().len()
    }

    fn get(&self, idx: &usize) -> Option<D> {
        self.state.read().unwrap().get(*idx)
    }
}

impl<S, D> Projection<dyn ListView<S>> for Map<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    fn reset_source(&self, view: Option<Arc<dyn ListView<S>>>) {
        self.replace(move |state| state.src_view = view);
    }

    fn source_changed(&self, change: &ListChange<S>) {
        let forwarded = {
            let state = self.state.read().unwrap();
            change.map(|item| (state.f)(item))
        };
        self.cast.write().unwrap().notify(&forwarded);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use {
        crate::{buffer::vec::*, projection::map_list::*},
        pretty_assertions::assert_eq,
    };

    #[test]
    fn map_list1() {
        let mut buffer = VecBuffer::<i32>::new();

        let target_port = buffer.get_port().map(|x| x + 10);
        let target_view = target_port.get_view().unwrap();

        buffer.push(0);
        buffer.push(7);
        buffer.push(9);

        assert_eq!(target_view.len(), 3);

        assert_eq!(target_view.get(&0), Some(10));
        assert_eq!(target_view.get(&1), Some(17));
        assert_eq!(target_view.get(&2), Some(19));
        assert_eq!(target_view.get(&3), None);
    }

    #[test]
    fn forwards_changes_with_mapped_payloads() {
        let mut buffer: VecBuffer<i32> = (1..=3).collect();
        let strings = buffer.get_port().map(|x| x.to_string());
        let queue = strings.queue_changes();

        buffer.remove(1).unwrap();
        buffer.update(0, 5).unwrap();
        buffer.reverse();

        assert_eq!(strings.get_view().unwrap().to_vec(), vec!["3", "5"]);
        assert_eq!(
            queue.drain(),
            vec![
                ListChange::removed(1, vec!["2".to_string()]),
                ListChange::Updated { from: 0, to: 1 },
                ListChange::Permuted { from: 0, to: 2, perm: vec![1, 0] },
            ]
        );
    }

    #[test]
    fn replacing_transformation_resets() {
        let buffer: VecBuffer<i32> = (1..=3).collect();
        let list = buffer.get_port().mapped(|x| x * 2);
        let queue = list.get_port().queue_changes();

        list.set_transformation(|x| x * 3);
        assert_eq!(list.to_vec(), vec![3, 6, 9]);
        assert_eq!(
            queue.drain(),
            vec![ListChange::Replaced { from: 0, to: 3, removed: vec![2, 4, 6] }]
        );
        assert_eq!((list.transformation())(&7), 21);
    }

    #[test]
    fn map_of_filter() {
        let mut buffer: VecBuffer<i32> = (1..=6).collect();
        let labels = buffer
            .get_port()
            .filter(|x| x % 2 == 0)
            .map(|x| format!("#{}", x));

        let mirror = VecBuffer::new();
        let _target = mirror.attach_to(labels.clone());

        buffer.push(8);
        buffer.remove(1).unwrap();

        assert_eq!(labels.get_view().unwrap().to_vec(), vec!["#4", "#6", "#8"]);
        assert_eq!(mirror.to_vec(), vec!["#4", "#6", "#8"]);
    }
}
