use {
    crate::{
        projection::projection_helper::{Projection, ProjectionHelper},
        view::{singleton::SingletonView, Observer, ObserverBroadcast, OuterViewPort, View, ViewPort},
    },
    std::sync::{Arc, RwLock},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<Item: 'static> OuterViewPort<dyn SingletonView<Item = Item>> {
    pub fn map<DstItem, F>(&self, f: F) -> OuterViewPort<dyn SingletonView<Item = DstItem>>
    where
        DstItem: Default + 'static,
        F: Fn(Item) -> DstItem + Send + Sync + 'static,
    {
        let port = ViewPort::new();
        let map = Arc::new(MapSingleton {
            src_view: RwLock::new(None),
            f,
            cast: port.inner().get_broadcast(),
            helper: ProjectionHelper::new(),
        });

        map.helper.observe(&map, self);
        port.inner().set_view(Some(map));
        port.into_outer()
    }

    /// Whether the current value satisfies `pred`.
    pub fn matches<P>(&self, pred: P) -> OuterViewPort<dyn SingletonView<Item = bool>>
    where
        P: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        self.map(move |item| pred(&item))
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct MapSingleton<SrcItem, DstItem, F>
where
    SrcItem: 'static,
    F: Fn(SrcItem) -> DstItem + Send + Sync,
{
    src_view: RwLock<Option<Arc<dyn SingletonView<Item = SrcItem>>>>,
    f: F,
    cast: Arc<RwLock<ObserverBroadcast<dyn SingletonView<Item = DstItem>>>>,
    helper: ProjectionHelper,
}

impl<SrcItem, DstItem, F> View for MapSingleton<SrcItem, DstItem, F>
where
    SrcItem: 'static,
    F: Fn(SrcItem) -> DstItem + Send + Sync,
{
    type Msg = ();
}

impl<SrcItem, DstItem, F> SingletonView for MapSingleton<SrcItem, DstItem, F>
where
    SrcItem: 'static,
    DstItem: Default,
    F: Fn(SrcItem) -> DstItem + Send + Sync,
{
    type Item = DstItem;

    fn get(&self) -> DstItem {
        let src = self.src_view.read().unwrap().clone();
        src.map(|src| (self.f)(src.get())).unwrap_or_default()
    }
}

impl<SrcItem, DstItem, F> Projection<dyn SingletonView<Item = SrcItem>> for MapSingleton<SrcItem, DstItem, F>
where
    SrcItem: 'static,
    DstItem: 'static,
    F: Fn(SrcItem) -> DstItem + Send + Sync,
{
    fn reset_source(&self, view: Option<Arc<dyn SingletonView<Item = SrcItem>>>) {
        *self.src_view.write().unwrap() = view;
        self.cast.write().unwrap().notify(&());
    }

    fn source_changed(&self, msg: &()) {
        self.cast.write().unwrap().notify(msg);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use {
        crate::{
            buffer::{singleton::*, vec::VecBuffer},
            view::{list::ListViewExt, singleton::SingletonView},
        },
        std::sync::{Arc, Mutex},
    };

    #[test]
    fn singleton_map1() {
        let mut buffer = SingletonBuffer::new(0);

        let src_port = buffer.get_port();
        let dst_port = src_port.map(|x| x + 10);

        let dst_view = dst_port.get_view().unwrap();

        assert_eq!(dst_view.get(), 10);
        buffer.set(5);
        assert_eq!(dst_view.get(), 15);
    }

    #[test]
    fn matches_follows_source() {
        let mut buffer = SingletonBuffer::new(String::from("abc"));
        let long = buffer.get_port().matches(|s| s.len() > 3);

        let hits = Arc::new(Mutex::new(0));
        let _obs = {
            let hits = hits.clone();
            long.add_notify_fn(move |_| *hits.lock().unwrap() += 1)
        };

        assert!(!long.get_view().unwrap().get());
        buffer.modify(|s| s.push('d'));
        assert!(long.get_view().unwrap().get());
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn derived_value_as_trigger() {
        let mut limit = SingletonBuffer::new(3);
        let buffer: VecBuffer<i32> = (1..=6).collect();

        let doubled = limit.get_port().map(|x| x * 2);
        let list = {
            let doubled_view = doubled.get_view().unwrap();
            buffer
                .get_port()
                .bind_filtered(&doubled, move |x| *x <= doubled_view.get())
        };
        assert_eq!(list.to_vec(), vec![1, 2, 3, 4, 5, 6]);

        limit.set(2);
        assert_eq!(list.to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(list.get_port().get_view().unwrap().to_vec(), vec![1, 2, 3, 4]);
    }
}
