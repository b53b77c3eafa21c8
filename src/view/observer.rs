use {
    crate::view::View,
    std::sync::RwLock,
    std::sync::{Arc, Weak},
};

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                 Observer
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
pub trait Observer<V: View + ?Sized>: Send + Sync {
    fn reset(&mut self, _view: Option<Arc<V>>) {}
    fn notify(&mut self, msg: &V::Msg);
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<V: View + ?Sized, O: Observer<V>> Observer<V> for Arc<RwLock<O>> {
    fn reset(&mut self, view: Option<Arc<V>>) {
        self.write().unwrap().reset(view);
    }

    fn notify(&mut self, msg: &V::Msg) {
        self.write().unwrap().notify(msg);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub trait ObserverExt<V: View + ?Sized>: Observer<V> {
    fn notify_each(&mut self, it: impl IntoIterator<Item = V::Msg>);
}

impl<V: View + ?Sized, T: Observer<V>> ObserverExt<V> for T {
    fn notify_each(&mut self, it: impl IntoIterator<Item = V::Msg>) {
        for msg in it {
            self.notify(&msg);
        }
    }
}

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                 Broadcast
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/

/// Subscriber registry of a view.
///
/// Messages are delivered synchronously, in registration order, before
/// `notify` returns. Observers are held weakly: dropping the last strong
/// reference to an observer unsubscribes it.
pub struct ObserverBroadcast<V: View + ?Sized> {
    observers: Vec<Weak<RwLock<dyn Observer<V>>>>,
}

impl<V: View + ?Sized> ObserverBroadcast<V> {
    pub fn new() -> Self {
        ObserverBroadcast {
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, obs: Weak<RwLock<dyn Observer<V>>>) {
        self.cleanup();
        self.observers.push(obs);
    }

    fn cleanup(&mut self) {
        self.observers.retain(|o| o.strong_count() > 0);
    }

    fn iter(&self) -> impl Iterator<Item = Arc<RwLock<dyn Observer<V>>>> + '_ {
        self.observers.iter().filter_map(|o| o.upgrade())
    }

    /// Whether at least one observer is still alive.
    pub fn has_observers(&self) -> bool {
        self.observers.iter().any(|o| o.strong_count() > 0)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.iter().filter(|o| o.strong_count() > 0).count()
    }
}

impl<V: View + ?Sized> Default for ObserverBroadcast<V> {
    fn default() -> Self {
        ObserverBroadcast::new()
    }
}

impl<V: View + ?Sized> Observer<V> for ObserverBroadcast<V> {
    fn reset(&mut self, view: Option<Arc<V>>) {
        for o in self.iter() {
            o.write().unwrap().reset(view.clone());
        }
    }

    fn notify(&mut self, msg: &V::Msg) {
        for o in self.iter() {
            o.write().unwrap().notify(msg);
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct NotifyFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(&V::Msg) + Send + Sync,
{
    f: F,
    _phantom: std::marker::PhantomData<fn(&V)>,
}

impl<V, F> NotifyFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(&V::Msg) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        NotifyFnObserver {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<V, F> Observer<V> for NotifyFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(&V::Msg) + Send + Sync,
{
    fn notify(&mut self, msg: &V::Msg) {
        (self.f)(msg);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct ResetFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(Option<Arc<V>>) + Send + Sync,
{
    f: F,
    _phantom: std::marker::PhantomData<fn(&V)>,
}

impl<V, F> ResetFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(Option<Arc<V>>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        ResetFnObserver {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<V, F> Observer<V> for ResetFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(Option<Arc<V>>) + Send + Sync,
{
    fn notify(&mut self, _msg: &V::Msg) {}
    fn reset(&mut self, view: Option<Arc<V>>) {
        (self.f)(view);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use {
        crate::{
            buffer::singleton::SingletonBuffer,
            view::{singleton::SingletonView, Observer, ObserverBroadcast},
        },
        std::sync::{Arc, Mutex, RwLock},
    };

    struct Recorder(Arc<Mutex<Vec<&'static str>>>, &'static str);

    impl Observer<dyn SingletonView<Item = u8>> for Recorder {
        fn notify(&mut self, _msg: &()) {
            self.0.lock().unwrap().push(self.1);
        }
    }

    #[test]
    fn broadcast_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::new(RwLock::new(Recorder(log.clone(), "first")));
        let second = Arc::new(RwLock::new(Recorder(log.clone(), "second")));

        let mut cast = ObserverBroadcast::<dyn SingletonView<Item = u8>>::new();
        let first_dyn: Arc<RwLock<dyn Observer<dyn SingletonView<Item = u8>>>> = first.clone();
        let second_dyn: Arc<RwLock<dyn Observer<dyn SingletonView<Item = u8>>>> = second.clone();
        cast.add_observer(Arc::downgrade(&first_dyn));
        cast.add_observer(Arc::downgrade(&second_dyn));

        cast.notify(&());
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(cast.observer_count(), 2);
    }

    #[test]
    fn dropped_observers_unsubscribe() {
        let mut buffer = SingletonBuffer::new(0u8);
        let hits = Arc::new(Mutex::new(0));

        let observer = {
            let hits = hits.clone();
            buffer.get_port().add_notify_fn(move |_| *hits.lock().unwrap() += 1)
        };

        buffer.set(1);
        assert_eq!(*hits.lock().unwrap(), 1);

        drop(observer);
        buffer.set(2);
        assert_eq!(*hits.lock().unwrap(), 1);
    }
}
