use {
    crate::view::{
        channel::{queue_channel, ChannelReceiver, ChannelSender},
        NotifyFnObserver, Observer, ObserverBroadcast, ResetFnObserver, View,
    },
    async_std::stream::Stream,
    core::{
        pin::Pin,
        task::{Context, Poll},
    },
    std::sync::{Arc, RwLock},
};

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                 View Port
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
pub struct ViewPort<V: View + ?Sized> {
    view: Arc<RwLock<Option<Arc<V>>>>,
    cast: Arc<RwLock<ObserverBroadcast<V>>>,
}

impl<V: View + ?Sized> ViewPort<V> {
    pub fn new() -> Self {
        ViewPort {
            view: Arc::new(RwLock::new(None)),
            cast: Arc::new(RwLock::new(ObserverBroadcast::new())),
        }
    }

    pub fn set_view(&self, view: Option<Arc<V>>) {
        *self.view.write().unwrap() = view.clone();
        self.cast.write().unwrap().reset(view);
    }

    pub fn add_observer(&self, observer: Arc<RwLock<dyn Observer<V>>>) {
        self.cast
            .write()
            .unwrap()
            .add_observer(Arc::downgrade(&observer));

        let view = self.view.read().unwrap().clone();
        observer.write().unwrap().reset(view);
    }

    pub fn inner(&self) -> InnerViewPort<V> {
        InnerViewPort(self.clone())
    }

    pub fn outer(&self) -> OuterViewPort<V> {
        OuterViewPort(self.clone())
    }

    pub fn into_inner(self) -> InnerViewPort<V> {
        InnerViewPort(self)
    }

    pub fn into_outer(self) -> OuterViewPort<V> {
        OuterViewPort(self)
    }
}

impl<V: View + ?Sized> Clone for ViewPort<V> {
    fn clone(&self) -> Self {
        ViewPort {
            view: self.view.clone(),
            cast: self.cast.clone(),
        }
    }
}

impl<V: View + ?Sized> Default for ViewPort<V> {
    fn default() -> Self {
        ViewPort::new()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Producer side of a port: owns the right to publish the view and its messages.
pub struct InnerViewPort<V: View + ?Sized>(pub ViewPort<V>);

/// Consumer side of a port: read the view, subscribe to its messages.
pub struct OuterViewPort<V: View + ?Sized>(pub ViewPort<V>);

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<V: View + ?Sized> InnerViewPort<V> {
    pub fn get_broadcast(&self) -> Arc<RwLock<ObserverBroadcast<V>>> {
        self.0.cast.clone()
    }

    pub fn set_view(&self, view: Option<Arc<V>>) -> Arc<RwLock<ObserverBroadcast<V>>> {
        self.0.set_view(view);
        self.get_broadcast()
    }

    pub fn get_view(&self) -> Option<Arc<V>> {
        self.0.view.read().unwrap().clone()
    }

    pub fn notify(&self, msg: &V::Msg) {
        self.0.cast.write().unwrap().notify(msg);
    }
}

impl<V: View + ?Sized> Clone for InnerViewPort<V> {
    fn clone(&self) -> Self {
        InnerViewPort(self.0.clone())
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<V: View + ?Sized + 'static> OuterViewPort<V> {
    pub fn get_view(&self) -> Option<Arc<V>> {
        self.0.view.read().unwrap().clone()
    }

    pub fn get_view_arc(&self) -> Arc<RwLock<Option<Arc<V>>>> {
        self.0.view.clone()
    }

    pub fn add_observer(
        &self,
        observer: Arc<RwLock<dyn Observer<V>>>,
    ) -> Arc<RwLock<Option<Arc<V>>>> {
        self.0.add_observer(observer);
        self.get_view_arc()
    }

    pub fn add_reset_fn<F: Fn(Option<Arc<V>>) + Send + Sync + 'static>(
        &self,
        reset: F,
    ) -> Arc<RwLock<ResetFnObserver<V, F>>> {
        let obs = Arc::new(RwLock::new(ResetFnObserver::new(reset)));
        self.add_observer(obs.clone());
        obs
    }

    pub fn add_notify_fn<F: Fn(&V::Msg) + Send + Sync + 'static>(
        &self,
        notify: F,
    ) -> Arc<RwLock<NotifyFnObserver<V, F>>> {
        let obs = Arc::new(RwLock::new(NotifyFnObserver::new(notify)));
        self.add_observer(obs.clone());
        obs
    }

    /// Subscribe a queue to this port.
    ///
    /// Every message published after this call is appended to the queue
    /// until the returned [`ChangeQueue`] is dropped.
    pub fn queue_changes(&self) -> ChangeQueue<V>
    where
        V::Msg: Clone,
    {
        let (tx, rx) = queue_channel::<V::Msg>();
        let tx = Arc::new(RwLock::new(tx));
        self.add_observer(tx.clone());
        ChangeQueue { rx, _tx: tx }
    }
}

impl<V: View + ?Sized> Clone for OuterViewPort<V> {
    fn clone(&self) -> Self {
        OuterViewPort(self.0.clone())
    }
}

impl<V: View + ?Sized> Default for OuterViewPort<V> {
    fn default() -> Self {
        ViewPort::new().into_outer()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Messages of a view, collected as they are published.
pub struct ChangeQueue<V: View + ?Sized> {
    rx: ChannelReceiver<Vec<V::Msg>>,
    _tx: Arc<RwLock<ChannelSender<Vec<V::Msg>>>>,
}

impl<V: View + ?Sized> ChangeQueue<V> {
    /// Take all messages received since the last call.
    pub fn drain(&self) -> Vec<V::Msg> {
        self.rx.try_recv().unwrap_or_default()
    }
}

impl<V: View + ?Sized> Stream for ChangeQueue<V> {
    type Item = V::Msg;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use {
        crate::{buffer::singleton::SingletonBuffer, view::singleton::SingletonView},
        async_std::stream::StreamExt,
        std::sync::{Arc, Mutex},
    };

    #[test]
    fn observer_receives_current_view_on_subscribe() {
        let buffer = SingletonBuffer::new('x');
        let seen = Arc::new(Mutex::new(None));

        let _obs = {
            let seen = seen.clone();
            buffer
                .get_port()
                .add_reset_fn(move |view| *seen.lock().unwrap() = view.map(|v| v.get()))
        };

        assert_eq!(*seen.lock().unwrap(), Some('x'));
    }

    #[test]
    fn queue_collects_messages() {
        let mut buffer = SingletonBuffer::new(1);
        let queue = buffer.get_port().queue_changes();

        assert!(queue.drain().is_empty());
        buffer.set(2);
        buffer.set(3);
        assert_eq!(queue.drain().len(), 2);
        assert!(queue.drain().is_empty());
    }

    #[async_std::test]
    async fn queue_is_a_stream() {
        let mut buffer = SingletonBuffer::new(1);
        let mut queue = buffer.get_port().queue_changes();

        buffer.set(2);
        buffer.set(3);

        assert_eq!(queue.next().await, Some(()));
        assert_eq!(queue.next().await, Some(()));
    }
}
