use {
    crate::view::{singleton::SingletonView, InnerViewPort, OuterViewPort, View, ViewPort},
    std::{
        ops::{Deref, DerefMut},
        sync::{Arc, RwLock},
    },
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct SingletonBufferView<T: Clone + Send + Sync + 'static>(pub Arc<RwLock<T>>);

impl<T> View for SingletonBufferView<T>
where
    T: Clone + Send + Sync + 'static
{
    type Msg = ();
}

impl<T> SingletonView for SingletonBufferView<T>
where
    T: Clone + Send + Sync + 'static
{
    type Item = T;

    fn get(&self) -> Self::Item {
        self.0.read().unwrap().clone()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Observable value.
///
/// Every write notifies the observers of `get_port()`, which makes a
/// buffer usable as the recompute trigger of a filtered list: a predicate
/// reading the buffer is re-evaluated whenever the buffer changes.
#[derive(Clone)]
pub struct SingletonBuffer<T>
where
    T: Clone + Send + Sync + 'static
{
    value: Arc<RwLock<T>>,
    port: InnerViewPort<dyn SingletonView<Item = T>>
}

impl<T> SingletonBuffer<T>
where
    T: Clone + Send + Sync + 'static
{
    pub fn with_port(value: T, port: InnerViewPort<dyn SingletonView<Item = T>>) -> Self {
        let value = Arc::new(RwLock::new(value));
        port.set_view(Some(Arc::new(SingletonBufferView(value.clone()))));

        SingletonBuffer {
            value,
            port
        }
    }

    pub fn new(value: T) -> Self {
        SingletonBuffer::with_port(value, ViewPort::new().into_inner())
    }

    pub fn get_port(&self) -> OuterViewPort<dyn SingletonView<Item = T>> {
        self.port.0.outer()
    }

    pub fn get(&self) -> T {
        self.value.read().unwrap().clone()
    }

    pub fn get_mut(&mut self) -> MutableSingletonAccess<T> {
        MutableSingletonAccess {
            buf: self.clone(),
            val: self.get(),
        }
    }

    pub fn set(&mut self, new_value: T) {
        *self.value.write().unwrap() = new_value;
        self.touch();
    }

    /// Apply `f` to the value in place, then notify.
    pub fn modify(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut *self.value.write().unwrap());
        self.touch();
    }

    /// Notify observers without changing the value.
    pub fn touch(&self) {
        self.port.notify(&());
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct MutableSingletonAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    buf: SingletonBuffer<T>,
    val: T,
}

impl<T> Deref for MutableSingletonAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Target = T;

    fn deref(&self) -> &T {
        &self.val
    }
}

impl<T> DerefMut for MutableSingletonAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.val
    }
}

impl<T> Drop for MutableSingletonAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.buf.set(self.val.clone());
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
