use {
    crate::view::View,
    std::{ops::Deref, sync::{Arc, RwLock}},
};

/// A single observable value.
///
/// The message carries no payload: observers re-read the value with `get`.
pub trait SingletonView: View<Msg = ()> {
    type Item;

    fn get(&self) -> Self::Item;
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<V: SingletonView + ?Sized> SingletonView for RwLock<V> {
    type Item = V::Item;

    fn get(&self) -> Self::Item {
        self.read().unwrap().get()
    }
}

impl<V: SingletonView + ?Sized> SingletonView for Arc<V> {
    type Item = V::Item;

    fn get(&self) -> Self::Item {
        self.deref().get()
    }
}

impl<V: SingletonView> SingletonView for Option<V>
where
    V::Item: Default,
{
    type Item = V::Item;

    fn get(&self) -> Self::Item {
        self.as_ref().map(|s| s.get()).unwrap_or_default()
    }
}
