use {
    crate::view::View,
    serde::{Deserialize, Serialize},
};

pub mod builder;
pub mod error;

pub use {builder::ChangeBuilder, error::ListError};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Change of a list.
///
/// A batch of changes is applied in order: positions in a message refer
/// to the list as it is after all previous messages of the batch.
/// Observers reading the view while a batch is delivered see the state
/// after the whole batch, so the length of the view may already differ
/// from the length implied by the messages received so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListChange<T> {
    /// The elements in `from..to` were reordered.
    /// `perm[i - from]` is the new position of the element previously at `i`.
    Permuted { from: usize, to: usize, perm: Vec<usize> },

    /// `removed` was taken out at `from`, and `from..to` now holds the added elements.
    Replaced { from: usize, to: usize, removed: Vec<T> },

    /// The elements in `from..to` changed in place.
    Updated { from: usize, to: usize },
}

impl<T> ListChange<T> {
    pub fn added(from: usize, to: usize) -> Self {
        ListChange::Replaced { from, to, removed: Vec::new() }
    }

    pub fn removed(at: usize, removed: Vec<T>) -> Self {
        ListChange::Replaced { from: at, to: at, removed }
    }

    pub fn from(&self) -> usize {
        match self {
            ListChange::Permuted { from, .. }
            | ListChange::Replaced { from, .. }
            | ListChange::Updated { from, .. } => *from,
        }
    }

    pub fn to(&self) -> usize {
        match self {
            ListChange::Permuted { to, .. }
            | ListChange::Replaced { to, .. }
            | ListChange::Updated { to, .. } => *to,
        }
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> ListChange<U> {
        match self {
            ListChange::Permuted { from, to, perm } => ListChange::Permuted {
                from: *from,
                to: *to,
                perm: perm.clone(),
            },
            ListChange::Replaced { from, to, removed } => ListChange::Replaced {
                from: *from,
                to: *to,
                removed: removed.iter().map(f).collect(),
            },
            ListChange::Updated { from, to } => ListChange::Updated { from: *from, to: *to },
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub trait ListView<Item>: View<Msg = ListChange<Item>>
where Item: Clone + Send + Sync + 'static
{
    fn len(&self) -> usize;
    fn get(&self, idx: &usize) -> Option<Item>;
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub trait ListViewExt<T>: ListView<T>
where T: Clone + Send + Sync + 'static
{
    fn iter<'a>(&'a self) -> ListViewIter<'a, T, Self> {
        ListViewIter { _phantom: std::marker::PhantomData, view: self, cur: 0 }
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    fn try_get(&self, idx: usize) -> Result<T, ListError> {
        self.get(&idx).ok_or(ListError::IndexOutOfRange { index: idx, len: self.len() })
    }
}

impl<T, V: ListView<T> + ?Sized> ListViewExt<T> for V
where T: Clone + Send + Sync + 'static
{}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct ListViewIter<'a, T, V>
where
    T: Clone + Send + Sync + 'static,
    V: ListView<T> + ?Sized,
{
    _phantom: std::marker::PhantomData<T>,
    view: &'a V,
    cur: usize,
}

impl<'a, T, V> Iterator for ListViewIter<'a, T, V>
where
    T: Clone + Send + Sync + 'static,
    V: ListView<T> + ?Sized,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur >= self.view.len() {
            return None;
        }
        let i = self.cur;
        self.cur += 1;
        self.view.get(&i)
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

use std::sync::RwLock;
use std::{ops::Deref, sync::Arc};

impl<Item: Clone + Send + Sync + 'static, V: ListView<Item> + ?Sized> ListView<Item> for RwLock<V> {
    fn get(&self, idx: &usize) -> Option<Item> {
        self.read().unwrap().get(idx)
    }

    fn len(&self) -> usize {
        self.read().unwrap().len()
    }
}

impl<Item: Clone + Send + Sync + 'static, V: ListView<Item> + ?Sized> ListView<Item> for Arc<V> {
    fn get(&self, idx: &usize) -> Option<Item> {
        self.deref().get(idx)
    }

    fn len(&self) -> usize {
        self.deref().len()
    }
}

impl<Item: Clone + Send + Sync + 'static, V: ListView<Item>> ListView<Item> for Option<V> {
    fn get(&self, idx: &usize) -> Option<Item> {
        (self.as_ref()? as &V).get(idx)
    }

    fn len(&self) -> usize {
        self.as_ref().map_or(0, |v| v.len())
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
