use {
    crate::view::{Observer, OuterViewPort, View},
    std::{
        any::Any,
        sync::{Arc, RwLock, Weak},
    },
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// A projection fed by a source view of type `V`.
///
/// Projections keep their state behind their own lock and are registered
/// with their sources through a [`SourceObserver`], so that they can
/// release that lock before publishing to their own observers.
pub trait Projection<V: View + ?Sized>: Send + Sync {
    fn reset_source(&self, view: Option<Arc<V>>);
    fn source_changed(&self, msg: &V::Msg);
}

/// Forwards the messages of a source to a projection it holds weakly.
pub struct SourceObserver<P: ?Sized> {
    proj: Weak<P>,
}

impl<V, P> Observer<V> for SourceObserver<P>
where
    V: View + ?Sized,
    P: Projection<V> + ?Sized,
{
    fn reset(&mut self, view: Option<Arc<V>>) {
        if let Some(proj) = self.proj.upgrade() {
            proj.reset_source(view);
        }
    }

    fn notify(&mut self, msg: &V::Msg) {
        if let Some(proj) = self.proj.upgrade() {
            proj.source_changed(msg);
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Owns the source observers of one projection.
///
/// Broadcasts only hold observers weakly; the helper lives inside the
/// projection so that the subscriptions last exactly as long as it does.
pub struct ProjectionHelper {
    keepalive: RwLock<Vec<Arc<dyn Any + Send + Sync>>>,
}

impl ProjectionHelper {
    pub fn new() -> Self {
        ProjectionHelper {
            keepalive: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe `proj` to `port`. The projection is reset with the
    /// current view of the port before this returns.
    pub fn observe<V, P>(&self, proj: &Arc<P>, port: &OuterViewPort<V>)
    where
        V: View + ?Sized + 'static,
        P: Projection<V> + 'static,
    {
        let obs = Arc::new(RwLock::new(SourceObserver {
            proj: Arc::downgrade(proj),
        }));
        self.keepalive.write().unwrap().push(obs.clone());
        port.add_observer(obs);
    }
}

impl Default for ProjectionHelper {
    fn default() -> Self {
        ProjectionHelper::new()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
