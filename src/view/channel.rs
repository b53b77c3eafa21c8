use {
    crate::view::{Observer, View},
    async_std::stream::Stream,
    core::{
        pin::Pin,
        task::{Context, Poll, Waker},
    },
    std::sync::{Arc, Mutex},
};

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                  Traits
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/

/// Buffer a channel accumulates messages into between two reads.
pub trait ChannelData: Default + IntoIterator + Send + Sync {
    fn channel_insert(&mut self, x: Self::Item);
}

impl<T> ChannelData for Vec<T>
where
    T: Send + Sync,
{
    fn channel_insert(&mut self, x: T) {
        self.push(x);
    }
}

/// Keeps only the latest message.
impl<T> ChannelData for Option<T>
where
    T: Send + Sync,
{
    fn channel_insert(&mut self, x: T) {
        *self = Some(x);
    }
}

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                  Channel
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
struct ChannelState<Data: ChannelData> {
    send_buf: Option<Data>,
    recv_iter: Option<Data::IntoIter>,
    num_senders: usize,
    waker: Option<Waker>,
}

impl<Data: ChannelData> ChannelState<Data> {
    fn wake(&mut self) {
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct ChannelSender<Data: ChannelData>(Arc<Mutex<ChannelState<Data>>>);
pub struct ChannelReceiver<Data: ChannelData>(Arc<Mutex<ChannelState<Data>>>);

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<Data: ChannelData> ChannelSender<Data> {
    pub fn send(&self, msg: Data::Item) {
        let mut state = self.0.lock().unwrap();
        state
            .send_buf
            .get_or_insert_with(Data::default)
            .channel_insert(msg);
        state.wake();
    }
}

impl<V: View + ?Sized, Data: ChannelData<Item = V::Msg>> Observer<V> for ChannelSender<Data>
where
    V::Msg: Clone,
    Data::IntoIter: Send + Sync,
{
    fn notify(&mut self, msg: &V::Msg) {
        self.send(msg.clone());
    }
}

impl<Data: ChannelData> Clone for ChannelSender<Data> {
    fn clone(&self) -> Self {
        self.0.lock().unwrap().num_senders += 1;
        ChannelSender(self.0.clone())
    }
}

impl<Data: ChannelData> Drop for ChannelSender<Data> {
    fn drop(&mut self) {
        let mut state = self.0.lock().unwrap();
        state.num_senders -= 1;
        state.wake();
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<Data: ChannelData> ChannelReceiver<Data> {
    /// Wait for the next batch; `None` once every sender is gone.
    pub async fn recv(&self) -> Option<Data> {
        ChannelRead(self.0.clone()).await
    }

    pub fn try_recv(&self) -> Option<Data> {
        self.0.lock().unwrap().send_buf.take()
    }
}

struct ChannelRead<Data: ChannelData>(Arc<Mutex<ChannelState<Data>>>);

impl<Data: ChannelData> std::future::Future for ChannelRead<Data> {
    type Output = Option<Data>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let mut state = self.0.lock().unwrap();
        if let Some(buf) = state.send_buf.take() {
            Poll::Ready(Some(buf))
        } else if state.num_senders == 0 {
            Poll::Ready(None)
        } else {
            state.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<Data: ChannelData> Stream for ChannelReceiver<Data> {
    type Item = Data::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut state = self.0.lock().unwrap();

        loop {
            if let Some(val) = state.recv_iter.as_mut().and_then(|it| it.next()) {
                return Poll::Ready(Some(val));
            }

            match state.send_buf.take() {
                Some(send_buf) => state.recv_iter = Some(send_buf.into_iter()),
                None if state.num_senders == 0 => return Poll::Ready(None),
                None => {
                    state.recv_iter = None;
                    state.waker = Some(cx.waker().clone());
                    return Poll::Pending;
                }
            }
        }
    }
}

/*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
             Factory Functions
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
pub fn channel<Data: ChannelData>() -> (ChannelSender<Data>, ChannelReceiver<Data>) {
    let state = Arc::new(Mutex::new(ChannelState {
        send_buf: None,
        recv_iter: None,
        num_senders: 1,
        waker: None,
    }));

    (ChannelSender(state.clone()), ChannelReceiver(state))
}

pub fn queue_channel<T: Send + Sync>() -> (ChannelSender<Vec<T>>, ChannelReceiver<Vec<T>>) {
    channel::<Vec<T>>()
}

pub fn singleton_channel<T: Send + Sync>() -> (ChannelSender<Option<T>>, ChannelReceiver<Option<T>>)
{
    channel::<Option<T>>()
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use {
        super::*,
        async_std::{stream::StreamExt, task},
    };

    #[test]
    fn queue_keeps_every_message() {
        let (tx, rx) = queue_channel::<u32>();
        tx.send(1);
        tx.send(2);
        assert_eq!(rx.try_recv(), Some(vec![1, 2]));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn singleton_keeps_latest() {
        let (tx, rx) = singleton_channel::<u32>();
        tx.send(1);
        tx.send(2);
        assert_eq!(rx.try_recv(), Some(Some(2)));
    }

    #[test]
    fn stream_ends_with_last_sender() {
        let (tx, mut rx) = queue_channel::<u32>();
        let tx2 = tx.clone();
        tx.send(7);
        tx2.send(8);
        drop(tx);
        drop(tx2);

        let got = task::block_on(async {
            let mut got = Vec::new();
            while let Some(x) = rx.next().await {
                got.push(x);
            }
            got
        });
        assert_eq!(got, vec![7, 8]);
    }

    #[test]
    fn recv_after_close() {
        let (tx, rx) = queue_channel::<u32>();
        drop(tx);
        assert_eq!(task::block_on(rx.recv()), None);
    }
}
