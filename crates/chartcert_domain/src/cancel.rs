use tokio::sync::watch;

/// Cooperative cancellation for a certification run.
///
/// Cloned freely; every clone observes the same [`CancelHandle`].
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl Cancellation {
    pub fn pair() -> (CancelHandle, Cancellation) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, Cancellation { rx })
    }

    /// A signal that never fires.
    pub fn never() -> Self {
        let (_handle, cancellation) = Self::pair();
        cancellation
    }

    /// Resolves once cancellation is requested. Pends forever if the handle is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::never()
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        // send_replace stores the value even when every receiver is gone.
        self.tx.send_replace(true);
    }
}
