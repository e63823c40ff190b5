//! Async driver: runs the presentation delay and message expiry on tokio.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use swapdesk_common::CurrencyCode;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::ControllerConfig;
use crate::controller::{SwapController, SwapView, Transition};
use crate::state::SwapPhase;

/// A [`SwapController`] whose pending quotes settle after a delay.
///
/// At most one settle task and one expiry task are outstanding; each new
/// trigger aborts them before scheduling its own. Must be used inside a
/// tokio runtime.
pub struct LiveController {
    inner: Arc<Mutex<SwapController>>,
    view_tx: Arc<watch::Sender<SwapView>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    expiry: Mutex<Option<JoinHandle<()>>>,
    compute_delay: Duration,
    error_ttl: Duration,
}

impl LiveController {
    /// Start the controller's session and begin driving it.
    pub fn start(controller: SwapController, config: &ControllerConfig) -> Self {
        let (view_tx, _) = watch::channel(controller.view());

        let live = Self {
            inner: Arc::new(Mutex::new(controller)),
            view_tx: Arc::new(view_tx),
            pending: Mutex::new(None),
            expiry: Mutex::new(None),
            compute_delay: config.compute_delay,
            error_ttl: config.error_ttl,
        };
        live.apply(SwapController::start);
        live
    }

    pub fn set_input_currency(&self, code: CurrencyCode) {
        self.apply(|c| c.set_input_currency(code));
    }

    pub fn set_output_currency(&self, code: CurrencyCode) {
        self.apply(|c| c.set_output_currency(code));
    }

    pub fn type_input(&self, text: &str) {
        self.apply(|c| c.type_input(text));
    }

    pub fn type_output(&self, text: &str) {
        self.apply(|c| c.type_output(text));
    }

    pub fn flip_direction(&self) {
        self.apply(SwapController::flip_direction);
    }

    /// Current view, possibly still computing.
    pub fn view(&self) -> SwapView {
        self.view_tx.borrow().clone()
    }

    /// Subscribe to view changes.
    pub fn subscribe(&self) -> watch::Receiver<SwapView> {
        self.view_tx.subscribe()
    }

    /// Wait until no quote is pending and return the committed view.
    pub async fn settled(&self) -> SwapView {
        let mut rx = self.view_tx.subscribe();
        let settled = rx.wait_for(|view| view.phase.is_committed()).await;
        match settled {
            Ok(view) => view.clone(),
            Err(_) => self.view(),
        }
    }

    /// Run `f` against the controller under its lock.
    pub fn with_controller<R>(&self, f: impl FnOnce(&SwapController) -> R) -> R {
        f(&self.inner.lock())
    }

    fn apply(&self, op: impl FnOnce(&mut SwapController) -> Transition) {
        let transition = {
            let mut controller = self.inner.lock();
            let transition = op(&mut controller);
            self.view_tx.send_replace(controller.view());
            transition
        };

        cancel(&self.pending);
        cancel(&self.expiry);

        match transition {
            Transition::Pending(pending) => {
                let inner = self.inner.clone();
                let view_tx = self.view_tx.clone();
                let delay = self.compute_delay;

                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let mut controller = inner.lock();
                    if controller.settle(pending) {
                        view_tx.send_replace(controller.view());
                    }
                });
                *self.pending.lock() = Some(handle);
            }
            Transition::Committed {
                phase: SwapPhase::Invalid,
                generation,
            } => {
                let inner = self.inner.clone();
                let view_tx = self.view_tx.clone();
                let ttl = self.error_ttl;

                let handle = tokio::spawn(async move {
                    tokio::time::sleep(ttl).await;
                    let mut controller = inner.lock();
                    if controller.expire_error(generation) {
                        debug!(generation, "Validation message expired");
                        view_tx.send_replace(controller.view());
                    }
                });
                *self.expiry.lock() = Some(handle);
            }
            Transition::Committed { .. } => {}
        }
    }
}

impl Drop for LiveController {
    fn drop(&mut self) {
        cancel(&self.pending);
        cancel(&self.expiry);
    }
}

fn cancel(slot: &Mutex<Option<JoinHandle<()>>>) {
    if let Some(handle) = slot.lock().take() {
        handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemorySink;
    use crate::reconcile::Reconciler;
    use crate::session::SwapSession;
    use swapdesk_fx::Tables;

    fn config() -> ControllerConfig {
        ControllerConfig {
            compute_delay: Duration::from_millis(20),
            error_ttl: Duration::from_millis(40),
            ..Default::default()
        }
    }

    fn setup_live() -> (LiveController, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let controller = SwapController::new(
            SwapSession::new(CurrencyCode::Usd, CurrencyCode::Myr),
            Reconciler::new(&Tables::builtin()),
            sink.clone(),
        );
        (LiveController::start(controller, &config()), sink)
    }

    #[tokio::test]
    async fn test_quote_settles_after_delay() {
        let (live, _) = setup_live();

        live.type_input("100");
        assert!(live.view().is_computing());
        assert_eq!(live.view().display.input_value, "100");

        let view = live.settled().await;
        assert_eq!(view.phase, SwapPhase::Settled);
        assert_eq!(view.display.output_value, "415.80");
    }

    #[tokio::test]
    async fn test_rapid_typing_commits_only_last_value() {
        let (live, sink) = setup_live();

        live.type_input("1");
        live.type_input("10");
        live.type_input("100");

        let view = live.settled().await;
        assert_eq!(view.display.output_value, "415.80");

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.last().unwrap().amount, "100");
    }

    #[tokio::test]
    async fn test_flip_after_reverse_quote() {
        let (live, _) = setup_live();

        live.type_output("415.80");
        let view = live.settled().await;
        assert_eq!(view.display.input_value, "100.00");

        live.flip_direction();
        let view = live.settled().await;
        assert_eq!(view.input_currency, CurrencyCode::Myr);
        assert_eq!(view.output_currency, CurrencyCode::Usd);
        assert_eq!(view.display.input_value, "415.80");
        assert_eq!(view.display.output_value, "98.01");
    }

    #[tokio::test]
    async fn test_validation_message_expires() {
        let (live, _) = setup_live();

        live.type_input("-3");
        let view = live.view();
        assert_eq!(view.phase, SwapPhase::Invalid);
        assert!(view.display.error.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;

        let view = live.view();
        assert_eq!(view.display.error, None);
        assert_eq!(view.display.input_value, "-3");
    }

    #[tokio::test]
    async fn test_invalid_input_cancels_pending_quote() {
        let (live, _) = setup_live();

        live.type_input("100");
        live.type_input("1..");

        tokio::time::sleep(Duration::from_millis(60)).await;

        let view = live.view();
        assert_eq!(view.phase, SwapPhase::Invalid);
        assert_eq!(view.display.output_value, "");
        assert_eq!(live.with_controller(|c| c.session().typed_value.clone()), "1..");
    }

    #[tokio::test]
    async fn test_subscribers_see_settled_view() {
        let (live, _) = setup_live();
        let mut rx = live.subscribe();

        live.type_input("50");
        let view = rx.wait_for(|v| v.phase == SwapPhase::Settled).await.unwrap().clone();

        assert_eq!(view.display.output_value, "207.90");
    }
}
