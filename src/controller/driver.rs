// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{
    FetchOutcome, FetchRequest, IgnoreReason, ToggleOutcome, TransitionSpeed, TreeView, ViewError,
};
use crate::model::{ChildRecord, NodeId};
use crate::render::{Frame, RenderSurface};
use crate::source::{ChildSource, FetchError};

/// Input to [`Controller::run_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Toggle { node: NodeId, speed: TransitionSpeed },
    /// A fetch resolved; posted by the loop's own fetch tasks or by the host.
    Fetched { request: FetchRequest, result: Result<Vec<ChildRecord>, FetchError> },
    /// Stop taking toggles and return once every outstanding fetch has landed.
    Shutdown,
}

/// How a toggle ended once any fetch it needed has resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    Rendered(Frame),
    Ignored(IgnoreReason),
    Suppressed,
    Dropped,
    Failed(FetchError),
}

impl From<FetchOutcome> for Settled {
    fn from(outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Rendered(frame) => Self::Rendered(frame),
            FetchOutcome::Suppressed => Self::Suppressed,
            FetchOutcome::Dropped => Self::Dropped,
            FetchOutcome::Failed(err) => Self::Failed(err),
        }
    }
}

/// A [`TreeView`] plus the source its fetches go to.
pub struct Controller<S, R> {
    view: TreeView<R>,
    source: Arc<S>,
}

impl<S, R> Controller<S, R>
where
    S: ChildSource + 'static,
    R: RenderSurface,
{
    pub fn new(view: TreeView<R>, source: S) -> Self {
        Self::with_shared_source(view, Arc::new(source))
    }

    pub fn with_shared_source(view: TreeView<R>, source: Arc<S>) -> Self {
        Self { view, source }
    }

    pub fn view(&self) -> &TreeView<R> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TreeView<R> {
        &mut self.view
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_view(self) -> TreeView<R> {
        self.view
    }

    pub fn mount(&mut self) -> Result<Frame, ViewError> {
        self.view.mount()
    }

    /// Runs one toggle to completion, awaiting the fetch inline when one is needed.
    pub async fn on_toggle(
        &mut self,
        node: NodeId,
        speed: TransitionSpeed,
    ) -> Result<Settled, ViewError> {
        match self.view.toggle(node, speed)? {
            ToggleOutcome::Rendered(frame) => Ok(Settled::Rendered(frame)),
            ToggleOutcome::Ignored(reason) => Ok(Settled::Ignored(reason)),
            ToggleOutcome::FetchRequested(request) => {
                let result = self.source.fetch_children(&request.source_ref).await;
                Ok(self.view.complete_fetch(request, result)?.into())
            }
        }
    }

    /// Processes events on the current task until `Shutdown` (or the sender
    /// closing) and no fetch is outstanding.
    ///
    /// Fetches run as spawned tasks and come back as `Fetched` events, so
    /// toggles on other nodes are handled while they are in flight. Toggles
    /// addressed at unknown nodes are logged and skipped; layout and surface
    /// errors end the loop.
    pub async fn run_events(
        mut self,
        mut events: mpsc::Receiver<ViewEvent>,
    ) -> Result<Self, ViewError> {
        let (fetched_tx, mut fetched_rx) = mpsc::unbounded_channel::<ViewEvent>();
        let mut pending = 0usize;
        let mut accepting = true;

        loop {
            if !accepting && pending == 0 {
                break;
            }
            let event = tokio::select! {
                biased;
                event = events.recv(), if accepting => event.unwrap_or(ViewEvent::Shutdown),
                Some(event) = fetched_rx.recv(), if pending > 0 => {
                    pending -= 1;
                    event
                }
            };

            match event {
                ViewEvent::Toggle { node, speed } => {
                    let outcome = match self.view.toggle(node, speed) {
                        Ok(outcome) => outcome,
                        Err(ViewError::Tree(err)) => {
                            warn!(error = %err, "toggle skipped");
                            continue;
                        }
                        Err(err) => return Err(err),
                    };
                    if let ToggleOutcome::FetchRequested(request) = outcome {
                        pending += 1;
                        self.spawn_fetch(request, fetched_tx.clone());
                    }
                }
                ViewEvent::Fetched { request, result } => {
                    let outcome = self.view.complete_fetch(request, result)?;
                    debug!(?outcome, "fetch applied");
                }
                ViewEvent::Shutdown => {
                    debug!(pending, "event loop shutting down");
                    accepting = false;
                }
            }
        }
        Ok(self)
    }

    /// Runs the fetch on its own task. A fetch task that panics or is aborted
    /// still posts `Fetched`, as a transport error, so the node can be retried.
    fn spawn_fetch(&self, request: FetchRequest, done: mpsc::UnboundedSender<ViewEvent>) {
        let source = Arc::clone(&self.source);
        let source_ref = request.source_ref.clone();
        let fetch = tokio::spawn(async move { source.fetch_children(&source_ref).await });
        tokio::spawn(async move {
            let result = match fetch.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(node = %request.node, error = %err, "fetch task did not complete");
                    Err(FetchError::Transport(format!("fetch task failed: {err}")))
                }
            };
            let _ = done.send(ViewEvent::Fetched { request, result });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::{mpsc, Notify};

    use super::{Controller, Settled, ViewEvent};
    use crate::config::ViewConfig;
    use crate::controller::{ToggleOutcome, TransitionSpeed, TreeView};
    use crate::model::{ChildRecord, FetchStatus, NodeId, NodeSpec, Tree};
    use crate::render::RecordingSurface;
    use crate::source::{ChildSource, FetchError, FetchFuture, StaticChildSource};

    /// Holds every fetch until the gate is notified.
    struct GatedSource {
        gate: Arc<Notify>,
        inner: StaticChildSource,
    }

    impl ChildSource for GatedSource {
        fn fetch_children<'a>(&'a self, source_ref: &'a str) -> FetchFuture<'a> {
            let gate = Arc::clone(&self.gate);
            let fetch = self.inner.fetch_children(source_ref);
            Box::pin(async move {
                gate.notified().await;
                fetch.await
            })
        }
    }

    fn fetchable_root() -> NodeSpec {
        NodeSpec::new("P1").with_source_ref("r")
    }

    fn view(root: NodeSpec) -> TreeView<RecordingSurface> {
        let tree = Tree::from_spec(&root, &Default::default());
        TreeView::new(tree, &ViewConfig::default(), RecordingSurface::default())
    }

    #[tokio::test]
    async fn on_toggle_fetches_merges_and_renders() {
        let source = StaticChildSource::new().with_children("r", ["a", "b"]);
        let mut controller = Controller::new(view(fetchable_root()), source);
        controller.mount().expect("mount");
        let root = controller.view().tree().root();

        let settled = controller.on_toggle(root, TransitionSpeed::Slow).await.expect("toggle");

        let frame = match settled {
            Settled::Rendered(frame) => frame,
            other => panic!("expected a render, got {other:?}"),
        };
        assert_eq!(frame.duration(), Duration::from_millis(2500));
        assert_eq!(frame.anchor(), root);
        assert_eq!(controller.view().tree().len(), 3);
        assert_eq!(controller.source().calls(), 1);
    }

    #[tokio::test]
    async fn on_toggle_reports_failures_and_retries_on_the_next_toggle() {
        let source = StaticChildSource::new()
            .with_error("r", FetchError::Transport("connection refused".to_owned()));
        let mut controller = Controller::new(view(fetchable_root()), source);
        let root = controller.view().tree().root();

        let first = controller.on_toggle(root, TransitionSpeed::Normal).await.expect("toggle");
        assert_eq!(first, Settled::Failed(FetchError::Transport("connection refused".to_owned())));
        assert!(matches!(
            controller.view().tree().node(root).map(|n| n.fetch_status()),
            Some(FetchStatus::Failed { .. })
        ));

        let second = controller.on_toggle(root, TransitionSpeed::Normal).await.expect("retry");
        assert!(matches!(second, Settled::Failed(_)));
        assert_eq!(controller.source().calls(), 2);
    }

    #[tokio::test]
    async fn event_loop_ignores_duplicate_toggles_while_fetching() {
        let gate = Arc::new(Notify::new());
        let source = GatedSource {
            gate: Arc::clone(&gate),
            inner: StaticChildSource::new().with_children("r", ["a", "b", "a"]),
        };
        let mut controller = Controller::new(view(fetchable_root()), source);
        controller.mount().expect("mount");
        let root = controller.view().tree().root();

        let (tx, rx) = mpsc::channel(8);
        for _ in 0..3 {
            tx.send(ViewEvent::Toggle { node: root, speed: TransitionSpeed::Normal })
                .await
                .expect("send");
        }
        tx.send(ViewEvent::Shutdown).await.expect("send");
        let releaser = tokio::spawn(async move {
            tokio::task::yield_now().await;
            gate.notify_one();
        });

        let controller = controller.run_events(rx).await.expect("run");
        releaser.await.expect("releaser");

        assert_eq!(controller.source().inner.calls(), 1);
        let tree = controller.view().tree();
        assert_eq!(tree.node(root).map(|n| n.cached_children().len()), Some(2));
        assert!(tree.node(root).is_some_and(|n| n.is_expanded()));
        // mount + the fetched render
        assert_eq!(controller.view().surface().frames().len(), 2);
    }

    struct PanickingSource;

    fn crash() -> Result<Vec<ChildRecord>, FetchError> {
        panic!("source crashed")
    }

    impl ChildSource for PanickingSource {
        fn fetch_children<'a>(&'a self, _source_ref: &'a str) -> FetchFuture<'a> {
            Box::pin(async { crash() })
        }
    }

    #[tokio::test]
    async fn event_loop_survives_a_crashed_fetch_task() {
        let mut controller = Controller::new(view(fetchable_root()), PanickingSource);
        controller.mount().expect("mount");
        let root = controller.view().tree().root();

        let (tx, rx) = mpsc::channel(4);
        tx.send(ViewEvent::Toggle { node: root, speed: TransitionSpeed::Normal })
            .await
            .expect("send");
        tx.send(ViewEvent::Shutdown).await.expect("send");

        let mut controller =
            tokio::time::timeout(Duration::from_secs(2), controller.run_events(rx))
                .await
                .expect("event loop finished")
                .expect("run");

        let node = controller.view().tree().node(root).expect("root");
        assert!(!node.is_expanded());
        assert!(matches!(
            node.fetch_status(),
            FetchStatus::Failed { message } if message.contains("fetch task failed")
        ));
        let retry = controller.view_mut().toggle(root, TransitionSpeed::Normal).expect("retry");
        assert!(matches!(retry, ToggleOutcome::FetchRequested(_)));
    }

    #[tokio::test]
    async fn event_loop_accepts_results_posted_by_the_host() {
        let mut view = view(fetchable_root());
        view.mount().expect("mount");
        let root = view.tree().root();
        let request = match view.toggle(root, TransitionSpeed::Normal).expect("toggle") {
            ToggleOutcome::FetchRequested(request) => request,
            other => panic!("expected a fetch request, got {other:?}"),
        };
        let controller = Controller::new(view, StaticChildSource::new());

        let (tx, rx) = mpsc::channel(4);
        tx.send(ViewEvent::Fetched { request, result: Ok(vec![ChildRecord::new("x")]) })
            .await
            .expect("send");
        drop(tx);

        let controller = controller.run_events(rx).await.expect("run");
        assert_eq!(controller.source().calls(), 0);
        assert_eq!(controller.view().tree().len(), 2);
        assert_eq!(controller.view().scene().nodes().len(), 2);
    }

    #[tokio::test]
    async fn event_loop_skips_toggles_for_unknown_nodes() {
        let controller = Controller::new(view(NodeSpec::new("P1")), StaticChildSource::new());
        let (tx, rx) = mpsc::channel(4);
        tx.send(ViewEvent::Toggle { node: NodeId::new(42), speed: TransitionSpeed::Normal })
            .await
            .expect("send");
        tx.send(ViewEvent::Toggle {
            node: controller.view().tree().root(),
            speed: TransitionSpeed::Normal,
        })
        .await
        .expect("send");
        drop(tx);

        let controller = controller.run_events(rx).await.expect("run");
        assert!(controller.view().surface().frames().is_empty());
        let root = controller.view().tree().root();
        assert_eq!(
            controller.view().tree().node(root).map(|n| n.fetch_status().clone()),
            Some(FetchStatus::Idle)
        );
    }
}
