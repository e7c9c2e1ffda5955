//! Async driver for [`SearchController`].
//!
//! A session owns the controller and the gateway. It reacts to three event
//! sources on a single task: user input, the debounce deadline and
//! completed searches. After every transition the renderable snapshot is
//! published on a watch channel.

use std::future::Future;
use std::sync::Arc;

use cinescope_api::tmdb::LocalMovieApi;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::instrument;

use crate::search::{SearchController, SearchRequest, SearchResponse, SearchSnapshot, execute};

/// User input fed into a [`SearchSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// The search box now holds this text.
    Query(String),
    /// Search immediately.
    Submit,
    /// Stop taking input and close once everything already sent has
    /// settled: the debounce has fired and no search is in flight.
    Finish,
    /// Leave the search screen.
    Close,
}

/// Event loop around a [`SearchController`].
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchSession<G> {
    gateway: Arc<G>,
    controller: SearchController,
    inputs: mpsc::Receiver<SearchInput>,
    snapshots: watch::Sender<SearchSnapshot>,
}

/// Builds the future for one search on an owned gateway handle.
fn search_future<G: LocalMovieApi>(
    gateway: Arc<G>,
    request: SearchRequest,
) -> impl Future<Output = SearchResponse> {
    async move { execute(gateway.as_ref(), request).await }
}

impl<G: LocalMovieApi> SearchSession<G> {
    /// Creates a session and the receiver its snapshots are published on.
    #[must_use]
    pub fn new(
        gateway: Arc<G>,
        controller: SearchController,
        inputs: mpsc::Receiver<SearchInput>,
    ) -> (Self, watch::Receiver<SearchSnapshot>) {
        let (snapshots, receiver) = watch::channel(controller.snapshot());
        let session = Self {
            gateway,
            controller,
            inputs,
            snapshots,
        };
        (session, receiver)
    }

    /// Processes input until [`SearchInput::Close`] or the input channel
    /// closes, then tears the controller down and returns it.
    ///
    /// Searches still in flight at that point are dropped. After
    /// [`SearchInput::Finish`] the session stops reading input and returns
    /// once the pending debounce and all in-flight searches have resolved.
    #[instrument(skip_all)]
    pub async fn run(mut self) -> SearchController {
        tracing::debug!("search session started");
        let mut in_flight = FuturesUnordered::new();
        let mut finishing = false;

        loop {
            let deadline = self.controller.next_deadline();
            if finishing && deadline.is_none() && in_flight.is_empty() {
                break;
            }
            tokio::select! {
                input = self.inputs.recv(), if !finishing => match input {
                    Some(SearchInput::Query(query)) => {
                        self.controller.set_query(&query, Instant::now());
                    }
                    Some(SearchInput::Submit) => {
                        if let Some(request) = self.controller.submit() {
                            in_flight.push(search_future(Arc::clone(&self.gateway), request));
                        }
                    }
                    Some(SearchInput::Finish) => finishing = true,
                    Some(SearchInput::Close) | None => break,
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(request) = self.controller.poll(Instant::now()) {
                        in_flight.push(search_future(Arc::clone(&self.gateway), request));
                    }
                }
                Some(response) = in_flight.next(), if !in_flight.is_empty() => {
                    self.controller.apply(response);
                }
            }
            self.publish();
        }

        tracing::debug!(dropped = in_flight.len(), "search session closed");
        self.controller.teardown();
        self.publish();
        self.controller
    }

    fn publish(&self) {
        let next = self.controller.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}
