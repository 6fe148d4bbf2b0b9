//! Cancellation and per-document supersession of analysis passes.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use thiserror::Error;

/// An analysis pass was cancelled because a newer one superseded it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("analysis was cancelled")]
pub struct Cancelled;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
	/// A token that has not been cancelled.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Cancels every pass observing this token.
	pub fn cancel(&self) {
		self.0.store(true, Ordering::Release);
	}

	/// Whether the token was cancelled.
	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}

	/// Returns early from an analysis pass once the token is cancelled.
	///
	/// # Errors
	/// [`Cancelled`] if the token was cancelled.
	pub fn check(&self) -> Result<(), Cancelled> {
		if self.is_cancelled() { Err(Cancelled) } else { Ok(()) }
	}
}

/// Permission to run one analysis pass for one document version.
#[derive(Clone, Debug)]
pub struct Ticket<K> {
	/// The document.
	pub document:   K,
	/// The document version this pass analyzes.
	pub version:    i32,
	/// Cancelled once a newer pass for the same document begins.
	pub token:      CancellationToken,
	generation: u64,
}

#[derive(Debug)]
struct DocumentState<A> {
	generation: u64,
	token:      CancellationToken,
	latest:     Option<Arc<A>>,
}

/// Latest analysis results of every open document, with last-writer-wins supersession per document. Documents never
/// share state; only the map itself is locked.
#[derive(Debug)]
pub struct Workspace<K, A> {
	documents:       RwLock<HashMap<K, DocumentState<A>>>,
	next_generation: RwLock<u64>,
}

impl<K, A> Default for Workspace<K, A> {
	fn default() -> Self {
		Self { documents: RwLock::new(HashMap::new()), next_generation: RwLock::new(0) }
	}
}

impl<K: Clone + Eq + Hash, A> Workspace<K, A> {
	/// An empty workspace.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a pass for a document version and cancels any pass still running for the same document.
	pub fn begin(&self, document: K, version: i32) -> Ticket<K> {
		let generation = {
			let mut next = self.next_generation.write();
			*next += 1;
			*next
		};
		let token = CancellationToken::new();
		let mut documents = self.documents.write();
		let state = documents.entry(document.clone()).or_insert_with(|| DocumentState {
			generation: 0,
			token:      CancellationToken::new(),
			latest:     None,
		});
		state.token.cancel();
		state.generation = generation;
		state.token = token.clone();
		log::trace!("analysis pass {generation} started for document version {version}");
		Ticket { document, version, token, generation }
	}

	/// Stores the result of a finished pass. Results of superseded passes are discarded and `None` is returned, so
	/// callers only ever publish the newest analysis.
	pub fn commit(&self, ticket: &Ticket<K>, analysis: A) -> Option<Arc<A>> {
		let mut documents = self.documents.write();
		let state = documents.get_mut(&ticket.document)?;
		if state.generation != ticket.generation || ticket.token.is_cancelled() {
			log::debug!("discarding superseded analysis pass {} (version {})", ticket.generation, ticket.version);
			return None;
		}
		let analysis = Arc::new(analysis);
		state.latest = Some(analysis.clone());
		Some(analysis)
	}

	/// Whether the ticket still belongs to the newest pass of its document.
	#[must_use]
	pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
		self.documents
			.read()
			.get(&ticket.document)
			.is_some_and(|state| state.generation == ticket.generation && !ticket.token.is_cancelled())
	}

	/// The newest committed analysis of a document.
	#[must_use]
	pub fn latest(&self, document: &K) -> Option<Arc<A>> {
		self.documents.read().get(document).and_then(|state| state.latest.clone())
	}

	/// Forgets a document and cancels its running pass.
	pub fn remove(&self, document: &K) {
		if let Some(state) = self.documents.write().remove(document) {
			state.token.cancel();
		}
	}
}
