//! ic10ls, the IC10 language server.
//!
//! Every open document is analyzed from scratch on each change. A newer change cancels the pass still running for the
//! same document; only the newest finished analysis is published.
#![allow(clippy::wildcard_imports, clippy::doc_markdown)]

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use flexstr::SharedStr;
use ic10sema::config::ConfigurationUpdate;
use ic10sema::sema::kind::kind_label;
use ic10sema::session::Workspace;
use ic10sema::suppress::add_to_directive;
use ic10sema::{Analysis, Analyzer, SourceFile};
use interface::*;
use parking_lot::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

mod interface;

shadow_rs::shadow!(buildinfo);

#[derive(Debug)]
struct Backend {
	client:     Client,
	/// Latest text and version of every open document.
	documents:  DashMap<Url, (SharedStr, i32)>,
	workspace:  Workspace<Url, Analysis>,
	analyzer:   RwLock<Arc<Analyzer>>,
	/// Held while checking a pass is still the newest and publishing its diagnostics.
	publishing: tokio::sync::Mutex<()>,
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
	async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
		self.client
			.log_message(
				MessageType::INFO,
				format!(
					"ic10ls server {}, built {}, {}",
					buildinfo::PKG_VERSION,
					buildinfo::BUILD_TIME,
					buildinfo::RUST_VERSION
				),
			)
			.await;
		Ok(InitializeResult {
			server_info:     Some(ServerInfo {
				name:    "ic10ls".to_string(),
				version: Some(buildinfo::PKG_VERSION.to_string()),
			}),
			offset_encoding: None,
			capabilities:    ServerCapabilities {
				position_encoding: Some(PositionEncodingKind::UTF16),
				text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
				hover_provider: Some(HoverProviderCapability::Simple(true)),
				inlay_hint_provider: Some(OneOf::Left(true)),
				definition_provider: Some(OneOf::Left(true)),
				code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
				..ServerCapabilities::default()
			},
		})
	}

	async fn initialized(&self, _: InitializedParams) {
		self.client.log_message(MessageType::INFO, "initialized!").await;
	}

	async fn shutdown(&self) -> Result<()> {
		self.client
			.log_message(MessageType::INFO, format!("ic10ls server {} shutting down.", buildinfo::PKG_VERSION))
			.await;
		Ok(())
	}

	async fn did_open(&self, params: DidOpenTextDocumentParams) {
		self.on_change(params.text_document.uri, params.text_document.text.into(), params.text_document.version)
			.await;
	}

	async fn did_change(&self, mut params: DidChangeTextDocumentParams) {
		// Full synchronization: the last change carries the whole document.
		if let Some(change) = params.content_changes.pop() {
			self.on_change(params.text_document.uri, change.text.into(), params.text_document.version).await;
		}
	}

	async fn did_close(&self, params: DidCloseTextDocumentParams) {
		let uri = params.text_document.uri;
		self.documents.remove(&uri);
		let _publishing = self.publishing.lock().await;
		self.workspace.remove(&uri);
		self.client.publish_diagnostics(uri, Vec::new(), None).await;
	}

	async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
		let settings = params.settings.get("ic10").unwrap_or(&params.settings).clone();
		let update = match serde_json::from_value::<ConfigurationUpdate>(settings) {
			Ok(update) => update,
			Err(error) => {
				self.client.log_message(MessageType::WARNING, format!("ignoring invalid settings: {error}")).await;
				return;
			},
		};
		{
			let mut analyzer = self.analyzer.write();
			let mut updated = Analyzer::clone(&analyzer);
			update.apply(&mut updated.config);
			log::info!("configuration changed to {:?}", updated.config);
			*analyzer = Arc::new(updated);
		}

		let documents = self
			.documents
			.iter()
			.map(|entry| (entry.key().clone(), entry.value().clone()))
			.collect::<Vec<_>>();
		for (uri, (text, version)) in documents {
			self.on_change(uri, text, version).await;
		}
	}

	async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
		let analysis = self.analysis_for_uri(&params.text_document_position_params.text_document.uri)?;
		let text = &analysis.file.source.text;
		let offset = lsp_position_to_source_offset(params.text_document_position_params.position, text);

		if let Some(occurrence) = analysis.file.occurrence_at(offset) {
			let mut value = match &occurrence.alias {
				Some(alias) => format!("**{}** (`{}`)", alias, occurrence.register),
				None => format!("**{}**", occurrence.register),
			};
			value.push_str(&format!("\n\nholds {} here", kind_label(occurrence.kind)));
			if let Some(summary) = analysis.file.summary_of(occurrence.register) {
				value.push_str(&format!(
					"\n\nassigned {} times, read {} times",
					summary.assignments, summary.reads
				));
				for (line, statement) in &summary.history {
					value.push_str(&format!("\n- line {line}: `{statement}`"));
				}
			}
			return Ok(Some(markdown_hover(value, span_to_lsp_range(occurrence.span, text))));
		}

		Ok(analysis.file.hash_at(offset).map(|hash| {
			let value = hash.device().map_or_else(
				|| format!("`{}`: unknown device hash", hash.value),
				|device| format!("**{}**\n\n`{}` = `{}`", device.display, device.canonical, device.hash),
			);
			markdown_hover(value, span_to_lsp_range(hash.span, text))
		}))
	}

	async fn inlay_hint(&self, params: InlayHintParams) -> Result<Option<Vec<InlayHint>>> {
		let analysis = self.analysis_for_uri(&params.text_document.uri)?;
		let text = &analysis.file.source.text;
		let start = lsp_position_to_source_offset(params.range.start, text);
		let end = lsp_position_to_source_offset(params.range.end, text);

		let hints = analysis
			.file
			.hashes()
			.into_iter()
			.filter(|hash| hash.span.offset() >= start && hash.span.offset() <= end)
			.filter_map(|hash| {
				let device = hash.device()?;
				Some(InlayHint {
					position:      source_offset_to_lsp_position(hash.span.offset() + hash.span.len(), text)?,
					label:         InlayHintLabel::String(device.display.to_string()),
					kind:          None,
					text_edits:    None,
					tooltip:       Some(InlayHintTooltip::String(device.canonical.to_string())),
					padding_left:  Some(true),
					padding_right: None,
					data:          None,
				})
			})
			.collect();
		Ok(Some(hints))
	}

	async fn goto_definition(&self, params: GotoDefinitionParams) -> Result<Option<GotoDefinitionResponse>> {
		let uri = &params.text_document_position_params.text_document.uri;
		let analysis = self.analysis_for_uri(uri)?;
		let text = &analysis.file.source.text;
		let offset = lsp_position_to_source_offset(params.text_document_position_params.position, text);

		let Some(identifier) = analysis.file.identifier_at(offset) else {
			return Ok(None);
		};
		let mut locations = analysis
			.file
			.definition_spans_of(&identifier)
			.into_iter()
			.filter_map(|span| Some(Location::new(uri.clone(), span_to_lsp_range(span, text)?)))
			.collect::<Vec<_>>();
		log::debug!("definitions of {identifier}: {locations:?}");
		Ok(match locations.len() {
			0 => None,
			1 => locations.pop().map(GotoDefinitionResponse::Scalar),
			_ => Some(GotoDefinitionResponse::Array(locations)),
		})
	}

	async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
		let uri = params.text_document.uri;
		let analysis = self.analysis_for_uri(&uri)?;
		let text = &analysis.file.source.text;

		let actions = params
			.context
			.diagnostics
			.iter()
			.filter_map(|diagnostic| {
				let register = diagnostic.data.as_ref()?.get("register")?.as_str()?;
				let edit = add_to_directive(&analysis.suppressions, register)?;
				let range = match edit.replace {
					Some(span) => span_to_lsp_range(span, text)?,
					None => Range::new(Position::new(0, 0), Position::new(0, 0)),
				};
				let changes = HashMap::from([(uri.clone(), vec![TextEdit::new(range, edit.new_text)])]);
				Some(CodeActionOrCommand::CodeAction(CodeAction {
					title: format!("Ignore diagnostics for {register}"),
					kind: Some(CodeActionKind::QUICKFIX),
					diagnostics: Some(vec![diagnostic.clone()]),
					edit: Some(WorkspaceEdit::new(changes)),
					..CodeAction::default()
				}))
			})
			.collect::<Vec<_>>();
		Ok(Some(actions))
	}
}

fn markdown_hover(value: String, range: Option<Range>) -> Hover {
	Hover { contents: HoverContents::Markup(MarkupContent { kind: MarkupKind::Markdown, value }), range }
}

impl Backend {
	async fn on_change(&self, uri: Url, text: SharedStr, version: i32) {
		self.documents.insert(uri.clone(), (text.clone(), version));
		let source_code = Arc::new(uri.to_file_path().map_or_else(
			|()| SourceFile::new(&text, uri.as_str()),
			|path| SourceFile::new_from_path(&text, &path),
		));

		let ticket = self.workspace.begin(uri.clone(), version);
		let analyzer = self.analyzer.read().clone();
		let token = ticket.token.clone();
		let result = tokio::task::spawn_blocking(move || analyzer.analyze(&source_code, &token)).await;

		match result {
			Ok(Ok(analysis)) =>
				if let Some(analysis) = self.workspace.commit(&ticket, analysis) {
					let diagnostics = analysis
						.diagnostics
						.iter()
						.flat_map(|diagnostic| semantic_error_to_lsp_diagnostics(diagnostic, &analysis.file.source.text))
						.collect();
					let _publishing = self.publishing.lock().await;
					// A newer pass may have committed and published while this one waited.
					if self.workspace.is_current(&ticket) {
						self.client.publish_diagnostics(uri, diagnostics, Some(version)).await;
					}
				},
			Ok(Err(cancelled)) => log::debug!("{uri} version {version}: {cancelled}"),
			Err(error) =>
				self.client.log_message(MessageType::ERROR, format!("analysis of {uri} failed: {error}")).await,
		}
	}

	fn analysis_for_uri(&self, uri: &Url) -> Result<Arc<Analysis>> {
		self.workspace.latest(uri).ok_or_else(|| tower_lsp::jsonrpc::Error {
			code:    tower_lsp::jsonrpc::ErrorCode::InvalidParams,
			data:    None,
			message: format!("no analyzed document found for {uri}").into(),
		})
	}
}

#[tokio::main]
async fn main() {
	env_logger::init();

	let stdin = tokio::io::stdin();
	let stdout = tokio::io::stdout();

	let (service, socket) = LspService::build(|client| Backend {
		client,
		documents: DashMap::new(),
		workspace: Workspace::new(),
		analyzer: RwLock::new(Arc::new(Analyzer::default())),
		publishing: tokio::sync::Mutex::new(()),
	})
	.finish();

	Server::new(stdin, stdout, socket).serve(service).await;
}
