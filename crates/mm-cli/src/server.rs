use std::sync::Arc;

use chrono::{Duration, Utc};
use mm_core::{
    EngineConfig, Entry, PatternReport, analyze, detect_themes, find_patterns_at,
    get_top_keywords,
};
use mm_store::{EntryStore, Fingerprint};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::compose::{EntryKind, compose_entry};

/// A cached report is reused for at most this long, even if the store is
/// unchanged, since pattern classification depends on the current time.
const REPORT_TTL_SECS: i64 = 60;

#[derive(Clone)]
pub struct MmServer {
    state: Arc<Mutex<ServerState>>,
    tool_router: ToolRouter<Self>,
}

struct ServerState {
    store: EntryStore,
    config: EngineConfig,
    cached: Option<(Fingerprint, PatternReport)>,
}

impl ServerState {
    fn entries(&self) -> Result<Vec<Entry>, McpError> {
        self.store
            .load_entries()
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    /// Report for the current store contents, recomputed only when the store
    /// fingerprint has moved or the cached copy has expired.
    fn report(&mut self) -> Result<PatternReport, McpError> {
        let fingerprint = self
            .store
            .fingerprint()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let now = Utc::now();

        if let Some((cached_at, report)) = &self.cached
            && *cached_at == fingerprint
            && now - report.generated_at < Duration::seconds(REPORT_TTL_SECS)
        {
            return Ok(report.clone());
        }

        let entries = self.entries()?;
        let report = analyze(&entries, &self.config, now);
        tracing::debug!(
            "report rebuilt: {} entries, revision {}",
            fingerprint.entries,
            fingerprint.revision
        );
        self.cached = Some((fingerprint, report.clone()));
        Ok(report)
    }
}

impl MmServer {
    pub fn new(store: EntryStore, config: EngineConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(ServerState {
                store,
                config,
                cached: None,
            })),
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_default(),
    )]))
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct KeywordsRequest {
    /// Maximum number of keywords to return (default from config, usually 20)
    limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ThemesRequest {
    /// Minimum number of keywords in a theme (default 2)
    min_size: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PatternsRequest {
    /// Time window in days used to classify emerging and fading keywords (default 30)
    window_days: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AddEntryRequest {
    /// "reflection" or "incident"
    kind: EntryKind,
    /// Entry text: the answer for a reflection, the notes for an incident
    text: String,
    /// Reflection stage the text answers (default "situation")
    stage: Option<String>,
    /// ISO-8601 date of the entry (default now)
    date: Option<String>,
}

#[tool_router]
impl MmServer {
    #[tool(
        description = "Most frequent journal keywords with entry counts, first/last seen dates and the ids of the entries that mention them."
    )]
    async fn mm_keywords(
        &self,
        Parameters(req): Parameters<KeywordsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let keywords = match req.limit {
            Some(limit) if limit > state.config.keyword_limit => {
                get_top_keywords(&state.entries()?, limit)
            }
            Some(limit) => {
                let mut keywords = state.report()?.keywords;
                keywords.truncate(limit);
                keywords
            }
            None => state.report()?.keywords,
        };
        json_result(&keywords)
    }

    #[tool(
        description = "Themes: groups of keywords that repeatedly appear in the same entries. Each keyword belongs to at most one theme."
    )]
    async fn mm_themes(
        &self,
        Parameters(req): Parameters<ThemesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let themes = match req.min_size {
            Some(min) if min != state.config.min_theme_size => {
                detect_themes(&state.entries()?, min)
            }
            _ => state.report()?.themes,
        };
        json_result(&themes)
    }

    #[tool(
        description = "Temporal patterns: keywords classified as recurring, emerging or fading relative to a time window, with a trend and the span of dates they cover."
    )]
    async fn mm_patterns(
        &self,
        Parameters(req): Parameters<PatternsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let patterns = match req.window_days {
            Some(window) if window != state.config.time_window_days => {
                find_patterns_at(&state.entries()?, window, Utc::now())
            }
            _ => state.report()?.patterns,
        };
        json_result(&patterns)
    }

    #[tool(
        description = "Keyword clusters: the best-connected keywords, each grouped with its strongest co-occurring partners."
    )]
    async fn mm_clusters(&self) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        json_result(&state.report()?.clusters)
    }

    #[tool(
        description = "Full pattern report: keywords, themes, temporal patterns and clusters over the whole journal in one call."
    )]
    async fn mm_report(&self) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        json_result(&state.report()?)
    }

    #[tool(description = "Add a reflection or incident entry to the journal.")]
    async fn mm_add_entry(
        &self,
        Parameters(req): Parameters<AddEntryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let entry = compose_entry(req.kind, &req.text, req.stage.as_deref(), req.date.as_deref())
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let state = self.state.lock().await;
        state
            .store
            .upsert_entry(&entry)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let count = state
            .store
            .count()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        tracing::info!("added {} entry {}", entry.kind(), entry.id);

        json_result(&serde_json::json!({
            "id": entry.id,
            "date": entry.date,
            "entries": count,
        }))
    }
}

#[tool_handler]
impl ServerHandler for MmServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Pattern analysis over a personal reflection journal.\n\n\
                 - mm_report gives everything at once; prefer it for an overview.\n\
                 - mm_keywords, mm_themes, mm_patterns and mm_clusters return one view each \
                   and accept optional tuning parameters.\n\
                 - mm_add_entry records a new reflection or incident. Subsequent queries include it.\n\
                 - Results are derived from word counts only. Present them as observations, not diagnoses."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_server() -> MmServer {
        let store = EntryStore::open_in_memory().unwrap();
        store
            .import_json_str(
                r#"[
                  {"id": "a", "date": "2026-03-01", "type": "incident", "notes": "handover night team"},
                  {"id": "b", "date": "2026-03-02", "type": "incident", "notes": "handover night team"},
                  {"id": "c", "date": "2026-03-03", "type": "reflection",
                   "answers": {"situation": "family dinner"}}
                ]"#,
            )
            .unwrap();
        MmServer::new(store, EngineConfig::default())
    }

    fn text_from_result(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    fn parse_result(result: &CallToolResult) -> serde_json::Value {
        let text = text_from_result(result);
        serde_json::from_str(&text).expect("handler should return valid JSON")
    }

    #[tokio::test]
    async fn test_mm_keywords_limit() {
        let server = make_server();
        let json = parse_result(
            &server
                .mm_keywords(Parameters(KeywordsRequest { limit: Some(2) }))
                .await
                .unwrap(),
        );
        let keywords = json.as_array().unwrap();
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0]["word"], "handover");
        assert_eq!(keywords[0]["count"], 2);
        assert_eq!(keywords[0]["firstSeen"], "2026-03-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_mm_keywords_above_config_limit() {
        let server = make_server();
        let json = parse_result(
            &server
                .mm_keywords(Parameters(KeywordsRequest { limit: Some(100) }))
                .await
                .unwrap(),
        );
        assert_eq!(json.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_mm_themes() {
        let server = make_server();
        let json = parse_result(
            &server
                .mm_themes(Parameters(ThemesRequest { min_size: None }))
                .await
                .unwrap(),
        );
        let themes = json.as_array().unwrap();
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0]["keywords"][0], "handover");
        assert_eq!(themes[0]["count"], 2);
    }

    #[tokio::test]
    async fn test_mm_report_shape() {
        let server = make_server();
        let json = parse_result(&server.mm_report().await.unwrap());
        assert_eq!(json["entryCount"], 3);
        for key in ["keywords", "themes", "patterns", "clusters"] {
            assert!(json[key].is_array(), "{key} should be an array");
        }
    }

    #[tokio::test]
    async fn test_add_entry_invalidates_cache() {
        let server = make_server();
        let before = parse_result(&server.mm_report().await.unwrap());
        assert_eq!(before["entryCount"], 3);

        let added = parse_result(
            &server
                .mm_add_entry(Parameters(AddEntryRequest {
                    kind: EntryKind::Incident,
                    text: "handover went smoothly".to_string(),
                    stage: None,
                    date: Some("2026-03-04".to_string()),
                }))
                .await
                .unwrap(),
        );
        assert_eq!(added["entries"], 4);

        let after = parse_result(&server.mm_report().await.unwrap());
        assert_eq!(after["entryCount"], 4);
        assert_eq!(after["keywords"][0]["word"], "handover");
        assert_eq!(after["keywords"][0]["count"], 3);
    }

    #[tokio::test]
    async fn test_add_entry_rejects_bad_date() {
        let server = make_server();
        let result = server
            .mm_add_entry(Parameters(AddEntryRequest {
                kind: EntryKind::Reflection,
                text: "something".to_string(),
                stage: Some("learning".to_string()),
                date: Some("last tuesday".to_string()),
            }))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_report_cached_while_unchanged() {
        let server = make_server();
        let first = parse_result(&server.mm_report().await.unwrap());
        let second = parse_result(&server.mm_report().await.unwrap());
        assert_eq!(first["generatedAt"], second["generatedAt"]);
    }
}
