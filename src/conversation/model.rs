//! Display records consumed by the chat views.

use serde::{Deserialize, Serialize};

/// Identifier of a message within one conversation.
pub type MessageId = u64;

/// One turn of the conversation, as the views see it.
///
/// For user messages `is_loading` and `search_info` carry no meaning and are
/// never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique within the conversation, ascending in append order.
    pub id: MessageId,
    /// Whether the user authored this message.
    pub is_user: bool,
    /// Text content; may be empty while a reply is pending.
    #[serde(default)]
    pub content: String,
    /// Whether the assistant reply is still waiting for its first output.
    #[serde(default)]
    pub is_loading: bool,
    /// Progress of the retrieval run backing this reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_info: Option<SearchInfo>,
}

impl Message {
    /// A message typed by the user.
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            is_user: true,
            content: content.into(),
            is_loading: false,
            search_info: None,
        }
    }

    /// A finished assistant message.
    pub fn assistant(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            is_user: false,
            content: content.into(),
            is_loading: false,
            search_info: None,
        }
    }

    /// An assistant reply that has not produced anything yet.
    pub fn assistant_pending(id: MessageId) -> Self {
        Self {
            id,
            is_user: false,
            content: String::new(),
            is_loading: true,
            search_info: Some(SearchInfo::default()),
        }
    }

    /// Attach search progress to this message.
    #[must_use]
    pub fn with_search_info(mut self, info: SearchInfo) -> Self {
        self.search_info = Some(info);
        self
    }

    /// Mark this message as loading.
    #[must_use]
    pub fn loading(mut self) -> Self {
        self.is_loading = true;
        self
    }
}

/// Phase tag of an in-flight retrieval run.
///
/// Tags the views do not know about are kept as [`Stage::Other`] so newer
/// backends never break rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    /// The backend is running a search.
    Searching,
    /// Results arrived and sources are being read.
    Reading,
    /// The search failed.
    Error,
    /// The answer is being written. Not rendered.
    Writing,
    /// Any other tag.
    Other(String),
}

impl Stage {
    /// Wire name of this stage.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Searching => "searching",
            Self::Reading => "reading",
            Self::Error => "error",
            Self::Writing => "writing",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Stage {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "searching" => Self::Searching,
            "reading" => Self::Reading,
            "error" => Self::Error,
            "writing" => Self::Writing,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for Stage {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// Search progress attached to an assistant reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchInfo {
    /// Stages reached so far, in arrival order, without duplicates.
    #[serde(default)]
    pub stages: Vec<Stage>,
    /// Query the backend searched for.
    #[serde(default)]
    pub query: String,
    /// Source URLs the search returned.
    #[serde(default)]
    pub urls: Vec<String>,
}

impl SearchInfo {
    /// Progress of a search that just started.
    pub fn searching(query: impl Into<String>) -> Self {
        Self {
            stages: vec![Stage::Searching],
            query: query.into(),
            urls: Vec::new(),
        }
    }

    /// Whether `stage` has been reached.
    pub fn has(&self, stage: &Stage) -> bool {
        self.stages.contains(stage)
    }

    /// Record `stage`, keeping the sequence set-like.
    pub fn push_stage(&mut self, stage: Stage) {
        if !self.has(&stage) {
            self.stages.push(stage);
        }
    }

    /// Builder form of [`SearchInfo::push_stage`].
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<Stage>) -> Self {
        self.push_stage(stage.into());
        self
    }

    /// Builder form for the result URLs.
    #[must_use]
    pub fn with_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }
}

/// Whether `text` may be sent: anything but blank.
pub fn can_submit(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Label shown for a source link.
///
/// The host of `url` without a leading `www.`; the raw input when it does not
/// parse as a URL or has no host.
pub fn source_label(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) if !host.is_empty() => host.strip_prefix("www.").unwrap_or(host).to_string(),
            _ => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_label_strips_www() {
        assert_eq!(source_label("https://www.law.cornell.edu/wex/adverse_possession"), "law.cornell.edu");
    }

    #[test]
    fn test_source_label_drops_scheme_path_and_query() {
        let label = source_label("http://supreme.justia.com/cases/federal/us/?q=tort#top");
        assert_eq!(label, "supreme.justia.com");
    }

    #[test]
    fn test_source_label_only_strips_leading_www() {
        assert_eq!(source_label("https://law.www.example.org/"), "law.www.example.org");
        assert_eq!(source_label("https://wwwlaw.example.org/"), "wwwlaw.example.org");
    }

    #[test]
    fn test_source_label_keeps_port_out() {
        assert_eq!(source_label("https://www.example.com:8443/doc"), "example.com");
    }

    #[test]
    fn test_source_label_falls_back_to_raw_input() {
        for raw in ["not a url", "example.com/path", "", "http://"] {
            assert_eq!(source_label(raw), raw);
        }
    }

    #[test]
    fn test_source_label_hostless_url_falls_back() {
        assert_eq!(source_label("mailto:clerk@court.gov"), "mailto:clerk@court.gov");
    }

    #[test]
    fn test_stage_roundtrip_keeps_unknown_tags() {
        let info: SearchInfo = serde_json::from_str(
            r#"{"stages":["searching","summarizing","reading"],"query":"q","urls":[]}"#,
        )
        .unwrap();
        assert_eq!(
            info.stages,
            vec![
                Stage::Searching,
                Stage::Other("summarizing".to_string()),
                Stage::Reading
            ]
        );

        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains(r#""summarizing""#));
    }

    #[test]
    fn test_push_stage_is_set_like() {
        let mut info = SearchInfo::searching("easements");
        info.push_stage(Stage::Reading);
        info.push_stage(Stage::Searching);
        info.push_stage(Stage::Reading);
        assert_eq!(info.stages, vec![Stage::Searching, Stage::Reading]);
    }

    #[test]
    fn test_message_uses_camel_case_fields() {
        let json = serde_json::to_value(Message::assistant_pending(2)).unwrap();
        assert_eq!(json["isUser"], false);
        assert_eq!(json["isLoading"], true);
        assert!(json["searchInfo"]["stages"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_can_submit_rejects_blank_text() {
        assert!(!can_submit(""));
        assert!(!can_submit("   \t\n"));
        assert!(can_submit("  easement  "));
    }
}
