//! Enum-driven form view: every visible property is derived from [`UiState`].

use std::fmt;

pub const TRIGGER_LABEL: &str = "Bypass";
pub const SUBMITTING_LABEL: &str = "Bypassing...";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Submitting,
    Success {
        link: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerView {
    pub enabled: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Success,
    Error,
}

impl ResultKind {
    /// Style marker applied to the result panel.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanel {
    pub kind: ResultKind,
    pub text: String,
    pub link: Option<String>,
}

impl ResultPanel {
    /// Markup for an HTML result area. The link opens in a new browsing
    /// context without opener or referrer.
    pub fn to_html(&self) -> String {
        match (&self.kind, &self.link) {
            (ResultKind::Success, Some(link)) => {
                let link = escape_html(link);
                format!(
                    "<strong>Success!</strong> Direct Link:<br><a href=\"{link}\" target=\"_blank\" rel=\"noopener noreferrer\">{link}</a>"
                )
            }
            _ => escape_html(&self.text),
        }
    }
}

impl fmt::Display for ResultPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.class_name(), self.text)
    }
}

impl UiState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn trigger(&self) -> TriggerView {
        match self {
            Self::Submitting => TriggerView {
                enabled: false,
                label: SUBMITTING_LABEL,
            },
            _ => TriggerView {
                enabled: true,
                label: TRIGGER_LABEL,
            },
        }
    }

    pub fn loading_visible(&self) -> bool {
        self.is_submitting()
    }

    /// `None` while idle or submitting: the panel is hidden and unstyled.
    pub fn result_panel(&self) -> Option<ResultPanel> {
        match self {
            Self::Idle | Self::Submitting => None,
            Self::Success { link } => Some(ResultPanel {
                kind: ResultKind::Success,
                text: format!("Success! Direct Link: {link}"),
                link: Some(link.clone()),
            }),
            Self::Error { message } => Some(ResultPanel {
                kind: ResultKind::Error,
                text: message.clone(),
                link: None,
            }),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
