//! Terminal rendering of the form view.

use client_core::UiState;

pub fn render_state(state: &UiState, html: bool) -> String {
    let trigger = state.trigger();
    let mut line = if trigger.enabled {
        format!("[{}]", trigger.label)
    } else {
        format!("[{}] (disabled)", trigger.label)
    };

    if state.loading_visible() {
        line.push_str(" loading...");
    }

    if let Some(panel) = state.result_panel() {
        line.push(' ');
        if html {
            line.push_str(&format!(
                "<div class=\"{}\">{}</div>",
                panel.kind.class_name(),
                panel.to_html()
            ));
        } else {
            line.push_str(&panel.to_string());
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitting_shows_disabled_trigger_and_loader() {
        assert_eq!(
            render_state(&UiState::Submitting, false),
            "[Bypassing...] (disabled) loading..."
        );
    }

    #[test]
    fn idle_has_no_panel() {
        assert_eq!(render_state(&UiState::Idle, false), "[Bypass]");
    }

    #[test]
    fn settled_states_show_marker() {
        let err = UiState::Error {
            message: "Error: server exploded".into(),
        };
        assert_eq!(
            render_state(&err, false),
            "[Bypass] [error] Error: server exploded"
        );

        let ok = UiState::Success {
            link: "https://x/y".into(),
        };
        let html = render_state(&ok, true);
        assert!(html.starts_with("[Bypass] <div class=\"success\">"));
        assert!(html.contains("href=\"https://x/y\""));
    }
}
