use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;

const SCREEN_KEYS: [(&str, &str); 2] = [("g", "get location"), ("q", "quit")];
const PROMPT_KEYS: [(&str, &str); 2] = [("y", "allow"), ("n", "deny")];

pub struct HelpBar;

pub struct HelpBarProps {
    /// Show the prompt's keys instead of the screen's
    pub prompt_open: bool,
}

impl Component<Action> for HelpBar {
    type Props<'a> = HelpBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let keys = if props.prompt_open {
            &PROMPT_KEYS
        } else {
            &SCREEN_KEYS
        };

        let mut spans = Vec::with_capacity(keys.len() * 2);
        for (key, label) in keys {
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan).bold()));
            spans.push(Span::styled(
                format!(" {}  ", label),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans).centered()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofix_core::testing::RenderHarness;

    fn render(prompt_open: bool) -> String {
        let mut render = RenderHarness::new(40, 1);
        render.render_to_string_plain(|frame| {
            HelpBar.render(frame, frame.area(), HelpBarProps { prompt_open });
        })
    }

    #[test]
    fn test_screen_keys() {
        let output = render(false);
        assert!(output.contains("g get location"));
        assert!(output.contains("q quit"));
    }

    #[test]
    fn test_prompt_keys() {
        let output = render(true);
        assert!(output.contains("y allow"));
        assert!(!output.contains("get location"));
    }
}
