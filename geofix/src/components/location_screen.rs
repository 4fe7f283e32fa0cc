//! The location screen: one button and the location fields
//!
//! FRAMEWORK PATTERN: Component Trait
//! - Props<'a>: Read-only data for rendering (borrowed from state)
//! - handle_event: Receives EventKind, returns `Vec<Action>`
//! - render: Pure function of props - no side effects
//! - Focus handled via props, so the permission prompt can take input

use crossterm::event::KeyCode;
use geofix_core::EventKind;
use ratatui::prelude::{Frame, Rect};
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{Component, HelpBar, HelpBarProps};
use crate::action::Action;
use crate::state::{AppState, SPINNER_TICKS};

pub const LOCATION_ICON: &str = "📍 ";
pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];

const BUTTON: &str = "[ Get location ]";
const PLACEHOLDER: &str = "Press the button to locate this device";

pub struct LocationScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct LocationScreen;

impl LocationScreen {
    fn field<'a>(label: &'a str, value: Option<&'a str>) -> Line<'a> {
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::DarkGray)),
            Span::styled(value.unwrap_or("-"), Style::default().fg(Color::White)),
        ])
    }
}

impl Component<Action> for LocationScreen {
    type Props<'a> = LocationScreenProps<'a>;

    #[allow(refining_impl_trait)]
    fn handle_event<'p>(&mut self, event: &EventKind, props: Self::Props<'p>) -> Vec<Action>
    where
        'p:,
    {
        if !props.is_focused {
            return vec![];
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('g') | KeyCode::Char(' ') | KeyCode::Enter | KeyCode::F(5) => {
                    vec![Action::LocationRequest]
                }
                KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
                _ => vec![],
            },
            _ => vec![],
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: LocationScreenProps<'_>) {
        let state = props.state;

        let loading_indicator = if state.is_loading() {
            let frame_index = (state.tick_count / SPINNER_TICKS) as usize;
            format!(" {} ", SPINNERS[frame_index % SPINNERS.len()])
        } else {
            String::new()
        };

        let outer_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(format!(" {}Location{}", LOCATION_ICON, loading_indicator))
            .title_style(Style::default().fg(Color::Cyan).bold())
            .title_alignment(Alignment::Center);

        frame.render_widget(outer_block.clone(), area);
        let inner = outer_block.inner(area);

        let chunks = Layout::vertical([
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Notice
            Constraint::Length(1), // Help bar
        ])
        .split(inner);

        let button_style = if props.is_focused {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let location = match state.location_text.as_deref() {
            Some(text) => Span::styled(text, Style::default().fg(Color::Yellow).bold()),
            None => Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray).italic()),
        };

        let body = vec![
            Line::from(Span::styled(BUTTON, button_style)),
            Line::default(),
            Line::from(location),
            Line::default(),
            Self::field("timeStart: ", state.start_time.as_deref()),
            Self::field("endTime: ", state.end_time.as_deref()),
        ];

        // Vertically center the body
        let top = chunks[0]
            .height
            .saturating_sub(body.len() as u16)
            .saturating_div(2);
        let body_area = Rect {
            y: chunks[0].y + top,
            height: chunks[0].height - top,
            ..chunks[0]
        };
        frame.render_widget(Paragraph::new(body).alignment(Alignment::Center), body_area);

        if let Some(active) = state.notice {
            let notice = Line::from(Span::styled(
                active.notice.to_string(),
                Style::default().fg(Color::Red).bold(),
            ))
            .centered();
            frame.render_widget(Paragraph::new(notice), chunks[1]);
        }

        let mut help = HelpBar;
        help.render(
            frame,
            chunks[2],
            HelpBarProps {
                prompt_open: state.prompt.is_some(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofix_core::testing::*;
    use geofix_core::{FetchRequest, Notice};

    use crate::state::ActiveNotice;

    fn props(state: &AppState) -> LocationScreenProps<'_> {
        LocationScreenProps {
            state,
            is_focused: true,
        }
    }

    #[test]
    fn test_handle_event_request_keys() {
        let mut component = LocationScreen;
        let state = AppState::default();

        for k in ["g", "enter", "space", "f5"] {
            let actions = component.handle_event(&EventKind::Key(key(k)), props(&state));
            actions.assert_count(1);
            actions.assert_first(Action::LocationRequest);
        }
    }

    #[test]
    fn test_handle_event_quit() {
        let mut component = LocationScreen;
        let state = AppState::default();

        let actions = component.handle_event(&EventKind::Key(key("q")), props(&state));
        actions.assert_first(Action::Quit);
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = LocationScreen;
        let state = AppState::default();
        let props = LocationScreenProps {
            state: &state,
            is_focused: false,
        };

        let actions = component.handle_event(&EventKind::Key(key("g")), props);
        actions.assert_empty();
    }

    #[test]
    fn test_render_before_first_result() {
        let mut render = RenderHarness::new(60, 16);
        let mut component = LocationScreen;
        let state = AppState::default();

        let output = render.render_to_string_plain(|frame| {
            component.render(frame, frame.area(), props(&state));
        });

        assert!(output.contains("[ Get location ]"));
        assert!(output.contains(PLACEHOLDER));
        assert!(output.contains("timeStart: -"));
    }

    #[test]
    fn test_render_found() {
        let mut render = RenderHarness::new(60, 16);
        let mut component = LocationScreen;
        let state = AppState {
            location_text: Some("Lat: 37.422, Lng: -122.084".into()),
            start_time: Some("09:15:02.117".into()),
            end_time: Some("09:15:04.120".into()),
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            component.render(frame, frame.area(), props(&state));
        });

        assert!(output.contains("Lat: 37.422, Lng: -122.084"));
        assert!(output.contains("timeStart: 09:15:02.117"));
        assert!(output.contains("endTime: 09:15:04.120"));
    }

    #[test]
    fn test_render_loading_spinner() {
        let mut render = RenderHarness::new(60, 16);
        let mut component = LocationScreen;
        let mut state = AppState::default();
        state.phase.start(FetchRequest::from_raw(1));

        let output = render.render_to_string_plain(|frame| {
            component.render(frame, frame.area(), props(&state));
        });

        assert!(output.contains(SPINNERS[0]));
    }

    #[test]
    fn test_render_notice() {
        let mut render = RenderHarness::new(60, 16);
        let mut component = LocationScreen;
        let state = AppState {
            notice: Some(ActiveNotice {
                notice: Notice::PermissionDenied,
                remaining_ticks: 5,
            }),
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            component.render(frame, frame.area(), props(&state));
        });

        assert!(output.contains("Location permission denied"));
    }
}
