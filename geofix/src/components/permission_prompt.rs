//! Modal that asks for location access
//!
//! Takes focus while open; the screen underneath stops receiving keys.

use crossterm::event::KeyCode;
use geofix_core::{EventKind, Permission};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::Component;
use crate::action::Action;

pub struct PermissionPromptProps {
    pub permission: Permission,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct PermissionPrompt;

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

impl Component<Action> for PermissionPrompt {
    type Props<'a> = PermissionPromptProps;

    #[allow(refining_impl_trait)]
    fn handle_event<'p>(&mut self, event: &EventKind, props: Self::Props<'p>) -> Vec<Action>
    where
        'p:,
    {
        if !props.is_focused {
            return vec![];
        }

        let EventKind::Key(key) = event else {
            return vec![];
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                vec![Action::PermissionAnswer(true)]
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                vec![Action::PermissionAnswer(false)]
            }
            _ => vec![],
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: PermissionPromptProps) {
        if area.width < 20 || area.height < 7 {
            return;
        }

        let modal_area = centered_rect(area.width.min(60), 7, area);
        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Permission ")
            .title_style(Style::default().fg(Color::Yellow).bold())
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Rgb(35, 35, 45)));

        let text = vec![
            Line::from(format!(
                "Allow geofix to access this device's {}?",
                props.permission
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("[y]", Style::default().fg(Color::Green).bold()),
                Span::raw(" Allow  "),
                Span::styled("[n]", Style::default().fg(Color::Red).bold()),
                Span::raw(" Deny"),
            ]),
        ];

        frame.render_widget(
            Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            modal_area,
        );
    }
}
