//! Wizard step view: step index, current step panel, progress and key hints.
//!
//! The view only reads the controller when drawing and only calls its
//! operations when handling keys; it keeps no wizard state of its own.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::products::Product;
use crate::ui::announcer::Announcer;
use crate::wizard::{StepDefinition, StepId, WizardController};

/// What the app loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    Continue,
    Quit,
}

pub struct WizardView {
    product: Product,
    announcer: Announcer,
}

/// Digit keys jump straight to a step; `0` means step 10
fn digit_to_step(c: char) -> Option<StepId> {
    match c.to_digit(10)? {
        0 => Some(10),
        d => Some(d),
    }
}

impl WizardView {
    /// Create the view and start announcing changes to `wizard`
    pub fn new(product: Product, wizard: &mut WizardController) -> Self {
        let announcer = Announcer::new();
        announcer.attach(wizard);
        let (index, total) = wizard.progress();
        announcer.announce(format!(
            "Step {} of {}: {}",
            index + 1,
            total,
            wizard.current_step().name
        ));
        Self { product, announcer }
    }

    pub fn announcement(&self) -> Option<String> {
        self.announcer.latest()
    }

    /// Map a key press onto a wizard operation
    pub fn handle_key(&mut self, key: KeyCode, wizard: &mut WizardController) -> ViewAction {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Quit,
            KeyCode::Enter => self.complete_and_continue(wizard),
            KeyCode::Right | KeyCode::Char('n') => {
                wizard.next_step();
            }
            KeyCode::Left | KeyCode::Backspace | KeyCode::Char('b') => {
                wizard.previous_step();
            }
            KeyCode::Char('r') => wizard.reset(),
            KeyCode::Char(c) => {
                if let Some(step_id) = digit_to_step(c) {
                    if let Err(err) = wizard.go_to_step(step_id) {
                        self.announcer.announce(err.to_string());
                    }
                }
            }
            _ => {}
        }
        ViewAction::Continue
    }

    fn complete_and_continue(&mut self, wizard: &mut WizardController) {
        let current = wizard.current_step_id();
        if let Err(err) = wizard.complete_step(current) {
            self.announcer.announce(err.to_string());
            return;
        }
        if wizard.is_final_step() {
            if wizard.is_complete() {
                self.announcer
                    .announce("All steps complete. Press r to restart the demo");
            }
        } else {
            wizard.next_step();
        }
    }

    pub fn render(&self, frame: &mut Frame, wizard: &WizardController) {
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    self.product.label(),
                    Style::default()
                        .fg(Color::LightCyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" Demo "),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(frame.area());
        frame.render_widget(block, frame.area());

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // Tagline
                Constraint::Length(1), // Spacer
                Constraint::Min(8),    // Steps + detail
                Constraint::Length(3), // Progress gauge
                Constraint::Length(1), // Status line
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        let tagline = Paragraph::new(Line::from(Span::styled(
            self.product.tagline(),
            Style::default().fg(Color::Gray),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(tagline, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[2]);

        self.render_step_index(frame, columns[0], wizard);
        self.render_current_step(frame, columns[1], wizard);
        self.render_progress(frame, rows[3], wizard);

        let status = self.announcer.latest().unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                status,
                Style::default().fg(Color::Yellow),
            ))),
            rows[4],
        );

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" complete  "),
            Span::styled("→/n", Style::default().fg(Color::Yellow)),
            Span::raw(" continue  "),
            Span::styled("←/b", Style::default().fg(Color::Yellow)),
            Span::raw(" back  "),
            Span::styled("1-0", Style::default().fg(Color::Yellow)),
            Span::raw(" jump  "),
            Span::styled("r", Style::default().fg(Color::Yellow)),
            Span::raw(" restart  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, rows[5]);
    }

    fn render_step_index(&self, frame: &mut Frame, area: Rect, wizard: &WizardController) {
        let current = wizard.current_step_id();
        let items: Vec<ListItem> = wizard
            .steps()
            .iter()
            .map(|step| ListItem::new(step_line(step, current, wizard.is_step_completed(step.id))))
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(" Steps ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(list, area);
    }

    fn render_current_step(&self, frame: &mut Frame, area: Rect, wizard: &WizardController) {
        let step = wizard.current_step();
        let (index, total) = wizard.progress();

        let mut title = vec![Span::styled(
            step.name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )];
        if step.is_new {
            title.push(Span::raw(" "));
            title.push(new_badge());
        }

        let completion = if wizard.is_step_completed(step.id) {
            Span::styled("✓ Completed", Style::default().fg(Color::Green))
        } else {
            Span::styled("Not completed yet", Style::default().fg(Color::DarkGray))
        };

        let lines = vec![
            Line::from(title),
            Line::from(Span::styled(
                format!("Step {} of {}", index + 1, total),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(step.description.clone()),
            Line::from(""),
            Line::from(completion),
            Line::from(""),
            Line::from(Span::styled(
                "Sample content only. No patient data is stored or sent.",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        ];

        let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(" Current Step ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(panel, area);
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect, wizard: &WizardController) {
        let done = wizard.completed_step_ids().len();
        let total = wizard.steps().len();
        let ratio = if total == 0 {
            0.0
        } else {
            done as f64 / total as f64
        };

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Progress "))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio)
            .label(format!("{}/{} steps complete", done, total));
        frame.render_widget(gauge, area);
    }
}

fn new_badge() -> Span<'static> {
    Span::styled(
        "NEW",
        Style::default()
            .fg(Color::Black)
            .bg(Color::LightMagenta)
            .add_modifier(Modifier::BOLD),
    )
}

fn step_line(step: &StepDefinition, current: StepId, completed: bool) -> Line<'static> {
    let marker = match (step.id == current, completed) {
        (true, _) => Span::styled("▶ ", Style::default().fg(Color::Cyan)),
        (false, true) => Span::styled("✓ ", Style::default().fg(Color::Green)),
        (false, false) => Span::raw("  "),
    };

    let name_style = if step.id == current {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else if completed {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![
        marker,
        Span::styled(format!("{:>2}. ", step.id), Style::default().fg(Color::DarkGray)),
        Span::styled(step.name.clone(), name_style),
    ];
    if step.is_new {
        spans.push(Span::raw(" "));
        spans.push(new_badge());
    }
    Line::from(spans)
}
