//! Terminal demo application: owns one session's wizard and drives the
//! draw/poll loop.

use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::config::Config;
use crate::ui::terminal_guard::{install_panic_hook, TerminalGuard};
use crate::ui::{ViewAction, WizardView};
use crate::wizard::WizardController;

pub struct App {
    config: Config,
    /// The one wizard for this terminal session
    wizard: WizardController,
    view: WizardView,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let steps = config.wizard_steps()?;
        let mut wizard =
            WizardController::new(steps).context("Invalid wizard step configuration")?;
        let view = WizardView::new(config.wizard.product, &mut wizard);

        tracing::info!(
            product = %config.wizard.product,
            steps = wizard.steps().len(),
            "Demo session started"
        );

        Ok(Self {
            config,
            wizard,
            view,
            should_quit: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        install_panic_hook();
        let (_guard, mut terminal) = TerminalGuard::enter()?;

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            terminal.draw(|f| self.view.render(f, &self.wizard))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        terminal.show_cursor()?;
        tracing::info!(
            completed = self.wizard.completed_step_ids().len(),
            progress = %self.wizard.format_progress(),
            "Demo session ended"
        );
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        if self.view.handle_key(code, &mut self.wizard) == ViewAction::Quit {
            self.should_quit = true;
        }
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::Product;
    use crate::wizard::StepDefinition;

    #[test]
    fn test_app_new_uses_configured_steps() {
        let mut config = Config::default();
        config.wizard.steps = vec![StepDefinition::new(1, "Intro"), StepDefinition::new(2, "Done")];

        let app = App::new(config).unwrap();
        assert_eq!(app.wizard().steps().len(), 2);
    }

    #[test]
    fn test_app_new_rejects_product_without_demo() {
        let mut config = Config::default();
        config.wizard.product = Product::Education;
        assert!(App::new(config).is_err());
    }

    #[test]
    fn test_app_new_rejects_invalid_steps() {
        let mut config = Config::default();
        config.wizard.steps = vec![StepDefinition::new(0, "Zero")];
        assert!(App::new(config).is_err());
    }

    #[test]
    fn test_quit_key_stops_loop() {
        let mut app = App::new(Config::default()).unwrap();
        app.handle_key(KeyCode::Enter);
        assert!(!app.should_quit);
        assert_eq!(app.wizard().current_step_id(), 2);

        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
