//! Two-screen page shell: a landing screen and the scanner.
//!
//! Navigation state is held explicitly here and passed to whoever renders it.
//! Opening the scanner fetches content once and builds a fresh detector;
//! leaving it drops both.

use crate::content::ContentSource;
use crate::detect::{DetectorConfig, SteadinessDetector};
use crate::scanner::ScannerSession;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Landing,
    Scanner,
}

pub struct Shell {
    screen: Screen,
    detector_config: DetectorConfig,
    content_source: Box<dyn ContentSource>,
    scanner: Option<ScannerSession>,
}

impl Shell {
    pub fn new(detector_config: DetectorConfig, content_source: Box<dyn ContentSource>) -> Self {
        Self {
            screen: Screen::Landing,
            detector_config,
            content_source,
            scanner: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn navigate(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        match screen {
            Screen::Landing => {
                self.scanner = None;
                log::debug!("navigated to landing");
            }
            Screen::Scanner => {
                let content = self.content_source.fetch_content();
                log::debug!(
                    "navigated to scanner ({} content source)",
                    self.content_source.name()
                );
                self.scanner = Some(ScannerSession::new(
                    SteadinessDetector::new(self.detector_config),
                    content,
                ));
            }
        }
        self.screen = screen;
    }

    /// Landing call to action.
    pub fn initialize_scanner(&mut self) -> Option<&mut ScannerSession> {
        self.navigate(Screen::Scanner);
        self.scanner.as_mut()
    }

    /// Scanner "Exit" control.
    pub fn exit(&mut self) {
        self.navigate(Screen::Landing);
    }

    pub fn scanner(&self) -> Option<&ScannerSession> {
        self.scanner.as_ref()
    }

    pub fn scanner_mut(&mut self) -> Option<&mut ScannerSession> {
        self.scanner.as_mut()
    }

    pub fn render_lines(&self) -> Vec<String> {
        match (&self.screen, &self.scanner) {
            (Screen::Scanner, Some(scanner)) => {
                let mut lines = vec!["HOLOHAND                                   [Exit]".to_string()];
                lines.extend(scanner.render_lines());
                lines
            }
            _ => vec![
                "The Future of Touchless Analytics".to_string(),
                "[ Initialize Scanner ]".to_string(),
            ],
        }
    }
}
