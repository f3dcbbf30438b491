use std::io;
use std::sync::Mutex;

use buildmatrix::status::TerminalBackend;

/// One call made against a [`RecordingTerminal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermEvent {
    Reserve,
    Draw { text: String, frame: usize },
    Restore,
}

/// Terminal backend that records every call instead of writing escape codes.
#[derive(Debug)]
pub struct RecordingTerminal {
    interactive: bool,
    events: Mutex<Vec<TermEvent>>,
}

impl RecordingTerminal {
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn piped() -> Self {
        Self {
            interactive: false,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<TermEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&TermEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }

    pub fn draw_count(&self) -> usize {
        self.count(|e| matches!(e, TermEvent::Draw { .. }))
    }

    /// Texts of all draws, in order.
    pub fn drawn_texts(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                TermEvent::Draw { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: TermEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl TerminalBackend for RecordingTerminal {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn reserve_bottom_row(&self) -> io::Result<()> {
        self.push(TermEvent::Reserve);
        Ok(())
    }

    fn draw_bar(&self, text: &str, frame: usize) -> io::Result<()> {
        self.push(TermEvent::Draw {
            text: text.to_string(),
            frame,
        });
        Ok(())
    }

    fn restore(&self) -> io::Result<()> {
        self.push(TermEvent::Restore);
        Ok(())
    }
}
