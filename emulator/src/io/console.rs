
use std::io::{stdin, stdout, BufRead, Write};

use crate::io::{Event, InputSource, Observer, Severity};

use log::{error, warn};

/// Prompts on stdout and reads a line from stdin. EOF cancels.
#[derive(Default, Clone, Copy)]
pub struct StdinInput();

impl InputSource for StdinInput {
    fn read_input(&mut self) -> Option<i32> {
        let mut line = String::new();
        loop {
            print!("? ");
            if let Err(e) = stdout().flush() {
                error!("Flushing prompt: {e}");
                return None;
            }

            line.clear();
            match stdin().lock().read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => (),
                Err(e) => {
                    error!("Reading input: {e}");
                    return None;
                }
            }

            match line.trim().parse() {
                Ok(val) => return Some(val),
                Err(_) => warn!("'{}' is not an integer", line.trim()),
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Prints output words on stdout and warnings/errors on stderr. With `trace`,
/// every event goes to stderr as well.
#[derive(Default, Clone, Copy)]
pub struct ConsoleObserver {
    pub trace: bool,
}

impl ConsoleObserver {
    pub fn new(trace: bool) -> Self {
        ConsoleObserver { trace }
    }
}

impl Observer for ConsoleObserver {
    fn notify(&mut self, event: &Event) {
        if self.trace {
            eprintln!("{event:?}");
        }
        match event {
            Event::Output(val) => {
                let mut out = stdout().lock();
                let _ = writeln!(out, "{val}");
                let _ = out.flush();
            }
            Event::Notice { severity: Severity::Warning, message } if !self.trace => {
                eprintln!("warning: {message}");
            }
            Event::Notice { severity: Severity::Error, message } if !self.trace => {
                eprintln!("error: {message}");
            }
            _ => (),
        }
    }
}
