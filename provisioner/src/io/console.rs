//! Interactive console adapter.
//!
//! Product output (status lines, prompts) goes through this seam on
//! stdout, unaffected by `RUST_LOG`; tests script stdin and capture the
//! transcript through the same trait.

use std::io::BufRead;

use anyhow::{Context, Result};

pub trait Console {
    /// Print a status line for the operator.
    fn say(&self, message: &str);
    /// Read one line from the operator, trailing newline stripped.
    /// End of input yields an empty line.
    fn read_line(&self) -> Result<String>;
    /// Block until the operator acknowledges with a keypress/Enter.
    fn acknowledge(&self) -> Result<()>;
}

/// Console backed by the process stdin/stdout.
pub struct StdConsole;

impl Console for StdConsole {
    fn say(&self, message: &str) {
        println!("{message}");
    }

    fn read_line(&self) -> Result<String> {
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read stdin")?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn acknowledge(&self) -> Result<()> {
        self.read_line()?;
        Ok(())
    }
}
