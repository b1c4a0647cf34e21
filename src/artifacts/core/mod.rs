//! Terminal output helpers
//!
//! History listings can be long, so `log` and `global-log` go through the
//! `minus` pager when a person is reading them. Anything else, a pipe or a
//! test harness, gets plain stdout.

use derive_new::new;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::{self, Write};

/// Environment variable that turns paging off
pub const NO_PAGER_ENV: &str = "NO_PAGER";

/// Adapter that lets the minus pager stand in for stdout
///
/// ```ignore
/// let pager = Pager::new();
/// let mut writer = PagerWriter::new(pager.clone());
/// writeln!(writer, "Some long output...")?;
/// page_all(pager)?;
/// ```
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn stdout_is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Whether long output should be paged
pub fn should_page() -> bool {
    stdout_is_terminal() && std::env::var_os(NO_PAGER_ENV).is_none()
}
