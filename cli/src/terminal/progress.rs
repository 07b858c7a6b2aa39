use std::io;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static BAR: OnceLock<ProgressBar> = OnceLock::new();

/// The percent bar for a running scan, created on first use.
pub fn scan_bar() -> &'static ProgressBar {
    BAR.get_or_init(init_bar)
}

fn init_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    let style = ProgressStyle::with_template("{spinner:.blue} [{bar:32.green/black}] {pos:>3}% {msg}")
        .unwrap()
        .progress_chars("█▓░")
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Routes tracing output above the bar while it is drawing; plain stderr
/// otherwise.
pub struct LogWriter;

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        match BAR.get() {
            Some(pb) if !pb.is_finished() => pb.println(msg),
            _ => eprintln!("{msg}"),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
