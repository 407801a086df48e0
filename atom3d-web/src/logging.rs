/// Tracing output routed to the browser console
use std::io;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

pub const DEFAULT_DIRECTIVE: &str = "atom3d_core=info,atom3d_web=info";

/// Install the console subscriber. `level` is a filter directive such as
/// `debug` or `atom3d_web=trace`; a second call is a no-op.
pub fn init_logging(level: Option<&str>) -> bool {
    let filter = level
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE));

    // No wall clock on wasm32-unknown-unknown
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .try_init()
        .is_ok()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter<fn(&str)>;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(console_log as fn(&str))
    }
}

/// Buffers one formatted event and hands it to `sink` on flush or drop
pub struct ConsoleWriter<F: FnMut(&str)> {
    buffer: Vec<u8>,
    sink: F,
}

impl<F: FnMut(&str)> ConsoleWriter<F> {
    pub fn new(sink: F) -> Self {
        Self {
            buffer: Vec::new(),
            sink,
        }
    }
}

impl<F: FnMut(&str)> io::Write for ConsoleWriter<F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let text = String::from_utf8_lossy(&self.buffer);
            (self.sink)(text.trim_end_matches('\n'));
            self.buffer.clear();
        }
        Ok(())
    }
}

impl<F: FnMut(&str)> Drop for ConsoleWriter<F> {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

#[cfg(target_arch = "wasm32")]
fn console_log(line: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line));
}

#[cfg(not(target_arch = "wasm32"))]
fn console_log(line: &str) {
    eprintln!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_one_line_per_event() {
        let mut lines = Vec::new();
        {
            let mut writer = ConsoleWriter::new(|line: &str| lines.push(line.to_string()));
            write!(writer, " INFO atom3d_web: ").unwrap();
            writeln!(writer, "attached").unwrap();
        }
        assert_eq!(lines, vec![" INFO atom3d_web: attached".to_string()]);
    }

    #[test]
    fn test_subscriber_installs_once() {
        assert!(init_logging(Some("atom3d_web=debug")));
        assert!(!init_logging(None));
    }

    #[test]
    fn test_empty_writer_emits_nothing() {
        let mut count = 0;
        {
            let mut writer = ConsoleWriter::new(|_: &str| count += 1);
            writer.flush().unwrap();
        }
        assert_eq!(count, 0);
    }
}
