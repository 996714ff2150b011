//! robot-cmd driver
//!
//! Reads a program, parses it and writes the requested rendering. Kept in
//! the library so the whole pipeline can be exercised without spawning the
//! binary.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::action::Action;
use crate::config::{Config, Emit, OutputFormat};
use crate::parser::parse_program_with;
use crate::robot::{CallCounter, Robot, RobotCall};

/// Run the binary for an already-resolved configuration
pub fn run(config: &Config) -> Result<()> {
    let source = read_source(config.input.as_deref())?;
    let name = config
        .input
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    let mut out = BufWriter::new(io::stdout().lock());
    process(config, &name, &source, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Parse `source` and write the configured output to `out`
pub fn process(config: &Config, name: &str, source: &str, out: &mut impl Write) -> Result<()> {
    let tree = parse_program_with(source, config.parse_options())
        .with_context(|| format!("failed to parse {}", name))?;
    log::info!("parsed {}", name);

    render(&tree, config.emit, config.format, out)
}

/// Write `tree` to `out` according to `emit` and `format`
pub fn render(tree: &Action, emit: Emit, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match (emit, format) {
        (Emit::Trace, format) => {
            let mut robot = TraceWriter::new(&mut *out, format);
            tree.apply(&mut robot);
            let calls = robot.finish().context("failed to write trace")?;
            log::debug!("traced {} calls", calls);
        }
        (Emit::Counts, OutputFormat::Text) => {
            let mut robot = CallCounter::new();
            tree.apply(&mut robot);
            writeln!(out, "move_forward: {}", robot.forward)?;
            writeln!(out, "turn_left: {}", robot.left)?;
            writeln!(out, "turn_right: {}", robot.right)?;
            writeln!(out, "total: {}", robot.total())?;
        }
        (Emit::Counts, OutputFormat::Json) => {
            let mut robot = CallCounter::new();
            tree.apply(&mut robot);
            serde_json::to_writer(&mut *out, &robot)?;
            writeln!(out)?;
        }
        (Emit::Program, OutputFormat::Text) => write!(out, "{}", tree)?,
        (Emit::Program, OutputFormat::Json) => {
            serde_json::to_writer_pretty(&mut *out, tree)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// A [`Robot`] that writes each call to `out` as it is made
///
/// Text output is one call per line; JSON output is a single array. The
/// first write error is kept and later calls are ignored.
pub struct TraceWriter<W: Write> {
    out: W,
    format: OutputFormat,
    calls: u64,
    error: Option<io::Error>,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            calls: 0,
            error: None,
        }
    }

    fn record(&mut self, call: RobotCall) {
        if self.error.is_some() {
            return;
        }

        let result = match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", call),
            OutputFormat::Json => {
                let separator = if self.calls == 0 { "[" } else { "," };
                self.out.write_all(separator.as_bytes()).and_then(|()| {
                    serde_json::to_writer(&mut self.out, &call).map_err(io::Error::from)
                })
            }
        };

        match result {
            Ok(()) => self.calls += 1,
            Err(err) => self.error = Some(err),
        }
    }

    /// Close the output and return the number of calls written
    pub fn finish(mut self) -> io::Result<u64> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        if self.format == OutputFormat::Json {
            if self.calls == 0 {
                self.out.write_all(b"[")?;
            }
            self.out.write_all(b"]\n")?;
        }
        self.out.flush()?;

        Ok(self.calls)
    }
}

impl<W: Write> Robot for TraceWriter<W> {
    fn move_forward(&mut self) {
        self.record(RobotCall::MoveForward);
    }

    fn turn_left(&mut self) {
        self.record(RobotCall::TurnLeft);
    }

    fn turn_right(&mut self) {
        self.record(RobotCall::TurnRight);
    }
}

fn read_source(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok(source)
        }
    }
}
