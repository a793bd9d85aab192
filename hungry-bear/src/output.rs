//! Stdout subscriber: the legend once, then one JSON frame per line.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use serde_json::{Map, Value};

/// The cell legend as a JSON object line, e.g. `{"legend":{"GRASS":0,...}}`.
pub fn legend_line() -> String {
    let legend: Map<String, Value> = bear_core::legend()
        .map(|(name, code)| (name.to_string(), Value::from(code)))
        .collect();
    let mut root = Map::new();
    root.insert("legend".into(), Value::Object(legend));
    Value::Object(root).to_string()
}

/// Write the legend, then every frame received, until the broadcaster goes
/// away or the writer fails.
pub fn write_frames<W: Write>(out: &mut W, frames: &Receiver<Arc<str>>) -> io::Result<usize> {
    writeln!(out, "{}", legend_line())?;
    out.flush()?;
    let mut n = 0;
    for frame in frames {
        writeln!(out, "{frame}")?;
        out.flush()?;
        n += 1;
    }
    Ok(n)
}

/// Spawn a thread streaming `frames` to stdout.
pub fn spawn_stdout(frames: Receiver<Arc<str>>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new().name("stdout".into()).spawn(move || {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match write_frames(&mut out, &frames) {
            Ok(n) => log::debug!("stdout subscriber wrote {n} frames"),
            // Dropping the receiver detaches us from the broadcaster.
            Err(e) => log::warn!("stdout subscriber stopped: {e}"),
        }
    })
}
