use std::io::{BufWriter, Write};
use std::path::Path;

use scara::core::ChainSnapshot;

#[derive(serde_derive::Serialize, Debug)]
struct TickRecord {
    /// Tick counter since start.
    tick: u64,
    /// Whether the active motion is complete.
    complete: bool,
    /// Chain pose after the tick.
    chain: ChainSnapshot,
}

/// Writes one JSON record per tick.
pub(crate) struct TraceWriter {
    writer: BufWriter<std::fs::File>,
}

impl TraceWriter {
    pub(crate) fn create(path: &Path) -> anyhow::Result<Self> {
        log::debug!("Open trace file: {}", path.display());

        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub(crate) fn record(
        &mut self,
        tick: u64,
        complete: bool,
        chain: &scara::robot::Chain,
    ) -> anyhow::Result<()> {
        let record = TickRecord {
            tick,
            complete,
            chain: chain.snapshot(),
        };

        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;

        Ok(())
    }

    pub(crate) fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
