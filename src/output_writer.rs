use crate::file_error_with_source;
use crate::prelude::*;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Records written per stream since the writer was opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceCounters {
    pub inverters: u64,
    pub optimizers: u64,
    pub json: u64,
}

struct Stream {
    name: String,
    out: Box<dyn Write + Send>,
    header_written: bool,
}

impl Stream {
    fn open(path: &str, append: bool) -> Result<Self> {
        if path == "-" {
            return Ok(Self::new("stdout", Box::new(std::io::stdout())));
        }

        info!("Opening output file {}", path);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| file_error_with_source!(e, "error creating {}", parent.display()))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(|e| file_error_with_source!(e, "error opening output file {}", path))?;

        Ok(Self::new(path, Box::new(file)))
    }

    fn new(name: &str, out: Box<dyn Write + Send>) -> Self {
        Self {
            name: name.to_string(),
            out,
            header_written: false,
        }
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)
            .and_then(|_| self.out.flush())
            .map_err(|e| file_error_with_source!(e, "error writing output file {}", self.name))
    }
}

/// Delimited and JSON output for decoded device data.
///
/// Inverter and optimizer records go one line each to their own stream; the
/// whole device list goes to the JSON stream as one object per message. Any
/// stream may be absent. Events are only carried in the JSON.
pub struct OutputWriter {
    inverters: Option<Stream>,
    optimizers: Option<Stream>,
    json: Option<Stream>,
    delimiter: String,
    headers: bool,
    counters: SequenceCounters,
}

impl OutputWriter {
    pub fn new(delimiter: &str, headers: bool) -> Self {
        Self {
            inverters: None,
            optimizers: None,
            json: None,
            delimiter: delimiter.to_string(),
            headers,
            counters: SequenceCounters::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let output = &config.output;
        let open = |path: &Option<String>| -> Result<Option<Stream>> {
            path.as_deref()
                .map(|p| Stream::open(p, output.append))
                .transpose()
        };

        Ok(Self {
            inverters: open(&output.inverters)?,
            optimizers: open(&output.optimizers)?,
            json: open(&output.json)?,
            ..Self::new(&config.delimiter, config.headers)
        })
    }

    pub fn with_inverters(mut self, name: &str, out: Box<dyn Write + Send>) -> Self {
        self.inverters = Some(Stream::new(name, out));
        self
    }

    pub fn with_optimizers(mut self, name: &str, out: Box<dyn Write + Send>) -> Self {
        self.optimizers = Some(Stream::new(name, out));
        self
    }

    pub fn with_json(mut self, name: &str, out: Box<dyn Write + Send>) -> Self {
        self.json = Some(Stream::new(name, out));
        self
    }

    pub fn counters(&self) -> SequenceCounters {
        self.counters
    }

    pub fn write(&mut self, data: &DeviceData) -> Result<()> {
        if let Some(stream) = self.json.as_mut() {
            let line = serde_json::to_string(data)?;
            stream.write_line(&line)?;
            let n = Self::next(&mut self.counters.json);
            info!("<-- {} {} {}", n, line, stream.name);
        }

        if let Some(stream) = self.inverters.as_mut() {
            Self::write_records(
                stream,
                data.inverters.values(),
                &self.delimiter,
                self.headers,
                &mut self.counters.inverters,
            )?;
        }

        if let Some(stream) = self.optimizers.as_mut() {
            Self::write_records(
                stream,
                data.optimizers.values(),
                &self.delimiter,
                self.headers,
                &mut self.counters.optimizers,
            )?;
        }

        Ok(())
    }

    // Sequence numbers in the log start at 1.
    fn next(seq: &mut u64) -> u64 {
        *seq += 1;
        *seq
    }

    fn write_records<'a, R, I>(
        stream: &mut Stream,
        records: I,
        delimiter: &str,
        headers: bool,
        seq: &mut u64,
    ) -> Result<()>
    where
        R: DeviceCommon + 'a,
        I: Iterator<Item = &'a R>,
    {
        for record in records {
            if headers && !stream.header_written {
                stream.write_line(&record.columns().join(delimiter))?;
                stream.header_written = true;
            }

            let line = record.values().join(delimiter);
            stream.write_line(&line)?;
            let n = Self::next(seq);
            info!("<-- {} {} {}", n, line, stream.name);
        }

        Ok(())
    }
}
