use clap::Parser;

/// se-monitor - decode SolarEdge monitoring captures into CSV and JSON
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Config file to read
    #[clap(short = 'c', long = "config")]
    pub config_file: Option<String>,

    /// Captured byte stream to replay, - for stdin
    #[clap(default_value = "-")]
    pub input: String,

    /// Inverter output file, overrides the config
    #[clap(long)]
    pub inverters: Option<String>,

    /// Optimizer output file, overrides the config
    #[clap(long)]
    pub optimizers: Option<String>,

    /// JSON output file, overrides the config
    #[clap(long)]
    pub json: Option<String>,

    /// Column delimiter, overrides the config
    #[clap(short = 'd', long)]
    pub delimiter: Option<String>,

    /// Write header lines to the delimited outputs
    #[clap(short = 'H', long)]
    pub headers: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }
}
