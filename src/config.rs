use crate::prelude::*;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,

    /// Separator between columns in the delimited outputs
    #[serde(default = "Config::default_delimiter")]
    pub delimiter: String,

    /// Write column names before the first record of each delimited file
    #[serde(default)]
    pub headers: bool,

    #[serde(default)]
    pub output: Output,
}

// Output {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Output {
    pub inverters: Option<String>,
    pub optimizers: Option<String>,
    pub json: Option<String>,

    #[serde(default = "Config::default_append")]
    pub append: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            inverters: None,
            optimizers: None,
            json: None,
            append: Config::default_append(),
        }
    }
}

impl Output {
    pub fn any(&self) -> bool {
        self.inverters.is_some() || self.optimizers.is_some() || self.json.is_some()
    }
} // }}}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: Self::default_loglevel(),
            delimiter: Self::default_delimiter(),
            headers: false,
            output: Output::default(),
        }
    }
}

impl Config {
    pub fn new(file: &str) -> Result<Self> {
        let content = std::fs::read_to_string(file)
            .map_err(|err| anyhow!("config.rs:error reading {}: {}", file, err))?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|err| anyhow!("config.rs:error parsing {}: {}", file, err))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads the file named on the command line, if any, and lays the
    /// command line overrides on top.
    pub fn from_options(options: &Options) -> Result<Self> {
        let mut config = match &options.config_file {
            Some(file) => Self::new(file)?,
            None => Self::default(),
        };

        if let Some(path) = &options.inverters {
            config.output.inverters = Some(path.clone());
        }
        if let Some(path) = &options.optimizers {
            config.output.optimizers = Some(path.clone());
        }
        if let Some(path) = &options.json {
            config.output.json = Some(path.clone());
        }
        if let Some(delimiter) = &options.delimiter {
            config.delimiter = delimiter.clone();
        }
        if options.headers {
            config.headers = true;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            bail!("delimiter cannot be empty");
        }

        if log::LevelFilter::from_str(&self.loglevel).is_err() {
            return Err(anyhow!("config.rs:invalid loglevel: {}", self.loglevel));
        }

        for (name, path) in [
            ("inverters", &self.output.inverters),
            ("optimizers", &self.output.optimizers),
            ("json", &self.output.json),
        ] {
            if path.as_deref() == Some("") {
                bail!("output.{} cannot be an empty path", name);
            }
        }

        Ok(())
    }

    pub fn log_summary(&self) {
        info!("Configuration:");
        info!("  Log Level: {}", self.loglevel);
        info!("  Delimiter: {:?}", self.delimiter);
        info!("  Headers: {}", if self.headers { "enabled" } else { "disabled" });
        info!("  Output:");
        info!("    Inverters: {}", self.output.inverters.as_deref().unwrap_or("none"));
        info!("    Optimizers: {}", self.output.optimizers.as_deref().unwrap_or("none"));
        info!("    JSON: {}", self.output.json.as_deref().unwrap_or("none"));
        info!("    Append: {}", self.output.append);
    }

    pub fn default_loglevel() -> String {
        "info".to_string()
    }

    fn default_delimiter() -> String {
        ",".to_string()
    }

    fn default_append() -> bool {
        true
    }
}
