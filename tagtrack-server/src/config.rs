use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

use tagtrack_core::{DeviceRegistry, RegistryError};

use crate::publisher::DEFAULT_SINK_URL;
use crate::store::{default_store_path, DEFAULT_JQ_PROGRAM};

/// Tracked when no `--device` is given
const DEFAULT_DEVICES: [(&str, u32); 4] = [
    ("WiseAirTag1", 1),
    ("WiseAirTag2", 2),
    ("WiseAirTag3", 3),
    ("WiseAirTag4", 4),
];

/// How the location cache is queried
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryWith {
    /// Run jq over the cache file
    Jq,
    /// Parse the cache file directly
    File,
}

/// Poll location-beacon fixes and republish them to a position service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Device to track and its node id in the position service, repeat for
    /// every device [default: WiseAirTag1=1 .. WiseAirTag4=4]
    #[arg(short, long = "device", value_name = "NAME=ID", value_parser = parse_device)]
    pub devices: Vec<(String, u32)>,

    /// Pause between polling passes, in milliseconds
    #[arg(short, long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Location cache file [default: ~/Library/Caches/com.apple.findmy.fmipcore/Items.data]
    #[arg(short, long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// How to query the location cache
    #[arg(long, value_enum, default_value_t = QueryWith::Jq)]
    pub query_with: QueryWith,

    /// jq executable used with `--query-with jq`
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_JQ_PROGRAM)]
    pub jq: PathBuf,

    /// Position service endpoint that receives the PUT updates
    #[arg(long, value_name = "URL", default_value = DEFAULT_SINK_URL)]
    pub sink: Url,
}

impl Cli {
    pub fn registry(&self) -> Result<DeviceRegistry, RegistryError> {
        if self.devices.is_empty() {
            DeviceRegistry::new(DEFAULT_DEVICES.iter().map(|(n, id)| (n.to_string(), *id)))
        } else {
            DeviceRegistry::new(self.devices.iter().cloned())
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }

    /// The configured cache path, or the default one under the home directory
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store.clone().or_else(default_store_path)
    }
}

fn parse_device(s: &str) -> Result<(String, u32), String> {
    let (name, id) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=ID, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing device name in '{}'", s));
    }
    let id = id
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid node id in '{}': {}", s, e))?;
    Ok((name.to_string(), id))
}
