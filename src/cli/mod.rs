// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;

use crate::config::Settings;

/// Web Summarizer server
#[derive(Parser, Debug, Default)]
#[command(name = "web-summarizer")]
#[command(version)]
#[command(about = "Summarize web pages and text with Qwen", long_about = None)]
pub struct Cli {
    /// Listen host (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Enable debug logging (overrides DEBUG)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of environment settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if self.debug {
            settings.debug = true;
        }
    }
}
