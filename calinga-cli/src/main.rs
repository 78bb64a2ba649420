//  Copyright 2025 calinga Project Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! Command line access to a calinga project through the layered translation cache.

use std::path::PathBuf;

use anyhow::Context;
use calinga::{common::language::TranslationMap, CalingaServiceBuilder, CalingaSettings};
use clap::{Parser, Subcommand};

/// Arguments of the calinga cli.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the json settings file.
    #[arg(short, long)]
    settings: PathBuf,

    /// Serve from the cache only, never call the consumer api.
    #[arg(long, default_value_t = false)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

/// What to do with the project.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate a key into a language.
    Translate {
        /// Translation key.
        key: String,
        /// Target language.
        language: String,
    },
    /// Print all translations of a language, one tab separated `key value` line each.
    Translations {
        /// Target language.
        language: String,
    },
    /// List the languages of the project.
    Languages,
    /// Print the reference language of the project.
    ReferenceLanguage,
    /// Remove all cached documents.
    ClearCache,
}

/// One `key<TAB>value` line per translation, sorted by key.
fn format_translations(translations: &TranslationMap) -> String {
    let mut entries = translations.iter().collect::<Vec<_>>();
    entries.sort();
    entries
        .into_iter()
        .map(|(key, value)| format!("{key}\t{value}\n"))
        .collect()
}

fn init_logger() {
    use tracing_subscriber::{prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_line_number(true))
        .with(EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();

    let mut settings = CalingaSettings::from_json_file(&cli.settings)
        .with_context(|| format!("load settings from {}", cli.settings.display()))?;
    if cli.offline {
        settings.use_cache_only = true;
    }
    let service = CalingaServiceBuilder::new(settings).build()?;

    match cli.command {
        Command::Translate { key, language } => {
            println!("{}", service.translate(&key, &language).await?);
        }
        Command::Translations { language } => {
            let translations = service.get_translations(&language).await?;
            print!("{}", format_translations(&translations));
        }
        Command::Languages => {
            for language in service.get_languages().await? {
                println!("{language}");
            }
        }
        Command::ReferenceLanguage => {
            println!("{}", service.get_reference_language().await?);
        }
        Command::ClearCache => {
            service.clear_cache().await?;
            tracing::info!("[calinga-cli]: cache cleared");
        }
    }

    Ok(())
}
