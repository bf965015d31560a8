use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::TimeDelta;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tidyscript::io::{confirm, is_participant_transcript, is_vtt};
use tidyscript::models::seconds_to_delta;
use tidyscript::{
    builtin_table, clean_transcript, format_rules, merge_speakers, read_document, read_vtt_file,
    shift_captions, write_document, write_vtt_file, CleanConfig, ConfirmError, MergeConfig,
    ParticipantAlias, RewriteReport, RuleTable, RuleTableConfig,
};

#[derive(Parser)]
#[command(name = "tidyscript")]
#[command(author, version, about = "Cleanup, speaker merging and time shifting for meeting transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fix recurring transcription errors and simplify caption layout, in place
    Clean {
        /// Transcript to clean (expected to be named like P12.vtt or P12.txt)
        file: PathBuf,

        #[command(flatten)]
        table: TableArgs,

        /// Write per-rule replacement counts to this JSON file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Do not ask for confirmation on unexpected file names
        #[arg(short, long)]
        yes: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Copy speaker labels from one VTT file onto another of the same recording
    Merge {
        /// VTT file with the better transcription; this file is updated
        text_file: PathBuf,

        /// VTT file with speaker labels; this file is unchanged
        speaker_file: PathBuf,

        /// Compare timestamps as they are, without moving text captions one second forward
        #[arg(short, long)]
        true_timestamps: bool,

        /// Do not ask for confirmation on unexpected file names
        #[arg(short, long)]
        yes: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Shift every timestamp in a VTT file, in place
    Shift {
        /// VTT file to update
        file: PathBuf,

        /// Seconds to move timestamps forward; negative values move them back
        #[arg(allow_negative_numbers = true)]
        seconds: f64,

        /// Do not ask for confirmation on unexpected file names
        #[arg(short, long)]
        yes: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the ordered rule list a clean run would apply
    Rules {
        #[command(flatten)]
        table: TableArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
struct TableArgs {
    /// JSON rule table to use instead of the built-in one
    #[arg(long, conflicts_with = "extend")]
    rules: Option<PathBuf>,

    /// JSON rule table appended to the built-in one
    #[arg(long)]
    extend: Option<PathBuf>,

    /// Participant name as it appears in the transcript, matched literally
    #[arg(long, requires = "participant_alias")]
    participant_name: Option<String>,

    /// Alias that replaces the participant name
    #[arg(long, requires = "participant_name")]
    participant_alias: Option<String>,
}

impl TableArgs {
    fn load(&self) -> Result<RuleTableConfig> {
        if let Some(path) = &self.rules {
            return RuleTableConfig::from_json_file(path);
        }
        let mut table = builtin_table();
        if let Some(path) = &self.extend {
            table.extend(RuleTableConfig::from_json_file(path)?);
        }
        Ok(table)
    }

    fn participant(&self) -> Option<ParticipantAlias> {
        match (&self.participant_name, &self.participant_alias) {
            (Some(name), Some(alias)) => Some(ParticipantAlias {
                name: name.clone(),
                alias: alias.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct CleanSummary<'a> {
    file: &'a Path,
    format: &'a RewriteReport,
    replacements: &'a RewriteReport,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Clean {
            file,
            table,
            report,
            yes,
            verbose,
        } => {
            setup_logging(verbose);
            clean_file(&file, &table, report.as_deref(), yes)
        }
        Commands::Merge {
            text_file,
            speaker_file,
            true_timestamps,
            yes,
            verbose,
        } => {
            setup_logging(verbose);
            merge_files(&text_file, &speaker_file, true_timestamps, yes)
        }
        Commands::Shift {
            file,
            seconds,
            yes,
            verbose,
        } => {
            setup_logging(verbose);
            shift_file(&file, seconds, yes)
        }
        Commands::Rules { table, verbose } => {
            setup_logging(verbose);
            list_rules(&table)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Ask before touching a file with an unexpected name; false means declined
fn proceed_with(path: &Path, question: &str) -> Result<bool> {
    let stdin = io::stdin();
    match confirm(question, path, &mut stdin.lock(), &mut io::stdout()) {
        Ok(()) => Ok(true),
        Err(ConfirmError::Declined { target }) => {
            info!("Leaving {} untouched", target);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn clean_file(file: &Path, table: &TableArgs, report_path: Option<&Path>, yes: bool) -> Result<()> {
    if !yes
        && !is_participant_transcript(file)
        && !proceed_with(file, &format!("Are you sure you want to clean {}?", file.display()))?
    {
        return Ok(());
    }

    let config = CleanConfig {
        table: table.load()?,
        participant: table.participant(),
    };

    info!("Loading transcript from {:?}", file);
    let text = read_document(file)?;
    let result = clean_transcript(&text, &config)
        .with_context(|| format!("Quitting without saving changes to {:?}", file))?;

    print_report("Layout changes:", &result.format);
    print_report("Replacements:", &result.replacements);
    println!();

    if let Some(path) = report_path {
        let summary = CleanSummary {
            file,
            format: &result.format,
            replacements: &result.replacements,
        };
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize report")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write report: {:?}", path))?;
        info!("Report written to {:?}", path);
    }

    write_document(file, &result.text)?;
    info!("Cleaned transcript written to {:?}", file);
    Ok(())
}

fn print_report(title: &str, report: &RewriteReport) {
    println!("\n{}", title);
    for outcome in report.applied() {
        println!(" {} replacements for \"{}\"", outcome.replacements, outcome.rule);
    }
}

fn merge_files(text_file: &Path, speaker_file: &Path, true_timestamps: bool, yes: bool) -> Result<()> {
    for path in [text_file, speaker_file] {
        if !yes
            && !is_vtt(path)
            && !proceed_with(path, &format!("VTT expected. Are you sure you meant {}?", path.display()))?
        {
            return Ok(());
        }
    }

    let mut track = read_vtt_file(text_file)?;
    let speakers = read_vtt_file(speaker_file)?;
    info!(
        "Loaded {} text captions and {} speaker captions",
        track.len(),
        speakers.len()
    );

    let config = MergeConfig {
        lead: if true_timestamps {
            TimeDelta::zero()
        } else {
            TimeDelta::seconds(1)
        },
    };
    let report = merge_speakers(&mut track.captions, &speakers.captions, &config).with_context(|| {
        format!(
            "{:?} does not seem to be a valid, non-empty VTT file. No changes made.",
            speaker_file
        )
    })?;

    for (speaker, count) in &report.speaker_counts {
        println!(" {} added to {} lines.", speaker, count);
    }
    println!(
        " Skipped {} lines because the speaker could not be identified.",
        report.unattributed
    );

    write_vtt_file(text_file, &track)?;
    info!("Updated {:?}", text_file);
    Ok(())
}

fn shift_file(file: &Path, seconds: f64, yes: bool) -> Result<()> {
    if !yes
        && !is_vtt(file)
        && !proceed_with(file, &format!("VTT expected. Are you sure you meant {}?", file.display()))?
    {
        return Ok(());
    }

    let delta = seconds_to_delta(seconds).with_context(|| format!("Invalid offset: {} seconds", seconds))?;
    let mut track = read_vtt_file(file)?;
    shift_captions(&mut track.captions, delta);
    write_vtt_file(file, &track)?;
    info!("Updated {:?}", file);
    Ok(())
}

fn list_rules(table: &TableArgs) -> Result<()> {
    let lexical = RuleTable::new(table.load()?)
        .with_participant(table.participant())
        .build()?;
    let structural = format_rules()?;

    for (index, rule) in structural.iter().chain(lexical.iter()).enumerate() {
        if rule.label() == rule.pattern() {
            println!("{:>4}  {:<11}  {}", index + 1, rule.case_mode(), rule.label());
        } else {
            println!(
                "{:>4}  {:<11}  {}  /{}/",
                index + 1,
                rule.case_mode(),
                rule.label(),
                rule.pattern()
            );
        }
    }
    Ok(())
}
