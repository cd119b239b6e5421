use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::{CommandResult, FileOutcome, FileReport, GenerateSummary};
use crate::{
    cli::args::GenerateCommand,
    config::{Config, load_config},
    core::{
        class_names::{ClassNameExtractor, ExtractOptions},
        reporter::CollectingReporter,
        typescript::{RenderOptions, Rendered, TypeDefinitionRenderer, type_definition_path},
    },
    file_scanner::{IgnorePatterns, SourcePattern, scan_files},
};

/// Everything a generation run needs, with CLI flags applied over the config.
pub struct GenerateSettings {
    pub pattern: SourcePattern,
    pub pattern_text: String,
    pub extract: ExtractOptions,
    pub render: RenderOptions,
    pub ignores: IgnorePatterns,
    pub verbose: bool,
}

impl GenerateSettings {
    pub fn load(cmd: &GenerateCommand) -> Result<Self> {
        let cwd = env::current_dir().context("Failed to read the current directory")?;
        let config = load_config(&cwd)?.config;
        Self::resolve(cmd, config)
    }

    pub fn resolve(cmd: &GenerateCommand, config: Config) -> Result<Self> {
        let pattern = SourcePattern::parse(&cmd.pattern)
            .with_context(|| format!("Invalid pattern: \"{}\"", cmd.pattern))?;

        let mut aliases = config.import_aliases();
        aliases.aliases.extend(cmd.aliases.iter().cloned());
        aliases.alias_prefixes.extend(cmd.alias_prefixes.iter().cloned());

        Ok(Self {
            pattern,
            pattern_text: cmd.pattern.clone(),
            extract: ExtractOptions {
                name_format: cmd.name_format.unwrap_or(config.name_format),
                aliases,
            },
            render: RenderOptions {
                export_type: cmd.export_type.unwrap_or(config.export_type),
                line_ending: cmd.line_ending.unwrap_or(config.line_ending),
                list_different: cmd.list_different,
                watch: cmd.watch,
                ignore_initial: cmd.ignore_initial,
            },
            ignores: IgnorePatterns::new(&config.ignores, cmd.verbose),
            verbose: cmd.verbose,
        })
    }
}

pub fn generate(cmd: GenerateCommand) -> Result<CommandResult> {
    let settings = GenerateSettings::load(&cmd)?;
    Ok(CommandResult::from_generate(generate_all(&settings)))
}

/// Process every file selected by the pattern, in parallel.
pub fn generate_all(settings: &GenerateSettings) -> GenerateSummary {
    let scan = scan_files(&settings.pattern, &settings.ignores, settings.verbose);
    let files: Vec<PathBuf> = scan.files.into_iter().collect();

    let files = files
        .par_iter()
        .map(|file| process_file(file, settings))
        .collect();

    GenerateSummary {
        pattern: settings.pattern_text.clone(),
        files,
        ignored_count: scan.ignored_count,
        skipped_count: scan.skipped_count,
        list_different: settings.render.list_different,
    }
}

/// Generate (or, with `--list-different`, check) the definitions of one file.
pub fn process_file(file: &Path, settings: &GenerateSettings) -> FileReport {
    let reporter = CollectingReporter::new();
    let outcome = match write_definitions(file, settings, &reporter) {
        Ok(outcome) => outcome,
        Err(err) => FileOutcome::Failed {
            message: format!("{:#}", err),
        },
    };

    FileReport {
        file: file.to_path_buf(),
        outcome,
        warnings: reporter.into_messages(),
    }
}

fn write_definitions(
    file: &Path,
    settings: &GenerateSettings,
    reporter: &CollectingReporter,
) -> Result<FileOutcome> {
    let class_names = ClassNameExtractor::new()
        .extract(file, &settings.extract)
        .with_context(|| format!("Failed to compile {}", file.display()))?;

    let rendered = TypeDefinitionRenderer::new(reporter).render(&class_names, &settings.render);
    let Rendered::Definitions(definitions) = rendered else {
        return Ok(FileOutcome::NoClassNames);
    };

    let output = type_definition_path(file, settings.render.export_type);

    if settings.render.list_different {
        let current = fs::read_to_string(&output).ok();
        return Ok(if current.as_deref() == Some(definitions.as_str()) {
            FileOutcome::UpToDate { output }
        } else {
            FileOutcome::Different { output }
        });
    }

    fs::write(&output, definitions)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(FileOutcome::Generated { output })
}
