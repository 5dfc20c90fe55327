//! tagdoc: build a documentation model from `/** @tag */` comments.
//!
//! ```text
//! tagdoc -o build/api -v 2.8.0 src/widget src/util
//! ```
//!
//! Every root is parsed in turn; the model is written to
//! `<outputdir>/<file>` only if the whole run parses cleanly.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use std::fs;
use std::path::{Path, PathBuf};
use tagdoc::config::{self, Config};
use tagdoc::highlight::{self, PreHighlighter};
use tagdoc::logging::{self, LogOptions};
use tagdoc::parser::DocParser;
use tagdoc::render::{self, Page, RenderOptions};
use tagdoc::source::{self, SourceFile};

#[derive(Parser)]
#[command(
    name = "tagdoc",
    about = "Extract API documentation from /** @tag */ comments in JavaScript sources",
    disable_version_flag = true
)]
struct Cli {
    /// Source tree roots (glob patterns supported)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output directory
    #[arg(short = 'o', long = "outputdir", default_value = "out")]
    output_dir: PathBuf,

    /// Name of the model file written into the output directory
    #[arg(short = 'f', long = "file", default_value = "parsed.json")]
    file: String,

    /// Only files ending in this extension are parsed
    #[arg(short = 'e', long, default_value = ".js")]
    extension: String,

    /// Version of the documented project
    #[arg(short = 'v', long = "version", default_value = "")]
    version: String,

    /// Major version of the documented library API (1, 2 or 3)
    #[arg(short = 'Y', long = "yuiversion")]
    yui_version: Option<String>,

    /// Include private classes and members in class pages
    #[arg(short = 's', long = "showprivate")]
    show_private: bool,

    /// Also write classmap.json (class → module)
    #[arg(long)]
    classmap: bool,

    /// Also write one JSON view per class under classes/
    #[arg(long)]
    pages: bool,

    /// Write a highlighted copy of every source file
    #[arg(long)]
    highlight: bool,

    /// Suffix appended to highlighted copies
    #[arg(short = 'n', long = "newextension", default_value = ".highlighted")]
    new_extension: String,

    /// More diagnostics (once for debug, twice for trace)
    #[arg(long, action = ArgAction::Count)]
    verbose: u8,

    /// No diagnostics at all
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let inputs = expand_inputs(&self.inputs)?;
        if inputs.is_empty() {
            bail!("no input roots found");
        }
        Ok(Config {
            inputs,
            major_version: config::major_version(self.yui_version.as_deref(), &self.version),
            output_dir: self.output_dir,
            output_file: self.file,
            extension: self.extension,
            version: self.version,
            show_private: self.show_private,
            class_map: self.classmap,
            pages: self.pages,
            highlight: self.highlight,
            highlight_extension: self.new_extension,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(LogOptions {
        verbosity: cli.verbose,
        silent: cli.quiet,
    });
    let config = cli.into_config()?;
    run(&config)
}

fn run(config: &Config) -> Result<()> {
    let mut parser = DocParser::new(&config.version, config.major_version);
    let mut all_sources: Vec<SourceFile> = Vec::new();

    for root in &config.inputs {
        let paths = source::collect_sources(root, &config.extension)?;
        if paths.is_empty() {
            tracing::warn!("no {} files under {}", config.extension, root.display());
        }
        let sources = paths
            .iter()
            .map(|path| SourceFile::read(path))
            .collect::<Result<Vec<_>>>()?;
        parser
            .parse_root(&sources)
            .with_context(|| format!("failed to parse {}", root.display()))?;
        all_sources.extend(sources);
    }

    let (model, ctx) = parser.finish();
    if !ctx.warnings.is_empty() {
        tracing::info!("{} warning(s)", ctx.warnings.len());
    }

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    let options = RenderOptions {
        model_file: config.output_file.clone(),
        show_private: config.show_private,
    };
    let mut outputs = vec!["model"];
    if config.class_map {
        outputs.push("classmap");
    }
    if config.pages {
        outputs.push("pages");
    }
    for output in outputs {
        let renderer = render::create_renderer(output, &options)?;
        for page in renderer.render(&model)? {
            write_page(&config.output_dir, &page)?;
        }
    }

    if config.highlight {
        highlight::write_highlighted(
            &PreHighlighter,
            &all_sources,
            &config.output_dir,
            &config.highlight_extension,
        )?;
    }

    Ok(())
}

fn write_page(output_dir: &Path, page: &Page) -> Result<()> {
    let out_path = output_dir.join(&page.path);
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    fs::write(&out_path, &page.content)
        .with_context(|| format!("failed to write {}", out_path.display()))
}

/// Expand glob patterns into input roots. Existing paths are taken as is.
fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut roots = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.exists() {
            roots.push(path.to_path_buf());
            continue;
        }
        let mut matches: Vec<PathBuf> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .collect();
        if matches.is_empty() {
            tracing::warn!("no inputs matched: {}", pattern);
        }
        matches.sort();
        roots.extend(matches);
    }
    // Keep the given order; a root named twice is parsed once.
    let mut seen = std::collections::BTreeSet::new();
    roots.retain(|root| seen.insert(root.clone()));
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_paths_keep_their_order() {
        let dir = tempfile::tempdir().unwrap();
        let b = dir.path().join("b");
        let a = dir.path().join("a");
        fs::create_dir(&b).unwrap();
        fs::create_dir(&a).unwrap();
        let patterns = [b.display().to_string(), a.display().to_string(), b.display().to_string()];
        assert_eq!(expand_inputs(&patterns).unwrap(), [b, a]);
    }

    #[test]
    fn globs_expand_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["lib2", "lib1", "other"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        let pattern = dir.path().join("lib*").display().to_string();
        let roots = expand_inputs(&[pattern]).unwrap();
        assert_eq!(roots, [dir.path().join("lib1"), dir.path().join("lib2")]);
    }

    #[test]
    fn unmatched_pattern_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = dir.path().join("nothing*").display().to_string();
        assert!(expand_inputs(&[pattern]).unwrap().is_empty());
    }
}
