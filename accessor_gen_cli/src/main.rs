mod manifest;

use accessor_gen::class_sink::{ClassSink, DirectoryClassSink, JarClassSink};
use accessor_gen::discovery::flatten;
use accessor_gen::processor::{AccessorProcessor, BatchReport, ProcessorConfig};
use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use class_file::class_file_version::ClassFileVersion;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

/// generate one accessor class per field listed in a manifest
#[derive(Parser, Debug)]
#[command(name = "accessor-gen", version)]
#[command(group(ArgGroup::new("output").required(true).args(["out_dir", "jar"])))]
struct CommandLineInterface {
    /// manifest with `field` and `class` lines
    #[arg(long, short)]
    manifest: PathBuf,

    /// write `<internal name>.class` files below this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// write all classes into this jar
    #[arg(long)]
    jar: Option<PathBuf>,

    /// one field at a time instead of the worker pool
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// class file major version, 45 (java 1.1) to 65 (java 21)
    #[arg(long, default_value_t = 52)]
    class_version: u16,
}

enum Output {
    Directory(DirectoryClassSink),
    Jar(JarClassSink),
}

impl Output {
    fn sink(&self) -> &dyn ClassSink {
        match self {
            Output::Directory(sink) => sink,
            Output::Jar(sink) => sink,
        }
    }

    fn finish(self) -> Result<()> {
        match self {
            Output::Directory(_) => Ok(()),
            Output::Jar(sink) => {
                sink.finish()?;
                info!("wrote {}", sink.path().display());
                Ok(())
            }
        }
    }
}

impl CommandLineInterface {
    fn open_output(&self) -> Result<Output> {
        match (&self.out_dir, &self.jar) {
            (Some(dir), None) => Ok(Output::Directory(
                DirectoryClassSink::new(dir)
                    .with_context(|| format!("cannot use output directory {}", dir.display()))?,
            )),
            (None, Some(jar)) => Ok(Output::Jar(
                JarClassSink::new(jar)
                    .with_context(|| format!("cannot create jar {}", jar.display()))?,
            )),
            _ => anyhow::bail!("exactly one of --out-dir and --jar is required"),
        }
    }

    /// Parses the manifest, runs the batch and closes the output. Manifest
    /// errors abort before the output is opened.
    fn generate(&self) -> Result<BatchReport> {
        let config = ProcessorConfig {
            parallel: !self.sequential,
            class_version: ClassFileVersion::from_major(self.class_version)
                .context("unsupported --class-version")?,
        };
        // 先解析完整个清单，语法错误时不生成任何类
        let fields = flatten(manifest::load(&self.manifest)?);
        let output = self.open_output()?;

        let report = AccessorProcessor::new(config).process(&fields, output.sink());
        output.finish()?;
        Ok(report)
    }

    fn run(self) -> Result<ExitCode> {
        let report = self.generate()?;
        for line in failure_lines(&report) {
            eprintln!("{line}");
        }
        println!("{}", summary(&report));
        Ok(if report.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

fn failure_lines(report: &BatchReport) -> Vec<String> {
    report
        .failures()
        .map(|(outcome, error)| {
            format!(
                "error: {}.{}: {}",
                outcome.owner_type_name, outcome.field_name, error
            )
        })
        .collect()
}

fn summary(report: &BatchReport) -> String {
    format!(
        "{} accessor classes generated, {} fields failed",
        report.success_count(),
        report.failure_count()
    )
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    CommandLineInterface::parse().run()
}
