//! `oasc` command line interface.

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use log::info;

use oasc::{
    codegen::{self, CodegenOptions, DocsOptions, MakeConfig},
    cparse, loader,
    spec::DocumentRegistry,
    Error,
};

#[derive(Debug, Parser)]
#[command(
    name = "oasc",
    version,
    about = "Compile between C headers, JSON Schema / OpenAPI documents, and generated C client code"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert C header declarations to JSON Schema.
    Code2schema {
        /// Input C header.
        header: PathBuf,
        /// Output JSON file.
        out: PathBuf,
    },

    /// Generate a C client (<basename>.h, <basename>.c, CMakeLists.txt)
    /// from a schema or OpenAPI document.
    Schema2code {
        /// Input schema/OpenAPI document (JSON or YAML).
        schema: PathBuf,
        /// Output basename; `.h`/`.c` are appended.
        basename: PathBuf,
        /// Wrap enum helpers in `#ifdef <MACRO>`.
        #[arg(long = "guard-enum", value_name = "MACRO")]
        guard_enum: Option<String>,
        /// Wrap JSON codecs in `#ifdef <MACRO>`.
        #[arg(long = "guard-json", value_name = "MACRO")]
        guard_json: Option<String>,
        /// Wrap utility helpers in `#ifdef <MACRO>`.
        #[arg(long = "guard-utils", value_name = "MACRO")]
        guard_utils: Option<String>,
    },

    /// Generate a test suite exercising the generated code.
    Schema2tests {
        /// Input schema/OpenAPI document.
        schema: PathBuf,
        /// Generated header the tests include.
        header: PathBuf,
        /// Output test header.
        out: PathBuf,
    },

    /// Emit per-operation code snippets as JSON.
    #[command(name = "to_docs_json")]
    ToDocsJson {
        /// Input document; defaults to `openapi.json`.
        #[arg(short = 'i', value_name = "SPEC")]
        input: Option<PathBuf>,
        /// Omit include lines from snippets.
        #[arg(long)]
        no_imports: bool,
        /// Omit the main() wrapper from snippets.
        #[arg(long)]
        no_wrapping: bool,
    },
}

/// Reads and parses a document, dispatching on the file extension.
fn parse_document(path: &Path) -> Result<serde_json::Value, Error> {
    let text = fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        Ok(serde_yml::from_str(&text)?)
    } else {
        Ok(serde_json::from_str(&text)?)
    }
}

fn load_document(path: &Path) -> Result<oasc::spec::Spec, Error> {
    let value = parse_document(path)?;
    let mut registry = DocumentRegistry::new();
    let retrieval_uri = path.to_str();
    Ok(loader::load_spec(&value, retrieval_uri, &mut registry)?)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("client")
        .to_owned()
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Code2schema { header, out } => {
            let source = fs::read_to_string(&header)?;
            let schema = cparse::header_to_schema(&source)?;
            fs::write(&out, serde_json::to_string_pretty(&schema)?)?;
            info!("wrote {}", out.display());
        }

        Command::Schema2code {
            schema,
            basename,
            guard_enum,
            guard_json,
            guard_utils,
        } => {
            let spec = load_document(&schema)?;
            let opts = CodegenOptions {
                enum_guard: guard_enum,
                json_guard: guard_json,
                utils_guard: guard_utils,
            };
            let stem = file_stem(&basename);

            let header_path = basename.with_extension("h");
            let mut header = fs::File::create(&header_path)?;
            codegen::emit_header(&spec, &stem, &opts, &mut header)?;
            info!("wrote {}", header_path.display());

            let source_path = basename.with_extension("c");
            let mut source = fs::File::create(&source_path)?;
            codegen::emit_source(&spec, &stem, &opts, &mut source)?;
            info!("wrote {}", source_path.display());

            let cmake_path = basename
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("CMakeLists.txt");
            let mut cmake = fs::File::create(&cmake_path)?;
            codegen::emit_cmake(
                &MakeConfig {
                    project_name: stem,
                    ..MakeConfig::default()
                },
                &mut cmake,
            )?;
            info!("wrote {}", cmake_path.display());
        }

        Command::Schema2tests {
            schema,
            header,
            out,
        } => {
            let spec = load_document(&schema)?;
            let header_name = header
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("client.h")
                .to_owned();
            let suite = file_stem(&header);
            let mut file = fs::File::create(&out)?;
            codegen::emit_tests(&spec, &header_name, &suite, &mut file)?;
            info!("wrote {}", out.display());
        }

        Command::ToDocsJson {
            input,
            no_imports,
            no_wrapping,
        } => {
            let path = input.unwrap_or_else(|| PathBuf::from("openapi.json"));
            let spec = load_document(&path)?;
            let options = DocsOptions {
                no_imports,
                no_wrapping,
                header_name: format!("{}.h", file_stem(&path)),
            };
            let docs = codegen::emit_docs_json(&spec, &options)?;
            println!("{}", serde_json::to_string_pretty(&docs)?);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("oasc: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
