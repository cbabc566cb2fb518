//! Command-line front end: parse, query, re-encode and save XML files.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use txml::parser::ParseOptions;
use txml::tree::{Document, NodeId, NodeKind};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// txml -- parse, query, re-encode and save XML files.
#[derive(Parser, Debug)]
#[command(name = "txml", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// XML files to process (use `-` for stdin).
    #[arg(required = true)]
    files: Vec<String>,

    /// Log parser and I/O activity and print parse diagnostics.
    #[arg(long)]
    verbose: bool,

    // -- Parsing options ---------------------------------------------------
    /// Keep the partial tree when markup is unterminated.
    #[arg(long)]
    recover: bool,

    /// Accept more than one root element.
    #[arg(long = "multiple-roots")]
    multiple_roots: bool,

    // -- Query ---------------------------------------------------------------
    /// Print the value of the node at PATH (e.g. `/config/server[2]/port`).
    #[arg(long, value_name = "PATH")]
    get: Option<String>,

    // -- Output options ----------------------------------------------------
    /// Output in the given encoding (e.g., UTF-8, ISO-8859-1).
    #[arg(long, value_name = "ENCODING")]
    encode: Option<String>,

    /// Save output to a file instead of stdout. With several inputs, their
    /// output is written one after the other.
    #[arg(long, value_name = "FILE", conflicts_with = "in_place")]
    output: Option<String>,

    /// Rewrite each input file, keeping the previous content in `FILE.bck`.
    #[arg(long = "in-place")]
    in_place: bool,

    // -- Debug options -----------------------------------------------------
    /// Print a debug representation of the document tree.
    #[arg(long)]
    debug: bool,

    /// Print timing information for parsing and serializing.
    #[arg(long)]
    timing: bool,
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let mut out = match Output::open(cli.output.as_deref()) {
        Ok(out) => out,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut worst_exit: u8 = EXIT_SUCCESS;
    for file in &cli.files {
        let exit = process_file(&cli, file, &mut out);
        if exit > worst_exit {
            worst_exit = exit;
        }
    }

    ExitCode::from(worst_exit)
}

/// Processes a single input file and returns an exit code.
fn process_file(cli: &Cli, filename: &str, out: &mut Output) -> u8 {
    // -- Parse -------------------------------------------------------------
    let start_parse = Instant::now();

    let mut doc = Document::new();
    doc.allow_multiple_roots = cli.multiple_roots;
    if let Err(msg) = parse_into(cli, filename, &mut doc) {
        eprintln!("{filename}: {msg}");
        return EXIT_ERROR;
    }

    if cli.timing {
        let elapsed = start_parse.elapsed();
        eprintln!("Parsing {filename} took {elapsed:?}");
    }

    if cli.verbose {
        for diag in &doc.diagnostics {
            eprintln!("{filename}: {diag}");
        }
    }

    if let Some(encoding) = &cli.encode {
        doc.output_encoding.clone_from(encoding);
    }

    // -- Query -------------------------------------------------------------
    if let Some(path) = &cli.get {
        return match doc.get_node(path) {
            Some(id) => finish(filename, out.write(format!("{}\n", doc.value(id)).as_bytes())),
            None => {
                eprintln!("{filename}: no node at {path}");
                EXIT_NOT_FOUND
            }
        };
    }

    // -- Debug tree --------------------------------------------------------
    if cli.debug {
        return finish(filename, out.write(format_debug_tree(&doc).as_bytes()));
    }

    // -- Serialization / output --------------------------------------------
    let start_serial = Instant::now();
    let result = if cli.in_place && filename != "-" {
        doc.save(filename).map_err(|e| e.to_string())
    } else {
        doc.dump()
            .map_err(|e| e.to_string())
            .and_then(|dumped| out.write(&dumped.data))
    };
    if let Err(msg) = result {
        eprintln!("{filename}: {msg}");
        return EXIT_ERROR;
    }

    if cli.timing {
        let elapsed = start_serial.elapsed();
        eprintln!("Serializing took {elapsed:?}");
    }

    EXIT_SUCCESS
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Parses a file, or stdin when the filename is `-`, into `doc`.
fn parse_into(cli: &Cli, filename: &str, doc: &mut Document) -> Result<(), String> {
    let options = ParseOptions::default().recover(cli.recover);
    let bytes = if filename == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| format!("failed to read: {e}"))?;
        buf
    } else {
        txml::persist::read_locked(filename.as_ref()).map_err(|e| e.to_string())?
    };
    let text = txml::encoding::decode_to_utf8(&bytes).map_err(|e| e.to_string())?;
    doc.parse_buffer_with_options(&text, &options)
        .map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Debug tree
// ---------------------------------------------------------------------------

/// Formats the document tree for `--debug`: one line per node, indented by
/// depth, followed by its attributes.
fn format_debug_tree(doc: &Document) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "DOCUMENT header={:?} source={} output={}",
        doc.header.as_deref().unwrap_or(""),
        doc.source_encoding,
        doc.output_encoding
    );
    for &root in doc.roots() {
        format_debug_node(doc, root, 1, &mut output);
    }
    output
}

/// Recursively formats a node for debug output.
fn format_debug_node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let indent: String = "  ".repeat(depth);
    let node = doc.node(id);
    let value = node.value.replace('\n', "\\n");

    match node.kind {
        NodeKind::Element => {
            let _ = write!(out, "{indent}ELEMENT {} path={}", node.name, node.path);
            if !value.is_empty() {
                let _ = write!(out, " value={value:?}");
            }
            out.push('\n');
            for attr in &node.attributes {
                let _ = writeln!(out, "{indent}  ATTRIBUTE {}={:?}", attr.name, attr.value);
            }
            for &child in &node.children {
                format_debug_node(doc, child, depth + 1, out);
            }
        }
        NodeKind::Comment => {
            let _ = writeln!(out, "{indent}COMMENT {value}");
        }
        NodeKind::CData => {
            let _ = writeln!(out, "{indent}CDATA {value}");
        }
    }
}

// ---------------------------------------------------------------------------
// Output writing
// ---------------------------------------------------------------------------

/// Where results go: stdout, or the `--output` file opened once for the
/// whole run.
struct Output {
    sink: Box<dyn Write>,
    label: String,
}

impl Output {
    fn open(path: Option<&str>) -> Result<Self, String> {
        match path {
            Some(path) => {
                let file =
                    fs::File::create(path).map_err(|e| format!("{path}: failed to create: {e}"))?;
                Ok(Self {
                    sink: Box::new(io::BufWriter::new(file)),
                    label: path.to_string(),
                })
            }
            None => Ok(Self {
                sink: Box::new(io::stdout()),
                label: "stdout".to_string(),
            }),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<(), String> {
        self.sink
            .write_all(data)
            .and_then(|()| self.sink.flush())
            .map_err(|e| format!("failed to write to {}: {e}", self.label))
    }
}

/// Maps the result of writing a file's output to an exit code.
fn finish(filename: &str, written: Result<(), String>) -> u8 {
    match written {
        Ok(()) => EXIT_SUCCESS,
        Err(msg) => {
            eprintln!("{filename}: {msg}");
            EXIT_ERROR
        }
    }
}
