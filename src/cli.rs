// Command-line inspector for sprite files.
//
// Every subcommand decodes one file and prints a report about it, either
// as plain text or (with `--json`) as a JSON document on stdout.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use crate::decode::{DEFAULT_MAX_CEL_BYTES, DecodeOptions};
use crate::document::{CelKind, Color, Document, LayerId, UserData};
use crate::io::decode_file_with_options;

// ---------------------------------------------------------------------------
// Byte size parsing (supports K, M, G suffixes)
// ---------------------------------------------------------------------------

fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size string".into());
    }
    let (num_part, multiplier) = match s.as_bytes().last() {
        Some(b'k' | b'K') => (&s[..s.len() - 1], 1024u64),
        Some(b'm' | b'M') => (&s[..s.len() - 1], 1024 * 1024),
        Some(b'g' | b'G') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        _ => (s, 1u64),
    };
    let num: u64 = num_part
        .trim()
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size overflow: '{s}'"))
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Aseprite sprite inspector.
#[derive(Parser, Debug)]
#[command(
    name = "asegraph",
    version,
    about = "Inspect decoded Aseprite sprite files",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Quiet mode (only errors are logged).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print reports as JSON.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print canvas size and entity counts.
    Info(FileArgs),
    /// Print the layer tree.
    Layers(FileArgs),
    /// Print animation tags and the frames they cover.
    Tags(FileArgs),
    /// Print slices.
    Slices(FileArgs),
    /// Print every cel with a fingerprint of its pixels.
    Cels(FileArgs),
}

#[derive(Args, Debug)]
struct FileArgs {
    /// Sprite file to decode.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Decode pixels of invisible layers too.
    #[arg(long = "load-hidden")]
    load_hidden: bool,

    /// Largest accepted cel buffer (supports K/M/G suffix). Unlimited by default.
    #[arg(long = "max-cel-size", value_parser = parse_byte_size)]
    max_cel_size: Option<u64>,
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Info,
    Layers,
    Tags,
    Slices,
    Cels,
}

struct Options {
    command: Command,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    input_file: PathBuf,
    decode: DecodeOptions,
}

fn resolve_options(cli: Cli) -> Options {
    let (command, args) = match cli.command {
        Cmd::Info(a) => (Command::Info, a),
        Cmd::Layers(a) => (Command::Layers, a),
        Cmd::Tags(a) => (Command::Tags, a),
        Cmd::Slices(a) => (Command::Slices, a),
        Cmd::Cels(a) => (Command::Cels, a),
    };

    Options {
        command,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        input_file: args.input,
        decode: DecodeOptions {
            load_hidden_pixels: args.load_hidden,
            max_cel_bytes: args.max_cel_size.map_or(DEFAULT_MAX_CEL_BYTES, |n| {
                usize::try_from(n).unwrap_or(usize::MAX)
            }),
        },
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("asegraph".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let opts = resolve_options(cli);
        let _ = log_filter(&opts);
    }
}

fn log_filter(opts: &Options) -> &'static str {
    match (opts.quiet, opts.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        _ => "trace",
    }
}

// ---------------------------------------------------------------------------
// Report helpers
// ---------------------------------------------------------------------------

fn color_hex(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
}

fn user_data_json(ud: &UserData) -> Value {
    json!({
        "text": ud.text,
        "color": ud.color.map(color_hex),
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn info_report(doc: &Document, opts: &Options) -> (Value, String) {
    let json = json!({
        "file": opts.input_file.display().to_string(),
        "width": doc.width(),
        "height": doc.height(),
        "frames": doc.frames().len(),
        "layers": doc.layers().len(),
        "cels": doc.cels().len(),
        "tags": doc.tags().len(),
        "slices": doc.slices().len(),
        "duration_ms": doc.total_duration_ms(),
    });
    let text = format!(
        "{}: {}x{}, {} frames ({} ms), {} layers, {} cels, {} tags, {} slices",
        opts.input_file.display(),
        doc.width(),
        doc.height(),
        doc.frames().len(),
        doc.total_duration_ms(),
        doc.layers().len(),
        doc.cels().len(),
        doc.tags().len(),
        doc.slices().len()
    );
    (json, text)
}

fn layers_report(doc: &Document) -> (Value, String) {
    fn walk(doc: &Document, id: LayerId, text: &mut String) {
        let Some(layer) = doc.layer(id) else { return };
        text.push_str(&format!(
            "{}{} [{}{}] opacity {} {}\n",
            "  ".repeat(layer.depth as usize),
            layer.name,
            if layer.is_group() { "group, " } else { "" },
            if layer.visible { "visible" } else { "hidden" },
            layer.opacity,
            layer.blend_mode.name()
        ));
        for &child in &layer.children {
            walk(doc, child, text);
        }
    }

    let mut text = String::new();
    for root in doc.root_layers() {
        walk(doc, root, &mut text);
    }

    let json = Value::Array(
        doc.layers()
            .iter()
            .enumerate()
            .map(|(i, l)| {
                json!({
                    "index": i,
                    "name": l.name,
                    "group": l.is_group(),
                    "visible": l.visible,
                    "opacity": l.opacity,
                    "blend_mode": l.blend_mode.name(),
                    "parent": l.parent.map(LayerId::index),
                    "children": l.children.iter().map(|c| c.index()).collect::<Vec<_>>(),
                    "user_data": user_data_json(&l.user_data),
                })
            })
            .collect(),
    );
    (json, text)
}

fn tags_report(doc: &Document) -> (Value, String) {
    let mut text = String::new();
    let mut entries = Vec::with_capacity(doc.tags().len());
    for tag in doc.tags() {
        text.push_str(&format!(
            "{} frames {}..={} {} {}\n",
            tag.name,
            tag.from,
            tag.to,
            tag.direction.name(),
            color_hex(tag.color)
        ));
        entries.push(json!({
            "name": tag.name,
            "from": tag.from,
            "to": tag.to,
            "direction": tag.direction.name(),
            "color": color_hex(tag.color),
            "frames": tag.frames.iter().map(|f| f.index()).collect::<Vec<_>>(),
        }));
    }
    (Value::Array(entries), text)
}

fn slices_report(doc: &Document) -> (Value, String) {
    let mut text = String::new();
    let mut entries = Vec::with_capacity(doc.slices().len());
    for s in doc.slices() {
        let b = s.bounds;
        text.push_str(&format!(
            "{} at ({}, {}) size {}x{}{}{}\n",
            s.name,
            b.origin.x,
            b.origin.y,
            b.size.width,
            b.size.height,
            if s.nine_slice.is_some() { " 9-slice" } else { "" },
            s.pivot
                .map(|p| format!(" pivot ({}, {})", p.x, p.y))
                .unwrap_or_default()
        ));
        let nine_slice = s
            .nine_slice
            .map(|r| json!([r.origin.x, r.origin.y, r.size.width, r.size.height]));
        entries.push(json!({
            "name": s.name,
            "x": b.origin.x,
            "y": b.origin.y,
            "width": b.size.width,
            "height": b.size.height,
            "nine_slice": nine_slice,
            "pivot": s.pivot.map(|p| json!([p.x, p.y])),
            "user_data": user_data_json(&s.user_data),
        }));
    }
    (Value::Array(entries), text)
}

fn cels_report(doc: &Document) -> (Value, String) {
    let mut text = String::new();
    let mut entries = Vec::with_capacity(doc.cels().len());
    for cel in doc.cels() {
        let digest = cel.pixels.as_ref().map(|p| sha256_hex(&p.read()));
        let kind = match cel.kind {
            CelKind::Raw => "raw".to_string(),
            CelKind::Compressed => "compressed".to_string(),
            CelKind::Linked { frame } => format!("linked->{}", frame.index()),
        };
        text.push_str(&format!(
            "frame {} layer {} {} at ({}, {}) {}x{} {}\n",
            cel.frame.index(),
            cel.layer.index(),
            kind,
            cel.position.x,
            cel.position.y,
            cel.size.width,
            cel.size.height,
            digest.as_deref().unwrap_or("(no pixels)")
        ));
        entries.push(json!({
            "frame": cel.frame.index(),
            "layer": cel.layer.index(),
            "kind": kind,
            "x": cel.position.x,
            "y": cel.position.y,
            "width": cel.size.width,
            "height": cel.size.height,
            "opacity": cel.opacity,
            "sha256": digest,
            "user_data": user_data_json(&cel.user_data),
        }));
    }
    (Value::Array(entries), text)
}

fn cmd_report(opts: &Options) -> i32 {
    let doc = match decode_file_with_options(&opts.input_file, &opts.decode) {
        Ok(doc) => doc,
        Err(e) => {
            if opts.json_output {
                let json = json!({
                    "file": opts.input_file.display().to_string(),
                    "error": e.kind_name(),
                    "message": e.to_string(),
                });
                println!("{json}");
            }
            eprintln!("asegraph: {}: {e}", opts.input_file.display());
            return 1;
        }
    };

    let (json, text) = match opts.command {
        Command::Info => info_report(&doc, opts),
        Command::Layers => layers_report(&doc),
        Command::Tags => tags_report(&doc),
        Command::Slices => slices_report(&doc),
        Command::Cels => cels_report(&doc),
    };

    if opts.json_output {
        match serde_json::to_string_pretty(&json) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("asegraph: json encoding failed: {e}");
                return 1;
            }
        }
    } else {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&opts)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    process::exit(cmd_report(&opts));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_opts(args: &[&str]) -> Options {
        let argv: Vec<String> = std::iter::once("asegraph".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let cli = Cli::try_parse_from(argv).expect("cli parse failed");
        resolve_options(cli)
    }

    #[test]
    fn parse_byte_size_suffixes() {
        assert_eq!(parse_byte_size("1").unwrap(), 1);
        assert_eq!(parse_byte_size("2K").unwrap(), 2 * 1024);
        assert_eq!(parse_byte_size("3m").unwrap(), 3 * 1024 * 1024);
        assert_eq!(parse_byte_size("4G").unwrap(), 4 * 1024 * 1024 * 1024);
        assert!(parse_byte_size("").is_err());
        assert!(parse_byte_size("12Q").is_err());
    }

    #[test]
    fn subcommands_map() {
        assert_eq!(parse_opts(&["info", "a.ase"]).command, Command::Info);
        assert_eq!(parse_opts(&["layers", "a.ase"]).command, Command::Layers);
        assert_eq!(parse_opts(&["tags", "a.ase"]).command, Command::Tags);
        assert_eq!(parse_opts(&["slices", "a.ase"]).command, Command::Slices);
        assert_eq!(parse_opts(&["cels", "a.ase"]).command, Command::Cels);
    }

    #[test]
    fn decode_flags_map_to_options() {
        let opts = parse_opts(&["cels", "--load-hidden", "--max-cel-size", "1M", "hero.aseprite"]);
        assert!(opts.decode.load_hidden_pixels);
        assert_eq!(opts.decode.max_cel_bytes, 1024 * 1024);
        assert_eq!(opts.input_file, PathBuf::from("hero.aseprite"));

        let defaults = parse_opts(&["info", "hero.aseprite"]);
        assert!(!defaults.decode.load_hidden_pixels);
        assert_eq!(defaults.decode.max_cel_bytes, DEFAULT_MAX_CEL_BYTES);
    }

    #[test]
    fn verbosity_and_quiet() {
        let v = parse_opts(&["-v", "-v", "-v", "info", "x"]);
        assert_eq!(v.verbose, 2);
        assert_eq!(log_filter(&v), "trace");
        assert_eq!(log_filter(&parse_opts(&["info", "x"])), "warn");
        assert_eq!(log_filter(&parse_opts(&["--quiet", "info", "x"])), "error");
        assert!(parse_opts(&["--json", "tags", "x"]).json_output);
    }

    #[test]
    fn fuzz_parse_tolerates_garbage() {
        for args in [
            vec![],
            vec!["--max-cel-size"],
            vec!["cels", "--max-cel-size", "99999999999G", "f"],
            vec!["-q", "-v", "info", "f"],
        ] {
            let args: Vec<String> = args.into_iter().map(String::from).collect();
            fuzz_try_parse_args(&args);
        }
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
