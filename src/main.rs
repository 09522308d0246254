use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::PathBuf;

use utf_rs::{ErrorCode, TranscodeResult};

/// Encoding forms selectable with --validate
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncodingArg {
    Utf8,
    Utf16le,
    Utf16be,
    Utf32le,
    Utf32be,
}

impl EncodingArg {
    fn name(self) -> &'static str {
        match self {
            EncodingArg::Utf8 => "UTF-8",
            EncodingArg::Utf16le => "UTF-16LE",
            EncodingArg::Utf16be => "UTF-16BE",
            EncodingArg::Utf32le => "UTF-32LE",
            EncodingArg::Utf32be => "UTF-32BE",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    long_version = concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("BUILD_GIT_HASH"), " ", env!("BUILD_DATE"), ", ", env!("BUILD_TARGET"), ")"
    ),
    about = "Validate, count, and detect Unicode encodings in FILEs.",
    long_about = r#"Validate, count, and detect Unicode encodings in each FILE.
Routines run on the fastest SIMD backend the CPU supports; exit status is 1
if any input fails validation."#
)]
struct UtfArgs {
    /// Report every encoding each input could be
    #[arg(short = 'd', long = "detect", action = ArgAction::SetTrue)]
    detect: bool,

    /// Validate each input as the given encoding
    #[arg(short = 'e', long = "validate", value_name = "ENCODING")]
    validate: Option<EncodingArg>,

    /// Print the UTF-8 code point count of each input
    #[arg(short = 'c', long = "count", action = ArgAction::SetTrue)]
    count: bool,

    /// Print the selected SIMD backend and exit
    #[arg(long = "backend", action = ArgAction::SetTrue)]
    backend: bool,

    /// Input files; use '-' for stdin. If empty, read from stdin.
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    files: Vec<PathBuf>,
}

fn main() {
    match run() {
        Ok(all_valid) => {
            if !all_valid {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("utf-rs: {}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let mut args = UtfArgs::parse();

    if args.backend {
        println!("{}", utf_rs::active_backend());
        return Ok(true);
    }

    // Default action when no mode flag is given
    if !args.detect && args.validate.is_none() && !args.count {
        args.detect = true;
    }

    let mut all_valid = true;
    if args.files.is_empty() {
        let content = read_stdin()?;
        all_valid &= process_input(&args, &content, None);
    } else {
        for file_path in &args.files {
            let content = if file_path.as_os_str() == "-" {
                read_stdin()?
            } else {
                std::fs::read(file_path)
                    .with_context(|| format!("failed to read file '{}'", file_path.display()))?
            };
            all_valid &= process_input(&args, &content, Some(file_path));
        }
    }

    Ok(all_valid)
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

fn process_input(args: &UtfArgs, content: &[u8], file_path: Option<&PathBuf>) -> bool {
    let label = file_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut valid = true;

    if args.detect {
        println!("{}: {}", label, utf_rs::detect_encodings(content));
    }

    if let Some(encoding) = args.validate {
        let result = validate_as(encoding, content);
        match result.error {
            ErrorCode::Success => println!("{}: valid {}", label, encoding.name()),
            code => {
                println!(
                    "{}: invalid {} at unit {}: {}",
                    label,
                    encoding.name(),
                    result.count,
                    code
                );
                valid = false;
            }
        }
    }

    if args.count {
        println!("{}: {} code points", label, utf_rs::count_utf8(content));
    }

    valid
}

/// Validate a byte buffer as the requested encoding form.
///
/// Multi-byte forms are reassembled from the stored byte order; a buffer
/// length that is not a multiple of the unit width is reported as a
/// truncated sequence at the last whole unit.
fn validate_as(encoding: EncodingArg, content: &[u8]) -> TranscodeResult {
    match encoding {
        EncodingArg::Utf8 => utf_rs::validate_utf8_with_errors(content),
        EncodingArg::Utf16le | EncodingArg::Utf16be => {
            if content.len() % 2 != 0 {
                return TranscodeResult {
                    error: ErrorCode::TooShort,
                    count: content.len() / 2,
                };
            }
            // Preserve the stored byte layout; the le/be entry point applies
            // the byte order.
            let units: Vec<u16> = content
                .chunks_exact(2)
                .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
                .collect();
            if encoding == EncodingArg::Utf16le {
                utf_rs::validate_utf16le_with_errors(&units)
            } else {
                utf_rs::validate_utf16be_with_errors(&units)
            }
        }
        EncodingArg::Utf32le | EncodingArg::Utf32be => {
            if content.len() % 4 != 0 {
                return TranscodeResult {
                    error: ErrorCode::TooShort,
                    count: content.len() / 4,
                };
            }
            let units: Vec<u32> = content
                .chunks_exact(4)
                .map(|quad| {
                    let bytes = [quad[0], quad[1], quad[2], quad[3]];
                    if encoding == EncodingArg::Utf32le {
                        u32::from_le_bytes(bytes)
                    } else {
                        u32::from_be_bytes(bytes)
                    }
                })
                .collect();
            utf_rs::validate_utf32_with_errors(&units)
        }
    }
}
