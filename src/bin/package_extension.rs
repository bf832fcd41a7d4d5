// Zips a browser extension directory, leaving out `.backup` files.
//
// Usage: package-extension <source_dir> <output_zip>

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use events_admin::core::packaging::{build_archive, PackageConfig, PackageError};

const USAGE: &str = "Usage: package-extension <source_dir> <output_zip>";

/// Runs the command for `args` (program name first) and returns the exit code.
fn run<W: Write>(args: &[String], out: &mut W) -> u8 {
    if args.len() != 3 {
        let _ = writeln!(out, "{}", USAGE);
        return 1;
    }

    let (source, output) = (Path::new(&args[1]), Path::new(&args[2]));
    match build_archive(source, output, &PackageConfig::default()) {
        Ok(report) => {
            let _ = writeln!(out, "✓ Successfully created: {}", report.output.display());
            let _ = writeln!(out, "✓ Archive contains {} files", report.verified);
            0
        }
        Err(PackageError::SourceNotFound(path)) => {
            tracing::error!(source = %path.display(), "Source directory not found");
            let _ = writeln!(
                out,
                "❌ Error: Source directory not found: {}",
                path.display()
            );
            1
        }
        Err(e) => {
            tracing::error!("Packaging failed: {}", e);
            let _ = writeln!(out, "❌ Error creating zip: {}", e);
            1
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().collect();
    ExitCode::from(run(&args, &mut std::io::stdout()))
}
