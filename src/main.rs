use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use fatshell::error::FatError;
use fatshell::session::Session;

/// Interactive shell for inspecting and mutating a FAT32 volume image.
#[derive(Parser, Debug)]
#[command(name = "fatshell", version, about)]
struct Args {
    /// Path to the FAT32 image file to mount.
    image: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let session = match Session::mount(&args.image) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("fatshell: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match fatshell::cli::run(session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(FatError::Io(e)) => {
            eprintln!("fatshell: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("fatshell: {}", e);
            ExitCode::FAILURE
        }
    }
}
