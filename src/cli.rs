//! Line-oriented REPL: prompt rendering, tokenization, and the command
//! dispatch table with exact arity checks. Everything here is a thin
//! collaborator over [`ops`]; no on-disk format knowledge lives in this
//! module.

use std::io::{self, Write};

use crate::error::FatError;
use crate::ops;
use crate::session::Session;

fn prompt(session: &Session) -> String {
    if session.path.is_root() {
        "fatshell:[img/] $ ".to_string()
    } else {
        format!("fatshell:[{}/] $ ", session.prompt_dir())
    }
}

fn report(err: FatError) {
    let message = match err {
        FatError::InvalidName => "invalid name".to_string(),
        FatError::NotFound => "no such file or directory".to_string(),
        FatError::AlreadyExists => "already exists".to_string(),
        FatError::WrongKind => "wrong kind".to_string(),
        FatError::DirectoryNotEmpty => "directory not empty".to_string(),
        FatError::OutOfSpace => "out of space".to_string(),
        FatError::NotFat32 => "not a fat32 volume".to_string(),
        FatError::Io(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    println!("{}", message);
}

/// Runs the REPL to completion, reading lines from `stdin` until `exit` or
/// EOF. Returns `Ok(())` on a clean exit; an `Io` error here is fatal and
/// unwinds out of the REPL rather than being reported and continued.
pub fn run(mut session: Session) -> Result<(), FatError> {
    let stdin = io::stdin();
    loop {
        print!("{}", prompt(&session));
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let tokens: Vec<&str> = line.trim().split_whitespace().collect();
        let Some(&cmd) = tokens.first() else {
            continue;
        };
        let args = &tokens[1..];

        match cmd {
            "exit" => {
                if args.is_empty() {
                    session.close()?;
                    break;
                }
                println!("exit: Invalid parameter count");
            }
            "info" => {
                if args.is_empty() {
                    println!("{}", ops::info(&session));
                } else {
                    println!("info: Invalid parameter count");
                }
            }
            "ls" => {
                if args.is_empty() {
                    for line in ops::ls(&session) {
                        println!("{}", line);
                    }
                } else {
                    println!("ls: Invalid parameter count");
                }
            }
            "cluster" => match args {
                [n] => match n.parse::<u32>() {
                    Ok(cluster) => match ops::cluster_dump(&mut session, cluster) {
                        Ok(dump) => print!("{}", dump),
                        Err(e) => report(e),
                    },
                    Err(_) => report(FatError::InvalidName),
                },
                _ => println!("cluster: Invalid parameter count"),
            },
            "cd" => match args {
                [dir] => {
                    if let Err(e) = ops::cd(&mut session, dir) {
                        report(e);
                    }
                }
                _ => println!("cd: Invalid parameter count"),
            },
            "pwd" => {
                if args.is_empty() {
                    println!("{}", ops::pwd(&session));
                } else {
                    println!("pwd: Invalid parameter count");
                }
            }
            "attr" => match args {
                [name] => match ops::attr(&session, name) {
                    Ok(text) => println!("{}", text),
                    Err(e) => report(e),
                },
                _ => println!("attr: Invalid parameter count"),
            },
            "touch" => match args {
                [name] => {
                    if let Err(e) = ops::touch(&mut session, name) {
                        report(e);
                    }
                }
                _ => println!("touch: Invalid parameter count"),
            },
            "mkdir" => match args {
                [name] => {
                    if let Err(e) = ops::mkdir(&mut session, name) {
                        report(e);
                    }
                }
                _ => println!("mkdir: Invalid parameter count"),
            },
            "rm" => match args {
                [name] => {
                    if let Err(e) = ops::rm(&mut session, name) {
                        report(e);
                    }
                }
                _ => println!("rm: Invalid parameter count"),
            },
            "rmdir" => match args {
                [name] => {
                    if let Err(e) = ops::rmdir(&mut session, name) {
                        report(e);
                    }
                }
                _ => println!("rmdir: Invalid parameter count"),
            },
            "rename" => match args {
                [old, new] => {
                    if let Err(e) = ops::rename(&mut session, old, new) {
                        report(e);
                    }
                }
                _ => println!("rename: Invalid parameter count"),
            },
            _ => {}
        }
    }
    Ok(())
}
