// src/cli.rs
use std::{env, error::Error, path::PathBuf};

use crate::params::{Params, TaskKind};
use crate::progress::ConsoleProgress;

pub fn run() -> Result<(), Box<dyn Error>> {
    let params = parse_cli()?;
    let mut progress = ConsoleProgress::new();
    crate::runner::run(&params, &mut progress).map(|_| ())
}

fn print_help_and_exit() -> ! {
    eprintln!("{}", include_str!("cli_help.txt"));
    std::process::exit(0);
}

fn parse_cli() -> Result<Params, Box<dyn Error>> {
    let mut args = env::args().skip(1);

    let task = match args.next().as_deref() {
        Some("fetch") => TaskKind::Fetch,
        Some("extract") => TaskKind::Extract,
        Some("links") => TaskKind::Links,
        Some("mirror") => TaskKind::Mirror,
        Some("evidence") => TaskKind::Evidence,
        Some("dedup") => TaskKind::Dedup,
        Some("mark") => TaskKind::Mark,
        Some("-h") | Some("--help") | None => print_help_and_exit(),
        Some(other) => return Err(format!("Unknown task: {}", other).into()),
    };

    let mut params = Params::new(task);
    while let Some(a) = args.next() {
        match a.as_str()
        {
            "--urls" => {
                let v = args.next().ok_or("Missing value for --urls")?;
                params.urls = PathBuf::from(v); }
            "--pages-dir" => {
                let v = args.next().ok_or("Missing value for --pages-dir")?;
                params.pages_dir = PathBuf::from(v); }
            "--evidence-dir" => {
                let v = args.next().ok_or("Missing value for --evidence-dir")?;
                params.evidence_dir = PathBuf::from(v); }
            "--report" => {
                let v = args.next().ok_or("Missing value for --report")?;
                params.report = Some(PathBuf::from(v)); }
            "-o" | "--out" => {
                let v = args.next().ok_or("Missing output path")?;
                params.out = Some(PathBuf::from(v)); }
            "--master-dir" => {
                let v = args.next().ok_or("Missing value for --master-dir")?;
                params.master_dir = PathBuf::from(v); }
            "--exclude-year" => {
                let v = args.next().ok_or("Missing value for --exclude-year")?;
                if v.len() != 4 || !v.chars().all(|c| c.is_ascii_digit()) {
                    return Err(format!("Invalid year: {}", v).into());
                }
                params.exclude_year = Some(v); }
            "--pause-ms" => {
                let v: u64 = args.next().ok_or("Missing value for --pause-ms")?.parse()?;
                params.pause_ms = v; }
            "-h" | "--help" => print_help_and_exit(),
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    Ok(params)
}
