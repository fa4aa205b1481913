use crate::{CaseInsensitive, CharComparer, CharCursor, Cursor, CursorOptions, CursorResult};
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::thread;

fn print_help(program: &str) {
    eprintln!(
        "Usage: {prog} [OPTIONS] [INPUT]\n\
         \n\
         Scan INPUT (default stdin) for PATTERN occurrences and print\n\
         `offset<TAB>pattern` for each match, offsets counted in characters.\n\
         \n\
         Options:\n\
           -p, --pattern PATTERN     Pattern to look for (repeatable, required)\n\
           -i, --ignore-case         Compare with Unicode case folding\n\
               --eager               Load the whole input before scanning\n\
               --workers N           Threads sharing one lazy reader (default 1)\n\
               --buffer-size BYTES   Read buffer for lazy decoding (default 8192)\n\
               --strict-utf8         Fail on invalid UTF-8 instead of replacing it\n\
               --count               Print only the number of matches\n\
               --log                 Print the read log to stderr (lazy input only)\n\
           -h, --help                Show this help\n",
        prog = program
    );
}

fn usage_error(msg: &str) -> ! {
    eprintln!("{}", msg);
    std::process::exit(2);
}

fn parse_args() -> (CursorOptions, CliMode) {
    let mut args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "lazycursor".to_string());
    if !args.is_empty() {
        args.remove(0);
    }

    let mut opts = CursorOptions::default();
    let mut mode = CliMode {
        input: None,
        patterns: Vec::new(),
        ignore_case: false,
        eager: false,
        workers: 1,
        count: false,
        log: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help(&program);
                std::process::exit(0);
            }
            "-p" | "--pattern" => {
                i += 1;
                if i >= args.len() {
                    usage_error("Missing PATTERN for --pattern");
                }
                if args[i].is_empty() {
                    usage_error("PATTERN must not be empty");
                }
                mode.patterns.push(args[i].clone());
            }
            "-i" | "--ignore-case" => {
                mode.ignore_case = true;
            }
            "--eager" => {
                mode.eager = true;
            }
            "--workers" => {
                i += 1;
                if i >= args.len() {
                    usage_error("Missing N for --workers");
                }
                match args[i].parse::<usize>() {
                    Ok(n) if n > 0 => mode.workers = n,
                    _ => usage_error("--workers expects a positive integer"),
                }
            }
            "--buffer-size" => {
                i += 1;
                if i >= args.len() {
                    usage_error("Missing BYTES for --buffer-size");
                }
                match args[i].parse::<usize>() {
                    Ok(n) if n >= 4 => opts.read_buffer_size = n,
                    _ => usage_error("--buffer-size expects an integer of at least 4"),
                }
            }
            "--strict-utf8" => {
                opts.lossy_utf8 = false;
            }
            "--count" => {
                mode.count = true;
            }
            "--log" => {
                mode.log = true;
                opts.logging = true;
            }
            s if s.starts_with('-') && s.len() > 1 => {
                usage_error(&format!("Unknown option: {}", s));
            }
            path => {
                mode.input = Some(path.to_string());
            }
        }
        i += 1;
    }

    if mode.patterns.is_empty() {
        print_help(&program);
        std::process::exit(2);
    }
    if mode.log && mode.eager {
        usage_error("--log reads from a lazy reader and cannot be combined with --eager");
    }
    (opts, mode)
}

struct CliMode {
    input: Option<String>,
    patterns: Vec<String>,
    ignore_case: bool,
    eager: bool,
    workers: usize,
    count: bool,
    log: bool,
}

/// One match: character offset and index into the pattern list.
pub type Hit = (usize, usize);

/// Finds every offset where one of `patterns` matches, sorted by offset then
/// pattern order. With `workers > 1` the cursors of all workers share `root`'s
/// reader; worker `k` tests the offsets congruent to `k` modulo `workers`.
pub fn scan(
    root: Cursor,
    patterns: &[String],
    comparer: Option<&dyn CharComparer>,
    workers: usize,
) -> CursorResult<Vec<Hit>> {
    let workers = workers.max(1);
    if workers == 1 {
        return scan_lane(root, patterns, comparer, 0, 1);
    }
    let mut hits = Vec::new();
    thread::scope(|scope| -> CursorResult<()> {
        let handles: Vec<_> = (0..workers)
            .map(|lane| {
                let cursor = root.clone();
                scope.spawn(move || scan_lane(cursor, patterns, comparer, lane, workers))
            })
            .collect();
        // let the slowest worker, not the root, decide what stays buffered
        drop(root);
        for handle in handles {
            match handle.join() {
                Ok(lane_hits) => hits.extend(lane_hits?),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        Ok(())
    })?;
    hits.sort_unstable();
    Ok(hits)
}

fn scan_lane(
    mut cursor: Cursor,
    patterns: &[String],
    comparer: Option<&dyn CharComparer>,
    lane: usize,
    lanes: usize,
) -> CursorResult<Vec<Hit>> {
    let mut hits = Vec::new();
    let mut offset = 0usize;
    while cursor.current_char().is_some() {
        if offset % lanes == lane {
            for (idx, pattern) in patterns.iter().enumerate() {
                if cursor.matches(pattern, comparer)? {
                    hits.push((offset, idx));
                }
            }
        }
        cursor = cursor.next();
        offset += 1;
    }
    Ok(hits)
}

fn open_root(mode: &CliMode, opts: &CursorOptions) -> Result<Cursor, Box<dyn std::error::Error>> {
    if mode.eager {
        let content = match &mode.input {
            Some(path) => fs::read_to_string(path)?,
            None => {
                let mut s = String::new();
                io::stdin().read_to_string(&mut s)?;
                s
            }
        };
        return Ok(Cursor::from_text(&content));
    }
    let root = match &mode.input {
        Some(path) => Cursor::from_reader(File::open(path)?, opts)?,
        None => Cursor::from_reader(io::stdin(), opts)?,
    };
    Ok(root)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (opts, mode) = parse_args();

    let root = open_root(&mode, &opts)?;
    let reader = root.reader().cloned();
    let comparer: Option<&dyn CharComparer> = if mode.ignore_case {
        Some(&CaseInsensitive)
    } else {
        None
    };
    let hits = scan(root, &mode.patterns, comparer, mode.workers)?;

    if let Some(reader) = &reader {
        if mode.log {
            let mut err = io::stderr().lock();
            for entry in reader.take_log() {
                #[cfg(feature = "serde")]
                {
                    writeln!(err, "{}", serde_json::to_string(&entry)?)?;
                }
                #[cfg(not(feature = "serde"))]
                {
                    writeln!(err, "{:?}", entry)?;
                }
            }
        }
        if let Some(fault) = reader.take_fault() {
            return Err(fault.into());
        }
    }

    let mut out = BufWriter::new(io::stdout());
    if mode.count {
        writeln!(out, "{}", hits.len())?;
    } else {
        for (offset, idx) in hits {
            writeln!(out, "{}\t{}", offset, mode.patterns[idx])?;
        }
    }
    out.flush()?;
    Ok(())
}
