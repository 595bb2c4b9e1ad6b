/// Interactive raw track console

use dez80::Instruction;

use rawtrack::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Command completer for the REPL
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                "dasm",
                "disassemble",
                "dump",
                "exit",
                "format",
                "headers",
                "help",
                "info",
                "load",
                "map",
                "new",
                "next",
                "open",
                "poke",
                "quirk",
                "quit",
                "read-sector",
                "save",
                "sectors",
            ],
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only complete the first word (command name)
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Get the path to the history file
fn history_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".rawtrack_history");
        p
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("=== RawTrack ===");
    println!("Interactive console for exploring raw MFM track archives.");
    println!("Type 'help' for available commands\n");

    let mut rl = match Editor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create editor: {}", e);
            return;
        }
    };
    rl.set_helper(Some(CommandCompleter::new()));

    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    let mut track: Option<RawTrack> = None;

    loop {
        let input = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                if let Some(history_path) = history_path() {
                    let _ = rl.save_history(&history_path);
                }
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        let parts = parse_command_line(input);
        if parts.is_empty() {
            continue;
        }
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "help" => print_help(),
            "quit" | "exit" => {
                if let Some(history_path) = history_path() {
                    let _ = rl.save_history(&history_path);
                }
                println!("Goodbye!");
                break;
            }
            "new" => {
                let length = parts
                    .get(1)
                    .and_then(|s| parse_number(s))
                    .unwrap_or(STANDARD_TRACK_SIZE);
                if length == 0 {
                    println!("Track length must be nonzero.");
                    continue;
                }
                track = Some(RawTrack::new(length));
                println!("Created blank {} byte track", length);
            }
            "format" => {
                let layout = match parts.get(1).map(String::as_str) {
                    Some("pc-hd") => TrackLayout::pc_high_density(),
                    _ => TrackLayout::msx_double_density(),
                };
                let cyl = parts.get(2).and_then(|s| parse_number(s)).unwrap_or(0) as u8;
                let head = parts.get(3).and_then(|s| parse_number(s)).unwrap_or(0) as u8;
                match RawTrack::builder().layout(layout).format(cyl, head).build() {
                    Ok(t) => {
                        println!("Formatted track {} head {} ({} bytes)", cyl, head, t.len());
                        track = Some(t);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "open" | "load" => {
                if parts.len() < 2 {
                    println!("Usage: open <path>");
                    continue;
                }
                match RawTrack::open(&parts[1]) {
                    Ok(t) => {
                        println!("Opened: {}", parts[1]);
                        track = Some(t);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "save" => {
                let Some(ref t) = track else {
                    println!("No track loaded.");
                    continue;
                };
                if parts.len() < 2 {
                    println!("Usage: save <path> [version]");
                    continue;
                }
                let version = parts
                    .get(2)
                    .and_then(|s| parse_number(s))
                    .map_or(format::TRACK_ARCHIVE_VERSION, |v| v as u8);
                let result = std::fs::File::create(&parts[1])
                    .map_err(TrackError::from)
                    .and_then(|mut file| io::write_track_version(&mut file, t, version));
                match result {
                    Ok(()) => println!("Saved: {} (v{})", parts[1], version),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "info" => match track {
                Some(ref t) => print_info(t),
                None => println!("No track loaded. Use 'open', 'new' or 'format' first."),
            },
            "headers" => match track {
                Some(ref t) => list_headers(t),
                None => println!("No track loaded."),
            },
            "sectors" => match track {
                Some(ref t) => list_sectors(&t.decode_all()),
                None => println!("No track loaded."),
            },
            "read-sector" => {
                let Some(ref t) = track else {
                    println!("No track loaded.");
                    continue;
                };
                let Some(number) = parts.get(1).and_then(|s| parse_number(s)) else {
                    println!("Usage: read-sector <sector>");
                    continue;
                };
                match t.decode_sector(number as u8) {
                    Some(sector) => print_sector(t, &sector),
                    None => println!("Sector {} not found ({})", number, Wd2793Status::new(Wd2793Status::RECORD_NOT_FOUND)),
                }
            }
            "next" => {
                let Some(ref t) = track else {
                    println!("No track loaded.");
                    continue;
                };
                let from = parts.get(1).and_then(|s| parse_number(s)).unwrap_or(0);
                match t.decode_next_sector(from) {
                    Some(sector) => list_sectors(&[sector]),
                    None => println!("No header on track."),
                }
            }
            "dump" => {
                let Some(ref t) = track else {
                    println!("No track loaded.");
                    continue;
                };
                let start = parts.get(1).and_then(|s| parse_number(s)).unwrap_or(0);
                let len = parts.get(2).and_then(|s| parse_number(s)).unwrap_or(256);
                let mut buf = vec![0u8; len];
                t.read_block(start as isize, &mut buf);
                print_hex_dump(&buf, start, len);
            }
            "poke" => {
                let Some(ref mut t) = track else {
                    println!("No track loaded.");
                    continue;
                };
                let (Some(pos), Some(value)) = (
                    parts.get(1).and_then(|s| parse_number(s)),
                    parts.get(2).and_then(|s| parse_number(s)),
                ) else {
                    println!("Usage: poke <position> <value> [idam]");
                    continue;
                };
                let idam = parts.get(3).is_some_and(|s| s == "idam");
                t.write(pos as isize, value as u8, idam);
                println!("{:05}: {:02X}{}", t.wrap_index(pos as isize), value as u8, if idam { " (IDAM)" } else { "" });
            }
            "quirk" => match track {
                Some(ref mut t) => {
                    let patched = t.apply_wd2793_read_track_quirk();
                    println!("Replaced {} sync bytes with {:02X}", patched, format::READ_TRACK_QUIRK_BYTE);
                }
                None => println!("No track loaded."),
            },
            "map" => match track {
                Some(ref t) => map::draw_track_map(t),
                None => println!("No track loaded."),
            },
            "disassemble" | "dasm" => {
                let Some(ref t) = track else {
                    println!("No track loaded.");
                    continue;
                };
                let number = parts.get(1).and_then(|s| parse_number(s)).unwrap_or(1);
                match t.decode_sector(number as u8) {
                    Some(sector) => {
                        let Some(offset) = sector.data_offset() else {
                            continue;
                        };
                        let mut payload = vec![0u8; sector.size_bytes()];
                        t.read_block(offset as isize, &mut payload);
                        println!("Sector {} {}:", number, sector.id);
                        disassemble_z80(&payload);
                    }
                    None => println!("Sector {} not found.", number),
                }
            }
            _ => {
                println!("Unknown command: {}. Type 'help' for available commands.", command);
            }
        }
    }
}

/// Parse command line input, respecting quoted strings
fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
            }
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn print_help() {
    println!("Available commands:");
    println!("  new [length]                   - Create a blank track (default 6250 bytes)");
    println!("  format [msx|pc-hd] [trk] [hd]  - Create a formatted track");
    println!("  open <path>                    - Open a track archive (use quotes for paths with spaces)");
    println!("  save <path> [version]          - Save the track archive (version 1 or 2)");
    println!("  info                           - Show track information");
    println!("  headers                        - List every indexed header, complete or not");
    println!("  sectors                        - List complete sectors");
    println!("  read-sector <n>                - Decode sector n and dump its payload");
    println!("  next [position]                - Decode the next header from a position");
    println!("  dump [position] [length]       - Hex dump raw track bytes");
    println!("  poke <pos> <value> [idam]      - Write a byte, optionally marking a header");
    println!("  quirk                          - Apply the WD2793 read-track sync byte quirk");
    println!("  map                            - Visual track map");
    println!("  disassemble [n]                - Disassemble Z80 code from sector n (dasm)");
    println!("  help                           - Show this help");
    println!("  quit, exit                     - Exit");
}

fn print_info(track: &RawTrack) {
    let sectors = track.decode_all();
    println!("Track length: {} bytes", track.len());
    println!("Headers: {}", track.idam_offsets().len());
    println!("Complete sectors: {}", sectors.len());
    println!(
        "Sectors with errors: {}",
        sectors.iter().filter(|s| s.has_error()).count()
    );
    println!(
        "Deleted sectors: {}",
        sectors.iter().filter(|s| s.is_deleted()).count()
    );
}

fn list_headers(track: &RawTrack) {
    let sectors: Vec<Sector> = track
        .idam_offsets()
        .iter()
        .filter_map(|&i| track.decode_sector_at(i))
        .collect();
    list_sectors(&sectors);

    let stale = track.idam_offsets().len() - sectors.len();
    if stale > 0 {
        println!("{} indexed positions no longer hold a header mark.", stale);
    }
}

fn list_sectors(sectors: &[Sector]) {
    if sectors.is_empty() {
        println!("No sectors found.");
        return;
    }

    println!(
        "{:<7} {:<6} {:<5} {:<6} {:<10} {:<8} {:<7} {:<8}",
        "Header", "Track", "Head", "Sector", "Size", "Data", "Deleted", "Status"
    );
    println!("{}", "-".repeat(64));

    for sector in sectors {
        let size = format!("{} ({})", sector.id.size_code, sector.size_bytes());
        let data = sector
            .data_offset()
            .map_or("-".to_string(), |o| o.to_string());
        let status = if sector.header_crc_error {
            "ID CRC".to_string()
        } else {
            sector.read_status().to_string()
        };
        println!(
            "{:<7} {:<6} {:<5} {:<6} {:<10} {:<8} {:<7} {:<8}",
            sector.header_offset,
            sector.id.track,
            sector.id.head,
            sector.id.sector,
            size,
            data,
            if sector.is_deleted() { "Yes" } else { "No" },
            status
        );
    }
}

fn print_sector(track: &RawTrack, sector: &Sector) {
    list_sectors(std::slice::from_ref(sector));
    if let Some(offset) = sector.data_offset() {
        let mut payload = vec![0u8; sector.size_bytes()];
        track.read_block(offset as isize, &mut payload);
        print_hex_dump(&payload, 0, 256);
    }
}

fn print_hex_dump(data: &[u8], base: usize, max_bytes: usize) {
    let len = data.len().min(max_bytes);

    for (i, chunk) in data[..len].chunks(16).enumerate() {
        print!("{:05}: ", base + i * 16);

        for (j, byte) in chunk.iter().enumerate() {
            print!("{:02X} ", byte);
            if j == 7 {
                print!(" ");
            }
        }

        // Pad if less than 16 bytes
        for j in chunk.len()..16 {
            print!("   ");
            if j == 7 {
                print!(" ");
            }
        }

        print!(" |");
        for byte in chunk {
            let c = if *byte >= 32 && *byte < 127 {
                *byte as char
            } else {
                '.'
            };
            print!("{}", c);
        }
        println!("|");
    }

    if data.len() > max_bytes {
        println!("... ({} more bytes)", data.len() - max_bytes);
    }
}

fn parse_number(s: &str) -> Option<usize> {
    if s.starts_with("0x") || s.starts_with("0X") {
        usize::from_str_radix(&s[2..], 16).ok()
    } else {
        s.parse().ok()
    }
}

fn disassemble_z80(data: &[u8]) {
    let mut slice: &[u8] = data;
    let mut address: usize = 0;

    while !slice.is_empty() {
        let start_len = slice.len();

        match Instruction::decode_one(&mut slice) {
            Ok(instruction) => {
                let bytes_consumed = start_len - slice.len();
                let bytes: Vec<String> = data[address..address + bytes_consumed]
                    .iter()
                    .map(|b| format!("{:02X}", b))
                    .collect();

                println!("{:04X}  {:<12} {}", address, bytes.join(" "), instruction);
                address += bytes_consumed;
            }
            Err(_) => {
                // Invalid instruction - show as data byte
                println!("{:04X}  {:02X}           DB {:02X}h", address, slice[0], slice[0]);
                slice = &slice[1..];
                address += 1;
            }
        }
    }
}
