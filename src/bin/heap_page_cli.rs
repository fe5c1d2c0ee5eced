//! Simple CLI for exercising a heap page in memory.
//!
//! Usage:
//!   heap_page_cli <page_id> [--check] <command> [args...] [<command> [args...]]...
//!
//! Commands run in order against one freshly formatted page:
//!   insert <text>        - Insert a record
//!   delete <slot>        - Delete the record in a slot
//!   get <slot>           - Print the record in a slot
//!   scan                 - Print every live record
//!   space                - Show free space figures
//!   fill <count> <len>   - Insert up to count records of len bytes
//!   dump                 - Print header and slot directory
//!   json                 - Print header and slot directory as JSON

use heap_page::{HeapPage, PageConfig, PageId, Rid, StorageError};
use std::env;
use std::process::exit;

fn usage() -> ! {
    eprintln!("Usage: heap_page_cli <page_id> [--check] <command> [args...]...");
    eprintln!("Commands:");
    eprintln!("  insert <text>        - Insert a record");
    eprintln!("  delete <slot>        - Delete the record in a slot");
    eprintln!("  get <slot>           - Print the record in a slot");
    eprintln!("  scan                 - Print every live record");
    eprintln!("  space                - Show free space figures");
    eprintln!("  fill <count> <len>   - Insert up to count records of len bytes");
    eprintln!("  dump                 - Print header and slot directory");
    eprintln!("  json                 - Print header and slot directory as JSON");
    exit(1);
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("ERROR: {}", msg);
    exit(1);
}

fn arg<'a>(args: &'a [String], at: usize, command: &str) -> &'a str {
    match args.get(at) {
        Some(value) => value.as_str(),
        None => fail(format!("missing argument for {}", command)),
    }
}

fn number(value: &str) -> usize {
    value
        .parse()
        .unwrap_or_else(|_| fail(format!("invalid number: {}", value)))
}

fn parse_slot(value: &str) -> Option<u32> {
    value.parse().ok()
}

fn slot_number(value: &str) -> u32 {
    parse_slot(value).unwrap_or_else(|| fail(format!("invalid slot: {}", value)))
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        usage();
    }

    let page_id = PageId::new(
        args[1]
            .parse()
            .unwrap_or_else(|_| fail(format!("invalid page id: {}", args[1]))),
    );

    let mut at = 2;
    let mut config = PageConfig::new();
    if args[at] == "--check" {
        config = config.verify_invariants(true);
        at += 1;
    }

    let mut page = HeapPage::new(page_id).with_config(config);

    while at < args.len() {
        let command = args[at].as_str();
        at += 1;

        match command {
            "insert" => {
                let text = arg(&args, at, command);
                at += 1;

                match page.insert_record(text.as_bytes()) {
                    Ok(rid) => println!("RID: {}", rid),
                    Err(e) if e.is_exhausted() => println!("FULL"),
                    Err(e) => fail(e),
                }
            }

            "delete" => {
                let slot = slot_number(arg(&args, at, command));
                at += 1;

                match page.delete_record(Rid::new(page_id, slot)) {
                    Ok(()) => println!("DELETED"),
                    Err(e) if e.is_invalid_reference() => println!("NOT_FOUND"),
                    Err(e) => fail(e),
                }
            }

            "get" => {
                let slot = slot_number(arg(&args, at, command));
                at += 1;

                match page.return_record(Rid::new(page_id, slot)) {
                    Ok(bytes) => match std::str::from_utf8(bytes) {
                        Ok(s) => println!("{}", s),
                        Err(_) => println!("<binary data>"),
                    },
                    Err(StorageError::InvalidRecord { .. }) => println!("NOT_FOUND"),
                    Err(e) => fail(e),
                }
            }

            "scan" => {
                println!("COUNT: {}", page.record_count());
                for (rid, bytes) in page.records() {
                    println!("{} -> {}", rid.slot_no, String::from_utf8_lossy(bytes));
                }
            }

            "space" => {
                println!("available: {}", page.available_space());
                println!("max_record: {}", page.max_record_len());
                println!("slots: {}", page.slot_count());
                println!("records: {}", page.record_count());
                println!("record_bytes: {}", page.header().record_bytes());
            }

            "fill" => {
                let count = number(arg(&args, at, command));
                let len = number(arg(&args, at + 1, command));
                at += 2;

                let mut inserted = 0;
                for i in 0..count {
                    let record: Vec<u8> = (0..len).map(|j| b'a' + ((i + j) % 26) as u8).collect();
                    match page.insert_record(&record) {
                        Ok(_) => inserted += 1,
                        Err(e) if e.is_exhausted() => break,
                        Err(e) => fail(e),
                    }
                }
                println!("INSERTED: {}", inserted);
            }

            "dump" => println!("{}", page.dump()),

            "json" => match page.dump().to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => fail(e),
            },

            _ => {
                eprintln!("Unknown command: {}", command);
                exit(1);
            }
        }
    }
}
