use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use kitabu::dashboard::{heading, subtitle, tabs_for};
use kitabu::{
    Book, BookFilter, CatalogProvider, Key, KeyboardHub, Level, MountedViewer, PaginatedViewer,
    Role, SimulatedHost, StaticCatalog, ViewerOptions, ViewerState,
};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

fn main() -> ExitCode {
    env_logger::init();
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let mut rest = args.into_iter().skip(1).collect::<Vec<_>>();
    let pretty = pop_flag(&mut rest, "--pretty");

    if rest.is_empty() || rest[0] == "--help" || rest[0] == "-h" {
        print_help();
        return Ok(());
    }

    let cmd = rest.remove(0);
    match cmd.as_str() {
        "pages" => {
            let path = first_arg(&rest, "pages requires <book_json>")?;
            let book = Book::from_path(&path).map_err(display_err)?;
            let pages = book
                .pages
                .iter()
                .enumerate()
                .map(|(index, page)| {
                    json!({
                        "index": index,
                        "image": page.image,
                        "text": page.text,
                        "audio": page.has_audio().then(|| page.audio_ref.clone()),
                    })
                })
                .collect::<Vec<_>>();
            print_json(
                &json!({
                    "book": path,
                    "title": book.title,
                    "count": pages.len(),
                    "pages": pages,
                }),
                pretty,
            )?;
        }
        "read" => {
            let mut args = rest;
            let transition = pop_value(&mut args, "--transition-ms")?
                .map(|v| {
                    v.parse::<u64>()
                        .map_err(|_| format!("invalid --transition-ms value '{}'", v))
                })
                .transpose()?;
            let path = first_arg(&args, "read requires <book_json>")?;
            let book = Book::from_path(&path).map_err(display_err)?;
            let mut options = ViewerOptions::default();
            if let Some(ms) = transition {
                options = options.with_transition(Duration::from_millis(ms));
            }
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .map_err(|e| e.to_string())?;
            let result = runtime.block_on(read_session(book, options));
            // a stdin read may still be parked on a blocking thread
            runtime.shutdown_background();
            result?;
        }
        "tabs" => {
            let role = first_arg(&rest, "tabs requires <parent|child|author>")?
                .parse::<Role>()
                .map_err(display_err)?;
            let tabs = tabs_for(role)
                .iter()
                .map(|tab| json!({ "id": tab.id(), "label": tab.label() }))
                .collect::<Vec<_>>();
            print_json(
                &json!({
                    "role": role.as_str(),
                    "heading": heading(role),
                    "subtitle": subtitle(role),
                    "tabs": tabs,
                }),
                pretty,
            )?;
        }
        "books" => {
            let mut args = rest;
            let mut filter = BookFilter::any();
            if let Some(category) = pop_value(&mut args, "--category")? {
                filter = filter.with_category(category);
            }
            if let Some(age_group) = pop_value(&mut args, "--age-group")? {
                filter = filter.with_age_group(age_group);
            }
            if let Some(level) = pop_value(&mut args, "--level")? {
                filter = filter.with_level(parse_level(&level)?);
            }
            let path = first_arg(&args, "books requires <catalog_json>")?;
            let catalog = StaticCatalog::from_path(&path).map_err(display_err)?;
            let books = catalog.books(&filter).map_err(display_err)?;
            let output = json!({
                "catalog": path,
                "count": books.len(),
                "books": serde_json::to_value(&books).map_err(|e| e.to_string())?,
            });
            print_json(&output, pretty)?;
        }
        _ => {
            return Err(format!(
                "unknown command '{}'; run `kitabu --help` for usage",
                cmd
            ));
        }
    }

    Ok(())
}

async fn read_session(book: Book, options: ViewerOptions) -> Result<(), String> {
    let viewer = PaginatedViewer::new(book.clone()).map_err(display_err)?;
    let host = Arc::new(SimulatedHost::new());
    let keyboard = KeyboardHub::new();
    let mounted = MountedViewer::mount(viewer, host.clone(), &keyboard, options);
    let mut states = mounted.watch();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_page(&book, &mounted.state());
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.map_err(|e| e.to_string())? else {
                    break;
                };
                match line.trim() {
                    "n" | "next" => {
                        keyboard.dispatch(Key::ArrowRight.into());
                    }
                    "p" | "prev" => {
                        keyboard.dispatch(Key::ArrowLeft.into());
                    }
                    "f" => mounted.toggle_fullscreen().map_err(display_err)?,
                    "a" => mounted.toggle_audio().map_err(display_err)?,
                    "esc" => {
                        host.external_exit();
                    }
                    "q" | "quit" => break,
                    "" => {}
                    other => eprintln!("unknown input '{}' (n, p, f, a, esc, q)", other),
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *states.borrow_and_update();
                print_page(&book, &state);
            }
        }
    }

    mounted.unmount().await.map_err(display_err)?;
    Ok(())
}

fn print_page(book: &Book, state: &ViewerState) {
    if state.is_transitioning {
        println!("  ...");
        return;
    }
    let page = &book.pages[state.current_index];
    let mut flags = Vec::new();
    if state.is_fullscreen {
        flags.push("fullscreen");
    }
    if state.is_audio_enabled {
        flags.push("audio");
    }
    println!("== {} [{}]", book.title, flags.join(", "));
    println!("   [{}]", page.image);
    println!("   {}", page.text);
    println!(
        "-- {} | {} | Page {} of {}",
        book.author,
        book.level.label(),
        state.current_index + 1,
        book.pages.len()
    );
}

fn parse_level(value: &str) -> Result<Level, String> {
    serde_json::from_value::<Level>(Value::String(value.to_ascii_lowercase()))
        .map_err(|_| format!("invalid --level value '{}'", value))
}

fn print_json(value: &Value, pretty: bool) -> Result<(), String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    println!("{}", rendered.map_err(|e| e.to_string())?);
    Ok(())
}

fn first_arg(args: &[String], msg: &str) -> Result<String, String> {
    args.first().cloned().ok_or_else(|| msg.to_string())
}

fn pop_flag(args: &mut Vec<String>, flag: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == flag) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn pop_value(args: &mut Vec<String>, flag: &str) -> Result<Option<String>, String> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        return Err(format!("{} requires a value", flag));
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

fn display_err(err: kitabu::KitabuError) -> String {
    err.to_string()
}

fn print_help() {
    let help = r#"kitabu - children's e-book reader

USAGE:
  kitabu [--pretty] <command> [args...]

COMMANDS:
  pages <book_json>
  read <book_json> [--transition-ms <ms>]
  tabs <parent|child|author>
  books <catalog_json> [--category <c>] [--age-group <g>] [--level <l>]

READER INPUT:
  n / p   next / previous page (sent as ArrowRight / ArrowLeft)
  f       toggle fullscreen
  esc     leave fullscreen from outside the reader
  a       toggle narration
  q       quit

NOTES:
  - Output is JSON except for `read`.
  - Set RUST_LOG=debug to see dropped page turns.
"#;
    println!("{}", help);
}
