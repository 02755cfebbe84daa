use std::env;
use std::process::ExitCode;

use kitabu_publish::{BookDraft, PublishClient, PublishError, PublishOptions};

fn main() -> ExitCode {
    env_logger::init();
    match run(env::args().collect()) {
        Ok(message) => {
            if !message.is_empty() {
                println!("{}", message);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<String, PublishError> {
    let mut rest = args.into_iter().skip(1).collect::<Vec<_>>();
    let check_only = pop_flag(&mut rest, "--check");

    if rest.is_empty() || rest[0] == "--help" || rest[0] == "-h" {
        print_help();
        return Ok(String::new());
    }

    let draft = BookDraft::from_draft_path(&rest[0])?;
    if check_only {
        draft.validate()?;
        return Ok(format!(
            "'{}' is ready to publish ({} pages)",
            draft.title,
            draft.pages.len()
        ));
    }

    let client = PublishClient::new(&PublishOptions::from_env())?;
    let ack = client.submit(&draft)?;
    Ok(match ack.book_id {
        Some(id) => format!("{} (id {})", ack.user_message(), id),
        None => ack.user_message().to_string(),
    })
}

fn pop_flag(args: &mut Vec<String>, flag: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == flag) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn print_help() {
    let help = r#"kitabu-publish - submit a new book to the kitabu server

USAGE:
  kitabu-publish [--check] <draft_json>

DRAFT FORMAT:
  {"title": "...", "description": "...", "cover": "cover.png",
   "pages": [{"text": "...", "image": "p1.png"}]}
  Image paths are relative to the draft file.

ENVIRONMENT:
  KITABU_API_URL   server base (default http://127.0.0.1:5000)
  RUST_LOG         log filter, e.g. info
"#;
    println!("{}", help);
}
