//! Interactive read-eval-print loop.
//!
//! Reads lines from stdin and hands anything that is not `help` or `quit`
//! to the chatbot. Document-command replies print bare; chat replies get
//! the `Bot:` prefix.

use std::io::{self, Write};

use tomo::chat::{ChatMode, Chatbot};

/// Run the REPL until `quit` or end of input.
pub async fn run(chatbot: &mut Chatbot) -> anyhow::Result<()> {
    print_banner(chatbot);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("\nYou: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            // EOF behaves like quit.
            println!();
            println!("Goodbye!");
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            break;
        }
        if input == "help" {
            print_help();
            continue;
        }

        let turn = chatbot.respond(input).await;
        if turn.mode == ChatMode::Command {
            println!("{}", turn.bot);
        } else {
            println!("Bot: {}", turn.bot);
        }
    }

    Ok(())
}

fn print_banner(chatbot: &Chatbot) {
    let config = chatbot.config();

    let mut features = Vec::new();
    if config.use_rag {
        features.push("RAG");
    }
    if config.use_tools {
        features.push("function calling");
    }
    let status = if features.is_empty() {
        "in basic mode".to_string()
    } else {
        format!("with {}", features.join(" and "))
    };

    println!("Tomo initialized {status}!");
    println!("Commands: 'quit' to exit, 'help' for more");
    if config.use_rag {
        println!(
            "RAG commands: 'add_doc <text>', 'add_file <path>', 'list_docs', \
             'delete_doc <id>', 'clear_docs', 'stats'"
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  add_doc <text>    add a document to the store");
    println!("  add_file <path>   add a file's contents to the store");
    println!("  list_docs         list stored documents");
    println!("  delete_doc <id>   delete one document");
    println!("  clear_docs        delete every document");
    println!("  stats             show store counters");
    println!("  help              show this message");
    println!("  quit              exit");
    println!("Anything else is sent to the chatbot.");
}
