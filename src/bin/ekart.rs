//! Ekart 终端客户端
//!
//! 一次性子命令（list / sell / buy）或交互模式（shell，默认）。

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::{Parser, Subcommand};
use ekart::client::{
    render::render, Action, CatalogClient, Confirm, HttpCatalogApi, Outcome,
};
use ekart::infrastructure::logger::Logger;

#[derive(Parser, Debug)]
#[command(name = "ekart", about = "Ekart terminal client", version)]
struct Cli {
    #[arg(
        long,
        env = "EKART_API_URL",
        default_value = "http://localhost:5000",
        global = true,
        help = "Base url of the catalog server"
    )]
    api_url: String,

    #[arg(long, default_value_t = 10, global = true, help = "Request timeout in seconds")]
    timeout_secs: u64,

    #[arg(long, env = "EKART_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the product grid
    List,
    /// List a product for sale
    Sell {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Buy (remove) a product
    Buy {
        id: i64,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Interactive session (default)
    Shell,
}

/// 从终端读取 y/N 确认
struct PromptConfirm {
    assume_yes: bool,
}

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

type Client = CatalogClient<HttpCatalogApi, PromptConfirm>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    Logger::init_cli(&cli.log_level)?;

    let api = HttpCatalogApi::new(&cli.api_url, Duration::from_secs(cli.timeout_secs))?;
    let assume_yes = matches!(cli.command, Some(Command::Buy { yes: true, .. }));
    let mut client = CatalogClient::new(api, PromptConfirm { assume_yes });

    match cli.command.unwrap_or(Command::Shell) {
        Command::List => {
            client.refresh().await?;
            print!("{}", render(client.state()));
        }
        Command::Sell {
            name,
            price,
            description,
        } => {
            let product = client
                .submit_with(&name, &price, description.as_deref())
                .await?;
            println!("Listed #{} {}", product.id, product.name);
            print!("{}", render(client.state()));
        }
        Command::Buy { id, .. } => {
            match client.request_removal(id).await? {
                Outcome::Declined => println!("Cancelled."),
                _ => println!("Bought #{}", id),
            }
            print!("{}", render(client.state()));
        }
        Command::Shell => run_shell(client).await?,
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum ShellCommand {
    Action(Action),
    Show,
    Form,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let command = match command {
        "" | "show" => ShellCommand::Show,
        "refresh" | "list" => ShellCommand::Action(Action::Refresh),
        "name" => ShellCommand::Action(Action::EditName(rest.to_string())),
        "price" => ShellCommand::Action(Action::EditPrice(rest.to_string())),
        "desc" => ShellCommand::Action(Action::EditDescription(rest.to_string())),
        "submit" => ShellCommand::Action(Action::Submit),
        "buy" => {
            let id = rest
                .parse::<i64>()
                .map_err(|_| format!("usage: buy <id> (got {:?})", rest))?;
            ShellCommand::Action(Action::RequestRemoval(id))
        }
        "form" => ShellCommand::Form,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command {:?}, type `help`", other)),
    };

    Ok(command)
}

fn print_help() {
    println!("Commands:");
    println!("  list | refresh     reload the catalog");
    println!("  name <text>        set the product name");
    println!("  price <amount>     set the price");
    println!("  desc <text>        set the description (optional)");
    println!("  form               show the form");
    println!("  submit             list the product for sale");
    println!("  buy <id>           buy (remove) a product");
    println!("  show               redraw the grid");
    println!("  quit               leave");
}

async fn run_shell(mut client: Client) -> anyhow::Result<()> {
    println!("Connected to {}", client.api().base_url());

    // 首次加载失败时仍进入交互，错误会显示在网格下方
    client.refresh().await.ok();
    print!("{}", render(client.state()));
    print_help();

    let stdin = io::stdin();
    loop {
        print!("ekart> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let action = match parse_command(line.trim()) {
            Ok(ShellCommand::Action(action)) => action,
            Ok(ShellCommand::Show) => {
                print!("{}", render(client.state()));
                continue;
            }
            Ok(ShellCommand::Form) => {
                let form = &client.state().form;
                println!(
                    "name={:?} price={:?} description={:?}",
                    form.name, form.price, form.description
                );
                continue;
            }
            Ok(ShellCommand::Help) => {
                print_help();
                continue;
            }
            Ok(ShellCommand::Quit) => break,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        let redraw = matches!(
            action,
            Action::Refresh | Action::Submit | Action::RequestRemoval(_)
        );

        match client.dispatch(action).await {
            Ok(Outcome::Submitted(product)) => println!("Listed #{} {}", product.id, product.name),
            Ok(Outcome::Removed(id)) => println!("Bought #{}", id),
            Ok(Outcome::Declined) => println!("Cancelled."),
            Ok(_) => {}
            Err(err) => println!("error: {}", err),
        }

        if redraw {
            print!("{}", render(client.state()));
        }
    }

    Ok(())
}
