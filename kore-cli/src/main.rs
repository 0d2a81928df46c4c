//! kore-lex - command line front end for the kore lexer.
//! kore-lex - kore 词法分析器的命令行界面。

mod commands;
mod output;

use clap::{Parser, Subcommand};

/// Main CLI structure.
/// 主 CLI 结构体。
#[derive(Parser)]
#[command(name = "kore-lex")]
#[command(author, version, about = "kore-lex - Tokenize kore sources with a stateful regex lexer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output. / 启用详细输出。
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output. / 抑制输出。
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available CLI commands.
/// 可用的 CLI 命令。
#[derive(Subcommand)]
enum Commands {
    /// Print the tokens of a file. / 打印文件的 token。
    Tokens {
        /// The file to tokenize. / 要分析的文件。
        file: String,

        /// Print a JSON array instead of one token per line. / 以 JSON 数组输出。
        #[arg(long)]
        json: bool,

        /// Use a JSON lexer definition instead of kore. / 使用 JSON 词法定义代替 kore。
        #[arg(long, short = 'd')]
        definition: Option<String>,
    },

    /// Report characters no rule matches. / 报告无法匹配的字符。
    Check {
        /// The file to check. / 要检查的文件。
        file: String,
    },

    /// Tell whether a file is kore. / 判断文件是否为 kore。
    Detect {
        /// The file to inspect. / 要检查的文件。
        file: String,
    },

    /// List the states of a lexer. / 列出词法分析器的状态。
    States {
        /// Use a JSON lexer definition instead of kore. / 使用 JSON 词法定义代替 kore。
        #[arg(long, short = 'd')]
        definition: Option<String>,
    },
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
/// 安装 tracing 订阅器。`RUST_LOG` 优先于 `--verbose`。
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

/// Main entry point.
/// 主入口点。
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Tokens {
            file,
            json,
            definition,
        } => commands::tokens::run(&file, json, definition.as_deref(), cli.verbose),
        Commands::Check { file } => commands::check::run(&file, cli.verbose),
        Commands::Detect { file } => commands::detect::run(&file, cli.verbose),
        Commands::States { definition } => commands::states::run(definition.as_deref(), cli.verbose),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("error: {}", e);
        }
        std::process::exit(1);
    }
}
