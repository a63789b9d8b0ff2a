use clap::Parser;

fn main() -> anyhow::Result<()> {
    quizpack::init();

    let cli = quizpack::cli::Cli::parse();
    quizpack::cli::run(cli)
}
