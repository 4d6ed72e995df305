// SerialCom - Interactive serial port terminal
use clap::Parser;
use serialcom::cli::{execute_command, Args, ConsoleWriter, OutputWriter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let writer = ConsoleWriter::new(args.output);

    if let Err(e) = execute_command(args).await {
        if writer.write_error(&e.to_string()).is_err() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
