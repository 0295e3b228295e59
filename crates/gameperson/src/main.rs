use gameperson::{run, RunConfig, USAGE};

fn main() {
    env_logger::init();

    let config = RunConfig::from_args(std::env::args().skip(1)).unwrap_or_else(|err| {
        eprintln!("{err:#}");
        eprintln!("{USAGE}");
        std::process::exit(2);
    });

    match run(&config) {
        Ok(summary) => {
            println!(
                "Wrote {} after {} frames ({} cycles, {} soft faults)",
                config.output.display(),
                summary.frames,
                summary.cycles,
                summary.soft_faults
            );
            if let Some(err) = summary.stopped {
                eprintln!("CPU stopped: {err}");
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}
