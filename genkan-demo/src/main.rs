use anyhow::{bail, Result};
use argh::FromArgs;
use tracing_subscriber::EnvFilter;

use genkan::{AppOps, Orientation, Runtime, SessionClient, SystemEvent};
use genkan_ipc::{Bundle, LaunchReply, LaunchRequest};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Genkan demo - reference lifecycle application and launcher
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Run(RunCmd),
    Version(VersionCmd),
    Launch(LaunchCmd),
    Resume(ResumeCmd),
    Pause(PauseCmd),
    Terminate(TerminateCmd),
    TerminateBackground(TerminateBackgroundCmd),
    Wake(WakeCmd),
    Suspend(SuspendCmd),
}

/// Run the demo application
#[derive(FromArgs)]
#[argh(subcommand, name = "run")]
struct RunCmd {
    /// application name, also the socket identity
    #[argh(option, default = "default_name()")]
    name: String,
    /// launch arguments as alternating key value pairs
    #[argh(positional, greedy)]
    args: Vec<String>,
}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

/// Send a launch request with arguments to a running application
#[derive(FromArgs)]
#[argh(subcommand, name = "launch")]
struct LaunchCmd {
    /// target application name
    #[argh(option, default = "default_name()")]
    name: String,
    /// alternating key value pairs
    #[argh(positional, greedy)]
    pairs: Vec<String>,
}

/// Bring a running application to the foreground
#[derive(FromArgs)]
#[argh(subcommand, name = "resume")]
struct ResumeCmd {
    /// target application name
    #[argh(option, default = "default_name()")]
    name: String,
}

/// Send a running application to the background
#[derive(FromArgs)]
#[argh(subcommand, name = "pause")]
struct PauseCmd {
    /// target application name
    #[argh(option, default = "default_name()")]
    name: String,
}

/// Shut a running application down
#[derive(FromArgs)]
#[argh(subcommand, name = "terminate")]
struct TerminateCmd {
    /// target application name
    #[argh(option, default = "default_name()")]
    name: String,
}

/// Shut a running application down only if it is backgrounded
#[derive(FromArgs)]
#[argh(subcommand, name = "terminate-background")]
struct TerminateBackgroundCmd {
    /// target application name
    #[argh(option, default = "default_name()")]
    name: String,
}

/// Send a wake notification
#[derive(FromArgs)]
#[argh(subcommand, name = "wake")]
struct WakeCmd {
    /// target application name
    #[argh(option, default = "default_name()")]
    name: String,
}

/// Send a suspend notification
#[derive(FromArgs)]
#[argh(subcommand, name = "suspend")]
struct SuspendCmd {
    /// target application name
    #[argh(option, default = "default_name()")]
    name: String,
}

fn default_name() -> String {
    "genkan-demo".to_string()
}

/// Minimal application that logs every lifecycle callback.
struct DemoApp;

impl AppOps for DemoApp {
    fn create(&mut self) -> Result<()> {
        tracing::info!("demo created");
        Ok(())
    }

    fn reset(&mut self, payload: &Bundle) -> Result<()> {
        tracing::info!("demo launched with {} arguments", payload.len());
        for (key, value) in payload.iter() {
            tracing::info!("  {} = {}", key, value);
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        tracing::info!("demo paused");
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        tracing::info!("demo resumed");
        Ok(())
    }

    fn terminate(&mut self) -> Result<()> {
        tracing::info!("demo terminating");
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        None => {
            // No subcommand - show help (simulate --help)
            let args: Vec<&str> = vec!["genkan-demo", "--help"];
            match Cli::from_args(&args[..1], &args[1..]) {
                Ok(_) => {}
                Err(e) => {
                    println!("{}", e.output);
                }
            }
            Ok(())
        }
        Some(SubCommand::Run(cmd)) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .init();

            tracing::info!("genkan-demo starting");
            run_demo(cmd)
        }
        Some(SubCommand::Version(_)) => {
            println!("genkan-demo {}", VERSION);
            Ok(())
        }
        Some(subcmd) => run_cli(subcmd),
    }
}

fn run_demo(cmd: RunCmd) -> Result<()> {
    let mut runtime = Runtime::new(&cmd.name, Box::new(DemoApp))?;
    runtime.set_system_handler(SystemEvent::LanguageChanged, |notice| {
        tracing::info!("demo saw {:?}", notice);
    });
    runtime.set_system_handler(SystemEvent::LowMemory, |notice| {
        tracing::info!("demo saw {:?}", notice);
    });
    runtime.set_rotation_callback(|orientation: Orientation| {
        tracing::info!("demo rotated to {:?}", orientation);
    });
    runtime.run(&cmd.args)?;
    Ok(())
}

fn run_cli(subcmd: SubCommand) -> Result<()> {
    let (name, request) = to_request(subcmd)?;
    let mut client = SessionClient::connect(&name)?;
    let reply = client.send(&request)?;

    match reply {
        LaunchReply::Ok => {}
        LaunchReply::Error { message } => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn to_request(subcmd: SubCommand) -> Result<(String, LaunchRequest)> {
    match subcmd {
        SubCommand::Run(_) | SubCommand::Version(_) => {
            unreachable!("handled in main")
        }
        SubCommand::Launch(cmd) => {
            if cmd.pairs.len() % 2 != 0 {
                bail!("launch arguments must be key value pairs");
            }
            let bundle = Bundle::from_argv(&cmd.pairs);
            Ok((cmd.name, LaunchRequest::Start { bundle }))
        }
        SubCommand::Resume(cmd) => Ok((cmd.name, LaunchRequest::Resume)),
        SubCommand::Pause(cmd) => Ok((cmd.name, LaunchRequest::Pause)),
        SubCommand::Terminate(cmd) => Ok((cmd.name, LaunchRequest::Terminate)),
        SubCommand::TerminateBackground(cmd) => Ok((cmd.name, LaunchRequest::TerminateBackground)),
        SubCommand::Wake(cmd) => Ok((cmd.name, LaunchRequest::Wake)),
        SubCommand::Suspend(cmd) => Ok((cmd.name, LaunchRequest::Suspend)),
    }
}
