use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use my_robot_sim::launch::{robot_launch, shell_join, BridgeTopic, SharePaths, GUI_ARGUMENT};
use my_robot_sim::logging;
use serde_json::json;

/// Prints the processes the simulation launch starts.
#[derive(Parser, Debug)]
#[command(name = "spawn_robot", version)]
struct Cli {
    /// Share directory of the robot package (urdf/, worlds/, config/)
    #[arg(long, default_value = ".")]
    share_dir: PathBuf,

    /// Also start the joint state publisher GUI
    #[arg(long)]
    gui: bool,

    /// Extra bridge topic, `<topic>@<ros type><[|]|@><gz type>`; repeatable
    #[arg(long = "bridge", value_name = "TOPIC")]
    bridge_topics: Vec<BridgeTopic>,

    /// Print the description as JSON instead of command lines
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let mut launch = robot_launch(&SharePaths::new(&cli.share_dir));
    for topic in &cli.bridge_topics {
        if !launch.add_bridge_topic(topic) {
            anyhow::bail!("launch description has no parameter_bridge for `{topic}`");
        }
    }
    let args = HashMap::from([(GUI_ARGUMENT.to_owned(), cli.gui.to_string())]);
    let entries = launch.resolve(&args);
    tracing::debug!(entries = entries.len(), gui = cli.gui, "resolved launch description");

    if cli.json {
        let doc = json!({
            "arguments": launch.arguments,
            "entries": entries,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for entry in entries {
            println!("{}", shell_join(&entry.command_line()));
        }
    }
    Ok(())
}
