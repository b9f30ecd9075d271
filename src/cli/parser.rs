/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Export { config: Option<String> },
    Help,
    Unknown(String),
}

/// Flag selecting an explicit configuration file
const CONFIG_FLAG: &str = "--config";

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    match args.len() {
        0 | 1 => Command::Export { config: None },
        2 => match args[1].as_str() {
            "export" => Command::Export { config: None },
            "help" | "--help" | "-h" => Command::Help,
            CONFIG_FLAG => Command::Unknown(
                "Missing configuration path. Usage: issue-export export --config <path>"
                    .to_string(),
            ),
            cmd => Command::Unknown(cmd.to_string()),
        },
        3 => match (args[1].as_str(), args[2].as_str()) {
            ("export", CONFIG_FLAG) => Command::Unknown(
                "Missing configuration path. Usage: issue-export export --config <path>"
                    .to_string(),
            ),
            (CONFIG_FLAG, path) => Command::Export {
                config: Some(path.to_string()),
            },
            (cmd1, cmd2) => Command::Unknown(format!("{} {}", cmd1, cmd2)),
        },
        4 => match (args[1].as_str(), args[2].as_str()) {
            ("export", CONFIG_FLAG) => Command::Export {
                config: Some(args[3].clone()),
            },
            (cmd1, cmd2) => Command::Unknown(format!("{} {}", cmd1, cmd2)),
        },
        _ => Command::Unknown(args[1..].join(" ")),
    }
}
