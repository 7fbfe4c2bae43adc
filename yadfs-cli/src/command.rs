use thiserror::Error;

pub const HELP: &str = "Commands and arguments:
status : Check status of the YADFS
copy <file> <target> : Copy a file to a destination
upload <file> <destination> : Upload a local file to the DFS
cd <destination> : Change the current directory
mkdir <directory> : Create a directory
download <file> <local_destination> : Download a file from DFS to local
list [directory] : List files in a directory
delete <target> : Delete a file or a directory
help : Show this message
exit : Leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Copy { source: String, target: String },
    Upload { local: String, destination: String },
    Cd { destination: String },
    Mkdir { destination: String },
    Download { source: String, local_destination: String },
    Delete { target: String },
    List { destination: Option<String> },
    Help,
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("No such command '{0}', please try again")]
    UnknownCommand(String),

    #[error("{command}: usage: {command} {usage}")]
    Usage {
        command: &'static str,
        usage: &'static str,
    },
}

impl Command {
    /// `None` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((verb, operands)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match *verb {
            "status" => Command::Status,
            "copy" => {
                let [source, target] = exact::<2>("copy", "<file> <target>", operands)?;
                Command::Copy { source, target }
            }
            "upload" => {
                let [local, destination] =
                    exact::<2>("upload", "<file> <destination>", operands)?;
                Command::Upload { local, destination }
            }
            "cd" => {
                let [destination] = exact::<1>("cd", "<destination>", operands)?;
                Command::Cd { destination }
            }
            "mkdir" => {
                let [destination] = exact::<1>("mkdir", "<directory>", operands)?;
                Command::Mkdir { destination }
            }
            "download" => {
                let [source, local_destination] =
                    exact::<2>("download", "<file> <local_destination>", operands)?;
                Command::Download {
                    source,
                    local_destination,
                }
            }
            "delete" => {
                let [target] = exact::<1>("delete", "<file_or_dir>", operands)?;
                Command::Delete { target }
            }
            "list" => match operands {
                [] => Command::List { destination: None },
                [destination] => Command::List {
                    destination: Some(destination.to_string()),
                },
                _ => {
                    return Err(ParseError::Usage {
                        command: "list",
                        usage: "[destination]",
                    });
                }
            },
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn exact<const N: usize>(
    command: &'static str,
    usage: &'static str,
    operands: &[&str],
) -> Result<[String; N], ParseError> {
    let operands: [&str; N] = operands
        .try_into()
        .map_err(|_| ParseError::Usage { command, usage })?;
    Ok(operands.map(str::to_string))
}
