use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use thiserror::Error;

use crate::catalog::{self, CatalogError, DownloadOutcome, Listing, Stats, UploadOutcome};
use crate::storage::models::{AssetRecord, UserRecord};
use crate::AppState;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("invalid command '{0}': expected a number")]
    InvalidCommand(String),
}

/// Source of operator input.
pub trait Prompter {
    /// Read one line without its terminator. `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;
}

/// Reads from the terminal with dialoguer, or line by line when stdin is piped.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        if std::io::stdin().is_terminal() {
            let line = dialoguer::Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?;
            return Ok(Some(line));
        }

        if !prompt.is_empty() {
            println!("{prompt}>");
        }
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Stats,
    Users,
    Assets,
    Download,
    DownloadAndDisplay,
    Upload,
    AddUser,
}

impl Command {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Command::Exit),
            1 => Some(Command::Stats),
            2 => Some(Command::Users),
            3 => Some(Command::Assets),
            4 => Some(Command::Download),
            5 => Some(Command::DownloadAndDisplay),
            6 => Some(Command::Upload),
            7 => Some(Command::AddUser),
            _ => None,
        }
    }
}

/// Parse a menu selection. Non-numeric input is an error; numbers outside the menu are `None`,
/// including ones too large for an `i64`.
pub fn parse_command(input: &str) -> Result<Option<Command>, ShellError> {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(code) => Ok(Command::from_code(code)),
        Err(_) if is_integer(trimmed) => Ok(None),
        Err(_) => Err(ShellError::InvalidCommand(input.to_string())),
    }
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

const MENU: &str = "\
>> Enter a command:
   0 => end
   1 => stats
   2 => users
   3 => assets
   4 => download
   5 => download and display
   6 => upload
   7 => add user";

/// Menu loop: prompts for a command, runs the workflow and reports its outcome.
pub struct Shell<'a, P, W> {
    state: &'a AppState,
    prompter: P,
    out: W,
}

impl<'a, P: Prompter, W: Write> Shell<'a, P, W> {
    pub fn new(state: &'a AppState, prompter: P, out: W) -> Self {
        Self {
            state,
            prompter,
            out,
        }
    }

    /// Run until command 0 or end of input. Workflow faults are reported and the loop goes on.
    pub async fn run(&mut self) -> Result<(), ShellError> {
        loop {
            writeln!(self.out)?;
            writeln!(self.out, "{MENU}")?;
            self.out.flush()?;

            let Some(line) = self.prompter.read_line("")? else {
                break;
            };
            match parse_command(&line)? {
                Some(Command::Exit) => break,
                Some(command) => self.dispatch(command).await?,
                None => writeln!(self.out, "** Unknown command, try again...")?,
            }
        }

        writeln!(self.out)?;
        writeln!(self.out, "** done **")?;
        self.out.flush()?;
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> Result<(), ShellError> {
        tracing::debug!(?command, "Dispatching command");
        let result = match command {
            Command::Exit => Ok(()),
            Command::Stats => self.stats().await,
            Command::Users => self.users().await,
            Command::Assets => self.assets().await,
            Command::Download => self.download(false).await,
            Command::DownloadAndDisplay => self.download(true).await,
            Command::Upload => self.upload().await,
            Command::AddUser => self.add_user().await,
        };

        match result {
            Ok(()) => Ok(()),
            Err(Fault::Shell(e)) => Err(e),
            Err(Fault::Catalog(e)) => {
                tracing::error!(?command, error = %e, "Command failed");
                writeln!(self.out, "**ERROR: {e}")?;
                Ok(())
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, ShellError> {
        self.out.flush()?;
        Ok(self.prompter.read_line(prompt)?.unwrap_or_default())
    }

    async fn stats(&mut self) -> Result<(), Fault> {
        let stats = catalog::stats(self.state).await?;
        render_stats(&mut self.out, &stats)?;
        Ok(())
    }

    async fn users(&mut self) -> Result<(), Fault> {
        match catalog::list_users(self.state).await? {
            Listing::Rows(users) => render_users(&mut self.out, &users)?,
            Listing::Empty => writeln!(self.out, "No users...")?,
        }
        Ok(())
    }

    async fn assets(&mut self) -> Result<(), Fault> {
        match catalog::list_assets(self.state).await? {
            Listing::Rows(assets) => render_assets(&mut self.out, &assets)?,
            Listing::Empty => writeln!(self.out, "No assets...")?,
        }
        Ok(())
    }

    async fn download(&mut self, display: bool) -> Result<(), Fault> {
        let input = self.ask("Enter asset id")?;
        let outcome = match input.trim().parse::<i64>() {
            Ok(asset_id) => catalog::download(self.state, asset_id, display).await?,
            Err(_) => {
                writeln!(self.out, "No such asset...")?;
                return Ok(());
            }
        };

        let written = match outcome {
            DownloadOutcome::NoSuchAsset(_) => writeln!(self.out, "No such asset..."),
            DownloadOutcome::Saved { path } => {
                writeln!(self.out, "Downloaded and saved as '{}'", path.display())
            }
        };
        written?;
        Ok(())
    }

    async fn upload(&mut self) -> Result<(), Fault> {
        let file = self.ask("Enter local filename")?;
        let local_file = Path::new(&file);
        if !local_file.exists() {
            writeln!(self.out, "Local file '{file}' does not exist...")?;
            return Ok(());
        }

        let input = self.ask("Enter user id")?;
        let Ok(user_id) = input.trim().parse::<i64>() else {
            writeln!(self.out, "No such user...")?;
            return Ok(());
        };

        let written = match catalog::upload(self.state, local_file, user_id).await? {
            UploadOutcome::MissingLocalFile(path) => writeln!(
                self.out,
                "Local file '{}' does not exist...",
                path.display()
            ),
            UploadOutcome::NoSuchUser(_) => writeln!(self.out, "No such user..."),
            UploadOutcome::Uploaded {
                asset_id,
                bucket_key,
            } => writeln!(
                self.out,
                "Uploaded and stored as '{bucket_key}'\nRecorded under asset id {asset_id}"
            ),
        };
        written?;
        Ok(())
    }

    async fn add_user(&mut self) -> Result<(), Fault> {
        let email = self.ask("Enter user's email")?;
        let last_name = self.ask("Enter user's last (family) name")?;
        let first_name = self.ask("Enter user's first (given) name")?;

        let user = catalog::add_user(self.state, &email, &last_name, &first_name).await?;
        writeln!(self.out, "Recorded under user id {}", user.user_id)?;
        Ok(())
    }
}

/// Workflow faults are reported; shell faults end the session.
enum Fault {
    Catalog(CatalogError),
    Shell(ShellError),
}

impl From<CatalogError> for Fault {
    fn from(e: CatalogError) -> Self {
        Fault::Catalog(e)
    }
}

impl From<ShellError> for Fault {
    fn from(e: ShellError) -> Self {
        Fault::Shell(e)
    }
}

impl From<std::io::Error> for Fault {
    fn from(e: std::io::Error) -> Self {
        Fault::Shell(e.into())
    }
}

pub fn render_stats<W: Write>(out: &mut W, stats: &Stats) -> std::io::Result<()> {
    writeln!(out, "S3 bucket name: {}", stats.bucket_name)?;
    writeln!(out, "S3 assets: {}", stats.object_count)?;
    writeln!(out, "RDS MySQL endpoint: {}", stats.endpoint)?;
    writeln!(out, "# of users: {}", stats.user_count)?;
    writeln!(out, "# of assets: {}", stats.asset_count)
}

pub fn render_users<W: Write>(out: &mut W, users: &[UserRecord]) -> std::io::Result<()> {
    for user in users {
        writeln!(out, "User id: {}", user.user_id)?;
        writeln!(out, "  Email: {}", user.email)?;
        writeln!(out, "  Name: {}, {}", user.last_name, user.first_name)?;
        writeln!(out, "  Folder: {}", user.bucket_folder)?;
    }
    Ok(())
}

pub fn render_assets<W: Write>(out: &mut W, assets: &[AssetRecord]) -> std::io::Result<()> {
    for asset in assets {
        writeln!(out, "Asset id: {}", asset.asset_id)?;
        writeln!(out, "  User id: {}", asset.user_id)?;
        writeln!(out, "  Original name: {}", asset.asset_name)?;
        writeln!(out, "  Key name: {}", asset.bucket_key)?;
    }
    Ok(())
}
