use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bloggen",
    about = "Generate blog posts with Llama 2 models hosted on Replicate",
    allow_hyphen_values = true
)]
pub struct CliArgs {
    /// Token command (`set`, `get`, `clear`) or a free-form prompt.
    #[arg(index = 1)]
    pub command: Option<String>,
    /// Value for the command, e.g. the token passed to `set`.
    #[arg(index = 2)]
    pub value: Option<String>,
    #[arg(long, short = 'm')]
    pub model: Option<String>,
    #[arg(long)]
    pub temperature: Option<f32>,
    #[arg(long)]
    pub top_p: Option<f32>,
    #[arg(long)]
    pub max_length: Option<u32>,
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long, short = 'p')]
    pub prompt: Option<String>,
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommandKind {
    Set,
    Get,
    Clear,
}

impl CommandKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "set" => Some(Self::Set),
            "get" => Some(Self::Get),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }
}

impl CliArgs {
    pub fn command_kind(&self) -> Option<CommandKind> {
        self.command.as_deref().and_then(CommandKind::parse)
    }

    pub fn has_one_shot_prompt(&self) -> bool {
        self.prompt.is_some() || (self.command.is_some() && self.command_kind().is_none())
    }
}
