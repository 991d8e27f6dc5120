//! CLI command definitions and handlers.
//!
//! Management subcommands edit the profile store; anything else is handed
//! to the wrapped executable unchanged.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::{
    ConfigStore, CredentialStatus, EnvPatch, NewProfile, Patch, Profile, ProfileEnv,
    ProfileUpdate,
};
use crate::launch::{build_spawn_params, resolve_command, run};

/// Switch between API credential profiles and run claude with one of them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Arguments passed to the wrapped executable when no subcommand is given
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List profiles; the current one is marked with '*'
    List,

    /// Make the profile at INDEX current
    Use {
        #[arg(value_name = "INDEX")]
        index: usize,
    },

    /// Add a profile
    Add(AddArgs),

    /// Change fields of an existing profile
    Edit(EditArgs),

    /// Remove the profile at INDEX
    Remove {
        #[arg(value_name = "INDEX")]
        index: usize,
    },

    /// Remove the profile called NAME
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Print the config file path
    Path,

    /// Upgrade the config file to the current schema
    Migrate,

    /// Run the wrapped executable with the current profile
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct AddArgs {
    /// Unique profile name
    #[arg(long)]
    pub name: String,

    /// Auth token (ANTHROPIC_AUTH_TOKEN)
    #[arg(long)]
    pub token: String,

    /// API endpoint (ANTHROPIC_BASE_URL)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Model identifier (ANTHROPIC_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct EditArgs {
    /// Profile to change
    #[arg(value_name = "NAME")]
    pub name: String,

    /// New profile name
    #[arg(long, value_name = "NAME")]
    pub rename: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_name = "URL", conflicts_with = "clear_base_url")]
    pub base_url: Option<String>,

    /// Remove ANTHROPIC_BASE_URL from the profile
    #[arg(long)]
    pub clear_base_url: bool,

    #[arg(long, conflicts_with = "clear_token")]
    pub token: Option<String>,

    /// Remove ANTHROPIC_AUTH_TOKEN from the profile
    #[arg(long)]
    pub clear_token: bool,

    #[arg(long, conflicts_with = "clear_model")]
    pub model: Option<String>,

    /// Remove ANTHROPIC_MODEL from the profile
    #[arg(long)]
    pub clear_model: bool,
}

impl From<AddArgs> for NewProfile {
    fn from(args: AddArgs) -> Self {
        NewProfile::Env {
            name: args.name,
            description: args.description,
            env: ProfileEnv {
                base_url: args.base_url,
                auth_token: Some(args.token),
                model: args.model,
                ..ProfileEnv::default()
            },
        }
    }
}

impl EditArgs {
    pub fn into_update(self) -> (String, ProfileUpdate) {
        let update = ProfileUpdate {
            name: self.rename,
            description: self.description,
            env: EnvPatch {
                base_url: field_patch(self.base_url, self.clear_base_url),
                auth_token: field_patch(self.token, self.clear_token),
                model: field_patch(self.model, self.clear_model),
            },
        };
        (self.name, update)
    }
}

fn field_patch(value: Option<String>, clear: bool) -> Patch<String> {
    match (value, clear) {
        (_, true) => Patch::Clear,
        (Some(v), false) => Patch::Set(v),
        (None, false) => Patch::Keep,
    }
}

/// Execute the parsed command line. Returns the process exit code.
pub fn execute(cli: Cli, store: &ConfigStore) -> Result<i32> {
    let command = cli.command.unwrap_or(Command::Run { args: cli.args });

    match command {
        Command::List => {
            let current = store.current_index();
            for (index, profile) in store.all_configs().iter().enumerate() {
                println!("{}", format_profile_line(index, profile, index == current));
            }
        }
        Command::Use { index } => match store.switch_to_index(index)? {
            Some(profile) => println!("Switched to '{}'", profile.name),
            None => anyhow::bail!("No profile at index {}", index),
        },
        Command::Add(args) => {
            let profile = store.add_config(args.into())?;
            println!("Added '{}'", profile.name);
        }
        Command::Edit(args) => {
            let (name, update) = args.into_update();
            let profile = store.update_config(&name, update)?;
            println!("Updated '{}'", profile.name);
        }
        Command::Remove { index } => {
            let removed = store.remove_config_by_index(index)?;
            println!("Removed '{}'", removed.name);
        }
        Command::Delete { name } => {
            let removed = store.delete_config(&name)?;
            println!("Removed '{}'", removed.name);
        }
        Command::Path => println!("{}", store.config_path().display()),
        Command::Migrate => {
            let result = store.force_migration()?;
            match result.from_version {
                Some(from) if result.migrated => {
                    println!("Migrated {} -> {}", from, result.to_version)
                }
                _ => println!("Already at {}", result.to_version),
            }
        }
        Command::Run { args } => {
            let profile = store.current_config();
            tracing::info!("Launching with profile '{}'", profile.name);
            let params = build_spawn_params(resolve_command(), args, &profile);
            return run(&params);
        }
    }
    Ok(0)
}

/// One line of `list` output. The token is masked.
pub fn format_profile_line(index: usize, profile: &Profile, current: bool) -> String {
    let marker = if current { '*' } else { ' ' };
    let token = match profile.resolve_credential() {
        CredentialStatus::Configured(secret) => secret.hint(),
        CredentialStatus::Empty | CredentialStatus::Missing => "(no token)".to_string(),
    };

    let mut line = format!("{} {:>2}  {}  {}", marker, index, profile.name, token);
    if let Some(url) = profile.env.base_url.as_deref().filter(|u| !u.is_empty()) {
        line.push_str(&format!("  {}", url));
    }
    if let Some(model) = profile.env.model.as_deref().filter(|m| !m.is_empty()) {
        line.push_str(&format!("  model={}", model));
    }
    if !profile.description.is_empty() {
        line.push_str(&format!("  # {}", profile.description));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_flags_map_to_patch_states() {
        let cli = Cli::try_parse_from([
            "ccswitch",
            "edit",
            "work",
            "--base-url",
            "https://x.example",
            "--clear-model",
        ])
        .unwrap();
        let Some(Command::Edit(args)) = cli.command else {
            panic!("expected edit");
        };
        let (name, update) = args.into_update();
        assert_eq!(name, "work");
        assert_eq!(update.env.base_url, Patch::Set("https://x.example".to_string()));
        assert_eq!(update.env.auth_token, Patch::Keep);
        assert_eq!(update.env.model, Patch::Clear);
        assert_eq!(update.name, None);
    }

    #[test]
    fn set_and_clear_conflict() {
        let result = Cli::try_parse_from([
            "ccswitch",
            "edit",
            "work",
            "--token",
            "t",
            "--clear-token",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn list_line_masks_token() {
        let mut profile = Profile::default_profile();
        profile.name = "work".to_string();
        profile.env.auth_token = Some("sk-ant-secret-1234".to_string());
        profile.env.model = Some("opus".to_string());

        let line = format_profile_line(1, &profile, true);
        assert!(line.starts_with("*  1  work"));
        assert!(line.contains("••••1234"));
        assert!(line.contains("model=opus"));
        assert!(!line.contains("secret"));
    }
}
